//! SceneGraph → SVG export.
//!
//! Locked helper items (the background grid) are never written. Geometry is
//! already in scene coordinates, so no transforms are emitted.

use crate::layout::Viewport;
use crate::model::{Color, NodeKind, SceneGraph, SceneNode};
use petgraph::graph::NodeIndex;

/// Serialize the document as a standalone SVG string sized to the viewport.
pub fn export_svg(graph: &SceneGraph, viewport: Viewport) -> String {
    let (w, h) = (fmt_num(viewport.width), fmt_num(viewport.height));
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n"
    ));
    for &idx in graph.children(graph.root) {
        emit_node(graph, idx, 1, &mut svg);
    }
    svg.push_str("</svg>\n");
    svg
}

fn emit_node(graph: &SceneGraph, idx: NodeIndex, depth: usize, out: &mut String) {
    let node = &graph.graph[idx];
    if node.locked {
        return;
    }
    let indent = "  ".repeat(depth);
    let id_attr = node
        .name
        .as_deref()
        .map(|name| format!(" id=\"{}\"", escape_xml(name)))
        .unwrap_or_default();

    match &node.kind {
        NodeKind::Root => {}
        NodeKind::Group => {
            let opacity = opacity_attr(node);
            out.push_str(&format!("{indent}<g{id_attr}{opacity}>\n"));
            for &child in graph.children(idx) {
                emit_node(graph, child, depth + 1, out);
            }
            out.push_str(&format!("{indent}</g>\n"));
        }
        NodeKind::Rect { rect, radius } => {
            let rx = if *radius > 0.0 {
                format!(" rx=\"{}\"", fmt_num(*radius))
            } else {
                String::new()
            };
            out.push_str(&format!(
                "{indent}<rect{id_attr} x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{rx}{} />\n",
                fmt_num(rect.x0),
                fmt_num(rect.y0),
                fmt_num(rect.width()),
                fmt_num(rect.height()),
                paint_attrs(node),
            ));
        }
        NodeKind::Ellipse { center, radii } if (radii.x - radii.y).abs() < f64::EPSILON => {
            out.push_str(&format!(
                "{indent}<circle{id_attr} cx=\"{}\" cy=\"{}\" r=\"{}\"{} />\n",
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(radii.x),
                paint_attrs(node),
            ));
        }
        NodeKind::Ellipse { center, radii } => {
            out.push_str(&format!(
                "{indent}<ellipse{id_attr} cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"{} />\n",
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(radii.x),
                fmt_num(radii.y),
                paint_attrs(node),
            ));
        }
        NodeKind::Path { path } => {
            out.push_str(&format!(
                "{indent}<path{id_attr} d=\"{}\"{} />\n",
                path.to_svg(),
                paint_attrs(node),
            ));
        }
        NodeKind::Text {
            origin,
            content,
            font_size,
        } => {
            out.push_str(&format!(
                "{indent}<text{id_attr} x=\"{}\" y=\"{}\" font-size=\"{}\"{}>{}</text>\n",
                fmt_num(origin.x),
                fmt_num(origin.y),
                fmt_num(*font_size),
                paint_attrs(node),
                escape_xml(content),
            ));
        }
    }
}

fn paint_attrs(node: &SceneNode) -> String {
    let style = &node.style;
    let mut attrs = String::new();
    push_paint(&mut attrs, "fill", style.fill);
    push_paint(&mut attrs, "stroke", style.stroke);
    if style.stroke.is_some() {
        attrs.push_str(&format!(" stroke-width=\"{}\"", fmt_num(style.stroke_width)));
    }
    attrs.push_str(&opacity_attr(node));
    attrs
}

fn push_paint(out: &mut String, attr: &str, color: Option<Color>) {
    match color {
        Some(c) => {
            out.push_str(&format!(" {attr}=\"{}\"", c.to_hex()));
            if c.a < 1.0 {
                out.push_str(&format!(" {attr}-opacity=\"{}\"", fmt_num(f64::from(c.a))));
            }
        }
        None => out.push_str(&format!(" {attr}=\"none\"")),
    }
}

fn opacity_attr(node: &SceneNode) -> String {
    if node.style.opacity < 1.0 {
        format!(" opacity=\"{}\"", fmt_num(node.style.opacity))
    } else {
        String::new()
    }
}

/// Round to three decimals and drop trailing zeros.
fn fmt_num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    // Avoid "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::layout::insert_grid;
    use crate::model::Style;
    use kurbo::{Point, Rect, Vec2};
    use pretty_assertions::assert_eq;

    #[test]
    fn exports_shapes_with_paint() {
        let mut g = SceneGraph::new();
        g.add_node(
            g.root,
            SceneNode::new(
                NodeId::anonymous(),
                NodeKind::Rect {
                    rect: Rect::new(10.0, 20.0, 110.0, 70.0),
                    radius: 0.0,
                },
            )
            .with_name("card")
            .with_style(Style {
                fill: Some(Color::rgb8(0xe0, 0xe0, 0xe0)),
                ..Style::default()
            }),
        );
        g.add_node(
            g.root,
            SceneNode::new(
                NodeId::anonymous(),
                NodeKind::Ellipse {
                    center: Point::new(5.0, 5.0),
                    radii: Vec2::new(2.5, 2.5),
                },
            )
            .with_style(Style {
                fill: None,
                stroke: Some(Color::rgb8(0x2c, 0x3e, 0x50)),
                stroke_width: 2.0,
                opacity: 0.5,
            }),
        );

        let svg = export_svg(&g, Viewport::new(200.0, 100.0).unwrap());
        assert_eq!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"100\" viewBox=\"0 0 200 100\">\n\
             \x20 <rect id=\"card\" x=\"10\" y=\"20\" width=\"100\" height=\"50\" fill=\"#e0e0e0\" stroke=\"none\" />\n\
             \x20 <circle cx=\"5\" cy=\"5\" r=\"2.5\" fill=\"none\" stroke=\"#2c3e50\" stroke-width=\"2\" opacity=\"0.5\" />\n\
             </svg>\n"
        );
    }

    #[test]
    fn grid_is_not_exported() {
        let mut g = SceneGraph::new();
        insert_grid(&mut g, Viewport::default(), "grid", 20.0);
        let svg = export_svg(&g, Viewport::default());
        assert!(!svg.contains("grid"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn text_is_escaped() {
        let mut g = SceneGraph::new();
        g.add_node(
            g.root,
            SceneNode::new(
                NodeId::anonymous(),
                NodeKind::Text {
                    origin: Point::new(1.0, 2.0),
                    content: "a < b & c".to_string(),
                    font_size: 24.0,
                },
            ),
        );
        let svg = export_svg(&g, Viewport::default());
        assert!(svg.contains(">a &lt; b &amp; c</text>"));
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(0.123456), "0.123");
        assert_eq!(fmt_num(-0.0001), "0");
    }
}
