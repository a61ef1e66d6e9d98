//! SVG → SceneGraph import.
//!
//! Understands the subset of SVG the editor produces and that typical
//! drawing tools export: basic shapes, paths, text, nested groups with
//! transforms, presentation attributes and inline `style` declarations.
//! Everything else (defs, gradients, clip paths, scripts...) is skipped
//! together with its subtree.
//!
//! Tokenizing is done with `winnow`; the resulting element stream drives a
//! small stack machine that carries inherited paint and the current
//! transform down the tree and bakes the transform into each item.

use crate::geometry::{parse_points, polyline};
use crate::id::NodeId;
use crate::model::{Color, NodeKind, SceneGraph, SceneNode, Style};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use petgraph::graph::NodeIndex;
use smallvec::SmallVec;
use std::borrow::Cow;
use thiserror::Error;
use winnow::ascii::{float, multispace0};
use winnow::combinator::{alt, delimited, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("document has no <svg> root element")]
    MissingRoot,
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
    #[error("unbalanced tag: expected </{expected}>, found {found}")]
    UnbalancedTag { expected: String, found: String },
    #[error("invalid number in `{attr}`: {value:?}")]
    InvalidNumber { attr: String, value: String },
    #[error("invalid path data: {0}")]
    InvalidPath(String),
}

fn syntax(offset: usize, message: impl Into<String>) -> ImportError {
    ImportError::Syntax {
        offset,
        message: message.into(),
    }
}

/// Elements whose subtree never contributes drawable items.
const SKIPPED: &[&str] = &[
    "defs",
    "style",
    "title",
    "desc",
    "metadata",
    "script",
    "symbol",
    "marker",
    "mask",
    "clipPath",
    "pattern",
    "filter",
    "linearGradient",
    "radialGradient",
];

/// Parse an SVG document into a fresh `SceneGraph`.
pub fn import_svg(src: &str) -> Result<SceneGraph, ImportError> {
    let offset = |rest: &str| src.len() - rest.len();
    let mut rest = src;
    let mut importer = Importer::new();

    loop {
        skip_misc(&mut rest).map_err(|message| syntax(offset(rest), message))?;
        if rest.is_empty() {
            break;
        }

        let at = offset(rest);
        if let Some(body) = rest.strip_prefix("<![CDATA[") {
            let end = body
                .find("]]>")
                .ok_or_else(|| syntax(at, "unterminated CDATA section"))?;
            importer.text(&body[..end], at)?;
            rest = &body[end + 3..];
        } else if rest.starts_with("</") {
            let name = parse_end_tag
                .parse_next(&mut rest)
                .map_err(|e| syntax(at, format!("malformed end tag: {e}")))?;
            importer.close(name, at)?;
        } else if rest.starts_with('<') {
            let tag = parse_start_tag
                .parse_next(&mut rest)
                .map_err(|e| syntax(at, format!("malformed start tag: {e}")))?;
            importer.open(tag, at)?;
        } else {
            let text: Result<&str, ErrMode<ContextError>> = take_till(1.., '<').parse_next(&mut rest);
            if let Ok(text) = text {
                importer.text(text, at)?;
            }
        }
    }

    let graph = importer.finish()?;
    log::debug!("imported {} items", graph.item_count());
    Ok(graph)
}

// ─── Tokenizer ───────────────────────────────────────────────────────────

#[derive(Debug)]
struct StartTag<'a> {
    name: &'a str,
    attrs: Vec<(&'a str, &'a str)>,
    self_closing: bool,
}

/// Skip whitespace, comments, processing instructions and declarations.
fn skip_misc(input: &mut &str) -> Result<(), &'static str> {
    loop {
        *input = input.trim_start();
        let (open, close, unterminated) = if input.starts_with("<!--") {
            ("<!--", "-->", "unterminated comment")
        } else if input.starts_with("<?") {
            ("<?", "?>", "unterminated processing instruction")
        } else if input.starts_with("<!") && !input.starts_with("<![CDATA[") {
            ("<!", ">", "unterminated declaration")
        } else {
            return Ok(());
        };
        let body = &input[open.len()..];
        let end = body.find(close).ok_or(unterminated)?;
        *input = &body[end + close.len()..];
    }
}

/// Consume optional whitespace (concrete error type avoids inference issues).
fn skip_space(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> = multispace0.parse_next(input);
}

fn skip_separators(input: &mut &str) {
    *input = input.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',');
}

fn parse_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')
    })
    .parse_next(input)
}

fn parse_quoted<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
    ))
    .parse_next(input)
}

fn parse_attribute<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    let name = parse_name.parse_next(input)?;
    skip_space(input);
    '='.parse_next(input)?;
    skip_space(input);
    let value = parse_quoted.parse_next(input)?;
    Ok((name, value))
}

fn parse_start_tag<'a>(input: &mut &'a str) -> ModalResult<StartTag<'a>> {
    let name = preceded('<', parse_name).parse_next(input)?;
    let mut attrs = Vec::new();
    loop {
        skip_space(input);
        if let Some(rest) = input.strip_prefix("/>") {
            *input = rest;
            return Ok(StartTag {
                name,
                attrs,
                self_closing: true,
            });
        }
        if let Some(rest) = input.strip_prefix('>') {
            *input = rest;
            return Ok(StartTag {
                name,
                attrs,
                self_closing: false,
            });
        }
        attrs.push(parse_attribute.parse_next(input)?);
    }
}

fn parse_end_tag<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let name = preceded("</", parse_name).parse_next(input)?;
    skip_space(input);
    '>'.parse_next(input)?;
    Ok(name)
}

fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

// ─── Attributes ──────────────────────────────────────────────────────────

struct Attributes<'a> {
    attrs: Vec<(&'a str, Cow<'a, str>)>,
    /// Declarations from the `style` attribute; these win over attributes.
    style: Vec<(String, String)>,
}

impl<'a> Attributes<'a> {
    fn new(raw: &[(&'a str, &'a str)]) -> Self {
        let attrs: Vec<(&'a str, Cow<'a, str>)> = raw
            .iter()
            .map(|(k, v)| (*k, decode_entities(*v)))
            .collect();
        let style = attrs
            .iter()
            .find(|(k, _)| *k == "style")
            .map(|(_, css)| {
                css.split(';')
                    .filter_map(|decl| decl.split_once(':'))
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                    .collect()
            })
            .unwrap_or_default();
        Self { attrs, style }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .or_else(|| {
                self.attrs
                    .iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| v.as_ref())
            })
    }

    fn number(&self, name: &str, default: f64) -> Result<f64, ImportError> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => parse_length(name, value),
        }
    }

    fn transform(&self) -> Result<Affine, ImportError> {
        match self.get("transform") {
            None => Ok(Affine::IDENTITY),
            Some(value) => parse_transform(value),
        }
    }
}

fn parse_length(attr: &str, value: &str) -> Result<f64, ImportError> {
    let trimmed = value.trim();
    trimmed
        .strip_suffix("px")
        .unwrap_or(trimmed)
        .trim_end()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ImportError::InvalidNumber {
            attr: attr.to_string(),
            value: value.to_string(),
        })
}

/// `Some(paint)` when the value sets a paint, `None` to keep the inherited one.
fn parse_paint(value: &str) -> Option<Option<Color>> {
    match value.trim() {
        "none" => Some(None),
        "inherit" => None,
        v => match Color::parse(v) {
            Ok(color) => Some(Some(color)),
            Err(e) => {
                log::warn!("ignoring unsupported paint: {e}");
                None
            }
        },
    }
}

fn parse_transform(value: &str) -> Result<Affine, ImportError> {
    let invalid = || ImportError::InvalidNumber {
        attr: "transform".to_string(),
        value: value.to_string(),
    };
    let mut input = value;
    let mut affine = Affine::IDENTITY;
    loop {
        skip_separators(&mut input);
        if input.is_empty() {
            return Ok(affine);
        }
        let (name, args) = parse_transform_fn
            .parse_next(&mut input)
            .map_err(|_| invalid())?;
        affine = affine * transform_fn(name, &args).ok_or_else(invalid)?;
    }
}

fn parse_transform_fn<'a>(input: &mut &'a str) -> ModalResult<(&'a str, SmallVec<[f64; 6]>)> {
    let name = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)?;
    skip_space(input);
    '('.parse_next(input)?;
    let mut args = SmallVec::new();
    loop {
        skip_separators(input);
        if let Some(rest) = input.strip_prefix(')') {
            *input = rest;
            return Ok((name, args));
        }
        let value: f64 = float.parse_next(input)?;
        args.push(value);
    }
}

fn transform_fn(name: &str, args: &[f64]) -> Option<Affine> {
    match (name, args) {
        ("translate", [tx]) => Some(Affine::translate((*tx, 0.0))),
        ("translate", [tx, ty]) => Some(Affine::translate((*tx, *ty))),
        ("scale", [s]) => Some(Affine::scale(*s)),
        ("scale", [sx, sy]) => Some(Affine::scale_non_uniform(*sx, *sy)),
        ("rotate", [deg]) => Some(Affine::rotate(deg.to_radians())),
        ("rotate", [deg, cx, cy]) => {
            let c = Vec2::new(*cx, *cy);
            Some(Affine::translate(c) * Affine::rotate(deg.to_radians()) * Affine::translate(-c))
        }
        ("skewX", [deg]) => Some(Affine::skew(deg.to_radians().tan(), 0.0)),
        ("skewY", [deg]) => Some(Affine::skew(0.0, deg.to_radians().tan())),
        ("matrix", [a, b, c, d, e, f]) => Some(Affine::new([*a, *b, *c, *d, *e, *f])),
        _ => None,
    }
}

// ─── Tree building ───────────────────────────────────────────────────────

/// Inherited presentation attributes.
#[derive(Debug, Clone)]
struct Presentation {
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: f64,
    fill_opacity: f64,
    stroke_opacity: f64,
    font_size: f64,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            fill: Some(Color::BLACK),
            stroke: None,
            stroke_width: 1.0,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            font_size: 16.0,
        }
    }
}

impl Presentation {
    fn apply(&mut self, attrs: &Attributes<'_>) -> Result<(), ImportError> {
        if let Some(paint) = attrs.get("fill").and_then(parse_paint) {
            self.fill = paint;
        }
        if let Some(paint) = attrs.get("stroke").and_then(parse_paint) {
            self.stroke = paint;
        }
        self.stroke_width = attrs.number("stroke-width", self.stroke_width)?;
        self.fill_opacity = attrs.number("fill-opacity", self.fill_opacity)?;
        self.stroke_opacity = attrs.number("stroke-opacity", self.stroke_opacity)?;
        self.font_size = attrs.number("font-size", self.font_size)?;
        Ok(())
    }

    fn style(&self, opacity: f64, ctm: Affine) -> Style {
        let fade = |color: Color, alpha: f64| color.with_alpha(color.a * alpha.clamp(0.0, 1.0) as f32);
        Style {
            fill: self.fill.map(|c| fade(c, self.fill_opacity)),
            stroke: self.stroke.map(|c| fade(c, self.stroke_opacity)),
            stroke_width: self.stroke_width * ctm.determinant().abs().sqrt(),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug)]
struct PendingText {
    parent: NodeIndex,
    name: Option<String>,
    style: Style,
    origin: Point,
    font_size: f64,
    ctm: Affine,
    content: String,
}

#[derive(Debug)]
struct Frame<'a> {
    tag: &'a str,
    pres: Presentation,
    ctm: Affine,
    /// Where child elements are inserted; `None` skips the subtree.
    container: Option<NodeIndex>,
    text: Option<PendingText>,
}

impl<'a> Frame<'a> {
    fn skipped(tag: &'a str) -> Self {
        Self {
            tag,
            pres: Presentation::default(),
            ctm: Affine::IDENTITY,
            container: None,
            text: None,
        }
    }
}

struct Importer<'a> {
    graph: SceneGraph,
    stack: Vec<Frame<'a>>,
    root_seen: bool,
}

impl<'a> Importer<'a> {
    fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            stack: Vec::new(),
            root_seen: false,
        }
    }

    fn open(&mut self, tag: StartTag<'a>, at: usize) -> Result<(), ImportError> {
        let attrs = Attributes::new(&tag.attrs);

        let Some(parent) = self.stack.last() else {
            if self.root_seen {
                return Err(syntax(at, "content after the root element"));
            }
            if tag.name != "svg" {
                return Err(ImportError::MissingRoot);
            }
            self.root_seen = true;
            let mut pres = Presentation::default();
            pres.apply(&attrs)?;
            let frame = Frame {
                tag: tag.name,
                pres,
                ctm: view_box_origin(&attrs)?,
                container: Some(self.graph.root),
                text: None,
            };
            self.push(frame, tag.self_closing);
            return Ok(());
        };

        let Some(container) = parent.container else {
            let frame = Frame::skipped(tag.name);
            self.push(frame, tag.self_closing);
            return Ok(());
        };

        let mut pres = parent.pres.clone();
        pres.apply(&attrs)?;
        let ctm = parent.ctm * attrs.transform()?;
        let style = pres.style(attrs.number("opacity", 1.0)?, ctm);
        let name = attrs.get("id").map(str::to_string);

        let kind = match tag.name {
            "svg" | "g" | "a" => {
                let mut group = SceneNode::new(NodeId::anonymous(), NodeKind::Group).with_style(Style {
                    fill: None,
                    stroke: None,
                    ..style
                });
                group.name = name;
                let idx = self.graph.add_node(container, group);
                let frame = Frame {
                    tag: tag.name,
                    pres,
                    ctm,
                    container: Some(idx),
                    text: None,
                };
                self.push(frame, tag.self_closing);
                return Ok(());
            }
            "text" => {
                let text = PendingText {
                    parent: container,
                    name,
                    style: Style {
                        stroke: None,
                        ..style
                    },
                    origin: Point::new(attrs.number("x", 0.0)?, attrs.number("y", 0.0)?),
                    font_size: pres.font_size,
                    ctm,
                    content: String::new(),
                };
                let frame = Frame {
                    tag: tag.name,
                    pres,
                    ctm,
                    container: None,
                    text: Some(text),
                };
                self.push(frame, tag.self_closing);
                return Ok(());
            }
            "rect" => {
                let x = attrs.number("x", 0.0)?;
                let y = attrs.number("y", 0.0)?;
                let w = attrs.number("width", 0.0)?;
                let h = attrs.number("height", 0.0)?;
                let rx = attrs.number("rx", 0.0)?;
                let ry = attrs.number("ry", rx)?;
                let radius = if rx > 0.0 { rx } else { ry.max(0.0) };
                Some(NodeKind::Rect {
                    rect: Rect::new(x, y, x + w, y + h),
                    radius,
                })
            }
            "circle" => {
                let r = attrs.number("r", 0.0)?;
                Some(NodeKind::Ellipse {
                    center: Point::new(attrs.number("cx", 0.0)?, attrs.number("cy", 0.0)?),
                    radii: Vec2::new(r, r),
                })
            }
            "ellipse" => Some(NodeKind::Ellipse {
                center: Point::new(attrs.number("cx", 0.0)?, attrs.number("cy", 0.0)?),
                radii: Vec2::new(attrs.number("rx", 0.0)?, attrs.number("ry", 0.0)?),
            }),
            "line" => {
                let from = Point::new(attrs.number("x1", 0.0)?, attrs.number("y1", 0.0)?);
                let to = Point::new(attrs.number("x2", 0.0)?, attrs.number("y2", 0.0)?);
                Some(NodeKind::Path {
                    path: polyline(&[from, to], false),
                })
            }
            "polyline" | "polygon" => {
                let raw = attrs.get("points").unwrap_or_default();
                let points = parse_points(raw).ok_or_else(|| ImportError::InvalidNumber {
                    attr: "points".to_string(),
                    value: raw.to_string(),
                })?;
                (!points.is_empty()).then(|| NodeKind::Path {
                    path: polyline(&points, tag.name == "polygon"),
                })
            }
            "path" => {
                let d = attrs.get("d").unwrap_or_default();
                let path = BezPath::from_svg(d).map_err(|e| ImportError::InvalidPath(e.to_string()))?;
                (!path.elements().is_empty()).then_some(NodeKind::Path { path })
            }
            other => {
                if !SKIPPED.contains(&other) {
                    log::debug!("skipping unsupported <{other}>");
                }
                None
            }
        };

        if let Some(mut kind) = kind {
            if ctm != Affine::IDENTITY {
                kind.apply_affine(ctm);
            }
            let mut node = SceneNode::new(NodeId::anonymous(), kind).with_style(style);
            node.name = name;
            self.graph.add_node(container, node);
        }

        let mut frame = Frame::skipped(tag.name);
        frame.pres = pres;
        self.push(frame, tag.self_closing);
        Ok(())
    }

    fn push(&mut self, frame: Frame<'a>, self_closing: bool) {
        if self_closing {
            self.complete(frame);
        } else {
            self.stack.push(frame);
        }
    }

    fn close(&mut self, name: &str, at: usize) -> Result<(), ImportError> {
        let Some(frame) = self.stack.pop() else {
            return Err(syntax(at, format!("unexpected </{name}>")));
        };
        if frame.tag != name {
            return Err(ImportError::UnbalancedTag {
                expected: frame.tag.to_string(),
                found: format!("</{name}>"),
            });
        }
        self.complete(frame);
        Ok(())
    }

    fn complete(&mut self, frame: Frame<'a>) {
        let Some(text) = frame.text else {
            return;
        };
        if text.content.is_empty() {
            return;
        }
        let mut kind = NodeKind::Text {
            origin: text.origin,
            content: text.content,
            font_size: text.font_size,
        };
        if text.ctm != Affine::IDENTITY {
            kind.apply_affine(text.ctm);
        }
        let mut node = SceneNode::new(NodeId::anonymous(), kind).with_style(text.style);
        node.name = text.name;
        self.graph.add_node(text.parent, node);
    }

    fn text(&mut self, raw: &str, at: usize) -> Result<(), ImportError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        if self.stack.is_empty() {
            return Err(if self.root_seen {
                syntax(at, "text after the root element")
            } else {
                ImportError::MissingRoot
            });
        }
        let owner = self
            .stack
            .iter_mut()
            .rev()
            .find(|f| f.tag != "tspan")
            .and_then(|f| f.text.as_mut());
        if let Some(text) = owner {
            if !text.content.is_empty() {
                text.content.push(' ');
            }
            text.content.push_str(&decode_entities(trimmed));
        }
        Ok(())
    }

    fn finish(self) -> Result<SceneGraph, ImportError> {
        if let Some(open) = self.stack.last() {
            return Err(ImportError::UnbalancedTag {
                expected: open.tag.to_string(),
                found: "end of input".to_string(),
            });
        }
        if !self.root_seen {
            return Err(ImportError::MissingRoot);
        }
        Ok(self.graph)
    }
}

/// Content is placed relative to the `viewBox` origin.
fn view_box_origin(attrs: &Attributes<'_>) -> Result<Affine, ImportError> {
    let Some(raw) = attrs.get("viewBox") else {
        return Ok(Affine::IDENTITY);
    };
    let nums = parse_points(raw).ok_or_else(|| ImportError::InvalidNumber {
        attr: "viewBox".to_string(),
        value: raw.to_string(),
    })?;
    Ok(match nums.first() {
        Some(origin) => Affine::translate(-origin.to_vec2()),
        None => Affine::IDENTITY,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn only_item(graph: &SceneGraph) -> &SceneNode {
        let top = graph.children(graph.root);
        assert_eq!(top.len(), 1);
        &graph.graph[top[0]]
    }

    #[test]
    fn imports_rect_with_fill() {
        let g = import_svg(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
                  <rect id="card" x="10" y="20" width="100" height="50" fill="#e0e0e0"/>
                </svg>"##,
        )
        .unwrap();
        let node = only_item(&g);
        assert_eq!(node.name.as_deref(), Some("card"));
        assert_eq!(
            node.kind,
            NodeKind::Rect {
                rect: Rect::new(10.0, 20.0, 110.0, 70.0),
                radius: 0.0,
            }
        );
        assert_eq!(node.style.fill.map(|c| c.to_hex()), Some("#e0e0e0".to_string()));
        assert_eq!(node.style.stroke, None);
    }

    #[test]
    fn shapes_default_to_black_fill() {
        let g = import_svg(r#"<svg><circle cx="5" cy="5" r="2"/></svg>"#).unwrap();
        assert_eq!(only_item(&g).style.fill, Some(Color::BLACK));
    }

    #[test]
    fn group_transform_and_paint_are_inherited() {
        let g = import_svg(
            r#"<svg>
                 <g transform="translate(10, 20) scale(2)" stroke="blue" fill="none">
                   <rect width="5" height="5" stroke-width="1"/>
                 </g>
               </svg>"#,
        )
        .unwrap();
        let group = g.children(g.root)[0];
        let rect = &g.graph[g.children(group)[0]];
        assert_eq!(
            rect.kind,
            NodeKind::Rect {
                rect: Rect::new(10.0, 20.0, 20.0, 30.0),
                radius: 0.0,
            }
        );
        assert_eq!(rect.style.fill, None);
        assert_eq!(rect.style.stroke.map(|c| c.to_hex()), Some("#0000ff".to_string()));
        assert_eq!(rect.style.stroke_width, 2.0);
    }

    #[test]
    fn style_attribute_overrides_presentation() {
        let g = import_svg(
            r#"<svg><rect width="1" height="1" fill="red" style="fill: #00ff00; fill-opacity: 0.5"/></svg>"#,
        )
        .unwrap();
        let fill = only_item(&g).style.fill.unwrap();
        assert_eq!(fill.to_hex(), "#00ff00");
        assert!((fill.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn skips_prolog_comments_and_defs() {
        let g = import_svg(
            r#"<?xml version="1.0"?>
               <!DOCTYPE svg>
               <!-- exported -->
               <svg>
                 <defs><linearGradient id="g1"><stop offset="0"/></linearGradient></defs>
                 <title>Drawing</title>
                 <path d="M0 0 L10 0 L10 10 Z"/>
               </svg>"#,
        )
        .unwrap();
        assert!(matches!(only_item(&g).kind, NodeKind::Path { .. }));
    }

    #[test]
    fn text_content_and_entities() {
        let g = import_svg(r#"<svg><text x="5" y="30" font-size="12">Fish &amp; <tspan>Chips</tspan></text></svg>"#)
            .unwrap();
        match &only_item(&g).kind {
            NodeKind::Text {
                origin,
                content,
                font_size,
            } => {
                assert_eq!(*origin, Point::new(5.0, 30.0));
                assert_eq!(content, "Fish & Chips");
                assert_eq!(*font_size, 12.0);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn nested_tspans_join_the_text() {
        let g = import_svg(
            r#"<svg><text>One <tspan>two <tspan>three</tspan></tspan></text></svg>"#,
        )
        .unwrap();
        match &only_item(&g).kind {
            NodeKind::Text { content, .. } => assert_eq!(content, "One two three"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn polygon_is_closed_path() {
        let g = import_svg(r#"<svg><polygon points="0,0 10,0 10,10"/></svg>"#).unwrap();
        match &only_item(&g).kind {
            NodeKind::Path { path } => {
                assert_eq!(path.elements().last(), Some(&kurbo::PathEl::ClosePath));
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn rejects_documents_without_svg_root() {
        assert_eq!(import_svg("").unwrap_err(), ImportError::MissingRoot);
        assert_eq!(import_svg("<html></html>").unwrap_err(), ImportError::MissingRoot);
        assert_eq!(import_svg("just words").unwrap_err(), ImportError::MissingRoot);
    }

    #[test]
    fn rejects_unbalanced_tags() {
        assert_eq!(
            import_svg("<svg><g></svg>").unwrap_err(),
            ImportError::UnbalancedTag {
                expected: "g".to_string(),
                found: "</svg>".to_string(),
            }
        );
        assert!(matches!(
            import_svg("<svg><g>").unwrap_err(),
            ImportError::UnbalancedTag { .. }
        ));
    }

    #[test]
    fn rejects_malformed_numbers_and_paths() {
        assert_eq!(
            import_svg(r#"<svg><rect width="wide" height="1"/></svg>"#).unwrap_err(),
            ImportError::InvalidNumber {
                attr: "width".to_string(),
                value: "wide".to_string(),
            }
        );
        assert!(matches!(
            import_svg(r#"<svg><path d="M 0 0 X 5"/></svg>"#).unwrap_err(),
            ImportError::InvalidPath(_)
        ));
        assert!(matches!(
            import_svg(r#"<svg><rect transform="spin(3)"/></svg>"#).unwrap_err(),
            ImportError::InvalidNumber { .. }
        ));
    }

    #[test]
    fn rejects_broken_markup() {
        assert!(matches!(
            import_svg(r#"<svg><rect width="1></svg>"#).unwrap_err(),
            ImportError::Syntax { .. }
        ));
        assert!(matches!(
            import_svg("<svg></svg><svg></svg>").unwrap_err(),
            ImportError::Syntax { .. }
        ));
    }

    #[test]
    fn transform_list() {
        let a = parse_transform("translate(5) rotate(90, 1 1)").unwrap();
        let p = a * Point::new(2.0, 1.0);
        assert!((p.x - 6.0).abs() < 1e-9 && (p.y - 2.0).abs() < 1e-9);
        assert_eq!(
            parse_transform("matrix(1 0 0 1 3 4)").unwrap(),
            Affine::translate((3.0, 4.0))
        );
    }
}
