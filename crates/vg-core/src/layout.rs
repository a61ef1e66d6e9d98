//! Viewport geometry: the canvas size, the zoom/pan view transform, fitting
//! imported content into the canvas, and the background grid.

use crate::id::NodeId;
use crate::model::{Color, NodeKind, SceneGraph, SceneNode, Style};
use kurbo::{Affine, BezPath, Point, Vec2};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Imported content larger than this share of the canvas is scaled down.
pub const FIT_RATIO: f64 = 0.8;

/// Canvas size in view units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Maps view coordinates (what the pointer reports) to scene coordinates.
///
/// `view = scene * zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f64,
    pub offset: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn to_scene(&self, view: Point) -> Point {
        ((view.to_vec2() - self.offset) / self.zoom).to_point()
    }

    pub fn to_view(&self, scene: Point) -> Point {
        (scene.to_vec2() * self.zoom + self.offset).to_point()
    }

    /// Multiply the zoom by `factor`, keeping the scene point under `anchor`
    /// (in view coordinates) fixed.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let a = anchor.to_vec2();
        self.offset = a - (a - self.offset) * factor;
        self.zoom *= factor;
    }

    /// Shift the view by a delta in view units.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn as_affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }
}

/// Scale the unlocked top-level items down (never up) so they fit within
/// [`FIT_RATIO`] of the viewport, then center them. Returns the transform
/// that was applied, if any.
pub fn fit_to_viewport(graph: &mut SceneGraph, viewport: Viewport) -> Option<Affine> {
    let bounds = graph.content_bounds()?;
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return None;
    }

    let scale = (viewport.width / bounds.width() * FIT_RATIO)
        .min(viewport.height / bounds.height() * FIT_RATIO)
        .min(1.0);
    let scaled_center = bounds.center().to_vec2() * scale;
    let affine = Affine::translate(viewport.center().to_vec2() - scaled_center) * Affine::scale(scale);

    let items: Vec<NodeIndex> = graph
        .children(graph.root)
        .iter()
        .copied()
        .filter(|idx| !graph.graph[*idx].locked)
        .collect();
    for idx in items {
        graph.transform_subtree(idx, affine);
    }
    log::debug!("fit content {bounds:?} with scale {scale:.3}");
    Some(affine)
}

/// Add a locked background grid named `name` behind all other items.
pub fn insert_grid(graph: &mut SceneGraph, viewport: Viewport, name: &str, spacing: f64) -> NodeIndex {
    let line_color = Color::rgba(0.0, 0.0, 0.0, 0.1);
    let mut group = SceneNode::new(NodeId::anonymous(), NodeKind::Group).with_name(name);
    group.locked = true;
    let root = graph.root;
    let grid = graph.insert_node(root, 0, group);

    if !(spacing.is_finite() && spacing > 0.0) {
        return grid;
    }

    let add_line = |graph: &mut SceneGraph, from: Point, to: Point, major: bool| {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        let mut line = SceneNode::new(NodeId::anonymous(), NodeKind::Path { path })
            .with_style(Style {
                fill: None,
                stroke: Some(line_color),
                stroke_width: if major { 0.8 } else { 0.3 },
                opacity: 1.0,
            });
        line.locked = true;
        graph.add_node(grid, line);
    };

    let mut step = 0u32;
    while f64::from(step) * spacing <= viewport.width {
        let x = f64::from(step) * spacing;
        add_line(graph, Point::new(x, 0.0), Point::new(x, viewport.height), step % 5 == 0);
        step += 1;
    }
    step = 0;
    while f64::from(step) * spacing <= viewport.height {
        let y = f64::from(step) * spacing;
        add_line(graph, Point::new(0.0, y), Point::new(viewport.width, y), step % 5 == 0);
        step += 1;
    }
    grid
}
