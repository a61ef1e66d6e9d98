//! Hit testing: point → item lookup with a proximity tolerance.
//!
//! Reverse-walks the scene tree (front-to-back) and tests each item's
//! anchors, stroke outline and fill area against a scene-space point.

use kurbo::{BezPath, ParamCurveNearest, PathEl, Point, Shape};
use vg_core::id::NodeId;
use vg_core::model::{NodeKind, SceneGraph, SceneNode};
use vg_core::NodeIndex;

/// Accuracy passed to kurbo's nearest-point solver.
const NEAREST_ACCURACY: f64 = 1e-3;

/// Which parts of an item count as a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOptions {
    pub fill: bool,
    pub stroke: bool,
    pub segments: bool,
    pub tolerance: f64,
}

impl HitOptions {
    /// Fill, stroke and segment hits within `tolerance`.
    pub fn all(tolerance: f64) -> Self {
        Self {
            fill: true,
            stroke: true,
            segments: true,
            tolerance,
        }
    }

    /// Fill and stroke hits only (no anchor points).
    pub fn paint(tolerance: f64) -> Self {
        Self {
            segments: false,
            ..Self::all(tolerance)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Fill,
    Stroke,
    Segment,
}

/// Result of a successful hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// The leaf item under the point.
    pub id: NodeId,
    pub node: NodeIndex,
    /// The leaf's ancestor directly under the root (the leaf itself for
    /// ungrouped items).
    pub top_level: NodeIndex,
    pub kind: HitKind,
}

/// Find the topmost unlocked item at `point`.
/// Returns `None` if nothing is hit (background).
pub fn hit_test(graph: &SceneGraph, point: Point, options: &HitOptions) -> Option<Hit> {
    // Walk children in reverse order (last painted = topmost)
    let hit = graph
        .children(graph.root)
        .iter()
        .rev()
        .find_map(|&top| {
            hit_subtree(graph, top, point, options).map(|(node, kind)| Hit {
                id: graph.graph[node].id,
                node,
                top_level: top,
                kind,
            })
        });
    match &hit {
        Some(h) => log::trace!("hit {:?} {:?} at {point:?}", h.id, h.kind),
        None => log::trace!("no hit at {point:?}"),
    }
    hit
}

fn hit_subtree(
    graph: &SceneGraph,
    idx: NodeIndex,
    point: Point,
    options: &HitOptions,
) -> Option<(NodeIndex, HitKind)> {
    let node = &graph.graph[idx];
    if node.locked {
        return None;
    }

    for &child in graph.children(idx).iter().rev() {
        if let Some(hit) = hit_subtree(graph, child, point, options) {
            return Some(hit);
        }
    }

    hit_node(node, point, options).map(|kind| (idx, kind))
}

fn hit_node(node: &SceneNode, point: Point, options: &HitOptions) -> Option<HitKind> {
    let tolerance = options.tolerance.max(0.0);

    if options.segments
        && node
            .kind
            .anchors()
            .iter()
            .any(|anchor| anchor.distance(point) <= tolerance)
    {
        return Some(HitKind::Segment);
    }

    let outline = node.kind.outline();

    if options.stroke
        && node.style.stroke.is_some()
        && let Some(outline) = &outline
        && distance_to_outline(outline, point) <= tolerance + node.style.stroke_width / 2.0
    {
        return Some(HitKind::Stroke);
    }

    if options.fill && node.style.fill.is_some() {
        let inside = match (&node.kind, &outline) {
            (NodeKind::Text { .. }, _) => node
                .kind
                .bounding_box()
                .is_some_and(|bbox| bbox.contains(point)),
            (_, Some(outline)) => closed(outline).contains(point),
            _ => false,
        };
        if inside {
            return Some(HitKind::Fill);
        }
    }

    None
}

fn distance_to_outline(outline: &BezPath, point: Point) -> f64 {
    outline
        .segments()
        .map(|seg| seg.nearest(point, NEAREST_ACCURACY).distance_sq)
        .fold(f64::INFINITY, f64::min)
        .sqrt()
}

/// Copy of `path` with every open subpath closed, so open paths fill the
/// way they paint.
fn closed(path: &BezPath) -> BezPath {
    let mut out = BezPath::new();
    let mut open = false;
    for el in path.elements() {
        match el {
            PathEl::MoveTo(_) if open => {
                out.close_path();
                out.push(*el);
            }
            PathEl::MoveTo(_) => {
                out.push(*el);
                open = true;
            }
            PathEl::ClosePath => {
                out.close_path();
                open = false;
            }
            _ => out.push(*el),
        }
    }
    if open {
        out.close_path();
    }
    out
}
