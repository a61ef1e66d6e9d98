//! Core scene-graph data model for VG documents.
//!
//! The document is a tree stored in a `StableDiGraph`: nodes are drawable
//! items (shapes, paths, text, groups) and edges go parent → child. Child
//! order is paint order: the last child is drawn on top. Geometry is kept in
//! absolute scene coordinates as kurbo primitives; transforms from imported
//! SVG are baked in at load time.

use crate::id::NodeId;
use kurbo::{Affine, BezPath, Ellipse, PathEl, Point, Rect, RoundedRect, Shape, Vec2};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;

/// Flattening tolerance used when shapes are converted to paths.
pub const PATH_TOLERANCE: f64 = 0.1;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("malformed color: {0:?}")]
    Malformed(String),
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let mut ch = [255u8; 4];
                for (slot, &b) in ch.iter_mut().zip(bytes) {
                    *slot = hex_val(b)? * 17;
                }
                Some(Self::rgba(
                    ch[0] as f32 / 255.0,
                    ch[1] as f32 / 255.0,
                    ch[2] as f32 / 255.0,
                    ch[3] as f32 / 255.0,
                ))
            }
            6 | 8 => {
                let mut ch = [255u8; 4];
                for (slot, pair) in ch.iter_mut().zip(bytes.chunks(2)) {
                    *slot = hex_val(pair[0])? << 4 | hex_val(pair[1])?;
                }
                Some(Self::rgba(
                    ch[0] as f32 / 255.0,
                    ch[1] as f32 / 255.0,
                    ch[2] as f32 / 255.0,
                    ch[3] as f32 / 255.0,
                ))
            }
            _ => None,
        }
    }

    /// Parse any color notation the editor accepts from the host or from SVG:
    /// hex, `rgb()`, `rgba()`, and a handful of CSS names.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let malformed = || ColorError::Malformed(input.to_string());
        let s = input.trim();
        if s.starts_with('#') {
            return Self::from_hex(s).ok_or_else(malformed);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args, true).ok_or_else(malformed);
        }
        if let Some(args) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args, false).ok_or_else(malformed);
        }

        match lower.as_str() {
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "red" => Ok(Self::rgb8(255, 0, 0)),
            "green" => Ok(Self::rgb8(0, 128, 0)),
            "blue" => Ok(Self::rgb8(0, 0, 255)),
            "gray" | "grey" => Ok(Self::rgb8(128, 128, 128)),
            "transparent" => Ok(Self::rgba(0.0, 0.0, 0.0, 0.0)),
            _ => Err(malformed()),
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Emit as lowercase `#rrggbb`. Alpha is dropped; SVG output carries it
    /// separately as `fill-opacity` / `stroke-opacity`.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

fn parse_rgb_args(args: &str, with_alpha: bool) -> Option<Color> {
    let parts: SmallVec<[&str; 4]> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let mut ch = [1.0f32; 4];
    for (i, part) in parts.iter().enumerate() {
        let value = if i == 3 {
            part.parse::<f32>().ok()?
        } else if let Some(pct) = part.strip_suffix('%') {
            pct.trim().parse::<f32>().ok()? / 100.0
        } else {
            part.parse::<f32>().ok()? / 255.0
        };
        if !value.is_finite() {
            return None;
        }
        ch[i] = value.clamp(0.0, 1.0);
    }
    Some(Color::rgba(ch[0], ch[1], ch[2], ch[3]))
}

// ─── Styling ─────────────────────────────────────────────────────────────

/// Paint attributes of a single item.
///
/// Fill and stroke opacity live in the colors' alpha; `opacity` is the
/// item-level opacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// The type of a scene item, with its geometry in scene coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// The implicit document root. Never exported, hit or selected.
    Root,

    /// Container for other items; has no geometry of its own.
    Group,

    /// Axis-aligned rectangle with optional corner radius.
    Rect { rect: Rect, radius: f64 },

    /// Axis-aligned ellipse; a circle when both radii match.
    Ellipse { center: Point, radii: Vec2 },

    /// Free path (drawn with path/pen/brush tools or imported).
    Path { path: BezPath },

    /// Point text. `origin` is the left end of the baseline.
    Text {
        origin: Point,
        content: String,
        font_size: f64,
    },
}

impl NodeKind {
    /// Short type name reported to the host.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Group => "group",
            NodeKind::Rect { .. } => "rect",
            NodeKind::Ellipse { .. } => "ellipse",
            NodeKind::Path { .. } => "path",
            NodeKind::Text { .. } => "text",
        }
    }

    /// Outline as a path, for shapes that have one.
    pub fn outline(&self) -> Option<BezPath> {
        match self {
            NodeKind::Rect { rect, radius } if *radius > 0.0 => {
                Some(RoundedRect::from_rect(*rect, *radius).to_path(PATH_TOLERANCE))
            }
            NodeKind::Rect { rect, .. } => Some(rect.to_path(PATH_TOLERANCE)),
            NodeKind::Ellipse { center, radii } => {
                Some(Ellipse::new(*center, *radii, 0.0).to_path(PATH_TOLERANCE))
            }
            NodeKind::Path { path } => Some(path.clone()),
            NodeKind::Root | NodeKind::Group | NodeKind::Text { .. } => None,
        }
    }

    /// Own bounding box. Groups have none; their bounds come from children.
    pub fn bounding_box(&self) -> Option<Rect> {
        match self {
            NodeKind::Rect { rect, .. } => Some(rect.abs()),
            NodeKind::Ellipse { center, radii } => Some(Rect::from_center_size(
                *center,
                (radii.x.abs() * 2.0, radii.y.abs() * 2.0),
            )),
            NodeKind::Path { path } => {
                if path.elements().is_empty() {
                    None
                } else {
                    Some(path.bounding_box())
                }
            }
            NodeKind::Text {
                origin,
                content,
                font_size,
            } => {
                // No font metrics here; approximate with an average glyph advance.
                let width = content.chars().count() as f64 * font_size * 0.6;
                Some(Rect::new(
                    origin.x,
                    origin.y - font_size * 0.8,
                    origin.x + width,
                    origin.y + font_size * 0.2,
                ))
            }
            NodeKind::Root | NodeKind::Group => None,
        }
    }

    /// Anchor points, used for segment hit-testing.
    pub fn anchors(&self) -> SmallVec<[Point; 8]> {
        match self {
            NodeKind::Rect { rect, .. } => SmallVec::from_slice(&[
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x1, rect.y1),
                Point::new(rect.x0, rect.y1),
            ]),
            NodeKind::Ellipse { center, radii } => SmallVec::from_slice(&[
                *center + Vec2::new(radii.x, 0.0),
                *center + Vec2::new(0.0, radii.y),
                *center - Vec2::new(radii.x, 0.0),
                *center - Vec2::new(0.0, radii.y),
            ]),
            NodeKind::Path { path } => path
                .elements()
                .iter()
                .filter_map(|el| match el {
                    PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(*p),
                    PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => Some(*p),
                    PathEl::ClosePath => None,
                })
                .collect(),
            NodeKind::Root | NodeKind::Group | NodeKind::Text { .. } => SmallVec::new(),
        }
    }

    /// Bake an affine transform into the geometry.
    ///
    /// Rectangles and ellipses stay primitive under scale + translate; any
    /// rotation or skew turns them into paths.
    pub fn apply_affine(&mut self, affine: Affine) {
        let [a, b, c, d, _, _] = affine.as_coeffs();
        let axis_aligned = b == 0.0 && c == 0.0;
        match self {
            NodeKind::Rect { rect, radius } if axis_aligned => {
                *rect = affine.transform_rect_bbox(*rect);
                *radius *= a.abs().min(d.abs());
            }
            NodeKind::Ellipse { center, radii } if axis_aligned => {
                *center = affine * *center;
                *radii = Vec2::new(radii.x * a.abs(), radii.y * d.abs());
            }
            NodeKind::Path { path } => path.apply_affine(affine),
            NodeKind::Text {
                origin, font_size, ..
            } => {
                *origin = affine * *origin;
                *font_size *= affine.determinant().abs().sqrt();
            }
            NodeKind::Rect { .. } | NodeKind::Ellipse { .. } => {
                if let Some(mut path) = self.outline() {
                    path.apply_affine(affine);
                    *self = NodeKind::Path { path };
                }
            }
            NodeKind::Root | NodeKind::Group => {}
        }
    }
}

/// A single item in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Unique handle. Anonymous for items without an explicit name.
    pub id: NodeId,

    /// Explicit identifier (SVG `id`, or the name generated when a drawing
    /// gesture finishes).
    pub name: Option<String>,

    pub kind: NodeKind,

    pub style: Style,

    /// Helper items (the background grid) are locked: never hit, never
    /// selected, never exported.
    pub locked: bool,

    /// Visual selection flag. Owned by the selection set, so it is not
    /// part of snapshots.
    #[serde(skip)]
    pub selected: bool,
}

impl SceneNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            name: None,
            kind,
            style: Style::default(),
            locked: false,
            selected: false,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// ─── Scene Graph ─────────────────────────────────────────────────────────

/// The complete document: a tree of `SceneNode` values under a root.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    /// The underlying directed graph (edges go parent → child).
    pub graph: StableDiGraph<SceneNode, ()>,

    /// The root node index.
    pub root: NodeIndex,

    /// Index from NodeId → NodeIndex for fast lookup.
    pub id_index: HashMap<NodeId, NodeIndex>,

    /// Paint order of each parent's children (back to front).
    child_order: HashMap<NodeIndex, Vec<NodeIndex>>,
}

impl SceneGraph {
    /// Create a new empty scene graph with a root node.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root_id = NodeId::intern("root");
        let root = graph.add_node(SceneNode::new(root_id, NodeKind::Root));

        let mut id_index = HashMap::new();
        id_index.insert(root_id, root);

        Self {
            graph,
            root,
            id_index,
            child_order: HashMap::new(),
        }
    }

    /// Add a node as the topmost child of `parent`. Returns the new node's index.
    pub fn add_node(&mut self, parent: NodeIndex, node: SceneNode) -> NodeIndex {
        let len = self.children(parent).len();
        self.insert_node(parent, len, node)
    }

    /// Insert a node at `position` in `parent`'s paint order (0 = back).
    pub fn insert_node(&mut self, parent: NodeIndex, position: usize, node: SceneNode) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        let order = self.child_order.entry(parent).or_default();
        order.insert(position.min(order.len()), idx);
        idx
    }

    /// Remove a node and its whole subtree, keeping indices synchronized.
    pub fn remove_node(&mut self, idx: NodeIndex) -> Option<SceneNode> {
        if idx == self.root {
            return None;
        }
        for child in self.children(idx).to_vec() {
            self.remove_node(child);
        }
        if let Some(parent) = self.parent(idx)
            && let Some(order) = self.child_order.get_mut(&parent)
        {
            order.retain(|c| *c != idx);
        }
        self.child_order.remove(&idx);
        let removed = self.graph.remove_node(idx);
        if let Some(node) = &removed {
            self.id_index.remove(&node.id);
        }
        removed
    }

    /// Copy the subtree at `idx` of `source` under `parent` as its topmost child.
    pub fn graft(&mut self, parent: NodeIndex, source: &SceneGraph, idx: NodeIndex) -> NodeIndex {
        let copy = self.add_node(parent, source.graph[idx].clone());
        for child in source.children(idx) {
            self.graft(copy, source, *child);
        }
        copy
    }

    /// Remove every top-level item for which `discard` returns true.
    pub fn remove_top_level_where(&mut self, discard: impl Fn(&SceneNode) -> bool) -> usize {
        let doomed: Vec<NodeIndex> = self
            .children(self.root)
            .iter()
            .copied()
            .filter(|idx| discard(&self.graph[*idx]))
            .collect();
        for idx in &doomed {
            self.remove_node(*idx);
        }
        doomed.len()
    }

    /// Look up a node by its ID.
    pub fn get_by_id(&self, id: NodeId) -> Option<&SceneNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Look up a node mutably by its ID.
    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Get the index for a NodeId.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Find an item by its explicit name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|idx| self.graph[*idx].name.as_deref() == Some(name))
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Children of a node in paint order (back to front).
    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.child_order
            .get(&idx)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of items, not counting the root.
    pub fn item_count(&self) -> usize {
        self.graph.node_count() - 1
    }

    /// The ancestor of `idx` that sits directly under the root.
    pub fn top_level_ancestor(&self, idx: NodeIndex) -> NodeIndex {
        let mut current = idx;
        while let Some(parent) = self.parent(current) {
            if parent == self.root {
                break;
            }
            current = parent;
        }
        current
    }

    /// Move a node to the back of its parent's paint order.
    /// Returns true if the order changed.
    pub fn send_to_back(&mut self, idx: NodeIndex) -> bool {
        let Some(parent) = self.parent(idx) else {
            return false;
        };
        let Some(order) = self.child_order.get_mut(&parent) else {
            return false;
        };
        match order.iter().position(|c| *c == idx) {
            Some(0) | None => false,
            Some(pos) => {
                let child = order.remove(pos);
                order.insert(0, child);
                true
            }
        }
    }

    /// Bounding box of a node; groups take the union of their children.
    pub fn bounds(&self, idx: NodeIndex) -> Option<Rect> {
        let node = self.graph.node_weight(idx)?;
        match node.kind {
            NodeKind::Group | NodeKind::Root => self
                .children(idx)
                .iter()
                .filter_map(|child| self.bounds(*child))
                .reduce(|acc, r| acc.union(r)),
            _ => node.kind.bounding_box(),
        }
    }

    /// Bounds of all unlocked top-level items.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.children(self.root)
            .iter()
            .filter(|idx| !self.graph[**idx].locked)
            .filter_map(|idx| self.bounds(*idx))
            .reduce(|acc, r| acc.union(r))
    }

    /// Bake `affine` into a node and all its descendants. Stroke widths scale
    /// with the transform.
    pub fn transform_subtree(&mut self, idx: NodeIndex, affine: Affine) {
        let scale = affine.determinant().abs().sqrt();
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.kind.apply_affine(affine);
            node.style.stroke_width *= scale;
        }
        for child in self.children(idx).to_vec() {
            self.transform_subtree(child, affine);
        }
    }

    /// All nodes except the root, in document (pre-)order.
    pub fn walk(&self) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.item_count());
        let mut stack: Vec<NodeIndex> = self.children(self.root).iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(self.children(idx).iter().rev().copied());
        }
        out
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
