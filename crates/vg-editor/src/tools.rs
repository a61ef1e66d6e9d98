//! Tool system for canvas interactions.
//!
//! Each tool translates pointer events into `ToolAction`s that the
//! `Session` applies to the scene. Tools never touch the scene directly;
//! they only keep the gesture state they need (press point, collected
//! points, last pan position).
//!
//! ## Drawing lifecycle
//!
//! | Phase | Rectangle / Circle | Path / Brush | Pen |
//! |-------|--------------------|--------------|-----|
//! | press | `BeginShape` at the press point | `BeginShape` with one point | first click `BeginShape`, later clicks `UpdateShape` |
//! | drag  | `UpdateShape` spanning press → pointer | append point | - |
//! | release | `FinishShape` | smooth, `FinishShape` | none (finished by `finish()` or clicking the first point) |

use crate::config::EditorConfig;
use crate::input::InputEvent;
use crate::style::StyleState;
use vg_core::geometry::{polyline, smooth_points};
use vg_core::kurbo::{Point, Rect, Vec2};
use vg_core::{NodeIndex, NodeKind, Style};
use vg_render::{Hit, HitOptions};

/// The active tool determines how pointer events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Select,
    Rectangle,
    Circle,
    Path,
    Pen,
    Brush,
    Text,
    Eyedropper,
    Fill,
    Eraser,
    Zoom,
    Hand,
}

impl ToolKind {
    pub const ALL: [ToolKind; 12] = [
        ToolKind::Select,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Path,
        ToolKind::Pen,
        ToolKind::Brush,
        ToolKind::Text,
        ToolKind::Eyedropper,
        ToolKind::Fill,
        ToolKind::Eraser,
        ToolKind::Zoom,
        ToolKind::Hand,
    ];

    /// Host-facing name; also the prefix of generated item names.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Path => "path",
            ToolKind::Pen => "pen",
            ToolKind::Brush => "brush",
            ToolKind::Text => "text",
            ToolKind::Eyedropper => "eyedropper",
            ToolKind::Fill => "fill",
            ToolKind::Eraser => "eraser",
            ToolKind::Zoom => "zoom",
            ToolKind::Hand => "hand",
        }
    }

    pub fn parse(name: &str) -> Option<ToolKind> {
        let name = name.trim();
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Unknown names fall back to `Select`.
    pub fn from_name(name: &str) -> ToolKind {
        ToolKind::parse(name).unwrap_or_else(|| {
            log::debug!("unknown tool {name:?}, falling back to select");
            ToolKind::Select
        })
    }

    /// Hit-test options used on press, for tools that target an item.
    pub fn hit_options(self, config: &EditorConfig) -> Option<HitOptions> {
        match self {
            ToolKind::Select => Some(HitOptions::all(config.select_tolerance)),
            ToolKind::Fill | ToolKind::Eraser => Some(HitOptions::paint(config.select_tolerance)),
            ToolKind::Eyedropper => Some(HitOptions::paint(config.pick_tolerance)),
            _ => None,
        }
    }
}

/// What a tool sees besides the event itself.
pub struct ToolContext<'a> {
    /// Hit under the press point (only computed for tools with hit options).
    pub hit: Option<Hit>,
    pub style: &'a StyleState,
    pub config: &'a EditorConfig,
}

/// Scene operations requested by a tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Create the provisional item of a drawing gesture.
    BeginShape { kind: NodeKind, style: Style },
    /// Replace the provisional item's geometry.
    UpdateShape { kind: NodeKind },
    /// Name the provisional item `<prefix>_<timestamp>` and commit it,
    /// optionally with final geometry.
    FinishShape {
        prefix: &'static str,
        kind: Option<NodeKind>,
    },
    /// Remove the provisional item without an undo step.
    DiscardShape,
    /// Add a finished item in one step.
    AddItem {
        prefix: &'static str,
        kind: NodeKind,
        style: Style,
    },
    /// Replace the selection with `target` (clear on `None`), or toggle it.
    Select {
        target: Option<NodeIndex>,
        toggle: bool,
    },
    PickColor { node: NodeIndex },
    Fill { node: NodeIndex },
    Erase { node: NodeIndex },
    Zoom { anchor: Point, factor: f64 },
    Pan { delta: Vec2 },
}

/// Trait for tools that handle input and produce actions.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle a pointer event, returning zero or more actions.
    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction>;

    /// Bring the tool to a terminal state before another tool takes over.
    /// Work that can stand on its own is committed; the rest is discarded.
    fn finish(&mut self) -> Vec<ToolAction> {
        Vec::new()
    }

    /// Abandon any in-progress work.
    fn cancel(&mut self) -> Vec<ToolAction> {
        self.finish()
    }
}

// ─── Select Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SelectTool;

impl SelectTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        match event {
            InputEvent::PointerDown { modifiers, .. } => vec![ToolAction::Select {
                target: ctx.hit.map(|hit| hit.top_level),
                toggle: modifiers.shift,
            }],
            _ => vec![],
        }
    }
}

// ─── Rectangle Tool ──────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RectangleTool {
    start: Option<Point>,
}

impl RectangleTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn shape(from: Point, to: Point) -> NodeKind {
        NodeKind::Rect {
            rect: Rect::from_points(from, to),
            radius: 0.0,
        }
    }
}

impl Tool for RectangleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rectangle
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        match event {
            InputEvent::PointerDown { point, .. } => {
                self.start = Some(*point);
                vec![ToolAction::BeginShape {
                    kind: Self::shape(*point, *point),
                    style: ctx.style.to_style(),
                }]
            }
            InputEvent::PointerMove { point, .. } => match self.start {
                Some(start) => vec![ToolAction::UpdateShape {
                    kind: Self::shape(start, *point),
                }],
                None => vec![],
            },
            InputEvent::PointerUp { .. } => match self.start.take() {
                Some(_) => vec![ToolAction::FinishShape {
                    prefix: ToolKind::Rectangle.name(),
                    kind: None,
                }],
                None => vec![],
            },
        }
    }

    fn finish(&mut self) -> Vec<ToolAction> {
        match self.start.take() {
            Some(_) => vec![ToolAction::DiscardShape],
            None => vec![],
        }
    }
}

// ─── Circle Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct CircleTool {
    center: Option<Point>,
}

impl CircleTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn shape(center: Point, radius: f64) -> NodeKind {
        NodeKind::Ellipse {
            center,
            radii: Vec2::new(radius, radius),
        }
    }
}

impl Tool for CircleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Circle
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        match event {
            InputEvent::PointerDown { point, .. } => {
                self.center = Some(*point);
                vec![ToolAction::BeginShape {
                    kind: Self::shape(*point, 1.0),
                    style: ctx.style.to_style(),
                }]
            }
            InputEvent::PointerMove { point, .. } => match self.center {
                Some(center) => vec![ToolAction::UpdateShape {
                    kind: Self::shape(center, center.distance(*point)),
                }],
                None => vec![],
            },
            InputEvent::PointerUp { .. } => match self.center.take() {
                Some(_) => vec![ToolAction::FinishShape {
                    prefix: ToolKind::Circle.name(),
                    kind: None,
                }],
                None => vec![],
            },
        }
    }

    fn finish(&mut self) -> Vec<ToolAction> {
        match self.center.take() {
            Some(_) => vec![ToolAction::DiscardShape],
            None => vec![],
        }
    }
}

// ─── Freehand (shared by Path and Brush) ─────────────────────────────────

#[derive(Debug, Default)]
struct Freehand {
    points: Vec<Point>,
    drawing: bool,
}

impl Freehand {
    fn press(&mut self, point: Point, style: Style) -> Vec<ToolAction> {
        self.points.clear();
        self.points.push(point);
        self.drawing = true;
        vec![ToolAction::BeginShape {
            kind: NodeKind::Path {
                path: polyline(&self.points, false),
            },
            style,
        }]
    }

    fn drag(&mut self, point: Point, smooth: bool) -> Vec<ToolAction> {
        if !self.drawing {
            return vec![];
        }
        self.points.push(point);
        let path = if smooth {
            smooth_points(&self.points)
        } else {
            polyline(&self.points, false)
        };
        vec![ToolAction::UpdateShape {
            kind: NodeKind::Path { path },
        }]
    }

    fn release(&mut self, prefix: &'static str) -> Vec<ToolAction> {
        if !std::mem::take(&mut self.drawing) {
            return vec![];
        }
        let path = smooth_points(&self.points);
        self.points.clear();
        vec![ToolAction::FinishShape {
            prefix,
            kind: Some(NodeKind::Path { path }),
        }]
    }

    fn abandon(&mut self) -> Vec<ToolAction> {
        self.points.clear();
        if std::mem::take(&mut self.drawing) {
            vec![ToolAction::DiscardShape]
        } else {
            vec![]
        }
    }
}

// ─── Path Tool ───────────────────────────────────────────────────────────

/// Freehand path in the current style, smoothed on release.
#[derive(Debug, Default)]
pub struct PathTool {
    stroke: Freehand,
}

impl PathTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for PathTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Path
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        match event {
            InputEvent::PointerDown { point, .. } => self.stroke.press(*point, ctx.style.to_style()),
            InputEvent::PointerMove { point, .. } => self.stroke.drag(*point, false),
            InputEvent::PointerUp { .. } => self.stroke.release(ToolKind::Path.name()),
        }
    }

    fn finish(&mut self) -> Vec<ToolAction> {
        self.stroke.abandon()
    }
}

// ─── Brush Tool ──────────────────────────────────────────────────────────

/// Unfilled freehand stroke at twice the current stroke width.
#[derive(Debug, Default)]
pub struct BrushTool {
    stroke: Freehand,
}

impl BrushTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for BrushTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Brush
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        match event {
            InputEvent::PointerDown { point, .. } => {
                let style = Style {
                    fill: None,
                    stroke_width: ctx.style.stroke_width * 2.0,
                    ..ctx.style.to_style()
                };
                self.stroke.press(*point, style)
            }
            InputEvent::PointerMove { point, .. } => self.stroke.drag(*point, true),
            InputEvent::PointerUp { .. } => self.stroke.release(ToolKind::Brush.name()),
        }
    }

    fn finish(&mut self) -> Vec<ToolAction> {
        self.stroke.abandon()
    }
}

// ─── Pen Tool ────────────────────────────────────────────────────────────

/// Click-to-add polyline. Stays live across clicks until finished.
#[derive(Debug, Default)]
pub struct PenTool {
    points: Vec<Point>,
}

impl PenTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        !self.points.is_empty()
    }
}

impl Tool for PenTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pen
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        let InputEvent::PointerDown { point, .. } = event else {
            return vec![];
        };

        let Some(first) = self.points.first().copied() else {
            self.points.push(*point);
            return vec![ToolAction::BeginShape {
                kind: NodeKind::Path {
                    path: polyline(&self.points, false),
                },
                style: ctx.style.to_style(),
            }];
        };

        // Clicking the first point again closes the path.
        if self.points.len() >= 3 && first.distance(*point) <= ctx.config.select_tolerance {
            let path = polyline(&self.points, true);
            self.points.clear();
            return vec![ToolAction::FinishShape {
                prefix: ToolKind::Pen.name(),
                kind: Some(NodeKind::Path { path }),
            }];
        }

        self.points.push(*point);
        vec![ToolAction::UpdateShape {
            kind: NodeKind::Path {
                path: polyline(&self.points, false),
            },
        }]
    }

    fn finish(&mut self) -> Vec<ToolAction> {
        let points = std::mem::take(&mut self.points);
        match points.len() {
            0 => vec![],
            1 => vec![ToolAction::DiscardShape],
            _ => vec![ToolAction::FinishShape {
                prefix: ToolKind::Pen.name(),
                kind: Some(NodeKind::Path {
                    path: polyline(&points, false),
                }),
            }],
        }
    }

    fn cancel(&mut self) -> Vec<ToolAction> {
        if std::mem::take(&mut self.points).is_empty() {
            vec![]
        } else {
            vec![ToolAction::DiscardShape]
        }
    }
}

// ─── Text Tool ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct TextTool;

impl TextTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        let InputEvent::PointerDown { point, .. } = event else {
            return vec![];
        };
        if ctx.config.default_text.is_empty() {
            return vec![];
        }
        vec![ToolAction::AddItem {
            prefix: ToolKind::Text.name(),
            kind: NodeKind::Text {
                origin: *point,
                content: ctx.config.default_text.clone(),
                font_size: ctx.config.text_font_size,
            },
            style: Style {
                fill: Some(ctx.style.fill_color()),
                stroke: None,
                ..Style::default()
            },
        }]
    }
}

// ─── Eyedropper / Fill / Eraser ──────────────────────────────────────────

#[derive(Debug, Default)]
pub struct EyedropperTool;

impl Tool for EyedropperTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Eyedropper
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        match (event, ctx.hit) {
            (InputEvent::PointerDown { .. }, Some(hit)) => {
                vec![ToolAction::PickColor { node: hit.node }]
            }
            _ => vec![],
        }
    }
}

#[derive(Debug, Default)]
pub struct FillTool;

impl Tool for FillTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Fill
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        match (event, ctx.hit) {
            (InputEvent::PointerDown { .. }, Some(hit)) => vec![ToolAction::Fill { node: hit.node }],
            _ => vec![],
        }
    }
}

#[derive(Debug, Default)]
pub struct EraserTool;

impl Tool for EraserTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Eraser
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        match (event, ctx.hit) {
            (InputEvent::PointerDown { .. }, Some(hit)) => {
                vec![ToolAction::Erase {
                    node: hit.top_level,
                }]
            }
            _ => vec![],
        }
    }
}

// ─── Zoom / Hand ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ZoomTool;

impl Tool for ZoomTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Zoom
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        let InputEvent::PointerDown {
            screen, modifiers, ..
        } = event
        else {
            return vec![];
        };
        // Alt: zoom out
        let factor = if modifiers.alt {
            1.0 / ctx.config.zoom_factor
        } else {
            ctx.config.zoom_factor
        };
        vec![ToolAction::Zoom {
            anchor: *screen,
            factor,
        }]
    }
}

/// Pans the view by the drag delta in view units.
#[derive(Debug, Default)]
pub struct HandTool {
    last: Option<Point>,
}

impl HandTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for HandTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Hand
    }

    fn handle(&mut self, event: &InputEvent, _ctx: &ToolContext<'_>) -> Vec<ToolAction> {
        match event {
            InputEvent::PointerDown { screen, .. } => {
                self.last = Some(*screen);
                vec![]
            }
            InputEvent::PointerMove { screen, .. } => match self.last.replace(*screen) {
                Some(last) => vec![ToolAction::Pan {
                    delta: *screen - last,
                }],
                None => {
                    self.last = None;
                    vec![]
                }
            },
            InputEvent::PointerUp { .. } => {
                self.last = None;
                vec![]
            }
        }
    }

    fn finish(&mut self) -> Vec<ToolAction> {
        self.last = None;
        vec![]
    }
}

// ─── Tool box ────────────────────────────────────────────────────────────

/// One state struct per tool; exactly one is driven at a time.
#[derive(Debug, Default)]
pub struct ToolBox {
    select: SelectTool,
    rectangle: RectangleTool,
    circle: CircleTool,
    path: PathTool,
    pen: PenTool,
    brush: BrushTool,
    text: TextTool,
    eyedropper: EyedropperTool,
    fill: FillTool,
    eraser: EraserTool,
    zoom: ZoomTool,
    hand: HandTool,
}

impl ToolBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_mut(&mut self, kind: ToolKind) -> &mut dyn Tool {
        match kind {
            ToolKind::Select => &mut self.select,
            ToolKind::Rectangle => &mut self.rectangle,
            ToolKind::Circle => &mut self.circle,
            ToolKind::Path => &mut self.path,
            ToolKind::Pen => &mut self.pen,
            ToolKind::Brush => &mut self.brush,
            ToolKind::Text => &mut self.text,
            ToolKind::Eyedropper => &mut self.eyedropper,
            ToolKind::Fill => &mut self.fill,
            ToolKind::Eraser => &mut self.eraser,
            ToolKind::Zoom => &mut self.zoom,
            ToolKind::Hand => &mut self.hand,
        }
    }

    /// The hand tool, also driven by the space-held pan overlay.
    pub fn hand_mut(&mut self) -> &mut HandTool {
        &mut self.hand
    }
}
