//! Editing session: the single owner of document, tools, selection and history.
//!
//! Every host entry point lands here. Pointer events are routed to the active
//! tool, which answers with `ToolAction`s; the session applies them to the
//! scene graph, records undo snapshots and pushes notifications through the
//! injected `HostBridge`.
//!
//! Document load is split in three so the parse can happen off the event
//! loop: `begin_load` hands out a `PendingLoad` ticket, `PendingLoad::parse`
//! runs the importer, and `finish_load` applies the result only if no newer
//! load was started in the meantime.

use crate::bridge::{Bounds, ColorMode, ElementInfo, HostBridge, NoopBridge, SelectionSummary};
use crate::commands::UndoStack;
use crate::config::EditorConfig;
use crate::error::{EditorError, LoadError};
use crate::input::{InputEvent, Modifiers};
use crate::selection::SelectionSet;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::style::{StyleState, non_negative, unit};
use crate::tools::{Tool, ToolAction, ToolBox, ToolContext, ToolKind};
use vg_core::kurbo::{Affine, Point};
use vg_core::{
    Color, ImportError, NodeId, NodeIndex, SceneGraph, SceneNode, Snapshot, Style, ViewTransform,
    Viewport, export_svg, fit_to_viewport, import_svg, insert_grid,
};
use vg_render::hit_test;
use web_time::{SystemTime, UNIX_EPOCH};

pub struct Session {
    graph: SceneGraph,
    viewport: Viewport,
    view: ViewTransform,
    config: EditorConfig,
    style: StyleState,
    selection: SelectionSet,
    history: UndoStack,
    bridge: Box<dyn HostBridge>,
    active_tool: ToolKind,
    tools: ToolBox,
    /// Space is held: pointer events drive the hand tool.
    space_held: bool,
    /// Provisional item of the in-progress drawing gesture.
    provisional: Option<NodeIndex>,
    load_generation: u64,
}

/// Ticket for an in-flight document load.
#[derive(Debug, Clone)]
pub struct PendingLoad {
    source: String,
    generation: u64,
}

impl PendingLoad {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the importer. Touches no session state. A blank source is an
    /// empty document.
    pub fn parse(self) -> ParsedDocument {
        let result = if self.source.trim().is_empty() {
            Ok(SceneGraph::new())
        } else {
            import_svg(&self.source)
        };
        ParsedDocument {
            generation: self.generation,
            result,
        }
    }
}

/// Importer output waiting to be applied by `Session::finish_load`.
#[derive(Debug)]
pub struct ParsedDocument {
    generation: u64,
    result: Result<SceneGraph, ImportError>,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadReport {
    /// Top-level items imported.
    pub items: usize,
    /// Transform applied to fit the content, if any.
    pub fit: Option<Affine>,
}

impl Session {
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        Self::with_bridge(config, Box::new(NoopBridge))
    }

    pub fn with_bridge(config: EditorConfig, bridge: Box<dyn HostBridge>) -> Result<Self, EditorError> {
        config.validate()?;
        let viewport = config.viewport()?;
        let mut graph = SceneGraph::new();
        if config.show_grid {
            insert_grid(&mut graph, viewport, &config.grid_name, config.grid_size);
        }
        Ok(Self {
            graph,
            viewport,
            view: ViewTransform::default(),
            history: UndoStack::new(config.undo_depth),
            config,
            style: StyleState::default(),
            selection: SelectionSet::new(),
            bridge,
            active_tool: ToolKind::Select,
            tools: ToolBox::new(),
            space_held: false,
            provisional: None,
            load_generation: 0,
        })
    }

    pub fn set_bridge(&mut self, bridge: Box<dyn HostBridge>) {
        self.bridge = bridge;
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn active_tool(&self) -> ToolKind {
        self.active_tool
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Activate a tool by name; unknown names activate `select`.
    pub fn activate(&mut self, name: &str) -> Result<ToolKind, EditorError> {
        let kind = ToolKind::from_name(name);
        self.activate_kind(kind)?;
        Ok(kind)
    }

    /// Switch tools, letting the outgoing tool reach a terminal state first.
    pub fn activate_kind(&mut self, kind: ToolKind) -> Result<(), EditorError> {
        if kind == self.active_tool {
            return Ok(());
        }
        let actions = self.tools.get_mut(self.active_tool).finish();
        self.apply(actions)?;
        log::debug!("tool {} -> {}", self.active_tool.name(), kind.name());
        self.active_tool = kind;
        Ok(())
    }

    /// Pointer pressed at a view-space position.
    pub fn pointer_down(&mut self, x: f64, y: f64, modifiers: Modifiers) -> Result<(), EditorError> {
        let (point, screen) = self.locate(x, y);
        self.dispatch(InputEvent::PointerDown {
            point,
            screen,
            modifiers,
        })
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, modifiers: Modifiers) -> Result<(), EditorError> {
        let (point, screen) = self.locate(x, y);
        self.dispatch(InputEvent::PointerMove {
            point,
            screen,
            modifiers,
        })
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, modifiers: Modifiers) -> Result<(), EditorError> {
        let (point, screen) = self.locate(x, y);
        self.dispatch(InputEvent::PointerUp {
            point,
            screen,
            modifiers,
        })
    }

    fn locate(&self, x: f64, y: f64) -> (Point, Point) {
        let screen = Point::new(x, y);
        (self.view.to_scene(screen), screen)
    }

    fn dispatch(&mut self, event: InputEvent) -> Result<(), EditorError> {
        let kind = if self.space_held {
            ToolKind::Hand
        } else {
            self.active_tool
        };
        let hit = match (&event, kind.hit_options(&self.config)) {
            (InputEvent::PointerDown { point, .. }, Some(options)) => {
                hit_test(&self.graph, *point, &options)
            }
            _ => None,
        };
        let ctx = ToolContext {
            hit,
            style: &self.style,
            config: &self.config,
        };
        let actions = self.tools.get_mut(kind).handle(&event, &ctx);
        self.apply(actions)
    }

    /// Handle a key press. Returns true if the key was bound.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> Result<bool, EditorError> {
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return Ok(false);
        };
        match action {
            ShortcutAction::Tool(kind) => self.activate_kind(kind)?,
            ShortcutAction::Undo => {
                self.undo()?;
            }
            ShortcutAction::Redo => {
                self.redo()?;
            }
            ShortcutAction::Delete => {
                self.delete_selected()?;
            }
            ShortcutAction::SelectAll => {
                self.select_all()?;
            }
            ShortcutAction::Deselect => {
                self.cancel_gesture()?;
                self.clear_selection();
            }
            ShortcutAction::Commit => {
                if self.active_tool == ToolKind::Pen {
                    let actions = self.tools.get_mut(ToolKind::Pen).finish();
                    self.apply(actions)?;
                }
            }
            ShortcutAction::PanStart => {
                // A pen path survives the pan; a press-drag gesture does not.
                if self.active_tool != ToolKind::Pen {
                    self.cancel_gesture()?;
                }
                self.space_held = true;
            }
        }
        Ok(true)
    }

    pub fn key_up(&mut self, key: &str) -> Result<(), EditorError> {
        if matches!(key, " " | "Space") && self.space_held {
            self.space_held = false;
            let actions = self.tools.hand_mut().finish();
            self.apply(actions)?;
        }
        Ok(())
    }

    /// Abandon whatever the active tool has in progress.
    fn cancel_gesture(&mut self) -> Result<(), EditorError> {
        let actions = self.tools.get_mut(self.active_tool).cancel();
        self.apply(actions)?;
        self.discard_provisional();
        Ok(())
    }

    fn apply(&mut self, actions: Vec<ToolAction>) -> Result<(), EditorError> {
        for action in actions {
            self.apply_action(action)?;
        }
        Ok(())
    }

    fn apply_action(&mut self, action: ToolAction) -> Result<(), EditorError> {
        match action {
            ToolAction::BeginShape { kind, style } => {
                self.discard_provisional();
                self.history.begin_gesture(Snapshot::capture(&self.graph)?);
                let node = SceneNode::new(NodeId::anonymous(), kind).with_style(style);
                let root = self.graph.root;
                self.provisional = Some(self.graph.add_node(root, node));
            }
            ToolAction::UpdateShape { kind } => {
                if let Some(idx) = self.provisional
                    && let Some(node) = self.graph.graph.node_weight_mut(idx)
                {
                    node.kind = kind;
                }
            }
            ToolAction::FinishShape { prefix, kind } => {
                let Some(idx) = self.provisional.take() else {
                    return Ok(());
                };
                let name = self.generate_name(prefix);
                if let Some(node) = self.graph.graph.node_weight_mut(idx) {
                    if let Some(kind) = kind {
                        node.kind = kind;
                    }
                    node.name = Some(name.clone());
                }
                self.history.commit_gesture();
                log::debug!("created {name}");
            }
            ToolAction::DiscardShape => self.discard_provisional(),
            ToolAction::AddItem {
                prefix,
                kind,
                style,
            } => {
                self.record()?;
                let name = self.generate_name(prefix);
                let node = SceneNode::new(NodeId::anonymous(), kind)
                    .with_style(style)
                    .with_name(name.clone());
                let root = self.graph.root;
                self.graph.add_node(root, node);
                log::debug!("created {name}");
            }
            ToolAction::Select { target, toggle } => {
                let id = target.and_then(|idx| self.graph.graph.node_weight(idx)).map(|n| n.id);
                let changed = match (id, toggle) {
                    (Some(id), true) if self.selection.contains(id) => self.selection.remove(id),
                    (Some(id), true) => self.selection.insert(id),
                    (None, true) => false,
                    (id, false) => self.selection.replace(id),
                };
                if changed {
                    self.selection_changed();
                }
            }
            ToolAction::PickColor { node } => self.pick_color(node),
            ToolAction::Fill { node } => {
                if self.graph.graph.node_weight(node).is_some() {
                    self.record()?;
                    let fill = self.style.fill_color();
                    self.graph.graph[node].style.fill = Some(fill);
                }
            }
            ToolAction::Erase { node } => {
                if self.graph.graph.node_weight(node).is_some() {
                    self.record()?;
                    self.graph.remove_node(node);
                    if self.selection.prune(&self.graph) {
                        self.selection_changed();
                    }
                }
            }
            ToolAction::Zoom { anchor, factor } => self.view.zoom_about(anchor, factor),
            ToolAction::Pan { delta } => self.view.pan(delta),
        }
        Ok(())
    }

    fn discard_provisional(&mut self) {
        if let Some(idx) = self.provisional.take() {
            self.graph.remove_node(idx);
        }
        self.history.abort_gesture();
    }

    /// Eyedropper: fill wins over stroke.
    fn pick_color(&mut self, node: NodeIndex) {
        let Some(node) = self.graph.graph.node_weight(node) else {
            return;
        };
        let picked = match (node.style.fill, node.style.stroke) {
            (Some(fill), _) => {
                self.style.fill = fill;
                fill
            }
            (None, Some(stroke)) => {
                self.style.stroke = stroke;
                stroke
            }
            (None, None) => return,
        };
        let hex = picked.to_hex();
        log::debug!("picked {hex}");
        self.bridge.on_color_picked(&hex);
    }

    /// `<prefix>_<unix millis>`, suffixed if that name is already taken.
    fn generate_name(&self, prefix: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let base = format!("{prefix}_{millis}");
        if self.graph.find_by_name(&base).is_none() {
            return base;
        }
        let mut n = 1u32;
        loop {
            let name = format!("{base}_{n}");
            if self.graph.find_by_name(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Returns true if the selection changed.
    pub fn select_item(&mut self, id: NodeId) -> bool {
        if !self.graph.contains(id) || !self.selection.insert(id) {
            return false;
        }
        self.selection_changed();
        true
    }

    pub fn deselect_item(&mut self, id: NodeId) -> bool {
        if !self.selection.remove(id) {
            return false;
        }
        self.selection_changed();
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if !self.selection.clear() {
            return false;
        }
        self.selection_changed();
        true
    }

    /// Select every unlocked top-level item except the grid. Abandons any
    /// drawing gesture in progress.
    pub fn select_all(&mut self) -> Result<bool, EditorError> {
        self.cancel_gesture()?;
        let grid = self.config.grid_name.as_str();
        let ids: Vec<NodeId> = self
            .graph
            .children(self.graph.root)
            .iter()
            .map(|idx| &self.graph.graph[*idx])
            .filter(|node| !node.locked && node.name.as_deref() != Some(grid))
            .map(|node| node.id)
            .collect();
        if !self.selection.replace(ids) {
            return Ok(false);
        }
        self.selection_changed();
        Ok(true)
    }

    /// Remove every selected item. Returns how many were removed.
    pub fn delete_selected(&mut self) -> Result<usize, EditorError> {
        self.cancel_gesture()?;
        if self.selection.is_empty() {
            return Ok(0);
        }
        self.record()?;
        let doomed: Vec<NodeIndex> = self
            .selection
            .iter()
            .filter_map(|id| self.graph.index_of(id))
            .collect();
        for idx in &doomed {
            self.graph.remove_node(*idx);
        }
        self.selection.clear();
        self.selection_changed();
        log::debug!("deleted {} item(s)", doomed.len());
        Ok(doomed.len())
    }

    fn selection_changed(&mut self) {
        self.selection.sync_flags(&mut self.graph);
        let summary = self.selection_summary();
        self.bridge.on_selection_changed(&summary);
    }

    pub fn selection_summary(&self) -> SelectionSummary {
        let first = self
            .selection
            .first()
            .and_then(|id| self.graph.index_of(id));
        match (first, self.selection.host_ids(&self.graph).into_iter().next()) {
            (Some(idx), Some(host_id)) => {
                SelectionSummary::describe(&self.graph, idx, host_id, self.selection.len())
            }
            _ => SelectionSummary::empty(),
        }
    }

    /// Host identifiers of the selected items, in selection order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.host_ids(&self.graph)
    }

    pub fn selected_info(&self) -> Vec<ElementInfo> {
        self.selection
            .iter()
            .zip(self.selection.host_ids(&self.graph))
            .filter_map(|(id, host_id)| {
                let idx = self.graph.index_of(id)?;
                let node = &self.graph.graph[idx];
                Some(ElementInfo {
                    id: host_id,
                    kind: node.kind.type_name().to_string(),
                    bounds: self.graph.bounds(idx).map(Bounds::from),
                    fill_color: node.style.fill.map(|c| c.to_hex()),
                    stroke_color: node.style.stroke.map(|c| c.to_hex()),
                })
            })
            .collect()
    }

    // ─── Documents ───────────────────────────────────────────────────────

    /// Start a load. Any earlier pending load is superseded.
    pub fn begin_load(&mut self, source: impl Into<String>) -> PendingLoad {
        self.load_generation += 1;
        if let Err(e) = self.cancel_gesture() {
            log::warn!("failed to cancel gesture before load: {e}");
        }
        self.clear_selection();
        log::debug!("load {} started", self.load_generation);
        PendingLoad {
            source: source.into(),
            generation: self.load_generation,
        }
    }

    /// Replace the document's items with a parsed document, fit it to the
    /// viewport and reset history.
    pub fn finish_load(&mut self, parsed: ParsedDocument) -> Result<LoadReport, LoadError> {
        if parsed.generation != self.load_generation {
            log::debug!(
                "dropping load {} (current is {})",
                parsed.generation,
                self.load_generation
            );
            return Err(LoadError::Superseded {
                generation: parsed.generation,
            });
        }

        let doc = match parsed.result {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("document import failed: {e}");
                self.bridge.on_document_loaded(false);
                return Err(e.into());
            }
        };

        let grid = self.config.grid_name.clone();
        self.graph
            .remove_top_level_where(|node| node.name.as_deref() != Some(grid.as_str()));
        let root = self.graph.root;
        let items = doc.children(doc.root).len();
        for child in doc.children(doc.root) {
            self.graph.graft(root, &doc, *child);
        }
        let fit = fit_to_viewport(&mut self.graph, self.viewport);
        if self.config.show_grid && self.graph.find_by_name(&grid).is_none() {
            insert_grid(&mut self.graph, self.viewport, &grid, self.config.grid_size);
        }

        self.history.clear();
        self.provisional = None;
        self.clear_selection();
        log::debug!("load {} applied: {items} item(s)", parsed.generation);
        self.bridge.on_document_loaded(true);
        Ok(LoadReport { items, fit })
    }

    /// `begin_load`, `parse` and `finish_load` in one call.
    pub fn load_document(&mut self, source: &str) -> Result<LoadReport, LoadError> {
        let pending = self.begin_load(source);
        self.finish_load(pending.parse())
    }

    pub fn export_document(&self) -> String {
        export_svg(&self.graph, self.viewport)
    }

    // ─── Style ───────────────────────────────────────────────────────────

    pub fn set_color(&mut self, input: &str) -> Result<(), EditorError> {
        self.style
            .set_fill(input)
            .inspect_err(|e| log::warn!("ignoring fill color {input:?}: {e}"))
    }

    pub fn set_stroke_color(&mut self, input: &str) -> Result<(), EditorError> {
        self.style
            .set_stroke(input)
            .inspect_err(|e| log::warn!("ignoring stroke color {input:?}: {e}"))
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Result<(), EditorError> {
        self.style
            .set_stroke_width(width)
            .inspect_err(|e| log::warn!("ignoring stroke width: {e}"))
    }

    pub fn set_opacity(&mut self, fill: f64, stroke: f64) -> Result<(), EditorError> {
        unit("fillOpacity", fill)?;
        unit("strokeOpacity", stroke)?;
        self.style.set_fill_opacity(fill)?;
        self.style.set_stroke_opacity(stroke)
    }

    /// Paint every selected item. Returns false if nothing is selected.
    pub fn apply_color_to_selection(&mut self, input: &str, mode: ColorMode) -> Result<bool, EditorError> {
        let color = Color::parse(input).inspect_err(|e| log::warn!("ignoring color {input:?}: {e}"))?;
        self.edit_selection(|style| {
            if mode.fill() {
                style.fill = Some(color);
            }
            if mode.stroke() {
                style.stroke = Some(color);
            }
        })
    }

    /// Apply the whole current style to every selected item.
    pub fn apply_style_to_selection(&mut self) -> Result<bool, EditorError> {
        let current = self.style.to_style();
        self.edit_selection(|style| {
            style.fill = current.fill;
            style.stroke = current.stroke;
            style.stroke_width = current.stroke_width;
        })
    }

    /// Property panel edit: applies to the selection when there is one,
    /// otherwise to the style used for new items.
    pub fn update_property(&mut self, key: &str, value: &str) -> Result<(), EditorError> {
        let edit: Box<dyn Fn(&mut Style)> = match key {
            "fillColor" => {
                let color = Color::parse(value)?;
                if self.selection.is_empty() {
                    self.style.fill = color;
                    return Ok(());
                }
                Box::new(move |style| style.fill = Some(color))
            }
            "strokeColor" => {
                let color = Color::parse(value)?;
                if self.selection.is_empty() {
                    self.style.stroke = color;
                    return Ok(());
                }
                Box::new(move |style| style.stroke = Some(color))
            }
            "strokeWidth" => {
                let width = non_negative("strokeWidth", parse_number("strokeWidth", value)?)?;
                if self.selection.is_empty() {
                    self.style.stroke_width = width;
                    return Ok(());
                }
                Box::new(move |style| style.stroke_width = width)
            }
            "fillOpacity" => {
                let opacity = unit("fillOpacity", parse_number("fillOpacity", value)?)?;
                if self.selection.is_empty() {
                    self.style.fill_opacity = opacity;
                    return Ok(());
                }
                Box::new(move |style| {
                    style.fill = style.fill.map(|c| c.with_alpha(opacity as f32));
                })
            }
            "strokeOpacity" => {
                let opacity = unit("strokeOpacity", parse_number("strokeOpacity", value)?)?;
                if self.selection.is_empty() {
                    self.style.stroke_opacity = opacity;
                    return Ok(());
                }
                Box::new(move |style| {
                    style.stroke = style.stroke.map(|c| c.with_alpha(opacity as f32));
                })
            }
            other => return Err(EditorError::UnknownProperty(other.to_string())),
        };
        self.edit_selection(edit)?;
        Ok(())
    }

    /// Record one undo step and apply `edit` to every selected item and its
    /// descendants.
    fn edit_selection(&mut self, edit: impl Fn(&mut Style)) -> Result<bool, EditorError> {
        self.cancel_gesture()?;
        if self.selection.is_empty() {
            return Ok(false);
        }
        self.record()?;
        let mut stack: Vec<NodeIndex> = self
            .selection
            .iter()
            .filter_map(|id| self.graph.index_of(id))
            .collect();
        while let Some(idx) = stack.pop() {
            edit(&mut self.graph.graph[idx].style);
            stack.extend_from_slice(self.graph.children(idx));
        }
        Ok(true)
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Serialize the current scene.
    pub fn snapshot(&self) -> Result<Snapshot, EditorError> {
        Ok(Snapshot::capture(&self.graph)?)
    }

    /// Push the current state as an undo step.
    fn record(&mut self) -> Result<(), EditorError> {
        let before = self.snapshot()?;
        self.history.push(before);
        Ok(())
    }

    /// Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.cancel_gesture()?;
        let current = self.snapshot()?;
        let Some(previous) = self.history.undo(current) else {
            return Ok(false);
        };
        self.restore(&previous)?;
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.cancel_gesture()?;
        let current = self.snapshot()?;
        let Some(next) = self.history.redo(current) else {
            return Ok(false);
        };
        self.restore(&next)?;
        Ok(true)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), EditorError> {
        self.graph = snapshot.restore()?;
        self.provisional = None;
        if self.selection.prune(&self.graph) {
            self.selection_changed();
        } else {
            self.selection.sync_flags(&mut self.graph);
        }
        Ok(())
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) {
        self.view
            .zoom_about(self.viewport.center(), self.config.zoom_factor);
    }

    pub fn zoom_out(&mut self) {
        self.view
            .zoom_about(self.viewport.center(), 1.0 / self.config.zoom_factor);
    }

    pub fn zoom_reset(&mut self) {
        self.view.reset();
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, EditorError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| EditorError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vg_core::NodeKind;
    use vg_core::kurbo::Rect;

    fn session() -> Session {
        Session::new(EditorConfig::default()).unwrap()
    }

    fn items(s: &Session) -> usize {
        s.graph().children(s.graph().root).len()
    }

    #[test]
    fn session_validates_directly_built_config() {
        let config = EditorConfig {
            grid_size: 0.001,
            ..EditorConfig::default()
        };
        assert!(matches!(Session::new(config), Err(EditorError::InvalidConfig(_))));
        let config = EditorConfig {
            undo_depth: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(Session::new(config), Err(EditorError::InvalidConfig(_))));
    }

    #[test]
    fn new_session_has_only_the_grid() {
        let s = session();
        assert_eq!(items(&s), 1);
        assert!(s.graph().find_by_name("grid").is_some());
        assert_eq!(s.active_tool(), ToolKind::Select);
    }

    #[test]
    fn rectangle_drag_creates_named_item_and_one_undo_step() {
        let mut s = session();
        s.activate("rectangle").unwrap();
        s.pointer_down(10.0, 10.0, Modifiers::NONE).unwrap();
        s.pointer_move(60.0, 40.0, Modifiers::NONE).unwrap();
        s.pointer_up(60.0, 40.0, Modifiers::NONE).unwrap();

        assert_eq!(items(&s), 2);
        let idx = *s.graph().children(s.graph().root).last().unwrap();
        let node = &s.graph().graph[idx];
        assert!(node.name.as_deref().unwrap().starts_with("rectangle_"));
        assert_eq!(
            node.kind,
            NodeKind::Rect {
                rect: Rect::new(10.0, 10.0, 60.0, 40.0),
                radius: 0.0,
            }
        );
        assert_eq!(s.history().undo_len(), 1);

        assert!(s.undo().unwrap());
        assert_eq!(items(&s), 1);
    }

    #[test]
    fn switching_tools_mid_drag_leaves_no_trace() {
        let mut s = session();
        let before = s.snapshot().unwrap();
        s.activate("circle").unwrap();
        s.pointer_down(100.0, 100.0, Modifiers::NONE).unwrap();
        s.pointer_move(120.0, 100.0, Modifiers::NONE).unwrap();
        s.activate("select").unwrap();

        assert_eq!(s.snapshot().unwrap(), before);
        assert!(!s.history().can_undo());
        assert!(!s.history().in_gesture());
    }

    #[test]
    fn unknown_tool_activates_select() {
        let mut s = session();
        s.activate("pen").unwrap();
        assert_eq!(s.activate("lasso").unwrap(), ToolKind::Select);
        assert_eq!(s.active_tool(), ToolKind::Select);
    }

    #[test]
    fn pen_path_is_finished_by_enter() {
        let mut s = session();
        s.activate("pen").unwrap();
        s.pointer_down(0.0, 0.0, Modifiers::NONE).unwrap();
        s.pointer_down(50.0, 0.0, Modifiers::NONE).unwrap();
        s.pointer_down(50.0, 50.0, Modifiers::NONE).unwrap();
        assert!(s.key_down("Enter", Modifiers::NONE).unwrap());

        let idx = *s.graph().children(s.graph().root).last().unwrap();
        assert!(s.graph().graph[idx].name.as_deref().unwrap().starts_with("pen_"));
        assert_eq!(s.history().undo_len(), 1);
    }

    #[test]
    fn escape_discards_live_pen_path() {
        let mut s = session();
        s.activate("pen").unwrap();
        s.pointer_down(0.0, 0.0, Modifiers::NONE).unwrap();
        s.pointer_down(50.0, 0.0, Modifiers::NONE).unwrap();
        s.key_down("Escape", Modifiers::NONE).unwrap();
        assert_eq!(items(&s), 1);
        assert!(!s.history().can_undo());
    }

    #[test]
    fn space_pans_regardless_of_tool() {
        let mut s = session();
        s.activate("rectangle").unwrap();
        s.key_down(" ", Modifiers::NONE).unwrap();
        s.pointer_down(10.0, 10.0, Modifiers::NONE).unwrap();
        s.pointer_move(30.0, 5.0, Modifiers::NONE).unwrap();
        s.pointer_up(30.0, 5.0, Modifiers::NONE).unwrap();
        s.key_up(" ").unwrap();

        assert_eq!(s.view().offset, vg_core::kurbo::Vec2::new(20.0, -5.0));
        assert_eq!(items(&s), 1);
        assert_eq!(s.active_tool(), ToolKind::Rectangle);
    }

    #[test]
    fn zoom_tool_converts_later_pointer_positions() {
        let mut s = session();
        s.activate("zoom").unwrap();
        s.pointer_down(0.0, 0.0, Modifiers::NONE).unwrap();
        assert!((s.view().zoom - 1.25).abs() < 1e-12);

        s.activate("rectangle").unwrap();
        s.pointer_down(0.0, 0.0, Modifiers::NONE).unwrap();
        s.pointer_move(125.0, 125.0, Modifiers::NONE).unwrap();
        s.pointer_up(125.0, 125.0, Modifiers::NONE).unwrap();
        let idx = *s.graph().children(s.graph().root).last().unwrap();
        assert_eq!(
            s.graph().bounds(idx),
            Some(Rect::new(0.0, 0.0, 100.0, 100.0))
        );
    }

    #[test]
    fn update_property_without_selection_edits_style() {
        let mut s = session();
        s.update_property("strokeWidth", "5").unwrap();
        assert_eq!(s.style().stroke_width, 5.0);
        s.update_property("fillColor", "#ff0000").unwrap();
        assert_eq!(s.style().fill.to_hex(), "#ff0000");
        assert!(matches!(
            s.update_property("strokeWidth", "wide"),
            Err(EditorError::InvalidNumber { .. })
        ));
        assert!(matches!(
            s.update_property("fontFamily", "serif"),
            Err(EditorError::UnknownProperty(_))
        ));
        assert!(!s.history().can_undo());
    }

    #[test]
    fn malformed_color_leaves_style_untouched() {
        let mut s = session();
        let before = s.style().clone();
        assert!(s.set_color("#zzz").is_err());
        assert!(s.set_opacity(0.5, 2.0).is_err());
        assert_eq!(s.style(), &before);
    }

    #[test]
    fn generated_names_are_unique() {
        let mut s = session();
        s.activate("text").unwrap();
        s.pointer_down(10.0, 10.0, Modifiers::NONE).unwrap();
        s.pointer_down(10.0, 50.0, Modifiers::NONE).unwrap();
        let names: Vec<_> = s
            .graph()
            .children(s.graph().root)
            .iter()
            .filter_map(|idx| s.graph().graph[*idx].name.clone())
            .filter(|name| name.starts_with("text_"))
            .collect();
        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);
    }
}
