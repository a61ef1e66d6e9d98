//! WASM bridge for VG. Exposes the editing session to a web host.
//!
//! Compiled via `wasm-pack build --target web`. Every method is infallible
//! from the JS side: errors are logged to the console and turned into
//! `false`, empty strings or empty JSON.

use js_sys::{Function, Reflect};
use serde::Serialize;
use vg_editor::{
    ColorMode, EditorConfig, EditorError, HostBridge, Modifiers, SelectionSummary, Session,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Forwards session notifications to callbacks on a host JS object.
///
/// Missing callbacks are ignored, so a host only implements what it needs.
struct JsBridge {
    target: JsValue,
}

impl JsBridge {
    fn call(&self, name: &str, arg: JsValue) {
        let Ok(callback) = Reflect::get(&self.target, &JsValue::from_str(name)) else {
            return;
        };
        let Some(func) = callback.dyn_ref::<Function>() else {
            return;
        };
        if let Err(e) = func.call1(&self.target, &arg) {
            log::warn!("host callback {name} threw: {e:?}");
        }
    }
}

impl HostBridge for JsBridge {
    fn on_color_picked(&mut self, hex: &str) {
        self.call("on_color_picked", JsValue::from_str(hex));
    }

    fn on_selection_changed(&mut self, summary: &SelectionSummary) {
        self.call("on_selection_changed", JsValue::from_str(&summary.to_json()));
    }

    fn on_document_loaded(&mut self, ok: bool) {
        self.call("on_document_loaded", JsValue::from_bool(ok));
    }
}

enum Mode {
    Live(Box<Session>),
    /// The session could not start: documents pass through as raw text.
    Preview(String),
}

/// The WASM-facing editor controller.
#[wasm_bindgen]
pub struct VgEditor {
    mode: Mode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewState {
    zoom: f64,
    offset_x: f64,
    offset_y: f64,
}

#[wasm_bindgen]
impl VgEditor {
    /// Create an editor for a `width`×`height` canvas. `config_json` is an
    /// optional camelCase `EditorConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config_json: Option<String>) -> Self {
        console_error_panic_hook_setup();

        let config = EditorConfig::from_json(config_json.as_deref().unwrap_or("")).map(|config| {
            EditorConfig {
                viewport_width: width,
                viewport_height: height,
                ..config
            }
        });
        init_logging(
            config
                .as_ref()
                .map(EditorConfig::log_level)
                .unwrap_or(log::Level::Info),
        );

        match config.and_then(Session::new) {
            Ok(session) => {
                log::info!("editor ready ({width}×{height})");
                Self {
                    mode: Mode::Live(Box::new(session)),
                }
            }
            Err(e) => {
                log::error!("editor init failed, falling back to read-only preview: {e}");
                Self {
                    mode: Mode::Preview(String::new()),
                }
            }
        }
    }

    /// True when init failed and only load/export of raw text works.
    #[wasm_bindgen(js_name = isReadOnly)]
    pub fn is_read_only(&self) -> bool {
        matches!(self.mode, Mode::Preview(_))
    }

    /// Install the host callback object (`on_color_picked`,
    /// `on_selection_changed`, `on_document_loaded`).
    #[wasm_bindgen(js_name = setBridge)]
    pub fn set_bridge(&mut self, target: JsValue) {
        if let Some(session) = self.session() {
            session.set_bridge(Box::new(JsBridge { target }));
        }
    }

    // ─── Documents ───────────────────────────────────────────────────────

    /// Replace the document. Returns `true` on success.
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, svg: &str) -> bool {
        match &mut self.mode {
            Mode::Live(session) => match session.load_document(svg) {
                Ok(report) => {
                    log::debug!("loaded {} item(s)", report.items);
                    true
                }
                Err(e) => {
                    log::warn!("loadDocument failed: {e}");
                    false
                }
            },
            Mode::Preview(text) => {
                *text = svg.to_string();
                true
            }
        }
    }

    #[wasm_bindgen(js_name = exportDocument)]
    pub fn export_document(&self) -> String {
        match &self.mode {
            Mode::Live(session) => session.export_document(),
            Mode::Preview(text) => text.clone(),
        }
    }

    // ─── Tools & style ───────────────────────────────────────────────────

    /// Activate a tool; returns the name of the tool actually activated.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, name: &str) -> String {
        let Some(session) = self.session() else {
            return String::new();
        };
        if let Err(e) = session.activate(name) {
            log::warn!("setTool({name}) failed: {e}");
        }
        session.active_tool().name().to_string()
    }

    #[wasm_bindgen(js_name = getTool)]
    pub fn get_tool(&self) -> String {
        match &self.mode {
            Mode::Live(session) => session.active_tool().name().to_string(),
            Mode::Preview(_) => String::new(),
        }
    }

    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, hex: &str) -> bool {
        self.run("setColor", |s| s.set_color(hex)).is_some()
    }

    #[wasm_bindgen(js_name = setStrokeColor)]
    pub fn set_stroke_color(&mut self, hex: &str) -> bool {
        self.run("setStrokeColor", |s| s.set_stroke_color(hex))
            .is_some()
    }

    #[wasm_bindgen(js_name = setStrokeWidth)]
    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        self.run("setStrokeWidth", |s| s.set_stroke_width(width))
            .is_some()
    }

    #[wasm_bindgen(js_name = setOpacity)]
    pub fn set_opacity(&mut self, fill: f64, stroke: f64) -> bool {
        self.run("setOpacity", |s| s.set_opacity(fill, stroke))
            .is_some()
    }

    /// `mode` is `fill`, `stroke` or `both`. Returns whether anything was
    /// selected.
    #[wasm_bindgen(js_name = applyColorToSelection)]
    pub fn apply_color_to_selection(&mut self, hex: &str, mode: &str) -> bool {
        let mode = ColorMode::parse_lenient(mode);
        self.run("applyColorToSelection", |s| {
            s.apply_color_to_selection(hex, mode)
        })
        .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = applyStyleToSelection)]
    pub fn apply_style_to_selection(&mut self) -> bool {
        self.run("applyStyleToSelection", Session::apply_style_to_selection)
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = updateProperty)]
    pub fn update_property(&mut self, key: &str, value: &str) -> bool {
        self.run("updateProperty", |s| s.update_property(key, value))
            .is_some()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) {
        let modifiers = Modifiers::new(shift, ctrl, alt, meta);
        self.run("pointerDown", |s| s.pointer_down(x, y, modifiers));
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) {
        let modifiers = Modifiers::new(shift, ctrl, alt, meta);
        self.run("pointerMove", |s| s.pointer_move(x, y, modifiers));
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) {
        let modifiers = Modifiers::new(shift, ctrl, alt, meta);
        self.run("pointerUp", |s| s.pointer_up(x, y, modifiers));
    }

    /// Returns `true` if the key is bound, so the host can `preventDefault`.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers::new(shift, ctrl, alt, meta);
        self.run("keyDown", |s| s.key_down(key, modifiers))
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: &str) {
        self.run("keyUp", |s| s.key_up(key));
    }

    // ─── Selection & history ─────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.run("undo", Session::undo).unwrap_or(false)
    }

    pub fn redo(&mut self) -> bool {
        self.run("redo", Session::redo).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        matches!(&self.mode, Mode::Live(s) if s.history().can_undo())
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        matches!(&self.mode, Mode::Live(s) if s.history().can_redo())
    }

    #[wasm_bindgen(js_name = selectAll)]
    pub fn select_all(&mut self) -> bool {
        self.run("selectAll", Session::select_all).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) -> bool {
        self.session().is_some_and(|s| s.clear_selection())
    }

    /// Returns the number of items removed.
    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&mut self) -> u32 {
        self.run("deleteSelected", Session::delete_selected)
            .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX))
    }

    /// JSON array of selected item ids.
    #[wasm_bindgen(js_name = getSelectedElements)]
    pub fn get_selected_elements(&self) -> String {
        match &self.mode {
            Mode::Live(session) => to_json(&session.selected_ids(), "[]"),
            Mode::Preview(_) => "[]".to_string(),
        }
    }

    /// JSON array of `{id, type, bounds, fillColor, strokeColor}`.
    #[wasm_bindgen(js_name = getSelectedElementsInfo)]
    pub fn get_selected_elements_info(&self) -> String {
        match &self.mode {
            Mode::Live(session) => to_json(&session.selected_info(), "[]"),
            Mode::Preview(_) => "[]".to_string(),
        }
    }

    // ─── View ────────────────────────────────────────────────────────────

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        if let Some(session) = self.session() {
            session.zoom_in();
        }
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        if let Some(session) = self.session() {
            session.zoom_out();
        }
    }

    #[wasm_bindgen(js_name = zoomReset)]
    pub fn zoom_reset(&mut self) {
        if let Some(session) = self.session() {
            session.zoom_reset();
        }
    }

    /// `{"zoom", "offsetX", "offsetY"}` for the host's canvas transform.
    #[wasm_bindgen(js_name = viewJson)]
    pub fn view_json(&self) -> String {
        let view = match &self.mode {
            Mode::Live(session) => *session.view(),
            Mode::Preview(_) => vg_core::ViewTransform::default(),
        };
        to_json(
            &ViewState {
                zoom: view.zoom,
                offset_x: view.offset.x,
                offset_y: view.offset.y,
            },
            "{}",
        )
    }
}

impl VgEditor {
    fn session(&mut self) -> Option<&mut Session> {
        match &mut self.mode {
            Mode::Live(session) => Some(session.as_mut()),
            Mode::Preview(_) => None,
        }
    }

    /// Run a session operation, logging failures. `None` in preview mode or
    /// on error.
    fn run<T>(
        &mut self,
        op: &str,
        f: impl FnOnce(&mut Session) -> Result<T, EditorError>,
    ) -> Option<T> {
        let session = self.session()?;
        match f(session) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("{op} failed: {e}");
                None
            }
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

fn init_logging(level: log::Level) {
    #[cfg(target_arch = "wasm32")]
    {
        if console_log::init_with_level(level).is_err() {
            log::debug!("logger already installed");
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = level;
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("VG WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CARD: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="600">
  <rect id="card" x="300" y="250" width="200" height="100" fill="#e0e0e0"/>
</svg>"##;

    #[test]
    fn bad_config_falls_back_to_preview() {
        let mut editor = VgEditor::new(800.0, 600.0, Some("{not json".to_string()));
        assert!(editor.is_read_only());
        assert!(editor.load_document("<svg/>"));
        assert_eq!(editor.export_document(), "<svg/>");
        assert_eq!(editor.set_tool("rectangle"), "");
        assert!(!editor.undo());
        assert_eq!(editor.get_selected_elements(), "[]");
    }

    #[test]
    fn zero_size_canvas_falls_back_to_preview() {
        let editor = VgEditor::new(0.0, 600.0, None);
        assert!(editor.is_read_only());
    }

    #[test]
    fn unknown_tool_reports_select() {
        let mut editor = VgEditor::new(800.0, 600.0, None);
        assert!(!editor.is_read_only());
        assert_eq!(editor.set_tool("pen"), "pen");
        assert_eq!(editor.set_tool("magic-wand"), "select");
        assert_eq!(editor.get_tool(), "select");
    }

    #[test]
    fn click_selects_and_reports_ids() {
        let mut editor = VgEditor::new(800.0, 600.0, Some(r#"{"showGrid": false}"#.to_string()));
        assert!(editor.load_document(CARD));
        editor.pointer_down(400.0, 300.0, false, false, false, false);
        editor.pointer_up(400.0, 300.0, false, false, false, false);
        assert_eq!(editor.get_selected_elements(), r#"["card"]"#);

        assert!(editor.apply_color_to_selection("#ff0000", "FILL"));
        assert!(editor.export_document().contains(r##"fill="#ff0000""##));
        assert!(editor.can_undo());
        assert!(editor.undo());
        assert!(editor.export_document().contains(r##"fill="#e0e0e0""##));
    }

    #[test]
    fn invalid_input_is_rejected_without_panicking() {
        let mut editor = VgEditor::new(800.0, 600.0, None);
        assert!(!editor.set_color("not-a-color"));
        assert!(!editor.set_stroke_width(-1.0));
        assert!(!editor.update_property("fontWeight", "bold"));
        assert!(!editor.load_document("<html></html>"));
        assert!(!editor.apply_color_to_selection("#ff0000", "both"));
    }

    #[test]
    fn zoom_commands_update_view_json() {
        let mut editor = VgEditor::new(800.0, 600.0, None);
        assert_eq!(editor.view_json(), r#"{"zoom":1.0,"offsetX":0.0,"offsetY":0.0}"#);
        editor.zoom_in();
        editor.zoom_reset();
        assert_eq!(editor.view_json(), r#"{"zoom":1.0,"offsetX":0.0,"offsetY":0.0}"#);
        assert!(editor.key_down("z", true, false, false, false));
    }
}
