//! Host bridge: message shapes exchanged with the embedding application.
//!
//! The session pushes notifications through an injected `HostBridge`; the
//! transport behind it (webview channel, JS callbacks, a test recorder) is
//! the host's business.

use serde::Serialize;
use vg_core::kurbo::Rect;
use vg_core::{NodeIndex, SceneGraph};

/// Outbound notifications. All methods default to no-ops.
pub trait HostBridge {
    /// The eyedropper sampled `hex` (lowercase `#rrggbb`).
    fn on_color_picked(&mut self, _hex: &str) {}

    /// The selection changed.
    fn on_selection_changed(&mut self, _summary: &SelectionSummary) {}

    /// A `loadDocument` request completed.
    fn on_document_loaded(&mut self, _ok: bool) {}
}

/// Bridge that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBridge;

impl HostBridge for NoopBridge {}

/// Payload of `onSelectionChanged`: the first selected item's style, or an
/// empty object when nothing is selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl SelectionSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count.is_none()
    }

    /// Summary for a selection of `count` items whose first member is `first`.
    pub fn describe(graph: &SceneGraph, first: NodeIndex, first_id: String, count: usize) -> Self {
        let node = &graph.graph[first];
        Self {
            count: Some(count),
            id: Some(first_id),
            fill_color: node.style.fill.map(|c| c.to_hex()),
            stroke_color: node.style.stroke.map(|c| c.to_hex()),
            stroke_width: Some(node.style.stroke_width),
            opacity: Some(node.style.opacity),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Item bounds as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<Rect> for Bounds {
    fn from(r: Rect) -> Self {
        Self {
            x: r.x0,
            y: r.y0,
            width: r.width(),
            height: r.height(),
        }
    }
}

/// One entry of `getSelectedElementsInfo`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub bounds: Option<Bounds>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
}

/// Target of `applyColorToSelection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Fill,
    Stroke,
    Both,
}

impl ColorMode {
    /// Case-insensitive; anything unrecognised means `Fill`.
    pub fn parse_lenient(mode: &str) -> Self {
        match mode.trim().to_ascii_lowercase().as_str() {
            "stroke" => ColorMode::Stroke,
            "both" => ColorMode::Both,
            "fill" => ColorMode::Fill,
            other => {
                log::debug!("unknown color mode {other:?}, using fill");
                ColorMode::Fill
            }
        }
    }

    pub fn fill(self) -> bool {
        matches!(self, ColorMode::Fill | ColorMode::Both)
    }

    pub fn stroke(self) -> bool {
        matches!(self, ColorMode::Stroke | ColorMode::Both)
    }
}
