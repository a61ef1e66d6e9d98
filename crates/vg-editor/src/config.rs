//! Session configuration.
//!
//! Parsed from an optional camelCase JSON object supplied by the host; every
//! field has a default so `{}` (or no config at all) is valid.

use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use vg_core::Viewport;

/// Smallest accepted grid spacing. Finer grids cost one line item per step.
pub const MIN_GRID_SIZE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Maximum retained undo snapshots.
    pub undo_depth: usize,
    /// Hit tolerance for select, fill and eraser.
    pub select_tolerance: f64,
    /// Hit tolerance for the eyedropper.
    pub pick_tolerance: f64,
    pub zoom_factor: f64,
    /// Reserved name of the background grid group.
    pub grid_name: String,
    pub grid_size: f64,
    pub show_grid: bool,
    /// Content of items placed by the text tool.
    pub default_text: String,
    pub text_font_size: f64,
    /// `log` level filter name (`"error"` … `"trace"`).
    pub log_level: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            undo_depth: 50,
            select_tolerance: 8.0,
            pick_tolerance: 5.0,
            zoom_factor: 1.25,
            grid_name: "grid".to_string(),
            grid_size: 20.0,
            show_grid: true,
            default_text: "Text".to_string(),
            text_font_size: 24.0,
            log_level: "info".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse from JSON. An empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_json::from_str(json).map_err(|e| EditorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn viewport(&self) -> Result<Viewport, EditorError> {
        Viewport::new(self.viewport_width, self.viewport_height).ok_or(EditorError::InvalidViewport {
            width: self.viewport_width,
            height: self.viewport_height,
        })
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        self.viewport()?;
        if self.undo_depth == 0 {
            return Err(EditorError::InvalidConfig("undoDepth must be at least 1".to_string()));
        }
        if !(self.grid_size.is_finite() && self.grid_size >= MIN_GRID_SIZE) {
            return Err(EditorError::InvalidConfig(format!(
                "gridSize must be at least {MIN_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.zoom_factor) {
            return Err(EditorError::InvalidConfig(format!(
                "zoomFactor must be positive, got {}",
                self.zoom_factor
            )));
        }
        if !positive(self.text_font_size) {
            return Err(EditorError::InvalidConfig(format!(
                "textFontSize must be positive, got {}",
                self.text_font_size
            )));
        }
        if !(self.select_tolerance >= 0.0 && self.pick_tolerance >= 0.0) {
            return Err(EditorError::InvalidConfig("tolerances must be non-negative".to_string()));
        }
        Ok(())
    }
}
