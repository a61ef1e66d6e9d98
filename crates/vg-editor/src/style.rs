//! Current paint settings applied to newly drawn items.

use crate::error::EditorError;
use vg_core::{Color, Style};

#[derive(Debug, Clone, PartialEq)]
pub struct StyleState {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            fill: Color::rgb8(0x34, 0x98, 0xdb),
            stroke: Color::rgb8(0x2c, 0x3e, 0x50),
            stroke_width: 2.0,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
        }
    }
}

impl StyleState {
    /// Item style for a new shape: current fill and stroke.
    pub fn to_style(&self) -> Style {
        Style {
            fill: Some(self.fill_color()),
            stroke: Some(self.stroke_color()),
            stroke_width: self.stroke_width,
            opacity: 1.0,
        }
    }

    /// Fill color with the fill opacity folded into alpha.
    pub fn fill_color(&self) -> Color {
        self.fill.with_alpha(self.fill.a * self.fill_opacity as f32)
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke.with_alpha(self.stroke.a * self.stroke_opacity as f32)
    }

    pub fn set_fill(&mut self, input: &str) -> Result<(), EditorError> {
        self.fill = Color::parse(input)?;
        Ok(())
    }

    pub fn set_stroke(&mut self, input: &str) -> Result<(), EditorError> {
        self.stroke = Color::parse(input)?;
        Ok(())
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Result<(), EditorError> {
        self.stroke_width = non_negative("strokeWidth", width)?;
        Ok(())
    }

    pub fn set_fill_opacity(&mut self, opacity: f64) -> Result<(), EditorError> {
        self.fill_opacity = unit("fillOpacity", opacity)?;
        Ok(())
    }

    pub fn set_stroke_opacity(&mut self, opacity: f64) -> Result<(), EditorError> {
        self.stroke_opacity = unit("strokeOpacity", opacity)?;
        Ok(())
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, EditorError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EditorError::InvalidNumber {
            field,
            value: value.to_string(),
        })
    }
}

pub(crate) fn unit(field: &'static str, value: f64) -> Result<f64, EditorError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EditorError::InvalidNumber {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_palette() {
        let style = StyleState::default();
        assert_eq!(style.fill.to_hex(), "#3498db");
        assert_eq!(style.stroke.to_hex(), "#2c3e50");
        assert_eq!(style.stroke_width, 2.0);
    }

    #[test]
    fn malformed_color_leaves_state_untouched() {
        let mut style = StyleState::default();
        assert!(style.set_fill("#zzzzzz").is_err());
        assert_eq!(style, StyleState::default());
        style.set_fill("#FF0000").unwrap();
        assert_eq!(style.fill.to_hex(), "#ff0000");
    }

    #[test]
    fn numbers_are_validated() {
        let mut style = StyleState::default();
        assert!(style.set_stroke_width(-1.0).is_err());
        assert!(style.set_stroke_width(f64::NAN).is_err());
        assert!(style.set_fill_opacity(1.5).is_err());
        style.set_stroke_opacity(0.25).unwrap();
        assert!((style.stroke_color().a - 0.25).abs() < 1e-6);
    }
}
