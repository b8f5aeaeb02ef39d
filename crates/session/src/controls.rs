//! Editable numeric controls
//!
//! Offset, angle and threshold are kept as the text the player typed. Reading
//! a value parses that text and falls back to a neutral default when it is
//! empty or not a usable number, so a half-typed field never stops the game.

use fractris_types::{DEFAULT_ANGLE, DEFAULT_OFFSET, DEFAULT_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlField {
    /// Cells per move step
    Offset,
    /// Degrees per rotation step
    Angle,
    /// Line-clear threshold in percent
    Threshold,
}

impl ControlField {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "offset" => Some(ControlField::Offset),
            "angle" => Some(ControlField::Angle),
            "threshold" => Some(ControlField::Threshold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlField::Offset => "offset",
            ControlField::Angle => "angle",
            ControlField::Threshold => "threshold",
        }
    }

    /// Value used when the text does not parse
    pub fn fallback(&self) -> f64 {
        match self {
            ControlField::Offset | ControlField::Angle => 0.0,
            ControlField::Threshold => DEFAULT_THRESHOLD,
        }
    }

    fn accepts(&self, value: f64) -> bool {
        match self {
            ControlField::Offset | ControlField::Angle => value.is_finite(),
            ControlField::Threshold => value.is_finite() && value >= 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSettings {
    offset: String,
    angle: String,
    threshold: String,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_OFFSET.to_string(),
            DEFAULT_ANGLE.to_string(),
            DEFAULT_THRESHOLD.to_string(),
        )
    }
}

impl ControlSettings {
    pub fn new(
        offset: impl Into<String>,
        angle: impl Into<String>,
        threshold: impl Into<String>,
    ) -> Self {
        Self {
            offset: offset.into(),
            angle: angle.into(),
            threshold: threshold.into(),
        }
    }

    pub fn text(&self, field: ControlField) -> &str {
        match field {
            ControlField::Offset => &self.offset,
            ControlField::Angle => &self.angle,
            ControlField::Threshold => &self.threshold,
        }
    }

    fn text_mut(&mut self, field: ControlField) -> &mut String {
        match field {
            ControlField::Offset => &mut self.offset,
            ControlField::Angle => &mut self.angle,
            ControlField::Threshold => &mut self.threshold,
        }
    }

    pub fn set_text(&mut self, field: ControlField, text: impl Into<String>) {
        *self.text_mut(field) = text.into();
    }

    pub fn clear(&mut self, field: ControlField) {
        self.text_mut(field).clear();
    }

    pub fn push_char(&mut self, field: ControlField, c: char) {
        self.text_mut(field).push(c);
    }

    pub fn backspace(&mut self, field: ControlField) {
        self.text_mut(field).pop();
    }

    /// Parsed value of `field`, or its fallback
    pub fn value(&self, field: ControlField) -> f64 {
        self.text(field)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| field.accepts(*v))
            .unwrap_or_else(|| field.fallback())
    }

    pub fn offset(&self) -> f64 {
        self.value(ControlField::Offset)
    }

    pub fn angle(&self) -> f64 {
        self.value(ControlField::Angle)
    }

    pub fn threshold(&self) -> f64 {
        self.value(ControlField::Threshold)
    }
}
