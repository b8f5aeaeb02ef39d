//! Game configuration loaded from JSON
//!
//! ```json
//! {
//!   "commands": { "left": "left", "space": "harddrop", "p": "pause" },
//!   "core": { "width": 10, "height": 20, "filename": "pieces/standard.json" },
//!   "controls": { "offset": "1", "angle": "90", "threshold": "100" }
//! }
//! ```
//!
//! Every section is optional. A relative `filename` is resolved against the
//! directory of the config file; without one the built-in tetromino set is
//! used.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fractris_core::{EngineConfig, PieceLibrary};
use fractris_types::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use serde::{Deserialize, Deserializer};

use crate::controls::ControlSettings;
use crate::keymap::Keymap;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoreSection {
    pub width: usize,
    pub height: usize,
    pub filename: Option<PathBuf>,
}

impl Default for CoreSection {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            filename: None,
        }
    }
}

/// Controls accept either strings or bare numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsSection {
    #[serde(deserialize_with = "text_or_number")]
    pub offset: String,
    #[serde(deserialize_with = "text_or_number")]
    pub angle: String,
    #[serde(deserialize_with = "text_or_number")]
    pub threshold: String,
}

impl Default for ControlsSection {
    fn default() -> Self {
        let controls = ControlSettings::default();
        Self::from(&controls)
    }
}

impl From<&ControlSettings> for ControlsSection {
    fn from(controls: &ControlSettings) -> Self {
        use crate::controls::ControlField;
        Self {
            offset: controls.text(ControlField::Offset).to_string(),
            angle: controls.text(ControlField::Angle).to_string(),
            threshold: controls.text(ControlField::Threshold).to_string(),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or a number, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub commands: HashMap<String, String>,
    pub core: CoreSection,
    pub controls: ControlsSection,
    /// Directory relative library paths are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            commands: Keymap::default_commands(),
            core: CoreSection::default(),
            controls: ControlsSection::default(),
            base_dir: None,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid game config JSON")
    }

    /// Read a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read game config {}", path.display()))?;
        let mut config = Self::from_json_str(&json)
            .with_context(|| format!("failed to parse game config {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn keymap(&self) -> Result<Keymap> {
        Keymap::from_commands(&self.commands).context("invalid commands table")
    }

    pub fn controls(&self) -> ControlSettings {
        ControlSettings::new(
            self.controls.offset.clone(),
            self.controls.angle.clone(),
            self.controls.threshold.clone(),
        )
    }

    /// Engine settings, with the threshold taken from the controls
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_size(self.core.width, self.core.height)
            .with_threshold(self.controls().threshold())
    }

    /// Where the piece library lives, if the config names one
    pub fn library_path(&self) -> Option<PathBuf> {
        let filename = self.core.filename.as_ref()?;
        match &self.base_dir {
            Some(dir) if filename.is_relative() => Some(dir.join(filename)),
            _ => Some(filename.clone()),
        }
    }

    pub fn library(&self) -> Result<PieceLibrary> {
        match self.library_path() {
            Some(path) => PieceLibrary::from_path(&path)
                .with_context(|| format!("failed to load piece library {}", path.display())),
            None => Ok(PieceLibrary::standard()),
        }
    }
}
