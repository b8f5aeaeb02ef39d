//! Session - one game driven by named keys and gravity ticks
//!
//! The session owns an [`Engine`] plus everything around it that a player
//! touches: the keymap, the editable controls, pause and retry. Drivers feed
//! it key names and ticks and draw whatever [`Session::engine`] shows.

use std::path::Path;

use anyhow::{Context, Result};
use fractris_core::{Engine, EngineConfig, MoveOutcome, PieceLibrary};
use fractris_types::GameAction;

use crate::config::GameConfig;
use crate::controls::{ControlField, ControlSettings};
use crate::keymap::Keymap;

/// What the driver should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep running this game
    Stay,
    /// Leave the game and go back to the menu
    Menu,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    keymap: Keymap,
    library: PieceLibrary,
    controls: ControlSettings,
    engine: Engine,
    seed: u32,
    paused: bool,
    editing: Option<ControlField>,
}

impl Session {
    /// Start a game from an already parsed config
    pub fn new(config: GameConfig, seed: u32) -> Result<Self> {
        let library = config.library()?;
        Self::with_library(config, library, seed)
    }

    /// Start a game with an explicit piece library; the config's `filename`
    /// is ignored.
    pub fn with_library(config: GameConfig, library: PieceLibrary, seed: u32) -> Result<Self> {
        let keymap = config.keymap()?;
        let controls = config.controls();
        let engine = Self::build_engine(config.engine_config(), library.clone(), seed)?;

        eprintln!(
            "[Session] new game {}x{} with {} pieces, seed {}",
            engine.width(),
            engine.height(),
            library.len(),
            seed
        );

        Ok(Self {
            config,
            keymap,
            library,
            controls,
            engine,
            seed,
            paused: false,
            editing: None,
        })
    }

    /// Start a game from a config file
    pub fn load(path: impl AsRef<Path>, seed: u32) -> Result<Self> {
        let config = GameConfig::load(path)?;
        Self::new(config, seed)
    }

    fn build_engine(config: EngineConfig, library: PieceLibrary, seed: u32) -> Result<Engine> {
        Engine::new(config, library, seed).context("failed to start engine")
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn controls(&self) -> &ControlSettings {
        &self.controls
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.engine.game_over()
    }

    /// Control currently being typed into, if any
    pub fn editing(&self) -> Option<ControlField> {
        self.editing
    }

    /// Handle one key press by name
    pub fn handle_key(&mut self, key: &str) -> Transition {
        let action = self.keymap.action(key);

        if let (true, Some(field)) = (self.paused, self.editing) {
            if action == Some(GameAction::Pause) {
                self.set_paused(false);
            } else {
                self.edit_key(field, key);
            }
            return Transition::Stay;
        }

        let transition = match action {
            Some(action) => self.dispatch(action),
            None => Transition::Stay,
        };
        self.after_event();
        transition
    }

    /// Apply an action directly, bypassing the keymap
    pub fn apply_action(&mut self, action: GameAction) -> Transition {
        let transition = self.dispatch(action);
        self.after_event();
        transition
    }

    /// Gravity: one downward step of `offset`
    pub fn tick(&mut self) -> Option<MoveOutcome> {
        if self.paused || self.engine.game_over() {
            return None;
        }
        let outcome = self.engine.move_by(0.0, self.controls.offset());
        self.report_lock();
        self.after_event();
        Some(outcome)
    }

    /// Start typing into a control. Only possible while paused; the field's
    /// text is cleared first.
    pub fn select_control(&mut self, field: Option<ControlField>) -> bool {
        if !self.paused {
            return false;
        }
        if let Some(field) = field {
            self.controls.clear(field);
        }
        self.editing = field;
        true
    }

    /// Replace a control's text outright
    pub fn set_control(&mut self, field: ControlField, text: impl Into<String>) {
        self.controls.set_text(field, text);
    }

    /// Throw the current game away and start again with the next seed
    pub fn retry(&mut self) -> Result<()> {
        let seed = self.seed.wrapping_add(1);
        self.engine = Self::build_engine(self.config.engine_config(), self.library.clone(), seed)?;
        self.seed = seed;
        self.controls = self.config.controls();
        self.paused = false;
        self.editing = None;
        eprintln!("[Session] retry with seed {}", seed);
        Ok(())
    }

    fn dispatch(&mut self, action: GameAction) -> Transition {
        let halted = self.paused || self.engine.game_over();

        match action {
            // Quit and retry only work once play has stopped.
            GameAction::Quit | GameAction::Retry if !halted => return Transition::Stay,
            GameAction::Quit => {
                eprintln!("[Session] quit, score {}", self.engine.score());
                return Transition::Menu;
            }
            GameAction::Retry => {
                if let Err(e) = self.retry() {
                    eprintln!("[Session] retry failed: {:#}", e);
                }
                return Transition::Stay;
            }
            GameAction::Pause => {
                // After game over pause can only release a pause.
                let paused = !self.paused && !self.engine.game_over();
                self.set_paused(paused);
                return Transition::Stay;
            }
            _ => {}
        }

        if halted {
            return Transition::Stay;
        }

        let offset = self.controls.offset();
        let angle = self.controls.angle();

        match action {
            GameAction::Left => {
                self.engine.move_by(-offset, 0.0);
            }
            GameAction::Right => {
                self.engine.move_by(offset, 0.0);
            }
            GameAction::Down => {
                self.engine.move_by(0.0, offset);
            }
            GameAction::RotateCw => {
                self.engine.rotate(-angle);
            }
            GameAction::RotateCcw => {
                self.engine.rotate(angle);
            }
            GameAction::RotateCw2x => {
                self.engine.rotate(-angle * 2.0);
            }
            GameAction::RotateCcw2x => {
                self.engine.rotate(angle * 2.0);
            }
            GameAction::HardDrop => {
                self.engine.hard_drop(offset);
            }
            GameAction::Pause | GameAction::Quit | GameAction::Retry => {}
        }

        self.report_lock();
        Transition::Stay
    }

    fn report_lock(&mut self) {
        let Some(event) = self.engine.take_last_event() else {
            return;
        };
        if event.topped_out {
            eprintln!("[Session] game over, score {}", self.engine.score());
        } else if event.lines_cleared > 0 {
            eprintln!(
                "[Session] cleared {} line(s) for {} points",
                event.lines_cleared, event.points
            );
        }
    }

    fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        if !paused {
            self.editing = None;
        }
        eprintln!("[Session] {}", if paused { "paused" } else { "resumed" });
    }

    fn edit_key(&mut self, field: ControlField, key: &str) {
        match key {
            "backspace" => self.controls.backspace(field),
            "escape" | "return" => {}
            _ => {
                let mut chars = key.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    self.controls.push_char(field, c);
                }
            }
        }
    }

    /// Sync the threshold from its control and sweep full rows.
    fn after_event(&mut self) {
        if self.paused {
            return;
        }
        let threshold = self.controls.threshold();
        if threshold != self.engine.threshold() {
            if let Err(e) = self.engine.set_threshold(threshold) {
                eprintln!("[Session] keeping threshold {}: {}", self.engine.threshold(), e);
            }
        }
        self.engine.clear_lines();
    }
}
