//! Key mapping from key names to game actions.

use std::collections::HashMap;

use anyhow::{bail, Result};
use fractris_types::GameAction;

/// Bindings from key names (as a driver reports them, e.g. `"left"`,
/// `"space"`, `"z"`) to actions. Lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keymap {
    bindings: HashMap<String, GameAction>,
}

impl Keymap {
    /// Build from a config `commands` table. Unknown command names are an error.
    pub fn from_commands(commands: &HashMap<String, String>) -> Result<Self> {
        let mut bindings = HashMap::with_capacity(commands.len());
        for (key, command) in commands {
            let Some(action) = GameAction::from_str(command) else {
                bail!("unknown command {:?} bound to key {:?}", command, key);
            };
            bindings.insert(key.to_lowercase(), action);
        }
        Ok(Self { bindings })
    }

    /// Default bindings used when a config has no `commands` table.
    pub fn default_commands() -> HashMap<String, String> {
        [
            ("left", "left"),
            ("right", "right"),
            ("down", "down"),
            ("up", "cw"),
            ("x", "cw"),
            ("z", "ccw"),
            ("a", "cw2x"),
            ("s", "ccw2x"),
            ("space", "harddrop"),
            ("p", "pause"),
            ("escape", "quit"),
            ("r", "retry"),
        ]
        .into_iter()
        .map(|(k, c)| (k.to_string(), c.to_string()))
        .collect()
    }

    /// Action bound to `key`; unbound keys map to nothing.
    pub fn action(&self, key: &str) -> Option<GameAction> {
        self.bindings.get(&key.to_lowercase()).copied()
    }

    pub fn bind(&mut self, key: &str, action: GameAction) {
        self.bindings.insert(key.to_lowercase(), action);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
