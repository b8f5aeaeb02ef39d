//! Session layer - keymaps, editable controls, pause and retry around an engine
//!
//! The core engine only knows how to move, rotate and place pieces. This crate
//! adds what a playable game needs on top:
//!
//! - [`config`]: game config JSON (keymap, board size, piece library, controls)
//! - [`keymap`]: key names to [`GameAction`](fractris_types::GameAction)s
//! - [`controls`]: offset / angle / threshold kept as editable text
//! - [`session`]: one running game fed by key presses and gravity ticks
//!
//! # Example
//!
//! ```
//! use fractris_session::{GameConfig, Session, Transition};
//!
//! let mut session = Session::new(GameConfig::default(), 7).unwrap();
//! session.handle_key("left");
//! session.tick();
//! assert_eq!(session.handle_key("escape"), Transition::Stay);
//! session.handle_key("p");
//! assert_eq!(session.handle_key("escape"), Transition::Menu);
//! ```

pub mod config;
pub mod controls;
pub mod keymap;
pub mod session;

pub use config::{ControlsSection, CoreSection, GameConfig};
pub use controls::{ControlField, ControlSettings};
pub use keymap::Keymap;
pub use session::{Session, Transition};
