//! Fractris (workspace facade crate).
//!
//! Re-exports the workspace crates under stable paths:
//! `fractris::{core, session, types}`.

pub use fractris_core as core;
pub use fractris_session as session;
pub use fractris_types as types;
