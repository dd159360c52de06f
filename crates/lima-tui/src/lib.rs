//! Terminal dashboard for Lima virtual machines.
//!
//! One UI loop owns all state; key presses map to actions, actions
//! that shell out run on background tasks, and completions come back
//! over the event channel. Workers never touch [`app::App`] directly.

pub mod actions;
pub mod app;
pub mod events;
pub mod theme;
pub mod ui;
