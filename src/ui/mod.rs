//! Terminal UI layer for interactive chat sessions.
//!
//! Rendering is a pure function of [`crate::core::app::App`]: [`renderer`]
//! draws the base screen and [`overlays`] draws help, the file browser and
//! the exit dialog on top of it. [`chat_loop`] owns the terminal and the
//! event queue that drives the app.

pub mod builtin_themes;
pub mod chat_loop;
pub mod layout;
pub mod overlays;
pub mod renderer;
pub mod theme;
