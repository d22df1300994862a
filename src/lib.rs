//! Puku is a full-screen terminal client for chatting with OpenAI-compatible
//! AI providers.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session transcript, provider catalog and credentials,
//!   the UI state machine, and the streaming request task.
//! - [`ui`] renders the terminal interface and runs the event loop that
//!   feeds input, ticks, and stream events into the app.
//! - [`commands`] holds the slash-command table and its handlers.
//! - [`api`] defines the chat completion payloads sent to providers.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`], which
//! loads configuration and hands off to [`ui::chat_loop`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
