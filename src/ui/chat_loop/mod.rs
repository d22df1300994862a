//! Interactive chat session: terminal setup, startup wiring, and the event
//! loop that feeds the [`App`](crate::core::app::App).

mod event_loop;
mod lifecycle;
mod setup;

pub use event_loop::{drive, run_chat, TICK_INTERVAL};
pub use lifecycle::{restore_terminal, setup_terminal, PukuTerminal};
pub use setup::{apply_model_overrides, bootstrap_app, StartupOverrides};
