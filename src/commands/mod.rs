mod registry;

use std::path::PathBuf;

use tracing::debug;

use crate::core::app::App;
use crate::core::file_browser::FileBrowser;
pub use registry::{all_commands, find_command, Command, CommandInvocation};

pub const COMMAND_PREFIX: char = '/';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    /// The file browser was opened for this directory and needs a listing.
    ListDirectory(PathBuf),
    Quit,
}

/// Parses and runs a slash command. Input without the prefix is left alone.
pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix(COMMAND_PREFIX) else {
        return CommandResult::Continue;
    };

    let words: Vec<&str> = rest.split_whitespace().collect();
    let Some((name, args)) = words.split_first() else {
        app.session.add_error("Empty command");
        return CommandResult::Continue;
    };

    match registry::find_command(name) {
        Some(command) => {
            debug!(command = command.name, "Running command");
            let invocation = CommandInvocation { args };
            (command.handler)(app, invocation)
        }
        None => {
            app.session.add_error(format!("Unknown command: /{name}"));
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from("Available Commands:");
    for command in all_commands() {
        help.push_str(&format!(
            "\n  {COMMAND_PREFIX}{} - {}",
            command.name, command.description
        ));
    }
    app.session.add_notice(help);
    CommandResult::Continue
}

pub(super) fn handle_sessions(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.session.add_notice("No saved sessions found.");
    CommandResult::Continue
}

pub(super) fn handle_new(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.abandon_stream();
    app.session.clear();
    app.session.add_notice("Started new session!");
    CommandResult::Continue
}

pub(super) fn handle_model(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    match invocation.first_arg() {
        Some(id) => {
            if let Err(message) = app.select_provider(id) {
                app.session.add_error(message);
            }
        }
        None => app.switch_provider(),
    }
    CommandResult::Continue
}

pub(super) fn handle_theme(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    match invocation.first_arg() {
        Some(id) => {
            if let Err(message) = app.set_theme(id) {
                app.session.add_error(message);
            }
        }
        None => app.cycle_theme(),
    }
    CommandResult::Continue
}

pub(super) fn handle_share(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.session.add_notice("Session sharing not implemented yet.");
    CommandResult::Continue
}

pub(super) fn handle_p_drive(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    if app.ui.mode.is_transient() {
        return CommandResult::Continue;
    }
    match std::env::current_dir() {
        Ok(cwd) => {
            app.ui.enter_file_browser(FileBrowser::loading(cwd.clone()));
            CommandResult::ListDirectory(cwd)
        }
        Err(err) => {
            app.session
                .add_error(format!("Error accessing current directory: {err}"));
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_exit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}
