use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    /// Whitespace-separated words after the command name.
    pub args: &'a [&'a str],
}

impl<'a> CommandInvocation<'a> {
    pub fn first_arg(&self) -> Option<&'a str> {
        self.args.first().copied()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        description: "show help",
        handler: super::handle_help,
    },
    Command {
        name: "sessions",
        description: "list sessions",
        handler: super::handle_sessions,
    },
    Command {
        name: "new",
        description: "start a new session",
        handler: super::handle_new,
    },
    Command {
        name: "model",
        description: "switch model (optionally by provider id)",
        handler: super::handle_model,
    },
    Command {
        name: "theme",
        description: "switch theme (optionally by name)",
        handler: super::handle_theme,
    },
    Command {
        name: "share",
        description: "shares the current session",
        handler: super::handle_share,
    },
    Command {
        name: "p_drive",
        description: "open drive to see folders",
        handler: super::handle_p_drive,
    },
    Command {
        name: "exit",
        description: "exit the app",
        handler: super::handle_exit,
    },
];
