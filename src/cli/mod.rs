//! Command-line interface parsing and startup.
//!
//! Parses arguments, installs file logging when asked, loads the config, and
//! hands a fully built [`App`](crate::core::app::App) to the chat loop.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use crate::core::config::{path_display, Config};
use crate::ui::chat_loop::{bootstrap_app, run_chat, StartupOverrides};
use crate::utils::logging::{init_tracing, LOG_FILE_ENV};

#[derive(Parser, Debug)]
#[command(name = "puku")]
#[command(about = "A full-screen terminal chat client for OpenAI-compatible AI providers")]
#[command(
    long_about = "Puku is a full-screen terminal chat interface that streams responses from \
OpenAI-compatible providers (OpenRouter, OpenAI, Groq, DeepSeek).\n\n\
API keys:\n\
  OPENROUTER_API_KEY, OPENAI_API_KEY, GROQ_API_KEY, DEEPSEEK_API_KEY\n\
  Read from the environment or from a .env file in the working directory.\n\n\
Controls:\n\
  Enter             Send the message or run a /command\n\
  Tab               Switch provider\n\
  Ctrl+P            Toggle the provider list\n\
  ?                 Show help (with an empty input)\n\
  Esc               Close an overlay, or ask to exit\n\
  Ctrl+C            Quit immediately"
)]
pub struct Args {
    /// Provider to start with when its API key is configured
    #[arg(short = 'p', long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Built-in theme to use (puku, ocean, forest)
    #[arg(short = 't', long, value_name = "THEME")]
    pub theme: Option<String>,

    /// Dotenv file to read API keys from
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Config file to load instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write diagnostic logs to this file
    #[arg(long, value_name = "PATH", env = LOG_FILE_ENV)]
    pub debug_log: Option<PathBuf>,
}

impl Args {
    fn startup_overrides(&self) -> StartupOverrides {
        StartupOverrides {
            provider: self.provider.clone(),
            theme: self.theme.clone(),
            env_file: self.env_file.clone(),
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = args.debug_log.as_deref() {
        init_tracing(path)
            .map_err(|err| format!("Failed to open log file {}: {err}", path_display(path)))?;
    }

    let config = Config::load(args.config.as_deref())?;
    let app = bootstrap_app(&config, args.startup_overrides())?;
    run_chat(app).await
}
