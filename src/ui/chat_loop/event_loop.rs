//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input, animation ticks, stream events, and directory listings all
//! arrive on one queue. The loop owns the [`App`] outright: it applies each
//! event, runs whatever [`AppCommand`] comes back, and redraws once per batch.

use std::{error::Error, time::Duration};

use ratatui::backend::Backend;
use ratatui::crossterm::event::{self, Event};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::app::{App, AppCommand, AppEvent, EventSink};
use crate::core::chat_stream::spawn_stream;
use crate::core::file_browser::list_directory;
use crate::ui::renderer::ui;

use super::lifecycle::{restore_terminal, setup_terminal};

pub const TICK_INTERVAL: Duration = Duration::from_millis(150);
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Upper bound on events applied between two redraws.
const MAX_EVENTS_PER_FRAME: usize = 256;

/// Forwards crossterm input into the queue until the loop goes away.
fn spawn_event_reader(sink: EventSink) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !sink.is_closed() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    warn!(error = %err, "Terminal poll failed");
                    break;
                }
            }
            let forwarded = match event::read() {
                Ok(Event::Key(key)) => sink.send(AppEvent::Key(key)),
                Ok(Event::Paste(text)) => sink.send(AppEvent::Paste(text)),
                Ok(Event::Resize(width, height)) => sink.send(AppEvent::Resize(width, height)),
                Ok(_) => true,
                Err(err) => {
                    debug!(error = %err, "Dropping unreadable terminal event");
                    true
                }
            };
            if !forwarded {
                break;
            }
        }
    })
}

fn spawn_ticker(sink: EventSink) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if !sink.send(AppEvent::Tick) {
                break;
            }
        }
    })
}

/// Runs a command returned by [`App::update`]. Returns `true` when the loop
/// should stop.
pub(crate) fn execute_command(app: &mut App, command: AppCommand, sink: &EventSink) -> bool {
    match command {
        AppCommand::SpawnStream(params) => {
            debug!(stream_id = params.stream_id, provider = %params.provider_id, "Spawning stream");
            spawn_stream(params, sink.clone());
            false
        }
        AppCommand::ListDirectory(path) => {
            let sink = sink.clone();
            tokio::spawn(async move {
                let result = list_directory(&path).await.map_err(|err| err.to_string());
                sink.send(AppEvent::DirectoryListed { path, result });
            });
            false
        }
        AppCommand::Quit => {
            app.cancel_stream();
            true
        }
    }
}

/// Applies queued events and redraws until a quit command comes back, then
/// hands the app back.
pub async fn drive<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut rx: mpsc::UnboundedReceiver<AppEvent>,
    sink: EventSink,
) -> Result<App, Box<dyn Error>> {
    let size = terminal.size()?;
    app.update(AppEvent::Resize(size.width, size.height));
    terminal.draw(|f| ui(f, &app))?;

    while let Some(first) = rx.recv().await {
        let mut next = Some(first);
        let mut applied = 0;
        while let Some(event) = next.take() {
            if let Some(command) = app.update(event) {
                if execute_command(&mut app, command, &sink) {
                    debug!("Quit requested");
                    return Ok(app);
                }
            }
            applied += 1;
            if applied < MAX_EVENTS_PER_FRAME {
                next = rx.try_recv().ok();
            }
        }
        terminal.draw(|f| ui(f, &app))?;
    }

    app.cancel_stream();
    Ok(app)
}

pub async fn run_chat(app: App) -> Result<(), Box<dyn Error>> {
    let mut terminal = setup_terminal()?;

    let (sink, rx) = EventSink::channel();
    spawn_event_reader(sink.clone());
    let ticker = spawn_ticker(sink.clone());

    let result = drive(&mut terminal, app, rx, sink).await;

    ticker.abort();
    restore_terminal(&mut terminal)?;
    result.map(drop)
}
