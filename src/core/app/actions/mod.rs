mod input;
mod streaming;

use std::path::PathBuf;

use ratatui::crossterm::event::KeyEvent;
use tokio::sync::mpsc;
use tracing::debug;

use super::App;
use crate::core::chat_stream::{StreamMessage, StreamParams};
use crate::core::file_browser::FileEntry;

pub(crate) use streaming::submit_input;

/// Everything the event loop feeds into [`App::update`], in arrival order.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Paste(String),
    Resize(u16, u16),
    Tick,
    Stream {
        stream_id: u64,
        message: StreamMessage,
    },
    DirectoryListed {
        path: PathBuf,
        result: Result<Vec<FileEntry>, String>,
    },
}

/// Producer handle for the event queue. Background tasks receive a clone at
/// spawn time and never touch app state directly.
#[derive(Clone, Debug)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Returns `false` once the event loop has gone away.
    pub fn send(&self, event: AppEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn stream(&self, stream_id: u64, message: StreamMessage) -> bool {
        self.send(AppEvent::Stream { stream_id, message })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Side effects requested by an update, executed by the event loop.
pub enum AppCommand {
    SpawnStream(StreamParams),
    ListDirectory(PathBuf),
    Quit,
}

impl std::fmt::Debug for AppCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppCommand::SpawnStream(params) => f
                .debug_struct("SpawnStream")
                .field("stream_id", &params.stream_id)
                .field("provider_id", &params.provider_id)
                .finish(),
            AppCommand::ListDirectory(path) => f.debug_tuple("ListDirectory").field(path).finish(),
            AppCommand::Quit => f.write_str("Quit"),
        }
    }
}

pub fn apply_event(app: &mut App, event: AppEvent) -> Option<AppCommand> {
    match event {
        AppEvent::Key(key) => input::handle_key(app, key),
        AppEvent::Paste(text) => {
            if app.ui.mode.accepts_input() {
                app.ui.insert_input(&text);
            }
            None
        }
        AppEvent::Resize(width, height) => {
            app.ui.term_size = (width, height);
            None
        }
        AppEvent::Tick => {
            app.ui.tick = app.ui.tick.wrapping_add(1);
            None
        }
        AppEvent::Stream { stream_id, message } => {
            streaming::handle_stream_message(app, stream_id, message);
            None
        }
        AppEvent::DirectoryListed { path, result } => {
            apply_directory_listing(app, path, result);
            None
        }
    }
}

fn apply_directory_listing(app: &mut App, path: PathBuf, result: Result<Vec<FileEntry>, String>) {
    let Some(browser) = app.ui.file_browser_mut() else {
        debug!(path = %path.display(), "Dropping listing for closed file browser");
        return;
    };
    if browser.path != path || !browser.is_loading() {
        return;
    }
    match result {
        Ok(entries) => browser.set_entries(entries),
        Err(err) => {
            app.ui.restore_previous();
            app.session.add_error(format!(
                "Error reading directory {}: {err}",
                path.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::ui_state::{BaseMode, UiMode};
    use crate::core::file_browser::FileBrowser;
    use crate::core::message::TranscriptRole;
    use crate::utils::test_utils::create_test_app;

    fn open_browser(app: &mut App, path: &str) {
        app.ui.mode = UiMode::Chat;
        app.ui.enter_file_browser(FileBrowser::loading(PathBuf::from(path)));
    }

    #[test]
    fn listing_fills_open_browser() {
        let mut app = create_test_app();
        open_browser(&mut app, "/work");
        let entries = vec![FileEntry {
            name: "src".into(),
            is_dir: true,
        }];

        app.update(AppEvent::DirectoryListed {
            path: PathBuf::from("/work"),
            result: Ok(entries.clone()),
        });

        match &app.ui.mode {
            UiMode::FileBrowser { previous, browser } => {
                assert_eq!(*previous, BaseMode::Chat);
                assert_eq!(browser.entries(), entries.as_slice());
            }
            other => panic!("expected file browser, got {other:?}"),
        }
    }

    #[test]
    fn listing_error_restores_previous_mode() {
        let mut app = create_test_app();
        open_browser(&mut app, "/work");

        app.update(AppEvent::DirectoryListed {
            path: PathBuf::from("/work"),
            result: Err("permission denied".into()),
        });

        assert_eq!(app.ui.mode, UiMode::Chat);
        let last = app.session.messages().last().expect("error notice");
        assert_eq!(last.role, TranscriptRole::AppError);
        assert!(last.content.contains("permission denied"));
    }

    #[test]
    fn late_listing_is_ignored_after_dismiss() {
        let mut app = create_test_app();
        open_browser(&mut app, "/work");
        app.ui.restore_previous();
        let before = app.session.len();

        app.update(AppEvent::DirectoryListed {
            path: PathBuf::from("/work"),
            result: Err("gone".into()),
        });

        assert_eq!(app.ui.mode, UiMode::Chat);
        assert_eq!(app.session.len(), before);
    }

    #[test]
    fn paste_is_ignored_in_overlays() {
        let mut app = create_test_app();
        app.update(AppEvent::Paste("hello\nworld".into()));
        assert_eq!(app.ui.input, "hello world");

        app.ui.enter_help();
        app.update(AppEvent::Paste("more".into()));
        assert_eq!(app.ui.input, "hello world");
    }

    #[test]
    fn ticks_and_resizes_update_ui() {
        let mut app = create_test_app();
        assert!(app.update(AppEvent::Tick).is_none());
        assert!(app.update(AppEvent::Resize(120, 40)).is_none());
        assert_eq!(app.ui.tick, 1);
        assert_eq!(app.ui.term_size, (120, 40));
    }
}
