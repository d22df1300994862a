use tracing::{debug, warn};

use super::{App, AppCommand};
use crate::commands::{process_input, CommandResult, COMMAND_PREFIX};
use crate::core::app::ui_state::{RequestState, UiMode};
use crate::core::chat_stream::StreamMessage;

pub const NO_PROVIDER_MESSAGE: &str = "No AI provider configured. Please set up API keys.";

/// Handles Enter in an input mode: commands go to the registry, anything
/// else starts a request to the active provider.
pub(crate) fn submit_input(app: &mut App) -> Option<AppCommand> {
    let text = app.ui.input.trim().to_string();
    if text.is_empty() {
        return None;
    }

    if text.starts_with(COMMAND_PREFIX) {
        app.ui.clear_input();
        return match process_input(app, &text) {
            CommandResult::Continue => None,
            CommandResult::ListDirectory(path) => Some(AppCommand::ListDirectory(path)),
            CommandResult::Quit => Some(AppCommand::Quit),
        };
    }

    if app.ui.request.is_streaming() {
        debug!("Ignoring submit while a response is streaming");
        return None;
    }

    if app.available_providers.is_empty() {
        app.session.add_error(NO_PROVIDER_MESSAGE);
        return None;
    }

    spawn_stream_for_message(app, text)
}

fn spawn_stream_for_message(app: &mut App, text: String) -> Option<AppCommand> {
    app.session.add_user_message(text);
    app.ui.clear_input();
    if app.ui.mode == UiMode::Landing {
        app.ui.mode = UiMode::Chat;
    }

    let stream_id = app.next_stream_id();
    let provider_id = app.session.active_provider().to_string();
    let params = match app.providers.prepare_stream(
        &provider_id,
        &app.credentials,
        app.session.api_messages(),
        &app.stream_settings,
        stream_id,
    ) {
        Ok(params) => params,
        Err(err) => {
            warn!(provider = %provider_id, error = %err, "Cannot start request");
            app.session.add_error(err.to_string());
            return None;
        }
    };

    app.ui.request = RequestState::Streaming {
        stream_id,
        buffer: String::new(),
    };
    app.set_stream_cancel(params.cancel_token.clone());
    Some(AppCommand::SpawnStream(params))
}

pub(super) fn handle_stream_message(app: &mut App, stream_id: u64, message: StreamMessage) {
    if app.ui.request.stream_id() != Some(stream_id) {
        debug!(stream_id, "Ignoring event from stale stream");
        return;
    }

    match message {
        StreamMessage::Chunk(content) => {
            if let RequestState::Streaming { buffer, .. } = &mut app.ui.request {
                buffer.push_str(&content);
            }
        }
        StreamMessage::End => {
            let finished = std::mem::take(&mut app.ui.request);
            app.clear_stream_cancel();
            if let RequestState::Streaming { buffer, .. } = finished {
                if !buffer.is_empty() {
                    app.session.add_ai_response(buffer);
                }
            }
        }
        StreamMessage::Error(reason) => {
            app.ui.request = RequestState::Idle;
            app.clear_stream_cancel();
            app.session.add_error(reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::actions::AppEvent;
    use crate::core::app::ui_state::BaseMode;
    use crate::core::message::TranscriptRole;
    use crate::utils::test_utils::{create_test_app, create_unconfigured_app, key, type_text};
    use ratatui::crossterm::event::KeyCode;

    fn submit(app: &mut App, text: &str) -> Option<AppCommand> {
        type_text(app, text);
        app.update(AppEvent::Key(key(KeyCode::Enter)))
    }

    fn start_stream(app: &mut App, text: &str) -> u64 {
        match submit(app, text) {
            Some(AppCommand::SpawnStream(params)) => params.stream_id,
            other => panic!("expected stream dispatch, got {other:?}"),
        }
    }

    fn deliver(app: &mut App, stream_id: u64, message: StreamMessage) {
        assert!(app
            .update(AppEvent::Stream { stream_id, message })
            .is_none());
    }

    #[test]
    fn first_message_moves_landing_to_chat() {
        let mut app = create_test_app();
        assert_eq!(app.ui.mode, UiMode::Landing);
        let before = app.session.len();

        start_stream(&mut app, "hello");

        assert_eq!(app.ui.mode, UiMode::Chat);
        assert!(app.ui.input.is_empty());
        assert!(app.ui.request.is_streaming());
        assert_eq!(app.session.len(), before + 1);
        let last = app.session.messages().last().expect("user message");
        assert_eq!(last.role, TranscriptRole::User);
        assert_eq!(last.content, "hello");
    }

    #[test]
    fn dispatch_carries_conversation_for_active_provider() {
        let mut app = create_test_app();
        let stream_id = start_stream(&mut app, "first");
        deliver(&mut app, stream_id, StreamMessage::Chunk("reply".into()));
        deliver(&mut app, stream_id, StreamMessage::End);

        type_text(&mut app, "second");
        match app.update(AppEvent::Key(key(KeyCode::Enter))) {
            Some(AppCommand::SpawnStream(params)) => {
                assert_eq!(params.provider_id, "a");
                assert_eq!(params.api_key, "key-a");
                let contents: Vec<&str> = params
                    .api_messages
                    .iter()
                    .map(|m| m.content.as_str())
                    .collect();
                assert_eq!(contents, vec!["first", "reply", "second"]);
                assert!(params.stream_id > stream_id);
            }
            other => panic!("expected stream dispatch, got {other:?}"),
        }
    }

    #[test]
    fn fragments_concatenate_into_one_response() {
        let mut app = create_test_app();
        let stream_id = start_stream(&mut app, "hello");
        let before = app.session.len();

        for fragment in ["Hel", "lo, ", "world", "!"] {
            deliver(&mut app, stream_id, StreamMessage::Chunk(fragment.into()));
        }
        assert_eq!(app.ui.request.buffer(), "Hello, world!");
        assert_eq!(app.session.len(), before);

        deliver(&mut app, stream_id, StreamMessage::End);

        assert!(!app.ui.request.is_streaming());
        assert_eq!(app.session.len(), before + 1);
        let last = app.session.messages().last().expect("response");
        assert_eq!(last.role, TranscriptRole::Assistant);
        assert_eq!(last.content, "Hello, world!");
    }

    #[test]
    fn end_without_fragments_adds_nothing() {
        let mut app = create_test_app();
        let stream_id = start_stream(&mut app, "hello");
        let before = app.session.len();

        deliver(&mut app, stream_id, StreamMessage::End);

        assert!(!app.ui.request.is_streaming());
        assert_eq!(app.session.len(), before);
    }

    #[test]
    fn submit_while_streaming_is_rejected() {
        let mut app = create_test_app();
        start_stream(&mut app, "hello");
        let before = app.session.len();

        assert!(submit(&mut app, "again").is_none());
        assert_eq!(app.session.len(), before);
        assert_eq!(app.ui.input, "again");
    }

    #[test]
    fn commands_still_run_while_streaming() {
        let mut app = create_test_app();
        start_stream(&mut app, "hello");

        assert!(matches!(submit(&mut app, "/exit"), Some(AppCommand::Quit)));
        assert!(app.ui.request.is_streaming());
    }

    #[test]
    fn new_session_mid_stream_drops_the_late_reply() {
        let mut app = create_test_app();
        let params = match submit(&mut app, "hello") {
            Some(AppCommand::SpawnStream(params)) => params,
            other => panic!("expected stream dispatch, got {other:?}"),
        };
        let stream_id = params.stream_id;

        assert!(submit(&mut app, "/new").is_none());
        assert!(params.cancel_token.is_cancelled());
        assert_eq!(app.ui.request, RequestState::Idle);

        deliver(&mut app, stream_id, StreamMessage::Chunk("answer to hello".into()));
        deliver(&mut app, stream_id, StreamMessage::End);

        let contents: Vec<(TranscriptRole, &str)> = app
            .session
            .messages()
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect();
        assert_eq!(
            contents,
            vec![(TranscriptRole::AppInfo, "Started new session!")]
        );
        assert!(app.session.api_messages().is_empty());

        // A fresh request can start right away.
        start_stream(&mut app, "again");
    }

    #[test]
    fn error_clears_streaming_and_records_notice() {
        let mut app = create_test_app();
        let stream_id = start_stream(&mut app, "hello");
        deliver(&mut app, stream_id, StreamMessage::Chunk("partial".into()));
        let before = app.session.len();

        deliver(
            &mut app,
            stream_id,
            StreamMessage::Error("HTTP 500: boom".into()),
        );

        assert_eq!(app.ui.request, RequestState::Idle);
        assert_eq!(app.session.len(), before + 1);
        let last = app.session.messages().last().expect("error");
        assert_eq!(last.role, TranscriptRole::AppError);
        assert_eq!(last.content, "HTTP 500: boom");

        // The app accepts a new submission afterwards.
        start_stream(&mut app, "retry");
    }

    #[test]
    fn events_from_stale_streams_are_ignored() {
        let mut app = create_test_app();
        let first = start_stream(&mut app, "one");
        deliver(&mut app, first, StreamMessage::End);
        let second = start_stream(&mut app, "two");
        let before = app.session.len();

        deliver(&mut app, first, StreamMessage::Chunk("late".into()));
        deliver(&mut app, first, StreamMessage::Error("late".into()));

        assert_eq!(app.ui.request.stream_id(), Some(second));
        assert_eq!(app.ui.request.buffer(), "");
        assert_eq!(app.session.len(), before);
    }

    #[test]
    fn submit_without_providers_adds_one_error() {
        let mut app = create_unconfigured_app();
        let before = app.session.len();

        assert!(submit(&mut app, "hello").is_none());

        assert_eq!(app.session.len(), before + 1);
        let last = app.session.messages().last().expect("error");
        assert_eq!(last.role, TranscriptRole::AppError);
        assert_eq!(last.content, NO_PROVIDER_MESSAGE);
        assert!(!app.ui.request.is_streaming());
        assert_eq!(app.ui.mode, UiMode::Landing);
    }

    #[test]
    fn blank_submit_does_nothing() {
        let mut app = create_test_app();
        let before = app.session.len();
        assert!(submit(&mut app, "   ").is_none());
        assert_eq!(app.session.len(), before);
        assert_eq!(app.ui.mode, UiMode::Landing);
    }

    #[test]
    fn file_browser_command_requests_listing() {
        let mut app = create_test_app();
        app.ui.mode = UiMode::Chat;

        match submit(&mut app, "/p_drive") {
            Some(AppCommand::ListDirectory(path)) => {
                assert_eq!(path, std::env::current_dir().expect("cwd"));
            }
            other => panic!("expected listing request, got {other:?}"),
        }
        assert!(matches!(
            app.ui.mode,
            UiMode::FileBrowser {
                previous: BaseMode::Chat,
                ..
            }
        ));
    }
}
