use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{streaming, App, AppCommand};
use crate::core::app::ui_state::{ExitChoice, UiMode};

pub(super) fn handle_key(app: &mut App, key: KeyEvent) -> Option<AppCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(AppCommand::Quit);
    }

    match &app.ui.mode {
        UiMode::Landing | UiMode::Chat => handle_compose_key(app, key),
        UiMode::Help { .. } => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
                app.ui.restore_previous();
            }
            None
        }
        UiMode::FileBrowser { .. } => {
            handle_file_browser_key(app, key);
            None
        }
        UiMode::ExitConfirm { .. } => handle_exit_confirm_key(app, key),
    }
}

fn handle_compose_key(app: &mut App, key: KeyEvent) -> Option<AppCommand> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            app.ui.enter_exit_confirm();
            None
        }
        KeyCode::Enter => streaming::submit_input(app),
        KeyCode::Tab => {
            app.switch_provider();
            None
        }
        KeyCode::Char('p') if ctrl => {
            app.ui.toggle_providers();
            None
        }
        KeyCode::Backspace => {
            app.ui.backspace();
            None
        }
        KeyCode::Char('?') if app.ui.input.trim().is_empty() => {
            app.ui.clear_input();
            app.ui.enter_help();
            None
        }
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            let mut buf = [0u8; 4];
            app.ui.insert_input(c.encode_utf8(&mut buf));
            None
        }
        _ => None,
    }
}

fn handle_file_browser_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => app.ui.restore_previous(),
        KeyCode::Up => {
            if let Some(browser) = app.ui.file_browser_mut() {
                browser.move_up();
            }
        }
        KeyCode::Down => {
            if let Some(browser) = app.ui.file_browser_mut() {
                browser.move_down();
            }
        }
        _ => {}
    }
}

fn handle_exit_confirm_key(app: &mut App, key: KeyEvent) -> Option<AppCommand> {
    let UiMode::ExitConfirm { choice, .. } = &mut app.ui.mode else {
        return None;
    };
    match key.code {
        KeyCode::Left | KeyCode::Right => {
            *choice = choice.toggle();
            None
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(AppCommand::Quit),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.ui.restore_previous();
            None
        }
        KeyCode::Enter => {
            let selected = *choice;
            match selected {
                ExitChoice::Quit => Some(AppCommand::Quit),
                ExitChoice::Cancel => {
                    app.ui.restore_previous();
                    None
                }
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::actions::AppEvent;
    use crate::core::app::ui_state::BaseMode;
    use crate::core::file_browser::{FileBrowser, FileEntry};
    use crate::core::message::TranscriptRole;
    use crate::utils::test_utils::{create_test_app, ctrl, key, press, type_text};
    use std::path::PathBuf;

    #[test]
    fn typing_and_backspace_edit_input() {
        let mut app = create_test_app();
        type_text(&mut app, "héllo👋");
        assert_eq!(app.ui.input, "héllo👋");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.ui.input, "héll");
    }

    #[test]
    fn question_mark_opens_help_only_with_empty_input() {
        let mut app = create_test_app();
        app.ui.mode = UiMode::Chat;

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(
            app.ui.mode,
            UiMode::Help {
                previous: BaseMode::Chat
            }
        );
        assert!(app.ui.input.is_empty());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.ui.mode, UiMode::Chat);

        type_text(&mut app, "why?");
        assert_eq!(app.ui.mode, UiMode::Chat);
        assert_eq!(app.ui.input, "why?");
    }

    #[test]
    fn help_ignores_text_and_nested_overlays() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Char('?'));
        type_text(&mut app, "abc?");
        assert!(app.ui.input.is_empty());
        assert_eq!(
            app.ui.mode,
            UiMode::Help {
                previous: BaseMode::Landing
            }
        );

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui.mode, UiMode::Landing);
    }

    #[test]
    fn escape_opens_exit_confirm_and_cancels_back() {
        let mut app = create_test_app();
        app.ui.mode = UiMode::Chat;

        press(&mut app, KeyCode::Esc);
        assert_eq!(
            app.ui.mode,
            UiMode::ExitConfirm {
                previous: BaseMode::Chat,
                choice: ExitChoice::Cancel
            }
        );

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui.mode, UiMode::Chat);
    }

    #[test]
    fn exit_confirm_toggle_round_trips() {
        let mut app = create_test_app();
        app.ui.mode = UiMode::Chat;
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Left);
        assert!(matches!(
            app.ui.mode,
            UiMode::ExitConfirm {
                choice: ExitChoice::Quit,
                ..
            }
        ));
        press(&mut app, KeyCode::Left);
        assert!(matches!(
            app.ui.mode,
            UiMode::ExitConfirm {
                choice: ExitChoice::Cancel,
                ..
            }
        ));

        // Enter on the default choice goes back.
        assert!(app.update(AppEvent::Key(key(KeyCode::Enter))).is_none());
        assert_eq!(app.ui.mode, UiMode::Chat);
    }

    #[test]
    fn exit_confirm_yes_quits() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Esc);
        assert!(matches!(
            app.update(AppEvent::Key(key(KeyCode::Char('y')))),
            Some(AppCommand::Quit)
        ));

        let mut app = create_test_app();
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Right);
        assert!(matches!(
            app.update(AppEvent::Key(key(KeyCode::Enter))),
            Some(AppCommand::Quit)
        ));
    }

    #[test]
    fn exit_confirm_no_restores() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.ui.mode, UiMode::Landing);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut app = create_test_app();
        assert!(matches!(
            app.update(AppEvent::Key(ctrl('c'))),
            Some(AppCommand::Quit)
        ));

        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(
            app.update(AppEvent::Key(ctrl('c'))),
            Some(AppCommand::Quit)
        ));
    }

    #[test]
    fn tab_cycles_available_providers() {
        let mut app = create_test_app();
        assert_eq!(app.session.active_provider(), "a");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.session.active_provider(), "b");
        let notice = app.session.messages().last().expect("notice");
        assert_eq!(notice.role, TranscriptRole::AppInfo);
        assert!(notice.content.contains('b'));

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.session.active_provider(), "a");
    }

    #[test]
    fn ctrl_p_toggles_provider_list() {
        let mut app = create_test_app();
        app.update(AppEvent::Key(ctrl('p')));
        assert!(app.ui.show_providers);
        assert!(app.ui.input.is_empty());
        app.update(AppEvent::Key(ctrl('p')));
        assert!(!app.ui.show_providers);
    }

    #[test]
    fn file_browser_navigation_and_dismiss() {
        let mut app = create_test_app();
        let mut browser = FileBrowser::loading(PathBuf::from("/work"));
        browser.set_entries(vec![
            FileEntry {
                name: "a".into(),
                is_dir: true,
            },
            FileEntry {
                name: "b".into(),
                is_dir: false,
            },
        ]);
        app.ui.enter_file_browser(browser);

        press(&mut app, KeyCode::Down);
        match &app.ui.mode {
            UiMode::FileBrowser { browser, .. } => assert_eq!(browser.selected, 1),
            other => panic!("expected file browser, got {other:?}"),
        }

        // Text keys do not leak into the composer.
        press(&mut app, KeyCode::Char('x'));
        assert!(app.ui.input.is_empty());

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.ui.mode, UiMode::Landing);
    }

    #[test]
    fn key_release_events_are_ignored() {
        let mut app = create_test_app();
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        app.update(AppEvent::Key(release));
        assert!(app.ui.input.is_empty());
    }
}
