use crate::core::file_browser::FileBrowser;
use crate::ui::theme::Theme;
use crate::utils::input::{pop_grapheme, sanitize_single_line};

/// Longest input the composer accepts, in characters.
pub const MAX_INPUT_CHARS: usize = 1000;

/// A screen the app can return to when an overlay closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseMode {
    /// Banner screen shown until the first message is sent.
    Landing,

    /// Transcript view.
    Chat,
}

/// Highlighted button in the exit dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitChoice {
    Quit,
    #[default]
    Cancel,
}

impl ExitChoice {
    pub fn toggle(self) -> Self {
        match self {
            ExitChoice::Quit => ExitChoice::Cancel,
            ExitChoice::Cancel => ExitChoice::Quit,
        }
    }
}

/// Current UI interaction mode. Overlays remember the base screen they
/// were opened from, so an overlay can never be restored into another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiMode {
    Landing,
    Chat,

    /// Command and key reference.
    Help { previous: BaseMode },

    /// Listing of the directory captured by `/p_drive`.
    FileBrowser {
        previous: BaseMode,
        browser: FileBrowser,
    },

    /// Quit confirmation dialog.
    ExitConfirm {
        previous: BaseMode,
        choice: ExitChoice,
    },
}

impl From<BaseMode> for UiMode {
    fn from(base: BaseMode) -> Self {
        match base {
            BaseMode::Landing => UiMode::Landing,
            BaseMode::Chat => UiMode::Chat,
        }
    }
}

impl UiMode {
    /// The base screen: the mode itself, or the one an overlay covers.
    pub fn base(&self) -> BaseMode {
        match self {
            UiMode::Landing => BaseMode::Landing,
            UiMode::Chat => BaseMode::Chat,
            UiMode::Help { previous }
            | UiMode::FileBrowser { previous, .. }
            | UiMode::ExitConfirm { previous, .. } => *previous,
        }
    }

    pub fn is_transient(&self) -> bool {
        !matches!(self, UiMode::Landing | UiMode::Chat)
    }

    pub fn accepts_input(&self) -> bool {
        !self.is_transient()
    }
}

/// In-flight request state. At most one stream is ever active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,

    /// A background task owns the only in-flight request. `buffer` holds
    /// the fragments received so far.
    Streaming { stream_id: u64, buffer: String },
}

impl RequestState {
    pub fn is_streaming(&self) -> bool {
        matches!(self, RequestState::Streaming { .. })
    }

    /// Waiting for the first fragment.
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Streaming { buffer, .. } if buffer.is_empty())
    }

    pub fn stream_id(&self) -> Option<u64> {
        match self {
            RequestState::Streaming { stream_id, .. } => Some(*stream_id),
            RequestState::Idle => None,
        }
    }

    pub fn buffer(&self) -> &str {
        match self {
            RequestState::Streaming { buffer, .. } => buffer,
            RequestState::Idle => "",
        }
    }
}

pub struct UiState {
    pub mode: UiMode,
    pub input: String,
    pub request: RequestState,
    /// Ctrl+P toggles the provider list in the sidebar.
    pub show_providers: bool,
    pub theme_id: String,
    pub theme: Theme,
    /// Animation counter advanced by tick events.
    pub tick: u64,
    pub term_size: (u16, u16),
}

impl UiState {
    pub fn new(theme_id: String, theme: Theme) -> Self {
        Self {
            mode: UiMode::Landing,
            input: String::new(),
            request: RequestState::Idle,
            show_providers: false,
            theme_id,
            theme,
            tick: 0,
            term_size: (0, 0),
        }
    }

    pub fn enter_help(&mut self) {
        if self.mode.is_transient() {
            return;
        }
        self.mode = UiMode::Help {
            previous: self.mode.base(),
        };
    }

    pub fn enter_file_browser(&mut self, browser: FileBrowser) {
        if self.mode.is_transient() {
            return;
        }
        self.mode = UiMode::FileBrowser {
            previous: self.mode.base(),
            browser,
        };
    }

    pub fn enter_exit_confirm(&mut self) {
        if self.mode.is_transient() {
            return;
        }
        self.mode = UiMode::ExitConfirm {
            previous: self.mode.base(),
            choice: ExitChoice::default(),
        };
    }

    /// Restores the screen an overlay was opened from.
    pub fn restore_previous(&mut self) {
        self.mode = self.mode.base().into();
    }

    pub fn file_browser_mut(&mut self) -> Option<&mut FileBrowser> {
        match &mut self.mode {
            UiMode::FileBrowser { browser, .. } => Some(browser),
            _ => None,
        }
    }

    /// Inserts pasted or typed text, flattened to one line and capped at
    /// [`MAX_INPUT_CHARS`].
    pub fn insert_input(&mut self, text: &str) {
        let text = sanitize_single_line(text);
        let room = MAX_INPUT_CHARS.saturating_sub(self.input.chars().count());
        self.input.extend(text.chars().take(room));
    }

    pub fn backspace(&mut self) {
        pop_grapheme(&mut self.input);
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn toggle_providers(&mut self) {
        self.show_providers = !self.show_providers;
    }
}
