//! The conversation log and the active provider record.
//!
//! `Session` is plain data: entries are appended in order and never edited
//! afterwards. The only way to remove entries is [`Session::clear`], which
//! drops all of them at once.

use crate::api::ChatMessage;
use crate::core::message::Message;

const REMINDER_OPEN: &str = "<system-reminder>";
const REMINDER_CLOSE: &str = "</system-reminder>";

#[derive(Debug, Clone)]
pub struct Session {
    messages: Vec<Message>,
    active_provider: String,
}

impl Session {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            active_provider: provider.into(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn active_provider(&self) -> &str {
        &self.active_provider
    }

    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    /// Appends a completed assistant response, trimmed and with embedded
    /// `<system-reminder>` blocks removed. A response left empty is dropped.
    pub fn add_ai_response(&mut self, text: impl Into<String>) {
        let text = text.into();
        let text = if text.contains(REMINDER_OPEN) {
            strip_system_reminders(&text)
        } else {
            text.trim().to_string()
        };
        if text.is_empty() {
            return;
        }
        self.messages.push(Message::assistant(text));
    }

    pub fn add_error(&mut self, text: impl Into<String>) {
        self.messages.push(Message::app_error(text));
    }

    pub fn add_notice(&mut self, text: impl Into<String>) {
        self.messages.push(Message::app_info(text));
    }

    /// Records `provider` as active and appends a notice naming it.
    pub fn set_provider(&mut self, provider: impl Into<String>, label: &str) {
        self.active_provider = provider.into();
        self.add_notice(format!("Switched to {label}"));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// User and assistant turns in order, as sent to a provider.
    pub fn api_messages(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .filter_map(|message| {
                message
                    .role
                    .to_api_role()
                    .map(|role| ChatMessage::new(role, message.content.clone()))
            })
            .collect()
    }
}

fn strip_system_reminders(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(REMINDER_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + REMINDER_OPEN.len()..];
        match after_open.find(REMINDER_CLOSE) {
            Some(end) => rest = &after_open[end + REMINDER_CLOSE.len()..],
            None => {
                // Unterminated block: keep the text verbatim.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}
