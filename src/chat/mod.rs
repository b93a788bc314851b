//! Conversation front end
//!
//! Submitted lines become chat messages in convo mode, or generated-form
//! requests in manage mode. Lines starting with `:` are meta commands and are
//! handled by the REPL instead.

mod command;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SubmitError;

pub use command::ReplCommand;

/// Reply the simulated assistant gives to every message
pub const SIMULATED_REPLY: &str = "This is a simulated response.";

/// Prompt excerpt length shown on generated forms
const EXCERPT_CHARS: usize = 50;

static OPERATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#/(\S+)").expect("operation pattern is valid"));

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Free conversation
    #[default]
    Convo,
    /// Resource management through `#/` operations
    Manage,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Convo => "convo",
            Mode::Manage => "manage",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "convo" => Ok(Mode::Convo),
            "manage" => Ok(Mode::Manage),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

/// Form generated from a manage-mode operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormRequest {
    /// First operation segment, e.g. `create`
    pub action: String,

    /// Second operation segment, `item` when absent
    pub resource: String,

    /// Pre-filled title field
    pub title: String,

    /// Start of the submitted line
    pub excerpt: String,
}

impl FormRequest {
    /// Heading shown on the form
    pub fn heading(&self) -> String {
        format!("{} {}", self.action, self.resource)
    }
}

/// What a submitted line turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Whitespace only; nothing to do
    Empty,
    /// Chat message in convo mode
    Message(String),
    /// Generated form in manage mode
    Form(FormRequest),
}

/// Interpret a submitted line
///
/// # Arguments
/// * `mode` - Current input mode
/// * `input` - Submitted text, trimmed before use
///
/// # Returns
/// * `Result<Submission, SubmitError>` - Manage mode rejects lines without a
///   `#/` operation
pub fn submit(mode: Mode, input: &str) -> Result<Submission, SubmitError> {
    let text = input.trim();
    if text.is_empty() {
        return Ok(Submission::Empty);
    }

    match mode {
        Mode::Convo => Ok(Submission::Message(text.to_string())),
        Mode::Manage => {
            let operation = OPERATION
                .captures(text)
                .and_then(|captures| captures.get(1))
                .ok_or(SubmitError::MissingOperation)?;

            let mut segments = operation.as_str().split('/');
            let action = segments.next().unwrap_or_default().to_string();
            let resource = segments
                .next()
                .filter(|segment| !segment.is_empty())
                .unwrap_or("item")
                .to_string();

            Ok(Submission::Form(FormRequest {
                title: format!("New {resource}"),
                excerpt: text.chars().take(EXCERPT_CHARS).collect(),
                action,
                resource,
            }))
        }
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Messages of the current conversation
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<Message>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user message and the simulated reply to it
    ///
    /// # Returns
    /// * `&Message` - The reply
    pub fn exchange(&mut self, content: impl Into<String>) -> &Message {
        self.messages.push(Message::new(Role::User, content));
        self.messages.push(Message::new(Role::Assistant, SIMULATED_REPLY));
        &self.messages[self.messages.len() - 1]
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_ignored() {
        assert_eq!(submit(Mode::Convo, "   "), Ok(Submission::Empty));
        assert_eq!(submit(Mode::Manage, ""), Ok(Submission::Empty));
    }

    #[test]
    fn test_convo_message_trimmed() {
        assert_eq!(
            submit(Mode::Convo, "  what is @/cards/c1 about?  "),
            Ok(Submission::Message("what is @/cards/c1 about?".to_string()))
        );
    }

    #[test]
    fn test_manage_requires_operation() {
        assert_eq!(
            submit(Mode::Manage, "make me a card"),
            Err(SubmitError::MissingOperation)
        );
        // A bare prefix has no operation path
        assert_eq!(
            submit(Mode::Manage, "#/ please"),
            Err(SubmitError::MissingOperation)
        );
    }

    #[test]
    fn test_manage_builds_form() {
        let Ok(Submission::Form(form)) = submit(Mode::Manage, "#/create/card for the weekly sync")
        else {
            panic!("expected a form");
        };

        assert_eq!(form.action, "create");
        assert_eq!(form.resource, "card");
        assert_eq!(form.title, "New card");
        assert_eq!(form.heading(), "create card");
        assert_eq!(form.excerpt, "#/create/card for the weekly sync");
    }

    #[test]
    fn test_manage_default_resource_and_excerpt() {
        let long = format!("please #/publish {}", "x".repeat(80));
        let Ok(Submission::Form(form)) = submit(Mode::Manage, &long) else {
            panic!("expected a form");
        };

        assert_eq!(form.action, "publish");
        assert_eq!(form.resource, "item");
        assert_eq!(form.excerpt.chars().count(), 50);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Manage".parse::<Mode>(), Ok(Mode::Manage));
        assert_eq!("convo".parse::<Mode>(), Ok(Mode::Convo));
        assert!("chat".parse::<Mode>().is_err());
        assert_eq!(Mode::default(), Mode::Convo);
    }

    #[test]
    fn test_chat_log_exchange() {
        let mut log = ChatLog::new();
        let reply = log.exchange("hello").clone();

        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, SIMULATED_REPLY);
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[0].role, Role::User);
        assert_ne!(log.messages()[0].id, log.messages()[1].id);
    }

    #[test]
    fn test_message_json_keeps_id() {
        let message = Message::new(Role::User, "see @/cards/c1");

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["id"], message.id.to_string());
        assert_eq!(json["role"], "user");

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, message);
    }
}
