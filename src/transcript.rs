//! Conversation transcript data model

use crate::markup::Markup;
use chrono::{DateTime, Utc};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One entry in the transcript. Immutable once created: the raw text is
/// stored as received, and assistant turns carry their display markup
/// computed at creation time.
#[derive(Debug, Clone)]
pub struct Turn {
    speaker: Speaker,
    raw_content: String,
    display_content: Option<Markup>,
    timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            raw_content: content.into(),
            display_content: None,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, display: Markup) -> Self {
        Self {
            speaker: Speaker::Assistant,
            raw_content: content.into(),
            display_content: Some(display),
            timestamp: Utc::now(),
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    /// Display markup for assistant turns; `None` for user turns.
    pub fn display_content(&self) -> Option<&Markup> {
        self.display_content.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Ordered, append-only sequence of turns. There is no removal or
/// reordering API; turns stay in creation order for the whole session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    /// Append an assistant turn with its cached display markup
    pub fn push_assistant(&mut self, content: impl Into<String>, display: Markup) {
        self.turns.push(Turn::assistant(content, display));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;

    #[test]
    fn turns_keep_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push_user("first");
        transcript.push_assistant("second", markup::format("second"));
        transcript.push_user("third");

        let raw: Vec<&str> = transcript.turns().iter().map(|t| t.raw_content()).collect();
        assert_eq!(raw, vec!["first", "second", "third"]);
    }

    #[test]
    fn user_turns_have_no_display_content() {
        let turn = Turn::user("hello");
        assert_eq!(turn.speaker(), Speaker::User);
        assert!(turn.display_content().is_none());
    }

    #[test]
    fn assistant_turns_cache_display_content() {
        let turn = Turn::assistant("**hi**", markup::format("**hi**"));
        assert_eq!(turn.speaker(), Speaker::Assistant);
        assert!(turn.display_content().is_some());
        assert_eq!(turn.raw_content(), "**hi**");
    }
}
