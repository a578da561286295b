//! Per-category conversation history.
//!
//! Each category owns an independent, append-only message list. The only
//! in-place mutation allowed is replacing the text of the list's *last*
//! message while it is marked streaming; everything else is an append.

use std::collections::HashMap;

use tracing::debug;

use crate::core::message::Message;

/// A single category's conversation thread.
#[derive(Debug)]
pub struct Section {
    category_id: String,
    messages: Vec<Message>,
}

impl Section {
    fn new(category_id: &str, welcome: &str) -> Self {
        Self {
            category_id: category_id.to_string(),
            messages: vec![Message::bot(welcome)],
        }
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True while the tail message is an open response stream.
    pub fn has_open_stream(&self) -> bool {
        self.messages.last().is_some_and(|m| m.streaming)
    }

    fn tail_streaming_mut(&mut self) -> Option<&mut Message> {
        self.messages.last_mut().filter(|m| m.streaming)
    }
}

#[derive(Debug, Default)]
pub struct SectionStore {
    sections: HashMap<String, Section>,
}

impl SectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, category_id: &str) -> Option<&Section> {
        self.sections.get(category_id)
    }

    /// Return the category's section, creating it with a single bot welcome
    /// message the first time. Idempotent: an existing section is returned
    /// untouched, whatever its history.
    pub fn get_or_init(&mut self, category_id: &str, welcome: &str) -> &Section {
        self.sections
            .entry(category_id.to_string())
            .or_insert_with(|| Section::new(category_id, welcome))
    }

    pub fn append_user_message(&mut self, category_id: &str, text: &str) {
        let Some(section) = self.sections.get_mut(category_id) else {
            debug!(category_id, "user message for uninitialized section dropped");
            return;
        };
        section.messages.push(Message::user(text));
    }

    /// Push an empty streaming bot placeholder. Refuses when the tail is
    /// already streaming: callers must finalize one stream before starting
    /// another for the same section.
    pub fn begin_bot_stream(&mut self, category_id: &str) -> bool {
        let Some(section) = self.sections.get_mut(category_id) else {
            debug!(category_id, "stream start for uninitialized section dropped");
            return false;
        };
        if section.has_open_stream() {
            debug!(category_id, "refusing to open a second stream in one section");
            return false;
        }
        section.messages.push(Message::bot_streaming());
        true
    }

    /// Replace the streaming tail's text with newer cumulative text. A no-op
    /// when the tail is not streaming, which shields finalized history from
    /// stray late updates.
    pub fn update_streaming_text(&mut self, category_id: &str, full_text: &str) {
        let Some(message) = self
            .sections
            .get_mut(category_id)
            .and_then(Section::tail_streaming_mut)
        else {
            debug!(category_id, "streaming update without an open stream dropped");
            return;
        };
        full_text.clone_into(&mut message.content);
    }

    pub fn finalize_stream(&mut self, category_id: &str, final_text: &str) {
        let Some(message) = self
            .sections
            .get_mut(category_id)
            .and_then(Section::tail_streaming_mut)
        else {
            debug!(category_id, "finalize without an open stream dropped");
            return;
        };
        final_text.clone_into(&mut message.content);
        message.streaming = false;
    }

    /// Append a non-streaming bot message, closing any open stream for the
    /// section first so the error text never lands inside a placeholder.
    pub fn append_error_message(&mut self, category_id: &str, text: &str) {
        let Some(section) = self.sections.get_mut(category_id) else {
            debug!(category_id, "error message for uninitialized section dropped");
            return;
        };
        if let Some(open) = section.tail_streaming_mut() {
            open.streaming = false;
        }
        section.messages.push(Message::bot(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Author;

    const WELCOME: &str = "How can I assist you with vehicle-related crimes?";

    #[test]
    fn init_seeds_exactly_one_welcome_message() {
        let mut store = SectionStore::new();
        let section = store.get_or_init("vehicle crime", WELCOME);
        assert_eq!(section.messages().len(), 1);
        let welcome = &section.messages()[0];
        assert_eq!(welcome.author, Author::Bot);
        assert_eq!(welcome.content, WELCOME);
        assert!(!welcome.streaming);
    }

    #[test]
    fn reinit_leaves_existing_history_untouched() {
        let mut store = SectionStore::new();
        store.get_or_init("vehicle crime", WELCOME);
        store.append_user_message("vehicle crime", "my bike was stolen");

        let section = store.get_or_init("vehicle crime", "different welcome");
        assert_eq!(section.messages().len(), 2);
        assert_eq!(section.messages()[0].content, WELCOME);
    }

    #[test]
    fn streaming_lifecycle_replaces_then_freezes_the_tail() {
        let mut store = SectionStore::new();
        store.get_or_init("vehicle crime", WELCOME);
        store.append_user_message("vehicle crime", "my bike was stolen");

        assert!(store.begin_bot_stream("vehicle crime"));
        store.update_streaming_text("vehicle crime", "The");
        store.update_streaming_text("vehicle crime", "Theft reports");
        store.finalize_stream("vehicle crime", "Theft reports should be filed...");

        let messages = store.section("vehicle crime").unwrap().messages();
        assert_eq!(messages.len(), 3);
        let answer = &messages[2];
        assert_eq!(answer.content, "Theft reports should be filed...");
        assert!(!answer.streaming);

        // The section is frozen again: late updates change nothing.
        store.update_streaming_text("vehicle crime", "stray");
        let messages = store.section("vehicle crime").unwrap().messages();
        assert_eq!(messages[2].content, "Theft reports should be filed...");
    }

    #[test]
    fn second_stream_is_refused_while_one_is_open() {
        let mut store = SectionStore::new();
        store.get_or_init("vehicle crime", WELCOME);
        assert!(store.begin_bot_stream("vehicle crime"));
        assert!(!store.begin_bot_stream("vehicle crime"));

        let streaming_count = store
            .section("vehicle crime")
            .unwrap()
            .messages()
            .iter()
            .filter(|m| m.streaming)
            .count();
        assert_eq!(streaming_count, 1);
    }

    #[test]
    fn error_message_closes_the_open_stream() {
        let mut store = SectionStore::new();
        store.get_or_init("vehicle crime", WELCOME);
        assert!(store.begin_bot_stream("vehicle crime"));
        store.update_streaming_text("vehicle crime", "partial");

        store.append_error_message("vehicle crime", "Error connecting to the server.");

        let messages = store.section("vehicle crime").unwrap().messages();
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| !m.streaming));
        assert_eq!(messages[2].content, "Error connecting to the server.");
    }

    #[test]
    fn sections_do_not_share_state() {
        let mut store = SectionStore::new();
        store.get_or_init("vehicle crime", WELCOME);
        store.get_or_init("home security", "How can I assist you with home security tips?");

        store.append_user_message("vehicle crime", "my bike was stolen");
        assert!(store.begin_bot_stream("vehicle crime"));
        store.update_streaming_text("vehicle crime", "Theft reports");

        let other = store.section("home security").unwrap().messages();
        assert_eq!(other.len(), 1);
        assert!(!other[0].streaming);
    }

    #[test]
    fn operations_on_uninitialized_sections_are_noops() {
        let mut store = SectionStore::new();
        store.append_user_message("vehicle crime", "dropped");
        assert!(!store.begin_bot_stream("vehicle crime"));
        store.update_streaming_text("vehicle crime", "dropped");
        store.finalize_stream("vehicle crime", "dropped");
        store.append_error_message("vehicle crime", "dropped");
        assert!(store.section("vehicle crime").is_none());
    }
}
