//! Conversation orchestration across category sections.
//!
//! The manager ties the catalog, the section store, and the stream service
//! together. Callers drive it from a single task: user actions go in through
//! [`ConversationManager::switch_category`] and
//! [`ConversationManager::send_message`], and transport events come back
//! through [`ConversationManager::handle_stream_message`] in channel order.
//! Sections stay independent: a request keeps updating the section it was
//! started in, whether or not that section is still active.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::catalog::{self, GENERAL_CATEGORY_ID};
use crate::core::chat_stream::{ChatStreamService, StreamMessage, StreamParams};
use crate::core::constants::CONNECTION_ERROR_TEXT;
use crate::core::message::Message;
use crate::core::sections::{Section, SectionStore};
use crate::utils::text::strip_bold_markers;

/// The requested category id is not in the catalog.
#[derive(Debug)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl StdError for UnknownCategory {}

/// Bookkeeping for one outstanding request.
struct Flight {
    category_id: String,
    /// Fragments concatenated in arrival order.
    response: String,
    /// Whether the streaming placeholder has been opened in the section.
    started: bool,
    cancel_token: CancellationToken,
}

pub struct ConversationManager {
    client: Client,
    backend_url: String,
    streams: ChatStreamService,
    store: SectionStore,
    active_category: String,
    flights: HashMap<u64, Flight>,
    next_stream_id: u64,
}

impl ConversationManager {
    pub fn new(client: Client, backend_url: String, streams: ChatStreamService) -> Self {
        Self {
            client,
            backend_url,
            streams,
            store: SectionStore::new(),
            active_category: GENERAL_CATEGORY_ID.to_string(),
            flights: HashMap::new(),
            next_stream_id: 1,
        }
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn section(&self, category_id: &str) -> Option<&Section> {
        self.store.section(category_id)
    }

    pub fn messages(&self, category_id: &str) -> &[Message] {
        self.store
            .section(category_id)
            .map(Section::messages)
            .unwrap_or(&[])
    }

    /// True while the category has an outstanding request.
    pub fn is_pending(&self, category_id: &str) -> bool {
        self.flights
            .values()
            .any(|flight| flight.category_id == category_id)
    }

    pub fn category_for_stream(&self, stream_id: u64) -> Option<&str> {
        self.flights
            .get(&stream_id)
            .map(|flight| flight.category_id.as_str())
    }

    /// Make a category the active one, creating its section with the
    /// category's welcome message on first use. Existing history is never
    /// touched, and an in-flight stream for any section keeps running.
    pub fn switch_category(&mut self, category_id: &str) -> Result<(), UnknownCategory> {
        let category = catalog::find_category(category_id)
            .ok_or_else(|| UnknownCategory(category_id.to_string()))?;
        self.active_category = category.id.to_string();
        self.store.get_or_init(category.id, category.welcome);
        Ok(())
    }

    /// Send the user's text in the active category. Returns the stream id of
    /// the spawned request, or `None` when the input is blank or the section
    /// already has a request outstanding (a second submit is rejected, not
    /// queued).
    pub fn send_message(&mut self, text: &str) -> Option<u64> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let category_id = self.active_category.clone();
        if self.is_pending(&category_id) {
            debug!(category = %category_id, "send ignored: request already outstanding");
            return None;
        }
        let Some(category) = catalog::find_category(&category_id) else {
            debug!(category = %category_id, "active category missing from catalog");
            return None;
        };

        self.store.get_or_init(category.id, category.welcome);
        self.store.append_user_message(category.id, trimmed);

        let question = compose_question(trimmed, category.id);
        let stream_id = self.next_stream_id;
        self.next_stream_id += 1;
        let cancel_token = CancellationToken::new();

        self.flights.insert(
            stream_id,
            Flight {
                category_id: category.id.to_string(),
                response: String::new(),
                started: false,
                cancel_token: cancel_token.clone(),
            },
        );
        self.streams.spawn_stream(StreamParams {
            client: self.client.clone(),
            base_url: self.backend_url.clone(),
            question,
            cancel_token,
            stream_id,
        });

        Some(stream_id)
    }

    /// Apply one transport event to the section that started the stream.
    /// Events whose stream id is not in flight (completed, failed, or
    /// cancelled earlier) are dropped.
    pub fn handle_stream_message(&mut self, message: StreamMessage, stream_id: u64) {
        match message {
            StreamMessage::Chunk(fragment) => {
                let Some(flight) = self.flights.get_mut(&stream_id) else {
                    debug!(stream_id, "chunk for unknown stream dropped");
                    return;
                };
                if !flight.started {
                    self.store.begin_bot_stream(&flight.category_id);
                    flight.started = true;
                }
                flight.response.push_str(&fragment);
                let rendered = strip_bold_markers(&flight.response);
                self.store
                    .update_streaming_text(&flight.category_id, &rendered);
            }
            StreamMessage::End => {
                let Some(flight) = self.flights.remove(&stream_id) else {
                    debug!(stream_id, "end for unknown stream dropped");
                    return;
                };
                if !flight.started {
                    // The backend completed without sending anything; the
                    // section still gets its (empty) answer message.
                    self.store.begin_bot_stream(&flight.category_id);
                }
                let rendered = strip_bold_markers(&flight.response);
                self.store.finalize_stream(&flight.category_id, &rendered);
            }
            StreamMessage::Error(error) => {
                let Some(flight) = self.flights.remove(&stream_id) else {
                    debug!(stream_id, "error for unknown stream dropped");
                    return;
                };
                warn!(category = %flight.category_id, %error, "chat request failed");
                self.store
                    .append_error_message(&flight.category_id, CONNECTION_ERROR_TEXT);
            }
        }
    }

    /// Abort the category's outstanding request, if any. The transport task
    /// stops at its next suspension point and the partial answer (when one
    /// was started) is finalized as-is so the history is never left with an
    /// open stream. Returns whether a request was cancelled.
    pub fn cancel_stream(&mut self, category_id: &str) -> bool {
        let stream_id = self
            .flights
            .iter()
            .find(|(_, flight)| flight.category_id == category_id)
            .map(|(id, _)| *id);
        let Some(stream_id) = stream_id else {
            return false;
        };
        if let Some(flight) = self.flights.remove(&stream_id) {
            flight.cancel_token.cancel();
            if flight.started {
                let rendered = strip_bold_markers(&flight.response);
                self.store.finalize_stream(&flight.category_id, &rendered);
            }
            debug!(category = %flight.category_id, stream_id, "stream cancelled");
        }
        true
    }
}

/// Tag the outgoing question with its category. The `general` category is
/// the exception and sends the text unmodified; this asymmetry is part of
/// the backend contract.
fn compose_question(text: &str, category_id: &str) -> String {
    if category_id == GENERAL_CATEGORY_ID {
        text.to_string()
    } else {
        format!("{text} from {category_id}")
    }
}
