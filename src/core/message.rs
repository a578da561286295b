use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Bot,
}

impl Author {
    pub fn as_str(self) -> &'static str {
        match self {
            Author::User => "user",
            Author::Bot => "bot",
        }
    }

    pub fn is_user(self) -> bool {
        self == Author::User
    }

    pub fn is_bot(self) -> bool {
        self == Author::Bot
    }
}

/// One entry in a section's conversation history.
///
/// `content` is the current best rendering of the message: while `streaming`
/// is set it may be replaced wholesale by newer cumulative text, and once
/// `streaming` is cleared the message never changes again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub author: Author,
    pub content: String,
    pub streaming: bool,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            content: content.into(),
            streaming: false,
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            author: Author::Bot,
            content: content.into(),
            streaming: false,
        }
    }

    /// Empty bot placeholder that an open response stream fills in.
    pub fn bot_streaming() -> Self {
        Self {
            author: Author::Bot,
            content: String::new(),
            streaming: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_author_and_streaming_flag() {
        let user = Message::user("hello");
        assert!(user.author.is_user());
        assert!(!user.streaming);

        let bot = Message::bot("hi");
        assert!(bot.author.is_bot());
        assert!(!bot.streaming);

        let placeholder = Message::bot_streaming();
        assert!(placeholder.author.is_bot());
        assert!(placeholder.streaming);
        assert!(placeholder.content.is_empty());
    }

    #[test]
    fn author_round_trips_through_serde() {
        let json = serde_json::to_string(&Author::Bot).unwrap();
        assert_eq!(json, r#""bot""#);
        let back: Author = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Author::Bot);
    }
}
