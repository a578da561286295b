//! Payload types for the assistance backend's wire contract.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`. The answer comes back as a chunked stream of raw
/// UTF-8 text, so there is no structured response counterpart.
#[derive(Debug, Serialize)]
pub struct AskRequest {
    pub question: String,
}

/// Shape of the JSON body the backend attaches to failure responses.
#[derive(Debug, Deserialize)]
pub struct BackendErrorBody {
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_request_serializes_question_field() {
        let request = AskRequest {
            question: "my bike was stolen from vehicle crime".to_string(),
        };
        let value = serde_json::to_value(&request).expect("serializable");
        assert_eq!(
            value,
            serde_json::json!({ "question": "my bike was stolen from vehicle crime" })
        );
    }

    #[test]
    fn error_body_tolerates_missing_field() {
        let parsed: BackendErrorBody = serde_json::from_str(r#"{"error":"Chat failed"}"#).unwrap();
        assert_eq!(parsed.error.as_deref(), Some("Chat failed"));

        let parsed: BackendErrorBody = serde_json::from_str("{}").unwrap();
        assert!(parsed.error.is_none());
    }
}
