//! Shared user-facing strings.

/// Shown as a bot message in place of an answer when the backend request
/// fails for any reason. The transport detail goes to the log, not the user.
pub const CONNECTION_ERROR_TEXT: &str = "Error connecting to the server. Please try again later.";
