//! Endpoint construction for the backend base URL.

/// Join the configured base URL and an endpoint path with exactly one slash
/// between them, whatever combination of trailing and leading slashes the two
/// inputs carry.
///
/// # Examples
///
/// ```
/// use sahayak::utils::url::endpoint_url;
///
/// assert_eq!(endpoint_url("http://127.0.0.1:5000", "chat"), "http://127.0.0.1:5000/chat");
/// assert_eq!(endpoint_url("http://127.0.0.1:5000/", "/chat"), "http://127.0.0.1:5000/chat");
/// ```
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_exactly_one_slash() {
        assert_eq!(endpoint_url("http://host", "chat"), "http://host/chat");
        assert_eq!(endpoint_url("http://host/", "chat"), "http://host/chat");
        assert_eq!(endpoint_url("http://host", "/chat"), "http://host/chat");
        assert_eq!(endpoint_url("http://host///", "chat"), "http://host/chat");
    }

    #[test]
    fn deeper_base_paths_survive() {
        assert_eq!(
            endpoint_url("https://assist.example.org/api/", "chat"),
            "https://assist.example.org/api/chat"
        );
    }
}
