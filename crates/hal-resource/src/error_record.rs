//! Inline error records for the tolerant call forms.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ResponseError;

/// Key used in [`ErrorRecord::messages`] for errors not tied to a field.
pub const BASE_KEY: &str = "base";

/// Failure details recorded on a resource instead of being returned as an
/// error.
///
/// Empty by default. Populated by `try_create`, `try_update` and
/// `try_create_related` when the server rejects the request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// HTTP status of the rejected request.
    pub status_code: Option<u16>,
    /// Field name to message; [`BASE_KEY`] for non-field errors.
    pub messages: BTreeMap<String, String>,
    /// Messages ready for display, in order.
    pub full_messages: Vec<String>,
}

impl ErrorRecord {
    /// Record a rejected response.
    ///
    /// The body's `message` field is preferred; otherwise the assembled
    /// error message is used.
    pub fn from_response_error(error: &ResponseError) -> Self {
        let message = error
            .body()
            .and_then(|body| body.get("message"))
            .and_then(|message| message.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.message().to_string());

        Self {
            status_code: Some(error.status()),
            messages: BTreeMap::from([(BASE_KEY.to_string(), message.clone())]),
            full_messages: vec![message],
        }
    }

    /// Whether anything was recorded.
    pub fn any(&self) -> bool {
        !self.full_messages.is_empty()
    }

    /// The non-field message, if any.
    pub fn base(&self) -> Option<&str> {
        self.messages.get(BASE_KEY).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::*;

    #[test]
    fn default_is_empty() {
        let record = ErrorRecord::default();
        assert!(!record.any());
        assert_eq!(record.base(), None);
        assert_eq!(record.status_code, None);
    }

    #[test]
    fn uses_body_message() {
        let body = json!({"error": "forbidden", "message": "Forbidden"});
        let error = ResponseError::new("403", 403, Bytes::from(body.to_string()), Some(body), None);

        let record = ErrorRecord::from_response_error(&error);
        assert!(record.any());
        assert_eq!(record.status_code, Some(403));
        assert_eq!(record.base(), Some("Forbidden"));
        assert_eq!(record.full_messages, vec!["Forbidden".to_string()]);
    }

    #[test]
    fn falls_back_to_assembled_message() {
        let error = ResponseError::new("500", 500, Bytes::from_static(b"oops"), None, None);
        let record = ErrorRecord::from_response_error(&error);
        assert_eq!(record.base(), Some("500 (oops)"));
    }
}
