//! Uniform API Response Envelope
//!
//! Every endpoint responds with `{"success": true, "data": ...}` on
//! success or `{"success": false, "error": "..."}` on failure. The
//! failure side is rendered by [`crate::error::app_error::AppError`];
//! this module provides the success side.

use serde::Serialize;

/// Success envelope: `{"success": true, "data": <T>, "message"?: "..."}`
///
/// ## Examples
/// ```rust
/// use kernel::response::Envelope;
///
/// let body = serde_json::to_value(Envelope::ok(42)).unwrap();
/// assert_eq!(body["success"], true);
/// assert_eq!(body["data"], 42);
/// ```
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T> Envelope<T> {
    /// Wrap a payload
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Attach a human-readable message alongside the payload
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    /// Message-only acknowledgement, no payload
    pub fn ack(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for Envelope<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let body = serde_json::to_value(Envelope::ok(serde_json::json!({"id": 1}))).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 1);
        assert!(body.get("message").is_none());
    }

    #[test]
    fn test_ack_envelope() {
        let body = serde_json::to_value(Envelope::ack("Logged out successfully")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Logged out successfully");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_with_message() {
        let body =
            serde_json::to_value(Envelope::ok(1).with_message("Account created successfully"))
                .unwrap();
        assert_eq!(body["data"], 1);
        assert_eq!(body["message"], "Account created successfully");
    }
}
