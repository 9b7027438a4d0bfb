use serde::{Deserialize, Serialize};

/// Envelope value the backend uses to report success
pub const STATUS_SUCCESS: &str = "success";

/// Response envelope shared by all setup API endpoints
///
/// Every endpoint reports `status: "success"` on the happy path and an
/// optional human-readable `message` otherwise. HTTP status codes are not
/// authoritative; the envelope is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Convert the envelope into a step result, using the backend message
    /// when one is present
    pub fn into_result(self, action: &str) -> Result<(), ApiError> {
        if self.is_success() {
            Ok(())
        } else {
            let message = self.message.unwrap_or_else(|| "Unknown error".to_string());
            Err(ApiError::Protocol {
                detail: format!("{action} failed: {message}"),
            })
        }
    }
}

/// Failure of a single API call
///
/// `Transport` covers fetch/network failures where no usable response
/// arrived; `Protocol` covers well-formed responses that report an error or
/// bodies that do not match the expected shape. Both are terminal for the
/// step that issued the call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    Transport { detail: String },
    Protocol { detail: String },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport { detail } => write!(f, "Network error: {detail}"),
            Self::Protocol { detail } => write!(f, "{detail}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_converts_to_ok() {
        let response = ApiResponse {
            status: "success".to_string(),
            message: None,
        };
        assert!(response.into_result("Join network").is_ok());
    }

    #[test]
    fn error_envelope_uses_backend_message() {
        let response = ApiResponse {
            status: "error".to_string(),
            message: Some("Failed to connect to network".to_string()),
        };
        let err = response.into_result("Join network").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Join network failed: Failed to connect to network"
        );
    }

    #[test]
    fn error_envelope_without_message_reports_unknown() {
        let response = ApiResponse {
            status: "error".to_string(),
            message: None,
        };
        let err = response.into_result("Network reset").unwrap_err();
        assert_eq!(err.to_string(), "Network reset failed: Unknown error");
    }

    #[test]
    fn warning_status_is_not_success() {
        // Partial service shutdowns report status "warning"
        let response = ApiResponse {
            status: "warning".to_string(),
            message: Some("Some services may not have stopped cleanly".to_string()),
        };
        assert!(!response.is_success());
        assert!(response.into_result("Service transition").is_err());
    }
}
