//! HTTP helper functions for the Crux core
//!
//! This module extracts common response handling from the request macros
//! into debuggable, testable functions. All helpers classify failures as
//! either `ApiError::Transport` (no usable response) or
//! `ApiError::Protocol` (response arrived but reported or embodied an
//! error), which is what the validation pipeline needs to render terminal
//! messages.

use crux_http::Response;

use crate::types::{ApiError, ApiResponse};

/// Base URL for the setup API endpoints.
///
/// NOTE: This is a dummy prefix required because `crux_http` (v0.16.0-rc2)
/// requires absolute URLs and rejects relative paths
/// (`RelativeUrlWithoutBase` error). The UI shell strips this prefix before
/// sending requests via `fetch()`, making them relative to the captive
/// portal host.
pub const BASE_URL: &str = "http://relative";

/// Constructs the full address from a given endpoint.
///
/// # Example
/// ```
/// use maestro_setup_core::http_helpers::build_url;
/// let url = build_url("/api/wifi/status");
/// assert_eq!(url, "http://relative/api/wifi/status");
/// ```
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Map a failed fetch into the transport arm of the taxonomy
pub fn map_transport_error(action: &str, error: impl std::fmt::Display) -> ApiError {
    ApiError::Transport {
        detail: format!("{action}: {error}"),
    }
}

/// Parse the response body as JSON, regardless of the HTTP status code.
///
/// The setup backend reports failures inside the envelope (sometimes with a
/// 4xx/5xx status, sometimes without), so the body is authoritative. A body
/// that cannot be parsed into the expected shape is a protocol error.
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    response: &mut Response<Vec<u8>>,
) -> Result<T, ApiError> {
    match response.take_body() {
        Some(body) if !body.is_empty() => {
            serde_json::from_slice(&body).map_err(|e| ApiError::Protocol {
                detail: format!("{action}: unexpected response: {e}"),
            })
        }
        _ => Err(ApiError::Protocol {
            detail: format!(
                "{action}: empty response body (HTTP {})",
                response.status()
            ),
        }),
    }
}

/// Process a fetch result whose body is the plain `status`/`message`
/// envelope; non-success envelopes become protocol errors carrying the
/// backend's message
pub fn process_envelope_response(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<(), ApiError> {
    match result {
        Ok(mut response) => {
            parse_json_response::<ApiResponse>(action, &mut response)?.into_result(action)
        }
        Err(e) => Err(map_transport_error(action, e)),
    }
}

/// Process a fetch result into a typed JSON payload
pub fn process_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<T, ApiError> {
    match result {
        Ok(mut response) => parse_json_response(action, &mut response),
        Err(e) => Err(map_transport_error(action, e)),
    }
}

// Note: Unit tests for the Response-consuming helpers are not included
// because crux_http::Response has a private constructor. These functions
// are integration-tested through the macros that use them. The pure
// envelope conversion is tested next to ApiResponse in types/common.rs.
