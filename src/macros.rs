/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.error_message, None)
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.selected_network, None;
///     model.connection_details, String::new()
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

// Re-export http_helpers functions for macro use
pub use crate::http_helpers::{
    build_url, map_transport_error, parse_json_response, process_envelope_response,
    process_json_response, BASE_URL,
};

/// Macro for POST requests against the setup API with standard envelope
/// handling. Sets the loading state and renders alongside the request.
/// Requires domain parameters for event wrapping.
///
/// # Patterns
///
/// Pattern 1: Simple POST without body (envelope only)
/// ```ignore
/// api_post!(Network, NetworkEvent, model, "/api/wifi/reset", ResetResponse, "Network reset")
/// ```
///
/// Pattern 2: POST with JSON body (envelope only)
/// ```ignore
/// api_post!(Network, NetworkEvent, model, "/api/wifi/connect", JoinResponse, "Join network",
///     body_json: &request
/// )
/// ```
#[macro_export]
macro_rules! api_post {
    // Pattern 1: Simple POST without body (envelope only)
    ($domain:ident, $domain_event:ident, $model:expr, $endpoint:expr, $response_event:ident, $action:expr) => {{
        $model.start_loading();
        crux_core::Command::all([
            crux_core::render::render(),
            $crate::HttpCmd::post($crate::build_url($endpoint))
                .build()
                .then_send(|result| {
                    let event_result = $crate::process_envelope_response($action, result);
                    $crate::events::Event::$domain($crate::events::$domain_event::$response_event(
                        event_result,
                    ))
                }),
        ])
    }};

    // Pattern 2: POST with JSON body (envelope only)
    ($domain:ident, $domain_event:ident, $model:expr, $endpoint:expr, $response_event:ident, $action:expr, body_json: $body:expr) => {{
        $model.start_loading();
        match $crate::HttpCmd::post($crate::build_url($endpoint))
            .header("Content-Type", "application/json")
            .body_json($body)
        {
            Ok(builder) => crux_core::Command::all([
                crux_core::render::render(),
                builder.build().then_send(|result| {
                    let event_result = $crate::process_envelope_response($action, result);
                    $crate::events::Event::$domain($crate::events::$domain_event::$response_event(
                        event_result,
                    ))
                }),
            ]),
            Err(e) => {
                $model.set_error_and_render(format!("Failed to create {} request: {}", $action, e))
            }
        }
    }};
}

/// Quiet POST - no loading state, envelope handling only.
///
/// Used from inside the validation pipeline, where progress is reported
/// through the stage machinery rather than the global loading flag.
///
/// # Example
/// ```ignore
/// api_post_quiet!(Network, NetworkEvent, "/api/services/hotspot/shutdown",
///     ShutdownResponse, "Service transition")
/// ```
#[macro_export]
macro_rules! api_post_quiet {
    ($domain:ident, $domain_event:ident, $endpoint:expr, $response_event:ident, $action:expr) => {
        $crate::HttpCmd::post($crate::build_url($endpoint))
            .build()
            .then_send(|result| {
                let event_result = $crate::process_envelope_response($action, result);
                $crate::events::Event::$domain($crate::events::$domain_event::$response_event(
                    event_result,
                ))
            })
    };
}

/// Quiet GET expecting a typed JSON response - no loading state.
///
/// Used for status polling and the startup probe, where failures surface
/// through the caller's own state machine instead of a loading spinner.
///
/// # Example
/// ```ignore
/// api_get_quiet!(Network, NetworkEvent, "/api/wifi/status", StatusResponse,
///     "Connection status", expect_json: WifiStatus)
/// ```
#[macro_export]
macro_rules! api_get_quiet {
    ($domain:ident, $domain_event:ident, $endpoint:expr, $response_event:ident, $action:expr, expect_json: $response_type:ty) => {
        $crate::HttpCmd::get($crate::build_url($endpoint))
            .build()
            .then_send(|result| {
                let event_result: Result<$response_type, $crate::types::ApiError> =
                    $crate::process_json_response($action, result);
                $crate::events::Event::$domain($crate::events::$domain_event::$response_event(
                    event_result,
                ))
            })
    };
}
