//! Outbound request assembly: endpoint URLs, headers, and JSON payloads.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::DodgeballConfig;
use crate::event::{CheckpointEvent, TrackEvent};

pub(crate) const HEADER_SECRET_KEY: &str = "Dodgeball-Secret-Key";
pub(crate) const HEADER_VERIFICATION_ID: &str = "Dodgeball-Verification-Id";
pub(crate) const HEADER_SOURCE_TOKEN: &str = "Dodgeball-Source-Token";
pub(crate) const HEADER_CUSTOMER_ID: &str = "Dodgeball-Customer-Id";
pub(crate) const HEADER_SESSION_ID: &str = "Dodgeball-Session-Id";
pub(crate) const HEADER_REQUEST_ID: &str = "Dodgeball-Request-Id";

/// Identity values attached to a request as headers.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HeaderParams<'a> {
    pub verification_id: &'a str,
    pub source_token: &'a str,
    pub customer_id: &'a str,
    pub session_id: &'a str,
}

/// Header values are dropped when empty or the literal "null"/"undefined",
/// which loosely-typed upstream callers occasionally forward verbatim.
fn present(value: &str) -> bool {
    !value.is_empty() && value != "null" && value != "undefined"
}

pub(crate) fn construct_api_url(config: &DodgeballConfig, endpoint: &str) -> String {
    format!(
        "{}{}/{}",
        config.api_url,
        config.api_version.as_str(),
        endpoint
    )
}

pub(crate) fn construct_api_headers(
    secret_key: &str,
    params: HeaderParams<'_>,
) -> Vec<(String, String)> {
    let mut headers = vec![
        (HEADER_SECRET_KEY.to_string(), secret_key.to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ];

    if present(params.verification_id) {
        headers.push((
            HEADER_VERIFICATION_ID.to_string(),
            params.verification_id.to_string(),
        ));
    }
    if present(params.source_token) {
        headers.push((
            HEADER_SOURCE_TOKEN.to_string(),
            params.source_token.to_string(),
        ));
    }
    if present(params.customer_id) {
        headers.push((
            HEADER_CUSTOMER_ID.to_string(),
            params.customer_id.to_string(),
        ));
    }
    if present(params.session_id) {
        headers.push((
            HEADER_SESSION_ID.to_string(),
            params.session_id.to_string(),
        ));
    }

    headers
}

/// Correlation id attached to each checkpoint submit for API-side tracing.
pub(crate) fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn track_body(event: &TrackEvent) -> Value {
    let event_time = if event.event_time != 0 {
        event.event_time
    } else {
        chrono::Utc::now().timestamp()
    };

    json!({
        "type": event.event_type,
        "eventTime": event_time,
        "data": event.data,
    })
}

pub(crate) fn checkpoint_body(
    checkpoint_name: &str,
    event: &CheckpointEvent,
    sync: bool,
    timeout_ms: u64,
    webhook: &str,
) -> Value {
    json!({
        "checkpointName": checkpoint_name,
        "event": {
            "type": checkpoint_name,
            "ip": event.ip,
            "data": event.data,
        },
        "options": {
            "sync": sync,
            "timeout": timeout_ms,
            "webhook": webhook,
        },
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiVersion;

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_construct_api_url() {
        let config =
            DodgeballConfig::new("https://api.example.com", ApiVersion::V1, true).unwrap();
        assert_eq!(
            construct_api_url(&config, "checkpoint"),
            "https://api.example.com/v1/checkpoint"
        );
        assert_eq!(
            construct_api_url(&config, "verification/abc123"),
            "https://api.example.com/v1/verification/abc123"
        );
        assert_eq!(construct_api_url(&config, ""), "https://api.example.com/v1/");
    }

    #[test]
    fn test_headers_with_all_params() {
        let headers = construct_api_headers(
            "secret_key",
            HeaderParams {
                verification_id: "verification_id",
                source_token: "source_token",
                customer_id: "user_id",
                session_id: "session_id",
            },
        );

        assert_eq!(header(&headers, HEADER_SECRET_KEY), Some("secret_key"));
        assert_eq!(header(&headers, "Content-Type"), Some("application/json"));
        assert_eq!(header(&headers, HEADER_VERIFICATION_ID), Some("verification_id"));
        assert_eq!(header(&headers, HEADER_SOURCE_TOKEN), Some("source_token"));
        assert_eq!(header(&headers, HEADER_CUSTOMER_ID), Some("user_id"));
        assert_eq!(header(&headers, HEADER_SESSION_ID), Some("session_id"));
    }

    #[test]
    fn test_headers_with_no_params() {
        let headers = construct_api_headers("secret_key", HeaderParams::default());
        assert_eq!(headers.len(), 2);
        assert_eq!(header(&headers, HEADER_SECRET_KEY), Some("secret_key"));
        assert_eq!(header(&headers, "Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_headers_drop_null_and_undefined() {
        let headers = construct_api_headers(
            "secret_key",
            HeaderParams {
                verification_id: "null",
                source_token: "undefined",
                customer_id: "",
                session_id: "session_id",
            },
        );
        assert_eq!(header(&headers, HEADER_VERIFICATION_ID), None);
        assert_eq!(header(&headers, HEADER_SOURCE_TOKEN), None);
        assert_eq!(header(&headers, HEADER_CUSTOMER_ID), None);
        assert_eq!(header(&headers, HEADER_SESSION_ID), Some("session_id"));
    }

    #[test]
    fn test_checkpoint_body_shape() {
        let event = CheckpointEvent::new(
            "127.0.0.1",
            serde_json::json!({ "key": "value", "nested": { "key": "nestedValue" } }),
        );
        let body = checkpoint_body("CHECKPOINT_NAME", &event, true, 100, "");

        assert_eq!(body["checkpointName"], "CHECKPOINT_NAME");
        assert_eq!(body["event"]["type"], "CHECKPOINT_NAME");
        assert_eq!(body["event"]["ip"], "127.0.0.1");
        assert_eq!(body["event"]["data"]["nested"]["key"], "nestedValue");
        assert_eq!(body["options"]["sync"], true);
        assert_eq!(body["options"]["timeout"], 100);
        assert_eq!(body["options"]["webhook"], "");
    }

    #[test]
    fn test_track_body_defaults_event_time() {
        let event = TrackEvent::new("USER_SIGNUP", serde_json::json!({}));
        let body = track_body(&event);
        assert_eq!(body["type"], "USER_SIGNUP");
        assert!(body["eventTime"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_track_body_keeps_explicit_event_time() {
        let mut event = TrackEvent::new("USER_SIGNUP", serde_json::json!({}));
        event.event_time = 1_234_567;
        let body = track_body(&event);
        assert_eq!(body["eventTime"], 1_234_567);
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(new_request_id(), new_request_id());
    }
}
