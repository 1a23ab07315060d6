//! Shared test harness: a scripted transport and canned request/response
//! builders for driving the checkpoint engine without a network.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use dodgeball::{
    ApiRequest, ApiResponse, ApiVersion, CheckpointEvent, CheckpointOptions, CheckpointParams,
    Dodgeball, DodgeballConfig, Transport, TransportError,
};
use serde_json::json;

/// Scripted transport: pops pre-programmed results in order and records
/// every request for later assertion.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Inner>,
}

struct Inner {
    responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<ApiResponse, TransportError>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn ok(status: u16, body: serde_json::Value) -> Result<ApiResponse, TransportError> {
        Ok(ApiResponse {
            status,
            body: body.to_string(),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.inner.responses.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.inner.requests.lock().unwrap().push(request);
        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".to_string())))
    }
}

pub fn test_client(transport: MockTransport) -> Dodgeball<MockTransport> {
    let config = DodgeballConfig::new("https://api.example.com", ApiVersion::V1, true).unwrap();
    Dodgeball::with_transport("secret_key", config, transport).unwrap()
}

pub fn disabled_client(transport: MockTransport) -> Dodgeball<MockTransport> {
    let config = DodgeballConfig::new("https://api.example.com", ApiVersion::V1, false).unwrap();
    Dodgeball::with_transport("secret_key", config, transport).unwrap()
}

/// Checkpoint parameters matching the canned requests asserted below.
pub fn checkpoint_params() -> CheckpointParams {
    CheckpointParams {
        checkpoint_name: "CHECKPOINT_NAME".to_string(),
        event: Some(CheckpointEvent::new(
            "127.0.0.1",
            json!({ "key": "value", "nested": { "key": "nestedValue" } }),
        )),
        source_token: "source_token".to_string(),
        session_id: "session_id".to_string(),
        user_id: "user_id".to_string(),
        use_verification_id: "verification_id".to_string(),
        options: CheckpointOptions::default(),
    }
}

/// A successful body carrying verification detail.
pub fn verification_body(id: &str, status: &str, outcome: &str) -> serde_json::Value {
    json!({
        "success": true,
        "errors": [],
        "version": "v1",
        "verification": { "id": id, "status": status, "outcome": outcome },
    })
}

/// A rejected body with the given errors and no verification detail.
pub fn failure_body(errors: serde_json::Value) -> serde_json::Value {
    json!({
        "success": false,
        "errors": errors,
        "version": "v1",
        "verification": null,
    })
}

pub fn header<'a>(request: &'a ApiRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
