//! Input-side types: tracked events, checkpoint events, and the caller
//! parameters for both operations.
//!
//! Event payloads are carried as opaque `serde_json::Value` documents; the
//! client forwards them to the API unmodified and never inspects their
//! contents.

use serde_json::{Map, Value};

/// An event posted fire-and-forget to the `track` endpoint.
#[derive(Debug, Clone)]
pub struct TrackEvent {
    pub event_type: String,
    /// Seconds since the Unix epoch. Zero means "now" at submit time.
    pub event_time: i64,
    /// Arbitrary caller payload, passed through unmodified.
    pub data: Value,
}

impl Default for TrackEvent {
    fn default() -> Self {
        Self {
            event_type: String::new(),
            event_time: 0,
            data: Value::Object(Map::new()),
        }
    }
}

impl TrackEvent {
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            event_time: 0,
            data,
        }
    }
}

/// Parameters for [`Dodgeball::event`](crate::Dodgeball::event).
#[derive(Debug, Clone, Default)]
pub struct EventParams {
    pub user_id: String,
    pub session_id: String,
    pub source_token: String,
    pub event: TrackEvent,
}

/// The action under evaluation: the originating IP plus an opaque payload.
#[derive(Debug, Clone)]
pub struct CheckpointEvent {
    pub ip: String,
    pub data: Value,
}

impl CheckpointEvent {
    pub fn new(ip: impl Into<String>, data: Value) -> Self {
        Self {
            ip: ip.into(),
            data,
        }
    }
}

/// Caller-supplied polling budget and delivery options.
#[derive(Debug, Clone)]
pub struct CheckpointOptions {
    /// Forwarded to the API; never branches client-side control flow.
    pub sync: bool,
    /// Polling budget in milliseconds. Values <= 0 defer to the base poll
    /// interval and remove the wall-clock cap.
    pub timeout: i64,
    /// Optional webhook URL the service notifies on resolution.
    pub webhook: String,
}

impl Default for CheckpointOptions {
    fn default() -> Self {
        Self {
            sync: true,
            timeout: 0,
            webhook: String::new(),
        }
    }
}

/// Parameters for [`Dodgeball::checkpoint`](crate::Dodgeball::checkpoint).
///
/// `checkpoint_name`, `event` (with a non-empty `ip`), and at least one of
/// `session_id` / `source_token` are required; everything else is optional.
#[derive(Debug, Clone, Default)]
pub struct CheckpointParams {
    pub checkpoint_name: String,
    pub event: Option<CheckpointEvent>,
    pub source_token: String,
    pub session_id: String,
    pub user_id: String,
    /// A previously-issued verification id to resume, forwarded in the
    /// `Dodgeball-Verification-Id` header.
    pub use_verification_id: String,
    pub options: CheckpointOptions,
}

impl CheckpointParams {
    pub fn new(checkpoint_name: impl Into<String>, event: CheckpointEvent) -> Self {
        Self {
            checkpoint_name: checkpoint_name.into(),
            event: Some(event),
            ..Default::default()
        }
    }
}
