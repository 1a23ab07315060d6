//! Server-side client for the Dodgeball risk-evaluation API.
//!
//! Callers submit a named checkpoint (e.g. "LOGIN", "CHECKOUT") describing
//! an action a user is attempting; the service evaluates it asynchronously
//! and returns approve, deny, or a request for further signal.
//! [`Dodgeball::checkpoint`] turns that eventually-consistent remote
//! decision into one bounded call by submitting the checkpoint and polling
//! the verification with exponential backoff. [`Dodgeball::event`] posts
//! fire-and-forget tracking events.
//!
//! ```no_run
//! use dodgeball::{CheckpointEvent, CheckpointParams, Dodgeball};
//!
//! # async fn run() -> Result<(), dodgeball::DodgeballError> {
//! let client = Dodgeball::new("secret-key")?;
//!
//! let mut params = CheckpointParams::new(
//!     "LOGIN",
//!     CheckpointEvent::new("127.0.0.1", serde_json::json!({ "user": "alice" })),
//! );
//! params.session_id = "session-id".to_string();
//!
//! let response = client.checkpoint(params).await?;
//! if response.is_allowed() {
//!     // proceed with the login
//! }
//! # Ok(())
//! # }
//! ```

mod checkpoint;
mod client;
mod config;
mod error;
mod event;
mod request;
mod response;
mod transport;

pub use checkpoint::{
    BASE_CHECKPOINT_TIMEOUT_MS, MAX_RETRY_COUNT, MAX_TIMEOUT_MS, TIMEOUT_VERIFICATION_ID,
};
pub use client::Dodgeball;
pub use config::{ApiVersion, DodgeballConfig, DEFAULT_API_URL};
pub use error::DodgeballError;
pub use event::{CheckpointEvent, CheckpointOptions, CheckpointParams, EventParams, TrackEvent};
pub use response::{
    CheckpointResponse, ErrorDetail, Verification, VerificationOutcome, VerificationStatus,
};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, Transport, TransportError,
};
