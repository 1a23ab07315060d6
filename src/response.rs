//! Verification results and the checkpoint response returned to callers.
//!
//! A `CheckpointResponse` is the sole output of checkpoint evaluation:
//! constructed once, returned, never mutated. The six predicates project
//! it onto "what should the caller do" without any further I/O.

use serde::{Deserialize, Serialize};

use crate::config::ApiVersion;

/// Where the remote decision is in its lifecycle. `Pending` and `Blocked`
/// are non-terminal; `Complete` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Blocked,
    Complete,
    Failed,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "PENDING",
            VerificationStatus::Blocked => "BLOCKED",
            VerificationStatus::Complete => "COMPLETE",
            VerificationStatus::Failed => "FAILED",
        }
    }

    /// Normalize a wire value; unknown tags become `Failed`.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "PENDING" => VerificationStatus::Pending,
            "BLOCKED" => VerificationStatus::Blocked,
            "COMPLETE" => VerificationStatus::Complete,
            _ => VerificationStatus::Failed,
        }
    }
}

/// The actual decision once a status is (or isn't yet) terminal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationOutcome {
    Approved,
    Denied,
    #[default]
    Pending,
    Error,
}

impl VerificationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationOutcome::Approved => "APPROVED",
            VerificationOutcome::Denied => "DENIED",
            VerificationOutcome::Pending => "PENDING",
            VerificationOutcome::Error => "ERROR",
        }
    }

    /// Normalize a wire value; unknown tags become `Error`.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "APPROVED" => VerificationOutcome::Approved,
            "DENIED" => VerificationOutcome::Denied,
            "PENDING" => VerificationOutcome::Pending,
            _ => VerificationOutcome::Error,
        }
    }
}

/// One remote evaluation instance. Each polling step produces a fresh
/// value; nothing updates a `Verification` in place.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Verification {
    pub id: String,
    pub status: VerificationStatus,
    pub outcome: VerificationOutcome,
}

impl Verification {
    /// Rebuild a verification from a wire payload. Missing detail falls
    /// back to `Failed`/`Error` rather than an unresolved default.
    pub(crate) fn from_wire(wire: Option<&WireVerification>) -> Self {
        let id = wire
            .and_then(|v| v.id.clone())
            .unwrap_or_default();
        let status = match wire.and_then(|v| v.status.as_deref()) {
            Some(status) if !status.is_empty() => VerificationStatus::from_wire(status),
            _ => VerificationStatus::Failed,
        };
        let outcome = match wire.and_then(|v| v.outcome.as_deref()) {
            Some(outcome) if !outcome.is_empty() => VerificationOutcome::from_wire(outcome),
            _ => VerificationOutcome::Error,
        };
        Self {
            id,
            status,
            outcome,
        }
    }
}

/// A server-declared or transport-captured error, opaque to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: i64,
    pub message: String,
}

/// Terminal artifact of a checkpoint evaluation.
///
/// Invariant: `success == false` whenever `errors` is non-empty or the
/// verification denotes an error, and `is_timeout == true` implies
/// `success == false`.
#[derive(Debug, Clone)]
pub struct CheckpointResponse {
    pub success: bool,
    pub errors: Vec<ErrorDetail>,
    pub version: ApiVersion,
    pub verification: Verification,
    pub is_timeout: bool,
}

impl CheckpointResponse {
    /// Generic error response, used when a request never produced a usable
    /// body.
    pub(crate) fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![ErrorDetail {
                code,
                message: message.into(),
            }],
            version: ApiVersion::V1,
            verification: Verification {
                id: String::new(),
                status: VerificationStatus::Failed,
                outcome: VerificationOutcome::Error,
            },
            is_timeout: false,
        }
    }

    /// Timeout response carrying the synthetic 503 and the id of the
    /// verification that was in flight, if any.
    pub(crate) fn timeout(verification_id: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![ErrorDetail {
                code: 503,
                message: "Service Unavailable: Maximum retry count exceeded".to_string(),
            }],
            version: ApiVersion::V1,
            verification: Verification {
                id: verification_id.into(),
                status: VerificationStatus::Failed,
                outcome: VerificationOutcome::Error,
            },
            is_timeout: true,
        }
    }

    /// Synthetic approval returned when the client is administratively
    /// disabled; no network call was made.
    pub(crate) fn disabled() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            version: ApiVersion::V1,
            verification: Verification {
                id: "DISABLED".to_string(),
                status: VerificationStatus::Complete,
                outcome: VerificationOutcome::Approved,
            },
            is_timeout: false,
        }
    }

    /// The verification is still in flight (pending or blocked on further
    /// signal).
    pub fn is_running(&self) -> bool {
        self.success
            && matches!(
                self.verification.status,
                VerificationStatus::Pending | VerificationStatus::Blocked
            )
    }

    /// The action was evaluated and approved.
    pub fn is_allowed(&self) -> bool {
        self.success
            && self.verification.status == VerificationStatus::Complete
            && self.verification.outcome == VerificationOutcome::Approved
    }

    /// The action was evaluated and denied.
    pub fn is_denied(&self) -> bool {
        self.success && self.verification.outcome == VerificationOutcome::Denied
    }

    /// The evaluation completed without reaching a decision. Distinct from
    /// both approval and denial.
    pub fn is_undecided(&self) -> bool {
        self.success
            && self.verification.status == VerificationStatus::Complete
            && self.verification.outcome == VerificationOutcome::Pending
    }

    /// The evaluation failed or the server declared errors. May overlap
    /// with `is_timeout()` by construction.
    pub fn has_error(&self) -> bool {
        !self.success
            && ((self.verification.status == VerificationStatus::Failed
                && self.verification.outcome == VerificationOutcome::Error)
                || !self.errors.is_empty())
    }

    /// The evaluation gave up after exhausting its retry budget on
    /// timeout-shaped failures.
    pub fn is_timeout(&self) -> bool {
        !self.success && self.is_timeout
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Verification detail as the API spells it; every field may be absent.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireVerification {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
}

/// The API reports errors either as bare strings or as `{code, message}`
/// objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireError {
    Message(String),
    Detail {
        #[serde(default)]
        code: Option<i64>,
        #[serde(default)]
        message: Option<String>,
    },
}

impl WireError {
    pub fn into_detail(self) -> ErrorDetail {
        match self {
            WireError::Message(message) => ErrorDetail { code: 0, message },
            WireError::Detail { code, message } => ErrorDetail {
                code: code.unwrap_or(0),
                message: message.unwrap_or_default(),
            },
        }
    }
}

/// Response body shared by the checkpoint and verification endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireCheckpointBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<WireError>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub verification: Option<WireVerification>,
}

impl WireCheckpointBody {
    pub fn error_details(&self) -> Vec<ErrorDetail> {
        self.errors.iter().cloned().map(WireError::into_detail).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
