//! Checkpoint evaluation: the submit / poll / classify engine.
//!
//! `checkpoint()` converts the remote service's eventually-consistent
//! decision into a single bounded call: it POSTs the checkpoint, then polls
//! the verification endpoint with exponential backoff until the decision
//! resolves, the caller's budget runs out, or the failure cap is hit.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::client::Dodgeball;
use crate::config::ApiVersion;
use crate::error::DodgeballError;
use crate::event::CheckpointParams;
use crate::request::{self, HeaderParams};
use crate::response::{
    CheckpointResponse, ErrorDetail, Verification, VerificationOutcome, VerificationStatus,
    WireCheckpointBody,
};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// Initial poll interval, and the threshold unit for deciding whether a
/// caller timeout is short enough to satisfy with a single wait.
pub const BASE_CHECKPOINT_TIMEOUT_MS: u64 = 100;
/// Backoff ceiling: the interval between polls never exceeds this.
pub const MAX_TIMEOUT_MS: u64 = 10_000;
/// Cap on submit attempts and on consecutive poll failures.
pub const MAX_RETRY_COUNT: u32 = 3;

/// Verification id reported when retries were exhausted before the API
/// ever answered.
pub const TIMEOUT_VERIFICATION_ID: &str = "DODGEBALL_TIMEOUT";

/// Double the poll interval, never exceeding the ceiling.
pub(crate) fn next_interval(current_ms: u64) -> u64 {
    (current_ms * 2).min(MAX_TIMEOUT_MS)
}

fn is_timeout_message(message: &str) -> bool {
    message.contains("timed out")
}

impl<T: Transport> Dodgeball<T> {
    /// Submit a checkpoint for evaluation and wait for its resolution.
    ///
    /// Returns `Err` only for missing required input; every other failure
    /// mode (transport errors, server rejections, retry exhaustion,
    /// timeouts) is reported as data on the returned `CheckpointResponse`.
    pub async fn checkpoint(
        &self,
        params: CheckpointParams,
    ) -> Result<CheckpointResponse, DodgeballError> {
        if params.checkpoint_name.is_empty() {
            return Err(DodgeballError::missing("checkpointName", ""));
        }
        let event = params
            .event
            .as_ref()
            .ok_or_else(|| DodgeballError::missing("event", ""))?;
        if event.ip.is_empty() {
            return Err(DodgeballError::missing("event.ip", ""));
        }
        if params.session_id.is_empty() && params.source_token.is_empty() {
            return Err(DodgeballError::missing("sessionId or sourceToken", ""));
        }

        if !self.config.is_enabled {
            debug!(
                "[checkpoint] client disabled, approving {} without evaluation",
                params.checkpoint_name
            );
            return Ok(CheckpointResponse::disabled());
        }

        let requested_timeout = params.options.timeout;
        let trivial_timeout = requested_timeout <= 0;
        let large_timeout = requested_timeout > 5 * BASE_CHECKPOINT_TIMEOUT_MS as i64;
        // A trivial or long budget means the engine polls; a short positive
        // budget is satisfied with one request that waits the whole budget.
        let must_poll = trivial_timeout || large_timeout;
        let mut active_interval_ms = if must_poll {
            BASE_CHECKPOINT_TIMEOUT_MS
        } else {
            requested_timeout as u64
        };

        // ====================================================================
        // Submit phase
        // ====================================================================

        let submit_url = request::construct_api_url(&self.config, "checkpoint");
        let submit_body = request::checkpoint_body(
            &params.checkpoint_name,
            event,
            params.options.sync,
            active_interval_ms,
            &params.options.webhook,
        );
        let header_params = HeaderParams {
            verification_id: &params.use_verification_id,
            source_token: &params.source_token,
            customer_id: &params.user_id,
            session_id: &params.session_id,
        };
        let request_timeout = Duration::from_millis(active_interval_ms);

        let mut last_response: Option<ApiResponse> = None;
        let mut decoded: Option<WireCheckpointBody> = None;
        let mut deferred_error: Option<ErrorDetail> = None;
        let mut attempts = 0u32;

        while attempts < MAX_RETRY_COUNT && !decoded.as_ref().map(|b| b.success).unwrap_or(false) {
            let mut headers = request::construct_api_headers(&self.secret_key, header_params);
            headers.push((
                request::HEADER_REQUEST_ID.to_string(),
                request::new_request_id(),
            ));

            let api_request = ApiRequest {
                method: Method::Post,
                url: submit_url.clone(),
                headers,
                body: Some(submit_body.clone()),
                timeout: Some(request_timeout),
            };

            match self.transport.execute(api_request).await {
                Ok(response) => {
                    decoded = serde_json::from_str(&response.body).ok();
                    last_response = Some(response);
                }
                Err(err) => {
                    warn!(
                        "[checkpoint] submit attempt {} of {} failed: {}",
                        attempts + 1,
                        MAX_RETRY_COUNT,
                        err
                    );
                    deferred_error = Some(ErrorDetail {
                        code: 500,
                        message: err.to_string(),
                    });
                }
            }

            attempts += 1;
        }

        let response = match last_response {
            Some(response) => response,
            None => {
                // Never got an HTTP response; classify the captured error.
                let err = deferred_error.unwrap_or(ErrorDetail {
                    code: 500,
                    message: "Unknown evaluation error".to_string(),
                });
                if is_timeout_message(&err.message) {
                    return Ok(CheckpointResponse::timeout(TIMEOUT_VERIFICATION_ID));
                }
                return Ok(CheckpointResponse::error(err.code, err.message));
            }
        };

        if !response.is_ok() {
            return Ok(CheckpointResponse::error(
                response.status as i64,
                response.reason(),
            ));
        }

        let body = match decoded {
            Some(body) => body,
            None => return Ok(CheckpointResponse::error(500, "Unknown evaluation error")),
        };

        if !body.success {
            return Ok(CheckpointResponse {
                success: false,
                errors: body.error_details(),
                version: ApiVersion::from_wire(body.version.as_deref().unwrap_or("")),
                verification: Verification::from_wire(body.verification.as_ref()),
                is_timeout: false,
            });
        }

        // ====================================================================
        // Poll phase
        // ====================================================================

        let mut verification = Verification::from_wire(body.verification.as_ref());
        let verification_id = verification.id.clone();
        let mut resolved = verification.status != VerificationStatus::Pending;

        let poll_url = request::construct_api_url(
            &self.config,
            &format!("verification/{}", verification_id),
        );

        // The caller's timeout is honored as a best-effort wall-clock cap,
        // checked only at iteration boundaries. A trivial budget removes
        // the cap and polls until resolution or the failure cap.
        let budget = Duration::from_millis(requested_timeout.max(0) as u64);
        let started = Instant::now();

        // Distinct counters: failures bound the retries, repeats only count
        // successful polls inside the caller's budget window.
        let mut num_failures = 0u32;
        let mut num_repeats = 0u32;
        let mut last_errors: Vec<ErrorDetail> = Vec::new();

        while (trivial_timeout || started.elapsed() < budget)
            && !resolved
            && num_failures < MAX_RETRY_COUNT
        {
            sleep(Duration::from_millis(active_interval_ms)).await;
            active_interval_ms = next_interval(active_interval_ms);

            let api_request = ApiRequest {
                method: Method::Get,
                url: poll_url.clone(),
                headers: request::construct_api_headers(&self.secret_key, header_params),
                body: None,
                timeout: None,
            };

            match self.transport.execute(api_request).await {
                Ok(response) => match serde_json::from_str::<WireCheckpointBody>(&response.body) {
                    Ok(poll_body) if poll_body.success => {
                        let status = poll_body
                            .verification
                            .as_ref()
                            .and_then(|v| v.status.as_deref())
                            .unwrap_or("");
                        if status.is_empty() {
                            num_failures += 1;
                        } else {
                            resolved = status != VerificationStatus::Pending.as_str();
                            num_repeats += 1;
                            verification = Verification::from_wire(poll_body.verification.as_ref());
                            debug!(
                                "[checkpoint] poll {} for {}: status {}",
                                num_repeats, verification_id, status
                            );
                        }
                    }
                    Ok(poll_body) => {
                        last_errors = poll_body.error_details();
                        num_failures += 1;
                    }
                    Err(_) => {
                        num_failures += 1;
                    }
                },
                Err(err) => {
                    warn!("[checkpoint] poll for {} failed: {}", verification_id, err);
                    last_errors = vec![ErrorDetail {
                        code: 500,
                        message: err.to_string(),
                    }];
                    num_failures += 1;
                }
            }
        }

        if num_failures >= MAX_RETRY_COUNT {
            let timed_out = last_errors.iter().any(|e| is_timeout_message(&e.message));
            if timed_out || last_errors.is_empty() {
                return Ok(CheckpointResponse::timeout(verification_id));
            }
            return Ok(CheckpointResponse {
                success: false,
                errors: last_errors,
                version: ApiVersion::V1,
                verification: Verification {
                    id: verification_id,
                    status: VerificationStatus::Failed,
                    outcome: VerificationOutcome::Error,
                },
                is_timeout: false,
            });
        }

        Ok(CheckpointResponse {
            success: true,
            errors: Vec::new(),
            version: ApiVersion::V1,
            verification,
            is_timeout: false,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
