//! The Dodgeball client: construction and fire-and-forget event tracking.
//!
//! A client instance is cheap to share across tasks: it holds only the
//! secret credential, the config, and the transport handle, none of which
//! are mutated after construction.

use tracing::debug;

use crate::config::DodgeballConfig;
use crate::error::DodgeballError;
use crate::event::EventParams;
use crate::request::{self, HeaderParams};
use crate::transport::{ApiRequest, HttpTransport, Method, Transport};

#[derive(Debug)]
pub struct Dodgeball<T: Transport = HttpTransport> {
    pub(crate) secret_key: String,
    pub(crate) config: DodgeballConfig,
    pub(crate) transport: T,
}

impl Dodgeball<HttpTransport> {
    /// Create a client with the default configuration and HTTP transport.
    pub fn new(secret_key: impl Into<String>) -> Result<Self, DodgeballError> {
        Self::with_config(secret_key, DodgeballConfig::default())
    }

    pub fn with_config(
        secret_key: impl Into<String>,
        config: DodgeballConfig,
    ) -> Result<Self, DodgeballError> {
        let transport = HttpTransport::new()?;
        Self::with_transport(secret_key, config, transport)
    }
}

impl<T: Transport> Dodgeball<T> {
    /// Create a client over a caller-supplied transport. The test suite
    /// drives the engine through a scripted transport this way.
    pub fn with_transport(
        secret_key: impl Into<String>,
        config: DodgeballConfig,
        transport: T,
    ) -> Result<Self, DodgeballError> {
        let secret_key = secret_key.into();
        if secret_key.is_empty() {
            return Err(DodgeballError::missing("secretKey", secret_key));
        }

        Ok(Self {
            secret_key,
            config,
            transport,
        })
    }

    pub fn config(&self) -> &DodgeballConfig {
        &self.config
    }

    /// Post a tracking event. Fire-and-forget: nothing beyond the success
    /// or failure of the HTTP call itself is awaited.
    pub async fn event(&self, params: EventParams) -> Result<(), DodgeballError> {
        if !self.config.is_enabled {
            debug!(
                "[track] client disabled, skipping event {}",
                params.event.event_type
            );
            return Ok(());
        }

        let headers = request::construct_api_headers(
            &self.secret_key,
            HeaderParams {
                verification_id: "",
                source_token: &params.source_token,
                customer_id: &params.user_id,
                session_id: &params.session_id,
            },
        );

        let api_request = ApiRequest {
            method: Method::Post,
            url: request::construct_api_url(&self.config, "track"),
            headers,
            body: Some(request::track_body(&params.event)),
            timeout: None,
        };

        debug!("[track] posting event {}", params.event.event_type);
        self.transport.execute(api_request).await?;

        Ok(())
    }
}
