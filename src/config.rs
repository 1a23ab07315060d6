//! Client configuration.
//!
//! Covers the config surface of the remote API: base URL, API version, and
//! the enabled flag that lets integrations run in dev mode without making
//! network requests.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DodgeballError;

pub const DEFAULT_API_URL: &str = "https://api.dodgeballhq.com/";

/// Versions of the Dodgeball API this client can speak.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "v1")]
    V1,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
        }
    }

    /// Normalize a wire value. Unknown tags fall back to the current
    /// version rather than propagating an unrecognized string.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "v1" => ApiVersion::V1,
            _ => ApiVersion::V1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DodgeballConfig {
    /// Base URL of the API, always ending with a slash.
    pub api_url: String,
    pub api_version: ApiVersion,
    /// When false, `checkpoint()` and `event()` short-circuit with no
    /// network calls.
    pub is_enabled: bool,
}

impl Default for DodgeballConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: ApiVersion::V1,
            is_enabled: true,
        }
    }
}

impl DodgeballConfig {
    pub fn new(
        api_url: impl Into<String>,
        api_version: ApiVersion,
        is_enabled: bool,
    ) -> Result<Self, DodgeballError> {
        let mut api_url = api_url.into();

        Url::parse(&api_url).map_err(|e| DodgeballError::InvalidApiUrl {
            url: api_url.clone(),
            reason: e.to_string(),
        })?;

        if !api_url.ends_with('/') {
            api_url.push('/');
        }

        Ok(Self {
            api_url,
            api_version,
            is_enabled,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
