//! Device identity lookup used to stamp bot predicates after a brain load.
//!
//! The lookup is a seam ([`IdentitySource`]) so the adapter can be exercised
//! without a live device registry. Failures are expected and recoverable:
//! the adapter substitutes [`DeviceIdentity::fallback`] on any error.

use crate::error::IdentityError;
use serde::{Deserialize, Serialize};

/// Env var pointing at the device registry endpoint.
const ENV_DEVICE_API_URL: &str = "AIMLBOT_DEVICE_API_URL";

/// Static fallback bot name when the identity lookup fails.
pub const DEFAULT_BOT_NAME: &str = "Mycroft";
/// Static fallback platform when the identity lookup fails.
pub const DEFAULT_BOT_PLATFORM: &str = "AI";

/// Identity record returned by the device registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub name: String,
    pub platform: String,
}

impl DeviceIdentity {
    /// The fixed default identity substituted when the lookup fails.
    pub fn fallback() -> Self {
        Self {
            name: DEFAULT_BOT_NAME.to_string(),
            platform: DEFAULT_BOT_PLATFORM.to_string(),
        }
    }
}

/// Zero-argument identity lookup.
#[async_trait::async_trait]
pub trait IdentitySource: Send + Sync {
    async fn fetch(&self) -> Result<DeviceIdentity, IdentityError>;
}

/// A fixed identity is its own source. Used by tests and single-device
/// deployments that configure the identity inline.
#[async_trait::async_trait]
impl IdentitySource for DeviceIdentity {
    async fn fetch(&self) -> Result<DeviceIdentity, IdentityError> {
        Ok(self.clone())
    }
}

/// HTTP client for the device registry.
pub struct DeviceApi {
    client: reqwest::Client,
    url: Option<String>,
}

impl DeviceApi {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: Some(url.into()),
        }
    }

    /// Reads the endpoint from `AIMLBOT_DEVICE_API_URL`. An unset variable
    /// produces a source whose every fetch fails with `Unconfigured`, which
    /// the adapter maps to the default identity.
    pub fn from_env() -> Self {
        Self {
            client: reqwest::Client::new(),
            url: std::env::var(ENV_DEVICE_API_URL).ok(),
        }
    }
}

#[async_trait::async_trait]
impl IdentitySource for DeviceApi {
    async fn fetch(&self) -> Result<DeviceIdentity, IdentityError> {
        let url = self.url.as_deref().ok_or(IdentityError::Unconfigured)?;
        let value: serde_json::Value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let identity: DeviceIdentity = serde_json::from_value(value)
            .map_err(|e| IdentityError::Malformed(e.to_string()))?;
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_identity_fetches_itself() {
        let identity = DeviceIdentity {
            name: "Kitchen Unit".into(),
            platform: "mark-2".into(),
        };
        let fetched = identity.fetch().await.unwrap();
        assert_eq!(fetched.name, "Kitchen Unit");
        assert_eq!(fetched.platform, "mark-2");
    }

    #[tokio::test]
    async fn unconfigured_api_fails_with_unconfigured() {
        let api = DeviceApi {
            client: reqwest::Client::new(),
            url: None,
        };
        assert!(matches!(
            api.fetch().await,
            Err(IdentityError::Unconfigured)
        ));
    }

    #[test]
    fn fallback_identity_is_the_fixed_record() {
        let fallback = DeviceIdentity::fallback();
        assert_eq!(fallback.name, "Mycroft");
        assert_eq!(fallback.platform, "AI");
    }
}
