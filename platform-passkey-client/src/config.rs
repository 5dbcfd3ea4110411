use std::time::Duration;

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// Timeout used when the caller does not supply a usable one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(600_000);

/// Upper bound for caller supplied timeouts.
pub const MAX_TIMEOUT: Duration = Duration::from_millis(3_600_000);

/// Limits applied to every ceremony a [`Client`](crate::Client) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CeremonyPolicy {
    /// Timeout for requests without a positive, finite timeout.
    pub default_timeout: Duration,
    /// Longest timeout a request may ask for.
    pub max_timeout: Duration,
}

impl Default for CeremonyPolicy {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            max_timeout: MAX_TIMEOUT,
        }
    }
}

impl CeremonyPolicy {
    /// The timeout to use for a request that asked for `requested` milliseconds.
    ///
    /// Missing, non-positive and non-finite values fall back to the default. Anything above the
    /// maximum is clamped to it.
    pub fn effective_timeout(&self, requested: Option<f64>) -> Duration {
        match requested {
            Some(ms) if ms.is_finite() && ms > 0.0 => Duration::try_from_secs_f64(ms / 1000.0)
                .map_or(self.max_timeout, |requested| requested.min(self.max_timeout)),
            _ => self.default_timeout,
        }
    }
}

/// Host supplied configuration for a [`Client`](crate::Client).
///
/// Every field is optional when deserializing.
#[typeshare]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Accept `http://localhost` and `http://` IP literal origins.
    pub allow_insecure_localhost: bool,
    /// Timeout in milliseconds for requests without a usable timeout.
    #[typeshare(serialized_as = "number")]
    pub default_timeout_ms: u64,
    /// Upper bound in milliseconds for request timeouts.
    #[typeshare(serialized_as = "number")]
    pub max_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            allow_insecure_localhost: true,
            default_timeout_ms: 600_000,
            max_timeout_ms: 3_600_000,
        }
    }
}

impl ClientConfig {
    /// The ceremony limits described by this configuration.
    pub fn policy(&self) -> CeremonyPolicy {
        let max_timeout = Duration::from_millis(self.max_timeout_ms);
        CeremonyPolicy {
            default_timeout: Duration::from_millis(self.default_timeout_ms).min(max_timeout),
            max_timeout,
        }
    }
}
