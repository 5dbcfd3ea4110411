use std::fmt;

use platform_passkey_types::Bytes;

use crate::NativeError;

/// The version of the host operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlatformVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
}

impl PlatformVersion {
    /// Create a version.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Whether the application may read the platform's passkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum AuthorizationState {
    /// Access was granted.
    Authorized,
    /// Access was refused.
    Denied,
    /// The user has not been asked yet.
    NotDetermined,
}

/// A passkey stored by the platform authenticator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// Raw credential id.
    pub credential_id: Bytes,
    /// The relying party the passkey belongs to.
    pub rp_id: String,
    /// The account name saved with the passkey.
    pub user_name: String,
    /// The user handle chosen by the relying party.
    pub user_handle: Bytes,
}

/// Read access to the passkeys stored by the platform.
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
#[async_trait::async_trait]
pub trait PlatformCredentialStore: Send + Sync {
    /// The running operating system version.
    fn platform_version(&self) -> PlatformVersion;

    /// The current authorization to read passkeys.
    fn authorization_state(&self) -> AuthorizationState;

    /// Prompt the user for authorization and return the resulting state.
    async fn request_authorization(&self) -> AuthorizationState;

    /// All passkeys stored for `rp_id`.
    async fn credentials(&self, rp_id: &str) -> Result<Vec<StoredCredential>, NativeError>;
}
