//! Listing the passkeys the platform authenticator stores for a relying party.

use std::fmt;

use platform_passkey_native::{
    AuthorizationState, NativeError, PlatformCredentialStore, PlatformVersion, StoredCredential,
};
use platform_passkey_types::{encoding, Bytes};
use serde::Serialize;
use typeshare::typeshare;

/// The first platform version that lets applications enumerate passkeys.
pub const MINIMUM_PLATFORM_VERSION: PlatformVersion = PlatformVersion::new(13, 3, 0);

/// A stored passkey as returned to callers.
#[typeshare]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyInfo {
    /// The base64url encoded credential id.
    pub id: String,
    /// The relying party the passkey belongs to.
    pub rp_id: String,
    /// The account name saved with the passkey.
    pub user_name: String,
    /// The user handle chosen by the relying party.
    pub user_handle: Bytes,
}

impl From<StoredCredential> for PasskeyInfo {
    fn from(credential: StoredCredential) -> Self {
        Self {
            id: encoding::base64url(&credential.credential_id),
            rp_id: credential.rp_id,
            user_name: credential.user_name,
            user_handle: credential.user_handle,
        }
    }
}

/// Reasons passkeys could not be listed.
#[typeshare]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content")]
pub enum ListError {
    /// The platform is older than [`MINIMUM_PLATFORM_VERSION`].
    UnsupportedPlatform(String),
    /// The user refused access. It can only be granted again in the system settings.
    PermissionDenied,
    /// The user was asked for access and did not grant it.
    AuthorizationRequestFailed,
    /// The platform failed to return its passkeys.
    Store(String),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPlatform(version) => write!(
                f,
                "Listing passkeys needs {MINIMUM_PLATFORM_VERSION} or later, found {version}"
            ),
            Self::PermissionDenied => f.write_str("Access to passkeys was denied"),
            Self::AuthorizationRequestFailed => f.write_str("Access to passkeys was not granted"),
            Self::Store(msg) => write!(f, "Could not read passkeys: {msg}"),
        }
    }
}

impl std::error::Error for ListError {}

impl From<NativeError> for ListError {
    fn from(error: NativeError) -> Self {
        Self::Store(error.to_string())
    }
}

/// Lists the passkeys of a [`PlatformCredentialStore`], asking for access when needed.
pub struct PasskeyLister<S> {
    store: S,
}

impl<S: PlatformCredentialStore> PasskeyLister<S> {
    /// Create a lister over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All passkeys stored for `rp_id`.
    ///
    /// If the user has not been asked for access yet, they are asked once and listing only
    /// proceeds if they agree.
    pub async fn list(&self, rp_id: &str) -> Result<Vec<PasskeyInfo>, ListError> {
        let version = self.store.platform_version();
        if version < MINIMUM_PLATFORM_VERSION {
            return Err(ListError::UnsupportedPlatform(version.to_string()));
        }

        match self.store.authorization_state() {
            AuthorizationState::Authorized => {}
            AuthorizationState::Denied => return Err(ListError::PermissionDenied),
            AuthorizationState::NotDetermined => {
                let granted = self.store.request_authorization().await;
                log::debug!("Passkey access request finished: {granted}");
                if granted != AuthorizationState::Authorized {
                    return Err(ListError::AuthorizationRequestFailed);
                }
            }
        }

        let credentials = self.store.credentials(rp_id).await?;
        Ok(credentials.into_iter().map(PasskeyInfo::from).collect())
    }
}
