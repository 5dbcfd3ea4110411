use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::{utils::serde::ignore_unknown, Bytes};

/// Inputs for the large blob storage extension.
///
/// On registration only [`Self::support`] is meaningful, on authentication exactly one of
/// [`Self::read`] and [`Self::write`] should be set.
///
/// <https://w3c.github.io/webauthn/#sctn-large-blob-extension>
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticationExtensionsLargeBlobInputs {
    /// Whether the new credential must support large blob storage.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "ignore_unknown"
    )]
    pub support: Option<LargeBlobSupport>,

    /// Read the blob associated with the asserted credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,

    /// Replace the blob associated with the asserted credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write: Option<Bytes>,
}

/// <https://w3c.github.io/webauthn/#enumdef-largeblobsupport>
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[typeshare(serialized_as = "String")]
pub enum LargeBlobSupport {
    /// Fail the registration if large blobs are unavailable.
    Required,
    /// Use large blobs if available.
    #[default]
    Preferred,
}

/// Outputs from the large blob storage extension.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticationExtensionsLargeBlobOutputs {
    /// Whether the created credential supports large blobs. Only reported on registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported: Option<bool>,

    /// The blob that was read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<Bytes>,

    /// Whether the write succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub written: Option<bool>,
}
