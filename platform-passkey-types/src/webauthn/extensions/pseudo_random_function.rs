use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::Bytes;

/// Pseudo-random function values, used for both inputs and outputs.
///
/// As inputs these are the salts handed to the authenticator, which hashes them with the
/// `"WebAuthn PRF"` context itself. As outputs they hold the 32 byte PRF results.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticationExtensionsPrfValues {
    /// The first PRF value.
    pub first: Bytes,

    /// The second PRF value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<Bytes>,
}

/// Inputs for the pseudo-random function extension.
///
/// <https://w3c.github.io/webauthn/#prf-extension>
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticationExtensionsPrfInputs {
    /// One or two inputs on which to evaluate the PRF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval: Option<AuthenticationExtensionsPrfValues>,

    /// A record mapping base64url encoded credential IDs to PRF inputs for that credential.
    ///
    /// Only meaningful during assertions with a non-empty `allowCredentials`, honoring that is the
    /// caller's responsibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_by_credential: Option<HashMap<String, AuthenticationExtensionsPrfValues>>,
}

/// Outputs from the pseudo-random function extension.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticationExtensionsPrfOutputs {
    /// Whether the PRF is available for the created credential. Only reported on registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// The results of evaluating the PRF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<AuthenticationExtensionsPrfValues>,
}
