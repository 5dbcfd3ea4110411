use serde::{Deserialize, Serialize};
use typeshare::typeshare;

mod credential_properties;
mod large_blob;
mod pseudo_random_function;

pub use credential_properties::*;
pub use large_blob::*;
pub use pseudo_random_function::*;

/// Client extension inputs supplied by the caller.
///
/// The supported extensions are [`credProps`], [`prf`] and [`largeBlob`].
///
/// <https://w3c.github.io/webauthn/#dictdef-authenticationextensionsclientinputs>
///
/// [`credProps`]: https://w3c.github.io/webauthn/#sctn-authenticator-credential-properties-extension
/// [`prf`]: https://w3c.github.io/webauthn/#prf-extension
/// [`largeBlob`]: https://w3c.github.io/webauthn/#sctn-large-blob-extension
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticationExtensionsClientInputs {
    /// Request the credential properties of a newly created credential.
    ///
    /// See [`CredentialPropertiesOutput`] for more information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cred_props: Option<bool>,

    /// Inputs for the pseudo-random function extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf: Option<AuthenticationExtensionsPrfInputs>,

    /// Inputs for the large blob storage extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_blob: Option<AuthenticationExtensionsLargeBlobInputs>,
}

/// Client extension outputs of a ceremony.
///
/// <https://w3c.github.io/webauthn/#dictdef-authenticationextensionsclientoutputs>
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticationExtensionsClientOutputs {
    /// Properties of the created credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cred_props: Option<CredentialPropertiesOutput>,

    /// Results of evaluating the PRF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf: Option<AuthenticationExtensionsPrfOutputs>,

    /// Results of the large blob operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_blob: Option<AuthenticationExtensionsLargeBlobOutputs>,
}

impl AuthenticationExtensionsClientOutputs {
    /// Whether no extension produced an output.
    pub fn is_empty(&self) -> bool {
        self.cred_props.is_none() && self.prf.is_none() && self.large_blob.is_none()
    }
}
