use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// Properties of a credential known to the client once a registration ceremony completes.
///
/// <https://w3c.github.io/webauthn/#sctn-authenticator-credential-properties-extension>
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct CredentialPropertiesOutput {
    /// The resident key credential property.
    /// * If `rk` is true, the credential is a discoverable credential.
    /// * If `rk` is false, the credential is a server-side credential.
    /// * If `rk` is not present, the client does not know.
    #[serde(rename = "rk", default, skip_serializing_if = "Option::is_none")]
    pub discoverable: Option<bool>,
}
