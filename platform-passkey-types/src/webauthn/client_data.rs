use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// The client data represents the contextual bindings of both the relying party and the client.
///
/// The field order of this struct is the serialization order. It follows the order the
/// [limited verification algorithm] expects, so two serializations of equal values are always
/// byte-identical and can be hashed.
///
/// <https://w3c.github.io/webauthn/#dictionary-client-data>
///
/// [limited verification algorithm]: https://w3c.github.io/webauthn/#clientdatajson-verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct CollectedClientData {
    /// Either `webauthn.create` or `webauthn.get`.
    #[serde(rename = "type")]
    pub ty: ClientDataType,

    /// The unpadded base64url encoding of the relying party's challenge.
    pub challenge: String,

    /// The ASCII serialization of the caller's origin.
    pub origin: String,

    /// Whether the caller is embedded in a frame whose origin differs from [`Self::origin`].
    pub cross_origin: bool,

    /// The ASCII serialization of the top level origin, only present when
    /// [`Self::cross_origin`] is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_origin: Option<String>,
}

/// Used to limit the values of [`CollectedClientData::ty`] and serializes to static strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[typeshare]
pub enum ClientDataType {
    /// Serializes to the string `"webauthn.create"`
    #[serde(rename = "webauthn.create")]
    Create,

    /// Serializes to the string `"webauthn.get"`
    #[serde(rename = "webauthn.get")]
    Get,
}
