//! Implementation of the types defined in [WebAuthn Level 3] that a native platform client
//! consumes from a caller and hands back as a ceremony result.
//!
//! [WebAuthn Level 3]: https://w3c.github.io/webauthn

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::{utils::serde::ignore_unknown, Bytes};

mod assertion;
mod attestation;
mod client_data;
mod common;
mod extensions;
mod outcome;

// re-export types
pub use self::{
    assertion::*, attestation::*, client_data::*, common::*, extensions::*, outcome::*,
};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::AuthenticatorAssertionResponse {}
    impl Sealed for super::AuthenticatorAttestationResponse {}
}

/// Marker trait for response types
pub trait AuthenticatorResponse: sealed::Sealed {}

impl AuthenticatorResponse for AuthenticatorAssertionResponse {}
impl AuthenticatorResponse for AuthenticatorAttestationResponse {}

/// The normalized result of a successful ceremony.
///
/// Use the aliases depending on which response you are expecting:
/// * Credential Creation: [CreatedPublicKeyCredential]
/// * Credential assertion: [AuthenticatedPublicKeyCredential]
///
/// <https://w3c.github.io/webauthn/#iface-pkcredential>
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct PublicKeyCredential<R: AuthenticatorResponse> {
    /// The base64url encoding of [Self::raw_id].
    pub id: String,

    /// The credential ID chosen by the authenticator.
    pub raw_id: Bytes,

    /// Always [PublicKeyCredentialType::PublicKey]
    #[serde(rename = "type")]
    pub ty: PublicKeyCredentialType,

    /// Either an [AuthenticatorAttestationResponse] or an [AuthenticatorAssertionResponse].
    pub response: R,

    /// Which attachment modality completed the ceremony.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "ignore_unknown"
    )]
    pub authenticator_attachment: Option<AuthenticatorAttachment>,

    /// Extension identifier → client extension output entries.
    #[serde(default)]
    pub client_extension_results: AuthenticationExtensionsClientOutputs,
}
