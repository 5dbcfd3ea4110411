//! Types specific to public key credential creation
use coset::iana;
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::{
    utils::serde::{
        i64_to_iana, ignore_unknown, ignore_unknown_opt_vec, ignore_unknown_vec, lenient_timeout,
    },
    webauthn::{
        AuthenticationExtensionsClientInputs, AuthenticatorAttachment, AuthenticatorTransport,
        PublicKeyCredential, PublicKeyCredentialDescriptor, PublicKeyCredentialType,
        UserVerificationRequirement,
    },
    Bytes,
};

/// The response to the successful creation of a PublicKeyCredential
pub type CreatedPublicKeyCredential = PublicKeyCredential<AuthenticatorAttestationResponse>;

/// The input to a registration ceremony, mirroring the argument of [`navigator.credentials.create`].
///
/// [`navigator.credentials.create`]: https://developer.mozilla.org/en-US/docs/Web/API/CredentialsContainer/create
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct CredentialCreationOptions {
    /// The key defining that this is a request for a webauthn credential.
    pub public_key: PublicKeyCredentialCreationOptions,
}

/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialcreationoptions>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct PublicKeyCredentialCreationOptions {
    /// The relying party responsible for the request.
    pub rp: PublicKeyCredentialRpEntity,

    /// The user account the credential is created for.
    pub user: PublicKeyCredentialUserEntity,

    /// The challenge the authenticator signs as part of the client data.
    pub challenge: Bytes,

    /// Key types and signature algorithms the relying party supports, most preferred first.
    /// Unknown algorithms are dropped while deserializing.
    #[serde(deserialize_with = "ignore_unknown_vec")]
    pub pub_key_cred_params: Vec<PublicKeyCredentialParameters>,

    /// How long, in milliseconds, the relying party is willing to wait. This is only a hint and is
    /// clamped by the client.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timeout"
    )]
    pub timeout: Option<f64>,

    /// Existing credentials of this user, an authenticator holding one of them must not create a
    /// new credential.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "ignore_unknown_opt_vec"
    )]
    pub exclude_credentials: Option<Vec<PublicKeyCredentialDescriptor>>,

    /// Requirements on the authenticator taking part in the ceremony.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_selection: Option<AuthenticatorSelectionCriteria>,

    /// The relying party's attestation conveyance preference.
    #[serde(default, deserialize_with = "ignore_unknown")]
    pub attestation: AttestationConveyancePreference,

    /// Client extension inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<AuthenticationExtensionsClientInputs>,
}

/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialrpentity>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[typeshare]
pub struct PublicKeyCredentialRpEntity {
    /// The RP ID. When omitted it defaults to the caller origin's effective domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human palatable name of the relying party, only used for display.
    pub name: String,
}

/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialuserentity>
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct PublicKeyCredentialUserEntity {
    /// The user handle, at most 64 bytes and never empty.
    pub id: Bytes,

    /// Name intended for display, e.g. "Alex Müller".
    pub display_name: String,

    /// Account identifier intended for display, e.g. "alex.mueller@example.com".
    pub name: String,
}

/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialparameters>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[typeshare]
pub struct PublicKeyCredentialParameters {
    /// Always [`PublicKeyCredentialType::PublicKey`] for entries the client acts on.
    #[serde(rename = "type", deserialize_with = "ignore_unknown")]
    pub ty: PublicKeyCredentialType,

    /// The COSE algorithm identifier.
    #[serde(with = "i64_to_iana")]
    #[typeshare(serialized_as = "I54")]
    pub alg: iana::Algorithm,
}

impl PublicKeyCredentialParameters {
    /// The algorithms used when [`PublicKeyCredentialCreationOptions::pub_key_cred_params`] is
    /// empty: [`iana::Algorithm::ES256`] and [`iana::Algorithm::RS256`].
    ///
    /// <https://w3c.github.io/webauthn/#ref-for-list-size>
    pub fn default_algorithms() -> Vec<Self> {
        vec![Self::public_key(iana::Algorithm::ES256), Self::public_key(iana::Algorithm::RS256)]
    }

    /// Parameters for a public key credential using `alg`.
    pub fn public_key(alg: iana::Algorithm) -> Self {
        Self {
            ty: PublicKeyCredentialType::PublicKey,
            alg,
        }
    }
}

/// <https://w3c.github.io/webauthn/#dictdef-authenticatorselectioncriteria>
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticatorSelectionCriteria {
    /// Restricts eligible authenticators to this attachment modality when present.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "ignore_unknown",
        default
    )]
    pub authenticator_attachment: Option<AuthenticatorAttachment>,

    /// How strongly the relying party wants a discoverable credential.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "ignore_unknown",
        default
    )]
    pub resident_key: Option<ResidentKeyRequirement>,

    /// WebAuthn Level 1 spelling of `residentKey: "required"`.
    #[serde(default)]
    pub require_resident_key: bool,

    /// User verification requirement for the `create()` operation.
    #[serde(default, deserialize_with = "ignore_unknown")]
    pub user_verification: UserVerificationRequirement,
}

impl AuthenticatorSelectionCriteria {
    /// Whether a discoverable credential should be created.
    ///
    /// Without an explicit [`Self::resident_key`] this follows [`Self::require_resident_key`].
    pub fn wants_resident_key(&self) -> bool {
        match self.resident_key {
            Some(ResidentKeyRequirement::Required | ResidentKeyRequirement::Preferred) => true,
            Some(ResidentKeyRequirement::Discouraged) => false,
            None => self.require_resident_key,
        }
    }
}

/// <https://w3c.github.io/webauthn/#enumdef-residentkeyrequirement>
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[typeshare(serialized_as = "String")]
pub enum ResidentKeyRequirement {
    /// Prefer a server-side credential.
    Discouraged,
    /// Prefer a discoverable credential.
    Preferred,
    /// Fail if a discoverable credential cannot be created.
    Required,
}

/// <https://w3c.github.io/webauthn/#enum-attestation-convey>
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[typeshare(serialized_as = "String")]
pub enum AttestationConveyancePreference {
    /// The relying party is not interested in attestation.
    #[default]
    None,
    /// Verifiable attestation is preferred, possibly anonymized by the client.
    Indirect,
    /// The attestation statement as generated by the authenticator.
    Direct,
    /// Uniquely identifying attestation for enterprise deployments.
    Enterprise,
}

/// The authenticator's response to a request to create a new credential.
///
/// <https://w3c.github.io/webauthn/#iface-authenticatorattestationresponse>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticatorAttestationResponse {
    /// The JSON client data whose hash the authenticator signed.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Bytes,

    /// The authenticator data contained in the attestation object.
    pub authenticator_data: Bytes,

    /// DER SubjectPublicKeyInfo of the new credential, absent for key types the client cannot
    /// re-encode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<Bytes>,

    /// COSE algorithm identifier of the new credential.
    #[typeshare(serialized_as = "I54")]
    pub public_key_algorithm: i64,

    /// CBOR attestation object.
    pub attestation_object: Bytes,

    /// Transports the authenticator is believed to support.
    #[serde(default)]
    pub transports: Vec<AuthenticatorTransport>,
}
