//! Common types used in both Attestation (registration) and Assertion (authentication).

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::{
    utils::serde::{ignore_unknown, ignore_unknown_opt_vec},
    Bytes,
};

/// The valid credential types.
///
/// <https://w3c.github.io/webauthn/#enumdef-publickeycredentialtype>
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[typeshare(serialized_as = "String")]
pub enum PublicKeyCredentialType {
    /// The only type currently defined.
    PublicKey,
    /// Placeholder for values this crate does not know, they are ignored by the client.
    #[default]
    Unknown,
}

/// Identifies a specific public key credential, used in exclude and allow lists.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialdescriptor>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[typeshare]
pub struct PublicKeyCredentialDescriptor {
    /// Descriptors of an [`PublicKeyCredentialType::Unknown`] type must be ignored.
    #[serde(rename = "type", deserialize_with = "ignore_unknown")]
    pub ty: PublicKeyCredentialType,

    /// The credential ID.
    pub id: Bytes,

    /// Hints as to how the client might reach the managing authenticator.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "ignore_unknown_opt_vec"
    )]
    pub transports: Option<Vec<AuthenticatorTransport>>,
}

impl PublicKeyCredentialDescriptor {
    /// Descriptor for a public key credential with the given id and no transport hints.
    pub fn public_key(id: impl Into<Bytes>) -> Self {
        Self {
            ty: PublicKeyCredentialType::PublicKey,
            id: id.into(),
            transports: None,
        }
    }

    /// Whether [`Self::ty`] is a known credential type.
    pub fn is_known(&self) -> bool {
        match self.ty {
            PublicKeyCredentialType::PublicKey => true,
            PublicKeyCredentialType::Unknown => false,
        }
    }
}

/// A Relying Party's requirement for [user verification].
///
/// <https://w3c.github.io/webauthn/#enumdef-userverificationrequirement>
///
/// [user verification]: https://w3c.github.io/webauthn/#user-verification
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[typeshare(serialized_as = "String")]
pub enum UserVerificationRequirement {
    /// Fail the ceremony if the user cannot be verified.
    Required,
    /// Verify the user if possible.
    #[default]
    Preferred,
    /// Do not verify the user.
    Discouraged,
}

/// How a client might communicate with an authenticator.
///
/// <https://w3c.github.io/webauthn/#enum-transport>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[typeshare(serialized_as = "String")]
pub enum AuthenticatorTransport {
    /// Removable USB.
    Usb,
    /// Near Field Communication.
    Nfc,
    /// Bluetooth Low Energy.
    Ble,
    /// Cross-device flow, usually a phone reached through a QR code.
    #[serde(alias = "cable")]
    Hybrid,
    /// The platform authenticator of this device.
    Internal,
}

/// Attachment modality of an authenticator.
///
/// <https://w3c.github.io/webauthn/#enumdef-authenticatorattachment>
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[typeshare(serialized_as = "String")]
pub enum AuthenticatorAttachment {
    /// Built into the device, such as the secure enclave behind a biometric prompt.
    Platform,
    /// Roaming authenticators: security keys and phones.
    CrossPlatform,
}
