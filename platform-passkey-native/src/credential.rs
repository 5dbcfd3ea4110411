use platform_passkey_types::{webauthn::AuthenticatorTransport, Bytes};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::AuthenticatorClass;

/// How the native layer reports the credential's attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeAttachment {
    /// The credential lives on the platform authenticator.
    Platform,
    /// The credential lives on a roaming authenticator.
    CrossPlatform,
}

/// PRF results returned by the platform authenticator.
///
/// The evaluated secrets are wiped when this value is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct NativePrfOutput {
    /// On registration, whether the credential supports PRF.
    pub supported: bool,
    /// Output for the first salt.
    pub first: Option<Vec<u8>>,
    /// Output for the second salt.
    pub second: Option<Vec<u8>>,
}

/// Large blob result of an assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeLargeBlobOutput {
    /// The stored blob, `None` if the credential has no blob.
    Read(Option<Bytes>),
    /// Whether the write succeeded.
    Written(bool),
}

/// The authenticator specific part of an assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAssertion {
    /// Raw authenticator data.
    pub authenticator_data: Bytes,
    /// Assertion signature.
    pub signature: Bytes,
    /// User handle of a discoverable credential.
    pub user_handle: Option<Bytes>,
    /// PRF results.
    pub prf: Option<NativePrfOutput>,
    /// Large blob results.
    pub large_blob: Option<NativeLargeBlobOutput>,
}

/// The authenticator specific part of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeRegistration {
    /// Raw CBOR attestation object.
    pub attestation_object: Bytes,
    /// Transports reported by the authenticator.
    pub transports: Vec<AuthenticatorTransport>,
    /// PRF support and, if evaluated at creation, its results.
    pub prf: Option<NativePrfOutput>,
    /// Whether the credential supports large blobs.
    pub large_blob_supported: Option<bool>,
}

/// The body of a [`NativeCredential`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCredentialBody {
    /// Result of a get ceremony.
    Assertion(NativeAssertion),
    /// Result of a create ceremony.
    Registration(NativeRegistration),
}

/// A credential produced by whichever request of a ceremony completed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCredential {
    /// The class of the request that produced this credential.
    pub class: AuthenticatorClass,
    /// The attachment as reported by the platform.
    pub attachment: NativeAttachment,
    /// Raw credential id.
    pub credential_id: Bytes,
    /// Assertion or registration data.
    pub body: NativeCredentialBody,
}
