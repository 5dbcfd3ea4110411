use std::fmt;

use platform_passkey_native::{CeremonyKind, NativeError, NativeErrorCode};
use platform_passkey_types::webauthn::{CeremonyOutcome, ErrorKind};
use typeshare::typeshare;

use crate::RpIdRejection;

/// Message fragments the platform uses when a registration matched an excluded credential.
pub const EXCLUDED_CREDENTIAL_MARKERS: &[&str] = &["Code=1006", "matchedExcludedCredential"];

/// Message fragments of the platform's generic authorization failure.
pub const NOT_ALLOWED_MARKERS: &[&str] = &[
    "The operation couldn\u{2019}t be completed",
    "The operation could not be completed",
];

#[typeshare]
#[derive(Debug, Clone, serde::Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "content")]
/// Errors produced by Webauthn Operations.
pub enum WebauthnError {
    /// The request origin could not be parsed. Reported as a security error, like an origin
    /// without a host.
    InvalidOrigin,
    /// The top frame origin could not be parsed or has no host.
    InvalidTopOrigin,
    /// The challenge is empty.
    EmptyChallenge,
    /// A registration request has an empty user id.
    MissingUserId,
    /// A `prf.evalByCredential` key is empty or not base64url.
    InvalidEvalByCredentialKey,
    /// The window handle does not resolve to a presentation anchor.
    InvalidWindowHandle,
    /// The client data could not be serialized.
    InvalidClientData(String),
    /// The RP ID failed validation against the origin.
    RpIdRejected(RpIdRejection),
    /// The user canceled, no credential was usable or the platform refused the request.
    NotAllowed(String),
    /// The authenticator already holds one of the excluded credentials.
    ExcludedCredential(String),
    /// The ceremony timed out.
    Timeout,
    /// The registration returned an attestation object that could not be read.
    InvalidAttestation(String),
}

impl WebauthnError {
    /// The DOM exception name this error surfaces as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTopOrigin
            | Self::EmptyChallenge
            | Self::MissingUserId
            | Self::InvalidEvalByCredentialKey
            | Self::InvalidWindowHandle
            | Self::InvalidClientData(_) => ErrorKind::TypeError,
            Self::InvalidOrigin | Self::RpIdRejected(_) => ErrorKind::SecurityError,
            Self::NotAllowed(_) | Self::InvalidAttestation(_) => ErrorKind::NotAllowedError,
            Self::ExcludedCredential(_) => ErrorKind::InvalidStateError,
            Self::Timeout => ErrorKind::AbortError,
        }
    }

    /// Convert into the failure shape returned to callers.
    pub fn into_outcome<T>(self) -> CeremonyOutcome<T> {
        CeremonyOutcome::failure(self.kind(), self.to_string())
    }
}

impl fmt::Display for WebauthnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOrigin => f.write_str("The origin is not a valid URL"),
            Self::InvalidTopOrigin => f.write_str("The top frame origin is not a valid URL"),
            Self::EmptyChallenge => f.write_str("The challenge must not be empty"),
            Self::MissingUserId => f.write_str("The user id must not be empty"),
            Self::InvalidEvalByCredentialKey => {
                f.write_str("evalByCredential keys must be non-empty base64url strings")
            }
            Self::InvalidWindowHandle => f.write_str("The window handle is not valid"),
            Self::InvalidClientData(msg) => write!(f, "Could not serialize client data: {msg}"),
            Self::RpIdRejected(reason) => write!(f, "The RP ID is not valid here: {reason}"),
            Self::NotAllowed(msg) | Self::ExcludedCredential(msg) => f.write_str(msg),
            Self::Timeout => f.write_str("The operation timed out"),
            Self::InvalidAttestation(msg) => write!(f, "Invalid attestation object: {msg}"),
        }
    }
}

impl std::error::Error for WebauthnError {}

/// Classify a failure reported by the native layer.
///
/// A known error code wins over the message. Messages are only inspected when the code is missing
/// or not specific, because they are localized.
pub fn classify_native_error(error: &NativeError, kind: CeremonyKind) -> WebauthnError {
    let message = error.message.clone();

    if kind == CeremonyKind::Create {
        if error.code == Some(NativeErrorCode::MatchedExcludedCredential) {
            return WebauthnError::ExcludedCredential(message);
        }
        if EXCLUDED_CREDENTIAL_MARKERS
            .iter()
            .any(|marker| error.message.contains(marker))
        {
            return WebauthnError::ExcludedCredential(message);
        }
    }

    if error.code.is_none()
        && !NOT_ALLOWED_MARKERS
            .iter()
            .any(|marker| error.message.contains(marker))
    {
        log::debug!("Unclassified native error treated as NotAllowedError: {error}");
    }

    WebauthnError::NotAllowed(message)
}
