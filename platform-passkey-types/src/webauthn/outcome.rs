use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use typeshare::typeshare;

/// The DOMException names a ceremony can fail with.
///
/// Serializes to the exception name, e.g. `"NotAllowedError"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[typeshare(serialized_as = "String")]
pub enum ErrorKind {
    /// Malformed or missing caller input, detected before the authenticator is involved.
    TypeError,
    /// The origin is not allowed to act for the requested RP ID.
    SecurityError,
    /// The user cancelled, no credential was usable, or the platform refused for another reason.
    NotAllowedError,
    /// The ceremony timed out or was cancelled.
    AbortError,
    /// Registration only: the authenticator already holds one of the excluded credentials.
    InvalidStateError,
}

/// A serializable description of the failure, shaped like a DOMException.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[typeshare]
pub struct ErrorObject {
    /// Same as the [`ErrorKind`] name.
    pub name: String,
    /// Human readable detail, not meant for programmatic use.
    pub message: String,
}

impl ErrorObject {
    /// Describe a failure of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            name: kind.to_string(),
            message: message.into(),
        }
    }
}

/// The structured result handed back to the caller of a ceremony.
///
/// Serializes as `{"success": true, "data": …}` or
/// `{"success": false, "error": "NotAllowedError", "errorObject": {…}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum CeremonyOutcome<T> {
    /// The ceremony produced a credential.
    Success(T),
    /// The ceremony failed.
    Failure {
        /// Which kind of failure.
        error: ErrorKind,
        /// Additional detail on the failure.
        error_object: Option<ErrorObject>,
    },
}

impl<T> CeremonyOutcome<T> {
    /// A failed outcome of `kind` with a human readable `message`.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            error: kind,
            error_object: Some(ErrorObject::new(kind, message)),
        }
    }

    /// Whether the ceremony produced a credential.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The error kind for a failed ceremony.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(*error),
        }
    }

    /// Convert into a [`Result`], dropping the error detail.
    pub fn into_result(self) -> Result<T, ErrorKind> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure { error, .. } => Err(error),
        }
    }
}

impl<T: Serialize> Serialize for CeremonyOutcome<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Success(data) => {
                let mut state = serializer.serialize_struct("CeremonyOutcome", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            Self::Failure {
                error,
                error_object,
            } => {
                let len = if error_object.is_some() { 3 } else { 2 };
                let mut state = serializer.serialize_struct("CeremonyOutcome", len)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                if let Some(error_object) = error_object {
                    state.serialize_field("errorObject", error_object)?;
                } else {
                    state.skip_field("errorObject")?;
                }
                state.end()
            }
        }
    }
}
