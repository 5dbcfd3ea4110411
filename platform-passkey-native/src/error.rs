use std::fmt;

/// Stable error codes reported by the native authorization layer.
///
/// The numeric values are the ones the platform uses for its authorization error domain, so a
/// bridge can map a raw code with [`NativeErrorCode::from_repr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::FromRepr, strum::Display)]
#[repr(i64)]
pub enum NativeErrorCode {
    /// The authorization failed for an unknown reason.
    Unknown = 1000,
    /// The user canceled the authorization attempt.
    Canceled = 1001,
    /// The authorization request received an invalid response.
    InvalidResponse = 1002,
    /// The authorization request was not handled.
    NotHandled = 1003,
    /// The authorization attempt failed.
    Failed = 1004,
    /// The authorization request required an interactive UI that could not be shown.
    NotInteractive = 1005,
    /// The authenticator already holds one of the excluded credentials.
    MatchedExcludedCredential = 1006,
}

/// An error reported by the native authenticator layer.
///
/// Native errors usually arrive with a localized description and, when the platform exposes one,
/// a numeric code. Either may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    /// The stable code, if the platform reported a known one.
    pub code: Option<NativeErrorCode>,
    /// The human readable description.
    pub message: String,
}

impl NativeError {
    /// An error that only carries a description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// An error with a known code.
    pub fn with_code(code: NativeErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// An error as reported by the platform, with a raw numeric code. Codes outside the known
    /// set are dropped and only the message is kept.
    pub fn from_raw(raw: i64, message: impl Into<String>) -> Self {
        let code = NativeErrorCode::from_repr(raw);
        if code.is_none() {
            log::debug!("Unrecognized native error code {raw}");
        }
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for NativeError {}
