//! WebAuthn extensions as defined in [WebAuthn Defined Extensions][webauthn].
//!
//! The currently supported extensions are:
//! * [`Credential Properties`][credprops]
//! * [`Pseudo-random function`][prf]
//! * [`Large blob storage`][largeblob]
//!
//! Only the platform authenticator is handed PRF and large blob inputs. Inputs that enable an
//! extension without the data needed to act on it are dropped with an [`ExtensionWarning`]
//! instead of failing the ceremony.
//!
//! [webauthn]: https://w3c.github.io/webauthn/#sctn-defined-extensions
//! [credprops]: https://w3c.github.io/webauthn/#sctn-authenticator-credential-properties-extension
//! [prf]: https://w3c.github.io/webauthn/#prf-extension
//! [largeblob]: https://w3c.github.io/webauthn/#sctn-large-blob-extension

use std::fmt;

use bitflags::bitflags;
use platform_passkey_native::{
    AuthenticatorClass, CeremonyKind, NativeExtensions, NativeLargeBlobInput, NativePrfInput,
};
use platform_passkey_types::webauthn::AuthenticationExtensionsClientInputs;

use crate::WebauthnError;

mod large_blob;
mod prf;

#[cfg(test)]
mod tests;

bitflags! {
    /// The extensions a ceremony asks the native layer for.
    #[repr(transparent)]
    #[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
    pub struct ExtensionTags: u8 {
        /// `prf`
        const PRF = 1 << 0;
        /// `largeBlob` support on registration
        const LARGE_BLOB = 1 << 1;
        /// `largeBlob.read` on authentication
        const LARGE_BLOB_READ = 1 << 2;
        /// `largeBlob.write` on authentication
        const LARGE_BLOB_WRITE = 1 << 3;
        /// `credProps`, answered from the result
        const CRED_PROPS = 1 << 4;
    }
}

/// An extension input that was dropped because it cannot be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionWarning {
    /// `prf` without `eval` or `evalByCredential`.
    PrfWithoutInputs,
    /// `prf.evalByCredential` on registration, where no credential exists yet.
    PrfEvalByCredentialOnCreate,
    /// `largeBlob` on authentication without `read` or `write`.
    LargeBlobWithoutOperation,
    /// `largeBlob` on authentication with both `read` and `write`.
    LargeBlobReadAndWrite,
    /// `largeBlob.write` with an empty blob.
    LargeBlobEmptyWrite,
    /// `largeBlob.read` or `largeBlob.write` on registration.
    LargeBlobOperationOnCreate,
}

impl fmt::Display for ExtensionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::PrfWithoutInputs => "prf requested without eval or evalByCredential",
            Self::PrfEvalByCredentialOnCreate => "prf evalByCredential is not supported on create",
            Self::LargeBlobWithoutOperation => "largeBlob requested without read or write",
            Self::LargeBlobReadAndWrite => "largeBlob read and write cannot be combined",
            Self::LargeBlobEmptyWrite => "largeBlob write requested without data",
            Self::LargeBlobOperationOnCreate => {
                "largeBlob read and write are not supported on create"
            }
        };
        f.write_str(msg)
    }
}

/// The extension configuration of a ceremony.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegotiatedExtensions {
    /// Which extensions are active.
    pub tags: ExtensionTags,
    /// PRF inputs for the platform authenticator.
    pub prf: Option<NativePrfInput>,
    /// Large blob operation for the platform authenticator.
    pub large_blob: Option<NativeLargeBlobInput>,
    /// Whether the caller asked for credential properties.
    pub cred_props: bool,
}

impl NegotiatedExtensions {
    /// The native extension inputs for a request to `class`.
    pub fn for_class(&self, class: AuthenticatorClass) -> NativeExtensions {
        match class {
            AuthenticatorClass::Platform => NativeExtensions {
                prf: self.prf.clone(),
                large_blob: self.large_blob.clone(),
            },
            AuthenticatorClass::SecurityKey => NativeExtensions::default(),
        }
    }
}

/// The outcome of [`negotiate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Negotiation {
    /// The extensions to request.
    pub extensions: NegotiatedExtensions,
    /// Inputs that were dropped.
    pub warnings: Vec<ExtensionWarning>,
}

/// Turn the caller's extension inputs into the configuration of a `kind` ceremony.
///
/// Fails only on inputs that are malformed rather than incomplete, such as an
/// `evalByCredential` key that is not base64url.
pub fn negotiate(
    kind: CeremonyKind,
    inputs: Option<&AuthenticationExtensionsClientInputs>,
) -> Result<Negotiation, WebauthnError> {
    let mut negotiation = Negotiation::default();
    let Some(inputs) = inputs else {
        return Ok(negotiation);
    };
    let extensions = &mut negotiation.extensions;
    let warnings = &mut negotiation.warnings;

    if let Some(prf) = inputs.prf.as_ref() {
        extensions.prf = prf::negotiate(kind, prf, warnings)?;
        if extensions.prf.is_some() {
            extensions.tags |= ExtensionTags::PRF;
        }
    }

    if let Some(large_blob) = inputs.large_blob.as_ref() {
        extensions.large_blob = large_blob::negotiate(kind, large_blob, warnings);
        extensions.tags |= match extensions.large_blob {
            Some(NativeLargeBlobInput::Support(_)) => ExtensionTags::LARGE_BLOB,
            Some(NativeLargeBlobInput::Read) => ExtensionTags::LARGE_BLOB_READ,
            Some(NativeLargeBlobInput::Write(_)) => ExtensionTags::LARGE_BLOB_WRITE,
            None => ExtensionTags::empty(),
        };
    }

    if kind == CeremonyKind::Create && inputs.cred_props == Some(true) {
        extensions.cred_props = true;
        extensions.tags |= ExtensionTags::CRED_PROPS;
    }

    for warning in negotiation.warnings.iter() {
        log::warn!("Skipping extension input: {warning}");
    }

    Ok(negotiation)
}
