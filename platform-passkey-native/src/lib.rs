//! # Platform Passkey Native
//!
//! This crate defines the seam between [`platform-passkey-client`] and the native authenticator
//! platform of the host operating system: the biometric prompt, the secure enclave and the
//! external security key stack.
//!
//! Nothing in here talks to the operating system. Hosts implement the traits in this crate on top
//! of their foreign function bridge:
//!
//! * [`AuthorizationController`] runs a set of [`NativeRequest`]s as a single ceremony and reports
//!   the first result to a [`CompletionSink`].
//! * [`PresentationAnchorProvider`] turns an opaque [`WindowHandle`] into a UI anchor.
//! * [`AttestationParser`] extracts the credential public key from an attestation object, a CBOR
//!   implementation is provided as [`CborAttestationParser`].
//! * [`PlatformCredentialStore`] enumerates the passkeys stored by the platform.
//!
//! The native layer rebuilds its own registration and assertion options internally. Values it
//! needs at that point and which a [`NativeRequest`] cannot carry live in the [`StateTable`],
//! keyed by the [`CeremonyId`] of the ceremony.
//!
//! [`platform-passkey-client`]: https://docs.rs/platform-passkey-client

mod attestation;
mod controller;
mod credential;
mod error;
mod request;
mod state;
mod store;

pub use self::{
    attestation::{
        AttestationError, AttestationParser, AttestedCredential, AuthenticatorDataFlags,
        CborAttestationParser, ParsedAttestation, ParsedAuthenticatorData,
    },
    controller::{
        AuthorizationController, Ceremony, CeremonyId, CompletionSink, PresentationAnchor,
        PresentationAnchorProvider, WindowHandle,
    },
    credential::{
        NativeAssertion, NativeAttachment, NativeCredential, NativeCredentialBody,
        NativeLargeBlobOutput, NativePrfOutput, NativeRegistration,
    },
    error::{NativeError, NativeErrorCode},
    request::{
        AuthenticatorClass, CeremonyKind, NativeExtensions, NativeLargeBlobInput, NativePrfInput,
        NativeRequest, NativeUser, PrfSalts,
    },
    state::{CeremonyState, StateLookup, StateTable},
    store::{AuthorizationState, PlatformCredentialStore, PlatformVersion, StoredCredential},
};

#[cfg(any(test, feature = "testable"))]
pub use self::{
    attestation::MockAttestationParser,
    controller::{MockAuthorizationController, MockPresentationAnchorProvider},
    store::MockPlatformCredentialStore,
};
