//! # Platform Passkey Client
//!
//! This crate defines a [`Client`] that runs WebAuthn registration and authentication ceremonies
//! against the native platform authenticator and, where allowed, an external security key. The
//! cryptography and the user interface belong to the platform, reached through the traits of
//! [`platform_passkey_native`]. The [`Client`] takes care of everything the WebAuthn
//! specification asks of a client around them:
//!
//! * validating the RP ID against the calling origin, see [`RpIdVerifier`],
//! * building the exact `clientDataJSON` the relying party verifies, including `crossOrigin`,
//! * translating the `prf`, `largeBlob` and `credProps` extensions,
//! * running both authenticator classes as one ceremony that settles exactly once,
//! * converting the native result, including the credential public key as DER SPKI.
//!
//! [`PasskeyLister`] lists the passkeys the platform stores for a relying party.
//!
//! This crate does not provide any code to perform networking requests to and from Relying
//! Parties.

use std::sync::Arc;

use platform_passkey_native::{
    AttestationParser, AuthorizationController, CborAttestationParser, CeremonyKind,
    PresentationAnchor, PresentationAnchorProvider, StateTable, WindowHandle,
};
use platform_passkey_types::webauthn::{
    AuthenticatedPublicKeyCredential, AuthenticationExtensionsClientInputs, CeremonyOutcome,
    ClientDataType, CreatedPublicKeyCredential, CredentialCreationOptions,
    CredentialRequestOptions,
};
use url::Url;

mod ceremony;
mod client_data;
mod config;
mod error;
mod extensions;
mod normalize;
mod passkeys;
mod rp_id_verifier;
mod spki;

pub use self::{
    ceremony::{build_create_requests, build_get_requests, run, SECURITY_KEY_ALGORITHMS},
    client_data::{build_client_data, hash_client_data, ClientDataHash},
    config::{CeremonyPolicy, ClientConfig, DEFAULT_TIMEOUT, MAX_TIMEOUT},
    error::{
        classify_native_error, WebauthnError, EXCLUDED_CREDENTIAL_MARKERS, NOT_ALLOWED_MARKERS,
    },
    extensions::{
        negotiate, ExtensionTags, ExtensionWarning, NegotiatedExtensions, Negotiation,
    },
    passkeys::{ListError, PasskeyInfo, PasskeyLister, MINIMUM_PLATFORM_VERSION},
    rp_id_verifier::{PublicSuffix, RpIdRejection, RpIdValidation, RpIdVerifier},
    spki::{encode_ec2_public_key, public_key_der_from_cose_key, SpkiError, P256_SPKI_LEN},
};

#[cfg(test)]
mod tests;

/// Where a ceremony was requested from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    /// The origin of the document that made the request.
    pub origin: String,
    /// The origin of the top level document, if the request came from a nested frame.
    pub top_frame_origin: Option<String>,
    /// The window the authenticator prompt is attached to.
    pub window: WindowHandle,
}

impl CallerContext {
    /// A request from the top level document at `origin`.
    pub fn new(origin: impl Into<String>, window: WindowHandle) -> Self {
        Self {
            origin: origin.into(),
            top_frame_origin: None,
            window,
        }
    }

    /// Mark the request as coming from a frame nested in `top_frame_origin`.
    pub fn with_top_frame_origin(mut self, top_frame_origin: impl Into<String>) -> Self {
        self.top_frame_origin = Some(top_frame_origin.into());
        self
    }

    fn urls(&self) -> Result<(Url, Option<Url>), WebauthnError> {
        let origin = Url::parse(&self.origin).map_err(|_| WebauthnError::InvalidOrigin)?;
        let top_frame_origin = self
            .top_frame_origin
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|_| WebauthnError::InvalidTopOrigin)?;
        Ok((origin, top_frame_origin))
    }
}

type WarningCallback = Box<dyn Fn(ExtensionWarning) + Send + Sync>;

/// A `Client` represents a Webauthn client running on top of the native platform authenticator.
///
/// Users of this struct supply an [`AuthorizationController`] that runs native ceremonies and a
/// [`PresentationAnchorProvider`] that resolves the caller's window. Attestation objects are read
/// with a [`CborAttestationParser`] unless another [`AttestationParser`] is configured.
pub struct Client {
    controller: Arc<dyn AuthorizationController>,
    anchors: Arc<dyn PresentationAnchorProvider>,
    attestation_parser: Box<dyn AttestationParser>,
    rp_id_verifier: RpIdVerifier,
    policy: CeremonyPolicy,
    states: Arc<StateTable>,
    on_extension_warning: Option<WarningCallback>,
}

impl Client {
    /// Create a `Client` with the default policy and no public suffix list.
    pub fn new(
        controller: impl AuthorizationController + 'static,
        anchors: impl PresentationAnchorProvider + 'static,
    ) -> Self {
        Self {
            controller: Arc::new(controller),
            anchors: Arc::new(anchors),
            attestation_parser: Box::new(CborAttestationParser),
            rp_id_verifier: RpIdVerifier::new(),
            policy: CeremonyPolicy::default(),
            states: Arc::new(StateTable::new()),
            on_extension_warning: None,
        }
    }

    /// Apply a host supplied configuration.
    pub fn with_config(self, config: &ClientConfig) -> Self {
        self.allows_insecure_localhost(config.allow_insecure_localhost)
            .with_policy(config.policy())
    }

    /// Allows the internal [RpIdVerifier] to pass through localhost requests.
    pub fn allows_insecure_localhost(mut self, is_allowed: bool) -> Self {
        self.rp_id_verifier = self.rp_id_verifier.allows_insecure_localhost(is_allowed);
        self
    }

    /// Reject RP IDs that `public_suffix` reports as public suffixes.
    pub fn with_public_suffix(mut self, public_suffix: impl PublicSuffix + 'static) -> Self {
        self.rp_id_verifier = self.rp_id_verifier.with_public_suffix(public_suffix);
        self
    }

    /// Use `policy` for ceremony timeouts.
    pub fn with_policy(mut self, policy: CeremonyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Read attestation objects with `parser`.
    pub fn with_attestation_parser(mut self, parser: impl AttestationParser + 'static) -> Self {
        self.attestation_parser = Box::new(parser);
        self
    }

    /// Share the state of in-flight ceremonies with other clients.
    pub fn with_state_table(mut self, states: Arc<StateTable>) -> Self {
        self.states = states;
        self
    }

    /// Call `callback` for every extension input that is dropped.
    pub fn on_extension_warning(
        mut self,
        callback: impl Fn(ExtensionWarning) + Send + Sync + 'static,
    ) -> Self {
        self.on_extension_warning = Some(Box::new(callback));
        self
    }

    /// Read access to the Client's [`RpIdVerifier`].
    pub fn rp_id_verifier(&self) -> &RpIdVerifier {
        &self.rp_id_verifier
    }

    /// The state of in-flight ceremonies.
    pub fn state_table(&self) -> &Arc<StateTable> {
        &self.states
    }

    fn negotiate(
        &self,
        kind: CeremonyKind,
        inputs: Option<&AuthenticationExtensionsClientInputs>,
    ) -> Result<Negotiation, WebauthnError> {
        let negotiation = negotiate(kind, inputs)?;
        if let Some(callback) = self.on_extension_warning.as_ref() {
            for warning in &negotiation.warnings {
                callback(*warning);
            }
        }
        Ok(negotiation)
    }

    fn anchor(&self, window: &WindowHandle) -> Result<PresentationAnchor, WebauthnError> {
        self.anchors.anchor(window).map_err(|e| {
            log::debug!("Could not resolve window handle: {e}");
            WebauthnError::InvalidWindowHandle
        })
    }

    /// Register a webauthn `request` made by `context`.
    ///
    /// Returns either a [`CreatedPublicKeyCredential`] on success or some [`WebauthnError`].
    pub async fn register(
        &self,
        context: &CallerContext,
        request: CredentialCreationOptions,
    ) -> Result<CreatedPublicKeyCredential, WebauthnError> {
        let request = request.public_key;

        let (origin, top_frame_origin) = context.urls()?;
        if request.challenge.is_empty() {
            return Err(WebauthnError::EmptyChallenge);
        }
        if request.user.id.is_empty() {
            return Err(WebauthnError::MissingUserId);
        }

        let rp_id = self
            .rp_id_verifier
            .assert_domain(&context.origin, request.rp.id.as_deref())?;
        let negotiation = self.negotiate(CeremonyKind::Create, request.extensions.as_ref())?;

        let client_data = build_client_data(
            ClientDataType::Create,
            &origin,
            &request.challenge,
            top_frame_origin.as_ref(),
        );
        let client_data = hash_client_data(&client_data)
            .map_err(|e| WebauthnError::InvalidClientData(e.to_string()))?;

        let anchor = self.anchor(&context.window)?;

        let (requests, state) = build_create_requests(
            &rp_id,
            &request,
            client_data.hash,
            &negotiation.extensions,
        );
        let timeout = self.policy.effective_timeout(request.timeout);
        let credential = run(
            self.controller.as_ref(),
            &self.states,
            CeremonyKind::Create,
            requests,
            state,
            anchor,
            timeout,
        )
        .await?;

        normalize::registration(
            credential,
            client_data.json,
            &negotiation.extensions,
            self.attestation_parser.as_ref(),
        )
    }

    /// Authenticate a Webauthn `request` made by `context`.
    ///
    /// Returns either an [`AuthenticatedPublicKeyCredential`] on success or some [`WebauthnError`].
    pub async fn authenticate(
        &self,
        context: &CallerContext,
        request: CredentialRequestOptions,
    ) -> Result<AuthenticatedPublicKeyCredential, WebauthnError> {
        let request = request.public_key;

        let (origin, top_frame_origin) = context.urls()?;
        if request.challenge.is_empty() {
            return Err(WebauthnError::EmptyChallenge);
        }

        let rp_id = self
            .rp_id_verifier
            .assert_domain(&context.origin, request.rp_id.as_deref())?;
        let negotiation = self.negotiate(CeremonyKind::Get, request.extensions.as_ref())?;

        let client_data = build_client_data(
            ClientDataType::Get,
            &origin,
            &request.challenge,
            top_frame_origin.as_ref(),
        );
        let client_data = hash_client_data(&client_data)
            .map_err(|e| WebauthnError::InvalidClientData(e.to_string()))?;

        let anchor = self.anchor(&context.window)?;

        let (requests, state) =
            build_get_requests(&rp_id, &request, client_data.hash, &negotiation.extensions);
        let timeout = self.policy.effective_timeout(request.timeout);
        let credential = run(
            self.controller.as_ref(),
            &self.states,
            CeremonyKind::Get,
            requests,
            state,
            anchor,
            timeout,
        )
        .await?;

        normalize::assertion(credential, client_data.json)
    }

    /// [`Self::register`], with the result in the shape returned to web content.
    pub async fn create(
        &self,
        context: &CallerContext,
        request: CredentialCreationOptions,
    ) -> CeremonyOutcome<CreatedPublicKeyCredential> {
        match self.register(context, request).await {
            Ok(credential) => CeremonyOutcome::Success(credential),
            Err(e) => {
                log::debug!("Registration for {} failed: {e}", context.origin);
                e.into_outcome()
            }
        }
    }

    /// [`Self::authenticate`], with the result in the shape returned to web content.
    pub async fn get(
        &self,
        context: &CallerContext,
        request: CredentialRequestOptions,
    ) -> CeremonyOutcome<AuthenticatedPublicKeyCredential> {
        match self.authenticate(context, request).await {
            Ok(credential) => CeremonyOutcome::Success(credential),
            Err(e) => {
                log::debug!("Authentication for {} failed: {e}", context.origin);
                e.into_outcome()
            }
        }
    }
}
