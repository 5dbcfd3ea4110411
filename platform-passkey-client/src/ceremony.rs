//! Orchestration of a single native ceremony.
//!
//! A ceremony goes through `Building → Pending → {Succeeded | Failed | Cancelled}`:
//!
//! * [`build_create_requests`] and [`build_get_requests`] build one [`NativeRequest`] per enabled
//!   authenticator class together with the [`CeremonyState`] the native layer reads back when it
//!   rebuilds its own options.
//! * [`run`] inserts the state, hands the requests to the [`AuthorizationController`] and waits
//!   for the first of success, failure or timeout. Whichever comes first removes the state and
//!   settles the ceremony. Everything that arrives afterwards is logged and dropped.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use coset::iana;
use platform_passkey_native::{
    AuthenticatorClass, AuthorizationController, Ceremony, CeremonyId, CeremonyKind,
    CeremonyState, CompletionSink, NativeCredential, NativeError, NativeRequest, NativeUser,
    PresentationAnchor, StateLookup, StateTable,
};
use platform_passkey_types::{
    webauthn::{
        AttestationConveyancePreference, AuthenticatorAttachment,
        PublicKeyCredentialCreationOptions, PublicKeyCredentialDescriptor,
        PublicKeyCredentialParameters, PublicKeyCredentialRequestOptions,
    },
    Bytes,
};
use tokio::sync::oneshot;

use crate::{classify_native_error, extensions::NegotiatedExtensions, WebauthnError};


/// Algorithms the security key stack can create credentials for.
pub const SECURITY_KEY_ALGORITHMS: &[iana::Algorithm] = &[iana::Algorithm::ES256];

fn credential_ids(descriptors: Option<&Vec<PublicKeyCredentialDescriptor>>) -> Vec<Bytes> {
    descriptors
        .into_iter()
        .flatten()
        .filter(|descriptor| descriptor.is_known())
        .map(|descriptor| descriptor.id.clone())
        .collect()
}

/// Build the requests of a create ceremony.
///
/// The platform request is always present. A security key request is added unless the caller
/// asked for a platform attachment, and only if it supports one of the requested algorithms.
pub fn build_create_requests(
    rp_id: &str,
    options: &PublicKeyCredentialCreationOptions,
    client_data_hash: [u8; 32],
    extensions: &NegotiatedExtensions,
) -> (Vec<NativeRequest>, CeremonyState) {
    let selection = options.authenticator_selection.clone().unwrap_or_default();
    let user_verification = selection.user_verification;
    let resident_key_required = selection.wants_resident_key();

    let params = if options.pub_key_cred_params.is_empty() {
        PublicKeyCredentialParameters::default_algorithms()
    } else {
        options.pub_key_cred_params.clone()
    };
    let algorithms: Vec<iana::Algorithm> = params.iter().map(|param| param.alg).collect();
    let exclude_credentials = credential_ids(options.exclude_credentials.as_ref());
    let user = NativeUser {
        id: options.user.id.clone(),
        name: options.user.name.clone(),
        display_name: options.user.display_name.clone(),
    };

    let mut platform = NativeRequest::platform(rp_id);
    platform
        .set_challenge(options.challenge.clone())
        .set_user(user.clone())
        .set_user_verification(user_verification)
        // the platform authenticator cannot attest
        .set_attestation(AttestationConveyancePreference::None)
        .set_algorithms(algorithms.clone())
        .set_exclude_credentials(exclude_credentials.clone())
        .set_resident_key_required(resident_key_required)
        .set_extensions(extensions.for_class(AuthenticatorClass::Platform));
    let mut requests = vec![platform];

    if selection.authenticator_attachment != Some(AuthenticatorAttachment::Platform) {
        let supported: Vec<iana::Algorithm> = algorithms
            .iter()
            .copied()
            .filter(|alg| SECURITY_KEY_ALGORITHMS.contains(alg))
            .collect();
        if supported.is_empty() {
            log::debug!("No requested algorithm is supported by security keys, skipping them");
        } else {
            // Requiring a resident key here would block hybrid pairing, so it stays off.
            let mut security_key = NativeRequest::security_key(rp_id);
            security_key
                .set_challenge(options.challenge.clone())
                .set_user(user)
                .set_user_verification(user_verification)
                .set_attestation(options.attestation)
                .set_algorithms(supported)
                .set_exclude_credentials(exclude_credentials.clone())
                .set_extensions(extensions.for_class(AuthenticatorClass::SecurityKey));
            requests.push(security_key);
        }
    }

    let state = CeremonyState {
        client_data_hash,
        exclude_credentials,
        algorithms,
        resident_key_required,
    };
    (requests, state)
}

/// Build the requests of a get ceremony.
///
/// The allow list only restricts the platform request.
pub fn build_get_requests(
    rp_id: &str,
    options: &PublicKeyCredentialRequestOptions,
    client_data_hash: [u8; 32],
    extensions: &NegotiatedExtensions,
) -> (Vec<NativeRequest>, CeremonyState) {
    let mut platform = NativeRequest::platform(rp_id);
    platform
        .set_challenge(options.challenge.clone())
        .set_user_verification(options.user_verification)
        .set_allow_credentials(credential_ids(options.allow_credentials.as_ref()))
        .set_extensions(extensions.for_class(AuthenticatorClass::Platform));

    let mut security_key = NativeRequest::security_key(rp_id);
    security_key
        .set_challenge(options.challenge.clone())
        .set_user_verification(options.user_verification)
        .set_extensions(extensions.for_class(AuthenticatorClass::SecurityKey));

    let state = CeremonyState {
        client_data_hash,
        exclude_credentials: Vec::new(),
        algorithms: Vec::new(),
        resident_key_required: false,
    };
    (vec![platform, security_key], state)
}

type NativeResult = Result<NativeCredential, NativeError>;

/// The completion sink of one ceremony.
///
/// Success, failure and timeout all go through `take`. Only the first caller gets
/// the sender, and it removes the ceremony state while still holding the lock.
struct Settlement {
    id: CeremonyId,
    table: Arc<StateTable>,
    sender: Mutex<Option<oneshot::Sender<NativeResult>>>,
}

impl Settlement {
    fn new(id: CeremonyId, table: Arc<StateTable>, sender: oneshot::Sender<NativeResult>) -> Self {
        Self {
            id,
            table,
            sender: Mutex::new(Some(sender)),
        }
    }

    fn take(&self) -> Option<oneshot::Sender<NativeResult>> {
        let mut sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let taken = sender.take();
        if taken.is_some() {
            self.table.remove(self.id);
        }
        taken
    }

    fn settle(&self, result: NativeResult) {
        let Some(sender) = self.take() else {
            match result {
                Ok(credential) => log::warn!(
                    "Ignoring {} credential for settled ceremony {}",
                    credential.class,
                    self.id
                ),
                Err(error) => {
                    log::warn!("Ignoring error for settled ceremony {}: {error}", self.id)
                }
            }
            return;
        };
        if sender.send(result).is_err() {
            log::debug!("Ceremony {} settled after its caller went away", self.id);
        }
    }
}

/// Cancels the ceremony if the future running it is dropped before it settles.
struct PendingCeremony<'a> {
    controller: &'a dyn AuthorizationController,
    settlement: Arc<Settlement>,
}

impl Drop for PendingCeremony<'_> {
    fn drop(&mut self) {
        if self.settlement.take().is_some() {
            let id = self.settlement.id;
            log::debug!("Ceremony {id} was abandoned before settling, cancelling");
            self.controller.cancel(id);
        }
    }
}

impl CompletionSink for Settlement {
    fn succeed(&self, credential: NativeCredential) {
        self.settle(Ok(credential));
    }

    fn fail(&self, error: NativeError) {
        self.settle(Err(error));
    }
}

/// Run the requests of a `kind` ceremony until the first terminal event.
///
/// Native failures are classified with [`classify_native_error`]. If `timeout` elapses first,
/// the controller is asked to cancel and the ceremony fails with [`WebauthnError::Timeout`].
/// Dropping the returned future before it completes cancels the ceremony the same way.
pub async fn run(
    controller: &dyn AuthorizationController,
    table: &Arc<StateTable>,
    kind: CeremonyKind,
    requests: Vec<NativeRequest>,
    state: CeremonyState,
    anchor: PresentationAnchor,
    timeout: Duration,
) -> Result<NativeCredential, WebauthnError> {
    let mut id = CeremonyId::random();
    while !table.insert(id, state.clone()) {
        id = CeremonyId::random();
    }

    let (sender, mut receiver) = oneshot::channel();
    let settlement = Arc::new(Settlement::new(id, table.clone(), sender));
    let pending = PendingCeremony {
        controller,
        settlement: settlement.clone(),
    };

    log::debug!(
        "Starting {kind} ceremony {id} with {} request(s), timeout {timeout:?}",
        requests.len()
    );
    controller.perform(Ceremony {
        id,
        kind,
        requests,
        anchor,
        state: StateLookup::new(table.clone(), id),
        completion: settlement.clone(),
    });

    let result = match tokio::time::timeout(timeout, &mut receiver).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(NativeError::new("The ceremony ended without a result")),
        Err(_) if settlement.take().is_some() => {
            log::debug!("Ceremony {id} timed out, cancelling");
            controller.cancel(id);
            return Err(WebauthnError::Timeout);
        }
        // a result was sent between the deadline and taking the sender
        Err(_) => receiver.try_recv().unwrap_or_else(|_| {
            Err(NativeError::new("The ceremony ended without a result"))
        }),
    };
    drop(pending);

    match result {
        Ok(credential) => {
            log::debug!("Ceremony {id} produced a {} credential", credential.class);
            Ok(credential)
        }
        Err(error) => {
            log::debug!("Ceremony {id} failed: {error}");
            Err(classify_native_error(&error, kind))
        }
    }
}
