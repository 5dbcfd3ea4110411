use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use coset::{cbor::value::Value, iana, CborSerializable, CoseKey, CoseKeyBuilder};
use platform_passkey_native::{
    AuthenticatorClass, Ceremony, CeremonyId, CeremonyState, MockPresentationAnchorProvider,
    NativeAssertion, NativeAttachment, NativeCredential, NativeCredentialBody, NativeError,
    NativeErrorCode, NativeRegistration, NativeRequest,
};
use platform_passkey_types::{
    crypto::sha256,
    webauthn::{AuthenticatorAttachment, AuthenticatorTransport, ErrorKind},
    Bytes,
};
use serde_json::json;

use super::*;

type Responder = Box<dyn Fn(&Ceremony) -> Option<NativeCredentialResult> + Send + Sync>;
type NativeCredentialResult = Result<NativeCredential, NativeError>;

/// What the controller was asked to do.
#[derive(Debug)]
struct Performed {
    kind: CeremonyKind,
    requests: Vec<NativeRequest>,
    state: Option<CeremonyState>,
}

#[derive(Default, Clone)]
struct Journal {
    performed: Arc<Mutex<Vec<Performed>>>,
    cancelled: Arc<Mutex<Vec<CeremonyId>>>,
}

struct FakeController {
    respond: Responder,
    journal: Journal,
}

impl AuthorizationController for FakeController {
    fn perform(&self, ceremony: Ceremony) {
        self.journal.performed.lock().unwrap().push(Performed {
            kind: ceremony.kind,
            requests: ceremony.requests.clone(),
            state: ceremony.state.current(),
        });
        match (self.respond)(&ceremony) {
            Some(Ok(credential)) => ceremony.completion.succeed(credential),
            Some(Err(error)) => ceremony.completion.fail(error),
            None => {}
        }
    }

    fn cancel(&self, id: CeremonyId) {
        self.journal.cancelled.lock().unwrap().push(id);
    }
}

fn anchors() -> MockPresentationAnchorProvider {
    let mut anchors = MockPresentationAnchorProvider::new();
    anchors
        .expect_anchor()
        .returning(|_| Ok(PresentationAnchor::new("main window")));
    anchors
}

fn client(
    respond: impl Fn(&Ceremony) -> Option<NativeCredentialResult> + Send + Sync + 'static,
) -> (Client, Journal) {
    let journal = Journal::default();
    let controller = FakeController {
        respond: Box::new(respond),
        journal: journal.clone(),
    };
    (Client::new(controller, anchors()), journal)
}

fn context(origin: &str) -> CallerContext {
    CallerContext::new(origin, WindowHandle::new(vec![0x2a]))
}

fn p256_key() -> CoseKey {
    CoseKeyBuilder::new_ec2_pub_key(iana::EllipticCurve::P_256, vec![3; 32], vec![4; 32])
        .algorithm(iana::Algorithm::ES256)
        .build()
}

fn attestation_object(credential_id: &[u8]) -> Vec<u8> {
    let mut auth_data = sha256(b"example.com").to_vec();
    // UP | UV | AT
    auth_data.push(0x45);
    auth_data.extend_from_slice(&0u32.to_be_bytes());
    auth_data.extend_from_slice(&[0; 16]);
    auth_data.extend_from_slice(&u16::try_from(credential_id.len()).unwrap().to_be_bytes());
    auth_data.extend_from_slice(credential_id);
    auth_data.extend(p256_key().to_vec().unwrap());

    let value = Value::Map(vec![
        (Value::Text("fmt".into()), Value::Text("none".into())),
        (Value::Text("attStmt".into()), Value::Map(vec![])),
        (Value::Text("authData".into()), Value::Bytes(auth_data)),
    ]);
    let mut buf = Vec::new();
    coset::cbor::ser::into_writer(&value, &mut buf).unwrap();
    buf
}

fn registration() -> NativeCredential {
    NativeCredential {
        class: AuthenticatorClass::Platform,
        attachment: NativeAttachment::Platform,
        credential_id: vec![0xc0; 16].into(),
        body: NativeCredentialBody::Registration(NativeRegistration {
            attestation_object: attestation_object(&[0xc0; 16]).into(),
            transports: vec![AuthenticatorTransport::Internal, AuthenticatorTransport::Hybrid],
            prf: None,
            large_blob_supported: None,
        }),
    }
}

fn assertion(class: AuthenticatorClass) -> NativeCredential {
    NativeCredential {
        class,
        attachment: NativeAttachment::CrossPlatform,
        credential_id: vec![0xc0; 16].into(),
        body: NativeCredentialBody::Assertion(NativeAssertion {
            authenticator_data: vec![0; 37].into(),
            signature: vec![0x30; 70].into(),
            user_handle: Some(vec![1, 2, 3].into()),
            prf: None,
            large_blob: None,
        }),
    }
}

fn creation_options(extra: serde_json::Value) -> CredentialCreationOptions {
    let mut public_key = json!({
        "rp": { "id": "example.com", "name": "Example" },
        "user": { "id": "AQID", "name": "ada@example.com", "displayName": "Ada" },
        "challenge": "Y2hhbGxlbmdl",
        "pubKeyCredParams": [{ "type": "public-key", "alg": -7 }],
    });
    if let (Some(options), serde_json::Value::Object(extra)) = (public_key.as_object_mut(), extra) {
        options.extend(extra);
    }
    serde_json::from_value(json!({ "publicKey": public_key })).expect("valid creation options")
}

fn request_options(extra: serde_json::Value) -> CredentialRequestOptions {
    let mut public_key = json!({
        "challenge": "Y2hhbGxlbmdl",
        "rpId": "example.com",
    });
    if let (Some(options), serde_json::Value::Object(extra)) = (public_key.as_object_mut(), extra) {
        options.extend(extra);
    }
    serde_json::from_value(json!({ "publicKey": public_key })).expect("valid request options")
}

#[tokio::test]
async fn register_end_to_end() {
    let (client, journal) = client(|_| Some(Ok(registration())));

    let credential = client
        .register(
            &context("https://accounts.example.com"),
            creation_options(json!({
                "authenticatorSelection": { "residentKey": "required" },
                "extensions": { "credProps": true },
            })),
        )
        .await
        .expect("registration succeeds");

    let client_data_json = credential.response.client_data_json.as_slice();
    assert_eq!(
        std::str::from_utf8(client_data_json).unwrap(),
        r#"{"type":"webauthn.create","challenge":"Y2hhbGxlbmdl","origin":"https://accounts.example.com","crossOrigin":false}"#
    );

    let performed = journal.performed.lock().unwrap();
    assert_eq!(performed.len(), 1);
    assert_eq!(performed[0].kind, CeremonyKind::Create);
    let state = performed[0].state.as_ref().expect("state while running");
    assert_eq!(state.client_data_hash, sha256(client_data_json));
    assert!(state.resident_key_required);
    assert_eq!(performed[0].requests.len(), 2);
    assert!(client.state_table().is_empty());

    assert_eq!(credential.id, "wMDAwMDAwMDAwMDAwMDAwA");
    assert_eq!(
        credential.authenticator_attachment,
        Some(AuthenticatorAttachment::Platform)
    );
    assert_eq!(credential.response.public_key_algorithm, -7);
    let public_key = credential.response.public_key.as_ref().expect("spki");
    assert_eq!(public_key.len(), P256_SPKI_LEN);
    assert_eq!(&public_key[27..59], &[3; 32]);
    assert_eq!(&public_key[59..], &[4; 32]);
    assert_eq!(
        credential
            .client_extension_results
            .cred_props
            .and_then(|props| props.discoverable),
        Some(true)
    );
}

#[tokio::test]
async fn authenticate_from_nested_frame() {
    let (client, journal) = client(|_| Some(Ok(assertion(AuthenticatorClass::SecurityKey))));

    let outcome = client
        .get(
            &context("https://example.com").with_top_frame_origin("https://shop.example.net"),
            request_options(json!({
                "allowCredentials": [{ "type": "public-key", "id": "AQID" }],
            })),
        )
        .await;

    let credential = match outcome {
        CeremonyOutcome::Success(credential) => credential,
        failure => panic!("expected success, got {failure:?}"),
    };
    let client_data: serde_json::Value =
        serde_json::from_slice(&credential.response.client_data_json).unwrap();
    assert_eq!(client_data["crossOrigin"], json!(true));
    assert_eq!(client_data["topOrigin"], json!("https://shop.example.net"));
    assert_eq!(
        credential.authenticator_attachment,
        Some(AuthenticatorAttachment::CrossPlatform)
    );

    let performed = journal.performed.lock().unwrap();
    let requests = &performed[0].requests;
    assert_eq!(requests[0].class(), AuthenticatorClass::Platform);
    assert_eq!(requests[0].allow_credentials().len(), 1);
    assert_eq!(requests[1].class(), AuthenticatorClass::SecurityKey);
    assert!(requests[1].allow_credentials().is_empty());
}

#[tokio::test]
async fn invalid_input_never_reaches_the_platform() {
    let (client, journal) = client(|_| panic!("the platform must not be called"));

    let cases = [
        (
            context("not a url"),
            creation_options(json!({})),
            ErrorKind::SecurityError,
        ),
        (
            context("https://example.com").with_top_frame_origin("::"),
            creation_options(json!({})),
            ErrorKind::TypeError,
        ),
        (
            context("https://example.com"),
            creation_options(json!({ "challenge": "" })),
            ErrorKind::TypeError,
        ),
        (
            context("https://example.com"),
            creation_options(json!({ "user": { "id": "", "name": "a", "displayName": "a" } })),
            ErrorKind::TypeError,
        ),
        (
            context("https://example.com"),
            creation_options(json!({ "rp": { "id": "com", "name": "Example" } })),
            ErrorKind::SecurityError,
        ),
        (
            context("http://example.com"),
            creation_options(json!({})),
            ErrorKind::SecurityError,
        ),
        (
            context("https://example.org"),
            creation_options(json!({})),
            ErrorKind::SecurityError,
        ),
    ];

    for (context, options, expected) in cases {
        let outcome = client.create(&context, options).await;
        assert_eq!(outcome.error_kind(), Some(expected), "{context:?}");
    }
    assert!(journal.performed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn bad_eval_by_credential_key_is_a_type_error() {
    let (client, journal) = client(|_| panic!("the platform must not be called"));

    let outcome = client
        .get(
            &context("https://example.com"),
            request_options(json!({
                "extensions": { "prf": { "evalByCredential": { "!!": { "first": "AQID" } } } },
            })),
        )
        .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::TypeError));
    assert!(journal.performed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unresolvable_window_is_a_type_error() {
    let journal = Journal::default();
    let controller = FakeController {
        respond: Box::new(|_| panic!("the platform must not be called")),
        journal: journal.clone(),
    };
    let mut anchors = MockPresentationAnchorProvider::new();
    anchors
        .expect_anchor()
        .with(mockall::predicate::eq(WindowHandle::new(vec![0x2a])))
        .returning(|_| Err(NativeError::new("window is gone")));
    let client = Client::new(controller, anchors);

    let err = client
        .authenticate(&context("https://example.com"), request_options(json!({})))
        .await
        .unwrap_err();

    assert_eq!(err, WebauthnError::InvalidWindowHandle);
    assert!(journal.performed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn excluded_credentials_are_invalid_state() {
    let (client, _) = client(|ceremony| {
        assert_eq!(
            ceremony.state.current().unwrap().exclude_credentials,
            vec![Bytes::from(vec![0xc0; 16])]
        );
        Some(Err(NativeError::from_raw(1006, "credential already exists")))
    });

    let outcome = client
        .create(
            &context("https://example.com"),
            creation_options(json!({
                "excludeCredentials": [{ "type": "public-key", "id": "wMDAwMDAwMDAwMDAwMDAwA" }],
            })),
        )
        .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidStateError));
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["success"], json!(false));
    assert_eq!(json["error"], json!("InvalidStateError"));
    assert_eq!(
        json["errorObject"]["message"],
        json!("credential already exists")
    );
    assert_eq!(
        NativeError::from_raw(1006, "").code,
        Some(NativeErrorCode::MatchedExcludedCredential)
    );
}

#[tokio::test(start_paused = true)]
async fn timeout_aborts_and_cancels() {
    let (client, journal) = client(|_| None);

    let started = tokio::time::Instant::now();
    let outcome = client
        .get(
            &context("https://example.com"),
            request_options(json!({ "timeout": 1500 })),
        )
        .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::AbortError));
    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert!(started.elapsed() < Duration::from_millis(1600));
    assert_eq!(journal.cancelled.lock().unwrap().len(), 1);
    assert!(client.state_table().is_empty());
}

#[tokio::test(start_paused = true)]
async fn abandoned_request_cancels_the_ceremony() {
    let (client, journal) = client(|_| None);

    let abandoned = tokio::time::timeout(
        Duration::from_secs(5),
        client.get(&context("https://example.com"), request_options(json!({}))),
    )
    .await;

    assert!(abandoned.is_err());
    assert_eq!(journal.performed.lock().unwrap().len(), 1);
    assert_eq!(journal.cancelled.lock().unwrap().len(), 1);
    assert!(client.state_table().is_empty());
}

#[tokio::test(start_paused = true)]
async fn configured_default_timeout_applies() {
    let (client, _) = client(|_| None);
    let client = client.with_config(&ClientConfig {
        default_timeout_ms: 2_000,
        ..Default::default()
    });

    let started = tokio::time::Instant::now();
    let outcome = client
        .get(
            &context("https://example.com"),
            request_options(json!({ "timeout": "soon" })),
        )
        .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::AbortError));
    assert!(started.elapsed() >= Duration::from_millis(2_000));
    assert!(started.elapsed() < DEFAULT_TIMEOUT);
}

#[tokio::test]
async fn extension_warnings_reach_the_callback() {
    let warnings = Arc::new(Mutex::new(Vec::new()));
    let (client, journal) = client(|_| Some(Ok(assertion(AuthenticatorClass::Platform))));
    let client = client.on_extension_warning({
        let warnings = warnings.clone();
        move |warning| warnings.lock().unwrap().push(warning)
    });

    client
        .authenticate(
            &context("https://example.com"),
            request_options(json!({ "extensions": { "largeBlob": { "write": "" } } })),
        )
        .await
        .expect("authentication succeeds");

    assert_eq!(
        *warnings.lock().unwrap(),
        vec![ExtensionWarning::LargeBlobEmptyWrite]
    );
    let performed = journal.performed.lock().unwrap();
    assert!(performed[0].requests[0].extensions().is_empty());
}

#[tokio::test]
async fn localhost_needs_to_be_allowed() {
    let (client, _) = client(|_| Some(Ok(assertion(AuthenticatorClass::Platform))));
    let options = || request_options(json!({ "rpId": "localhost" }));

    let outcome = client.get(&context("http://localhost:3000"), options()).await;
    assert!(outcome.is_success());

    let client = client.allows_insecure_localhost(false);
    let outcome = client.get(&context("http://localhost:3000"), options()).await;
    assert_eq!(outcome.error_kind(), Some(ErrorKind::SecurityError));
}

#[tokio::test]
async fn public_suffix_predicate_is_consulted() {
    let (client, _) = client(|_| Some(Ok(assertion(AuthenticatorClass::Platform))));
    let client = client.with_public_suffix(|domain: &str| domain == "example.com");

    let outcome = client
        .get(&context("https://example.com"), request_options(json!({})))
        .await;
    assert_eq!(outcome.error_kind(), Some(ErrorKind::SecurityError));
    assert!(!client.rp_id_verifier().is_valid_rp_id("example.com"));
}
