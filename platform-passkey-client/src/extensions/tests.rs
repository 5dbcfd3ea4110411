use platform_passkey_native::PrfSalts;
use platform_passkey_types::{
    webauthn::{ErrorKind, LargeBlobSupport},
    Bytes,
};

use super::*;

fn inputs(json: &str) -> AuthenticationExtensionsClientInputs {
    serde_json::from_str(json).expect("valid extension inputs")
}

#[test]
fn no_inputs_negotiate_nothing() {
    let negotiation = negotiate(CeremonyKind::Get, None).unwrap();
    assert_eq!(negotiation, Negotiation::default());
    assert!(negotiation.extensions.tags.is_empty());
}

#[test]
fn prf_eval_on_get() {
    let negotiation = negotiate(
        CeremonyKind::Get,
        Some(&inputs(r#"{"prf":{"eval":{"first":"AQID","second":"BAUG"}}}"#)),
    )
    .unwrap();

    assert_eq!(negotiation.extensions.tags, ExtensionTags::PRF);
    assert!(negotiation.warnings.is_empty());
    let prf = negotiation.extensions.prf.expect("prf input");
    assert_eq!(
        prf.eval,
        Some(PrfSalts {
            first: vec![1, 2, 3].into(),
            second: Some(vec![4, 5, 6].into()),
        })
    );
    assert!(prf.eval_by_credential.is_empty());
}

#[test]
fn prf_eval_by_credential_keys_are_decoded_and_ordered() {
    let negotiation = negotiate(
        CeremonyKind::Get,
        Some(&inputs(
            r#"{"prf":{"evalByCredential":{"BwgJ":{"first":"AQID"},"AAEC":{"first":"BAUG"}}}}"#,
        )),
    )
    .unwrap();

    let prf = negotiation.extensions.prf.expect("prf input");
    assert_eq!(prf.eval, None);
    let keys: Vec<&[u8]> = prf
        .eval_by_credential
        .keys()
        .map(|key| key.as_slice())
        .collect();
    assert_eq!(keys, vec![&[0u8, 1, 2][..], &[7u8, 8, 9][..]]);
    assert_eq!(
        prf.eval_by_credential[&Bytes::from(vec![7, 8, 9])].first.as_slice(),
        &[1, 2, 3]
    );
}

#[test]
fn bad_eval_by_credential_keys_are_type_errors() {
    for key in ["", "not base64!"] {
        let json = format!(r#"{{"prf":{{"evalByCredential":{{"{key}":{{"first":"AQID"}}}}}}}}"#);
        let err = negotiate(CeremonyKind::Get, Some(&inputs(&json))).unwrap_err();
        assert_eq!(err, WebauthnError::InvalidEvalByCredentialKey);
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }
}

#[test]
fn prf_without_inputs_is_skipped_with_a_warning() {
    let negotiation = negotiate(CeremonyKind::Create, Some(&inputs(r#"{"prf":{}}"#))).unwrap();
    assert_eq!(negotiation.extensions.prf, None);
    assert!(negotiation.extensions.tags.is_empty());
    assert_eq!(negotiation.warnings, vec![ExtensionWarning::PrfWithoutInputs]);
}

#[test]
fn prf_eval_by_credential_is_dropped_on_create() {
    let negotiation = negotiate(
        CeremonyKind::Create,
        Some(&inputs(
            r#"{"prf":{"eval":{"first":"AQID"},"evalByCredential":{"AAEC":{"first":"BAUG"}}}}"#,
        )),
    )
    .unwrap();

    let prf = negotiation.extensions.prf.expect("prf input");
    assert!(prf.eval.is_some());
    assert!(prf.eval_by_credential.is_empty());
    assert_eq!(
        negotiation.warnings,
        vec![ExtensionWarning::PrfEvalByCredentialOnCreate]
    );
}

#[test]
fn large_blob_on_get() {
    let read = negotiate(
        CeremonyKind::Get,
        Some(&inputs(r#"{"largeBlob":{"read":true}}"#)),
    )
    .unwrap();
    assert_eq!(read.extensions.tags, ExtensionTags::LARGE_BLOB_READ);
    assert_eq!(
        read.extensions.large_blob,
        Some(NativeLargeBlobInput::Read)
    );

    let write = negotiate(
        CeremonyKind::Get,
        Some(&inputs(r#"{"largeBlob":{"write":"AQID"}}"#)),
    )
    .unwrap();
    assert_eq!(write.extensions.tags, ExtensionTags::LARGE_BLOB_WRITE);
    assert_eq!(
        write.extensions.large_blob,
        Some(NativeLargeBlobInput::Write(vec![1, 2, 3].into()))
    );
}

#[test]
fn unusable_large_blob_inputs_on_get_are_skipped() {
    for (json, warning) in [
        (r#"{"largeBlob":{}}"#, ExtensionWarning::LargeBlobWithoutOperation),
        (
            r#"{"largeBlob":{"read":false}}"#,
            ExtensionWarning::LargeBlobWithoutOperation,
        ),
        (
            r#"{"largeBlob":{"read":true,"write":"AQID"}}"#,
            ExtensionWarning::LargeBlobReadAndWrite,
        ),
        (
            r#"{"largeBlob":{"write":""}}"#,
            ExtensionWarning::LargeBlobEmptyWrite,
        ),
    ] {
        let negotiation = negotiate(CeremonyKind::Get, Some(&inputs(json))).unwrap();
        assert_eq!(negotiation.extensions.large_blob, None, "{json}");
        assert!(negotiation.extensions.tags.is_empty(), "{json}");
        assert_eq!(negotiation.warnings, vec![warning], "{json}");
    }
}

#[test]
fn large_blob_on_create() {
    let negotiation = negotiate(
        CeremonyKind::Create,
        Some(&inputs(r#"{"largeBlob":{"support":"required"}}"#)),
    )
    .unwrap();
    assert_eq!(negotiation.extensions.tags, ExtensionTags::LARGE_BLOB);
    assert_eq!(
        negotiation.extensions.large_blob,
        Some(NativeLargeBlobInput::Support(LargeBlobSupport::Required))
    );

    let negotiation =
        negotiate(CeremonyKind::Create, Some(&inputs(r#"{"largeBlob":{}}"#))).unwrap();
    assert_eq!(
        negotiation.extensions.large_blob,
        Some(NativeLargeBlobInput::Support(LargeBlobSupport::Preferred))
    );

    let negotiation = negotiate(
        CeremonyKind::Create,
        Some(&inputs(r#"{"largeBlob":{"support":"required","read":true}}"#)),
    )
    .unwrap();
    assert_eq!(negotiation.extensions.large_blob, None);
    assert_eq!(
        negotiation.warnings,
        vec![ExtensionWarning::LargeBlobOperationOnCreate]
    );
}

#[test]
fn cred_props_only_applies_to_create() {
    let json = r#"{"credProps":true}"#;
    let create = negotiate(CeremonyKind::Create, Some(&inputs(json))).unwrap();
    assert!(create.extensions.cred_props);
    assert_eq!(create.extensions.tags, ExtensionTags::CRED_PROPS);

    let get = negotiate(CeremonyKind::Get, Some(&inputs(json))).unwrap();
    assert!(!get.extensions.cred_props);
    assert!(get.extensions.tags.is_empty());
}

#[test]
fn security_keys_get_no_extension_inputs() {
    let negotiation = negotiate(
        CeremonyKind::Get,
        Some(&inputs(
            r#"{"prf":{"eval":{"first":"AQID"}},"largeBlob":{"read":true}}"#,
        )),
    )
    .unwrap();
    assert_eq!(
        negotiation.extensions.tags,
        ExtensionTags::PRF | ExtensionTags::LARGE_BLOB_READ
    );

    let platform = negotiation
        .extensions
        .for_class(AuthenticatorClass::Platform);
    assert!(platform.prf.is_some());
    assert_eq!(platform.large_blob, Some(NativeLargeBlobInput::Read));

    let security_key = negotiation
        .extensions
        .for_class(AuthenticatorClass::SecurityKey);
    assert!(security_key.is_empty());
}
