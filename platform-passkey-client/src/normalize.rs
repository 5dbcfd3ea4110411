//! Conversion of native credentials into the WebAuthn result shape.

use coset::{iana::EnumI64, Algorithm};
use platform_passkey_native::{
    AttestationParser, AuthenticatorClass, NativeAssertion, NativeAttachment, NativeCredential,
    NativeCredentialBody, NativeLargeBlobOutput, NativePrfOutput, NativeRegistration,
};
use platform_passkey_types::{
    encoding,
    webauthn::{
        AuthenticatedPublicKeyCredential, AuthenticationExtensionsClientOutputs,
        AuthenticationExtensionsLargeBlobOutputs, AuthenticationExtensionsPrfOutputs,
        AuthenticationExtensionsPrfValues, AuthenticatorAssertionResponse,
        AuthenticatorAttachment, AuthenticatorAttestationResponse, CreatedPublicKeyCredential,
        CredentialPropertiesOutput, PublicKeyCredentialType,
    },
    Bytes,
};

use crate::{
    extensions::{ExtensionTags, NegotiatedExtensions},
    spki::{self, SpkiError},
    WebauthnError,
};

/// A credential is reported as `platform` only if it came from the platform request and the
/// platform agrees about where it lives.
fn attachment(credential: &NativeCredential) -> AuthenticatorAttachment {
    match (credential.class, credential.attachment) {
        (AuthenticatorClass::Platform, NativeAttachment::Platform) => {
            AuthenticatorAttachment::Platform
        }
        _ => AuthenticatorAttachment::CrossPlatform,
    }
}

fn prf_results(prf: &NativePrfOutput) -> Option<AuthenticationExtensionsPrfValues> {
    prf.first
        .as_deref()
        .map(|first| AuthenticationExtensionsPrfValues {
            first: first.into(),
            second: prf.second.as_deref().map(Bytes::from),
        })
}

/// Build the result of a create ceremony.
pub(crate) fn registration(
    credential: NativeCredential,
    client_data_json: Vec<u8>,
    extensions: &NegotiatedExtensions,
    parser: &dyn AttestationParser,
) -> Result<CreatedPublicKeyCredential, WebauthnError> {
    let attachment = attachment(&credential);
    let NativeCredentialBody::Registration(registration) = &credential.body else {
        return Err(WebauthnError::NotAllowed(
            "The platform returned an assertion for a registration".into(),
        ));
    };

    let attestation = parser
        .parse(&registration.attestation_object)
        .map_err(|e| WebauthnError::InvalidAttestation(e.to_string()))?;
    let key = &attestation
        .credential()
        .map_err(|e| WebauthnError::InvalidAttestation(e.to_string()))?
        .public_key;

    let public_key_algorithm = match key.alg.as_ref() {
        Some(Algorithm::Assigned(alg)) => alg.to_i64(),
        Some(Algorithm::PrivateUse(alg)) => *alg,
        Some(Algorithm::Text(_)) | None => {
            return Err(WebauthnError::InvalidAttestation(
                "credential public key has no algorithm".into(),
            ))
        }
    };
    let public_key = match spki::public_key_der_from_cose_key(key) {
        Ok(der) => Some(der),
        Err(SpkiError::UnsupportedKeyType | SpkiError::UnsupportedCurve) => None,
        Err(e) => {
            return Err(WebauthnError::InvalidAttestation(format!(
                "credential public key is malformed: {e}"
            )))
        }
    };

    let client_extension_results =
        registration_extension_outputs(credential.class, registration, extensions);

    Ok(CreatedPublicKeyCredential {
        id: encoding::base64url(&credential.credential_id),
        raw_id: credential.credential_id.clone(),
        ty: PublicKeyCredentialType::PublicKey,
        response: AuthenticatorAttestationResponse {
            client_data_json: client_data_json.into(),
            authenticator_data: attestation.raw_authenticator_data,
            public_key,
            public_key_algorithm,
            attestation_object: registration.attestation_object.clone(),
            transports: registration.transports.clone(),
        },
        authenticator_attachment: Some(attachment),
        client_extension_results,
    })
}

fn registration_extension_outputs(
    class: AuthenticatorClass,
    registration: &NativeRegistration,
    extensions: &NegotiatedExtensions,
) -> AuthenticationExtensionsClientOutputs {
    let is_platform = class == AuthenticatorClass::Platform;

    let prf = match registration.prf.as_ref() {
        Some(prf) => Some(AuthenticationExtensionsPrfOutputs {
            enabled: Some(prf.supported),
            results: prf_results(prf),
        }),
        None if is_platform && extensions.tags.contains(ExtensionTags::PRF) => {
            Some(AuthenticationExtensionsPrfOutputs {
                enabled: Some(false),
                results: None,
            })
        }
        None => None,
    };

    let wants_large_blob = is_platform && extensions.tags.contains(ExtensionTags::LARGE_BLOB);
    let large_blob = wants_large_blob.then(|| AuthenticationExtensionsLargeBlobOutputs {
        supported: Some(registration.large_blob_supported.unwrap_or(false)),
        ..Default::default()
    });

    // Only the platform request asks for a discoverable credential.
    let cred_props = (extensions.cred_props && is_platform).then_some(
        CredentialPropertiesOutput {
            discoverable: Some(true),
        },
    );

    AuthenticationExtensionsClientOutputs {
        cred_props,
        prf,
        large_blob,
    }
}

/// Build the result of a get ceremony.
pub(crate) fn assertion(
    credential: NativeCredential,
    client_data_json: Vec<u8>,
) -> Result<AuthenticatedPublicKeyCredential, WebauthnError> {
    let attachment = attachment(&credential);
    let NativeCredentialBody::Assertion(assertion) = credential.body else {
        return Err(WebauthnError::NotAllowed(
            "The platform returned a registration for an assertion".into(),
        ));
    };
    let client_extension_results = assertion_extension_outputs(&assertion);
    let NativeAssertion {
        authenticator_data,
        signature,
        user_handle,
        ..
    } = assertion;

    Ok(AuthenticatedPublicKeyCredential {
        id: encoding::base64url(&credential.credential_id),
        raw_id: credential.credential_id,
        ty: PublicKeyCredentialType::PublicKey,
        response: AuthenticatorAssertionResponse {
            client_data_json: client_data_json.into(),
            authenticator_data,
            signature,
            user_handle,
        },
        authenticator_attachment: Some(attachment),
        client_extension_results,
    })
}

fn assertion_extension_outputs(
    assertion: &NativeAssertion,
) -> AuthenticationExtensionsClientOutputs {
    let prf = assertion
        .prf
        .as_ref()
        .and_then(prf_results)
        .map(|results| AuthenticationExtensionsPrfOutputs {
            enabled: None,
            results: Some(results),
        });

    let large_blob = assertion.large_blob.as_ref().map(|output| match output {
        NativeLargeBlobOutput::Read(blob) => AuthenticationExtensionsLargeBlobOutputs {
            blob: blob.clone(),
            ..Default::default()
        },
        NativeLargeBlobOutput::Written(written) => AuthenticationExtensionsLargeBlobOutputs {
            written: Some(*written),
            ..Default::default()
        },
    });

    AuthenticationExtensionsClientOutputs {
        cred_props: None,
        prf,
        large_blob,
    }
}
