use indexmap::IndexMap;
use platform_passkey_native::{CeremonyKind, NativePrfInput, PrfSalts};
use platform_passkey_types::{
    encoding,
    webauthn::{AuthenticationExtensionsPrfInputs, AuthenticationExtensionsPrfValues},
    Bytes,
};

use super::ExtensionWarning;
use crate::WebauthnError;

fn salts(values: &AuthenticationExtensionsPrfValues) -> PrfSalts {
    PrfSalts {
        first: values.first.clone(),
        second: values.second.clone(),
    }
}

pub(super) fn negotiate(
    kind: CeremonyKind,
    prf: &AuthenticationExtensionsPrfInputs,
    warnings: &mut Vec<ExtensionWarning>,
) -> Result<Option<NativePrfInput>, WebauthnError> {
    let eval = prf.eval.as_ref().map(salts);

    let eval_by_credential = match prf.eval_by_credential.as_ref() {
        Some(record) if kind == CeremonyKind::Create => {
            if !record.is_empty() {
                warnings.push(ExtensionWarning::PrfEvalByCredentialOnCreate);
            }
            IndexMap::new()
        }
        Some(record) => {
            // sorted so the native request does not depend on hash map iteration order
            let mut entries = record
                .iter()
                .map(|(key, values)| Ok((decode_credential_id(key)?, salts(values))))
                .collect::<Result<Vec<_>, WebauthnError>>()?;
            entries.sort_by(|(a, _), (b, _)| a.as_slice().cmp(b.as_slice()));
            entries.into_iter().collect()
        }
        None => IndexMap::new(),
    };

    if eval.is_none() && eval_by_credential.is_empty() {
        warnings.push(ExtensionWarning::PrfWithoutInputs);
        return Ok(None);
    }

    Ok(Some(NativePrfInput {
        eval,
        eval_by_credential,
    }))
}

fn decode_credential_id(key: &str) -> Result<Bytes, WebauthnError> {
    encoding::try_from_base64url(key)
        .filter(|id| !id.is_empty())
        .map(Bytes::from)
        .ok_or(WebauthnError::InvalidEvalByCredentialKey)
}
