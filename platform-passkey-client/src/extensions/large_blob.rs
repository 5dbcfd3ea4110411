use platform_passkey_native::{CeremonyKind, NativeLargeBlobInput};
use platform_passkey_types::webauthn::AuthenticationExtensionsLargeBlobInputs;

use super::ExtensionWarning;

pub(super) fn negotiate(
    kind: CeremonyKind,
    large_blob: &AuthenticationExtensionsLargeBlobInputs,
    warnings: &mut Vec<ExtensionWarning>,
) -> Option<NativeLargeBlobInput> {
    let read = large_blob.read == Some(true);
    let write = large_blob.write.as_ref();

    let (input, warning) = match kind {
        CeremonyKind::Create if read || write.is_some() => {
            (None, Some(ExtensionWarning::LargeBlobOperationOnCreate))
        }
        CeremonyKind::Create => (
            Some(NativeLargeBlobInput::Support(
                large_blob.support.unwrap_or_default(),
            )),
            None,
        ),
        CeremonyKind::Get => match (read, write) {
            (true, Some(_)) => (None, Some(ExtensionWarning::LargeBlobReadAndWrite)),
            (false, Some(blob)) if blob.is_empty() => {
                (None, Some(ExtensionWarning::LargeBlobEmptyWrite))
            }
            (false, Some(blob)) => (Some(NativeLargeBlobInput::Write(blob.clone())), None),
            (true, None) => (Some(NativeLargeBlobInput::Read), None),
            (false, None) => (None, Some(ExtensionWarning::LargeBlobWithoutOperation)),
        },
    };

    warnings.extend(warning);
    input
}
