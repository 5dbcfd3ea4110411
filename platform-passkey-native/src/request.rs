use coset::iana;
use indexmap::IndexMap;
use platform_passkey_types::{
    webauthn::{AttestationConveyancePreference, LargeBlobSupport, UserVerificationRequirement},
    Bytes,
};

/// The class of authenticator a [`NativeRequest`] is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum AuthenticatorClass {
    /// The built-in authenticator of the platform, usually backed by biometrics.
    #[strum(serialize = "platform")]
    Platform,
    /// A roaming authenticator reached over USB, NFC or BLE.
    #[strum(serialize = "security-key")]
    SecurityKey,
}

/// The direction of a ceremony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum CeremonyKind {
    /// Authentication, `navigator.credentials.get`.
    #[strum(serialize = "get")]
    Get,
    /// Registration, `navigator.credentials.create`.
    #[strum(serialize = "create")]
    Create,
}

/// User information for a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeUser {
    /// The user handle chosen by the relying party.
    pub id: Bytes,
    /// Human-palatable account identifier.
    pub name: String,
    /// Human-palatable display name.
    pub display_name: String,
}

/// A pair of PRF salts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrfSalts {
    /// First salt, always present.
    pub first: Bytes,
    /// Optional second salt.
    pub second: Option<Bytes>,
}

/// The PRF inputs handed to a platform request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativePrfInput {
    /// Salts evaluated for whichever credential ends up being used.
    pub eval: Option<PrfSalts>,
    /// Salts keyed by raw credential id, sorted by id.
    pub eval_by_credential: IndexMap<Bytes, PrfSalts>,
}

/// The large blob operation handed to a platform request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeLargeBlobInput {
    /// Registration: ask for large blob support.
    Support(LargeBlobSupport),
    /// Authentication: read the stored blob.
    Read,
    /// Authentication: replace the stored blob.
    Write(Bytes),
}

/// Extension inputs understood by the native layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeExtensions {
    /// Pseudo-random function evaluation.
    pub prf: Option<NativePrfInput>,
    /// Large blob storage.
    pub large_blob: Option<NativeLargeBlobInput>,
}

impl NativeExtensions {
    /// Whether no extension is requested.
    pub fn is_empty(&self) -> bool {
        self.prf.is_none() && self.large_blob.is_none()
    }
}

/// A single request to one class of authenticator.
///
/// A ceremony carries one of these per enabled [`AuthenticatorClass`]. The values that do not fit
/// here, such as the client data hash, are looked up through the ceremony's
/// [`StateLookup`](crate::StateLookup) when the native layer rebuilds its options.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeRequest {
    class: AuthenticatorClass,
    rp_id: String,
    challenge: Bytes,
    user: Option<NativeUser>,
    user_verification: UserVerificationRequirement,
    attestation: AttestationConveyancePreference,
    algorithms: Vec<iana::Algorithm>,
    exclude_credentials: Vec<Bytes>,
    allow_credentials: Vec<Bytes>,
    resident_key_required: bool,
    extensions: NativeExtensions,
}

impl NativeRequest {
    fn new(class: AuthenticatorClass, rp_id: impl Into<String>) -> Self {
        Self {
            class,
            rp_id: rp_id.into(),
            challenge: Bytes::default(),
            user: None,
            user_verification: UserVerificationRequirement::default(),
            attestation: AttestationConveyancePreference::default(),
            algorithms: Vec::new(),
            exclude_credentials: Vec::new(),
            allow_credentials: Vec::new(),
            resident_key_required: false,
            extensions: NativeExtensions::default(),
        }
    }

    /// Create a request for the platform authenticator.
    pub fn platform(rp_id: impl Into<String>) -> Self {
        Self::new(AuthenticatorClass::Platform, rp_id)
    }

    /// Create a request for an external security key.
    pub fn security_key(rp_id: impl Into<String>) -> Self {
        Self::new(AuthenticatorClass::SecurityKey, rp_id)
    }

    /// Set the challenge.
    pub fn set_challenge(&mut self, challenge: impl Into<Bytes>) -> &mut Self {
        self.challenge = challenge.into();
        self
    }

    /// Set the user of a registration request.
    pub fn set_user(&mut self, user: NativeUser) -> &mut Self {
        self.user = Some(user);
        self
    }

    /// Set the user verification preference.
    pub fn set_user_verification(&mut self, uv: UserVerificationRequirement) -> &mut Self {
        self.user_verification = uv;
        self
    }

    /// Set the attestation preference.
    pub fn set_attestation(&mut self, attestation: AttestationConveyancePreference) -> &mut Self {
        self.attestation = attestation;
        self
    }

    /// Set the acceptable credential algorithms, in order of preference.
    pub fn set_algorithms(&mut self, algorithms: Vec<iana::Algorithm>) -> &mut Self {
        self.algorithms = algorithms;
        self
    }

    /// Set the credential ids that must not be registered again.
    pub fn set_exclude_credentials(&mut self, ids: Vec<Bytes>) -> &mut Self {
        self.exclude_credentials = ids;
        self
    }

    /// Set the credential ids acceptable for an assertion.
    pub fn set_allow_credentials(&mut self, ids: Vec<Bytes>) -> &mut Self {
        self.allow_credentials = ids;
        self
    }

    /// Require a discoverable credential.
    pub fn set_resident_key_required(&mut self, required: bool) -> &mut Self {
        self.resident_key_required = required;
        self
    }

    /// Set the extension inputs.
    pub fn set_extensions(&mut self, extensions: NativeExtensions) -> &mut Self {
        self.extensions = extensions;
        self
    }

    /// The authenticator class this request targets.
    pub fn class(&self) -> AuthenticatorClass {
        self.class
    }

    /// The relying party id.
    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }

    /// The challenge.
    pub fn challenge(&self) -> &[u8] {
        &self.challenge
    }

    /// The user of a registration request.
    pub fn user(&self) -> Option<&NativeUser> {
        self.user.as_ref()
    }

    /// The user verification preference.
    pub fn user_verification(&self) -> UserVerificationRequirement {
        self.user_verification
    }

    /// The attestation preference.
    pub fn attestation(&self) -> AttestationConveyancePreference {
        self.attestation
    }

    /// The acceptable credential algorithms.
    pub fn algorithms(&self) -> &[iana::Algorithm] {
        &self.algorithms
    }

    /// The excluded credential ids.
    pub fn exclude_credentials(&self) -> &[Bytes] {
        &self.exclude_credentials
    }

    /// The allowed credential ids.
    pub fn allow_credentials(&self) -> &[Bytes] {
        &self.allow_credentials
    }

    /// Whether a discoverable credential is required.
    pub fn resident_key_required(&self) -> bool {
        self.resident_key_required
    }

    /// The extension inputs.
    pub fn extensions(&self) -> &NativeExtensions {
        &self.extensions
    }
}
