use std::{
    fmt,
    io::{Cursor, Read},
};

use bitflags::bitflags;
use ciborium::value::Value;
use coset::{AsCborValue, CoseKey};
use platform_passkey_types::Bytes;

bitflags! {
    /// Flags of the authenticator data.
    ///
    /// <https://w3c.github.io/webauthn/#authdata-flags>
    #[repr(transparent)]
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct AuthenticatorDataFlags: u8 {
        /// User Present, bit 0
        const UP = 1 << 0;
        /// User Verified, bit 2
        const UV = 1 << 2;
        /// Backup Eligibility, bit 3
        const BE = 1 << 3;
        /// Backup State, bit 4
        const BS = 1 << 4;
        /// Attested Credential Data, bit 6
        const AT = 1 << 6;
        /// Extension Data Included, bit 7
        const ED = 1 << 7;
    }
}

/// Reasons an attestation object could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttestationError {
    /// The attestation object is not a CBOR map.
    InvalidCbor,
    /// The `authData` entry is missing or is not a byte string.
    MissingAuthenticatorData,
    /// The authenticator data ended before a required field.
    TruncatedAuthenticatorData,
    /// The authenticator data has no attested credential.
    MissingAttestedCredential,
    /// The credential public key is not a valid COSE key.
    InvalidCredentialPublicKey,
}

impl fmt::Display for AttestationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidCbor => "attestation object is not a CBOR map",
            Self::MissingAuthenticatorData => "attestation object has no authenticator data",
            Self::TruncatedAuthenticatorData => "authenticator data is truncated",
            Self::MissingAttestedCredential => "authenticator data has no attested credential",
            Self::InvalidCredentialPublicKey => "credential public key is not a valid COSE key",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for AttestationError {}

/// The attested credential found in registration authenticator data.
#[derive(Debug, Clone, PartialEq)]
pub struct AttestedCredential {
    /// The AAGUID of the authenticator.
    pub aaguid: [u8; 16],
    /// The credential id.
    pub credential_id: Bytes,
    /// The credential public key.
    pub public_key: CoseKey,
}

/// Decoded authenticator data.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAuthenticatorData {
    /// SHA-256 of the relying party id.
    pub rp_id_hash: [u8; 32],
    /// The flags byte.
    pub flags: AuthenticatorDataFlags,
    /// Signature counter.
    pub counter: u32,
    /// Present when the `AT` flag is set.
    pub credential: Option<AttestedCredential>,
}

/// A decoded attestation object.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAttestation {
    /// The attestation statement format, `none` for most platform authenticators.
    pub format: String,
    /// The decoded authenticator data.
    pub authenticator_data: ParsedAuthenticatorData,
    /// The authenticator data as it appeared in the attestation object.
    pub raw_authenticator_data: Bytes,
}

impl ParsedAttestation {
    /// The attested credential, which every registration must carry.
    pub fn credential(&self) -> Result<&AttestedCredential, AttestationError> {
        self.authenticator_data
            .credential
            .as_ref()
            .ok_or(AttestationError::MissingAttestedCredential)
    }
}

/// Parses the attestation object returned by a registration.
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
pub trait AttestationParser: Send + Sync {
    /// Parse a CBOR encoded attestation object.
    fn parse(&self, attestation_object: &[u8]) -> Result<ParsedAttestation, AttestationError>;
}

/// An [`AttestationParser`] that decodes the CBOR structures directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborAttestationParser;

impl AttestationParser for CborAttestationParser {
    fn parse(&self, attestation_object: &[u8]) -> Result<ParsedAttestation, AttestationError> {
        let Value::Map(entries) = ciborium::de::from_reader(attestation_object)
            .map_err(|_| AttestationError::InvalidCbor)?
        else {
            return Err(AttestationError::InvalidCbor);
        };

        let mut format = String::new();
        let mut auth_data = None;
        for (key, value) in entries {
            match (key.as_text(), value) {
                (Some("fmt"), Value::Text(fmt)) => format = fmt,
                (Some("authData"), Value::Bytes(bytes)) => auth_data = Some(bytes),
                _ => {}
            }
        }
        let raw = auth_data.ok_or(AttestationError::MissingAuthenticatorData)?;

        Ok(ParsedAttestation {
            format,
            authenticator_data: parse_authenticator_data(&raw)?,
            raw_authenticator_data: raw.into(),
        })
    }
}

fn read_array<const N: usize, R: Read>(reader: &mut R) -> Result<[u8; N], AttestationError> {
    let mut buf = [0; N];
    reader
        .read_exact(&mut buf)
        .map_err(|_| AttestationError::TruncatedAuthenticatorData)?;
    Ok(buf)
}

fn parse_authenticator_data(data: &[u8]) -> Result<ParsedAuthenticatorData, AttestationError> {
    let mut reader = Cursor::new(data);

    // rpIdHash (32) | flags (1) | signCount (4) | attestedCredentialData? | extensions?
    let rp_id_hash = read_array::<32, _>(&mut reader)?;
    let [flags] = read_array::<1, _>(&mut reader)?;
    let flags = AuthenticatorDataFlags::from_bits_truncate(flags);
    let counter = u32::from_be_bytes(read_array(&mut reader)?);

    let credential = flags
        .contains(AuthenticatorDataFlags::AT)
        .then(|| parse_attested_credential(&mut reader))
        .transpose()?;

    Ok(ParsedAuthenticatorData {
        rp_id_hash,
        flags,
        counter,
        credential,
    })
}

fn parse_attested_credential<R: Read>(
    reader: &mut R,
) -> Result<AttestedCredential, AttestationError> {
    let aaguid = read_array(reader)?;
    let cred_len: usize = u16::from_be_bytes(read_array(reader)?).into();

    let mut credential_id = vec![0; cred_len];
    reader
        .read_exact(&mut credential_id)
        .map_err(|_| AttestationError::TruncatedAuthenticatorData)?;

    let key: Value = ciborium::de::from_reader(reader)
        .map_err(|_| AttestationError::InvalidCredentialPublicKey)?;
    let public_key =
        CoseKey::from_cbor_value(key).map_err(|_| AttestationError::InvalidCredentialPublicKey)?;

    Ok(AttestedCredential {
        aaguid,
        credential_id: credential_id.into(),
        public_key,
    })
}

#[cfg(test)]
mod tests {
    use coset::{iana, CborSerializable, CoseKeyBuilder, KeyType};

    use super::*;

    fn ec2_key() -> CoseKey {
        CoseKeyBuilder::new_ec2_pub_key(iana::EllipticCurve::P_256, vec![1; 32], vec![2; 32])
            .algorithm(iana::Algorithm::ES256)
            .build()
    }

    fn auth_data(flags: AuthenticatorDataFlags, credential_id: &[u8], key: &CoseKey) -> Vec<u8> {
        let mut data = vec![0xaa; 32];
        data.push(flags.bits());
        data.extend_from_slice(&5u32.to_be_bytes());
        if flags.contains(AuthenticatorDataFlags::AT) {
            data.extend_from_slice(&[0x11; 16]);
            data.extend_from_slice(&u16::try_from(credential_id.len()).unwrap().to_be_bytes());
            data.extend_from_slice(credential_id);
            data.extend(key.clone().to_vec().unwrap());
        }
        data
    }

    fn attestation_object(auth_data: Vec<u8>) -> Vec<u8> {
        let value = Value::Map(vec![
            (Value::Text("fmt".into()), Value::Text("none".into())),
            (Value::Text("attStmt".into()), Value::Map(vec![])),
            (Value::Text("authData".into()), Value::Bytes(auth_data)),
        ]);
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&value, &mut buf).unwrap();
        buf
    }

    #[test]
    fn parses_attested_credential() {
        let key = ec2_key();
        let flags =
            AuthenticatorDataFlags::UP | AuthenticatorDataFlags::UV | AuthenticatorDataFlags::AT;
        let data = auth_data(flags, &[9, 8, 7], &key);

        let parsed = CborAttestationParser
            .parse(&attestation_object(data.clone()))
            .expect("valid attestation object");

        assert_eq!(parsed.format, "none");
        assert_eq!(parsed.raw_authenticator_data.as_slice(), data.as_slice());
        assert_eq!(parsed.authenticator_data.rp_id_hash, [0xaa; 32]);
        assert_eq!(parsed.authenticator_data.counter, 5);
        assert_eq!(parsed.authenticator_data.flags, flags);

        let credential = parsed.credential().expect("attested credential");
        assert_eq!(credential.aaguid, [0x11; 16]);
        assert_eq!(credential.credential_id.as_slice(), &[9, 8, 7]);
        assert_eq!(
            credential.public_key.kty,
            KeyType::Assigned(iana::KeyType::EC2)
        );
        assert_eq!(credential.public_key, key);
    }

    #[test]
    fn missing_attested_credential_is_reported() {
        let data = auth_data(AuthenticatorDataFlags::UP, &[], &ec2_key());
        let parsed = CborAttestationParser
            .parse(&attestation_object(data))
            .expect("valid attestation object");

        assert_eq!(parsed.authenticator_data.credential, None);
        assert_eq!(
            parsed.credential(),
            Err(AttestationError::MissingAttestedCredential)
        );
    }

    #[test]
    fn truncated_authenticator_data_is_rejected() {
        let flags = AuthenticatorDataFlags::UP | AuthenticatorDataFlags::AT;
        let mut data = auth_data(flags, &[1; 16], &ec2_key());
        data.truncate(37 + 16 + 2 + 4);

        assert_eq!(
            CborAttestationParser.parse(&attestation_object(data)),
            Err(AttestationError::TruncatedAuthenticatorData)
        );
        assert_eq!(
            CborAttestationParser.parse(&attestation_object(vec![0; 10])),
            Err(AttestationError::TruncatedAuthenticatorData)
        );
    }

    #[test]
    fn garbage_key_is_rejected() {
        let flags = AuthenticatorDataFlags::UP | AuthenticatorDataFlags::AT;
        let mut data = auth_data(flags, &[1], &ec2_key());
        data.truncate(37 + 16 + 2 + 1);
        // a CBOR text string is not a COSE key
        data.extend_from_slice(&[0x61, b'x']);

        assert_eq!(
            CborAttestationParser.parse(&attestation_object(data)),
            Err(AttestationError::InvalidCredentialPublicKey)
        );
    }

    #[test]
    fn non_map_attestation_objects_are_rejected() {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&Value::Text("nope".into()), &mut buf).unwrap();
        assert_eq!(
            CborAttestationParser.parse(&buf),
            Err(AttestationError::InvalidCbor)
        );
        assert_eq!(
            CborAttestationParser.parse(&[0xff, 0x00]),
            Err(AttestationError::InvalidCbor)
        );

        let no_auth_data =
            Value::Map(vec![(Value::Text("fmt".into()), Value::Text("none".into()))]);
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&no_auth_data, &mut buf).unwrap();
        assert_eq!(
            CborAttestationParser.parse(&buf),
            Err(AttestationError::MissingAuthenticatorData)
        );
    }
}
