//! DER `SubjectPublicKeyInfo` encoding of P-256 credential public keys.
//!
//! The `publicKey` member of a registration response is the credential key as SPKI. For P-256 the
//! encoding never varies in length, so it is a fixed prefix followed by the uncompressed point.

use std::fmt;

use coset::{
    iana::{self, EnumI64},
    CoseKey, KeyType, Label,
};
use platform_passkey_types::Bytes;

/// Length of a P-256 `SubjectPublicKeyInfo`.
pub const P256_SPKI_LEN: usize = 91;

const COORDINATE_LEN: usize = 32;

/// `SEQUENCE { SEQUENCE { id-ecPublicKey, prime256v1 }, BIT STRING { 0x04 ... } }`
const P256_SPKI_PREFIX: [u8; 27] = [
    0x30, 0x59, // SEQUENCE, 89 bytes
    0x30, 0x13, // SEQUENCE, 19 bytes
    0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, // OID 1.2.840.10045.2.1
    0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, // OID 1.2.840.10045.3.1.7
    0x03, 0x42, 0x00, // BIT STRING, 66 bytes, no unused bits
    0x04, // uncompressed point
];

/// Reasons a public key cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpkiError {
    /// A coordinate is empty or longer than 32 bytes after removing leading zeros.
    InvalidCoordinate,
    /// The COSE key is not an EC2 key.
    UnsupportedKeyType,
    /// The COSE key is not on P-256.
    UnsupportedCurve,
    /// The COSE key lacks a coordinate.
    MissingCoordinate,
}

impl fmt::Display for SpkiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidCoordinate => "coordinate does not fit in 32 bytes",
            Self::UnsupportedKeyType => "key is not an EC2 key",
            Self::UnsupportedCurve => "key is not on P-256",
            Self::MissingCoordinate => "key is missing a coordinate",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for SpkiError {}

/// Encode an uncompressed P-256 point given as big-endian coordinates.
///
/// Coordinates shorter than 32 bytes are left padded with zeros. Longer ones are accepted only if
/// the excess bytes are zeros.
pub fn encode_ec2_public_key(x: &[u8], y: &[u8]) -> Result<[u8; P256_SPKI_LEN], SpkiError> {
    let mut spki = [0; P256_SPKI_LEN];
    let (prefix, point) = spki.split_at_mut(P256_SPKI_PREFIX.len());
    prefix.copy_from_slice(&P256_SPKI_PREFIX);

    let (x_out, y_out) = point.split_at_mut(COORDINATE_LEN);
    write_coordinate(x_out, x)?;
    write_coordinate(y_out, y)?;

    Ok(spki)
}

fn write_coordinate(out: &mut [u8], coordinate: &[u8]) -> Result<(), SpkiError> {
    if coordinate.is_empty() {
        return Err(SpkiError::InvalidCoordinate);
    }
    let excess = coordinate.len().saturating_sub(out.len());
    let (leading, value) = coordinate.split_at(excess);
    if leading.iter().any(|b| *b != 0) {
        return Err(SpkiError::InvalidCoordinate);
    }

    let (padding, dest) = out.split_at_mut(out.len() - value.len());
    padding.fill(0);
    dest.copy_from_slice(value);
    Ok(())
}

/// Encode a COSE EC2 P-256 key as DER `SubjectPublicKeyInfo`.
pub fn public_key_der_from_cose_key(key: &CoseKey) -> Result<Bytes, SpkiError> {
    if key.kty != KeyType::Assigned(iana::KeyType::EC2) {
        return Err(SpkiError::UnsupportedKeyType);
    }

    let (mut crv, mut x, mut y) = (None, None, None);
    for (label, value) in &key.params {
        let Label::Int(label) = label else {
            continue;
        };
        match iana::Ec2KeyParameter::from_i64(*label) {
            Some(iana::Ec2KeyParameter::Crv) => {
                crv = value.as_integer().and_then(|i| i64::try_from(i).ok());
            }
            Some(iana::Ec2KeyParameter::X) => {
                if value.as_bytes().and_then(|v| x.replace(v)).is_some() {
                    log::warn!("Cose key has multiple entries for X coordinate");
                }
            }
            Some(iana::Ec2KeyParameter::Y) => {
                if value.as_bytes().and_then(|v| y.replace(v)).is_some() {
                    log::warn!("Cose key has multiple entries for Y coordinate");
                }
            }
            _ => (),
        }
    }

    if crv != Some(iana::EllipticCurve::P_256.to_i64()) {
        return Err(SpkiError::UnsupportedCurve);
    }
    let (Some(x), Some(y)) = (x, y) else {
        return Err(SpkiError::MissingCoordinate);
    };

    encode_ec2_public_key(x, y).map(|spki| spki.to_vec().into())
}
