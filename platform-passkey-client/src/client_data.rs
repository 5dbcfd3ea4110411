//! Construction of the `clientDataJSON` passed to relying parties.
//!
//! The native platform builds its own client data, but it omits `crossOrigin` which many relying
//! parties require. Ceremonies therefore always use the client data built here and hand the
//! platform only its hash.

use platform_passkey_types::{
    crypto::sha256,
    encoding,
    webauthn::{ClientDataType, CollectedClientData},
};
use url::Url;

/// Serialized client data and its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDataHash {
    /// The exact UTF-8 JSON bytes returned to the relying party.
    pub json: Vec<u8>,
    /// `sha256(json)`, the value signed by the authenticator.
    pub hash: [u8; 32],
}

/// Build the client data for a ceremony.
///
/// `origin` is serialized as `scheme://host[:port]` with default ports omitted. When
/// `top_frame_origin` is given and is a different origin, `crossOrigin` is `true` and `topOrigin`
/// is set.
pub fn build_client_data(
    ty: ClientDataType,
    origin: &Url,
    challenge: &[u8],
    top_frame_origin: Option<&Url>,
) -> CollectedClientData {
    let origin = origin.origin();
    let top_origin = top_frame_origin
        .map(Url::origin)
        .filter(|top| *top != origin)
        .map(|top| top.ascii_serialization());

    CollectedClientData {
        ty,
        challenge: encoding::base64url(challenge),
        origin: origin.ascii_serialization(),
        cross_origin: top_origin.is_some(),
        top_origin,
    }
}

/// Serialize `client_data` and hash the result.
///
/// The field order of [`CollectedClientData`] is fixed, so equal inputs always produce identical
/// bytes.
pub fn hash_client_data(
    client_data: &CollectedClientData,
) -> Result<ClientDataHash, serde_json::Error> {
    let json = serde_json::to_vec(client_data)?;
    let hash = sha256(&json);
    Ok(ClientDataHash { json, hash })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn same_origin_top_frame_is_not_cross_origin() {
        let origin = url("https://a.com");
        let data = build_client_data(
            ClientDataType::Get,
            &origin,
            b"challenge",
            Some(&url("https://a.com:443/some/page")),
        );
        assert!(!data.cross_origin);
        assert_eq!(data.top_origin, None);

        let json = hash_client_data(&data).unwrap().json;
        assert_eq!(
            String::from_utf8(json).unwrap(),
            r#"{"type":"webauthn.get","challenge":"Y2hhbGxlbmdl","origin":"https://a.com","crossOrigin":false}"#
        );
    }

    #[test]
    fn different_top_frame_is_cross_origin() {
        let data = build_client_data(
            ClientDataType::Get,
            &url("https://a.com"),
            b"challenge",
            Some(&url("https://sub.a.com")),
        );
        assert!(data.cross_origin);
        assert_eq!(data.top_origin.as_deref(), Some("https://sub.a.com"));

        let json = String::from_utf8(hash_client_data(&data).unwrap().json).unwrap();
        assert!(json.ends_with(r#""crossOrigin":true,"topOrigin":"https://sub.a.com"}"#));
    }

    #[test]
    fn origin_keeps_non_default_ports_only() {
        let data = build_client_data(
            ClientDataType::Create,
            &url("https://example.com:8443/register?x=1"),
            &[1, 2, 3],
            None,
        );
        assert_eq!(data.origin, "https://example.com:8443");
        assert_eq!(data.challenge, "AQID");
        assert_eq!(data.ty, ClientDataType::Create);

        let data = build_client_data(
            ClientDataType::Create,
            &url("https://example.com:443/"),
            &[1, 2, 3],
            None,
        );
        assert_eq!(data.origin, "https://example.com");

        let data = build_client_data(
            ClientDataType::Create,
            &url("http://localhost:3000"),
            &[1, 2, 3],
            None,
        );
        assert_eq!(data.origin, "http://localhost:3000");
    }

    #[test]
    fn hashing_is_deterministic() {
        let build = || {
            build_client_data(
                ClientDataType::Create,
                &url("https://example.com"),
                &[0xde, 0xad, 0xbe, 0xef],
                Some(&url("https://top.example")),
            )
        };
        let first = hash_client_data(&build()).unwrap();
        let second = hash_client_data(&build()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.hash, sha256(&first.json));
    }
}
