use super::*;

fn ok(rp_id: &str) -> RpIdValidation {
    RpIdValidation::Ok {
        rp_id: rp_id.into(),
    }
}

fn fail(rp_id: &str, reason: RpIdRejection) -> RpIdValidation {
    RpIdValidation::Fail {
        rp_id: rp_id.into(),
        reason,
    }
}

#[test]
fn subdomain_may_use_parent_rp_id() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.validate("https://accounts.example.com", Some("example.com")),
        ok("example.com")
    );
}

#[test]
fn rp_id_defaults_to_origin_host() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.validate("https://www.example.com:8443", None),
        ok("www.example.com")
    );
}

#[test]
fn public_suffix_rp_id_is_rejected() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.validate("https://example.com", Some("com")),
        fail("com", RpIdRejection::PublicSuffix)
    );

    let verifier = RpIdVerifier::new().with_public_suffix(|domain: &str| domain == "co.uk");
    assert_eq!(
        verifier.validate("https://shop.example.co.uk", Some("co.uk")),
        fail("co.uk", RpIdRejection::PublicSuffix)
    );
    assert_eq!(
        verifier.validate("https://shop.example.co.uk", Some("example.co.uk")),
        ok("example.co.uk")
    );
}

#[test]
fn injected_list_replaces_the_dot_fallback() {
    let verifier = RpIdVerifier::new().with_public_suffix(|_: &str| false);
    assert_eq!(
        verifier.validate("https://intranet", Some("intranet")),
        ok("intranet")
    );
}

#[test]
fn insecure_localhost() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.validate("http://localhost:3000", Some("localhost")),
        ok("localhost")
    );

    let verifier = verifier.allows_insecure_localhost(false);
    assert_eq!(
        verifier.validate("http://localhost:3000", Some("localhost")),
        fail("localhost", RpIdRejection::InsecureOrigin)
    );
    assert_eq!(
        verifier.validate("https://localhost:3000", Some("localhost")),
        ok("localhost")
    );
}

#[test]
fn plain_http_is_not_a_secure_context() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.validate("http://example.com", Some("example.com")),
        fail("example.com", RpIdRejection::InsecureOrigin)
    );
    assert_eq!(
        verifier.validate("ftp://example.com", None),
        fail("", RpIdRejection::InsecureOrigin)
    );
}

#[test]
fn ip_literal_origins_require_an_identical_rp_id() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.validate("https://203.0.113.5", Some("203.0.113.5")),
        ok("203.0.113.5")
    );
    assert_eq!(
        verifier.validate("https://203.0.113.5", Some("example.com")),
        fail("example.com", RpIdRejection::IpAddressMismatch)
    );
    assert_eq!(
        verifier.validate("http://127.0.0.1:8080", None),
        ok("127.0.0.1")
    );
}

#[test]
fn ip_literal_rp_id_requires_an_ip_origin() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.validate("https://example.com", Some("203.0.113.5")),
        fail("203.0.113.5", RpIdRejection::IpAddressForDomain)
    );
}

#[test]
fn unrelated_and_partial_label_matches_are_rejected() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.validate("https://example.com", Some("other.com")),
        fail("other.com", RpIdRejection::OriginRpMismatch)
    );
    assert_eq!(
        verifier.validate("https://notexample.com", Some("example.com")),
        fail("example.com", RpIdRejection::OriginRpMismatch)
    );
    assert_eq!(
        verifier.validate("https://example.com", Some("sub.example.com")),
        fail("sub.example.com", RpIdRejection::OriginRpMismatch)
    );
}

#[test]
fn rp_ids_must_be_bare_hosts() {
    let verifier = RpIdVerifier::new();
    for rp_id in ["example.com:443", "example.com/path", "user@example.com"] {
        let result = verifier.validate("https://example.com", Some(rp_id));
        assert!(
            matches!(
                result,
                RpIdValidation::Fail {
                    reason: RpIdRejection::InvalidRpId,
                    ..
                }
            ),
            "{rp_id} -> {result:?}"
        );
    }
}

#[test]
fn rp_ids_are_normalized() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.validate("https://accounts.example.com", Some("Example.COM.")),
        ok("example.com")
    );
    assert_eq!(
        verifier.validate("https://www.bücher.example", Some("bücher.example")),
        ok("xn--bcher-kva.example")
    );
}

#[test]
fn unparseable_origins_are_rejected() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.validate("not a url", Some("example.com")),
        fail("example.com", RpIdRejection::InvalidOrigin)
    );
    assert_eq!(
        verifier.validate("data:text/plain,hello", None),
        fail("", RpIdRejection::InvalidOrigin)
    );
}

#[test]
fn validation_results_convert_to_errors() {
    let verifier = RpIdVerifier::new();
    assert_eq!(
        verifier.assert_domain("https://example.com", Some("com")),
        Err(WebauthnError::RpIdRejected(RpIdRejection::PublicSuffix))
    );
    assert_eq!(
        verifier.assert_domain("https://example.com", None),
        Ok("example.com".to_owned())
    );
}

#[test]
fn valid_rp_id() {
    let verifier = RpIdVerifier::new();
    assert!(verifier.is_valid_rp_id("example.com"));
    assert!(verifier.is_valid_rp_id("localhost"));
    assert!(verifier.is_valid_rp_id("203.0.113.5"));
    assert!(!verifier.is_valid_rp_id("com"));
    assert!(!verifier.is_valid_rp_id("example.com:443"));
    assert!(!verifier.is_valid_rp_id(""));

    let verifier = verifier.with_public_suffix(|domain: &str| domain == "github.io");
    assert!(!verifier.is_valid_rp_id("github.io"));
    assert!(verifier.is_valid_rp_id("user.github.io"));
}
