use std::{fmt, net::IpAddr};

use typeshare::typeshare;
use url::{Host, Url};

use crate::WebauthnError;

#[cfg(doc)]
use crate::Client;

#[cfg(test)]
mod tests;

/// Decides whether a domain is a public suffix, such as `com` or `co.uk`.
///
/// No list is bundled. Hosts plug in whichever public suffix list they already ship; any
/// `Fn(&str) -> bool` works.
pub trait PublicSuffix: Send + Sync {
    /// Whether `domain`, already lowercase ASCII, is a public suffix.
    fn is_public_suffix(&self, domain: &str) -> bool;
}

impl<F> PublicSuffix for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_public_suffix(&self, domain: &str) -> bool {
        self(domain)
    }
}

/// Why an RP ID was rejected for an origin.
#[typeshare]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, strum::AsRefStr)]
pub enum RpIdRejection {
    /// The origin is not a URL with a host.
    InvalidOrigin,
    /// The origin is not a secure context.
    InsecureOrigin,
    /// The RP ID is not a bare host name.
    InvalidRpId,
    /// The origin is an IP address and the RP ID is something else.
    IpAddressMismatch,
    /// The RP ID is an IP address but the origin is a domain.
    IpAddressForDomain,
    /// The origin is neither the RP ID nor one of its subdomains.
    OriginRpMismatch,
    /// The RP ID is a public suffix.
    PublicSuffix,
}

impl fmt::Display for RpIdRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidOrigin => "the origin has no valid host",
            Self::InsecureOrigin => "the origin is not a secure context",
            Self::InvalidRpId => "the RP ID is not a valid host",
            Self::IpAddressMismatch => "an IP address origin requires an identical RP ID",
            Self::IpAddressForDomain => "an IP address RP ID requires an IP address origin",
            Self::OriginRpMismatch => "the origin is not within the RP ID",
            Self::PublicSuffix => "the RP ID is a public suffix",
        };
        f.write_str(msg)
    }
}

/// The result of [`RpIdVerifier::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpIdValidation {
    /// The RP ID may be used by the origin.
    Ok {
        /// The normalized RP ID.
        rp_id: String,
    },
    /// The RP ID must not be used by the origin.
    Fail {
        /// The normalized RP ID, or the raw input if it never got that far.
        rp_id: String,
        /// Why it was rejected.
        reason: RpIdRejection,
    },
}

impl RpIdValidation {
    /// Whether the RP ID was accepted.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The accepted RP ID or the error to report.
    pub fn into_result(self) -> Result<String, WebauthnError> {
        match self {
            Self::Ok { rp_id } => Ok(rp_id),
            Self::Fail { reason, .. } => Err(WebauthnError::RpIdRejected(reason)),
        }
    }
}

/// Wrapper struct for verifying that a given RpId matches the request's origin.
///
/// While most cases should not use this type directly and instead use [`Client`], there are some
/// cases that warrant the need for checking an RpId in the same way that the client does, but without
/// the rest of pieces that the client needs.
pub struct RpIdVerifier {
    public_suffix: Option<Box<dyn PublicSuffix>>,
    allows_insecure_localhost: bool,
}

impl Default for RpIdVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RpIdVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpIdVerifier")
            .field("public_suffix", &self.public_suffix.is_some())
            .field("allows_insecure_localhost", &self.allows_insecure_localhost)
            .finish()
    }
}

impl RpIdVerifier {
    /// Create a verifier without a public suffix list that accepts insecure localhost origins.
    pub fn new() -> Self {
        Self {
            public_suffix: None,
            allows_insecure_localhost: true,
        }
    }

    /// Allows `http://localhost` and `http://` IP literal origins.
    pub fn allows_insecure_localhost(mut self, is_allowed: bool) -> Self {
        self.allows_insecure_localhost = is_allowed;
        self
    }

    /// Use `public_suffix` to reject RP IDs that are public suffixes.
    ///
    /// Without one, any RP ID without a dot other than `localhost` is rejected. This is stricter
    /// than a real list for single label intranet names and more lenient for multi label suffixes
    /// such as `co.uk`.
    pub fn with_public_suffix(mut self, public_suffix: impl PublicSuffix + 'static) -> Self {
        self.public_suffix = Some(Box::new(public_suffix));
        self
    }

    /// Parse the given Relying Party Id and verify it against the origin of the request.
    ///
    /// This follows the steps defined in: <https://html.spec.whatwg.org/multipage/browsers.html#is-a-registrable-domain-suffix-of-or-is-equal-to>
    /// with the public suffix check delegated to the configured [`PublicSuffix`].
    pub fn validate(&self, origin: &str, rp_id: Option<&str>) -> RpIdValidation {
        let raw_rp_id = rp_id.unwrap_or_default();
        let fail = |rp_id: &str, reason: RpIdRejection| {
            log::debug!("Rejecting RP ID {rp_id:?} for {origin:?}: {reason}");
            RpIdValidation::Fail {
                rp_id: rp_id.to_owned(),
                reason,
            }
        };

        let Ok(url) = Url::parse(origin) else {
            return fail(raw_rp_id, RpIdRejection::InvalidOrigin);
        };
        let (host, origin_is_ip) = match url.host() {
            Some(Host::Domain(domain)) => (normalize_host(domain), false),
            Some(Host::Ipv4(ip)) => (ip.to_string(), true),
            Some(Host::Ipv6(ip)) => (ip.to_string(), true),
            None => return fail(raw_rp_id, RpIdRejection::InvalidOrigin),
        };
        if host.is_empty() {
            return fail(raw_rp_id, RpIdRejection::InvalidOrigin);
        }

        if !self.is_secure_context(url.scheme(), &host, origin_is_ip) {
            return fail(raw_rp_id, RpIdRejection::InsecureOrigin);
        }

        let rp_id = match rp_id {
            Some(rp_id) => normalize_host(rp_id),
            None => host.clone(),
        };

        if !is_bare_host(&rp_id) {
            return fail(&rp_id, RpIdRejection::InvalidRpId);
        }

        // IP literals never take part in suffix matching
        if origin_is_ip {
            return if rp_id == host {
                RpIdValidation::Ok { rp_id }
            } else {
                fail(&rp_id, RpIdRejection::IpAddressMismatch)
            };
        }
        if rp_id.parse::<IpAddr>().is_ok() {
            return fail(&rp_id, RpIdRejection::IpAddressForDomain);
        }

        let is_same_or_subdomain = host == rp_id
            || host
                .strip_suffix(rp_id.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'));
        if !is_same_or_subdomain {
            return fail(&rp_id, RpIdRejection::OriginRpMismatch);
        }

        if self.is_public_suffix(&rp_id) {
            return fail(&rp_id, RpIdRejection::PublicSuffix);
        }

        RpIdValidation::Ok { rp_id }
    }

    /// Like [`Self::validate`], returning the effective RP ID or a [`WebauthnError`].
    pub fn assert_domain(
        &self,
        origin: &str,
        rp_id: Option<&str>,
    ) -> Result<String, WebauthnError> {
        self.validate(origin, rp_id).into_result()
    }

    /// Parse a given Relying Party ID and assert that it is valid to act as such.
    ///
    /// This method is only to assert that an RP ID passes the required checks.
    /// In order to ensure that a request's origin is in accordance with it's claimed RP ID,
    /// [`Self::validate`] should be used.
    ///
    /// An RP ID must be a bare host and must not be a public suffix, since that would allow it to
    /// act as a credential for unrelated services by other entities.
    pub fn is_valid_rp_id(&self, rp_id: &str) -> bool {
        let rp_id = normalize_host(rp_id);
        if !is_bare_host(&rp_id) {
            return false;
        }
        rp_id.parse::<IpAddr>().is_ok() || !self.is_public_suffix(&rp_id)
    }

    fn is_secure_context(&self, scheme: &str, host: &str, is_ip: bool) -> bool {
        match scheme {
            "https" | "wss" => true,
            "http" => self.allows_insecure_localhost && (is_ip || host == "localhost"),
            _ => false,
        }
    }

    fn is_public_suffix(&self, rp_id: &str) -> bool {
        if rp_id == "localhost" {
            return false;
        }
        match &self.public_suffix {
            Some(list) => list.is_public_suffix(rp_id),
            None => !rp_id.contains('.'),
        }
    }
}

/// Lowercase, drop a single trailing dot and convert to punycode. Hosts that cannot be converted
/// normalize to the empty string.
fn normalize_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    let host = host.strip_suffix('.').unwrap_or(&host);
    idna::domain_to_ascii(host).unwrap_or_default()
}

fn is_bare_host(host: &str) -> bool {
    !host.is_empty() && !host.contains(['/', ':', '@'])
}
