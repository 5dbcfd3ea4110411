use std::{any::Any, fmt, sync::Arc};

use crate::{CeremonyKind, NativeCredential, NativeError, NativeRequest, StateLookup};

/// Identifies one ceremony across the native boundary.
///
/// Ids are random so that a stale id held by the native layer never aliases a newer ceremony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CeremonyId(u64);

impl CeremonyId {
    /// A fresh random id.
    pub fn random() -> Self {
        Self(rand::random())
    }

    /// Rebuild an id that crossed the native boundary as an integer.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The id as an integer, for the native boundary.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CeremonyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// An opaque handle to a host window, as provided by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowHandle(Vec<u8>);

impl WindowHandle {
    /// Wrap the raw bytes of a native window handle.
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self(raw.into())
    }

    /// The raw handle bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// The UI element the native authenticator prompt is attached to.
///
/// The contents are only meaningful to the host that created the anchor, so it is stored type
/// erased and recovered with [`PresentationAnchor::downcast_ref`].
#[derive(Clone)]
pub struct PresentationAnchor(Arc<dyn Any + Send + Sync>);

impl PresentationAnchor {
    /// Wrap a host specific anchor.
    pub fn new<T: Any + Send + Sync>(anchor: T) -> Self {
        Self(Arc::new(anchor))
    }

    /// Recover the host specific anchor.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for PresentationAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationAnchor").finish_non_exhaustive()
    }
}

/// Resolves a caller supplied [`WindowHandle`] to a [`PresentationAnchor`].
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
pub trait PresentationAnchorProvider: Send + Sync {
    /// Resolve `window`. Fails if the handle does not refer to a live window.
    fn anchor(&self, window: &WindowHandle) -> Result<PresentationAnchor, NativeError>;
}

/// Receives the outcome of a ceremony from the native layer.
///
/// The native layer may call either method any number of times and from any thread; only the
/// first call settles the ceremony and later ones are ignored.
pub trait CompletionSink: Send + Sync {
    /// A request of the ceremony produced a credential.
    fn succeed(&self, credential: NativeCredential);

    /// The ceremony failed.
    fn fail(&self, error: NativeError);
}

/// Everything the native layer needs to run one ceremony.
pub struct Ceremony {
    /// The id the ceremony is known by.
    pub id: CeremonyId,
    /// Registration or authentication.
    pub kind: CeremonyKind,
    /// One request per enabled authenticator class, run together.
    pub requests: Vec<NativeRequest>,
    /// Where to attach the authenticator prompt.
    pub anchor: PresentationAnchor,
    /// Access to the values the requests cannot carry.
    pub state: StateLookup,
    /// Where to report the outcome.
    pub completion: Arc<dyn CompletionSink>,
}

impl fmt::Debug for Ceremony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ceremony")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("requests", &self.requests)
            .field("anchor", &self.anchor)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// The native authorization layer.
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
pub trait AuthorizationController: Send + Sync {
    /// Start all requests of `ceremony` in a single native authorization and report the first
    /// result to its completion sink. Must not block waiting for the user.
    fn perform(&self, ceremony: Ceremony);

    /// Abort the ceremony `id` if it is still showing UI. Unknown ids are ignored.
    fn cancel(&self, id: CeremonyId);
}
