use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use coset::iana;
use platform_passkey_types::Bytes;

use crate::CeremonyId;

/// Per-ceremony values the native layer needs when it rebuilds its registration and assertion
/// options, and which a [`NativeRequest`](crate::NativeRequest) does not carry.
#[derive(Debug, Clone, PartialEq)]
pub struct CeremonyState {
    /// SHA-256 of the serialized client data.
    pub client_data_hash: [u8; 32],
    /// Credential ids excluded from registration.
    pub exclude_credentials: Vec<Bytes>,
    /// Acceptable credential algorithms.
    pub algorithms: Vec<iana::Algorithm>,
    /// Whether a discoverable credential is required.
    pub resident_key_required: bool,
}

/// Side table of in-flight ceremonies.
///
/// An entry is inserted when a ceremony is built and removed exactly once, when the ceremony
/// settles.
#[derive(Debug, Default)]
pub struct StateTable {
    entries: Mutex<HashMap<CeremonyId, CeremonyState>>,
}

impl StateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    // No operation leaves the map half-updated, poisoning can be ignored.
    fn entries(&self) -> MutexGuard<'_, HashMap<CeremonyId, CeremonyState>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert the state of a new ceremony. Returns `false` and leaves the table untouched if the
    /// id is already present.
    pub fn insert(&self, id: CeremonyId, state: CeremonyState) -> bool {
        let mut entries = self.entries();
        if entries.contains_key(&id) {
            log::warn!("Ceremony {id} already has state, refusing to overwrite it");
            return false;
        }
        entries.insert(id, state);
        true
    }

    /// A copy of the state of a ceremony, if it is still in flight.
    pub fn get(&self, id: CeremonyId) -> Option<CeremonyState> {
        self.entries().get(&id).cloned()
    }

    /// Remove the state of a ceremony, returning it if it was present.
    pub fn remove(&self, id: CeremonyId) -> Option<CeremonyState> {
        self.entries().remove(&id)
    }

    /// Whether the ceremony is still in flight.
    pub fn contains(&self, id: CeremonyId) -> bool {
        self.entries().contains_key(&id)
    }

    /// Number of in-flight ceremonies.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether no ceremony is in flight.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Read access to the state of one ceremony, handed to the native layer.
#[derive(Debug, Clone)]
pub struct StateLookup {
    table: Arc<StateTable>,
    id: CeremonyId,
}

impl StateLookup {
    /// Create a lookup for the ceremony `id`.
    pub fn new(table: Arc<StateTable>, id: CeremonyId) -> Self {
        Self { table, id }
    }

    /// The ceremony this lookup reads.
    pub fn id(&self) -> CeremonyId {
        self.id
    }

    /// The current state, `None` once the ceremony has settled.
    pub fn current(&self) -> Option<CeremonyState> {
        self.table.get(self.id)
    }
}
