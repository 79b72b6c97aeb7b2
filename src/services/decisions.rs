use crate::models::{CandidateId, CandidateProfile, PriorPlacement};
use crate::services::storage::{KeyValueStore, StorageKey};
use std::collections::HashSet;

/// Durable mirror of the matched and skipped candidate lists
///
/// Writes never fail from the caller's point of view: a storage failure is
/// logged and the in-memory lists keep the decision for the current session.
pub trait DecisionStore {
    /// Append a candidate to the matched list (no-op if already present)
    ///
    /// Returns where the candidate was stored before the call.
    fn record_match(&mut self, candidate: &CandidateProfile) -> PriorPlacement;

    /// Append a candidate to the skipped list (no-op if already present)
    ///
    /// Returns where the candidate was stored before the call.
    fn record_skip(&mut self, candidate: &CandidateProfile) -> PriorPlacement;

    /// Remove a candidate from whichever list holds it
    fn reverse_decision(&mut self, candidate: &CandidateProfile);

    /// Put a candidate back where it was before a recorded decision
    fn restore_decision(&mut self, candidate: &CandidateProfile, prior: PriorPlacement);

    /// Empty both lists
    fn clear_all(&mut self);

    fn matched(&self) -> &[CandidateProfile];

    fn skipped(&self) -> &[CandidateProfile];

    fn matched_ids(&self) -> HashSet<CandidateId> {
        self.matched().iter().map(|c| c.id.clone()).collect()
    }

    fn skipped_ids(&self) -> HashSet<CandidateId> {
        self.skipped().iter().map(|c| c.id.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecisionList {
    Matched,
    Skipped,
}

impl DecisionList {
    fn placement(self, index: usize) -> PriorPlacement {
        match self {
            DecisionList::Matched => PriorPlacement::Matched(index),
            DecisionList::Skipped => PriorPlacement::Skipped(index),
        }
    }

    fn key(self) -> &'static str {
        match self {
            DecisionList::Matched => StorageKey::CONNECTIONS,
            DecisionList::Skipped => StorageKey::SKIPPED,
        }
    }

    fn other(self) -> Self {
        match self {
            DecisionList::Matched => DecisionList::Skipped,
            DecisionList::Skipped => DecisionList::Matched,
        }
    }
}

/// Decision store backed by a key-value store
///
/// Lists live under `dogConnections` and `dogSkipped` as JSON arrays of full
/// candidate snapshots, oldest first.
#[derive(Debug)]
pub struct LocalDecisionStore<S> {
    storage: S,
    matched: Vec<CandidateProfile>,
    skipped: Vec<CandidateProfile>,
}

impl<S: KeyValueStore> LocalDecisionStore<S> {
    /// Load both lists from storage
    ///
    /// Missing, unreadable or malformed lists are treated as empty.
    pub fn open(storage: S) -> Self {
        let matched = load_list(&storage, StorageKey::CONNECTIONS);
        let skipped = load_list(&storage, StorageKey::SKIPPED);

        tracing::debug!(
            "Loaded decision lists: {} matched, {} skipped",
            matched.len(),
            skipped.len()
        );

        Self {
            storage,
            matched,
            skipped,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn list(&self, list: DecisionList) -> &Vec<CandidateProfile> {
        match list {
            DecisionList::Matched => &self.matched,
            DecisionList::Skipped => &self.skipped,
        }
    }

    fn list_mut(&mut self, list: DecisionList) -> &mut Vec<CandidateProfile> {
        match list {
            DecisionList::Matched => &mut self.matched,
            DecisionList::Skipped => &mut self.skipped,
        }
    }

    /// Write one list back; an empty list removes its key
    fn persist(&mut self, list: DecisionList) {
        let key = list.key();
        let entries = match list {
            DecisionList::Matched => &self.matched,
            DecisionList::Skipped => &self.skipped,
        };
        let result = if entries.is_empty() {
            self.storage.remove(key)
        } else {
            self.storage.set_json(key, entries)
        };

        if let Err(e) = result {
            tracing::warn!("Failed to persist {}, keeping in-memory state only: {}", key, e);
        }
    }

    fn position(&self, list: DecisionList, id: &CandidateId) -> Option<usize> {
        self.list(list).iter().position(|c| &c.id == id)
    }

    /// Remove a candidate from one list, returning its former index
    fn take(&mut self, list: DecisionList, id: &CandidateId) -> Option<usize> {
        let index = self.position(list, id)?;
        self.list_mut(list).remove(index);
        self.persist(list);
        Some(index)
    }

    fn record(&mut self, list: DecisionList, candidate: &CandidateProfile) -> PriorPlacement {
        if let Some(index) = self.position(list, &candidate.id) {
            tracing::debug!("{} already recorded in {}", candidate.id, list.key());
            return list.placement(index);
        }

        let other = list.other();
        let prior = match self.take(other, &candidate.id) {
            Some(index) => other.placement(index),
            None => PriorPlacement::Undecided,
        };

        self.list_mut(list).push(candidate.clone());
        self.persist(list);
        prior
    }

    /// Ensure a candidate sits in `list` at `index`, and nowhere else
    fn place(&mut self, list: DecisionList, candidate: &CandidateProfile, index: usize) {
        self.take(list.other(), &candidate.id);

        if self.position(list, &candidate.id).is_some() {
            return;
        }

        let entries = self.list_mut(list);
        let index = index.min(entries.len());
        entries.insert(index, candidate.clone());
        self.persist(list);
    }
}

impl<S: KeyValueStore> DecisionStore for LocalDecisionStore<S> {
    fn record_match(&mut self, candidate: &CandidateProfile) -> PriorPlacement {
        self.record(DecisionList::Matched, candidate)
    }

    fn record_skip(&mut self, candidate: &CandidateProfile) -> PriorPlacement {
        self.record(DecisionList::Skipped, candidate)
    }

    fn reverse_decision(&mut self, candidate: &CandidateProfile) {
        self.take(DecisionList::Matched, &candidate.id);
        self.take(DecisionList::Skipped, &candidate.id);
    }

    fn restore_decision(&mut self, candidate: &CandidateProfile, prior: PriorPlacement) {
        match prior {
            PriorPlacement::Undecided => self.reverse_decision(candidate),
            PriorPlacement::Matched(index) => self.place(DecisionList::Matched, candidate, index),
            PriorPlacement::Skipped(index) => self.place(DecisionList::Skipped, candidate, index),
        }
    }

    fn clear_all(&mut self) {
        self.matched.clear();
        self.skipped.clear();
        self.persist(DecisionList::Matched);
        self.persist(DecisionList::Skipped);

        tracing::info!("Cleared all recorded decisions");
    }

    fn matched(&self) -> &[CandidateProfile] {
        &self.matched
    }

    fn skipped(&self) -> &[CandidateProfile] {
        &self.skipped
    }
}

/// Read a persisted candidate list, falling back to empty on any failure
pub fn load_list<S: KeyValueStore>(storage: &S, key: &str) -> Vec<CandidateProfile> {
    match storage.get_json::<Vec<CandidateProfile>>(key) {
        Ok(Some(list)) => list,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("Ignoring unreadable {}: {}", key, e);
            Vec::new()
        }
    }
}
