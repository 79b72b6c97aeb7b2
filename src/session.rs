use crate::core::{breed_is_preferred, filter_pending, SwipeEngine, SwipeObserver};
use crate::models::{CandidateProfile, DecisionRecord, Direction, PreferenceSet};
use crate::services::{
    decisions::load_list, load_preferences, DecisionStore, KeyValueStore, LocalDecisionStore,
    ProfileStore, StorageKey,
};

/// Application state for one owner's swiping session
///
/// Owns the candidate pool, the active preferences and the swipe engine,
/// which in turn owns the injected decision store.
pub struct MatchSession<D> {
    profiles: ProfileStore,
    preferences: PreferenceSet,
    engine: SwipeEngine<D>,
}

impl<D: DecisionStore> MatchSession<D> {
    pub fn new(profiles: ProfileStore, preferences: PreferenceSet, store: D) -> Self {
        let pending = derive_pending(&profiles, &preferences, &store);
        tracing::info!("Session started with {} pending candidates", pending.len());

        Self {
            profiles,
            preferences,
            engine: SwipeEngine::new(pending, store),
        }
    }

    pub fn with_drag_threshold(mut self, threshold: f64) -> Self {
        self.engine = self.engine.with_drag_threshold(threshold);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn SwipeObserver>) {
        self.engine.add_observer(observer);
    }

    pub fn engine(&self) -> &SwipeEngine<D> {
        &self.engine
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn preferences(&self) -> &PreferenceSet {
        &self.preferences
    }

    pub fn current(&self) -> Option<&CandidateProfile> {
        self.engine.current()
    }

    /// Match button
    pub fn like(&mut self) -> Option<DecisionRecord> {
        self.engine.decide(Direction::Right)
    }

    /// Skip button
    pub fn pass(&mut self) -> Option<DecisionRecord> {
        self.engine.decide(Direction::Left)
    }

    pub fn release_drag(&mut self, displacement: f64) -> Option<DecisionRecord> {
        self.engine.release_drag(displacement)
    }

    pub fn undo(&mut self) -> Option<DecisionRecord> {
        self.engine.undo()
    }

    /// Re-derive the pending sequence and return to its first candidate
    pub fn reset(&mut self) {
        let pending = derive_pending(&self.profiles, &self.preferences, self.engine.store());
        self.engine.reset(pending);
    }

    /// Forget every stored decision, then reset
    pub fn start_over(&mut self) {
        self.engine.store_mut().clear_all();
        self.reset();
    }

    /// Swap the preference set; takes effect immediately through a reset
    pub fn update_preferences(&mut self, preferences: PreferenceSet) {
        self.preferences = preferences;
        self.reset();
    }
}

impl<S: KeyValueStore> MatchSession<LocalDecisionStore<S>> {
    /// Build a session from everything stored under the well-known keys
    pub fn open(storage: S, seed: Vec<CandidateProfile>) -> Self {
        let profiles = ProfileStore::load(&storage, seed);
        let preferences = load_preferences(&storage);
        Self::new(profiles, preferences, LocalDecisionStore::open(storage))
    }

    /// Fresh read of the stored matches
    pub fn connections(&self) -> ConnectionsView {
        ConnectionsView::load(self.engine.store().storage(), &self.preferences)
    }
}

fn derive_pending<D: DecisionStore>(
    profiles: &ProfileStore,
    preferences: &PreferenceSet,
    store: &D,
) -> Vec<CandidateProfile> {
    filter_pending(
        profiles.candidates(),
        &store.matched_ids(),
        &store.skipped_ids(),
        preferences,
        profiles.owner(),
    )
}

/// One stored match as shown in the matches list
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub candidate: CandidateProfile,
    pub preferred_breed: bool,
}

/// Read-only list of matches, re-read from storage on every load
#[derive(Debug, Clone, Default)]
pub struct ConnectionsView {
    connections: Vec<Connection>,
}

impl ConnectionsView {
    pub fn load<S: KeyValueStore>(storage: &S, preferences: &PreferenceSet) -> Self {
        let connections = load_list(storage, StorageKey::CONNECTIONS)
            .into_iter()
            .map(|candidate| Connection {
                preferred_breed: breed_is_preferred(&candidate, preferences),
                candidate,
            })
            .collect();

        Self { connections }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
