// Integration tests for Pawmatch

use pawmatch::core::{EngineState, EventLog};
use pawmatch::models::{
    CandidateId, CandidateProfile, Direction, EnergyLevel, Friendliness, PreferenceSet, Size,
    SwipeEvent,
};
use pawmatch::services::{
    mock_profiles, save_preferences, DecisionStore, FileStore, KeyValueStore, LocalDecisionStore,
    MemoryStore, ProfileStore, StorageKey,
};
use pawmatch::MatchSession;
use tempfile::tempdir;

fn create_test_profile(id: &str, size: Size) -> CandidateProfile {
    CandidateProfile {
        id: CandidateId::new(id),
        name: format!("Dog {}", id),
        breed: "Terrier".to_string(),
        age: 5,
        size,
        energy_level: EnergyLevel::Medium,
        friendliness: Friendliness::Friendly,
        distance: 3.0,
        photos: vec![],
        bio: String::new(),
    }
}

fn stored(storage: &impl KeyValueStore, key: &str) -> Option<String> {
    storage.get(key).unwrap()
}

#[test]
fn test_integration_match_then_undo_scenario() {
    let pool = ProfileStore::new(vec![
        create_test_profile("A", Size::Small),
        create_test_profile("B", Size::Small),
    ]);
    let mut session = MatchSession::new(
        pool,
        PreferenceSet::default(),
        LocalDecisionStore::open(MemoryStore::new()),
    );
    let log = EventLog::new();
    session.add_observer(Box::new(log.clone()));

    session.like().unwrap();
    let matched: Vec<&str> = session.engine().store().matched().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(matched, vec!["A"]);
    assert_eq!(session.engine().index(), 1);

    session.undo().unwrap();
    assert!(session.engine().store().matched().is_empty());
    assert_eq!(session.engine().index(), 0);

    let a = create_test_profile("A", Size::Small);
    assert_eq!(
        log.events(),
        vec![
            SwipeEvent::Matched(a.clone()),
            SwipeEvent::IndexChanged(1),
            SwipeEvent::Undone(a),
            SwipeEvent::IndexChanged(0),
        ]
    );
}

#[test]
fn test_integration_decide_undo_round_trip() {
    let mut session = MatchSession::open(MemoryStore::new(), mock_profiles());
    session.like();
    let storage_before = (
        stored(session.engine().store().storage(), StorageKey::CONNECTIONS),
        stored(session.engine().store().storage(), StorageKey::SKIPPED),
    );
    let index_before = session.engine().index();

    let directions = [
        Direction::Right,
        Direction::Left,
        Direction::Left,
        Direction::Right,
        Direction::Right,
    ];
    for direction in directions {
        match direction {
            Direction::Right => session.like(),
            Direction::Left => session.pass(),
        };
    }
    for _ in directions {
        session.undo().unwrap();
    }

    assert_eq!(session.engine().index(), index_before);
    assert_eq!(
        (
            stored(session.engine().store().storage(), StorageKey::CONNECTIONS),
            stored(session.engine().store().storage(), StorageKey::SKIPPED),
        ),
        storage_before
    );
    // The decision taken before the sequence is still undoable
    assert_eq!(session.engine().undo_depth(), 1);
}

#[test]
fn test_integration_empty_pending_is_exhausted() {
    let preferences = PreferenceSet {
        energy_levels: vec![],
        ..PreferenceSet::default()
    };
    let mut session = MatchSession::new(
        ProfileStore::new(mock_profiles()),
        preferences,
        LocalDecisionStore::open(MemoryStore::new()),
    );
    let log = EventLog::new();
    session.add_observer(Box::new(log.clone()));

    assert_eq!(session.engine().state(), EngineState::Exhausted);
    assert!(session.like().is_none());
    assert!(session.release_drag(500.0).is_none());
    assert!(log.events().is_empty());
    assert!(session.engine().store().storage().is_empty());

    session.update_preferences(PreferenceSet::default());
    assert_eq!(session.engine().state(), EngineState::Presenting(0));
}

#[test]
fn test_integration_decisions_survive_reload() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("local-storage");

    let (liked, passed) = {
        let mut session = MatchSession::open(FileStore::open(&dir).unwrap(), mock_profiles());
        let liked = session.like().unwrap().candidate.id;
        let passed = session.release_drag(-150.0).unwrap().candidate.id;
        (liked, passed)
    };

    let session = MatchSession::open(FileStore::open(&dir).unwrap(), mock_profiles());

    let pending = session.engine().pending();
    assert_eq!(pending.len(), mock_profiles().len() - 2);
    assert!(pending.iter().all(|c| c.id != liked && c.id != passed));
    assert_eq!(session.connections().connections()[0].candidate.id, liked);
    assert!(!session.engine().can_undo());
}

#[test]
fn test_integration_stored_preferences_apply() {
    let mut storage = MemoryStore::new();
    save_preferences(
        &mut storage,
        &PreferenceSet {
            sizes: vec![Size::Small],
            energy_levels: vec![EnergyLevel::Low],
            ..PreferenceSet::default()
        },
    )
    .unwrap();

    let session = MatchSession::open(storage, mock_profiles());

    let names: Vec<&str> = session.engine().pending().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Charlie", "Molly"]);
}

#[test]
fn test_integration_quota_exceeded_keeps_session_going() {
    let mut session = MatchSession::open(MemoryStore::with_quota(64), mock_profiles());

    let first = session.like().unwrap();
    let second = session.like().unwrap();

    assert_eq!(session.engine().store().matched().len(), 2);
    assert_ne!(first.candidate.id, second.candidate.id);
    assert!(session.connections().is_empty());

    session.undo();
    assert_eq!(session.engine().store().matched().len(), 1);
}

#[test]
fn test_integration_start_over_clears_storage() {
    let mut session = MatchSession::open(MemoryStore::new(), mock_profiles());
    session.like();
    session.pass();
    session.like();

    session.start_over();

    let storage = session.engine().store().storage();
    assert!(stored(storage, StorageKey::CONNECTIONS).is_none());
    assert!(stored(storage, StorageKey::SKIPPED).is_none());
    assert_eq!(session.engine().pending().len(), mock_profiles().len());
    assert_eq!(session.engine().state(), EngineState::Presenting(0));
}
