use crate::core::gesture::{sanitize_threshold, GestureOutcome, DEFAULT_DRAG_THRESHOLD};
use crate::models::{CandidateProfile, DecisionRecord, Direction, SwipeEvent};
use crate::services::DecisionStore;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives swipe notifications; every method defaults to doing nothing
pub trait SwipeObserver {
    fn on_match(&mut self, _candidate: &CandidateProfile) {}

    fn on_dislike(&mut self, _candidate: &CandidateProfile) {}

    fn on_undo(&mut self, _candidate: &CandidateProfile) {}

    fn on_index_change(&mut self, _index: usize) {}
}

/// Observer that appends every notification to a shared buffer
///
/// Clones share the same buffer, so one clone can be handed to the engine
/// and another kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<SwipeEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SwipeEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl SwipeObserver for EventLog {
    fn on_match(&mut self, candidate: &CandidateProfile) {
        self.events.borrow_mut().push(SwipeEvent::Matched(candidate.clone()));
    }

    fn on_dislike(&mut self, candidate: &CandidateProfile) {
        self.events.borrow_mut().push(SwipeEvent::Disliked(candidate.clone()));
    }

    fn on_undo(&mut self, candidate: &CandidateProfile) {
        self.events.borrow_mut().push(SwipeEvent::Undone(candidate.clone()));
    }

    fn on_index_change(&mut self, index: usize) {
        self.events.borrow_mut().push(SwipeEvent::IndexChanged(index));
    }
}

/// Presentation state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Showing the candidate at this index of the pending snapshot
    Presenting(usize),
    /// Every pending candidate has been decided
    Exhausted,
}

/// One-at-a-time swipe state machine over a pending snapshot
///
/// # Transitions
/// 1. `decide` commits the presented candidate, writes it through the
///    decision store, and advances
/// 2. `undo` pops the latest decision, reverses its stored effect, and
///    steps back one position
/// 3. `reset` swaps in a fresh snapshot and returns to the first position
///
/// The pending list is a snapshot taken at construction or reset, so
/// preference changes never shift the cursor under an undo.
pub struct SwipeEngine<D> {
    pending: Vec<CandidateProfile>,
    index: usize,
    undo_stack: Vec<DecisionRecord>,
    store: D,
    observers: Vec<Box<dyn SwipeObserver>>,
    drag_threshold: f64,
}

impl<D: DecisionStore> SwipeEngine<D> {
    pub fn new(pending: Vec<CandidateProfile>, store: D) -> Self {
        Self {
            pending,
            index: 0,
            undo_stack: Vec::new(),
            store,
            observers: Vec::new(),
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }

    pub fn with_drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = sanitize_threshold(threshold);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn SwipeObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> EngineState {
        if self.index < self.pending.len() {
            EngineState::Presenting(self.index)
        } else {
            EngineState::Exhausted
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state() == EngineState::Exhausted
    }

    /// The candidate currently presented, if any
    pub fn current(&self) -> Option<&CandidateProfile> {
        self.pending.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// `(index, total)` for progress indicators
    pub fn progress(&self) -> (usize, usize) {
        (self.index.min(self.pending.len()), self.pending.len())
    }

    pub fn pending(&self) -> &[CandidateProfile] {
        &self.pending
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut D {
        &mut self.store
    }

    /// Commit a decision on the presented candidate
    ///
    /// Does nothing and returns `None` when exhausted.
    pub fn decide(&mut self, direction: Direction) -> Option<DecisionRecord> {
        let candidate = self.current()?.clone();

        let prior = match direction {
            Direction::Right => self.store.record_match(&candidate),
            Direction::Left => self.store.record_skip(&candidate),
        };

        let record = DecisionRecord {
            candidate,
            direction,
            position: self.index,
            prior,
            decided_at: chrono::Utc::now(),
        };
        self.undo_stack.push(record.clone());
        self.index += 1;

        tracing::debug!(
            "Decided {:?} on {} ({}/{})",
            direction,
            record.candidate.id,
            self.index,
            self.pending.len()
        );

        for observer in &mut self.observers {
            match direction {
                Direction::Right => observer.on_match(&record.candidate),
                Direction::Left => observer.on_dislike(&record.candidate),
            }
        }
        self.notify_index();

        Some(record)
    }

    /// Commit a drag released at `displacement` pixels from its origin
    ///
    /// Displacements within the threshold cancel without any transition.
    pub fn release_drag(&mut self, displacement: f64) -> Option<DecisionRecord> {
        let direction = Direction::from_displacement(displacement, self.drag_threshold)?;
        self.decide(direction)
    }

    /// Apply the outcome of a tracked drag gesture
    pub fn apply_gesture(&mut self, outcome: GestureOutcome) -> Option<DecisionRecord> {
        match outcome {
            GestureOutcome::Commit(direction) => self.decide(direction),
            GestureOutcome::Cancelled => None,
        }
    }

    /// Reverse the most recent decision
    ///
    /// Does nothing and returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<DecisionRecord> {
        let record = self.undo_stack.pop()?;

        self.store.restore_decision(&record.candidate, record.prior);
        self.index = self.index.saturating_sub(1);

        tracing::debug!("Undid {:?} on {}", record.direction, record.candidate.id);

        for observer in &mut self.observers {
            observer.on_undo(&record.candidate);
        }
        self.notify_index();

        Some(record)
    }

    /// Replace the pending snapshot and start again from the first candidate
    ///
    /// Clears the undo stack; stored decisions are left alone.
    pub fn reset(&mut self, pending: Vec<CandidateProfile>) {
        self.pending = pending;
        self.index = 0;
        self.undo_stack.clear();

        tracing::info!("Swipe session reset with {} pending candidates", self.pending.len());
    }

    fn notify_index(&mut self) {
        let index = self.index;
        for observer in &mut self.observers {
            observer.on_index_change(index);
        }
    }
}
