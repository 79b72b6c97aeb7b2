use crate::models::domain::CandidateProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a swipe: left skips, right matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Map a horizontal drag displacement to a direction
    ///
    /// Returns `None` when the displacement does not strictly exceed the
    /// threshold in either direction, which cancels the gesture.
    #[inline]
    pub fn from_displacement(displacement: f64, threshold: f64) -> Option<Self> {
        if displacement > threshold {
            Some(Direction::Right)
        } else if displacement < -threshold {
            Some(Direction::Left)
        } else {
            None
        }
    }
}

/// Where a candidate sat in the stored lists before a decision was recorded
///
/// The index is the candidate's position within that list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorPlacement {
    Undecided,
    Matched(usize),
    Skipped(usize),
}

/// A committed decision on one candidate, kept on the undo stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub candidate: CandidateProfile,
    pub direction: Direction,
    /// Index in the pending snapshot at which the decision was taken
    pub position: usize,
    /// Stored placement to put back on undo
    pub prior: PriorPlacement,
    pub decided_at: DateTime<Utc>,
}

/// Notification emitted by the swipe engine
#[derive(Debug, Clone, PartialEq)]
pub enum SwipeEvent {
    Matched(CandidateProfile),
    Disliked(CandidateProfile),
    Undone(CandidateProfile),
    IndexChanged(usize),
}
