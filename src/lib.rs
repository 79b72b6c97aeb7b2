//! Pawmatch - candidate filtering and swipe decisions for the Pawmatch dog-owner app
//!
//! Candidates flow from the profile store through the preference filter into
//! the swipe engine, whose decisions are mirrored into local key-value storage.

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod session;

// Re-export commonly used types
pub use core::{filter_pending, DragGesture, EngineState, SwipeEngine, SwipeObserver};
pub use models::{CandidateId, CandidateProfile, DecisionRecord, Direction, OwnerIdentity, PreferenceSet};
pub use services::{DecisionStore, KeyValueStore, LocalDecisionStore, ProfileStore};
pub use session::{ConnectionsView, MatchSession};
