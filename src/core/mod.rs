// Core pipeline exports
pub mod engine;
pub mod filters;
pub mod gesture;

pub use engine::{EngineState, EventLog, SwipeEngine, SwipeObserver};
pub use filters::{breed_is_preferred, filter_pending, is_undecided, matches_preferences, DecisionExclusions};
pub use gesture::{sanitize_threshold, DragGesture, GestureOutcome, DEFAULT_DRAG_THRESHOLD};
