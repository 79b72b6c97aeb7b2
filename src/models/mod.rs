// Model exports
pub mod decision;
pub mod domain;

pub use decision::{DecisionRecord, Direction, PriorPlacement, SwipeEvent};
pub use domain::{
    CandidateId, CandidateProfile, EnergyLevel, Friendliness, OwnerIdentity, PreferenceSet,
    ProfileDraft, Size, MAX_DOG_AGE,
};
