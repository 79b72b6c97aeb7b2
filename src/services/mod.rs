// Service exports
pub mod decisions;
pub mod profiles;
pub mod storage;

pub use decisions::{DecisionStore, LocalDecisionStore};
pub use profiles::{
    author_profile, load_preferences, load_seed_file, mock_profiles, save_preferences,
    ProfileError, ProfileStore,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageKey};
