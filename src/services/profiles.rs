use crate::models::{
    CandidateId, CandidateProfile, EnergyLevel, Friendliness, OwnerIdentity, PreferenceSet,
    ProfileDraft, Size,
};
use crate::services::storage::{KeyValueStore, StorageError, StorageKey};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur when loading or authoring profiles
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Invalid profile: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Failed to read seed file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed JSON seed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Malformed TOML seed: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Read-only pool of candidates for the matching pipeline
///
/// Holds the seeded profiles plus the owner's locally-authored dog, whose ID
/// becomes the owner identity used for self-exclusion.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    candidates: Vec<CandidateProfile>,
    owner: OwnerIdentity,
}

impl ProfileStore {
    /// Build a pool from seed profiles
    ///
    /// Invalid profiles and repeated IDs are dropped; the first occurrence
    /// of an ID wins.
    pub fn new(seed: Vec<CandidateProfile>) -> Self {
        let mut seen = HashSet::new();
        let candidates = seed
            .into_iter()
            .filter_map(|profile| match profile.validated() {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Dropping invalid seed profile: {}", e);
                    None
                }
            })
            .filter(|profile| {
                let fresh = seen.insert(profile.id.clone());
                if !fresh {
                    tracing::warn!("Dropping duplicate candidate {}", profile.id);
                }
                fresh
            })
            .collect();

        Self {
            candidates,
            owner: OwnerIdentity::anonymous(),
        }
    }

    /// Build a pool from seed profiles and the owner's stored dog profile
    pub fn load<S: KeyValueStore>(storage: &S, seed: Vec<CandidateProfile>) -> Self {
        let mut store = Self::new(seed);

        match load_owner_profile(storage) {
            Ok(Some(owner)) => store.adopt_owner(owner),
            Ok(None) => tracing::debug!("No owner profile stored"),
            Err(e) => tracing::warn!("Ignoring unreadable owner profile: {}", e),
        }

        tracing::info!(
            "Profile pool ready: {} candidates, owner {:?}",
            store.candidates.len(),
            store.owner.candidate_id().map(CandidateId::as_str)
        );

        store
    }

    /// Register the owner's dog, adding it to the pool if it is new
    pub fn adopt_owner(&mut self, owner: CandidateProfile) {
        self.owner = OwnerIdentity::new(owner.id.clone());
        if self.get(&owner.id).is_none() {
            self.candidates.push(owner);
        }
    }

    pub fn candidates(&self) -> &[CandidateProfile] {
        &self.candidates
    }

    pub fn owner(&self) -> &OwnerIdentity {
        &self.owner
    }

    pub fn get(&self, id: &CandidateId) -> Option<&CandidateProfile> {
        self.candidates.iter().find(|c| &c.id == id)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Create and store the owner's dog profile under a fresh ID
///
/// The owner's dog is at the owner's location, so any drafted distance is
/// reset to zero.
pub fn author_profile<S: KeyValueStore>(
    storage: &mut S,
    draft: ProfileDraft,
) -> Result<CandidateProfile, ProfileError> {
    let draft = ProfileDraft {
        distance: 0.0,
        ..draft
    };
    let profile = CandidateProfile::new(uuid::Uuid::new_v4().to_string(), draft)?;

    storage.set_json(StorageKey::OWNER_PROFILE, &profile)?;
    tracing::info!("Stored owner profile {} ({})", profile.name, profile.id);

    Ok(profile)
}

/// Read the owner's stored dog profile, if any
pub fn load_owner_profile<S: KeyValueStore>(
    storage: &S,
) -> Result<Option<CandidateProfile>, ProfileError> {
    match storage.get_json::<CandidateProfile>(StorageKey::OWNER_PROFILE)? {
        Some(profile) => Ok(Some(profile.validated()?)),
        None => Ok(None),
    }
}

/// Read the stored preference set, falling back to defaults
///
/// A missing, malformed or invalid stored set yields the defaults.
pub fn load_preferences<S: KeyValueStore>(storage: &S) -> PreferenceSet {
    match storage.get_json::<PreferenceSet>(StorageKey::PREFERENCES) {
        Ok(Some(preferences)) => match preferences.validate() {
            Ok(()) => preferences,
            Err(e) => {
                tracing::warn!("Stored preferences invalid, using defaults: {}", e);
                PreferenceSet::default()
            }
        },
        Ok(None) => PreferenceSet::default(),
        Err(e) => {
            tracing::warn!("Stored preferences unreadable, using defaults: {}", e);
            PreferenceSet::default()
        }
    }
}

pub fn save_preferences<S: KeyValueStore>(
    storage: &mut S,
    preferences: &PreferenceSet,
) -> Result<(), ProfileError> {
    preferences.validate()?;
    storage.set_json(StorageKey::PREFERENCES, preferences)?;
    Ok(())
}

#[derive(Deserialize)]
struct SeedFile {
    dogs: Vec<CandidateProfile>,
}

/// Load seed profiles from a JSON array or a TOML file with `[[dogs]]` tables
pub fn load_seed_file<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateProfile>, ProfileError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;

    let dogs = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str::<SeedFile>(&contents)?.dogs,
        _ => serde_json::from_str(&contents)?,
    };

    tracing::debug!("Loaded {} seed profiles from {}", dogs.len(), path.display());
    Ok(dogs)
}

fn mock(
    id: &str,
    name: &str,
    breed: &str,
    age: u8,
    size: Size,
    energy_level: EnergyLevel,
    friendliness: Friendliness,
    distance: f64,
    bio: &str,
) -> Result<CandidateProfile, ProfileError> {
    let draft = ProfileDraft {
        name: name.to_string(),
        breed: breed.to_string(),
        age,
        size,
        energy_level,
        friendliness,
        distance,
        photos: vec![format!("/images/dogs/{}.jpg", id)],
        bio: bio.to_string(),
    };
    CandidateProfile::new(id, draft)
}

/// Built-in candidate pool used when no seed file is configured
pub fn mock_profiles() -> Vec<CandidateProfile> {
    use EnergyLevel as E;
    use Friendliness as F;

    vec![
        mock("1", "Buddy", "Golden Retriever", 3, Size::Large, E::High, F::VeryFriendly, 2.3,
            "Fetch champion looking for a running buddy."),
        mock("2", "Luna", "French Bulldog", 2, Size::Small, E::Medium, F::Friendly, 1.1,
            "Short walks, long naps."),
        mock("3", "Max", "German Shepherd", 5, Size::Large, E::High, F::Selective, 4.8,
            "Well trained, prefers calm playmates."),
        mock("4", "Bella", "Beagle", 4, Size::Medium, E::High, F::VeryFriendly, 0.7,
            "Nose to the ground, tail in the air."),
        mock("5", "Charlie", "Cavalier King Charles Spaniel", 7, Size::Small, E::Low, F::Friendly, 3.2,
            "Lap dog seeking a quiet bench companion."),
        mock("6", "Daisy", "Labrador Retriever", 1, Size::Large, E::High, F::VeryFriendly, 6.5,
            "Puppy energy, loves the lake."),
        mock("7", "Rocky", "Boxer", 6, Size::Large, E::Medium, F::Shy, 8.9,
            "Takes a minute to warm up, then best friends."),
        mock("8", "Molly", "Shih Tzu", 9, Size::Small, E::Low, F::Friendly, 2.0,
            "Senior lady, enjoys gentle strolls."),
        mock("9", "Duke", "Great Dane", 4, Size::ExtraLarge, E::Medium, F::Friendly, 12.4,
            "Gentle giant, mindful of small dogs."),
        mock("10", "Sadie", "Border Collie", 3, Size::Medium, E::High, F::Selective, 15.6,
            "Needs a job, or at least a frisbee."),
    ]
    .into_iter()
    .filter_map(|profile| match profile {
        Ok(profile) => Some(profile),
        Err(e) => {
            tracing::warn!("Skipping invalid built-in profile: {}", e);
            None
        }
    })
    .collect()
}
