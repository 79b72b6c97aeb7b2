use crate::services::ProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

/// Oldest age a dog profile may declare
pub const MAX_DOG_AGE: u8 = 30;

/// Stable identifier of a candidate profile
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CandidateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The active owner's own candidate, excluded from their pending sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerIdentity {
    candidate_id: Option<CandidateId>,
}

impl OwnerIdentity {
    pub fn new(candidate_id: CandidateId) -> Self {
        Self {
            candidate_id: Some(candidate_id),
        }
    }

    /// An owner without a dog profile of their own
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn candidate_id(&self) -> Option<&CandidateId> {
        self.candidate_id.as_ref()
    }

    #[inline]
    pub fn is(&self, id: &CandidateId) -> bool {
        self.candidate_id.as_ref() == Some(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    Small,
    Medium,
    Large,
    #[serde(rename = "Extra Large")]
    ExtraLarge,
}

impl Size {
    pub const ALL: [Size; 4] = [Size::Small, Size::Medium, Size::Large, Size::ExtraLarge];
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::ExtraLarge => "Extra Large",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    pub const ALL: [EnergyLevel; 3] = [EnergyLevel::Low, EnergyLevel::Medium, EnergyLevel::High];
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EnergyLevel::Low => "Low",
            EnergyLevel::Medium => "Medium",
            EnergyLevel::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Friendliness {
    #[serde(rename = "Very Friendly")]
    VeryFriendly,
    Friendly,
    Shy,
    Selective,
}

impl fmt::Display for Friendliness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Friendliness::VeryFriendly => "Very Friendly",
            Friendliness::Friendly => "Friendly",
            Friendliness::Shy => "Shy",
            Friendliness::Selective => "Selective",
        };
        f.write_str(label)
    }
}

/// Dog profile eligible for matching
///
/// Profiles are snapshots: once built they are never mutated, and the same
/// JSON shape is used for the seed pool and for the persisted decision lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_profile"))]
pub struct CandidateProfile {
    pub id: CandidateId,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub breed: String,
    pub age: u8,
    pub size: Size,
    #[serde(rename = "energyLevel")]
    pub energy_level: EnergyLevel,
    pub friendliness: Friendliness,
    /// Distance from the owner in miles
    #[validate(range(min = 0.0))]
    pub distance: f64,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub bio: String,
}

/// Fields an owner fills in when creating a dog profile
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub breed: String,
    pub age: u8,
    pub size: Size,
    #[serde(rename = "energyLevel")]
    pub energy_level: EnergyLevel,
    pub friendliness: Friendliness,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub bio: String,
}

impl CandidateProfile {
    /// Build a validated profile from a draft
    pub fn new(id: impl Into<CandidateId>, draft: ProfileDraft) -> Result<Self, ProfileError> {
        let profile = Self {
            id: id.into(),
            name: draft.name,
            breed: draft.breed,
            age: draft.age,
            size: draft.size,
            energy_level: draft.energy_level,
            friendliness: draft.friendliness,
            distance: draft.distance,
            photos: draft.photos,
            bio: draft.bio,
        };
        Ok(profile.validated()?)
    }

    /// Run field validation, handing the profile back on success
    pub fn validated(self) -> Result<Self, ValidationErrors> {
        self.validate()?;
        Ok(self)
    }
}

fn validate_profile(profile: &CandidateProfile) -> Result<(), ValidationError> {
    if profile.id.as_str().trim().is_empty() {
        return Err(ValidationError::new("empty_id"));
    }
    if profile.age > MAX_DOG_AGE {
        return Err(ValidationError::new("age_out_of_range"));
    }
    if !profile.distance.is_finite() {
        return Err(ValidationError::new("non_finite_distance"));
    }
    Ok(())
}

/// Owner-level filter configuration
///
/// An empty `sizes` or `energy_levels` list excludes every candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_age_range"))]
pub struct PreferenceSet {
    #[serde(default = "default_sizes")]
    pub sizes: Vec<Size>,
    #[serde(rename = "energyLevels", default = "default_energy_levels")]
    pub energy_levels: Vec<EnergyLevel>,
    #[serde(rename = "maxDistance", default = "default_max_distance")]
    #[validate(range(min = 0.0))]
    pub max_distance: f64,
    #[serde(rename = "minAge", default)]
    pub min_age: u8,
    #[serde(rename = "maxAge", default = "default_max_age")]
    pub max_age: u8,
    #[serde(rename = "preferredBreeds", default)]
    pub preferred_breeds: Vec<String>,
}

fn default_sizes() -> Vec<Size> { Size::ALL.to_vec() }
fn default_energy_levels() -> Vec<EnergyLevel> { EnergyLevel::ALL.to_vec() }
fn default_max_distance() -> f64 { 25.0 }
fn default_max_age() -> u8 { 20 }

fn validate_age_range(preferences: &PreferenceSet) -> Result<(), ValidationError> {
    if preferences.min_age > preferences.max_age {
        return Err(ValidationError::new("inverted_age_range"));
    }
    Ok(())
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            energy_levels: default_energy_levels(),
            max_distance: default_max_distance(),
            min_age: 0,
            max_age: default_max_age(),
            preferred_breeds: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> CandidateProfile {
        CandidateProfile {
            id: CandidateId::new("dog-1"),
            name: "Buddy".to_string(),
            breed: "Beagle".to_string(),
            age: 4,
            size: Size::ExtraLarge,
            energy_level: EnergyLevel::High,
            friendliness: Friendliness::VeryFriendly,
            distance: 2.5,
            photos: vec!["buddy.jpg".to_string()],
            bio: "Loves the park".to_string(),
        }
    }

    #[test]
    fn test_profile_json_shape() {
        let json = serde_json::to_value(sample_profile()).unwrap();

        assert_eq!(json["id"], "dog-1");
        assert_eq!(json["size"], "Extra Large");
        assert_eq!(json["energyLevel"], "High");
        assert_eq!(json["friendliness"], "Very Friendly");
    }

    #[test]
    fn test_profile_validation() {
        assert!(sample_profile().validated().is_ok());

        let mut nameless = sample_profile();
        nameless.name.clear();
        assert!(nameless.validated().is_err());

        let mut oldest = sample_profile();
        oldest.age = MAX_DOG_AGE;
        assert!(oldest.validated().is_ok());

        let mut ancient = sample_profile();
        ancient.age = MAX_DOG_AGE + 1;
        assert!(ancient.validated().is_err());

        let mut blank_id = sample_profile();
        blank_id.id = CandidateId::new("  ");
        assert!(blank_id.validated().is_err());

        let mut negative = sample_profile();
        negative.distance = -1.0;
        assert!(negative.validated().is_err());
    }

    fn sample_draft() -> ProfileDraft {
        ProfileDraft {
            name: "Pepper".to_string(),
            breed: "Corgi".to_string(),
            age: 2,
            size: Size::Small,
            energy_level: EnergyLevel::High,
            friendliness: Friendliness::Friendly,
            distance: 1.2,
            photos: vec![],
            bio: String::new(),
        }
    }

    #[test]
    fn test_new_validates_draft() {
        let profile = CandidateProfile::new("pepper", sample_draft()).unwrap();
        assert_eq!(profile.id.as_str(), "pepper");
        assert_eq!(profile.distance, 1.2);

        let mut breedless = sample_draft();
        breedless.breed.clear();
        assert!(matches!(
            CandidateProfile::new("pepper", breedless),
            Err(ProfileError::Invalid(_))
        ));

        let mut ancient = sample_draft();
        ancient.age = MAX_DOG_AGE + 1;
        assert!(matches!(
            CandidateProfile::new("pepper", ancient),
            Err(ProfileError::Invalid(_))
        ));

        assert!(matches!(
            CandidateProfile::new(" ", sample_draft()),
            Err(ProfileError::Invalid(_))
        ));
    }

    #[test]
    fn test_preferences_defaults_fill_missing_fields() {
        let prefs: PreferenceSet = serde_json::from_str(r#"{"maxDistance": 10}"#).unwrap();

        assert_eq!(prefs.sizes, Size::ALL.to_vec());
        assert_eq!(prefs.energy_levels, EnergyLevel::ALL.to_vec());
        assert_eq!(prefs.max_distance, 10.0);
        assert_eq!(prefs.max_age, 20);
    }

    #[test]
    fn test_inverted_age_range_rejected() {
        let prefs = PreferenceSet {
            min_age: 9,
            max_age: 3,
            ..PreferenceSet::default()
        };

        assert!(prefs.validate().is_err());
        assert!(PreferenceSet::default().validate().is_ok());
    }

    #[test]
    fn test_owner_identity() {
        let owner = OwnerIdentity::new(CandidateId::new("me"));
        assert!(owner.is(&CandidateId::new("me")));
        assert!(!owner.is(&CandidateId::new("you")));
        assert!(!OwnerIdentity::anonymous().is(&CandidateId::new("me")));
    }
}
