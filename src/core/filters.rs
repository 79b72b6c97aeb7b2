use crate::models::{CandidateId, CandidateProfile, OwnerIdentity, PreferenceSet};
use std::collections::HashSet;

/// Candidates already decided on, plus the owner's own dog
#[derive(Debug, Clone, Copy)]
pub struct DecisionExclusions<'a> {
    pub matched: &'a HashSet<CandidateId>,
    pub skipped: &'a HashSet<CandidateId>,
    pub owner: &'a OwnerIdentity,
}

/// Check that a candidate has not been decided on and is not the owner
#[inline]
pub fn is_undecided(profile: &CandidateProfile, exclusions: &DecisionExclusions<'_>) -> bool {
    !exclusions.matched.contains(&profile.id)
        && !exclusions.skipped.contains(&profile.id)
        && !exclusions.owner.is(&profile.id)
}

/// Check a candidate against the owner's preference set
///
/// Every bound is inclusive. An empty size or energy list matches nothing.
#[inline]
pub fn matches_preferences(profile: &CandidateProfile, preferences: &PreferenceSet) -> bool {
    // Check size
    if !preferences.sizes.contains(&profile.size) {
        return false;
    }

    // Check energy level
    if !preferences.energy_levels.contains(&profile.energy_level) {
        return false;
    }

    // Check distance
    if profile.distance > preferences.max_distance {
        return false;
    }

    // Check age range
    if profile.age < preferences.min_age || profile.age > preferences.max_age {
        return false;
    }

    true
}

/// Produce the pending sequence, preserving the pool's order
pub fn filter_pending(
    pool: &[CandidateProfile],
    matched: &HashSet<CandidateId>,
    skipped: &HashSet<CandidateId>,
    preferences: &PreferenceSet,
    owner: &OwnerIdentity,
) -> Vec<CandidateProfile> {
    let exclusions = DecisionExclusions {
        matched,
        skipped,
        owner,
    };

    let pending: Vec<CandidateProfile> = pool
        .iter()
        .filter(|profile| is_undecided(profile, &exclusions))
        .filter(|profile| matches_preferences(profile, preferences))
        .cloned()
        .collect();

    tracing::debug!(
        "Filtered {} of {} candidates into the pending sequence",
        pending.len(),
        pool.len()
    );

    pending
}

/// Whether a candidate's breed is on the owner's preferred list
///
/// Case-insensitive. Never used to reorder the pending sequence.
pub fn breed_is_preferred(profile: &CandidateProfile, preferences: &PreferenceSet) -> bool {
    preferences
        .preferred_breeds
        .iter()
        .any(|breed| breed.trim().eq_ignore_ascii_case(profile.breed.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnergyLevel, Friendliness, Size};

    fn create_test_profile(id: &str, size: Size, energy: EnergyLevel, age: u8, distance: f64) -> CandidateProfile {
        CandidateProfile {
            id: CandidateId::new(id),
            name: format!("Dog {}", id),
            breed: "Poodle".to_string(),
            age,
            size,
            energy_level: energy,
            friendliness: Friendliness::Friendly,
            distance,
            photos: vec![],
            bio: String::new(),
        }
    }

    fn create_test_preferences() -> PreferenceSet {
        PreferenceSet {
            sizes: vec![Size::Small, Size::Medium],
            energy_levels: vec![EnergyLevel::Medium, EnergyLevel::High],
            max_distance: 10.0,
            min_age: 1,
            max_age: 10,
            preferred_breeds: vec!["poodle".to_string()],
        }
    }

    #[test]
    fn test_preferences_match() {
        let profile = create_test_profile("a", Size::Small, EnergyLevel::High, 4, 3.0);
        assert!(matches_preferences(&profile, &create_test_preferences()));
    }

    #[test]
    fn test_preferences_fail_size() {
        let profile = create_test_profile("a", Size::Large, EnergyLevel::High, 4, 3.0);
        assert!(!matches_preferences(&profile, &create_test_preferences()));
    }

    #[test]
    fn test_preferences_fail_energy() {
        let profile = create_test_profile("a", Size::Small, EnergyLevel::Low, 4, 3.0);
        assert!(!matches_preferences(&profile, &create_test_preferences()));
    }

    #[test]
    fn test_preferences_fail_distance() {
        let profile = create_test_profile("a", Size::Small, EnergyLevel::High, 4, 30.0);
        assert!(!matches_preferences(&profile, &create_test_preferences()));
    }

    #[test]
    fn test_preferences_fail_age() {
        let profile = create_test_profile("a", Size::Small, EnergyLevel::High, 14, 3.0);
        assert!(!matches_preferences(&profile, &create_test_preferences()));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let prefs = create_test_preferences();

        assert!(matches_preferences(&create_test_profile("a", Size::Small, EnergyLevel::High, 1, 10.0), &prefs));
        assert!(matches_preferences(&create_test_profile("b", Size::Small, EnergyLevel::High, 10, 0.0), &prefs));
        assert!(!matches_preferences(&create_test_profile("c", Size::Small, EnergyLevel::High, 11, 1.0), &prefs));
        assert!(!matches_preferences(&create_test_profile("d", Size::Small, EnergyLevel::High, 0, 1.0), &prefs));
        assert!(!matches_preferences(&create_test_profile("e", Size::Small, EnergyLevel::High, 5, 10.01), &prefs));
    }

    #[test]
    fn test_empty_allowed_set_excludes_all() {
        let profile = create_test_profile("a", Size::Small, EnergyLevel::High, 4, 3.0);

        let mut no_sizes = create_test_preferences();
        no_sizes.sizes.clear();
        assert!(!matches_preferences(&profile, &no_sizes));

        let mut no_energy = create_test_preferences();
        no_energy.energy_levels.clear();
        assert!(!matches_preferences(&profile, &no_energy));
    }

    #[test]
    fn test_filter_excludes_decided_and_owner() {
        let pool = vec![
            create_test_profile("a", Size::Small, EnergyLevel::High, 4, 3.0),
            create_test_profile("b", Size::Small, EnergyLevel::High, 4, 3.0),
            create_test_profile("c", Size::Small, EnergyLevel::High, 4, 3.0),
            create_test_profile("me", Size::Small, EnergyLevel::High, 4, 0.0),
            create_test_profile("d", Size::Small, EnergyLevel::High, 4, 3.0),
        ];
        let matched: HashSet<_> = [CandidateId::new("a")].into_iter().collect();
        let skipped: HashSet<_> = [CandidateId::new("c")].into_iter().collect();
        let owner = OwnerIdentity::new(CandidateId::new("me"));

        let pending = filter_pending(&pool, &matched, &skipped, &create_test_preferences(), &owner);
        let ids: Vec<&str> = pending.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(ids, vec!["b", "d"]);
    }

    #[test]
    fn test_breed_preference_is_case_insensitive() {
        let profile = create_test_profile("a", Size::Small, EnergyLevel::High, 4, 3.0);
        assert!(breed_is_preferred(&profile, &create_test_preferences()));
        assert!(!breed_is_preferred(&profile, &PreferenceSet::default()));
    }
}
