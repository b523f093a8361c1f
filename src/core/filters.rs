use std::collections::HashSet;
use crate::models::{MatchFilter, User};

/// Check city, gender and age range against the filter
///
/// All three must hold; an empty city or gender set accepts nobody.
#[inline]
pub fn matches_filter(candidate: &User, filter: &MatchFilter) -> bool {
    filter.cities.contains(&candidate.city)
        && filter.genders.contains(&candidate.gender)
        && filter.accepts_age(candidate.age)
}

/// True when the candidate lists at least one of the given interests
#[inline]
pub fn shares_interest(candidate: &User, interests: &HashSet<&str>) -> bool {
    candidate
        .interests
        .iter()
        .any(|interest| interests.contains(interest.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_candidate(city: &str, gender: &str, age: i32, interests: &[&str]) -> User {
        User {
            id: 2,
            name: "Candidate".to_string(),
            age,
            gender: gender.to_string(),
            email: "candidate@example.com".to_string(),
            city: city.to_string(),
            interests: interests.iter().map(|i| i.to_string()).collect(),
        }
    }

    fn create_filter() -> MatchFilter {
        MatchFilter {
            cities: HashSet::from(["Delhi".to_string(), "Mumbai".to_string()]),
            genders: HashSet::from(["female".to_string()]),
            age_start: 20,
            age_end: 40,
        }
    }

    #[test]
    fn test_filter_match() {
        let candidate = create_candidate("Mumbai", "female", 28, &[]);
        assert!(matches_filter(&candidate, &create_filter()));
    }

    #[test]
    fn test_filter_fail_city() {
        let candidate = create_candidate("Pune", "female", 28, &[]);
        assert!(!matches_filter(&candidate, &create_filter()));
    }

    #[test]
    fn test_filter_fail_gender() {
        let candidate = create_candidate("Delhi", "male", 28, &[]);
        assert!(!matches_filter(&candidate, &create_filter()));
    }

    #[test]
    fn test_filter_age_bounds_inclusive() {
        let filter = create_filter();
        assert!(matches_filter(&create_candidate("Delhi", "female", 20, &[]), &filter));
        assert!(matches_filter(&create_candidate("Delhi", "female", 40, &[]), &filter));
        assert!(!matches_filter(&create_candidate("Delhi", "female", 19, &[]), &filter));
        assert!(!matches_filter(&create_candidate("Delhi", "female", 41, &[]), &filter));
    }

    #[test]
    fn test_city_match_is_case_sensitive() {
        let candidate = create_candidate("delhi", "female", 28, &[]);
        assert!(!matches_filter(&candidate, &create_filter()));
    }

    #[test]
    fn test_shared_interest() {
        let wanted = HashSet::from(["music", "reading"]);
        assert!(shares_interest(&create_candidate("Delhi", "female", 28, &["travel", "music"]), &wanted));
        assert!(!shares_interest(&create_candidate("Delhi", "female", 28, &["travel"]), &wanted));
        assert!(!shares_interest(&create_candidate("Delhi", "female", 28, &["Music"]), &wanted));
        assert!(!shares_interest(&create_candidate("Delhi", "female", 28, &[]), &wanted));
    }
}
