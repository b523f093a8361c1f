use std::collections::HashSet;
use crate::core::filters::{matches_filter, shares_interest};
use crate::models::{MatchFilter, User};

/// Return the candidates that pass the filter and share an interest with the requester
///
/// # Pipeline Stages
/// 1. Drop the requester itself
/// 2. City, gender and age range filtering
/// 3. Shared interest check
///
/// Candidates keep their input order. A requester without interests matches nobody.
pub fn find_matches<I>(requester: &User, candidates: I, filter: &MatchFilter) -> Vec<User>
where
    I: IntoIterator<Item = User>,
{
    let interests: HashSet<&str> = requester.interests.iter().map(String::as_str).collect();
    if interests.is_empty() {
        return Vec::new();
    }

    candidates
        .into_iter()
        // Stage 1: irreflexive
        .filter(|candidate| candidate.id != requester.id)
        // Stage 2: demographic filter
        .filter(|candidate| matches_filter(candidate, filter))
        // Stage 3: at least one shared interest
        .filter(|candidate| shares_interest(candidate, &interests))
        .collect()
}
