//! Merging and ranking of contributors.

use std::collections::HashMap;

use crate::types::User;

/// Merge contributor lists into a single ranking.
///
/// Users sharing a login are merged by summing their contributions. The
/// result is sorted by contributions descending, ties broken by login
/// ascending, so it depends only on the multiset of input records and not
/// on the order in which lists or records arrive.
pub fn aggregate<'a, I>(collections: I) -> Vec<User>
where
    I: IntoIterator<Item = &'a [User]>,
{
    let mut totals: HashMap<&str, u32> = HashMap::new();
    for user in collections.into_iter().flatten() {
        let total = totals.entry(user.login.as_str()).or_insert(0);
        *total = total.saturating_add(user.contributions);
    }

    let mut users: Vec<User> = totals
        .into_iter()
        .map(|(login, contributions)| User::new(login, contributions))
        .collect();
    users.sort_by(|a, b| {
        b.contributions
            .cmp(&a.contributions)
            .then_with(|| a.login.cmp(&b.login))
    });
    users
}

/// Aggregate a set of already completed per-repo lists.
pub fn aggregate_all(collections: &[Vec<User>]) -> Vec<User> {
    aggregate(collections.iter().map(Vec::as_slice))
}

/// Sum of contributions across a ranking.
pub fn total_contributions(users: &[User]) -> u64 {
    users.iter().map(|u| u64::from(u.contributions)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(pairs: &[(&str, u32)]) -> Vec<User> {
        pairs.iter().map(|(l, c)| User::new(*l, *c)).collect()
    }

    #[test]
    fn test_merges_duplicate_logins() {
        let result = aggregate_all(&[users(&[("alice", 3)]), users(&[("alice", 2), ("bob", 1)])]);
        assert_eq!(result, users(&[("alice", 5), ("bob", 1)]));
    }

    #[test]
    fn test_ties_broken_by_login() {
        let result = aggregate_all(&[users(&[("bob", 5), ("alice", 5), ("carol", 7)])]);
        assert_eq!(result, users(&[("carol", 7), ("alice", 5), ("bob", 5)]));
    }

    #[test]
    fn test_duplicates_within_one_list() {
        let result = aggregate_all(&[users(&[("alice", 1), ("alice", 1), ("bob", 3)])]);
        assert_eq!(result, users(&[("bob", 3), ("alice", 2)]));
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_all(&[]).is_empty());
        assert!(aggregate_all(&[Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn test_reaggregation_matches_single_pass() {
        let a = users(&[("alice", 3), ("bob", 4)]);
        let b = users(&[("carol", 1), ("alice", 2)]);

        let step = aggregate_all(&[a.clone()]);
        let incremental = aggregate_all(&[step, b.clone()]);
        assert_eq!(incremental, aggregate_all(&[a, b]));
    }

    #[test]
    fn test_total_contributions() {
        assert_eq!(total_contributions(&users(&[("alice", 3), ("bob", 4)])), 7);
        assert_eq!(total_contributions(&[]), 0);
    }
}
