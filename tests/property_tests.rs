//! Property-based tests for contributor aggregation.
//!
//! These tests verify universal properties of the ranking using proptest.

use std::collections::{HashMap, HashSet};

use contributors::{aggregate, aggregate_all, total_contributions, User};
use proptest::prelude::*;

// ============================================================================
// Strategies for generating test data
// ============================================================================

/// Logins from a small alphabet so collections overlap often.
fn login_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

fn user_strategy() -> impl Strategy<Value = User> {
    (login_strategy(), 0u32..10_000).prop_map(|(login, contributions)| User::new(login, contributions))
}

/// One repository's contributors, with unique logins as the remote returns them.
fn collection_strategy() -> impl Strategy<Value = Vec<User>> {
    prop::collection::vec(user_strategy(), 0..8).prop_map(|users| {
        let mut seen = HashSet::new();
        users
            .into_iter()
            .filter(|u| seen.insert(u.login.clone()))
            .collect()
    })
}

fn collections_strategy() -> impl Strategy<Value = Vec<Vec<User>>> {
    prop::collection::vec(collection_strategy(), 0..6)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// The ranking does not depend on the order in which collections arrive.
    #[test]
    fn prop_aggregate_is_order_independent(
        (collections, shuffled) in collections_strategy()
            .prop_flat_map(|c| (Just(c.clone()), Just(c).prop_shuffle()))
    ) {
        prop_assert_eq!(aggregate_all(&collections), aggregate_all(&shuffled));
    }

    /// Contributions are sorted descending, ties broken by login ascending.
    #[test]
    fn prop_aggregate_is_ranked(collections in collections_strategy()) {
        let ranking = aggregate_all(&collections);
        for pair in ranking.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.contributions > b.contributions
                    || (a.contributions == b.contributions && a.login < b.login),
                "{:?} ranked before {:?}", a, b
            );
        }
    }

    /// Every login appears exactly once, and only logins from the input appear.
    #[test]
    fn prop_aggregate_has_unique_logins(collections in collections_strategy()) {
        let ranking = aggregate_all(&collections);
        let logins: HashSet<&str> = ranking.iter().map(|u| u.login.as_str()).collect();
        prop_assert_eq!(logins.len(), ranking.len());

        let input: HashSet<&str> = collections
            .iter()
            .flatten()
            .map(|u| u.login.as_str())
            .collect();
        prop_assert_eq!(logins, input);
    }

    /// Each login's total is the sum of its entries, so the grand total is conserved.
    #[test]
    fn prop_aggregate_conserves_totals(collections in collections_strategy()) {
        let ranking = aggregate_all(&collections);

        let mut expected: HashMap<&str, u32> = HashMap::new();
        for user in collections.iter().flatten() {
            *expected.entry(user.login.as_str()).or_default() += user.contributions;
        }
        for user in &ranking {
            prop_assert_eq!(Some(&user.contributions), expected.get(user.login.as_str()));
        }

        let input_total: u64 = collections.iter().map(|c| total_contributions(c)).sum();
        prop_assert_eq!(total_contributions(&ranking), input_total);
    }

    /// Folding partial rankings gives the same result as ranking everything at once.
    #[test]
    fn prop_incremental_aggregation_matches_batch(collections in collections_strategy()) {
        let mut running: Vec<User> = Vec::new();
        for collection in &collections {
            running = aggregate([running.as_slice(), collection.as_slice()]);
        }
        prop_assert_eq!(running, aggregate_all(&collections));
    }

    /// Streaming totals never decrease as more collections are folded in.
    #[test]
    fn prop_partial_totals_are_monotonic(collections in collections_strategy()) {
        let mut previous = 0u64;
        for k in 0..=collections.len() {
            let total = total_contributions(&aggregate_all(&collections[..k]));
            prop_assert!(total >= previous);
            previous = total;
        }
    }
}
