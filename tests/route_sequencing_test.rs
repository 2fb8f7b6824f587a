//! Property and scenario tests for shopping-route sequencing.

use grocery_route::core::route::UNKNOWN_AISLE;
use grocery_route::{sequence, StoredItem};
use proptest::prelude::*;
use serde_json::json;

fn item(id: &str, aisle: Option<u32>) -> StoredItem {
    StoredItem {
        id: id.to_string(),
        name: format!("Item {}", id),
        price: 1.0,
        aisle,
        section: "Aisle".to_string(),
        subsection: String::new(),
    }
}

fn ids(items: &[StoredItem]) -> Vec<String> {
    items.iter().map(|i| i.id.clone()).collect()
}

/// Small aisle range so that ties and missing aisles are common.
fn aisle_strategy() -> impl Strategy<Value = Option<u32>> {
    prop_oneof![
        4 => (0u32..6).prop_map(Some),
        1 => Just(None::<u32>),
        1 => Just(Some(UNKNOWN_AISLE)),
    ]
}

/// Items tagged with their input position so stability can be checked
/// even when ids repeat.
fn items_strategy() -> impl Strategy<Value = Vec<StoredItem>> {
    prop::collection::vec(("[a-d]", aisle_strategy()), 0..40).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(pos, (id, aisle))| {
                let mut it = item(&id, aisle);
                it.name = pos.to_string();
                it
            })
            .collect()
    })
}

fn position(item: &StoredItem) -> usize {
    item.name.parse().unwrap()
}

proptest! {
    /// Property: the route is a permutation of the input.
    #[test]
    fn prop_route_is_permutation(items in items_strategy()) {
        let route = sequence(&items);
        prop_assert_eq!(route.len(), items.len());

        let mut expected: Vec<usize> = items.iter().map(position).collect();
        let mut actual: Vec<usize> = route.iter().map(position).collect();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);
    }

    /// Property: sequencing twice gives the same order as once.
    #[test]
    fn prop_route_is_idempotent(items in items_strategy()) {
        let once = sequence(&items);
        let twice = sequence(&once);
        prop_assert_eq!(once, twice);
    }

    /// Property: aisles never decrease along the route and missing aisles
    /// only appear at the tail.
    #[test]
    fn prop_aisles_non_decreasing(items in items_strategy()) {
        let route = sequence(&items);
        for pair in route.windows(2) {
            match (pair[0].aisle, pair[1].aisle) {
                (Some(a), Some(b)) => prop_assert!(a <= b),
                (None, Some(b)) => prop_assert_eq!(b, UNKNOWN_AISLE),
                (_, None) => {}
            }
        }
    }

    /// Property: items with the same sort key keep their input order.
    #[test]
    fn prop_ties_are_stable(items in items_strategy()) {
        let route = sequence(&items);
        for pair in route.windows(2) {
            let key = |i: &StoredItem| i.aisle.unwrap_or(UNKNOWN_AISLE);
            if key(&pair[0]) == key(&pair[1]) {
                prop_assert!(position(&pair[0]) < position(&pair[1]));
            }
        }
    }

    /// Property: the input is left untouched.
    #[test]
    fn prop_input_not_mutated(items in items_strategy()) {
        let snapshot = items.clone();
        let _ = sequence(&items);
        prop_assert_eq!(items, snapshot);
    }
}

#[test]
fn test_empty_route() {
    assert!(sequence::<StoredItem>(&[]).is_empty());
}

#[test]
fn test_ties_keep_input_order() {
    let input = vec![item("x", Some(5)), item("y", Some(2)), item("z", Some(2))];
    assert_eq!(ids(&sequence(&input)), vec!["y", "z", "x"]);
}

#[test]
fn test_null_aisle_sorts_last() {
    let input: Vec<StoredItem> = serde_json::from_value(json!([
        {"id": "b", "aisle": null},
        {"id": "a", "aisle": 3}
    ]))
    .unwrap();
    assert_eq!(ids(&sequence(&input)), vec!["a", "b"]);
}

#[test]
fn test_malformed_aisles_sort_last_without_disturbing_others() {
    let input: Vec<StoredItem> = serde_json::from_value(json!([
        {"id": "junk", "aisle": "dairy"},
        {"id": "two", "aisle": 2},
        {"id": "neg", "aisle": -1},
        {"id": "one", "aisle": "1"},
        {"id": "gone"}
    ]))
    .unwrap();
    assert_eq!(
        ids(&sequence(&input)),
        vec!["one", "two", "junk", "neg", "gone"]
    );
}

#[test]
fn test_duplicates_are_not_removed() {
    let input = vec![item("a", Some(1)), item("a", Some(1))];
    assert_eq!(ids(&sequence(&input)), vec!["a", "a"]);
}

#[test]
fn test_deterministic() {
    let input = vec![
        item("p", Some(3)),
        item("q", None),
        item("r", Some(1)),
        item("s", Some(3)),
    ];
    assert_eq!(sequence(&input), sequence(&input));
}
