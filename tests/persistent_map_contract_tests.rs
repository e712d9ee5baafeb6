//! Integration tests for the derived operations of the map contract.
//!
//! Iteration order of a hash map depends on key hashes, so sequence results
//! are compared against the map's own iteration order (or after sorting)
//! rather than against a hard-coded order.

use lambars_hamt::prelude::*;
use rstest::rstest;
use std::cell::Cell;

fn int_map(entries: &[(i32, i32)]) -> PersistentHashMap<i32, i32> {
    entries.iter().copied().collect()
}

fn sorted<T: Ord>(mut items: Vec<T>) -> Vec<T> {
    items.sort();
    items
}

// =============================================================================
// apply / contains
// =============================================================================

#[rstest]
fn test_apply_existing_key() {
    let map = int_map(&[(1, 2)]);
    assert_eq!(map.apply(&1), Ok(&2));
}

#[rstest]
fn test_apply_missing_key_fails() {
    let map = int_map(&[(1, 2)]);
    let error = map.apply(&3).unwrap_err();
    assert_eq!(error, MapError::KeyNotFound { kind: "HashMap" });
    assert_eq!(error.to_string(), "key not found in HashMap");
}

#[rstest]
#[case(1, true)]
#[case(2, false)]
fn test_contains_key(#[case] key: i32, #[case] expected: bool) {
    let map = int_map(&[(1, 2)]);
    assert_eq!(PersistentMap::contains_key(&map, &key), expected);
}

#[rstest]
#[case(2, true)]
#[case(1, false)]
fn test_contains_value(#[case] value: i32, #[case] expected: bool) {
    let map = int_map(&[(1, 2)]);
    assert_eq!(map.contains_value(&value), expected);
}

// =============================================================================
// map / flat_map / filter
// =============================================================================

#[rstest]
fn test_map_empty_is_empty_sequence() {
    let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    assert!(map.map(|key, _| *key).is_empty());
}

#[rstest]
fn test_map_keys_of_non_empty() {
    let map = PersistentHashMap::new().put(1, "1").put(2, "2");
    let keys = map.map(|key, _| *key);

    assert_eq!(keys, map.keys().copied().collect::<Vec<_>>());
    assert_eq!(sorted(keys), vec![1, 2]);
}

#[rstest]
fn test_flat_map_into_another_map_kind() {
    let map = int_map(&[(1, 11), (2, 22), (3, 33)]);
    let actual: PersistentHashMap<String, String> = map.flat_map(|key, value| {
        [
            Entry::of(key.to_string(), value.to_string()),
            Entry::of((key * 10).to_string(), (value * 10).to_string()),
        ]
    });

    let expected: PersistentHashMap<String, String> = [
        ("1", "11"),
        ("10", "110"),
        ("2", "22"),
        ("20", "220"),
        ("3", "33"),
        ("30", "330"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();
    assert_eq!(actual, expected);
}

#[rstest]
fn test_flat_map_repeated_key_keeps_one_binding() {
    let map = int_map(&[(1, 1), (2, 2)]);
    let collapsed: PersistentHashMap<&str, i32> = map.flat_map(|_, value| [("same", *value)]);

    assert_eq!(collapsed.len(), 1);
    assert!(matches!(collapsed.get("same"), Some(1 | 2)));
}

#[rstest]
fn test_filter() {
    let map: PersistentHashMap<i32, i32> = (0..20).map(|key| (key, key * key)).collect();
    let even = map.filter(|key, _| key % 2 == 0);

    assert_eq!(even.len(), 10);
    assert!(even.iter().all(|(key, _)| key % 2 == 0));
    assert_eq!(map.len(), 20);
}

// =============================================================================
// entry_set / entries / distinct
// =============================================================================

#[rstest]
fn test_entry_set() {
    let map = PersistentHashMap::new().put(1, "1").put(2, "2");
    let expected: PersistentHashSet<Entry<i32, &str>> =
        [Entry::of(1, "1"), Entry::of(2, "2")].into_iter().collect();
    assert_eq!(map.entry_set(), expected);
}

#[rstest]
fn test_entries_follow_iteration_order() {
    let map = int_map(&[(5, 50), (6, 60), (7, 70)]);
    let expected: Vec<Entry<i32, i32>> = map
        .iter()
        .map(|(key, value)| Entry::of(*key, *value))
        .collect();
    assert_eq!(map.entries(), expected);
}

#[rstest]
fn test_distinct_is_identity() {
    let map = int_map(&[(1, 1), (2, 2), (3, 3)]);
    let distinct = map.distinct();
    assert_eq!(distinct, map);
    assert!(distinct.ptr_eq(&map));
}

// =============================================================================
// remove_all
// =============================================================================

#[rstest]
fn test_remove_all() {
    let map = int_map(&[(1, 1), (2, 2), (3, 3)]);
    assert_eq!(map.remove_all([1, 3]), int_map(&[(2, 2)]));
    assert_eq!(map.remove_all(&[4, 5]), map);
}

#[rstest]
fn test_remove_all_keys_returns_canonical_empty() {
    let map = int_map(&[(1, 1), (2, 2)]);
    assert!(map.remove_all([1, 2]).ptr_eq(&PersistentHashMap::EMPTY));
}

#[rstest]
fn test_try_remove_all_missing_operand() {
    let map = int_map(&[(1, 1)]);
    assert_eq!(
        map.try_remove_all::<Vec<i32>>(None),
        Err(MapError::NullArgument {
            operation: "remove_all",
            argument: "keys",
        })
    );
}

// =============================================================================
// unzip
// =============================================================================

#[rstest]
fn test_unzip_empty() {
    let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    let (left, right) = map.unzip(|key, value| (*key, *value));
    assert!(left.is_empty());
    assert!(right.is_empty());

    let (left, right) = map.unzip(|key, value| (Entry::of(*key, *value), Entry::of(*key, *value)));
    assert!(left.is_empty());
    assert!(right.is_empty());
}

#[rstest]
fn test_unzip_non_empty() {
    let map = int_map(&[(0, 0), (1, 1)]);
    let (keys, successors) = map.unzip(|key, value| (*key, value + 1));

    let pairs: Vec<(i32, i32)> = keys.into_iter().zip(successors).collect();
    assert_eq!(sorted(pairs), vec![(0, 1), (1, 2)]);
}

// =============================================================================
// zip / zip_with_index
// =============================================================================

#[rstest]
fn test_zip_nils() {
    let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    assert!(map.zip(Vec::<i32>::new()).is_empty());
}

#[rstest]
fn test_zip_empty_and_non_nil() {
    let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    assert!(map.zip([1]).is_empty());
}

#[rstest]
fn test_zip_non_empty_and_nil() {
    let map = int_map(&[(0, 1)]);
    assert!(map.zip(Vec::<i32>::new()).is_empty());
}

#[rstest]
#[case(&[(0, 0), (1, 1)], &[5, 6, 7])]
#[case(&[(0, 0), (1, 1), (2, 2)], &[5, 6])]
#[case(&[(0, 0), (1, 1), (2, 2)], &[5, 6, 7])]
fn test_zip_truncates_to_shorter_side(#[case] entries: &[(i32, i32)], #[case] that: &[i32]) {
    let map = int_map(entries);
    let zipped = map.zip(that.iter().copied());

    let expected: Zipped<i32, i32, i32> = map
        .entries()
        .into_iter()
        .zip(that.iter().copied())
        .collect();
    assert_eq!(zipped.len(), entries.len().min(that.len()));
    assert_eq!(zipped, expected);
}

#[rstest]
fn test_zip_missing_operand() {
    let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    assert_eq!(
        map.try_zip::<i32, Vec<i32>>(None),
        Err(MapError::NullArgument {
            operation: "zip",
            argument: "that",
        })
    );
}

#[rstest]
fn test_zip_with_index() {
    let empty: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    assert!(empty.zip_with_index().is_empty());

    let map = int_map(&[(0, 0), (1, 1), (2, 2)]);
    let indexed = map.zip_with_index();
    assert_eq!(indexed.iter().map(|(_, index)| *index).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(
        indexed.into_iter().map(|(entry, _)| entry).collect::<Vec<_>>(),
        map.entries()
    );
}

// =============================================================================
// zip_all
// =============================================================================

#[rstest]
fn test_zip_all_nils() {
    let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    assert!(map.zip_all(Vec::<&str>::new(), Entry::of(0, 0), "").is_empty());
}

#[rstest]
fn test_zip_all_empty_and_non_nil() {
    let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    assert_eq!(
        map.zip_all([1], Entry::of(9, 10), 0),
        vec![(Entry::of(9, 10), 1)]
    );
}

#[rstest]
fn test_zip_all_non_empty_and_nil() {
    let map = int_map(&[(0, 1)]);
    assert_eq!(
        map.zip_all(Vec::<&str>::new(), Entry::of(9, 10), "z"),
        vec![(Entry::of(0, 1), "z")]
    );
}

#[rstest]
#[case::this_is_smaller(&[(1, 1), (2, 2)], &["a", "b", "c"])]
#[case::this_is_more_smaller(&[(1, 1), (2, 2)], &["a", "b", "c", "d"])]
#[case::that_is_smaller(&[(1, 1), (2, 2), (3, 3)], &["a", "b"])]
#[case::that_is_more_smaller(&[(1, 1), (2, 2), (3, 3), (4, 4)], &["a", "b"])]
#[case::same_size(&[(1, 1), (2, 2), (3, 3)], &["a", "b", "c"])]
fn test_zip_all_pads_shorter_side(#[case] entries: &[(i32, i32)], #[case] that: &[&str]) {
    let map = int_map(entries);
    let zipped = map.zip_all(that.iter().copied(), Entry::of(9, 10), "z");

    let length = entries.len().max(that.len());
    let mut these = map.entries().into_iter();
    let mut those = that.iter().copied();
    let expected: Vec<(Entry<i32, i32>, &str)> = (0..length)
        .map(|_| {
            (
                these.next().unwrap_or(Entry::of(9, 10)),
                those.next().unwrap_or("z"),
            )
        })
        .collect();

    assert_eq!(zipped.len(), length);
    assert_eq!(zipped, expected);
}

#[rstest]
fn test_zip_all_that_is_smaller_matches_reference_scenario() {
    let map = int_map(&[(1, 1), (2, 2), (3, 3)]);
    let zipped = map.zip_all(["a", "b"], Entry::of(9, 10), "z");

    let padded: Vec<&Entry<i32, i32>> = zipped
        .iter()
        .filter(|(_, label)| *label == "z")
        .map(|(entry, _)| entry)
        .collect();
    assert_eq!(padded.len(), 1);
    assert_ne!(padded[0], &Entry::of(9, 10));
    assert!(map.contains_key(&padded[0].key));
    assert_eq!(
        sorted(zipped.iter().map(|(entry, _)| *entry).collect()),
        vec![Entry::of(1, 1), Entry::of(2, 2), Entry::of(3, 3)]
    );
}

#[rstest]
fn test_zip_all_missing_operand() {
    let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    assert_eq!(
        map.try_zip_all::<i32, Vec<i32>>(None, Entry::of(0, 0), 0),
        Err(MapError::NullArgument {
            operation: "zip_all",
            argument: "that",
        })
    );
}

// =============================================================================
// head / tail / peek / fold
// =============================================================================

#[rstest]
fn test_tail_option_drops_first_entry() {
    let map = int_map(&[(1, 1), (2, 2), (3, 3)]);
    let head = map.head_option().unwrap();
    let tail = map.tail_option().unwrap();

    assert_eq!(tail, map.remove(&head.key));
    assert_eq!(tail.len(), 2);
}

#[rstest]
fn test_tail_option_of_singleton_is_canonical_empty() {
    let tail = PersistentHashMap::singleton(1, 1).tail_option().unwrap();
    assert!(tail.ptr_eq(&PersistentHashMap::EMPTY));
}

#[rstest]
fn test_peek_runs_action_on_one_entry() {
    let calls = Cell::new(0);
    let seen = Cell::new(None);
    let map = int_map(&[(1, 10), (2, 20), (3, 30)]);

    let returned = map.peek(|key, value| {
        calls.set(calls.get() + 1);
        seen.set(Some((*key, *value)));
    });

    assert_eq!(calls.get(), 1);
    assert_eq!(seen.get().map(|(key, value)| map.get(&key) == Some(&value)), Some(true));
    assert_eq!(returned, map);
}

#[rstest]
fn test_fold_result_is_order_independent() {
    let map: PersistentHashMap<i32, i32> = (1..=10).map(|key| (key, key)).collect();
    let mut collected = map.fold(Vec::new(), |mut accumulator, key, _| {
        accumulator.push(*key);
        accumulator
    });
    collected.sort_unstable();
    assert_eq!(collected, (1..=10).collect::<Vec<_>>());
}

// =============================================================================
// Construction and rendering
// =============================================================================

#[rstest]
fn test_of_all_and_build_agree() {
    let entries = [Entry::of("a", 1), Entry::of("b", 2), Entry::of("a", 3)];
    let of_all: PersistentHashMap<&str, i32> = PersistentHashMap::of_all(entries);
    let built: PersistentHashMap<&str, i32> = build(entries);

    assert_eq!(of_all, built);
    assert_eq!(of_all.get("a"), Some(&3));
}

#[rstest]
fn test_to_string_empty() {
    let map: PersistentHashMap<i32, i32> = PersistentHashMap::new();
    assert_eq!(map.to_string(), "HashMap()");
}

#[rstest]
fn test_to_string_single_entry() {
    assert_eq!(PersistentHashMap::singleton(1, 2).to_string(), "HashMap((1, 2))");
}
