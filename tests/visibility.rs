use std::collections::HashSet;

use cfgperf_terminal::visibility::{SelectAllState, SeriesVisibilityStore, StoreState};

fn keys(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|k| k.to_string()).collect()
}

fn seeded(raw: &[&str]) -> SeriesVisibilityStore {
    let mut store = SeriesVisibilityStore::new();
    store.observe_plottable(&keys(raw));
    store
}

#[test]
fn empty_list_does_not_initialize() {
    let mut store = SeriesVisibilityStore::new();
    assert!(!store.observe_plottable(&[]));
    assert_eq!(store.state(), StoreState::Uninitialized);
    assert!(store.is_empty());
}

#[test]
fn default_all_fires_exactly_once() {
    let mut store = SeriesVisibilityStore::new();
    assert!(store.observe_plottable(&keys(&["a", "b"])));
    assert_eq!(store.state(), StoreState::Initialized);
    assert_eq!(store.len(), 2);

    store.toggle("a");
    store.toggle("b");
    assert!(store.is_empty());

    // A later list never re-seeds, even when the user cleared everything.
    assert!(!store.observe_plottable(&keys(&["a", "b", "c"])));
    assert!(store.is_empty());
}

#[test]
fn later_keys_are_not_added_to_the_seeded_set() {
    let mut store = SeriesVisibilityStore::new();
    assert!(!store.observe_plottable(&[]));
    assert!(store.observe_plottable(&keys(&["a", "b"])));
    assert!(!store.observe_plottable(&keys(&["a", "b", "c"])));

    let expected: HashSet<String> = keys(&["a", "b"]).into_iter().collect();
    assert_eq!(store.visible(), &expected);
    assert!(!store.is_visible("c"));
}

#[test]
fn toggle_twice_is_identity() {
    let mut store = seeded(&["a", "b", "c"]);
    store.toggle("b");
    let before: HashSet<String> = store.visible().clone();
    store.toggle("a");
    store.toggle("a");
    assert_eq!(store.visible(), &before);
    store.toggle("zzz");
    store.toggle("zzz");
    assert_eq!(store.visible(), &before);
}

#[test]
fn category_bulk_keeps_other_keys() {
    let talents = keys(&["talent_a", "talent_b"]);
    let mut store = seeded(&["talent_a", "talent_b", "x_score", "other"]);
    store.toggle("other");

    store.unselect_all(&talents);
    assert!(!store.is_visible("talent_a"));
    assert!(!store.is_visible("talent_b"));
    assert!(store.is_visible("x_score"));
    assert!(!store.is_visible("other"));

    store.select_all(&talents);
    assert!(store.is_visible("talent_a"));
    assert!(store.is_visible("talent_b"));
    assert!(store.is_visible("x_score"));
    assert!(!store.is_visible("other"));
}

#[test]
fn select_then_unselect_restores_unselected_category() {
    let talents = keys(&["talent_a", "talent_b"]);
    let mut store = seeded(&["talent_a", "talent_b", "x_score"]);
    store.unselect_all(&talents);
    let before = store.visible().clone();

    store.select_all(&talents);
    store.unselect_all(&talents);
    assert_eq!(store.visible(), &before);
}

#[test]
fn category_state_reports_checkbox() {
    let talents = keys(&["talent_a", "talent_b"]);
    let mut store = seeded(&["talent_a", "talent_b"]);
    assert_eq!(store.category_state(&talents), SelectAllState::Checked);
    store.toggle("talent_a");
    assert_eq!(store.category_state(&talents), SelectAllState::Indeterminate);
    store.toggle("talent_b");
    assert_eq!(store.category_state(&talents), SelectAllState::Unchecked);
    assert_eq!(store.category_state(&[]), SelectAllState::Unchecked);
}

#[test]
fn toggle_category_clears_full_and_fills_partial() {
    let talents = keys(&["talent_a", "talent_b"]);
    let mut store = seeded(&["talent_a", "talent_b"]);
    store.toggle_category(&talents);
    assert!(store.is_empty());

    store.toggle("talent_b");
    store.toggle_category(&talents);
    assert_eq!(store.category_state(&talents), SelectAllState::Checked);
}

#[test]
fn disjoint_keys_make_the_selection_stale() {
    let mut store = seeded(&["a", "b"]);
    assert!(!store.is_stale(&keys(&["b", "c"])));
    assert!(store.is_stale(&keys(&["c", "d"])));
    assert!(!store.is_stale(&[]));

    store.mark_stale();
    assert_eq!(store.state(), StoreState::Uninitialized);
    assert!(store.observe_plottable(&keys(&["c", "d"])));
    assert_eq!(store.visible_in_order(&keys(&["d", "c"])), keys(&["d", "c"]));
}

#[test]
fn empty_selection_is_never_stale() {
    let mut store = seeded(&["a"]);
    store.toggle("a");
    assert!(!store.is_stale(&keys(&["z"])));
}

#[test]
fn visible_in_order_follows_given_order() {
    let mut store = seeded(&["a", "b", "c"]);
    store.toggle("b");
    assert_eq!(
        store.visible_in_order(&keys(&["c", "b", "a"])),
        keys(&["c", "a"])
    );
}
