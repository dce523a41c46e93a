//! Property tests for slot overlap and run-sheet ordering.

use proptest::prelude::*;

use radio_grid::algorithms::detect_conflicts;
use radio_grid::models::{
    overlaps, reorder, ConducteurElement, DayOfWeek, ElementField, RunSheet, TimeOfDay,
};

fn time() -> impl Strategy<Value = TimeOfDay> {
    (0..TimeOfDay::MINUTES_PER_DAY).prop_map(|m| TimeOfDay::from_minutes(m).unwrap())
}

/// A non-empty half-open slot `[start, end)`.
fn slot() -> impl Strategy<Value = (TimeOfDay, TimeOfDay)> {
    (0..TimeOfDay::MINUTES_PER_DAY - 1)
        .prop_flat_map(|start| (Just(start), start + 1..TimeOfDay::MINUTES_PER_DAY))
        .prop_map(|(s, e)| {
            (
                TimeOfDay::from_minutes(s).unwrap(),
                TimeOfDay::from_minutes(e).unwrap(),
            )
        })
}

fn sheet(durations: &[Option<u32>]) -> RunSheet {
    let mut sheet = RunSheet::new();
    for (i, duration) in durations.iter().enumerate() {
        let index = sheet.add_element();
        sheet
            .update_element(index, ElementField::Title(format!("Segment {}", i)))
            .unwrap();
        sheet
            .update_element(index, ElementField::DurationMinutes(*duration))
            .unwrap();
    }
    sheet
}

fn orders(elements: &[ConducteurElement]) -> Vec<u32> {
    elements.iter().map(|e| e.order).collect()
}

fn contiguous(len: usize) -> Vec<u32> {
    (1..=len as u32).collect()
}

proptest! {
    #[test]
    fn prop_overlap_is_symmetric((a_start, a_end) in slot(), (b_start, b_end) in slot()) {
        prop_assert_eq!(
            overlaps(a_start, a_end, b_start, b_end),
            overlaps(b_start, b_end, a_start, a_end)
        );
    }

    #[test]
    fn prop_slot_overlaps_itself((start, end) in slot()) {
        prop_assert!(overlaps(start, end, start, end));
    }

    #[test]
    fn prop_adjacent_slots_never_overlap(a in time(), b in time(), c in time()) {
        let mut bounds = [a, b, c];
        bounds.sort();
        let [first, middle, last] = bounds;
        prop_assume!(first < middle && middle < last);
        prop_assert!(!overlaps(first, middle, middle, last));
    }

    #[test]
    fn prop_empty_grid_never_conflicts((start, end) in slot(), day in 0usize..7) {
        let conflicts = detect_conflicts(&[], &[DayOfWeek::ALL[day]], start, end);
        prop_assert!(conflicts.is_empty());
    }

    #[test]
    fn prop_remove_keeps_orders_contiguous(
        durations in prop::collection::vec(prop::option::of(0u32..180), 1..12),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut sheet = sheet(&durations);
        let index = pick.index(sheet.len());
        sheet.remove_element(index).unwrap();
        prop_assert_eq!(orders(sheet.elements()), contiguous(sheet.len()));
    }

    #[test]
    fn prop_reorder_is_undone_by_reverse_move(
        durations in prop::collection::vec(prop::option::of(0u32..180), 1..12),
        from in any::<prop::sample::Index>(),
        to in any::<prop::sample::Index>(),
    ) {
        let original = sheet(&durations).into_elements();
        let len = original.len();
        let (from, to) = (from.index(len), to.index(len));

        let moved = reorder(original.clone(), from, to).unwrap();
        prop_assert_eq!(orders(&moved), contiguous(len));

        let back = reorder(moved, to, from).unwrap();
        prop_assert_eq!(back, original);
    }

    #[test]
    fn prop_total_duration_sums_known_durations(
        durations in prop::collection::vec(prop::option::of(0u32..180), 0..12),
    ) {
        let expected: u32 = durations.iter().flatten().sum();
        prop_assert_eq!(sheet(&durations).total_duration(), expected);
    }
}
