//! Property-based tests for navigation and the seek slider
//!
//! Uses proptest to verify invariants across many random inputs.

use mixtape_playback::{
    fill_percent, permutation, Navigator, RandomPicker, SeekSlider, Track, TrackId,
};
use proptest::prelude::*;
use std::collections::HashSet;

// ===== Helpers =====

fn navigator(len: usize, seed: u64) -> Navigator<()> {
    let mut nav = Navigator::with_picker(RandomPicker::seeded(seed));
    nav.add_tracks(
        (0..len)
            .map(|i| Track::new(TrackId::new(i as u64), format!("track-{}", i), ()))
            .collect(),
    );
    nav
}

fn active_ids(nav: &Navigator<()>) -> Vec<TrackId> {
    nav.active_order().into_iter().map(|t| t.id).collect()
}

fn base_ids(nav: &Navigator<()>) -> Vec<TrackId> {
    nav.base_order().iter().map(|t| t.id).collect()
}

/// A sane slider range: finite bounds with max > min and a positive step
fn slider_range() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1_000.0f64..1_000.0, 0.001f64..10_000.0, 0.001f64..100.0)
        .prop_map(|(min, span, step)| (min, min + span, step))
}

// ===== Property Tests =====

proptest! {
    /// Property: next then previous returns to the starting index
    #[test]
    fn next_then_previous_is_identity(len in 1usize..40, start in 0usize..40, seed: u64) {
        let mut nav = navigator(len, seed);
        let start = start % len;
        nav.select_index(start).unwrap();

        nav.next().unwrap();
        nav.previous().unwrap();
        prop_assert_eq!(nav.current_index(), Some(start));

        nav.previous().unwrap();
        nav.next().unwrap();
        prop_assert_eq!(nav.current_index(), Some(start));
    }

    /// Property: len calls to next visit every track exactly once
    #[test]
    fn next_cycles_through_every_track(len in 1usize..40, shuffled: bool, seed: u64) {
        let mut nav = navigator(len, seed);
        nav.set_shuffle(shuffled);

        let mut seen = HashSet::new();
        for _ in 0..len {
            seen.insert(nav.current().unwrap().id);
            nav.next().unwrap();
        }

        prop_assert_eq!(seen.len(), len);
        prop_assert_eq!(nav.current_index(), Some(0));
    }

    /// Property: the active order is always a permutation of the base order
    #[test]
    fn shuffle_is_a_permutation_of_base_order(len in 0usize..60, seed: u64) {
        let mut nav = navigator(len, seed);
        nav.set_shuffle(true);

        let mut active = active_ids(&nav);
        let mut base = base_ids(&nav);
        active.sort();
        base.sort();
        prop_assert_eq!(active, base);
    }

    /// Property: shuffle on then off restores insertion order
    #[test]
    fn shuffle_round_trip_restores_insertion_order(len in 0usize..60, seed: u64) {
        let mut nav = navigator(len, seed);
        let before = active_ids(&nav);

        nav.set_shuffle(true);
        nav.set_shuffle(false);

        prop_assert_eq!(active_ids(&nav), before);
    }

    /// Property: the raw Fisher-Yates output is a bijection on 0..len
    #[test]
    fn permutation_is_a_bijection(len in 0usize..200, seed: u64) {
        let order = permutation(len, &mut RandomPicker::seeded(seed));

        let unique: HashSet<_> = order.iter().copied().collect();
        prop_assert_eq!(order.len(), len);
        prop_assert_eq!(unique.len(), len);
        prop_assert!(order.iter().all(|&i| i < len));
    }

    /// Property: with repeat on, track endings never move the index
    #[test]
    fn repeat_pins_the_current_index(
        len in 1usize..20,
        start in 0usize..20,
        endings in 1usize..10,
        seed: u64,
    ) {
        let mut nav = navigator(len, seed);
        let start = start % len;
        nav.select_index(start).unwrap();
        nav.set_repeat(true);

        for _ in 0..endings {
            let action = nav.on_track_ended().unwrap();
            prop_assert_eq!(action.index(), start);
        }
        prop_assert_eq!(nav.current_index(), Some(start));
    }

    /// Property: removing tracks never leaves the current index out of range
    #[test]
    fn removal_keeps_current_in_bounds(
        len in 1usize..30,
        removals in prop::collection::vec(0u64..30, 1..30),
        seed: u64,
    ) {
        let mut nav = navigator(len, seed);
        nav.set_shuffle(seed % 2 == 0);

        for id in removals {
            let _ = nav.remove_track(TrackId::new(id));
            match nav.current_index() {
                Some(index) => prop_assert!(index < nav.len()),
                None => prop_assert!(nav.is_empty()),
            }
            prop_assert_eq!(active_ids(&nav).len(), nav.len());
        }
    }

    /// Property: fill percent is exactly (value - min) / (max - min) * 100
    #[test]
    fn fill_matches_value_position((min, max, step) in slider_range(), t in 0.0f64..=1.0) {
        let mut slider = SeekSlider::new(min, max, step).unwrap();
        let value = min + t * (max - min);
        slider.set_value(value);

        let expected = (slider.value() - min) / (max - min) * 100.0;
        prop_assert_eq!(slider.fill_percent(), expected);
        prop_assert!((0.0..=100.0).contains(&slider.fill_percent()));
    }

    /// Property: external updates are ignored for the whole drag
    #[test]
    fn set_value_is_ignored_while_dragging(
        (min, max, step) in slider_range(),
        down in 0.0f64..=1.0,
        ticks in prop::collection::vec(-5_000.0f64..5_000.0, 1..20),
    ) {
        let mut slider = SeekSlider::new(min, max, step).unwrap();
        slider.pointer_down(down);
        let held = slider.value();

        for tick in ticks {
            slider.set_value(tick);
            prop_assert_eq!(slider.value(), held);
        }

        prop_assert_eq!(slider.pointer_up().map(|e| e.value()), Some(held));
    }

    /// Property: pointer values always land inside the range
    #[test]
    fn pointer_values_stay_in_range((min, max, step) in slider_range(), ratio in -2.0f64..3.0) {
        let mut slider = SeekSlider::new(min, max, step).unwrap();

        let value = slider.click(ratio).value();

        prop_assert!(value >= min && value <= max);
        prop_assert!(!slider.is_dragging());
    }

    /// Property: an empty range fills 0 and never yields NaN
    #[test]
    fn empty_range_fills_zero(at in -1_000.0f64..1_000.0, value in -1_000.0f64..1_000.0) {
        prop_assert_eq!(fill_percent(value, at, at), 0.0);

        let mut slider = SeekSlider::new(0.0, 10.0, 1.0).unwrap();
        slider.set_range(at, at).unwrap();
        slider.set_value(value);
        prop_assert_eq!(slider.fill_percent(), 0.0);
        prop_assert_eq!(slider.value(), at);
    }
}
