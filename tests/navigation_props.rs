use clash_viewer::{Clash, ClashNavigator, Schedule};
use proptest::prelude::*;

fn collection(len: usize) -> Vec<Clash> {
    (0..len as i64)
        .map(|id| Clash {
            id,
            theme_id: 0,
            name_key: format!("cup_{}", id),
            name_key_secondary: "day_1".to_string(),
            schedule: vec![Schedule {
                id,
                registration_time: 0,
                start_time: 1_000 - id,
                cancelled: false,
            }],
        })
        .collect()
}

fn navigator_at(len: usize, start: usize) -> ClashNavigator {
    let clashes = collection(len);
    let mut nav = ClashNavigator::new();
    let selected = clashes[start].clone();
    nav.set_collection(clashes);
    nav.select(selected);
    nav
}

fn len_and_start() -> impl Strategy<Value = (usize, usize)> {
    (1usize..24).prop_flat_map(|len| (Just(len), 0..len))
}

proptest! {
    #[test]
    fn next_cycle_returns_to_start((len, start) in len_and_start()) {
        let mut nav = navigator_at(len, start);
        for _ in 0..len {
            nav.next();
        }
        prop_assert_eq!(nav.current_index(), Some(start));
    }

    #[test]
    fn previous_cycle_returns_to_start((len, start) in len_and_start()) {
        let mut nav = navigator_at(len, start);
        for _ in 0..len {
            nav.previous();
        }
        prop_assert_eq!(nav.current_index(), Some(start));
    }

    #[test]
    fn next_and_previous_are_inverse((len, start) in len_and_start()) {
        let mut nav = navigator_at(len, start);
        nav.next();
        nav.previous();
        prop_assert_eq!(nav.current_index(), Some(start));

        nav.previous();
        nav.next();
        prop_assert_eq!(nav.current_index(), Some(start));
    }

    #[test]
    fn step_matches_repeated_moves((len, start) in len_and_start(), offset in -50isize..50) {
        let mut jumped = navigator_at(len, start);
        jumped.step(offset);

        let mut walked = navigator_at(len, start);
        for _ in 0..offset.unsigned_abs() {
            if offset > 0 { walked.next() } else { walked.previous() }
        }
        prop_assert_eq!(jumped.current_index(), walked.current_index());
    }

    #[test]
    fn replacing_collection_clears_selection((len, start) in len_and_start(), new_len in 0usize..8) {
        let mut nav = navigator_at(len, start);
        nav.set_collection(collection(new_len));
        prop_assert!(nav.current().is_none());
    }

    #[test]
    fn nearest_is_minimum_start(len in 1usize..24) {
        let mut nav = ClashNavigator::new();
        nav.set_collection(collection(len));
        nav.select_nearest();
        // Start times decrease with the id, so the last clash is nearest
        prop_assert_eq!(nav.current_index(), Some(len - 1));
    }
}
