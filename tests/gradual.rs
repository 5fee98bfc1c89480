use rosu_perf::{
    catch::Catch, mania::Mania, osu::Osu, taiko::Taiko, Beatmap, Difficulty, GameMods,
    GradualDifficulty, GradualPerformance, Performance, ScoreState,
};

use self::common::TestMap;

mod common;

#[test]
fn empty_map() {
    let map = Beatmap::default();

    let mut gradual = GradualDifficulty::new(Difficulty::new(), &map);
    assert_eq!(gradual.len(), 0);
    assert!(gradual.next().is_none());

    let mut gradual = GradualPerformance::new(Difficulty::new(), &map);
    assert!(gradual.next(ScoreState::new()).is_none());
}

fn difficulty_end_eq_regular<M: TestMap>(mods: &str) {
    let map = common::test_map::<M>();
    let difficulty = Difficulty::new().mods(GameMods::from_acronyms(mods, M::MODE));

    let regular = difficulty.calculate(&map);

    let gradual = GradualDifficulty::new(difficulty, &map);
    let len = gradual.len();
    let attrs: Vec<_> = gradual.collect();

    assert_eq!(attrs.len(), len);
    assert_eq!(attrs.last(), Some(&regular));
}

fn performance_end_eq_regular<M: TestMap>(mods: &str) {
    let map = common::test_map::<M>();
    let mods = GameMods::from_acronyms(mods, M::MODE);

    let mut perf = Performance::new(&map).mods(mods.clone()).accuracy(97.0).misses(1);
    let state = perf.generate_state();
    let regular = perf.calculate();

    let difficulty = Difficulty::new().mods(mods);
    let mut gradual = GradualPerformance::new(difficulty, &map);

    let attrs = gradual.last(state).unwrap();

    common::assert_eq_float(attrs.stars(), regular.stars());
    common::assert_eq_float(attrs.pp(), regular.pp());
    assert!(gradual.next(state).is_none());
}

fn next_and_nth<M: TestMap>() {
    let map = common::test_map::<M>();
    let mut state = ScoreState::new();

    let mut gradual1 = GradualPerformance::new(Difficulty::new(), &map);
    let mut gradual2 = GradualPerformance::new(Difficulty::new(), &map);

    for _ in 0..10 {
        let _ = gradual1.next(state);
        let _ = gradual2.next(state);
        state.n300 += 1;
        state.max_combo += 1;
    }

    for _ in 1..15 {
        let _ = gradual1.next(state);
        state.n300 += 1;
        state.max_combo += 1;
    }

    let next = gradual1.next(state);
    let nth = gradual2.nth(state, 14);

    assert_eq!(next, nth);
    assert_eq!(gradual1.len(), gradual2.len());
}

macro_rules! mode_tests {
    ( $( $name:ident: $mode:ident, $mods:literal; )* ) => {
        $(
            mod $name {
                use super::*;

                #[test]
                fn difficulty_end_eq_regular() {
                    super::difficulty_end_eq_regular::<$mode>("");
                    super::difficulty_end_eq_regular::<$mode>($mods);
                }

                #[test]
                fn performance_end_eq_regular() {
                    super::performance_end_eq_regular::<$mode>($mods);
                }

                #[test]
                fn next_and_nth() {
                    super::next_and_nth::<$mode>();
                }
            }
        )*
    };
}

mode_tests! {
    osu: Osu, "HDDT";
    taiko: Taiko, "HR";
    catch: Catch, "HRDT";
    mania: Mania, "DT";
}

#[test]
fn convert_gradual_matches_regular() {
    let map = common::test_map::<Osu>();
    let difficulty = Difficulty::new();

    for mode in [
        rosu_perf::model::mode::GameMode::Taiko,
        rosu_perf::model::mode::GameMode::Catch,
        rosu_perf::model::mode::GameMode::Mania,
    ] {
        let regular = difficulty.calculate_for_mode(&map, mode).unwrap();

        let last = GradualDifficulty::new_with_mode(difficulty.clone(), &map, mode)
            .unwrap()
            .last();

        assert_eq!(last, Some(regular));
    }
}

#[test]
fn same_mode_conversion_is_noop() {
    let map = common::test_map::<Catch>();
    let difficulty = Difficulty::new();

    let direct = difficulty.calculate(&map);
    let converted = difficulty
        .calculate_for_mode(&map, rosu_perf::model::mode::GameMode::Catch)
        .unwrap();

    assert_eq!(direct, converted);
}

mod arbitrary_states {
    use proptest::prelude::*;
    use rosu_perf::taiko::{TaikoGradualPerformance, TaikoPerformance, TaikoScoreState};

    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn taiko_last_eq_regular(misses in 0..20_u32, n100 in 0..60_u32, combo_ratio in 0.0..=1.0_f64) {
            let map = common::test_map::<Taiko>();
            let total = map.hit_objects.iter().filter(|h| h.is_circle()).count() as u32;

            let max_combo = (f64::from(total - misses) * combo_ratio) as u32;

            let state = TaikoScoreState {
                max_combo,
                n300: total - misses - n100,
                n100,
                misses,
            };

            let regular = TaikoPerformance::try_new(&map)
                .unwrap()
                .state(state)
                .calculate();

            let gradual = TaikoGradualPerformance::new(Difficulty::new(), &map)
                .unwrap()
                .last(state)
                .unwrap();

            prop_assert!((regular.pp - gradual.pp).abs() < 1e-8 * regular.pp.max(1.0));
        }

        #[test]
        fn remaining_count_is_conserved(steps in prop::collection::vec(0..12_usize, 1..40)) {
            let map = common::test_map::<Mania>();
            let mut gradual = GradualDifficulty::new(Difficulty::new(), &map);

            for n in steps {
                let before = gradual.len();
                let attrs = gradual.nth(n);

                // Skipping past the end still yields the final attributes
                if before == 0 {
                    prop_assert!(attrs.is_none());
                } else {
                    prop_assert!(attrs.is_some());
                    prop_assert_eq!(gradual.len(), before - n.min(before - 1) - 1);
                }
            }
        }
    }
}
