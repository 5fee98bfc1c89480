use std::sync::OnceLock;

use proptest::prelude::*;
use rosu_perf::{
    any::HitResultPriority,
    catch::{Catch, CatchDifficultyAttributes, CatchPerformance},
    mania::{Mania, ManiaDifficultyAttributes, ManiaPerformance, ManiaScoreState},
    osu::{Osu, OsuDifficultyAttributes, OsuPerformance},
    taiko::{Taiko, TaikoDifficultyAttributes, TaikoPerformance},
    Difficulty, DifficultyAttributes, Performance,
};

use self::common::TestMap;

mod common;

fn attrs<M: TestMap>() -> DifficultyAttributes {
    Difficulty::new().calculate(&common::test_map::<M>())
}

macro_rules! cached_attrs {
    ( $fn:ident: $mode:ident => $variant:ident($attrs:ident) ) => {
        fn $fn() -> $attrs {
            static ATTRS: OnceLock<$attrs> = OnceLock::new();

            ATTRS
                .get_or_init(|| match attrs::<$mode>() {
                    DifficultyAttributes::$variant(attrs) => attrs,
                    _ => panic!("unexpected mode"),
                })
                .clone()
        }
    };
}

cached_attrs!(osu_attrs: Osu => Osu(OsuDifficultyAttributes));
cached_attrs!(taiko_attrs: Taiko => Taiko(TaikoDifficultyAttributes));
cached_attrs!(catch_attrs: Catch => Catch(CatchDifficultyAttributes));
cached_attrs!(mania_attrs: Mania => Mania(ManiaDifficultyAttributes));

#[test]
fn full_combo_beats_partial_score() {
    let all = [
        DifficultyAttributes::Osu(osu_attrs()),
        DifficultyAttributes::Taiko(taiko_attrs()),
        DifficultyAttributes::Catch(catch_attrs()),
        DifficultyAttributes::Mania(mania_attrs()),
    ];

    for attrs in all {
        let max_combo = attrs.max_combo();
        let max = Performance::new(attrs.clone()).calculate();

        let partial = Performance::new(attrs)
            .accuracy(93.0)
            .misses(3)
            .combo(max_combo / 3)
            .calculate();

        assert!(max.pp() > 0.0, "{max:?}");
        assert!(max.pp() > partial.pp(), "{} <= {}", max.pp(), partial.pp());
    }
}

#[test]
fn accuracy_is_clamped() {
    let attrs = osu_attrs();

    let over = OsuPerformance::from(attrs.clone()).accuracy(150.0).calculate();
    let max = OsuPerformance::from(attrs).calculate();

    common::assert_eq_float(over.pp, max.pp);
}

#[test]
fn best_case_is_at_least_worst_case() {
    let attrs = osu_attrs();

    let best = OsuPerformance::from(attrs.clone())
        .accuracy(95.0)
        .hitresult_priority(HitResultPriority::BestCase)
        .calculate();

    let worst = OsuPerformance::from(attrs)
        .accuracy(95.0)
        .hitresult_priority(HitResultPriority::WorstCase)
        .calculate();

    assert!(best.pp >= worst.pp);
}

#[test]
fn generated_state_matches_combo() {
    let attrs = catch_attrs();
    let max_combo = attrs.max_combo();

    let state = CatchPerformance::from(attrs)
        .combo(max_combo + 100)
        .generate_state();

    assert_eq!(state.max_combo, max_combo);
}

#[test]
fn any_mode_try_mode() {
    let map = common::test_map::<Osu>();

    let mania = Performance::new(&map)
        .try_mode(rosu_perf::model::mode::GameMode::Mania)
        .unwrap()
        .calculate();

    assert!(matches!(mania, rosu_perf::PerformanceAttributes::Mania(_)));
    assert!(mania.pp() > 0.0);
}

#[test]
fn catch_pp_is_pinned() {
    let pp = CatchPerformance::from(catch_attrs())
        .accuracy(97.5)
        .misses(2)
        .calculate()
        .pp;

    assert!((pp - 47.5469).abs() <= 5e-5, "{pp}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn osu_misses_never_add_pp(a in 0..25_u32, b in 0..25_u32) {
        let (fewer, more) = (a.min(b), a.max(b));
        let attrs = osu_attrs();
        let combo = attrs.max_combo / 2;

        let calc = |misses| {
            OsuPerformance::from(attrs.clone())
                .combo(combo)
                .misses(misses)
                .calculate()
                .pp
        };

        prop_assert!(calc(more) <= calc(fewer) + 1e-9);
    }

    #[test]
    fn taiko_misses_never_add_pp(a in 0..25_u32, b in 0..25_u32) {
        let (fewer, more) = (a.min(b), a.max(b));
        let attrs = taiko_attrs();

        let calc = |misses| {
            TaikoPerformance::from(attrs.clone())
                .misses(misses)
                .calculate()
                .pp
        };

        prop_assert!(calc(more) <= calc(fewer) + 1e-9);
    }

    #[test]
    fn catch_combo_never_removes_pp(a in 0..500_u32, b in 0..500_u32) {
        let (lower, higher) = (a.min(b), a.max(b));
        let attrs = catch_attrs();

        let calc = |combo| {
            CatchPerformance::from(attrs.clone())
                .combo(combo)
                .misses(1)
                .calculate()
                .pp
        };

        prop_assert!(calc(higher) + 1e-9 >= calc(lower));
    }

    #[test]
    fn mania_worse_judgements_never_add_pp(a in 0..100_u32, b in 0..100_u32) {
        let (fewer, more) = (a.min(b), a.max(b));
        let attrs = mania_attrs();
        let total = attrs.n_objects;

        let calc = |n100: u32| {
            let state = ManiaScoreState {
                n320: total - n100,
                n100,
                ..ManiaScoreState::new()
            };

            ManiaPerformance::from(attrs.clone())
                .lazer(false)
                .state(state)
                .calculate()
                .pp
        };

        prop_assert!(calc(more) <= calc(fewer) + 1e-9);
    }
}
