use rosu_perf::{
    any::Strains,
    catch::Catch,
    mania::Mania,
    model::mode::{GameMode, IGameMode},
    osu::Osu,
    taiko::Taiko,
    Beatmap, Difficulty, DifficultyAttributes, GameMods,
};

use self::common::TestMap;

mod common;

fn stars<M: TestMap>(mods: &str) -> f64 {
    let map = common::test_map::<M>();

    Difficulty::new()
        .mods(GameMods::from_acronyms(mods, M::MODE))
        .calculate(&map)
        .stars()
}

macro_rules! mode_tests {
    ( $( $name:ident: $mode:ident; )* ) => {
        $(
            mod $name {
                use super::*;

                #[test]
                fn has_stars() {
                    let stars = stars::<$mode>("");

                    assert!(stars.is_finite());
                    assert!(stars > 0.0, "{stars}");
                }

                #[test]
                fn double_time_is_harder() {
                    assert!(stars::<$mode>("DT") > stars::<$mode>(""));
                }

                #[test]
                fn half_time_is_easier() {
                    assert!(stars::<$mode>("HT") < stars::<$mode>(""));
                }

                #[test]
                fn clock_rate_overrides_mods() {
                    let map = common::test_map::<$mode>();

                    let by_mods = Difficulty::new()
                        .mods(GameMods::from_acronyms("DT", $mode::MODE))
                        .calculate(&map);

                    let by_rate = Difficulty::new().clock_rate(1.5).calculate(&map);

                    common::assert_eq_float(by_mods.stars(), by_rate.stars());
                }

                #[test]
                fn trait_matches_any() {
                    let map = common::test_map::<$mode>();
                    let difficulty = Difficulty::new().mods(GameMods::from_acronyms("HR", $mode::MODE));

                    let any = difficulty.calculate(&map);
                    let specific = $mode::difficulty(&difficulty, &map).unwrap();

                    assert_eq!(any, DifficultyAttributes::from(specific));
                }

                #[test]
                fn passed_objects_reduce_combo() {
                    let map = common::test_map::<$mode>();

                    let full = Difficulty::new().calculate(&map);
                    let partial = Difficulty::new().passed_objects(20).calculate(&map);

                    assert!(partial.max_combo() < full.max_combo());
                    assert!(partial.stars() <= full.stars());
                }

                #[test]
                fn strains_are_finite() {
                    let map = common::test_map::<$mode>();
                    let strains = Difficulty::new().strains(&map);

                    assert!(strains.section_len() > 0.0);

                    let peaks: Vec<f64> = match strains {
                        Strains::Osu(s) => s.aim,
                        Strains::Taiko(s) => s.color,
                        Strains::Catch(s) => s.movement,
                        Strains::Mania(s) => s.strains,
                    };

                    assert!(!peaks.is_empty());
                    assert!(peaks.iter().all(|s| s.is_finite() && *s >= 0.0));
                }
            }
        )*
    };
}

mode_tests! {
    osu: Osu;
    taiko: Taiko;
    catch: Catch;
    mania: Mania;
}

#[test]
fn wrong_mode_is_an_error() {
    let map = common::test_map::<Taiko>();

    assert!(Osu::difficulty(&Difficulty::new(), &map).is_err());
    assert!(Mania::difficulty(&Difficulty::new(), &map).is_err());
}

#[test]
fn converts_are_flagged() {
    let map = common::test_map::<Osu>();
    let difficulty = Difficulty::new();

    let taiko = difficulty.calculate_for_mode(&map, GameMode::Taiko).unwrap();
    let catch = difficulty.calculate_for_mode(&map, GameMode::Catch).unwrap();
    let mania = difficulty.calculate_for_mode(&map, GameMode::Mania).unwrap();

    assert!(matches!(taiko, DifficultyAttributes::Taiko(ref a) if a.is_convert()));
    assert!(matches!(catch, DifficultyAttributes::Catch(ref a) if a.is_convert()));
    assert!(matches!(mania, DifficultyAttributes::Mania(ref a) if a.is_convert()));

    for attrs in [taiko, catch, mania] {
        assert!(attrs.stars() > 0.0);
    }
}

#[test]
fn only_osu_converts() {
    let map = common::test_map::<Mania>();

    assert!(Difficulty::new()
        .calculate_for_mode(&map, GameMode::Osu)
        .is_err());
}

#[test]
fn osu_hardrock_and_easy() {
    let nomod = stars::<Osu>("");

    assert!(stars::<Osu>("HR") > nomod);
    assert!(stars::<Osu>("EZ") < nomod);
}

#[test]
fn osu_object_counts() {
    let map = common::test_map::<Osu>();

    let DifficultyAttributes::Osu(attrs) = Difficulty::new().calculate(&map) else {
        panic!("expected osu!standard attributes");
    };

    assert_eq!(attrs.n_objects() as usize, map.hit_objects.len());
    assert!(attrs.n_sliders > 0);
    assert_eq!(attrs.n_spinners, 1);
    assert!(attrs.max_combo > attrs.n_objects());
}

#[test]
fn mania_key_mods_on_convert() {
    let map = common::test_map::<Osu>();
    let mods = GameMods::from_acronyms("4K", GameMode::Mania);

    let converted = map.convert_ref(GameMode::Mania, &mods).unwrap();

    assert!((converted.cs - 4.0).abs() < f32::EPSILON);
}

#[track_caller]
fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{actual} != {expected} (±{tolerance})"
    );
}

#[test]
fn catch_stars_are_pinned() {
    let map = common::test_map::<Catch>();

    assert_close(Difficulty::new().calculate(&map).stars(), 2.411_406_867_6, 1e-8);
}

#[test]
fn taiko_stars_are_pinned() {
    let map = common::test_map::<Taiko>();

    assert_close(Difficulty::new().calculate(&map).stars(), 4.1894, 5e-5);
}

#[test]
fn convert_stars_are_pinned() {
    let map = common::test_map::<Osu>();
    let difficulty = Difficulty::new();

    let taiko = difficulty.calculate_for_mode(&map, GameMode::Taiko).unwrap();
    let catch = difficulty.calculate_for_mode(&map, GameMode::Catch).unwrap();

    assert_close(taiko.stars(), 2.4770, 5e-5);
    assert_close(catch.stars(), 2.3451, 5e-5);
}

#[test]
fn empty_osu_map_keeps_base_stars() {
    let attrs = Difficulty::new().calculate(&Beatmap::default());

    assert_close(attrs.stars(), 0.141_438_089_678_172_37, 1e-12);
}
