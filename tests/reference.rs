//! Cross-checks against `rosu-pp`, which implements the same calculations.

use rosu_mods::GameModsIntermode;
use rosu_perf::{
    catch::Catch, mania::Mania, model::mode::GameMode, osu::Osu, taiko::Taiko, Beatmap,
    Difficulty, GameMods, Performance,
};

use self::common::TestMap;

mod common;

const ACCURACY: f64 = 97.5;
const MISSES: u32 = 2;

struct Values {
    stars: f64,
    pp: f64,
}

fn calculate(path: &str, mode: GameMode, acronyms: &str) -> Values {
    let map = Beatmap::from_path(path).unwrap();
    let mods = GameMods::from_acronyms(acronyms, mode);

    let attrs = Difficulty::new()
        .mods(mods.clone())
        .calculate_for_mode(&map, mode)
        .unwrap();

    let stars = attrs.stars();

    let pp = Performance::new(attrs)
        .mods(mods)
        .lazer(true)
        .accuracy(ACCURACY)
        .misses(MISSES)
        .calculate()
        .pp();

    Values { stars, pp }
}

fn reference(path: &str, mode: GameMode, acronyms: &str) -> Values {
    let map = rosu_pp::Beatmap::from_path(path).unwrap();
    let mods = rosu_pp::GameMods::from(GameModsIntermode::from_acronyms(acronyms));
    let map = map.convert_ref(mode, &mods).unwrap();

    let attrs = rosu_pp::Difficulty::new().mods(mods.clone()).calculate(&map);
    let stars = attrs.stars();

    let pp = rosu_pp::Performance::new(attrs)
        .mods(mods)
        .lazer(true)
        .accuracy(ACCURACY)
        .misses(MISSES)
        .calculate()
        .pp();

    Values { stars, pp }
}

#[track_caller]
fn assert_matches(path: &str, mode: GameMode, mods: &[&str]) {
    for &acronyms in mods {
        let actual = calculate(path, mode, acronyms);
        let expected = reference(path, mode, acronyms);

        for (name, actual, expected) in [
            ("stars", actual.stars, expected.stars),
            ("pp", actual.pp, expected.pp),
        ] {
            assert!(
                (actual - expected).abs() <= 1e-6 * expected.abs().max(1.0),
                "{path} {mode:?} +{acronyms} {name}: {actual} != {expected}"
            );
        }
    }
}

#[test]
fn osu_matches_reference() {
    assert_matches(
        Osu::PATH,
        GameMode::Osu,
        &["", "HD", "HR", "DT", "FL", "HDFL", "EZHT"],
    );
}

#[test]
fn taiko_matches_reference() {
    assert_matches(Taiko::PATH, GameMode::Taiko, &["", "HR", "EZ", "DT", "HT"]);
}

#[test]
fn catch_matches_reference() {
    assert_matches(Catch::PATH, GameMode::Catch, &["", "HR", "EZ", "DT", "HDHR"]);
}

#[test]
fn mania_matches_reference() {
    assert_matches(Mania::PATH, GameMode::Mania, &["", "DT", "HT"]);
}

#[test]
fn converts_match_reference() {
    assert_matches(Osu::PATH, GameMode::Taiko, &["", "DT"]);
    assert_matches(Osu::PATH, GameMode::Catch, &["", "HR"]);
    assert_matches(Osu::PATH, GameMode::Mania, &["", "DT"]);
}
