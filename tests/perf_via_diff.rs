use rosu_perf::{
    catch::{Catch, CatchPerformance},
    mania::{Mania, ManiaPerformance},
    osu::{Osu, OsuPerformance},
    taiko::{Taiko, TaikoPerformance},
    GameMods, Performance,
};

mod common;

fn mods(acronyms: &str, mode: rosu_perf::model::mode::GameMode) -> GameMods {
    GameMods::from_acronyms(acronyms, mode)
}

#[test]
fn osu() {
    let map = common::test_map::<Osu>();
    let mods = mods("HDDT", map.mode);

    let regular = OsuPerformance::try_new(&map)
        .unwrap()
        .mods(mods.clone())
        .misses(2)
        .calculate();

    let via_diff = OsuPerformance::from(regular.difficulty.clone())
        .mods(mods)
        .misses(2)
        .calculate();

    assert_eq!(regular, via_diff);
}

#[test]
fn taiko() {
    let map = common::test_map::<Taiko>();
    let mods = mods("HDDT", map.mode);

    let regular = TaikoPerformance::try_new(&map)
        .unwrap()
        .mods(mods.clone())
        .misses(2)
        .calculate();

    let via_diff = TaikoPerformance::from(regular.difficulty.clone())
        .mods(mods)
        .misses(2)
        .calculate();

    assert_eq!(regular, via_diff);
}

#[test]
fn catch() {
    let map = common::test_map::<Catch>();
    let mods = mods("HDDT", map.mode);

    let regular = CatchPerformance::try_new(&map)
        .unwrap()
        .mods(mods.clone())
        .misses(2)
        .calculate();

    let via_diff = CatchPerformance::from(regular.difficulty.clone())
        .mods(mods)
        .misses(2)
        .calculate();

    assert_eq!(regular, via_diff);
}

#[test]
fn mania() {
    let map = common::test_map::<Mania>();
    let mods = mods("DT", map.mode);

    let regular = ManiaPerformance::try_new(&map)
        .unwrap()
        .mods(mods.clone())
        .misses(2)
        .calculate();

    let via_diff = ManiaPerformance::from(regular.difficulty.clone())
        .mods(mods)
        .misses(2)
        .calculate();

    assert_eq!(regular, via_diff);
}

#[test]
fn any_mode() {
    let map = common::test_map::<Osu>();

    let regular = Performance::new(&map).accuracy(98.5).combo(300).calculate();

    let via_diff = Performance::new(regular.difficulty_attributes())
        .accuracy(98.5)
        .combo(300)
        .calculate();

    assert_eq!(regular, via_diff);
}
