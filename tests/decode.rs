use rosu_map::section::hit_objects::hit_samples::HitSoundType;
use rosu_perf::{
    catch::Catch,
    mania::Mania,
    model::{hit_object::HitObjectKind, mode::GameMode},
    osu::Osu,
    taiko::Taiko,
    Beatmap,
};

use self::common::TestMap;

mod common;

fn decode<M: TestMap>(expected_mode: GameMode) -> Beatmap {
    let map = common::test_map::<M>();

    assert_eq!(map.mode, expected_mode);
    assert!(!map.hit_objects.is_empty());
    assert_eq!(map.hit_objects.len(), map.hit_sounds.len());
    assert!(map.check_suspicion().is_ok());

    assert!(map
        .hit_objects
        .windows(2)
        .all(|w| w[0].start_time <= w[1].start_time));

    map
}

#[test]
fn osu() {
    let map = decode::<Osu>(GameMode::Osu);

    assert!(map.hit_objects.iter().any(|h| h.is_slider()));
    assert!(map.hit_objects.iter().any(|h| h.is_spinner()));
    assert!(map.effect_points.iter().any(|p| p.kiai));
    common::assert_eq_float(map.bpm(), 150.0);
}

#[test]
fn taiko() {
    let map = decode::<Taiko>(GameMode::Taiko);

    assert!(map.hit_objects.iter().any(|h| h.is_slider()));
    assert!(map.hit_sounds.iter().any(|s| s.has_flag(HitSoundType::CLAP | HitSoundType::WHISTLE)));
}

#[test]
fn catch() {
    let map = decode::<Catch>(GameMode::Catch);

    assert!(map.hit_objects.iter().any(|h| h.is_spinner()));
}

#[test]
fn mania() {
    let map = decode::<Mania>(GameMode::Mania);

    assert!((map.cs - 4.0).abs() < f32::EPSILON);
    assert!(map
        .hit_objects
        .iter()
        .any(|h| matches!(h.kind, HitObjectKind::Hold(_))));
}

#[test]
fn from_bytes_matches_from_path() {
    let bytes = std::fs::read(Osu::PATH).unwrap();
    let from_bytes = Beatmap::from_bytes(&bytes).unwrap();

    assert_eq!(from_bytes, common::test_map::<Osu>());
}
