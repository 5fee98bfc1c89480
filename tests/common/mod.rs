#![allow(dead_code)]

use rosu_perf::{
    catch::Catch, mania::Mania, model::mode::IGameMode, osu::Osu, taiko::Taiko, Beatmap,
};

/// Modes that have a fixture map in `./resources`.
pub trait TestMap: IGameMode {
    const PATH: &'static str;
}

impl TestMap for Osu {
    const PATH: &'static str = "./resources/osu.osu";
}

impl TestMap for Taiko {
    const PATH: &'static str = "./resources/taiko.osu";
}

impl TestMap for Catch {
    const PATH: &'static str = "./resources/catch.osu";
}

impl TestMap for Mania {
    const PATH: &'static str = "./resources/mania.osu";
}

pub fn test_map<M: TestMap>() -> Beatmap {
    Beatmap::from_path(M::PATH).unwrap_or_else(|err| panic!("failed to decode {}: {err}", M::PATH))
}

#[track_caller]
pub fn assert_eq_float(a: f64, b: f64) {
    assert!(
        (a - b).abs() <= 1e-8 * a.abs().max(b.abs()).max(1.0),
        "{a} != {b}"
    );
}
