use rosu_map::section::general::GameMode;

use crate::model::hit_object::{HitObject, HitObjectKind, Pos};

use super::Beatmap;

/// Reason why [`Beatmap::check_suspicion`] flagged a map.
///
/// Some maps are not made for gameplay but to test the limits of osu!
/// itself. Calculating them can be very slow or run out of memory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
#[error("the map seems too suspicious for further calculation (reason={self:?})")]
pub enum TooSuspicious {
    /// Notes are too dense time-wise.
    Density,
    /// The map seems too long.
    Length,
    /// Too many objects.
    ObjectCount,
    /// General red flag.
    RedFlag,
    /// Too many sliders' positions were suspicious.
    SliderPositions,
    /// Too many sliders had a very high amount of repeats.
    SliderRepeats,
}

const DAY_MS: f64 = 60.0 * 60.0 * 24.0 * 1000.0;

const OBJECT_COUNT: usize = 500_000;
/// Taiko calculation is especially expensive for high object counts
const OBJECT_COUNT_TAIKO: usize = 20_000;

/// osu!'s max value is `131_072` and the playfield is `512x384`
const POSITION: f32 = 10_000.0;

/// osu!'s max value is `9000`
const REPEATS: usize = 1000;

const SLIDER_COUNT: usize = 256;

impl TooSuspicious {
    pub(crate) fn new(map: &Beatmap) -> Option<Self> {
        let object_limit = match map.mode {
            GameMode::Taiko => OBJECT_COUNT_TAIKO,
            _ => OBJECT_COUNT,
        };

        if map.hit_objects.len() > object_limit {
            return Some(Self::ObjectCount);
        } else if too_long(&map.hit_objects) {
            return Some(Self::Length);
        }

        // In mania it's more common to have a high note density
        let (per_1s, per_10s) = match map.mode {
            GameMode::Mania => (200, 500),
            _ => (100, 250),
        };

        let mut pos_beyond_threshold = 0;
        let mut repeats_beyond_threshold = 0;

        for (i, h) in map.hit_objects.iter().enumerate() {
            if too_dense(i, h, &map.hit_objects, per_1s, per_10s) {
                return Some(Self::Density);
            }

            let HitObjectKind::Slider(ref slider) = h.kind else {
                continue;
            };

            if slider.repeats > REPEATS {
                if beyond(h.pos) && matches!(map.mode, GameMode::Osu | GameMode::Catch) {
                    return Some(Self::RedFlag);
                }

                repeats_beyond_threshold += 1;
            } else if beyond(h.pos) {
                pos_beyond_threshold += 1;
            }
        }

        // Taiko and mania don't care about slider shapes
        if matches!(map.mode, GameMode::Taiko | GameMode::Mania) {
            None
        } else if pos_beyond_threshold > SLIDER_COUNT {
            Some(Self::SliderPositions)
        } else if repeats_beyond_threshold > SLIDER_COUNT {
            Some(Self::SliderRepeats)
        } else {
            None
        }
    }
}

fn too_long(hit_objects: &[HitObject]) -> bool {
    match hit_objects {
        [first, .., last] => last.start_time - first.start_time > DAY_MS,
        _ => false,
    }
}

fn too_dense(
    i: usize,
    curr: &HitObject,
    hit_objects: &[HitObject],
    per_1s: usize,
    per_10s: usize,
) -> bool {
    let within = |offset: usize, ms: f64| {
        hit_objects
            .get(i + offset)
            .is_some_and(|h| h.start_time - curr.start_time < ms)
    };

    within(per_1s, 1000.0) || within(per_10s, 10_000.0)
}

fn beyond(pos: Pos) -> bool {
    pos.x.abs() > POSITION || pos.y.abs() > POSITION
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with(times: impl Iterator<Item = f64>) -> Beatmap {
        Beatmap {
            hit_objects: times
                .map(|start_time| HitObject {
                    pos: Pos::new(256.0, 192.0),
                    start_time,
                    kind: HitObjectKind::Circle,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn regular_map_passes() {
        let map = map_with((0..500).map(|i| f64::from(i) * 150.0));
        assert_eq!(map.check_suspicion(), Ok(()));
    }

    #[test]
    fn dense_map_is_flagged() {
        let map = map_with((0..500).map(|i| f64::from(i) * 2.0));
        assert_eq!(map.check_suspicion(), Err(TooSuspicious::Density));
    }

    #[test]
    fn long_map_is_flagged() {
        let map = map_with([0.0, DAY_MS * 2.0].into_iter());
        assert_eq!(map.check_suspicion(), Err(TooSuspicious::Length));
    }
}
