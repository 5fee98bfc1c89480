use std::cmp;

use rosu_map::{section::hit_objects::hit_samples::HitSoundType, util::Pos};

use crate::{
    model::{
        beatmap::Beatmap,
        control_point::{DifficultyPoint, TimingPoint},
        hit_object::{HitObject, HitObjectKind, HoldNote, Slider, Spinner},
    },
    util::{float_ext::FloatExt, get_precision_adjusted_beat_len},
};

pub(crate) const VELOCITY_MULTIPLIER: f32 = 1.4;
const OSU_BASE_SCORING_DIST: f32 = 100.0;

/// Turn the objects of an osu!standard map into osu!taiko objects.
///
/// Sliders are either kept as drumrolls or split into hits, spinners stay
/// as swells.
pub fn convert(map: &mut Beatmap) {
    let mut converted = Vec::with_capacity(map.hit_objects.len());

    for (i, h) in map.hit_objects.iter().enumerate() {
        let sound = map.hit_sounds.get(i).copied().unwrap_or_default();

        match h.kind {
            HitObjectKind::Circle | HitObjectKind::Spinner(_) => converted.push((h.clone(), sound)),
            HitObjectKind::Slider(ref slider) => {
                let Some(params) = SliderParams::new(map, h.start_time, slider) else {
                    converted.push((h.clone(), sound));

                    continue;
                };

                split_slider(h.start_time, slider, sound, &params, &mut converted);
            }
            HitObjectKind::Hold(HoldNote { duration }) => {
                let spinner = HitObject {
                    pos: h.pos,
                    start_time: h.start_time,
                    kind: HitObjectKind::Spinner(Spinner { duration }),
                };

                converted.push((spinner, sound));
            }
        }
    }

    // Stable so that objects on the same timestamp keep their order
    converted.sort_by(|(a, _), (b, _)| a.start_time.total_cmp(&b.start_time));

    let (hit_objects, hit_sounds) = converted.into_iter().unzip();
    map.hit_objects = hit_objects;
    map.hit_sounds = hit_sounds;
}

fn split_slider(
    start_time: f64,
    slider: &Slider,
    sound: HitSoundType,
    params: &SliderParams,
    converted: &mut Vec<(HitObject, HitSoundType)>,
) {
    let edge_sound_count = cmp::max(slider.node_sounds.len(), 1);
    let end_time = start_time + f64::from(params.duration) + params.tick_spacing / 8.0;

    let mut i = 0;
    let mut time = start_time;

    while time <= end_time {
        let h = HitObject {
            pos: Pos::default(),
            start_time: time,
            kind: HitObjectKind::Circle,
        };

        let sound = slider.node_sounds.get(i).copied().unwrap_or(sound);
        converted.push((h, sound));

        if params.tick_spacing.eq(0.0) {
            break;
        }

        time += params.tick_spacing;
        i = (i + 1) % edge_sound_count;
    }
}

struct SliderParams {
    duration: u32,
    tick_spacing: f64,
}

impl SliderParams {
    /// Returns `None` if the slider should stay a drumroll.
    fn new(map: &Beatmap, start_time: f64, slider: &Slider) -> Option<Self> {
        // Distance over all repeats, later the drum roll distance
        let spans = slider.span_count() as f64;
        let mut dist = slider.expected_dist.unwrap_or(0.0);

        // Kept separate for float precision
        dist *= f64::from(VELOCITY_MULTIPLIER);
        dist *= spans;

        let timing_beat_len = map
            .timing_point_at(start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let slider_velocity = map
            .difficulty_point_at(start_time)
            .map_or(DifficultyPoint::DEFAULT_SLIDER_VELOCITY, |point| {
                point.slider_velocity
            });

        let mut beat_len = get_precision_adjusted_beat_len(slider_velocity, timing_beat_len);

        let slider_scoring_point_dist = f64::from(OSU_BASE_SCORING_DIST)
            * (map.slider_multiplier * f64::from(VELOCITY_MULTIPLIER))
            / map.slider_tick_rate;

        let taiko_vel = slider_scoring_point_dist * map.slider_tick_rate;
        let duration = (dist / taiko_vel * beat_len) as u32;

        let osu_vel = taiko_vel * (f64::from(1000.0_f32) / beat_len);

        // Stable only uses the speed-adjusted beat length for maps before v8
        if map.version >= 8 {
            beat_len = timing_beat_len;
        }

        // Split drum rolls use 1/8 ticks
        let tick_spacing = (beat_len / map.slider_tick_rate).min(f64::from(duration) / spans);

        let should_split = tick_spacing > 0.0 && dist / osu_vel * 1000.0 < 2.0 * beat_len;

        should_split.then_some(Self {
            duration,
            tick_spacing,
        })
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::section::hit_objects::{PathControlPoint, PathType};

    use crate::model::hit_object::HitObjectKind;

    use super::*;

    fn slider(start_time: f64, expected_dist: f64) -> HitObject {
        HitObject {
            pos: Pos::new(100.0, 100.0),
            start_time,
            kind: HitObjectKind::Slider(Slider {
                expected_dist: Some(expected_dist),
                repeats: 0,
                control_points: vec![
                    PathControlPoint {
                        path_type: Some(PathType::LINEAR),
                        ..PathControlPoint::new(Pos::new(0.0, 0.0))
                    },
                    PathControlPoint::new(Pos::new(expected_dist as f32, 0.0)),
                ]
                .into_boxed_slice(),
                node_sounds: vec![HitSoundType::default(); 2].into_boxed_slice(),
            }),
        }
    }

    #[test]
    fn short_slider_is_split_into_hits() {
        let mut map = Beatmap {
            hit_objects: vec![slider(1000.0, 20.0)],
            ..Default::default()
        };

        convert(&mut map);

        assert!(map.hit_objects.len() > 1);
        assert!(map.hit_objects.iter().all(HitObject::is_circle));
        assert_eq!(map.hit_objects.len(), map.hit_sounds.len());
    }

    #[test]
    fn long_slider_stays_drumroll() {
        let mut map = Beatmap {
            hit_objects: vec![slider(1000.0, 400.0)],
            ..Default::default()
        };

        convert(&mut map);

        assert_eq!(map.hit_objects.len(), 1);
        assert!(map.hit_objects[0].is_slider());
    }

    #[test]
    fn objects_are_sorted() {
        let circle = |start_time| HitObject {
            pos: Pos::default(),
            start_time,
            kind: HitObjectKind::Circle,
        };

        let mut map = Beatmap {
            hit_objects: vec![circle(500.0), slider(100.0, 20.0), circle(900.0)],
            ..Default::default()
        };

        convert(&mut map);

        assert!(map
            .hit_objects
            .windows(2)
            .all(|w| w[0].start_time <= w[1].start_time));
    }
}
