use rosu_map::section::hit_objects::CurveBuffers;

use crate::{
    model::{
        beatmap::Beatmap,
        hit_object::{HitObject, HitObjectKind, HoldNote, Pos, Spinner},
        mode::GameMode,
    },
    util::{limited_queue::LimitedQueue, random::Random, sort},
    GameMods,
};

use self::{
    pattern::Pattern,
    pattern_generator::{
        end_time_object::EndTimeObjectPatternGenerator, hit_object::HitObjectPatternGenerator,
        path_object::PathObjectPatternGenerator,
    },
    pattern_type::PatternType,
};

mod pattern;
mod pattern_generator;
mod pattern_type;

const MAX_NOTES_FOR_DENSITY: usize = 7;

/// Convert an osu!standard map into an osu!mania map.
///
/// Key mods decide the amount of columns, otherwise it's derived from the
/// map's difficulty settings and object composition.
pub fn convert(map: &mut Beatmap, mods: &GameMods) {
    let total_columns = mods.mania_keys().unwrap_or_else(|| target_columns(map));
    let hit_objects = generate_notes(map, total_columns);

    tracing::debug!(
        total_columns,
        n_original = map.hit_objects.len(),
        n_converted = hit_objects.len(),
        "converted map to mania"
    );

    map.hit_objects = hit_objects;
    map.hit_sounds.clear();
    map.cs = total_columns;
}

fn generate_notes(map: &Beatmap, total_columns: f32) -> Vec<HitObject> {
    let seed = (map.hp + map.cs).round_ties_even() as i32 * 20
        + (map.od * 41.2) as i32
        + map.ar.round_ties_even() as i32;

    let mut random = Random::new(seed);
    let total_columns = total_columns as i32;

    let mut prev_note_times = LimitedQueue::new(MAX_NOTES_FOR_DENSITY);
    let mut density = f64::from(i32::MAX);

    let mut compute_density = |new_note_time: f64, density: &mut f64| {
        prev_note_times.push(new_note_time);

        if prev_note_times.len() >= 2 {
            let first = prev_note_times[0];
            let last = prev_note_times[prev_note_times.len() - 1];
            *density = (last - first) / prev_note_times.len() as f64;
        }
    };

    let mut prev = PrevValues::default();
    let mut curve_bufs = CurveBuffers::default();
    let mut new_hit_objects = Vec::with_capacity(map.hit_objects.len() * 2);

    for (i, obj) in map.hit_objects.iter().enumerate() {
        let sound = map.hit_sounds.get(i).copied().unwrap_or_default();

        match obj.kind {
            HitObjectKind::Circle => {
                compute_density(obj.start_time, &mut density);

                let mut gen = HitObjectPatternGenerator::new(
                    &mut random,
                    obj,
                    sound,
                    total_columns,
                    &prev,
                    density,
                    map,
                );

                let new_pattern = gen.generate();
                let stair = gen.stair_type;

                prev.stair = stair;
                prev.time = obj.start_time;
                prev.pos = obj.pos;

                new_hit_objects.extend_from_slice(&new_pattern.hit_objects);
                prev.pattern = new_pattern;
            }
            HitObjectKind::Slider(ref slider) => {
                let dist = slider.curve(GameMode::Mania, &mut curve_bufs).dist();

                let mut gen = PathObjectPatternGenerator::new(
                    &mut random,
                    obj,
                    sound,
                    total_columns,
                    &prev.pattern,
                    map,
                    slider.span_count(),
                    dist,
                    &slider.node_sounds,
                );

                let segment_duration = f64::from(gen.segment_duration);
                let patterns = gen.generate();

                for i in 0..=slider.repeats + 1 {
                    let time = obj.start_time + segment_duration * i as f64;

                    prev.time = time;
                    prev.pos = obj.pos;

                    compute_density(time, &mut density);
                }

                for new_pattern in patterns {
                    new_hit_objects.extend_from_slice(&new_pattern.hit_objects);
                    prev.pattern = new_pattern;
                }
            }
            HitObjectKind::Spinner(Spinner { duration })
            | HitObjectKind::Hold(HoldNote { duration }) => {
                let end_time = obj.start_time + duration;

                let new_pattern = EndTimeObjectPatternGenerator::new(
                    &mut random,
                    obj,
                    end_time,
                    sound,
                    total_columns,
                    &prev.pattern,
                    map,
                )
                .generate();

                prev.time = end_time;
                prev.pos = Pos::new(256.0, 192.0);

                compute_density(end_time, &mut density);

                // The previous pattern stays untouched for these objects
                new_hit_objects.extend(new_pattern.hit_objects);
            }
        }
    }

    new_hit_objects.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    sort::osu_legacy(&mut new_hit_objects, |a, b| {
        a.start_time.total_cmp(&b.start_time)
    });

    new_hit_objects
}

/// State of the previously converted object.
pub struct PrevValues {
    pub time: f64,
    pub pos: Pos,
    pub pattern: Pattern,
    pub stair: PatternType,
}

impl Default for PrevValues {
    fn default() -> Self {
        Self {
            time: 0.0,
            pos: Pos::default(),
            pattern: Pattern::default(),
            stair: PatternType::STAIR,
        }
    }
}

fn target_columns(map: &Beatmap) -> f32 {
    let rounded_cs = map.cs.round_ties_even();
    let rounded_od = map.od.round_ties_even();

    if map.hit_objects.is_empty() {
        return (rounded_od + 1.0).clamp(4.0, 7.0);
    }

    let slider_or_spinner_count = map
        .hit_objects
        .iter()
        .filter(|h| matches!(h.kind, HitObjectKind::Slider(_) | HitObjectKind::Spinner(_)))
        .count();

    let percent_slider_or_spinner =
        f64::from(slider_or_spinner_count as f32 / map.hit_objects.len() as f32);

    if percent_slider_or_spinner < 0.2 {
        7.0
    } else if percent_slider_or_spinner < 0.3 || rounded_cs >= 5.0 {
        f32::from(6 + u8::from(rounded_od > 5.0))
    } else if percent_slider_or_spinner > 0.6 {
        f32::from(4 + u8::from(rounded_od > 4.0))
    } else {
        (rounded_od + 1.0).clamp(4.0, 7.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{mania::object::ManiaObject, model::hit_object::HitSoundType};

    use super::*;

    fn circle(x: f32, start_time: f64) -> HitObject {
        HitObject {
            pos: Pos::new(x, 192.0),
            start_time,
            kind: HitObjectKind::Circle,
        }
    }

    fn spinner(start_time: f64, duration: f64) -> HitObject {
        HitObject {
            pos: Pos::new(256.0, 192.0),
            start_time,
            kind: HitObjectKind::Spinner(Spinner { duration }),
        }
    }

    fn osu_map(hit_objects: Vec<HitObject>) -> Beatmap {
        Beatmap {
            hit_sounds: vec![HitSoundType::default(); hit_objects.len()],
            hit_objects,
            ..Default::default()
        }
    }

    fn circles(n: usize) -> Vec<HitObject> {
        (0..n)
            .map(|i| circle((i * 37 % 512) as f32, 1000.0 + i as f64 * 250.0))
            .collect()
    }

    #[test]
    fn column_heuristic() {
        // Only circles
        assert!((target_columns(&osu_map(circles(10))) - 7.0).abs() < f32::EPSILON);

        // Mostly spinners with low cs
        let mut objects = circles(3);
        objects.extend((0..7).map(|i| spinner(5000.0 + f64::from(i) * 2000.0, 1000.0)));

        let map = Beatmap {
            cs: 4.0,
            od: 4.0,
            ..osu_map(objects)
        };

        assert!((target_columns(&map) - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn key_mods_decide_columns() {
        let mut map = osu_map(circles(20));
        let mods = GameMods::from_acronyms("4K", GameMode::Mania);

        convert(&mut map, &mods);

        assert!((map.cs - 4.0).abs() < f32::EPSILON);
        assert!(map.hit_sounds.is_empty());

        for h in map.hit_objects.iter() {
            assert!(ManiaObject::column(h.pos.x, 4.0) < 4);
        }
    }

    #[test]
    fn notes_are_sorted() {
        let mut objects = circles(30);
        objects.push(spinner(2100.0, 1500.0));
        objects.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let mut map = osu_map(objects);
        convert(&mut map, &GameMods::default());

        assert!(map
            .hit_objects
            .windows(2)
            .all(|w| w[0].start_time <= w[1].start_time));
        assert!(map.hit_objects.iter().any(HitObject::is_hold_note));
    }

    #[test]
    fn deterministic() {
        let orig = osu_map(circles(50));

        let mut a = orig.clone();
        let mut b = orig;
        convert(&mut a, &GameMods::default());
        convert(&mut b, &GameMods::default());

        assert_eq!(a, b);
        assert!(a.hit_objects.len() >= 50);
    }
}
