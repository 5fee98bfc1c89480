use crate::{
    model::{
        beatmap::Beatmap,
        hit_object::{HitObjectKind, HoldNote, Spinner},
        mods::Reflection,
    },
    util::{float_ext::FloatExt, random::Random},
};

use super::{
    attributes::ObjectCountBuilder,
    catcher::Catcher,
    object::{
        banana_shower::BananaShower,
        juice_stream::{JuiceStream, JuiceStreamBufs, NestedJuiceStreamObjectKind},
        palpable::PalpableObject,
    },
    PLAYFIELD_WIDTH,
};

const RNG_SEED: i32 = 1337;

/// Turn the map's hit objects into fruits and droplets, sorted by time.
///
/// Every fruit and droplet is recorded in `count`. Tiny droplets and
/// bananas are counted or skipped but never become palpable objects.
pub fn convert_objects(
    map: &Beatmap,
    count: &mut ObjectCountBuilder,
    reflection: Reflection,
    hr_offsets: bool,
    cs: f32,
) -> Vec<PalpableObject> {
    let mut palpable_objects = Vec::with_capacity(map.hit_objects.len() * 2);
    let mut bufs = JuiceStreamBufs::default();
    let mut offsets = HardRockOffsets::new();

    for h in map.hit_objects.iter() {
        match h.kind {
            HitObjectKind::Circle => {
                count.record_fruit();

                let x_offset = if hr_offsets {
                    offsets.fruit_offset(h.pos.x, h.start_time)
                } else {
                    0.0
                };

                palpable_objects.push(PalpableObject::new(h.pos.x, x_offset, h.start_time));
            }
            HitObjectKind::Slider(ref slider) => {
                let x = h.pos.x.clamp(0.0, PLAYFIELD_WIDTH);
                let stream = JuiceStream::new(x, h.start_time, slider, map, count, &mut bufs);

                let end_x = slider
                    .control_points
                    .last()
                    .map_or(0.0, |control_point| control_point.pos.x);

                offsets.last_pos = Some(h.pos.x + end_x);
                offsets.last_start_time = h.start_time;

                for nested in stream.nested_objects {
                    if nested.kind == NestedJuiceStreamObjectKind::Fruit {
                        palpable_objects.push(PalpableObject::new(
                            nested.pos,
                            0.0,
                            nested.start_time,
                        ));

                        continue;
                    }

                    let _ = offsets.rng.next_int();

                    if nested.kind == NestedJuiceStreamObjectKind::Droplet {
                        palpable_objects.push(PalpableObject::new(
                            nested.pos,
                            0.0,
                            nested.start_time,
                        ));
                    }
                }
            }
            HitObjectKind::Spinner(Spinner { duration })
            | HitObjectKind::Hold(HoldNote { duration }) => {
                let shower = BananaShower::new(h.start_time, h.start_time + duration);
                offsets.skip_bananas(shower.n_bananas);
            }
        }
    }

    if matches!(reflection, Reflection::Horizontal | Reflection::Both) {
        for h in palpable_objects.iter_mut() {
            h.x = PLAYFIELD_WIDTH - h.x;
            h.x_offset = -h.x_offset;
        }
    }

    palpable_objects.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    initialize_hyper_dash(cs, &mut palpable_objects);

    palpable_objects
}

/// Position offsets that the HR mod applies to fruits.
struct HardRockOffsets {
    rng: Random,
    last_pos: Option<f32>,
    last_start_time: f64,
}

impl HardRockOffsets {
    const fn new() -> Self {
        Self {
            rng: Random::new(RNG_SEED),
            last_pos: None,
            last_start_time: 0.0,
        }
    }

    fn skip_bananas(&mut self, n_bananas: usize) {
        for _ in 0..n_bananas {
            let _ = self.rng.next_double();
            let _ = self.rng.next_int();
            let _ = self.rng.next_int();
            let _ = self.rng.next_int();
        }
    }

    fn fruit_offset(&mut self, x: f32, start_time: f64) -> f32 {
        let mut offset_pos = x;

        let last_pos = match self.last_pos {
            Some(pos) if pos.abs() >= f32::EPSILON => pos,
            Some(_) | None => {
                self.last_pos = Some(offset_pos);
                self.last_start_time = start_time;

                return 0.0;
            }
        };

        let pos_diff = offset_pos - last_pos;
        let time_diff = (start_time - self.last_start_time) as i32;

        if time_diff > 1000 {
            self.last_pos = Some(offset_pos);
            self.last_start_time = start_time;

            return 0.0;
        }

        if pos_diff.eq(0.0) {
            // Neither position nor time are updated
            self.apply_random_offset(&mut offset_pos, f64::from(time_diff) / 4.0);

            return offset_pos - x;
        }

        if pos_diff.abs() < (time_diff / 3) as f32 {
            apply_offset(&mut offset_pos, pos_diff);
        }

        self.last_pos = Some(offset_pos);
        self.last_start_time = start_time;

        offset_pos - x
    }

    fn apply_random_offset(&mut self, pos: &mut f32, max_offset: f64) {
        let right = self.rng.next_bool();
        let rand = (self.rng.next_double_range(0.0, max_offset.max(0.0)) as f32).min(20.0);

        if right {
            if *pos + rand <= PLAYFIELD_WIDTH {
                *pos += rand;
            } else {
                *pos -= rand;
            }
        } else if *pos - rand >= 0.0 {
            *pos -= rand;
        } else {
            *pos += rand;
        }
    }
}

fn apply_offset(pos: &mut f32, amount: f32) {
    if amount > 0.0 {
        if *pos + amount < PLAYFIELD_WIDTH {
            *pos += amount;
        }
    } else if *pos + amount > 0.0 {
        *pos += amount;
    }
}

fn initialize_hyper_dash(cs: f32, palpable_objects: &mut [PalpableObject]) {
    let mut half_catcher_width = f64::from(Catcher::catch_width(cs) / 2.0);
    half_catcher_width /= f64::from(Catcher::ALLOWED_CATCH_RANGE);

    let mut last_dir = 0;
    let mut last_excess = half_catcher_width;

    for i in 0..palpable_objects.len().saturating_sub(1) {
        let next = &palpable_objects[i + 1];
        let curr = &palpable_objects[i];

        let this_dir = if next.effective_x() > curr.effective_x() {
            1
        } else {
            -1
        };

        // Truncated like stable
        let time_to_next = f64::from(
            (next.start_time as i32 - curr.start_time as i32) as f32 - 1000.0 / 60.0 / 4.0,
        );

        let dist_to_next = f64::from((next.effective_x() - curr.effective_x()).abs())
            - if last_dir == this_dir {
                last_excess
            } else {
                half_catcher_width
            };

        let dist_to_hyper = (time_to_next * Catcher::BASE_SPEED - dist_to_next) as f32;

        let curr = &mut palpable_objects[i];

        if dist_to_hyper < 0.0 {
            curr.hyper_dash = true;
            last_excess = half_catcher_width;
        } else {
            curr.dist_to_hyper_dash = dist_to_hyper;
            last_excess = f64::from(dist_to_hyper).clamp(0.0, half_catcher_width);
        }

        last_dir = this_dir;
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::section::hit_objects::{PathControlPoint, PathType};

    use crate::model::hit_object::{HitObject, Pos, Slider};

    use super::*;

    fn circle(x: f32, start_time: f64) -> HitObject {
        HitObject {
            pos: Pos::new(x, 192.0),
            start_time,
            kind: HitObjectKind::Circle,
        }
    }

    fn slider(start_time: f64, len: f32) -> HitObject {
        HitObject {
            pos: Pos::new(100.0, 192.0),
            start_time,
            kind: HitObjectKind::Slider(Slider {
                expected_dist: Some(f64::from(len)),
                repeats: 1,
                control_points: vec![
                    PathControlPoint {
                        path_type: Some(PathType::LINEAR),
                        ..PathControlPoint::new(Pos::new(0.0, 0.0))
                    },
                    PathControlPoint::new(Pos::new(len, 0.0)),
                ]
                .into_boxed_slice(),
                node_sounds: Box::default(),
            }),
        }
    }

    fn convert(map: &Beatmap, reflection: Reflection, hr_offsets: bool) -> Vec<PalpableObject> {
        convert_objects(
            map,
            &mut ObjectCountBuilder::new(),
            reflection,
            hr_offsets,
            map.cs,
        )
    }

    #[test]
    fn slider_becomes_fruits_and_droplets() {
        let map = Beatmap {
            hit_objects: vec![slider(1000.0, 300.0)],
            ..Default::default()
        };

        let mut count = ObjectCountBuilder::new();
        let objects = convert_objects(&map, &mut count, Reflection::None, false, map.cs);
        let counts = count.into_counts();

        // Head, repeat, and tail
        assert_eq!(counts.iter().filter(|count| count.fruit).count(), 3);
        assert!(counts.iter().any(|count| !count.fruit));
        assert!(counts.iter().map(|count| count.tiny_droplets).sum::<u32>() > 0);
        assert_eq!(objects.len(), counts.len());
        assert!(objects
            .windows(2)
            .all(|w| w[0].start_time <= w[1].start_time));
    }

    #[test]
    fn spinners_are_not_palpable() {
        let map = Beatmap {
            hit_objects: vec![
                circle(100.0, 0.0),
                HitObject {
                    pos: Pos::default(),
                    start_time: 500.0,
                    kind: HitObjectKind::Spinner(Spinner { duration: 1000.0 }),
                },
            ],
            ..Default::default()
        };

        assert_eq!(convert(&map, Reflection::None, false).len(), 1);
    }

    #[test]
    fn horizontal_reflection_mirrors_positions() {
        let map = Beatmap {
            hit_objects: vec![circle(100.0, 0.0)],
            ..Default::default()
        };

        let objects = convert(&map, Reflection::Horizontal, false);
        assert!(objects[0].effective_x().eq(412.0));

        let objects = convert(&map, Reflection::Vertical, false);
        assert!(objects[0].effective_x().eq(100.0));
    }

    #[test]
    fn hardrock_offsets_move_close_fruits() {
        let map = Beatmap {
            hit_objects: vec![circle(200.0, 0.0), circle(220.0, 300.0)],
            ..Default::default()
        };

        let plain = convert(&map, Reflection::None, false);
        let offset = convert(&map, Reflection::None, true);

        assert!(plain[1].x_offset.eq(0.0));
        // The position difference is doubled since 20 < 300 / 3
        assert!(offset[1].effective_x().eq(240.0));
    }

    #[test]
    fn far_fruits_are_hyper_dashes() {
        let map = Beatmap {
            hit_objects: vec![circle(0.0, 0.0), circle(512.0, 100.0)],
            ..Default::default()
        };

        let objects = convert(&map, Reflection::None, false);

        assert!(objects[0].hyper_dash);
        assert!(!objects[1].hyper_dash);
    }
}
