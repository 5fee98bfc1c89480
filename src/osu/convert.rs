use rosu_map::section::hit_objects::CurveBuffers;

use crate::model::{beatmap::Beatmap, mods::Reflection};

use super::{
    attributes::OsuDifficultyAttributes,
    difficulty::scaling_factor::ScalingFactor,
    object::{OsuObject, OsuObjectKind},
};

/// Turn the map's hit objects into [`OsuObject`]s, applying reflection and
/// stacking.
///
/// Object counts and the max combo of the first `take` objects are added
/// onto `attrs`.
pub fn convert_objects(
    map: &Beatmap,
    scaling_factor: &ScalingFactor,
    reflection: Reflection,
    time_preempt: f64,
    mut take: usize,
    attrs: &mut OsuDifficultyAttributes,
) -> Vec<OsuObject> {
    let mut curve_bufs = CurveBuffers::default();
    let mut ticks_buf = Vec::new();

    let mut osu_objects: Vec<_> = map
        .hit_objects
        .iter()
        .map(|h| OsuObject::new(h, map, &mut curve_bufs, &mut ticks_buf))
        .inspect(|h| {
            if take == 0 {
                return;
            }

            take -= 1;
            attrs.add_object(h);
        })
        .collect();

    match reflection {
        Reflection::None => {}
        Reflection::Vertical => osu_objects
            .iter_mut()
            .for_each(OsuObject::reflect_vertically),
        Reflection::Horizontal => osu_objects
            .iter_mut()
            .for_each(OsuObject::reflect_horizontally),
        Reflection::Both => osu_objects.iter_mut().for_each(|h| {
            h.reflect_vertically();
            h.reflect_horizontally();
        }),
    }

    osu_objects.iter_mut().for_each(OsuObject::finalize_tail);

    let stack_threshold = time_preempt * f64::from(map.stack_leniency);

    if map.version >= 6 {
        stacking(&mut osu_objects, stack_threshold);
    } else {
        old_stacking(&mut osu_objects, stack_threshold);
    }

    for h in osu_objects.iter_mut() {
        h.stack_offset = scaling_factor.stack_offset(h.stack_height);

        if let OsuObjectKind::Slider(ref mut slider) = h.kind {
            slider.lazy_end_pos += h.pos + h.stack_offset;
        }
    }

    osu_objects
}

const STACK_DISTANCE: f32 = 3.0;

fn stacking(hit_objects: &mut [OsuObject], stack_threshold: f64) {
    let mut extended_start_idx = 0;

    let Some(extended_end_idx) = hit_objects.len().checked_sub(1) else {
        return;
    };

    for i in (1..=extended_end_idx).rev() {
        let mut n = i;
        let mut obj_i_idx = i;

        // Objects that already have a stack height were handled by a later one
        if hit_objects[obj_i_idx].stack_height != 0 || hit_objects[obj_i_idx].is_spinner() {
            continue;
        }

        if hit_objects[obj_i_idx].is_circle() {
            while let Some(prev) = n.checked_sub(1) {
                n = prev;

                if hit_objects[n].is_spinner() {
                    continue;
                }

                if hit_objects[obj_i_idx].start_time - hit_objects[n].end_time() > stack_threshold {
                    break;
                }

                if n < extended_start_idx {
                    hit_objects[n].stack_height = 0;
                    extended_start_idx = n;
                }

                // Circles under the end of the last slider of a stack move down and right
                if hit_objects[n].is_slider()
                    && hit_objects[n]
                        .end_pos()
                        .distance(hit_objects[obj_i_idx].pos)
                        < STACK_DISTANCE
                {
                    let offset =
                        hit_objects[obj_i_idx].stack_height - hit_objects[n].stack_height + 1;

                    for j in n + 1..=i {
                        if hit_objects[n].end_pos().distance(hit_objects[j].pos) < STACK_DISTANCE {
                            hit_objects[j].stack_height -= offset;
                        }
                    }

                    // The slider itself is handled in a later iteration
                    break;
                }

                if hit_objects[n].pos.distance(hit_objects[obj_i_idx].pos) < STACK_DISTANCE {
                    hit_objects[n].stack_height = hit_objects[obj_i_idx].stack_height + 1;
                    obj_i_idx = n;
                }
            }
        } else if hit_objects[obj_i_idx].is_slider() {
            // Sliders always stack positively
            while let Some(prev) = n.checked_sub(1) {
                n = prev;

                if hit_objects[n].is_spinner() {
                    continue;
                }

                if hit_objects[obj_i_idx].start_time - hit_objects[n].start_time > stack_threshold {
                    break;
                }

                if hit_objects[n]
                    .end_pos()
                    .distance(hit_objects[obj_i_idx].pos)
                    < STACK_DISTANCE
                {
                    hit_objects[n].stack_height = hit_objects[obj_i_idx].stack_height + 1;
                    obj_i_idx = n;
                }
            }
        }
    }
}

fn old_stacking(hit_objects: &mut [OsuObject], stack_threshold: f64) {
    for i in 0..hit_objects.len() {
        if hit_objects[i].stack_height != 0 && !hit_objects[i].is_slider() {
            continue;
        }

        let mut start_time = hit_objects[i].end_time();

        // End of the path rather than the slider's end position
        let pos2 = match hit_objects[i].kind {
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => hit_objects[i].pos,
            OsuObjectKind::Slider(ref slider) => {
                let nested = if slider.repeat_count() % 2 == 0 {
                    slider.tail()
                } else {
                    slider.nested_objects.iter().find(|nested| nested.is_repeat())
                };

                nested.map_or(hit_objects[i].pos, |nested| nested.pos)
            }
        };

        let mut slider_stack = 0;

        for j in i + 1..hit_objects.len() {
            if hit_objects[j].start_time - stack_threshold > start_time {
                break;
            }

            // Stable compares against the start time of `j`, not its end time
            if hit_objects[j].pos.distance(hit_objects[i].pos) < STACK_DISTANCE {
                hit_objects[i].stack_height += 1;
                start_time = hit_objects[j].start_time;
            } else if hit_objects[j].pos.distance(pos2) < STACK_DISTANCE {
                slider_stack += 1;
                hit_objects[j].stack_height -= slider_stack;
                start_time = hit_objects[j].start_time;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::util::Pos;

    use crate::model::hit_object::{HitObject, HitObjectKind};

    use super::*;

    fn circle(x: f32, y: f32, start_time: f64) -> HitObject {
        HitObject {
            pos: Pos::new(x, y),
            start_time,
            kind: HitObjectKind::Circle,
        }
    }

    fn convert(map: &Beatmap, take: usize) -> (Vec<OsuObject>, OsuDifficultyAttributes) {
        let mut attrs = OsuDifficultyAttributes::default();
        let scaling_factor = ScalingFactor::new(f64::from(map.cs));

        let objects =
            convert_objects(map, &scaling_factor, Reflection::None, 1200.0, take, &mut attrs);

        (objects, attrs)
    }

    #[test]
    fn stacked_circles() {
        let map = Beatmap {
            hit_objects: vec![
                circle(100.0, 100.0, 0.0),
                circle(100.0, 100.0, 100.0),
                circle(100.0, 100.0, 200.0),
                circle(300.0, 300.0, 300.0),
            ],
            ..Default::default()
        };

        let (objects, attrs) = convert(&map, usize::MAX);

        let heights: Vec<_> = objects.iter().map(|h| h.stack_height).collect();
        assert_eq!(heights, [2, 1, 0, 0]);
        assert!(objects[0].stacked_pos().x < objects[2].stacked_pos().x);
        assert_eq!(attrs.n_circles, 4);
        assert_eq!(attrs.max_combo, 4);
    }

    #[test]
    fn take_limits_counts() {
        let map = Beatmap {
            hit_objects: vec![circle(0.0, 0.0, 0.0), circle(50.0, 50.0, 500.0)],
            ..Default::default()
        };

        let (objects, attrs) = convert(&map, 1);

        assert_eq!(objects.len(), 2);
        assert_eq!(attrs.n_circles, 1);
    }

    #[test]
    fn vertical_reflection() {
        let mut h = OsuObject::new(
            &circle(10.0, 100.0, 0.0),
            &Beatmap::default(),
            &mut CurveBuffers::default(),
            &mut Vec::new(),
        );

        h.reflect_vertically();

        assert!((h.pos.y - 284.0).abs() < f32::EPSILON);
        assert!((h.pos.x - 10.0).abs() < f32::EPSILON);
    }
}
