use rosu_map::util::Pos;

use crate::osu::object::{OsuObject, OsuObjectKind};

use super::{scaling_factor::ScalingFactor, HD_FADE_OUT_DURATION_MULTIPLIER};

/// Timing and movement data between an object and its predecessors.
///
/// Each object except the first one has a difficulty object. `idx` is the
/// position within the list of difficulty objects, not within the list of
/// hit objects.
#[derive(Clone, Debug)]
pub struct OsuDifficultyObject {
    pub idx: usize,
    pub base: BaseObject,
    pub start_time: f64,
    pub delta_time: f64,

    pub strain_time: f64,
    pub lazy_jump_dist: f64,
    pub min_jump_dist: f64,
    pub min_jump_time: f64,
    pub travel_dist: f64,
    pub travel_time: f64,
    pub angle: Option<f64>,
}

/// The parts of an [`OsuObject`] that skills still look at.
#[derive(Copy, Clone, Debug)]
pub struct BaseObject {
    pub start_time: f64,
    pub stacked_pos: Pos,
    pub stacked_end_pos: Pos,
    pub kind: BaseKind,
}

#[derive(Copy, Clone, Debug)]
pub enum BaseKind {
    Circle,
    Slider {
        lazy_travel_dist: f32,
        repeat_count: usize,
    },
    Spinner,
}

impl BaseObject {
    fn new(h: &OsuObject) -> Self {
        let kind = match h.kind {
            OsuObjectKind::Circle => BaseKind::Circle,
            OsuObjectKind::Slider(ref slider) => BaseKind::Slider {
                lazy_travel_dist: slider.lazy_travel_dist,
                repeat_count: slider.repeat_count(),
            },
            OsuObjectKind::Spinner { .. } => BaseKind::Spinner,
        };

        Self {
            start_time: h.start_time,
            stacked_pos: h.stacked_pos(),
            stacked_end_pos: h.stacked_end_pos(),
            kind,
        }
    }

    pub const fn is_slider(&self) -> bool {
        matches!(self.kind, BaseKind::Slider { .. })
    }

    pub const fn is_spinner(&self) -> bool {
        matches!(self.kind, BaseKind::Spinner)
    }
}

impl OsuDifficultyObject {
    pub const NORMALIZED_RADIUS: i32 = 50;
    pub const NORMALIZED_DIAMETER: i32 = Self::NORMALIZED_RADIUS * 2;

    pub const MIN_DELTA_TIME: f64 = 25.0;
    const MAX_SLIDER_RADIUS: f32 = Self::NORMALIZED_RADIUS as f32 * 2.4;
    const ASSUMED_SLIDER_RADIUS: f32 = Self::NORMALIZED_RADIUS as f32 * 1.8;

    pub fn new(
        hit_object: &OsuObject,
        last_object: &OsuObject,
        last_last_object: Option<&OsuObject>,
        clock_rate: f64,
        idx: usize,
        scaling_factor: &ScalingFactor,
    ) -> Self {
        let delta_time = (hit_object.start_time - last_object.start_time) / clock_rate;
        let start_time = hit_object.start_time / clock_rate;

        let strain_time = delta_time.max(Self::MIN_DELTA_TIME);

        let mut this = Self {
            idx,
            base: BaseObject::new(hit_object),
            start_time,
            delta_time,
            strain_time,
            lazy_jump_dist: 0.0,
            min_jump_dist: 0.0,
            min_jump_time: 0.0,
            travel_dist: 0.0,
            travel_time: 0.0,
            angle: None,
        };

        this.set_distances(
            hit_object,
            last_object,
            last_last_object,
            clock_rate,
            scaling_factor,
        );

        this
    }

    /// Create the difficulty objects of all given hit objects.
    ///
    /// Expects [`OsuDifficultyObject::compute_slider_cursor_pos`] to have been
    /// applied to each object.
    pub fn create_all(
        osu_objects: &[OsuObject],
        clock_rate: f64,
        scaling_factor: &ScalingFactor,
    ) -> Vec<Self> {
        osu_objects
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, h)| {
                let last = &osu_objects[i - 1];
                let last_last = i.checked_sub(2).map(|j| &osu_objects[j]);

                Self::new(h, last, last_last, clock_rate, i - 1, scaling_factor)
            })
            .collect()
    }

    pub fn previous<'a>(&self, backwards_idx: usize, diff_objects: &'a [Self]) -> Option<&'a Self> {
        self.idx
            .checked_sub(backwards_idx + 1)
            .and_then(|idx| diff_objects.get(idx))
    }

    pub fn next<'a>(&self, forwards_idx: usize, diff_objects: &'a [Self]) -> Option<&'a Self> {
        diff_objects.get(self.idx + (forwards_idx + 1))
    }

    pub fn opacity_at(&self, time: f64, hidden: bool, time_preempt: f64, time_fade_in: f64) -> f64 {
        // Invisible once its start time has passed
        if time > self.base.start_time {
            return 0.0;
        }

        let fade_in_start_time = self.base.start_time - time_preempt;
        let fade_in_duration = time_fade_in;

        if hidden {
            let fade_out_start_time = self.base.start_time - time_preempt + time_fade_in;
            let fade_out_duration = time_preempt * HD_FADE_OUT_DURATION_MULTIPLIER;

            (((time - fade_in_start_time) / fade_in_duration).clamp(0.0, 1.0))
                .min(1.0 - ((time - fade_out_start_time) / fade_out_duration).clamp(0.0, 1.0))
        } else {
            ((time - fade_in_start_time) / fade_in_duration).clamp(0.0, 1.0)
        }
    }

    pub fn get_doubletapness(&self, next: Option<&Self>, hit_window: f64) -> f64 {
        let Some(next) = next else { return 0.0 };

        let hit_window = if self.base.is_spinner() {
            0.0
        } else {
            hit_window
        };

        let curr_delta_time = self.delta_time.max(1.0);
        let next_delta_time = next.delta_time.max(1.0);
        let delta_diff = (next_delta_time - curr_delta_time).abs();
        let speed_ratio = curr_delta_time / curr_delta_time.max(delta_diff);
        let window_ratio = (curr_delta_time / hit_window).min(1.0).powf(2.0);

        1.0 - speed_ratio.powf(1.0 - window_ratio)
    }

    fn set_distances(
        &mut self,
        hit_object: &OsuObject,
        last_object: &OsuObject,
        last_last_object: Option<&OsuObject>,
        clock_rate: f64,
        scaling_factor: &ScalingFactor,
    ) {
        if let OsuObjectKind::Slider(ref slider) = hit_object.kind {
            self.travel_dist = f64::from(
                slider.lazy_travel_dist
                    * ((1.0 + slider.repeat_count() as f64 / 2.5).powf(1.0 / 2.5)) as f32,
            );

            self.travel_time =
                (hit_object.lazy_travel_time() / clock_rate).max(Self::MIN_DELTA_TIME);
        }

        if hit_object.is_spinner() || last_object.is_spinner() {
            return;
        }

        let scaling_factor = scaling_factor.factor;

        let last_cursor_pos = Self::get_end_cursor_pos(last_object);

        self.lazy_jump_dist = f64::from(
            (hit_object.stacked_pos() * scaling_factor - last_cursor_pos * scaling_factor)
                .length(),
        );
        self.min_jump_time = self.strain_time;
        self.min_jump_dist = self.lazy_jump_dist;

        if let OsuObjectKind::Slider(ref last_slider) = last_object.kind {
            let last_travel_time =
                (last_object.lazy_travel_time() / clock_rate).max(Self::MIN_DELTA_TIME);
            self.min_jump_time = (self.strain_time - last_travel_time).max(Self::MIN_DELTA_TIME);

            let tail_pos = last_slider.tail().map_or(last_object.pos, |tail| tail.pos);
            let stacked_tail_pos = tail_pos + last_object.stack_offset;

            let tail_jump_dist =
                (stacked_tail_pos - hit_object.stacked_pos()).length() * scaling_factor;

            let diff = f64::from(Self::MAX_SLIDER_RADIUS - Self::ASSUMED_SLIDER_RADIUS);

            let min = f64::from(tail_jump_dist - Self::MAX_SLIDER_RADIUS);
            self.min_jump_dist = ((self.lazy_jump_dist - diff).min(min)).max(0.0);
        }

        if let Some(last_last_object) = last_last_object.filter(|h| !h.is_spinner()) {
            let last_last_cursor_pos = Self::get_end_cursor_pos(last_last_object);

            let v1 = last_last_cursor_pos - last_object.stacked_pos();
            let v2 = hit_object.stacked_pos() - last_cursor_pos;

            let dot = v1.dot(v2);
            let det = v1.x * v2.y - v1.y * v2.x;

            self.angle = Some((f64::from(det).atan2(f64::from(dot))).abs());
        }
    }

    /// Follow the slider path with a lazy cursor to determine the slider's
    /// travel distance and the position at which the cursor leaves it.
    pub fn compute_slider_cursor_pos(h: &mut OsuObject, radius: f64) {
        let pos = h.pos;
        let stack_offset = h.stack_offset;

        let OsuObjectKind::Slider(ref mut slider) = h.kind else {
            return;
        };

        let mut curr_cursor_pos = pos + stack_offset;
        let scaling_factor = f64::from(Self::NORMALIZED_RADIUS) / radius;

        let n_nested = slider.nested_objects.len();

        for (i, curr_movement_obj) in slider.nested_objects.iter().enumerate() {
            let is_last = i + 1 == n_nested;

            let mut curr_movement = curr_movement_obj.pos + stack_offset - curr_cursor_pos;
            let mut curr_movement_len = scaling_factor * f64::from(curr_movement.length());
            let mut required_movement = f64::from(Self::ASSUMED_SLIDER_RADIUS);

            if is_last {
                let lazy_movement = slider.lazy_end_pos - curr_cursor_pos;

                if lazy_movement.length() < curr_movement.length() {
                    curr_movement = lazy_movement;
                }

                curr_movement_len = scaling_factor * f64::from(curr_movement.length());
            } else if curr_movement_obj.is_repeat() {
                required_movement = f64::from(Self::NORMALIZED_RADIUS);
            }

            if curr_movement_len > required_movement {
                curr_cursor_pos += curr_movement
                    * ((curr_movement_len - required_movement) / curr_movement_len) as f32;
                curr_movement_len *= (curr_movement_len - required_movement) / curr_movement_len;
                slider.lazy_travel_dist += curr_movement_len as f32;
            }

            if is_last {
                slider.lazy_end_pos = curr_cursor_pos;
            }
        }
    }

    fn get_end_cursor_pos(hit_object: &OsuObject) -> Pos {
        if let OsuObjectKind::Slider(ref slider) = hit_object.kind {
            slider.lazy_end_pos
        } else {
            hit_object.stacked_pos()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use rosu_map::section::hit_objects::CurveBuffers;

    use crate::model::{
        beatmap::Beatmap,
        hit_object::{HitObject, HitObjectKind},
    };

    use super::*;

    fn circle(x: f32, y: f32, start_time: f64) -> OsuObject {
        let h = HitObject {
            pos: Pos::new(x, y),
            start_time,
            kind: HitObjectKind::Circle,
        };

        OsuObject::new(
            &h,
            &Beatmap::default(),
            &mut CurveBuffers::default(),
            &mut Vec::new(),
        )
    }

    #[test]
    fn right_angle_and_distances() {
        let objects = [
            circle(0.0, 0.0, 0.0),
            circle(100.0, 0.0, 10.0),
            circle(100.0, 100.0, 300.0),
        ];

        let scaling_factor = ScalingFactor::new(4.0);
        let diff_objects = OsuDifficultyObject::create_all(&objects, 1.0, &scaling_factor);

        assert_eq!(diff_objects.len(), 2);

        let first = &diff_objects[0];
        assert!(first.angle.is_none());
        assert!((first.strain_time - OsuDifficultyObject::MIN_DELTA_TIME).abs() < f64::EPSILON);

        let second = &diff_objects[1];
        let angle = second.angle.unwrap();
        assert!((angle - FRAC_PI_2).abs() < 1e-6, "{angle}");
        assert!((second.delta_time - 290.0).abs() < f64::EPSILON);

        let expected_dist = 100.0 * f64::from(scaling_factor.factor);
        assert!((second.lazy_jump_dist - expected_dist).abs() < 1e-3);

        assert!(second.previous(0, &diff_objects).is_some());
        assert!(second.previous(1, &diff_objects).is_none());
        assert!(first.next(0, &diff_objects).is_some());
    }

    #[test]
    fn clock_rate_shrinks_times() {
        let objects = [circle(0.0, 0.0, 0.0), circle(100.0, 0.0, 300.0)];
        let diff_objects =
            OsuDifficultyObject::create_all(&objects, 1.5, &ScalingFactor::new(5.0));

        assert!((diff_objects[0].delta_time - 200.0).abs() < 1e-9);
        assert!((diff_objects[0].start_time - 200.0).abs() < 1e-9);
    }
}
