use rosu_map::{
    section::hit_objects::{CurveBuffers, SliderEvent, SliderEventType, SliderEventsIter},
    util::Pos,
};

use crate::model::{
    beatmap::Beatmap,
    control_point::{DifficultyPoint, TimingPoint},
    hit_object::{HitObject, HitObjectKind, HoldNote, Slider, Spinner},
};

use super::PLAYFIELD_BASE_SIZE;

/// A [`HitObject`] prepared for osu!standard calculations.
#[derive(Clone, Debug)]
pub struct OsuObject {
    pub pos: Pos,
    pub start_time: f64,
    pub stack_height: i32,
    pub stack_offset: Pos,
    pub kind: OsuObjectKind,
}

impl OsuObject {
    pub const OBJECT_RADIUS: f32 = 64.0;
    pub const PREEMPT_MIN: f64 = 450.0;

    const BASE_SCORING_DIST: f64 = 100.0;

    pub fn new(
        h: &HitObject,
        map: &Beatmap,
        curve_bufs: &mut CurveBuffers,
        ticks_buf: &mut Vec<SliderEvent>,
    ) -> Self {
        let kind = match h.kind {
            HitObjectKind::Circle => OsuObjectKind::Circle,
            HitObjectKind::Slider(ref slider) => {
                OsuObjectKind::Slider(OsuSlider::new(h, slider, map, curve_bufs, ticks_buf))
            }
            HitObjectKind::Spinner(Spinner { duration })
            | HitObjectKind::Hold(HoldNote { duration }) => OsuObjectKind::Spinner {
                end_time: h.start_time + duration,
            },
        };

        Self {
            pos: h.pos,
            start_time: h.start_time,
            stack_height: 0,
            stack_offset: Pos::default(),
            kind,
        }
    }

    /// Mirror the object along the horizontal axis i.e. flip y coordinates.
    pub fn reflect_vertically(&mut self) {
        self.reflect(|pos| pos.y = PLAYFIELD_BASE_SIZE.y - pos.y, |rel| rel.y = -rel.y);
    }

    /// Mirror the object along the vertical axis i.e. flip x coordinates.
    pub fn reflect_horizontally(&mut self) {
        self.reflect(|pos| pos.x = PLAYFIELD_BASE_SIZE.x - pos.x, |rel| rel.x = -rel.x);
    }

    // Positions of the tail and the lazy end are still relative to the head
    // at this point and are only mirrored, not moved.
    fn reflect(&mut self, absolute: impl Fn(&mut Pos), relative: impl Fn(&mut Pos)) {
        absolute(&mut self.pos);

        if let OsuObjectKind::Slider(ref mut slider) = self.kind {
            relative(&mut slider.lazy_end_pos);

            for nested in slider.nested_objects.iter_mut() {
                if nested.is_tail() {
                    relative(&mut nested.pos);
                } else {
                    absolute(&mut nested.pos);
                }
            }
        }
    }

    /// Turn the tail position into an absolute position.
    pub fn finalize_tail(&mut self) {
        let pos = self.pos;

        if let OsuObjectKind::Slider(ref mut slider) = self.kind {
            if let Some(tail) = slider.tail_mut() {
                tail.pos += pos;
            }
        }
    }

    pub const fn end_time(&self) -> f64 {
        match self.kind {
            OsuObjectKind::Circle => self.start_time,
            OsuObjectKind::Slider(ref slider) => slider.end_time,
            OsuObjectKind::Spinner { end_time } => end_time,
        }
    }

    pub fn stacked_pos(&self) -> Pos {
        self.pos + self.stack_offset
    }

    pub fn end_pos(&self) -> Pos {
        match self.kind {
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => self.pos,
            OsuObjectKind::Slider(ref slider) => slider.tail().map_or(self.pos, |tail| tail.pos),
        }
    }

    pub fn stacked_end_pos(&self) -> Pos {
        self.end_pos() + self.stack_offset
    }

    pub fn lazy_travel_time(&self) -> f64 {
        match self.kind {
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => 0.0,
            OsuObjectKind::Slider(ref slider) => slider.lazy_travel_time,
        }
    }

    pub const fn is_circle(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Circle)
    }

    pub const fn is_slider(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Slider(_))
    }

    pub const fn is_spinner(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Spinner { .. })
    }
}

#[derive(Clone, Debug)]
pub enum OsuObjectKind {
    Circle,
    Slider(OsuSlider),
    Spinner { end_time: f64 },
}

#[derive(Clone, Debug)]
pub struct OsuSlider {
    pub end_time: f64,
    pub lazy_end_pos: Pos,
    pub lazy_travel_dist: f32,
    pub lazy_travel_time: f64,
    /// Ticks, repeats, and the tail, sorted by time.
    pub nested_objects: Vec<NestedSliderObject>,
}

impl OsuSlider {
    fn new(
        h: &HitObject,
        slider: &Slider,
        map: &Beatmap,
        curve_bufs: &mut CurveBuffers,
        ticks_buf: &mut Vec<SliderEvent>,
    ) -> Self {
        let start_time = h.start_time;

        let beat_len = map
            .timing_point_at(start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let (slider_velocity, generate_ticks) = map.difficulty_point_at(start_time).map_or(
            (
                DifficultyPoint::DEFAULT_SLIDER_VELOCITY,
                DifficultyPoint::DEFAULT_GENERATE_TICKS,
            ),
            |point| (point.slider_velocity, point.generate_ticks),
        );

        let path = slider.curve(map.mode, curve_bufs);

        let span_count = slider.span_count() as f64;

        let scoring_dist = OsuObject::BASE_SCORING_DIST * map.slider_multiplier * slider_velocity;
        let velocity = scoring_dist / beat_len;

        let end_time = start_time + span_count * path.dist() / velocity;
        let span_duration = (end_time - start_time) / span_count;

        // Old maps scale their tick distance with the slider velocity
        let tick_dist_multiplier = if map.version < 8 {
            slider_velocity.recip()
        } else {
            1.0
        };

        let tick_dist = if generate_ticks {
            scoring_dist / map.slider_tick_rate * tick_dist_multiplier
        } else {
            f64::INFINITY
        };

        let events = SliderEventsIter::new(
            start_time,
            span_duration,
            velocity,
            tick_dist,
            path.dist(),
            slider.span_count() as i32,
            ticks_buf,
        );

        let span_at = |progress: f64| (progress * span_count) as i32;

        let obj_progress_at = |progress: f64| {
            let p = progress * span_count % 1.0;

            if span_at(progress) % 2 == 1 {
                1.0 - p
            } else {
                p
            }
        };

        let end_path_pos = path.position_at(obj_progress_at(1.0));

        let mut nested_objects: Vec<_> = events
            .filter_map(|e| {
                let obj = match e.kind {
                    SliderEventType::Tick => NestedSliderObject {
                        pos: h.pos + path.position_at(e.path_progress),
                        start_time: e.time,
                        kind: NestedSliderObjectKind::Tick,
                    },
                    SliderEventType::Repeat => NestedSliderObject {
                        pos: h.pos + path.position_at(e.path_progress),
                        start_time: start_time + f64::from(e.span_idx + 1) * span_duration,
                        kind: NestedSliderObjectKind::Repeat,
                    },
                    // Relative to the head until `OsuObject::finalize_tail`
                    SliderEventType::LastTick => NestedSliderObject {
                        pos: end_path_pos,
                        start_time: e.time,
                        kind: NestedSliderObjectKind::Tail,
                    },
                    SliderEventType::Head | SliderEventType::Tail => return None,
                };

                Some(obj)
            })
            .collect();

        // Stable sort so that equal times keep their event order
        nested_objects.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let lazy_travel_time = nested_objects
            .last()
            .map_or(0.0, |nested| nested.start_time - start_time);

        let mut end_time_min = lazy_travel_time / span_duration;

        if end_time_min % 2.0 >= 1.0 {
            end_time_min = 1.0 - end_time_min % 1.0;
        } else {
            end_time_min %= 1.0;
        }

        let lazy_end_pos = path.position_at(end_time_min);

        Self {
            end_time,
            lazy_end_pos,
            lazy_travel_dist: 0.0,
            lazy_travel_time,
            nested_objects,
        }
    }

    pub fn repeat_count(&self) -> usize {
        self.nested_objects
            .iter()
            .filter(|nested| nested.is_repeat())
            .count()
    }

    /// Ticks and repeats, i.e. all nested objects except the tail.
    pub fn large_tick_count(&self) -> usize {
        self.nested_objects
            .iter()
            .filter(|nested| !nested.is_tail())
            .count()
    }

    // The tail is not necessarily the last nested object, e.g. on very short
    // and fast buzz sliders.
    pub fn tail(&self) -> Option<&NestedSliderObject> {
        self.nested_objects.iter().rfind(|nested| nested.is_tail())
    }

    fn tail_mut(&mut self) -> Option<&mut NestedSliderObject> {
        self.nested_objects
            .iter_mut()
            .rfind(|nested| nested.is_tail())
    }
}

#[derive(Clone, Debug)]
pub struct NestedSliderObject {
    pub pos: Pos,
    pub start_time: f64,
    pub kind: NestedSliderObjectKind,
}

impl NestedSliderObject {
    pub const fn is_repeat(&self) -> bool {
        matches!(self.kind, NestedSliderObjectKind::Repeat)
    }

    pub const fn is_tail(&self) -> bool {
        matches!(self.kind, NestedSliderObjectKind::Tail)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NestedSliderObjectKind {
    Repeat,
    Tail,
    Tick,
}
