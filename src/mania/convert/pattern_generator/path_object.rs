use crate::{
    mania::{
        convert::{pattern::Pattern, pattern_type::PatternType},
        object::ManiaObject,
    },
    model::{
        beatmap::Beatmap,
        control_point::{DifficultyPoint, EffectPoint, TimingPoint},
        hit_object::{HitObject, HitSoundType},
    },
    util::{get_precision_adjusted_beat_len, random::Random},
};

use super::PatternGenerator;

/// Turns a slider into notes and hold notes along its spans.
pub struct PathObjectPatternGenerator<'a> {
    pub segment_duration: i32,
    inner: PatternGenerator<'a>,
    sample: HitSoundType,
    start_time: i32,
    end_time: i32,
    span_count: i32,
    prev_pattern: &'a Pattern,
    convert_type: PatternType,
    node_sounds: &'a [HitSoundType],
}

impl<'a> PathObjectPatternGenerator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        random: &'a mut Random,
        hit_object: &'a HitObject,
        sample: HitSoundType,
        total_columns: i32,
        prev_pattern: &'a Pattern,
        orig: &'a Beatmap,
        span_count: usize,
        dist: f64,
        node_sounds: &'a [HitSoundType],
    ) -> Self {
        let timing_beat_len = orig
            .timing_point_at(hit_object.start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let slider_velocity = orig
            .difficulty_point_at(hit_object.start_time)
            .map_or(DifficultyPoint::DEFAULT_SLIDER_VELOCITY, |point| {
                point.slider_velocity
            });

        let kiai = orig
            .effect_point_at(hit_object.start_time)
            .map_or(EffectPoint::DEFAULT_KIAI, |point| point.kiai);

        let convert_type = if kiai {
            PatternType::default()
        } else {
            PatternType::LOW_PROBABILITY
        };

        let beat_len = get_precision_adjusted_beat_len(slider_velocity, timing_beat_len);

        let span_count = i32::try_from(span_count).unwrap_or(i32::MAX);
        let start_time = hit_object.start_time.round_ties_even() as i32;

        // Same as stable
        let end_time = (f64::from(start_time)
            + dist * beat_len * f64::from(span_count) * 0.01 / orig.slider_multiplier)
            .floor() as i32;

        let segment_duration = (end_time - start_time) / span_count;

        Self {
            segment_duration,
            inner: PatternGenerator::new(hit_object, total_columns, random, orig),
            sample,
            start_time,
            end_time,
            span_count,
            prev_pattern,
            convert_type,
            node_sounds,
        }
    }

    /// The generated patterns.
    ///
    /// If more than one note is generated, the notes that end at the
    /// slider's end time form their own, second pattern.
    pub fn generate(&mut self) -> Vec<Pattern> {
        let orig_pattern = self.generate_core();

        if orig_pattern.hit_objects.len() == 1 {
            return vec![orig_pattern];
        }

        // Objects ending at the end time seed the next pattern
        let mut intermediate_pattern = Pattern::default();
        let mut end_time_pattern = Pattern::default();
        let total_columns = self.inner.total_columns as f32;

        for h in orig_pattern.hit_objects {
            let column = ManiaObject::column(h.pos.x, total_columns) as i32;

            if self.end_time == h.end_time().round_ties_even() as i32 {
                end_time_pattern.add(column, h);
            } else {
                intermediate_pattern.add(column, h);
            }
        }

        vec![intermediate_pattern, end_time_pattern]
    }

    fn note(&self, column: i32, start_time: i32, end_time: i32) -> HitObject {
        self.inner
            .note(column, f64::from(start_time), f64::from(end_time))
    }

    fn generate_core(&mut self) -> Pattern {
        let conversion_diff = self.inner.conversion_difficulty();
        let start_time = self.start_time;
        let total_columns = self.inner.total_columns;

        if total_columns == 1 {
            return Pattern::single(0, self.note(0, start_time, self.end_time));
        }

        let low_probability = self.convert_type.contains(PatternType::LOW_PROBABILITY);

        if self.span_count > 1 {
            if self.segment_duration <= 90 {
                return self.generate_random_hold_notes(start_time, 1);
            }

            if self.segment_duration <= 120 {
                self.convert_type |= PatternType::FORCE_NOT_STACK;

                return self.generate_random_notes(start_time, self.span_count + 1);
            }

            if self.segment_duration <= 160 {
                return self.generate_stair(start_time);
            }

            if self.segment_duration <= 200 && conversion_diff > 3.0 {
                return self.generate_random_multiple_notes(start_time);
            }

            if self.end_time - start_time >= 4000 {
                return self.generate_n_random_notes(start_time, 0.23, 0.0, 0.0);
            }

            if self.segment_duration > 400
                && self.span_count < total_columns - 1 - self.inner.random_start()
            {
                return self.generate_tiled_hold_notes(start_time);
            }

            return self.generate_hold_and_normal_notes(start_time, conversion_diff);
        }

        if self.segment_duration <= 110 {
            if self.prev_pattern.column_with_objs() < total_columns {
                self.convert_type |= PatternType::FORCE_NOT_STACK;
            } else {
                self.convert_type.remove(PatternType::FORCE_NOT_STACK);
            }

            let note_count = 1 + i32::from(self.segment_duration >= 80);

            return self.generate_random_notes(start_time, note_count);
        }

        let (p2, p3, p4) = if conversion_diff > 6.5 {
            if low_probability {
                (0.78, 0.3, 0.0)
            } else {
                (0.85, 0.36, 0.03)
            }
        } else if conversion_diff > 4.0 {
            if low_probability {
                (0.43, 0.08, 0.0)
            } else {
                (0.56, 0.18, 0.0)
            }
        } else if conversion_diff > 2.5 {
            if low_probability {
                (0.3, 0.0, 0.0)
            } else {
                (0.37, 0.08, 0.0)
            }
        } else if low_probability {
            (0.17, 0.0, 0.0)
        } else {
            (0.27, 0.0, 0.0)
        };

        self.generate_n_random_notes(start_time, p2, p3, p4)
    }

    /// Pick a column in `random_start..total_columns` that satisfies
    /// `is_valid`.
    fn find_available_column(&mut self, initial_column: i32, is_valid: impl Fn(i32) -> bool) -> i32 {
        let lower = self.inner.random_start();
        let upper = self.inner.total_columns;

        self.inner
            .find_random_available_column(initial_column, lower, upper, is_valid)
    }

    fn generate_random_hold_notes(&mut self, start_time: i32, note_count: i32) -> Pattern {
        let mut pattern = Pattern::default();

        let prev_pattern = self.prev_pattern;
        let usable_columns =
            self.inner.total_columns - self.inner.random_start() - prev_pattern.column_with_objs();
        let mut next_column = self.inner.get_random_column(None, None);

        for _ in 0..usable_columns.min(note_count) {
            // Free column
            next_column = self.find_available_column(next_column, |column| {
                !pattern.column_has_obj(column) && !prev_pattern.column_has_obj(column)
            });

            pattern.add(next_column, self.note(next_column, start_time, self.end_time));
        }

        // Separate loop to keep the RNG sequence
        for _ in 0..note_count - usable_columns {
            next_column =
                self.find_available_column(next_column, |column| !pattern.column_has_obj(column));

            pattern.add(next_column, self.note(next_column, start_time, self.end_time));
        }

        pattern
    }

    fn generate_random_notes(&mut self, mut start_time: i32, note_count: i32) -> Pattern {
        let prev_pattern = self.prev_pattern;
        let mut next_column = self.inner.get_column(true);

        if self.convert_type.contains(PatternType::FORCE_NOT_STACK)
            && prev_pattern.column_with_objs() < self.inner.total_columns
        {
            next_column =
                self.find_available_column(next_column, |column| !prev_pattern.column_has_obj(column));
        }

        let mut last_column = next_column;
        let mut pattern = Pattern::with_capacity(usize::try_from(note_count).unwrap_or(0));

        for _ in 0..note_count {
            pattern.add(next_column, self.note(next_column, start_time, start_time));

            next_column = self.find_available_column(next_column, |column| column != last_column);

            last_column = next_column;
            start_time += self.segment_duration;
        }

        pattern
    }

    fn generate_stair(&mut self, mut start_time: i32) -> Pattern {
        let mut column = self.inner.get_column(true);
        let mut increasing = self.inner.random.next_double() > 0.5;
        let mut pattern = Pattern::default();

        for _ in 0..=self.span_count {
            pattern.add(column, self.note(column, start_time, start_time));
            start_time += self.segment_duration;

            // Bounce off the stage borders
            if increasing {
                if column >= self.inner.total_columns - 1 {
                    increasing = false;
                    column -= 1;
                } else {
                    column += 1;
                }
            } else if column <= self.inner.random_start() {
                increasing = true;
                column += 1;
            } else {
                column -= 1;
            }
        }

        pattern
    }

    fn generate_random_multiple_notes(&mut self, mut start_time: i32) -> Pattern {
        let total_columns = self.inner.total_columns;
        let legacy = i32::from((4..=8).contains(&total_columns));
        let interval = self.inner.random.next_int_range(1, total_columns - legacy);

        let mut next_column = self.inner.get_column(true);
        let random_start = self.inner.random_start();
        let mut pattern = Pattern::default();

        for _ in 0..=self.span_count {
            pattern.add(next_column, self.note(next_column, start_time, start_time));

            next_column += interval;

            if next_column >= total_columns - random_start {
                next_column = next_column - total_columns - random_start + legacy;
            }

            next_column += random_start;

            // Few consecutive doubles in 2K
            if total_columns > 2 {
                pattern.add(next_column, self.note(next_column, start_time, start_time));
            }

            next_column = self.inner.get_random_column(None, None);
            start_time += self.segment_duration;
        }

        pattern
    }

    fn generate_n_random_notes(
        &mut self,
        start_time: i32,
        mut p2: f64,
        mut p3: f64,
        mut p4: f64,
    ) -> Pattern {
        match self.inner.total_columns {
            2 => {
                p2 = 0.0;
                p3 = 0.0;
                p4 = 0.0;
            }
            3 => {
                p2 = p2.min(0.1);
                p3 = 0.0;
                p4 = 0.0;
            }
            4 => {
                p2 = p2.min(0.3);
                p3 = p3.min(0.04);
                p4 = 0.0;
            }
            5 => {
                p2 = p2.min(0.34);
                p3 = p3.min(0.1);
                p4 = p4.min(0.03);
            }
            _ => {}
        }

        let is_double_sample =
            |sample: HitSoundType| sample.has_flag(HitSoundType::CLAP | HitSoundType::FINISH);

        let can_generate_two_notes = !self.convert_type.contains(PatternType::LOW_PROBABILITY)
            && (is_double_sample(self.sample)
                || is_double_sample(self.sample_info_at(self.start_time)));

        if can_generate_two_notes {
            p2 = 1.0;
        }

        let note_count = self.inner.get_random_note_count(p2, p3, p4, 0.0, 0.0);

        self.generate_random_hold_notes(start_time, note_count)
    }

    fn generate_tiled_hold_notes(&mut self, mut start_time: i32) -> Pattern {
        let prev_pattern = self.prev_pattern;
        let column_repeat = self.span_count.min(self.inner.total_columns);

        // Rounding may make this differ from the slider's end time
        let end_time = start_time + self.segment_duration * self.span_count;

        let mut next_column = self.inner.get_column(true);

        if self.convert_type.contains(PatternType::FORCE_NOT_STACK)
            && prev_pattern.column_with_objs() < self.inner.total_columns
        {
            next_column =
                self.find_available_column(next_column, |column| !prev_pattern.column_has_obj(column));
        }

        let mut pattern = Pattern::default();

        for _ in 0..column_repeat {
            next_column =
                self.find_available_column(next_column, |column| !pattern.column_has_obj(column));

            pattern.add(next_column, self.note(next_column, start_time, end_time));
            start_time += self.segment_duration;
        }

        pattern
    }

    fn generate_hold_and_normal_notes(&mut self, mut start_time: i32, conversion_diff: f64) -> Pattern {
        let prev_pattern = self.prev_pattern;
        let total_columns = self.inner.total_columns;
        let mut hold_column = self.inner.get_column(true);

        if self.convert_type.contains(PatternType::FORCE_NOT_STACK)
            && prev_pattern.column_with_objs() < total_columns
        {
            hold_column =
                self.find_available_column(hold_column, |column| !prev_pattern.column_has_obj(column));
        }

        let mut pattern = Pattern::single(hold_column, self.note(hold_column, start_time, self.end_time));

        let mut next_column = self.inner.get_random_column(None, None);

        let note_count = if conversion_diff > 6.5 {
            self.inner.get_random_note_count(0.63, 0.0, 0.0, 0.0, 0.0)
        } else if conversion_diff > 4.0 {
            let p2 = if total_columns < 6 { 0.12 } else { 0.45 };

            self.inner.get_random_note_count(p2, 0.0, 0.0, 0.0, 0.0)
        } else if conversion_diff > 2.5 {
            let p2 = if total_columns < 6 { 0.0 } else { 0.24 };

            self.inner.get_random_note_count(p2, 0.0, 0.0, 0.0, 0.0)
        } else {
            0
        };

        let note_count = note_count.min(total_columns - 1);

        let sample = self.sample_info_at(start_time);
        let ignore_head =
            !sample.has_flag(HitSoundType::WHISTLE | HitSoundType::FINISH | HitSoundType::CLAP);

        let mut row_pattern = Pattern::default();

        for _ in 0..=self.span_count {
            if !(ignore_head && start_time == self.start_time) {
                for _ in 0..note_count {
                    next_column = self.find_available_column(next_column, |column| {
                        column != hold_column && !row_pattern.column_has_obj(column)
                    });

                    row_pattern.add(next_column, self.note(next_column, start_time, start_time));
                }
            }

            pattern.append(&mut row_pattern);
            start_time += self.segment_duration;
        }

        pattern
    }

    /// The sound of the slider node at the given time.
    fn sample_info_at(&self, time: i32) -> HitSoundType {
        let idx = if self.segment_duration == 0 {
            0
        } else {
            (time - self.start_time) / self.segment_duration
        };

        usize::try_from(idx)
            .ok()
            .and_then(|idx| self.node_sounds.get(idx))
            .copied()
            .unwrap_or(self.sample)
    }
}
