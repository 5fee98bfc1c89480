use crate::{
    mania::{
        convert::{pattern::Pattern, pattern_type::PatternType, PrevValues},
        object::ManiaObject,
    },
    model::{
        beatmap::Beatmap,
        control_point::{EffectPoint, TimingPoint},
        hit_object::{HitObject, HitSoundType},
    },
    util::random::Random,
};

use super::PatternGenerator;

/// Turns a circle into a single row of notes.
pub struct HitObjectPatternGenerator<'a> {
    pub stair_type: PatternType,
    inner: PatternGenerator<'a>,
    sample: HitSoundType,
    convert_type: PatternType,
    prev_pattern: &'a Pattern,
}

impl<'a> HitObjectPatternGenerator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        random: &'a mut Random,
        hit_object: &'a HitObject,
        sample: HitSoundType,
        total_columns: i32,
        prev: &'a PrevValues,
        density: f64,
        orig: &'a Beatmap,
    ) -> Self {
        let beat_len = orig
            .timing_point_at(hit_object.start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let pos_separation = (hit_object.pos - prev.pos).length();
        let time_separation = hit_object.start_time - prev.time;

        let mut convert_type = PatternType::default();

        if time_separation <= 80.0 {
            // > 187 BPM
            convert_type |= PatternType::FORCE_NOT_STACK | PatternType::KEEP_SINGLE;
        } else if time_separation <= 95.0 {
            // > 157 BPM
            convert_type |= PatternType::FORCE_NOT_STACK | PatternType::KEEP_SINGLE | prev.stair;
        } else if time_separation <= 105.0 {
            // > 140 BPM
            convert_type |= PatternType::FORCE_NOT_STACK | PatternType::LOW_PROBABILITY;
        } else if time_separation <= 125.0 {
            // > 120 BPM
            convert_type |= PatternType::FORCE_NOT_STACK;
        } else if time_separation <= 135.0 && pos_separation < 20.0 {
            // > 111 BPM stream
            convert_type |= PatternType::CYCLE | PatternType::KEEP_SINGLE;
        } else if time_separation <= 150.0 && pos_separation < 20.0 {
            // > 100 BPM stream
            convert_type |= PatternType::FORCE_STACK | PatternType::LOW_PROBABILITY;
        } else if pos_separation < 20.0 && density >= beat_len / 2.5 {
            // Low density stream
            convert_type |= PatternType::REVERSE | PatternType::LOW_PROBABILITY;
        } else if density < beat_len / 2.5 {
            // High density
        } else {
            let kiai = orig
                .effect_point_at(hit_object.start_time)
                .map_or(EffectPoint::DEFAULT_KIAI, |point| point.kiai);

            if !kiai {
                convert_type |= PatternType::LOW_PROBABILITY;
            }
        }

        if !convert_type.contains(PatternType::KEEP_SINGLE) {
            if sample.has_flag(HitSoundType::FINISH) && total_columns != 8 {
                convert_type |= PatternType::MIRROR;
            } else if sample.has_flag(HitSoundType::CLAP) {
                convert_type |= PatternType::GATHERED;
            }
        }

        Self {
            stair_type: prev.stair,
            inner: PatternGenerator::new(hit_object, total_columns, random, orig),
            sample,
            convert_type,
            prev_pattern: &prev.pattern,
        }
    }

    pub fn generate(&mut self) -> Pattern {
        let pattern = self.generate_core();
        let total_columns = self.inner.total_columns;

        for h in pattern.hit_objects.iter() {
            let column = ManiaObject::column(h.pos.x, total_columns as f32) as i32;

            if self.convert_type.contains(PatternType::STAIR) && column == total_columns - 1 {
                self.stair_type = PatternType::REVERSE_STAIR;
            }

            if self.convert_type.contains(PatternType::REVERSE_STAIR)
                && column == self.inner.random_start()
            {
                self.stair_type = PatternType::STAIR;
            }
        }

        pattern
    }

    fn single(&self, column: i32) -> Pattern {
        Pattern::single(column, self.circle(column))
    }

    fn circle(&self, column: i32) -> HitObject {
        let start_time = self.inner.hit_object.start_time;

        self.inner.note(column, start_time, start_time)
    }

    fn generate_core(&mut self) -> Pattern {
        let total_columns = self.inner.total_columns;

        if total_columns == 1 {
            return self.single(0);
        }

        let prev_pattern = self.prev_pattern;
        let random_start = self.inner.random_start();

        let last_column = prev_pattern.hit_objects.last().map_or(0, |h| {
            ManiaObject::column(h.pos.x, total_columns as f32) as i32
        });

        if self.convert_type.contains(PatternType::REVERSE) && !prev_pattern.hit_objects.is_empty()
        {
            let mut pattern = Pattern::default();

            for i in random_start..total_columns {
                if prev_pattern.column_has_obj(i) {
                    let column = random_start + total_columns - i - 1;
                    pattern.add(column, self.circle(column));
                }
            }

            return pattern;
        }

        if self.convert_type.contains(PatternType::CYCLE)
            && prev_pattern.hit_objects.len() == 1
            // Keep the special key of 7K+1 light
            && (total_columns != 8 || last_column != 0)
            // Previous column must not be the centre one
            && (total_columns % 2 == 0 || last_column != total_columns / 2)
        {
            // Cycle backwards
            return self.single(random_start + total_columns - last_column - 1);
        }

        if self.convert_type.contains(PatternType::FORCE_STACK)
            && !prev_pattern.hit_objects.is_empty()
        {
            let mut pattern = Pattern::default();

            // Place on the previously filled columns
            for i in random_start..total_columns {
                if prev_pattern.column_has_obj(i) {
                    pattern.add(i, self.circle(i));
                }
            }

            return pattern;
        }

        if prev_pattern.hit_objects.len() == 1 {
            if self.convert_type.contains(PatternType::STAIR) {
                // Next column, wrapping around
                let mut target_column = last_column + 1;

                if target_column == total_columns {
                    target_column = random_start;
                }

                return self.single(target_column);
            }

            if self.convert_type.contains(PatternType::REVERSE_STAIR) {
                // Previous column, wrapping around
                let mut target_column = last_column - 1;

                if target_column == random_start - 1 {
                    target_column = total_columns - 1;
                }

                return self.single(target_column);
            }
        }

        if self.convert_type.contains(PatternType::KEEP_SINGLE) {
            return self.generate_random_notes(1);
        }

        let conversion_diff = self.inner.conversion_difficulty();
        let low_probability = self.convert_type.contains(PatternType::LOW_PROBABILITY);

        if self.convert_type.contains(PatternType::MIRROR) {
            if conversion_diff > 6.5 {
                self.generate_random_pattern_with_mirrored(0.12, 0.38, 0.12)
            } else if conversion_diff > 4.0 {
                self.generate_random_pattern_with_mirrored(0.12, 0.17, 0.0)
            } else {
                self.generate_random_pattern_with_mirrored(0.12, 0.0, 0.0)
            }
        } else if conversion_diff > 6.5 {
            if low_probability {
                self.generate_random_pattern(0.78, 0.42, 0.0, 0.0)
            } else {
                self.generate_random_pattern(1.0, 0.62, 0.0, 0.0)
            }
        } else if conversion_diff > 4.0 {
            if low_probability {
                self.generate_random_pattern(0.35, 0.08, 0.0, 0.0)
            } else {
                self.generate_random_pattern(0.52, 0.15, 0.0, 0.0)
            }
        } else if conversion_diff > 2.0 {
            if low_probability {
                self.generate_random_pattern(0.18, 0.0, 0.0, 0.0)
            } else {
                self.generate_random_pattern(0.45, 0.0, 0.0, 0.0)
            }
        } else {
            self.generate_random_pattern(0.0, 0.0, 0.0, 0.0)
        }
    }

    fn generate_random_notes(&mut self, mut note_count: i32) -> Pattern {
        let mut pattern = Pattern::default();

        let prev_pattern = self.prev_pattern;
        let allow_stacking = !self.convert_type.contains(PatternType::FORCE_NOT_STACK);
        let gathered = self.convert_type.contains(PatternType::GATHERED);
        let lower = self.inner.random_start();
        let upper = self.inner.total_columns;

        if !allow_stacking {
            note_count = note_count.min(upper - lower - prev_pattern.column_with_objs());
        }

        let mut next_column = self.inner.get_column(true);

        for _ in 0..note_count {
            let is_valid = |column: i32| {
                !pattern.column_has_obj(column)
                    && (allow_stacking || !prev_pattern.column_has_obj(column))
            };

            next_column = self.inner.find_available_column(
                next_column,
                lower,
                upper,
                is_valid,
                |gen, last| Self::next_column(gen, last, gathered),
            );

            pattern.add(next_column, self.circle(next_column));
        }

        pattern
    }

    fn next_column(gen: &mut PatternGenerator<'_>, last: i32, gathered: bool) -> i32 {
        if !gathered {
            return gen.get_random_column(None, None);
        }

        let next = last + 1;

        if next == gen.total_columns {
            gen.random_start()
        } else {
            next
        }
    }

    fn has_special_column(&self) -> bool {
        self.sample.has_flag(HitSoundType::CLAP) && self.sample.has_flag(HitSoundType::FINISH)
    }

    fn generate_random_pattern(&mut self, p2: f64, p3: f64, p4: f64, p5: f64) -> Pattern {
        let note_count = self.get_random_note_count(p2, p3, p4, p5);
        let mut pattern = self.generate_random_notes(note_count);

        if self.inner.random_start() > 0 && self.has_special_column() {
            pattern.add(0, self.circle(0));
        }

        pattern
    }

    fn get_random_note_count(&mut self, mut p2: f64, mut p3: f64, mut p4: f64, mut p5: f64) -> i32 {
        match self.inner.total_columns {
            2 => {
                p2 = 0.0;
                p3 = 0.0;
                p4 = 0.0;
                p5 = 0.0;
            }
            3 => {
                p2 = p2.min(0.1);
                p3 = 0.0;
                p4 = 0.0;
                p5 = 0.0;
            }
            4 => {
                p2 = p2.min(0.23);
                p3 = p3.min(0.04);
                p4 = 0.0;
                p5 = 0.0;
            }
            5 => {
                p3 = p3.min(0.15);
                p4 = p4.min(0.03);
                p5 = 0.0;
            }
            _ => {}
        }

        if self.sample.has_flag(HitSoundType::CLAP) {
            p2 = 1.0;
        }

        self.inner.get_random_note_count(p2, p3, p4, p5, 0.0)
    }

    fn generate_random_pattern_with_mirrored(
        &mut self,
        centre_probability: f64,
        p2: f64,
        p3: f64,
    ) -> Pattern {
        if self.convert_type.contains(PatternType::FORCE_NOT_STACK) {
            return self.generate_random_pattern(1.0 / 2.0 + p2 / 2.0, p2, (p2 + p3) / 2.0, p3);
        }

        let mut pattern = Pattern::default();

        let (note_count, add_to_centre) =
            self.get_random_note_count_mirrored(centre_probability, p2, p3);

        let total_columns = self.inner.total_columns;
        let random_start = self.inner.random_start();
        let column_limit = total_columns / 2;

        let mut next_column = self.inner.get_random_column(None, Some(column_limit));

        for _ in 0..note_count {
            next_column = self.inner.find_random_available_column(
                next_column,
                random_start,
                column_limit,
                |column| !pattern.column_has_obj(column),
            );

            pattern.add(next_column, self.circle(next_column));

            let mirrored = random_start + total_columns - next_column - 1;
            pattern.add(mirrored, self.circle(mirrored));
        }

        if add_to_centre {
            pattern.add(total_columns / 2, self.circle(total_columns / 2));
        }

        if random_start > 0 && self.has_special_column() {
            pattern.add(0, self.circle(0));
        }

        pattern
    }

    fn get_random_note_count_mirrored(
        &mut self,
        mut centre_probability: f64,
        mut p2: f64,
        mut p3: f64,
    ) -> (i32, bool) {
        match self.inner.total_columns {
            2 => {
                centre_probability = 0.0;
                p2 = 0.0;
                p3 = 0.0;
            }
            3 => {
                centre_probability = centre_probability.min(0.03);
                p2 = 0.0;
                p3 = 0.0;
            }
            4 => {
                centre_probability = 0.0;

                // Stable values are inverse probabilities so halving goes through 1 - x
                p2 = 1.0 - ((1.0 - p2) * 2.0).max(0.8);
                p3 = 0.0;
            }
            5 => {
                centre_probability = centre_probability.min(0.03);
                p3 = 0.0;
            }
            6 => {
                centre_probability = 0.0;
                p2 = 1.0 - ((1.0 - p2) * 2.0).max(0.05);
                p3 = 1.0 - ((1.0 - p3) * 2.0).max(0.85);
            }
            _ => {}
        }

        // Stable values may exceed 1
        p2 = p2.clamp(0.0, 1.0);
        p3 = p3.clamp(0.0, 1.0);

        let centre_val = self.inner.random.next_double();
        let note_count = self.inner.get_random_note_count(p2, p3, 0.0, 0.0, 0.0);

        let add_to_centre = self.inner.total_columns % 2 != 0
            && note_count != 3
            && centre_val > 1.0 - centre_probability;

        (note_count, add_to_centre)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        mania::convert::pattern::note,
        model::hit_object::{HitObjectKind, Pos},
    };

    use super::*;

    fn circle(x: f32, start_time: f64) -> HitObject {
        HitObject {
            pos: Pos::new(x, 192.0),
            start_time,
            kind: HitObjectKind::Circle,
        }
    }

    #[test]
    fn fast_notes_stay_single() {
        let map = Beatmap::default();
        let h = circle(300.0, 1050.0);
        let mut random = Random::new(7);

        let prev = PrevValues {
            time: 1000.0,
            pos: Pos::new(100.0, 192.0),
            pattern: Pattern::single(2, note(2, 7, 1000.0, 1000.0)),
            stair: PatternType::STAIR,
        };

        let sample = HitSoundType::default();
        let mut gen =
            HitObjectPatternGenerator::new(&mut random, &h, sample, 7, &prev, 100.0, &map);

        let pattern = gen.generate();

        assert_eq!(pattern.hit_objects.len(), 1);
        // Not stacked on the previous note
        assert!(!pattern.column_has_obj(2));
    }

    #[test]
    fn single_column() {
        let map = Beatmap::default();
        let h = circle(300.0, 1000.0);
        let mut random = Random::new(7);
        let prev = PrevValues::default();

        let sample = HitSoundType::default();
        let mut gen = HitObjectPatternGenerator::new(&mut random, &h, sample, 1, &prev, 0.0, &map);

        let pattern = gen.generate();

        assert_eq!(pattern.hit_objects.len(), 1);
        assert!(pattern.column_has_obj(0));
    }
}
