use crate::{
    mania::convert::{pattern::Pattern, pattern_type::PatternType},
    model::{
        beatmap::Beatmap,
        hit_object::{HitObject, HitSoundType},
    },
    util::random::Random,
};

use super::PatternGenerator;

/// Turns a spinner or hold note into a single note.
pub struct EndTimeObjectPatternGenerator<'a> {
    end_time: f64,
    sample: HitSoundType,
    inner: PatternGenerator<'a>,
    convert_type: PatternType,
    prev_pattern: &'a Pattern,
}

impl<'a> EndTimeObjectPatternGenerator<'a> {
    pub fn new(
        random: &'a mut Random,
        hit_object: &'a HitObject,
        end_time: f64,
        sample: HitSoundType,
        total_columns: i32,
        prev_pattern: &'a Pattern,
        orig: &'a Beatmap,
    ) -> Self {
        let convert_type = if prev_pattern.column_with_objs() == total_columns {
            PatternType::default()
        } else {
            PatternType::FORCE_NOT_STACK
        };

        Self {
            end_time,
            sample,
            inner: PatternGenerator::new(hit_object, total_columns, random, orig),
            convert_type,
            prev_pattern,
        }
    }

    pub fn generate(&mut self) -> Pattern {
        let start_time = self.inner.hit_object.start_time;
        let duration = self.end_time - start_time;

        let column = match self.inner.total_columns {
            8 if self.sample.has_flag(HitSoundType::FINISH) && duration < 1000.0 => 0,
            8 => self.get_random_column(self.inner.random_start()),
            _ => self.get_random_column(0),
        };

        // Short objects become regular notes
        let end_time = if duration >= 100.0 {
            self.end_time
        } else {
            start_time
        };

        Pattern::single(column, self.inner.note(column, start_time, end_time))
    }

    fn get_random_column(&mut self, lower: i32) -> i32 {
        let column = self.inner.get_random_column(Some(lower), None);
        let upper = self.inner.total_columns;
        let prev_pattern = self.prev_pattern;

        if self.convert_type.contains(PatternType::FORCE_NOT_STACK) {
            self.inner
                .find_random_available_column(column, lower, upper, |column| {
                    !prev_pattern.column_has_obj(column)
                })
        } else {
            self.inner
                .find_random_available_column(column, lower, upper, |_| true)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::hit_object::{HitObjectKind, Pos, Spinner};

    use super::*;

    fn spinner(duration: f64) -> HitObject {
        HitObject {
            pos: Pos::new(256.0, 192.0),
            start_time: 2000.0,
            kind: HitObjectKind::Spinner(Spinner { duration }),
        }
    }

    fn generate(h: &HitObject, prev_pattern: &Pattern, total_columns: i32) -> Pattern {
        let map = Beatmap::default();
        let mut random = Random::new(1337);
        let end_time = h.end_time();

        EndTimeObjectPatternGenerator::new(
            &mut random,
            h,
            end_time,
            HitSoundType::default(),
            total_columns,
            prev_pattern,
            &map,
        )
        .generate()
    }

    #[test]
    fn long_spinner_becomes_hold() {
        let h = spinner(1500.0);
        let pattern = generate(&h, &Pattern::default(), 4);

        assert_eq!(pattern.hit_objects.len(), 1);
        assert!(pattern.hit_objects[0].is_hold_note());
        assert!((pattern.hit_objects[0].end_time() - 3500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn short_spinner_becomes_circle() {
        let h = spinner(50.0);
        let pattern = generate(&h, &Pattern::default(), 4);

        assert!(pattern.hit_objects[0].is_circle());
    }

    #[test]
    fn avoids_previous_columns() {
        let h = spinner(1500.0);
        let mut prev = Pattern::default();

        for column in 0..3 {
            prev.add(column, crate::mania::convert::pattern::note(column, 4, 0.0, 0.0));
        }

        let pattern = generate(&h, &prev, 4);

        assert!(pattern.column_has_obj(3));
    }
}
