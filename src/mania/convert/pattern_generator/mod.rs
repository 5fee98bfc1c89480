use crate::{
    mania::{convert::pattern::note, object::ManiaObject},
    model::{beatmap::Beatmap, hit_object::HitObject},
    util::random::Random,
};

pub mod end_time_object;
pub mod hit_object;
pub mod path_object;

/// State that every pattern generator needs.
pub struct PatternGenerator<'a> {
    pub hit_object: &'a HitObject,
    pub total_columns: i32,
    pub random: &'a mut Random,
    original_map: &'a Beatmap,
}

impl<'a> PatternGenerator<'a> {
    pub fn new(
        hit_object: &'a HitObject,
        total_columns: i32,
        random: &'a mut Random,
        original_map: &'a Beatmap,
    ) -> Self {
        Self {
            hit_object,
            total_columns,
            random,
            original_map,
        }
    }

    /// The first column that random notes may be placed in. The special
    /// key of 8K maps is skipped.
    pub const fn random_start(&self) -> i32 {
        if self.total_columns == 8 {
            1
        } else {
            0
        }
    }

    pub fn get_column(&self, allow_special: bool) -> i32 {
        if allow_special && self.total_columns == 8 {
            const LOCAL_X_DIVISOR: f32 = 512.0 / 7.0;

            ((self.hit_object.pos.x / LOCAL_X_DIVISOR).floor() as i32).clamp(0, 6) + 1
        } else {
            ManiaObject::column(self.hit_object.pos.x, self.total_columns as f32) as i32
        }
    }

    /// Roll a note count between 1 and 6 where `pN` is the probability
    /// for at least `N` notes.
    pub fn get_random_note_count(&mut self, p2: f64, p3: f64, p4: f64, p5: f64, p6: f64) -> i32 {
        let val = self.random.next_double();

        if val >= 1.0 - p6 {
            6
        } else if val >= 1.0 - p5 {
            5
        } else if val >= 1.0 - p4 {
            4
        } else if val >= 1.0 - p3 {
            3
        } else if val >= 1.0 - p2 {
            2
        } else {
            1
        }
    }

    pub fn conversion_difficulty(&self) -> f64 {
        let orig = self.original_map;
        let last_obj_time = orig.hit_objects.last().map_or(0.0, |h| h.start_time);
        let first_obj_time = orig.hit_objects.first().map_or(0.0, |h| h.start_time);

        // Seconds
        let total_break_time = orig.total_break_time();
        let mut drain_time = ((last_obj_time - first_obj_time - total_break_time) / 1000.0) as i32;

        if drain_time == 0 {
            drain_time = 10_000;
        }

        let mut conversion_difficulty = 0.0;
        conversion_difficulty += f64::from(orig.hp + orig.ar.clamp(4.0, 7.0)) / 1.5;
        conversion_difficulty += orig.hit_objects.len() as f64 / f64::from(drain_time) * 9.0;
        conversion_difficulty /= 38.0;
        conversion_difficulty *= 5.0;
        conversion_difficulty /= 1.15;

        conversion_difficulty.min(12.0)
    }

    pub fn get_random_column(&mut self, lower: Option<i32>, upper: Option<i32>) -> i32 {
        let lower = lower.unwrap_or_else(|| self.random_start());
        let upper = upper.unwrap_or(self.total_columns);

        self.random.next_int_range(lower, upper)
    }

    /// A note of the current object's stage.
    pub fn note(&self, column: i32, start_time: f64, end_time: f64) -> HitObject {
        note(column, self.total_columns, start_time, end_time)
    }

    /// Starting at `initial_column`, search a column in `lower..upper`
    /// that satisfies `is_valid`. Candidates after the first are produced
    /// by `next_column`.
    ///
    /// If no column in the range is valid, `initial_column` is returned.
    pub fn find_available_column(
        &mut self,
        initial_column: i32,
        lower: i32,
        upper: i32,
        is_valid: impl Fn(i32) -> bool,
        mut next_column: impl FnMut(&mut Self, i32) -> i32,
    ) -> i32 {
        if is_valid(initial_column) {
            return initial_column;
        }

        // Avoid looping forever on a full stage
        if !(lower..upper).any(&is_valid) {
            return initial_column;
        }

        // Random search in the default case
        let mut column = initial_column;

        loop {
            column = next_column(self, column);

            if is_valid(column) {
                return column;
            }
        }
    }

    /// Same as [`PatternGenerator::find_available_column`] but candidates
    /// are picked randomly.
    pub fn find_random_available_column(
        &mut self,
        initial_column: i32,
        lower: i32,
        upper: i32,
        is_valid: impl Fn(i32) -> bool,
    ) -> i32 {
        self.find_available_column(initial_column, lower, upper, is_valid, |gen, _| {
            gen.get_random_column(Some(lower), Some(upper))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::model::hit_object::{HitObjectKind, Pos};

    use super::*;

    fn circle(x: f32) -> HitObject {
        HitObject {
            pos: Pos::new(x, 192.0),
            start_time: 0.0,
            kind: HitObjectKind::Circle,
        }
    }

    #[test]
    fn special_column_of_8k() {
        let map = Beatmap::default();
        let h = circle(0.0);
        let mut random = Random::new(0);

        let gen = PatternGenerator::new(&h, 8, &mut random, &map);
        assert_eq!(gen.random_start(), 1);
        assert_eq!(gen.get_column(true), 1);
        assert_eq!(gen.get_column(false), 0);
    }

    #[test]
    fn finds_free_column() {
        let map = Beatmap::default();
        let h = circle(0.0);
        let mut random = Random::new(42);

        let mut gen = PatternGenerator::new(&h, 4, &mut random, &map);
        let column = gen.find_random_available_column(0, 0, 4, |c| c == 2);
        assert_eq!(column, 2);

        // No valid column at all
        let column = gen.find_random_available_column(1, 0, 4, |_| false);
        assert_eq!(column, 1);
    }
}
