use std::f64::consts::E;

use crate::{
    any::difficulty::skills::{strain_decay, StrainSkill},
    taiko::difficulty::{
        color::ColorData,
        object::{TaikoDifficultyObject, TaikoDifficultyObjects},
    },
    util::difficulty::logistic_exp,
};

const SKILL_MULTIPLIER: f64 = 0.12;
const STRAIN_DECAY_BASE: f64 = 0.8;

/// Skill representing how hard color changes are to read and hit.
#[derive(Clone, Debug, Default)]
pub struct Color {
    curr_strain: f64,
    inner: StrainSkill,
}

impl Color {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, curr: &TaikoDifficultyObject, objects: &TaikoDifficultyObjects) {
        let prev_start_time = objects
            .previous(curr, 0)
            .map_or(0.0, |prev| prev.start_time);

        let strain = self.curr_strain;

        self.inner.advance(curr.idx, curr.start_time, |time| {
            strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
        });

        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_strain += ColorEvaluator::evaluate_diff_of(curr, objects) * SKILL_MULTIPLIER;

        self.inner.record(self.curr_strain);
    }

    pub fn curr_strain_peaks(&self) -> Vec<f64> {
        self.inner.curr_strain_peaks()
    }

    pub fn into_curr_strain_peaks(self) -> Vec<f64> {
        self.inner.into_curr_strain_peaks()
    }
}

struct ColorEvaluator;

impl ColorEvaluator {
    // Sigmoid around the second element of a group
    fn group_position(idx: usize) -> f64 {
        logistic_exp(E * idx as f64 - 2.0 * E, None)
    }

    fn eval_mono_streak(data: &ColorData, mono: usize) -> f64 {
        let Some(mono) = data.mono_streaks.get(mono) else {
            return 0.0;
        };

        let parent_eval = Self::eval_alternating_mono_pattern(data, mono.parent);

        Self::group_position(mono.idx) * parent_eval * 0.5
    }

    fn eval_alternating_mono_pattern(data: &ColorData, pattern: usize) -> f64 {
        let Some(pattern) = data.alternating_mono_patterns.get(pattern) else {
            return 0.0;
        };

        let parent_eval = Self::eval_repeating_hit_patterns(data, pattern.parent);

        Self::group_position(pattern.idx) * parent_eval
    }

    fn eval_repeating_hit_patterns(data: &ColorData, repeating: usize) -> f64 {
        let Some(repeating) = data.repeating_hit_patterns.get(repeating) else {
            return 0.0;
        };

        2.0 * (1.0 - Self::group_position(repeating.repetition_interval))
    }

    /// Penalty for rhythm ratios that stay the same as two objects ago.
    fn consistent_ratio_penalty(curr: &TaikoDifficultyObject, objects: &TaikoDifficultyObjects) -> f64 {
        const THRESHOLD: f64 = 0.01;
        const MAX_OBJECTS_TO_CHECK: usize = 64;

        let mut consistent_ratio_count = 0;
        let mut total_ratio_count = 0.0;
        let mut curr = curr;

        for _ in 0..MAX_OBJECTS_TO_CHECK {
            let Some(prev) = objects.previous(curr, 1) else {
                break;
            };

            let curr_ratio = curr.rhythm_data.ratio;
            let prev_ratio = prev.rhythm_data.ratio;

            if f64::abs(1.0 - curr_ratio / prev_ratio) <= THRESHOLD {
                consistent_ratio_count += 1;
                total_ratio_count += curr_ratio;

                break;
            }

            curr = prev;
        }

        1.0 - total_ratio_count / f64::from(consistent_ratio_count + 1) * 0.8
    }

    fn evaluate_diff_of(curr: &TaikoDifficultyObject, objects: &TaikoDifficultyObjects) -> f64 {
        let data = &objects.color;
        let color = &curr.color;
        let mut difficulty = 0.0;

        // Each group counts once, at its first object
        if let Some(mono) = color.mono_streak {
            let first = data
                .mono_streaks
                .get(mono)
                .and_then(|mono| mono.first_hit_object());

            if first == Some(curr.idx) {
                difficulty += Self::eval_mono_streak(data, mono);
            }
        }

        if let Some(pattern) = color.alternating_mono_pattern {
            if data.pattern_first_hit_object(pattern) == Some(curr.idx) {
                difficulty += Self::eval_alternating_mono_pattern(data, pattern);
            }
        }

        if let Some(repeating) = color.repeating_hit_patterns {
            if data.repeating_first_hit_object(repeating) == Some(curr.idx) {
                difficulty += Self::eval_repeating_hit_patterns(data, repeating);
            }
        }

        difficulty * Self::consistent_ratio_penalty(curr, objects)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::beatmap::Beatmap,
        taiko::object::{HitType, TaikoObject},
    };

    use super::*;

    fn diff_objects(hit_types: &str, start_time: impl Fn(usize) -> f64) -> TaikoDifficultyObjects {
        let taiko_objects: Vec<_> = hit_types
            .chars()
            .enumerate()
            .map(|(i, c)| TaikoObject {
                start_time: start_time(i),
                hit_type: if c == 'k' { HitType::Rim } else { HitType::Center },
            })
            .collect();

        TaikoDifficultyObjects::new(&taiko_objects, &Beatmap::default(), 1.0)
    }

    fn difficulty_of(objects: &TaikoDifficultyObjects) -> f64 {
        let mut color = Color::new();

        for curr in objects.objects.iter() {
            color.process(curr, objects);
        }

        StrainSkill::difficulty_value(color.into_curr_strain_peaks())
    }

    #[test]
    fn group_position_is_centered() {
        assert!((ColorEvaluator::group_position(2) - 0.5).abs() < 1e-12);
        assert!(ColorEvaluator::group_position(0) > ColorEvaluator::group_position(5));
    }

    #[test]
    fn alternating_colors_are_harder() {
        let even = |i| i as f64 * 150.0;

        let mono = diff_objects(&"d".repeat(40), even);
        let alternating = diff_objects(&"ddkkdk".repeat(10), even);

        assert!(difficulty_of(&alternating) > difficulty_of(&mono));
    }

    #[test]
    fn consistent_ratios_are_penalized() {
        let objects = diff_objects(&"d".repeat(10), |i| i as f64 * 100.0);
        let curr = &objects.objects[5];

        // Ratio 1 two objects ago too
        let penalty = ColorEvaluator::consistent_ratio_penalty(curr, &objects);
        assert!((penalty - 0.6).abs() < 1e-12, "{penalty}");

        let first = &objects.objects[1];
        let penalty = ColorEvaluator::consistent_ratio_penalty(first, &objects);
        assert!((penalty - 1.0).abs() < 1e-12, "{penalty}");
    }
}
