use std::f64::consts::PI;

use crate::{
    any::difficulty::skills::{strain_decay, StrainSkill},
    taiko::difficulty::{
        object::{TaikoDifficultyObject, TaikoDifficultyObjects},
        rhythm::RhythmGroups,
    },
    util::difficulty::{bell_curve, logistic},
};

use super::stamina::StaminaEvaluator;

const SKILL_MULTIPLIER: f64 = 1.0;
const STRAIN_DECAY_BASE: f64 = 0.4;

/// Skill representing how hard the rhythm changes of a map are.
#[derive(Clone, Debug)]
pub struct Rhythm {
    curr_strain: f64,
    great_hit_window: f64,
    inner: StrainSkill,
}

impl Rhythm {
    pub fn new(great_hit_window: f64) -> Self {
        Self {
            curr_strain: 0.0,
            great_hit_window,
            inner: StrainSkill::default(),
        }
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
        self.curr_strain += self.strain_value_of(curr, objects) * SKILL_MULTIPLIER;

        self.inner.record(self.curr_strain);
    }

    pub fn curr_strain_peaks(&self) -> Vec<f64> {
        self.inner.curr_strain_peaks()
    }

    pub fn into_curr_strain_peaks(self) -> Vec<f64> {
        self.inner.into_curr_strain_peaks()
    }

    fn strain_value_of(&self, curr: &TaikoDifficultyObject, objects: &TaikoDifficultyObjects) -> f64 {
        let difficulty =
            RhythmEvaluator::evaluate_diff_of(curr, &objects.rhythm, self.great_hit_window);

        // Long intervals between awkward rhythms are not that hard
        let stamina_difficulty = StaminaEvaluator::evaluate_diff_of(curr, objects) - 0.5;

        difficulty * logistic(stamina_difficulty, 1.0 / 15.0, 50.0, None)
    }
}

struct RhythmEvaluator;

impl RhythmEvaluator {
    fn evaluate_diff_of(curr: &TaikoDifficultyObject, groups: &RhythmGroups, hit_window: f64) -> f64 {
        let data = &curr.rhythm_data;

        let mut same_rhythm = 0.0;
        let mut same_pattern = 0.0;
        let mut interval_penalty = 0.0;

        // Each group counts once, at its first object
        if let Some(idx) = data.same_rhythm_grouped_hit_objects {
            let is_first = groups
                .same_rhythm
                .get(idx)
                .is_some_and(|group| group.first_hit_object() == Some(curr.idx));

            if is_first {
                same_rhythm += 10.0 * Self::evaluate_same_rhythm(groups, idx, hit_window);
                interval_penalty = Self::repeated_interval_penalty(groups, idx, hit_window);
            }
        }

        if let Some(pattern) = data
            .same_patterns_grouped_hit_objects
            .and_then(|idx| groups.same_patterns.get(idx))
        {
            if pattern.first_hit_object() == Some(curr.idx) {
                same_pattern += 1.15 * Self::ratio_difficulty(pattern.interval_ratio, 8);
            }
        }

        f64::max(same_rhythm, same_pattern) * interval_penalty
    }

    fn evaluate_same_rhythm(groups: &RhythmGroups, idx: usize, hit_window: f64) -> f64 {
        let Some(group) = groups.same_rhythm.get(idx) else {
            return 0.0;
        };

        let mut interval_diff = Self::ratio_difficulty(group.hit_object_interval_ratio, 8);

        let prev_interval = group
            .previous
            .and_then(|prev| groups.same_rhythm.get(prev))
            .and_then(|prev| prev.hit_object_interval);

        interval_diff *= Self::repeated_interval_penalty(groups, idx, hit_window);

        let n_objects = group.hit_objects.len();

        // Slower than what the previous interval suggests
        if let Some((prev_interval, duration)) = prev_interval
            .filter(|_| n_objects > 1)
            .zip(group.duration())
        {
            let expected_duration_from_prev = prev_interval * n_objects as f64;
            let duration_diff = duration - expected_duration_from_prev;

            if duration_diff > 0.0 {
                interval_diff *= logistic(duration_diff / hit_window, 0.7, 1.0, Some(1.0));
            }
        }

        // Patterns that fit within a single hit window
        if let Some(duration) = group.duration() {
            interval_diff *= logistic(duration / hit_window, 0.6, 1.0, Some(1.0));
        }

        interval_diff.powf(0.75)
    }

    fn repeated_interval_penalty(groups: &RhythmGroups, idx: usize, hit_window: f64) -> f64 {
        const THRESHOLD: f64 = 0.1;

        let Some(group) = groups.same_rhythm.get(idx) else {
            return 1.0;
        };

        let same_interval = |interval_count: usize| -> f64 {
            let intervals: Vec<f64> = groups
                .same_rhythm_history(idx)
                .take(interval_count)
                .filter_map(|group| group.hit_object_interval)
                .collect();

            // Not enough intervals to compare
            if intervals.len() < interval_count {
                return 1.0;
            }

            for (i, a) in intervals.iter().enumerate() {
                for b in intervals[i + 1..].iter() {
                    if f64::abs(1.0 - a / b) <= THRESHOLD {
                        return 0.8;
                    }
                }
            }

            1.0
        };

        let long_interval_penalty = same_interval(3);

        let short_interval_penalty = if group.hit_objects.len() < 6 {
            same_interval(4)
        } else {
            1.0
        };

        let duration_penalty = group.duration().map_or(0.5, |duration| {
            f64::max(1.0 - duration * 2.0 / hit_window, 0.5)
        });

        f64::min(long_interval_penalty, short_interval_penalty) * duration_penalty
    }

    fn ratio_difficulty(ratio: f64, terms: i32) -> f64 {
        // Maps beyond regular mapping conditions can produce odd ratios
        let ratio = if ratio.is_normal() { ratio } else { 0.0 };

        let mut difficulty: f64 = (1..=terms)
            .map(|i| Self::term_penalty(ratio, i, 4.0, 1.0))
            .sum();

        difficulty += f64::from(terms) / (1.0 + ratio);

        // Bonus for near-1 ratios but a penalty for ratios very close to 1
        difficulty += bell_curve(ratio, 1.0, 0.5, None);
        difficulty -= bell_curve(ratio, 1.0, 0.3, None);

        f64::max(difficulty, 0.0) / f64::sqrt(8.0)
    }

    fn term_penalty(ratio: f64, denominator: i32, power: f64, multiplier: f64) -> f64 {
        -multiplier * f64::powf(f64::cos(f64::from(denominator) * PI * ratio), power)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::beatmap::Beatmap,
        taiko::object::{HitType, TaikoObject},
    };

    use super::*;

    fn difficulty_of(start_times: &[f64]) -> f64 {
        let taiko_objects: Vec<_> = start_times
            .iter()
            .map(|&start_time| TaikoObject {
                start_time,
                hit_type: HitType::Center,
            })
            .collect();

        let objects = TaikoDifficultyObjects::new(&taiko_objects, &Beatmap::default(), 1.0);
        let mut rhythm = Rhythm::new(35.0);

        for curr in objects.objects.iter() {
            rhythm.process(curr, &objects);
        }

        StrainSkill::difficulty_value(rhythm.into_curr_strain_peaks())
    }

    #[test]
    fn ratio_difficulty_of_simple_ratios() {
        let even = RhythmEvaluator::ratio_difficulty(1.0, 8);
        let triplet = RhythmEvaluator::ratio_difficulty(2.0 / 3.0, 8);

        assert!(even < triplet);
        assert!(RhythmEvaluator::ratio_difficulty(f64::NAN, 8) > 0.0);
    }

    #[test]
    fn constant_rhythm_is_easy() {
        let constant: Vec<_> = (0..80).map(|i| f64::from(i) * 100.0).collect();

        let mut time = 0.0;
        let changing: Vec<_> = (0..80)
            .map(|i| {
                time += match i % 7 {
                    0 | 3 => 150.0,
                    5 => 75.0,
                    _ => 100.0,
                };

                time
            })
            .collect();

        assert!(difficulty_of(&constant) < difficulty_of(&changing));
    }
}
