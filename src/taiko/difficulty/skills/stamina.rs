use crate::{
    any::difficulty::skills::{strain_decay, StrainSkill},
    taiko::difficulty::object::{TaikoDifficultyObject, TaikoDifficultyObjects},
    util::difficulty::{logistic, reverse_lerp},
};

const SKILL_MULTIPLIER: f64 = 1.1;
const STRAIN_DECAY_BASE: f64 = 0.4;

/// Skill representing how fast notes have to be hit with the available
/// fingers.
///
/// The single color variant dampens notes deep within a mono streak which
/// is used to detect maps that are mostly one color.
#[derive(Clone, Debug)]
pub struct Stamina {
    curr_strain: f64,
    single_color: bool,
    is_convert: bool,
    inner: StrainSkill,
}

impl Stamina {
    pub fn new(single_color: bool, is_convert: bool) -> Self {
        Self {
            curr_strain: 0.0,
            single_color,
            is_convert,
            inner: StrainSkill::default(),
        }
    }

    pub fn process(&mut self, curr: &TaikoDifficultyObject, objects: &TaikoDifficultyObjects) {
        let prev_start_time = objects
            .previous(curr, 0)
            .map_or(0.0, |prev| prev.start_time);

        let strain = if self.single_color {
            0.0
        } else {
            self.curr_strain
        };

        self.inner.advance(curr.idx, curr.start_time, |time| {
            strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
        });

        let strain = self.strain_value_at(curr, objects);
        self.inner.record(strain);
    }

    fn strain_value_at(
        &mut self,
        curr: &TaikoDifficultyObject,
        objects: &TaikoDifficultyObjects,
    ) -> f64 {
        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);

        let mut stamina_difficulty =
            StaminaEvaluator::evaluate_diff_of(curr, objects) * SKILL_MULTIPLIER;

        let idx_in_mono_streak = curr
            .color
            .mono_streak
            .and_then(|mono| objects.color.mono_streaks.get(mono))
            .and_then(|mono| mono.hit_objects.binary_search(&curr.idx).ok())
            .unwrap_or(0) as f64;

        // Longer mono streaks within color patterns are harder
        if !self.single_color && !self.is_convert {
            stamina_difficulty *= 1.0 + 0.5 * reverse_lerp(idx_in_mono_streak, 5.0, 20.0);
        }

        self.curr_strain += stamina_difficulty;

        if self.single_color {
            logistic(-(idx_in_mono_streak - 10.0) / 2.0, 0.0, 1.0, Some(self.curr_strain))
        } else {
            self.curr_strain
        }
    }

    pub fn curr_strain_peaks(&self) -> Vec<f64> {
        self.inner.curr_strain_peaks()
    }

    pub fn into_curr_strain_peaks(self) -> Vec<f64> {
        self.inner.into_curr_strain_peaks()
    }

    pub fn object_strains(&self) -> &[f64] {
        &self.inner.object_strains
    }

    pub fn difficulty_value(&self) -> f64 {
        StrainSkill::difficulty_value(self.inner.curr_strain_peaks())
    }
}

pub(super) struct StaminaEvaluator;

impl StaminaEvaluator {
    fn speed_bonus(interval: f64) -> f64 {
        20.0 / interval.max(1.0)
    }

    fn available_fingers_for(curr: &TaikoDifficultyObject, objects: &TaikoDifficultyObjects) -> usize {
        let prev_color_change = curr.color.previous_color_change(objects);

        if prev_color_change.is_some_and(|change| curr.start_time - change.start_time < 300.0) {
            return 2;
        }

        let next_color_change = curr.color.next_color_change(objects);

        if next_color_change.is_some_and(|change| change.start_time - curr.start_time < 300.0) {
            return 2;
        }

        8
    }

    pub(super) fn evaluate_diff_of(
        curr: &TaikoDifficultyObject,
        objects: &TaikoDifficultyObjects,
    ) -> f64 {
        if !curr.base_hit_type.is_hit() {
            return 0.0;
        }

        // Base strain of every note
        let mut strain = 0.5;

        let Some(prev) = objects.previous(curr, 1) else {
            return strain;
        };

        // Previous object hit by the same finger
        let key_prev =
            objects.previous_mono(curr, Self::available_fingers_for(curr, objects) - 1);

        if let Some(key_prev) = key_prev {
            strain += Self::speed_bonus(curr.start_time - key_prev.start_time)
                + 0.5 * Self::speed_bonus(curr.start_time - prev.start_time);
        }

        strain
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::beatmap::Beatmap,
        taiko::object::{HitType, TaikoObject},
    };

    use super::*;

    fn diff_objects(hit_types: &str) -> TaikoDifficultyObjects {
        let taiko_objects: Vec<_> = hit_types
            .chars()
            .enumerate()
            .map(|(i, c)| TaikoObject {
                start_time: i as f64 * 80.0,
                hit_type: if c == 'k' { HitType::Rim } else { HitType::Center },
            })
            .collect();

        TaikoDifficultyObjects::new(&taiko_objects, &Beatmap::default(), 1.0)
    }

    fn process_all(objects: &TaikoDifficultyObjects, single_color: bool, is_convert: bool) -> Stamina {
        let mut stamina = Stamina::new(single_color, is_convert);

        for curr in objects.objects.iter() {
            stamina.process(curr, objects);
        }

        stamina
    }

    #[test]
    fn base_strain_without_predecessor() {
        let objects = diff_objects("dddddd");

        let first = StaminaEvaluator::evaluate_diff_of(&objects.objects[0], &objects);
        assert!((first - 0.5).abs() < 1e-12);

        // No color change so eight fingers are available and there is no
        // previous mono object that far back
        let third = StaminaEvaluator::evaluate_diff_of(&objects.objects[2], &objects);
        assert!((third - 0.5).abs() < 1e-12);
    }

    #[test]
    fn alternating_notes_use_two_fingers() {
        let objects = diff_objects("dkdkdkdk");
        let curr = &objects.objects[5];

        // Same finger as the second to last note of the same color
        let expected = 0.5 + 20.0 / 320.0 + 0.5 * 20.0 / 160.0;
        let actual = StaminaEvaluator::evaluate_diff_of(curr, &objects);

        assert!((actual - expected).abs() < 1e-12, "{actual}");
    }

    #[test]
    fn long_mono_streaks_dampen_single_color() {
        let objects = diff_objects(&"d".repeat(60));

        let stamina = process_all(&objects, false, false).difficulty_value();
        let single = process_all(&objects, true, false).difficulty_value();

        assert!(stamina > 0.0);
        assert!(single < stamina);
    }

    #[test]
    fn converts_skip_mono_length_bonus() {
        let objects = diff_objects(&"d".repeat(60));

        let native = process_all(&objects, false, false).difficulty_value();
        let convert = process_all(&objects, false, true).difficulty_value();

        assert!(convert < native);
    }

    #[test]
    fn non_hits_have_no_strain() {
        let taiko_objects: Vec<_> = (0..10)
            .map(|i| TaikoObject {
                start_time: f64::from(i) * 100.0,
                hit_type: HitType::NonHit,
            })
            .collect();

        let objects = TaikoDifficultyObjects::new(&taiko_objects, &Beatmap::default(), 1.0);
        let stamina = process_all(&objects, false, false);

        assert!(stamina.difficulty_value().abs() <= f64::EPSILON);
    }
}
