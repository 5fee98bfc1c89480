use crate::{
    any::difficulty::skills::{strain_decay, StrainSkill},
    taiko::difficulty::object::{TaikoDifficultyObject, TaikoDifficultyObjects},
    util::difficulty::logistic,
};

const SKILL_MULTIPLIER: f64 = 1.0;
const STRAIN_DECAY_BASE: f64 = 0.4;

/// Skill representing how hard it is to read notes at high scroll speeds.
#[derive(Clone, Debug, Default)]
pub struct Reading {
    // Decayed strain of the outer strain skill
    curr_decay_strain: f64,
    // Reading strain that fades within long mono streaks
    curr_strain: f64,
    inner: StrainSkill,
}

impl Reading {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, curr: &TaikoDifficultyObject, objects: &TaikoDifficultyObjects) {
        let prev_start_time = objects
            .previous(curr, 0)
            .map_or(0.0, |prev| prev.start_time);

        let strain = self.curr_decay_strain;

        self.inner.advance(curr.idx, curr.start_time, |time| {
            strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
        });

        self.curr_decay_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_decay_strain += self.strain_value_of(curr, objects) * SKILL_MULTIPLIER;

        self.inner.record(self.curr_decay_strain);
    }

    pub fn curr_strain_peaks(&self) -> Vec<f64> {
        self.inner.curr_strain_peaks()
    }

    pub fn into_curr_strain_peaks(self) -> Vec<f64> {
        self.inner.into_curr_strain_peaks()
    }

    fn strain_value_of(&mut self, curr: &TaikoDifficultyObject, objects: &TaikoDifficultyObjects) -> f64 {
        // Drumrolls and swells are exempt
        if !curr.base_hit_type.is_hit() {
            return 0.0;
        }

        let idx_in_mono_streak = curr
            .color
            .mono_streak
            .and_then(|mono| objects.color.mono_streaks.get(mono))
            .and_then(|mono| mono.hit_objects.binary_search(&curr.idx).ok())
            .unwrap_or(0) as f64;

        self.curr_strain *= logistic(idx_in_mono_streak, 4.0, -1.0 / 25.0, Some(0.5)) + 0.5;
        self.curr_strain *= STRAIN_DECAY_BASE;
        self.curr_strain += ReadingEvaluator::evaluate_diff_of(curr) * SKILL_MULTIPLIER;

        self.curr_strain
    }
}

struct ReadingEvaluator;

impl ReadingEvaluator {
    const HIGH_VELOCITY: VelocityRange = VelocityRange::new(480.0, 640.0);
    const MID_VELOCITY: VelocityRange = VelocityRange::new(360.0, 480.0);

    fn evaluate_diff_of(curr: &TaikoDifficultyObject) -> f64 {
        // Maps beyond the editor's limits would produce outliers
        let effective_bpm = f64::max(1.0, curr.effective_bpm);

        let mid_velocity_diff = 0.5
            * logistic(
                effective_bpm,
                Self::MID_VELOCITY.center(),
                1.0 / (Self::MID_VELOCITY.range() / 10.0),
                None,
            );

        // Delta time of equally spaced 1/4 notes at base scroll speed
        let expected_delta_time = 21_000.0 / effective_bpm;
        let object_density = expected_delta_time / f64::max(1.0, curr.delta_time);

        // Dense notes at high velocity are easier to read
        let density_penalty = logistic(object_density, 0.925, 15.0, None);

        let high_velocity_diff = (1.0 - 0.33 * density_penalty)
            * logistic(
                effective_bpm,
                Self::HIGH_VELOCITY.center() + 8.0 * density_penalty,
                (1.0 + 0.5 * density_penalty) / (Self::HIGH_VELOCITY.range() / 10.0),
                None,
            );

        mid_velocity_diff + high_velocity_diff
    }
}

struct VelocityRange {
    min: f64,
    max: f64,
}

impl VelocityRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    const fn center(&self) -> f64 {
        (self.max + self.min) / 2.0
    }

    const fn range(&self) -> f64 {
        self.max - self.min
    }
}
