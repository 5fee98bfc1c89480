use crate::{
    any::difficulty::skills::{count_top_weighted_strains, strain_decay, StrainSkill},
    osu::difficulty::object::OsuDifficultyObject,
};

use super::{
    speed::{SpeedEvaluator, REDUCED_SECTION_COUNT},
    strain,
};

const SKILL_MULTIPLIER: f64 = 1.0;
const STRAIN_DECAY_BASE: f64 = 0.45;

/// Skill representing how long fast tapping has to be sustained.
///
/// Shares the per-object difficulty with [`Speed`](super::speed::Speed)
/// but keeps its strain for longer and ignores rhythm complexity.
#[derive(Clone, Debug)]
pub struct Stamina {
    curr_strain: f64,
    hit_window: f64,
    autopilot: bool,
    inner: StrainSkill,
}

impl Stamina {
    pub fn new(hit_window: f64, autopilot: bool) -> Self {
        Self {
            curr_strain: 0.0,
            hit_window,
            autopilot,
            inner: StrainSkill::default(),
        }
    }

    pub fn process(&mut self, curr: &OsuDifficultyObject, diff_objects: &[OsuDifficultyObject]) {
        let prev_start_time = curr
            .previous(0, diff_objects)
            .map_or(0.0, |prev| prev.start_time);

        let curr_strain = self.curr_strain;

        self.inner.advance(curr.idx, curr.start_time, |time| {
            curr_strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
        });

        self.curr_strain *= strain_decay(curr.strain_time, STRAIN_DECAY_BASE);
        self.curr_strain +=
            SpeedEvaluator::evaluate_diff_of(curr, diff_objects, self.hit_window, self.autopilot)
                * SKILL_MULTIPLIER;

        self.inner.record(self.curr_strain);
    }

    pub fn curr_strain_peaks(&self) -> Vec<f64> {
        self.inner.curr_strain_peaks()
    }

    pub fn difficulty_value(&self) -> f64 {
        strain::difficulty_value(self.inner.curr_strain_peaks(), REDUCED_SECTION_COUNT)
    }

    pub fn count_top_weighted_strains(&self, difficulty_value: f64) -> f64 {
        count_top_weighted_strains(&self.inner.object_strains, difficulty_value)
    }
}
