use crate::{
    any::difficulty::skills::{strain_decay, StrainSkill},
    osu::difficulty::object::OsuDifficultyObject,
};

use super::{
    aim::AimEvaluator,
    strain::{self, REDUCED_SECTION_COUNT},
};

const SKILL_MULTIPLIER: f64 = 25.6;
const STRAIN_DECAY_BASE: f64 = 0.15;

/// Circles with a larger radius need no extra precision.
const PRECISION_RADIUS: f64 = 40.0;

/// Skill representing the difficulty of hitting small circles while moving.
#[derive(Clone, Debug)]
pub struct Precision {
    radius_factor: f64,
    curr_strain: f64,
    inner: StrainSkill,
}

impl Precision {
    pub fn new(radius: f64) -> Self {
        Self {
            radius_factor: Self::radius_factor(radius),
            curr_strain: 0.0,
            inner: StrainSkill::default(),
        }
    }

    /// Grows quadratically as the circle shrinks below [`PRECISION_RADIUS`].
    fn radius_factor(radius: f64) -> f64 {
        if radius <= 0.0 {
            return 0.0;
        }

        ((PRECISION_RADIUS / radius).powf(2.0) - 1.0).max(0.0)
    }

    pub fn process(&mut self, curr: &OsuDifficultyObject, diff_objects: &[OsuDifficultyObject]) {
        let prev_start_time = curr
            .previous(0, diff_objects)
            .map_or(0.0, |prev| prev.start_time);

        let curr_strain = self.curr_strain;

        self.inner.advance(curr.idx, curr.start_time, |time| {
            curr_strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
        });

        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);

        if self.radius_factor > 0.0 {
            self.curr_strain += AimEvaluator::evaluate_diff_of(curr, diff_objects, false)
                * self.radius_factor
                * SKILL_MULTIPLIER;
        }

        self.inner.record(self.curr_strain);
    }

    pub fn curr_strain_peaks(&self) -> Vec<f64> {
        self.inner.curr_strain_peaks()
    }

    pub fn difficulty_value(&self) -> f64 {
        strain::difficulty_value(self.inner.curr_strain_peaks(), REDUCED_SECTION_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use crate::{osu::difficulty::scaling_factor::ScalingFactor, util::float_ext::FloatExt};

    use super::*;

    #[test]
    fn large_circles_need_no_precision() {
        assert!(Precision::radius_factor(ScalingFactor::new(2.0).radius).eq(0.0));
        assert!(Precision::radius_factor(PRECISION_RADIUS).eq(0.0));
        assert!(Precision::radius_factor(0.0).eq(0.0));
    }

    #[test]
    fn smaller_circles_need_more_precision() {
        let cs4 = Precision::radius_factor(ScalingFactor::new(4.0).radius);
        let cs7 = Precision::radius_factor(ScalingFactor::new(7.0).radius);

        assert!(cs4 > 0.0);
        assert!(cs7 > 2.0 * cs4, "{cs7} <= 2 * {cs4}");
        assert!(Precision::radius_factor(20.0).eq(3.0));
    }
}
