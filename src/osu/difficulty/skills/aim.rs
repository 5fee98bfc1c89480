use std::f64::consts::FRAC_PI_2;

use crate::{
    any::difficulty::skills::{count_top_weighted_strains, strain_decay, StrainSkill},
    osu::difficulty::object::OsuDifficultyObject,
    util::{
        difficulty::{milliseconds_to_bpm, reverse_lerp, smootherstep, smoothstep},
        float_ext::FloatExt,
    },
};

use super::strain::{self, REDUCED_SECTION_COUNT};

const SKILL_MULTIPLIER: f64 = 25.6;
const STRAIN_DECAY_BASE: f64 = 0.15;

/// Skill representing the movement between objects.
#[derive(Clone, Debug)]
pub struct Aim {
    include_sliders: bool,
    curr_strain: f64,
    slider_strains: Vec<f64>,
    inner: StrainSkill,
}

impl Aim {
    pub fn new(include_sliders: bool) -> Self {
        Self {
            include_sliders,
            curr_strain: 0.0,
            slider_strains: Vec::new(),
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

        let strain = self.strain_value_at(curr, diff_objects);
        self.inner.record(strain);
    }

    fn strain_value_at(
        &mut self,
        curr: &OsuDifficultyObject,
        diff_objects: &[OsuDifficultyObject],
    ) -> f64 {
        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_strain +=
            AimEvaluator::evaluate_diff_of(curr, diff_objects, self.include_sliders)
                * SKILL_MULTIPLIER;

        if curr.base.is_slider() {
            self.slider_strains.push(self.curr_strain);
        }

        self.curr_strain
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

    /// Weighted amount of sliders whose strain is close to the highest
    /// slider strain.
    pub fn get_difficult_sliders(&self) -> f64 {
        let max_slider_strain = self
            .slider_strains
            .iter()
            .fold(0.0, |max, next| f64::max(max, *next));

        if max_slider_strain.eq(0.0) {
            return 0.0;
        }

        self.slider_strains
            .iter()
            .map(|strain| 1.0 / (1.0 + f64::exp(-(strain / max_slider_strain * 12.0 - 6.0))))
            .sum()
    }
}

pub(super) struct AimEvaluator;

/// Angle related bonuses of an object, before multipliers.
#[derive(Default)]
struct AngleBonus {
    wide: f64,
    acute: f64,
    wiggle: f64,
}

impl AimEvaluator {
    const WIDE_ANGLE_MULTIPLIER: f64 = 1.5;
    const ACUTE_ANGLE_MULTIPLIER: f64 = 2.6;
    const SLIDER_MULTIPLIER: f64 = 1.35;
    const VELOCITY_CHANGE_MULTIPLIER: f64 = 0.75;
    const WIGGLE_MULTIPLIER: f64 = 1.02;

    pub(super) const RADIUS: f64 = OsuDifficultyObject::NORMALIZED_RADIUS as f64;
    pub(super) const DIAMETER: f64 = OsuDifficultyObject::NORMALIZED_DIAMETER as f64;

    pub(super) fn evaluate_diff_of(
        curr: &OsuDifficultyObject,
        diff_objects: &[OsuDifficultyObject],
        with_sliders: bool,
    ) -> f64 {
        let Some((last_last, last)) = curr
            .previous(1, diff_objects)
            .zip(curr.previous(0, diff_objects))
            .filter(|(_, last)| !(curr.base.is_spinner() || last.base.is_spinner()))
        else {
            return 0.0;
        };

        let curr_vel = Self::velocity(last, curr, with_sliders);
        let prev_vel = Self::velocity(last_last, last, with_sliders);

        let same_rhythm = curr.strain_time.max(last.strain_time)
            < 1.25 * curr.strain_time.min(last.strain_time);

        let angles = match curr.angle.zip(last.angle) {
            Some((curr_angle, last_angle)) if same_rhythm => Self::angle_bonus(
                curr,
                last,
                curr_angle,
                last_angle,
                curr_vel.min(prev_vel),
            ),
            _ => AngleBonus::default(),
        };

        let vel_change_bonus = if prev_vel.max(curr_vel).not_eq(0.0) {
            Self::velocity_change_bonus(curr, last, last_last)
        } else {
            0.0
        };

        let mut strain = curr_vel + angles.wiggle * Self::WIGGLE_MULTIPLIER;

        strain += (angles.acute * Self::ACUTE_ANGLE_MULTIPLIER).max(
            angles.wide * Self::WIDE_ANGLE_MULTIPLIER
                + vel_change_bonus * Self::VELOCITY_CHANGE_MULTIPLIER,
        );

        if with_sliders && last.base.is_slider() {
            strain += last.travel_dist / last.travel_time * Self::SLIDER_MULTIPLIER;
        }

        strain
    }

    /// Velocity of the jump from `prev` onto `curr`.
    ///
    /// If `prev` is a slider, the movement through it counts too.
    fn velocity(prev: &OsuDifficultyObject, curr: &OsuDifficultyObject, with_sliders: bool) -> f64 {
        let jump_vel = curr.lazy_jump_dist / curr.strain_time;

        if with_sliders && prev.base.is_slider() {
            let travel_vel = prev.travel_dist / prev.travel_time;
            let movement_vel = curr.min_jump_dist / curr.min_jump_time;

            jump_vel.max(movement_vel + travel_vel)
        } else {
            jump_vel
        }
    }

    fn angle_bonus(
        curr: &OsuDifficultyObject,
        last: &OsuDifficultyObject,
        curr_angle: f64,
        last_angle: f64,
        base_vel: f64,
    ) -> AngleBonus {
        let wide = Self::wide_angle_bonus(curr_angle);
        let acute = Self::acute_angle_bonus(curr_angle);

        // Repeated angles are worth less
        let wide = wide * (1.0 - wide.min(Self::wide_angle_bonus(last_angle).powf(3.0)));
        let acute =
            acute * (0.08 + 0.92 * (1.0 - acute.min(Self::acute_angle_bonus(last_angle).powf(3.0))));

        let dist = curr.lazy_jump_dist;

        // Full wide bonus from one diameter onwards
        let wide = wide * base_vel * smootherstep(dist, 0.0, Self::DIAMETER);

        // Acute bonus needs 1/2 above 300 BPM and one diameter of spacing
        let acute = acute
            * base_vel
            * smootherstep(milliseconds_to_bpm(curr.strain_time, Some(2)), 300.0, 400.0)
            * smootherstep(dist, Self::DIAMETER, Self::DIAMETER * 2.0);

        let wiggle = base_vel
            * Self::wiggle_factor(dist, curr_angle)
            * Self::wiggle_factor(last.lazy_jump_dist, last_angle);

        AngleBonus {
            wide,
            acute,
            wiggle,
        }
    }

    /// Wiggles are jumps between one radius and three diameters with an
    /// angle below 110°.
    fn wiggle_factor(dist: f64, angle: f64) -> f64 {
        smootherstep(dist, Self::RADIUS, Self::DIAMETER)
            * reverse_lerp(dist, Self::DIAMETER * 3.0, Self::DIAMETER).powf(1.8)
            * smootherstep(angle, f64::to_radians(110.0), f64::to_radians(60.0))
    }

    fn velocity_change_bonus(
        curr: &OsuDifficultyObject,
        last: &OsuDifficultyObject,
        last_last: &OsuDifficultyObject,
    ) -> f64 {
        // Average velocities over the whole objects
        let prev_vel = (last.lazy_jump_dist + last_last.travel_dist) / last.strain_time;
        let curr_vel = (curr.lazy_jump_dist + last.travel_dist) / curr.strain_time;

        let vel_diff = (prev_vel - curr_vel).abs();
        let dist_ratio = (FRAC_PI_2 * vel_diff / prev_vel.max(curr_vel)).sin().powf(2.0);

        let min_time = curr.strain_time.min(last.strain_time);
        let max_time = curr.strain_time.max(last.strain_time);

        // Overlaps still count while the velocity changes
        let overlap_vel_buff = (Self::DIAMETER * 1.25 / min_time).min(vel_diff);

        // Rhythm changes are penalized
        overlap_vel_buff * dist_ratio * (min_time / max_time).powf(2.0)
    }

    fn wide_angle_bonus(angle: f64) -> f64 {
        smoothstep(angle, f64::to_radians(40.0), f64::to_radians(140.0))
    }

    fn acute_angle_bonus(angle: f64) -> f64 {
        smoothstep(angle, f64::to_radians(140.0), f64::to_radians(40.0))
    }
}
