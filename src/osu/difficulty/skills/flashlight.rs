use crate::{
    any::difficulty::skills::{strain_decay, StrainSkill},
    osu::difficulty::object::{BaseKind, OsuDifficultyObject},
};

const SKILL_MULTIPLIER: f64 = 0.05512;
const STRAIN_DECAY_BASE: f64 = 0.15;

/// Skill representing how hard it is to memorize and read a map under
/// flashlight.
#[derive(Clone, Debug)]
pub struct Flashlight {
    curr_strain: f64,
    hidden: bool,
    inner: StrainSkill,
    evaluator: FlashlightEvaluator,
}

impl Flashlight {
    pub fn new(hidden: bool, radius: f64, time_preempt: f64, time_fade_in: f64) -> Self {
        let scaling_factor = 52.0 / radius;

        Self {
            curr_strain: 0.0,
            hidden,
            inner: StrainSkill::default(),
            evaluator: FlashlightEvaluator {
                scaling_factor,
                time_preempt,
                time_fade_in,
            },
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

        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_strain +=
            self.evaluator.evaluate_diff_of(curr, diff_objects, self.hidden) * SKILL_MULTIPLIER;

        self.inner.record(self.curr_strain);
    }

    pub fn curr_strain_peaks(&self) -> Vec<f64> {
        self.inner.curr_strain_peaks()
    }

    /// Flashlight sums up all of its section peaks without weighting.
    pub fn difficulty_value(&self) -> f64 {
        self.inner.curr_strain_peaks().into_iter().sum()
    }

    pub fn difficulty_to_performance(difficulty: f64) -> f64 {
        25.0 * difficulty.powf(2.0)
    }
}

#[derive(Clone, Debug)]
struct FlashlightEvaluator {
    scaling_factor: f64,
    time_preempt: f64,
    time_fade_in: f64,
}

/// Sums collected while looking back through recent objects.
#[derive(Default)]
struct History {
    value: f64,
    small_dist_nerf: f64,
    angle_repeats: f64,
}

impl FlashlightEvaluator {
    const MAX_OPACITY_BONUS: f64 = 0.4;
    const HIDDEN_BONUS: f64 = 0.2;

    const MIN_VELOCITY: f64 = 0.5;
    const SLIDER_MULTIPLIER: f64 = 1.3;

    const MIN_ANGLE_MULTIPLIER: f64 = 0.2;

    const HISTORY_LEN: usize = 10;

    fn evaluate_diff_of(
        &self,
        curr: &OsuDifficultyObject,
        diff_objects: &[OsuDifficultyObject],
        hidden: bool,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let history = self.history(curr, diff_objects, hidden);

        let mut value = (history.small_dist_nerf * history.value).powf(2.0);

        // No approach circles
        if hidden {
            value *= 1.0 + Self::HIDDEN_BONUS;
        }

        value *= Self::MIN_ANGLE_MULTIPLIER
            + (1.0 - Self::MIN_ANGLE_MULTIPLIER) / (history.angle_repeats + 1.0);

        value + self.slider_bonus(curr) * Self::SLIDER_MULTIPLIER
    }

    fn history(
        &self,
        curr: &OsuDifficultyObject,
        diff_objects: &[OsuDifficultyObject],
        hidden: bool,
    ) -> History {
        let mut history = History {
            small_dist_nerf: 1.0,
            ..History::default()
        };

        let mut cumulative_strain_time = 0.0;
        let mut next = curr;

        for i in 0..curr.idx.min(Self::HISTORY_LEN) {
            let Some(prev) = curr.previous(i, diff_objects) else {
                break;
            };

            if !prev.base.is_spinner() {
                let jump_dist =
                    f64::from((curr.base.stacked_pos - prev.base.stacked_end_pos).length());
                cumulative_strain_time += next.strain_time;

                // Objects within the flashlight radius are easy to see
                if i == 0 {
                    history.small_dist_nerf = (jump_dist / 75.0).min(1.0);
                }

                // Only the first object of a stack counts
                let stack_nerf = (prev.lazy_jump_dist / self.scaling_factor / 25.0).min(1.0);

                let opacity = curr.opacity_at(
                    prev.base.start_time,
                    hidden,
                    self.time_preempt,
                    self.time_fade_in,
                );
                let opacity_bonus = 1.0 + Self::MAX_OPACITY_BONUS * (1.0 - opacity);

                history.value += stack_nerf * opacity_bonus * self.scaling_factor * jump_dist
                    / cumulative_strain_time;

                let repeated_angle = prev
                    .angle
                    .zip(curr.angle)
                    .is_some_and(|(prev_angle, curr_angle)| (prev_angle - curr_angle).abs() < 0.02);

                if repeated_angle {
                    history.angle_repeats += (1.0 - 0.1 * i as f64).max(0.0);
                }
            }

            next = prev;
        }

        history
    }

    /// Fast and long sliders need memorization. Repeats make it easier.
    fn slider_bonus(&self, curr: &OsuDifficultyObject) -> f64 {
        let BaseKind::Slider {
            lazy_travel_dist,
            repeat_count,
        } = curr.base.kind
        else {
            return 0.0;
        };

        // Undo the circle size scaling
        let pixel_travel_dist = f64::from(lazy_travel_dist) / self.scaling_factor;

        let velocity = pixel_travel_dist / curr.travel_time;
        let bonus = (velocity - Self::MIN_VELOCITY).max(0.0).powf(0.5) * pixel_travel_dist;

        if repeat_count > 0 {
            bonus / (repeat_count + 1) as f64
        } else {
            bonus
        }
    }
}
