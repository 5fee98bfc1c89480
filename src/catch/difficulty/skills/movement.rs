use crate::{
    any::difficulty::skills::{strain_decay, StrainSkill},
    catch::difficulty::object::CatchDifficultyObject,
    util::float_ext::FloatExt,
};

const ABSOLUTE_PLAYER_POSITIONING_ERROR: f32 = 16.0;
const NORMALIZED_HITOBJECT_RADIUS: f32 = CatchDifficultyObject::NORMALIZED_HITOBJECT_RADIUS;
const DIRECTION_CHANGE_BONUS: f64 = 21.0;

const SKILL_MULTIPLIER: f64 = 1.0;
const STRAIN_DECAY_BASE: f64 = 0.2;

const DECAY_WEIGHT: f64 = 0.94;
const SECTION_LEN: f64 = 750.0;

/// Skill representing how far and how fast the catcher has to move.
#[derive(Clone, Debug)]
pub struct Movement {
    half_catcher_width: f32,
    clock_rate: f64,
    last_player_pos: Option<f32>,
    last_dist_moved: f32,
    last_exact_dist_moved: f32,
    last_strain_time: f64,
    is_in_buzz_section: bool,
    curr_strain: f64,
    inner: StrainSkill,
}

impl Movement {
    pub const fn new(half_catcher_width: f32, clock_rate: f64) -> Self {
        Self {
            half_catcher_width,
            clock_rate,
            last_player_pos: None,
            last_dist_moved: 0.0,
            last_exact_dist_moved: 0.0,
            last_strain_time: 0.0,
            is_in_buzz_section: false,
            curr_strain: 0.0,
            inner: StrainSkill::new(SECTION_LEN),
        }
    }

    pub fn process(&mut self, curr: &CatchDifficultyObject, objects: &[CatchDifficultyObject]) {
        let prev_start_time = curr
            .idx
            .checked_sub(1)
            .and_then(|idx| objects.get(idx))
            .map_or(0.0, |prev| prev.start_time);

        let strain = self.curr_strain;

        self.inner.advance(curr.idx, curr.start_time, |time| {
            strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
        });

        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_strain += self.strain_value_of(curr) * SKILL_MULTIPLIER;

        self.inner.record(self.curr_strain);
    }

    pub fn into_curr_strain_peaks(self) -> Vec<f64> {
        self.inner.into_curr_strain_peaks()
    }

    pub fn difficulty_value(&self) -> f64 {
        StrainSkill::weighted_difficulty_value(self.inner.curr_strain_peaks(), DECAY_WEIGHT)
    }

    fn strain_value_of(&mut self, curr: &CatchDifficultyObject) -> f64 {
        let last_player_pos = self.last_player_pos.unwrap_or(curr.last_normalized_pos);

        let term = NORMALIZED_HITOBJECT_RADIUS - ABSOLUTE_PLAYER_POSITIONING_ERROR;
        let mut player_pos =
            last_player_pos.clamp(curr.normalized_pos - term, curr.normalized_pos + term);

        let dist_moved = player_pos - last_player_pos;

        let exact_dist_moved = curr.normalized_pos - last_player_pos;

        let weighted_strain_time = curr.strain_time + 13.0 + (3.0 / self.clock_rate);

        let mut dist_addition = f64::from(dist_moved.abs()).powf(1.3) / 510.0;
        let sqrt_strain = weighted_strain_time.sqrt();

        let mut edge_dash_bonus: f64 = 0.0;

        if dist_moved.abs() > 0.1 {
            if self.last_dist_moved.abs() > 0.1
                && dist_moved.signum().not_eq(self.last_dist_moved.signum())
            {
                let bonus_factor = f64::from(dist_moved.abs().min(50.0) / 50.0);
                let anti_flow_factor =
                    f64::from(self.last_dist_moved.abs().min(70.0) / 70.0).max(0.38);

                dist_addition += DIRECTION_CHANGE_BONUS / (self.last_strain_time + 16.0).sqrt()
                    * bonus_factor
                    * anti_flow_factor
                    * (1.0 - (weighted_strain_time / 1000.0).powf(3.0)).max(0.0);
            }

            dist_addition += 12.5
                * f64::from(dist_moved.abs().min(NORMALIZED_HITOBJECT_RADIUS * 2.0))
                / f64::from(NORMALIZED_HITOBJECT_RADIUS * 6.0)
                / sqrt_strain;
        }

        if curr.last_object.dist_to_hyper_dash <= 20.0 {
            if curr.last_object.hyper_dash {
                player_pos = curr.normalized_pos;
            } else {
                edge_dash_bonus += 5.7;
            }

            dist_addition *= 1.0
                + edge_dash_bonus
                    * f64::from((20.0 - curr.last_object.dist_to_hyper_dash) / 20.0)
                    * ((curr.strain_time * self.clock_rate).min(265.0) / 265.0).powf(1.5);
        }

        // Buzz sliders going back and forth only count their first movement
        if exact_dist_moved.abs() <= self.half_catcher_width * 2.0
            && exact_dist_moved.eq(-self.last_exact_dist_moved)
            && curr.strain_time.eq(self.last_strain_time)
        {
            if self.is_in_buzz_section {
                dist_addition = 0.0;
            } else {
                self.is_in_buzz_section = true;
            }
        } else {
            self.is_in_buzz_section = false;
        }

        self.last_player_pos = Some(player_pos);
        self.last_dist_moved = dist_moved;
        self.last_strain_time = curr.strain_time;
        self.last_exact_dist_moved = exact_dist_moved;

        dist_addition / weighted_strain_time
    }
}
