use crate::osu::object::OsuObject;

use self::{
    aim::Aim,
    flashlight::Flashlight,
    movement::{Movement, MovementKind},
    precision::Precision,
    speed::Speed,
    stamina::Stamina,
};

use super::{object::OsuDifficultyObject, HD_FADE_IN_DURATION_MULTIPLIER};

pub mod aim;
pub mod flashlight;
pub mod movement;
pub mod precision;
pub mod speed;
pub mod stamina;
pub mod strain;

/// All skills of an osu!standard difficulty calculation.
#[derive(Clone, Debug)]
pub struct OsuSkills {
    pub aim: Aim,
    pub aim_no_sliders: Aim,
    pub speed: Speed,
    pub flashlight: Flashlight,
    pub jump_aim: Movement,
    pub flow_aim: Movement,
    pub precision: Precision,
    pub stamina: Stamina,
}

impl OsuSkills {
    pub fn new(
        great_hit_window: f64,
        radius: f64,
        time_preempt: f64,
        hidden: bool,
        autopilot: bool,
    ) -> Self {
        let hit_window = 2.0 * great_hit_window;

        // Preempt below 450ms only happens with AR above 10
        let time_fade_in = if hidden {
            time_preempt * HD_FADE_IN_DURATION_MULTIPLIER
        } else {
            400.0 * (time_preempt / OsuObject::PREEMPT_MIN).min(1.0)
        };

        Self {
            aim: Aim::new(true),
            aim_no_sliders: Aim::new(false),
            speed: Speed::new(hit_window, autopilot),
            flashlight: Flashlight::new(hidden, radius, time_preempt, time_fade_in),
            jump_aim: Movement::new(MovementKind::Jump),
            flow_aim: Movement::new(MovementKind::Flow),
            precision: Precision::new(radius),
            stamina: Stamina::new(hit_window, autopilot),
        }
    }

    pub fn process(&mut self, curr: &OsuDifficultyObject, diff_objects: &[OsuDifficultyObject]) {
        self.aim.process(curr, diff_objects);
        self.aim_no_sliders.process(curr, diff_objects);
        self.speed.process(curr, diff_objects);
        self.flashlight.process(curr, diff_objects);
        self.jump_aim.process(curr, diff_objects);
        self.flow_aim.process(curr, diff_objects);
        self.precision.process(curr, diff_objects);
        self.stamina.process(curr, diff_objects);
    }
}
