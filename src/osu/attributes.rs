use serde::Serialize;

use super::{
    object::{OsuObject, OsuObjectKind},
    performance::OsuPerformance,
};

/// The result of a difficulty calculation on an osu!standard map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OsuDifficultyAttributes {
    /// The difficulty of the aim skill.
    pub aim: f64,
    /// The difficulty of the jump aim skill.
    pub jump: f64,
    /// The difficulty of the flow aim skill.
    pub flow: f64,
    /// The difficulty of the precision skill.
    pub precision: f64,
    /// The difficulty of the speed skill.
    pub speed: f64,
    /// The difficulty of the stamina skill.
    pub stamina: f64,
    /// The difficulty of the accuracy skill.
    ///
    /// Accuracy pp of a perfect score on the circles, expressed on the same
    /// scale as the other skills.
    pub accuracy: f64,
    /// The difficulty of the flashlight skill.
    pub flashlight: f64,
    /// The ratio of the aim strain with and without considering sliders
    pub slider_factor: f64,
    /// The number of clickable objects weighted by difficulty.
    pub speed_note_count: f64,
    /// Weighted sum of aim strains of sliders.
    pub aim_difficult_slider_count: f64,
    /// Weighted sum of aim strains.
    pub aim_difficult_strain_count: f64,
    /// Weighted sum of jump aim strains.
    pub jump_aim_difficult_strain_count: f64,
    /// Weighted sum of flow aim strains.
    pub flow_aim_difficult_strain_count: f64,
    /// Weighted sum of speed strains.
    pub speed_difficult_strain_count: f64,
    /// Weighted sum of stamina strains.
    pub stamina_difficult_strain_count: f64,
    /// The approach rate.
    pub ar: f64,
    /// The great hit window in milliseconds, adjusted to the clock rate.
    pub great_hit_window: f64,
    /// The ok hit window in milliseconds, adjusted to the clock rate.
    pub ok_hit_window: f64,
    /// The meh hit window in milliseconds, adjusted to the clock rate.
    pub meh_hit_window: f64,
    /// The health drain rate.
    pub hp: f64,
    /// The amount of circles.
    pub n_circles: u32,
    /// The amount of sliders.
    pub n_sliders: u32,
    /// The amount of slider ticks and repeats.
    pub n_large_ticks: u32,
    /// The amount of spinners.
    pub n_spinners: u32,
    /// The final star rating
    pub stars: f64,
    /// Maximum combo.
    pub max_combo: u32,
}

impl OsuDifficultyAttributes {
    /// Maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Return the amount of hitobjects.
    pub const fn n_objects(&self) -> u32 {
        self.n_circles + self.n_sliders + self.n_spinners
    }

    /// The overall difficulty, derived from the great hit window.
    pub fn od(&self) -> f64 {
        (80.0 - self.great_hit_window) / 6.0
    }

    /// Start a performance calculation that re-uses these attributes.
    pub fn performance<'a>(self) -> OsuPerformance<'a> {
        self.into()
    }

    /// Count a processed object.
    pub(crate) fn add_object(&mut self, h: &OsuObject) {
        self.max_combo += 1;

        match h.kind {
            OsuObjectKind::Circle => self.n_circles += 1,
            OsuObjectKind::Slider(ref slider) => {
                self.n_sliders += 1;
                self.n_large_ticks += slider.large_tick_count() as u32;
                self.max_combo += slider.nested_objects.len() as u32;
            }
            OsuObjectKind::Spinner { .. } => self.n_spinners += 1,
        }
    }
}

/// The result of a performance calculation on an osu!standard map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OsuPerformanceAttributes {
    /// Difficulty attributes the calculation was based on.
    pub difficulty: OsuDifficultyAttributes,
    /// Final pp.
    pub pp: f64,
    /// Accuracy part of the pp.
    pub pp_acc: f64,
    /// The aim portion of the final pp.
    pub pp_aim: f64,
    /// pp of the jump aim rating. Not part of the final pp.
    pub pp_jump_aim: f64,
    /// pp of the flow aim rating. Not part of the final pp.
    pub pp_flow_aim: f64,
    /// pp of the precision rating. Not part of the final pp.
    pub pp_precision: f64,
    /// The flashlight portion of the final pp.
    pub pp_flashlight: f64,
    /// The speed portion of the final pp.
    pub pp_speed: f64,
    /// pp of the stamina rating. Not part of the final pp.
    pub pp_stamina: f64,
    /// Misses including an approximated amount of slider breaks
    pub effective_miss_count: f64,
    /// Approximated unstable-rate
    pub speed_deviation: Option<f64>,
}

impl OsuPerformanceAttributes {
    /// Star rating of the map.
    pub const fn stars(&self) -> f64 {
        self.difficulty.stars
    }

    /// Final pp.
    pub const fn pp(&self) -> f64 {
        self.pp
    }

    /// Maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        self.difficulty.max_combo
    }

    /// Return the amount of hitobjects.
    pub const fn n_objects(&self) -> u32 {
        self.difficulty.n_objects()
    }

    /// Start a performance calculation that re-uses these attributes.
    pub fn performance<'a>(self) -> OsuPerformance<'a> {
        self.difficulty.into()
    }
}

impl From<OsuPerformanceAttributes> for OsuDifficultyAttributes {
    fn from(attributes: OsuPerformanceAttributes) -> Self {
        attributes.difficulty
    }
}
