use serde::Serialize;

use super::performance::TaikoPerformance;

/// The result of a difficulty calculation on an osu!taiko map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaikoDifficultyAttributes {
    /// The difficulty of the stamina skill.
    pub stamina: f64,
    /// The difficulty of the rhythm skill.
    pub rhythm: f64,
    /// The difficulty of the color skill.
    pub color: f64,
    /// The difficulty of the reading skill.
    pub reading: f64,
    /// Great hit window in milliseconds, adjusted by the clock rate.
    pub great_hit_window: f64,
    /// Ok hit window in milliseconds, adjusted by the clock rate.
    pub ok_hit_window: f64,
    /// Share of the stamina difficulty that comes from single-colored streams.
    pub mono_stamina_factor: f64,
    /// Final star rating.
    pub stars: f64,
    /// Maximum combo.
    pub max_combo: u32,
    /// Whether the map was converted from osu!standard.
    pub is_convert: bool,
}

impl TaikoDifficultyAttributes {
    /// Maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Whether the map was converted from osu!standard.
    pub const fn is_convert(&self) -> bool {
        self.is_convert
    }

    /// Start a performance calculation that re-uses these attributes.
    pub fn performance<'a>(self) -> TaikoPerformance<'a> {
        self.into()
    }
}

/// The result of a performance calculation on an osu!taiko map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaikoPerformanceAttributes {
    /// Difficulty attributes the calculation was based on.
    pub difficulty: TaikoDifficultyAttributes,
    /// Final pp.
    pub pp: f64,
    /// Accuracy part of the pp.
    pub pp_acc: f64,
    /// Strain part of the pp.
    pub pp_difficulty: f64,
    /// Scaled miss count based on total hits.
    pub effective_miss_count: f64,
    /// Upper bound on the player's tap deviation.
    pub estimated_unstable_rate: Option<f64>,
}

impl TaikoPerformanceAttributes {
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

    /// Whether the map was converted from osu!standard.
    pub const fn is_convert(&self) -> bool {
        self.difficulty.is_convert
    }

    /// Start a performance calculation that re-uses these attributes.
    pub fn performance<'a>(self) -> TaikoPerformance<'a> {
        self.difficulty.into()
    }
}

impl From<TaikoPerformanceAttributes> for TaikoDifficultyAttributes {
    fn from(attributes: TaikoPerformanceAttributes) -> Self {
        attributes.difficulty
    }
}
