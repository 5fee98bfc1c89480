use serde::Serialize;

use super::{object::ManiaObject, performance::ManiaPerformance};

/// The result of a difficulty calculation on an osu!mania map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ManiaDifficultyAttributes {
    /// Final star rating.
    pub stars: f64,
    /// The amount of notes and hold notes.
    pub n_objects: u32,
    /// The amount of hold notes.
    pub n_hold_notes: u32,
    /// The maximum achievable combo.
    ///
    /// Hold notes are worth an additional combo for every 100ms they last.
    pub max_combo: u32,
    /// Whether the map was converted from osu!standard.
    pub is_convert: bool,
}

impl ManiaDifficultyAttributes {
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub const fn n_objects(&self) -> u32 {
        self.n_objects
    }

    pub const fn is_convert(&self) -> bool {
        self.is_convert
    }

    /// Start a performance calculation that re-uses these attributes.
    pub fn performance<'a>(self) -> ManiaPerformance<'a> {
        self.into()
    }

    pub(crate) const fn add_object(&mut self, object: &ManiaObject) {
        self.n_objects += 1;

        if object.is_hold {
            self.n_hold_notes += 1;
        }

        self.max_combo += object.combo;
    }
}

/// The result of a performance calculation on an osu!mania map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ManiaPerformanceAttributes {
    /// The difficulty attributes that were used for the performance calculation.
    pub difficulty: ManiaDifficultyAttributes,
    /// Final pp.
    pub pp: f64,
    /// Strain part of the pp.
    pub pp_difficulty: f64,
}

impl ManiaPerformanceAttributes {
    /// Star rating of the map.
    pub const fn stars(&self) -> f64 {
        self.difficulty.stars
    }

    /// Final pp.
    pub const fn pp(&self) -> f64 {
        self.pp
    }

    pub const fn max_combo(&self) -> u32 {
        self.difficulty.max_combo
    }

    pub const fn n_objects(&self) -> u32 {
        self.difficulty.n_objects
    }

    /// Whether the map was converted from osu!standard.
    pub const fn is_convert(&self) -> bool {
        self.difficulty.is_convert
    }

    /// Start a performance calculation that re-uses these attributes.
    pub fn performance<'a>(self) -> ManiaPerformance<'a> {
        self.difficulty.into()
    }
}

impl From<ManiaPerformanceAttributes> for ManiaDifficultyAttributes {
    fn from(attributes: ManiaPerformanceAttributes) -> Self {
        attributes.difficulty
    }
}
