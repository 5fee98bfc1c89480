use serde::Serialize;

use crate::{
    catch::{CatchDifficultyAttributes, CatchPerformanceAttributes},
    mania::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
    model::mode::GameMode,
    osu::{OsuDifficultyAttributes, OsuPerformanceAttributes},
    taiko::{TaikoDifficultyAttributes, TaikoPerformanceAttributes},
};

use super::performance::Performance;

/// The result of a difficulty calculation based on the mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DifficultyAttributes {
    /// osu!standard difficulty calculation result.
    Osu(OsuDifficultyAttributes),
    /// osu!taiko difficulty calculation result.
    Taiko(TaikoDifficultyAttributes),
    /// osu!catch difficulty calculation result.
    Catch(CatchDifficultyAttributes),
    /// osu!mania difficulty calculation result.
    Mania(ManiaDifficultyAttributes),
}

impl DifficultyAttributes {
    /// The star value.
    pub const fn stars(&self) -> f64 {
        match self {
            Self::Osu(attrs) => attrs.stars,
            Self::Taiko(attrs) => attrs.stars,
            Self::Catch(attrs) => attrs.stars,
            Self::Mania(attrs) => attrs.stars,
        }
    }

    /// The maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        match self {
            Self::Osu(attrs) => attrs.max_combo,
            Self::Taiko(attrs) => attrs.max_combo,
            Self::Catch(attrs) => attrs.max_combo(),
            Self::Mania(attrs) => attrs.max_combo,
        }
    }

    /// The mode of the attributes.
    pub const fn mode(&self) -> GameMode {
        match self {
            Self::Osu(_) => GameMode::Osu,
            Self::Taiko(_) => GameMode::Taiko,
            Self::Catch(_) => GameMode::Catch,
            Self::Mania(_) => GameMode::Mania,
        }
    }

    /// Start a performance calculation that re-uses these attributes.
    pub fn performance<'a>(self) -> Performance<'a> {
        self.into()
    }
}

/// The result of a performance calculation based on the mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PerformanceAttributes {
    /// osu!standard performance calculation result.
    Osu(OsuPerformanceAttributes),
    /// osu!taiko performance calculation result.
    Taiko(TaikoPerformanceAttributes),
    /// osu!catch performance calculation result.
    Catch(CatchPerformanceAttributes),
    /// osu!mania performance calculation result.
    Mania(ManiaPerformanceAttributes),
}

impl PerformanceAttributes {
    /// The pp value.
    pub const fn pp(&self) -> f64 {
        match self {
            Self::Osu(attrs) => attrs.pp,
            Self::Taiko(attrs) => attrs.pp,
            Self::Catch(attrs) => attrs.pp,
            Self::Mania(attrs) => attrs.pp,
        }
    }

    /// The star value.
    pub const fn stars(&self) -> f64 {
        match self {
            Self::Osu(attrs) => attrs.stars(),
            Self::Taiko(attrs) => attrs.stars(),
            Self::Catch(attrs) => attrs.stars(),
            Self::Mania(attrs) => attrs.stars(),
        }
    }

    /// Difficulty attributes that were used for the performance calculation.
    pub fn difficulty_attributes(&self) -> DifficultyAttributes {
        match self {
            Self::Osu(attrs) => DifficultyAttributes::Osu(attrs.difficulty.clone()),
            Self::Taiko(attrs) => DifficultyAttributes::Taiko(attrs.difficulty.clone()),
            Self::Catch(attrs) => DifficultyAttributes::Catch(attrs.difficulty.clone()),
            Self::Mania(attrs) => DifficultyAttributes::Mania(attrs.difficulty.clone()),
        }
    }

    /// The maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        match self {
            Self::Osu(attrs) => attrs.difficulty.max_combo,
            Self::Taiko(attrs) => attrs.difficulty.max_combo,
            Self::Catch(attrs) => attrs.difficulty.max_combo(),
            Self::Mania(attrs) => attrs.difficulty.max_combo,
        }
    }

    /// Start a performance calculation that re-uses these attributes.
    pub fn performance<'a>(self) -> Performance<'a> {
        self.into()
    }
}

impl From<PerformanceAttributes> for DifficultyAttributes {
    fn from(attrs: PerformanceAttributes) -> Self {
        match attrs {
            PerformanceAttributes::Osu(attrs) => Self::Osu(attrs.difficulty),
            PerformanceAttributes::Taiko(attrs) => Self::Taiko(attrs.difficulty),
            PerformanceAttributes::Catch(attrs) => Self::Catch(attrs.difficulty),
            PerformanceAttributes::Mania(attrs) => Self::Mania(attrs.difficulty),
        }
    }
}

macro_rules! from_mode_attrs {
    ( $mode:ident: $difficulty:ident, $performance:ident ) => {
        impl From<$difficulty> for DifficultyAttributes {
            fn from(attrs: $difficulty) -> Self {
                Self::$mode(attrs)
            }
        }

        impl From<$performance> for PerformanceAttributes {
            fn from(attrs: $performance) -> Self {
                Self::$mode(attrs)
            }
        }
    };
}

from_mode_attrs!(Osu: OsuDifficultyAttributes, OsuPerformanceAttributes);
from_mode_attrs!(Taiko: TaikoDifficultyAttributes, TaikoPerformanceAttributes);
from_mode_attrs!(Catch: CatchDifficultyAttributes, CatchPerformanceAttributes);
from_mode_attrs!(Mania: ManiaDifficultyAttributes, ManiaPerformanceAttributes);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_mode_tag() {
        let attrs = DifficultyAttributes::Mania(ManiaDifficultyAttributes::default());
        let json = serde_json::to_value(&attrs).unwrap();

        assert_eq!(json["mode"], "mania");
        assert_eq!(json["max_combo"], 0);
    }

    #[test]
    fn performance_keeps_difficulty() {
        let attrs = PerformanceAttributes::Taiko(TaikoPerformanceAttributes {
            pp: 123.0,
            ..Default::default()
        });

        assert_eq!(attrs.difficulty_attributes().mode(), GameMode::Taiko);
        assert_eq!(DifficultyAttributes::from(attrs.clone()), attrs.difficulty_attributes());
    }
}
