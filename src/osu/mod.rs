use rosu_map::util::Pos;

use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, GameMode, IGameMode},
    },
};

pub use self::{
    attributes::{OsuDifficultyAttributes, OsuPerformanceAttributes},
    difficulty::gradual::OsuGradualDifficulty,
    performance::{gradual::OsuGradualPerformance, OsuPerformance},
    score_state::{OsuScoreOrigin, OsuScoreState},
    strains::OsuStrains,
};

pub(crate) mod attributes;
pub(crate) mod convert;
pub(crate) mod difficulty;
pub(crate) mod object;
pub(crate) mod performance;
pub(crate) mod score_state;
pub(crate) mod strains;

const PLAYFIELD_BASE_SIZE: Pos = Pos::new(512.0, 384.0);

/// Marker type for [`GameMode::Osu`].
pub struct Osu;

impl IGameMode for Osu {
    const MODE: GameMode = GameMode::Osu;

    type DifficultyAttributes = OsuDifficultyAttributes;
    type Strains = OsuStrains;
    type Performance<'map> = OsuPerformance<'map>;
    type GradualDifficulty = OsuGradualDifficulty;
    type GradualPerformance = OsuGradualPerformance;

    fn difficulty(
        difficulty: &Difficulty,
        map: &Beatmap,
    ) -> Result<Self::DifficultyAttributes, CalculateError> {
        Self::check_mode(map)?;

        Ok(difficulty::difficulty(difficulty, map))
    }

    fn strains(difficulty: &Difficulty, map: &Beatmap) -> Result<Self::Strains, CalculateError> {
        Self::check_mode(map)?;

        Ok(difficulty::strains(difficulty, map))
    }

    fn performance(map: &Beatmap) -> Result<Self::Performance<'_>, CalculateError> {
        OsuPerformance::try_new(map)
    }

    fn gradual_difficulty(
        difficulty: Difficulty,
        map: &Beatmap,
    ) -> Result<Self::GradualDifficulty, CalculateError> {
        OsuGradualDifficulty::new(difficulty, map)
    }

    fn gradual_performance(
        difficulty: Difficulty,
        map: &Beatmap,
    ) -> Result<Self::GradualPerformance, CalculateError> {
        OsuGradualPerformance::new(difficulty, map)
    }
}
