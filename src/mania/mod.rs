use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, GameMode, IGameMode},
    },
};

pub use self::{
    attributes::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
    difficulty::gradual::ManiaGradualDifficulty,
    performance::{gradual::ManiaGradualPerformance, ManiaPerformance},
    score_state::ManiaScoreState,
    strains::ManiaStrains,
};

pub(crate) mod attributes;
pub(crate) mod convert;
pub(crate) mod difficulty;
pub(crate) mod object;
pub(crate) mod performance;
pub(crate) mod score_state;
pub(crate) mod strains;

/// Marker type for [`GameMode::Mania`].
pub struct Mania;

impl IGameMode for Mania {
    const MODE: GameMode = GameMode::Mania;

    type DifficultyAttributes = ManiaDifficultyAttributes;
    type Strains = ManiaStrains;
    type Performance<'map> = ManiaPerformance<'map>;
    type GradualDifficulty = ManiaGradualDifficulty;
    type GradualPerformance = ManiaGradualPerformance;

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
        ManiaPerformance::try_new(map)
    }

    fn gradual_difficulty(
        difficulty: Difficulty,
        map: &Beatmap,
    ) -> Result<Self::GradualDifficulty, CalculateError> {
        ManiaGradualDifficulty::new(difficulty, map)
    }

    fn gradual_performance(
        difficulty: Difficulty,
        map: &Beatmap,
    ) -> Result<Self::GradualPerformance, CalculateError> {
        ManiaGradualPerformance::new(difficulty, map)
    }
}
