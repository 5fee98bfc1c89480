use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, GameMode, IGameMode},
    },
};

pub use self::{
    attributes::{TaikoDifficultyAttributes, TaikoPerformanceAttributes},
    difficulty::gradual::TaikoGradualDifficulty,
    performance::{gradual::TaikoGradualPerformance, TaikoPerformance},
    score_state::TaikoScoreState,
    strains::TaikoStrains,
};

pub(crate) mod attributes;
pub(crate) mod convert;
pub(crate) mod difficulty;
pub(crate) mod object;
pub(crate) mod performance;
pub(crate) mod score_state;
pub(crate) mod strains;

/// Marker type for [`GameMode::Taiko`].
pub struct Taiko;

impl IGameMode for Taiko {
    const MODE: GameMode = GameMode::Taiko;

    type DifficultyAttributes = TaikoDifficultyAttributes;
    type Strains = TaikoStrains;
    type Performance<'map> = TaikoPerformance<'map>;
    type GradualDifficulty = TaikoGradualDifficulty;
    type GradualPerformance = TaikoGradualPerformance;

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
        TaikoPerformance::try_new(map)
    }

    fn gradual_difficulty(
        difficulty: Difficulty,
        map: &Beatmap,
    ) -> Result<Self::GradualDifficulty, CalculateError> {
        TaikoGradualDifficulty::new(difficulty, map)
    }

    fn gradual_performance(
        difficulty: Difficulty,
        map: &Beatmap,
    ) -> Result<Self::GradualPerformance, CalculateError> {
        TaikoGradualPerformance::new(difficulty, map)
    }
}
