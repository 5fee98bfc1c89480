use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, GameMode, IGameMode},
    },
};

pub use self::{
    attributes::{CatchDifficultyAttributes, CatchPerformanceAttributes},
    difficulty::gradual::CatchGradualDifficulty,
    performance::{gradual::CatchGradualPerformance, CatchPerformance},
    score_state::CatchScoreState,
    strains::CatchStrains,
};

pub(crate) mod attributes;
pub(crate) mod catcher;
pub(crate) mod convert;
pub(crate) mod difficulty;
pub(crate) mod object;
pub(crate) mod performance;
pub(crate) mod score_state;
pub(crate) mod strains;

const PLAYFIELD_WIDTH: f32 = 512.0;

/// Marker type for [`GameMode::Catch`].
pub struct Catch;

impl IGameMode for Catch {
    const MODE: GameMode = GameMode::Catch;

    type DifficultyAttributes = CatchDifficultyAttributes;
    type Strains = CatchStrains;
    type Performance<'map> = CatchPerformance<'map>;
    type GradualDifficulty = CatchGradualDifficulty;
    type GradualPerformance = CatchGradualPerformance;

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
        CatchPerformance::try_new(map)
    }

    fn gradual_difficulty(
        difficulty: Difficulty,
        map: &Beatmap,
    ) -> Result<Self::GradualDifficulty, CalculateError> {
        CatchGradualDifficulty::new(difficulty, map)
    }

    fn gradual_performance(
        difficulty: Difficulty,
        map: &Beatmap,
    ) -> Result<Self::GradualPerformance, CalculateError> {
        CatchGradualPerformance::new(difficulty, map)
    }
}
