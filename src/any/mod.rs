pub use self::{
    attributes::{DifficultyAttributes, PerformanceAttributes},
    difficulty::{gradual::GradualDifficulty, Difficulty, ModsDependent},
    performance::{gradual::GradualPerformance, HitResultPriority, Performance},
    score_state::ScoreState,
    strains::Strains,
};

mod attributes;
pub(crate) mod difficulty;
pub(crate) mod performance;
mod score_state;
mod strains;
