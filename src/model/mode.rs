pub use rosu_map::section::general::GameMode;

use crate::any::difficulty::Difficulty;

use super::beatmap::Beatmap;

/// A way to specify a gamemode at compile-time.
///
/// Implemented by the marker types [`Osu`], [`Taiko`], [`Catch`], and
/// [`Mania`].
///
/// [`Osu`]: crate::osu::Osu
/// [`Taiko`]: crate::taiko::Taiko
/// [`Catch`]: crate::catch::Catch
/// [`Mania`]: crate::mania::Mania
pub trait IGameMode: Sized {
    /// The mode's runtime counterpart.
    const MODE: GameMode;

    /// The resulting type of a difficulty calculation.
    type DifficultyAttributes;

    /// The resulting type of a strain calculation.
    type Strains;

    /// The type of a performance calculator.
    type Performance<'map>;

    /// The type of a gradual difficulty calculator.
    type GradualDifficulty;

    /// The type of a gradual performance calculator.
    type GradualPerformance;

    /// Perform a difficulty calculation for a map of this mode.
    fn difficulty(
        difficulty: &Difficulty,
        map: &Beatmap,
    ) -> Result<Self::DifficultyAttributes, CalculateError>;

    /// Perform a difficulty calculation for a map of this mode and return
    /// the strain peaks.
    fn strains(difficulty: &Difficulty, map: &Beatmap) -> Result<Self::Strains, CalculateError>;

    /// Create a performance calculator for a map of this mode.
    fn performance(map: &Beatmap) -> Result<Self::Performance<'_>, CalculateError>;

    /// Create a gradual difficulty calculator for a map of this mode.
    fn gradual_difficulty(
        difficulty: Difficulty,
        map: &Beatmap,
    ) -> Result<Self::GradualDifficulty, CalculateError>;

    /// Create a gradual performance calculator for a map of this mode.
    fn gradual_performance(
        difficulty: Difficulty,
        map: &Beatmap,
    ) -> Result<Self::GradualPerformance, CalculateError>;

    /// Fails if the map is not of this mode.
    fn check_mode(map: &Beatmap) -> Result<(), CalculateError> {
        if map.mode == Self::MODE {
            Ok(())
        } else {
            Err(CalculateError::ModeMismatch {
                expected: Self::MODE,
                actual: map.mode,
            })
        }
    }
}

/// Errors that can occur when converting a [`Beatmap`] to another mode.
///
/// [`Beatmap`]: crate::model::beatmap::Beatmap
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// Beatmaps can only be converted once.
    #[error("cannot convert already converted beatmap")]
    AlreadyConverted,
    /// Only osu!standard maps can be converted.
    #[error("cannot convert {from:?} to {to:?}")]
    Convert { from: GameMode, to: GameMode },
}

/// Errors of a calculation whose beatmap does not match the requested mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CalculateError {
    /// The beatmap is in a different mode than the one requested.
    ///
    /// Convert the map first via [`Beatmap::convert_mut`].
    ///
    /// [`Beatmap::convert_mut`]: crate::model::beatmap::Beatmap::convert_mut
    #[error("beatmap is in mode {actual:?} but {expected:?} was requested")]
    ModeMismatch { expected: GameMode, actual: GameMode },
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// The mode type used by [`rosu_mods`] for the given mode.
pub(crate) const fn to_mods_mode(mode: GameMode) -> rosu_mods::GameMode {
    match mode {
        GameMode::Osu => rosu_mods::GameMode::Osu,
        GameMode::Taiko => rosu_mods::GameMode::Taiko,
        GameMode::Catch => rosu_mods::GameMode::Catch,
        GameMode::Mania => rosu_mods::GameMode::Mania,
    }
}
