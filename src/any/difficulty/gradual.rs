use crate::{
    any::attributes::DifficultyAttributes,
    catch::CatchGradualDifficulty,
    mania::ManiaGradualDifficulty,
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, GameMode},
    },
    osu::OsuGradualDifficulty,
    taiko::TaikoGradualDifficulty,
};

use super::Difficulty;

/// Gradually calculate the difficulty attributes on maps of any mode.
///
/// Note that this type implements [`Iterator`]. On every call of
/// [`Iterator::next`], the next object will be processed and the
/// [`DifficultyAttributes`] will be updated and returned.
///
/// If you want to calculate performance attributes, use
/// [`GradualPerformance`] instead.
///
/// # Example
///
/// ```
/// use rosu_perf::{Beatmap, Difficulty, GradualDifficulty};
///
/// let map = Beatmap::from_path("./resources/osu.osu").unwrap();
///
/// let difficulty = Difficulty::new();
/// let mut iter = GradualDifficulty::new(difficulty, &map);
///
///  // the difficulty of the map after the first object
/// let attrs1 = iter.next();
/// // ... after the second object
/// let attrs2 = iter.next();
///
/// // Remaining objects
/// for difficulty in iter {
///     // ...
/// }
/// ```
///
/// [`GradualPerformance`]: crate::GradualPerformance
#[derive(Clone, Debug)]
// The osu variant is the most common one
#[allow(clippy::large_enum_variant)]
pub enum GradualDifficulty {
    Osu(OsuGradualDifficulty),
    Taiko(TaikoGradualDifficulty),
    Catch(CatchGradualDifficulty),
    Mania(ManiaGradualDifficulty),
}

impl GradualDifficulty {
    /// Create a [`GradualDifficulty`] for a map of any mode.
    pub fn new(difficulty: Difficulty, map: &Beatmap) -> Self {
        match map.mode {
            GameMode::Osu => Self::Osu(OsuGradualDifficulty::new_unchecked(difficulty, map)),
            GameMode::Taiko => Self::Taiko(TaikoGradualDifficulty::new_unchecked(difficulty, map)),
            GameMode::Catch => Self::Catch(CatchGradualDifficulty::new_unchecked(difficulty, map)),
            GameMode::Mania => Self::Mania(ManiaGradualDifficulty::new_unchecked(difficulty, map)),
        }
    }

    /// Create a [`GradualDifficulty`] for a [`Beatmap`] on a specific
    /// [`GameMode`].
    ///
    /// If the map is in a different mode, a converted copy is used instead.
    /// Fails if the map cannot be converted to `mode`.
    pub fn new_with_mode(
        difficulty: Difficulty,
        map: &Beatmap,
        mode: GameMode,
    ) -> Result<Self, CalculateError> {
        let map = map.convert_ref(mode, difficulty.get_mods())?;

        Ok(Self::new(difficulty, &map))
    }
}

impl Iterator for GradualDifficulty {
    type Item = DifficultyAttributes;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Osu(gradual) => gradual.next().map(DifficultyAttributes::Osu),
            Self::Taiko(gradual) => gradual.next().map(DifficultyAttributes::Taiko),
            Self::Catch(gradual) => gradual.next().map(DifficultyAttributes::Catch),
            Self::Mania(gradual) => gradual.next().map(DifficultyAttributes::Mania),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();

        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        match self {
            Self::Osu(gradual) => gradual.nth(n).map(DifficultyAttributes::Osu),
            Self::Taiko(gradual) => gradual.nth(n).map(DifficultyAttributes::Taiko),
            Self::Catch(gradual) => gradual.nth(n).map(DifficultyAttributes::Catch),
            Self::Mania(gradual) => gradual.nth(n).map(DifficultyAttributes::Mania),
        }
    }
}

impl ExactSizeIterator for GradualDifficulty {
    fn len(&self) -> usize {
        match self {
            Self::Osu(gradual) => gradual.len(),
            Self::Taiko(gradual) => gradual.len(),
            Self::Catch(gradual) => gradual.len(),
            Self::Mania(gradual) => gradual.len(),
        }
    }
}
