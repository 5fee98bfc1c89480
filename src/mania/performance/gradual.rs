use crate::{
    any::difficulty::Difficulty,
    mania::{
        attributes::ManiaPerformanceAttributes, difficulty::gradual::ManiaGradualDifficulty,
        score_state::ManiaScoreState,
    },
    model::{beatmap::Beatmap, mode::CalculateError},
};

use super::ManiaPerformance;

/// Performance attributes of an osu!mania score that is still in progress.
///
/// Every call to [`next`] processes one more object and evaluates the given
/// [`ManiaScoreState`] against the map so far. [`nth`] skips ahead and
/// [`last`] jumps to the end. Use [`ManiaGradualDifficulty`] if only the
/// difficulty is of interest.
///
/// # Example
///
/// ```
/// use rosu_perf::{Beatmap, Difficulty};
/// use rosu_perf::mania::{ManiaGradualPerformance, ManiaScoreState};
///
/// let map = Beatmap::from_path("./resources/mania.osu").unwrap();
///
/// let difficulty = Difficulty::new().lazer(false);
/// let mut gradual = ManiaGradualPerformance::new(difficulty, &map).unwrap();
/// let mut state = ManiaScoreState::new();
///
/// // The first 10 notes are 320s
/// for _ in 0..10 {
///     state.n320 += 1;
///
///     let attrs = gradual.next(state).unwrap();
///     println!("PP: {}", attrs.pp);
/// }
///
/// // Then comes a miss.
/// state.misses += 1;
/// let attrs = gradual.next(state).unwrap();
/// println!("PP: {}", attrs.pp);
///
/// // Skip to the end
/// # /*
/// state.n320 = ...
/// ...
/// # */
/// let attrs = gradual.last(state).unwrap();
/// println!("PP: {}", attrs.pp);
/// ```
///
/// [`next`]: ManiaGradualPerformance::next
/// [`nth`]: ManiaGradualPerformance::nth
/// [`last`]: ManiaGradualPerformance::last
#[derive(Clone, Debug)]
pub struct ManiaGradualPerformance {
    difficulty: ManiaGradualDifficulty,
}

impl ManiaGradualPerformance {
    /// Fails if the map is neither an osu!mania map nor convertible to one.
    pub fn new(difficulty: Difficulty, map: &Beatmap) -> Result<Self, CalculateError> {
        let difficulty = ManiaGradualDifficulty::new(difficulty, map)?;

        Ok(Self { difficulty })
    }

    pub(crate) fn new_unchecked(difficulty: Difficulty, map: &Beatmap) -> Self {
        Self {
            difficulty: ManiaGradualDifficulty::new_unchecked(difficulty, map),
        }
    }

    /// Process one more object and evaluate `state`.
    pub fn next(&mut self, state: ManiaScoreState) -> Option<ManiaPerformanceAttributes> {
        self.nth(state, 0)
    }

    /// Process all remaining hit objects and calculate the final
    /// performance attributes.
    pub fn last(&mut self, state: ManiaScoreState) -> Option<ManiaPerformanceAttributes> {
        self.nth(state, usize::MAX)
    }

    /// Process `n + 1` more objects and evaluate `state`.
    ///
    /// Skipping past the end processes the remaining objects, if any.
    pub fn nth(&mut self, state: ManiaScoreState, n: usize) -> Option<ManiaPerformanceAttributes> {
        let attrs = self.difficulty.nth(n)?;

        let passed_objects = u32::try_from(self.difficulty.idx).unwrap_or(u32::MAX);

        let performance = ManiaPerformance::from(attrs)
            .difficulty(self.difficulty.difficulty.clone())
            .passed_objects(passed_objects)
            .state(state)
            .calculate();

        Some(performance)
    }

    /// Amount of objects left to process.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.difficulty.len()
    }
}
