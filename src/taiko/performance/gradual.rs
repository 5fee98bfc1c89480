use crate::{
    any::difficulty::Difficulty,
    model::{beatmap::Beatmap, mode::CalculateError},
    taiko::{
        attributes::TaikoPerformanceAttributes, difficulty::gradual::TaikoGradualDifficulty,
        score_state::TaikoScoreState,
    },
};

use super::TaikoPerformance;

/// Performance attributes of an osu!taiko score that is still in progress.
///
/// Every call to [`next`] processes one more object and evaluates the given
/// [`TaikoScoreState`] against the map so far. [`nth`] skips ahead and
/// [`last`] jumps to the end. Use [`TaikoGradualDifficulty`] if only the
/// difficulty is of interest.
///
/// # Example
///
/// ```
/// use rosu_perf::{Beatmap, Difficulty};
/// use rosu_perf::taiko::{TaikoGradualPerformance, TaikoScoreState};
///
/// let map = Beatmap::from_path("./resources/taiko.osu").unwrap();
///
/// let mut gradual = TaikoGradualPerformance::new(Difficulty::new(), &map).unwrap();
/// let mut state = TaikoScoreState::new();
///
/// // Ten 300s in a row
/// for _ in 0..10 {
///     state.n300 += 1;
///     state.max_combo += 1;
///     let attrs = gradual.next(state).unwrap();
///     println!("PP: {}", attrs.pp);
/// }
///
/// // Skip to the end
/// # /*
/// state.max_combo = ...
/// state.n300 = ...
/// ...
/// # */
/// let attrs = gradual.last(state).unwrap();
/// println!("PP: {}", attrs.pp);
/// ```
///
/// [`next`]: TaikoGradualPerformance::next
/// [`nth`]: TaikoGradualPerformance::nth
/// [`last`]: TaikoGradualPerformance::last
#[derive(Clone, Debug)]
pub struct TaikoGradualPerformance {
    difficulty: TaikoGradualDifficulty,
}

impl TaikoGradualPerformance {
    /// Fails if the map is neither an osu!taiko map nor convertible to one.
    pub fn new(difficulty: Difficulty, map: &Beatmap) -> Result<Self, CalculateError> {
        let difficulty = TaikoGradualDifficulty::new(difficulty, map)?;

        Ok(Self { difficulty })
    }

    pub(crate) fn new_unchecked(difficulty: Difficulty, map: &Beatmap) -> Self {
        Self {
            difficulty: TaikoGradualDifficulty::new_unchecked(difficulty, map),
        }
    }

    /// Process the next hit and calculate the performance attributes for
    /// the resulting score state.
    pub fn next(&mut self, state: TaikoScoreState) -> Option<TaikoPerformanceAttributes> {
        self.nth(state, 0)
    }

    /// Process all remaining hits and calculate the final performance
    /// attributes.
    pub fn last(&mut self, state: TaikoScoreState) -> Option<TaikoPerformanceAttributes> {
        self.nth(state, usize::MAX)
    }

    /// Process everything up to the next `n`th hit and calculate the
    /// performance attributes for the resulting score state.
    ///
    /// Note that the count is zero-indexed, so `n=0` will process 1 hit,
    /// `n=1` will process 2, and so on.
    pub fn nth(&mut self, state: TaikoScoreState, n: usize) -> Option<TaikoPerformanceAttributes> {
        let attrs = self.difficulty.nth(n)?;

        let passed_objects = u32::try_from(self.difficulty.idx).unwrap_or(u32::MAX);

        let performance = TaikoPerformance::from(attrs)
            .difficulty(self.difficulty.difficulty.clone())
            .passed_objects(passed_objects)
            .state(state)
            .calculate();

        Some(performance)
    }

    /// Returns the amount of remaining hits.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.difficulty.len()
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::{section::hit_objects::hit_samples::HitSoundType, util::Pos};

    use crate::{
        model::{
            hit_object::{HitObject, HitObjectKind},
            mode::GameMode,
            mods::GameMods,
        },
        taiko::TaikoPerformance,
    };

    use super::*;

    fn map() -> Beatmap {
        let whistle: HitSoundType = "2".parse().unwrap();

        let (hit_objects, hit_sounds) = (0..30)
            .map(|i| {
                let h = HitObject {
                    pos: Pos::default(),
                    start_time: f64::from(i) * 150.0,
                    kind: HitObjectKind::Circle,
                };

                let sound = if i % 4 < 2 { whistle } else { HitSoundType::default() };

                (h, sound)
            })
            .unzip();

        Beatmap {
            mode: GameMode::Taiko,
            hit_objects,
            hit_sounds,
            ..Default::default()
        }
    }

    #[test]
    fn next_and_nth() {
        let map = map();

        let difficulty = Difficulty::new().mods(GameMods::from_acronyms("HDHR", GameMode::Taiko));

        let mut gradual = TaikoGradualPerformance::new(difficulty.clone(), &map).unwrap();
        let mut gradual_2nd = gradual.clone();
        let mut gradual_3rd = gradual.clone();

        let mut state = TaikoScoreState::default();

        let n_hits = map.hit_objects.len();

        for i in 1.. {
            state.n300 += 1;
            state.max_combo += 1;

            let Some(next_gradual) = gradual.next(state) else {
                assert_eq!(i, n_hits + 1);
                assert_eq!(gradual.len(), 0);
                break;
            };

            assert_eq!(gradual.len(), n_hits - i);

            if i % 2 == 0 {
                let next_gradual_2nd = gradual_2nd.nth(state, 1).unwrap();
                assert_eq!(next_gradual, next_gradual_2nd);
            }

            if i % 3 == 0 {
                let next_gradual_3rd = gradual_3rd.nth(state, 2).unwrap();
                assert_eq!(next_gradual, next_gradual_3rd);
            }

            let mut regular_calc = TaikoPerformance::try_new(&map)
                .unwrap()
                .difficulty(difficulty.clone())
                .passed_objects(i as u32)
                .state(state);

            let regular_state = regular_calc.generate_state();
            assert_eq!(state, regular_state);

            let expected = regular_calc.calculate();

            assert_eq!(next_gradual, expected);
        }
    }

    #[test]
    fn last_processes_everything() {
        let map = map();
        let mut gradual = TaikoGradualPerformance::new(Difficulty::new(), &map).unwrap();

        let state = TaikoScoreState {
            max_combo: 30,
            n300: 30,
            ..TaikoScoreState::new()
        };

        let last = gradual.last(state).unwrap();
        let expected = TaikoPerformance::try_new(&map).unwrap().state(state).calculate();

        assert_eq!(last, expected);
        assert_eq!(gradual.len(), 0);
    }
}
