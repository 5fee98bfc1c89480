use crate::{
    any::difficulty::Difficulty,
    catch::{
        attributes::CatchPerformanceAttributes, difficulty::gradual::CatchGradualDifficulty,
        score_state::CatchScoreState,
    },
    model::{beatmap::Beatmap, mode::CalculateError},
};

use super::CatchPerformance;

/// Performance attributes of an osu!catch score that is still in progress.
///
/// Every call to [`next`] processes one more object and evaluates the given
/// [`CatchScoreState`] against the map so far. [`nth`] skips ahead and
/// [`last`] jumps to the end. Use [`CatchGradualDifficulty`] if only the
/// difficulty is of interest.
///
/// # Example
///
/// ```
/// use rosu_perf::{Beatmap, Difficulty};
/// use rosu_perf::catch::{CatchGradualPerformance, CatchScoreState};
///
/// let map = Beatmap::from_path("./resources/catch.osu").unwrap();
///
/// let mut gradual = CatchGradualPerformance::new(Difficulty::new(), &map).unwrap();
/// let mut state = CatchScoreState::new();
///
/// // The first 10 fruits are all caught
/// for _ in 0..10 {
///     state.fruits += 1;
///     state.max_combo += 1;
///
///     let attrs = gradual.next(state).unwrap();
///     println!("PP: {}", attrs.pp);
/// }
///
/// // Skip to the end
/// # /*
/// state.max_combo = ...
/// state.fruits = ...
/// ...
/// # */
/// let attrs = gradual.last(state).unwrap();
/// println!("PP: {}", attrs.pp);
/// ```
///
/// [`next`]: CatchGradualPerformance::next
/// [`nth`]: CatchGradualPerformance::nth
/// [`last`]: CatchGradualPerformance::last
#[derive(Clone, Debug)]
pub struct CatchGradualPerformance {
    difficulty: CatchGradualDifficulty,
}

impl CatchGradualPerformance {
    /// Fails if the map is neither an osu!catch map nor convertible to one.
    pub fn new(difficulty: Difficulty, map: &Beatmap) -> Result<Self, CalculateError> {
        let difficulty = CatchGradualDifficulty::new(difficulty, map)?;

        Ok(Self { difficulty })
    }

    pub(crate) fn new_unchecked(difficulty: Difficulty, map: &Beatmap) -> Self {
        Self {
            difficulty: CatchGradualDifficulty::new_unchecked(difficulty, map),
        }
    }

    /// Process the next fruit or droplet and calculate the performance
    /// attributes for the resulting score state.
    pub fn next(&mut self, state: CatchScoreState) -> Option<CatchPerformanceAttributes> {
        self.nth(state, 0)
    }

    /// Process all remaining objects and calculate the final performance
    /// attributes.
    pub fn last(&mut self, state: CatchScoreState) -> Option<CatchPerformanceAttributes> {
        self.nth(state, usize::MAX)
    }

    /// Process everything up to the next `n`th fruit or droplet and
    /// calculate the performance attributes for the resulting score state.
    ///
    /// Note that the count is zero-indexed, so `n=0` will process 1 object,
    /// `n=1` will process 2, and so on.
    pub fn nth(&mut self, state: CatchScoreState, n: usize) -> Option<CatchPerformanceAttributes> {
        let attrs = self.difficulty.nth(n)?;

        let passed_objects = u32::try_from(self.difficulty.idx).unwrap_or(u32::MAX);

        let performance = CatchPerformance::from(attrs)
            .difficulty(self.difficulty.difficulty.clone())
            .passed_objects(passed_objects)
            .state(state)
            .calculate();

        Some(performance)
    }

    /// Returns the amount of remaining fruits and droplets.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.difficulty.len()
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::util::Pos;

    use crate::model::{
        hit_object::{HitObject, HitObjectKind},
        mode::GameMode,
        mods::GameMods,
    };

    use super::*;

    fn map() -> Beatmap {
        let hit_objects = (0..25)
            .map(|i| HitObject {
                pos: Pos::new(((i * 97) % 512) as f32, 192.0),
                start_time: f64::from(i) * 200.0,
                kind: HitObjectKind::Circle,
            })
            .collect();

        Beatmap {
            mode: GameMode::Catch,
            hit_objects,
            ..Default::default()
        }
    }

    #[test]
    fn next_and_nth() {
        let map = map();

        let difficulty = Difficulty::new().mods(GameMods::from_acronyms("HDHR", GameMode::Catch));

        let mut gradual = CatchGradualPerformance::new(difficulty.clone(), &map).unwrap();
        let mut gradual_2nd = gradual.clone();
        let mut gradual_3rd = gradual.clone();

        let mut state = CatchScoreState::default();
        let n_objects = map.hit_objects.len();

        for i in 1.. {
            state.fruits += 1;
            state.max_combo += 1;

            let Some(next_gradual) = gradual.next(state) else {
                assert_eq!(i, n_objects + 1);
                assert_eq!(gradual.len(), 0);
                break;
            };

            if i % 2 == 0 {
                let next_gradual_2nd = gradual_2nd.nth(state, 1).unwrap();
                assert_eq!(next_gradual, next_gradual_2nd);
            }

            if i % 3 == 0 {
                let next_gradual_3rd = gradual_3rd.nth(state, 2).unwrap();
                assert_eq!(next_gradual, next_gradual_3rd);
            }

            let mut regular_calc = CatchPerformance::try_new(&map)
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
}
