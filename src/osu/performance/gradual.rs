use crate::{
    any::difficulty::Difficulty,
    model::{beatmap::Beatmap, mode::CalculateError},
    osu::{
        attributes::OsuPerformanceAttributes, difficulty::gradual::OsuGradualDifficulty,
        score_state::OsuScoreState,
    },
};

use super::OsuPerformance;

/// Performance attributes of an osu!standard score that is still in progress.
///
/// Every call to [`next`] processes one more object and evaluates the given
/// [`OsuScoreState`] against the map so far. [`nth`] skips ahead and
/// [`last`] jumps to the end. Use [`OsuGradualDifficulty`] if only the
/// difficulty is of interest.
///
/// # Example
///
/// ```
/// use rosu_perf::{Beatmap, Difficulty};
/// use rosu_perf::osu::{OsuGradualPerformance, OsuScoreState};
///
/// let map = Beatmap::from_path("./resources/osu.osu").unwrap();
///
/// let mut gradual = OsuGradualPerformance::new(Difficulty::new(), &map).unwrap();
/// let mut state = OsuScoreState::new();
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
/// [`next`]: OsuGradualPerformance::next
/// [`nth`]: OsuGradualPerformance::nth
/// [`last`]: OsuGradualPerformance::last
#[derive(Clone, Debug)]
pub struct OsuGradualPerformance {
    difficulty: OsuGradualDifficulty,
}

impl OsuGradualPerformance {
    /// Fails if the map is not an osu!standard map.
    pub fn new(difficulty: Difficulty, map: &Beatmap) -> Result<Self, CalculateError> {
        let difficulty = OsuGradualDifficulty::new(difficulty, map)?;

        Ok(Self { difficulty })
    }

    pub(crate) fn new_unchecked(difficulty: Difficulty, map: &Beatmap) -> Self {
        Self {
            difficulty: OsuGradualDifficulty::new_unchecked(difficulty, map),
        }
    }

    /// Process one more object and evaluate `state`.
    pub fn next(&mut self, state: OsuScoreState) -> Option<OsuPerformanceAttributes> {
        self.nth(state, 0)
    }

    /// Process every remaining object and evaluate `state`.
    pub fn last(&mut self, state: OsuScoreState) -> Option<OsuPerformanceAttributes> {
        self.nth(state, usize::MAX)
    }

    /// Process `n + 1` more objects and evaluate `state`.
    ///
    /// Skipping past the end processes the remaining objects, if any.
    pub fn nth(&mut self, state: OsuScoreState, n: usize) -> Option<OsuPerformanceAttributes> {
        let attrs = self.difficulty.nth(n)?;
        let passed_objects = u32::try_from(self.difficulty.idx).unwrap_or(u32::MAX);

        let performance = OsuPerformance::from(attrs)
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

#[cfg(test)]
mod tests {
    use rosu_map::util::Pos;

    use crate::{
        model::{
            hit_object::{HitObject, HitObjectKind},
            mode::GameMode,
            mods::GameMods,
        },
        osu::OsuPerformance,
    };

    use super::*;

    fn map() -> Beatmap {
        let hit_objects = (0..30)
            .map(|i| HitObject {
                pos: Pos::new(50.0 + (i % 6) as f32 * 70.0, 60.0 + (i % 4) as f32 * 90.0),
                start_time: f64::from(i) * 220.0,
                kind: HitObjectKind::Circle,
            })
            .collect();

        Beatmap {
            hit_objects,
            ..Default::default()
        }
    }

    #[test]
    fn next_and_nth() {
        let map = map();

        let difficulty = Difficulty::new().mods(GameMods::from_acronyms("HDHR", GameMode::Osu));

        let mut gradual = OsuGradualPerformance::new(difficulty.clone(), &map).unwrap();
        let mut gradual_2nd = gradual.clone();
        let mut gradual_3rd = gradual.clone();

        let mut state = OsuScoreState::default();

        let hit_objects_len = map.hit_objects.len();

        for i in 1.. {
            state.misses += 1;

            let Some(next_gradual) = gradual.next(state) else {
                assert_eq!(i, hit_objects_len + 1);
                assert_eq!(gradual.len(), 0);
                break;
            };

            assert_eq!(gradual.len(), hit_objects_len - i);

            if i % 2 == 0 {
                let next_gradual_2nd = gradual_2nd.nth(state, 1).unwrap();
                assert_eq!(next_gradual, next_gradual_2nd);
            }

            if i % 3 == 0 {
                let next_gradual_3rd = gradual_3rd.nth(state, 2).unwrap();
                assert_eq!(next_gradual, next_gradual_3rd);
            }

            let mut regular_calc = OsuPerformance::try_new(&map)
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
