use crate::{
    any::{attributes::PerformanceAttributes, difficulty::Difficulty, score_state::ScoreState},
    catch::CatchGradualPerformance,
    mania::ManiaGradualPerformance,
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, GameMode},
    },
    osu::OsuGradualPerformance,
    taiko::TaikoGradualPerformance,
};

/// Performance attributes of a score in progress on a map of any mode.
///
/// Works like the mode specific calculators, e.g. [`OsuGradualPerformance`]
/// or [`ManiaGradualPerformance`], but takes a [`ScoreState`] whose fields
/// are interpreted according to the map's mode. [`next`] processes one
/// object, [`nth`] skips ahead. See [`GradualDifficulty`] for difficulty
/// attributes only.
///
/// # Example
///
/// ```
/// use rosu_perf::{model::mode::GameMode, Beatmap, Difficulty, GameMods, GradualPerformance, ScoreState};
///
/// let map = Beatmap::from_path("./resources/osu.osu").unwrap();
/// let difficulty = Difficulty::new().mods(GameMods::from_acronyms("DT", GameMode::Osu));
/// let mut gradual = GradualPerformance::new(difficulty, &map);
/// let mut state = ScoreState::new();
///
/// // Ten 300s in a row
/// for _ in 0..10 {
///     state.n300 += 1;
///     state.max_combo += 1;
///
///     let performance = gradual.next(state).unwrap();
///     println!("PP: {}", performance.pp());
/// }
///
/// // A miss resets the combo so `max_combo` stays put for a while
/// state.misses += 1;
///
/// let performance = gradual.next(state).unwrap();
/// println!("PP: {}", performance.pp());
///
/// // Ten more objects at once
/// state.n300 += 2;
/// state.n100 += 7;
/// state.n50 += 1;
///
/// let performance = gradual.nth(state, 9).unwrap();
/// println!("PP: {}", performance.pp());
///
/// // Skip to the end
/// # /*
/// state.max_combo = ...
/// state.n300 = ...
/// ...
/// # */
/// let performance = gradual.last(state).unwrap();
/// println!("PP: {}", performance.pp());
///
/// // Nothing left
/// assert!(gradual.next(state).is_none());
/// ```
///
/// [`next`]: GradualPerformance::next
/// [`nth`]: GradualPerformance::nth
/// [`GradualDifficulty`]: crate::GradualDifficulty
#[derive(Clone, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum GradualPerformance {
    Osu(OsuGradualPerformance),
    Taiko(TaikoGradualPerformance),
    Catch(CatchGradualPerformance),
    Mania(ManiaGradualPerformance),
}

impl GradualPerformance {
    /// Create a [`GradualPerformance`] for a map of any mode.
    pub fn new(difficulty: Difficulty, map: &Beatmap) -> Self {
        match map.mode {
            GameMode::Osu => Self::Osu(OsuGradualPerformance::new_unchecked(difficulty, map)),
            GameMode::Taiko => Self::Taiko(TaikoGradualPerformance::new_unchecked(difficulty, map)),
            GameMode::Catch => Self::Catch(CatchGradualPerformance::new_unchecked(difficulty, map)),
            GameMode::Mania => Self::Mania(ManiaGradualPerformance::new_unchecked(difficulty, map)),
        }
    }

    /// Create a [`GradualPerformance`] for a [`Beatmap`] on a specific
    /// [`GameMode`].
    ///
    /// Fails if the map cannot be converted to `mode`.
    pub fn new_with_mode(
        difficulty: Difficulty,
        map: &Beatmap,
        mode: GameMode,
    ) -> Result<Self, CalculateError> {
        let map = map.convert_ref(mode, difficulty.get_mods())?;

        Ok(Self::new(difficulty, &map))
    }

    /// Process one more object and evaluate `state`.
    pub fn next(&mut self, state: ScoreState) -> Option<PerformanceAttributes> {
        self.nth(state, 0)
    }

    /// Process every remaining object and evaluate `state`.
    pub fn last(&mut self, state: ScoreState) -> Option<PerformanceAttributes> {
        self.nth(state, usize::MAX)
    }

    /// Process `n + 1` more objects and evaluate `state`.
    pub fn nth(&mut self, state: ScoreState, n: usize) -> Option<PerformanceAttributes> {
        match self {
            Self::Osu(gradual) => gradual
                .nth(state.into(), n)
                .map(PerformanceAttributes::Osu),
            Self::Taiko(gradual) => gradual
                .nth(state.into(), n)
                .map(PerformanceAttributes::Taiko),
            Self::Catch(gradual) => gradual
                .nth(state.into(), n)
                .map(PerformanceAttributes::Catch),
            Self::Mania(gradual) => gradual
                .nth(state.into(), n)
                .map(PerformanceAttributes::Mania),
        }
    }

    /// Amount of objects left to process.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Self::Osu(gradual) => gradual.len(),
            Self::Taiko(gradual) => gradual.len(),
            Self::Catch(gradual) => gradual.len(),
            Self::Mania(gradual) => gradual.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::util::Pos;

    use crate::model::hit_object::{HitObject, HitObjectKind};

    use super::*;

    fn map() -> Beatmap {
        let hit_objects = (0..20)
            .map(|i| HitObject {
                pos: Pos::new(64.0 + (i % 5) as f32 * 80.0, 192.0),
                start_time: f64::from(i) * 300.0,
                kind: HitObjectKind::Circle,
            })
            .collect();

        Beatmap {
            hit_objects,
            ..Default::default()
        }
    }

    #[test]
    fn len_counts_down() {
        let map = map();
        let mut gradual = GradualPerformance::new(Difficulty::new(), &map);
        let mut state = ScoreState::new();

        assert_eq!(gradual.len(), 20);

        state.n300 += 1;
        state.max_combo += 1;
        assert!(gradual.next(state).is_some());
        assert_eq!(gradual.len(), 19);

        state.n300 += 4;
        state.max_combo += 4;
        assert!(gradual.nth(state, 3).is_some());
        assert_eq!(gradual.len(), 15);

        state.n300 = 20;
        state.max_combo = 20;
        assert!(gradual.last(state).is_some());
        assert_eq!(gradual.len(), 0);
        assert!(gradual.next(state).is_none());
    }

    #[test]
    fn converts_to_requested_mode() {
        let map = map();
        let gradual =
            GradualPerformance::new_with_mode(Difficulty::new(), &map, GameMode::Taiko).unwrap();

        assert!(matches!(gradual, GradualPerformance::Taiko(_)));
    }
}
