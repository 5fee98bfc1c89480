use std::cmp::{self, Ordering};

use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, GameMode},
        mods::GameMods,
    },
    util::map_or_attrs::MapOrAttrs,
};

use super::{
    attributes::{CatchDifficultyAttributes, CatchPerformanceAttributes},
    difficulty::difficulty,
    score_state::CatchScoreState,
};

use self::calculator::CatchPerformanceCalculator;

mod calculator;
pub mod gradual;

/// Performance calculator on osu!catch maps.
///
/// # Example
///
/// ```
/// use rosu_perf::{model::mode::GameMode, Beatmap, GameMods};
/// use rosu_perf::catch::CatchPerformance;
///
/// let map = Beatmap::from_path("./resources/catch.osu").unwrap();
///
/// let attrs = CatchPerformance::try_new(&map)
///     .unwrap()
///     .mods(GameMods::from_acronyms("HDHR", GameMode::Catch))
///     .combo(80)
///     .tiny_droplet_misses(5)
///     .misses(1)
///     .calculate();
///
/// println!("PP: {}", attrs.pp);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct CatchPerformance<'map> {
    pub(crate) map_or_attrs: MapOrAttrs<'map, CatchDifficultyAttributes>,
    pub(crate) difficulty: Difficulty,
    pub(crate) acc: Option<f64>,
    pub(crate) combo: Option<u32>,
    pub(crate) fruits: Option<u32>,
    pub(crate) droplets: Option<u32>,
    pub(crate) tiny_droplets: Option<u32>,
    pub(crate) tiny_droplet_misses: Option<u32>,
    pub(crate) misses: Option<u32>,
}

impl<'map> CatchPerformance<'map> {
    /// Create a new performance calculator for an osu!catch map.
    ///
    /// Fails if the map is neither an osu!catch map nor an osu!standard
    /// map that was converted. Use [`Beatmap::convert_ref`] to convert
    /// osu!standard maps first.
    pub fn try_new(
        map: impl Into<MapOrAttrs<'map, CatchDifficultyAttributes>>,
    ) -> Result<Self, CalculateError> {
        let map_or_attrs = map.into();

        if let MapOrAttrs::Map(ref map) = map_or_attrs {
            if map.mode != GameMode::Catch {
                return Err(CalculateError::ModeMismatch {
                    expected: GameMode::Catch,
                    actual: map.mode,
                });
            }
        }

        Ok(Self::new_unchecked(map_or_attrs))
    }

    pub(crate) fn new_unchecked(map_or_attrs: MapOrAttrs<'map, CatchDifficultyAttributes>) -> Self {
        Self {
            map_or_attrs,
            difficulty: Difficulty::new(),
            acc: None,
            combo: None,
            fruits: None,
            droplets: None,
            tiny_droplets: None,
            tiny_droplet_misses: None,
            misses: None,
        }
    }

    /// Specify mods.
    pub fn mods(mut self, mods: GameMods) -> Self {
        self.difficulty = self.difficulty.mods(mods);

        self
    }

    /// Use the specified settings of the given [`Difficulty`].
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;

        self
    }

    /// Amount of passed fruits and droplets for partial plays, e.g. a fail.
    ///
    /// If you want to calculate the performance after every few objects,
    /// instead of using [`CatchPerformance`] multiple times with different
    /// `passed_objects`, you should use [`CatchGradualPerformance`].
    ///
    /// [`CatchGradualPerformance`]: crate::catch::CatchGradualPerformance
    pub fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.difficulty = self.difficulty.passed_objects(passed_objects);

        self
    }

    /// Adjust the clock rate used in the calculation.
    ///
    /// See [`Difficulty::clock_rate`].
    pub fn clock_rate(mut self, clock_rate: f64) -> Self {
        self.difficulty = self.difficulty.clock_rate(clock_rate);

        self
    }

    /// Override a beatmap's set AR.
    ///
    /// See [`Difficulty::ar`].
    pub fn ar(mut self, ar: f32, with_mods: bool) -> Self {
        self.difficulty = self.difficulty.ar(ar, with_mods);

        self
    }

    /// Override a beatmap's set CS.
    ///
    /// See [`Difficulty::cs`].
    pub fn cs(mut self, cs: f32, with_mods: bool) -> Self {
        self.difficulty = self.difficulty.cs(cs, with_mods);

        self
    }

    /// Override a beatmap's set HP.
    ///
    /// See [`Difficulty::hp`].
    pub fn hp(mut self, hp: f32, with_mods: bool) -> Self {
        self.difficulty = self.difficulty.hp(hp, with_mods);

        self
    }

    /// Override a beatmap's set OD.
    ///
    /// See [`Difficulty::od`].
    pub fn od(mut self, od: f32, with_mods: bool) -> Self {
        self.difficulty = self.difficulty.od(od, with_mods);

        self
    }

    /// Adjust patterns as if the HR mod is enabled.
    ///
    /// See [`Difficulty::hardrock_offsets`].
    pub fn hardrock_offsets(mut self, hardrock_offsets: bool) -> Self {
        self.difficulty = self.difficulty.hardrock_offsets(hardrock_offsets);

        self
    }

    /// Provide parameters through a [`CatchScoreState`].
    #[allow(clippy::needless_pass_by_value)]
    pub const fn state(mut self, state: CatchScoreState) -> Self {
        let CatchScoreState {
            max_combo,
            fruits,
            droplets,
            tiny_droplets,
            tiny_droplet_misses,
            misses,
        } = state;

        self.combo = Some(max_combo);
        self.fruits = Some(fruits);
        self.droplets = Some(droplets);
        self.tiny_droplets = Some(tiny_droplets);
        self.tiny_droplet_misses = Some(tiny_droplet_misses);
        self.misses = Some(misses);

        self
    }

    /// Specify the accuracy of a play between `0.0` and `100.0`.
    /// This will be used to generate matching hitresults.
    pub fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc.clamp(0.0, 100.0) / 100.0);

        self
    }

    /// Specify the amount of fruits and droplets of a play that were missed.
    pub const fn misses(mut self, n_misses: u32) -> Self {
        self.misses = Some(n_misses);

        self
    }

    /// Specify the max combo of the play.
    pub const fn combo(mut self, combo: u32) -> Self {
        self.combo = Some(combo);

        self
    }

    /// Specify the amount of fruits of a play i.e. n300.
    pub const fn fruits(mut self, n_fruits: u32) -> Self {
        self.fruits = Some(n_fruits);

        self
    }

    /// Specify the amount of droplets of a play i.e. n100.
    pub const fn droplets(mut self, n_droplets: u32) -> Self {
        self.droplets = Some(n_droplets);

        self
    }

    /// Specify the amount of tiny droplets of a play i.e. n50.
    pub const fn tiny_droplets(mut self, n_tiny_droplets: u32) -> Self {
        self.tiny_droplets = Some(n_tiny_droplets);

        self
    }

    /// Specify the amount of tiny droplet misses of a play i.e. `n_katu`.
    pub const fn tiny_droplet_misses(mut self, n_tiny_droplet_misses: u32) -> Self {
        self.tiny_droplet_misses = Some(n_tiny_droplet_misses);

        self
    }

    /// Create the [`CatchScoreState`] that will be used for performance
    /// calculation.
    ///
    /// If the calculator still holds a beatmap, its difficulty attributes
    /// are calculated and stored in place of the map.
    pub fn generate_state(&mut self) -> CatchScoreState {
        self.generate_state_with_attrs().0
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> CatchPerformanceAttributes {
        let (state, attrs) = self.generate_state_with_attrs();

        CatchPerformanceCalculator::new(attrs, self.difficulty.get_mods(), state).calculate()
    }

    fn attrs(&mut self) -> CatchDifficultyAttributes {
        match self.map_or_attrs {
            MapOrAttrs::Map(ref map) => {
                let attrs = difficulty(&self.difficulty, map);

                self.map_or_attrs.insert_attrs(attrs)
            }
            MapOrAttrs::Attrs(ref attrs) => attrs.clone(),
        }
    }

    fn generate_state_with_attrs(&mut self) -> (CatchScoreState, CatchDifficultyAttributes) {
        let attrs = self.attrs();

        let max_combo = attrs.max_combo();
        let misses = self.misses.map_or(0, |n| cmp::min(n, max_combo));
        let max_possible_combo = max_combo - misses;

        let combo = self.combo.map_or(max_possible_combo, |combo| {
            cmp::min(combo, max_possible_combo)
        });

        let (fruits, droplets) = self.fruits_and_droplets(&attrs, misses);
        let (tiny_droplets, tiny_droplet_misses) =
            self.tiny_droplets_and_misses(&attrs, fruits, droplets, misses);

        let state = CatchScoreState {
            max_combo: combo,
            fruits,
            droplets,
            tiny_droplets,
            tiny_droplet_misses,
            misses,
        };

        self.combo = Some(state.max_combo);
        self.fruits = Some(state.fruits);
        self.droplets = Some(state.droplets);
        self.tiny_droplets = Some(state.tiny_droplets);
        self.tiny_droplet_misses = Some(state.tiny_droplet_misses);
        self.misses = Some(state.misses);

        (state, attrs)
    }

    /// Fill up fruits and droplets so that, together with the misses,
    /// they add up to the map's maximum combo.
    fn fruits_and_droplets(&self, attrs: &CatchDifficultyAttributes, misses: u32) -> (u32, u32) {
        let max_combo = attrs.max_combo();

        match (self.fruits, self.droplets) {
            (Some(mut fruits), Some(mut droplets)) => {
                let n_remaining = max_combo.saturating_sub(fruits + droplets + misses);

                let new_droplets =
                    cmp::min(n_remaining, attrs.n_droplets.saturating_sub(droplets));
                droplets += new_droplets;
                fruits += n_remaining - new_droplets;

                fruits = cmp::min(fruits, max_combo.saturating_sub(droplets + misses));
                droplets = cmp::min(droplets, max_combo - fruits - misses);

                (fruits, droplets)
            }
            (Some(fruits), None) => {
                let missed_fruits = attrs.n_fruits.saturating_sub(fruits);

                let droplets = attrs
                    .n_droplets
                    .saturating_sub(misses.saturating_sub(missed_fruits));

                (max_combo - misses - droplets, droplets)
            }
            (None, Some(droplets)) => {
                let missed_droplets = attrs.n_droplets.saturating_sub(droplets);

                let fruits = attrs
                    .n_fruits
                    .saturating_sub(misses.saturating_sub(missed_droplets));

                (fruits, max_combo - misses - fruits)
            }
            (None, None) => {
                // Misses are assigned to droplets first
                let droplets = attrs.n_droplets.saturating_sub(misses);
                let fruits = attrs.n_fruits - (misses - (attrs.n_droplets - droplets));

                (fruits, droplets)
            }
        }
    }

    fn tiny_droplets_and_misses(
        &self,
        attrs: &CatchDifficultyAttributes,
        fruits: u32,
        droplets: u32,
        misses: u32,
    ) -> (u32, u32) {
        let n_tiny = attrs.n_tiny_droplets;

        let closest_to_acc = |acc: f64| {
            let raw_tiny_droplets = acc * f64::from(attrs.max_combo() + n_tiny)
                - f64::from(fruits + droplets);
            let min_tiny_droplets = cmp::min(n_tiny, raw_tiny_droplets.floor().max(0.0) as u32);
            let max_tiny_droplets = cmp::min(n_tiny, raw_tiny_droplets.ceil().max(0.0) as u32);

            let mut best = (min_tiny_droplets, n_tiny - min_tiny_droplets);
            let mut best_dist = f64::INFINITY;

            for tiny_droplets in min_tiny_droplets..=max_tiny_droplets {
                let tiny_droplet_misses = n_tiny - tiny_droplets;

                let curr_acc =
                    accuracy(fruits, droplets, tiny_droplets, tiny_droplet_misses, misses);
                let curr_dist = (acc - curr_acc).abs();

                if curr_dist < best_dist {
                    best_dist = curr_dist;
                    best = (tiny_droplets, tiny_droplet_misses);
                }
            }

            best
        };

        match (self.tiny_droplets, self.tiny_droplet_misses) {
            (Some(tiny_droplets), Some(tiny_droplet_misses)) => match self.acc {
                Some(acc) => match (tiny_droplets + tiny_droplet_misses).cmp(&n_tiny) {
                    Ordering::Equal => (tiny_droplets, tiny_droplet_misses),
                    Ordering::Less | Ordering::Greater => closest_to_acc(acc),
                },
                None => {
                    let tiny_droplet_misses = cmp::min(tiny_droplet_misses, n_tiny);
                    let tiny_droplets = n_tiny - tiny_droplet_misses;

                    (tiny_droplets, tiny_droplet_misses)
                }
            },
            (Some(tiny_droplets), None) => {
                let tiny_droplets = cmp::min(n_tiny, tiny_droplets);

                (tiny_droplets, n_tiny - tiny_droplets)
            }
            (None, Some(tiny_droplet_misses)) => {
                let tiny_droplet_misses = cmp::min(n_tiny, tiny_droplet_misses);

                (n_tiny - tiny_droplet_misses, tiny_droplet_misses)
            }
            (None, None) => match self.acc {
                Some(acc) => closest_to_acc(acc),
                None => (n_tiny, 0),
            },
        }
    }
}

impl<'map> TryFrom<&'map Beatmap> for CatchPerformance<'map> {
    type Error = CalculateError;

    fn try_from(map: &'map Beatmap) -> Result<Self, Self::Error> {
        Self::try_new(map)
    }
}

impl From<CatchDifficultyAttributes> for CatchPerformance<'_> {
    fn from(attrs: CatchDifficultyAttributes) -> Self {
        Self::new_unchecked(MapOrAttrs::Attrs(attrs))
    }
}

impl From<CatchPerformanceAttributes> for CatchPerformance<'_> {
    fn from(attrs: CatchPerformanceAttributes) -> Self {
        Self::new_unchecked(MapOrAttrs::Attrs(attrs.difficulty))
    }
}

fn accuracy(
    n_fruits: u32,
    n_droplets: u32,
    n_tiny_droplets: u32,
    n_tiny_droplet_misses: u32,
    misses: u32,
) -> f64 {
    let numerator = n_fruits + n_droplets + n_tiny_droplets;
    let denominator = numerator + n_tiny_droplet_misses + misses;

    if denominator == 0 {
        return 0.0;
    }

    f64::from(numerator) / f64::from(denominator)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const N_FRUITS: u32 = 200;
    const N_DROPLETS: u32 = 50;
    const N_TINY_DROPLETS: u32 = 300;

    fn attrs() -> CatchDifficultyAttributes {
        CatchDifficultyAttributes {
            stars: 4.5,
            ar: 9.0,
            n_fruits: N_FRUITS,
            n_droplets: N_DROPLETS,
            n_tiny_droplets: N_TINY_DROPLETS,
            is_convert: false,
        }
    }

    #[test]
    fn wrong_mode() {
        let map = Beatmap::default();

        assert!(matches!(
            CatchPerformance::try_new(&map),
            Err(CalculateError::ModeMismatch { .. })
        ));
    }

    #[test]
    fn full_combo_by_default() {
        let state = CatchPerformance::from(attrs()).generate_state();

        assert_eq!(state.fruits, N_FRUITS);
        assert_eq!(state.droplets, N_DROPLETS);
        assert_eq!(state.tiny_droplets, N_TINY_DROPLETS);
        assert_eq!(state.max_combo, N_FRUITS + N_DROPLETS);
        assert!((state.accuracy() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn misses_are_taken_from_droplets_first() {
        let state = CatchPerformance::from(attrs()).misses(60).generate_state();

        assert_eq!(state.droplets, 0);
        assert_eq!(state.fruits, N_FRUITS - 10);
        assert_eq!(state.max_combo, N_FRUITS + N_DROPLETS - 60);
    }

    #[test]
    fn given_fruits_are_completed_with_droplets() {
        let state = CatchPerformance::from(attrs())
            .fruits(190)
            .misses(5)
            .generate_state();

        assert_eq!(state.fruits + state.droplets + state.misses, N_FRUITS + N_DROPLETS);
        assert_eq!(state.droplets, N_DROPLETS);
        assert_eq!(state.fruits, N_FRUITS - 5);
    }

    #[test]
    fn tiny_droplet_misses_are_clamped() {
        let state = CatchPerformance::from(attrs())
            .tiny_droplet_misses(1000)
            .generate_state();

        assert_eq!(state.tiny_droplet_misses, N_TINY_DROPLETS);
        assert_eq!(state.tiny_droplets, 0);
    }

    #[test]
    fn more_misses_less_pp() {
        let fc = CatchPerformance::from(attrs()).calculate();
        let misses = CatchPerformance::from(attrs()).misses(3).calculate();

        assert!(fc.pp > misses.pp);
    }

    #[test]
    fn higher_combo_more_pp() {
        let low = CatchPerformance::from(attrs()).combo(50).calculate();
        let high = CatchPerformance::from(attrs()).combo(200).calculate();

        assert!(high.pp > low.pp);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn generated_accuracy_is_close(acc in 60.0..=100.0_f64, misses in 0..10_u32) {
            let state = CatchPerformance::from(attrs())
                .accuracy(acc)
                .misses(misses)
                .generate_state();

            prop_assert_eq!(
                state.total_hits(),
                N_FRUITS + N_DROPLETS + N_TINY_DROPLETS
            );

            let total = f64::from(state.total_hits());
            let max_acc = 1.0 - f64::from(misses) / total;
            let min_acc = f64::from(N_FRUITS + N_DROPLETS - misses) / total;
            let expected = (acc / 100.0).clamp(min_acc, max_acc);

            // Each tiny droplet changes the accuracy by 1 / total
            prop_assert!((state.accuracy() - expected).abs() <= 1.0 / total);
        }
    }
}
