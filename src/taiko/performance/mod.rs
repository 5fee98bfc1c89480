use std::cmp;

use crate::{
    any::{difficulty::Difficulty, performance::HitResultPriority},
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, GameMode},
        mods::GameMods,
    },
    util::map_or_attrs::MapOrAttrs,
};

use super::{
    attributes::{TaikoDifficultyAttributes, TaikoPerformanceAttributes},
    difficulty::difficulty,
    score_state::TaikoScoreState,
};

use self::calculator::TaikoPerformanceCalculator;

mod calculator;
pub mod gradual;

/// Performance calculator on osu!taiko maps.
///
/// # Example
///
/// ```
/// use rosu_perf::{model::mode::GameMode, Beatmap, GameMods};
/// use rosu_perf::taiko::TaikoPerformance;
///
/// let map = Beatmap::from_path("./resources/taiko.osu").unwrap();
///
/// let attrs = TaikoPerformance::try_new(&map)
///     .unwrap()
///     .mods(GameMods::from_acronyms("HDHR", GameMode::Taiko))
///     .combo(150)
///     .n100(3)
///     .misses(1)
///     .calculate();
///
/// println!("PP: {}", attrs.pp);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct TaikoPerformance<'map> {
    pub(crate) map_or_attrs: MapOrAttrs<'map, TaikoDifficultyAttributes>,
    pub(crate) difficulty: Difficulty,
    pub(crate) combo: Option<u32>,
    pub(crate) acc: Option<f64>,
    pub(crate) n300: Option<u32>,
    pub(crate) n100: Option<u32>,
    pub(crate) misses: Option<u32>,
    pub(crate) hitresult_priority: HitResultPriority,
}

impl<'map> TaikoPerformance<'map> {
    /// Create a new performance calculator for an osu!taiko map.
    ///
    /// Fails if the map is not an osu!taiko map. Use
    /// [`Beatmap::convert_ref`] to convert osu!standard maps first.
    pub fn try_new(
        map: impl Into<MapOrAttrs<'map, TaikoDifficultyAttributes>>,
    ) -> Result<Self, CalculateError> {
        let map_or_attrs = map.into();

        if let MapOrAttrs::Map(ref map) = map_or_attrs {
            if map.mode != GameMode::Taiko {
                return Err(CalculateError::ModeMismatch {
                    expected: GameMode::Taiko,
                    actual: map.mode,
                });
            }
        }

        Ok(Self::new_unchecked(map_or_attrs))
    }

    pub(crate) fn new_unchecked(map_or_attrs: MapOrAttrs<'map, TaikoDifficultyAttributes>) -> Self {
        Self {
            map_or_attrs,
            difficulty: Difficulty::new(),
            combo: None,
            acc: None,
            n300: None,
            n100: None,
            misses: None,
            hitresult_priority: HitResultPriority::default(),
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

    /// Amount of passed hits for partial plays, e.g. a fail.
    ///
    /// Only circles count; drumrolls and swells are processed alongside
    /// the hits.
    ///
    /// If you want to calculate the performance after every few hits,
    /// instead of using [`TaikoPerformance`] multiple times with different
    /// `passed_objects`, you should use [`TaikoGradualPerformance`].
    ///
    /// [`TaikoGradualPerformance`]: crate::taiko::TaikoGradualPerformance
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

    /// Specify the max combo of the play.
    pub const fn combo(mut self, combo: u32) -> Self {
        self.combo = Some(combo);

        self
    }

    /// Specify how hitresults should be generated.
    ///
    /// Defauls to [`HitResultPriority::BestCase`].
    pub const fn hitresult_priority(mut self, priority: HitResultPriority) -> Self {
        self.hitresult_priority = priority;

        self
    }

    /// Specify the amount of 300s of a play.
    pub const fn n300(mut self, n300: u32) -> Self {
        self.n300 = Some(n300);

        self
    }

    /// Specify the amount of 100s of a play.
    pub const fn n100(mut self, n100: u32) -> Self {
        self.n100 = Some(n100);

        self
    }

    /// Specify the amount of misses of the play.
    pub const fn misses(mut self, n_misses: u32) -> Self {
        self.misses = Some(n_misses);

        self
    }

    /// Provide parameters through a [`TaikoScoreState`].
    #[allow(clippy::needless_pass_by_value)]
    pub const fn state(mut self, state: TaikoScoreState) -> Self {
        let TaikoScoreState {
            max_combo,
            n300,
            n100,
            misses,
        } = state;

        self.combo = Some(max_combo);
        self.n300 = Some(n300);
        self.n100 = Some(n100);
        self.misses = Some(misses);

        self
    }

    /// Specify the accuracy of a play between `0.0` and `100.0`.
    /// This will be used to generate matching hitresults.
    pub fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc.clamp(0.0, 100.0) / 100.0);

        self
    }

    /// Create the [`TaikoScoreState`] that will be used for performance
    /// calculation.
    ///
    /// If the calculator still holds a beatmap, its difficulty attributes
    /// are calculated and stored in place of the map.
    pub fn generate_state(&mut self) -> TaikoScoreState {
        self.generate_state_with_attrs().0
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> TaikoPerformanceAttributes {
        let (state, attrs) = self.generate_state_with_attrs();

        TaikoPerformanceCalculator::new(attrs, self.difficulty.get_mods(), state).calculate()
    }

    fn attrs(&mut self) -> TaikoDifficultyAttributes {
        match self.map_or_attrs {
            MapOrAttrs::Map(ref map) => {
                let attrs = difficulty(&self.difficulty, map);

                self.map_or_attrs.insert_attrs(attrs)
            }
            MapOrAttrs::Attrs(ref attrs) => attrs.clone(),
        }
    }

    fn generate_state_with_attrs(&mut self) -> (TaikoScoreState, TaikoDifficultyAttributes) {
        let attrs = self.attrs();

        let max_combo = attrs.max_combo;
        let total_result_count = cmp::min(
            u32::try_from(self.difficulty.get_passed_objects()).unwrap_or(u32::MAX),
            max_combo,
        );
        let priority = self.hitresult_priority;

        let misses = self.misses.map_or(0, |n| cmp::min(n, total_result_count));
        let n_remaining = total_result_count - misses;

        let mut n300 = self.n300.map_or(0, |n| cmp::min(n, n_remaining));
        let mut n100 = self.n100.map_or(0, |n| cmp::min(n, n_remaining));

        if let Some(acc) = self.acc {
            match (self.n300, self.n100) {
                (Some(_), Some(_)) => {
                    let remaining = total_result_count.saturating_sub(n300 + n100 + misses);

                    match priority {
                        HitResultPriority::BestCase => {
                            n300 += remaining;
                        }
                        HitResultPriority::WorstCase => n100 += remaining,
                    }
                }
                (Some(_), None) => n100 += total_result_count.saturating_sub(n300 + misses),
                (None, Some(_)) => n300 += total_result_count.saturating_sub(n100 + misses),
                (None, None) => {
                    let target_total = acc * f64::from(2 * total_result_count);

                    let mut best_dist = f64::MAX;

                    let raw_n300 = target_total - f64::from(n_remaining);
                    let min_n300 = cmp::min(n_remaining, raw_n300.floor() as u32);
                    let max_n300 = cmp::min(n_remaining, raw_n300.ceil() as u32);

                    for new300 in min_n300..=max_n300 {
                        let new100 = n_remaining - new300;
                        let dist = (acc - accuracy(new300, new100, misses)).abs();

                        if dist < best_dist {
                            best_dist = dist;
                            n300 = new300;
                            n100 = new100;
                        }
                    }
                }
            }
        } else {
            let remaining = total_result_count.saturating_sub(n300 + n100 + misses);

            match priority {
                HitResultPriority::BestCase => {
                    match (self.n300, self.n100) {
                        (None, _) => n300 = remaining,
                        (_, None) => n100 = remaining,
                        _ => n300 += remaining,
                    }
                }
                HitResultPriority::WorstCase => match (self.n100, self.n300) {
                    (None, _) => n100 = remaining,
                    (_, None) => n300 = remaining,
                    _ => n100 += remaining,
                },
            }
        }

        let max_possible_combo = max_combo.saturating_sub(misses);

        let max_combo = self.combo.map_or(max_possible_combo, |combo| {
            cmp::min(combo, max_possible_combo)
        });

        self.combo = Some(max_combo);
        self.n300 = Some(n300);
        self.n100 = Some(n100);
        self.misses = Some(misses);

        let state = TaikoScoreState {
            max_combo,
            n300,
            n100,
            misses,
        };

        (state, attrs)
    }
}

impl<'map> TryFrom<&'map Beatmap> for TaikoPerformance<'map> {
    type Error = CalculateError;

    fn try_from(map: &'map Beatmap) -> Result<Self, Self::Error> {
        Self::try_new(map)
    }
}

impl From<TaikoDifficultyAttributes> for TaikoPerformance<'_> {
    fn from(attrs: TaikoDifficultyAttributes) -> Self {
        Self::new_unchecked(MapOrAttrs::Attrs(attrs))
    }
}

impl From<TaikoPerformanceAttributes> for TaikoPerformance<'_> {
    fn from(attrs: TaikoPerformanceAttributes) -> Self {
        Self::new_unchecked(MapOrAttrs::Attrs(attrs.difficulty))
    }
}

fn accuracy(n300: u32, n100: u32, misses: u32) -> f64 {
    if n300 + n100 + misses == 0 {
        return 0.0;
    }

    let numerator = 2 * n300 + n100;
    let denominator = 2 * (n300 + n100 + misses);

    f64::from(numerator) / f64::from(denominator)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rosu_map::{section::hit_objects::hit_samples::HitSoundType, util::Pos};

    use crate::model::hit_object::{HitObject, HitObjectKind};

    use super::*;

    const N_OBJECTS: u32 = 200;

    fn map() -> Beatmap {
        let clap: HitSoundType = "8".parse().unwrap();

        let (hit_objects, hit_sounds) = (0..N_OBJECTS)
            .map(|i| {
                let h = HitObject {
                    pos: Pos::default(),
                    start_time: f64::from(i) * 130.0,
                    kind: HitObjectKind::Circle,
                };

                let sound = if i % 3 == 1 { clap } else { HitSoundType::default() };

                (h, sound)
            })
            .unzip();

        Beatmap {
            mode: GameMode::Taiko,
            od: 7.0,
            hit_objects,
            hit_sounds,
            ..Default::default()
        }
    }

    fn attrs() -> TaikoDifficultyAttributes {
        difficulty(&Difficulty::new(), &map())
    }

    #[test]
    fn wrong_mode() {
        let map = Beatmap::default();

        assert!(matches!(
            TaikoPerformance::try_new(&map),
            Err(CalculateError::ModeMismatch { .. })
        ));
    }

    #[test]
    fn max_combo_counts_hits() {
        assert_eq!(attrs().max_combo, N_OBJECTS);
    }

    #[test]
    fn missing_hitresults_are_best_case_by_default() {
        let state = TaikoPerformance::from(attrs())
            .n100(10)
            .misses(3)
            .generate_state();

        assert_eq!(state.n300, N_OBJECTS - 13);
        assert_eq!(state.n100, 10);
        assert_eq!(state.misses, 3);
        assert_eq!(state.max_combo, N_OBJECTS - 3);
    }

    #[test]
    fn worst_case_fills_n100() {
        let state = TaikoPerformance::from(attrs())
            .hitresult_priority(HitResultPriority::WorstCase)
            .n300(150)
            .generate_state();

        assert_eq!(state.n300, 150);
        assert_eq!(state.n100, N_OBJECTS - 150);
    }

    #[test]
    fn passed_objects_limit_results() {
        let map = map();

        let state = TaikoPerformance::try_new(&map)
            .unwrap()
            .passed_objects(50)
            .generate_state();

        assert_eq!(state.total_hits(), 50);
        assert_eq!(state.max_combo, 50);
    }

    #[test]
    fn more_misses_less_pp() {
        let attrs = attrs();

        let fc = TaikoPerformance::from(attrs.clone()).calculate();
        let misses = TaikoPerformance::from(attrs).misses(5).calculate();

        assert!(fc.pp > misses.pp);
        assert!(fc.effective_miss_count.abs() <= f64::EPSILON);
        assert!(misses.effective_miss_count > 5.0);
    }

    #[test]
    fn no_hits_no_pp() {
        let attrs = TaikoPerformance::from(TaikoDifficultyAttributes::default()).calculate();

        assert!(attrs.pp.abs() <= f64::EPSILON);
        assert!(attrs.estimated_unstable_rate.is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn generated_accuracy_is_close(acc in 50.0..=100.0_f64, misses in 0..10_u32) {
            let state = TaikoPerformance::from(attrs())
                .accuracy(acc)
                .misses(misses)
                .generate_state();

            prop_assert_eq!(state.total_hits(), N_OBJECTS);

            let max_acc = accuracy(N_OBJECTS - misses, 0, misses);
            let min_acc = accuracy(0, N_OBJECTS - misses, misses);
            let expected = (acc / 100.0).clamp(min_acc, max_acc);

            // Each 100 changes the accuracy by 1 / (2 * N_OBJECTS)
            prop_assert!((state.accuracy() - expected).abs() <= 1.0 / f64::from(2 * N_OBJECTS));
        }
    }
}
