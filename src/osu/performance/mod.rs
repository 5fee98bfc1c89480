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
    attributes::{OsuDifficultyAttributes, OsuPerformanceAttributes},
    difficulty::difficulty,
    score_state::{OsuScoreOrigin, OsuScoreState},
};

use self::calculator::OsuPerformanceCalculator;

pub use self::calculator::PERFORMANCE_BASE_MULTIPLIER;

pub(crate) use self::calculator::base_accuracy_value;

mod calculator;
pub mod gradual;

/// Performance calculator on osu!standard maps.
///
/// # Example
///
/// ```
/// use rosu_perf::{model::mode::GameMode, Beatmap, GameMods};
/// use rosu_perf::osu::OsuPerformance;
///
/// let map = Beatmap::from_path("./resources/osu.osu").unwrap();
///
/// let attrs = OsuPerformance::try_new(&map)
///     .unwrap()
///     .mods(GameMods::from_acronyms("HDDT", GameMode::Osu))
///     .accuracy(98.5)
///     .misses(1)
///     .calculate();
///
/// println!("PP: {}", attrs.pp);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct OsuPerformance<'map> {
    pub(crate) map_or_attrs: MapOrAttrs<'map, OsuDifficultyAttributes>,
    pub(crate) difficulty: Difficulty,
    pub(crate) acc: Option<f64>,
    pub(crate) combo: Option<u32>,

    pub(crate) large_tick_hits: Option<u32>,
    pub(crate) small_tick_hits: Option<u32>,
    pub(crate) slider_end_hits: Option<u32>,
    pub(crate) n300: Option<u32>,
    pub(crate) n100: Option<u32>,
    pub(crate) n50: Option<u32>,
    pub(crate) misses: Option<u32>,
    pub(crate) hitresult_priority: HitResultPriority,
}

impl<'map> OsuPerformance<'map> {
    /// Create a new performance calculator for an osu!standard map.
    ///
    /// Fails if the map is not an osu!standard map.
    pub fn try_new(
        map: impl Into<MapOrAttrs<'map, OsuDifficultyAttributes>>,
    ) -> Result<Self, CalculateError> {
        let map_or_attrs = map.into();

        if let MapOrAttrs::Map(ref map) = map_or_attrs {
            if map.mode != GameMode::Osu {
                return Err(CalculateError::ModeMismatch {
                    expected: GameMode::Osu,
                    actual: map.mode,
                });
            }
        }

        Ok(Self::new_unchecked(map_or_attrs))
    }

    pub(crate) fn new_unchecked(map_or_attrs: MapOrAttrs<'map, OsuDifficultyAttributes>) -> Self {
        Self {
            map_or_attrs,
            difficulty: Difficulty::new(),
            acc: None,
            combo: None,
            large_tick_hits: None,
            small_tick_hits: None,
            slider_end_hits: None,
            n300: None,
            n100: None,
            n50: None,
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

    /// Amount of passed objects for partial plays, e.g. a fail.
    ///
    /// If you want to calculate the performance after every few objects,
    /// instead of using [`OsuPerformance`] multiple times with different
    /// `passed_objects`, you should use [`OsuGradualPerformance`].
    ///
    /// [`OsuGradualPerformance`]: crate::osu::OsuGradualPerformance
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

    /// Whether the calculated attributes belong to an osu!lazer or
    /// osu!stable score.
    ///
    /// Defaults to `true`.
    ///
    /// This affects internal accuracy calculation because lazer considers
    /// slider heads for accuracy whereas stable does not.
    pub fn lazer(mut self, lazer: bool) -> Self {
        self.difficulty = self.difficulty.lazer(lazer);

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

    /// Specify the amount of "large tick" hits.
    ///
    /// The meaning depends on the kind of score:
    /// - if set on osu!stable, this value is irrelevant and can be `0`
    /// - if set on osu!lazer *with* slider accuracy, this value is the amount
    ///   of hit slider ticks and repeats
    /// - if set on osu!lazer *without* slider accuracy, this value is the
    ///   amount of hit slider heads, ticks, and repeats
    pub const fn large_tick_hits(mut self, large_tick_hits: u32) -> Self {
        self.large_tick_hits = Some(large_tick_hits);

        self
    }

    /// Specify the amount of "small tick" hits.
    ///
    /// Only relevant for osu!lazer scores without slider accuracy. In that
    /// case, this value is the amount of slider tail hits.
    pub const fn small_tick_hits(mut self, small_tick_hits: u32) -> Self {
        self.small_tick_hits = Some(small_tick_hits);

        self
    }

    /// Specify the amount of hit slider ends.
    ///
    /// Only relevant for osu!lazer scores with slider accuracy.
    pub const fn slider_end_hits(mut self, slider_end_hits: u32) -> Self {
        self.slider_end_hits = Some(slider_end_hits);

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

    /// Specify the amount of 50s of a play.
    pub const fn n50(mut self, n50: u32) -> Self {
        self.n50 = Some(n50);

        self
    }

    /// Specify the amount of misses of a play.
    pub const fn misses(mut self, n_misses: u32) -> Self {
        self.misses = Some(n_misses);

        self
    }

    /// Provide parameters through an [`OsuScoreState`].
    #[allow(clippy::needless_pass_by_value)]
    pub const fn state(mut self, state: OsuScoreState) -> Self {
        let OsuScoreState {
            max_combo,
            large_tick_hits,
            small_tick_hits,
            slider_end_hits,
            n300,
            n100,
            n50,
            misses,
        } = state;

        self.combo = Some(max_combo);
        self.large_tick_hits = Some(large_tick_hits);
        self.small_tick_hits = Some(small_tick_hits);
        self.slider_end_hits = Some(slider_end_hits);
        self.n300 = Some(n300);
        self.n100 = Some(n100);
        self.n50 = Some(n50);
        self.misses = Some(misses);

        self
    }

    /// Specify the accuracy of a play between `0.0` and `100.0`.
    /// This will be used to generate matching hitresults.
    pub fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc.clamp(0.0, 100.0) / 100.0);

        self
    }

    /// Create the [`OsuScoreState`] that will be used for performance
    /// calculation.
    ///
    /// If the calculator still holds a beatmap, its difficulty attributes
    /// are calculated and stored in place of the map.
    pub fn generate_state(&mut self) -> OsuScoreState {
        self.generate_state_with_attrs().0
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> OsuPerformanceAttributes {
        let (state, attrs) = self.generate_state_with_attrs();

        let mods = self.difficulty.get_mods();
        let lazer = self.difficulty.get_lazer();
        let using_classic_slider_acc = mods.no_slider_head_acc(lazer);

        let effective_miss_count =
            calculate_effective_misses(&attrs, &state, using_classic_slider_acc);

        let origin = score_origin(&attrs, lazer, using_classic_slider_acc);
        let acc = state.accuracy(origin);

        OsuPerformanceCalculator::new(
            attrs,
            mods,
            acc,
            state,
            effective_miss_count,
            using_classic_slider_acc,
        )
        .calculate()
    }

    fn attrs(&mut self) -> OsuDifficultyAttributes {
        match self.map_or_attrs {
            MapOrAttrs::Map(ref map) => {
                let attrs = difficulty(&self.difficulty, map);

                self.map_or_attrs.insert_attrs(attrs)
            }
            MapOrAttrs::Attrs(ref attrs) => attrs.clone(),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn generate_state_with_attrs(&mut self) -> (OsuScoreState, OsuDifficultyAttributes) {
        let attrs = self.attrs();

        let max_combo = attrs.max_combo;
        let n_objects = cmp::min(
            u32::try_from(self.difficulty.get_passed_objects()).unwrap_or(u32::MAX),
            attrs.n_objects(),
        );
        let priority = self.hitresult_priority;

        let misses = self.misses.map_or(0, |n| cmp::min(n, n_objects));
        let n_remaining = n_objects - misses;

        let mut n300 = self.n300.map_or(0, |n| cmp::min(n, n_remaining));
        let mut n100 = self.n100.map_or(0, |n| cmp::min(n, n_remaining));
        let mut n50 = self.n50.map_or(0, |n| cmp::min(n, n_remaining));

        let lazer = self.difficulty.get_lazer();
        let using_classic_slider_acc = self.difficulty.get_mods().no_slider_head_acc(lazer);
        let origin = score_origin(&attrs, lazer, using_classic_slider_acc);

        let (slider_end_hits, large_tick_hits, small_tick_hits) = match origin {
            OsuScoreOrigin::Stable => (0, 0, 0),
            OsuScoreOrigin::WithSliderAcc {
                max_large_ticks,
                max_slider_ends,
            } => (
                self.slider_end_hits
                    .map_or(max_slider_ends, |n| cmp::min(n, max_slider_ends)),
                self.large_tick_hits
                    .map_or(max_large_ticks, |n| cmp::min(n, max_large_ticks)),
                0,
            ),
            OsuScoreOrigin::WithoutSliderAcc {
                max_large_ticks,
                max_small_ticks,
            } => (
                0,
                self.large_tick_hits
                    .map_or(max_large_ticks, |n| cmp::min(n, max_large_ticks)),
                self.small_tick_hits
                    .map_or(max_small_ticks, |n| cmp::min(n, max_small_ticks)),
            ),
        };

        let (slider_acc_value, max_slider_acc_value) = match origin {
            OsuScoreOrigin::Stable => (0, 0),
            OsuScoreOrigin::WithSliderAcc {
                max_large_ticks,
                max_slider_ends,
            } => (
                150 * slider_end_hits + 30 * large_tick_hits,
                150 * max_slider_ends + 30 * max_large_ticks,
            ),
            OsuScoreOrigin::WithoutSliderAcc {
                max_large_ticks,
                max_small_ticks,
            } => (
                30 * large_tick_hits + 10 * small_tick_hits,
                30 * max_large_ticks + 10 * max_small_ticks,
            ),
        };

        // Candidate states only differ in their n300, n100, and n50
        let acc_of = |n300: u32, n100: u32, n50: u32| {
            let state = OsuScoreState {
                max_combo: 0,
                large_tick_hits,
                small_tick_hits,
                slider_end_hits,
                n300,
                n100,
                n50,
                misses,
            };

            state.accuracy(origin)
        };

        if let Some(acc) = self.acc {
            let target_total = acc * f64::from(300 * n_objects + max_slider_acc_value);

            match (self.n300, self.n100, self.n50) {
                (Some(_), Some(_), Some(_)) => {
                    let remaining = n_objects.saturating_sub(n300 + n100 + n50 + misses);

                    match priority {
                        HitResultPriority::WorstCase => n50 += remaining,
                        HitResultPriority::BestCase => {
                            n300 += remaining;
                        }
                    }
                }
                (Some(_), Some(_), None) => n50 = n_objects.saturating_sub(n300 + n100 + misses),
                (Some(_), None, Some(_)) => n100 = n_objects.saturating_sub(n300 + n50 + misses),
                (None, Some(_), Some(_)) => n300 = n_objects.saturating_sub(n100 + n50 + misses),
                (Some(_), None, None) => {
                    let mut best_dist = f64::MAX;

                    let n_remaining = n_remaining - n300;

                    let raw_n100 = (target_total
                        - f64::from(50 * n_remaining + 300 * n300 + slider_acc_value))
                        / 50.0;
                    let min_n100 = cmp::min(n_remaining, raw_n100.floor() as u32);
                    let max_n100 = cmp::min(n_remaining, raw_n100.ceil() as u32);

                    for new100 in min_n100..=max_n100 {
                        let new50 = n_remaining - new100;
                        let dist = (acc - acc_of(n300, new100, new50)).abs();

                        if dist < best_dist {
                            best_dist = dist;
                            n100 = new100;
                            n50 = new50;
                        }
                    }
                }
                (None, Some(_), None) => {
                    let mut best_dist = f64::MAX;

                    let n_remaining = n_remaining - n100;

                    let raw_n300 = (target_total
                        - f64::from(50 * n_remaining + 100 * n100 + slider_acc_value))
                        / 250.0;
                    let min_n300 = cmp::min(n_remaining, raw_n300.floor() as u32);
                    let max_n300 = cmp::min(n_remaining, raw_n300.ceil() as u32);

                    for new300 in min_n300..=max_n300 {
                        let new50 = n_remaining - new300;
                        let dist = (acc - acc_of(new300, n100, new50)).abs();

                        if dist < best_dist {
                            best_dist = dist;
                            n300 = new300;
                            n50 = new50;
                        }
                    }
                }
                (None, None, Some(_)) => {
                    let mut best_dist = f64::MAX;

                    let n_remaining = n_remaining - n50;

                    let raw_n300 = (target_total + f64::from(100 * misses + 50 * n50)
                        - f64::from(100 * n_objects + slider_acc_value))
                        / 200.0;
                    let min_n300 = cmp::min(n_remaining, raw_n300.floor() as u32);
                    let max_n300 = cmp::min(n_remaining, raw_n300.ceil() as u32);

                    for new300 in min_n300..=max_n300 {
                        let new100 = n_remaining - new300;
                        let dist = (acc - acc_of(new300, new100, n50)).abs();

                        if dist < best_dist {
                            best_dist = dist;
                            n300 = new300;
                            n100 = new100;
                        }
                    }
                }
                (None, None, None) => {
                    let mut best_dist = f64::MAX;

                    let raw_n300 =
                        (target_total - f64::from(50 * n_remaining + slider_acc_value)) / 250.0;
                    let min_n300 = cmp::min(n_remaining, raw_n300.floor() as u32);
                    let max_n300 = cmp::min(n_remaining, raw_n300.ceil() as u32);

                    for new300 in min_n300..=max_n300 {
                        let raw_n100 = (target_total
                            - f64::from(50 * n_remaining + 250 * new300 + slider_acc_value))
                            / 50.0;
                        let min_n100 = cmp::min(raw_n100.floor() as u32, n_remaining - new300);
                        let max_n100 = cmp::min(raw_n100.ceil() as u32, n_remaining - new300);

                        for new100 in min_n100..=max_n100 {
                            let new50 = n_remaining - new300 - new100;
                            let dist = (acc - acc_of(new300, new100, new50)).abs();

                            if dist < best_dist {
                                best_dist = dist;
                                n300 = new300;
                                n100 = new100;
                                n50 = new50;
                            }
                        }
                    }

                    match priority {
                        HitResultPriority::WorstCase => {
                            // Shift n100 to n50 by gaining n300
                            let n = n100 / 5;
                            n300 += n;
                            n100 -= 5 * n;
                            n50 += 4 * n;
                        }
                        HitResultPriority::BestCase => {
                            // Shift n50 to n100 by sacrificing n300
                            let n = cmp::min(n300, n50 / 4);
                            n300 -= n;
                            n100 += 5 * n;
                            n50 -= 4 * n;
                        }
                    }
                }
            }
        } else {
            let remaining = n_objects.saturating_sub(n300 + n100 + n50 + misses);

            match priority {
                HitResultPriority::WorstCase => match (self.n50, self.n100, self.n300) {
                    (None, ..) => n50 = remaining,
                    (_, None, _) => n100 = remaining,
                    (.., None) => n300 = remaining,
                    _ => n50 += remaining,
                },
                HitResultPriority::BestCase => {
                    match (self.n300, self.n100, self.n50) {
                        (None, ..) => n300 = remaining,
                        (_, None, _) => n100 = remaining,
                        (.., None) => n50 = remaining,
                        _ => n300 += remaining,
                    }
                }
            }
        }

        let max_possible_combo = max_combo.saturating_sub(misses);

        let max_combo = self.combo.map_or(max_possible_combo, |combo| {
            cmp::min(combo, max_possible_combo)
        });

        self.combo = Some(max_combo);
        self.slider_end_hits = Some(slider_end_hits);
        self.large_tick_hits = Some(large_tick_hits);
        self.small_tick_hits = Some(small_tick_hits);
        self.n300 = Some(n300);
        self.n100 = Some(n100);
        self.n50 = Some(n50);
        self.misses = Some(misses);

        let state = OsuScoreState {
            max_combo,
            large_tick_hits,
            small_tick_hits,
            slider_end_hits,
            n300,
            n100,
            n50,
            misses,
        };

        (state, attrs)
    }
}

impl<'map> TryFrom<&'map Beatmap> for OsuPerformance<'map> {
    type Error = CalculateError;

    fn try_from(map: &'map Beatmap) -> Result<Self, Self::Error> {
        Self::try_new(map)
    }
}

impl From<OsuDifficultyAttributes> for OsuPerformance<'_> {
    fn from(attrs: OsuDifficultyAttributes) -> Self {
        Self::new_unchecked(MapOrAttrs::Attrs(attrs))
    }
}

impl From<OsuPerformanceAttributes> for OsuPerformance<'_> {
    fn from(attrs: OsuPerformanceAttributes) -> Self {
        Self::new_unchecked(MapOrAttrs::Attrs(attrs.difficulty))
    }
}

const fn score_origin(
    attrs: &OsuDifficultyAttributes,
    lazer: bool,
    using_classic_slider_acc: bool,
) -> OsuScoreOrigin {
    match (lazer, using_classic_slider_acc) {
        (false, _) => OsuScoreOrigin::Stable,
        (true, false) => OsuScoreOrigin::WithSliderAcc {
            max_large_ticks: attrs.n_large_ticks,
            max_slider_ends: attrs.n_sliders,
        },
        (true, true) => OsuScoreOrigin::WithoutSliderAcc {
            max_large_ticks: attrs.n_sliders + attrs.n_large_ticks,
            max_small_ticks: attrs.n_sliders,
        },
    }
}

fn calculate_effective_misses(
    attrs: &OsuDifficultyAttributes,
    state: &OsuScoreState,
    using_classic_slider_acc: bool,
) -> f64 {
    let mut effective_miss_count = f64::from(state.misses);

    if attrs.n_sliders > 0 {
        if using_classic_slider_acc {
            // Dropped slider tails neither add to nor break combo
            // Stable scores don't track them so assume 10% of sliders
            let full_combo_threshold =
                f64::from(attrs.max_combo) - 0.1 * f64::from(attrs.n_sliders);

            if f64::from(state.max_combo) < full_combo_threshold {
                effective_miss_count = full_combo_threshold / f64::from(state.max_combo).max(1.0);
            }

            // Capped by the amount of non-perfect judgements
            effective_miss_count = effective_miss_count.min(total_imperfect_hits(state));
        } else {
            let full_combo_threshold =
                f64::from(attrs.max_combo.saturating_sub(n_slider_ends_dropped(attrs, state)));

            if f64::from(state.max_combo) < full_combo_threshold {
                effective_miss_count = full_combo_threshold / f64::from(state.max_combo).max(1.0);
            }

            // Tick misses break combo too
            effective_miss_count = effective_miss_count
                .min(f64::from(n_large_tick_miss(attrs, state) + state.misses));
        }
    }

    effective_miss_count = effective_miss_count.max(f64::from(state.misses));

    effective_miss_count.min(f64::from(state.total_hits()))
}

fn total_imperfect_hits(state: &OsuScoreState) -> f64 {
    f64::from(state.n100 + state.n50 + state.misses)
}

const fn n_slider_ends_dropped(attrs: &OsuDifficultyAttributes, state: &OsuScoreState) -> u32 {
    attrs.n_sliders.saturating_sub(state.slider_end_hits)
}

const fn n_large_tick_miss(attrs: &OsuDifficultyAttributes, state: &OsuScoreState) -> u32 {
    attrs.n_large_ticks.saturating_sub(state.large_tick_hits)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rosu_map::util::Pos;

    use crate::{
        model::hit_object::{HitObject, HitObjectKind},
        util::float_ext::FloatExt,
    };

    use super::*;

    fn map() -> Beatmap {
        let hit_objects = (0..120)
            .map(|i| HitObject {
                pos: Pos::new(64.0 + (i % 5) as f32 * 90.0, 80.0 + (i % 3) as f32 * 100.0),
                start_time: f64::from(i) * 150.0,
                kind: HitObjectKind::Circle,
            })
            .collect();

        Beatmap {
            hit_objects,
            ..Default::default()
        }
    }

    fn attrs() -> OsuDifficultyAttributes {
        difficulty(&Difficulty::new(), &map())
    }

    #[test]
    fn wrong_mode() {
        let map = Beatmap {
            mode: GameMode::Mania,
            ..Default::default()
        };

        assert!(matches!(
            OsuPerformance::try_new(&map),
            Err(CalculateError::ModeMismatch { .. })
        ));
    }

    #[test]
    fn map_is_replaced_by_attrs() {
        let map = map();
        let mut performance = OsuPerformance::try_new(&map).unwrap();
        let _ = performance.generate_state();

        assert!(performance.map_or_attrs.map().is_none());
    }

    #[test]
    fn missing_hitresults_are_best_case_by_default() {
        let state = OsuPerformance::from(attrs())
            .lazer(false)
            .n100(5)
            .misses(2)
            .generate_state();

        assert_eq!(state.n300, 113);
        assert_eq!(state.n100, 5);
        assert_eq!(state.n50, 0);
        assert_eq!(state.misses, 2);
        assert_eq!(state.max_combo, 118);
    }

    #[test]
    fn worst_case_fills_n50() {
        let state = OsuPerformance::from(attrs())
            .lazer(false)
            .hitresult_priority(HitResultPriority::WorstCase)
            .n300(100)
            .generate_state();

        assert_eq!(state.n300, 100);
        assert_eq!(state.n50, 20);
    }

    #[test]
    fn counts_are_clamped() {
        let state = OsuPerformance::from(attrs())
            .misses(500)
            .n300(500)
            .combo(1000)
            .generate_state();

        assert_eq!(state.misses, 120);
        assert_eq!(state.total_hits(), 120);
        assert_eq!(state.max_combo, 0);
    }

    #[test]
    fn best_case_is_the_default_priority() {
        let default = OsuPerformance::from(attrs()).accuracy(95.0).generate_state();

        let best = OsuPerformance::from(attrs())
            .accuracy(95.0)
            .hitresult_priority(HitResultPriority::BestCase)
            .generate_state();

        let worst = OsuPerformance::from(attrs())
            .accuracy(95.0)
            .hitresult_priority(HitResultPriority::WorstCase)
            .generate_state();

        assert_eq!(default, best);
        assert!(worst.n300 <= best.n300);
        assert!(worst.n50 >= best.n50);
    }

    #[test]
    fn no_hits_no_pp() {
        let attrs = OsuPerformance::from(OsuDifficultyAttributes::default()).calculate();

        assert!(attrs.pp.eq(0.0));
        assert!(attrs.speed_deviation.is_none());
    }

    #[test]
    fn relax_has_no_speed_or_acc_pp() {
        let mods = GameMods::from_acronyms("RX", GameMode::Osu);
        let map = map();

        let attrs = OsuPerformance::try_new(&map)
            .unwrap()
            .mods(mods)
            .calculate();

        assert!(attrs.pp_speed.eq(0.0));
        assert!(attrs.pp_stamina.eq(0.0));
        assert!(attrs.pp_acc.eq(0.0));
        assert!(attrs.pp > 0.0);
    }

    #[test]
    fn skill_breakdown_is_not_part_of_pp() {
        let attrs = attrs();
        let full = OsuPerformance::from(attrs.clone()).misses(1).calculate();

        let stripped = OsuDifficultyAttributes {
            jump: 0.0,
            flow: 0.0,
            precision: 0.0,
            stamina: 0.0,
            accuracy: 0.0,
            ..attrs
        };

        let without = OsuPerformance::from(stripped).misses(1).calculate();

        assert!(full.pp.eq(without.pp));
        assert!(full.pp_aim.eq(without.pp_aim));
        assert!(full.pp_jump_aim > without.pp_jump_aim);
        assert!(full.pp_precision > without.pp_precision);
        assert!(full.pp_stamina > without.pp_stamina);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn stable_accuracy_round_trip(acc in 60.0..=90.0_f64, misses in 0_u32..10) {
            let attrs = attrs();

            let state = OsuPerformance::from(attrs.clone())
                .lazer(false)
                .accuracy(acc)
                .misses(misses)
                .generate_state();

            prop_assert_eq!(state.total_hits(), attrs.n_objects());

            let actual = state.accuracy(OsuScoreOrigin::Stable) * 100.0;

            // One object is worth at most 300/36000 of the accuracy
            prop_assert!((actual - acc).abs() < 0.5, "{} vs {}", actual, acc);
        }

        #[test]
        fn more_misses_never_more_pp(misses in 0_u32..30) {
            let attrs = attrs();

            let calc = |misses: u32| {
                OsuPerformance::from(attrs.clone())
                    .n100(4)
                    .n50(0)
                    .misses(misses)
                    .calculate()
                    .pp
            };

            prop_assert!(calc(misses + 1) <= calc(misses));
        }

        #[test]
        fn more_combo_never_less_pp(combo in 1_u32..119) {
            let attrs = attrs();

            let calc = |combo: u32| {
                OsuPerformance::from(attrs.clone())
                    .misses(1)
                    .combo(combo)
                    .calculate()
                    .pp
            };

            prop_assert!(calc(combo + 1) >= calc(combo));
        }
    }
}
