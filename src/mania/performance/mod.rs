use std::{cmp, ops::RangeInclusive};

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
    attributes::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
    difficulty::difficulty,
    score_state::ManiaScoreState,
};

use self::calculator::ManiaPerformanceCalculator;

mod calculator;
pub mod gradual;

/// Hitresults in descending order of their value.
const N320: usize = 0;
const N300: usize = 1;
const N200: usize = 2;
const N100: usize = 3;
const N50: usize = 4;

/// Performance calculator on osu!mania maps.
///
/// # Example
///
/// ```
/// use rosu_perf::{any::HitResultPriority, model::mode::GameMode, Beatmap, GameMods};
/// use rosu_perf::mania::ManiaPerformance;
///
/// let map = Beatmap::from_path("./resources/mania.osu").unwrap();
///
/// let attrs = ManiaPerformance::try_new(&map)
///     .unwrap()
///     .mods(GameMods::from_acronyms("DT", GameMode::Mania))
///     .lazer(true)
///     .accuracy(97.5)
///     .misses(2)
///     .hitresult_priority(HitResultPriority::WorstCase)
///     .calculate();
///
/// println!("PP: {}", attrs.pp);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct ManiaPerformance<'map> {
    pub(crate) map_or_attrs: MapOrAttrs<'map, ManiaDifficultyAttributes>,
    pub(crate) difficulty: Difficulty,
    pub(crate) n320: Option<u32>,
    pub(crate) n300: Option<u32>,
    pub(crate) n200: Option<u32>,
    pub(crate) n100: Option<u32>,
    pub(crate) n50: Option<u32>,
    pub(crate) misses: Option<u32>,
    pub(crate) acc: Option<f64>,
    pub(crate) hitresult_priority: HitResultPriority,
}

impl<'map> ManiaPerformance<'map> {
    /// Create a new performance calculator for an osu!mania map.
    ///
    /// Fails if the map is neither an osu!mania map nor an osu!standard
    /// map that was converted. Use [`Beatmap::convert_ref`] to convert
    /// osu!standard maps first.
    pub fn try_new(
        map: impl Into<MapOrAttrs<'map, ManiaDifficultyAttributes>>,
    ) -> Result<Self, CalculateError> {
        let map_or_attrs = map.into();

        if let MapOrAttrs::Map(ref map) = map_or_attrs {
            if map.mode != GameMode::Mania {
                return Err(CalculateError::ModeMismatch {
                    expected: GameMode::Mania,
                    actual: map.mode,
                });
            }
        }

        Ok(Self::new_unchecked(map_or_attrs))
    }

    pub(crate) fn new_unchecked(map_or_attrs: MapOrAttrs<'map, ManiaDifficultyAttributes>) -> Self {
        Self {
            map_or_attrs,
            difficulty: Difficulty::new(),
            n320: None,
            n300: None,
            n200: None,
            n100: None,
            n50: None,
            misses: None,
            acc: None,
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
    /// instead of using [`ManiaPerformance`] multiple times with different
    /// `passed_objects`, you should use [`ManiaGradualPerformance`].
    ///
    /// [`ManiaGradualPerformance`]: crate::mania::ManiaGradualPerformance
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

    /// Specify the accuracy of a play between `0.0` and `100.0`.
    /// This will be used to generate matching hitresults.
    pub fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc.clamp(0.0, 100.0) / 100.0);

        self
    }

    /// Specify how hitresults should be generated.
    ///
    /// Defaults to [`HitResultPriority::BestCase`].
    pub const fn hitresult_priority(mut self, priority: HitResultPriority) -> Self {
        self.hitresult_priority = priority;

        self
    }

    /// Whether the calculated attributes belong to an osu!lazer or
    /// osu!stable score.
    ///
    /// Defaults to `true`.
    ///
    /// On lazer, 320s are worth more than 300s and hold notes are judged on
    /// both their head and their tail.
    pub fn lazer(mut self, lazer: bool) -> Self {
        self.difficulty = self.difficulty.lazer(lazer);

        self
    }

    /// Specify the amount of 320s of a play.
    pub const fn n320(mut self, n320: u32) -> Self {
        self.n320 = Some(n320);

        self
    }

    /// Specify the amount of 300s of a play.
    pub const fn n300(mut self, n300: u32) -> Self {
        self.n300 = Some(n300);

        self
    }

    /// Specify the amount of 200s of a play.
    pub const fn n200(mut self, n200: u32) -> Self {
        self.n200 = Some(n200);

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

    /// Provide parameters through a [`ManiaScoreState`].
    #[allow(clippy::needless_pass_by_value)]
    pub const fn state(mut self, state: ManiaScoreState) -> Self {
        let ManiaScoreState {
            n320,
            n300,
            n200,
            n100,
            n50,
            misses,
        } = state;

        self.n320 = Some(n320);
        self.n300 = Some(n300);
        self.n200 = Some(n200);
        self.n100 = Some(n100);
        self.n50 = Some(n50);
        self.misses = Some(misses);

        self
    }

    /// Create the [`ManiaScoreState`] that will be used for performance
    /// calculation.
    ///
    /// If the calculator still holds a beatmap, its difficulty attributes
    /// are calculated and stored in place of the map.
    pub fn generate_state(&mut self) -> ManiaScoreState {
        self.generate_state_with_attrs().0
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> ManiaPerformanceAttributes {
        let (state, attrs) = self.generate_state_with_attrs();

        ManiaPerformanceCalculator::new(attrs, self.difficulty.get_mods(), state).calculate()
    }

    fn attrs(&mut self) -> ManiaDifficultyAttributes {
        match self.map_or_attrs {
            MapOrAttrs::Map(ref map) => {
                let attrs = difficulty(&self.difficulty, map);

                self.map_or_attrs.insert_attrs(attrs)
            }
            MapOrAttrs::Attrs(ref attrs) => attrs.clone(),
        }
    }

    fn generate_state_with_attrs(&mut self) -> (ManiaScoreState, ManiaDifficultyAttributes) {
        let attrs = self.attrs();

        let classic = !self.difficulty.get_lazer() || self.difficulty.get_mods().cl();
        let passed_objects = u32::try_from(self.difficulty.get_passed_objects()).unwrap_or(u32::MAX);
        let mut n_objects = cmp::min(passed_objects, attrs.n_objects);

        // Hold notes are judged on their head and tail
        if !classic {
            n_objects += attrs.n_hold_notes;
        }

        let misses = self.misses.map_or(0, |n| cmp::min(n, n_objects));
        let given = [self.n320, self.n300, self.n200, self.n100, self.n50];

        // Given hitresults are clamped in order so they fit in the
        // non-missed objects
        let mut remaining = n_objects - misses;
        let mut counts = [0; 5];

        for (count, n) in counts.iter_mut().zip(given) {
            if let Some(n) = n {
                *count = cmp::min(n, remaining);
                remaining -= *count;
            }
        }

        let unknown: Vec<usize> = (0..given.len()).filter(|&i| given[i].is_none()).collect();

        let best_case = matches!(self.hitresult_priority, HitResultPriority::BestCase);

        match (self.acc, unknown.as_slice()) {
            (Some(_), []) | (None, []) => {
                let idx = if best_case { N320 } else { N50 };
                counts[idx] += remaining;
            }
            (Some(_), &[idx]) => counts[idx] += remaining,
            (Some(acc), _) => {
                counts = closest_to_acc(acc, counts, &given, n_objects - misses, misses, classic);

                if classic && given[N320].is_none() {
                    shift_by_priority(&mut counts, &given, best_case);
                }
            }
            (None, _) => {
                let idx = if best_case {
                    unknown.first()
                } else {
                    unknown.last()
                };

                if let Some(&idx) = idx {
                    counts[idx] += remaining;
                }
            }
        }

        let [n320, n300, n200, n100, n50] = counts;

        let state = ManiaScoreState {
            n320,
            n300,
            n200,
            n100,
            n50,
            misses,
        };

        tracing::trace!(?state, classic, "generated mania score state");

        self.store_state(state);

        (state, attrs)
    }

    const fn store_state(&mut self, state: ManiaScoreState) {
        self.n320 = Some(state.n320);
        self.n300 = Some(state.n300);
        self.n200 = Some(state.n200);
        self.n100 = Some(state.n100);
        self.n50 = Some(state.n50);
        self.misses = Some(state.misses);
    }
}

/// Search the hitresults whose accuracy is closest to `acc`.
///
/// Unknown counts are iterated from best to worst hitresult where each
/// count only spans the values that can still reach the target. Missing
/// hits are filled into the worst unknown hitresult.
fn closest_to_acc(
    acc: f64,
    counts: [u32; 5],
    given: &[Option<u32>; 5],
    n_remaining: u32,
    misses: u32,
    classic: bool,
) -> [u32; 5] {
    let n_objects = n_remaining + misses;
    let n = f64::from(n_remaining);
    let [_, g300, g200, g100, g50] = counts.map(f64::from);

    // On lazer a 320 is worth one more than a 300
    let extra = if classic { 0.0 } else { 1.0 };
    let target = acc * (60.0 + extra) * f64::from(n_objects);

    let fixed = |idx: usize| given[idx].map(|_| counts[idx]);

    let range = |min: f64, max: f64, remaining: u32, idx: usize| -> RangeInclusive<u32> {
        match fixed(idx) {
            Some(n) => n..=n,
            None => {
                cmp::min(min.floor() as u32, remaining)..=cmp::min(max.ceil() as u32, remaining)
            }
        }
    };

    let accuracy = |counts: [u32; 5]| {
        let [n320, n300, n200, n100, n50] = counts;

        ManiaScoreState {
            n320,
            n300,
            n200,
            n100,
            n50,
            misses,
        }
        .accuracy(classic)
    };

    let mut best = counts;
    best[N50] = n_remaining
        .saturating_sub(counts[N320] + counts[N300] + counts[N200] + counts[N100]);
    let mut best_dist = f64::INFINITY;

    let min_n320 = if classic {
        (target - 40.0 * n + 20.0 * g100 + 30.0 * g50) / 20.0 - g300
    } else {
        target - 60.0 * n + 20.0 * g200 + 40.0 * g100 + 50.0 * g50
    };

    let max_n320 = (target - (10.0 * n + 50.0 * g300 + 30.0 * g200 + 10.0 * g100)) / (50.0 + extra);
    let remaining = n_remaining.saturating_sub(counts[N300] + counts[N200] + counts[N100] + counts[N50]);

    for n320 in range(min_n320, max_n320, remaining, N320) {
        let x320 = f64::from(n320);
        let remaining = n_remaining.saturating_sub(n320 + counts[N200] + counts[N100] + counts[N50]);

        // Stable 300s are generated as 320s and shifted afterwards
        let (min_n300, max_n300) = if classic && given[N320].is_none() {
            (0.0, 0.0)
        } else {
            (
                (target - (40.0 * n + (20.0 + extra) * x320) + 20.0 * g100 + 30.0 * g50) / 20.0,
                (target - (10.0 * n + (50.0 + extra) * x320 + 30.0 * g200 + 10.0 * g100)) / 50.0,
            )
        };

        for n300 in range(min_n300, max_n300, remaining, N300) {
            let x300 = f64::from(n300);
            let top = (50.0 + extra) * x320 + 50.0 * x300;
            let remaining = n_remaining.saturating_sub(n320 + n300 + counts[N100] + counts[N50]);

            let min_n200 = (target - (20.0 * n + top) + 10.0 * g50) / 30.0;
            let max_n200 = (target - (10.0 * n + top + 10.0 * g100)) / 30.0;

            for n200 in range(min_n200, max_n200, remaining, N200) {
                let x200 = f64::from(n200);

                let n100s = fixed(N100).map_or_else(
                    || {
                        let remaining = n_remaining.saturating_sub(n320 + n300 + n200 + counts[N50]);

                        let raw = if given[N50].is_some() {
                            target - (19.0 * n + (41.0 + extra) * x320 + 41.0 * x300 + 21.0 * x200)
                                + 9.0 * g50
                        } else {
                            (target - (10.0 * n + top + 30.0 * x200)) / 10.0
                        };

                        [
                            cmp::min(raw.floor() as u32, remaining),
                            cmp::min(raw.ceil() as u32, remaining),
                        ]
                    },
                    |n100| [n100, n100],
                );

                for n100 in n100s {
                    let n50 = fixed(N50)
                        .unwrap_or_else(|| n_remaining.saturating_sub(n320 + n300 + n200 + n100));

                    let mut curr = [n320, n300, n200, n100, n50];
                    let total = curr.iter().sum::<u32>() + misses;

                    if total < n_objects {
                        let idx = [N50, N100, N200, N300, N320]
                            .into_iter()
                            .find(|&idx| given[idx].is_none())
                            .unwrap_or(N50);

                        curr[idx] += n_objects - total;
                    }

                    let dist = (acc - accuracy(curr)).abs();

                    if dist < best_dist {
                        best_dist = dist;
                        best = curr;
                    }
                }
            }
        }
    }

    best
}

/// On stable, 320s and 300s are worth the same for accuracy but 320s
/// are worth more for pp. Trade hitresults of equal accuracy value
/// depending on the priority.
fn shift_by_priority(counts: &mut [u32; 5], given: &[Option<u32>; 5], best_case: bool) {
    let n300_unknown = given[N300].is_none();
    let n200_unknown = given[N200].is_none();

    if n300_unknown {
        counts[N320] += counts[N300];
        counts[N300] = 0;
    }

    if best_case {
        // 200 + 200 = 320 + 100
        if given[N100].is_none() && n200_unknown {
            let n = counts[N200] / 2;
            counts[N320] += n;
            counts[N200] -= 2 * n;
            counts[N100] += n;
        }

        // 5 * 200 = 3 * 320 + 2 * 50
        if given[N50].is_none() && n200_unknown {
            let n = counts[N200] / 5;
            counts[N320] += 3 * n;
            counts[N200] -= 5 * n;
            counts[N50] += 2 * n;
        }
    } else {
        if given[N100].is_none() && n200_unknown {
            let n = cmp::min(counts[N320], counts[N100]);
            counts[N320] -= n;
            counts[N200] += 2 * n;
            counts[N100] -= n;
        }

        if given[N50].is_none() && n200_unknown {
            let n = cmp::min(counts[N320] / 3, counts[N50] / 2);
            counts[N320] -= 3 * n;
            counts[N200] += 5 * n;
            counts[N50] -= 2 * n;
        }

        if n300_unknown {
            counts[N300] += counts[N320];
            counts[N320] = 0;
        }
    }
}

impl<'map> TryFrom<&'map Beatmap> for ManiaPerformance<'map> {
    type Error = CalculateError;

    fn try_from(map: &'map Beatmap) -> Result<Self, Self::Error> {
        Self::try_new(map)
    }
}

impl From<ManiaDifficultyAttributes> for ManiaPerformance<'_> {
    fn from(attrs: ManiaDifficultyAttributes) -> Self {
        Self::new_unchecked(MapOrAttrs::Attrs(attrs))
    }
}

impl From<ManiaPerformanceAttributes> for ManiaPerformance<'_> {
    fn from(attrs: ManiaPerformanceAttributes) -> Self {
        Self::new_unchecked(MapOrAttrs::Attrs(attrs.difficulty))
    }
}
