use std::borrow::Cow;

use crate::{
    catch::{CatchDifficultyAttributes, CatchPerformance, CatchPerformanceAttributes},
    mania::{ManiaDifficultyAttributes, ManiaPerformance, ManiaPerformanceAttributes},
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, GameMode},
        mods::GameMods,
    },
    osu::{OsuDifficultyAttributes, OsuPerformance, OsuPerformanceAttributes},
    taiko::{TaikoDifficultyAttributes, TaikoPerformance, TaikoPerformanceAttributes},
    util::map_or_attrs::MapOrAttrs,
};

use super::{
    attributes::{DifficultyAttributes, PerformanceAttributes},
    difficulty::Difficulty,
    score_state::ScoreState,
};

/// Applies the same setter to the inner calculator, whatever its mode.
macro_rules! each_mode {
    ( $this:ident, $calc:ident => $setter:expr ) => {
        match $this {
            Self::Osu($calc) => Self::Osu($setter),
            Self::Taiko($calc) => Self::Taiko($setter),
            Self::Catch($calc) => Self::Catch($setter),
            Self::Mania($calc) => Self::Mania($setter),
        }
    };
}

pub mod gradual;

/// Performance calculator on maps of any mode.
///
/// # Example
///
/// ```
/// use rosu_perf::{model::mode::GameMode, Beatmap, GameMods, Performance};
///
/// let map = Beatmap::from_path("./resources/osu.osu").unwrap();
///
/// let attrs = Performance::new(&map)
///     .mods(GameMods::from_acronyms("HR", GameMode::Osu))
///     .accuracy(97.5)
///     .misses(2)
///     .calculate();
///
/// // Re-use the difficulty attributes for another score on the same map
/// let max_pp = attrs
///     .clone()
///     .performance()
///     .mods(GameMods::from_acronyms("HR", GameMode::Osu))
///     .calculate()
///     .pp();
///
/// println!("PP: {} / {max_pp}", attrs.pp());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub enum Performance<'map> {
    Osu(OsuPerformance<'map>),
    Taiko(TaikoPerformance<'map>),
    Catch(CatchPerformance<'map>),
    Mania(ManiaPerformance<'map>),
}

impl<'map> Performance<'map> {
    /// Create a new performance calculator for any mode.
    ///
    /// Accepts either a [`Beatmap`] or attributes from an earlier
    /// calculation, e.g. [`DifficultyAttributes`], [`PerformanceAttributes`],
    /// or their mode specific counterparts.
    ///
    /// A map means difficulty attributes have to be calculated first, so
    /// re-using attributes is much cheaper. Attributes are trusted to belong
    /// to the same map and [`Difficulty`] settings.
    pub fn new(map_or_attrs: impl Into<Self>) -> Self {
        map_or_attrs.into()
    }

    /// Calculate the performance attributes for the configured score.
    pub fn calculate(self) -> PerformanceAttributes {
        match self {
            Self::Osu(o) => PerformanceAttributes::Osu(o.calculate()),
            Self::Taiko(t) => PerformanceAttributes::Taiko(t.calculate()),
            Self::Catch(f) => PerformanceAttributes::Catch(f.calculate()),
            Self::Mania(m) => PerformanceAttributes::Mania(m.calculate()),
        }
    }

    /// Convert the contained osu!standard map to another mode.
    ///
    /// Requires a map so calculators created from attributes, or ones whose
    /// map was already consumed by [`Performance::generate_state`], fail.
    /// [`Difficulty`] settings carry over while score settings are dropped.
    pub fn try_mode(self, mode: GameMode) -> Result<Self, CalculateError> {
        let osu = match (self, mode) {
            (this @ Self::Osu(_), GameMode::Osu)
            | (this @ Self::Taiko(_), GameMode::Taiko)
            | (this @ Self::Catch(_), GameMode::Catch)
            | (this @ Self::Mania(_), GameMode::Mania) => return Ok(this),
            (Self::Osu(osu), _) => osu,
            (this, _) => {
                return Err(CalculateError::ModeMismatch {
                    expected: mode,
                    actual: this.mode(),
                })
            }
        };

        let OsuPerformance {
            map_or_attrs: MapOrAttrs::Map(map),
            difficulty,
            ..
        } = osu
        else {
            return Err(CalculateError::ModeMismatch {
                expected: mode,
                actual: GameMode::Osu,
            });
        };

        let map = match map {
            Cow::Borrowed(map) => map.convert_ref(mode, difficulty.get_mods())?,
            Cow::Owned(map) => Cow::Owned(map.convert(mode, difficulty.get_mods())?),
        };

        let this = match mode {
            GameMode::Osu => Self::Osu(OsuPerformance::new_unchecked(MapOrAttrs::Map(map))),
            GameMode::Taiko => Self::Taiko(TaikoPerformance::new_unchecked(MapOrAttrs::Map(map))),
            GameMode::Catch => Self::Catch(CatchPerformance::new_unchecked(MapOrAttrs::Map(map))),
            GameMode::Mania => Self::Mania(ManiaPerformance::new_unchecked(MapOrAttrs::Map(map))),
        };

        Ok(this.difficulty(difficulty))
    }

    /// The mode of the calculator.
    pub const fn mode(&self) -> GameMode {
        match self {
            Self::Osu(_) => GameMode::Osu,
            Self::Taiko(_) => GameMode::Taiko,
            Self::Catch(_) => GameMode::Catch,
            Self::Mania(_) => GameMode::Mania,
        }
    }

    /// Specify mods.
    pub fn mods(self, mods: GameMods) -> Self {
        each_mode!(self, calc => calc.mods(mods))
    }

    /// Use the specified settings of the given [`Difficulty`].
    pub fn difficulty(self, difficulty: Difficulty) -> Self {
        each_mode!(self, calc => calc.difficulty(difficulty))
    }

    /// Only consider the first `passed_objects` objects, e.g. for fails.
    ///
    /// Prefer [`GradualPerformance`] when calculating after every object.
    ///
    /// [`GradualPerformance`]: crate::GradualPerformance
    pub fn passed_objects(self, passed_objects: u32) -> Self {
        each_mode!(self, calc => calc.passed_objects(passed_objects))
    }

    /// Adjust the clock rate used in the calculation.
    ///
    /// See [`Difficulty::clock_rate`].
    pub fn clock_rate(self, clock_rate: f64) -> Self {
        each_mode!(self, calc => calc.clock_rate(clock_rate))
    }

    /// Override a beatmap's set AR.
    ///
    /// Only relevant for osu! and osu!catch.
    pub fn ar(self, ar: f32, with_mods: bool) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.ar(ar, with_mods)),
            Self::Catch(f) => Self::Catch(f.ar(ar, with_mods)),
            Self::Taiko(_) | Self::Mania(_) => self,
        }
    }

    /// Override a beatmap's set CS.
    ///
    /// Only relevant for osu! and osu!catch.
    pub fn cs(self, cs: f32, with_mods: bool) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.cs(cs, with_mods)),
            Self::Catch(f) => Self::Catch(f.cs(cs, with_mods)),
            Self::Taiko(_) | Self::Mania(_) => self,
        }
    }

    /// Override a beatmap's set HP.
    pub fn hp(self, hp: f32, with_mods: bool) -> Self {
        each_mode!(self, calc => calc.hp(hp, with_mods))
    }

    /// Override a beatmap's set OD.
    pub fn od(self, od: f32, with_mods: bool) -> Self {
        each_mode!(self, calc => calc.od(od, with_mods))
    }

    /// Adjust patterns as if the HR mod is enabled.
    ///
    /// Only relevant for osu!catch.
    pub fn hardrock_offsets(self, hardrock_offsets: bool) -> Self {
        if let Self::Catch(catch) = self {
            Self::Catch(catch.hardrock_offsets(hardrock_offsets))
        } else {
            self
        }
    }

    /// Provide parameters through a [`ScoreState`].
    pub fn state(self, state: ScoreState) -> Self {
        each_mode!(self, calc => calc.state(state.into()))
    }

    /// Accuracy between `0.0` and `100.0` that missing hitresults are
    /// generated for.
    pub fn accuracy(self, acc: f64) -> Self {
        each_mode!(self, calc => calc.accuracy(acc))
    }

    /// Specify the amount of misses of a play.
    pub fn misses(self, n_misses: u32) -> Self {
        each_mode!(self, calc => calc.misses(n_misses))
    }

    /// Specify the max combo of the play.
    ///
    /// Irrelevant for osu!mania.
    pub fn combo(self, combo: u32) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.combo(combo)),
            Self::Taiko(t) => Self::Taiko(t.combo(combo)),
            Self::Catch(f) => Self::Catch(f.combo(combo)),
            Self::Mania(_) => self,
        }
    }

    /// How generated hitresults are distributed.
    pub fn hitresult_priority(self, priority: HitResultPriority) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.hitresult_priority(priority)),
            Self::Taiko(t) => Self::Taiko(t.hitresult_priority(priority)),
            Self::Catch(_) => self,
            Self::Mania(m) => Self::Mania(m.hitresult_priority(priority)),
        }
    }

    /// Whether the score was set on lazer. Defaults to `true`.
    ///
    /// Stable ignores slider heads for accuracy and scores mania holds
    /// differently.
    pub fn lazer(self, lazer: bool) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.lazer(lazer)),
            Self::Taiko(_) | Self::Catch(_) => self,
            Self::Mania(m) => Self::Mania(m.lazer(lazer)),
        }
    }

    /// Specify the amount of "large tick" hits.
    ///
    /// Only relevant for osu!standard.
    ///
    /// See [`OsuPerformance::large_tick_hits`].
    pub fn large_tick_hits(self, large_tick_hits: u32) -> Self {
        if let Self::Osu(osu) = self {
            Self::Osu(osu.large_tick_hits(large_tick_hits))
        } else {
            self
        }
    }

    /// Specify the amount of "small tick" hits.
    ///
    /// Only relevant for osu!standard lazer scores without slider accuracy.
    /// In that case, this value is the amount of slider tail hits.
    pub fn small_tick_hits(self, small_tick_hits: u32) -> Self {
        if let Self::Osu(osu) = self {
            Self::Osu(osu.small_tick_hits(small_tick_hits))
        } else {
            self
        }
    }

    /// Specify the amount of hit slider ends.
    ///
    /// Only relevant for osu!standard lazer scores with slider accuracy.
    pub fn slider_end_hits(self, slider_end_hits: u32) -> Self {
        if let Self::Osu(osu) = self {
            Self::Osu(osu.slider_end_hits(slider_end_hits))
        } else {
            self
        }
    }

    /// Specify the amount of 300s of a play.
    pub fn n300(self, n300: u32) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.n300(n300)),
            Self::Taiko(t) => Self::Taiko(t.n300(n300)),
            Self::Catch(f) => Self::Catch(f.fruits(n300)),
            Self::Mania(m) => Self::Mania(m.n300(n300)),
        }
    }

    /// Specify the amount of 100s of a play.
    pub fn n100(self, n100: u32) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.n100(n100)),
            Self::Taiko(t) => Self::Taiko(t.n100(n100)),
            Self::Catch(f) => Self::Catch(f.droplets(n100)),
            Self::Mania(m) => Self::Mania(m.n100(n100)),
        }
    }

    /// Specify the amount of 50s of a play.
    ///
    /// Irrelevant for osu!taiko.
    pub fn n50(self, n50: u32) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.n50(n50)),
            Self::Taiko(_) => self,
            Self::Catch(f) => Self::Catch(f.tiny_droplets(n50)),
            Self::Mania(m) => Self::Mania(m.n50(n50)),
        }
    }

    /// Specify the amount of katus of a play.
    ///
    /// Only relevant for osu!catch for which it represents the amount of tiny
    /// droplet misses and osu!mania for which it repesents the amount of n200.
    pub fn n_katu(self, n_katu: u32) -> Self {
        match self {
            Self::Osu(_) | Self::Taiko(_) => self,
            Self::Catch(f) => Self::Catch(f.tiny_droplet_misses(n_katu)),
            Self::Mania(m) => Self::Mania(m.n200(n_katu)),
        }
    }

    /// Specify the amount of gekis of a play.
    ///
    /// Only relevant for osu!mania for which it repesents the
    /// amount of n320.
    pub fn n_geki(self, n_geki: u32) -> Self {
        match self {
            Self::Osu(_) | Self::Taiko(_) | Self::Catch(_) => self,
            Self::Mania(m) => Self::Mania(m.n320(n_geki)),
        }
    }

    /// Create the [`ScoreState`] that will be used for performance calculation.
    pub fn generate_state(&mut self) -> ScoreState {
        match self {
            Self::Osu(o) => o.generate_state().into(),
            Self::Taiko(t) => t.generate_state().into(),
            Self::Catch(f) => f.generate_state().into(),
            Self::Mania(m) => m.generate_state().into(),
        }
    }
}

/// While generating remaining hitresults, decide how they should be distributed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum HitResultPriority {
    /// Prioritize good hitresults over bad ones
    #[default]
    BestCase,
    /// Prioritize bad hitresults over good ones
    WorstCase,
}

impl<'map> From<&'map Beatmap> for Performance<'map> {
    fn from(map: &'map Beatmap) -> Self {
        from_map(Cow::Borrowed(map))
    }
}

impl From<Beatmap> for Performance<'_> {
    fn from(map: Beatmap) -> Self {
        from_map(Cow::Owned(map))
    }
}

fn from_map(map: Cow<'_, Beatmap>) -> Performance<'_> {
    match map.mode {
        GameMode::Osu => Performance::Osu(OsuPerformance::new_unchecked(MapOrAttrs::Map(map))),
        GameMode::Taiko => {
            Performance::Taiko(TaikoPerformance::new_unchecked(MapOrAttrs::Map(map)))
        }
        GameMode::Catch => {
            Performance::Catch(CatchPerformance::new_unchecked(MapOrAttrs::Map(map)))
        }
        GameMode::Mania => {
            Performance::Mania(ManiaPerformance::new_unchecked(MapOrAttrs::Map(map)))
        }
    }
}

impl From<DifficultyAttributes> for Performance<'_> {
    fn from(attrs: DifficultyAttributes) -> Self {
        match attrs {
            DifficultyAttributes::Osu(attrs) => Self::Osu(attrs.into()),
            DifficultyAttributes::Taiko(attrs) => Self::Taiko(attrs.into()),
            DifficultyAttributes::Catch(attrs) => Self::Catch(attrs.into()),
            DifficultyAttributes::Mania(attrs) => Self::Mania(attrs.into()),
        }
    }
}

impl From<PerformanceAttributes> for Performance<'_> {
    fn from(attrs: PerformanceAttributes) -> Self {
        DifficultyAttributes::from(attrs).into()
    }
}

macro_rules! from_mode_attrs {
    ( $mode:ident: $difficulty:ident, $performance:ident ) => {
        impl From<$difficulty> for Performance<'_> {
            fn from(attrs: $difficulty) -> Self {
                Self::$mode(attrs.into())
            }
        }

        impl From<$performance> for Performance<'_> {
            fn from(attrs: $performance) -> Self {
                Self::$mode(attrs.into())
            }
        }
    };
}

from_mode_attrs!(Osu: OsuDifficultyAttributes, OsuPerformanceAttributes);
from_mode_attrs!(Taiko: TaikoDifficultyAttributes, TaikoPerformanceAttributes);
from_mode_attrs!(Catch: CatchDifficultyAttributes, CatchPerformanceAttributes);
from_mode_attrs!(Mania: ManiaDifficultyAttributes, ManiaPerformanceAttributes);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create() {
        let map = Beatmap::default();

        let _ = Performance::new(&map);
        let _ = Performance::new(map.clone());

        let _ = Performance::new(OsuDifficultyAttributes::default());
        let _ = Performance::new(TaikoDifficultyAttributes::default());
        let _ = Performance::new(CatchDifficultyAttributes::default());
        let _ = Performance::new(ManiaDifficultyAttributes::default());

        let _ = Performance::new(OsuPerformanceAttributes::default());
        let _ = Performance::new(TaikoPerformanceAttributes::default());
        let _ = Performance::new(CatchPerformanceAttributes::default());
        let _ = Performance::new(ManiaPerformanceAttributes::default());

        let _ = Performance::new(DifficultyAttributes::Osu(OsuDifficultyAttributes::default()));
        let _ = Performance::new(PerformanceAttributes::Taiko(
            TaikoPerformanceAttributes::default(),
        ));

        let _ = DifficultyAttributes::Osu(OsuDifficultyAttributes::default()).performance();
        let _ = PerformanceAttributes::Taiko(TaikoPerformanceAttributes::default()).performance();
    }

    #[test]
    fn mode_follows_input() {
        let map = Beatmap {
            mode: GameMode::Mania,
            ..Default::default()
        };

        assert_eq!(Performance::new(&map).mode(), GameMode::Mania);
        assert_eq!(
            Performance::new(CatchDifficultyAttributes::default()).mode(),
            GameMode::Catch
        );
    }

    #[test]
    fn try_mode_converts_osu_maps() {
        let map = Beatmap::default();

        let performance = Performance::new(&map).try_mode(GameMode::Taiko).unwrap();
        assert_eq!(performance.mode(), GameMode::Taiko);

        let performance = Performance::new(&map).try_mode(GameMode::Osu).unwrap();
        assert_eq!(performance.mode(), GameMode::Osu);
    }

    #[test]
    fn try_mode_fails_without_map() {
        let res = Performance::new(OsuDifficultyAttributes::default()).try_mode(GameMode::Catch);

        assert!(matches!(res, Err(CalculateError::ModeMismatch { .. })));

        let taiko = Beatmap {
            mode: GameMode::Taiko,
            ..Default::default()
        };

        let res = Performance::new(&taiko).try_mode(GameMode::Mania);

        assert!(matches!(res, Err(CalculateError::ModeMismatch { .. })));
    }

    #[test]
    fn priority_defaults_to_best_case() {
        assert_eq!(HitResultPriority::default(), HitResultPriority::BestCase);
    }
}
