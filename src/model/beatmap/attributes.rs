use rosu_map::section::general::GameMode;

use crate::{
    any::difficulty::{Difficulty, ModsDependent},
    model::mods::GameMods,
    util::difficulty::difficulty_range,
};

use super::Beatmap;

/// Summary struct for a [`Beatmap`]'s attributes.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BeatmapAttributes {
    /// The approach rate.
    pub ar: f64,
    /// The overall difficulty.
    pub od: f64,
    /// The circle size.
    pub cs: f64,
    /// The health drain rate
    pub hp: f64,
    /// The clock rate with respect to mods.
    pub clock_rate: f64,
    /// The hit windows for approach rate and overall difficulty.
    pub hit_windows: HitWindows,
}

/// AR and OD hit windows in milliseconds, adjusted to the clock rate.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct HitWindows {
    /// Hit window for approach rate i.e. `TimePreempt`.
    pub ar: f64,
    /// Hit window for a "Great" hit.
    pub od_great: f64,
    /// Hit window for an "Ok" hit. Only available for osu!standard and
    /// osu!taiko.
    pub od_ok: Option<f64>,
    /// Hit window for a "Meh" hit. Only available for osu!standard.
    pub od_meh: Option<f64>,
}

/// A builder for [`BeatmapAttributes`] and [`HitWindows`].
///
/// # Example
///
/// ```
/// use rosu_perf::{model::{beatmap::BeatmapAttributesBuilder, mode::GameMode}, GameMods};
///
/// let attrs = BeatmapAttributesBuilder::new()
///     .ar(8.5, false)
///     .mods(GameMods::from_acronyms("HR", GameMode::Osu))
///     .build();
///
/// assert!((attrs.ar - 10.0).abs() < f64::EPSILON);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct BeatmapAttributesBuilder {
    mode: GameMode,
    is_convert: bool,
    ar: ModsDependent,
    od: ModsDependent,
    cs: ModsDependent,
    hp: ModsDependent,
    mods: GameMods,
    clock_rate: Option<f64>,
}

impl BeatmapAttributesBuilder {
    const PREEMPT_MIN: f64 = 450.0;
    const PREEMPT_MID: f64 = 1200.0;
    const PREEMPT_MAX: f64 = 1800.0;

    const OSU_GREAT: [f64; 3] = [80.0, 50.0, 20.0];
    const OSU_OK: [f64; 3] = [140.0, 100.0, 60.0];
    const OSU_MEH: [f64; 3] = [200.0, 150.0, 100.0];

    const TAIKO_GREAT: [f64; 3] = [50.0, 35.0, 20.0];
    const TAIKO_OK: [f64; 3] = [120.0, 80.0, 50.0];

    /// Create a new [`BeatmapAttributesBuilder`].
    ///
    /// The mode will be `GameMode::Osu` and attributes are set to `5.0`.
    pub fn new() -> Self {
        Self {
            mode: GameMode::Osu,
            is_convert: false,
            ar: ModsDependent::new(5.0),
            od: ModsDependent::new(5.0),
            cs: ModsDependent::new(5.0),
            hp: ModsDependent::new(5.0),
            mods: GameMods::default(),
            clock_rate: None,
        }
    }

    /// Use the given [`Beatmap`]'s attributes, mode, and convert status.
    pub fn map(self, map: &Beatmap) -> Self {
        Self {
            mode: map.mode,
            is_convert: map.is_convert,
            ar: ModsDependent::new(map.ar),
            od: ModsDependent::new(map.od),
            cs: ModsDependent::new(map.cs),
            hp: ModsDependent::new(map.hp),
            ..self
        }
    }

    /// Specify the approach rate.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub fn ar(self, ar: f32, with_mods: bool) -> Self {
        Self {
            ar: ModsDependent {
                value: ar,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the overall difficulty.
    ///
    /// See [`BeatmapAttributesBuilder::ar`] for the meaning of `with_mods`.
    pub fn od(self, od: f32, with_mods: bool) -> Self {
        Self {
            od: ModsDependent {
                value: od,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the circle size.
    ///
    /// See [`BeatmapAttributesBuilder::ar`] for the meaning of `with_mods`.
    pub fn cs(self, cs: f32, with_mods: bool) -> Self {
        Self {
            cs: ModsDependent {
                value: cs,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the drain rate.
    ///
    /// See [`BeatmapAttributesBuilder::ar`] for the meaning of `with_mods`.
    pub fn hp(self, hp: f32, with_mods: bool) -> Self {
        Self {
            hp: ModsDependent {
                value: hp,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the mods.
    pub fn mods(self, mods: GameMods) -> Self {
        Self { mods, ..self }
    }

    /// Specify a custom clock rate.
    pub fn clock_rate(self, clock_rate: f64) -> Self {
        Self {
            clock_rate: Some(clock_rate),
            ..self
        }
    }

    /// Specify a [`GameMode`] and whether it's a converted map.
    pub fn mode(self, mode: GameMode, is_convert: bool) -> Self {
        Self {
            mode,
            is_convert,
            ..self
        }
    }

    /// Specify all settings through [`Difficulty`].
    pub fn difficulty(self, difficulty: &Difficulty) -> Self {
        Self {
            ar: difficulty.get_ar().unwrap_or(self.ar),
            od: difficulty.get_od().unwrap_or(self.od),
            cs: difficulty.get_cs().unwrap_or(self.cs),
            hp: difficulty.get_hp().unwrap_or(self.hp),
            mods: difficulty.get_mods().clone(),
            clock_rate: difficulty.get_clock_rate(),
            ..self
        }
    }

    fn get_clock_rate(&self) -> f64 {
        self.clock_rate.unwrap_or_else(|| self.mods.rate())
    }

    /// The value of an attribute after applying `HardRock`, `Easy`, and
    /// custom values of `DifficultyAdjust`.
    fn apply_mods(
        &self,
        attr: ModsDependent,
        custom: Option<f64>,
        hr_factor: f32,
        ez_factor: f32,
    ) -> f64 {
        if attr.with_mods {
            return f64::from(attr.value);
        }

        if let Some(custom) = custom {
            return custom;
        }

        let value = if self.mods.hr() {
            (attr.value * hr_factor).min(10.0)
        } else if self.mods.ez() {
            attr.value * ez_factor
        } else {
            attr.value
        };

        f64::from(value)
    }

    fn raw_ar(&self) -> f64 {
        self.apply_mods(self.ar, self.mods.custom_ar(), 1.4, 0.5)
    }

    fn raw_od(&self) -> f64 {
        self.apply_mods(self.od, self.mods.custom_od(), 1.4, 0.5)
    }

    /// Calculate the AR and OD hit windows.
    pub fn hit_windows(&self) -> HitWindows {
        let clock_rate = self.get_clock_rate();

        let ar_clock_rate = if self.ar.with_mods { 1.0 } else { clock_rate };
        let od_clock_rate = if self.od.with_mods { 1.0 } else { clock_rate };

        let range = |od: f64, [min, mid, max]: [f64; 3]| {
            difficulty_range(od, min, mid, max) / od_clock_rate
        };

        let preempt = difficulty_range(
            self.raw_ar(),
            Self::PREEMPT_MAX,
            Self::PREEMPT_MID,
            Self::PREEMPT_MIN,
        ) / ar_clock_rate;

        let raw_od = self.raw_od();

        let (od_great, od_ok, od_meh) = match self.mode {
            GameMode::Osu => (
                range(raw_od, Self::OSU_GREAT),
                Some(range(raw_od, Self::OSU_OK)),
                Some(range(raw_od, Self::OSU_MEH)),
            ),
            GameMode::Taiko => (
                range(raw_od, Self::TAIKO_GREAT),
                Some(range(raw_od, Self::TAIKO_OK)),
                None,
            ),
            GameMode::Catch => (range(raw_od, Self::OSU_GREAT), None, None),
            GameMode::Mania => (self.mania_great_hit_window(od_clock_rate), None, None),
        };

        HitWindows {
            ar: preempt,
            od_great,
            od_ok,
            od_meh,
        }
    }

    fn mania_great_hit_window(&self, od_clock_rate: f64) -> f64 {
        let od = self.od.value;

        let mut value = if !self.is_convert {
            34.0 + 3.0 * (10.0 - od).clamp(0.0, 10.0)
        } else if od.round_ties_even() > 4.0 {
            34.0
        } else {
            47.0
        };

        if !self.od.with_mods {
            if self.mods.hr() {
                value /= 1.4;
            } else if self.mods.ez() {
                value *= 1.4;
            }
        }

        ((f64::from(value) * od_clock_rate).floor() / od_clock_rate).ceil()
    }

    /// Calculate the [`BeatmapAttributes`].
    pub fn build(&self) -> BeatmapAttributes {
        let clock_rate = self.get_clock_rate();

        let hp = self.apply_mods(self.hp, self.mods.custom_hp(), 1.4, 0.5);
        let cs = self.apply_mods(self.cs, self.mods.custom_cs(), 1.3, 0.5);

        let hit_windows = self.hit_windows();
        let HitWindows { ar, od_great, .. } = hit_windows;

        let ar = if ar > Self::PREEMPT_MID {
            (Self::PREEMPT_MAX - ar) / 120.0
        } else {
            (Self::PREEMPT_MID - ar) / 150.0 + 5.0
        };

        let od = match self.mode {
            GameMode::Osu => (Self::OSU_GREAT[0] - od_great) / 6.0,
            GameMode::Taiko => {
                let [min, mid, _] = Self::TAIKO_GREAT;

                (min - od_great) / (min - mid) * 5.0
            }
            GameMode::Catch | GameMode::Mania => self.raw_od(),
        };

        BeatmapAttributes {
            ar,
            od,
            cs,
            hp,
            clock_rate,
            hit_windows,
        }
    }
}

impl From<&Beatmap> for BeatmapAttributesBuilder {
    fn from(map: &Beatmap) -> Self {
        Self::new().map(map)
    }
}

impl Default for BeatmapAttributesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
