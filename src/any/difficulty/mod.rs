use rosu_map::section::general::GameMode;

use crate::{
    catch, mania,
    model::{beatmap::Beatmap, mode::CalculateError, mods::GameMods},
    osu, taiko,
};

use super::{attributes::DifficultyAttributes, strains::Strains};

pub mod gradual;
pub mod skills;

/// Difficulty calculator on maps of any mode.
///
/// # Example
///
/// ```
/// use rosu_perf::{model::mode::GameMode, Beatmap, Difficulty, GameMods};
///
/// let map = Beatmap::from_path("./resources/osu.osu").unwrap();
///
/// let attrs = Difficulty::new()
///     .mods(GameMods::from_acronyms("HDHR", GameMode::Osu))
///     .lazer(false)
///     .calculate(&map);
///
/// println!("Stars: {}", attrs.stars());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct Difficulty {
    mods: GameMods,
    passed_objects: Option<u32>,
    clock_rate: Option<f64>,
    ar: Option<ModsDependent>,
    cs: Option<ModsDependent>,
    hp: Option<ModsDependent>,
    od: Option<ModsDependent>,
    hardrock_offsets: Option<bool>,
    lazer: Option<bool>,
}

/// A beatmap attribute override that may or may not still be modified by
/// mods.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModsDependent {
    pub value: f32,
    /// If `true`, the value is used as is. Otherwise, mods are applied on
    /// top of it.
    pub with_mods: bool,
}

impl ModsDependent {
    pub const fn new(value: f32) -> Self {
        Self {
            value,
            with_mods: false,
        }
    }
}

impl Difficulty {
    /// Create a new difficulty calculator.
    pub fn new() -> Self {
        Self {
            mods: GameMods::default(),
            passed_objects: None,
            clock_rate: None,
            ar: None,
            cs: None,
            hp: None,
            od: None,
            hardrock_offsets: None,
            lazer: None,
        }
    }

    /// Perform the difficulty calculation for the map's current mode.
    pub fn calculate(&self, map: &Beatmap) -> DifficultyAttributes {
        match map.mode {
            GameMode::Osu => DifficultyAttributes::Osu(osu::difficulty::difficulty(self, map)),
            GameMode::Taiko => {
                DifficultyAttributes::Taiko(taiko::difficulty::difficulty(self, map))
            }
            GameMode::Catch => {
                DifficultyAttributes::Catch(catch::difficulty::difficulty(self, map))
            }
            GameMode::Mania => {
                DifficultyAttributes::Mania(mania::difficulty::difficulty(self, map))
            }
        }
    }

    /// Perform the difficulty calculation for a specific mode.
    ///
    /// If the map is in a different mode, a converted copy is calculated
    /// instead. Fails if the map cannot be converted to `mode`.
    pub fn calculate_for_mode(
        &self,
        map: &Beatmap,
        mode: GameMode,
    ) -> Result<DifficultyAttributes, CalculateError> {
        let map = map.convert_ref(mode, &self.mods)?;

        Ok(self.calculate(&map))
    }

    /// Perform the difficulty calculation but instead of evaluating the skill
    /// strains, return them as is.
    ///
    /// Suitable to plot the difficulty of a map over time.
    pub fn strains(&self, map: &Beatmap) -> Strains {
        match map.mode {
            GameMode::Osu => Strains::Osu(osu::difficulty::strains(self, map)),
            GameMode::Taiko => Strains::Taiko(taiko::difficulty::strains(self, map)),
            GameMode::Catch => Strains::Catch(catch::difficulty::strains(self, map)),
            GameMode::Mania => Strains::Mania(mania::difficulty::strains(self, map)),
        }
    }

    /// Specify mods.
    pub fn mods(self, mods: GameMods) -> Self {
        Self { mods, ..self }
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    ///
    /// If you want to calculate the difficulty after every few objects,
    /// instead of using [`Difficulty`] multiple times with different
    /// `passed_objects`, you should use [`GradualDifficulty`].
    ///
    /// [`GradualDifficulty`]: crate::GradualDifficulty
    pub fn passed_objects(self, passed_objects: u32) -> Self {
        Self {
            passed_objects: Some(passed_objects),
            ..self
        }
    }

    /// Adjust the clock rate used in the calculation.
    ///
    /// If none is specified, it will take the clock rate based on the mods
    /// i.e. 1.5 for DT, 0.75 for HT and 1.0 otherwise.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | 0.01    | 100     |
    pub fn clock_rate(self, clock_rate: f64) -> Self {
        Self {
            clock_rate: Some(clock_rate.clamp(0.01, 100.0)),
            ..self
        }
    }

    /// Override a beatmap's set AR.
    ///
    /// Only relevant for osu! and osu!catch.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | -20     | 20      |
    pub fn ar(self, ar: f32, with_mods: bool) -> Self {
        Self {
            ar: Some(ModsDependent {
                value: ar.clamp(-20.0, 20.0),
                with_mods,
            }),
            ..self
        }
    }

    /// Override a beatmap's set CS.
    ///
    /// Only relevant for osu! and osu!catch.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | -20     | 20      |
    pub fn cs(self, cs: f32, with_mods: bool) -> Self {
        Self {
            cs: Some(ModsDependent {
                value: cs.clamp(-20.0, 20.0),
                with_mods,
            }),
            ..self
        }
    }

    /// Override a beatmap's set HP.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | -20     | 20      |
    pub fn hp(self, hp: f32, with_mods: bool) -> Self {
        Self {
            hp: Some(ModsDependent {
                value: hp.clamp(-20.0, 20.0),
                with_mods,
            }),
            ..self
        }
    }

    /// Override a beatmap's set OD.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | -20     | 20      |
    pub fn od(self, od: f32, with_mods: bool) -> Self {
        Self {
            od: Some(ModsDependent {
                value: od.clamp(-20.0, 20.0),
                with_mods,
            }),
            ..self
        }
    }

    /// Adjust patterns as if the HR mod is enabled.
    ///
    /// Only relevant for osu!catch.
    pub fn hardrock_offsets(self, hardrock_offsets: bool) -> Self {
        Self {
            hardrock_offsets: Some(hardrock_offsets),
            ..self
        }
    }

    /// Whether the calculated attributes belong to an osu!lazer or osu!stable
    /// score.
    ///
    /// Defaults to `true`.
    ///
    /// This affects osu!standard slider heads and osu!mania hit windows.
    pub fn lazer(self, lazer: bool) -> Self {
        Self {
            lazer: Some(lazer),
            ..self
        }
    }

    pub const fn get_mods(&self) -> &GameMods {
        &self.mods
    }

    pub const fn get_clock_rate(&self) -> Option<f64> {
        self.clock_rate
    }

    pub const fn get_ar(&self) -> Option<ModsDependent> {
        self.ar
    }

    pub const fn get_cs(&self) -> Option<ModsDependent> {
        self.cs
    }

    pub const fn get_hp(&self) -> Option<ModsDependent> {
        self.hp
    }

    pub const fn get_od(&self) -> Option<ModsDependent> {
        self.od
    }

    pub fn get_lazer(&self) -> bool {
        self.lazer.unwrap_or(true)
    }

    pub(crate) fn get_passed_objects(&self) -> usize {
        self.passed_objects.map_or(usize::MAX, |n| n as usize)
    }

    pub(crate) fn get_hardrock_offsets(&self) -> bool {
        self.hardrock_offsets
            .unwrap_or_else(|| self.mods.hardrock_offsets())
    }

    /// The clock rate of the calculation, the override taking precedence
    /// over the mods.
    pub(crate) fn get_rate(&self) -> f64 {
        self.clock_rate.unwrap_or_else(|| self.mods.rate())
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new()
    }
}
