use std::{borrow::Cow, io, path::Path, str::FromStr};

use rosu_map::{
    section::{general::GameMode, hit_objects::hit_samples::HitSoundType},
    LATEST_FORMAT_VERSION,
};

pub use rosu_map::section::events::BreakPeriod;

use crate::{mania, taiko, GameMods};

pub use self::{
    attributes::{BeatmapAttributes, BeatmapAttributesBuilder, HitWindows},
    decode::{BeatmapState, ParseBeatmapError},
    suspicious::TooSuspicious,
};

use super::{
    control_point::{point_at, timing_point_at, DifficultyPoint, EffectPoint, TimingPoint},
    hit_object::HitObject,
    mode::ConvertError,
};

mod attributes;
mod bpm;
mod decode;
mod suspicious;

/// All beatmap data that is relevant for difficulty and performance
/// calculation.
///
/// # Example
///
/// ```
/// use rosu_perf::{model::mode::GameMode, Beatmap, GameMods};
///
/// let map = Beatmap::from_path("./resources/osu.osu").unwrap();
/// assert_eq!(map.mode, GameMode::Osu);
///
/// let taiko = map.convert_ref(GameMode::Taiko, &GameMods::default()).unwrap();
/// assert!(taiko.is_convert);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Beatmap {
    pub version: i32,
    pub is_convert: bool,

    // General
    pub stack_leniency: f32,
    pub mode: GameMode,

    // Difficulty
    pub ar: f32,
    pub cs: f32,
    pub hp: f32,
    pub od: f32,
    pub slider_multiplier: f64,
    pub slider_tick_rate: f64,

    // Events
    pub breaks: Vec<BreakPeriod>,

    // TimingPoints
    pub timing_points: Vec<TimingPoint>,
    pub difficulty_points: Vec<DifficultyPoint>,
    pub effect_points: Vec<EffectPoint>,

    // HitObjects
    pub hit_objects: Vec<HitObject>,
    pub hit_sounds: Vec<HitSoundType>,
}

impl Beatmap {
    /// Decode the `.osu` file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        rosu_map::from_path(path)
    }

    /// Decode the raw content of a `.osu` file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, io::Error> {
        rosu_map::from_bytes(bytes)
    }

    /// The mode the map is currently in.
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// Builder for AR, OD, CS, and HP after mods and clock rate.
    pub fn attributes(&self) -> BeatmapAttributesBuilder {
        BeatmapAttributesBuilder::from(self)
    }

    /// The beats per minute of the map.
    pub fn bpm(&self) -> f64 {
        bpm::bpm(self.hit_objects.last(), &self.timing_points)
    }

    /// Total duration of all breaks in milliseconds.
    pub fn total_break_time(&self) -> f64 {
        self.breaks.iter().map(BreakPeriod::duration).sum()
    }

    /// Finds the [`TimingPoint`] that is active at the given time.
    pub(crate) fn timing_point_at(&self, time: f64) -> Option<&TimingPoint> {
        timing_point_at(&self.timing_points, time)
    }

    /// Finds the [`DifficultyPoint`] that is active at the given time.
    pub(crate) fn difficulty_point_at(&self, time: f64) -> Option<&DifficultyPoint> {
        point_at(&self.difficulty_points, time)
    }

    /// Finds the [`EffectPoint`] that is active at the given time.
    pub(crate) fn effect_point_at(&self, time: f64) -> Option<&EffectPoint> {
        point_at(&self.effect_points, time)
    }

    /// Convert an osu!standard map into `mode`.
    pub fn convert(mut self, mode: GameMode, mods: &GameMods) -> Result<Self, ConvertError> {
        self.convert_mut(mode, mods)?;

        Ok(self)
    }

    /// Like [`Beatmap::convert`] but only clones if the mode differs.
    pub fn convert_ref(
        &self,
        mode: GameMode,
        mods: &GameMods,
    ) -> Result<Cow<'_, Self>, ConvertError> {
        if self.mode == mode {
            return Ok(Cow::Borrowed(self));
        }

        self.check_convertible(mode)?;

        let mut map = self.to_owned();
        map.convert_unchecked(mode, mods);

        Ok(Cow::Owned(map))
    }

    /// Convert the map in place. Errors leave it untouched.
    pub fn convert_mut(&mut self, mode: GameMode, mods: &GameMods) -> Result<(), ConvertError> {
        if self.mode == mode {
            return Ok(());
        }

        self.check_convertible(mode)?;
        self.convert_unchecked(mode, mods);

        Ok(())
    }

    fn check_convertible(&self, mode: GameMode) -> Result<(), ConvertError> {
        if self.is_convert {
            Err(ConvertError::AlreadyConverted)
        } else if self.mode != GameMode::Osu {
            Err(ConvertError::Convert {
                from: self.mode,
                to: mode,
            })
        } else {
            Ok(())
        }
    }

    fn convert_unchecked(&mut self, mode: GameMode, mods: &GameMods) {
        tracing::debug!(
            from = ?self.mode,
            to = ?mode,
            n_objects = self.hit_objects.len(),
            "converting beatmap"
        );

        match mode {
            GameMode::Taiko => taiko::convert::convert(self),
            // Fruits and droplets are created during calculation
            GameMode::Catch => {}
            GameMode::Mania => mania::convert::convert(self, mods),
            GameMode::Osu => return,
        }

        self.mode = mode;
        self.is_convert = true;
    }

    /// Reject maps that look like they were made to stress the game rather
    /// than to be played.
    ///
    /// Calculations on such maps may take very long. Whether to skip them is
    /// up to the caller.
    pub fn check_suspicion(&self) -> Result<(), TooSuspicious> {
        TooSuspicious::new(self).map_or(Ok(()), Err)
    }
}

impl FromStr for Beatmap {
    type Err = io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        rosu_map::from_str(s)
    }
}

const DEFAULT_STACK_LENIENCY: f32 = 0.7;

impl Default for Beatmap {
    fn default() -> Self {
        Self {
            version: LATEST_FORMAT_VERSION,
            is_convert: false,
            stack_leniency: DEFAULT_STACK_LENIENCY,
            mode: GameMode::default(),
            ar: 5.0,
            cs: 5.0,
            hp: 5.0,
            od: 5.0,
            slider_multiplier: 1.4,
            slider_tick_rate: 1.0,
            breaks: Vec::default(),
            timing_points: Vec::default(),
            difficulty_points: Vec::default(),
            effect_points: Vec::default(),
            hit_objects: Vec::default(),
            hit_sounds: Vec::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::hit_object::{HitObjectKind, Pos};

    use super::*;

    fn osu_map() -> Beatmap {
        Beatmap {
            hit_objects: vec![HitObject {
                pos: Pos::new(100.0, 100.0),
                start_time: 500.0,
                kind: HitObjectKind::Circle,
            }],
            hit_sounds: vec![HitSoundType::default()],
            ..Default::default()
        }
    }

    #[test]
    fn same_mode_is_noop() {
        let map = osu_map();
        let converted = map
            .convert_ref(GameMode::Osu, &GameMods::default())
            .unwrap();

        assert!(matches!(converted, Cow::Borrowed(_)));
    }

    #[test]
    fn convert_only_once() {
        let mut map = osu_map();
        let mods = GameMods::default();

        map.convert_mut(GameMode::Taiko, &mods).unwrap();
        assert_eq!(map.mode, GameMode::Taiko);
        assert!(map.is_convert);

        let before = map.clone();
        assert_eq!(
            map.convert_mut(GameMode::Catch, &mods),
            Err(ConvertError::AlreadyConverted)
        );
        assert_eq!(map, before);
    }

    #[test]
    fn non_osu_maps_are_not_convertible() {
        let mut map = Beatmap {
            mode: GameMode::Mania,
            ..osu_map()
        };

        assert_eq!(
            map.convert_mut(GameMode::Taiko, &GameMods::default()),
            Err(ConvertError::Convert {
                from: GameMode::Mania,
                to: GameMode::Taiko
            })
        );
        assert_eq!(map.mode, GameMode::Mania);
    }
}
