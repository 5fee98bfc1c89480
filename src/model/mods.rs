use std::fmt::{Debug, Formatter, Result as FmtResult};

use rosu_mods::{
    generated_mods::{
        DifficultyAdjustCatch, DifficultyAdjustMania, DifficultyAdjustOsu, DifficultyAdjustTaiko,
        UnknownMod,
    },
    serde::{GameModSeed, GameModsSeed},
    Acronym, GameMod, GameModIntermode, GameModsIntermode,
};
use serde::{de::DeserializeSeed, Serialize, Serializer};

use super::mode::{to_mods_mode, GameMode};

/// Collection of game mods for a specific [`GameMode`].
///
/// Mods unknown to the mode are kept but have no effect on any calculation.
/// Use [`GameMods::remove_unknown_mods`] to drop them.
///
/// # Example
///
/// ```
/// use rosu_perf::{model::mode::GameMode, GameMods};
///
/// let mut mods = GameMods::from_acronyms("HDDT", GameMode::Osu);
/// assert!(mods.contains("DT"));
/// assert_eq!(mods.clock_rate(), Some(1.5));
///
/// assert!(mods.insert("HR"));
/// assert_eq!(mods.len(), 3);
/// ```
#[derive(Clone, PartialEq)]
pub struct GameMods {
    inner: rosu_mods::GameMods,
    mode: GameMode,
}

/// Error when parsing [`GameMods`] from JSON.
#[derive(Debug, thiserror::Error)]
#[error("failed to parse mods")]
pub struct ParseModsError(#[from] serde_json::Error);

impl GameMods {
    /// Empty mods for the given mode.
    pub fn new(mode: GameMode) -> Self {
        Self {
            inner: rosu_mods::GameMods::new(),
            mode,
        }
    }

    /// Parse a concatenation of acronyms such as `"HDHR"`.
    ///
    /// Acronyms unknown for the mode are kept as inert mods.
    pub fn from_acronyms(acronyms: &str, mode: GameMode) -> Self {
        let intermode = GameModsIntermode::from_acronyms(acronyms);

        Self::from_intermode(&intermode, mode)
    }

    /// Create mods from legacy bitflags.
    pub fn from_bits(bits: u32, mode: GameMode) -> Self {
        let intermode = GameModsIntermode::from_bits(bits);

        Self::from_intermode(&intermode, mode)
    }

    fn from_intermode(intermode: &GameModsIntermode, mode: GameMode) -> Self {
        Self {
            inner: rosu_mods::GameMods::from_intermode(intermode, to_mods_mode(mode)),
            mode,
        }
    }

    /// Parse the JSON representation of osu!lazer mods, i.e. a list of
    /// objects with an `acronym` and optional `settings`.
    ///
    /// With `deny_unknown_fields`, a settings key that the mod does not
    /// define is an error instead of being ignored.
    pub fn from_json(
        json: &str,
        mode: GameMode,
        deny_unknown_fields: bool,
    ) -> Result<Self, ParseModsError> {
        let mut deserializer = serde_json::Deserializer::from_str(json);

        let seed = GameModsSeed::Mode {
            mode: to_mods_mode(mode),
            deny_unknown_fields,
        };

        let inner = seed.deserialize(&mut deserializer)?;
        deserializer.end()?;

        let this = Self { inner, mode };

        let unknown = this.count_unknown();

        if unknown > 0 {
            tracing::warn!(unknown, ?mode, "keeping unknown mods as inert mods");
        }

        Ok(this)
    }

    /// Serialize into the JSON representation of osu!lazer mods.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.inner)
    }

    /// The mode these mods were created for.
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// Add a mod by its acronym.
    ///
    /// Returns `false` and leaves the mods unchanged if the acronym is
    /// malformed or if the mod is incompatible with the current mods.
    pub fn insert(&mut self, acronym: &str) -> bool {
        if acronym.parse::<Acronym>().is_err() {
            return false;
        }

        self.insert_checked(GameMod::new(acronym, to_mods_mode(self.mode)))
    }

    /// Add a mod given in its JSON representation.
    ///
    /// Returns `false` if the JSON is malformed, if `deny_unknown_fields`
    /// is set and the settings contain an unknown key, or if the mod is
    /// incompatible with the current mods.
    pub fn insert_json(&mut self, json: &str, deny_unknown_fields: bool) -> bool {
        let mut deserializer = serde_json::Deserializer::from_str(json);

        let seed = GameModSeed::Mode {
            mode: to_mods_mode(self.mode),
            deny_unknown_fields,
        };

        match seed.deserialize(&mut deserializer) {
            Ok(gamemod) => self.insert_checked(gamemod),
            Err(_) => false,
        }
    }

    fn insert_checked(&mut self, gamemod: GameMod) -> bool {
        let mut updated = self.inner.clone();
        updated.insert(gamemod);

        // Sanitizing drops incompatible mods so a change in length means
        // the new mod clashed with an existing one.
        let len = updated.len();
        updated.sanitize();

        if updated.len() != len {
            return false;
        }

        self.inner = updated;

        true
    }

    /// Whether a mod with the given acronym is contained.
    pub fn contains(&self, acronym: &str) -> bool {
        acronym
            .parse::<Acronym>()
            .is_ok_and(|acronym| self.inner.contains_acronym(acronym))
    }

    /// Amount of contained mods.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no mods are contained.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Remove all mods.
    pub fn clear(&mut self) {
        self.inner = rosu_mods::GameMods::new();
    }

    /// Legacy bitflags of the mods; mods without a bit are ignored.
    pub fn bits(&self) -> u32 {
        self.inner.bits()
    }

    /// Remove mods that are incompatible with each other.
    pub fn sanitize(&mut self) {
        self.inner.sanitize();
    }

    /// Remove all mods that are unknown to the mode.
    pub fn remove_unknown_mods(&mut self) {
        self.inner = self
            .inner
            .clone()
            .into_iter()
            .filter(|gamemod| gamemod.kind() != UnknownMod::kind())
            .collect();
    }

    fn count_unknown(&self) -> usize {
        self.inner
            .iter()
            .filter(|gamemod| gamemod.kind() == UnknownMod::kind())
            .count()
    }

    /// The clock rate of the mods.
    ///
    /// Returns `None` if no rate changing mod is contained. Custom speed
    /// settings such as `speed_change` are taken into account.
    pub fn clock_rate(&self) -> Option<f64> {
        const RATE_MODS: [GameModIntermode; 7] = [
            GameModIntermode::DoubleTime,
            GameModIntermode::Nightcore,
            GameModIntermode::HalfTime,
            GameModIntermode::Daycore,
            GameModIntermode::WindUp,
            GameModIntermode::WindDown,
            GameModIntermode::AdaptiveSpeed,
        ];

        if RATE_MODS
            .into_iter()
            .any(|gamemod| self.inner.contains_intermode(gamemod))
        {
            self.inner.clock_rate()
        } else {
            None
        }
    }

    /// The clock rate used in calculations.
    ///
    /// Variable rates such as `WindUp` count as `1.0`.
    pub(crate) fn rate(&self) -> f64 {
        self.clock_rate().unwrap_or(1.0)
    }

    /// Whether catch objects are offset the way `HardRock` does it.
    pub(crate) fn hardrock_offsets(&self) -> bool {
        self.inner
            .iter()
            .find_map(|gamemod| match gamemod {
                GameMod::DifficultyAdjustCatch(DifficultyAdjustCatch {
                    hard_rock_offsets, ..
                }) => *hard_rock_offsets,
                _ => None,
            })
            .unwrap_or_else(|| self.hr())
    }

    /// Whether slider heads are judged like circles, i.e. the score was set
    /// without slider accuracy.
    pub(crate) fn no_slider_head_acc(&self, lazer: bool) -> bool {
        self.inner
            .iter()
            .find_map(|gamemod| match gamemod {
                GameMod::ClassicOsu(cl) => Some(cl.no_slider_head_accuracy.unwrap_or(true)),
                _ => None,
            })
            .unwrap_or(!lazer)
    }

    pub(crate) fn reflection(&self) -> Reflection {
        if self.hr() {
            return Reflection::Vertical;
        }

        self.inner
            .iter()
            .find_map(|gamemod| match gamemod {
                GameMod::MirrorOsu(mr) => match mr.reflection.as_deref() {
                    None => Some(Reflection::Horizontal),
                    Some("1") => Some(Reflection::Vertical),
                    Some("2") => Some(Reflection::Both),
                    Some(_) => Some(Reflection::None),
                },
                GameMod::MirrorCatch(_) => Some(Reflection::Horizontal),
                _ => None,
            })
            .unwrap_or(Reflection::None)
    }

    /// The key count enforced by a key mod.
    pub(crate) fn mania_keys(&self) -> Option<f32> {
        const KEY_MODS: [GameModIntermode; 10] = [
            GameModIntermode::OneKey,
            GameModIntermode::TwoKeys,
            GameModIntermode::ThreeKeys,
            GameModIntermode::FourKeys,
            GameModIntermode::FiveKeys,
            GameModIntermode::SixKeys,
            GameModIntermode::SevenKeys,
            GameModIntermode::EightKeys,
            GameModIntermode::NineKeys,
            GameModIntermode::TenKeys,
        ];

        KEY_MODS
            .into_iter()
            .zip(1..)
            .find(|(gamemod, _)| self.inner.contains_intermode(*gamemod))
            .map(|(_, keys)| keys as f32)
    }
}

macro_rules! impl_map_attr {
    ( $( $fn:ident: $field:ident [ $( $mode:ident ),* ] [$s:literal] ;)* ) => {
        impl GameMods {
            $(
                #[doc = "A custom "]
                #[doc = $s]
                #[doc = " value set through `DifficultyAdjust`."]
                pub(crate) fn $fn(&self) -> Option<f64> {
                    self.inner.iter().find_map(|gamemod| match gamemod {
                        $( impl_map_attr!( @ $mode $field) => *$field, )*
                        _ => None,
                    })
                }
            )*
        }
    };

    ( @ Osu $field:ident) => { GameMod::DifficultyAdjustOsu(DifficultyAdjustOsu { $field, .. }) };
    ( @ Taiko $field:ident) => { GameMod::DifficultyAdjustTaiko(DifficultyAdjustTaiko { $field, .. }) };
    ( @ Catch $field:ident) => { GameMod::DifficultyAdjustCatch(DifficultyAdjustCatch { $field, .. }) };
    ( @ Mania $field:ident) => { GameMod::DifficultyAdjustMania(DifficultyAdjustMania { $field, .. }) };
}

impl_map_attr! {
    custom_ar: approach_rate [Osu, Catch] ["AR"];
    custom_cs: circle_size [Osu, Catch] ["CS"];
    custom_hp: drain_rate [Osu, Taiko, Catch, Mania] ["HP"];
    custom_od: overall_difficulty [Osu, Taiko, Catch, Mania] ["OD"];
}

macro_rules! impl_has_mod {
    ( $( $fn:ident: $name:ident, )* ) => {
        impl GameMods {
            $(
                #[doc = concat!("Whether `", stringify!($name), "` is contained.")]
                pub(crate) fn $fn(&self) -> bool {
                    self.inner.contains_intermode(GameModIntermode::$name)
                }
            )*
        }
    };
}

impl_has_mod! {
    nf: NoFail,
    ez: Easy,
    td: TouchDevice,
    hd: Hidden,
    hr: HardRock,
    rx: Relax,
    fl: Flashlight,
    so: SpunOut,
    ap: Autopilot,
    bl: Blinds,
    tc: Traceable,
    cl: Classic,
}

impl Debug for GameMods {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GameMods")
            .field("mode", &self.mode)
            .field("mods", &self.inner)
            .finish()
    }
}

impl Default for GameMods {
    fn default() -> Self {
        Self::new(GameMode::Osu)
    }
}

impl Serialize for GameMods {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(s)
    }
}

/// How objects are mirrored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reflection {
    None,
    Vertical,
    Horizontal,
    Both,
}
