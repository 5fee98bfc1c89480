use rosu_map::section::hit_objects::hit_samples::HitSoundType;

use crate::model::{beatmap::Beatmap, hit_object::HitObject};

#[derive(Clone, Debug)]
pub struct TaikoObject {
    pub start_time: f64,
    pub hit_type: HitType,
}

impl TaikoObject {
    pub const fn new(h: &HitObject, sound: HitSoundType) -> Self {
        Self {
            start_time: h.start_time,
            hit_type: if !h.is_circle() {
                HitType::NonHit
            } else if sound.has_flag(HitSoundType::CLAP | HitSoundType::WHISTLE) {
                HitType::Rim
            } else {
                HitType::Center
            },
        }
    }

    /// All objects of the map. Missing hit sounds count as the default sound.
    pub fn create_all(map: &Beatmap) -> Vec<Self> {
        map.hit_objects
            .iter()
            .enumerate()
            .map(|(i, h)| Self::new(h, map.hit_sounds.get(i).copied().unwrap_or_default()))
            .collect()
    }

    pub const fn is_hit(&self) -> bool {
        self.hit_type.is_hit()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitType {
    Center,
    Rim,
    NonHit,
}

impl HitType {
    pub const fn is_hit(self) -> bool {
        !matches!(self, Self::NonHit)
    }
}
