use crate::{
    model::{
        beatmap::Beatmap,
        control_point::{EffectPoint, TimingPoint},
    },
    taiko::{
        convert::VELOCITY_MULTIPLIER,
        object::{HitType, TaikoObject},
    },
};

use super::{
    color::{ColorData, TaikoDifficultyColor},
    rhythm::{RhythmData, RhythmGroups},
};

#[derive(Clone, Debug)]
pub struct TaikoDifficultyObject {
    pub idx: usize,
    pub delta_time: f64,
    pub start_time: f64,
    pub base_hit_type: HitType,
    pub mono_idx: MonoIndex,
    /// Index within all notes; `None` for drumrolls and swells.
    pub note_idx: Option<usize>,
    pub rhythm_data: RhythmData,
    pub color: TaikoDifficultyColor,
    /// Scroll speed of the object in beats per minute.
    pub effective_bpm: f64,
}

impl TaikoDifficultyObject {
    pub fn new(
        hit_object: &TaikoObject,
        last_object: &TaikoObject,
        map: &Beatmap,
        clock_rate: f64,
        idx: usize,
        objects: &TaikoDifficultyObjects,
    ) -> Self {
        let delta_time = (hit_object.start_time - last_object.start_time) / clock_rate;
        let prev_delta_time = objects.objects.last().map(|prev| prev.delta_time);

        let (mono_idx, note_idx) = match hit_object.hit_type {
            HitType::Center => (
                MonoIndex::Center(objects.center_hit_objects.len()),
                Some(objects.note_objects.len()),
            ),
            HitType::Rim => (
                MonoIndex::Rim(objects.rim_hit_objects.len()),
                Some(objects.note_objects.len()),
            ),
            HitType::NonHit => (MonoIndex::None, None),
        };

        Self {
            idx,
            delta_time,
            start_time: hit_object.start_time / clock_rate,
            base_hit_type: hit_object.hit_type,
            mono_idx,
            note_idx,
            rhythm_data: RhythmData::new(delta_time, prev_delta_time),
            color: TaikoDifficultyColor::default(),
            effective_bpm: effective_bpm(map, hit_object.start_time, clock_rate),
        }
    }
}

fn effective_bpm(map: &Beatmap, start_time: f64, clock_rate: f64) -> f64 {
    let bpm = map
        .timing_point_at(start_time)
        .map_or(TimingPoint::DEFAULT_BPM, TimingPoint::bpm);

    let scroll_speed = map
        .effect_point_at(start_time)
        .map_or(EffectPoint::DEFAULT_SCROLL_SPEED, |point| point.scroll_speed);

    let slider_velocity =
        map.slider_multiplier * f64::from(VELOCITY_MULTIPLIER) * scroll_speed * clock_rate;

    bpm * slider_velocity
}

#[derive(Copy, Clone, Debug)]
pub enum MonoIndex {
    Center(usize),
    Rim(usize),
    None,
}

/// All difficulty objects of a map plus index lists of its notes and its
/// color and rhythm groups.
///
/// The lists store indices into `objects`.
#[derive(Clone, Debug, Default)]
pub struct TaikoDifficultyObjects {
    pub objects: Vec<TaikoDifficultyObject>,
    pub center_hit_objects: Vec<usize>,
    pub rim_hit_objects: Vec<usize>,
    pub note_objects: Vec<usize>,
    pub color: ColorData,
    pub rhythm: RhythmGroups,
}

impl TaikoDifficultyObjects {
    /// Create the difficulty objects of all given taiko objects.
    ///
    /// The first two objects have no difficulty object.
    pub fn new(taiko_objects: &[TaikoObject], map: &Beatmap, clock_rate: f64) -> Self {
        let mut this = Self {
            objects: Vec::with_capacity(taiko_objects.len().saturating_sub(2)),
            ..Self::default()
        };

        for (i, window) in taiko_objects.windows(3).enumerate() {
            let [_, last, curr] = window else {
                continue;
            };

            let diff_object = TaikoDifficultyObject::new(curr, last, map, clock_rate, i, &this);
            this.push(diff_object);
        }

        ColorData::process_and_assign(&mut this);
        RhythmGroups::process_and_assign(&mut this);

        this
    }

    fn push(&mut self, diff_object: TaikoDifficultyObject) {
        let idx = self.objects.len();

        match diff_object.base_hit_type {
            HitType::Center => {
                self.note_objects.push(idx);
                self.center_hit_objects.push(idx);
            }
            HitType::Rim => {
                self.note_objects.push(idx);
                self.rim_hit_objects.push(idx);
            }
            HitType::NonHit => {}
        }

        self.objects.push(diff_object);
    }

    pub fn get(&self, idx: usize) -> Option<&TaikoDifficultyObject> {
        self.objects.get(idx)
    }

    pub fn previous(
        &self,
        curr: &TaikoDifficultyObject,
        backwards_idx: usize,
    ) -> Option<&TaikoDifficultyObject> {
        curr.idx
            .checked_sub(backwards_idx + 1)
            .and_then(|idx| self.objects.get(idx))
    }

    /// The `backwards_idx`th previous note of the same color.
    pub fn previous_mono(
        &self,
        curr: &TaikoDifficultyObject,
        backwards_idx: usize,
    ) -> Option<&TaikoDifficultyObject> {
        let (mono_idx, list) = match curr.mono_idx {
            MonoIndex::Center(idx) => (idx, &self.center_hit_objects),
            MonoIndex::Rim(idx) => (idx, &self.rim_hit_objects),
            MonoIndex::None => return None,
        };

        mono_idx
            .checked_sub(backwards_idx + 1)
            .and_then(|idx| list.get(idx))
            .and_then(|&idx| self.objects.get(idx))
    }

    pub fn previous_note(
        &self,
        curr: &TaikoDifficultyObject,
        backwards_idx: usize,
    ) -> Option<&TaikoDifficultyObject> {
        curr.note_idx
            .and_then(|note_idx| note_idx.checked_sub(backwards_idx + 1))
            .and_then(|idx| self.note_objects.get(idx))
            .and_then(|&idx| self.objects.get(idx))
    }

    pub fn next_note(
        &self,
        curr: &TaikoDifficultyObject,
        forwards_idx: usize,
    ) -> Option<&TaikoDifficultyObject> {
        curr.note_idx
            .and_then(|note_idx| self.note_objects.get(note_idx + forwards_idx + 1))
            .and_then(|&idx| self.objects.get(idx))
    }
}
