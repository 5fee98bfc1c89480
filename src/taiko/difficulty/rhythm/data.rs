use std::ops::Range;

use crate::{
    taiko::difficulty::object::TaikoDifficultyObject, util::interval_grouping::HasInterval,
};

/// Consecutive notes with roughly the same delta time.
#[derive(Clone, Debug)]
pub struct SameRhythmHitObjectGrouping {
    /// Indices of the difficulty objects.
    pub hit_objects: Vec<usize>,
    /// Index of the preceding group.
    pub previous: Option<usize>,
    /// Average interval between the notes; `None` for single notes.
    pub hit_object_interval: Option<f64>,
    pub hit_object_interval_ratio: f64,
    /// Time since the start of the preceding group.
    pub interval: f64,
    start_time: Option<f64>,
    duration: Option<f64>,
}

impl SameRhythmHitObjectGrouping {
    pub fn new(
        previous: Option<(usize, &Self)>,
        hit_objects: Vec<usize>,
        objects: &[TaikoDifficultyObject],
    ) -> Self {
        let start_time = hit_objects
            .first()
            .and_then(|&idx| objects.get(idx))
            .map(|h| h.start_time);

        let duration = hit_objects
            .last()
            .and_then(|&idx| objects.get(idx))
            .zip(start_time)
            .map(|(last, start)| last.start_time - start);

        let hit_object_interval = if hit_objects.len() < 2 {
            None
        } else {
            duration.map(|duration| duration / (hit_objects.len() - 1) as f64)
        };

        let hit_object_interval_ratio = previous
            .and_then(|(_, prev)| prev.hit_object_interval)
            .zip(hit_object_interval)
            .map_or(1.0, |(prev, curr)| curr / prev);

        let interval = previous
            .and_then(|(_, prev)| prev.start_time)
            .zip(start_time)
            .map_or(f64::INFINITY, |(prev, curr)| curr - prev);

        Self {
            hit_objects,
            previous: previous.map(|(idx, _)| idx),
            hit_object_interval,
            hit_object_interval_ratio,
            interval,
            start_time,
            duration,
        }
    }

    pub fn first_hit_object(&self) -> Option<usize> {
        self.hit_objects.first().copied()
    }

    /// Time between the first and last note.
    pub const fn duration(&self) -> Option<f64> {
        self.duration
    }
}

impl HasInterval for SameRhythmHitObjectGrouping {
    fn interval(&self) -> f64 {
        self.interval
    }
}

/// Consecutive [`SameRhythmHitObjectGrouping`]s with roughly the same
/// interval.
#[derive(Clone, Debug)]
pub struct SamePatternsGroupedHitObjects {
    /// Indices of the rhythm groups.
    pub groups: Range<usize>,
    /// Ratio of this and the preceding pattern's interval.
    pub interval_ratio: f64,
    group_interval: Option<f64>,
    first_hit_object: Option<usize>,
}

impl SamePatternsGroupedHitObjects {
    pub fn new(
        previous: Option<&Self>,
        groups: Range<usize>,
        same_rhythm: &[SameRhythmHitObjectGrouping],
    ) -> Self {
        let group_interval = if groups.len() > 1 {
            same_rhythm.get(groups.start + 1)
        } else {
            same_rhythm.get(groups.start)
        }
        .map(|group| group.interval);

        let interval_ratio = group_interval
            .zip(previous.and_then(|prev| prev.group_interval))
            .map_or(1.0, |(curr, prev)| curr / prev);

        let first_hit_object = same_rhythm
            .get(groups.start)
            .and_then(SameRhythmHitObjectGrouping::first_hit_object);

        Self {
            groups,
            interval_ratio,
            group_interval,
            first_hit_object,
        }
    }

    pub const fn first_hit_object(&self) -> Option<usize> {
        self.first_hit_object
    }
}
