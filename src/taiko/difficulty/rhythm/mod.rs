use crate::util::interval_grouping::{group_by_interval, HasInterval};

use self::data::{SamePatternsGroupedHitObjects, SameRhythmHitObjectGrouping};

use super::object::{TaikoDifficultyObject, TaikoDifficultyObjects};

pub mod data;

#[allow(clippy::eq_op)]
static COMMON_RATIOS: [f64; 9] = [
    1.0 / 1.0,
    2.0 / 1.0,
    1.0 / 2.0,
    3.0 / 1.0,
    1.0 / 3.0,
    3.0 / 2.0,
    2.0 / 3.0,
    5.0 / 4.0,
    4.0 / 5.0,
];

/// Rhythm related info of a difficulty object.
#[derive(Clone, Debug)]
pub struct RhythmData {
    /// Index into [`RhythmGroups::same_rhythm`]; `None` for non-hits.
    pub same_rhythm_grouped_hit_objects: Option<usize>,
    /// Index into [`RhythmGroups::same_patterns`]; `None` for non-hits.
    pub same_patterns_grouped_hit_objects: Option<usize>,
    /// The common ratio closest to the ratio of this and the previous
    /// object's delta time.
    pub ratio: f64,
}

impl RhythmData {
    pub fn new(delta_time: f64, prev_delta_time: Option<f64>) -> Self {
        let ratio = prev_delta_time.map_or(1.0, |prev_delta_time| {
            let actual_ratio = delta_time / prev_delta_time;
            let actual_diff = |r: f64| f64::abs(r - actual_ratio);

            COMMON_RATIOS
                .iter()
                .copied()
                .min_by(|&r1, &r2| actual_diff(r1).total_cmp(&actual_diff(r2)))
                .unwrap_or(1.0)
        });

        Self {
            same_rhythm_grouped_hit_objects: None,
            same_patterns_grouped_hit_objects: None,
            ratio,
        }
    }
}

/// Arenas of all rhythm groups of a map.
#[derive(Clone, Debug, Default)]
pub struct RhythmGroups {
    pub same_rhythm: Vec<SameRhythmHitObjectGrouping>,
    pub same_patterns: Vec<SamePatternsGroupedHitObjects>,
}

impl RhythmGroups {
    /// Group the notes by their rhythm and store the groups on the objects.
    pub fn process_and_assign(objects: &mut TaikoDifficultyObjects) {
        let notes: Vec<&TaikoDifficultyObject> = objects
            .note_objects
            .iter()
            .filter_map(|&idx| objects.get(idx))
            .collect();

        let mut same_rhythm: Vec<SameRhythmHitObjectGrouping> = Vec::new();

        for range in group_by_interval(&notes) {
            let hit_objects = notes[range].iter().map(|h| h.idx).collect();
            let prev = same_rhythm.len().checked_sub(1);
            let prev = prev.and_then(|idx| same_rhythm.get(idx).map(|group| (idx, group)));

            let group = SameRhythmHitObjectGrouping::new(prev, hit_objects, &objects.objects);
            same_rhythm.push(group);
        }

        let mut same_patterns: Vec<SamePatternsGroupedHitObjects> = Vec::new();

        for range in group_by_interval(&same_rhythm) {
            let group =
                SamePatternsGroupedHitObjects::new(same_patterns.last(), range, &same_rhythm);
            same_patterns.push(group);
        }

        for (i, group) in same_rhythm.iter().enumerate() {
            for &h in group.hit_objects.iter() {
                if let Some(h) = objects.objects.get_mut(h) {
                    h.rhythm_data.same_rhythm_grouped_hit_objects = Some(i);
                }
            }
        }

        for (i, pattern) in same_patterns.iter().enumerate() {
            for group in same_rhythm[pattern.groups.clone()].iter() {
                for &h in group.hit_objects.iter() {
                    if let Some(h) = objects.objects.get_mut(h) {
                        h.rhythm_data.same_patterns_grouped_hit_objects = Some(i);
                    }
                }
            }
        }

        objects.rhythm = Self {
            same_rhythm,
            same_patterns,
        };
    }

    /// Iterate over the group at `idx` and all of its predecessors.
    pub fn same_rhythm_history(
        &self,
        idx: usize,
    ) -> impl Iterator<Item = &SameRhythmHitObjectGrouping> {
        let mut next = self.same_rhythm.get(idx);

        std::iter::from_fn(move || {
            let curr = next?;
            next = curr.previous.and_then(|prev| self.same_rhythm.get(prev));

            Some(curr)
        })
    }
}

impl HasInterval for &TaikoDifficultyObject {
    fn interval(&self) -> f64 {
        self.delta_time
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::beatmap::Beatmap,
        taiko::object::{HitType, TaikoObject},
    };

    use super::*;

    fn diff_objects(start_times: &[f64]) -> TaikoDifficultyObjects {
        let taiko_objects: Vec<_> = start_times
            .iter()
            .map(|&start_time| TaikoObject {
                start_time,
                hit_type: HitType::Center,
            })
            .collect();

        TaikoDifficultyObjects::new(&taiko_objects, &Beatmap::default(), 1.0)
    }

    #[test]
    fn ratio_snaps_to_common_ratio() {
        assert!(RhythmData::new(100.0, None).ratio.eq(&1.0));
        assert!(RhythmData::new(98.0, Some(200.0)).ratio.eq(&0.5));
        assert!(RhythmData::new(155.0, Some(100.0)).ratio.eq(&1.5));
    }

    #[test]
    fn notes_are_grouped_by_interval() {
        // Quarter notes followed by eighth notes
        let mut times: Vec<_> = (0..8).map(|i| f64::from(i) * 200.0).collect();
        times.extend((1..=8).map(|i| 1400.0 + f64::from(i) * 100.0));

        let objects = diff_objects(&times);
        let groups = &objects.rhythm.same_rhythm;

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].hit_objects, (0..5).collect::<Vec<_>>());
        assert_eq!(groups[1].hit_objects, (5..14).collect::<Vec<_>>());
        assert!(groups[1].hit_object_interval_ratio.eq(&0.5));
        assert!(groups[1].interval.eq(&1000.0));

        assert!(objects.objects.iter().all(|h| {
            h.rhythm_data.same_rhythm_grouped_hit_objects.is_some()
                && h.rhythm_data.same_patterns_grouped_hit_objects.is_some()
        }));
    }

    #[test]
    fn history_walks_backwards() {
        let mut time = 0.0;
        let times: Vec<_> = (0..40)
            .map(|i| {
                time += if (i / 4) % 2 == 0 { 150.0 } else { 75.0 };

                time
            })
            .collect();

        let objects = diff_objects(&times);
        let last = objects.rhythm.same_rhythm.len() - 1;

        assert!(last > 2);
        assert_eq!(objects.rhythm.same_rhythm_history(last).count(), last + 1);
    }
}
