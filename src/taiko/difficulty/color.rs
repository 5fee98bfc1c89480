use std::{cmp, collections::VecDeque};

use crate::taiko::object::HitType;

use super::object::{TaikoDifficultyObject, TaikoDifficultyObjects};

const MAX_REPETITION_INTERVAL: usize = 16;

/// Indices into the [`ColorData`] of the groups an object belongs to.
#[derive(Clone, Debug, Default)]
pub struct TaikoDifficultyColor {
    pub mono_streak: Option<usize>,
    pub alternating_mono_pattern: Option<usize>,
    pub repeating_hit_patterns: Option<usize>,
}

impl TaikoDifficultyColor {
    /// The last note before the object's mono streak.
    pub fn previous_color_change<'a>(
        &self,
        objects: &'a TaikoDifficultyObjects,
    ) -> Option<&'a TaikoDifficultyObject> {
        let mono = objects.color.mono_streaks.get(self.mono_streak?)?;
        let first = objects.get(*mono.hit_objects.first()?)?;

        objects.previous_note(first, 0)
    }

    /// The first note after the object's mono streak.
    pub fn next_color_change<'a>(
        &self,
        objects: &'a TaikoDifficultyObjects,
    ) -> Option<&'a TaikoDifficultyObject> {
        let mono = objects.color.mono_streaks.get(self.mono_streak?)?;
        let last = objects.get(*mono.hit_objects.last()?)?;

        objects.next_note(last, 0)
    }
}

/// Consecutive objects of the same color.
#[derive(Clone, Debug, Default)]
pub struct MonoStreak {
    pub hit_objects: Vec<usize>,
    pub hit_type: Option<HitType>,
    pub parent: usize,
    pub idx: usize,
}

impl MonoStreak {
    pub fn run_len(&self) -> usize {
        self.hit_objects.len()
    }

    pub fn first_hit_object(&self) -> Option<usize> {
        self.hit_objects.first().copied()
    }
}

/// Consecutive mono streaks of the same length.
#[derive(Clone, Debug, Default)]
pub struct AlternatingMonoPattern {
    pub mono_streaks: Vec<usize>,
    pub parent: usize,
    pub idx: usize,
}

/// Alternating mono patterns that repeat themselves.
#[derive(Clone, Debug, Default)]
pub struct RepeatingHitPatterns {
    pub alternating_mono_patterns: Vec<usize>,
    pub repetition_interval: usize,
}

/// Arenas of all color groups of a map.
#[derive(Clone, Debug, Default)]
pub struct ColorData {
    pub mono_streaks: Vec<MonoStreak>,
    pub alternating_mono_patterns: Vec<AlternatingMonoPattern>,
    pub repeating_hit_patterns: Vec<RepeatingHitPatterns>,
}

impl ColorData {
    /// Group the objects by color and store the groups on the objects.
    pub fn process_and_assign(objects: &mut TaikoDifficultyObjects) {
        let mut data = Self {
            mono_streaks: Self::encode_mono_streaks(objects),
            ..Self::default()
        };

        data.encode_alternating_mono_patterns();
        data.encode_repeating_hit_patterns();

        for (ri, repeating) in data.repeating_hit_patterns.iter().enumerate() {
            for (i, &ai) in repeating.alternating_mono_patterns.iter().enumerate() {
                let pattern = &mut data.alternating_mono_patterns[ai];
                pattern.parent = ri;
                pattern.idx = i;

                for (j, &mi) in pattern.mono_streaks.iter().enumerate() {
                    let mono = &mut data.mono_streaks[mi];
                    mono.parent = ai;
                    mono.idx = j;

                    for &h in mono.hit_objects.iter() {
                        objects.objects[h].color = TaikoDifficultyColor {
                            mono_streak: Some(mi),
                            alternating_mono_pattern: Some(ai),
                            repeating_hit_patterns: Some(ri),
                        };
                    }
                }
            }
        }

        objects.color = data;
    }

    fn encode_mono_streaks(objects: &TaikoDifficultyObjects) -> Vec<MonoStreak> {
        let mut mono_streaks: Vec<MonoStreak> = Vec::new();

        for curr in objects.objects.iter() {
            let same_color = objects
                .previous_note(curr, 0)
                .is_some_and(|prev| prev.base_hit_type == curr.base_hit_type);

            match mono_streaks.last_mut() {
                Some(mono) if same_color => mono.hit_objects.push(curr.idx),
                _ => mono_streaks.push(MonoStreak {
                    hit_objects: vec![curr.idx],
                    hit_type: Some(curr.base_hit_type),
                    ..MonoStreak::default()
                }),
            }
        }

        mono_streaks
    }

    fn encode_alternating_mono_patterns(&mut self) {
        let mut prev_run_len = None;

        for (i, mono) in self.mono_streaks.iter().enumerate() {
            let run_len = mono.run_len();

            match self.alternating_mono_patterns.last_mut() {
                Some(pattern) if prev_run_len == Some(run_len) => pattern.mono_streaks.push(i),
                _ => self.alternating_mono_patterns.push(AlternatingMonoPattern {
                    mono_streaks: vec![i],
                    ..AlternatingMonoPattern::default()
                }),
            }

            prev_run_len = Some(run_len);
        }
    }

    fn encode_repeating_hit_patterns(&mut self) {
        let mut data: VecDeque<usize> = (0..self.alternating_mono_patterns.len()).collect();

        let is_coupled = |this: &Self, data: &VecDeque<usize>| {
            data.get(2).is_some_and(|&other| this.is_pattern_repetition(data[0], other))
        };

        while let Some(&front) = data.front() {
            let mut repeating = RepeatingHitPatterns::default();

            if is_coupled(self, &data) {
                while is_coupled(self, &data) {
                    repeating.alternating_mono_patterns.extend(data.pop_front());
                }

                let n = cmp::min(2, data.len());
                repeating.alternating_mono_patterns.extend(data.drain(..n));
            } else {
                data.pop_front();
                repeating.alternating_mono_patterns.push(front);
            }

            self.repeating_hit_patterns.push(repeating);
        }

        for i in 0..self.repeating_hit_patterns.len() {
            let interval = self.repetition_interval(i);
            self.repeating_hit_patterns[i].repetition_interval = interval;
        }
    }

    /// How many repeating patterns ago the pattern at `idx` was last seen.
    fn repetition_interval(&self, idx: usize) -> usize {
        let curr = &self.repeating_hit_patterns[idx];

        for (interval, other) in (1..MAX_REPETITION_INTERVAL).zip((0..idx).rev()) {
            if self.is_repeating_repetition(curr, &self.repeating_hit_patterns[other]) {
                return interval;
            }
        }

        MAX_REPETITION_INTERVAL + 1
    }

    fn is_repeating_repetition(&self, a: &RepeatingHitPatterns, b: &RepeatingHitPatterns) -> bool {
        if a.alternating_mono_patterns.len() != b.alternating_mono_patterns.len() {
            return false;
        }

        a.alternating_mono_patterns
            .iter()
            .zip(b.alternating_mono_patterns.iter())
            .take(2)
            .all(|(&a, &b)| self.has_identical_mono_len(a, b))
    }

    fn is_pattern_repetition(&self, a: usize, b: usize) -> bool {
        let (pattern_a, pattern_b) = (
            &self.alternating_mono_patterns[a],
            &self.alternating_mono_patterns[b],
        );

        self.has_identical_mono_len(a, b)
            && pattern_a.mono_streaks.len() == pattern_b.mono_streaks.len()
            && self.first_mono(a).map(|mono| mono.hit_type)
                == self.first_mono(b).map(|mono| mono.hit_type)
    }

    fn has_identical_mono_len(&self, a: usize, b: usize) -> bool {
        self.first_mono(a).map(MonoStreak::run_len) == self.first_mono(b).map(MonoStreak::run_len)
    }

    fn first_mono(&self, pattern: usize) -> Option<&MonoStreak> {
        self.alternating_mono_patterns
            .get(pattern)
            .and_then(|pattern| pattern.mono_streaks.first())
            .and_then(|&mono| self.mono_streaks.get(mono))
    }

    /// First object of the alternating mono pattern.
    pub fn pattern_first_hit_object(&self, pattern: usize) -> Option<usize> {
        self.first_mono(pattern)
            .and_then(MonoStreak::first_hit_object)
    }

    /// First object of the repeating hit patterns.
    pub fn repeating_first_hit_object(&self, repeating: usize) -> Option<usize> {
        self.repeating_hit_patterns
            .get(repeating)
            .and_then(|repeating| repeating.alternating_mono_patterns.first())
            .and_then(|&pattern| self.pattern_first_hit_object(pattern))
    }
}

#[cfg(test)]
mod tests {
    use crate::{model::beatmap::Beatmap, taiko::object::TaikoObject};

    use super::*;

    fn diff_objects(hit_types: &str) -> TaikoDifficultyObjects {
        // Two leading objects that don't get a difficulty object
        let taiko_objects: Vec<_> = "dd"
            .chars()
            .chain(hit_types.chars())
            .enumerate()
            .map(|(i, c)| TaikoObject {
                start_time: i as f64 * 100.0,
                hit_type: if c == 'k' { HitType::Rim } else { HitType::Center },
            })
            .collect();

        TaikoDifficultyObjects::new(&taiko_objects, &Beatmap::default(), 1.0)
    }

    #[test]
    fn mono_streaks_split_on_color_change() {
        let objects = diff_objects("ddkkdk");
        let run_lens: Vec<_> = objects
            .color
            .mono_streaks
            .iter()
            .map(MonoStreak::run_len)
            .collect();

        assert_eq!(run_lens, [2, 2, 1, 1]);
        assert_eq!(objects.color.alternating_mono_patterns.len(), 2);
    }

    #[test]
    fn every_object_is_assigned() {
        let objects = diff_objects("dkdkddkk");

        assert!(objects
            .objects
            .iter()
            .all(|h| h.color.mono_streak.is_some() && h.color.repeating_hit_patterns.is_some()));
    }

    #[test]
    fn color_changes() {
        let objects = diff_objects("ddkkd");
        let second_streak = &objects.objects[2];

        let prev = second_streak.color.previous_color_change(&objects).unwrap();
        assert_eq!(prev.idx, 1);

        let next = second_streak.color.next_color_change(&objects).unwrap();
        assert_eq!(next.idx, 4);
    }

    #[test]
    fn repetition_interval() {
        // Patterns [dd], [k], [dd, kk]; the last one repeats the first
        let objects = diff_objects("ddkddkk");

        let intervals: Vec<_> = objects
            .color
            .repeating_hit_patterns
            .iter()
            .map(|repeating| repeating.repetition_interval)
            .collect();

        assert_eq!(
            intervals,
            [MAX_REPETITION_INTERVAL + 1, MAX_REPETITION_INTERVAL + 1, 2]
        );
    }
}
