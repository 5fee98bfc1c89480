use std::f64::consts::PI;

use crate::{
    any::difficulty::skills::{count_top_weighted_strains, strain_decay, StrainSkill},
    osu::difficulty::object::OsuDifficultyObject,
    util::difficulty::{bpm_to_milliseconds, logistic, milliseconds_to_bpm},
};

use super::strain;

const SKILL_MULTIPLIER: f64 = 1.46;
const STRAIN_DECAY_BASE: f64 = 0.3;
pub(super) const REDUCED_SECTION_COUNT: usize = 5;

/// Skill representing how fast objects have to be clicked.
#[derive(Clone, Debug)]
pub struct Speed {
    curr_strain: f64,
    curr_rhythm: f64,
    hit_window: f64,
    autopilot: bool,
    inner: StrainSkill,
}

impl Speed {
    pub fn new(hit_window: f64, autopilot: bool) -> Self {
        Self {
            curr_strain: 0.0,
            curr_rhythm: 0.0,
            hit_window,
            autopilot,
            inner: StrainSkill::default(),
        }
    }

    pub fn process(&mut self, curr: &OsuDifficultyObject, diff_objects: &[OsuDifficultyObject]) {
        let prev_start_time = curr
            .previous(0, diff_objects)
            .map_or(0.0, |prev| prev.start_time);

        let strain = self.curr_strain * self.curr_rhythm;

        self.inner.advance(curr.idx, curr.start_time, |time| {
            strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
        });

        let strain = self.strain_value_at(curr, diff_objects);
        self.inner.record(strain);
    }

    fn strain_value_at(
        &mut self,
        curr: &OsuDifficultyObject,
        diff_objects: &[OsuDifficultyObject],
    ) -> f64 {
        self.curr_strain *= strain_decay(curr.strain_time, STRAIN_DECAY_BASE);
        self.curr_strain +=
            SpeedEvaluator::evaluate_diff_of(curr, diff_objects, self.hit_window, self.autopilot)
                * SKILL_MULTIPLIER;
        self.curr_rhythm = RhythmEvaluator::evaluate_diff_of(curr, diff_objects, self.hit_window);

        self.curr_strain * self.curr_rhythm
    }

    /// Amount of notes weighted by their strain relative to the highest one.
    pub fn relevant_note_count(&self) -> f64 {
        let object_strains = &self.inner.object_strains;

        object_strains
            .iter()
            .copied()
            .max_by(f64::total_cmp)
            .filter(|&n| n > 0.0)
            .map_or(0.0, |max_strain| {
                object_strains.iter().fold(0.0, |sum, strain| {
                    sum + (1.0 + f64::exp(-(strain / max_strain * 12.0 - 6.0))).recip()
                })
            })
    }

    pub fn curr_strain_peaks(&self) -> Vec<f64> {
        self.inner.curr_strain_peaks()
    }

    pub fn difficulty_value(&self) -> f64 {
        strain::difficulty_value(self.inner.curr_strain_peaks(), REDUCED_SECTION_COUNT)
    }

    pub fn count_top_weighted_strains(&self, difficulty_value: f64) -> f64 {
        count_top_weighted_strains(&self.inner.object_strains, difficulty_value)
    }
}

pub(super) struct SpeedEvaluator;

impl SpeedEvaluator {
    /// Spacing at which the distance bonus is maxed out.
    const SINGLE_SPACING_THRESHOLD: f64 =
        OsuDifficultyObject::NORMALIZED_DIAMETER as f64 * 1.25;
    /// 1/4 at this BPM starts getting a speed bonus.
    const MIN_SPEED_BONUS: f64 = 200.0;
    const SPEED_BALANCING_FACTOR: f64 = 40.0;
    const DIST_MULTIPLIER: f64 = 0.9;

    pub(super) fn evaluate_diff_of(
        curr: &OsuDifficultyObject,
        diff_objects: &[OsuDifficultyObject],
        hit_window: f64,
        autopilot: bool,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let doubletapness = curr.get_doubletapness(curr.next(0, diff_objects), hit_window);

        // Deltas are capped by the great hit window. The 0.93 keeps 260 BPM
        // OD8 streams mostly unaffected.
        let strain_time = curr.strain_time / (curr.strain_time / hit_window / 0.93).clamp(0.92, 1.0);

        let dist_bonus = if autopilot {
            0.0
        } else {
            let prev_travel = curr
                .previous(0, diff_objects)
                .map_or(0.0, |prev| prev.travel_dist);

            Self::distance_bonus(prev_travel + curr.min_jump_dist)
        };

        let difficulty = (1.0 + Self::speed_bonus(strain_time) + dist_bonus) * 1000.0 / strain_time;

        difficulty * (1.0 - doubletapness)
    }

    fn speed_bonus(strain_time: f64) -> f64 {
        if milliseconds_to_bpm(strain_time, None) <= Self::MIN_SPEED_BONUS {
            return 0.0;
        }

        let base = (bpm_to_milliseconds(Self::MIN_SPEED_BONUS, None) - strain_time)
            / Self::SPEED_BALANCING_FACTOR;

        0.75 * base.powf(2.0)
    }

    fn distance_bonus(dist: f64) -> f64 {
        let spacing = dist.min(Self::SINGLE_SPACING_THRESHOLD) / Self::SINGLE_SPACING_THRESHOLD;

        spacing.powf(3.95) * Self::DIST_MULTIPLIER
    }
}

struct RhythmEvaluator;

impl RhythmEvaluator {
    /// Milliseconds of history to consider.
    const HISTORY_TIME_MAX: f64 = 5000.0;
    const HISTORY_OBJECTS_MAX: usize = 32;
    const RHYTHM_OVERALL_MULTIPLIER: f64 = 0.95;
    const RHYTHM_RATIO_MULTIPLIER: f64 = 12.0;

    /// Multiplier in `[1, ∞)` for the strain of `curr` based on how
    /// irregular the preceding rhythm is.
    fn evaluate_diff_of(
        curr: &OsuDifficultyObject,
        diff_objects: &[OsuDifficultyObject],
        hit_window: f64,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let note_count = curr.idx.min(Self::HISTORY_OBJECTS_MAX);
        let start = Self::history_start(curr, diff_objects, note_count);

        let mut walk = RhythmWalk::new(hit_window);

        if let Some((mut prev, mut last)) = curr
            .previous(start, diff_objects)
            .zip(curr.previous(start + 1, diff_objects))
        {
            // Oldest to newest
            for i in (1..=start).rev() {
                let Some(obj) = curr.previous(i - 1, diff_objects) else {
                    break;
                };

                let time_decay = (Self::HISTORY_TIME_MAX - (curr.start_time - obj.start_time))
                    / Self::HISTORY_TIME_MAX;
                let note_decay = (note_count - i) as f64 / note_count as f64;

                walk.step(obj, prev, last.strain_time, note_decay.min(time_decay));

                last = prev;
                prev = obj;
            }
        }

        (4.0 + walk.complexity_sum * Self::RHYTHM_OVERALL_MULTIPLIER).sqrt() / 2.0
    }

    /// Index of the oldest previous object that is still within the history
    /// limits.
    fn history_start(
        curr: &OsuDifficultyObject,
        diff_objects: &[OsuDifficultyObject],
        note_count: usize,
    ) -> usize {
        let mut start = 0;

        while start + 2 < note_count
            && curr
                .previous(start, diff_objects)
                .is_some_and(|prev| curr.start_time - prev.start_time < Self::HISTORY_TIME_MAX)
        {
            start += 1;
        }

        start
    }

    /// Bonus for the ratio between two deltas. Deltas that are multiples of
    /// each other, far apart, or within the tolerance get less.
    fn delta_ratio(prev_delta: f64, curr_delta: f64, eps: f64) -> f64 {
        let diff_ratio = prev_delta.min(curr_delta) / prev_delta.max(curr_delta);
        let ratio =
            1.0 + Self::RHYTHM_RATIO_MULTIPLIER * (PI / diff_ratio).sin().powf(2.0).min(0.5);

        let fraction = (prev_delta / curr_delta).max(curr_delta / prev_delta);
        let fraction_multiplier = (2.0 - fraction / 8.0).clamp(0.0, 1.0);

        let window_penalty = (((prev_delta - curr_delta).abs() - eps).max(0.0) / eps).min(1.0);

        window_penalty * ratio * fraction_multiplier
    }
}

/// Accumulated rhythm state while walking through the history.
struct RhythmWalk {
    hit_window: f64,
    eps: f64,
    island: RhythmIsland,
    prev_island: RhythmIsland,
    island_counts: Vec<IslandCount>,
    start_ratio: f64,
    in_island: bool,
    complexity_sum: f64,
}

impl RhythmWalk {
    fn new(hit_window: f64) -> Self {
        let eps = hit_window * 0.3;

        Self {
            hit_window,
            eps,
            island: RhythmIsland::new(eps),
            prev_island: RhythmIsland::new(eps),
            island_counts: Vec::new(),
            start_ratio: 0.0,
            in_island: false,
            complexity_sum: 0.0,
        }
    }

    fn step(
        &mut self,
        curr: &OsuDifficultyObject,
        prev: &OsuDifficultyObject,
        last_delta: f64,
        decay: f64,
    ) {
        let curr_delta = curr.strain_time;
        let prev_delta = prev.strain_time;
        let ratio = RhythmEvaluator::delta_ratio(prev_delta, curr_delta, self.eps);

        if self.in_island {
            if (prev_delta - curr_delta).abs() < self.eps {
                self.island.add_delta(curr_delta as i32);
            } else {
                self.close_island(curr, prev, last_delta, ratio, decay);
            }
        } else if prev_delta > curr_delta + self.eps {
            // Speeding up so start a new island
            self.in_island = true;

            let mut ratio = ratio;

            if curr.base.is_slider() {
                ratio *= 0.6;
            }

            if prev.base.is_slider() {
                ratio *= 0.6;
            }

            self.start_ratio = ratio;
            self.island = RhythmIsland::new_with_delta(curr_delta as i32, self.eps);
        }
    }

    fn close_island(
        &mut self,
        curr: &OsuDifficultyObject,
        prev: &OsuDifficultyObject,
        last_delta: f64,
        mut ratio: f64,
        decay: f64,
    ) {
        let curr_delta = curr.strain_time;
        let prev_delta = prev.strain_time;
        let eps = self.eps;

        // Changes into or out of sliders have lenient windows
        if curr.base.is_slider() {
            ratio *= 0.125;
        }

        if prev.base.is_slider() {
            ratio *= 0.3;
        }

        if self.island.is_similar_polarity(&self.prev_island) {
            ratio *= 0.5;
        }

        // 1/1 -> 1/2 -> 1/4
        if last_delta > prev_delta + eps && prev_delta > curr_delta + eps {
            ratio *= 0.125;
        }

        if self.prev_island.delta_count == self.island.delta_count {
            ratio *= 0.5;
        }

        ratio *= self.repetition_factor();
        ratio *= 1.0 - prev.get_doubletapness(Some(curr), self.hit_window) * 0.75;

        self.complexity_sum += (ratio * self.start_ratio).sqrt() * decay;
        self.start_ratio = ratio;
        self.prev_island = self.island;

        // Slowing down ends the island
        if prev_delta + eps < curr_delta {
            self.in_island = false;
        }

        self.island = RhythmIsland::new_with_delta(curr_delta as i32, eps);
    }

    /// Registers the current island and returns the penalty for having seen
    /// it before.
    fn repetition_factor(&mut self) -> f64 {
        let island = self.island;
        let consecutive = self.prev_island == island;

        if let Some(entry) = self
            .island_counts
            .iter_mut()
            .find(|entry| entry.island == island)
            .filter(|entry| !entry.island.is_default())
        {
            if consecutive {
                entry.count += 1;
            }

            let count = entry.count as f64;
            let power = logistic(f64::from(island.delta), 58.33, 0.24, Some(2.75));

            (3.0 / count).min(count.recip().powf(power))
        } else {
            self.island_counts.push(IslandCount { island, count: 1 });

            1.0
        }
    }
}

/// A group of notes sharing roughly the same delta time.
#[derive(Copy, Clone, Debug)]
struct RhythmIsland {
    delta_difference_eps: f64,
    delta: i32,
    delta_count: i32,
}

const MIN_DELTA_TIME: i32 = OsuDifficultyObject::MIN_DELTA_TIME as i32;

impl RhythmIsland {
    const fn new(delta_difference_eps: f64) -> Self {
        Self {
            delta_difference_eps,
            delta: i32::MAX,
            delta_count: 0,
        }
    }

    fn new_with_delta(delta: i32, delta_difference_eps: f64) -> Self {
        Self {
            delta_difference_eps,
            delta: delta.max(MIN_DELTA_TIME),
            delta_count: 1,
        }
    }

    fn add_delta(&mut self, delta: i32) {
        if self.delta == i32::MAX {
            self.delta = delta.max(MIN_DELTA_TIME);
        }

        self.delta_count += 1;
    }

    const fn is_similar_polarity(&self, other: &Self) -> bool {
        self.delta_count % 2 == other.delta_count % 2
    }

    fn is_default(&self) -> bool {
        self.delta_difference_eps.abs() < f64::EPSILON
            && self.delta == i32::MAX
            && self.delta_count == 0
    }
}

impl PartialEq for RhythmIsland {
    fn eq(&self, other: &Self) -> bool {
        f64::from((self.delta - other.delta).abs()) < self.delta_difference_eps
            && self.delta_count == other.delta_count
    }
}

struct IslandCount {
    island: RhythmIsland,
    count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn islands_compare_with_tolerance() {
        let a = RhythmIsland::new_with_delta(100, 15.0);
        let b = RhythmIsland::new_with_delta(110, 15.0);
        let c = RhythmIsland::new_with_delta(120, 15.0);

        assert!(a == b);
        assert!(a != c);
    }

    #[test]
    fn island_delta_has_lower_bound() {
        let mut island = RhythmIsland::new(10.0);
        island.add_delta(3);

        assert_eq!(island.delta, MIN_DELTA_TIME);
        assert_eq!(island.delta_count, 1);
        assert!(island.is_similar_polarity(&RhythmIsland::new_with_delta(200, 10.0)));
    }
}
