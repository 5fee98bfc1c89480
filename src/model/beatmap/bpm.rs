use std::collections::HashMap;

use crate::model::{control_point::TimingPoint, hit_object::HitObject};

/// The most common BPM of the map, weighted by how long each timing point
/// lasts.
pub fn bpm(last_hit_object: Option<&HitObject>, timing_points: &[TimingPoint]) -> f64 {
    // Incorrect if the last object is a slider since its end time is not
    // known before its curve is evaluated.
    let last_time = last_hit_object
        .map(HitObject::end_time)
        .or_else(|| timing_points.last().map(|t| t.time))
        .unwrap_or(0.0);

    let mut durations = BeatLenDurations::new(last_time);

    // osu!stable forces the first control point to start at 0
    match timing_points {
        [curr] => durations.add(curr.beat_len, 0.0, last_time),
        [curr, next, ..] => durations.add(curr.beat_len, 0.0, next.time),
        [] => {}
    }

    for window in timing_points.windows(2).skip(1) {
        durations.add(window[0].beat_len, window[0].time, window[1].time);
    }

    if let [_, .., curr] = timing_points {
        durations.add(curr.beat_len, curr.time, last_time);
    }

    let most_common_beat_len = durations
        .inner
        .into_iter()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0.0, |(beat_len, _)| f64::from_bits(beat_len));

    60_000.0 / most_common_beat_len
}

/// Maps a rounded `beat_len` to its cumulative duration.
struct BeatLenDurations {
    last_time: f64,
    inner: HashMap<u64, f64>,
}

impl BeatLenDurations {
    fn new(last_time: f64) -> Self {
        Self {
            last_time,
            inner: HashMap::default(),
        }
    }

    fn add(&mut self, beat_len: f64, curr_time: f64, next_time: f64) {
        let beat_len = (1000.0 * beat_len).round() / 1000.0;
        let entry = self.inner.entry(beat_len.to_bits()).or_default();

        if curr_time <= self.last_time {
            *entry += next_time - curr_time;
        }
    }
}
