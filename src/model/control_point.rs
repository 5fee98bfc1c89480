pub use rosu_map::section::timing_points::DifficultyPoint;

use crate::util::float_ext::FloatExt;

/// Timing-related info about a control point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimingPoint {
    pub time: f64,
    pub beat_len: f64,
}

impl TimingPoint {
    pub const DEFAULT_BEAT_LEN: f64 =
        rosu_map::section::timing_points::TimingPoint::DEFAULT_BEAT_LEN;

    pub const DEFAULT_BPM: f64 = 60_000.0 / Self::DEFAULT_BEAT_LEN;

    pub fn new(time: f64, beat_len: f64) -> Self {
        Self {
            time,
            beat_len: beat_len.clamp(6.0, 60_000.0),
        }
    }

    pub fn bpm(&self) -> f64 {
        60_000.0 / self.beat_len
    }
}

impl Default for TimingPoint {
    fn default() -> Self {
        Self {
            time: 0.0,
            beat_len: Self::DEFAULT_BEAT_LEN,
        }
    }
}

/// Effect-related info about a control point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EffectPoint {
    pub time: f64,
    pub kiai: bool,
    pub scroll_speed: f64,
}

impl EffectPoint {
    pub const DEFAULT_KIAI: bool = rosu_map::section::timing_points::EffectPoint::DEFAULT_KIAI;
    pub const DEFAULT_SCROLL_SPEED: f64 =
        rosu_map::section::timing_points::EffectPoint::DEFAULT_SCROLL_SPEED;

    pub const fn new(time: f64, kiai: bool) -> Self {
        Self {
            time,
            kiai,
            scroll_speed: Self::DEFAULT_SCROLL_SPEED,
        }
    }

    pub fn is_redundant(&self, existing: &Self) -> bool {
        self.kiai == existing.kiai && FloatExt::eq(self.scroll_speed, existing.scroll_speed)
    }
}

impl Default for EffectPoint {
    fn default() -> Self {
        Self::new(0.0, Self::DEFAULT_KIAI)
    }
}

/// Anything placed on the timeline.
pub trait ControlPointTime {
    fn time(&self) -> f64;
}

impl ControlPointTime for TimingPoint {
    fn time(&self) -> f64 {
        self.time
    }
}

impl ControlPointTime for DifficultyPoint {
    fn time(&self) -> f64 {
        self.time
    }
}

impl ControlPointTime for EffectPoint {
    fn time(&self) -> f64 {
        self.time
    }
}

/// The last point at or before `time`.
pub fn point_at<P: ControlPointTime>(points: &[P], time: f64) -> Option<&P> {
    points
        .binary_search_by(|point| point.time().total_cmp(&time))
        .map_or_else(|i| i.checked_sub(1), Some)
        .map(|i| &points[i])
}

/// Like [`point_at`] but falls back to the first timing point if `time` is
/// before all of them.
pub fn timing_point_at(points: &[TimingPoint], time: f64) -> Option<&TimingPoint> {
    point_at(points, time).or_else(|| points.first())
}
