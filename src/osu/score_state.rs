use serde::Serialize;

/// Aggregation for a score's current state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OsuScoreState {
    /// Maximum combo that the score has had so far. **Not** the maximum
    /// possible combo of the map so far.
    pub max_combo: u32,
    /// "Large tick" hits.
    ///
    /// The meaning depends on the kind of score:
    /// - if set on osu!stable, this value is irrelevant and can be `0`
    /// - if set on osu!lazer *without* `CL`, this value is the amount of hit
    ///   slider ticks and repeats
    /// - if set on osu!lazer *with* `CL`, this value is the amount of hit
    ///   slider heads, ticks, and repeats
    pub large_tick_hits: u32,
    /// "Small tick" hits.
    ///
    /// Only relevant for osu!lazer scores without slider accuracy. In that
    /// case, this value is the amount of slider tail hits.
    pub small_tick_hits: u32,
    /// Amount of successfully hit slider ends.
    ///
    /// Only relevant for osu!lazer scores with slider accuracy.
    pub slider_end_hits: u32,
    /// Amount of current 300s.
    pub n300: u32,
    /// Amount of current 100s.
    pub n100: u32,
    /// Amount of current 50s.
    pub n50: u32,
    /// Amount of current misses.
    pub misses: u32,
}

impl OsuScoreState {
    /// Create a new empty score state.
    pub const fn new() -> Self {
        Self {
            max_combo: 0,
            large_tick_hits: 0,
            small_tick_hits: 0,
            slider_end_hits: 0,
            n300: 0,
            n100: 0,
            n50: 0,
            misses: 0,
        }
    }

    /// Return the total amount of hits by adding everything up.
    pub const fn total_hits(&self) -> u32 {
        self.n300 + self.n100 + self.n50 + self.misses
    }

    /// Calculate the accuracy between `0.0` and `1.0` for this state.
    pub fn accuracy(&self, origin: OsuScoreOrigin) -> f64 {
        let mut numerator = 300 * self.n300 + 100 * self.n100 + 50 * self.n50;
        let mut denominator = 300 * self.total_hits();

        match origin {
            OsuScoreOrigin::Stable => {}
            OsuScoreOrigin::WithSliderAcc {
                max_large_ticks,
                max_slider_ends,
            } => {
                let slider_end_hits = self.slider_end_hits.min(max_slider_ends);
                let large_tick_hits = self.large_tick_hits.min(max_large_ticks);

                numerator += 150 * slider_end_hits + 30 * large_tick_hits;
                denominator += 150 * max_slider_ends + 30 * max_large_ticks;
            }
            OsuScoreOrigin::WithoutSliderAcc {
                max_large_ticks,
                max_small_ticks,
            } => {
                let large_tick_hits = self.large_tick_hits.min(max_large_ticks);
                let small_tick_hits = self.small_tick_hits.min(max_small_ticks);

                numerator += 30 * large_tick_hits + 10 * small_tick_hits;
                denominator += 30 * max_large_ticks + 10 * max_small_ticks;
            }
        }

        if denominator == 0 {
            0.0
        } else {
            f64::from(numerator) / f64::from(denominator)
        }
    }
}

/// Type to pass [`OsuScoreState::accuracy`] and to specify the origin of a
/// score.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OsuScoreOrigin {
    /// For scores set on osu!stable
    Stable,
    /// For scores set on osu!lazer with slider accuracy
    WithSliderAcc {
        max_large_ticks: u32,
        max_slider_ends: u32,
    },
    /// For scores set on osu!lazer without slider accuracy
    WithoutSliderAcc {
        max_large_ticks: u32,
        max_small_ticks: u32,
    },
}

#[cfg(test)]
mod tests {
    use crate::util::float_ext::FloatExt;

    use super::*;

    fn state() -> OsuScoreState {
        OsuScoreState {
            max_combo: 100,
            large_tick_hits: 8,
            small_tick_hits: 3,
            slider_end_hits: 4,
            n300: 90,
            n100: 6,
            n50: 2,
            misses: 2,
        }
    }

    #[test]
    fn stable_ignores_sliders() {
        let acc = state().accuracy(OsuScoreOrigin::Stable);
        let expected = f64::from(300 * 90 + 100 * 6 + 50 * 2) / 30_000.0;

        assert!(acc.eq(expected), "{acc} != {expected}");
    }

    #[test]
    fn slider_acc_adds_ticks_and_ends() {
        let origin = OsuScoreOrigin::WithSliderAcc {
            max_large_ticks: 10,
            max_slider_ends: 5,
        };

        let acc = state().accuracy(origin);
        let expected = f64::from(300 * 90 + 100 * 6 + 50 * 2 + 150 * 4 + 30 * 8)
            / f64::from(30_000 + 150 * 5 + 30 * 10);

        assert!(acc.eq(expected), "{acc} != {expected}");
    }

    #[test]
    fn hits_are_capped_by_maximum() {
        let origin = OsuScoreOrigin::WithoutSliderAcc {
            max_large_ticks: 2,
            max_small_ticks: 1,
        };

        let acc = state().accuracy(origin);
        let expected = f64::from(300 * 90 + 100 * 6 + 50 * 2 + 30 * 2 + 10)
            / f64::from(30_000 + 30 * 2 + 10);

        assert!(acc.eq(expected), "{acc} != {expected}");
    }

    #[test]
    fn empty_state() {
        assert!(OsuScoreState::new().accuracy(OsuScoreOrigin::Stable).eq(0.0));
    }
}
