use std::f64::consts::{PI, SQRT_2};

use crate::{
    model::mods::GameMods,
    osu::{
        attributes::{OsuDifficultyAttributes, OsuPerformanceAttributes},
        difficulty::skills::{flashlight::Flashlight, strain},
        score_state::OsuScoreState,
    },
    util::{
        difficulty::{lerp, norm, probability_lower_bound, reverse_lerp},
        float_ext::FloatExt,
        special_functions::{erf, erf_inv},
    },
};

use super::{n_large_tick_miss, n_slider_ends_dropped, total_imperfect_hits};

/// Keeps the final pp scaled around what it used to be across reworks.
pub const PERFORMANCE_BASE_MULTIPLIER: f64 = 1.15;

/// Exponent of the norm that combines the individual pp values.
const PP_NORM: f64 = 1.1;

/// Accuracy pp before mod bonuses.
pub(crate) fn base_accuracy_value(od: f64, timed_acc: f64, n_timed: u32) -> f64 {
    let value = 1.52163_f64.powf(od) * timed_acc.powf(24.0) * 2.83;

    // Longer maps make it harder to keep accuracy up
    value * (f64::from(n_timed) / 1000.0).powf(0.3).min(1.15)
}

pub(super) struct OsuPerformanceCalculator<'mods> {
    attrs: OsuDifficultyAttributes,
    mods: &'mods GameMods,
    acc: f64,
    state: OsuScoreState,
    effective_miss_count: f64,
    using_classic_slider_acc: bool,
}

impl<'a> OsuPerformanceCalculator<'a> {
    pub const fn new(
        attrs: OsuDifficultyAttributes,
        mods: &'a GameMods,
        acc: f64,
        state: OsuScoreState,
        effective_miss_count: f64,
        using_classic_slider_acc: bool,
    ) -> Self {
        Self {
            attrs,
            mods,
            acc,
            state,
            effective_miss_count,
            using_classic_slider_acc,
        }
    }
}

impl OsuPerformanceCalculator<'_> {
    pub fn calculate(mut self) -> OsuPerformanceAttributes {
        let n_hits = self.state.total_hits();

        if n_hits == 0 {
            return OsuPerformanceAttributes {
                difficulty: self.attrs,
                ..Default::default()
            };
        }

        let total_hits = f64::from(n_hits);
        let multiplier = self.mod_multiplier(total_hits);

        if self.mods.rx() {
            self.effective_miss_count = self.relax_miss_count(total_hits);
        }

        let speed_deviation = self.speed_deviation();

        let pp_aim = self.aim_value(total_hits);
        let pp_speed = self.speed_value(total_hits, speed_deviation);
        let pp_acc = self.accuracy_value();
        let pp_flashlight = self.flashlight_value(total_hits);

        let pp = norm(PP_NORM, &[pp_aim, pp_speed, pp_acc, pp_flashlight]) * multiplier;

        // The breakdown below does not contribute to the final pp
        let pp_jump_aim = self.movement_value(
            self.attrs.jump,
            self.attrs.jump_aim_difficult_strain_count,
            total_hits,
        );
        let pp_flow_aim = self.movement_value(
            self.attrs.flow,
            self.attrs.flow_aim_difficult_strain_count,
            total_hits,
        );
        let pp_precision = self.movement_value(
            self.attrs.precision,
            self.attrs.aim_difficult_strain_count,
            total_hits,
        );
        let pp_stamina = self.tapping_value(
            self.attrs.stamina,
            self.attrs.stamina_difficult_strain_count,
            total_hits,
            speed_deviation,
        );

        OsuPerformanceAttributes {
            difficulty: self.attrs,
            pp,
            pp_acc,
            pp_aim,
            pp_jump_aim,
            pp_flow_aim,
            pp_precision,
            pp_flashlight,
            pp_speed,
            pp_stamina,
            effective_miss_count: self.effective_miss_count,
            speed_deviation,
        }
    }

    fn mod_multiplier(&self, total_hits: f64) -> f64 {
        let mut multiplier = PERFORMANCE_BASE_MULTIPLIER;

        if self.mods.nf() {
            multiplier *= (1.0 - 0.02 * self.effective_miss_count).max(0.9);
        }

        if self.mods.so() {
            let spinner_ratio = f64::from(self.attrs.n_spinners) / total_hits;
            multiplier *= 1.0 - spinner_ratio.powf(0.85);
        }

        multiplier
    }

    /// With relax, 100s and 50s are treated as partial combo breaks.
    ///
    /// The weights fall off with OD and reach zero at OD 13.33 where the
    /// great hit window closes.
    fn relax_miss_count(&self, total_hits: f64) -> f64 {
        let od = self.attrs.od();

        let (ok_weight, meh_weight) = if od > 0.0 {
            let ratio = od / 13.33;

            ((1.0 - ratio.powf(1.8)).max(0.0), (1.0 - ratio.powf(5.0)).max(0.0))
        } else {
            (1.0, 1.0)
        };

        let misses = self.effective_miss_count
            + f64::from(self.state.n100) * ok_weight
            + f64::from(self.state.n50) * meh_weight;

        misses.min(total_hits)
    }

    fn aim_value(&self, total_hits: f64) -> f64 {
        let aim_difficulty = self.attrs.aim * self.slider_nerf_factor();

        self.movement_value(
            aim_difficulty,
            self.attrs.aim_difficult_strain_count,
            total_hits,
        )
    }

    /// pp of a cursor movement rating such as aim or one of its parts.
    fn movement_value(&self, difficulty: f64, difficult_strain_count: f64, total_hits: f64) -> f64 {
        if self.mods.ap() {
            return 0.0;
        }

        let len_bonus = length_bonus(total_hits);

        let mut value = strain::difficulty_to_performance(difficulty) * len_bonus;

        if self.effective_miss_count > 0.0 {
            value *= miss_penalty(self.effective_miss_count, difficult_strain_count);
        }

        let ar = self.attrs.ar;

        let ar_factor = if self.mods.rx() {
            0.0
        } else if ar < 8.0 {
            0.05 * (8.0 - ar)
        } else {
            high_ar_factor(ar)
        };

        value *= 1.0 + ar_factor * len_bonus;

        if self.mods.bl() {
            let acc_part = self.acc.powf(16.0) * 0.0016 / (1.0 + 2.0 * self.effective_miss_count);
            let hp_part = 1.0 - 0.003 * self.attrs.hp * self.attrs.hp;

            value *= 1.3 + total_hits * acc_part * hp_part;
        } else if self.mods.hd() || self.mods.tc() {
            value *= low_ar_reading_bonus(ar);
        }

        value * self.acc * od_scaling(self.attrs.od())
    }

    /// Scales aim down for sliders that were likely not followed.
    fn slider_nerf_factor(&self) -> f64 {
        let difficult_sliders = self.attrs.aim_difficult_slider_count;

        if self.attrs.n_sliders == 0 || difficult_sliders <= 0.0 {
            return 1.0;
        }

        let dropped = if self.using_classic_slider_acc {
            // Classic scores only reveal dropped combo so assume every
            // break happened on a difficult slider
            let missing_combo = self.attrs.max_combo.saturating_sub(self.state.max_combo);

            total_imperfect_hits(&self.state).min(f64::from(missing_combo))
        } else {
            // Missed heads are already penalized on their own
            f64::from(
                n_slider_ends_dropped(&self.attrs, &self.state)
                    + n_large_tick_miss(&self.attrs, &self.state),
            )
        };

        let followed_ratio = 1.0 - dropped.clamp(0.0, difficult_sliders) / difficult_sliders;
        let slider_factor = self.attrs.slider_factor;

        (1.0 - slider_factor) * followed_ratio.powf(3.0) + slider_factor
    }

    fn speed_value(&self, total_hits: f64, speed_deviation: Option<f64>) -> f64 {
        self.tapping_value(
            self.attrs.speed,
            self.attrs.speed_difficult_strain_count,
            total_hits,
            speed_deviation,
        )
    }

    /// pp of a tapping rating such as speed or stamina.
    fn tapping_value(
        &self,
        difficulty: f64,
        difficult_strain_count: f64,
        total_hits: f64,
        speed_deviation: Option<f64>,
    ) -> f64 {
        let Some(deviation) = speed_deviation.filter(|_| !self.mods.rx()) else {
            return 0.0;
        };

        let raw_value = strain::difficulty_to_performance(difficulty);
        let len_bonus = length_bonus(total_hits);

        let mut value = raw_value * len_bonus;

        if self.effective_miss_count > 0.0 {
            value *= miss_penalty(self.effective_miss_count, difficult_strain_count);
        }

        let ar_factor = if self.mods.ap() {
            0.0
        } else {
            high_ar_factor(self.attrs.ar)
        };

        value *= 1.0 + ar_factor * len_bonus;

        if self.mods.bl() {
            value *= 1.12;
        } else if self.mods.hd() || self.mods.tc() {
            value *= low_ar_reading_bonus(self.attrs.ar);
        }

        value *= high_deviation_nerf(raw_value, deviation);

        let od = self.attrs.od();
        let acc = (self.acc + self.speed_note_accuracy(total_hits)) / 2.0;

        value * (0.95 + od.max(0.0).powf(2.0) / 750.0) * acc.powf((14.5 - od) / 2.0)
    }

    /// Accuracy on speed notes, assuming every non-300 landed on one.
    fn speed_note_accuracy(&self, total_hits: f64) -> f64 {
        let speed_notes = self.attrs.speed_note_count;

        if speed_notes.eq(0.0) {
            return 0.0;
        }

        let mut irrelevant = (total_hits - speed_notes).max(0.0);

        let mut take = |count: u32| {
            let count = f64::from(count);
            let kept = (count - irrelevant).max(0.0);
            irrelevant = (irrelevant - count).max(0.0);

            kept
        };

        let n300 = take(self.state.n300);
        let n100 = take(self.state.n100);
        let n50 = take(self.state.n50);

        (n300 * 6.0 + n100 * 2.0 + n50) / (speed_notes * 6.0)
    }

    fn accuracy_value(&self) -> f64 {
        if self.mods.rx() {
            return 0.0;
        }

        // Only objects with a timed hit count towards this value
        let mut n_timed = self.attrs.n_circles;

        if !self.using_classic_slider_acc {
            n_timed += self.attrs.n_sliders;
        }

        let timed_acc = if n_timed > 0 {
            let untimed = (self.state.total_hits() as i32 - n_timed as i32).max(0);
            let weighted = (self.state.n300 as i32 - untimed) * 6
                + self.state.n100 as i32 * 2
                + self.state.n50 as i32;

            (f64::from(weighted) / f64::from(n_timed * 6)).max(0.0)
        } else {
            0.0
        };

        let mut value = base_accuracy_value(self.attrs.od(), timed_acc, n_timed);

        if self.mods.bl() {
            value *= 1.14;
        } else if self.mods.hd() || self.mods.tc() {
            value *= 1.08;
        }

        if self.mods.fl() {
            value *= 1.02;
        }

        value
    }

    fn flashlight_value(&self, total_hits: f64) -> f64 {
        if !self.mods.fl() {
            return 0.0;
        }

        let mut value = Flashlight::difficulty_to_performance(self.attrs.flashlight);

        if self.effective_miss_count > 0.0 {
            let miss_ratio = self.effective_miss_count / total_hits;

            value *= 0.97 * (1.0 - miss_ratio.powf(0.775)).powf(self.effective_miss_count.powf(0.875));
        }

        value *= self.combo_scaling();

        // Short maps spend a larger share of their time at a small combo
        // which means a wider flashlight radius
        let mut len_factor = 0.7 + 0.1 * (total_hits / 200.0).min(1.0);

        if total_hits > 200.0 {
            len_factor += 0.2 * ((total_hits - 200.0) / 200.0).min(1.0);
        }

        value * len_factor * (0.5 + self.acc / 2.0) * od_scaling(self.attrs.od())
    }

    fn combo_scaling(&self) -> f64 {
        if self.attrs.max_combo == 0 {
            return 1.0;
        }

        let ratio = f64::from(self.state.max_combo).powf(0.8)
            / f64::from(self.attrs.max_combo).powf(0.8);

        ratio.min(1.0)
    }

    /// Estimated hit deviation on speed notes, assuming every mistake was
    /// made on one.
    fn speed_deviation(&self) -> Option<f64> {
        let state = &self.state;

        if state.n300 + state.n100 + state.n50 == 0 {
            return None;
        }

        let speed_notes = self.attrs.speed_note_count
            + (f64::from(state.total_hits()) - self.attrs.speed_note_count) * 0.1;

        let miss = f64::from(state.misses).min(speed_notes);
        let meh = f64::from(state.n50).min(speed_notes - miss);
        let ok = f64::from(state.n100).min(speed_notes - miss - meh);
        let great = (speed_notes - miss - meh - ok).max(0.0);

        let counts = RelevantHits { great, ok, meh };

        let windows = HitWindows {
            great: self.attrs.great_hit_window,
            ok: self.attrs.ok_hit_window,
            meh: self.attrs.meh_hit_window,
        };

        estimate_deviation(&counts, &windows)
    }
}

struct RelevantHits {
    great: f64,
    ok: f64,
    meh: f64,
}

struct HitWindows {
    great: f64,
    ok: f64,
    meh: f64,
}

/// Upper bound of the hit deviation with 99% confidence.
///
/// Greats and oks are assumed to be normally distributed, mehs uniformly.
fn estimate_deviation(hits: &RelevantHits, windows: &HitWindows) -> Option<f64> {
    let n_hit = hits.great + hits.ok + hits.meh;

    if n_hit <= 0.0 {
        return None;
    }

    // Share of greats among greats and oks
    let n = (hits.great + hits.ok).max(1.0);
    let p = hits.great / n;

    let p_lower = probability_lower_bound(n, p);

    let mut deviation = windows.great / (SQRT_2 * erf_inv(p_lower));

    let ok_ratio = windows.ok / deviation;
    let random_value = (2.0 / PI).sqrt() * windows.ok * (-0.5 * ok_ratio * ok_ratio).exp()
        / (deviation * erf(windows.ok / (SQRT_2 * deviation)));

    deviation *= (1.0 - random_value).sqrt();

    // Limit as the great count approaches zero
    let limit = windows.ok / 3.0_f64.sqrt();

    if p_lower.eq(0.0) || random_value >= 1.0 || deviation > limit {
        deviation = limit;
    }

    let meh_variance =
        (windows.meh * windows.meh + windows.ok * windows.meh + windows.ok * windows.ok) / 3.0;

    let variance = ((hits.great + hits.ok) * deviation * deviation + hits.meh * meh_variance)
        / n_hit;

    Some(variance.sqrt())
}

/// Speed pp beyond what the deviation allows for grows only
/// logarithmically.
///
/// Deviations up to 22ms (220 UR) are never nerfed.
fn high_deviation_nerf(speed_value: f64, deviation: f64) -> f64 {
    const SCALE: f64 = 50.0;

    let cutoff = 100.0 + 220.0 * (22.0 / deviation).powf(6.5);

    if speed_value <= cutoff {
        return 1.0;
    }

    let adjusted = SCALE * (((speed_value - cutoff) / SCALE).ln_1p() + cutoff / SCALE);
    let t = 1.0 - reverse_lerp(deviation, 22.0, 27.0);

    lerp(adjusted, speed_value, t) / speed_value
}

/// Misses hurt more on maps with few difficult sections.
fn miss_penalty(miss_count: f64, difficult_strain_count: f64) -> f64 {
    0.96 / (miss_count / (4.0 * difficult_strain_count.ln().powf(0.94)) + 1.0)
}

fn length_bonus(total_hits: f64) -> f64 {
    let ratio = total_hits / 2000.0;
    let bonus = 0.95 + 0.4 * ratio.min(1.0);

    if total_hits > 2000.0 {
        bonus + ratio.log10() * 0.5
    } else {
        bonus
    }
}

fn high_ar_factor(ar: f64) -> f64 {
    if ar > 10.33 {
        0.3 * (ar - 10.33)
    } else {
        0.0
    }
}

/// Hidden rewards lower AR.
fn low_ar_reading_bonus(ar: f64) -> f64 {
    1.0 + 0.04 * (12.0 - ar)
}

fn od_scaling(od: f64) -> f64 {
    0.98 + od.max(0.0).powf(2.0) / 2500.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_bonus_is_continuous() {
        let below = length_bonus(1999.999);
        let above = length_bonus(2000.001);

        assert!((below - above).abs() < 1e-3);
        assert!((length_bonus(2000.0) - 1.35).abs() < 1e-12);
    }

    #[test]
    fn small_deviation_is_not_nerfed() {
        assert!((high_deviation_nerf(300.0, 10.0) - 1.0).abs() < f64::EPSILON);
        assert!(high_deviation_nerf(600.0, 40.0) < 1.0);
    }

    #[test]
    fn deviation_grows_with_mistakes() {
        let windows = HitWindows {
            great: 30.0,
            ok: 70.0,
            meh: 110.0,
        };

        let clean = RelevantHits {
            great: 500.0,
            ok: 5.0,
            meh: 0.0,
        };

        let sloppy = RelevantHits {
            great: 400.0,
            ok: 90.0,
            meh: 15.0,
        };

        let clean = estimate_deviation(&clean, &windows).unwrap();
        let sloppy = estimate_deviation(&sloppy, &windows).unwrap();

        assert!(clean < sloppy);
    }

    #[test]
    fn no_hits_no_deviation() {
        let windows = HitWindows {
            great: 30.0,
            ok: 70.0,
            meh: 110.0,
        };

        let hits = RelevantHits {
            great: 0.0,
            ok: 0.0,
            meh: 0.0,
        };

        assert!(estimate_deviation(&hits, &windows).is_none());
    }
}
