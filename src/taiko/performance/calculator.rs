use std::f64::consts::SQRT_2;

use crate::{
    model::mods::GameMods,
    taiko::{
        attributes::{TaikoDifficultyAttributes, TaikoPerformanceAttributes},
        score_state::TaikoScoreState,
    },
    util::{
        difficulty::{norm, probability_lower_bound},
        special_functions::{erf, erf_inv},
    },
};

pub(super) struct TaikoPerformanceCalculator<'mods> {
    attrs: TaikoDifficultyAttributes,
    mods: &'mods GameMods,
    state: TaikoScoreState,
}

impl<'a> TaikoPerformanceCalculator<'a> {
    pub const fn new(
        attrs: TaikoDifficultyAttributes,
        mods: &'a GameMods,
        state: TaikoScoreState,
    ) -> Self {
        Self { attrs, mods, state }
    }
}

impl TaikoPerformanceCalculator<'_> {
    pub fn calculate(self) -> TaikoPerformanceAttributes {
        let estimated_unstable_rate = self.deviation_upper_bound().map(|dev| dev * 10.0);
        let effective_miss_count = self.effective_miss_count();

        let mut multiplier = 1.13;

        if self.mods.hd() && !self.attrs.is_convert {
            multiplier *= 1.075;
        }

        if self.mods.ez() {
            multiplier *= 0.95;
        }

        let (pp_difficulty, pp_acc) = match estimated_unstable_rate {
            Some(unstable_rate) => (
                self.difficulty_value(effective_miss_count, unstable_rate),
                self.accuracy_value(unstable_rate),
            ),
            None => (0.0, 0.0),
        };

        TaikoPerformanceAttributes {
            difficulty: self.attrs,
            pp: norm(1.1, &[pp_difficulty, pp_acc]) * multiplier,
            pp_acc,
            pp_difficulty,
            effective_miss_count,
            estimated_unstable_rate,
        }
    }

    /// Misses weigh more on maps with fewer than 1000 successful hits.
    fn effective_miss_count(&self) -> f64 {
        let n_successful = self.state.n300 + self.state.n100;

        if n_successful == 0 {
            return 0.0;
        }

        (1000.0 / f64::from(n_successful)).max(1.0) * f64::from(self.state.misses)
    }

    fn difficulty_value(&self, effective_miss_count: f64, unstable_rate: f64) -> f64 {
        let attrs = &self.attrs;

        let base = 5.0 * (attrs.stars / 0.110).max(1.0) - 4.0;
        let mut value = (base.powf(3.0) / 69_052.51).min(base.powf(2.25) / 1250.0);

        value *= 1.0 + 0.10 * (attrs.stars - 10.0).max(0.0);

        let len_bonus = 1.0 + 0.1 * (f64::from(attrs.max_combo) / 1500.0).min(1.0);
        value *= len_bonus * 0.986_f64.powf(effective_miss_count);

        if self.mods.ez() {
            value *= 0.9;
        }

        if self.mods.hd() {
            value *= 1.025;
        }

        if self.mods.fl() {
            let mono_share = (attrs.mono_stamina_factor / 50.0).min(1.0);
            value *= (1.05 - mono_share * len_bonus).max(1.0);
        }

        // Mostly single-colored speed maps scale harder with accuracy
        let exp = 2.0 + attrs.mono_stamina_factor;
        let shift = 500.0 - 300.0 * attrs.mono_stamina_factor;

        value * erf(shift / (SQRT_2 * unstable_rate)).powf(exp)
    }

    fn accuracy_value(&self, unstable_rate: f64) -> f64 {
        if self.attrs.great_hit_window <= 0.0 {
            return 0.0;
        }

        let value = (70.0 / unstable_rate).powf(1.1) * self.attrs.stars.powf(0.4) * 100.0;

        if self.mods.hd() && self.mods.fl() && !self.attrs.is_convert {
            let total_hits = f64::from(self.state.total_hits());
            let len_bonus = (total_hits / 1500.0).powf(0.3).min(1.15);

            value * (1.05 * len_bonus).max(1.0)
        } else {
            value
        }
    }

    /// Upper bound of the tap deviation with 99% confidence, assuming a mean
    /// hit error of zero.
    ///
    /// Two SS scores with the same settings always share the same bound.
    fn deviation_upper_bound(&self) -> Option<f64> {
        if self.state.n300 == 0 || self.attrs.great_hit_window <= 0.0 {
            return None;
        }

        let n = f64::from(self.state.total_hits());
        let p_lower = probability_lower_bound(n, f64::from(self.state.n300) / n);

        Some(self.attrs.great_hit_window / (SQRT_2 * erf_inv(p_lower)))
    }
}
