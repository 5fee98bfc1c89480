use crate::{
    catch::{
        attributes::{CatchDifficultyAttributes, CatchPerformanceAttributes},
        score_state::CatchScoreState,
    },
    model::mods::GameMods,
};

pub(super) struct CatchPerformanceCalculator<'mods> {
    attrs: CatchDifficultyAttributes,
    mods: &'mods GameMods,
    state: CatchScoreState,
}

impl<'a> CatchPerformanceCalculator<'a> {
    pub const fn new(
        attrs: CatchDifficultyAttributes,
        mods: &'a GameMods,
        state: CatchScoreState,
    ) -> Self {
        Self { attrs, mods, state }
    }
}

impl CatchPerformanceCalculator<'_> {
    pub fn calculate(self) -> CatchPerformanceAttributes {
        let max_combo = self.attrs.max_combo();
        let ar = self.attrs.ar;

        // Relying heavily on aim
        let mut pp = (5.0 * (self.attrs.stars / 0.0049).max(1.0) - 4.0).powf(2.0) / 100_000.0;

        let combo_hits = match self.combo_hits() {
            0 => max_combo,
            n => n,
        };

        let len_bonus = length_bonus(combo_hits);
        pp *= len_bonus;

        // Penalize misses exponentially
        pp *= 0.97_f64.powf(f64::from(self.state.misses));

        if self.state.max_combo > 0 && max_combo > 0 {
            let combo_ratio = f64::from(self.state.max_combo) / f64::from(max_combo);
            pp *= combo_ratio.powf(0.8).min(1.0);
        }

        pp *= ar_factor(ar);

        if self.mods.hd() {
            pp *= hidden_bonus(ar);
        }

        if self.mods.fl() {
            pp *= 1.35 * len_bonus;
        }

        pp *= self.state.accuracy().powf(5.5);

        if self.mods.nf() {
            pp *= (1.0 - 0.02 * f64::from(self.state.misses)).max(0.9);
        }

        CatchPerformanceAttributes {
            difficulty: self.attrs,
            pp,
        }
    }

    const fn combo_hits(&self) -> u32 {
        self.state.fruits + self.state.droplets + self.state.misses
    }
}

/// Longer maps are worth more.
fn length_bonus(combo_hits: u32) -> f64 {
    let ratio = f64::from(combo_hits) / 2500.0;
    let bonus = 0.95 + 0.3 * ratio.min(1.0);

    if combo_hits > 2500 {
        bonus + ratio.log10() * 0.475
    } else {
        bonus
    }
}

fn ar_factor(ar: f64) -> f64 {
    if ar > 10.0 {
        1.0 + 0.1 * (ar - 9.0) + 0.1 * (ar - 10.0)
    } else if ar > 9.0 {
        1.0 + 0.1 * (ar - 9.0)
    } else if ar < 8.0 {
        1.0 + 0.025 * (8.0 - ar)
    } else {
        1.0
    }
}

fn hidden_bonus(ar: f64) -> f64 {
    if ar <= 10.0 {
        1.05 + 0.075 * (10.0 - ar)
    } else {
        1.01 + 0.04 * (11.0 - ar.min(11.0))
    }
}
