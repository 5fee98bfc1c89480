use crate::{
    mania::{
        attributes::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
        score_state::ManiaScoreState,
    },
    model::mods::GameMods,
};

pub(super) struct ManiaPerformanceCalculator<'mods> {
    attrs: ManiaDifficultyAttributes,
    mods: &'mods GameMods,
    state: ManiaScoreState,
}

impl<'a> ManiaPerformanceCalculator<'a> {
    pub const fn new(
        attrs: ManiaDifficultyAttributes,
        mods: &'a GameMods,
        state: ManiaScoreState,
    ) -> Self {
        Self { attrs, mods, state }
    }
}

impl ManiaPerformanceCalculator<'_> {
    pub fn calculate(self) -> ManiaPerformanceAttributes {
        let mut multiplier = 1.0;

        if self.mods.nf() {
            multiplier *= 0.75;
        }

        if self.mods.ez() {
            multiplier *= 0.5;
        }

        let difficulty_value = self.difficulty_value();

        ManiaPerformanceAttributes {
            pp: difficulty_value * multiplier,
            pp_difficulty: difficulty_value,
            difficulty: self.attrs,
        }
    }

    fn difficulty_value(&self) -> f64 {
        let total_hits = f64::from(self.state.total_hits());

        8.0 * (self.attrs.stars - 0.15).max(0.05).powf(2.2)
            // 5% of the pp per accuracy percent above 80%
            * (5.0 * self.custom_accuracy() - 4.0).max(0.0)
            // Length bonus up to 1500 notes
            * (1.0 + 0.1 * (total_hits / 1500.0).min(1.0))
    }

    /// Accuracy in which 320s are worth slightly more than 300s.
    fn custom_accuracy(&self) -> f64 {
        let total_hits = self.state.total_hits();

        if total_hits == 0 {
            return 0.0;
        }

        let ManiaScoreState {
            n320,
            n300,
            n200,
            n100,
            n50,
            misses: _,
        } = self.state;

        let numerator = n320 * 32 + n300 * 30 + n200 * 20 + n100 * 10 + n50 * 5;
        let denominator = total_hits * 32;

        f64::from(numerator) / f64::from(denominator)
    }
}
