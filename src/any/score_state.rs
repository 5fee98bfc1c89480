use serde::Serialize;

use crate::{
    catch::CatchScoreState, mania::ManiaScoreState, model::mode::GameMode, osu::OsuScoreState,
    taiko::TaikoScoreState,
};

/// Hitresults and combo of a score on a map of any mode.
///
/// Fields are named after osu!standard judgements. The other modes map them
/// as follows:
///
/// | field    | osu!taiko | osu!catch           | osu!mania |
/// | -------- | --------- | ------------------- | --------- |
/// | `n_geki` |           |                     | n320      |
/// | `n_katu` |           | tiny droplet misses | n200      |
/// | `n300`   | n300      | fruits              | n300      |
/// | `n100`   | n100      | droplets            | n100      |
/// | `n50`    |           | tiny droplets       | n50       |
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ScoreState {
    /// Highest combo reached so far, not the map's maximum.
    ///
    /// Only fruits and droplets count for osu!catch. Unused for osu!mania.
    pub max_combo: u32,
    /// Hit slider ticks and repeats on lazer scores. Slider heads count too
    /// if slider accuracy is disabled. Unused for stable scores.
    pub osu_large_tick_hits: u32,
    /// Hit slider tails on lazer scores without slider accuracy.
    pub osu_small_tick_hits: u32,
    /// Hit slider ends on lazer scores with slider accuracy.
    pub slider_end_hits: u32,
    pub n_geki: u32,
    pub n_katu: u32,
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
    /// For osu!catch this covers fruits and droplets.
    pub misses: u32,
}

impl ScoreState {
    /// A state without any hits.
    pub const fn new() -> Self {
        Self {
            max_combo: 0,
            osu_large_tick_hits: 0,
            osu_small_tick_hits: 0,
            slider_end_hits: 0,
            n_geki: 0,
            n_katu: 0,
            n300: 0,
            n100: 0,
            n50: 0,
            misses: 0,
        }
    }

    /// Sum of all hitresults that are relevant for `mode`.
    pub const fn total_hits(&self, mode: GameMode) -> u32 {
        let base = self.n300 + self.n100 + self.misses;

        match mode {
            GameMode::Taiko => base,
            GameMode::Osu => base + self.n50,
            GameMode::Catch => base + self.n50 + self.n_katu,
            GameMode::Mania => base + self.n50 + self.n_katu + self.n_geki,
        }
    }
}

impl From<ScoreState> for OsuScoreState {
    fn from(state: ScoreState) -> Self {
        Self {
            max_combo: state.max_combo,
            large_tick_hits: state.osu_large_tick_hits,
            small_tick_hits: state.osu_small_tick_hits,
            slider_end_hits: state.slider_end_hits,
            n300: state.n300,
            n100: state.n100,
            n50: state.n50,
            misses: state.misses,
        }
    }
}

impl From<ScoreState> for TaikoScoreState {
    fn from(state: ScoreState) -> Self {
        Self {
            max_combo: state.max_combo,
            n300: state.n300,
            n100: state.n100,
            misses: state.misses,
        }
    }
}

impl From<ScoreState> for CatchScoreState {
    fn from(state: ScoreState) -> Self {
        Self {
            max_combo: state.max_combo,
            fruits: state.n300,
            droplets: state.n100,
            tiny_droplets: state.n50,
            tiny_droplet_misses: state.n_katu,
            misses: state.misses,
        }
    }
}

impl From<ScoreState> for ManiaScoreState {
    fn from(state: ScoreState) -> Self {
        Self {
            n320: state.n_geki,
            n300: state.n300,
            n200: state.n_katu,
            n100: state.n100,
            n50: state.n50,
            misses: state.misses,
        }
    }
}

impl From<OsuScoreState> for ScoreState {
    fn from(state: OsuScoreState) -> Self {
        Self {
            max_combo: state.max_combo,
            osu_large_tick_hits: state.large_tick_hits,
            osu_small_tick_hits: state.small_tick_hits,
            slider_end_hits: state.slider_end_hits,
            n300: state.n300,
            n100: state.n100,
            n50: state.n50,
            misses: state.misses,
            ..Self::new()
        }
    }
}

impl From<TaikoScoreState> for ScoreState {
    fn from(state: TaikoScoreState) -> Self {
        Self {
            max_combo: state.max_combo,
            n300: state.n300,
            n100: state.n100,
            misses: state.misses,
            ..Self::new()
        }
    }
}

impl From<CatchScoreState> for ScoreState {
    fn from(state: CatchScoreState) -> Self {
        Self {
            max_combo: state.max_combo,
            n_katu: state.tiny_droplet_misses,
            n300: state.fruits,
            n100: state.droplets,
            n50: state.tiny_droplets,
            misses: state.misses,
            ..Self::new()
        }
    }
}

impl From<ManiaScoreState> for ScoreState {
    fn from(state: ManiaScoreState) -> Self {
        Self {
            n_geki: state.n320,
            n_katu: state.n200,
            n300: state.n300,
            n100: state.n100,
            n50: state.n50,
            misses: state.misses,
            ..Self::new()
        }
    }
}
