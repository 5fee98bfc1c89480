//! Difficulty and performance calculation for all [osu!] gamemodes.
//!
//! ## Description
//!
//! Beatmaps are decoded through [`rosu-map`] and can be converted from
//! osu!standard into any other mode. From there, the star rating, the
//! performance points of a score, and the strain peaks over time can be
//! calculated for any combination of mods and difficulty settings.
//!
//! Scores that are still in progress are handled by the gradual
//! calculators. They process one hit object at a time so that a play can
//! be followed without recalculating everything on every object.
//!
//! ## Usage
//!
//! ```
//! use rosu_perf::{model::mode::GameMode, Beatmap, Difficulty, GameMods, Performance};
//!
//! // Decode the map
//! let map = Beatmap::from_path("./resources/osu.osu").unwrap();
//!
//! // Whether the map abuses game mechanics to an extent that makes
//! // calculations infeasible is up to the caller to decide
//! if let Err(sus) = map.check_suspicion() {
//!     panic!("{sus:?}");
//! }
//!
//! // Calculate difficulty attributes
//! let mods = GameMods::from_acronyms("HDHR", GameMode::Osu);
//!
//! let diff_attrs = Difficulty::new()
//!     .mods(mods.clone())
//!     .calculate(&map);
//!
//! let stars = diff_attrs.stars();
//! let max_combo = diff_attrs.max_combo();
//!
//! // Calculate performance attributes
//! // To speed up the calculation, we re-use the previous attributes
//! // instead of the map. **Note** that this should only be done if the
//! // map, mode, mods, and amount of passed objects stay the same.
//! // Otherwise, the resulting attributes will be incorrect.
//! let perf_attrs = Performance::new(diff_attrs)
//!     .mods(mods.clone())
//!     .combo(max_combo / 2)
//!     .accuracy(99.2)
//!     .misses(2)
//!     .calculate();
//!
//! assert!((perf_attrs.stars() - stars).abs() < f64::EPSILON);
//!
//! let pp = perf_attrs.pp();
//!
//! // Re-use the previous attributes for the full combo pp.
//! let max_pp = Performance::new(perf_attrs)
//!     .mods(mods)
//!     .calculate()
//!     .pp();
//!
//! println!("Stars: {stars} | PP: {pp}/{max_pp}");
//! ```
//!
//! ## Gradual calculation
//!
//! ```
//! use rosu_perf::{Beatmap, Difficulty, GradualPerformance, ScoreState};
//!
//! let map = Beatmap::from_path("./resources/taiko.osu").unwrap();
//!
//! let mut gradual = GradualPerformance::new(Difficulty::new(), &map);
//! let mut state = ScoreState::new();
//!
//! // The first object was hit perfectly
//! state.n300 += 1;
//! state.max_combo += 1;
//!
//! let attrs = gradual.next(state).unwrap();
//! println!("PP after one object: {}", attrs.pp());
//! ```
//!
//! [osu!]: https://osu.ppy.sh/home
//! [`rosu-map`]: https://docs.rs/rosu-map

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::missing_const_for_fn, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::struct_excessive_bools,
    clippy::match_same_arms,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::explicit_iter_loop,
    clippy::similar_names,
    clippy::cast_possible_wrap
)]

#[doc(inline)]
pub use self::{
    any::{
        Difficulty, DifficultyAttributes, GradualDifficulty, GradualPerformance, Performance,
        PerformanceAttributes, ScoreState,
    },
    model::{beatmap::Beatmap, mods::GameMods},
};

/// Types for calculations of any mode.
pub mod any;

/// Types for osu!standard calculations.
pub mod osu;

/// Types for osu!taiko calculations.
pub mod taiko;

/// Types for osu!catch calculations.
pub mod catch;

/// Types for osu!mania calculations.
pub mod mania;

/// Types used in and around this crate.
pub mod model;

mod util;
