use serde::Serialize;

use super::performance::CatchPerformance;

/// The result of a difficulty calculation on an osu!catch map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CatchDifficultyAttributes {
    /// The final star rating
    pub stars: f64,
    /// The approach rate.
    pub ar: f64,
    /// The amount of fruits.
    pub n_fruits: u32,
    /// The amount of droplets.
    pub n_droplets: u32,
    /// The amount of tiny droplets.
    pub n_tiny_droplets: u32,
    /// Whether the map was converted from osu!standard.
    pub is_convert: bool,
}

impl CatchDifficultyAttributes {
    /// Maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        self.n_fruits + self.n_droplets
    }

    /// Whether the map was converted from osu!standard.
    pub const fn is_convert(&self) -> bool {
        self.is_convert
    }

    /// Start a performance calculation that re-uses these attributes.
    pub fn performance<'a>(self) -> CatchPerformance<'a> {
        self.into()
    }

    pub(crate) const fn add_object_count(&mut self, count: ObjectCount) {
        if count.fruit {
            self.n_fruits += 1;
        } else {
            self.n_droplets += 1;
        }

        self.n_tiny_droplets += count.tiny_droplets;
    }
}

/// The result of a performance calculation on an osu!catch map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CatchPerformanceAttributes {
    /// Difficulty attributes the calculation was based on.
    pub difficulty: CatchDifficultyAttributes,
    /// Final pp.
    pub pp: f64,
}

impl CatchPerformanceAttributes {
    /// Star rating of the map.
    pub const fn stars(&self) -> f64 {
        self.difficulty.stars
    }

    /// Final pp.
    pub const fn pp(&self) -> f64 {
        self.pp
    }

    /// Maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        self.difficulty.max_combo()
    }

    /// Whether the map was converted from osu!standard.
    pub const fn is_convert(&self) -> bool {
        self.difficulty.is_convert
    }

    /// Start a performance calculation that re-uses these attributes.
    pub fn performance<'a>(self) -> CatchPerformance<'a> {
        self.difficulty.into()
    }
}

impl From<CatchPerformanceAttributes> for CatchDifficultyAttributes {
    fn from(attributes: CatchPerformanceAttributes) -> Self {
        attributes.difficulty
    }
}

/// A caught fruit or droplet together with the tiny droplets that
/// preceded it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectCount {
    pub fruit: bool,
    pub tiny_droplets: u32,
}

/// Records an [`ObjectCount`] for every fruit and droplet in conversion
/// order.
#[derive(Clone, Debug, Default)]
pub struct ObjectCountBuilder {
    pending_tiny_droplets: u32,
    counts: Vec<ObjectCount>,
}

impl ObjectCountBuilder {
    pub fn new() -> Self {
        Self {
            pending_tiny_droplets: 0,
            counts: Vec::with_capacity(512),
        }
    }

    pub fn record_fruit(&mut self) {
        self.push(true);
    }

    pub fn record_droplet(&mut self) {
        self.push(false);
    }

    pub const fn record_tiny_droplet(&mut self) {
        self.pending_tiny_droplets += 1;
    }

    fn push(&mut self, fruit: bool) {
        self.counts.push(ObjectCount {
            fruit,
            tiny_droplets: self.pending_tiny_droplets,
        });

        self.pending_tiny_droplets = 0;
    }

    pub fn into_counts(self) -> Vec<ObjectCount> {
        self.counts
    }
}
