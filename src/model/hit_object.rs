use rosu_map::section::{
    general::GameMode,
    hit_objects::{BorrowedCurve, CurveBuffers},
};

pub use rosu_map::{
    section::hit_objects::{hit_samples::HitSoundType, PathControlPoint, PathType, SplineType},
    util::Pos,
};

/// A hit object as decoded from a `.osu` file.
///
/// Mode-specific processing happens later on, e.g. sliders only gain their
/// ticks once an osu!standard calculation needs them.
#[derive(Clone, Debug, PartialEq)]
pub struct HitObject {
    pub pos: Pos,
    pub start_time: f64,
    pub kind: HitObjectKind,
}

impl HitObject {
    pub const fn is_circle(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Circle)
    }

    pub const fn is_slider(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Slider(_))
    }

    pub const fn is_spinner(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Spinner(_))
    }

    pub const fn is_hold_note(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Hold(_))
    }

    /// The end time of the object.
    ///
    /// Sliders have no duration before their curve is evaluated so their
    /// start time is returned instead.
    pub fn end_time(&self) -> f64 {
        match &self.kind {
            HitObjectKind::Circle | HitObjectKind::Slider(_) => self.start_time,
            HitObjectKind::Spinner(Spinner { duration })
            | HitObjectKind::Hold(HoldNote { duration }) => self.start_time + *duration,
        }
    }
}

/// Type-specific data of a [`HitObject`].
#[derive(Clone, Debug, PartialEq)]
pub enum HitObjectKind {
    Circle,
    Slider(Slider),
    Spinner(Spinner),
    Hold(HoldNote),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
    pub expected_dist: Option<f64>,
    pub repeats: usize,
    pub control_points: Box<[PathControlPoint]>,
    pub node_sounds: Box<[HitSoundType]>,
}

impl Slider {
    /// Amount of times the slider is traversed.
    pub const fn span_count(&self) -> usize {
        self.repeats + 1
    }

    pub(crate) fn curve<'a>(
        &self,
        mode: GameMode,
        bufs: &'a mut CurveBuffers,
    ) -> BorrowedCurve<'a> {
        BorrowedCurve::new(mode, &self.control_points, self.expected_dist, bufs)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spinner {
    pub duration: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HoldNote {
    pub duration: f64,
}
