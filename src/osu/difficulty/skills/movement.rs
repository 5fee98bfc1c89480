use crate::{
    any::difficulty::skills::{count_top_weighted_strains, strain_decay, StrainSkill},
    osu::difficulty::object::OsuDifficultyObject,
    util::difficulty::{lerp, smoothstep},
};

use super::{
    aim::AimEvaluator,
    strain::{self, REDUCED_SECTION_COUNT},
};

const SKILL_MULTIPLIER: f64 = 25.6;
const STRAIN_DECAY_BASE: f64 = 0.15;

/// The part of the aim strain a [`Movement`] skill keeps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MovementKind {
    /// Snapping onto objects.
    Jump,
    /// Following objects in a continuous motion.
    Flow,
}

/// Aim without sliders, restricted to either jumps or flow.
///
/// The jump and flow strains of an object add up to its aim strain.
#[derive(Clone, Debug)]
pub struct Movement {
    kind: MovementKind,
    curr_strain: f64,
    inner: StrainSkill,
}

impl Movement {
    pub fn new(kind: MovementKind) -> Self {
        Self {
            kind,
            curr_strain: 0.0,
            inner: StrainSkill::default(),
        }
    }

    pub fn process(&mut self, curr: &OsuDifficultyObject, diff_objects: &[OsuDifficultyObject]) {
        let prev_start_time = curr
            .previous(0, diff_objects)
            .map_or(0.0, |prev| prev.start_time);

        let curr_strain = self.curr_strain;

        self.inner.advance(curr.idx, curr.start_time, |time| {
            curr_strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
        });

        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_strain +=
            MovementEvaluator::evaluate_diff_of(curr, diff_objects, self.kind) * SKILL_MULTIPLIER;

        self.inner.record(self.curr_strain);
    }

    pub fn curr_strain_peaks(&self) -> Vec<f64> {
        self.inner.curr_strain_peaks()
    }

    pub fn difficulty_value(&self) -> f64 {
        strain::difficulty_value(self.inner.curr_strain_peaks(), REDUCED_SECTION_COUNT)
    }

    pub fn count_top_weighted_strains(&self, difficulty_value: f64) -> f64 {
        count_top_weighted_strains(&self.inner.object_strains, difficulty_value)
    }
}

struct MovementEvaluator;

impl MovementEvaluator {
    /// Below this delta time, objects are fully flowable.
    const FLOW_TIME_MIN: f64 = 90.0;
    /// Above this delta time, objects are always snapped to.
    const FLOW_TIME_MAX: f64 = 140.0;

    fn evaluate_diff_of(
        curr: &OsuDifficultyObject,
        diff_objects: &[OsuDifficultyObject],
        kind: MovementKind,
    ) -> f64 {
        let aim = AimEvaluator::evaluate_diff_of(curr, diff_objects, false);

        if aim <= 0.0 {
            return 0.0;
        }

        let flow = Self::flow_probability(curr);

        match kind {
            MovementKind::Jump => aim * (1.0 - flow),
            MovementKind::Flow => aim * flow,
        }
    }

    /// Likelihood in `[0, 1]` that `curr` is reached by following the cursor
    /// path instead of snapping onto it.
    fn flow_probability(curr: &OsuDifficultyObject) -> f64 {
        let tempo = smoothstep(curr.strain_time, Self::FLOW_TIME_MAX, Self::FLOW_TIME_MIN);

        // Sharp turns break the motion
        let angle = curr.angle.map_or(1.0, |angle| {
            smoothstep(angle, f64::to_radians(45.0), f64::to_radians(100.0))
        });

        let spacing = smoothstep(
            curr.lazy_jump_dist,
            AimEvaluator::DIAMETER * 2.5,
            AimEvaluator::DIAMETER,
        );

        tempo * angle * lerp(0.5, 1.0, spacing)
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::{section::hit_objects::CurveBuffers, util::Pos};

    use crate::{
        model::{
            beatmap::Beatmap,
            hit_object::{HitObject, HitObjectKind},
        },
        osu::{difficulty::scaling_factor::ScalingFactor, object::OsuObject},
        util::float_ext::FloatExt,
    };

    use super::*;

    fn diff_objects(positions: &[(f32, f32)], spacing: f64) -> Vec<OsuDifficultyObject> {
        let map = Beatmap::default();
        let mut bufs = CurveBuffers::default();

        let objects: Vec<_> = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let h = HitObject {
                    pos: Pos::new(x, y),
                    start_time: i as f64 * spacing,
                    kind: HitObjectKind::Circle,
                };

                OsuObject::new(&h, &map, &mut bufs, &mut Vec::new())
            })
            .collect();

        OsuDifficultyObject::create_all(&objects, 1.0, &ScalingFactor::new(4.0))
    }

    fn back_and_forth(n: usize, dist: f32) -> Vec<(f32, f32)> {
        (0..n)
            .map(|i| (100.0 + (i % 2) as f32 * dist, 192.0))
            .collect()
    }

    fn split(objects: &[OsuDifficultyObject]) -> (f64, f64) {
        let mut jump = Movement::new(MovementKind::Jump);
        let mut flow = Movement::new(MovementKind::Flow);

        for curr in objects {
            jump.process(curr, objects);
            flow.process(curr, objects);
        }

        (jump.difficulty_value(), flow.difficulty_value())
    }

    #[test]
    fn slow_objects_are_jumps() {
        let objects = diff_objects(&back_and_forth(16, 200.0), 300.0);
        let (jump, flow) = split(&objects);

        assert!(jump > 0.0);
        assert!(flow.eq(0.0), "{flow}");
    }

    #[test]
    fn fast_stream_is_flow() {
        let positions: Vec<_> = (0..32).map(|i| (100.0 + i as f32 * 8.0, 192.0)).collect();
        let objects = diff_objects(&positions, 75.0);

        for curr in objects.iter().skip(2) {
            assert!(MovementEvaluator::flow_probability(curr).almost_eq(1.0, 1e-9));
        }

        let (jump, flow) = split(&objects);

        assert!(flow > 0.0);
        assert!(jump.eq(0.0), "{jump}");
    }

    #[test]
    fn jump_and_flow_add_up_to_aim() {
        let objects = diff_objects(&back_and_forth(12, 150.0), 110.0);

        for curr in &objects {
            let aim = AimEvaluator::evaluate_diff_of(curr, &objects, false);
            let jump = MovementEvaluator::evaluate_diff_of(curr, &objects, MovementKind::Jump);
            let flow = MovementEvaluator::evaluate_diff_of(curr, &objects, MovementKind::Flow);

            assert!((jump + flow).almost_eq(aim, 1e-9), "{jump} + {flow} != {aim}");
        }
    }
}
