use crate::{
    any::difficulty::Difficulty,
    catch::{
        attributes::{CatchDifficultyAttributes, ObjectCount, ObjectCountBuilder},
        catcher::Catcher,
        convert::convert_objects,
        strains::CatchStrains,
    },
    model::beatmap::Beatmap,
};

use self::{object::CatchDifficultyObject, skills::movement::Movement};

pub mod gradual;
mod object;
mod skills;

const STAR_SCALING_FACTOR: f64 = 4.59;

pub(crate) fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> CatchDifficultyAttributes {
    let DifficultyValues {
        movement,
        mut attrs,
    } = DifficultyValues::calculate(difficulty, map);

    DifficultyValues::eval(&mut attrs, &movement);

    attrs
}

pub(crate) fn strains(difficulty: &Difficulty, map: &Beatmap) -> CatchStrains {
    let DifficultyValues { movement, .. } = DifficultyValues::calculate(difficulty, map);

    CatchStrains {
        movement: movement.into_curr_strain_peaks(),
    }
}

/// Everything that is needed before processing any object.
struct CatchDifficultySetup {
    attrs: CatchDifficultyAttributes,
    counts: Vec<ObjectCount>,
    diff_objects: Box<[CatchDifficultyObject]>,
    movement: Movement,
}

impl CatchDifficultySetup {
    fn new(difficulty: &Difficulty, map: &Beatmap) -> Self {
        let clock_rate = difficulty.get_rate();
        let map_attrs = map.attributes().difficulty(difficulty).build();
        let cs = map_attrs.cs as f32;

        let attrs = CatchDifficultyAttributes {
            ar: map_attrs.ar,
            is_convert: map.is_convert,
            ..Default::default()
        };

        let mut count = ObjectCountBuilder::new();

        let palpable_objects = convert_objects(
            map,
            &mut count,
            difficulty.get_mods().reflection(),
            difficulty.get_hardrock_offsets(),
            cs,
        );

        // Even smaller catcher above CS 5.5
        let mut half_catcher_width = Catcher::catch_width(cs) * 0.5;
        half_catcher_width *= 1.0 - ((cs - 5.5).max(0.0) * 0.0625);

        let scaling_factor =
            CatchDifficultyObject::NORMALIZED_HITOBJECT_RADIUS / half_catcher_width;

        let diff_objects =
            CatchDifficultyObject::create_all(&palpable_objects, clock_rate, scaling_factor);

        Self {
            attrs,
            counts: count.into_counts(),
            diff_objects,
            movement: Movement::new(half_catcher_width, clock_rate),
        }
    }
}

pub(crate) struct DifficultyValues {
    pub movement: Movement,
    pub attrs: CatchDifficultyAttributes,
}

impl DifficultyValues {
    pub fn calculate(difficulty: &Difficulty, map: &Beatmap) -> Self {
        let take = difficulty.get_passed_objects();

        let CatchDifficultySetup {
            mut attrs,
            counts,
            diff_objects,
            mut movement,
        } = CatchDifficultySetup::new(difficulty, map);

        for &count in counts.iter().take(take) {
            attrs.add_object_count(count);
        }

        // The first palpable object has no difficulty object
        for curr in diff_objects.iter().take(take.saturating_sub(1)) {
            movement.process(curr, &diff_objects);
        }

        Self { movement, attrs }
    }

    /// Process the difficulty values and store the results in `attrs`.
    pub fn eval(attrs: &mut CatchDifficultyAttributes, movement: &Movement) {
        attrs.stars = movement.difficulty_value().sqrt() * STAR_SCALING_FACTOR;
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::util::Pos;

    use crate::model::{
        hit_object::{HitObject, HitObjectKind},
        mode::GameMode,
        mods::GameMods,
    };

    use super::*;

    fn map() -> Beatmap {
        let hit_objects = (0..40)
            .map(|i| HitObject {
                pos: Pos::new(if i % 2 == 0 { 80.0 } else { 420.0 }, 192.0),
                start_time: f64::from(i) * 250.0,
                kind: HitObjectKind::Circle,
            })
            .collect();

        Beatmap {
            mode: GameMode::Catch,
            hit_objects,
            ..Default::default()
        }
    }

    #[test]
    fn empty_map() {
        let map = Beatmap {
            mode: GameMode::Catch,
            ..Default::default()
        };

        let attrs = difficulty(&Difficulty::new(), &map);

        assert_eq!(attrs.max_combo(), 0);
        assert!(attrs.stars.abs() <= f64::EPSILON);
        assert!(attrs.ar > 0.0);
    }

    #[test]
    fn counts_fruits() {
        let attrs = difficulty(&Difficulty::new(), &map());

        assert_eq!(attrs.n_fruits, 40);
        assert_eq!(attrs.n_droplets, 0);
        assert!(attrs.stars > 0.0);
    }

    #[test]
    fn passed_objects_limit_counts() {
        let attrs = difficulty(&Difficulty::new().passed_objects(10), &map());

        assert_eq!(attrs.max_combo(), 10);
        assert!(attrs.stars < difficulty(&Difficulty::new(), &map()).stars);
    }

    #[test]
    fn double_time_is_harder() {
        let map = map();
        let nomod = difficulty(&Difficulty::new(), &map);

        let mods = GameMods::from_acronyms("DT", GameMode::Catch);
        let dt = difficulty(&Difficulty::new().mods(mods), &map);

        assert!(dt.stars > nomod.stars);
        assert!(dt.ar > nomod.ar);
    }

    #[test]
    fn strains_have_a_peak_per_section() {
        let strains = strains(&Difficulty::new(), &map());

        // Difficulty objects span from 250ms to 9750ms
        assert_eq!(strains.movement.len(), 13);
    }
}
