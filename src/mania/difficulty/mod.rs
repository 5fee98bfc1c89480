use crate::{
    any::difficulty::Difficulty,
    mania::{
        attributes::ManiaDifficultyAttributes, object::ManiaObject, strains::ManiaStrains,
    },
    model::beatmap::Beatmap,
};

use self::{object::ManiaDifficultyObject, skills::strain::Strain};

pub mod gradual;
mod object;
mod skills;

const STAR_SCALING_FACTOR: f64 = 0.018;

pub(crate) fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> ManiaDifficultyAttributes {
    let DifficultyValues { strain, mut attrs } = DifficultyValues::calculate(difficulty, map);

    DifficultyValues::eval(&mut attrs, &strain);

    attrs
}

pub(crate) fn strains(difficulty: &Difficulty, map: &Beatmap) -> ManiaStrains {
    let DifficultyValues { strain, .. } = DifficultyValues::calculate(difficulty, map);

    ManiaStrains {
        strains: strain.into_curr_strain_peaks(),
    }
}

/// Everything that is needed before processing any object.
struct ManiaDifficultySetup {
    attrs: ManiaDifficultyAttributes,
    mania_objects: Box<[ManiaObject]>,
    diff_objects: Box<[ManiaDifficultyObject]>,
    strain: Strain,
}

impl ManiaDifficultySetup {
    fn new(difficulty: &Difficulty, map: &Beatmap) -> Self {
        let total_columns = map.cs.round_ties_even().max(1.0);
        let clock_rate = difficulty.get_rate();

        let mania_objects = ManiaObject::create_all(map, total_columns);
        let diff_objects = ManiaDifficultyObject::create_all(&mania_objects, clock_rate);

        let attrs = ManiaDifficultyAttributes {
            is_convert: map.is_convert,
            ..Default::default()
        };

        Self {
            attrs,
            mania_objects,
            diff_objects,
            strain: Strain::new(total_columns as usize),
        }
    }
}

pub(crate) struct DifficultyValues {
    pub strain: Strain,
    pub attrs: ManiaDifficultyAttributes,
}

impl DifficultyValues {
    pub fn calculate(difficulty: &Difficulty, map: &Beatmap) -> Self {
        let take = difficulty.get_passed_objects();

        let ManiaDifficultySetup {
            mut attrs,
            mania_objects,
            diff_objects,
            mut strain,
        } = ManiaDifficultySetup::new(difficulty, map);

        for object in mania_objects.iter().take(take) {
            attrs.add_object(object);
        }

        // The first object has no difficulty object
        for curr in diff_objects.iter().take(take.saturating_sub(1)) {
            strain.process(curr, &diff_objects);
        }

        Self { strain, attrs }
    }

    /// Process the difficulty values and store the results in `attrs`.
    pub fn eval(attrs: &mut ManiaDifficultyAttributes, strain: &Strain) {
        attrs.stars = strain.difficulty_value() * STAR_SCALING_FACTOR;
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        hit_object::{HitObject, HitObjectKind, HoldNote, Pos},
        mode::GameMode,
        mods::GameMods,
    };

    use super::*;

    /// 4K map with a hold note every fifth object.
    fn map() -> Beatmap {
        let hit_objects = (0..50)
            .map(|i| HitObject {
                pos: Pos::new(64.0 + 128.0 * (i % 4) as f32, 192.0),
                start_time: f64::from(i) * 150.0,
                kind: if i % 5 == 0 {
                    HitObjectKind::Hold(HoldNote { duration: 300.0 })
                } else {
                    HitObjectKind::Circle
                },
            })
            .collect();

        Beatmap {
            mode: GameMode::Mania,
            cs: 4.0,
            hit_objects,
            ..Default::default()
        }
    }

    #[test]
    fn empty_map() {
        let map = Beatmap {
            mode: GameMode::Mania,
            ..Default::default()
        };

        let attrs = difficulty(&Difficulty::new(), &map);

        assert_eq!(attrs.n_objects, 0);
        assert_eq!(attrs.max_combo, 0);
        assert!(attrs.stars.abs() <= f64::EPSILON);
    }

    #[test]
    fn counts_objects() {
        let attrs = difficulty(&Difficulty::new(), &map());

        assert_eq!(attrs.n_objects, 50);
        assert_eq!(attrs.n_hold_notes, 10);
        // Every hold note is worth 1 + 300 / 100 combo
        assert_eq!(attrs.max_combo, 40 + 10 * 4);
        assert!(attrs.stars > 0.0);
    }

    #[test]
    fn passed_objects_limit_counts() {
        let map = map();
        let attrs = difficulty(&Difficulty::new().passed_objects(10), &map);

        assert_eq!(attrs.n_objects, 10);
        assert_eq!(attrs.n_hold_notes, 2);
        assert!(attrs.stars < difficulty(&Difficulty::new(), &map).stars);
    }

    #[test]
    fn double_time_is_harder() {
        let map = map();
        let nomod = difficulty(&Difficulty::new(), &map);

        let mods = GameMods::from_acronyms("DT", GameMode::Mania);
        let dt = difficulty(&Difficulty::new().mods(mods), &map);

        assert!(dt.stars > nomod.stars);
        assert_eq!(dt.max_combo, nomod.max_combo);
    }

    #[test]
    fn strains_have_a_peak_per_section() {
        let strains = strains(&Difficulty::new(), &map());

        // Difficulty objects span from 150ms to 7350ms
        assert_eq!(strains.strains.len(), 19);
    }
}
