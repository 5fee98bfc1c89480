use std::cmp;

use crate::{
    any::difficulty::Difficulty,
    model::{beatmap::Beatmap, mods::GameMods},
    osu::{
        convert::convert_objects,
        object::OsuObject,
        performance::{base_accuracy_value, PERFORMANCE_BASE_MULTIPLIER},
    },
};

use self::{
    object::OsuDifficultyObject,
    scaling_factor::ScalingFactor,
    skills::{flashlight::Flashlight, strain, OsuSkills},
};

use super::{attributes::OsuDifficultyAttributes, strains::OsuStrains};

pub mod gradual;
pub mod object;
pub mod scaling_factor;
pub mod skills;

const DIFFICULTY_MULTIPLIER: f64 = 0.0675;

const HD_FADE_IN_DURATION_MULTIPLIER: f64 = 0.4;
pub(crate) const HD_FADE_OUT_DURATION_MULTIPLIER: f64 = 0.3;

pub(crate) fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> OsuDifficultyAttributes {
    let DifficultyValues { skills, mut attrs } = DifficultyValues::calculate(difficulty, map);

    DifficultyValues::eval(&mut attrs, difficulty.get_mods(), &skills);

    attrs
}

pub(crate) fn strains(difficulty: &Difficulty, map: &Beatmap) -> OsuStrains {
    let DifficultyValues { skills, .. } = DifficultyValues::calculate(difficulty, map);

    OsuStrains {
        aim: skills.aim.curr_strain_peaks(),
        aim_no_sliders: skills.aim_no_sliders.curr_strain_peaks(),
        speed: skills.speed.curr_strain_peaks(),
        flashlight: skills.flashlight.curr_strain_peaks(),
        jump_aim: skills.jump_aim.curr_strain_peaks(),
        flow_aim: skills.flow_aim.curr_strain_peaks(),
        precision: skills.precision.curr_strain_peaks(),
        stamina: skills.stamina.curr_strain_peaks(),
    }
}

/// Everything that is derived from the map's attributes before any object
/// is processed.
pub(crate) struct OsuDifficultySetup {
    pub scaling_factor: ScalingFactor,
    pub attrs: OsuDifficultyAttributes,
    pub time_preempt: f64,
    pub clock_rate: f64,
}

impl OsuDifficultySetup {
    pub fn new(difficulty: &Difficulty, map: &Beatmap) -> Self {
        let clock_rate = difficulty.get_rate();

        let map_attrs = map.attributes().difficulty(difficulty).build();
        let scaling_factor = ScalingFactor::new(map_attrs.cs);
        let hit_windows = map_attrs.hit_windows;

        let attrs = OsuDifficultyAttributes {
            ar: map_attrs.ar,
            hp: map_attrs.hp,
            great_hit_window: hit_windows.od_great,
            ok_hit_window: hit_windows.od_ok.unwrap_or(0.0),
            meh_hit_window: hit_windows.od_meh.unwrap_or(0.0),
            ..Default::default()
        };

        let time_preempt = f64::from((hit_windows.ar * clock_rate) as f32);

        Self {
            scaling_factor,
            attrs,
            time_preempt,
            clock_rate,
        }
    }

    pub fn skills(&self, mods: &GameMods) -> OsuSkills {
        OsuSkills::new(
            self.attrs.great_hit_window,
            self.scaling_factor.radius,
            self.time_preempt,
            mods.hd(),
            mods.ap(),
        )
    }

    /// Convert the map's objects and create the difficulty objects for all
    /// of them.
    ///
    /// Only the first `take` objects are counted onto the attributes.
    pub fn objects(
        &mut self,
        difficulty: &Difficulty,
        map: &Beatmap,
        take: usize,
    ) -> (Vec<OsuObject>, Vec<OsuDifficultyObject>) {
        let mut osu_objects = convert_objects(
            map,
            &self.scaling_factor,
            difficulty.get_mods().reflection(),
            self.time_preempt,
            take,
            &mut self.attrs,
        );

        for h in osu_objects.iter_mut() {
            OsuDifficultyObject::compute_slider_cursor_pos(h, self.scaling_factor.radius);
        }

        let diff_objects =
            OsuDifficultyObject::create_all(&osu_objects, self.clock_rate, &self.scaling_factor);

        (osu_objects, diff_objects)
    }
}

pub(crate) struct DifficultyValues {
    pub skills: OsuSkills,
    pub attrs: OsuDifficultyAttributes,
}

impl DifficultyValues {
    pub fn calculate(difficulty: &Difficulty, map: &Beatmap) -> Self {
        let take = difficulty.get_passed_objects();

        let mut setup = OsuDifficultySetup::new(difficulty, map);
        let (osu_objects, diff_objects) = setup.objects(difficulty, map, take);
        let mut skills = setup.skills(difficulty.get_mods());

        // The first hit object has no difficulty object
        let take_diff_objects = cmp::min(osu_objects.len(), take).saturating_sub(1);

        for curr in diff_objects.iter().take(take_diff_objects) {
            skills.process(curr, &diff_objects);
        }

        Self {
            skills,
            attrs: setup.attrs,
        }
    }

    /// Process the difficulty values and store the results in `attrs`.
    pub fn eval(attrs: &mut OsuDifficultyAttributes, mods: &GameMods, skills: &OsuSkills) {
        let aim_difficulty_value = skills.aim.difficulty_value();
        let aim_no_sliders_difficulty_value = skills.aim_no_sliders.difficulty_value();
        let speed_difficulty_value = skills.speed.difficulty_value();
        let flashlight_difficulty_value = skills.flashlight.difficulty_value();
        let jump_difficulty_value = skills.jump_aim.difficulty_value();
        let flow_difficulty_value = skills.flow_aim.difficulty_value();
        let stamina_difficulty_value = skills.stamina.difficulty_value();

        let mut aim_rating = aim_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let aim_rating_no_sliders = aim_no_sliders_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let mut speed_rating = speed_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let mut flashlight_rating = flashlight_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;

        let mut movement_ratings = [
            jump_difficulty_value,
            flow_difficulty_value,
            skills.precision.difficulty_value(),
        ]
        .map(|value| value.sqrt() * DIFFICULTY_MULTIPLIER);
        let mut stamina_rating = stamina_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;

        let slider_factor = if aim_rating > 0.0 {
            aim_rating_no_sliders / aim_rating
        } else {
            1.0
        };

        if mods.td() {
            aim_rating = aim_rating.powf(0.8);
            flashlight_rating = flashlight_rating.powf(0.8);
            movement_ratings = movement_ratings.map(|rating| rating.powf(0.8));
        }

        if mods.rx() {
            aim_rating *= 0.9;
            speed_rating = 0.0;
            flashlight_rating *= 0.7;
            movement_ratings = movement_ratings.map(|rating| rating * 0.9);
            stamina_rating = 0.0;
        } else if mods.ap() {
            speed_rating *= 0.5;
            aim_rating = 0.0;
            flashlight_rating *= 0.4;
            movement_ratings = [0.0; 3];
            stamina_rating *= 0.5;
        }

        let [jump_rating, flow_rating, precision_rating] = movement_ratings;

        let base_aim_performance = strain::difficulty_to_performance(aim_rating);
        let base_speed_performance = strain::difficulty_to_performance(speed_rating);

        let base_flashlight_performance = if mods.fl() {
            Flashlight::difficulty_to_performance(flashlight_rating)
        } else {
            0.0
        };

        let base_performance = (base_aim_performance.powf(1.1)
            + base_speed_performance.powf(1.1)
            + base_flashlight_performance.powf(1.1))
        .powf(1.0 / 1.1);

        let star_rating = if base_performance > 0.00001 {
            PERFORMANCE_BASE_MULTIPLIER.cbrt()
                * 0.027
                * ((100_000.0 / 2.0_f64.powf(1.0 / 1.1) * base_performance).cbrt() + 4.0)
        } else {
            0.0
        };

        attrs.aim = aim_rating;
        attrs.speed = speed_rating;
        attrs.flashlight = flashlight_rating;
        attrs.slider_factor = slider_factor;
        attrs.stars = star_rating;
        attrs.speed_note_count = skills.speed.relevant_note_count();
        attrs.aim_difficult_slider_count = skills.aim.get_difficult_sliders();
        attrs.aim_difficult_strain_count =
            skills.aim.count_top_weighted_strains(aim_difficulty_value);
        attrs.speed_difficult_strain_count =
            skills.speed.count_top_weighted_strains(speed_difficulty_value);

        attrs.jump = jump_rating;
        attrs.flow = flow_rating;
        attrs.precision = precision_rating;
        attrs.stamina = stamina_rating;
        attrs.accuracy = Self::accuracy_rating(attrs);
        attrs.jump_aim_difficult_strain_count =
            skills.jump_aim.count_top_weighted_strains(jump_difficulty_value);
        attrs.flow_aim_difficult_strain_count =
            skills.flow_aim.count_top_weighted_strains(flow_difficulty_value);
        attrs.stamina_difficult_strain_count =
            skills.stamina.count_top_weighted_strains(stamina_difficulty_value);
    }

    /// Rating of an all-great score on the circles of the map.
    fn accuracy_rating(attrs: &OsuDifficultyAttributes) -> f64 {
        if attrs.n_circles == 0 {
            return 0.0;
        }

        let performance = base_accuracy_value(attrs.od(), 1.0, attrs.n_circles);

        strain::performance_to_difficulty(performance)
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::util::Pos;

    use crate::{
        model::{
            hit_object::{HitObject, HitObjectKind},
            mode::GameMode,
        },
        util::float_ext::FloatExt,
    };

    use super::*;

    fn stream(n: usize, spacing: f64) -> Beatmap {
        let hit_objects = (0..n)
            .map(|i| HitObject {
                pos: Pos::new(100.0 + (i % 2) as f32 * 120.0, 192.0),
                start_time: i as f64 * spacing,
                kind: HitObjectKind::Circle,
            })
            .collect();

        Beatmap {
            hit_objects,
            ..Default::default()
        }
    }

    #[test]
    fn empty_map_has_base_stars() {
        let attrs = difficulty(&Difficulty::new(), &Beatmap::default());

        // Only the base performance remains
        assert!(attrs.stars.almost_eq(0.141_438_089_678_172_37, 1e-12));
        assert!(attrs.aim.eq(0.0));
        assert_eq!(attrs.max_combo, 0);
        assert!(attrs.slider_factor.eq(1.0));
    }

    #[test]
    fn faster_stream_is_harder() {
        let slow = difficulty(&Difficulty::new(), &stream(64, 150.0));
        let fast = difficulty(&Difficulty::new(), &stream(64, 100.0));

        assert!(slow.stars > 0.0);
        assert!(fast.stars > slow.stars, "{} <= {}", fast.stars, slow.stars);
        assert!(fast.speed > slow.speed);
        assert_eq!(fast.n_circles, 64);
    }

    #[test]
    fn relax_removes_speed() {
        let mods = GameMods::from_acronyms("RX", GameMode::Osu);
        let attrs = difficulty(&Difficulty::new().mods(mods), &stream(32, 120.0));

        assert!(attrs.speed.eq(0.0));
        assert!(attrs.aim > 0.0);
    }

    #[test]
    fn back_and_forth_is_jump_aim() {
        let attrs = difficulty(&Difficulty::new(), &stream(64, 100.0));

        // Reversing direction on every object leaves no room for flow
        assert!(attrs.jump > 0.0);
        assert!(attrs.flow.eq(0.0), "{}", attrs.flow);
        assert!(attrs.precision > 0.0);
        assert!(attrs.jump_aim_difficult_strain_count > 0.0);
    }

    #[test]
    fn autopilot_drops_movement_ratings() {
        let mods = GameMods::from_acronyms("AP", GameMode::Osu);
        let attrs = difficulty(&Difficulty::new().mods(mods), &stream(32, 120.0));

        assert!(attrs.jump.eq(0.0));
        assert!(attrs.flow.eq(0.0));
        assert!(attrs.precision.eq(0.0));
        assert!(attrs.stamina > 0.0);
    }

    #[test]
    fn longer_streams_build_stamina() {
        let short = difficulty(&Difficulty::new(), &stream(32, 100.0));
        let long = difficulty(&Difficulty::new(), &stream(256, 100.0));

        assert!(long.stamina > short.stamina);
        assert!(long.stamina_difficult_strain_count > short.stamina_difficult_strain_count);
    }

    #[test]
    fn accuracy_rating_counts_circles() {
        let empty = difficulty(&Difficulty::new(), &Beatmap::default());
        assert!(empty.accuracy.eq(0.0));

        let attrs = difficulty(&Difficulty::new(), &stream(64, 150.0));
        let expected = strain::performance_to_difficulty(base_accuracy_value(attrs.od(), 1.0, 64));

        assert!(attrs.accuracy.almost_eq(expected, 1e-12));
        assert!(attrs.accuracy > 0.0675);
    }

    #[test]
    fn passed_objects_limit_counts() {
        let map = stream(32, 120.0);
        let attrs = difficulty(&Difficulty::new().passed_objects(10), &map);

        assert_eq!(attrs.n_circles, 10);
        assert_eq!(attrs.max_combo, 10);
    }

    #[test]
    fn strains_have_one_peak_per_section() {
        let map = stream(10, 200.0);
        let strains = strains(&Difficulty::new(), &map);

        // Objects span 1800ms and the first section ends at 400ms
        assert_eq!(strains.aim.len(), 5);
        assert_eq!(strains.aim.len(), strains.speed.len());
    }
}
