use crate::{
    any::difficulty::{
        skills::{count_top_weighted_strains, StrainSkill},
        Difficulty,
    },
    model::{beatmap::Beatmap, mods::GameMods},
    util::difficulty::norm,
};

use self::{object::TaikoDifficultyObjects, skills::TaikoSkills};

use super::{attributes::TaikoDifficultyAttributes, object::TaikoObject, strains::TaikoStrains};

mod color;
pub mod gradual;
mod object;
mod rhythm;
mod skills;

const DIFFICULTY_MULTIPLIER: f64 = 0.084_375;
const RHYTHM_SKILL_MULTIPLIER: f64 = 0.65 * DIFFICULTY_MULTIPLIER;
const READING_SKILL_MULTIPLIER: f64 = 0.100 * DIFFICULTY_MULTIPLIER;
const COLOR_SKILL_MULTIPLIER: f64 = 0.375 * DIFFICULTY_MULTIPLIER;
const STAMINA_SKILL_MULTIPLIER: f64 = 0.445 * DIFFICULTY_MULTIPLIER;

pub(crate) fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> TaikoDifficultyAttributes {
    let DifficultyValues { skills, mut attrs } = DifficultyValues::calculate(difficulty, map);

    DifficultyValues::eval(&mut attrs, difficulty.get_mods(), &skills);

    attrs
}

pub(crate) fn strains(difficulty: &Difficulty, map: &Beatmap) -> TaikoStrains {
    let DifficultyValues { skills, .. } = DifficultyValues::calculate(difficulty, map);

    TaikoStrains {
        color: skills.color.into_curr_strain_peaks(),
        reading: skills.reading.into_curr_strain_peaks(),
        rhythm: skills.rhythm.into_curr_strain_peaks(),
        stamina: skills.stamina.into_curr_strain_peaks(),
        single_color_stamina: skills.single_color_stamina.into_curr_strain_peaks(),
    }
}

/// Attributes that are known before any object is processed.
fn initial_attrs(difficulty: &Difficulty, map: &Beatmap) -> TaikoDifficultyAttributes {
    let hit_windows = map.attributes().difficulty(difficulty).hit_windows();

    TaikoDifficultyAttributes {
        great_hit_window: hit_windows.od_great,
        ok_hit_window: hit_windows.od_ok.unwrap_or(0.0),
        is_convert: map.is_convert,
        ..Default::default()
    }
}

/// Amount of objects up to and including the `take`th hit and the amount
/// of hits among them.
///
/// Trailing drumrolls and swells are only included if all hits are taken.
fn objects_until_hit(taiko_objects: &[TaikoObject], take: usize) -> (usize, u32) {
    let total_hits = taiko_objects.iter().filter(|h| h.is_hit()).count();

    if take >= total_hits {
        return (taiko_objects.len(), total_hits as u32);
    }

    let mut n_hits = 0;

    for (i, h) in taiko_objects.iter().enumerate() {
        if n_hits == take {
            return (i, n_hits as u32);
        }

        if h.is_hit() {
            n_hits += 1;

            if n_hits == take {
                return (i + 1, n_hits as u32);
            }
        }
    }

    (0, 0)
}

pub(crate) struct DifficultyValues {
    pub skills: TaikoSkills,
    pub attrs: TaikoDifficultyAttributes,
}

impl DifficultyValues {
    pub fn calculate(difficulty: &Difficulty, map: &Beatmap) -> Self {
        let take = difficulty.get_passed_objects();
        let clock_rate = difficulty.get_rate();

        let mut attrs = initial_attrs(difficulty, map);

        let taiko_objects = TaikoObject::create_all(map);
        let (n_objects, max_combo) = objects_until_hit(&taiko_objects, take);
        attrs.max_combo = max_combo;

        let diff_objects = TaikoDifficultyObjects::new(&taiko_objects, map, clock_rate);
        let mut skills = TaikoSkills::new(attrs.great_hit_window, attrs.is_convert);

        // The first two objects have no difficulty object
        for curr in diff_objects.objects.iter().take(n_objects.saturating_sub(2)) {
            skills.process(curr, &diff_objects);
        }

        Self { skills, attrs }
    }

    /// Process the difficulty values and store the results in `attrs`.
    pub fn eval(attrs: &mut TaikoDifficultyAttributes, mods: &GameMods, skills: &TaikoSkills) {
        let is_relax = mods.rx();

        let rhythm_peaks = skills.rhythm.curr_strain_peaks();
        let reading_peaks = skills.reading.curr_strain_peaks();
        let color_peaks = skills.color.curr_strain_peaks();
        let stamina_peaks = skills.stamina.curr_strain_peaks();

        let rhythm_rating =
            StrainSkill::difficulty_value(rhythm_peaks.clone()) * RHYTHM_SKILL_MULTIPLIER;
        let reading_rating =
            StrainSkill::difficulty_value(reading_peaks.clone()) * READING_SKILL_MULTIPLIER;
        let color_rating = StrainSkill::difficulty_value(color_peaks.clone()) * COLOR_SKILL_MULTIPLIER;
        let stamina_difficulty_value = StrainSkill::difficulty_value(stamina_peaks.clone());
        let stamina_rating = stamina_difficulty_value * STAMINA_SKILL_MULTIPLIER;
        let mono_stamina_rating =
            skills.single_color_stamina.difficulty_value() * STAMINA_SKILL_MULTIPLIER;

        let mono_stamina_factor = if stamina_rating.abs() <= f64::EPSILON {
            1.0
        } else {
            (mono_stamina_rating / stamina_rating).powf(5.0)
        };

        let stamina_difficult_strains =
            count_top_weighted_strains(skills.stamina.object_strains(), stamina_difficulty_value);

        // Without pattern detection the other skills scale the rhythm
        let pattern_multiplier = (stamina_rating * color_rating).powf(0.10);

        let strain_length_bonus = 1.0
            + ((stamina_difficult_strains - 1000.0) / 3700.0).clamp(0.0, 0.15)
            + (stamina_rating - 7.0).clamp(0.0, 0.05);

        let skill_peaks = SkillPeaks {
            rhythm: &rhythm_peaks,
            reading: &reading_peaks,
            color: &color_peaks,
            stamina: &stamina_peaks,
        };

        let combined_rating = skill_peaks.combined_difficulty_value(
            pattern_multiplier,
            strain_length_bonus,
            attrs.is_convert,
            is_relax,
        );

        attrs.rhythm = rhythm_rating;
        attrs.reading = reading_rating;
        attrs.color = color_rating;
        attrs.stamina = stamina_rating;
        attrs.mono_stamina_factor = mono_stamina_factor;
        attrs.stars = rescale(combined_rating * 1.4);
    }
}

struct SkillPeaks<'a> {
    rhythm: &'a [f64],
    reading: &'a [f64],
    color: &'a [f64],
    stamina: &'a [f64],
}

impl SkillPeaks<'_> {
    /// Combine the skills' section peaks via norms and sum them up with
    /// decaying weights.
    fn combined_difficulty_value(
        &self,
        pattern_multiplier: f64,
        strain_length_bonus: f64,
        is_convert: bool,
        is_relax: bool,
    ) -> f64 {
        let mut peaks: Vec<_> = self
            .rhythm
            .iter()
            .zip(self.reading)
            .zip(self.color)
            .zip(self.stamina)
            .map(|(((&rhythm, &reading), &color), &stamina)| {
                let rhythm = rhythm * RHYTHM_SKILL_MULTIPLIER * pattern_multiplier;
                let reading = reading * READING_SKILL_MULTIPLIER;

                // Relax doesn't require hitting the right color
                let color = if is_relax {
                    0.0
                } else {
                    color * COLOR_SKILL_MULTIPLIER
                };

                let mut stamina = stamina * STAMINA_SKILL_MULTIPLIER * strain_length_bonus;

                // Multiple inputs make stamina easier
                if is_convert || is_relax {
                    stamina /= 1.5;
                }

                let color_stamina = norm(1.5, &[color, stamina]);

                norm(2.0, &[color_stamina, rhythm, reading])
            })
            .filter(|&peak| peak > 0.0)
            .collect();

        peaks.sort_unstable_by(|a, b| b.total_cmp(a));

        let mut difficulty = 0.0;
        let mut weight = 1.0;

        for strain in peaks {
            difficulty += strain * weight;
            weight *= 0.9;
        }

        difficulty
    }
}

fn rescale(stars: f64) -> f64 {
    if stars < 0.0 {
        stars
    } else {
        10.43 * f64::ln(stars / 8.0 + 1.0)
    }
}
