use std::cmp;

use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, IGameMode},
    },
    osu::{object::OsuObject, Osu},
};

use super::{
    object::OsuDifficultyObject, skills::OsuSkills, DifficultyValues, OsuDifficultyAttributes,
    OsuDifficultySetup,
};

/// Gradually calculate the difficulty attributes of an osu!standard map.
///
/// Note that this struct implements [`Iterator`].
/// On every call of [`Iterator::next`], the map's next hit object will
/// be processed and the [`OsuDifficultyAttributes`] will be updated and
/// returned.
///
/// If you want to calculate performance attributes, use
/// [`OsuGradualPerformance`] instead.
///
/// # Example
///
/// ```
/// use rosu_perf::{Beatmap, Difficulty};
/// use rosu_perf::osu::OsuGradualDifficulty;
///
/// let map = Beatmap::from_path("./resources/osu.osu").unwrap();
///
/// let mut iter = OsuGradualDifficulty::new(Difficulty::new(), &map).unwrap();
///
/// // the difficulty of the map after the first hit object
/// let attrs1 = iter.next();
/// // ... after the second hit object
/// let attrs2 = iter.next();
///
/// // Remaining hit objects
/// for difficulty in iter {
///     // ...
/// }
/// ```
///
/// [`OsuGradualPerformance`]: crate::osu::OsuGradualPerformance
#[derive(Clone, Debug)]
pub struct OsuGradualDifficulty {
    pub(crate) idx: usize,
    pub(crate) difficulty: Difficulty,
    attrs: OsuDifficultyAttributes,
    skills: OsuSkills,
    diff_objects: Box<[OsuDifficultyObject]>,
    osu_objects: Box<[OsuObject]>,
}

impl OsuGradualDifficulty {
    /// Create a new difficulty attributes iterator for osu!standard maps.
    ///
    /// Fails if the map is not an osu!standard map.
    pub fn new(difficulty: Difficulty, map: &Beatmap) -> Result<Self, CalculateError> {
        Osu::check_mode(map)?;

        Ok(Self::new_unchecked(difficulty, map))
    }

    pub(crate) fn new_unchecked(difficulty: Difficulty, map: &Beatmap) -> Self {
        let mut setup = OsuDifficultySetup::new(&difficulty, map);

        // Counts are added one object at a time while iterating
        let (osu_objects, diff_objects) = setup.objects(&difficulty, map, 0);
        let skills = setup.skills(difficulty.get_mods());
        let mut attrs = setup.attrs;

        if let Some(h) = osu_objects.first() {
            attrs.add_object(h);
        }

        Self {
            idx: 0,
            difficulty,
            attrs,
            skills,
            diff_objects: diff_objects.into_boxed_slice(),
            osu_objects: osu_objects.into_boxed_slice(),
        }
    }

    fn process_next(&mut self, diff_idx: usize) -> bool {
        let Some(curr) = self.diff_objects.get(diff_idx) else {
            return false;
        };

        self.skills.process(curr, &self.diff_objects);

        // Difficulty objects are one index behind their hit object
        if let Some(h) = self.osu_objects.get(diff_idx + 1) {
            self.attrs.add_object(h);
        }

        true
    }
}

impl Iterator for OsuGradualDifficulty {
    type Item = OsuDifficultyAttributes;

    fn next(&mut self) -> Option<Self::Item> {
        // The first difficulty object belongs to the second note since each
        // difficulty object requires the current and the last note. Hence, if
        // we're still on the first object, we don't have a difficulty object
        // yet and just skip processing.
        if self.idx > 0 {
            if !self.process_next(self.idx - 1) {
                return None;
            }
        } else if self.osu_objects.is_empty() {
            return None;
        }

        self.idx += 1;

        let mut attrs = self.attrs.clone();
        DifficultyValues::eval(&mut attrs, self.difficulty.get_mods(), &self.skills);

        Some(attrs)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();

        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let mut take = cmp::min(n, self.len().saturating_sub(1));

        // The first note has no difficulty object
        if self.idx == 0 && take > 0 {
            take -= 1;
            self.idx += 1;
        }

        for _ in 0..take {
            self.process_next(self.idx - 1);
            self.idx += 1;
        }

        self.next()
    }
}

impl ExactSizeIterator for OsuGradualDifficulty {
    fn len(&self) -> usize {
        (self.osu_objects.len()).saturating_sub(self.idx)
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
        osu::difficulty::difficulty as calculate,
    };

    use super::*;

    fn map() -> Beatmap {
        let hit_objects = (0..20)
            .map(|i| HitObject {
                pos: Pos::new(64.0 + (i % 4) as f32 * 96.0, 100.0 + (i % 3) as f32 * 80.0),
                start_time: f64::from(i) * 180.0,
                kind: HitObjectKind::Circle,
            })
            .collect();

        Beatmap {
            hit_objects,
            ..Default::default()
        }
    }

    #[test]
    fn empty() {
        let mut gradual = OsuGradualDifficulty::new(Difficulty::new(), &Beatmap::default()).unwrap();

        assert_eq!(gradual.len(), 0);
        assert!(gradual.next().is_none());
    }

    #[test]
    fn wrong_mode() {
        let map = Beatmap {
            mode: GameMode::Taiko,
            ..Default::default()
        };

        assert!(OsuGradualDifficulty::new(Difficulty::new(), &map).is_err());
    }

    #[test]
    fn next_and_nth() {
        let map = map();
        let difficulty = Difficulty::new();

        let mut gradual = OsuGradualDifficulty::new(difficulty.clone(), &map).unwrap();
        let mut gradual_2nd = gradual.clone();
        let mut gradual_3rd = gradual.clone();

        let hit_objects_len = map.hit_objects.len();

        for i in 1.. {
            let Some(next_gradual) = gradual.next() else {
                assert_eq!(i, hit_objects_len + 1);
                assert!(gradual.last().is_none());
                break;
            };

            if i % 2 == 0 {
                let next_gradual_2nd = gradual_2nd.nth(1).unwrap();
                assert_eq!(next_gradual, next_gradual_2nd);
            }

            if i % 3 == 0 {
                let next_gradual_3rd = gradual_3rd.nth(2).unwrap();
                assert_eq!(next_gradual, next_gradual_3rd);
            }

            let expected = calculate(&difficulty.clone().passed_objects(i as u32), &map);

            assert_eq!(next_gradual, expected, "object {i}");
        }
    }
}
