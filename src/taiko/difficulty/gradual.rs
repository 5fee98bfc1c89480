use std::cmp;

use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, IGameMode},
    },
    taiko::{object::TaikoObject, Taiko},
};

use super::{
    initial_attrs, object::TaikoDifficultyObjects, skills::TaikoSkills, DifficultyValues,
    TaikoDifficultyAttributes,
};

/// Gradually calculate the difficulty attributes of an osu!taiko map.
///
/// Note that this struct implements [`Iterator`].
/// On every call of [`Iterator::next`], the map's next hit will be processed
/// and the [`TaikoDifficultyAttributes`] will be updated and returned.
/// Drumrolls and swells are processed alongside the next hit.
///
/// If you want to calculate performance attributes, use
/// [`TaikoGradualPerformance`] instead.
///
/// # Example
///
/// ```
/// use rosu_perf::{Beatmap, Difficulty};
/// use rosu_perf::taiko::TaikoGradualDifficulty;
///
/// let map = Beatmap::from_path("./resources/taiko.osu").unwrap();
///
/// let mut iter = TaikoGradualDifficulty::new(Difficulty::new(), &map).unwrap();
///
/// // the difficulty of the map after the first hit
/// let attrs1 = iter.next();
/// // ... after the second hit
/// let attrs2 = iter.next();
///
/// // Remaining hits
/// for difficulty in iter {
///     // ...
/// }
/// ```
///
/// [`TaikoGradualPerformance`]: crate::taiko::TaikoGradualPerformance
#[derive(Clone, Debug)]
pub struct TaikoGradualDifficulty {
    pub(crate) idx: usize,
    pub(crate) difficulty: Difficulty,
    attrs: TaikoDifficultyAttributes,
    skills: TaikoSkills,
    diff_objects: TaikoDifficultyObjects,
    taiko_objects: Box<[TaikoObject]>,
    // Index of the next object to process
    obj_idx: usize,
    total_hits: usize,
}

impl TaikoGradualDifficulty {
    /// Create a new difficulty attributes iterator for osu!taiko maps.
    ///
    /// Fails if the map is not an osu!taiko map.
    pub fn new(difficulty: Difficulty, map: &Beatmap) -> Result<Self, CalculateError> {
        Taiko::check_mode(map)?;

        Ok(Self::new_unchecked(difficulty, map))
    }

    pub(crate) fn new_unchecked(difficulty: Difficulty, map: &Beatmap) -> Self {
        let attrs = initial_attrs(&difficulty, map);
        let taiko_objects = TaikoObject::create_all(map);
        let diff_objects = TaikoDifficultyObjects::new(&taiko_objects, map, difficulty.get_rate());
        let total_hits = taiko_objects.iter().filter(|h| h.is_hit()).count();
        let skills = TaikoSkills::new(attrs.great_hit_window, attrs.is_convert);

        Self {
            idx: 0,
            difficulty,
            attrs,
            skills,
            diff_objects,
            taiko_objects: taiko_objects.into_boxed_slice(),
            obj_idx: 0,
            total_hits,
        }
    }

    /// Process all objects until and including the next hit.
    ///
    /// Returns `false` if there are no hits left.
    fn process_next_hit(&mut self) -> bool {
        if self.idx >= self.total_hits {
            return false;
        }

        while let Some(is_hit) = self.taiko_objects.get(self.obj_idx).map(TaikoObject::is_hit) {
            self.process_object();

            if is_hit {
                break;
            }
        }

        self.idx += 1;
        self.attrs.max_combo += 1;

        // Trailing drumrolls and swells belong to the last hit
        if self.idx == self.total_hits {
            while self.obj_idx < self.taiko_objects.len() {
                self.process_object();
            }
        }

        true
    }

    fn process_object(&mut self) {
        // The first two objects have no difficulty object
        if let Some(curr) = self
            .obj_idx
            .checked_sub(2)
            .and_then(|idx| self.diff_objects.get(idx))
        {
            self.skills.process(curr, &self.diff_objects);
        }

        self.obj_idx += 1;
    }
}

impl Iterator for TaikoGradualDifficulty {
    type Item = TaikoDifficultyAttributes;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.process_next_hit() {
            return None;
        }

        let mut attrs = self.attrs.clone();
        DifficultyValues::eval(&mut attrs, self.difficulty.get_mods(), &self.skills);

        Some(attrs)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();

        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let take = cmp::min(n, self.len().saturating_sub(1));

        for _ in 0..take {
            self.process_next_hit();
        }

        self.next()
    }
}

impl ExactSizeIterator for TaikoGradualDifficulty {
    fn len(&self) -> usize {
        self.total_hits.saturating_sub(self.idx)
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::{section::hit_objects::hit_samples::HitSoundType, util::Pos};

    use crate::{
        model::{
            hit_object::{HitObject, HitObjectKind, Spinner},
            mode::GameMode,
        },
        taiko::difficulty::difficulty as calculate,
    };

    use super::*;

    fn map() -> Beatmap {
        let clap: HitSoundType = "8".parse().unwrap();

        let mut hit_objects = Vec::new();
        let mut hit_sounds = Vec::new();

        for i in 0..30 {
            let kind = if i % 11 == 5 {
                HitObjectKind::Spinner(Spinner { duration: 50.0 })
            } else {
                HitObjectKind::Circle
            };

            hit_objects.push(HitObject {
                pos: Pos::default(),
                start_time: f64::from(i) * 120.0,
                kind,
            });

            hit_sounds.push(if i % 3 == 0 {
                clap
            } else {
                HitSoundType::default()
            });
        }

        Beatmap {
            mode: GameMode::Taiko,
            hit_objects,
            hit_sounds,
            ..Default::default()
        }
    }

    #[test]
    fn empty() {
        let map = Beatmap {
            mode: GameMode::Taiko,
            ..Default::default()
        };

        let mut gradual = TaikoGradualDifficulty::new(Difficulty::new(), &map).unwrap();

        assert_eq!(gradual.len(), 0);
        assert!(gradual.next().is_none());
    }

    #[test]
    fn wrong_mode() {
        assert!(TaikoGradualDifficulty::new(Difficulty::new(), &Beatmap::default()).is_err());
    }

    #[test]
    fn next_and_nth() {
        let map = map();
        let difficulty = Difficulty::new();

        let mut gradual = TaikoGradualDifficulty::new(difficulty.clone(), &map).unwrap();
        let mut gradual_2nd = gradual.clone();
        let mut gradual_3rd = gradual.clone();

        let n_hits = map.hit_objects.iter().filter(|h| h.is_circle()).count();
        assert_eq!(gradual.len(), n_hits);

        for i in 1.. {
            let Some(next_gradual) = gradual.next() else {
                assert_eq!(i, n_hits + 1);
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

            assert_eq!(next_gradual, expected, "hit {i}");
        }
    }
}
