use std::cmp;

use crate::{
    any::difficulty::Difficulty,
    mania::{attributes::ManiaDifficultyAttributes, object::ManiaObject, Mania},
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, IGameMode},
    },
};

use super::{
    object::ManiaDifficultyObject, skills::strain::Strain, DifficultyValues, ManiaDifficultySetup,
};

/// Gradually calculate the difficulty attributes of an osu!mania map.
///
/// Note that this struct implements [`Iterator`].
/// On every call of [`Iterator::next`], the map's next note or hold note
/// will be processed and the [`ManiaDifficultyAttributes`] will be updated
/// and returned.
///
/// If you want to calculate performance attributes, use
/// [`ManiaGradualPerformance`] instead.
///
/// # Example
///
/// ```
/// use rosu_perf::{Beatmap, Difficulty};
/// use rosu_perf::mania::ManiaGradualDifficulty;
///
/// let map = Beatmap::from_path("./resources/mania.osu").unwrap();
///
/// let difficulty = Difficulty::new().clock_rate(1.5);
/// let mut iter = ManiaGradualDifficulty::new(difficulty, &map).unwrap();
///
/// // the difficulty of the map after the first note
/// let attrs1 = iter.next();
/// // ... after the second note
/// let attrs2 = iter.next();
///
/// // Remaining notes
/// for difficulty in iter {
///     // ...
/// }
/// ```
///
/// [`ManiaGradualPerformance`]: crate::mania::ManiaGradualPerformance
#[derive(Clone, Debug)]
pub struct ManiaGradualDifficulty {
    pub(crate) idx: usize,
    pub(crate) difficulty: Difficulty,
    attrs: ManiaDifficultyAttributes,
    mania_objects: Box<[ManiaObject]>,
    diff_objects: Box<[ManiaDifficultyObject]>,
    strain: Strain,
}

impl ManiaGradualDifficulty {
    /// Create a new difficulty attributes iterator for osu!mania maps.
    ///
    /// Fails if the map is not an osu!mania map.
    pub fn new(difficulty: Difficulty, map: &Beatmap) -> Result<Self, CalculateError> {
        Mania::check_mode(map)?;

        Ok(Self::new_unchecked(difficulty, map))
    }

    pub(crate) fn new_unchecked(difficulty: Difficulty, map: &Beatmap) -> Self {
        let ManiaDifficultySetup {
            attrs,
            mania_objects,
            diff_objects,
            strain,
        } = ManiaDifficultySetup::new(&difficulty, map);

        Self {
            idx: 0,
            difficulty,
            attrs,
            mania_objects,
            diff_objects,
            strain,
        }
    }

    /// Returns `false` if there are no objects left.
    fn process_next(&mut self) -> bool {
        let Some(object) = self.mania_objects.get(self.idx) else {
            return false;
        };

        self.attrs.add_object(object);

        if let Some(curr) = self
            .idx
            .checked_sub(1)
            .and_then(|idx| self.diff_objects.get(idx))
        {
            self.strain.process(curr, &self.diff_objects);
        }

        self.idx += 1;

        true
    }
}

impl Iterator for ManiaGradualDifficulty {
    type Item = ManiaDifficultyAttributes;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.process_next() {
            return None;
        }

        let mut attrs = self.attrs.clone();
        DifficultyValues::eval(&mut attrs, &self.strain);

        Some(attrs)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();

        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let take = cmp::min(n, self.len().saturating_sub(1));

        for _ in 0..take {
            self.process_next();
        }

        self.next()
    }
}

impl ExactSizeIterator for ManiaGradualDifficulty {
    fn len(&self) -> usize {
        self.mania_objects.len() - self.idx
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        mania::difficulty::difficulty as calculate,
        model::{
            hit_object::{HitObject, HitObjectKind, HoldNote, Pos},
            mode::GameMode,
        },
    };

    use super::*;

    fn map() -> Beatmap {
        let hit_objects = (0..30)
            .map(|i| HitObject {
                pos: Pos::new(((i * 211) % 512) as f32, 192.0),
                start_time: f64::from(i) * 120.0,
                kind: if i % 7 == 3 {
                    HitObjectKind::Hold(HoldNote { duration: 500.0 })
                } else {
                    HitObjectKind::Circle
                },
            })
            .collect();

        Beatmap {
            mode: GameMode::Mania,
            cs: 7.0,
            hit_objects,
            ..Default::default()
        }
    }

    #[test]
    fn empty() {
        let map = Beatmap {
            mode: GameMode::Mania,
            ..Default::default()
        };

        let mut gradual = ManiaGradualDifficulty::new(Difficulty::new(), &map).unwrap();

        assert!(gradual.next().is_none());
    }

    #[test]
    fn wrong_mode() {
        assert!(ManiaGradualDifficulty::new(Difficulty::new(), &Beatmap::default()).is_err());
    }

    #[test]
    fn next_and_nth() {
        let map = map();
        let difficulty = Difficulty::new().clock_rate(1.2);

        let mut gradual = ManiaGradualDifficulty::new(difficulty.clone(), &map).unwrap();
        let mut gradual_2nd = gradual.clone();
        let mut gradual_3rd = gradual.clone();

        let n_objects = gradual.len();
        assert_eq!(n_objects, 30);

        for i in 1.. {
            let Some(next_gradual) = gradual.next() else {
                assert_eq!(i, n_objects + 1);
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
