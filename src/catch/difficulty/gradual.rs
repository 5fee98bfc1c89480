use std::cmp;

use crate::{
    any::difficulty::Difficulty,
    catch::{
        attributes::{CatchDifficultyAttributes, ObjectCount},
        Catch,
    },
    model::{
        beatmap::Beatmap,
        mode::{CalculateError, IGameMode},
    },
};

use super::{
    object::CatchDifficultyObject, skills::movement::Movement, CatchDifficultySetup,
    DifficultyValues,
};

/// Gradually calculate the difficulty attributes of an osu!catch map.
///
/// Note that this struct implements [`Iterator`].
/// On every call of [`Iterator::next`], the map's next fruit or droplet
/// will be processed and the [`CatchDifficultyAttributes`] will be updated and
/// returned.
///
/// Note that it does not return attributes after a tiny droplet. Only for
/// fruits and droplets.
///
/// If you want to calculate performance attributes, use
/// [`CatchGradualPerformance`] instead.
///
/// # Example
///
/// ```
/// use rosu_perf::{Beatmap, Difficulty};
/// use rosu_perf::catch::CatchGradualDifficulty;
///
/// let map = Beatmap::from_path("./resources/catch.osu").unwrap();
///
/// let difficulty = Difficulty::new().clock_rate(1.5);
/// let mut iter = CatchGradualDifficulty::new(difficulty, &map).unwrap();
///
/// // the difficulty of the map after the first fruit or droplet
/// let attrs1 = iter.next();
/// // ... after the second one
/// let attrs2 = iter.next();
///
/// // Remaining objects
/// for difficulty in iter {
///     // ...
/// }
/// ```
///
/// [`CatchGradualPerformance`]: crate::catch::CatchGradualPerformance
#[derive(Clone, Debug)]
pub struct CatchGradualDifficulty {
    pub(crate) idx: usize,
    pub(crate) difficulty: Difficulty,
    attrs: CatchDifficultyAttributes,
    /// The object counts of each palpable object
    counts: Box<[ObjectCount]>,
    diff_objects: Box<[CatchDifficultyObject]>,
    movement: Movement,
}

impl CatchGradualDifficulty {
    /// Create a new difficulty attributes iterator for osu!catch maps.
    ///
    /// Fails if the map is not an osu!catch map.
    pub fn new(difficulty: Difficulty, map: &Beatmap) -> Result<Self, CalculateError> {
        Catch::check_mode(map)?;

        Ok(Self::new_unchecked(difficulty, map))
    }

    pub(crate) fn new_unchecked(difficulty: Difficulty, map: &Beatmap) -> Self {
        let CatchDifficultySetup {
            attrs,
            counts,
            diff_objects,
            movement,
        } = CatchDifficultySetup::new(&difficulty, map);

        Self {
            idx: 0,
            difficulty,
            attrs,
            counts: counts.into_boxed_slice(),
            diff_objects,
            movement,
        }
    }

    /// Returns `false` if there are no objects left.
    fn process_next(&mut self) -> bool {
        let Some(&count) = self.counts.get(self.idx) else {
            return false;
        };

        // The first palpable object has no difficulty object
        if let Some(curr) = self
            .idx
            .checked_sub(1)
            .and_then(|idx| self.diff_objects.get(idx))
        {
            self.movement.process(curr, &self.diff_objects);
        }

        self.attrs.add_object_count(count);
        self.idx += 1;

        true
    }
}

impl Iterator for CatchGradualDifficulty {
    type Item = CatchDifficultyAttributes;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.process_next() {
            return None;
        }

        let mut attrs = self.attrs.clone();
        DifficultyValues::eval(&mut attrs, &self.movement);

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

impl ExactSizeIterator for CatchGradualDifficulty {
    fn len(&self) -> usize {
        self.counts.len() - self.idx
    }
}

#[cfg(test)]
mod tests {
    use rosu_map::section::hit_objects::{PathControlPoint, PathType};

    use crate::{
        catch::difficulty::difficulty as calculate,
        model::{
            hit_object::{HitObject, HitObjectKind, Pos, Slider},
            mode::GameMode,
        },
    };

    use super::*;

    fn map() -> Beatmap {
        let mut hit_objects: Vec<_> = (0..12)
            .map(|i| HitObject {
                pos: Pos::new(40.0 * i as f32, 192.0),
                start_time: f64::from(i) * 300.0,
                kind: HitObjectKind::Circle,
            })
            .collect();

        hit_objects.push(HitObject {
            pos: Pos::new(100.0, 192.0),
            start_time: 4000.0,
            kind: HitObjectKind::Slider(Slider {
                expected_dist: Some(250.0),
                repeats: 0,
                control_points: vec![
                    PathControlPoint {
                        path_type: Some(PathType::LINEAR),
                        ..PathControlPoint::new(Pos::new(0.0, 0.0))
                    },
                    PathControlPoint::new(Pos::new(250.0, 0.0)),
                ]
                .into_boxed_slice(),
                node_sounds: Box::default(),
            }),
        });

        Beatmap {
            mode: GameMode::Catch,
            hit_objects,
            ..Default::default()
        }
    }

    #[test]
    fn empty() {
        let map = Beatmap {
            mode: GameMode::Catch,
            ..Default::default()
        };

        let mut gradual = CatchGradualDifficulty::new(Difficulty::new(), &map).unwrap();

        assert!(gradual.next().is_none());
    }

    #[test]
    fn wrong_mode() {
        assert!(CatchGradualDifficulty::new(Difficulty::new(), &Beatmap::default()).is_err());
    }

    #[test]
    fn next_and_nth() {
        let map = map();
        let difficulty = Difficulty::new();

        let mut gradual = CatchGradualDifficulty::new(difficulty.clone(), &map).unwrap();
        let mut gradual_2nd = gradual.clone();
        let mut gradual_3rd = gradual.clone();

        let n_objects = gradual.len();
        assert!(n_objects > 12);

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
