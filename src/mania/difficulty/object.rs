use crate::mania::object::ManiaObject;

#[derive(Clone, Debug)]
pub struct ManiaDifficultyObject {
    pub idx: usize,
    pub base_column: usize,
    pub delta_time: f64,
    pub start_time: f64,
    pub end_time: f64,
}

impl ManiaDifficultyObject {
    pub fn new(base: &ManiaObject, last: &ManiaObject, clock_rate: f64, idx: usize) -> Self {
        Self {
            idx,
            base_column: base.column,
            delta_time: (base.start_time - last.start_time) / clock_rate,
            start_time: base.start_time / clock_rate,
            end_time: base.end_time / clock_rate,
        }
    }

    /// Difficulty objects for all but the first of the given objects.
    pub fn create_all(mania_objects: &[ManiaObject], clock_rate: f64) -> Box<[Self]> {
        mania_objects
            .windows(2)
            .enumerate()
            .filter_map(|(i, window)| match window {
                [last, curr] => Some(Self::new(curr, last, clock_rate, i)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(start_time: f64, column: usize) -> ManiaObject {
        ManiaObject {
            start_time,
            end_time: start_time,
            column,
            combo: 1,
            is_hold: false,
        }
    }

    #[test]
    fn times_scale_with_clock_rate() {
        let objects = [note(100.0, 0), note(400.0, 2), note(700.0, 1)];
        let diff_objects = ManiaDifficultyObject::create_all(&objects, 1.5);

        assert_eq!(diff_objects.len(), 2);
        assert_eq!(diff_objects[1].idx, 1);
        assert_eq!(diff_objects[1].base_column, 1);
        assert!((diff_objects[0].delta_time - 200.0).abs() < 1e-9);
        assert!((diff_objects[1].start_time - 700.0 / 1.5).abs() < 1e-9);
    }
}
