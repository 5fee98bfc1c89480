use rosu_map::section::{general::GameMode, hit_objects::CurveBuffers};

use crate::model::{
    beatmap::Beatmap,
    control_point::{DifficultyPoint, TimingPoint},
    hit_object::{HitObject, HitObjectKind, HoldNote, Spinner},
};

const BASE_SCORING_DIST: f64 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ManiaObject {
    pub start_time: f64,
    pub end_time: f64,
    pub column: usize,
    /// The combo that hitting this object is worth.
    pub combo: u32,
    pub is_hold: bool,
}

impl ManiaObject {
    pub fn new(
        h: &HitObject,
        total_columns: f32,
        map: &Beatmap,
        curve_bufs: &mut CurveBuffers,
    ) -> Self {
        let duration = match h.kind {
            HitObjectKind::Circle => 0.0,
            HitObjectKind::Slider(ref slider) => {
                let dist = slider.curve(GameMode::Mania, curve_bufs).dist();

                let beat_len = map
                    .timing_point_at(h.start_time)
                    .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

                let slider_velocity = map
                    .difficulty_point_at(h.start_time)
                    .map_or(DifficultyPoint::DEFAULT_SLIDER_VELOCITY, |point| {
                        point.slider_velocity
                    });

                let scoring_dist = BASE_SCORING_DIST * map.slider_multiplier * slider_velocity;
                let velocity = scoring_dist / beat_len;

                slider.span_count() as f64 * dist / velocity
            }
            HitObjectKind::Spinner(Spinner { duration })
            | HitObjectKind::Hold(HoldNote { duration }) => duration,
        };

        Self {
            start_time: h.start_time,
            end_time: h.start_time + duration,
            column: Self::column(h.pos.x, total_columns),
            // Hold notes give an additional combo every 100ms
            combo: 1 + (duration / 100.0) as u32,
            is_hold: !h.is_circle(),
        }
    }

    pub fn create_all(map: &Beatmap, total_columns: f32) -> Box<[Self]> {
        let mut curve_bufs = CurveBuffers::default();

        map.hit_objects
            .iter()
            .map(|h| Self::new(h, total_columns, map, &mut curve_bufs))
            .collect()
    }

    /// The column of the given x-coordinate.
    pub fn column(x: f32, total_columns: f32) -> usize {
        let x_divisor = 512.0 / total_columns;

        (x / x_divisor).floor().min(total_columns - 1.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use crate::model::hit_object::Pos;

    use super::*;

    #[test]
    fn columns() {
        assert_eq!(ManiaObject::column(0.0, 4.0), 0);
        assert_eq!(ManiaObject::column(200.0, 4.0), 1);
        assert_eq!(ManiaObject::column(511.0, 4.0), 3);
        assert_eq!(ManiaObject::column(600.0, 4.0), 3);
        assert_eq!(ManiaObject::column(-5.0, 7.0), 0);
    }

    #[test]
    fn hold_note_combo() {
        let hold = HitObject {
            pos: Pos::new(64.0, 192.0),
            start_time: 1000.0,
            kind: HitObjectKind::Hold(HoldNote { duration: 450.0 }),
        };

        let obj = ManiaObject::new(&hold, 4.0, &Beatmap::default(), &mut CurveBuffers::default());

        assert_eq!(obj.combo, 5);
        assert!(obj.is_hold);
        assert!((obj.end_time - 1450.0).abs() < f64::EPSILON);
        assert_eq!(obj.column, 0);
    }
}
