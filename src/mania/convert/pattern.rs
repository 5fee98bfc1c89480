use std::mem;

use crate::model::hit_object::{HitObject, HitObjectKind, HoldNote, Pos};

/// Notes that were generated for a single osu!standard object.
#[derive(Clone, Debug, Default)]
pub struct Pattern {
    pub hit_objects: Vec<HitObject>,
    contained_columns: ContainedColumns,
}

impl Pattern {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hit_objects: Vec::with_capacity(capacity),
            contained_columns: ContainedColumns::default(),
        }
    }

    pub fn single(column: i32, note: HitObject) -> Self {
        let mut pattern = Self::with_capacity(1);
        pattern.add(column, note);

        pattern
    }

    pub fn add(&mut self, column: i32, note: HitObject) {
        self.contained_columns.insert(column);
        self.hit_objects.push(note);
    }

    pub const fn column_has_obj(&self, column: i32) -> bool {
        self.contained_columns.contains(column)
    }

    /// Amount of distinct columns that contain a note.
    pub const fn column_with_objs(&self) -> i32 {
        self.contained_columns.len() as i32
    }

    /// Moves all notes of `other` into `self`, leaving `other` empty.
    pub fn append(&mut self, other: &mut Self) {
        self.hit_objects.append(&mut other.hit_objects);
        self.contained_columns.append(&mut other.contained_columns);
    }
}

/// A note in the given column. Equal start and end times create a regular
/// note, otherwise a hold note.
pub fn note(column: i32, total_columns: i32, start_time: f64, end_time: f64) -> HitObject {
    let x = column_to_pos(column, total_columns);

    let kind = if end_time > start_time {
        HitObjectKind::Hold(HoldNote {
            duration: end_time - start_time,
        })
    } else {
        HitObjectKind::Circle
    };

    HitObject {
        pos: Pos::new(x, x),
        start_time,
        kind,
    }
}

fn column_to_pos(column: i32, total_columns: i32) -> f32 {
    let divisor = 512.0 / total_columns as f32;

    (column as f32 * divisor).ceil()
}

#[derive(Copy, Clone, Debug, Default)]
struct ContainedColumns(u16);

impl ContainedColumns {
    const fn bit(column: i32) -> u16 {
        if 0 <= column && column < 16 {
            1 << column
        } else {
            0
        }
    }

    const fn insert(&mut self, column: i32) {
        self.0 |= Self::bit(column);
    }

    fn append(&mut self, other: &mut Self) {
        self.0 |= mem::take(&mut other.0);
    }

    const fn len(self) -> u32 {
        self.0.count_ones()
    }

    const fn contains(self, column: i32) -> bool {
        self.0 & Self::bit(column) != 0
    }
}

#[cfg(test)]
mod tests {
    use crate::mania::object::ManiaObject;

    use super::*;

    #[test]
    fn positions_map_back_to_columns() {
        for total_columns in 1..=10 {
            for column in 0..total_columns {
                let h = note(column, total_columns, 0.0, 0.0);
                let mapped = ManiaObject::column(h.pos.x, total_columns as f32);

                assert_eq!(mapped, column as usize, "{column}/{total_columns}");
            }
        }
    }

    #[test]
    fn hold_notes_need_a_duration() {
        assert!(note(0, 4, 100.0, 100.0).is_circle());
        assert!(note(0, 4, 100.0, 250.0).is_hold_note());
    }

    #[test]
    fn columns_are_tracked() {
        let mut pattern = Pattern::single(1, note(1, 4, 0.0, 0.0));
        let mut other = Pattern::single(3, note(3, 4, 0.0, 0.0));
        other.add(1, note(1, 4, 0.0, 0.0));

        pattern.append(&mut other);

        assert_eq!(pattern.column_with_objs(), 2);
        assert_eq!(pattern.hit_objects.len(), 3);
        assert!(pattern.column_has_obj(3));
        assert!(!pattern.column_has_obj(0));
        assert_eq!(other.column_with_objs(), 0);
    }
}
