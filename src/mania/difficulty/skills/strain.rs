use crate::{
    any::difficulty::skills::{strain_decay, StrainSkill},
    mania::difficulty::object::ManiaDifficultyObject,
};

const INDIVIDUAL_DECAY_BASE: f64 = 0.125;
const OVERALL_DECAY_BASE: f64 = 0.3;
const RELEASE_THRESHOLD: f64 = 30.0;

const SKILL_MULTIPLIER: f64 = 1.0;
const STRAIN_DECAY_BASE: f64 = 1.0;

/// Skill combining the strain within each column with the strain across
/// all columns.
#[derive(Clone, Debug)]
#[allow(clippy::struct_field_names)]
pub struct Strain {
    start_times: Box<[f64]>,
    end_times: Box<[f64]>,
    individual_strains: Box<[f64]>,
    individual_strain: f64,
    overall_strain: f64,
    curr_strain: f64,
    inner: StrainSkill,
}

impl Strain {
    pub fn new(total_columns: usize) -> Self {
        Self {
            start_times: vec![0.0; total_columns].into_boxed_slice(),
            end_times: vec![0.0; total_columns].into_boxed_slice(),
            individual_strains: vec![0.0; total_columns].into_boxed_slice(),
            individual_strain: 0.0,
            overall_strain: 1.0,
            curr_strain: 0.0,
            inner: StrainSkill::default(),
        }
    }

    pub fn process(&mut self, curr: &ManiaDifficultyObject, objects: &[ManiaDifficultyObject]) {
        let prev_start_time = curr
            .idx
            .checked_sub(1)
            .and_then(|idx| objects.get(idx))
            .map_or(0.0, |prev| prev.start_time);

        let (individual, overall) = (self.individual_strain, self.overall_strain);

        self.inner.advance(curr.idx, curr.start_time, |time| {
            let time = time - prev_start_time;

            apply_decay(individual, time, INDIVIDUAL_DECAY_BASE)
                + apply_decay(overall, time, OVERALL_DECAY_BASE)
        });

        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_strain += self.strain_value_of(curr) * SKILL_MULTIPLIER;

        self.inner.record(self.curr_strain);
    }

    pub fn into_curr_strain_peaks(self) -> Vec<f64> {
        self.inner.into_curr_strain_peaks()
    }

    pub fn difficulty_value(&self) -> f64 {
        StrainSkill::difficulty_value(self.inner.curr_strain_peaks())
    }

    fn strain_value_of(&mut self, curr: &ManiaDifficultyObject) -> f64 {
        let start_time = curr.start_time;
        let end_time = curr.end_time;
        let column = curr.base_column.min(self.end_times.len().saturating_sub(1));
        let mut is_overlapping = false;

        let mut closest_end_time = (end_time - start_time).abs();
        let mut hold_factor = 1.0;
        let mut hold_addition = 0.0;

        for (&prev_start, &prev_end) in self.start_times.iter().zip(self.end_times.iter()) {
            // Overlapped by an earlier hold
            is_overlapping |= prev_end > start_time + 1.0
                && end_time > prev_end + 1.0
                && start_time > prev_start + 1.0;

            // Holding something at the same time
            if prev_end > end_time + 1.0 && start_time > prev_start + 1.0 {
                hold_factor = 1.25;
            }

            closest_end_time = (end_time - prev_end).abs().min(closest_end_time);
        }

        // Releasing together with other notes is easy so the hold addition fades
        // out as the closest release gets nearer
        if is_overlapping {
            hold_addition = (1.0 + (0.27 * (RELEASE_THRESHOLD - closest_end_time)).exp()).recip();
        }

        let Some(individual_strain) = self.individual_strains.get_mut(column) else {
            return 0.0;
        };

        *individual_strain = apply_decay(
            *individual_strain,
            start_time - self.start_times[column],
            INDIVIDUAL_DECAY_BASE,
        );
        *individual_strain += 2.0 * hold_factor;

        // Chords share their hardest column strain
        self.individual_strain = if curr.delta_time <= 1.0 {
            self.individual_strain.max(*individual_strain)
        } else {
            *individual_strain
        };

        self.overall_strain = apply_decay(self.overall_strain, curr.delta_time, OVERALL_DECAY_BASE);
        self.overall_strain += (1.0 + hold_addition) * hold_factor;

        self.start_times[column] = start_time;
        self.end_times[column] = end_time;

        // Only the hardest object of each section counts
        self.individual_strain + self.overall_strain - self.curr_strain
    }
}

fn apply_decay(value: f64, delta_time: f64, decay_base: f64) -> f64 {
    value * decay_base.powf(delta_time / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff_object(idx: usize, start_time: f64, end_time: f64, column: usize) -> ManiaDifficultyObject {
        ManiaDifficultyObject {
            idx,
            base_column: column,
            delta_time: 100.0,
            start_time,
            end_time,
        }
    }

    #[test]
    fn jacks_are_harder_than_alternating() {
        let jacks: Vec<_> = (0..20)
            .map(|i| diff_object(i, 100.0 * (i + 1) as f64, 100.0 * (i + 1) as f64, 0))
            .collect();

        let alternating: Vec<_> = (0..20)
            .map(|i| diff_object(i, 100.0 * (i + 1) as f64, 100.0 * (i + 1) as f64, i % 4))
            .collect();

        let value = |objects: &[ManiaDifficultyObject]| {
            let mut strain = Strain::new(4);

            for curr in objects {
                strain.process(curr, objects);
            }

            strain.difficulty_value()
        };

        assert!(value(&jacks) > value(&alternating));
    }

    #[test]
    fn held_notes_add_strain() {
        let plain = [diff_object(0, 100.0, 100.0, 0), diff_object(1, 200.0, 200.0, 1)];
        let held = [diff_object(0, 100.0, 1000.0, 0), diff_object(1, 200.0, 200.0, 1)];

        let value = |objects: &[ManiaDifficultyObject]| {
            let mut strain = Strain::new(2);

            for curr in objects {
                strain.process(curr, objects);
            }

            strain.curr_strain
        };

        assert!(value(&held) > value(&plain));
    }
}
