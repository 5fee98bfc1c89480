use crate::util::float_ext::FloatExt;

/// Weight by which each next strain peak is multiplied.
pub const DECAY_WEIGHT: f64 = 0.9;

/// Section length in milliseconds.
pub const SECTION_LEN: f64 = 400.0;

/// The sectioned strain bookkeeping that all strain skills share.
///
/// Skills keep their own decaying strain value and feed every object's
/// strain into [`StrainSkill::record`] after having moved to the object's
/// section via [`StrainSkill::advance`].
#[derive(Clone, Debug)]
pub struct StrainSkill {
    pub curr_section_peak: f64,
    pub curr_section_end: f64,
    pub strain_peaks: Vec<f64>,
    pub object_strains: Vec<f64>,
    section_len: f64,
}

impl StrainSkill {
    pub const fn new(section_len: f64) -> Self {
        Self {
            curr_section_peak: 0.0,
            curr_section_end: 0.0,
            strain_peaks: Vec::new(),
            object_strains: Vec::new(),
            section_len,
        }
    }

    /// Start new sections until the one containing `time` is reached.
    ///
    /// `initial_strain` receives the start time of each new section and
    /// must return the strain the section starts with.
    pub fn advance(&mut self, idx: usize, time: f64, initial_strain: impl Fn(f64) -> f64) {
        if idx == 0 {
            self.curr_section_end = (time / self.section_len).ceil() * self.section_len;
        }

        while time > self.curr_section_end {
            self.strain_peaks.push(self.curr_section_peak);
            self.curr_section_peak = initial_strain(self.curr_section_end);
            self.curr_section_end += self.section_len;
        }
    }

    /// Store the strain of the current object.
    pub fn record(&mut self, strain: f64) {
        self.curr_section_peak = self.curr_section_peak.max(strain);
        self.object_strains.push(strain);
    }

    /// All section peaks including the unfinished current one.
    pub fn curr_strain_peaks(&self) -> Vec<f64> {
        let mut peaks = Vec::with_capacity(self.strain_peaks.len() + 1);
        peaks.extend_from_slice(&self.strain_peaks);
        peaks.push(self.curr_section_peak);

        peaks
    }

    pub fn into_curr_strain_peaks(mut self) -> Vec<f64> {
        self.strain_peaks.push(self.curr_section_peak);

        self.strain_peaks
    }

    /// Weighted sum of the highest strains of every section.
    pub fn difficulty_value(peaks: Vec<f64>) -> f64 {
        Self::weighted_difficulty_value(peaks, DECAY_WEIGHT)
    }

    /// Same as [`StrainSkill::difficulty_value`] but with a custom weight
    /// for each next peak.
    pub fn weighted_difficulty_value(peaks: Vec<f64>, decay_weight: f64) -> f64 {
        let mut peaks = peaks;

        // Zero sections don't contribute and would only slow down sorting
        peaks.retain(|&peak| peak > 0.0);
        peaks.sort_unstable_by(|a, b| b.total_cmp(a));

        let mut difficulty = 0.0;
        let mut weight = 1.0;

        for strain in peaks {
            difficulty += strain * weight;
            weight *= decay_weight;
        }

        difficulty
    }
}

impl Default for StrainSkill {
    fn default() -> Self {
        Self::new(SECTION_LEN)
    }
}

pub fn strain_decay(ms: f64, strain_decay_base: f64) -> f64 {
    f64::powf(strain_decay_base, ms / 1000.0)
}

/// Amount of object strains that are close to the top strain.
pub fn count_top_weighted_strains(object_strains: &[f64], difficulty_value: f64) -> f64 {
    if object_strains.is_empty() {
        return 0.0;
    }

    let consistent_top_strain = difficulty_value / 10.0;

    if FloatExt::eq(consistent_top_strain, 0.0) {
        return object_strains.len() as f64;
    }

    object_strains
        .iter()
        .map(|s| 1.1 / (1.0 + f64::exp(-10.0 * (s / consistent_top_strain - 0.88))))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_filled_with_initial_strain() {
        let mut skill = StrainSkill::default();

        skill.advance(0, 100.0, |_| unreachable!());
        skill.record(5.0);
        assert!(skill.curr_section_end.eq(400.0));

        skill.advance(1, 1300.0, |time| time / 1000.0);
        skill.record(0.1);

        assert_eq!(skill.strain_peaks, [5.0, 0.4, 0.8]);
        assert!(skill.curr_section_peak.eq(1.2));
        assert_eq!(skill.curr_strain_peaks().len(), 4);
    }

    #[test]
    fn difficulty_value_weighs_descending() {
        let value = StrainSkill::difficulty_value(vec![1.0, 0.0, 2.0]);

        assert!(value.eq(2.0 + 0.9), "{value}");

        let value = StrainSkill::weighted_difficulty_value(vec![1.0, 2.0], 0.5);
        assert!(value.eq(2.5), "{value}");
    }

    #[test]
    fn top_weighted_strains_of_uniform_strains() {
        assert!(count_top_weighted_strains(&[], 1.0).eq(0.0));
        assert!(count_top_weighted_strains(&[1.0, 2.0], 0.0).eq(2.0));
    }
}
