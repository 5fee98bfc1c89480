/// Spinners turn into banana showers which don't affect difficulty but
/// still advance the random generator of the conversion.
pub struct BananaShower {
    pub n_bananas: usize,
}

impl BananaShower {
    pub fn new(start_time: f64, end_time: f64) -> Self {
        // Truncated like stable
        let start_time = start_time as i32;
        let end_time = end_time as i32;
        let mut spacing = (end_time - start_time) as f32;

        while spacing > 100.0 {
            spacing /= 2.0;
        }

        if spacing <= 0.0 {
            return Self { n_bananas: 0 };
        }

        let end_time = end_time as f32;
        let mut time = start_time as f32;
        let mut n_bananas = 0;

        while time <= end_time {
            time += spacing;
            n_bananas += 1;
        }

        Self { n_bananas }
    }
}
