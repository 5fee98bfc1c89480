pub struct Catcher;

const AREA_CATCHER_SIZE: f32 = 106.75;

impl Catcher {
    pub const BASE_SPEED: f64 = 1.0;
    pub const ALLOWED_CATCH_RANGE: f32 = 0.8;

    /// Width of the area in which the catcher can catch objects.
    pub fn catch_width(cs: f32) -> f32 {
        AREA_CATCHER_SIZE * Self::scale(cs).abs() * Self::ALLOWED_CATCH_RANGE
    }

    fn scale(cs: f32) -> f32 {
        ((1.0 - 0.7 * ((f64::from(cs) - 5.0) / 5.0)) as f32 / 2.0) * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_cs_shrinks_catcher() {
        assert!(Catcher::catch_width(7.0) < Catcher::catch_width(4.0));
        assert!((Catcher::catch_width(5.0) - AREA_CATCHER_SIZE * 0.8).abs() < 1e-4);
    }
}
