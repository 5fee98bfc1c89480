use self::{color::Color, reading::Reading, rhythm::Rhythm, stamina::Stamina};

use super::object::{TaikoDifficultyObject, TaikoDifficultyObjects};

pub mod color;
pub mod reading;
pub mod rhythm;
pub mod stamina;

/// All skills of an osu!taiko difficulty calculation.
#[derive(Clone, Debug)]
pub struct TaikoSkills {
    pub rhythm: Rhythm,
    pub reading: Reading,
    pub color: Color,
    pub stamina: Stamina,
    pub single_color_stamina: Stamina,
}

impl TaikoSkills {
    pub fn new(great_hit_window: f64, is_convert: bool) -> Self {
        Self {
            rhythm: Rhythm::new(great_hit_window),
            reading: Reading::new(),
            color: Color::new(),
            stamina: Stamina::new(false, is_convert),
            single_color_stamina: Stamina::new(true, is_convert),
        }
    }

    pub fn process(&mut self, curr: &TaikoDifficultyObject, objects: &TaikoDifficultyObjects) {
        self.rhythm.process(curr, objects);
        self.reading.process(curr, objects);
        self.color.process(curr, objects);
        self.stamina.process(curr, objects);
        self.single_color_stamina.process(curr, objects);
    }
}
