pub mod banana_shower;
pub mod juice_stream;
pub mod palpable;
