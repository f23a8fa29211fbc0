pub mod wave;

pub use wave::{period_for_speed, WaveModulator, DEFAULT_AMPLITUDE, DEFAULT_SPEED};
