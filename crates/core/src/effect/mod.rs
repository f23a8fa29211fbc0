pub mod color_engine;
pub mod effect;

pub use color_engine::{normalize_length, ColorEffectEngine};
pub use effect::EffectPattern;
