pub use color::Rgb;
pub use config::{ConfigFile, ConfigManager, ConfigOption, ConfigSchema, StripConfig};
pub use effect::{ColorEffectEngine, EffectPattern};
pub use error::StripError;
pub use protocol::{
    build_color_packet, build_enable_packet, unwrap_envelope, wrap_envelope, Command,
    LightOutput, Packet, UdpTransport, KEEP_ALIVE_INTERVAL, MAX_LEDS,
};
pub use strip::{
    AnimationLoop, NumberControl, ParameterCoordinator, SectionControl, StripController,
    StripEntry, StripManager, WaveParameter, WaveParams,
};
pub use wave::WaveModulator;

pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod protocol;
pub mod strip;
pub mod wave;
