pub mod animation;
pub mod controller;
pub mod controls;
pub mod coordinator;
pub mod manager;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use animation::{AnimationLoop, ERROR_BACKOFF};
pub use controller::StripController;
pub use controls::{NumberControl, SectionControl};
pub use coordinator::{
    ParameterCoordinator, WaveListener, WaveParameter, WaveParams, DEFAULT_COLOR_FLOW_SPEED,
};
pub use manager::{StripEntry, StripManager};
pub use state::{OutgoingFrame, SharedStrip, StripState, DEFAULT_BRIGHTNESS};
