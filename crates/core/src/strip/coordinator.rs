use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::StripError;
use crate::wave::{DEFAULT_AMPLITUDE, DEFAULT_SPEED};

/// Colour flow is off by default
pub const DEFAULT_COLOR_FLOW_SPEED: i32 = 0;

/// A wave parameter settable from a control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveParameter {
    Amplitude,
    Speed,
    ColorFlowSpeed,
}

impl WaveParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaveParameter::Amplitude => "wave_amplitude",
            WaveParameter::Speed => "wave_speed",
            WaveParameter::ColorFlowSpeed => "color_flow_speed",
        }
    }

    /// Suffix for the display name of the matching control
    pub fn label(&self) -> &'static str {
        match self {
            WaveParameter::Amplitude => "Wave Amplitude",
            WaveParameter::Speed => "Wave Speed",
            WaveParameter::ColorFlowSpeed => "Color Flow Speed",
        }
    }

    /// Inclusive bounds
    pub fn range(&self) -> (i32, i32) {
        match self {
            WaveParameter::Amplitude => (0, 100),
            WaveParameter::Speed | WaveParameter::ColorFlowSpeed => (-100, 100),
        }
    }

    pub fn check(&self, value: i32) -> Result<(), StripError> {
        let (min, max) = self.range();
        if value < min || value > max {
            return Err(StripError::OutOfRange {
                parameter: self.as_str(),
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveParams {
    pub amplitude: i32,
    pub speed: i32,
    pub color_flow_speed: i32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_AMPLITUDE as i32,
            speed: DEFAULT_SPEED as i32,
            color_flow_speed: DEFAULT_COLOR_FLOW_SPEED,
        }
    }
}

impl WaveParams {
    pub fn get(&self, parameter: WaveParameter) -> i32 {
        match parameter {
            WaveParameter::Amplitude => self.amplitude,
            WaveParameter::Speed => self.speed,
            WaveParameter::ColorFlowSpeed => self.color_flow_speed,
        }
    }

    fn set(&mut self, parameter: WaveParameter, value: i32) {
        match parameter {
            WaveParameter::Amplitude => self.amplitude = value,
            WaveParameter::Speed => self.speed = value,
            WaveParameter::ColorFlowSpeed => self.color_flow_speed = value,
        }
    }
}

/// Receives wave parameter changes from a [`ParameterCoordinator`].
/// Called synchronously, so implementations must not block.
pub trait WaveListener: Send + Sync {
    fn wave_changed(&self, parameter: WaveParameter, value: i32);
}

struct Bindings {
    params: WaveParams,
    strip: Option<Weak<dyn WaveListener>>,
    controls: Vec<Weak<dyn WaveListener>>,
}

/// Single owner of a strip's wave parameters.
///
/// The strip and its controls are held as weak handles, so a control that
/// keeps the coordinator alive never forms a cycle with it. Every update is
/// applied once and pushed to all live listeners before it returns.
pub struct ParameterCoordinator {
    bindings: Mutex<Bindings>,
    // Held across store and notify so listeners see updates in store order
    update_lock: Mutex<()>,
}

impl ParameterCoordinator {
    pub fn new(params: WaveParams) -> Self {
        Self {
            bindings: Mutex::new(Bindings {
                params,
                strip: None,
                controls: Vec::new(),
            }),
            update_lock: Mutex::new(()),
        }
    }

    pub fn params(&self) -> WaveParams {
        self.bindings.lock().params
    }

    /// Bind the strip, replacing any earlier one.
    pub fn bind_strip<L: WaveListener + 'static>(&self, strip: &Arc<L>) {
        let weak: Weak<L> = Arc::downgrade(strip);
        let strip: Weak<dyn WaveListener> = weak;
        self.bindings.lock().strip = Some(strip);
    }

    pub fn bind_control<L: WaveListener + 'static>(&self, control: &Arc<L>) {
        let weak: Weak<L> = Arc::downgrade(control);
        let control: Weak<dyn WaveListener> = weak;
        self.bindings.lock().controls.push(control);
    }

    pub fn update_amplitude(&self, value: i32) -> Result<(), StripError> {
        self.update(WaveParameter::Amplitude, value)
    }

    pub fn update_speed(&self, value: i32) -> Result<(), StripError> {
        self.update(WaveParameter::Speed, value)
    }

    pub fn update_color_flow_speed(&self, value: i32) -> Result<(), StripError> {
        self.update(WaveParameter::ColorFlowSpeed, value)
    }

    pub fn update(&self, parameter: WaveParameter, value: i32) -> Result<(), StripError> {
        parameter.check(value)?;
        let _update = self.update_lock.lock();

        let listeners: Vec<Arc<dyn WaveListener>> = {
            let mut bindings = self.bindings.lock();
            bindings.params.set(parameter, value);
            bindings.controls.retain(|control| control.strong_count() > 0);
            bindings
                .controls
                .iter()
                .chain(bindings.strip.iter())
                .filter_map(Weak::upgrade)
                .collect()
        };

        // Outside the bindings lock so a listener may read params() back.
        // Listeners must not call update() themselves.
        for listener in listeners {
            listener.wave_changed(parameter, value);
        }

        log::debug!("Wave {} set to {}", parameter.as_str(), value);
        Ok(())
    }
}

impl Default for ParameterCoordinator {
    fn default() -> Self {
        Self::new(WaveParams::default())
    }
}
