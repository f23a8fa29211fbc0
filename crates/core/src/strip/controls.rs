//! Control surfaces exposed to the host platform besides the strip itself.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::controller::StripController;
use super::coordinator::{ParameterCoordinator, WaveListener, WaveParameter};
use crate::color::Rgb;
use crate::error::StripError;

/// A numeric slider for one wave parameter.
pub struct NumberControl {
    parameter: WaveParameter,
    name: String,
    unique_id: String,
    value: AtomicI32,
    coordinator: Arc<ParameterCoordinator>,
}

impl NumberControl {
    /// Create the control and register it with `coordinator`.
    pub fn new(
        parameter: WaveParameter,
        strip_name: &str,
        host: &str,
        coordinator: Arc<ParameterCoordinator>,
    ) -> Arc<Self> {
        let control = Arc::new(Self {
            parameter,
            name: format!("{} {}", strip_name, parameter.label()),
            unique_id: format!("{}_{}", host, parameter.as_str()),
            value: AtomicI32::new(coordinator.params().get(parameter)),
            coordinator: Arc::clone(&coordinator),
        });
        coordinator.bind_control(&control);
        control
    }

    pub fn parameter(&self) -> WaveParameter {
        self.parameter
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn min(&self) -> i32 {
        self.parameter.range().0
    }

    pub fn max(&self) -> i32 {
        self.parameter.range().1
    }

    pub fn value(&self) -> i32 {
        self.value.load(Ordering::SeqCst)
    }

    /// The coordinator pushes the accepted value back to this control.
    pub fn set_value(&self, value: i32) -> Result<(), StripError> {
        self.coordinator.update(self.parameter, value)
    }
}

impl WaveListener for NumberControl {
    fn wave_changed(&self, parameter: WaveParameter, value: i32) {
        if parameter == self.parameter {
            self.value.store(value, Ordering::SeqCst);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SectionSetting {
    rgb: Rgb,
    brightness: u8,
}

/// One section of a strip, controlled like a small light of its own.
pub struct SectionControl {
    index: usize,
    name: String,
    unique_id: String,
    strip: Arc<StripController>,
    setting: Mutex<SectionSetting>,
}

impl SectionControl {
    pub fn new(strip: Arc<StripController>, index: usize) -> Self {
        Self {
            index,
            name: format!("{} Section {}", strip.name(), index + 1),
            unique_id: format!("{}_section_{}", strip.host(), index),
            strip,
            setting: Mutex::new(SectionSetting {
                rgb: Rgb::WHITE,
                brightness: u8::MAX,
            }),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Sections follow the strip's power state.
    pub fn is_on(&self) -> bool {
        self.strip.is_on()
    }

    pub fn rgb_color(&self) -> Rgb {
        self.setting.lock().rgb
    }

    pub fn brightness(&self) -> u8 {
        self.setting.lock().brightness
    }

    /// Store the dimmed colour for this section and power the strip up if
    /// it is off.
    pub async fn turn_on(&self, rgb: Option<Rgb>, brightness: Option<u8>) {
        let adjusted = {
            let mut setting = self.setting.lock();
            if let Some(rgb) = rgb {
                setting.rgb = rgb;
            }
            if let Some(brightness) = brightness {
                setting.brightness = brightness;
            }
            setting.rgb.scaled(setting.brightness)
        };

        self.strip.set_section_color(self.index, adjusted);

        if !self.strip.is_on() {
            self.strip.turn_on(None, None).await;
        }
    }

    /// Blacks out this section only; the strip stays on.
    pub fn turn_off(&self) {
        self.strip.set_section_color(self.index, Rgb::BLACK);
    }
}
