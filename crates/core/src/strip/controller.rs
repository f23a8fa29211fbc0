use std::sync::Arc;

use super::animation::AnimationLoop;
use super::coordinator::{ParameterCoordinator, WaveParameter};
use super::state::{SharedStrip, StripState};
use crate::color::Rgb;
use crate::config::StripConfig;
use crate::effect::EffectPattern;
use crate::error::StripError;
use crate::protocol::LightOutput;

/// The light device for one strip: power, brightness, effect and wave,
/// plus the narrow section-colour interface used by section controls.
pub struct StripController {
    host: String,
    name: String,
    num_sections: usize,
    shared: Arc<SharedStrip>,
    coordinator: Arc<ParameterCoordinator>,
    animation: AnimationLoop,
}

impl StripController {
    /// Build the strip and bind it to `coordinator`. The strip's wave starts
    /// from the coordinator's current parameters. `config` must already be
    /// validated.
    pub fn new(
        config: &StripConfig,
        coordinator: Arc<ParameterCoordinator>,
        output: Arc<dyn LightOutput>,
    ) -> Self {
        let state = StripState::new(config.num_leds, config.num_sections, coordinator.params());
        let shared = Arc::new(SharedStrip::new(state));
        coordinator.bind_strip(&shared);

        let animation = AnimationLoop::new(Arc::clone(&shared), output, config.update_interval());

        Self {
            host: config.host.clone(),
            name: config.name.clone(),
            num_sections: config.num_sections,
            shared,
            coordinator,
            animation,
        }
    }

    pub fn unique_id(&self) -> String {
        format!("{}_strip", self.host)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_sections(&self) -> usize {
        self.num_sections
    }

    pub fn is_on(&self) -> bool {
        self.shared.state.lock().is_on()
    }

    pub fn brightness(&self) -> u8 {
        self.shared.state.lock().brightness()
    }

    pub fn effect(&self) -> EffectPattern {
        self.shared.state.lock().effect()
    }

    pub fn effect_list(&self) -> Vec<EffectPattern> {
        EffectPattern::all()
    }

    pub fn amplitude(&self) -> u8 {
        self.shared.state.lock().wave().amplitude()
    }

    pub fn speed(&self) -> i8 {
        self.shared.state.lock().wave().speed()
    }

    pub fn color_flow_speed(&self) -> i32 {
        self.shared.state.lock().color_flow_speed()
    }

    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    pub async fn turn_on(&self, brightness: Option<u8>, effect: Option<EffectPattern>) {
        self.shared.state.lock().turn_on(brightness, effect);
        self.animation.start().await;
        log::info!(
            "{} on (brightness={}, effect={})",
            self.name,
            self.brightness(),
            self.effect()
        );
    }

    /// The loop keeps running and sends one black frame on its next tick.
    pub fn turn_off(&self) {
        self.shared.state.lock().turn_off();
        log::info!("{} off", self.name);
    }

    /// Set amplitude and/or speed through the coordinator. Both values are
    /// checked before either is applied.
    pub fn set_wave(&self, amplitude: Option<i32>, speed: Option<i32>) -> Result<(), StripError> {
        if let Some(amplitude) = amplitude {
            WaveParameter::Amplitude.check(amplitude)?;
        }
        if let Some(speed) = speed {
            WaveParameter::Speed.check(speed)?;
        }

        if let Some(amplitude) = amplitude {
            self.coordinator.update_amplitude(amplitude)?;
        }
        if let Some(speed) = speed {
            self.coordinator.update_speed(speed)?;
        }
        Ok(())
    }

    pub fn set_section_color(&self, section: usize, color: Rgb) {
        self.shared.state.lock().set_section_color(section, color);
    }

    pub fn section_color(&self, section: usize) -> Option<Rgb> {
        self.shared.state.lock().engine().section_color(section)
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(&self) {
        self.animation.stop().await;
        log::info!("{} shut down", self.name);
    }
}
