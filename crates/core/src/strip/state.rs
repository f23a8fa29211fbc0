use parking_lot::Mutex;

use super::coordinator::{WaveListener, WaveParameter, WaveParams};
use crate::color::Rgb;
use crate::effect::{ColorEffectEngine, EffectPattern};
use crate::wave::WaveModulator;

pub const DEFAULT_BRIGHTNESS: u8 = 128;

/// One LED-data frame ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingFrame {
    pub colors: Vec<Rgb>,
    pub gradient_mode: bool,
}

/// Mutable state of one strip. Every mutation happens under the
/// [`SharedStrip`] lock and never across an await point, so a tick always
/// sees a consistent snapshot.
#[derive(Debug)]
pub struct StripState {
    is_on: bool,
    brightness: u8,
    effect: EffectPattern,
    color_flow_speed: i32,
    blackout_pending: bool,
    engine: ColorEffectEngine,
    wave: WaveModulator,
}

impl StripState {
    pub fn new(num_leds: usize, num_sections: usize, params: WaveParams) -> Self {
        Self {
            is_on: false,
            brightness: DEFAULT_BRIGHTNESS,
            effect: EffectPattern::default(),
            color_flow_speed: params.color_flow_speed,
            blackout_pending: false,
            engine: ColorEffectEngine::new(num_leds, num_sections),
            wave: WaveModulator::new(num_leds, params.amplitude as u8, params.speed as i8),
        }
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn effect(&self) -> EffectPattern {
        self.effect
    }

    pub fn color_flow_speed(&self) -> i32 {
        self.color_flow_speed
    }

    pub fn engine(&self) -> &ColorEffectEngine {
        &self.engine
    }

    pub fn wave(&self) -> &WaveModulator {
        &self.wave
    }

    pub fn turn_on(&mut self, brightness: Option<u8>, effect: Option<EffectPattern>) {
        if let Some(brightness) = brightness {
            self.brightness = brightness;
        }
        if let Some(effect) = effect {
            self.effect = effect;
        }
        self.is_on = true;
        self.blackout_pending = false;
    }

    /// Switch off and queue a single all-black frame.
    pub fn turn_off(&mut self) {
        self.is_on = false;
        self.blackout_pending = true;
    }

    pub fn set_section_color(&mut self, section: usize, color: Rgb) {
        self.engine.set_section_color(section, color);
    }

    /// Produce what the current tick should send, advancing the wave.
    /// Returns `None` for an idle tick.
    pub fn next_frame(&mut self) -> Option<OutgoingFrame> {
        if let Some(blackout) = self.take_blackout() {
            return Some(blackout);
        }
        if !self.is_on {
            return None;
        }

        let colors = self.engine.generate_frame(self.effect);
        let colors = self.wave.modulate(&colors, self.brightness);
        self.wave.advance();

        Some(OutgoingFrame {
            colors,
            gradient_mode: self.effect.gradient_mode(),
        })
    }

    /// The pending all-black frame, if the strip was switched off since the
    /// last tick.
    pub fn take_blackout(&mut self) -> Option<OutgoingFrame> {
        if !std::mem::take(&mut self.blackout_pending) {
            return None;
        }
        Some(OutgoingFrame {
            colors: vec![Rgb::BLACK; self.engine.num_sections()],
            gradient_mode: true,
        })
    }
}

/// Strip state shared between the animation task and the control surfaces.
#[derive(Debug)]
pub struct SharedStrip {
    pub state: Mutex<StripState>,
}

impl SharedStrip {
    pub fn new(state: StripState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl WaveListener for SharedStrip {
    fn wave_changed(&self, parameter: WaveParameter, value: i32) {
        let mut state = self.state.lock();
        match parameter {
            WaveParameter::Amplitude => state.wave.set_amplitude(value as u8),
            WaveParameter::Speed => state.wave.set_speed(value as i8),
            WaveParameter::ColorFlowSpeed => state.color_flow_speed = value,
        }
    }
}
