use std::f64::consts::PI;

use crate::color::Rgb;

pub const DEFAULT_AMPLITUDE: u8 = 50;
pub const DEFAULT_SPEED: i8 = 30;

/// Period used when the wave is frozen (speed 0)
const STATIC_PERIOD: u32 = 100;

/// Period in ticks for a given speed: `round(2π / (speed / 100) + 1)`.
/// Negative speeds run the wave backwards over the same number of ticks.
pub fn period_for_speed(speed: i8) -> u32 {
    if speed == 0 {
        return STATIC_PERIOD;
    }
    let period = (2.0 * PI / (speed as f64 / 100.0) + 1.0).round() as i64;
    (period.unsigned_abs() as u32).max(1)
}

/// Sinusoidal brightness wave travelling along the strip.
#[derive(Debug, Clone)]
pub struct WaveModulator {
    num_leds: usize,
    amplitude: u8,
    speed: i8,
    step: u32,
    period: u32,
}

impl WaveModulator {
    pub fn new(num_leds: usize, amplitude: u8, speed: i8) -> Self {
        Self {
            num_leds,
            amplitude,
            speed,
            step: 0,
            period: period_for_speed(speed),
        }
    }

    pub fn amplitude(&self) -> u8 {
        self.amplitude
    }

    pub fn speed(&self) -> i8 {
        self.speed
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn set_amplitude(&mut self, amplitude: u8) {
        self.amplitude = amplitude;
    }

    pub fn set_speed(&mut self, speed: i8) {
        self.speed = speed;
        self.period = period_for_speed(speed);
        self.step %= self.period;
    }

    /// Brightness of LED `led_index` given the strip's base brightness.
    pub fn brightness(&self, led_index: usize, base: u8) -> u8 {
        if self.amplitude == 0 {
            return base;
        }

        let phase = if self.num_leds > 1 {
            2.0 * PI * led_index as f64 / (self.num_leds - 1) as f64
        } else {
            0.0
        };
        let offset = self.amplitude as f64
            * (phase + self.step as f64 * (self.speed as f64 / 100.0)).sin();

        (base as f64 + offset).clamp(0.0, 255.0) as u8
    }

    /// Scale each colour by its LED's wave brightness.
    pub fn modulate(&self, colors: &[Rgb], base: u8) -> Vec<Rgb> {
        colors
            .iter()
            .enumerate()
            .map(|(i, color)| color.scaled(self.brightness(i, base)))
            .collect()
    }

    /// Move the wave one tick forward.
    pub fn advance(&mut self) {
        self.step = (self.step + 1) % self.period;
    }
}
