use serde::{Deserialize, Serialize};

// Color representation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parses `rrggbb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Rgb { r, g, b })
    }

    /// Sample `step` of `steps` on the straight line towards `target`.
    /// Each channel is `start + (end - start) * step / steps`, truncated.
    pub fn lerp_step(&self, target: &Rgb, step: usize, steps: usize) -> Self {
        if steps == 0 {
            return *self;
        }
        Rgb {
            r: Self::lerp_component(self.r, target.r, step, steps),
            g: Self::lerp_component(self.g, target.g, step, steps),
            b: Self::lerp_component(self.b, target.b, step, steps),
        }
    }

    fn lerp_component(start: u8, end: u8, step: usize, steps: usize) -> u8 {
        let delta = end as f64 - start as f64;
        (start as f64 + delta * step as f64 / steps as f64).clamp(0.0, 255.0) as u8
    }

    /// Scale every channel by `level / 255`, truncating.
    pub fn scaled(&self, level: u8) -> Self {
        let scale = |c: u8| (c as u16 * level as u16 / 255) as u8;
        Rgb {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb { r, g, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("#00ff7f"), Some(Rgb::new(0, 255, 127)));
        assert_eq!(Rgb::from_hex("fff"), None);
        assert_eq!(Rgb::from_hex("gg0000"), None);
    }

    #[test]
    fn test_lerp_step_truncates() {
        let red = Rgb::new(255, 0, 0);
        let green = Rgb::new(0, 255, 0);

        assert_eq!(red.lerp_step(&green, 0, 2), red);
        assert_eq!(red.lerp_step(&green, 1, 2), Rgb::new(127, 127, 0));
        assert_eq!(red.lerp_step(&green, 2, 2), green);
        assert_eq!(red.lerp_step(&green, 0, 0), red);
    }

    #[test]
    fn test_lerp_never_overshoots() {
        let start = Rgb::new(10, 200, 90);
        let end = Rgb::new(250, 3, 90);
        for step in 0..=7 {
            let c = start.lerp_step(&end, step, 7);
            assert!(c.r >= 10 && c.r <= 250);
            assert!(c.g >= 3 && c.g <= 200);
            assert_eq!(c.b, 90);
        }
    }

    #[test]
    fn test_scaled() {
        let c = Rgb::new(255, 128, 1);
        assert_eq!(c.scaled(255), c);
        assert_eq!(c.scaled(0), Rgb::BLACK);
        assert_eq!(c.scaled(128), Rgb::new(128, 64, 0));
    }
}
