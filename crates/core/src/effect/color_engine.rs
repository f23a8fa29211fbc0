use super::effect::EffectPattern;
use crate::color::Rgb;

/// Per-section colours of one strip, expanded into full LED frames.
#[derive(Debug, Clone)]
pub struct ColorEffectEngine {
    num_leds: usize,
    section_colors: Vec<Rgb>,
}

impl ColorEffectEngine {
    /// All sections start black. `num_sections` must be at least one;
    /// configuration validation guarantees 2..=10.
    pub fn new(num_leds: usize, num_sections: usize) -> Self {
        Self {
            num_leds,
            section_colors: vec![Rgb::BLACK; num_sections.max(1)],
        }
    }

    pub fn num_leds(&self) -> usize {
        self.num_leds
    }

    pub fn num_sections(&self) -> usize {
        self.section_colors.len()
    }

    /// Out-of-range sections are ignored.
    pub fn set_section_color(&mut self, section: usize, color: Rgb) {
        match self.section_colors.get_mut(section) {
            Some(slot) => *slot = color,
            None => log::debug!(
                "Ignoring colour for section {} of {}",
                section,
                self.section_colors.len()
            ),
        }
    }

    pub fn section_color(&self, section: usize) -> Option<Rgb> {
        self.section_colors.get(section).copied()
    }

    pub fn section_colors(&self) -> &[Rgb] {
        &self.section_colors
    }

    /// Render exactly `num_leds` colours for `effect`.
    pub fn generate_frame(&self, effect: EffectPattern) -> Vec<Rgb> {
        let colors = match effect {
            EffectPattern::Double => self.double(),
            EffectPattern::Mirror => self.mirror(),
            EffectPattern::Stretched => self.stretched(),
        };
        normalize_length(colors, self.num_leds, self.section_colors[0])
    }

    fn double(&self) -> Vec<Rgb> {
        let leds_per_section = (self.num_leds / 2) / self.num_sections();
        let half = self.blocks(self.section_colors.iter(), leds_per_section);

        let mut colors = half.clone();
        colors.extend(half);
        colors
    }

    fn mirror(&self) -> Vec<Rgb> {
        let leds_per_section = self.num_leds / (2 * self.num_sections());

        let mut colors = self.blocks(self.section_colors.iter(), leds_per_section);
        colors.extend(self.blocks(self.section_colors.iter().rev(), leds_per_section));
        colors
    }

    fn stretched(&self) -> Vec<Rgb> {
        let steps = self.num_leds / self.num_sections();
        let n = self.num_sections();

        let mut colors = Vec::with_capacity(self.num_leds + 1);
        for i in 0..n {
            let start = self.section_colors[i];
            let end = self.section_colors[(i + 1) % n];

            if steps == 0 {
                // Fewer LEDs than sections: one sample per section
                colors.push(start);
                continue;
            }
            // The sample at `steps` is the next segment's start
            colors.extend((0..steps).map(|step| start.lerp_step(&end, step, steps)));
        }
        colors.push(self.section_colors[n - 1]);
        colors
    }

    fn blocks<'a>(&self, sections: impl Iterator<Item = &'a Rgb>, width: usize) -> Vec<Rgb> {
        sections
            .flat_map(|color| std::iter::repeat(*color).take(width))
            .collect()
    }
}

/// Truncate or pad `colors` with `fill` to exactly `len` entries.
pub fn normalize_length(mut colors: Vec<Rgb>, len: usize, fill: Rgb) -> Vec<Rgb> {
    colors.resize(len, fill);
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 255, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);
    const YELLOW: Rgb = Rgb::new(255, 255, 0);

    fn engine_with(num_leds: usize, colors: &[Rgb]) -> ColorEffectEngine {
        let mut engine = ColorEffectEngine::new(num_leds, colors.len());
        for (i, color) in colors.iter().enumerate() {
            engine.set_section_color(i, *color);
        }
        engine
    }

    #[test]
    fn test_section_color_bounds() {
        let mut engine = ColorEffectEngine::new(10, 3);
        engine.set_section_color(2, RED);
        engine.set_section_color(3, GREEN);

        assert_eq!(engine.section_color(2), Some(RED));
        assert_eq!(engine.section_color(3), None);
        assert_eq!(engine.section_colors(), &[Rgb::BLACK, Rgb::BLACK, RED]);
    }

    #[test]
    fn test_stretched_reference_frame() {
        let engine = engine_with(10, &[RED, GREEN, BLUE, YELLOW, Rgb::WHITE]);

        assert_eq!(
            engine.generate_frame(EffectPattern::Stretched),
            vec![
                RED,
                Rgb::new(127, 127, 0),
                GREEN,
                Rgb::new(0, 127, 127),
                BLUE,
                Rgb::new(127, 127, 127),
                YELLOW,
                Rgb::new(255, 255, 127),
                Rgb::WHITE,
                Rgb::new(255, 127, 127),
            ]
        );
    }

    #[test]
    fn test_stretched_pads_remainder_with_first_section() {
        let engine = engine_with(7, &[RED, BLUE]);
        let frame = engine.generate_frame(EffectPattern::Stretched);

        // 3 steps per section, then the last section, then padding
        assert_eq!(
            frame,
            vec![
                RED,
                Rgb::new(170, 0, 85),
                Rgb::new(85, 0, 170),
                BLUE,
                Rgb::new(85, 0, 170),
                Rgb::new(170, 0, 85),
                BLUE,
            ]
        );

        let engine = engine_with(9, &[RED, GREEN, BLUE, YELLOW]);
        let frame = engine.generate_frame(EffectPattern::Stretched);
        assert_eq!(frame[8], YELLOW);

        let engine = engine_with(11, &[RED, GREEN, BLUE, YELLOW]);
        let frame = engine.generate_frame(EffectPattern::Stretched);
        assert_eq!(frame[8], YELLOW);
        assert_eq!(frame[9..], [RED, RED]);
    }

    #[test]
    fn test_stretched_starts_with_first_section() {
        let colors = [RED, GREEN, BLUE, YELLOW, Rgb::WHITE, RED, GREEN, BLUE, YELLOW, Rgb::WHITE];
        for sections in 2..=10 {
            for num_leds in 1..=84 {
                let engine = engine_with(num_leds, &colors[..sections]);
                let frame = engine.generate_frame(EffectPattern::Stretched);
                assert_eq!(frame[0], RED, "{} leds, {} sections", num_leds, sections);
            }
        }
    }

    #[test]
    fn test_double_layout() {
        let engine = engine_with(10, &[RED, GREEN]);
        assert_eq!(
            engine.generate_frame(EffectPattern::Double),
            vec![RED, RED, GREEN, GREEN, RED, RED, GREEN, GREEN, RED, RED]
        );
    }

    #[test]
    fn test_mirror_layout() {
        let engine = engine_with(9, &[RED, GREEN]);
        assert_eq!(
            engine.generate_frame(EffectPattern::Mirror),
            vec![RED, RED, GREEN, GREEN, GREEN, GREEN, RED, RED, RED]
        );
    }

    #[test]
    fn test_mirror_is_palindromic() {
        let colors = [RED, GREEN, BLUE, YELLOW, Rgb::WHITE];
        for sections in 2..=5 {
            for num_leds in (2 * sections..=84).step_by(2 * sections) {
                let engine = engine_with(num_leds, &colors[..sections]);
                let frame = engine.generate_frame(EffectPattern::Mirror);
                let reversed: Vec<Rgb> = frame.iter().rev().copied().collect();
                assert_eq!(frame, reversed, "{} leds, {} sections", num_leds, sections);
            }
        }
    }

    #[test]
    fn test_every_effect_fills_exactly() {
        for sections in 2..=10 {
            for num_leds in 1..=84 {
                let engine = ColorEffectEngine::new(num_leds, sections);
                for effect in EffectPattern::all() {
                    assert_eq!(
                        engine.generate_frame(effect).len(),
                        num_leds,
                        "{} with {} leds, {} sections",
                        effect,
                        num_leds,
                        sections
                    );
                }
            }
        }
    }

    #[test]
    fn test_fewer_leds_than_sections() {
        let engine = engine_with(3, &[RED, GREEN, BLUE, YELLOW]);

        assert_eq!(engine.generate_frame(EffectPattern::Stretched), vec![RED, GREEN, BLUE]);
        assert_eq!(engine.generate_frame(EffectPattern::Double), vec![RED; 3]);
        assert_eq!(engine.generate_frame(EffectPattern::Mirror), vec![RED; 3]);
    }

    #[test]
    fn test_normalize_length() {
        assert_eq!(normalize_length(vec![RED; 5], 3, BLUE), vec![RED; 3]);
        assert_eq!(normalize_length(vec![RED], 3, BLUE), vec![RED, BLUE, BLUE]);
        assert!(normalize_length(Vec::new(), 0, BLUE).is_empty());
    }
}
