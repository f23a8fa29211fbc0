use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Spatial mapping from section colours to per-LED colours
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectPattern {
    /// Sections laid out twice, once per half of the strip
    Double,
    /// Sections forward then backward
    Mirror,
    /// Smooth gradient between neighbouring sections
    #[default]
    Stretched,
}

impl EffectPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectPattern::Double => "double",
            EffectPattern::Mirror => "mirror",
            EffectPattern::Stretched => "stretched",
        }
    }

    pub fn all() -> Vec<EffectPattern> {
        vec![
            EffectPattern::Double,
            EffectPattern::Mirror,
            EffectPattern::Stretched,
        ]
    }

    /// The device interpolates between frame colours only for gradients.
    pub fn gradient_mode(&self) -> bool {
        *self == EffectPattern::Stretched
    }
}

impl fmt::Display for EffectPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectPattern::all()
            .into_iter()
            .find(|effect| effect.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown effect {:?}", s))
    }
}
