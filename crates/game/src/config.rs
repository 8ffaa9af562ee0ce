//! Session options, loadable from RON.

use serde::{Deserialize, Serialize};

/// Lander hold size variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HoldVariant {
    /// 64-unit hold.
    #[default]
    Classic,
    /// 50-unit hold.
    Compact,
}

impl HoldVariant {
    pub fn capacity(self) -> u16 {
        match self {
            HoldVariant::Classic => 64,
            HoldVariant::Compact => 50,
        }
    }
}

/// Feature switches for an exploration session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Bodies move along their orbits over game time. When off, body
    /// locations stay wherever generation put them.
    pub orbiting_planets: bool,
    /// Generate rotatable sphere textures for bodies instead of the
    /// pre-lit sprite sheet.
    pub textured_planets: bool,
    /// Mineral deposits too big for the hold leave a reduced deposit on
    /// the surface instead of vanishing.
    pub partial_pickup: bool,
    /// Extra seed folded into every star's seed; changes the whole
    /// universe deterministically.
    pub custom_seed: u32,
    pub lander_hold: HoldVariant,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            orbiting_planets: true,
            textured_planets: true,
            partial_pickup: true,
            custom_seed: 0,
            lander_hold: HoldVariant::default(),
        }
    }
}

impl Options {
    /// Parse options from RON text.
    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_round_trip_through_ron() {
        let opts = Options {
            orbiting_planets: false,
            custom_seed: 99,
            ..Options::default()
        };
        let text = ron::to_string(&opts).unwrap();
        let back = Options::from_ron(&text).unwrap();
        assert!(!back.orbiting_planets);
        assert_eq!(back.custom_seed, 99);
    }

    #[test]
    fn partial_ron_uses_defaults() {
        let opts = Options::from_ron("(textured_planets: false)").unwrap();
        assert!(!opts.textured_planets);
        assert!(opts.orbiting_planets);
    }
}
