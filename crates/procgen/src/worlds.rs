//! World types and the per-star-color distribution tables that decide
//! which worlds a star can spawn.

use crate::star::StarColor;

/// Sprite/terrain size class of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// Base sprite size bucket before view adjustments.
    pub fn base_bucket(self) -> u8 {
        match self {
            SizeClass::Small => 0,
            SizeClass::Medium => 1,
            SizeClass::Large => 2,
        }
    }
}

/// Broad color family, used for orbit-path tinting, sprite palettes and
/// generated texture bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorClass {
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Violet,
    White,
}

/// Every world type the generator can place. Rainbow and Shattered
/// worlds never come out of the random tables; only plot generators
/// place them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldType {
    // Small rocky worlds
    Oolite,
    Yttric,
    Lanthanide,
    Treasure,
    Urea,
    Metal,
    Radioactive,
    Cyanic,
    Acid,
    // Medium rocky worlds
    Alkali,
    Halide,
    Green,
    Copper,
    Carbide,
    Ultramarine,
    Noble,
    Azure,
    // Large rocky worlds
    Water,
    Telluric,
    Organic,
    Redux,
    Primordial,
    Chlorine,
    Magnetic,
    Sapphire,
    // Gas giants
    BlueGasGiant,
    CyanGasGiant,
    GreenGasGiant,
    GrayGasGiant,
    OrangeGasGiant,
    PurpleGasGiant,
    RedGasGiant,
    VioletGasGiant,
    YellowGasGiant,
    // Plot-only worlds
    Rainbow,
    Shattered,
}

/// Spawn weight out of 255, the classic five-step ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chance {
    Never = 0,
    Rare = 15,
    Few = 63,
    Common = 127,
    Always = 255,
}

use Chance::*;
use WorldType::*;

/// Worlds eligible for random generation, indexable by a byte roll.
pub const RANDOM_WORLDS: [WorldType; 33] = [
    Oolite,
    Yttric,
    Lanthanide,
    Treasure,
    Urea,
    Metal,
    Radioactive,
    Cyanic,
    Acid,
    Alkali,
    Halide,
    Green,
    Copper,
    Carbide,
    Ultramarine,
    Noble,
    Azure,
    Water,
    Telluric,
    Organic,
    Redux,
    Primordial,
    Chlorine,
    Magnetic,
    Sapphire,
    BlueGasGiant,
    CyanGasGiant,
    GreenGasGiant,
    GrayGasGiant,
    OrangeGasGiant,
    PurpleGasGiant,
    RedGasGiant,
    VioletGasGiant,
];

/// Random worlds small enough to orbit a planet as a moon.
pub const MOON_WORLDS: [WorldType; 17] = [
    Oolite, Yttric, Lanthanide, Treasure, Urea, Metal, Radioactive, Cyanic, Acid, Alkali, Halide,
    Green, Copper, Carbide, Ultramarine, Noble, Azure,
];

impl WorldType {
    pub fn size_class(self) -> SizeClass {
        match self {
            Oolite | Yttric | Lanthanide | Treasure | Urea | Metal | Radioactive | Cyanic
            | Acid => SizeClass::Small,
            Alkali | Halide | Green | Copper | Carbide | Ultramarine | Noble | Azure => {
                SizeClass::Medium
            }
            _ => SizeClass::Large,
        }
    }

    pub fn is_gas_giant(self) -> bool {
        matches!(
            self,
            BlueGasGiant
                | CyanGasGiant
                | GreenGasGiant
                | GrayGasGiant
                | OrangeGasGiant
                | PurpleGasGiant
                | RedGasGiant
                | VioletGasGiant
                | YellowGasGiant
        )
    }

    pub fn color_class(self) -> ColorClass {
        match self {
            Oolite | Metal | Magnetic | GrayGasGiant => ColorClass::Gray,
            Treasure | Redux | RedGasGiant => ColorClass::Red,
            Copper | Telluric | OrangeGasGiant => ColorClass::Orange,
            Urea | Yttric | YellowGasGiant => ColorClass::Yellow,
            Green | Organic | Primordial | Chlorine | GreenGasGiant => ColorClass::Green,
            Cyanic | Carbide | CyanGasGiant => ColorClass::Cyan,
            Water | Azure | Ultramarine | Sapphire | BlueGasGiant => ColorClass::Blue,
            Radioactive | Lanthanide | PurpleGasGiant | VioletGasGiant | Shattered => {
                ColorClass::Violet
            }
            Acid | Alkali | Halide | Noble | Rainbow => ColorClass::White,
        }
    }

    /// Can this world carry an atmosphere (and therefore weather and
    /// surface life)?
    pub fn has_atmosphere(self) -> bool {
        matches!(
            self,
            Water | Telluric | Organic | Redux | Primordial | Chlorine | Acid | Green | Azure
        )
    }

    /// Spawn weight of this world around a star of the given color.
    pub fn distribution(self, star_color: StarColor) -> Chance {
        if matches!(self, Rainbow | Shattered) {
            return Never; // plot generators place these by hand
        }
        if self.is_gas_giant() {
            return Always;
        }
        match star_color {
            StarColor::Blue => match self {
                Treasure | Redux | Copper | Telluric => Never,
                Organic | Primordial => Rare,
                _ => Always,
            },
            StarColor::Green => match self {
                Oolite | Yttric => Never,
                Water | Azure => Few,
                _ => Always,
            },
            StarColor::Orange => match self {
                Sapphire | Ultramarine => Rare,
                Water => Few,
                Organic | Primordial => Common,
                _ => Always,
            },
            StarColor::Red => match self {
                Water | Azure | Sapphire => Never,
                Organic => Rare,
                Chlorine | Green => Few,
                _ => Always,
            },
            StarColor::White => match self {
                Organic | Primordial => Never,
                Treasure => Few,
                _ => Always,
            },
            StarColor::Yellow => match self {
                Radioactive => Few,
                _ => Always,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_giants_always_spawn() {
        for color in [
            StarColor::Blue,
            StarColor::Green,
            StarColor::Orange,
            StarColor::Red,
            StarColor::White,
            StarColor::Yellow,
        ] {
            assert_eq!(BlueGasGiant.distribution(color), Always);
        }
    }

    #[test]
    fn moon_worlds_are_all_small_or_medium() {
        for world in MOON_WORLDS {
            assert!(world.size_class() <= SizeClass::Medium);
            assert!(!world.is_gas_giant());
        }
    }

    #[test]
    fn red_stars_never_spawn_water_worlds() {
        assert_eq!(Water.distribution(StarColor::Red), Never);
    }
}
