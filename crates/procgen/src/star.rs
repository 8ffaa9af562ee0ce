//! Star descriptors: position, spectral color, size class, plot binding.

use engine_core::{seed_for_point, IVec2};

use crate::consts::{scale_radius, EARTH_RADIUS};

/// Spectral color of a star. Drives world-type distributions and the
/// sun sprite tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarColor {
    Blue,
    Green,
    Orange,
    Red,
    White,
    Yellow,
}

/// Size class of a star. Drives minimum orbit distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarSize {
    Dwarf,
    Giant,
    SuperGiant,
}

impl StarSize {
    /// Minimum orbital radius for rocky worlds around this star.
    pub fn min_rocky_dist(self) -> i32 {
        match self {
            StarSize::Dwarf => scale_radius(4),
            StarSize::Giant => EARTH_RADIUS,
            StarSize::SuperGiant => scale_radius(16),
        }
    }

    /// Minimum orbital radius for gas giants around this star.
    pub fn min_gas_giant_dist(self) -> i32 {
        match self {
            StarSize::Dwarf => scale_radius(24),
            StarSize::Giant => scale_radius(32),
            StarSize::SuperGiant => scale_radius(44),
        }
    }
}

/// Plot binding for stars with authored content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotId {
    /// The home system: fixed planet roster, starbase over the third
    /// planet.
    Sol,
    /// A system hiding a precursor starbase around one of its worlds.
    PrecursorVault,
}

/// A star on the universe map.
#[derive(Debug, Clone, Copy)]
pub struct StarDesc {
    /// Universe map coordinates; also the seed source.
    pub point: IVec2,
    pub color: StarColor,
    pub size: StarSize,
    pub plot: Option<PlotId>,
}

impl StarDesc {
    pub fn new(point: IVec2, color: StarColor, size: StarSize) -> Self {
        Self {
            point,
            color,
            size,
            plot: None,
        }
    }

    pub fn with_plot(mut self, plot: PlotId) -> Self {
        self.plot = Some(plot);
        self
    }

    /// Generation seed for this star, optionally offset by a
    /// custom-universe seed.
    pub fn seed(&self, custom_offset: u32) -> u32 {
        seed_for_point(self.point).wrapping_add(custom_offset)
    }
}
