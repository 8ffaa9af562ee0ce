//! Orbital body descriptors: the per-planet / per-moon record the sim
//! validates every frame.

use engine_core::{FACING_SHIFT, IVec2};

use crate::texture::SphereTexture;
use crate::worlds::WorldType;

/// What a body actually is. Special worlds (starbases, the Sa-Matra
/// wreck) render from the space-junk sheet and have no generated
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldClass {
    Normal(WorldType),
    /// A world under a slave shield; surface access is plot-gated.
    Shielded(WorldType),
    PrecursorStarbase,
    DestroyedStarbase,
    SaMatra,
    HierarchyStarbase,
}

impl WorldClass {
    pub fn world_type(self) -> Option<WorldType> {
        match self {
            WorldClass::Normal(w) | WorldClass::Shielded(w) => Some(w),
            _ => None,
        }
    }

    pub fn is_special(self) -> bool {
        self.world_type().is_none()
    }
}

/// Memoized discrete frame selector: sprite size bucket plus 16-way
/// lighting facing. Regenerating a body's sprite/texture rotation is
/// only allowed when this value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBucket {
    pub size: u8,
    pub facing: u8,
}

impl FrameBucket {
    /// Index into the orbital sprite sheet.
    pub fn frame_index(self) -> usize {
        ((self.size as usize) << FACING_SHIFT) | self.facing as usize
    }

    /// Sprite diameter in pixels for this size bucket (matches the
    /// pre-rendered planet sprites).
    pub fn diameter(self) -> i32 {
        match self.size {
            0 => 3,
            1 => 4,
            2 => 7,
            3 => 11,
            4 => 15,
            _ => 29,
        }
    }
}

/// Which sheet/frame a body currently renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFrame {
    /// Pre-lit orbital sprite (or textured sphere scaled to the same
    /// diameter) chosen by bucket.
    Orbital(FrameBucket),
    /// Fixed space-junk frame for special worlds.
    Junk(JunkFrame),
}

/// Frames in the space-junk sheet used by special worlds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunkFrame {
    HierarchyStarbase,
    SaMatra,
    DestroyedStarbase,
    PrecursorStarbase,
}

/// Screen-space image state of a body: where it is and what it shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyImage {
    pub origin: IVec2,
    pub frame: Option<BodyFrame>,
}

/// A planet or moon descriptor. Planets live for the whole system visit;
/// moons are regenerated (from the parent planet's stored seed) each
/// time the inner system is entered.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    /// Seed for everything below this body (moons, analysis, nodes,
    /// texture). Set once at generation time.
    pub rand_seed: u32,
    pub world: WorldClass,
    /// Moon count; always 0 for moons themselves.
    pub num_moons: u8,
    /// Orbital radius: universe units for planets, inner-view display
    /// units for moons.
    pub radius: i32,
    /// Orbit phase at epoch, in angle units.
    pub angle: i32,
    /// Offset from the parent, recomputed from the orbit when orbiting
    /// is enabled, otherwise static.
    pub location: IVec2,
    /// Orbital speed in angle units per game day (negative =
    /// retrograde).
    pub orb_speed: f64,
    /// Texture columns per game day of axial rotation.
    pub rot_speed: f64,
    /// Index into the orbit-path color table.
    pub temp_color: u8,
    pub image: BodyImage,
    /// Frame memo; `None` means dirty (next validate recomputes).
    pub frame_bucket: Option<FrameBucket>,
    /// Generated sphere texture, present only under textured rendering.
    pub surface: Option<SphereTexture>,
    /// Cached texture rotation column; re-render only when it moves.
    pub rot_column: i32,
}

impl BodyDesc {
    pub fn new(world: WorldClass, rand_seed: u32) -> Self {
        Self {
            rand_seed,
            world,
            num_moons: 0,
            radius: 0,
            angle: 0,
            location: IVec2::ZERO,
            orb_speed: 0.0,
            rot_speed: 0.0,
            temp_color: 0,
            image: BodyImage::default(),
            frame_bucket: None,
            surface: None,
            rot_column: 0,
        }
    }

    /// Force the next `validate_orbit` to recompute the frame.
    pub fn mark_frame_dirty(&mut self) {
        self.frame_bucket = None;
    }

    /// Drop the generated texture (inner-system teardown).
    pub fn release_surface(&mut self) {
        self.surface = None;
        self.rot_column = 0;
    }
}
