//! Generated sphere textures and topography.
//!
//! Each textured body gets a cylinder-sampled fbm elevation map
//! (seamless horizontal wrap) plus a palette shade per texel. The map is
//! expensive to build, so it is generated once per body and cached until
//! the owning view is torn down; per-frame rotation just picks a start
//! column.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::consts::{MAP_HEIGHT, MAP_WIDTH};
use crate::worlds::{ColorClass, SizeClass, WorldType};

/// Rendered diameter of a textured planet in the system views.
pub const PLANET_DIAMETER: i32 = 116;
/// Rendered diameter of a small textured moon.
pub const MOON_DIAMETER: i32 = 28;
/// Rendered diameter of a medium (large-moon) textured body.
pub const LARGE_MOON_DIAMETER: i32 = 44;

/// Texture width for a given rendered diameter, matching the scan map's
/// aspect so planetside and orbital maps line up.
pub const fn generate_perimeter(diameter: i32) -> i32 {
    diameter * MAP_WIDTH / MAP_HEIGHT
}

/// Diameter used for a moon-sized body of the given size class.
pub fn moon_diameter(size: SizeClass) -> i32 {
    if size == SizeClass::Small {
        MOON_DIAMETER
    } else {
        LARGE_MOON_DIAMETER
    }
}

/// A generated rotatable sphere texture: signed elevation plus shaded
/// color per texel, `width` columns around the equator.
#[derive(Debug, Clone)]
pub struct SphereTexture {
    pub width: i32,
    pub height: i32,
    /// Elevation levels; signed for everything but gas giants.
    pub topo: Vec<i8>,
    pub colors: Vec<[u8; 3]>,
}

fn base_color(class: ColorClass) -> [f64; 3] {
    match class {
        ColorClass::Gray => [0.55, 0.55, 0.58],
        ColorClass::Red => [0.75, 0.28, 0.18],
        ColorClass::Orange => [0.82, 0.52, 0.20],
        ColorClass::Yellow => [0.80, 0.72, 0.30],
        ColorClass::Green => [0.30, 0.62, 0.32],
        ColorClass::Cyan => [0.25, 0.65, 0.65],
        ColorClass::Blue => [0.22, 0.38, 0.78],
        ColorClass::Violet => [0.55, 0.30, 0.70],
        ColorClass::White => [0.82, 0.82, 0.85],
    }
}

impl SphereTexture {
    /// Build the texture for a world. Deterministic in `seed`.
    pub fn generate(seed: u32, world: WorldType, diameter: i32) -> Self {
        let width = generate_perimeter(diameter);
        let height = diameter;
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(4)
            .set_frequency(1.0)
            .set_persistence(0.55);

        let banded = world.is_gas_giant();
        let rgb = base_color(world.color_class());

        let mut topo = Vec::with_capacity((width * height) as usize);
        let mut colors = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            let v = y as f64 / height as f64;
            for x in 0..width {
                // Sample on a cylinder so column 0 meets column width-1.
                let theta = x as f64 / width as f64 * std::f64::consts::TAU;
                let elev = if banded {
                    // Latitude bands warped by a little noise.
                    let warp = fbm.get([theta.cos(), theta.sin(), v * 2.0]) * 0.15;
                    ((v * 9.0 + warp) * std::f64::consts::PI).sin()
                } else {
                    fbm.get([theta.cos() * 1.5, theta.sin() * 1.5, v * 3.0])
                };
                let level = (elev.clamp(-1.0, 1.0) * 127.0) as i8;
                topo.push(level);

                let shade = 0.75 + elev * 0.25;
                colors.push([
                    (rgb[0] * shade * 255.0).clamp(0.0, 255.0) as u8,
                    (rgb[1] * shade * 255.0).clamp(0.0, 255.0) as u8,
                    (rgb[2] * shade * 255.0).clamp(0.0, 255.0) as u8,
                ]);
            }
        }

        Self {
            width,
            height,
            topo,
            colors,
        }
    }

    /// Start column for the sphere render after `days` of rotation at
    /// `rot_speed` columns per day.
    pub fn rotation_column(&self, rot_speed: f64, days: f64) -> i32 {
        let col = (rot_speed * days) % self.width as f64;
        let col = col as i32;
        if col < 0 {
            col + self.width
        } else {
            col
        }
    }

    pub fn elevation(&self, x: i32, y: i32) -> i8 {
        let x = x.rem_euclid(self.width);
        let y = y.clamp(0, self.height - 1);
        self.topo[(y * self.width + x) as usize]
    }
}
