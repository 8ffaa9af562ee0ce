//! Planetary analysis: surface conditions and scan nodes.
//!
//! Everything is derived from the body's stored seed, so re-entering a
//! world always finds the same hazards, deposits and lifeforms (minus
//! whatever was already scavenged, which the caller tracks).

use engine_core::{IVec2, RandomContext};

use crate::body::{BodyDesc, WorldClass};
use crate::consts::{EARTH_RADIUS, MAP_HEIGHT, MAP_WIDTH};
use crate::lifeforms::CREATURES;
use crate::worlds::{ColorClass, SizeClass, WorldType};

/// Number of mineral element categories.
pub const NUM_ELEMENT_CATEGORIES: usize = 8;

/// Mineral element families, cheapest to most valuable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementCategory {
    Common,
    Corrosive,
    BaseMetal,
    Noble,
    RareEarth,
    Precious,
    Radioactive,
    Exotic,
}

impl ElementCategory {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Self {
        use ElementCategory::*;
        [Common, Corrosive, BaseMetal, Noble, RareEarth, Precious, Radioactive, Exotic]
            [i % NUM_ELEMENT_CATEGORIES]
    }
}

/// A mineral deposit on the scan map.
#[derive(Debug, Clone, Copy)]
pub struct MineralDeposit {
    pub loc: IVec2,
    pub element: ElementCategory,
    /// Units of cargo in the deposit.
    pub amount: u16,
}

/// A lifeform spawn point.
#[derive(Debug, Clone, Copy)]
pub struct LifeNode {
    pub loc: IVec2,
    /// Index into the species roster.
    pub species: usize,
}

/// An energy signature (plot hooks, ruins, devices).
#[derive(Debug, Clone, Copy)]
pub struct EnergyNode {
    pub loc: IVec2,
}

/// Everything the orbital view and the lander need to know about a
/// world's surface.
#[derive(Debug, Clone)]
pub struct PlanetInfo {
    pub world: WorldClass,
    /// Mean surface temperature, degrees C.
    pub temperature: i32,
    /// Tectonics hazard rating 0..7.
    pub tectonics: u8,
    /// Atmospheric hazard rating 0..7.
    pub weather: u8,
    /// Surface gravity in hundredths of a g.
    pub gravity: i32,
    pub minerals: Vec<MineralDeposit>,
    pub lifeforms: Vec<LifeNode>,
    pub energy: Vec<EnergyNode>,
}

/// Map a temperature to a 0..7 hazard rating. Thermal hazards are not
/// shown to the player as a number, but the chance tables index by it.
pub fn thermal_hazard_rating(temp: i32) -> u8 {
    const BREAKPOINTS: [i32; 7] = [50, 100, 150, 250, 350, 550, 800];
    for (i, bp) in BREAKPOINTS.iter().enumerate() {
        if temp < *bp {
            return i as u8;
        }
    }
    BREAKPOINTS.len() as u8
}

fn surface_temperature(world: WorldType, orbit_radius: i32, rng: &mut RandomContext) -> i32 {
    if world.is_gas_giant() {
        return -150 - rng.next_bounded(60) as i32;
    }
    // Inverse-power falloff, ~20C at one AU, floored in deep space.
    let ratio = EARTH_RADIUS as f64 / orbit_radius.max(1) as f64;
    let base = 50.0 * ratio.powf(1.25) - 30.0;
    let jitter = rng.next_bounded(21) as i32 - 10;
    (base as i32 + jitter).max(-225)
}

fn random_map_point(rng: &mut RandomContext) -> IVec2 {
    IVec2::new(
        rng.next_bounded(MAP_WIDTH as u32) as i32,
        rng.next_bounded(MAP_HEIGHT as u32) as i32,
    )
}

fn element_for_world(world: WorldType, rng: &mut RandomContext) -> ElementCategory {
    use ElementCategory::*;
    // Each color family leans toward two element families, with a
    // one-in-four wildcard roll.
    let (a, b) = match world.color_class() {
        ColorClass::Gray => (Common, BaseMetal),
        ColorClass::Red => (BaseMetal, Precious),
        ColorClass::Orange => (Common, Corrosive),
        ColorClass::Yellow => (Corrosive, BaseMetal),
        ColorClass::Green => (Common, Noble),
        ColorClass::Cyan => (BaseMetal, RareEarth),
        ColorClass::Blue => (RareEarth, Precious),
        ColorClass::Violet => (Radioactive, Exotic),
        ColorClass::White => (Noble, Exotic),
    };
    if rng.percent(25) {
        ElementCategory::from_index(rng.next_bounded(NUM_ELEMENT_CATEGORIES as u32) as usize)
    } else if rng.percent(50) {
        a
    } else {
        b
    }
}

/// Generate the mineral deposits for a world.
pub fn generate_minerals(world: WorldType, rng: &mut RandomContext) -> Vec<MineralDeposit> {
    if world.is_gas_giant() {
        return Vec::new();
    }
    let max = match world.size_class() {
        SizeClass::Small => 6,
        SizeClass::Medium => 9,
        SizeClass::Large => 12,
    };
    let count = rng.next_bounded(max) + 2;
    (0..count)
        .map(|_| {
            // Gross size grade picks the deposit image; fine size is the
            // actual quantity.
            let grade = rng.next_bounded(3);
            let base = [4u16, 11, 23][grade as usize];
            MineralDeposit {
                loc: random_map_point(rng),
                element: element_for_world(world, rng),
                amount: base + rng.next_bounded(base as u32) as u16,
            }
        })
        .collect()
}

/// Generate lifeform spawn points. Only atmosphere-bearing worlds in a
/// survivable temperature band grow anything.
pub fn generate_life(world: WorldType, temperature: i32, rng: &mut RandomContext) -> Vec<LifeNode> {
    if !world.has_atmosphere() || !(-60..=150).contains(&temperature) {
        return Vec::new();
    }
    let count = rng.next_bounded(6) + 1;
    (0..count)
        .map(|_| LifeNode {
            loc: random_map_point(rng),
            species: rng.next_bounded(CREATURES.len() as u32) as usize,
        })
        .collect()
}

/// Full analysis of a body. `orbit_radius` is the distance to the sun in
/// universe units (for moons, the parent planet's).
pub fn planetary_analysis(body: &BodyDesc, orbit_radius: i32) -> PlanetInfo {
    let mut rng = RandomContext::new(body.rand_seed);

    let Some(world) = body.world.world_type() else {
        // Starbases and wrecks: nothing to scan, nothing to land on.
        return PlanetInfo {
            world: body.world,
            temperature: -100,
            tectonics: 0,
            weather: 0,
            gravity: 0,
            minerals: Vec::new(),
            lifeforms: Vec::new(),
            energy: Vec::new(),
        };
    };

    let temperature = surface_temperature(world, orbit_radius, &mut rng);
    let thermal = thermal_hazard_rating(temperature) as u32;

    // Hot worlds shake more; atmospheres storm more.
    let tectonics = (rng.next_bounded(4) + thermal / 2).min(7) as u8;
    let weather = if world.has_atmosphere() {
        rng.next_bounded(8) as u8
    } else {
        0
    };
    let gravity = match world.size_class() {
        SizeClass::Small => 20 + rng.next_bounded(40) as i32,
        SizeClass::Medium => 50 + rng.next_bounded(60) as i32,
        SizeClass::Large => 90 + rng.next_bounded(120) as i32,
    };

    let minerals = generate_minerals(world, &mut rng);
    let lifeforms = generate_life(world, temperature, &mut rng);

    PlanetInfo {
        world: body.world,
        temperature,
        tectonics,
        weather,
        gravity,
        minerals,
        lifeforms,
        energy: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worlds::WorldType;

    #[test]
    fn thermal_rating_breakpoints() {
        assert_eq!(thermal_hazard_rating(-200), 0);
        assert_eq!(thermal_hazard_rating(49), 0);
        assert_eq!(thermal_hazard_rating(50), 1);
        assert_eq!(thermal_hazard_rating(799), 6);
        assert_eq!(thermal_hazard_rating(2000), 7);
    }

    #[test]
    fn analysis_is_seed_stable() {
        let mut body = BodyDesc::new(WorldClass::Normal(WorldType::Water), 0x1234);
        body.radius = EARTH_RADIUS;
        let a = planetary_analysis(&body, body.radius);
        let b = planetary_analysis(&body, body.radius);
        assert_eq!(a.temperature, b.temperature);
        assert_eq!(a.minerals.len(), b.minerals.len());
        for (x, y) in a.minerals.iter().zip(&b.minerals) {
            assert_eq!(x.loc, y.loc);
            assert_eq!(x.amount, y.amount);
        }
    }

    #[test]
    fn gas_giants_have_no_surface_nodes() {
        let mut body = BodyDesc::new(WorldClass::Normal(WorldType::RedGasGiant), 7);
        body.radius = EARTH_RADIUS * 20;
        let info = planetary_analysis(&body, body.radius);
        assert!(info.minerals.is_empty());
        assert!(info.lifeforms.is_empty());
    }

    #[test]
    fn airless_worlds_grow_nothing() {
        let mut body = BodyDesc::new(WorldClass::Normal(WorldType::Metal), 99);
        body.radius = EARTH_RADIUS;
        let info = planetary_analysis(&body, body.radius);
        assert!(info.lifeforms.is_empty());
    }
}
