//! Orbit filling: world-type rolls, radius placement, initial phase,
//! per-body seeds, and orbital/rotation speeds.

use engine_core::{cosine, normalize_angle, seed_for_point, sine, RandomContext};
use glam::IVec2;

use crate::body::{BodyDesc, WorldClass};
use crate::consts::*;
use crate::star::StarDesc;
use crate::worlds::{WorldType, MOON_WORLDS, RANDOM_WORLDS};

/// Number of orbit-path tint colors, coldest to hottest.
pub const NUM_TEMP_RANGES: u8 = 5;

/// Map an orbital radius to its orbit-path tint index.
pub fn temp_color_for_radius(radius: i32) -> u8 {
    if radius < EARTH_RADIUS / 2 {
        4
    } else if radius < EARTH_RADIUS * 2 {
        3
    } else if radius < EARTH_RADIUS * 6 {
        2
    } else if radius < EARTH_RADIUS * 16 {
        1
    } else {
        0
    }
}

/// Derive orbital and rotation speed for a freshly placed body.
///
/// Planets follow a `r^1.5` period law normalized to one year at
/// `EARTH_RADIUS`; moons use an empiric formula tuned against the home
/// system, doubled around gas giants, occasionally retrograde.
pub fn compute_speed(body: &mut BodyDesc, generating_moons: bool, parent_is_giant: bool, rand_val: u32) {
    let full_circle = engine_core::FULL_CIRCLE as f64;
    if generating_moons {
        let outermost = (MIN_MOON_RADIUS + (MAX_GEN_MOONS as i32 - 1) * MOON_DELTA) as f64;
        let ratio = body.radius as f64 / outermost;
        let mut speed = full_circle / (29.0 * ratio.powf(1.5));
        if parent_is_giant {
            speed *= 2.0;
        }
        if rand_val % 7 == 0 {
            speed = -speed;
        }
        body.orb_speed = speed;
    } else {
        let ratio = body.radius as f64 / EARTH_RADIUS as f64;
        body.orb_speed = full_circle / (ONE_YEAR * ratio.powf(1.5));
    }

    // Axial rotation: a few texture columns per day, sometimes
    // retrograde.
    let spin = 4.0 + (rand_val >> 8) as f64 % 24.0;
    body.rot_speed = if rand_val % 8 == 0 { -spin } else { spin };
}

fn pick_world(rng: &mut RandomContext, star: &StarDesc, table: &[WorldType]) -> WorldType {
    loop {
        let rand_val = rng.next();
        let world = table[((rand_val >> 8) & 0xFF) as usize % table.len()];
        let chance = world.distribution(star.color) as u32;
        if (rand_val & 0xFF) < chance {
            return world;
        }
    }
}

/// Generate `num_planets` bodies in orbit around a star (or moons around
/// a planet when `generating_moons`), sorted innermost first.
///
/// When `num_planets` is `None` the count is rolled here. The roll spins
/// until nonzero instead of using `1 + n % max`; existing universes
/// depend on that exact consumption of the stream, so it must stay.
pub fn fill_orbits(
    rng: &mut RandomContext,
    star: &StarDesc,
    num_planets: Option<u8>,
    generating_moons: bool,
    parent_is_giant: bool,
) -> Vec<BodyDesc> {
    let count = match num_planets {
        Some(n) => n,
        None => loop {
            let n = (rng.next() & 0xFFFF) as u8 % (MAX_GEN_PLANETS + 1);
            if n != 0 {
                break n;
            }
        },
    };

    let table: &[WorldType] = if generating_moons {
        &MOON_WORLDS
    } else {
        &RANDOM_WORLDS
    };

    let mut bodies: Vec<BodyDesc> = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let world = pick_world(rng, star, table);
        let min_radius = if world.is_gas_giant() {
            star.size.min_gas_giant_dist()
        } else {
            star.size.min_rocky_dist()
        };

        let mut body = BodyDesc::new(WorldClass::Normal(world), 0);

        // Place the orbit, rerolling on conflicts with already placed
        // bodies: moons use discrete slots that must be unique, planets
        // keep at least one unscaled-radius/5 band of separation.
        loop {
            let rand_val = rng.next();
            if generating_moons {
                body.radius =
                    MIN_MOON_RADIUS + ((rand_val & 0xFFFF) as i32 % MAX_GEN_MOONS as i32) * MOON_DELTA;
                if bodies.iter().any(|b| b.radius == body.radius) {
                    continue;
                }
            } else {
                let span = (MAX_PLANET_RADIUS - min_radius) as u32;
                body.radius = ((rand_val & 0xFFFF) % span) as i32 + min_radius;
                let band = unscale_radius(body.radius) / 5;
                if bodies
                    .iter()
                    .any(|b| (unscale_radius(b.radius) / 5 - band).abs() <= 1)
                {
                    continue;
                }
            }
            break;
        }

        let rand_val = rng.next();
        body.angle = normalize_angle((rand_val & 0xFFFF) as i32);
        body.location = IVec2::new(
            cosine(body.angle, body.radius),
            sine(body.angle, body.radius),
        );
        body.rand_seed = seed_for_point(body.location);
        if !generating_moons {
            body.temp_color = temp_color_for_radius(body.radius);
        }
        compute_speed(&mut body, generating_moons, parent_is_giant, rand_val >> 16);

        bodies.push(body);
    }

    bodies.sort_by_key(|b| b.radius);
    bodies
}
