//! Ship manifest and the saved-game fields the core produces/consumes.
//!
//! The save system itself lives outside this workspace; the contract is
//! only these fields: where the ship is (`ip_planet`, `in_orbit`,
//! `ship_facing`, `ip_location`) and the crew/cargo totals.

use engine_core::{GameClock, IVec2};
use procgen::analysis::NUM_ELEMENT_CATEGORIES;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::{BaseView, BodyRef, SimContext};

/// Ship-wide state the sim reads and writes: crew, cargo, landers,
/// upgrades, drive fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipManifest {
    pub crew: u16,
    pub crew_pod_capacity: u16,
    pub storage_bay_capacity: u16,
    pub total_element_mass: u16,
    pub element_amounts: [u16; NUM_ELEMENT_CATEGORIES],
    pub total_bio_mass: u16,
    pub num_landers: u8,
    /// Per-hazard shield bitmask (bio, quake, lightning, lava).
    pub lander_shields: u8,
    pub improved_lander_speed: bool,
    pub improved_lander_cargo: bool,
    pub improved_lander_shot: bool,
    /// Fusion thrusters fitted; drives top speed in IP flight.
    pub fusion_thrusters: u8,
    /// Turning jets fitted; drives turn cadence in IP flight.
    pub turning_jets: u8,
    pub fuel: u32,
}

impl Default for ShipManifest {
    fn default() -> Self {
        Self {
            crew: 31,
            crew_pod_capacity: 50,
            storage_bay_capacity: 500,
            total_element_mass: 0,
            element_amounts: [0; NUM_ELEMENT_CATEGORIES],
            total_bio_mass: 0,
            num_landers: 1,
            lander_shields: 0,
            improved_lander_speed: false,
            improved_lander_cargo: false,
            improved_lander_shot: false,
            fusion_thrusters: 4,
            turning_jets: 2,
            fuel: 10_000,
        }
    }
}

impl ShipManifest {
    /// Storage bay room left for minerals.
    pub fn bay_remaining(&self) -> u16 {
        self.storage_bay_capacity
            .saturating_sub(self.total_element_mass)
    }
}

/// Positional fields persisted on system exit / entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SaveFields {
    pub star_pt: (i32, i32),
    /// 0 = outer system, else 1-based planet index of the inner system.
    pub ip_planet: u8,
    /// 0 = not orbiting, else 1-based body index within the current
    /// view (1 = the view's planet itself, n+2 = moon n).
    pub in_orbit: u8,
    pub ship_facing: u8,
    pub ip_location: (i32, i32),
    pub clock_ticks: u64,
}

impl SaveFields {
    pub fn location(&self) -> IVec2 {
        IVec2::new(self.ip_location.0, self.ip_location.1)
    }
}

/// Why saved position fields could not be applied to a freshly loaded
/// system. These indicate a corrupt or mismatched save, not a runtime
/// condition to recover from mid-game.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("save belongs to star ({0}, {1}), not this system")]
    WrongStar(i32, i32),
    #[error("saved inner-system planet {0} does not exist here")]
    BadPlanet(u8),
    #[error("saved orbit index {0} does not exist in the restored view")]
    BadOrbit(u8),
}

/// Place a freshly created context where a save left off: outer system,
/// inner system, or orbit. The context must have been created for the
/// same star.
pub fn restore_session(ctx: &mut SimContext, fields: &SaveFields) -> Result<(), RestoreError> {
    if (ctx.star.point.x, ctx.star.point.y) != fields.star_pt {
        return Err(RestoreError::WrongStar(fields.star_pt.0, fields.star_pt.1));
    }

    ctx.clock = GameClock::from_ticks(fields.clock_ticks);
    ctx.ship.facing = fields.ship_facing as i32;
    ctx.ship.ip_location = fields.location();

    if fields.ip_planet > 0 {
        let planet_index = fields.ip_planet as usize - 1;
        if planet_index >= ctx.planets.len() {
            return Err(RestoreError::BadPlanet(fields.ip_planet));
        }
        // Bodies may have orbited since the save was written; validate
        // before deriving the inner view's anchor from them.
        crate::orbit::validate_orbits(ctx);
        ctx.sun_loc = ctx.planet_outer_location(planet_index);
        let planet = ctx.planets[planet_index].clone();
        ctx.moons = ctx
            .generator
            .generate_moons(&ctx.star, &planet, planet_index, &mut ctx.rng);
        ctx.base = BaseView::Inner(planet_index);
        if ctx.opts.textured_planets {
            ctx.generate_textured_moons();
        }
    }

    ctx.orbital = match (fields.in_orbit, ctx.base) {
        (0, _) => None,
        (_, BaseView::Outer) => return Err(RestoreError::BadOrbit(fields.in_orbit)),
        (1, BaseView::Inner(p)) => Some(BodyRef::Planet(p)),
        (n, BaseView::Inner(_)) => {
            let moon_index = n as usize - 2;
            if moon_index >= ctx.moons.len() {
                return Err(RestoreError::BadOrbit(n));
            }
            Some(BodyRef::Moon(moon_index))
        }
    };
    if ctx.orbital.is_some() {
        ctx.ship.velocity.zero();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use procgen::{StarColor, StarDesc, StarSize};

    fn fresh_ctx() -> SimContext {
        let star = StarDesc::new(IVec2::new(77, 88), StarColor::Orange, StarSize::Giant);
        let opts = Options {
            textured_planets: false,
            ..Options::default()
        };
        SimContext::new(star, opts, ShipManifest::default())
    }

    /// Round trip: capture save fields in orbit, restore into a fresh
    /// context, land in the same place.
    #[test]
    fn orbit_save_fields_round_trip() {
        let mut ctx = fresh_ctx();
        crate::zoom::enter_inner_system(&mut ctx, 0);
        if ctx.moons.is_empty() {
            // Planet rolled no moons: orbit the planet itself instead.
            crate::zoom::enter_orbital(&mut ctx, BodyRef::Planet(0));
        } else {
            crate::zoom::enter_orbital(&mut ctx, BodyRef::Moon(0));
        }
        let fields = ctx.save_fields();

        let mut restored = fresh_ctx();
        restore_session(&mut restored, &fields).unwrap();
        assert_eq!(restored.base, BaseView::Inner(0));
        assert_eq!(restored.orbital, ctx.orbital);
        assert_eq!(restored.ship.ip_location, ctx.ship.ip_location);
        assert_eq!(restored.moons.len(), ctx.moons.len());
    }

    #[test]
    fn mismatched_star_is_rejected() {
        let mut ctx = fresh_ctx();
        let fields = SaveFields {
            star_pt: (1, 2),
            ..SaveFields::default()
        };
        assert!(matches!(
            restore_session(&mut ctx, &fields),
            Err(RestoreError::WrongStar(1, 2))
        ));
    }

    #[test]
    fn out_of_range_planet_is_rejected() {
        let mut ctx = fresh_ctx();
        let fields = SaveFields {
            star_pt: (77, 88),
            ip_planet: 200,
            ..SaveFields::default()
        };
        assert!(matches!(
            restore_session(&mut ctx, &fields),
            Err(RestoreError::BadPlanet(200))
        ));
    }
}
