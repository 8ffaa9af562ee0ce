//! The zoom & view state machine: scale-rect zoom triggers, inner
//! system entry/exit, and orbit entry.

use engine_core::{cosine, facing_to_angle, sine, HALF_CIRCLE};
use glam::IVec2;
use procgen::consts::{MAX_GEN_MOONS, MIN_MOON_RADIUS, MOON_DELTA};

use crate::context::{BaseView, BodyRef, Cooldown, IntersectId, SimContext};
use crate::coords::{
    display_to_location, location_to_display, on_screen, screen_center, DISPLAY_FACTOR,
    MAX_ZOOM_RADIUS, MIN_ZOOM_RADIUS, SIS_SCREEN_HEIGHT,
};
use crate::intersect::check_intersect;
use crate::orbit::{get_orbit_rect, outer_params, validate_orbit, OrbitEnv};

/// How far from the planet the ship re-enters an inner system: just
/// outside the outermost moon slot.
pub const INNER_ENTRY_DISTANCE: i32 =
    MIN_MOON_RADIUS + (MAX_GEN_MOONS as i32 - 1) * MOON_DELTA + MOON_DELTA / 4 + 5;

/// What a tick's location check decided. Mutating transitions have
/// already been applied when this returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationChange {
    None,
    /// Radius halved (already clamped and applied).
    ZoomedIn,
    /// Radius doubled (already clamped and applied).
    ZoomedOut,
    EnteredInner(usize),
    LeftInner,
    EnteredOrbit(BodyRef),
    /// At max zoom and off screen: hand control back to hyperspace.
    LeftSystem,
}

/// Scale rect for the current radius: the zoom-in trigger zone sized to
/// the *next* zoom level.
pub fn update_scale_rect(ctx: &mut SimContext) {
    let next = if ctx.zoom_radius > MIN_ZOOM_RADIUS {
        ctx.zoom_radius >> 1
    } else {
        0
    };
    ctx.scale_rect = get_orbit_rect(
        next,
        next,
        next,
        DISPLAY_FACTOR,
        DISPLAY_FACTOR >> 2,
        ctx.zoom_radius,
    );
}

/// Loop form used at load time: halve from `from_radius` until the ship
/// falls outside the shrinking scale rect. Leaves the scale rect set
/// for the returned radius.
pub fn find_radius(ctx: &mut SimContext, ship_loc: IVec2, mut from_radius: i32) -> i32 {
    loop {
        from_radius >>= 1;
        let next = if from_radius > MIN_ZOOM_RADIUS {
            from_radius >> 1
        } else {
            0
        };
        ctx.scale_rect = get_orbit_rect(
            next,
            next,
            next,
            DISPLAY_FACTOR,
            DISPLAY_FACTOR >> 2,
            from_radius,
        );
        let display_loc = location_to_display(ship_loc, from_radius);
        if !ctx.scale_rect.contains(display_loc) {
            return from_radius;
        }
    }
}

/// Place the zoom for a freshly loaded/entered system and sync the ship
/// stamp. Returns whether the view is an inner system.
pub fn check_zoom_level(ctx: &mut SimContext) -> bool {
    let inner = ctx.in_inner_system();
    let ship_loc = if inner {
        ctx.sun_loc
    } else {
        ctx.ship.ip_location
    };
    ctx.zoom_radius = find_radius(ctx, ship_loc, MAX_ZOOM_RADIUS << 1);
    if !inner {
        ctx.ship.origin = location_to_display(ctx.ship.ip_location, ctx.zoom_radius);
    }
    inner
}

/// Enter a planet's inner system: reposition the flagship at the fixed
/// entry distance along its reversed heading, generate the moons, and
/// switch the base view.
pub fn enter_inner_system(ctx: &mut SimContext, planet_index: usize) {
    let angle = facing_to_angle(ctx.ship.facing) + HALF_CIRCLE;
    let center = screen_center();
    let mut origin = IVec2::new(
        center.x + cosine(angle, INNER_ENTRY_DISTANCE),
        center.y + sine(angle, INNER_ENTRY_DISTANCE),
    );
    if origin.y < 0 {
        origin.y = 1;
    } else if origin.y >= SIS_SCREEN_HEIGHT {
        origin.y = SIS_SCREEN_HEIGHT - 2;
    }
    ctx.ship.origin = origin;
    ctx.ship.ip_location = display_to_location(origin, MAX_ZOOM_RADIUS);
    ctx.sun_loc = ctx.planet_outer_location(planet_index);
    ctx.ship.velocity.zero();

    let planet = ctx.planets[planet_index].clone();
    ctx.moons = ctx
        .generator
        .generate_moons(&ctx.star, &planet, planet_index, &mut ctx.rng);
    ctx.base = BaseView::Inner(planet_index);
    if ctx.opts.textured_planets {
        ctx.generate_textured_moons();
    }
    log::debug!(
        "entered inner system of planet {} ({} moons)",
        planet_index,
        ctx.moons.len()
    );
}

/// Leave the inner system back to the outer view. The planet may have
/// moved along its orbit while we were inside, so its outer position is
/// revalidated before the ship is put back on it.
pub fn leave_inner_system(ctx: &mut SimContext, planet_index: usize) {
    ctx.base = BaseView::Outer;
    ctx.orbital = None;

    let outer_wait = IntersectId {
        planet: planet_index as u8 + 1,
        moon: 0,
    };

    let env = OrbitEnv {
        days: ctx.clock.days_elapsed(),
        orbiting_planets: ctx.opts.orbiting_planets,
        is_moon: false,
        parent_location: IVec2::ZERO,
    };
    let params = outer_params(ctx.zoom_radius);
    validate_orbit(&mut ctx.planets[planet_index], params, &env);

    ctx.sun_loc = ctx.planet_outer_location(planet_index);
    ctx.ship.ip_location = ctx.sun_loc;
    ctx.ship.origin = location_to_display(ctx.ship.ip_location, ctx.zoom_radius);
    ctx.ship.velocity.zero();

    // Moon render state dies with the inner view.
    ctx.moons.clear();

    // We are standing on the planet we just left; suppress it. If we
    // are *also* overlapping something else, disable all collisions
    // until the ship is fully clear.
    ctx.wait_intersect = Cooldown::Body(outer_wait);
    check_intersect(ctx);
    if ctx.wait_intersect != Cooldown::Body(outer_wait) {
        ctx.wait_intersect = Cooldown::AllDisabled;
    }
    log::debug!("left inner system of planet {planet_index}");
}

/// Enter orbit around a world: freeze the ship and flag the orbit.
pub fn enter_orbital(ctx: &mut SimContext, world: BodyRef) {
    ctx.ship.velocity.zero();
    ctx.orbital = Some(world);
}

/// Per-tick location check: zoom triggers, screen exits, collisions.
/// Applies at most one discrete transition and reports it.
pub fn check_ship_location(ctx: &mut SimContext) -> LocationChange {
    let ship_off_screen = !on_screen(ctx.ship.origin);

    if ship_off_screen {
        if let BaseView::Inner(p) = ctx.base {
            leave_inner_system(ctx, p);
            // Re-place the zoom for wherever the planet has moved to.
            ctx.zoom_radius = find_radius(ctx, ctx.ship.ip_location, MAX_ZOOM_RADIUS << 1);
            ctx.ship.origin = location_to_display(ctx.ship.ip_location, ctx.zoom_radius);
            return LocationChange::LeftInner;
        }
        if ctx.zoom_radius == MAX_ZOOM_RADIUS {
            return LocationChange::LeftSystem;
        }
        // One doubling per tick; consecutive ticks finish the zoom-out.
        apply_zoom(ctx, (ctx.zoom_radius << 1).min(MAX_ZOOM_RADIUS));
        return LocationChange::ZoomedOut;
    }

    if ctx.base == BaseView::Outer
        && ctx.zoom_radius > MIN_ZOOM_RADIUS
        && ctx.scale_rect.contains(ctx.ship.origin)
    {
        // One halving per tick; consecutive ticks finish the zoom-in.
        apply_zoom(ctx, (ctx.zoom_radius >> 1).max(MIN_ZOOM_RADIUS));
        return LocationChange::ZoomedIn;
    }

    if let Some(hit) = check_intersect(ctx) {
        return match ctx.base {
            BaseView::Inner(_) => {
                enter_orbital(ctx, hit);
                LocationChange::EnteredOrbit(hit)
            }
            BaseView::Outer => {
                let BodyRef::Planet(p) = hit else {
                    unreachable!("outer view collided with a moon");
                };
                enter_inner_system(ctx, p);
                LocationChange::EnteredInner(p)
            }
        };
    }

    LocationChange::None
}

fn apply_zoom(ctx: &mut SimContext, new_radius: i32) {
    ctx.zoom_radius = new_radius;
    ctx.ship.origin = location_to_display(ctx.ship.ip_location, new_radius);
    update_scale_rect(ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::save::ShipManifest;
    use procgen::{StarColor, StarDesc, StarSize};

    fn test_ctx() -> SimContext {
        let star = StarDesc::new(IVec2::new(1000, 2000), StarColor::Yellow, StarSize::Giant);
        let opts = Options {
            textured_planets: false,
            orbiting_planets: false,
            ..Options::default()
        };
        let mut ctx = SimContext::new(star, opts, ShipManifest::default());
        crate::orbit::validate_orbits(&mut ctx);
        update_scale_rect(&mut ctx);
        ctx
    }

    /// Zoom only ever moves one doubling/halving per tick, clamped to
    /// the valid range.
    #[test]
    fn zoom_steps_are_single_and_clamped() {
        let mut ctx = test_ctx();
        // Park the ship dead center: inside every scale rect.
        ctx.ship.ip_location = IVec2::ZERO;

        let mut radii = vec![ctx.zoom_radius];
        for _ in 0..16 {
            // Keep the ship centered so it keeps zooming in.
            ctx.ship.origin = screen_center();
            match check_ship_location(&mut ctx) {
                LocationChange::ZoomedIn => radii.push(ctx.zoom_radius),
                // Bottomed out (or bumped into a centered planet).
                _ => break,
            }
        }
        assert!(radii.len() > 1, "never zoomed in");
        for pair in radii.windows(2) {
            assert_eq!(pair[0], pair[1] * 2, "zoom-in must halve exactly once");
        }
        assert!(ctx.zoom_radius >= MIN_ZOOM_RADIUS);

        // Walk back out from the bottom on a fresh context.
        let mut ctx = test_ctx();
        ctx.zoom_radius = MIN_ZOOM_RADIUS;
        update_scale_rect(&mut ctx);
        ctx.ship.ip_location = IVec2::new(MAX_ZOOM_RADIUS * 2, 0);
        ctx.ship.origin = IVec2::new(-10, -10);
        let mut last = ctx.zoom_radius;
        for _ in 0..16 {
            match check_ship_location(&mut ctx) {
                LocationChange::ZoomedOut => {
                    assert_eq!(ctx.zoom_radius, (last << 1).min(MAX_ZOOM_RADIUS));
                    last = ctx.zoom_radius;
                    ctx.ship.origin = IVec2::new(-10, -10);
                }
                LocationChange::LeftSystem => break,
                other => panic!("unexpected change {other:?}"),
            }
        }
        assert_eq!(ctx.zoom_radius, MAX_ZOOM_RADIUS);
    }

    /// Off screen at max zoom signals leaving interplanetary space.
    #[test]
    fn leaving_at_max_zoom_exits_the_system() {
        let mut ctx = test_ctx();
        ctx.zoom_radius = MAX_ZOOM_RADIUS;
        ctx.ship.origin = IVec2::new(-50, 0);
        assert_eq!(check_ship_location(&mut ctx), LocationChange::LeftSystem);
    }

    /// Entering an inner system generates moons, zeroes velocity, and
    /// parks the ship at the fixed entry distance.
    #[test]
    fn inner_entry_is_positioned_and_stationary() {
        let mut ctx = test_ctx();
        ctx.ship.velocity.set_components(40, 40);
        enter_inner_system(&mut ctx, 0);
        assert!(ctx.in_inner_system());
        assert!(ctx.ship.velocity.is_zero());
        let d = ctx.ship.origin - screen_center();
        let dist = ((d.x * d.x + d.y * d.y) as f64).sqrt();
        assert!((dist - INNER_ENTRY_DISTANCE as f64).abs() < 2.0);
    }

    /// Leaving the inner system suppresses the departed planet and
    /// escalates to all-disabled only when something else overlaps too.
    #[test]
    fn inner_exit_sets_cooldown_on_departed_planet() {
        let mut ctx = test_ctx();
        enter_inner_system(&mut ctx, 0);
        // Drive the ship off screen to trigger the exit path.
        ctx.ship.origin = IVec2::new(-20, 10);
        let change = check_ship_location(&mut ctx);
        assert_eq!(change, LocationChange::LeftInner);
        assert_eq!(ctx.base, BaseView::Outer);
        match ctx.wait_intersect {
            Cooldown::Body(id) => assert_eq!(id.planet, 1),
            Cooldown::AllDisabled => {} // overlapped a second body too
            Cooldown::Clear => panic!("cooldown must not be clear right after exit"),
        }
    }

    /// Moon regeneration across re-entries yields identical layouts.
    #[test]
    fn reentering_inner_system_regenerates_same_moons() {
        let mut ctx = test_ctx();
        enter_inner_system(&mut ctx, 0);
        let first: Vec<_> = ctx.moons.iter().map(|m| (m.world, m.radius)).collect();
        ctx.ship.origin = IVec2::new(-20, 10);
        assert_eq!(check_ship_location(&mut ctx), LocationChange::LeftInner);
        assert!(ctx.moons.is_empty());
        enter_inner_system(&mut ctx, 0);
        let second: Vec<_> = ctx.moons.iter().map(|m| (m.world, m.radius)).collect();
        assert_eq!(first, second);
    }
}
