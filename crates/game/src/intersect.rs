//! Flagship-vs-body collision detection with the anti-oscillation
//! cooldown.
//!
//! Tested once per tick while flying: the current view's root body
//! first (the sun never collides), then each child body. A body the
//! ship is still overlapping from a previous hit is suppressed; the
//! cooldown only clears on a tick where the ship overlaps nothing.

use renderer::{stamps_intersect, Stamp};

use crate::context::{BaseView, BodyRef, Cooldown, IntersectId, SimContext};
use crate::coords::screen_center;

fn body_stamp(ctx: &SimContext, body: BodyRef, at_center: bool) -> Option<Stamp> {
    let desc = ctx.body(body);
    let frame = ctx.sheets.body_frame(desc.image.frame?);
    let origin = if at_center {
        screen_center()
    } else {
        desc.image.origin
    };
    Some(Stamp::new(origin, frame))
}

/// Find the body the flagship is newly colliding with, honoring the
/// cooldown. Mutates the cooldown state as a side effect.
pub fn check_intersect(ctx: &mut SimContext) -> Option<BodyRef> {
    let ship_stamp = Stamp::new(ctx.ship.origin, ctx.sheets.flagship_frame(ctx.ship.facing));

    let mut new_wait: Option<IntersectId> = None;

    // Root body first. In the outer view the root is the sun, which
    // can't be collided with; in an inner system it is the planet,
    // pinned at screen center.
    if let BaseView::Inner(p) = ctx.base {
        let root_id = IntersectId {
            planet: p as u8 + 1,
            moon: 1,
        };
        if let Some(stamp) = body_stamp(ctx, BodyRef::Planet(p), true) {
            if stamps_intersect(&ship_stamp, &stamp) {
                new_wait = Some(root_id);
                if ctx.wait_intersect != Cooldown::AllDisabled
                    && ctx.wait_intersect != Cooldown::Body(root_id)
                {
                    ctx.wait_intersect = Cooldown::Body(root_id);
                    return Some(BodyRef::Planet(p));
                }
            }
        }
    }

    let children: Vec<BodyRef> = match ctx.base {
        BaseView::Outer => (0..ctx.planets.len()).map(BodyRef::Planet).collect(),
        BaseView::Inner(_) => (0..ctx.moons.len()).map(BodyRef::Moon).collect(),
    };

    for child in children {
        let id = match (ctx.base, child) {
            (BaseView::Outer, BodyRef::Planet(i)) => IntersectId {
                planet: i as u8 + 1,
                moon: 0,
            },
            (BaseView::Inner(p), BodyRef::Moon(m)) => IntersectId {
                planet: p as u8 + 1,
                moon: m as u8 + 2,
            },
            _ => unreachable!("child list does not match the view"),
        };

        let Some(stamp) = body_stamp(ctx, child, false) else {
            continue;
        };
        if !stamps_intersect(&ship_stamp, &stamp) {
            continue;
        }

        new_wait = Some(id);
        match ctx.wait_intersect {
            // All collisions disallowed, and the ship is still touching
            // something: stay disabled.
            Cooldown::AllDisabled => break,
            // Existing, continued collision: ignore it.
            Cooldown::Body(existing) if existing == id => continue,
            _ => {
                ctx.wait_intersect = Cooldown::Body(id);
                return Some(child);
            }
        }
    }

    // Record what the ship is (still) touching. When collisions were
    // fully disabled, only a clean tick re-enables them.
    if ctx.wait_intersect != Cooldown::AllDisabled || new_wait.is_none() {
        ctx.wait_intersect = match new_wait {
            Some(id) => Cooldown::Body(id),
            None => Cooldown::Clear,
        };
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::orbit::validate_orbits;
    use crate::save::ShipManifest;
    use engine_core::IVec2;
    use procgen::{StarColor, StarDesc, StarSize};

    /// Context with validated frames and hand-placed body origins, so
    /// the assertions do not depend on one seed's screen layout.
    fn ctx_with_ship_on_planet(which: usize) -> SimContext {
        let star = StarDesc::new(IVec2::new(1000, 2000), StarColor::Yellow, StarSize::Giant);
        let opts = Options {
            textured_planets: false,
            orbiting_planets: false,
            ..Options::default()
        };
        let mut ctx = SimContext::new(star, opts, ShipManifest::default());
        validate_orbits(&mut ctx);
        for (i, planet) in ctx.planets.iter_mut().enumerate() {
            planet.image.origin = IVec2::new(-1000, -1000 - 100 * i as i32);
        }
        ctx.planets[0].image.origin = IVec2::new(50, 50);
        if ctx.planets.len() > 1 {
            ctx.planets[1].image.origin = IVec2::new(180, 150);
        }
        ctx.ship.origin = ctx.planets[which].image.origin;
        ctx
    }

    /// First overlap reports the body; the very next tick with the same
    /// overlap reports nothing.
    #[test]
    fn repeat_collision_is_suppressed() {
        let mut ctx = ctx_with_ship_on_planet(0);
        let hit = check_intersect(&mut ctx);
        assert_eq!(hit, Some(BodyRef::Planet(0)));
        assert_eq!(check_intersect(&mut ctx), None);
        assert_eq!(check_intersect(&mut ctx), None);
    }

    /// After a clean tick the same body can trigger again.
    #[test]
    fn cooldown_clears_when_ship_moves_away() {
        let mut ctx = ctx_with_ship_on_planet(0);
        assert!(check_intersect(&mut ctx).is_some());
        let planet_origin = ctx.planets[0].image.origin;
        ctx.ship.origin = planet_origin + IVec2::new(500, 500);
        assert_eq!(check_intersect(&mut ctx), None);
        assert_eq!(ctx.wait_intersect, Cooldown::Clear);
        ctx.ship.origin = planet_origin;
        assert_eq!(check_intersect(&mut ctx), Some(BodyRef::Planet(0)));
    }

    /// Moving straight from one body onto another triggers the new one.
    #[test]
    fn different_body_triggers_through_cooldown() {
        let mut ctx = ctx_with_ship_on_planet(0);
        if ctx.planets.len() < 2 {
            return; // single-planet roll; nothing to hop to
        }
        assert!(check_intersect(&mut ctx).is_some());
        ctx.ship.origin = ctx.planets[1].image.origin;
        assert_eq!(check_intersect(&mut ctx), Some(BodyRef::Planet(1)));
    }

    /// While fully disabled, continued contact keeps collisions off and
    /// a clean tick re-enables them.
    #[test]
    fn all_disabled_persists_until_clear() {
        let mut ctx = ctx_with_ship_on_planet(0);
        ctx.wait_intersect = Cooldown::AllDisabled;
        assert_eq!(check_intersect(&mut ctx), None);
        assert_eq!(ctx.wait_intersect, Cooldown::AllDisabled);
        ctx.ship.origin += IVec2::new(1000, 1000);
        assert_eq!(check_intersect(&mut ctx), None);
        assert_eq!(ctx.wait_intersect, Cooldown::Clear);
    }
}
