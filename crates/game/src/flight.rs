//! The interplanetary tick: ship controls, the location/zoom check, and
//! the draw of whichever view survives the frame.

use audio::{AudioSink, MusicTrack};
use engine_core::{cosine, facing_to_angle, normalize_facing, sine, velocity_squared};
use input::InputFrame;
use renderer::Canvas;

use crate::context::{BodyRef, SimContext, IP_SHIP_THRUST_INCREMENT};
use crate::coords::location_to_display;
use crate::draw::{draw_system_transition, redraw_view, scale_system};
use crate::intersect::check_intersect;
use crate::orbit::{validate_inner_orbits, validate_orbits};
use crate::zoom::{check_ship_location, check_zoom_level, update_scale_rect, LocationChange};

/// Ticks between thrust applications.
const THRUST_WAIT: u8 = 1;

/// What a tick did, for the outer driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    None,
    ZoomedIn,
    ZoomedOut,
    EnteredInner(usize),
    LeftInner,
    /// The ship hit a world; the driver takes over with the orbital
    /// menu and may descend to the surface.
    EnteredOrbit(BodyRef),
    /// The ship flew out of the fully zoomed-out view: back to
    /// hyperspace.
    LeftSystem,
    Aborted,
}

/// Bring a fresh context into flying state: place the zoom, validate
/// every orbit, fire the NPC hooks, draw the first view and start the
/// music. Mirrors a system (re)entry.
pub fn init_solar_sys(
    ctx: &mut SimContext,
    canvas: &mut dyn Canvas,
    audio: &mut dyn AudioSink,
    reentry: bool,
) {
    let inner = check_zoom_level(ctx);
    validate_orbits(ctx);
    if inner {
        validate_inner_orbits(ctx);
    }

    if reentry {
        ctx.generator.reinit_npcs(&ctx.star);
    } else {
        ctx.generator.init_npcs(&ctx.star);
    }

    reset_solar_sys(ctx, audio);
    draw_system_transition(ctx, canvas, ctx.in_inner_system());
}

/// Re-arm the flight loop after anything that took control away
/// (system entry, returning from orbit). Records any existing collision
/// so the ship does not instantly re-enter the world it is sitting on.
pub fn reset_solar_sys(ctx: &mut SimContext, audio: &mut dyn AudioSink) {
    assert!(!ctx.in_ip_flight, "reset while already flying");
    update_scale_rect(ctx);
    check_intersect(ctx);
    ctx.in_ip_flight = true;
    audio.play_music(MusicTrack::Space, true);
}

/// Inertial thrust along the ship's current heading: accelerate until
/// max speed; at max speed, thrusting off-axis rotates the travel
/// vector without adding speed.
pub fn flagship_inertial_thrust(ctx: &mut SimContext, current_angle: i32) {
    let max_speed = (ctx.max_ship_speed << 1) as i64;
    let thrust_increment = IP_SHIP_THRUST_INCREMENT << 1;
    let (cur_dx, cur_dy) = ctx.ship.velocity.components();
    let travel_angle = ctx.ship.velocity.travel_angle();

    let max_dx = cosine(current_angle, max_speed as i32);
    let max_dy = sine(current_angle, max_speed as i32);
    if travel_angle == current_angle && cur_dx == max_dx && cur_dy == max_dy {
        return; // already maxed out on this heading
    }

    let dx = cur_dx + cosine(current_angle, thrust_increment);
    let dy = cur_dy + sine(current_angle, thrust_increment);
    let desired = velocity_squared(dx, dy);
    let max_sq = max_speed * max_speed;

    if desired <= max_sq {
        ctx.ship.velocity.set_components(dx, dy);
    } else if travel_angle == current_angle {
        ctx.ship.velocity.set_components(max_dx, max_dy);
    } else {
        // Maxed out at an angle to the travel vector: bend the vector
        // without letting the speed grow.
        let mut bent = ctx.ship.velocity;
        bent.delta_components(
            cosine(current_angle, thrust_increment >> 1) - cosine(travel_angle, thrust_increment),
            sine(current_angle, thrust_increment >> 1) - sine(travel_angle, thrust_increment),
        );
        let (bx, by) = bent.components();
        if velocity_squared(bx, by) > max_sq {
            ctx.ship.velocity.set_components(max_dx, max_dy);
        } else {
            ctx.ship.velocity = bent;
        }
    }
}

/// Turn and thrust handling at the flight cadence set by the ship's
/// fit.
pub fn process_ship_controls(ctx: &mut SimContext, input: InputFrame) {
    let mut delta_x = 0;
    if input.left {
        delta_x -= 1;
    }
    if input.right {
        delta_x += 1;
    }

    if ctx.turn_counter > 0 {
        ctx.turn_counter -= 1;
    } else if delta_x != 0 {
        ctx.ship.facing = normalize_facing(ctx.ship.facing + delta_x);
        ctx.turn_counter = ctx.turn_wait;
    }

    if ctx.thrust_counter > 0 {
        ctx.thrust_counter -= 1;
    } else if input.thrust {
        flagship_inertial_thrust(ctx, facing_to_angle(ctx.ship.facing));
        ctx.thrust_counter = THRUST_WAIT;
    }
}

/// One interplanetary frame. The driver calls this at `IP_TICK_RATE`
/// and reacts to the returned event.
pub fn ip_tick(
    ctx: &mut SimContext,
    input: InputFrame,
    canvas: &mut dyn Canvas,
    audio: &mut dyn AudioSink,
) -> TickEvent {
    if ctx.abort {
        return TickEvent::Aborted;
    }

    ctx.clock.tick();
    process_ship_controls(ctx, input);

    // Move the flagship and keep its universe location in sync.
    let (dx, dy) = ctx.ship.velocity.next_delta(1);
    if dx != 0 || dy != 0 {
        ctx.ship.origin.x += dx;
        ctx.ship.origin.y += dy;
        ctx.ship.ip_location =
            crate::coords::display_to_location(ctx.ship.origin, ctx.zoom_radius);
    }

    match check_ship_location(ctx) {
        LocationChange::EnteredInner(p) => {
            draw_system_transition(ctx, canvas, true);
            TickEvent::EnteredInner(p)
        }
        LocationChange::LeftInner => {
            draw_system_transition(ctx, canvas, false);
            TickEvent::LeftInner
        }
        LocationChange::ZoomedIn => {
            scale_system(ctx, canvas);
            TickEvent::ZoomedIn
        }
        LocationChange::ZoomedOut => {
            scale_system(ctx, canvas);
            TickEvent::ZoomedOut
        }
        LocationChange::EnteredOrbit(world) => {
            ctx.in_ip_flight = false;
            audio.play_music(MusicTrack::Orbit, true);
            TickEvent::EnteredOrbit(world)
        }
        LocationChange::LeftSystem => TickEvent::LeftSystem,
        LocationChange::None => {
            if !ctx.in_orbit() {
                redraw_view(ctx, canvas);
            }
            TickEvent::None
        }
    }
}

/// Return the flagship to flight after the orbital menu: put the ship
/// back on the world it orbited and redraw the view it left.
pub fn resume_from_orbit(ctx: &mut SimContext, canvas: &mut dyn Canvas, audio: &mut dyn AudioSink) {
    let world = ctx
        .orbital
        .take()
        .expect("resume_from_orbit without an orbit");

    match world {
        BodyRef::Moon(m) => {
            // Moons keep their inner-view origin; resume on top of it.
            ctx.ship.origin = ctx.moons[m].image.origin;
        }
        BodyRef::Planet(_) => {
            ctx.ship.origin = crate::coords::screen_center();
        }
    }

    let inner = check_zoom_level(ctx);
    validate_orbits(ctx);
    if inner {
        validate_inner_orbits(ctx);
        ctx.generate_textured_moons();
    } else {
        ctx.ship.origin = location_to_display(ctx.ship.ip_location, ctx.zoom_radius);
    }

    reset_solar_sys(ctx, audio);
    draw_system_transition(ctx, canvas, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::save::ShipManifest;
    use audio::NullSink;
    use engine_core::IVec2;
    use procgen::{StarColor, StarDesc, StarSize};
    use renderer::RecordingCanvas;

    fn flying_ctx() -> (SimContext, RecordingCanvas, NullSink) {
        let star = StarDesc::new(IVec2::new(1000, 2000), StarColor::Yellow, StarSize::Giant);
        let opts = Options {
            textured_planets: false,
            orbiting_planets: false,
            ..Options::default()
        };
        let mut ctx = SimContext::new(star, opts, ShipManifest::default());
        let mut canvas = RecordingCanvas::new();
        let mut sink = NullSink;
        init_solar_sys(&mut ctx, &mut canvas, &mut sink, false);
        (ctx, canvas, sink)
    }

    #[test]
    fn thrust_accelerates_and_saturates() {
        let (mut ctx, _, _) = flying_ctx();
        let angle = facing_to_angle(ctx.ship.facing);
        for _ in 0..200 {
            flagship_inertial_thrust(&mut ctx, angle);
        }
        let (dx, dy) = ctx.ship.velocity.components();
        let max = (ctx.max_ship_speed << 1) as i64;
        assert!(velocity_squared(dx, dy) <= max * max);
        // Saturated along the heading.
        assert_eq!(dx, cosine(angle, max as i32));
        assert_eq!(dy, sine(angle, max as i32));
    }

    #[test]
    fn turn_cadence_respects_turn_wait() {
        let (mut ctx, _, _) = flying_ctx();
        ctx.turn_counter = 0;
        let before = ctx.ship.facing;
        process_ship_controls(&mut ctx, InputFrame::turning(false));
        assert_eq!(ctx.ship.facing, normalize_facing(before + 1));
        // Immediately after, the cadence gate blocks further turning.
        process_ship_controls(&mut ctx, InputFrame::turning(false));
        assert_eq!(ctx.ship.facing, normalize_facing(before + 1));
    }

    #[test]
    fn idle_tick_redraws_without_transition() {
        let (mut ctx, mut canvas, mut sink) = flying_ctx();
        ctx.ship.velocity.zero();
        // Park the ship somewhere empty near the bottom of the view.
        ctx.ship.origin = IVec2::new(10, crate::coords::SIS_SCREEN_HEIGHT - 10);
        ctx.ship.ip_location =
            crate::coords::display_to_location(ctx.ship.origin, ctx.zoom_radius);
        canvas.clear_ops();
        let ev = ip_tick(&mut ctx, InputFrame::idle(), &mut canvas, &mut sink);
        assert!(matches!(ev, TickEvent::None | TickEvent::ZoomedIn));
        assert!(canvas.stamp_count() > 0, "idle frame must redraw bodies");
    }

    #[test]
    fn abort_unwinds_immediately() {
        let (mut ctx, mut canvas, mut sink) = flying_ctx();
        ctx.abort = true;
        assert_eq!(
            ip_tick(&mut ctx, InputFrame::idle(), &mut canvas, &mut sink),
            TickEvent::Aborted
        );
    }
}
