//! View rendering: orbit paths, bodies in y-order, the animated sun,
//! and the full-view transitions fired on every zoom or view change.

use engine_core::Rect;
use glam::IVec2;
use renderer::{Canvas, Color, Stamp, TransitionStyle};

use crate::context::{BaseView, SimContext};
use crate::coords::{screen_center, MAX_ZOOM_RADIUS, SIS_SCREEN_HEIGHT, SIS_SCREEN_WIDTH};
use crate::orbit::{
    get_planet_orbit_rect, outer_params, validate_inner_orbits, validate_orbits, OrbitParams,
};
use crate::sheets::SUN_ANIM_FRAMES;

/// Orbit-path tints, coldest to hottest.
const TEMP_COLOR_TABLE: [Color; 5] = [
    Color::new(0x00, 0x00, 0x73),
    Color::new(0x00, 0x31, 0x42),
    Color::new(0x00, 0x5A, 0x00),
    Color::new(0x7B, 0x00, 0x00),
    Color::new(0x7B, 0x42, 0x00),
];

fn draw_orbit_path(canvas: &mut dyn Canvas, rect: &Rect, temp_color: u8) {
    canvas.set_foreground(TEMP_COLOR_TABLE[temp_color as usize % TEMP_COLOR_TABLE.len()]);
    canvas.draw_oval(rect, 1);
}

/// Advance the sun animation and produce its stamp for this frame,
/// swapping to a bigger frame set as the view zooms in.
pub fn animate_sun(ctx: &mut SimContext) -> Stamp {
    ctx.sun_anim_index = (ctx.sun_anim_index + 1) % SUN_ANIM_FRAMES;
    let mut tier = 0;
    if ctx.zoom_radius <= MAX_ZOOM_RADIUS >> 1 {
        tier += 1;
        if ctx.zoom_radius <= MAX_ZOOM_RADIUS >> 2 {
            tier += 1;
        }
    }
    Stamp::new(screen_center(), ctx.sheets.sun_frame(tier, ctx.sun_anim_index))
}

/// Advance textured-body rotation columns. A sphere is re-rendered only
/// when its column actually moved; small worlds only shift a column
/// every few frames.
pub fn rotate_planets(ctx: &mut SimContext) {
    ctx.rotate_counter += 1;
    let days = ctx.clock.days_elapsed();
    let bodies = match ctx.base {
        BaseView::Outer => &mut ctx.planets,
        BaseView::Inner(_) => &mut ctx.moons,
    };
    for body in bodies.iter_mut() {
        let Some(surface) = body.surface.as_ref() else {
            continue;
        };
        let column = surface.rotation_column(body.rot_speed, days);
        if column != body.rot_column {
            body.rot_column = column;
        }
    }
}

fn draw_bodies_y_sorted(ctx: &SimContext, canvas: &mut dyn Canvas, sun: Option<Stamp>) {
    // Far-to-near painter's order by screen y, sun included in the
    // ordering so planets pass both in front of and behind it.
    let bodies = match ctx.base {
        BaseView::Outer => &ctx.planets,
        BaseView::Inner(_) => &ctx.moons,
    };
    let mut order: Vec<(i32, Stamp)> = Vec::with_capacity(bodies.len() + 1);
    if let Some(stamp) = sun {
        order.push((stamp.origin.y, stamp));
    }
    for body in bodies {
        if let Some(frame) = body.image.frame {
            order.push((
                body.image.origin.y,
                Stamp::new(body.image.origin, ctx.sheets.body_frame(frame)),
            ));
        }
    }
    order.sort_by_key(|(y, _)| *y);

    for (_, stamp) in &order {
        canvas.draw_stamp(stamp);
    }
}

/// Draw the outer system: orbit ovals, animated sun, planets.
pub fn draw_outer_system(ctx: &mut SimContext, canvas: &mut dyn Canvas) {
    validate_orbits(ctx);
    rotate_planets(ctx);
    let params = outer_params(ctx.zoom_radius);
    for i in 0..ctx.planets.len() {
        let rect = get_planet_orbit_rect(&ctx.planets[i], params);
        draw_orbit_path(canvas, &rect, ctx.planets[i].temp_color);
    }
    let sun = animate_sun(ctx);
    draw_bodies_y_sorted(ctx, canvas, Some(sun));
    draw_flagship(ctx, canvas);
}

/// Draw an inner system: the planet centered, moon orbit ovals, moons.
pub fn draw_inner_system(ctx: &mut SimContext, canvas: &mut dyn Canvas) {
    validate_inner_orbits(ctx);
    rotate_planets(ctx);
    let BaseView::Inner(p) = ctx.base else {
        panic!("inner draw outside an inner system");
    };

    let moon_params = OrbitParams {
        size_numer: 2,
        dy_numer: 1,
        denom: 2,
    };
    for i in 0..ctx.moons.len() {
        let rect = get_planet_orbit_rect(&ctx.moons[i], moon_params);
        draw_orbit_path(canvas, &rect, ctx.moons[i].temp_color);
    }

    let planet = &ctx.planets[p];
    if let Some(frame) = planet.image.frame {
        canvas.draw_stamp(&Stamp::new(screen_center(), ctx.sheets.body_frame(frame)));
    }
    draw_bodies_y_sorted(ctx, canvas, None);
    draw_flagship(ctx, canvas);
}

fn draw_flagship(ctx: &SimContext, canvas: &mut dyn Canvas) {
    canvas.draw_stamp(&Stamp::new(
        ctx.ship.origin,
        ctx.sheets.flagship_frame(ctx.ship.facing),
    ));
}

/// Redraw the current view inside a batch; the steady-state frame.
pub fn redraw_view(ctx: &mut SimContext, canvas: &mut dyn Canvas) {
    canvas.batch();
    canvas.clear();
    if ctx.in_inner_system() {
        draw_inner_system(ctx, canvas);
    } else {
        draw_outer_system(ctx, canvas);
    }
    canvas.unbatch();
}

/// Full redraw plus screen transition; no partial draw may cross a view
/// boundary.
pub fn draw_system_transition(ctx: &mut SimContext, canvas: &mut dyn Canvas, inner: bool) {
    canvas.batch();
    canvas.clear();
    if inner {
        draw_inner_system(ctx, canvas);
    } else {
        draw_outer_system(ctx, canvas);
    }
    canvas.screen_transition(TransitionStyle::Crossfade, None);
    canvas.unbatch();
}

/// Zoom-step redraw: crossfade the whole outer view at the new radius.
pub fn scale_system(ctx: &mut SimContext, canvas: &mut dyn Canvas) {
    let region = Rect::new(
        IVec2::ZERO,
        engine_core::Extent::new(SIS_SCREEN_WIDTH, SIS_SCREEN_HEIGHT),
    );
    canvas.batch();
    canvas.clear();
    draw_outer_system(ctx, canvas);
    canvas.screen_transition(TransitionStyle::Crossfade, Some(region));
    canvas.unbatch();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::save::ShipManifest;
    use procgen::{StarColor, StarDesc, StarSize};
    use renderer::RecordingCanvas;

    fn test_ctx() -> SimContext {
        let star = StarDesc::new(IVec2::new(321, 654), StarColor::Red, StarSize::Dwarf);
        let opts = Options {
            textured_planets: false,
            ..Options::default()
        };
        SimContext::new(star, opts, ShipManifest::default())
    }

    #[test]
    fn transition_draw_is_batched_around_the_fade() {
        let mut ctx = test_ctx();
        let mut canvas = RecordingCanvas::new();
        draw_system_transition(&mut ctx, &mut canvas, false);
        assert_eq!(canvas.transition_count(), 1);
        // Transition fires before the unbatch.
        let ops = &canvas.ops;
        let t = ops
            .iter()
            .position(|op| matches!(op, renderer::DrawOp::Transition(_)))
            .unwrap();
        assert!(matches!(ops[t + 1], renderer::DrawOp::Unbatch));
    }

    #[test]
    fn outer_draw_stamps_every_planet_plus_ship_and_sun() {
        let mut ctx = test_ctx();
        let mut canvas = RecordingCanvas::new();
        draw_outer_system(&mut ctx, &mut canvas);
        // sun + ship + one stamp per planet
        assert_eq!(canvas.stamp_count(), ctx.planets.len() + 2);
    }

    #[test]
    fn sun_tier_follows_zoom() {
        let mut ctx = test_ctx();
        ctx.zoom_radius = MAX_ZOOM_RADIUS;
        let far = animate_sun(&mut ctx).frame.extent().width;
        ctx.zoom_radius = crate::coords::MIN_ZOOM_RADIUS;
        let near = animate_sun(&mut ctx).frame.extent().width;
        assert!(near > far);
    }
}
