//! Per-frame orbit validation: body positions, screen origins, and the
//! memoized frame-bucket selection.

use engine_core::{angle_to_facing, arctan, IVec2, Rect};
use procgen::{BodyDesc, BodyFrame, FrameBucket, JunkFrame, WorldClass};

use crate::context::{BaseView, SimContext};
use crate::coords::{DISPLAY_FACTOR, MAX_ZOOM_RADIUS, MIN_ZOOM_RADIUS};

/// Numerator/denominator triple describing how a view scales orbits.
#[derive(Debug, Clone, Copy)]
pub struct OrbitParams {
    pub size_numer: i32,
    pub dy_numer: i32,
    pub denom: i32,
}

/// Per-frame inputs to validation that do not live on the body.
#[derive(Debug, Clone, Copy)]
pub struct OrbitEnv {
    pub days: f64,
    pub orbiting_planets: bool,
    pub is_moon: bool,
    /// Sun-relative location of the parent planet; lights moons from
    /// the sun's direction.
    pub parent_location: IVec2,
}

/// Bounding rect of an orbit ellipse. The ellipse is squashed 2:1
/// (`a^2 = 2 b^2`), which is why height is half of width.
pub fn get_orbit_rect(dx: i32, dy: i32, radius: i32, xnumer: i32, ynumer: i32, denom: i32) -> Rect {
    let cx = (crate::coords::SIS_SCREEN_WIDTH >> 1) as i64;
    let cy = (crate::coords::SIS_SCREEN_HEIGHT >> 1) as i64;
    let corner_x = cx + (-dx as i64) * xnumer as i64 / denom as i64;
    let corner_y = cy + (-dy as i64) * ynumer as i64 / denom as i64;
    let width = radius as i64 * (xnumer as i64 * 2) / denom as i64;
    Rect::new(
        IVec2::new(corner_x as i32, corner_y as i32),
        engine_core::Extent::new(width as i32, (width >> 1) as i32),
    )
}

/// Orbit rect of a specific body under the given view params.
pub fn get_planet_orbit_rect(body: &BodyDesc, params: OrbitParams) -> Rect {
    let mut dx = body.radius;
    let mut dy = body.radius;
    if params.size_numer > DISPLAY_FACTOR {
        // Inner view: the ellipse is centered on the body itself.
        dx += body.location.x;
        dy = (dy + body.location.y) << 1;
    }
    get_orbit_rect(
        dx,
        dy,
        body.radius,
        params.size_numer,
        params.dy_numer,
        params.denom,
    )
}

fn junk_frame_for(world: WorldClass) -> JunkFrame {
    match world {
        WorldClass::SaMatra => JunkFrame::SaMatra,
        WorldClass::DestroyedStarbase => JunkFrame::DestroyedStarbase,
        WorldClass::PrecursorStarbase => JunkFrame::PrecursorStarbase,
        _ => JunkFrame::HierarchyStarbase,
    }
}

/// Validate one body: recompute its orbit location (when orbiting is
/// enabled), its screen origin, and its frame selection. Returns true
/// only when the frame actually changed: the memoization contract that
/// keeps expensive sprite/texture regeneration off the common path.
pub fn validate_orbit(body: &mut BodyDesc, params: OrbitParams, env: &OrbitEnv) -> bool {
    if env.orbiting_planets {
        // Advance the orbit phase with game time. The -PI/2 keeps phase
        // zero pointing the same way the initial polar placement did.
        let angle =
            (body.angle as f64 + env.days * body.orb_speed) * std::f64::consts::PI / 32.0
                - std::f64::consts::FRAC_PI_2;
        body.location = IVec2::new(
            (angle.cos() * body.radius as f64) as i32,
            (angle.sin() * body.radius as f64) as i32,
        );
    }

    if params.size_numer <= DISPLAY_FACTOR {
        // All planets in the outer view, and moons in the inner view,
        // position on their orbit ellipse.
        let r = get_planet_orbit_rect(body, params);
        let mut corner = r.corner;
        corner.x += r.extent.width >> 1;
        corner.y += r.extent.height >> 1;
        corner.x +=
            (body.location.x as i64 * params.size_numer as i64 / params.denom as i64) as i32;
        corner.y +=
            (body.location.y as i64 * (params.size_numer / 2) as i64 / params.denom as i64) as i32;
        body.image.origin = corner;
    }

    match body.world.world_type() {
        Some(world) => {
            let mut size = world.size_class().base_bucket();
            if params.size_numer > DISPLAY_FACTOR {
                size += 3;
            } else if env.is_moon {
                size += 2;
            } else if params.denom <= (MAX_ZOOM_RADIUS >> 2) {
                size += 1;
                if params.denom == MIN_ZOOM_RADIUS {
                    size += 1;
                }
            }

            let light_source = if env.is_moon {
                env.parent_location
            } else {
                body.location
            };
            let facing = angle_to_facing(arctan(light_source.x, light_source.y)) as u8;

            let bucket = FrameBucket { size, facing };
            if body.frame_bucket == Some(bucket) {
                return false;
            }
            body.frame_bucket = Some(bucket);
            body.image.frame = Some(BodyFrame::Orbital(bucket));
            true
        }
        None => {
            let frame = BodyFrame::Junk(junk_frame_for(body.world));
            if body.image.frame == Some(frame) {
                return false;
            }
            body.image.frame = Some(frame);
            true
        }
    }
}

/// View params for planets in the outer view.
pub fn outer_params(zoom_radius: i32) -> OrbitParams {
    OrbitParams {
        size_numer: DISPLAY_FACTOR,
        dy_numer: DISPLAY_FACTOR / 4,
        denom: zoom_radius,
    }
}

/// Validate every planet against the outer view.
pub fn validate_orbits(ctx: &mut SimContext) {
    let env = OrbitEnv {
        days: ctx.clock.days_elapsed(),
        orbiting_planets: ctx.opts.orbiting_planets,
        is_moon: false,
        parent_location: IVec2::ZERO,
    };
    let params = outer_params(ctx.zoom_radius);
    for planet in &mut ctx.planets {
        validate_orbit(planet, params, &env);
    }
}

/// Validate the inner view: the planet fills the frame, moons orbit it.
pub fn validate_inner_orbits(ctx: &mut SimContext) {
    let BaseView::Inner(planet_index) = ctx.base else {
        panic!("validate_inner_orbits outside an inner system");
    };
    let days = ctx.clock.days_elapsed();
    let orbiting = ctx.opts.orbiting_planets;

    let planet = &mut ctx.planets[planet_index];
    let planet_params = OrbitParams {
        size_numer: DISPLAY_FACTOR * 4,
        dy_numer: DISPLAY_FACTOR,
        denom: planet.radius,
    };
    validate_orbit(
        planet,
        planet_params,
        &OrbitEnv {
            days,
            orbiting_planets: orbiting,
            is_moon: false,
            parent_location: IVec2::ZERO,
        },
    );
    let parent_location = planet.location;

    let moon_env = OrbitEnv {
        days,
        orbiting_planets: orbiting,
        is_moon: true,
        parent_location,
    };
    let moon_params = OrbitParams {
        size_numer: 2,
        dy_numer: 1,
        denom: 2,
    };
    for moon in &mut ctx.moons {
        validate_orbit(moon, moon_params, &moon_env);
    }
}
