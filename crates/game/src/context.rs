//! The exploration-session context: every piece of state the tick
//! functions touch, owned by one object created at system entry and
//! dropped at exit.

use engine_core::{GameClock, IVec2, RandomContext, Velocity};
use procgen::{
    generator_for_star, moon_diameter, BodyDesc, PlanetInfo, SphereTexture, StarDesc,
    SystemGenerator, PLANET_DIAMETER,
};

use crate::config::Options;
use crate::coords::{display_to_location, SIS_SCREEN_HEIGHT, SIS_SCREEN_WIDTH};
use crate::save::{SaveFields, ShipManifest};
use crate::sheets::SheetCatalog;

/// Velocity-unit speed gained per thrust application.
pub const IP_SHIP_THRUST_INCREMENT: i32 = 8;
/// Base ticks between turn steps; turning jets shave this down.
pub const IP_SHIP_TURN_WAIT: u8 = 11;
pub const IP_SHIP_TURN_DECREMENT: u8 = 3;

/// A body within the current system: planet by index, or moon of the
/// current inner system by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRef {
    Planet(usize),
    Moon(usize),
}

/// Which body array the flagship currently flies among.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseView {
    Outer,
    /// Inside the inner system of the given planet.
    Inner(usize),
}

/// Identity of a collision partner, as recorded in the cooldown.
/// Planets are 1-based; `moon` is 0 in the outer view, 1 for the inner
/// view's planet itself, n+2 for its moons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectId {
    pub planet: u8,
    pub moon: u8,
}

/// Collision cooldown state. A body the ship is already overlapping
/// must not retrigger; once the ship overlaps nothing, the cooldown
/// clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cooldown {
    Clear,
    Body(IntersectId),
    /// Every collision disabled until the ship is fully clear of all
    /// bodies (set when leaving the inner system on top of a second
    /// body).
    AllDisabled,
}

/// The flagship inside the system views.
#[derive(Debug, Clone)]
pub struct ShipState {
    /// Screen-space stamp origin.
    pub origin: IVec2,
    /// 16-way facing.
    pub facing: i32,
    pub velocity: Velocity,
    /// Universe-space location within the current view.
    pub ip_location: IVec2,
}

/// One exploration session inside a star system.
pub struct SimContext {
    pub star: StarDesc,
    pub generator: &'static dyn SystemGenerator,
    pub opts: Options,
    pub manifest: ShipManifest,
    pub sheets: SheetCatalog,

    pub sun_seed: u32,
    pub planets: Vec<BodyDesc>,
    /// Moons of the current inner system; regenerated on every entry.
    pub moons: Vec<BodyDesc>,

    pub base: BaseView,
    /// Set while in orbit around a world.
    pub orbital: Option<BodyRef>,
    /// Current zoom radius of the outer view.
    pub zoom_radius: i32,
    /// System-center location: zero in the outer view, the inner
    /// planet's outer-view location while inside its system.
    pub sun_loc: IVec2,
    pub scale_rect: engine_core::Rect,
    pub wait_intersect: Cooldown,

    pub ship: ShipState,
    pub clock: GameClock,
    pub rng: RandomContext,

    pub in_ip_flight: bool,
    pub abort: bool,

    // Flight control cadence
    pub turn_counter: u8,
    pub turn_wait: u8,
    pub thrust_counter: u8,
    pub max_ship_speed: i32,

    // Per-session animation counters
    pub sun_anim_index: usize,
    pub rotate_counter: u64,
}

impl SimContext {
    /// Enter a star system: seed the generator, build the planet roster
    /// and (if enabled) their textures. The ship starts at the bottom
    /// of the fully zoomed-out view unless restored from save fields.
    pub fn new(star: StarDesc, opts: Options, manifest: ShipManifest) -> Self {
        let generator = generator_for_star(&star);
        let mut rng = RandomContext::new(star.seed(opts.custom_seed));
        let sun_seed = rng.next();
        let planets = generator.generate_planets(&star, &mut rng);

        let ship = ShipState {
            origin: IVec2::new(SIS_SCREEN_WIDTH >> 1, SIS_SCREEN_HEIGHT - 2),
            facing: 0,
            velocity: Velocity::new(),
            ip_location: display_to_location(
                IVec2::new(SIS_SCREEN_WIDTH >> 1, SIS_SCREEN_HEIGHT - 2),
                crate::coords::MAX_ZOOM_RADIUS,
            ),
        };

        let mut ctx = Self {
            star,
            generator,
            opts,
            manifest,
            sheets: SheetCatalog::load(),
            sun_seed,
            planets,
            moons: Vec::new(),
            base: BaseView::Outer,
            orbital: None,
            zoom_radius: crate::coords::MAX_ZOOM_RADIUS,
            sun_loc: IVec2::ZERO,
            scale_rect: engine_core::Rect::default(),
            wait_intersect: Cooldown::Clear,
            ship,
            clock: GameClock::new(),
            rng,
            in_ip_flight: false,
            abort: false,
            turn_counter: 0,
            turn_wait: IP_SHIP_TURN_WAIT,
            thrust_counter: 0,
            max_ship_speed: 0,
            sun_anim_index: 0,
            rotate_counter: 0,
        };
        ctx.init_ship_characteristics();
        if ctx.opts.textured_planets {
            ctx.generate_textured_planets();
        }
        log::info!(
            "entered system at ({}, {}): {} planets",
            ctx.star.point.x,
            ctx.star.point.y,
            ctx.planets.len()
        );
        ctx
    }

    /// Derive flight characteristics from the drive fit.
    fn init_ship_characteristics(&mut self) {
        self.max_ship_speed =
            (self.manifest.fusion_thrusters as i32 + 5) * IP_SHIP_THRUST_INCREMENT;
        self.turn_wait = IP_SHIP_TURN_WAIT
            .saturating_sub(self.manifest.turning_jets * IP_SHIP_TURN_DECREMENT);
    }

    /// One-time sphere textures for every normal planet.
    fn generate_textured_planets(&mut self) {
        for planet in &mut self.planets {
            if let Some(world) = planet.world.world_type() {
                planet.surface = Some(SphereTexture::generate(
                    planet.rand_seed,
                    world,
                    PLANET_DIAMETER,
                ));
            }
        }
    }

    /// One-time sphere textures for the current moons.
    pub fn generate_textured_moons(&mut self) {
        for moon in &mut self.moons {
            if let Some(world) = moon.world.world_type() {
                moon.surface = Some(SphereTexture::generate(
                    moon.rand_seed,
                    world,
                    moon_diameter(world.size_class()),
                ));
            }
        }
    }

    pub fn body(&self, body: BodyRef) -> &BodyDesc {
        match body {
            BodyRef::Planet(i) => &self.planets[i],
            BodyRef::Moon(i) => &self.moons[i],
        }
    }

    pub fn body_mut(&mut self, body: BodyRef) -> &mut BodyDesc {
        match body {
            BodyRef::Planet(i) => &mut self.planets[i],
            BodyRef::Moon(i) => &mut self.moons[i],
        }
    }

    pub fn in_inner_system(&self) -> bool {
        matches!(self.base, BaseView::Inner(_))
    }

    pub fn in_orbit(&self) -> bool {
        self.orbital.is_some()
    }

    /// Universe-space location of a planet derived from its current
    /// outer-view screen origin (the planet may have orbited since
    /// generation).
    pub fn planet_outer_location(&self, planet_index: usize) -> IVec2 {
        display_to_location(self.planets[planet_index].image.origin, self.zoom_radius)
    }

    /// Orbit radius from the sun for a body (moons use their parent's).
    pub fn orbit_radius_of(&self, body: BodyRef) -> i32 {
        match body {
            BodyRef::Planet(i) => self.planets[i].radius,
            BodyRef::Moon(_) => match self.base {
                BaseView::Inner(p) => self.planets[p].radius,
                // A moon reference only exists inside an inner system.
                BaseView::Outer => unreachable!("moon reference in outer view"),
            },
        }
    }

    /// Orbital-entry data for a world.
    pub fn orbital_info(&self, body: BodyRef) -> PlanetInfo {
        self.generator
            .generate_orbital(self.body(body), self.orbit_radius_of(body))
    }

    /// Capture the persisted location fields.
    pub fn save_fields(&self) -> SaveFields {
        let ip_planet = match self.base {
            BaseView::Outer => 0,
            BaseView::Inner(p) => p as u8 + 1,
        };
        let in_orbit = match self.orbital {
            None => 0,
            Some(BodyRef::Planet(_)) => 1,
            Some(BodyRef::Moon(m)) => m as u8 + 2,
        };
        SaveFields {
            star_pt: (self.star.point.x, self.star.point.y),
            ip_planet,
            in_orbit,
            ship_facing: self.ship.facing as u8,
            ip_location: (self.ship.ip_location.x, self.ship.ip_location.y),
            clock_ticks: self.clock.ticks(),
        }
    }

    /// Tear down the generated system state (textures first, so the
    /// expensive buffers go even if the caller holds the context a
    /// little longer).
    pub fn free_solar_sys(&mut self) {
        for planet in &mut self.planets {
            planet.release_surface();
        }
        for moon in &mut self.moons {
            moon.release_surface();
        }
        self.in_ip_flight = false;
    }
}

impl Drop for SimContext {
    fn drop(&mut self) {
        self.generator.uninit_npcs(&self.star);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::{StarColor, StarSize};

    fn test_ctx() -> SimContext {
        let star = StarDesc::new(IVec2::new(1000, 2000), StarColor::Yellow, StarSize::Giant);
        let opts = Options {
            textured_planets: false,
            ..Options::default()
        };
        SimContext::new(star, opts, ShipManifest::default())
    }

    #[test]
    fn context_reload_reproduces_planets() {
        let a = test_ctx();
        let b = test_ctx();
        assert_eq!(a.planets.len(), b.planets.len());
        for (x, y) in a.planets.iter().zip(&b.planets) {
            assert_eq!(x.world, y.world);
            assert_eq!(x.rand_seed, y.rand_seed);
        }
    }

    #[test]
    fn save_fields_reflect_view_state() {
        let mut ctx = test_ctx();
        assert_eq!(ctx.save_fields().ip_planet, 0);
        ctx.base = BaseView::Inner(2);
        ctx.orbital = Some(BodyRef::Moon(1));
        let fields = ctx.save_fields();
        assert_eq!(fields.ip_planet, 3);
        assert_eq!(fields.in_orbit, 3);
    }

    #[test]
    fn textured_planets_get_surfaces() {
        let star = StarDesc::new(IVec2::new(17, 4), StarColor::Yellow, StarSize::Giant);
        let ctx = SimContext::new(star, Options::default(), ShipManifest::default());
        for planet in &ctx.planets {
            if planet.world.world_type().is_some() {
                assert!(planet.surface.is_some());
            }
        }
    }
}
