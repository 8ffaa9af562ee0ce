//! Surface entities: components, spawning, and per-tick advancement of
//! the transient object list.

use engine_core::{
    cosine, facing_to_angle, normalize_facing, sine, world_to_velocity, IVec2, Lifespan,
    RandomContext, Velocity, Vitality,
};
use hecs::{Entity, World};
use procgen::analysis::{ElementCategory, PlanetInfo};
use procgen::consts::{MAG_SHIFT, MAP_HEIGHT, MAP_WIDTH};
use procgen::lifeforms::{Awareness, CREATURES};

/// Visible surface viewport (pixels).
pub const SURFACE_WIDTH: i32 = crate::coords::SIS_SCREEN_WIDTH;
pub const SURFACE_HEIGHT: i32 =
    crate::coords::SIS_SCREEN_HEIGHT - MAP_HEIGHT - 5;

/// Full surface extent in world units. X wraps, Y clamps.
pub const WORLD_WIDTH: i32 = MAP_WIDTH << MAG_SHIFT;
pub const WORLD_HEIGHT: i32 = MAP_HEIGHT << MAG_SHIFT;

/// World-space position on the planet surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePos(pub IVec2);

/// Natural disaster kinds; the discriminant doubles as the hazard
/// shield bit (bio is bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisasterKind {
    Earthquake,
    Lightning,
    LavaSpot,
}

#[derive(Debug, Clone, Copy)]
pub struct Disaster {
    pub kind: DisasterKind,
    /// Most lightning never strikes the lander.
    pub harmless: bool,
}

/// A roaming lifeform.
#[derive(Debug, Clone, Copy)]
pub struct Creature {
    pub species: usize,
    /// Set once shot; aware creatures react to the lander.
    pub aware: bool,
    pub facing: i32,
    /// Ticks until the next heading decision.
    pub turn_ticks: u8,
}

/// A mineral deposit waiting on the surface.
#[derive(Debug, Clone, Copy)]
pub struct Deposit {
    pub element: ElementCategory,
    pub amount: u16,
}

impl Deposit {
    /// Deposit image grade by remaining quantity.
    pub fn grade(&self) -> u8 {
        if self.amount > 15 {
            2
        } else if self.amount > 7 {
            1
        } else {
            0
        }
    }
}

/// A canned (stunned) lifeform ready for pickup.
#[derive(Debug, Clone, Copy)]
pub struct BioCan {
    pub value: u8,
}

/// An energy signature on the surface.
#[derive(Debug, Clone, Copy)]
pub struct EnergyBlip;

/// A stun bolt in flight.
#[derive(Debug, Clone, Copy)]
pub struct StunBolt;

/// The lander's own death explosion.
#[derive(Debug, Clone, Copy)]
pub struct DeathExplosion;

pub fn wrap_x(x: i32) -> i32 {
    x.rem_euclid(WORLD_WIDTH)
}

pub fn clamp_y(y: i32) -> i32 {
    y.clamp(0, WORLD_HEIGHT - 1)
}

/// Shortest wrapped x distance from `from` to `to`.
pub fn world_delta_x(from: i32, to: i32) -> i32 {
    let mut d = to - from;
    if d > WORLD_WIDTH / 2 {
        d -= WORLD_WIDTH;
    } else if d < -WORLD_WIDTH / 2 {
        d += WORLD_WIDTH;
    }
    d
}

/// Populate the surface from the scan data: deposits, lifeforms, energy
/// blips. Node positions are scan-map coordinates, scaled up here.
pub fn spawn_surface_nodes(world: &mut World, info: &PlanetInfo, rng: &mut RandomContext) {
    for deposit in &info.minerals {
        world.spawn((
            SurfacePos(IVec2::new(
                deposit.loc.x << MAG_SHIFT,
                deposit.loc.y << MAG_SHIFT,
            )),
            Deposit {
                element: deposit.element,
                amount: deposit.amount,
            },
        ));
    }
    for node in &info.lifeforms {
        let spec = CREATURES[node.species];
        world.spawn((
            SurfacePos(IVec2::new(node.loc.x << MAG_SHIFT, node.loc.y << MAG_SHIFT)),
            Creature {
                species: node.species,
                aware: false,
                facing: normalize_facing(rng.next() as i32),
                turn_ticks: 0,
            },
            Vitality::new(spec.hits),
            Velocity::new(),
        ));
    }
    for node in &info.energy {
        world.spawn((
            SurfacePos(IVec2::new(node.loc.x << MAG_SHIFT, node.loc.y << MAG_SHIFT)),
            EnergyBlip,
        ));
    }
}

fn disaster_spawn_point(rng: &mut RandomContext, lander_loc: IVec2) -> IVec2 {
    let rand_val = rng.next();
    let x = (lander_loc.x + (WORLD_WIDTH - SURFACE_WIDTH * 3 / 8)
        + ((rand_val & 0xFFFF) as i32 % (SURFACE_WIDTH * 3 / 4)))
        % WORLD_WIDTH;
    let y = (lander_loc.y + (WORLD_HEIGHT - SURFACE_HEIGHT * 3 / 8)
        + (((rand_val >> 16) & 0xFFFF) as i32 % (SURFACE_HEIGHT * 3 / 4)))
        % WORLD_HEIGHT;
    IVec2::new(x, y)
}

/// Ground disaster (earthquake or lava spot) near the lander.
pub fn add_ground_disaster(world: &mut World, rng: &mut RandomContext, lander_loc: IVec2, kind: DisasterKind) {
    let pos = disaster_spawn_point(rng, lander_loc);
    match kind {
        DisasterKind::Earthquake => {
            world.spawn((
                SurfacePos(pos),
                Disaster {
                    kind,
                    harmless: false,
                },
                Lifespan::new(12),
            ));
        }
        DisasterKind::LavaSpot => {
            let facing = normalize_facing(rng.next() as i32);
            let angle = facing_to_angle(facing);
            let mut velocity = Velocity::new();
            let speed = world_to_velocity(1) / 2;
            velocity.set_components(cosine(angle, speed), sine(angle, speed));
            world.spawn((
                SurfacePos(pos),
                Disaster {
                    kind,
                    harmless: false,
                },
                Lifespan::new(20),
                velocity,
            ));
        }
        DisasterKind::Lightning => unreachable!("lightning spawns through add_lightning"),
    }
}

/// Lightning strike. Three in four bolts are harmless light shows; the
/// dangerous ones track the lander.
pub fn add_lightning(world: &mut World, rng: &mut RandomContext, lander_loc: IVec2) {
    let harmless = rng.next_bounded(100) >= 25;
    let rand_val = rng.next();
    let life = 10 + (rand_val >> 16) % 10 + 1;
    let x = (lander_loc.x + (WORLD_WIDTH - (SURFACE_WIDTH / 2 - 6))
        + ((rand_val & 0xFFFF) as i32 % (SURFACE_WIDTH - 12)))
        % WORLD_WIDTH;
    let y = (lander_loc.y + (WORLD_HEIGHT - (SURFACE_HEIGHT / 2 - 6))
        + (((rand_val >> 8) & 0xFFFF) as i32 % (SURFACE_HEIGHT - 12)))
        % WORLD_HEIGHT;
    world.spawn((
        SurfacePos(IVec2::new(x, y)),
        Disaster {
            kind: DisasterKind::Lightning,
            harmless,
        },
        Lifespan::new(life as u16),
    ));
}

/// Advance every transient entity by one tick: lifespans, creature
/// headings, velocity movement with wrap/clamp, lightning retarget.
/// Returns true when a dangerous strike connects this tick.
pub fn advance_entities(
    world: &mut World,
    rng: &mut RandomContext,
    lander_loc: IVec2,
    lander_alive: bool,
) -> bool {
    let mut kill_crew = false;
    let mut expired: Vec<Entity> = Vec::new();

    // Lifespans first; expired entities do not act this tick.
    for (entity, lifespan) in world.query_mut::<&mut Lifespan>() {
        if lifespan.tick() {
            expired.push(entity);
        }
    }
    for entity in expired {
        let _ = world.despawn(entity);
    }

    // Creature headings: periodic wander, flee/charge once aware.
    for (_, (creature, pos, velocity, vitality)) in
        world.query_mut::<(&mut Creature, &SurfacePos, &mut Velocity, &Vitality)>()
    {
        if vitality.is_dead() {
            velocity.zero();
            continue;
        }
        let spec = CREATURES[creature.species];
        if creature.turn_ticks > 0 {
            creature.turn_ticks -= 1;
        } else {
            creature.turn_ticks = 8 + (rng.next() % 16) as u8;
            let toward_lander = engine_core::arctan(
                world_delta_x(pos.0.x, lander_loc.x),
                lander_loc.y - pos.0.y,
            );
            creature.facing = if creature.aware {
                match spec.awareness {
                    Awareness::Aggressive => engine_core::angle_to_facing(toward_lander),
                    Awareness::Fearful => {
                        engine_core::angle_to_facing(toward_lander + engine_core::HALF_CIRCLE)
                    }
                    Awareness::Oblivious => normalize_facing(rng.next() as i32),
                }
            } else {
                normalize_facing(rng.next() as i32)
            };
            let angle = facing_to_angle(creature.facing);
            let speed = world_to_velocity(spec.speed as i32);
            velocity.set_components(cosine(angle, speed), sine(angle, speed));
        }
    }

    // Move everything with a velocity.
    for (_, (pos, velocity)) in world.query_mut::<(&mut SurfacePos, &mut Velocity)>() {
        let (dx, dy) = velocity.next_delta(1);
        if dx != 0 || dy != 0 {
            pos.0.x = wrap_x(pos.0.x + dx);
            pos.0.y = clamp_y(pos.0.y + dy);
        }
    }

    // Dangerous lightning follows the lander and sometimes connects.
    for (_, (disaster, pos)) in world.query_mut::<(&Disaster, &mut SurfacePos)>() {
        if disaster.kind == DisasterKind::Lightning && !disaster.harmless {
            pos.0 = lander_loc;
            if lander_alive && rng.next_bounded(100) < 10 {
                kill_crew = true;
            }
        }
    }

    kill_crew
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_x_wraps_and_y_clamps() {
        assert_eq!(wrap_x(-1), WORLD_WIDTH - 1);
        assert_eq!(wrap_x(WORLD_WIDTH), 0);
        assert_eq!(clamp_y(-5), 0);
        assert_eq!(clamp_y(WORLD_HEIGHT + 5), WORLD_HEIGHT - 1);
    }

    #[test]
    fn wrapped_delta_picks_the_short_way() {
        assert_eq!(world_delta_x(10, WORLD_WIDTH - 10), -20);
        assert_eq!(world_delta_x(WORLD_WIDTH - 10, 10), 20);
        assert_eq!(world_delta_x(100, 160), 60);
    }

    #[test]
    fn expired_entities_are_reaped() {
        let mut world = World::new();
        let mut rng = RandomContext::new(1);
        world.spawn((
            SurfacePos(IVec2::new(0, 0)),
            Disaster {
                kind: DisasterKind::Earthquake,
                harmless: false,
            },
            Lifespan::new(2),
        ));
        advance_entities(&mut world, &mut rng, IVec2::ZERO, true);
        assert_eq!(world.len(), 1);
        advance_entities(&mut world, &mut rng, IVec2::ZERO, true);
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn dangerous_lightning_tracks_the_lander() {
        let mut world = World::new();
        let mut rng = RandomContext::new(2);
        let e = world.spawn((
            SurfacePos(IVec2::new(500, 100)),
            Disaster {
                kind: DisasterKind::Lightning,
                harmless: false,
            },
            Lifespan::new(200),
        ));
        let lander = IVec2::new(42, 77);
        advance_entities(&mut world, &mut rng, lander, true);
        let pos = world.get::<&SurfacePos>(e).unwrap();
        assert_eq!(pos.0, lander);
    }
}
