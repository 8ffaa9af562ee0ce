//! The planetside lander mini-simulation.
//!
//! A nested real-time loop with its own tick rate, entered from the
//! orbital menu and exited by takeoff or by losing the whole crew. The
//! surface is a horizontally wrapping strip; transient objects
//! (disasters, lifeforms, stun bolts) live in a `hecs` world for the
//! duration of one descent.

pub mod objects;
pub mod pickup;

use audio::{AudioSink, SoundCue, GAME_SOUND_PRIORITY};
use engine_core::{
    cosine, facing_to_angle, normalize_facing, sine, world_to_velocity, IVec2, Lifespan,
    RandomContext, Velocity, Vitality,
};
use hecs::{Entity, World};
use input::InputFrame;
use procgen::analysis::{thermal_hazard_rating, PlanetInfo, NUM_ELEMENT_CATEGORIES};
use procgen::consts::MAG_SHIFT;
use procgen::lifeforms::{CREATURES, DANGER_CHANCES};
use renderer::{stamps_intersect, Canvas, Stamp};

use crate::config::Options;
use crate::save::ShipManifest;
use crate::sheets::SheetCatalog;
use objects::*;
use pickup::{pickup_bio, pickup_minerals, HoldState, PickupResult};

/// Lander crew per descent.
pub const LANDER_CREW_CAPACITY: u8 = 12;

const DAMAGE_CYCLE: u8 = 6;
const EXPLOSION_LIFE: u16 = 10;
/// Hold on the wreck for two seconds of planetside time.
const EXPLOSION_WAIT_TICKS: u16 = 70;
const WARMUP_TICKS: u16 = 20;
const LANDING_TICKS: u16 = 36;
const TAKEOFF_TICKS: u16 = 36;
const SHUTTLE_TURN_WAIT: u8 = 3;
const SHUTTLE_FIRE_WAIT: u8 = 14;
const LANDER_SPEED_DENOM: i32 = 10;
const BOLT_LIFE: u16 = 10;

/// Hazards that can cost crew; the discriminant is the shield bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    Biological = 0,
    Earthquake = 1,
    Lightning = 2,
    LavaSpot = 3,
}

impl HazardKind {
    fn sound(self) -> SoundCue {
        match self {
            HazardKind::Biological => SoundCue::Biological,
            HazardKind::Earthquake => SoundCue::Earthquake,
            HazardKind::Lightning => SoundCue::Lightning,
            HazardKind::LavaSpot => SoundCue::LavaSpot,
        }
    }
}

/// Spawn chance out of 256 per tick, indexed by hazard rating 0..7.
const TECTONICS_CHANCE_TAB: [u8; 8] = [0, 0, 3, 6, 12, 24, 48, 96];
const WEATHER_CHANCE_TAB: [u8; 8] = [0, 0, 3, 6, 9, 18, 36, 72];
const FIRE_CHANCE_TAB: [u8; 8] = [0, 0, 3, 6, 12, 36, 72, 144];

fn hazard_chance(kind: HazardKind, rating: u8) -> u8 {
    let rating = rating.min(7) as usize;
    match kind {
        HazardKind::Earthquake => TECTONICS_CHANCE_TAB[rating],
        HazardKind::Lightning => WEATHER_CHANCE_TAB[rating],
        HazardKind::LavaSpot => FIRE_CHANCE_TAB[rating],
        HazardKind::Biological => 0,
    }
}

/// Lifecycle of one descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanderPhase {
    /// Pre-launch spin-up aboard the ship.
    Warmup { ticks: u16 },
    /// Animated descent; the crew bar fills on the way down.
    Landing { ticks: u16 },
    /// On the ground, under player control.
    Active,
    /// Crew lost; unskippable death sequence.
    Exploding { ticks: u16 },
    /// Taking off back to orbit.
    Returning { ticks: u16 },
    Done,
}

/// What the descent produced, applied to the ship on return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanderOutcome {
    pub survived: bool,
    pub crew_returned: u8,
    pub element_amounts: [u16; NUM_ELEMENT_CATEGORIES],
    pub element_total: u16,
    pub bio: u16,
}

/// One lander descent onto a world's surface.
pub struct LanderSession {
    world: World,
    sheets: SheetCatalog,
    rng: RandomContext,

    pub phase: LanderPhase,
    pub crew: u8,
    damage_ticks: u8,
    pub hold: HoldState,
    pub energy_retrieved: u8,

    /// Lander position in surface world units.
    pub loc: IVec2,
    pub facing: i32,
    velocity: Velocity,
    turn_ticks: u8,
    weapon_ticks: u8,

    shields: u8,
    partial_pickup: bool,
    improved_speed: bool,
    improved_shot: bool,

    tectonics_chance: u8,
    weather_chance: u8,
    fire_chance: u8,
}

impl LanderSession {
    /// Start a descent at `landing` (scan-map coordinates). `seed`
    /// should derive from the world's seed plus the landing spot so a
    /// replayed descent rolls the same surface.
    pub fn new(
        info: &PlanetInfo,
        manifest: &ShipManifest,
        opts: &Options,
        landing: IVec2,
        seed: u32,
        sheets: SheetCatalog,
    ) -> Self {
        let mut rng = RandomContext::new(seed);

        let mut hold_cap = opts.lander_hold.capacity();
        if manifest.improved_lander_cargo {
            hold_cap <<= 1;
        }
        let max_element_level = hold_cap.min(manifest.bay_remaining());
        let max_bio_level = opts.lander_hold.capacity();

        let mut world = World::new();
        spawn_surface_nodes(&mut world, info, &mut rng);

        let facing = normalize_facing(rng.next() as i32);
        let mut session = Self {
            world,
            sheets,
            rng,
            phase: LanderPhase::Warmup {
                ticks: WARMUP_TICKS,
            },
            crew: 0,
            damage_ticks: 0,
            hold: HoldState::new(max_element_level, max_bio_level),
            energy_retrieved: 0,
            loc: IVec2::new(
                wrap_x(landing.x << MAG_SHIFT),
                clamp_y(landing.y << MAG_SHIFT),
            ),
            facing,
            velocity: Velocity::new(),
            turn_ticks: 0,
            weapon_ticks: 0,
            shields: manifest.lander_shields,
            partial_pickup: opts.partial_pickup,
            improved_speed: manifest.improved_lander_speed,
            improved_shot: manifest.improved_lander_shot,
            tectonics_chance: hazard_chance(HazardKind::Earthquake, info.tectonics),
            weather_chance: hazard_chance(HazardKind::Lightning, info.weather),
            fire_chance: hazard_chance(
                HazardKind::LavaSpot,
                thermal_hazard_rating(info.temperature),
            ),
        };
        session.point_velocity_along_facing();
        session
    }

    /// One planetside tick at `PLANET_SIDE_RATE`. Returns true once the
    /// session is over (wrecked or back in orbit).
    pub fn tick(
        &mut self,
        input: InputFrame,
        canvas: &mut dyn Canvas,
        audio: &mut dyn AudioSink,
    ) -> bool {
        match self.phase {
            LanderPhase::Warmup { ticks } => {
                if ticks == 0 {
                    self.phase = LanderPhase::Landing {
                        ticks: LANDING_TICKS,
                    };
                    audio.play_sound(SoundCue::LanderDeparts, None, GAME_SOUND_PRIORITY);
                } else {
                    self.phase = LanderPhase::Warmup { ticks: ticks - 1 };
                }
            }
            LanderPhase::Landing { ticks } => {
                // Crew boards on the way down.
                if ticks % 3 == 0 && self.crew < LANDER_CREW_CAPACITY {
                    self.crew += 1;
                }
                if ticks == 0 {
                    while self.crew < LANDER_CREW_CAPACITY {
                        self.crew += 1;
                    }
                    self.phase = LanderPhase::Active;
                } else {
                    self.phase = LanderPhase::Landing { ticks: ticks - 1 };
                }
            }
            LanderPhase::Active => self.active_tick(input, audio),
            LanderPhase::Exploding { ticks } => {
                self.advance_world(audio);
                if ticks >= EXPLOSION_LIFE + EXPLOSION_WAIT_TICKS {
                    self.phase = LanderPhase::Done;
                } else {
                    self.phase = LanderPhase::Exploding { ticks: ticks + 1 };
                }
            }
            LanderPhase::Returning { ticks } => {
                if ticks == 0 {
                    audio.play_sound(SoundCue::LanderReturns, None, GAME_SOUND_PRIORITY);
                    self.phase = LanderPhase::Done;
                } else {
                    self.phase = LanderPhase::Returning { ticks: ticks - 1 };
                }
            }
            LanderPhase::Done => {}
        }

        self.draw_surface(canvas);
        matches!(self.phase, LanderPhase::Done)
    }

    fn active_tick(&mut self, input: InputFrame, audio: &mut dyn AudioSink) {
        if self.crew > 0 && input.escape {
            // Take off: hold contents transfer on return to orbit.
            audio.play_sound(SoundCue::LanderDeparts, None, GAME_SOUND_PRIORITY);
            self.phase = LanderPhase::Returning {
                ticks: TAKEOFF_TICKS,
            };
            return;
        }

        if self.crew == 0 && self.damage_ticks == 0 {
            // Dead, damage flash finished: start the death sequence.
            self.start_explosion(audio);
            return;
        }

        let mut dx = 0;
        let mut dy = 0;
        if self.crew > 0 {
            if self.turn_ticks > 0 {
                self.turn_ticks -= 1;
            } else if input.left || input.right {
                self.facing = normalize_facing(self.facing + if input.left { -1 } else { 1 });
                self.point_velocity_along_facing();
                self.turn_ticks = SHUTTLE_TURN_WAIT;
            }

            if input.thrust {
                let d = self.velocity.next_delta(1);
                dx = d.0;
                dy = d.1;
            }

            if self.weapon_ticks > 0 {
                self.weapon_ticks -= 1;
            } else if input.fire {
                self.fire_stun_bolt(audio);
                self.weapon_ticks = if self.improved_shot {
                    SHUTTLE_FIRE_WAIT >> 1
                } else {
                    SHUTTLE_FIRE_WAIT
                };
            }
        }

        self.scroll(dx, dy);
        self.spawn_disasters(audio);
        let struck = self.advance_world(audio);
        if struck {
            self.delta_crew(HazardKind::Lightning, audio);
        }
        self.collision_pass(audio);

        if self.damage_ticks > 0 {
            self.damage_ticks -= 1;
        }
    }

    fn point_velocity_along_facing(&mut self) {
        let numer = world_to_velocity(2 * if self.improved_speed { 14 } else { 8 });
        let angle = facing_to_angle(self.facing);
        self.velocity.set_components(
            cosine(angle, numer) / LANDER_SPEED_DENOM,
            sine(angle, numer) / LANDER_SPEED_DENOM,
        );
    }

    /// Move the lander: x wraps around the planet, y stops at the
    /// poles (and kills the velocity carry so the lander doesn't creep).
    fn scroll(&mut self, dx: i32, dy: i32) {
        let new_y = self.loc.y + dy;
        if new_y < 0 {
            self.loc.y = 0;
            self.velocity.zero();
            self.point_velocity_along_facing();
        } else if new_y > WORLD_HEIGHT - 1 {
            self.loc.y = WORLD_HEIGHT - 1;
            self.velocity.zero();
            self.point_velocity_along_facing();
        } else {
            self.loc.y = new_y;
        }
        self.loc.x = wrap_x(self.loc.x + dx);
    }

    fn spawn_disasters(&mut self, audio: &mut dyn AudioSink) {
        let rand_val = self.rng.next();
        if ((rand_val >> 16) & 0xFF) < self.fire_chance as u32 {
            add_ground_disaster(&mut self.world, &mut self.rng, self.loc, DisasterKind::LavaSpot);
            audio.play_sound(SoundCue::LavaSpot, None, GAME_SOUND_PRIORITY);
        }
        if ((rand_val >> 8) & 0xFF) < self.tectonics_chance as u32 {
            add_ground_disaster(&mut self.world, &mut self.rng, self.loc, DisasterKind::Earthquake);
            audio.play_sound(SoundCue::Earthquake, None, GAME_SOUND_PRIORITY);
        }
        if (rand_val & 0xFF) < self.weather_chance as u32 {
            add_lightning(&mut self.world, &mut self.rng, self.loc);
            audio.play_sound(SoundCue::Lightning, None, GAME_SOUND_PRIORITY);
        }
    }

    fn advance_world(&mut self, _audio: &mut dyn AudioSink) -> bool {
        let alive = self.crew > 0 && self.phase == LanderPhase::Active;
        advance_entities(&mut self.world, &mut self.rng, self.loc, alive)
    }

    fn fire_stun_bolt(&mut self, audio: &mut dyn AudioSink) {
        let angle = facing_to_angle(self.facing);
        let mut velocity = Velocity::new();
        let speed = world_to_velocity(6);
        velocity.set_components(cosine(angle, speed), sine(angle, speed));
        let muzzle = IVec2::new(
            wrap_x(self.loc.x + cosine(angle, 8)),
            clamp_y(self.loc.y + sine(angle, 8)),
        );
        self.world
            .spawn((SurfacePos(muzzle), StunBolt, velocity, Lifespan::new(BOLT_LIFE)));
        audio.play_sound(SoundCue::LanderShoots, None, GAME_SOUND_PRIORITY);
    }

    /// Screen-space stamp origin for a surface position, relative to
    /// the lander pinned at viewport center.
    fn screen_origin(&self, pos: IVec2) -> IVec2 {
        IVec2::new(
            SURFACE_WIDTH / 2 + world_delta_x(self.loc.x, pos.x),
            SURFACE_HEIGHT / 2 + (pos.y - self.loc.y),
        )
    }

    fn lander_stamp(&self) -> Stamp {
        Stamp::new(
            IVec2::new(SURFACE_WIDTH / 2, SURFACE_HEIGHT / 2),
            self.sheets.lander_frame(self.facing),
        )
    }

    /// Stun bolts against lifeforms, then everything against the
    /// lander.
    fn collision_pass(&mut self, audio: &mut dyn AudioSink) {
        let lander_stamp = self.lander_stamp();

        // Bolt hits first, so a canned critter is collectable the same
        // tick.
        let bolts: Vec<(Entity, IVec2)> = self
            .world
            .query::<(&StunBolt, &SurfacePos)>()
            .iter()
            .map(|(e, (_, p))| (e, p.0))
            .collect();
        let creatures: Vec<(Entity, IVec2, usize)> = self
            .world
            .query::<(&Creature, &SurfacePos, &Vitality)>()
            .iter()
            .filter(|(_, (_, _, v))| !v.is_dead())
            .map(|(e, (c, p, _))| (e, p.0, c.species))
            .collect();

        for (bolt, bolt_pos) in bolts {
            let bolt_stamp = Stamp::new(
                self.screen_origin(bolt_pos),
                renderer::FrameRef::new(self.sheets.shot.clone(), 0),
            );
            for &(critter, critter_pos, species) in &creatures {
                let critter_stamp = Stamp::new(
                    self.screen_origin(critter_pos),
                    self.sheets.creature_frame(species),
                );
                if !stamps_intersect(&bolt_stamp, &critter_stamp) {
                    continue;
                }
                self.shot_creature(critter, species, audio);
                let _ = self.world.despawn(bolt);
                break;
            }
        }

        if self.crew == 0 || self.phase != LanderPhase::Active {
            return;
        }

        // Disasters touching the lander.
        let disasters: Vec<(DisasterKind, IVec2)> = self
            .world
            .query::<(&Disaster, &SurfacePos)>()
            .iter()
            .map(|(_, (d, p))| (d.kind, p.0))
            .collect();
        for (kind, pos) in disasters {
            let frame = match kind {
                DisasterKind::Earthquake => renderer::FrameRef::new(self.sheets.quake.clone(), 0),
                DisasterKind::LavaSpot => renderer::FrameRef::new(self.sheets.lava.clone(), 0),
                // Dangerous lightning is handled by its own strike roll.
                DisasterKind::Lightning => continue,
            };
            let stamp = Stamp::new(self.screen_origin(pos), frame);
            if stamps_intersect(&lander_stamp, &stamp) && self.rng.next_bounded(100) < 25 {
                let hazard = match kind {
                    DisasterKind::Earthquake => HazardKind::Earthquake,
                    _ => HazardKind::LavaSpot,
                };
                audio.play_sound(hazard.sound(), None, GAME_SOUND_PRIORITY);
                self.delta_crew(hazard, audio);
            }
        }

        // Live creatures brushing the lander.
        let creatures: Vec<(IVec2, usize)> = self
            .world
            .query::<(&Creature, &SurfacePos, &Vitality)>()
            .iter()
            .filter(|(_, (_, _, v))| !v.is_dead())
            .map(|(_, (c, p, _))| (p.0, c.species))
            .collect();
        for (pos, species) in creatures {
            let stamp = Stamp::new(self.screen_origin(pos), self.sheets.creature_frame(species));
            if !stamps_intersect(&lander_stamp, &stamp) {
                continue;
            }
            let danger = CREATURES[species].danger as usize;
            if self.rng.next_bounded(128) < DANGER_CHANCES[danger] {
                audio.play_sound(SoundCue::Biological, None, GAME_SOUND_PRIORITY);
                self.delta_crew(HazardKind::Biological, audio);
            }
        }

        // Pickups: canisters, deposits, energy blips.
        let cans: Vec<(Entity, IVec2, u8)> = self
            .world
            .query::<(&BioCan, &SurfacePos)>()
            .iter()
            .map(|(e, (c, p))| (e, p.0, c.value))
            .collect();
        for (can, pos, value) in cans {
            let stamp = Stamp::new(
                self.screen_origin(pos),
                renderer::FrameRef::new(self.sheets.biocan.clone(), 0),
            );
            if !stamps_intersect(&lander_stamp, &stamp) {
                continue;
            }
            match pickup_bio(&mut self.hold, value as u16, self.partial_pickup) {
                PickupResult::Full => {
                    audio.play_sound(SoundCue::LanderFull, None, GAME_SOUND_PRIORITY);
                }
                PickupResult::Taken { .. } => {
                    audio.play_sound(SoundCue::LanderPickup, None, GAME_SOUND_PRIORITY);
                    let _ = self.world.despawn(can);
                }
            }
        }

        let deposits: Vec<(Entity, IVec2, u8)> = self
            .world
            .query::<(&Deposit, &SurfacePos)>()
            .iter()
            .map(|(e, (d, p))| (e, p.0, d.grade()))
            .collect();
        for (entity, pos, grade) in deposits {
            let stamp = Stamp::new(self.screen_origin(pos), self.sheets.deposit_frame(grade));
            if !stamps_intersect(&lander_stamp, &stamp) {
                continue;
            }
            let result = {
                let mut deposit = self
                    .world
                    .get::<&mut Deposit>(entity)
                    .expect("deposit vanished mid-pass");
                pickup_minerals(&mut self.hold, &mut *deposit, self.partial_pickup)
            };
            match result {
                PickupResult::Full => {
                    audio.play_sound(SoundCue::LanderFull, None, GAME_SOUND_PRIORITY);
                }
                PickupResult::Taken { consumed, .. } => {
                    audio.play_sound(SoundCue::LanderPickup, None, GAME_SOUND_PRIORITY);
                    if consumed {
                        let _ = self.world.despawn(entity);
                    }
                }
            }
        }

        let blips: Vec<(Entity, IVec2)> = self
            .world
            .query::<(&EnergyBlip, &SurfacePos)>()
            .iter()
            .map(|(e, (_, p))| (e, p.0))
            .collect();
        for (entity, pos) in blips {
            let stamp = Stamp::new(
                self.screen_origin(pos),
                renderer::FrameRef::new(self.sheets.biocan.clone(), 0),
            );
            if stamps_intersect(&lander_stamp, &stamp) {
                self.energy_retrieved += 1;
                audio.play_sound(SoundCue::LanderPickup, None, GAME_SOUND_PRIORITY);
                let _ = self.world.despawn(entity);
            }
        }
    }

    fn shot_creature(&mut self, critter: Entity, species: usize, audio: &mut dyn AudioSink) {
        // An earlier bolt this pass may already have canned it.
        let canned = {
            let Ok(mut vitality) = self.world.get::<&mut Vitality>(critter) else {
                return;
            };
            vitality.hit(1)
        };
        if canned {
            let value = CREATURES[species].value;
            let pos = self
                .world
                .get::<&SurfacePos>(critter)
                .map(|p| p.0)
                .expect("creature without position");
            let _ = self.world.despawn(critter);
            self.world.spawn((SurfacePos(pos), BioCan { value }));
            audio.play_sound(SoundCue::LifeformCanned, None, GAME_SOUND_PRIORITY);
        } else {
            if let Ok(mut creature) = self.world.get::<&mut Creature>(critter) {
                creature.aware = true;
                creature.turn_ticks = 0;
            }
            audio.play_sound(SoundCue::LanderHits, None, GAME_SOUND_PRIORITY);
        }
    }

    /// Lose one crew member to a hazard, unless the matching shield
    /// absorbs it (shields fail one time in twenty).
    fn delta_crew(&mut self, hazard: HazardKind, audio: &mut dyn AudioSink) {
        if self.crew == 0 {
            return;
        }
        let shielded = self.shields & (1 << hazard as u8) != 0;
        if !shielded || self.rng.next_bounded(100) >= 95 {
            self.crew -= 1;
            self.damage_ticks = DAMAGE_CYCLE;
            audio.play_sound(SoundCue::LanderInjured, None, GAME_SOUND_PRIORITY);
        }
    }

    fn start_explosion(&mut self, audio: &mut dyn AudioSink) {
        audio.play_sound(SoundCue::LanderDestroyed, None, GAME_SOUND_PRIORITY + 1);
        self.world
            .spawn((SurfacePos(self.loc), DeathExplosion, Lifespan::new(EXPLOSION_LIFE)));
        self.scatter_deposits();
        self.phase = LanderPhase::Exploding { ticks: 0 };
    }

    /// Everything scavenged this trip falls back out onto the surface
    /// around the wreck.
    fn scatter_deposits(&mut self) {
        let grabbed = std::mem::take(&mut self.hold.grabbed_nodes);
        for (element, amount) in grabbed {
            let offset = IVec2::new(
                self.rng.next_bounded(81) as i32 - 40,
                self.rng.next_bounded(81) as i32 - 40,
            );
            self.world.spawn((
                SurfacePos(IVec2::new(
                    wrap_x(self.loc.x + offset.x),
                    clamp_y(self.loc.y + offset.y),
                )),
                Deposit { element, amount },
            ));
        }
    }

    fn draw_surface(&self, canvas: &mut dyn Canvas) {
        canvas.batch();
        canvas.clear();

        let mut stamps: Vec<Stamp> = Vec::new();
        for (_, (deposit, pos)) in self.world.query::<(&Deposit, &SurfacePos)>().iter() {
            stamps.push(Stamp::new(
                self.screen_origin(pos.0),
                self.sheets.deposit_frame(deposit.grade()),
            ));
        }
        for (_, (creature, pos, vitality)) in self
            .world
            .query::<(&Creature, &SurfacePos, &Vitality)>()
            .iter()
        {
            if !vitality.is_dead() {
                stamps.push(Stamp::new(
                    self.screen_origin(pos.0),
                    self.sheets.creature_frame(creature.species),
                ));
            }
        }
        for (_, (_, pos)) in self.world.query::<(&BioCan, &SurfacePos)>().iter() {
            stamps.push(Stamp::new(
                self.screen_origin(pos.0),
                renderer::FrameRef::new(self.sheets.biocan.clone(), 0),
            ));
        }
        for (_, (disaster, pos)) in self.world.query::<(&Disaster, &SurfacePos)>().iter() {
            let sheet = match disaster.kind {
                DisasterKind::Earthquake => &self.sheets.quake,
                DisasterKind::Lightning => &self.sheets.lightning,
                DisasterKind::LavaSpot => &self.sheets.lava,
            };
            stamps.push(Stamp::new(
                self.screen_origin(pos.0),
                renderer::FrameRef::new(sheet.clone(), 0),
            ));
        }
        for (_, (_, pos)) in self.world.query::<(&StunBolt, &SurfacePos)>().iter() {
            stamps.push(Stamp::new(
                self.screen_origin(pos.0),
                renderer::FrameRef::new(self.sheets.shot.clone(), 0),
            ));
        }
        for (_, (_, pos, life)) in self
            .world
            .query::<(&DeathExplosion, &SurfacePos, &Lifespan)>()
            .iter()
        {
            let frame = (EXPLOSION_LIFE.saturating_sub(life.remaining)) as usize;
            stamps.push(Stamp::new(
                self.screen_origin(pos.0),
                renderer::FrameRef::new(self.sheets.explosion.clone(), frame.min(9)),
            ));
        }

        for stamp in &stamps {
            canvas.draw_stamp(stamp);
        }

        if !matches!(self.phase, LanderPhase::Exploding { .. } | LanderPhase::Done) {
            canvas.draw_stamp(&self.lander_stamp());
        }
        canvas.unbatch();
    }

    /// Final tally. Only meaningful once `tick` has returned true.
    pub fn outcome(&self) -> LanderOutcome {
        let survived = self.crew > 0;
        if !survived {
            return LanderOutcome {
                survived: false,
                crew_returned: 0,
                element_amounts: [0; NUM_ELEMENT_CATEGORIES],
                element_total: 0,
                bio: 0,
            };
        }
        LanderOutcome {
            survived: true,
            crew_returned: self.crew,
            element_amounts: self.hold.element_amounts,
            element_total: self.hold.element_level,
            bio: self.hold.bio_level,
        }
    }
}

/// Fold a finished descent back into the ship. Mineral transfer is
/// clamped at the storage bay; anything past capacity is discarded (the
/// long-standing behavior; see DESIGN.md).
pub fn apply_lander_outcome(manifest: &mut ShipManifest, outcome: &LanderOutcome) {
    if !outcome.survived {
        manifest.num_landers = manifest.num_landers.saturating_sub(1);
        log::info!("lander lost with all hands");
        return;
    }

    manifest.crew = (manifest.crew + outcome.crew_returned as u16).min(manifest.crew_pod_capacity);

    let mut room = manifest.bay_remaining();
    for (index, &amount) in outcome.element_amounts.iter().enumerate() {
        let take = amount.min(room);
        if take < amount {
            log::warn!(
                "storage bay full: discarding {} units of category {}",
                amount - take,
                index
            );
        }
        manifest.element_amounts[index] += take;
        manifest.total_element_mass += take;
        room -= take;
    }
    manifest.total_bio_mass += outcome.bio;
}

#[cfg(test)]
mod tests {
    use super::*;
    use audio::{NullSink, RecordingSink};
    use procgen::analysis::{ElementCategory, MineralDeposit};
    use procgen::WorldClass;
    use procgen::WorldType;
    use renderer::RecordingCanvas;

    /// A quiet world: no hazards, no life, two known deposits.
    fn quiet_info(deposits: &[(i32, i32, u16)]) -> PlanetInfo {
        PlanetInfo {
            world: WorldClass::Normal(WorldType::Metal),
            temperature: 20,
            tectonics: 0,
            weather: 0,
            gravity: 100,
            minerals: deposits
                .iter()
                .map(|&(x, y, amount)| MineralDeposit {
                    loc: IVec2::new(x, y),
                    element: ElementCategory::BaseMetal,
                    amount,
                })
                .collect(),
            lifeforms: Vec::new(),
            energy: Vec::new(),
        }
    }

    fn active_session(info: &PlanetInfo, manifest: &ShipManifest) -> LanderSession {
        let opts = Options::default();
        let mut session =
            LanderSession::new(info, manifest, &opts, IVec2::new(60, 30), 0xD00D, SheetCatalog::load());
        session.phase = LanderPhase::Active;
        session.crew = LANDER_CREW_CAPACITY;
        session
    }

    /// End-to-end cargo conservation: deposits totaling D ≤ C end up as
    /// exactly D in the hold and, after takeoff, in the ship's bay.
    #[test]
    fn cargo_is_conserved_through_takeoff() {
        let info = quiet_info(&[(60, 30, 18), (120, 40, 12)]);
        let mut manifest = ShipManifest::default();
        let mut session = active_session(&info, &manifest);
        let mut canvas = RecordingCanvas::new();
        let mut sink = NullSink;

        // Park on the first deposit, then the second.
        session.loc = IVec2::new(60 << MAG_SHIFT, 30 << MAG_SHIFT);
        assert!(!session.tick(InputFrame::idle(), &mut canvas, &mut sink));
        session.loc = IVec2::new(120 << MAG_SHIFT, 40 << MAG_SHIFT);
        assert!(!session.tick(InputFrame::idle(), &mut canvas, &mut sink));
        assert_eq!(session.hold.element_level, 30);

        // Take off and run the ascent out.
        let mut done = session.tick(
            InputFrame {
                escape: true,
                ..InputFrame::idle()
            },
            &mut canvas,
            &mut sink,
        );
        for _ in 0..200 {
            if done {
                break;
            }
            done = session.tick(InputFrame::idle(), &mut canvas, &mut sink);
        }
        assert!(done);

        let outcome = session.outcome();
        assert!(outcome.survived);
        assert_eq!(outcome.element_total, 30);

        apply_lander_outcome(&mut manifest, &outcome);
        assert_eq!(manifest.total_element_mass, 30);
        assert_eq!(
            manifest.element_amounts[ElementCategory::BaseMetal.index()],
            30
        );
        assert_eq!(manifest.crew, ShipManifest::default().crew + 12);
    }

    /// Crew 1, unshielded hazard: crew hits zero and the session is
    /// exploding within a tick; further ticks never go below zero.
    #[test]
    fn crew_loss_boundary_triggers_explosion() {
        let info = quiet_info(&[]);
        let manifest = ShipManifest::default();
        let mut session = active_session(&info, &manifest);
        let mut canvas = RecordingCanvas::new();
        let mut sink = RecordingSink::new();

        session.crew = 1;
        session.delta_crew(HazardKind::Earthquake, &mut sink);
        assert_eq!(session.crew, 0);
        assert_eq!(sink.count(SoundCue::LanderInjured), 1);

        // Damage flash runs out, then the explosion starts.
        for _ in 0..=DAMAGE_CYCLE as u32 {
            session.tick(InputFrame::idle(), &mut canvas, &mut sink);
        }
        assert!(matches!(session.phase, LanderPhase::Exploding { .. }));
        assert_eq!(session.crew, 0);

        let mut done = false;
        for _ in 0..200 {
            done = session.tick(InputFrame::idle(), &mut canvas, &mut sink);
            assert_eq!(session.crew, 0);
            if done {
                break;
            }
        }
        assert!(done);
        assert!(!session.outcome().survived);
        assert_eq!(sink.count(SoundCue::LanderDestroyed), 1);
    }

    /// A destroyed lander scatters its scavenged cargo back out.
    #[test]
    fn explosion_scatters_collected_minerals() {
        let info = quiet_info(&[(60, 30, 9)]);
        let manifest = ShipManifest::default();
        let mut session = active_session(&info, &manifest);
        let mut canvas = RecordingCanvas::new();
        let mut sink = NullSink;

        session.loc = IVec2::new(60 << MAG_SHIFT, 30 << MAG_SHIFT);
        session.tick(InputFrame::idle(), &mut canvas, &mut sink);
        assert_eq!(session.hold.element_level, 9);

        session.crew = 0;
        session.damage_ticks = 0;
        session.tick(InputFrame::idle(), &mut canvas, &mut sink);
        assert!(matches!(session.phase, LanderPhase::Exploding { .. }));

        let surface_total: u16 = session
            .world
            .query::<&Deposit>()
            .iter()
            .map(|(_, d)| d.amount)
            .sum();
        assert_eq!(surface_total, 9);
    }

    /// Shielded hazards almost always spare the crew.
    #[test]
    fn shields_absorb_most_hits() {
        let info = quiet_info(&[]);
        let mut manifest = ShipManifest::default();
        manifest.lander_shields = 1 << HazardKind::Earthquake as u8;
        let mut session = active_session(&info, &manifest);
        let mut sink = NullSink;

        session.crew = LANDER_CREW_CAPACITY;
        for _ in 0..20 {
            session.delta_crew(HazardKind::Earthquake, &mut sink);
        }
        // 20 shielded rolls at 5% failure: overwhelmingly likely to
        // keep most of the crew; certainly not all 12 losses.
        assert!(session.crew > 0);

        // The unshielded hazard always costs crew.
        let before = session.crew;
        session.delta_crew(HazardKind::LavaSpot, &mut sink);
        assert_eq!(session.crew, before - 1);
    }

    /// Landing fills the crew bar before control is handed over.
    #[test]
    fn landing_fills_the_crew_bar() {
        let info = quiet_info(&[]);
        let manifest = ShipManifest::default();
        let opts = Options::default();
        let mut session = LanderSession::new(
            &info,
            &manifest,
            &opts,
            IVec2::new(10, 10),
            7,
            SheetCatalog::load(),
        );
        let mut canvas = RecordingCanvas::new();
        let mut sink = NullSink;
        for _ in 0..(WARMUP_TICKS + LANDING_TICKS + 4) {
            session.tick(InputFrame::idle(), &mut canvas, &mut sink);
        }
        assert_eq!(session.phase, LanderPhase::Active);
        assert_eq!(session.crew, LANDER_CREW_CAPACITY);
    }

    /// Ship bay overflow on takeoff is discarded, not persisted.
    #[test]
    fn takeoff_transfer_clamps_at_bay_capacity() {
        let mut manifest = ShipManifest {
            storage_bay_capacity: 20,
            total_element_mass: 15,
            ..ShipManifest::default()
        };
        let mut amounts = [0u16; NUM_ELEMENT_CATEGORIES];
        amounts[0] = 12;
        let outcome = LanderOutcome {
            survived: true,
            crew_returned: 12,
            element_amounts: amounts,
            element_total: 12,
            bio: 0,
        };
        apply_lander_outcome(&mut manifest, &outcome);
        assert_eq!(manifest.total_element_mass, 20);
        assert_eq!(manifest.element_amounts[0], 5);
    }
}
