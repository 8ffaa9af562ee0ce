//! Headless scripted exploration run: enter a system, fly, descend to a
//! surface, scavenge, take off, and leave. Useful for eyeballing the
//! state machine from a terminal (`RUST_LOG=debug cargo run`).

use anyhow::Result;
use audio::NullSink;
use engine_core::IVec2;
use input::{InputFrame, ScriptedInput};
use renderer::RecordingCanvas;

use game::flight::{init_solar_sys, ip_tick, resume_from_orbit, TickEvent};
use game::lander::{apply_lander_outcome, LanderSession};
use game::{Options, SimContext, ShipManifest};
use procgen::{StarColor, StarDesc, StarSize};

fn main() -> Result<()> {
    env_logger::init();

    let star = StarDesc::new(IVec2::new(1000, 2000), StarColor::Yellow, StarSize::Giant);
    let opts = Options::default();
    let manifest = ShipManifest::default();

    let mut ctx = SimContext::new(star, opts.clone(), manifest);
    let mut canvas = RecordingCanvas::new();
    let mut sink = NullSink;

    init_solar_sys(&mut ctx, &mut canvas, &mut sink, false);
    log::info!(
        "system {}: {} planets at zoom {}",
        procgen::star_name(&ctx.star),
        ctx.planets.len(),
        ctx.zoom_radius
    );
    for (i, planet) in ctx.planets.iter().enumerate() {
        log::info!(
            "  {}: {:?}, radius {}, {} moons",
            ctx.generator.generate_name(&ctx.star, i),
            planet.world,
            planet.radius,
            planet.num_moons
        );
    }

    // Fly "north" until the view zooms us somewhere interesting or we
    // run off the edge of the system.
    let mut script = ScriptedInput::new();
    script.push(InputFrame::turning(true), 40);
    script.push(InputFrame::thrusting(), 4000);

    let mut orbited = None;
    for tick in 0..6000 {
        canvas.clear_ops();
        match ip_tick(&mut ctx, script.poll(), &mut canvas, &mut sink) {
            TickEvent::None => {}
            TickEvent::ZoomedIn => log::info!("tick {tick}: zoomed in to {}", ctx.zoom_radius),
            TickEvent::ZoomedOut => log::info!("tick {tick}: zoomed out to {}", ctx.zoom_radius),
            TickEvent::EnteredInner(p) => {
                log::info!(
                    "tick {tick}: entered inner system of {}",
                    ctx.generator.generate_name(&ctx.star, p)
                );
            }
            TickEvent::LeftInner => log::info!("tick {tick}: back to the outer system"),
            TickEvent::EnteredOrbit(world) => {
                log::info!("tick {tick}: entered orbit around {world:?}");
                orbited = Some(world);
                break;
            }
            TickEvent::LeftSystem => {
                log::info!("tick {tick}: left the system at max zoom");
                break;
            }
            TickEvent::Aborted => break,
        }
    }

    // If flying never found us a world, just survey the first planet.
    let world = orbited.unwrap_or(game::BodyRef::Planet(0));
    let info = ctx.orbital_info(world);
    log::info!(
        "orbital survey: temp {}C, tectonics {}, weather {}, {} deposits, {} lifeforms",
        info.temperature,
        info.tectonics,
        info.weather,
        info.minerals.len(),
        info.lifeforms.len()
    );

    if info.world.world_type().is_some_and(|w| !w.is_gas_giant()) {
        run_lander(&mut ctx, &info, &opts, &mut canvas, &mut sink);
    } else {
        log::info!("no safe landing site; staying in orbit");
    }

    if orbited.is_some() {
        resume_from_orbit(&mut ctx, &mut canvas, &mut sink);
        log::info!("resumed flight; save fields: {:?}", ctx.save_fields());
    }

    Ok(())
}

fn run_lander(
    ctx: &mut SimContext,
    info: &procgen::PlanetInfo,
    opts: &Options,
    canvas: &mut RecordingCanvas,
    sink: &mut NullSink,
) {
    // Land next to the richest deposit so the trip pays for itself.
    let target = info
        .minerals
        .iter()
        .max_by_key(|d| d.amount)
        .map(|d| d.loc)
        .unwrap_or(IVec2::new(100, 40));

    let seed = engine_core::seed_for_point(target) ^ 0x4C41_4E44;
    let mut session = LanderSession::new(
        info,
        &ctx.manifest,
        opts,
        target,
        seed,
        ctx.sheets.clone(),
    );

    let mut script = ScriptedInput::new();
    script.push(InputFrame::idle(), 80); // warmup + landing
    script.push(InputFrame::thrusting(), 120); // sweep the area
    script.push(
        InputFrame {
            escape: true,
            ..InputFrame::idle()
        },
        200,
    );

    for _ in 0..600 {
        canvas.clear_ops();
        if session.tick(script.poll(), canvas, sink) {
            break;
        }
    }

    let outcome = session.outcome();
    log::info!(
        "lander back: survived={}, minerals={}, bio={}",
        outcome.survived,
        outcome.element_total,
        outcome.bio
    );
    apply_lander_outcome(&mut ctx.manifest, &outcome);
    log::info!(
        "ship cargo now {} units ({} bio)",
        ctx.manifest.total_element_mass,
        ctx.manifest.total_bio_mass
    );
}
