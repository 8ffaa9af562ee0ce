//! The Stardrift interplanetary flight core.
//!
//! One `SimContext` is an exploration session inside a single star
//! system: the zoom & view state machine over outer system, inner
//! system and orbit, per-frame orbit validation with frame-bucket
//! memoization, the flagship-vs-body collision detector, and the
//! planetside lander mini-simulation. An external driver calls the tick
//! functions at a fixed logical rate: at most one tick in flight,
//! never reentrant.

pub mod config;
pub mod context;
pub mod coords;
pub mod draw;
pub mod flight;
pub mod intersect;
pub mod lander;
pub mod orbit;
pub mod save;
pub mod sheets;
pub mod zoom;

pub use config::Options;
pub use context::{BaseView, BodyRef, Cooldown, SimContext};
pub use flight::{ip_tick, TickEvent};
pub use lander::{LanderOutcome, LanderSession};
pub use save::{SaveFields, ShipManifest};
