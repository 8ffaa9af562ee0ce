//! Core types shared by every Stardrift system:
//! - integer screen/universe geometry
//! - binary-angle math (64-unit circle, 16 ship facings)
//! - fixed-point velocity with fractional error carry
//! - game clock and tick pacing
//! - the seeded PRNG context used for all world generation
//! - common ECS components for transient surface entities

pub mod angle;
pub mod components;
pub mod geom;
pub mod rng;
pub mod time;
pub mod velocity;

pub use angle::*;
pub use components::*;
pub use geom::*;
pub use rng::*;
pub use time::*;
pub use velocity::*;

// Re-export commonly used types
pub use glam::IVec2;
pub use hecs::{Entity, World};
