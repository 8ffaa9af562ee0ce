//! Deterministic solar-system generation.
//!
//! Everything here is keyed by seeds derived from star coordinates: the
//! same star always produces the same planets, moons, surface hazards,
//! deposits, and textures. Generation is lazy (planets at system entry,
//! moons at inner-system entry, sphere textures on demand) and the
//! per-star `SystemGenerator` variant decides whether a system is pure
//! procedural or carries authored plot content.

pub mod analysis;
pub mod body;
pub mod consts;
pub mod generator;
pub mod lifeforms;
pub mod orbits;
pub mod star;
pub mod texture;
pub mod worlds;

pub use analysis::*;
pub use body::*;
pub use consts::*;
pub use generator::*;
pub use lifeforms::*;
pub use orbits::*;
pub use star::*;
pub use texture::*;
pub use worlds::*;
