//! Drawing collaborator interface for the Stardrift core.
//!
//! The sim issues blocking, order-sensitive draw calls against the
//! `Canvas` trait and owns sprite-sheet handles with scoped (`Arc`)
//! ownership; the actual rasterizer lives outside this workspace. A
//! recording canvas is provided for tests and headless runs.

pub mod canvas;
pub mod frame;

pub use canvas::*;
pub use frame::*;
