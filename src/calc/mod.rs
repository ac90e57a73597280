//! The sensitivity calculation core.
//!
//! Dependency order, leaves first:
//!
//! - `interpolate`: piecewise-linear lookup on one sorted curve
//! - `reference`: the six curves (surface × axis) built from reference cars
//! - `blend`: rotation/weight blend per surface
//! - `batch`: grouped evaluation over a whole catalog
//!
//! Everything here is pure and synchronous; curves are rebuilt on every call.

pub mod batch;
pub mod blend;
pub mod defaults;
pub mod interpolate;
pub mod reference;

pub use batch::*;
pub use blend::*;
pub use defaults::*;
pub use interpolate::*;
pub use reference::*;
