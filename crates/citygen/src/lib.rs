//! Procedural voxel city generation: simplex-noise terrain, ring-based
//! building placement, and steady-state beacon/window animation.

pub mod building;
pub mod city;
pub mod rng;
pub mod simplex;
pub mod terrain;

pub use building::*;
pub use city::*;
pub use rng::*;
pub use simplex::*;
pub use terrain::*;
