//! Outbound voxel command surface for the city generator.
//!
//! Emission is fire-and-forget: the generator queues add commands and
//! never sees a return value or an error path. The queue side throttles
//! release to a packets-per-second budget and keeps lifetime counters
//! for stats logging.

pub mod queue;
pub mod sink;

pub use queue::*;
pub use sink::*;
