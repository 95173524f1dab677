//! Force-directed layout for character relationship graphs.
//!
//! Character records flow through [`relations`] into a deduplicated link set,
//! which seeds a [`sim::Simulation`]. Pointer drags and viewport resizes reach
//! the simulation through an [`interaction::InteractionController`], and every
//! tick publishes a [`sim::Snapshot`] to subscribers.

pub mod config;
pub mod interaction;
pub mod relations;
pub mod sim;
pub mod source;
mod util;
