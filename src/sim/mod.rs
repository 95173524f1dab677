//! Force-directed layout: link springs, Barnes-Hut repulsion, centering and
//! collision, cooled by a decaying alpha.

mod config;
mod forces;
mod quadtree;
mod simulation;
mod snapshot;
mod surface;

pub use config::{RoleRadii, SimulationConfig};
pub use simulation::{Node, Simulation, SimulationState, SubscriptionId};
pub use snapshot::{LinkSnapshot, NodeSnapshot, Snapshot};
pub use surface::GraphSurface;
