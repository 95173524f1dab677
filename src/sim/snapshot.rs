use serde::Serialize;

use super::simulation::SimulationState;
use crate::relations::{LinkKind, Role};

/// Node position as published after a tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub radius: f32,
    pub x: f32,
    pub y: f32,
    /// Pinned coordinates, present while the node is held by a drag.
    pub fx: Option<f32>,
    pub fy: Option<f32>,
}

impl NodeSnapshot {
    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() && self.fy.is_some()
    }
}

/// A link whose endpoints are given both as node ids and as indices into
/// [`Snapshot::nodes`] of the same snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinkSnapshot {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_index: usize,
    pub target_index: usize,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub strength: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Read-only copy of the simulation after one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub alpha: f32,
    pub state: SimulationState,
    pub nodes: Vec<NodeSnapshot>,
    pub links: Vec<LinkSnapshot>,
}

impl Snapshot {
    pub fn node(&self, id: &str) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn distance(&self, a: &str, b: &str) -> Option<f32> {
        let a = self.node(a)?;
        let b = self.node(b)?;
        Some(((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt())
    }

    /// Endpoints of a link, resolved through the stored indices.
    pub fn endpoints(&self, link: &LinkSnapshot) -> Option<(&NodeSnapshot, &NodeSnapshot)> {
        Some((self.nodes.get(link.source_index)?, self.nodes.get(link.target_index)?))
    }
}
