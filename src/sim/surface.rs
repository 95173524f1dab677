use tracing::debug;

use super::config::SimulationConfig;
use super::simulation::{Node, Simulation, SimulationState};
use crate::interaction::InteractionController;
use crate::relations::Link;

/// Owns at most one live simulation for a rendering surface.
///
/// Re-initializing disposes the previous simulation first, carries node
/// positions over by id and hands existing tick subscribers to the new one.
pub struct GraphSurface {
    config: SimulationConfig,
    simulation: Option<Simulation>,
}

impl GraphSurface {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            simulation: None,
        }
    }

    pub fn initialize(
        &mut self,
        nodes: &[Node],
        links: &[Link],
        width: f32,
        height: f32,
    ) -> &mut Simulation {
        let (prior, subscribers) = match self.simulation.as_mut() {
            Some(previous) => {
                let prior = previous.positions();
                let subscribers = previous.take_subscribers();
                previous.dispose();
                (prior, Some(subscribers))
            }
            None => Default::default(),
        };

        debug!(nodes = nodes.len(), reused = prior.len(), "initializing surface");
        let mut simulation =
            Simulation::seeded(nodes, links, width, height, self.config.clone(), &prior);
        if let Some(subscribers) = subscribers {
            simulation.adopt_subscribers(subscribers);
        }
        self.simulation.insert(simulation)
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    pub fn controller(&self) -> Option<InteractionController> {
        self.simulation.as_ref().map(Simulation::controller)
    }

    pub fn state(&self) -> SimulationState {
        self.simulation
            .as_ref()
            .map_or(SimulationState::Uninitialized, Simulation::state)
    }

    /// Forwards a host animation frame. Returns whether the layout moved.
    pub fn on_frame(&mut self) -> bool {
        self.simulation.as_mut().is_some_and(Simulation::on_frame)
    }

    pub fn dispose(&mut self) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.dispose();
        }
    }
}

impl Drop for GraphSurface {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use eframe::egui::vec2;

    use super::*;
    use crate::relations::{LinkKind, Role};

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter()
            .map(|id| Node::new(*id, id.to_uppercase(), Role::Other))
            .collect()
    }

    #[test]
    fn starts_uninitialized() {
        let mut surface = GraphSurface::new(SimulationConfig::default());
        assert_eq!(surface.state(), SimulationState::Uninitialized);
        assert!(surface.controller().is_none());
        assert!(!surface.on_frame());
    }

    #[test]
    fn reinitialize_keeps_surviving_positions() {
        let mut surface = GraphSurface::new(SimulationConfig::default());
        let links = vec![Link::new("ab", "a", "b", LinkKind::Friend)];
        surface.initialize(&nodes(&["a", "b"]), &links, 800.0, 600.0);
        for _ in 0..50 {
            surface.on_frame();
        }
        let before = surface.simulation().unwrap().positions();

        let links = vec![
            Link::new("ab", "a", "b", LinkKind::Friend),
            Link::new("bc", "b", "c", LinkKind::Lover),
        ];
        let simulation = surface.initialize(&nodes(&["a", "b", "c"]), &links, 800.0, 600.0);
        assert_eq!(simulation.node_position("a"), Some(before["a"]));
        assert_eq!(simulation.node_position("b"), Some(before["b"]));
        let c = simulation.node_position("c").unwrap();
        assert!((c - before["b"]).length() < 45.0);
        assert_eq!(surface.state(), SimulationState::Running);
    }

    #[test]
    fn reinitialize_silences_old_controller_and_keeps_subscribers() {
        let mut surface = GraphSurface::new(SimulationConfig::default());
        let ticks = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&ticks);
        surface
            .initialize(&nodes(&["a"]), &[], 800.0, 600.0)
            .on_tick(move |_| *counter.borrow_mut() += 1);
        let stale = surface.controller().unwrap();

        surface.initialize(&nodes(&["a", "b"]), &[], 800.0, 600.0);
        stale.drag_start(Default::default(), "a");
        stale.drag_move(Default::default(), 5.0, 5.0);
        assert!(surface.on_frame());

        assert_eq!(*ticks.borrow(), 1);
        let snapshot = surface.simulation().unwrap().snapshot();
        assert!(snapshot.nodes.iter().all(|node| !node.is_pinned()));
        assert_ne!(surface.simulation().unwrap().node_position("a"), Some(vec2(5.0, 5.0)));
    }

    #[test]
    fn dispose_stops_frames() {
        let mut surface = GraphSurface::new(SimulationConfig::default());
        surface.initialize(&nodes(&["a", "b"]), &[], 800.0, 600.0);
        surface.dispose();
        surface.dispose();
        assert_eq!(surface.state(), SimulationState::Disposed);
        assert!(!surface.on_frame());
    }
}
