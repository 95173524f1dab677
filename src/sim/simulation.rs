use std::collections::{HashMap, HashSet};
use std::f32::consts::PI;
use std::sync::mpsc::{self, Receiver};

use eframe::egui::{Vec2, vec2};
use serde::Serialize;
use tracing::{debug, warn};

use super::config::SimulationConfig;
use super::forces::{ForceScratch, apply_center, apply_charge, apply_collision, apply_links};
use super::snapshot::{LinkSnapshot, NodeSnapshot, Snapshot};
use crate::interaction::{Command, InteractionController, PointerId};
use crate::relations::{Character, Link, Role, retain_known_endpoints};
use crate::util::stable_pair;

const INITIAL_RADIUS: f32 = 10.0;
const NEIGHBOR_JITTER: f32 = 30.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

impl From<&Character> for Node {
    fn from(character: &Character) -> Self {
        Self::new(character.id.clone(), character.name.clone(), character.role)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationState {
    Uninitialized,
    Running,
    Settled,
    Disposed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(super) type TickCallback = Box<dyn FnMut(&Snapshot)>;

pub(super) struct SimNode {
    pub(super) id: String,
    pub(super) name: String,
    pub(super) role: Role,
    pub(super) radius: f32,
    pub(super) collision_radius: f32,
    pub(super) position: Vec2,
    pub(super) velocity: Vec2,
    pub(super) pinned: Option<Vec2>,
}

#[cfg(test)]
impl SimNode {
    pub(super) fn for_test(position: Vec2, collision_radius: f32) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            role: Role::Other,
            radius: collision_radius,
            collision_radius,
            position,
            velocity: Vec2::ZERO,
            pinned: None,
        }
    }
}

pub(super) struct SimLink {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) distance: f32,
    pub(super) spring: f32,
    /// Share of the correction applied to the target endpoint.
    pub(super) bias: f32,
}

/// Force-directed layout over one node/link set.
///
/// Advances one step per [`Simulation::on_frame`] while running, publishing a
/// [`Snapshot`] to every subscriber after each step. Node and link data are
/// private copies; the only outside writer is the command queue reachable
/// through [`Simulation::controller`].
pub struct Simulation {
    config: SimulationConfig,
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    link_data: Vec<Link>,
    index_by_id: HashMap<String, usize>,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
    state: SimulationState,
    tick_count: u64,
    subscribers: Vec<(SubscriptionId, TickCallback)>,
    next_subscription: u64,
    commands: Option<Receiver<Command>>,
    controller: InteractionController,
    drags: HashMap<PointerId, usize>,
    scratch: ForceScratch,
}

fn is_finite(point: Vec2) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

fn viewport_center(width: f32, height: f32) -> Option<Vec2> {
    let center = vec2(width, height) * 0.5;
    (is_finite(center) && width > 0.0 && height > 0.0).then_some(center)
}

fn phyllotaxis(index: usize, center: Vec2) -> Vec2 {
    let angle = index as f32 * PI * (3.0 - 5.0_f32.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    center + vec2(angle.cos(), angle.sin()) * radius
}

impl Simulation {
    pub fn new(
        nodes: &[Node],
        links: &[Link],
        width: f32,
        height: f32,
        config: SimulationConfig,
    ) -> Self {
        Self::seeded(nodes, links, width, height, config, &HashMap::new())
    }

    /// Like [`Simulation::new`], but nodes found in `prior` start where they
    /// were; new nodes start near their already placed neighbours.
    pub(super) fn seeded(
        nodes: &[Node],
        links: &[Link],
        width: f32,
        height: f32,
        config: SimulationConfig,
        prior: &HashMap<String, Vec2>,
    ) -> Self {
        let config = config.sanitized();
        let center = viewport_center(width, height).unwrap_or_else(|| {
            warn!(width, height, "unusable viewport size; centering on the origin");
            Vec2::ZERO
        });

        let mut index_by_id = HashMap::with_capacity(nodes.len());
        let mut sim_nodes = Vec::with_capacity(nodes.len());
        for node in nodes {
            if index_by_id.contains_key(&node.id) {
                warn!(node = %node.id, "dropping node with a duplicate id");
                continue;
            }
            index_by_id.insert(node.id.clone(), sim_nodes.len());
            sim_nodes.push(SimNode {
                id: node.id.clone(),
                name: node.name.clone(),
                role: node.role,
                radius: config.radii.radius(node.role),
                collision_radius: config.collision_radius(node.role),
                position: Vec2::ZERO,
                velocity: Vec2::ZERO,
                pinned: None,
            });
        }

        let known_ids = index_by_id.keys().map(String::as_str).collect::<HashSet<_>>();
        let link_data = retain_known_endpoints(links, &known_ids)
            .filter(|link| link.source != link.target)
            .cloned()
            .collect::<Vec<_>>();

        let mut degree = vec![0usize; sim_nodes.len()];
        let mut endpoints = Vec::with_capacity(link_data.len());
        for link in &link_data {
            let source = index_by_id[&link.source];
            let target = index_by_id[&link.target];
            degree[source] += 1;
            degree[target] += 1;
            endpoints.push((source, target));
        }

        let sim_links = link_data
            .iter()
            .zip(&endpoints)
            .map(|(link, &(source, target))| {
                let strength = link.effective_strength();
                SimLink {
                    source,
                    target,
                    distance: config.link_distance(strength),
                    spring: config.link_spring(strength),
                    bias: degree[source] as f32 / (degree[source] + degree[target]) as f32,
                }
            })
            .collect::<Vec<_>>();

        seed_positions(&mut sim_nodes, &sim_links, prior, center);

        let (tx, rx) = mpsc::channel();
        let state = if sim_nodes.is_empty() {
            SimulationState::Settled
        } else {
            SimulationState::Running
        };

        debug!(
            nodes = sim_nodes.len(),
            links = sim_links.len(),
            reused = sim_nodes.iter().filter(|node| prior.contains_key(&node.id)).count(),
            "simulation initialized"
        );

        Self {
            config,
            nodes: sim_nodes,
            links: sim_links,
            link_data,
            index_by_id,
            center,
            alpha: 1.0,
            alpha_target: 0.0,
            state,
            tick_count: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
            commands: Some(rx),
            controller: InteractionController::new(tx),
            drags: HashMap::new(),
            scratch: ForceScratch::new(),
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.state == SimulationState::Disposed
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn node_position(&self, id: &str) -> Option<Vec2> {
        self.index_by_id.get(id).map(|&index| self.nodes[index].position)
    }

    pub fn positions(&self) -> HashMap<String, Vec2> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.position))
            .collect()
    }

    pub fn controller(&self) -> InteractionController {
        self.controller.clone()
    }

    /// Registers `callback` to receive every subsequent snapshot. Callbacks
    /// run synchronously after each tick, in registration order.
    pub fn on_tick(&mut self, callback: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        if !self.is_disposed() {
            self.subscribers.push((id, Box::new(callback)));
        }
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscription, _)| *subscription != id);
        self.subscribers.len() != before
    }

    pub(super) fn take_subscribers(&mut self) -> (Vec<(SubscriptionId, TickCallback)>, u64) {
        (std::mem::take(&mut self.subscribers), self.next_subscription)
    }

    pub(super) fn adopt_subscribers(
        &mut self,
        (subscribers, next_subscription): (Vec<(SubscriptionId, TickCallback)>, u64),
    ) {
        self.subscribers = subscribers;
        self.next_subscription = self.next_subscription.max(next_subscription);
    }

    pub fn reheat(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.alpha = 1.0;
        if !self.nodes.is_empty() {
            self.state = SimulationState::Running;
        }
    }

    /// Moves the centering target to the middle of a `width`×`height` viewport
    /// and warms the layout enough to visibly follow.
    pub fn update_center(&mut self, width: f32, height: f32) {
        if self.is_disposed() {
            return;
        }
        let Some(center) = viewport_center(width, height) else {
            debug!(width, height, "ignoring unusable viewport size");
            return;
        };

        self.center = center;
        self.alpha = self.alpha.max(self.config.resize_alpha);
        if !self.nodes.is_empty() && self.alpha > self.config.alpha_min {
            self.state = SimulationState::Running;
        }
    }

    /// Stops ticking for good. Later calls on this handle do nothing.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.state = SimulationState::Disposed;
        self.subscribers.clear();
        self.commands = None;
        self.drags.clear();
        debug!(ticks = self.tick_count, "simulation disposed");
    }

    /// Host frame hook: applies queued commands, then advances one step if
    /// the layout is still running. Returns whether a step was taken.
    pub fn on_frame(&mut self) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.drain_commands();
        if self.state != SimulationState::Running {
            return false;
        }
        self.step();
        self.publish();
        true
    }

    /// Advances exactly one step regardless of alpha.
    pub fn tick(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.drain_commands();
        self.step();
        self.publish();
    }

    pub fn snapshot(&self) -> Snapshot {
        let nodes = self
            .nodes
            .iter()
            .map(|node| NodeSnapshot {
                id: node.id.clone(),
                name: node.name.clone(),
                role: node.role,
                radius: node.radius,
                x: node.position.x,
                y: node.position.y,
                fx: node.pinned.map(|pin| pin.x),
                fy: node.pinned.map(|pin| pin.y),
            })
            .collect();

        let links = self
            .link_data
            .iter()
            .zip(&self.links)
            .map(|(link, sim_link)| LinkSnapshot {
                id: link.id.clone(),
                source: link.source.clone(),
                target: link.target.clone(),
                source_index: sim_link.source,
                target_index: sim_link.target,
                kind: link.kind,
                strength: link.strength,
                label: link.label.clone(),
            })
            .collect();

        Snapshot {
            tick: self.tick_count,
            alpha: self.alpha,
            state: self.state,
            nodes,
            links,
        }
    }

    fn drain_commands(&mut self) {
        let Some(commands) = &self.commands else {
            return;
        };
        let pending = commands.try_iter().collect::<Vec<_>>();
        for command in pending {
            self.apply_command(command);
        }
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::DragStart { pointer, node } => {
                let Some(&index) = self.index_by_id.get(&node) else {
                    debug!(%node, "drag started on an unknown node");
                    return;
                };
                if let Some(previous) = self.drags.insert(pointer, index)
                    && previous != index
                    && !self.drags.values().any(|&held| held == previous)
                {
                    self.nodes[previous].pinned = None;
                }
                self.reheat();
                self.alpha_target = self.config.drag_alpha_target;
                self.nodes[index].pinned = Some(self.nodes[index].position);
            }
            Command::DragMove { pointer, position } => {
                if let Some(&index) = self.drags.get(&pointer)
                    && is_finite(position)
                {
                    self.nodes[index].pinned = Some(position);
                }
            }
            Command::DragEnd { pointer } => {
                if let Some(index) = self.drags.remove(&pointer)
                    && !self.drags.values().any(|&held| held == index)
                {
                    self.nodes[index].pinned = None;
                }
                if self.drags.is_empty() {
                    self.alpha_target = 0.0;
                }
            }
            Command::Reheat => self.reheat(),
            Command::UpdateCenter { width, height } => self.update_center(width, height),
        }
    }

    fn step(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;

        apply_links(&mut self.nodes, &self.links, alpha);
        apply_charge(
            &mut self.nodes,
            &mut self.scratch,
            self.config.charge_strength,
            self.config.theta,
            alpha,
        );
        apply_center(&mut self.nodes, self.center);
        apply_collision(&mut self.nodes, &mut self.scratch, self.config.collision_strength);

        let retain = 1.0 - self.config.velocity_decay;
        for node in &mut self.nodes {
            match node.pinned {
                Some(pin) => {
                    node.position = pin;
                    node.velocity = Vec2::ZERO;
                }
                None => {
                    node.velocity *= retain;
                    node.position += node.velocity;
                }
            }
        }

        self.tick_count += 1;
        if self.state == SimulationState::Running && self.alpha <= self.config.alpha_min {
            self.state = SimulationState::Settled;
            debug!(ticks = self.tick_count, "simulation settled");
        }
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, callback) in &mut self.subscribers {
            callback(&snapshot);
        }
    }
}

fn seed_positions(
    nodes: &mut [SimNode],
    links: &[SimLink],
    prior: &HashMap<String, Vec2>,
    center: Vec2,
) {
    let mut placed = vec![false; nodes.len()];
    for (node, placed) in nodes.iter_mut().zip(placed.iter_mut()) {
        if let Some(&position) = prior.get(&node.id)
            && is_finite(position)
        {
            node.position = position;
            *placed = true;
        }
    }

    let continuing = placed.iter().any(|&placed| placed);
    for index in 0..nodes.len() {
        if placed[index] {
            continue;
        }

        let mut neighbor_sum = Vec2::ZERO;
        let mut neighbor_count = 0usize;
        if continuing {
            for link in links {
                let other = if link.source == index {
                    link.target
                } else if link.target == index {
                    link.source
                } else {
                    continue;
                };
                if placed[other] {
                    neighbor_sum += nodes[other].position;
                    neighbor_count += 1;
                }
            }
        }

        nodes[index].position = if neighbor_count > 0 {
            let (jx, jy) = stable_pair(&nodes[index].id);
            neighbor_sum / neighbor_count as f32 + vec2(jx, jy) * NEIGHBOR_JITTER
        } else {
            phyllotaxis(index, center)
        };
        placed[index] = true;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::relations::LinkKind;

    fn triangle() -> (Vec<Node>, Vec<Link>) {
        let nodes = vec![
            Node::new("a", "Aria", Role::Protagonist),
            Node::new("b", "Bren", Role::Supporting),
            Node::new("c", "Cato", Role::Antagonist),
        ];
        let links = vec![
            Link::new("ab", "a", "b", LinkKind::Friend),
            Link::new("bc", "b", "c", LinkKind::Enemy),
        ];
        (nodes, links)
    }

    fn run_until_settled(simulation: &mut Simulation) {
        for _ in 0..2_000 {
            if !simulation.on_frame() {
                return;
            }
        }
        panic!("simulation did not settle");
    }

    fn max_displacement(before: &HashMap<String, Vec2>, after: &HashMap<String, Vec2>) -> f32 {
        before
            .iter()
            .map(|(id, position)| (after[id] - *position).length())
            .fold(0.0, f32::max)
    }

    #[test]
    fn alpha_decreases_every_tick_until_settled() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        assert_eq!(simulation.state(), SimulationState::Running);

        let mut previous = simulation.alpha();
        while simulation.on_frame() {
            assert!(simulation.alpha() < previous);
            previous = simulation.alpha();
        }
        assert_eq!(simulation.state(), SimulationState::Settled);
        assert!(simulation.alpha() <= simulation.config().alpha_min);
    }

    #[test]
    fn settled_layout_stays_put() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        run_until_settled(&mut simulation);

        let before = simulation.positions();
        for _ in 0..5 {
            simulation.tick();
        }
        assert!(max_displacement(&before, &simulation.positions()) < 0.5);
        assert!(!simulation.on_frame());
    }

    #[test]
    fn layout_is_centered_on_viewport() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        run_until_settled(&mut simulation);

        let positions = simulation.positions();
        let centroid = positions.values().fold(Vec2::ZERO, |sum, p| sum + *p) / 3.0;
        assert!((centroid - vec2(400.0, 300.0)).length() < 5.0);
    }

    #[test]
    fn empty_simulation_is_settled_immediately() {
        let mut simulation = Simulation::new(&[], &[], 800.0, 600.0, SimulationConfig::default());
        assert_eq!(simulation.state(), SimulationState::Settled);
        assert!(!simulation.on_frame());
        simulation.tick();
        assert!(simulation.snapshot().nodes.is_empty());
        simulation.reheat();
        assert_eq!(simulation.state(), SimulationState::Settled);
    }

    #[test]
    fn dangling_and_self_links_are_ignored() {
        let (nodes, mut links) = triangle();
        links.push(Link::new("ghost", "a", "nobody", LinkKind::Friend));
        links.push(Link::new("self", "c", "c", LinkKind::Friend));
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        assert_eq!(simulation.link_count(), 2);

        simulation.tick();
        let snapshot = simulation.snapshot();
        assert!(snapshot.links.iter().all(|link| link.id != "ghost" && link.id != "self"));
        assert!(snapshot.nodes.iter().all(|node| node.x.is_finite() && node.y.is_finite()));
        for link in &snapshot.links {
            let (from, to) = snapshot.endpoints(link).unwrap();
            assert_eq!((from.id.as_str(), to.id.as_str()), (link.source.as_str(), link.target.as_str()));
        }
    }

    #[test]
    fn duplicate_node_ids_keep_the_first() {
        let nodes = vec![
            Node::new("a", "First", Role::Other),
            Node::new("a", "Second", Role::Other),
        ];
        let simulation = Simulation::new(&nodes, &[], 800.0, 600.0, SimulationConfig::default());
        assert_eq!(simulation.node_count(), 1);
        assert_eq!(simulation.snapshot().nodes[0].name, "First");
    }

    #[test]
    fn subscribers_see_identical_snapshots_in_order() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        let log: Rc<RefCell<Vec<(&'static str, Snapshot)>>> = Rc::default();

        let first = Rc::clone(&log);
        simulation.on_tick(move |snapshot| first.borrow_mut().push(("render", snapshot.clone())));
        let second = Rc::clone(&log);
        simulation.on_tick(move |snapshot| second.borrow_mut().push(("overlay", snapshot.clone())));

        simulation.tick();
        simulation.tick();

        let log = log.borrow();
        assert_eq!(log.len(), 4);
        assert_eq!(log[0].0, "render");
        assert_eq!(log[1].0, "overlay");
        assert_eq!(log[0].1, log[1].1);
        assert_eq!(log[0].1.tick, 1);
        assert_eq!(log[2].1.tick, 2);
        assert_eq!(log[2].1, log[3].1);
    }

    #[test]
    fn unsubscribed_callbacks_stop_firing() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = simulation.on_tick(move |_| *counter.borrow_mut() += 1);

        simulation.tick();
        assert!(simulation.unsubscribe(id));
        assert!(!simulation.unsubscribe(id));
        simulation.tick();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn dispose_is_idempotent_and_silences_everything() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        simulation.on_tick(move |_| *counter.borrow_mut() += 1);
        let controller = simulation.controller();

        simulation.dispose();
        simulation.dispose();
        assert!(simulation.is_disposed());

        let before = simulation.positions();
        let alpha = simulation.alpha();
        controller.drag_start(PointerId(0), "a");
        simulation.reheat();
        simulation.update_center(100.0, 100.0);
        simulation.tick();
        assert!(!simulation.on_frame());
        assert_eq!(*count.borrow(), 0);
        assert_eq!(simulation.alpha(), alpha);
        assert_eq!(simulation.positions(), before);
        assert_eq!(simulation.state(), SimulationState::Disposed);
    }

    #[test]
    fn update_center_warms_and_shifts_layout() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        run_until_settled(&mut simulation);
        let before = simulation.positions();

        simulation.update_center(1200.0, 900.0);
        assert_eq!(simulation.state(), SimulationState::Running);
        assert!(simulation.alpha() >= 0.3);
        assert_eq!(simulation.center(), vec2(600.0, 450.0));

        run_until_settled(&mut simulation);
        let after = simulation.positions();
        let centroid = after.values().fold(Vec2::ZERO, |sum, p| sum + *p) / 3.0;
        assert!((centroid - vec2(600.0, 450.0)).length() < 5.0);
        let shift = after["a"] - before["a"];
        assert!((shift - vec2(200.0, 150.0)).length() < 20.0);
    }

    #[test]
    fn unusable_center_is_ignored() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        simulation.update_center(0.0, 600.0);
        simulation.update_center(f32::NAN, 600.0);
        assert_eq!(simulation.center(), vec2(400.0, 300.0));
    }

    #[test]
    fn prior_positions_are_reused_and_new_nodes_join_neighbours() {
        let (nodes, links) = triangle();
        let mut prior = HashMap::new();
        prior.insert("a".to_owned(), vec2(100.0, 100.0));
        prior.insert("b".to_owned(), vec2(200.0, 100.0));

        let simulation = Simulation::seeded(
            &nodes,
            &links,
            800.0,
            600.0,
            SimulationConfig::default(),
            &prior,
        );
        assert_eq!(simulation.node_position("a"), Some(vec2(100.0, 100.0)));
        assert_eq!(simulation.node_position("b"), Some(vec2(200.0, 100.0)));
        let c = simulation.node_position("c").unwrap();
        assert!((c - vec2(200.0, 100.0)).length() <= NEIGHBOR_JITTER * 1.5);
    }

    #[test]
    fn fresh_nodes_start_on_a_spiral_around_the_center() {
        let (nodes, links) = triangle();
        let simulation = Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        let positions = simulation.positions();
        assert!(positions.values().all(|p| (*p - vec2(400.0, 300.0)).length() < 20.0));
        assert_ne!(positions["a"], positions["b"]);
    }

    fn ring(count: usize) -> (Vec<Node>, Vec<Link>) {
        let nodes = (0..count)
            .map(|i| Node::new(format!("n{i}"), format!("Node {i}"), Role::Other))
            .collect::<Vec<_>>();
        let links = (0..count)
            .map(|i| {
                let next = (i + 1) % count;
                Link::new(format!("r{i}"), format!("n{i}"), format!("n{next}"), LinkKind::Friend)
            })
            .collect();
        (nodes, links)
    }

    #[test]
    fn drag_pins_node_exactly_and_holds_layout_warm() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        run_until_settled(&mut simulation);
        let controller = simulation.controller();
        let pointer = PointerId(3);

        controller.drag_start(pointer, "a");
        controller.drag_move(pointer, 50.0, 60.0);
        assert!(simulation.on_frame());
        assert_eq!(simulation.state(), SimulationState::Running);
        assert_eq!(simulation.alpha_target(), 0.3);
        assert_eq!(simulation.node_position("a"), Some(vec2(50.0, 60.0)));

        let snapshot = simulation.snapshot();
        let a = snapshot.node("a").unwrap();
        assert!(a.is_pinned());
        assert_eq!((a.fx, a.fy), (Some(50.0), Some(60.0)));

        for _ in 0..600 {
            assert!(simulation.on_frame());
        }
        assert!(simulation.alpha() > 0.29);
        assert_eq!(simulation.node_position("a"), Some(vec2(50.0, 60.0)));
    }

    #[test]
    fn drag_start_reheats_before_pinning() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        run_until_settled(&mut simulation);
        let resting = simulation.node_position("b").unwrap();

        simulation.controller().drag_start(PointerId(0), "b");
        assert!(simulation.on_frame());
        assert!(simulation.alpha() > 0.9);
        let b = simulation.snapshot().node("b").cloned().unwrap();
        assert_eq!(vec2(b.x, b.y), resting);
    }

    #[test]
    fn drag_end_releases_pin_and_lets_layout_cool() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        let controller = simulation.controller();
        let pointer = PointerId(1);

        controller.drag_start(pointer, "c");
        controller.drag_move(pointer, 700.0, 500.0);
        simulation.on_frame();
        controller.drag_end(pointer);
        simulation.on_frame();

        assert_eq!(simulation.alpha_target(), 0.0);
        assert!(!simulation.snapshot().node("c").unwrap().is_pinned());
        run_until_settled(&mut simulation);
        assert_eq!(simulation.state(), SimulationState::Settled);
    }

    #[test]
    fn moves_without_a_drag_or_for_unknown_nodes_are_ignored() {
        let (nodes, links) = triangle();
        let mut simulation =
            Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        let controller = simulation.controller();

        controller.drag_move(PointerId(9), 10.0, 10.0);
        controller.drag_start(PointerId(2), "missing");
        controller.drag_end(PointerId(2));
        simulation.on_frame();

        assert!(simulation.snapshot().nodes.iter().all(|node| !node.is_pinned()));
        assert_eq!(simulation.alpha_target(), 0.0);
    }

    #[test]
    fn reheat_restarts_a_cooled_layout() {
        let (nodes, links) = ring(6);
        let config = SimulationConfig {
            alpha_decay: 0.2,
            ..SimulationConfig::default()
        };
        let mut simulation = Simulation::new(&nodes, &links, 800.0, 600.0, config);
        run_until_settled(&mut simulation);
        let before = simulation.positions();

        simulation.controller().reheat();
        assert!(simulation.on_frame());
        assert!((simulation.alpha() - 0.8).abs() < 1e-4);
        for _ in 0..10 {
            simulation.on_frame();
        }
        assert!(max_displacement(&before, &simulation.positions()) > 1.0);
    }

    #[test]
    fn degree_bias_favours_hub_stability() {
        let nodes = vec![
            Node::new("hub", "Hub", Role::Other),
            Node::new("x", "X", Role::Other),
            Node::new("y", "Y", Role::Other),
            Node::new("z", "Z", Role::Other),
        ];
        let links = vec![
            Link::new("1", "hub", "x", LinkKind::Friend),
            Link::new("2", "hub", "y", LinkKind::Friend),
            Link::new("3", "hub", "z", LinkKind::Friend),
        ];
        let simulation = Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());
        assert!(simulation.links.iter().all(|link| (link.bias - 0.75).abs() < 1e-6));
    }
}
