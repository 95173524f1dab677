//! The four layout forces. Each one adjusts node velocities (or, for the
//! centering force, positions) for a single tick; integration happens in the
//! simulation afterwards.

use eframe::egui::Vec2;

use super::quadtree::Quadtree;
use super::simulation::{SimLink, SimNode};
use crate::util::separation_direction;

/// Squared distance under which charge is softened to avoid blow-ups.
const CHARGE_DISTANCE_MIN_SQ: f32 = 1.0;
const COINCIDENT_NUDGE: f32 = 1e-3;

pub(super) struct ForceScratch {
    positions: Vec<Vec2>,
    radii: Vec<f32>,
    deltas: Vec<Vec2>,
}

impl ForceScratch {
    pub(super) fn new() -> Self {
        Self {
            positions: Vec::new(),
            radii: Vec::new(),
            deltas: Vec::new(),
        }
    }

    fn reset(&mut self, node_count: usize) {
        self.positions.clear();
        self.radii.clear();
        self.deltas.clear();
        self.deltas.resize(node_count, Vec2::ZERO);
    }
}

/// Uses predicted positions. The endpoint with the higher degree moves less.
pub(super) fn apply_links(nodes: &mut [SimNode], links: &[SimLink], alpha: f32) {
    for link in links {
        let (from, to) = (link.source, link.target);
        if from == to || from >= nodes.len() || to >= nodes.len() {
            continue;
        }

        let mut delta = (nodes[to].position + nodes[to].velocity)
            - (nodes[from].position + nodes[from].velocity);
        if delta.length_sq() <= f32::EPSILON {
            delta = separation_direction(from, to) * COINCIDENT_NUDGE;
        }

        let distance = delta.length();
        let pull = (distance - link.distance) / distance * alpha * link.spring;
        let correction = delta * pull;

        nodes[to].velocity -= correction * link.bias;
        nodes[from].velocity += correction * (1.0 - link.bias);
    }
}

fn soften(distance_sq: f32) -> f32 {
    if distance_sq < CHARGE_DISTANCE_MIN_SQ {
        (CHARGE_DISTANCE_MIN_SQ * distance_sq).sqrt().max(f32::EPSILON)
    } else {
        distance_sq
    }
}

fn charge_between(index: usize, other: usize, positions: &[Vec2], strength: f32) -> Vec2 {
    let mut delta = positions[other] - positions[index];
    let mut distance_sq = delta.length_sq();
    if distance_sq <= f32::EPSILON {
        // Points toward `other`, so a repulsive strength pushes `index` away.
        delta = separation_direction(other, index) * COINCIDENT_NUDGE;
        distance_sq = delta.length_sq();
    }
    delta * (strength / soften(distance_sq))
}

fn accumulate_charge(
    tree: &Quadtree,
    cell_id: u32,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta_sq: f32,
    velocity: &mut Vec2,
) {
    let cell = tree.cell(cell_id);
    let point = positions[index];

    if cell.is_leaf() {
        for &other in tree.points(cell) {
            if other != index {
                *velocity += charge_between(index, other, positions, strength);
            }
        }
        return;
    }

    let delta = cell.centroid - point;
    let distance_sq = delta.length_sq();
    let side = cell.square.side();
    if !cell.square.contains(point) && side * side < theta_sq * distance_sq {
        *velocity += delta * (strength * cell.count as f32 / soften(distance_sq));
        return;
    }

    for child in cell.children() {
        accumulate_charge(tree, child, index, positions, strength, theta_sq, velocity);
    }
}

/// Barnes-Hut: a cell far enough away acts as one charge at its centroid.
pub(super) fn apply_charge(
    nodes: &mut [SimNode],
    scratch: &mut ForceScratch,
    charge_strength: f32,
    theta: f32,
    alpha: f32,
) {
    if nodes.len() < 2 || charge_strength == 0.0 {
        return;
    }

    scratch.reset(nodes.len());
    scratch.positions.extend(nodes.iter().map(|node| node.position));
    let Some(tree) = Quadtree::build(&scratch.positions, &[]) else {
        return;
    };

    let strength = charge_strength * alpha;
    let theta_sq = theta * theta;
    for (index, delta) in scratch.deltas.iter_mut().enumerate() {
        accumulate_charge(&tree, Quadtree::ROOT, index, &scratch.positions, strength, theta_sq, delta);
    }

    for (node, delta) in nodes.iter_mut().zip(&scratch.deltas) {
        node.velocity += *delta;
    }
}

pub(super) fn apply_center(nodes: &mut [SimNode], center: Vec2) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.position;
    }
    centroid /= nodes.len() as f32;

    let shift = centroid - center;
    if shift.length_sq() <= f32::EPSILON {
        return;
    }
    for node in nodes.iter_mut() {
        node.position -= shift;
    }
}

struct Collider<'a> {
    tree: &'a Quadtree,
    positions: &'a [Vec2],
    radii: &'a [f32],
    strength: f32,
}

impl Collider<'_> {
    fn resolve(&self, from: usize, to: usize, deltas: &mut [Vec2]) {
        let (radii, positions) = (self.radii, self.positions);
        let min_distance = radii[from] + radii[to];
        let mut delta = positions[from] - positions[to];
        let mut distance_sq = delta.length_sq();
        if distance_sq >= min_distance * min_distance {
            return;
        }
        if distance_sq <= f32::EPSILON {
            delta = separation_direction(to, from) * COINCIDENT_NUDGE;
            distance_sq = delta.length_sq();
        }

        let distance = distance_sq.sqrt();
        let push = delta * ((min_distance - distance) / distance * self.strength);
        let from_sq = radii[from] * radii[from];
        let to_sq = radii[to] * radii[to];
        let from_share = to_sq / (from_sq + to_sq);

        deltas[from] += push * from_share;
        deltas[to] -= push * (1.0 - from_share);
    }

    /// Visits every pair of points with one point below `a` and one below `b`
    /// (each unordered pair once when `a == b`), skipping cell pairs whose
    /// gap exceeds the largest radii they hold.
    fn pairs(&self, a: u32, b: u32, deltas: &mut [Vec2]) {
        let (cell_a, cell_b) = (self.tree.cell(a), self.tree.cell(b));
        let reach = cell_a.max_radius + cell_b.max_radius;
        if cell_a.square.gap_sq(cell_b.square) > reach * reach {
            return;
        }

        if a == b {
            if cell_a.is_leaf() {
                let points = self.tree.points(cell_a);
                for (offset, &from) in points.iter().enumerate() {
                    for &to in &points[offset + 1..] {
                        self.resolve(from, to, deltas);
                    }
                }
                return;
            }

            let slots = cell_a.child_slots();
            for (first, child) in slots.iter().enumerate() {
                let Some(child) = *child else {
                    continue;
                };
                self.pairs(child, child, deltas);
                for other in slots[first + 1..].iter().flatten() {
                    self.pairs(child, *other, deltas);
                }
            }
            return;
        }

        match (cell_a.is_leaf(), cell_b.is_leaf()) {
            (true, true) => {
                for &from in self.tree.points(cell_a) {
                    for &to in self.tree.points(cell_b) {
                        self.resolve(from, to, deltas);
                    }
                }
            }
            (false, true) => {
                for child in cell_a.children() {
                    self.pairs(child, b, deltas);
                }
            }
            (true, false) => {
                for child in cell_b.children() {
                    self.pairs(a, child, deltas);
                }
            }
            (false, false) if cell_a.square.half >= cell_b.square.half => {
                for child in cell_a.children() {
                    self.pairs(child, b, deltas);
                }
            }
            (false, false) => {
                for child in cell_b.children() {
                    self.pairs(a, child, deltas);
                }
            }
        }
    }
}

/// Pushes apart any pair closer than the sum of their collision radii,
/// judged on predicted positions. Smaller nodes give way more.
pub(super) fn apply_collision(nodes: &mut [SimNode], scratch: &mut ForceScratch, strength: f32) {
    if nodes.len() < 2 || strength <= 0.0 {
        return;
    }

    scratch.reset(nodes.len());
    for node in nodes.iter() {
        scratch.positions.push(node.position + node.velocity);
        scratch.radii.push(node.collision_radius);
    }

    let Some(tree) = Quadtree::build(&scratch.positions, &scratch.radii) else {
        return;
    };
    if tree.cell(Quadtree::ROOT).max_radius <= 0.0 {
        return;
    }

    let collider = Collider {
        tree: &tree,
        positions: &scratch.positions,
        radii: &scratch.radii,
        strength,
    };
    collider.pairs(Quadtree::ROOT, Quadtree::ROOT, &mut scratch.deltas);

    for (node, delta) in nodes.iter_mut().zip(&scratch.deltas) {
        node.velocity += *delta;
    }
}
