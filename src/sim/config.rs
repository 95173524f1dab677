use serde::Deserialize;

use crate::relations::Role;

/// Node radius per role; every role without its own entry uses `default`.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct RoleRadii {
    pub protagonist: f32,
    pub antagonist: f32,
    pub default: f32,
}

impl Default for RoleRadii {
    fn default() -> Self {
        Self {
            protagonist: 30.0,
            antagonist: 25.0,
            default: 20.0,
        }
    }
}

impl RoleRadii {
    pub fn radius(&self, role: Role) -> f32 {
        match role {
            Role::Protagonist => self.protagonist,
            Role::Antagonist => self.antagonist,
            _ => self.default,
        }
    }

    fn sanitized(self) -> Self {
        let defaults = Self::default();
        let clamp = |value: f32, fallback: f32| if value.is_finite() { value.max(0.0) } else { fallback };
        Self {
            protagonist: clamp(self.protagonist, defaults.protagonist),
            antagonist: clamp(self.antagonist, defaults.antagonist),
            default: clamp(self.default, defaults.default),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Separation of a strength-5 link; stronger links sit closer.
    pub base_link_distance: f32,
    /// Many-body charge; negative values repel.
    pub charge_strength: f32,
    /// Barnes-Hut opening angle.
    pub theta: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    /// Alpha the layout is held at while any node is being dragged.
    pub drag_alpha_target: f32,
    /// Alpha floor applied when the center target moves.
    pub resize_alpha: f32,
    pub radii: RoleRadii,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            base_link_distance: 100.0,
            charge_strength: -300.0,
            theta: 0.9,
            collision_padding: 5.0,
            collision_strength: 0.7,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            resize_alpha: 0.3,
            radii: RoleRadii::default(),
        }
    }
}

impl SimulationConfig {
    /// Clamps values that would stall or destabilise the integrator.
    pub(crate) fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.alpha_decay > 0.0 && self.alpha_decay < 1.0) {
            self.alpha_decay = defaults.alpha_decay;
        }
        if !(self.alpha_min > 0.0 && self.alpha_min < 1.0) {
            self.alpha_min = defaults.alpha_min;
        }
        if !(0.0..=1.0).contains(&self.velocity_decay) {
            self.velocity_decay = defaults.velocity_decay;
        }
        if !(self.base_link_distance.is_finite() && self.base_link_distance > 0.0) {
            self.base_link_distance = defaults.base_link_distance;
        }
        if !self.charge_strength.is_finite() {
            self.charge_strength = defaults.charge_strength;
        }
        if !(self.theta.is_finite() && self.theta > 0.0) {
            self.theta = defaults.theta;
        }
        self.collision_padding = self.collision_padding.max(0.0);
        self.collision_strength = self.collision_strength.clamp(0.0, 1.0);
        self.drag_alpha_target = self.drag_alpha_target.clamp(0.0, 1.0);
        self.resize_alpha = self.resize_alpha.clamp(0.0, 1.0);
        self.radii = self.radii.sanitized();
        self
    }

    /// Target separation for a link: `base / (strength / 5)`.
    pub fn link_distance(&self, effective_strength: f32) -> f32 {
        self.base_link_distance / (effective_strength / 5.0)
    }

    /// Spring coefficient for a link: `strength / 10`.
    pub fn link_spring(&self, effective_strength: f32) -> f32 {
        effective_strength / 10.0
    }

    pub fn collision_radius(&self, role: Role) -> f32 {
        self.radii.radius(role) + self.collision_padding
    }
}
