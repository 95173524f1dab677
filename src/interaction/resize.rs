use std::time::{Duration, Instant};

use eframe::egui::Vec2;

use super::InteractionController;

/// Collapses a burst of container size changes into one update, emitted once
/// the size has held still for `delay`.
#[derive(Clone, Debug)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(Vec2, Instant)>,
    applied: Option<Vec2>,
}

fn same_size(a: Vec2, b: Vec2) -> bool {
    (a - b).abs().max_elem() < 0.5
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            applied: None,
        }
    }

    pub fn with_initial(delay: Duration, size: Vec2) -> Self {
        Self {
            applied: Some(size),
            ..Self::new(delay)
        }
    }

    pub fn observe(&mut self, size: Vec2, now: Instant) {
        if !(size.x.is_finite() && size.y.is_finite()) || size.x <= 0.0 || size.y <= 0.0 {
            return;
        }

        match self.pending {
            Some((pending, _)) if same_size(pending, size) => {}
            _ if self.pending.is_none()
                && self.applied.is_some_and(|applied| same_size(applied, size)) => {}
            _ => self.pending = Some((size, now)),
        }
    }

    /// Returns the settled size once, after it has been stable long enough.
    pub fn poll(&mut self, now: Instant) -> Option<Vec2> {
        let (size, since) = self.pending?;
        if now.saturating_duration_since(since) < self.delay {
            return None;
        }

        self.pending = None;
        if self.applied.is_some_and(|applied| same_size(applied, size)) {
            return None;
        }
        self.applied = Some(size);
        Some(size)
    }

    pub fn poll_into(&mut self, controller: &InteractionController, now: Instant) -> bool {
        match self.poll(now) {
            Some(size) => {
                controller.update_center(size.x, size.y);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
