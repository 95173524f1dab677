use std::time::Instant;

use character_graph::interaction::PointerId;
use character_graph::sim::Snapshot;
use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::{screen_to_world, world_to_screen};

/// The viewer only tracks the primary mouse button.
const MOUSE: PointerId = PointerId(0);

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.1, 6.0);
        self.pan += pointer - world_to_screen(rect, self.pan, self.zoom, world_before);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Topmost node under `pointer`, by screen-space radius.
    pub(in crate::app) fn node_at(
        &self,
        snapshot: &Snapshot,
        rect: Rect,
        pointer: Pos2,
    ) -> Option<String> {
        snapshot
            .nodes
            .iter()
            .rev()
            .filter_map(|node| {
                let position = world_to_screen(rect, self.pan, self.zoom, egui::vec2(node.x, node.y));
                let distance = position.distance(pointer);
                (distance <= self.screen_radius(node.radius)).then_some((node, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| node.id.clone())
    }

    pub(in crate::app) fn screen_radius(&self, radius: f32) -> f32 {
        (radius * self.zoom).clamp(3.0, 90.0)
    }

    /// Routes primary-button drags on a node through the interaction
    /// controller: pin on start, follow the pointer, release on stop.
    pub(in crate::app) fn handle_node_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        snapshot: &Snapshot,
    ) {
        let Some(controller) = self.surface.controller() else {
            return;
        };

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(origin) = ui.input(|input| input.pointer.press_origin())
            && let Some(id) = self.node_at(snapshot, rect, origin)
        {
            controller.drag_start(MOUSE, id.as_str());
            self.dragging = Some(id);
        }

        if self.dragging.is_some()
            && response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let world = screen_to_world(rect, self.pan, self.zoom, pointer);
            controller.drag_move(MOUSE, world.x, world.y);
        }

        if response.drag_stopped() && self.dragging.take().is_some() {
            controller.drag_end(MOUSE);
        }
    }

    /// Feeds the canvas size to the debouncer and forwards a settled size.
    pub(in crate::app) fn handle_resize(&mut self, ui: &Ui, rect: Rect) {
        let now = Instant::now();
        self.resize.observe(rect.size(), now);
        if let Some(controller) = self.surface.controller() {
            self.resize.poll_into(&controller, now);
        }
        if self.resize.is_pending() {
            ui.ctx().request_repaint_after(self.resize_delay);
        }
    }
}
