use std::collections::HashSet;
use std::rc::Rc;

use character_graph::interaction::ResizeDebouncer;
use character_graph::sim::{Node, Snapshot};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::ViewModel;
use super::super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, link_color, link_width, role_color,
    short_label, world_to_screen,
};

const LABEL_CHARS: usize = 18;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    /// (Re)creates the simulation for the current cast at the canvas size.
    fn rebuild_layout(&mut self, size: Vec2) {
        let nodes = self.cast.characters.iter().map(Node::from).collect::<Vec<_>>();
        let simulation = self.surface.initialize(&nodes, &self.cast.links, size.x, size.y);

        if !self.subscribed {
            let latest = Rc::clone(&self.latest);
            simulation.on_tick(move |snapshot| *latest.borrow_mut() = Some(snapshot.clone()));
            self.subscribed = true;
        }
        *self.latest.borrow_mut() = Some(simulation.snapshot());

        self.resize = ResizeDebouncer::with_initial(self.resize_delay, size);
        self.needs_layout = false;
    }

    fn search_matches(&self, snapshot: &Snapshot) -> Option<HashSet<String>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        Some(
            snapshot
                .nodes
                .iter()
                .filter(|node| fuzzy_match_score(&matcher, &node.name, query).is_some())
                .map(|node| node.id.clone())
                .collect(),
        )
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        if self.needs_layout {
            self.rebuild_layout(rect.size());
        }
        self.handle_resize(ui, rect);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let latest = Rc::clone(&self.latest);
        if let Some(snapshot) = latest.borrow().as_ref() {
            self.handle_node_drag(ui, rect, &response, snapshot);
        }

        let moved = self.surface.on_frame();
        if moved || self.dragging.is_some() {
            ui.ctx().request_repaint();
        }

        let guard = latest.borrow();
        let Some(snapshot) = guard.as_ref().filter(|snapshot| !snapshot.nodes.is_empty()) else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No characters to show.",
                FontId::proportional(16.0),
                Color32::from_gray(200),
            );
            return;
        };

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .and_then(|pointer| self.node_at(snapshot, rect, pointer));

        if self.dragging.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grab);
        }

        let pending_selection = if response.clicked_by(egui::PointerButton::Primary) {
            Some(hovered.clone())
        } else {
            None
        };

        let selected = self.selected.as_deref();
        let related = selected.map(|selected| {
            let mut related = snapshot
                .links
                .iter()
                .filter_map(|link| {
                    if link.source == selected {
                        Some(link.target.as_str())
                    } else if link.target == selected {
                        Some(link.source.as_str())
                    } else {
                        None
                    }
                })
                .collect::<HashSet<_>>();
            related.insert(selected);
            related
        });
        let search_matches = self.search_matches(snapshot);

        let screen_positions = snapshot
            .nodes
            .iter()
            .map(|node| world_to_screen(rect, self.pan, self.zoom, vec2(node.x, node.y)))
            .collect::<Vec<Pos2>>();

        for link in &snapshot.links {
            let Some((from, to)) = snapshot.endpoints(link) else {
                continue;
            };
            let start = world_to_screen(rect, self.pan, self.zoom, vec2(from.x, from.y));
            let end = world_to_screen(rect, self.pan, self.zoom, vec2(to.x, to.y));

            let touches_selection =
                selected.is_some_and(|selected| link.source == selected || link.target == selected);
            let base = link_color(link.kind);
            let color = if selected.is_some() && !touches_selection {
                dim_color(base, 0.35)
            } else {
                base
            };
            let mut width = link_width(link.strength, self.zoom);
            if touches_selection {
                width *= 1.6;
            }
            painter.line_segment([start, end], Stroke::new(width, color));

            if self.show_link_labels
                && let Some(label) = &link.label
            {
                painter.text(
                    start + (end - start) * 0.5,
                    Align2::CENTER_CENTER,
                    short_label(label, 24),
                    FontId::proportional(11.0),
                    Color32::from_gray(190),
                );
            }
        }

        let search_color = Color32::from_rgb(103, 196, 255);
        for (index, node) in snapshot.nodes.iter().enumerate() {
            let position = screen_positions[index];
            let radius = self.screen_radius(node.radius);
            if !circle_visible(rect, position, radius + 60.0) {
                continue;
            }

            let is_selected = selected == Some(node.id.as_str());
            let is_hovered = hovered.as_deref() == Some(node.id.as_str());
            let is_related = related
                .as_ref()
                .is_none_or(|related| related.contains(node.id.as_str()));
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&node.id));

            let mut color = role_color(node.role);
            if !is_related {
                color = dim_color(color, 0.4);
            } else if search_matches.is_some() && !is_match {
                color = dim_color(color, 0.55);
            }
            if is_match {
                color = blend_color(color, search_color, 0.45);
            }
            if is_hovered {
                color = blend_color(color, Color32::WHITE, 0.25);
            }

            painter.circle_filled(position, radius, color);
            let stroke = if node.is_pinned() {
                Stroke::new(2.5, Color32::from_rgb(250, 226, 120))
            } else if is_selected {
                Stroke::new(2.0, Color32::WHITE)
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(12, 12, 16, 200))
            };
            painter.circle_stroke(position, radius, stroke);

            if self.show_labels || is_hovered || is_selected {
                painter.text(
                    position + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    short_label(&node.name, LABEL_CHARS),
                    FontId::proportional(12.0),
                    if is_related {
                        Color32::from_gray(236)
                    } else {
                        Color32::from_gray(130)
                    },
                );
            }
        }

        if let Some(hovered) = hovered.as_deref()
            && let Some(node) = snapshot.node(hovered)
        {
            let degree = snapshot
                .links
                .iter()
                .filter(|link| link.source == node.id || link.target == node.id)
                .count();
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  {}  |  {degree} relationships", node.name, node.role.label()),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        drop(guard);
        if let Some(selection) = pending_selection {
            self.set_selected(selection);
        }
    }
}
