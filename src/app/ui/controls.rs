use character_graph::relations::{LinkKind, Role};
use eframe::egui::{self, RichText, Ui, Vec2};

use super::super::ViewModel;
use super::super::render_utils::{link_color, role_color};

const ROLES: [Role; 6] = [
    Role::Protagonist,
    Role::Antagonist,
    Role::Supporting,
    Role::Mentor,
    Role::Sidekick,
    Role::Other,
];

const LINK_KINDS: [LinkKind; 3] = [LinkKind::Friend, LinkKind::Lover, LinkKind::Enemy];

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("View");
        ui.add_space(6.0);

        ui.label("Search characters");
        ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("name"));
        ui.checkbox(&mut self.show_labels, "Character names");
        ui.checkbox(&mut self.show_link_labels, "Relationship labels");

        ui.horizontal(|ui| {
            let controller = self.surface.controller();
            if ui
                .add_enabled(controller.is_some(), egui::Button::new("Reheat layout"))
                .clicked()
                && let Some(controller) = controller
            {
                controller.reheat();
            }
            if ui.button("Reset view").clicked() {
                self.pan = Vec2::ZERO;
                self.zoom = 1.0;
            }
        });
        ui.small("Drag characters with the left button; pan with right or middle drag; scroll to zoom.");

        ui.separator();
        ui.label(RichText::new("Relationships").strong());
        for kind in LINK_KINDS {
            let count = self.cast.links.iter().filter(|link| link.kind == kind).count();
            ui.horizontal(|ui| {
                ui.label(RichText::new("━━").color(link_color(kind)));
                ui.label(format!("{} ({count})", kind.label()));
            });
        }

        ui.separator();
        ui.label(RichText::new("Roles").strong());
        for role in ROLES {
            let count = self
                .cast
                .characters
                .iter()
                .filter(|character| character.role == role)
                .count();
            if count == 0 {
                continue;
            }
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(role_color(role)));
                ui.label(format!("{} ({count})", role.label()));
            });
        }

        if let Some(simulation) = self.surface.simulation() {
            ui.separator();
            ui.label(RichText::new("Layout").strong());
            ui.label(format!("nodes in layout: {}", simulation.node_count()));
            ui.label(format!("links in layout: {}", simulation.link_count()));
            ui.label(format!("alpha: {:.4}", simulation.alpha()));
            ui.label(format!("alpha target: {:.2}", simulation.alpha_target()));
            let center = simulation.center();
            ui.label(format!("center: ({:.0}, {:.0})", center.x, center.y));
        }
    }
}
