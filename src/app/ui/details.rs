use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;
use super::super::render_utils::{link_color, role_color};

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Character");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a character in the graph.");
            return;
        };

        let Some(character) = self
            .cast
            .characters
            .iter()
            .find(|character| character.id == selected_id)
        else {
            ui.label("Selected character is no longer part of the cast.");
            return;
        };

        ui.label(
            RichText::new(character.name.as_str())
                .strong()
                .color(role_color(character.role)),
        );
        ui.small(format!("id: {}", character.id));
        ui.label(format!("role: {}", character.role.label()));

        let latest = self.latest.borrow();
        if let Some(node) = latest.as_ref().and_then(|snapshot| snapshot.node(&selected_id)) {
            ui.label(format!("position: ({:.0}, {:.0})", node.x, node.y));
            if node.is_pinned() {
                ui.label("held by pointer");
            }
        }
        drop(latest);

        ui.separator();
        ui.label(RichText::new("Relationships").strong());

        let mut next_selection = None;
        let mut any = false;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for link in &self.cast.links {
                let other_id = if link.source == selected_id {
                    &link.target
                } else if link.target == selected_id {
                    &link.source
                } else {
                    continue;
                };
                any = true;

                let other_name = self
                    .cast
                    .characters
                    .iter()
                    .find(|character| &character.id == other_id)
                    .map_or(other_id.as_str(), |character| character.name.as_str());

                ui.horizontal(|ui| {
                    ui.label(RichText::new(link.kind.label()).color(link_color(link.kind)));
                    if ui.link(other_name).clicked() {
                        next_selection = Some(other_id.clone());
                    }
                    ui.small(format!("strength {:.0}", link.strength));
                });
                if let Some(label) = &link.label {
                    ui.small(label.as_str());
                }
            }
        });

        if !any {
            ui.label("No relationships found for this character.");
        }
        if let Some(next) = next_selection {
            self.set_selected(Some(next));
        }
    }
}
