use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use character_graph::config::GraphConfig;
use character_graph::interaction::ResizeDebouncer;
use character_graph::sim::{GraphSurface, SimulationState};
use eframe::egui::{self, Align, Context, Layout, Vec2};

use super::super::{LoadedCast, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(cast: LoadedCast, config: &GraphConfig) -> Self {
        let resize_delay = config.resize_debounce();
        Self {
            cast,
            needs_layout: true,
            surface: GraphSurface::new(config.simulation.clone()),
            latest: Rc::new(RefCell::new(None)),
            subscribed: false,
            resize: ResizeDebouncer::new(resize_delay),
            resize_delay,
            pan: Vec2::ZERO,
            zoom: 1.0,
            selected: None,
            dragging: None,
            search: String::new(),
            show_labels: true,
            show_link_labels: false,
        }
    }

    /// Swaps in freshly extracted data. The layout is rebuilt on the next
    /// frame, keeping positions of characters that are still present.
    pub(in crate::app) fn replace_cast(&mut self, cast: LoadedCast) {
        if let Some(selected) = &self.selected
            && !cast.characters.iter().any(|character| &character.id == selected)
        {
            self.selected = None;
        }
        self.dragging = None;
        self.cast = cast;
        self.needs_layout = true;
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source_path: &Path,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("character-graph");
                    ui.separator();
                    ui.label(format!("source: {}", source_path.display()));
                    ui.label(format!("characters: {}", self.cast.characters.len()));
                    ui.label(format!("links: {}", self.cast.links.len()));
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload characters"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.state_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn state_text(&self) -> String {
        let Some(simulation) = self.surface.simulation() else {
            return "layout: waiting".to_owned();
        };

        match simulation.state() {
            SimulationState::Running => format!(
                "layout: running  |  alpha {:.3}  |  tick {}",
                simulation.alpha(),
                simulation.tick_count()
            ),
            SimulationState::Settled => format!("layout: settled after {} ticks", simulation.tick_count()),
            SimulationState::Uninitialized => "layout: waiting".to_owned(),
            SimulationState::Disposed => "layout: stopped".to_owned(),
        }
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        self.selected = selected;
    }
}
