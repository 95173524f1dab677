use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use character_graph::config::GraphConfig;
use character_graph::interaction::ResizeDebouncer;
use character_graph::relations::{
    Character, ContainmentResolver, FuzzyResolver, Link, RelationshipExtractor,
};
use character_graph::sim::{GraphSurface, Snapshot};
use character_graph::source::load_characters;
use eframe::egui::{self, Context, Vec2};
use tracing::{info, warn};

mod graph;
mod render_utils;
mod ui;

pub struct LaunchOptions {
    pub characters: PathBuf,
    pub config: GraphConfig,
    pub fuzzy_names: bool,
}

pub struct CharacterGraphApp {
    options: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<Result<LoadedCast, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedCast, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// Characters together with the links extracted from them.
struct LoadedCast {
    characters: Vec<Character>,
    links: Vec<Link>,
}

struct ViewModel {
    cast: LoadedCast,
    needs_layout: bool,
    surface: GraphSurface,
    latest: Rc<RefCell<Option<Snapshot>>>,
    subscribed: bool,
    resize: ResizeDebouncer,
    resize_delay: Duration,
    pan: Vec2,
    zoom: f32,
    selected: Option<String>,
    dragging: Option<String>,
    search: String,
    show_labels: bool,
    show_link_labels: bool,
}

fn load_cast(path: &Path, config: &GraphConfig, fuzzy_names: bool) -> Result<LoadedCast, String> {
    let characters = load_characters(path).map_err(|error| format!("{error:#}"))?;

    let classifier = config.classifier.clone();
    let links = if fuzzy_names {
        RelationshipExtractor::new(classifier, FuzzyResolver::default()).extract(&characters)
    } else {
        RelationshipExtractor::new(classifier, ContainmentResolver).extract(&characters)
    };

    info!(
        characters = characters.len(),
        links = links.len(),
        path = %path.display(),
        "cast loaded"
    );
    Ok(LoadedCast { characters, links })
}

impl CharacterGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::start_load(&options);
        Self {
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(options: &LaunchOptions) -> Receiver<Result<LoadedCast, String>> {
        let (tx, rx) = mpsc::channel();
        let path = options.characters.clone();
        let config = options.config.clone();
        let fuzzy_names = options.fuzzy_names;

        thread::spawn(move || {
            let result = load_cast(&path, &config, fuzzy_names);
            if let Err(error) = &result {
                warn!(%error, "failed to load cast");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(options: &LaunchOptions) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(options),
        }
    }
}

impl eframe::App for CharacterGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(cast)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            cast,
                            &self.options.config,
                        ))));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint_after(Duration::from_millis(50)),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading characters...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load characters");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.options));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.options.characters, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(&self.options));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(cast)) => model.replace_cast(cast),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint_after(Duration::from_millis(50));
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
