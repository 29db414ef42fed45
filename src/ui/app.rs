// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application shell.
//!
//! Composes the widgets and owns the event loop glue: drains worker results
//! from the channel at the top of each frame, ticks the refresh and debounce
//! timers, dispatches one-shot worker threads for fetches, geocoding
//! lookups, and glass rendering, and paints the backdrop under the panels.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{info, warn};
use owm_client::{Units, WeatherClient};

use crate::background::{render_glass, BackgroundLibrary};
use crate::config::AppConfig;
use crate::media::IconTextureManager;
use crate::ui::cards;
use crate::ui::controller::{AppEvent, Controller, CountdownTimer, Phase, WeatherBundle};
use crate::ui::search::{SearchAction, SearchBox};
use crate::ui::status_bar::status_bar;
use crate::ui::theme;

const RESIZE_DEBOUNCE: Duration = Duration::from_millis(500);
const REPAINT_INTERVAL: Duration = Duration::from_millis(500);
const FORECAST_DAYS: usize = 5;
const SUGGESTION_LIMIT: usize = 5;

/// UI actions collected during a frame and applied afterwards.
#[derive(Default)]
struct FrameActions {
    submit: Option<String>,
    units: Option<Units>,
    auto_refresh: Option<bool>,
}

pub struct WeatherApp {
    client: Arc<WeatherClient>,
    controller: Controller,
    search: SearchBox,
    backgrounds: BackgroundLibrary,
    icons: IconTextureManager,
    config: AppConfig,

    events_tx: Sender<AppEvent>,
    events_rx: Receiver<AppEvent>,

    glass_texture: Option<egui::TextureHandle>,
    glass_source: Option<PathBuf>,
    glass_size: [u32; 2],
    resize_debounce: CountdownTimer,
    last_size: [u32; 2],

    settings_open: bool,
}

impl WeatherApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let client = Arc::new(WeatherClient::new(config.client_config()));
        let (events_tx, events_rx) = mpsc::channel();

        let scratch = AppConfig::scratch_dir();
        let backgrounds =
            BackgroundLibrary::scan(&config.backgrounds_path(), scratch.join("backgrounds"));
        let icons = IconTextureManager::new(scratch.join("icons"));

        let controller = Controller::new(
            config.default_city.clone(),
            config.default_units,
            config.auto_refresh,
            Duration::from_secs(config.refresh_interval_secs),
        );

        let mut app = Self {
            client,
            controller,
            search: SearchBox::new(&config.default_city),
            backgrounds,
            icons,
            config,
            events_tx,
            events_rx,
            glass_texture: None,
            glass_source: None,
            glass_size: [0, 0],
            resize_debounce: CountdownTimer::default(),
            last_size: [0, 0],
            settings_open: false,
        };

        // Backdrop before any data arrives; the window has not been measured
        // yet, so render at the configured size and let the resize debounce
        // correct it.
        if let Some(source) = app.backgrounds.select(None) {
            app.start_glass_render(
                &cc.egui_ctx,
                source,
                [
                    crate::config::WINDOW_WIDTH as u32,
                    crate::config::WINDOW_HEIGHT as u32,
                ],
            );
        }

        let city = app.controller.city.clone();
        app.start_fetch(&cc.egui_ctx, city);
        app
    }

    fn start_fetch(&mut self, ctx: &egui::Context, city: String) {
        info!("fetching weather for '{city}'");
        self.controller.begin_fetch(city.clone());

        let client = self.client.clone();
        let units = self.controller.units;
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let outcome = client.current_weather(&city, units).map(|current| {
                // Forecast failure degrades to a current-conditions view.
                let forecast = client.forecast(&city, units).ok();
                WeatherBundle { current, forecast }
            });
            if tx.send(AppEvent::Weather { city, units, outcome }).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn start_search(&self, ctx: &egui::Context, query: String) {
        let client = self.client.clone();
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let matches = client
                .search_cities(&query, SUGGESTION_LIMIT)
                .unwrap_or_default();
            if tx.send(AppEvent::Suggestions { query, matches }).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn start_glass_render(&self, ctx: &egui::Context, source: PathBuf, size: [u32; 2]) {
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || match render_glass(&source, size[0], size[1]) {
            Ok(image) => {
                if tx.send(AppEvent::Glass { source, size, image }).is_ok() {
                    ctx.request_repaint();
                }
            }
            // A bad asset keeps the previous background on screen.
            Err(e) => warn!("background render failed for {}: {e}", source.display()),
        });
    }

    /// Re-render the backdrop when the selected asset or window size moved.
    fn refresh_background(&mut self, ctx: &egui::Context) {
        let size = canvas_size(ctx);
        let Some(source) = self.backgrounds.select(self.controller.snapshot()) else {
            return;
        };
        if self.glass_texture.is_some()
            && self.glass_source.as_ref() == Some(&source)
            && self.glass_size == size
        {
            return;
        }
        self.start_glass_render(ctx, source, size);
    }

    fn handle_event(&mut self, ctx: &egui::Context, event: AppEvent) {
        match event {
            AppEvent::Weather { city, units, outcome } => {
                info!("fetch for '{city}' ({units}) completed");
                self.controller.apply_weather(outcome, Instant::now());
                if self.controller.phase() == Phase::Ready {
                    self.refresh_background(ctx);
                }
            }
            AppEvent::Suggestions { query, matches } => {
                self.search.set_suggestions(&query, matches);
            }
            AppEvent::Glass { source, size, image } => {
                self.glass_texture = Some(ctx.load_texture(
                    "glass_background",
                    image,
                    egui::TextureOptions::LINEAR,
                ));
                self.glass_source = Some(source);
                self.glass_size = size;
            }
        }
    }

    fn draw(&mut self, ctx: &egui::Context, now: Instant) -> FrameActions {
        let mut actions = FrameActions::default();

        // Backdrop under every panel.
        let painter = ctx.layer_painter(egui::LayerId::background());
        let screen = ctx.screen_rect();
        if let Some(texture) = &self.glass_texture {
            painter.image(
                texture.id(),
                screen,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        } else {
            painter.rect_filled(screen, egui::CornerRadius::ZERO, theme::MAIN_BG);
        }

        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::new()
                    .fill(theme::GLASS_DARKER)
                    .inner_margin(egui::Margin::symmetric(12, 5)),
            )
            .show(ctx, |ui| status_bar(ui, &self.controller));

        egui::CentralPanel::default()
            .frame(egui::Frame::new().inner_margin(egui::Margin::same(24)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(action) = self.search.ui(ui, now) {
                        match action {
                            SearchAction::Submit(city) => actions.submit = Some(city),
                            // Suggest never comes from the draw path.
                            SearchAction::Suggest(_) => {}
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .button(egui::RichText::new("⚙").size(16.0))
                            .on_hover_text("Settings")
                            .clicked()
                        {
                            self.settings_open = !self.settings_open;
                        }
                        if ui
                            .button(egui::RichText::new("🔄").size(16.0))
                            .on_hover_text("Refresh now")
                            .clicked()
                        {
                            actions.submit = Some(self.controller.city.clone());
                        }
                    });
                });
                ui.add_space(12.0);

                if self.controller.phase() == Phase::Error {
                    egui::Frame::new()
                        .fill(theme::ERROR)
                        .corner_radius(egui::CornerRadius::same(8))
                        .inner_margin(egui::Margin::same(10))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(self.controller.status())
                                    .color(theme::TEXT_WHITE)
                                    .size(13.0),
                            );
                        });
                    ui.add_space(12.0);
                }

                match self.controller.snapshot() {
                    Some(snapshot) => {
                        cards::current_conditions(ui, snapshot, self.controller.units, &self.icons);
                        ui.add_space(12.0);
                        cards::detail_grid(ui, snapshot, self.controller.units);

                        if let Some(forecast) = self.controller.forecast() {
                            ui.add_space(16.0);
                            ui.label(
                                egui::RichText::new("5-Day Forecast")
                                    .size(18.0)
                                    .strong()
                                    .color(theme::TEXT_WHITE),
                            );
                            ui.add_space(6.0);
                            let days = forecast.daily(Utc::now().date_naive(), FORECAST_DAYS);
                            cards::forecast_row(ui, &days, self.controller.units, &self.icons);
                        }
                    }
                    None if self.controller.phase() == Phase::Loading => {
                        ui.vertical_centered(|ui| {
                            ui.add_space(80.0);
                            ui.add(egui::Spinner::new().size(32.0));
                            ui.label(
                                egui::RichText::new("Loading weather data...")
                                    .color(theme::TEXT_MEDIUM),
                            );
                        });
                    }
                    None => {
                        ui.vertical_centered(|ui| {
                            ui.add_space(80.0);
                            ui.label(
                                egui::RichText::new("Search for a city to get started")
                                    .size(16.0)
                                    .color(theme::TEXT_MEDIUM),
                            );
                        });
                    }
                }
            });

        let mut settings_open = self.settings_open;
        egui::Window::new("Settings")
            .open(&mut settings_open)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 48.0))
            .show(ctx, |ui| {
                let mut units = self.controller.units;
                egui::ComboBox::from_label("Temperature Units")
                    .selected_text(units.label())
                    .show_ui(ui, |ui| {
                        for candidate in Units::ALL {
                            ui.selectable_value(&mut units, candidate, candidate.label());
                        }
                    });
                if units != self.controller.units {
                    actions.units = Some(units);
                }

                let mut auto_refresh = self.controller.auto_refresh;
                if ui.checkbox(&mut auto_refresh, "Auto refresh").changed() {
                    actions.auto_refresh = Some(auto_refresh);
                }

                if let Ok(path) = AppConfig::config_path() {
                    ui.add_space(6.0);
                    ui.label(
                        egui::RichText::new(format!("Config: {}", path.display()))
                            .size(10.0)
                            .color(theme::TEXT_DARK),
                    );
                }
            });
        self.settings_open = settings_open;

        actions
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            warn!("failed to persist configuration: {e}");
        }
    }
}

impl eframe::App for WeatherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep the clock and timers moving even without input events.
        ctx.request_repaint_after(REPAINT_INTERVAL);
        let now = Instant::now();

        // Drain worker results first so this frame renders current state.
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(ctx, event);
        }

        // Auto-refresh deadline.
        if self.controller.tick(now) {
            let city = self.controller.city.clone();
            self.start_fetch(ctx, city);
        }

        // Window resizes re-render the backdrop once the size settles.
        let size = canvas_size(ctx);
        if size != self.last_size {
            self.last_size = size;
            if self.glass_texture.is_some() {
                self.resize_debounce.arm(now, RESIZE_DEBOUNCE);
            }
        }
        if self.resize_debounce.fire(now) {
            self.refresh_background(ctx);
        }

        // Typing debounce for geocoding suggestions.
        if let Some(SearchAction::Suggest(query)) = self.search.poll(now) {
            self.start_search(ctx, query);
        }

        let actions = self.draw(ctx, now);

        if let Some(units) = actions.units {
            if self.controller.set_units(units) {
                self.config.default_units = units;
                self.save_config();
                let city = self.controller.city.clone();
                self.start_fetch(ctx, city);
            }
        }
        if let Some(enabled) = actions.auto_refresh {
            self.controller.set_auto_refresh(enabled, now);
            self.config.auto_refresh = enabled;
            self.save_config();
        }
        if let Some(city) = actions.submit {
            self.start_fetch(ctx, city);
        }
    }
}

fn canvas_size(ctx: &egui::Context) -> [u32; 2] {
    let size = ctx.screen_rect().size();
    [
        (size.x.round() as u32).max(1),
        (size.y.round() as u32).max(1),
    ]
}
