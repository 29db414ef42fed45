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

//! Weatherglass entry point: CLI parsing, logging, configuration, and the
//! native window bootstrap.

mod background;
mod config;
mod media;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use log::{info, warn};
use owm_client::Units;

use crate::config::AppConfig;
use crate::ui::WeatherApp;

/// Command-line overrides for a single run. Anything not given here comes
/// from the persisted configuration file.
#[derive(Debug, Parser)]
#[command(name = "weatherglass", about = "Desktop weather dashboard", version)]
struct Args {
    /// City to load on startup
    #[arg(long)]
    city: Option<String>,

    /// Measurement system: metric, imperial, or standard
    #[arg(long)]
    units: Option<Units>,

    /// Directory of background images scanned at startup
    #[arg(long)]
    backgrounds_dir: Option<PathBuf>,

    /// OpenWeatherMap API key
    #[arg(long)]
    api_key: Option<String>,
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("failed to load configuration, using defaults: {e}");
            AppConfig::default()
        }
    };
    if let Some(city) = args.city {
        config.default_city = city;
    }
    if let Some(units) = args.units {
        config.default_units = units;
    }
    if let Some(dir) = args.backgrounds_dir {
        config.backgrounds_dir = Some(dir);
    }
    if let Some(key) = args.api_key {
        config.api_key = Some(key);
    }

    if config.resolve_api_key().is_none() {
        warn!(
            "no API key configured; set OPENWEATHERMAP_API_KEY or edit {}",
            AppConfig::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string())
        );
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config::WINDOW_WIDTH, config::WINDOW_HEIGHT])
            .with_min_inner_size([config::WINDOW_MIN_WIDTH, config::WINDOW_MIN_HEIGHT])
            .with_title(config::APP_NAME),
        ..Default::default()
    };

    info!("starting {}", config::APP_NAME);
    eframe::run_native(
        config::APP_NAME,
        options,
        Box::new(move |cc| Ok(Box::new(WeatherApp::new(cc, config)))),
    )
}
