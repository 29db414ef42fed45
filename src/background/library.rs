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

//! Background image selection.
//!
//! At startup a directory of background images is scanned once and matched
//! to weather-condition categories by filename keywords. Selection maps the
//! latest snapshot's condition and day/night flag to a category, falling
//! back to the default category and finally to a synthesized gradient
//! placeholder that is generated once and reused.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use log::{info, warn};
use owm_client::WeatherSnapshot;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

const PLACEHOLDER_WIDTH: u32 = 1200;
const PLACEHOLDER_HEIGHT: u32 = 800;
const PLACEHOLDER_TOP: [u8; 3] = [74, 144, 226];
const PLACEHOLDER_BOTTOM: [u8; 3] = [144, 102, 185];

/// Label grouping weather conditions to a representative image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundCategory {
    ClearDay,
    ClearNight,
    Clouds,
    Rain,
    Drizzle,
    Snow,
    Thunderstorm,
    Mist,
    Fog,
    Default,
}

impl BackgroundCategory {
    pub const ALL: [BackgroundCategory; 10] = [
        BackgroundCategory::ClearDay,
        BackgroundCategory::ClearNight,
        BackgroundCategory::Clouds,
        BackgroundCategory::Rain,
        BackgroundCategory::Drizzle,
        BackgroundCategory::Snow,
        BackgroundCategory::Thunderstorm,
        BackgroundCategory::Mist,
        BackgroundCategory::Fog,
        BackgroundCategory::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BackgroundCategory::ClearDay => "clear_day",
            BackgroundCategory::ClearNight => "clear_night",
            BackgroundCategory::Clouds => "clouds",
            BackgroundCategory::Rain => "rain",
            BackgroundCategory::Drizzle => "drizzle",
            BackgroundCategory::Snow => "snow",
            BackgroundCategory::Thunderstorm => "thunderstorm",
            BackgroundCategory::Mist => "mist",
            BackgroundCategory::Fog => "fog",
            BackgroundCategory::Default => "default",
        }
    }

    /// Filename keywords tried in order during the directory scan.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            BackgroundCategory::ClearDay => &["sunny", "clear_day", "sunshine", "clear", "day"],
            BackgroundCategory::ClearNight => {
                &["clear_night", "starry_night", "night_clear", "night", "stars"]
            }
            BackgroundCategory::Clouds => &["cloudy", "overcast", "clouds", "cloud"],
            BackgroundCategory::Rain => &["rainy", "rain", "storm", "raining"],
            BackgroundCategory::Drizzle => &["drizzle", "light_rain", "misty", "mist"],
            BackgroundCategory::Snow => &["snowy", "snow", "winter", "snowing"],
            BackgroundCategory::Thunderstorm => &["thunderstorm", "storm", "lightning", "thunder"],
            BackgroundCategory::Mist => &["misty", "fog", "hazy", "mist"],
            BackgroundCategory::Fog => &["fog", "misty", "hazy", "foggy"],
            BackgroundCategory::Default => &["default", "sky", "landscape", "background"],
        }
    }

    /// Map a provider condition group and day/night flag to a category.
    pub fn for_condition(condition: &str, is_day: bool) -> Self {
        match condition.to_lowercase().as_str() {
            "thunderstorm" | "squall" | "tornado" => BackgroundCategory::Thunderstorm,
            "drizzle" => BackgroundCategory::Drizzle,
            "rain" => BackgroundCategory::Rain,
            "snow" => BackgroundCategory::Snow,
            "mist" | "smoke" | "haze" | "dust" | "sand" | "ash" => BackgroundCategory::Mist,
            "fog" => BackgroundCategory::Fog,
            "clear" => {
                if is_day {
                    BackgroundCategory::ClearDay
                } else {
                    BackgroundCategory::ClearNight
                }
            }
            "clouds" => BackgroundCategory::Clouds,
            _ => BackgroundCategory::Default,
        }
    }
}

/// Condition-category to file-path mapping, built once at startup.
pub struct BackgroundLibrary {
    assets: HashMap<BackgroundCategory, PathBuf>,
    scratch_dir: PathBuf,
    placeholder: Option<PathBuf>,
}

impl BackgroundLibrary {
    /// Scan `backgrounds_dir` and match files to categories by keyword.
    /// `scratch_dir` holds the synthesized placeholder if one is needed.
    pub fn scan(backgrounds_dir: &Path, scratch_dir: PathBuf) -> Self {
        let found = list_image_files(backgrounds_dir);
        info!(
            "found {} background candidate(s) in {}",
            found.len(),
            backgrounds_dir.display()
        );

        let mut assets = HashMap::new();
        for category in BackgroundCategory::ALL {
            'keywords: for keyword in category.keywords() {
                for path in &found {
                    if file_name_contains(path, keyword) && looks_like_image(path) {
                        assets.insert(category, path.clone());
                        break 'keywords;
                    }
                }
            }
        }

        // Nothing matched by keyword: press the first readable file into
        // service as the default.
        if assets.is_empty() {
            if let Some(path) = found.iter().find(|p| looks_like_image(p)) {
                assets.insert(BackgroundCategory::Default, path.clone());
            }
        }

        for (category, path) in &assets {
            info!("mapped background '{}' to {}", category.as_str(), path.display());
        }

        Self {
            assets,
            scratch_dir,
            placeholder: None,
        }
    }

    /// Category the given snapshot (or its absence) falls into.
    pub fn category_for(snapshot: Option<&WeatherSnapshot>) -> BackgroundCategory {
        snapshot
            .and_then(WeatherSnapshot::primary)
            .map(|c| BackgroundCategory::for_condition(&c.main, c.is_day()))
            .unwrap_or(BackgroundCategory::Default)
    }

    /// File to use as the window background for the given snapshot.
    pub fn select(&mut self, snapshot: Option<&WeatherSnapshot>) -> Option<PathBuf> {
        let category = Self::category_for(snapshot);
        if let Some(path) = self.assets.get(&category) {
            return Some(path.clone());
        }
        if let Some(path) = self.assets.get(&BackgroundCategory::Default) {
            return Some(path.clone());
        }
        self.placeholder_path()
    }

    /// Synthesized vertical-gradient fallback, generated once then reused.
    fn placeholder_path(&mut self) -> Option<PathBuf> {
        if let Some(path) = &self.placeholder {
            return Some(path.clone());
        }

        if let Err(e) = fs::create_dir_all(&self.scratch_dir) {
            warn!("cannot create scratch directory for placeholder: {e}");
            return None;
        }
        let path = self.scratch_dir.join("default_background.png");
        let image = gradient_placeholder(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
        if let Err(e) = image.save(&path) {
            warn!("failed to write placeholder background: {e}");
            return None;
        }

        info!("synthesized placeholder background at {}", path.display());
        self.placeholder = Some(path.clone());
        Some(path)
    }
}

fn gradient_placeholder(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| {
        let t = y as f32 / height as f32;
        let channel =
            |i: usize| (f32::from(PLACEHOLDER_TOP[i]) + (f32::from(PLACEHOLDER_BOTTOM[i]) - f32::from(PLACEHOLDER_TOP[i])) * t) as u8;
        Rgb([channel(0), channel(1), channel(2)])
    })
}

fn list_image_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect();
    files.sort();
    files
}

fn file_name_contains(path: &Path, keyword: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_lowercase().contains(keyword))
}

/// Header sniff so an empty or mislabeled file never becomes an asset.
fn looks_like_image(path: &Path) -> bool {
    image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map(|reader| reader.format().is_some())
        .unwrap_or(false)
}
