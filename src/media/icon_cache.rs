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

//! Weather icon texture cache and loading.
//!
//! Manages background downloads of provider icon PNGs, conversion to egui
//! textures, and disk caching with SHA256-based filenames. Prevents
//! duplicate downloads for the same icon code; a failed download simply
//! leaves the emoji fallback on screen.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::warn;
use sha2::{Digest, Sha256};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn/";
const ICON_SIZE_SUFFIX: &str = "@2x";

/// Displayed icon edge in pixels.
const ICON_EDGE: u32 = 64;

/// Disk cache of downloaded icon bytes.
#[derive(Debug, Clone)]
pub struct IconCache {
    cache_dir: PathBuf,
}

impl IconCache {
    pub fn new(cache_dir: PathBuf) -> Result<Self, std::io::Error> {
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// Provider URL for an icon code, e.g. "04d".
    pub fn icon_url(code: &str) -> String {
        format!("{ICON_BASE_URL}{code}{ICON_SIZE_SUFFIX}.png")
    }

    /// Hash the URL into the cache filename to avoid filesystem issues.
    fn cache_path(&self, code: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(Self::icon_url(code).as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        self.cache_dir.join(format!("{hash}.png"))
    }

    pub fn cached_bytes(&self, code: &str) -> Option<Vec<u8>> {
        fs::read(self.cache_path(code)).ok()
    }

    pub fn store(&self, code: &str, bytes: &[u8]) -> Result<(), std::io::Error> {
        fs::write(self.cache_path(code), bytes)
    }
}

/// Manages loading weather icons into egui textures.
pub struct IconTextureManager {
    cache: Option<IconCache>,
    textures: Arc<Mutex<HashMap<String, egui::TextureHandle>>>,
    loading: Arc<Mutex<HashSet<String>>>,
}

impl IconTextureManager {
    /// A failed cache directory degrades to download-only operation.
    pub fn new(cache_dir: PathBuf) -> Self {
        let cache = match IconCache::new(cache_dir) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("icon disk cache unavailable: {e}");
                None
            }
        };
        Self {
            cache,
            textures: Arc::new(Mutex::new(HashMap::new())),
            loading: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Texture for an icon code, kicking off a background download on miss.
    /// Returns `None` while the download is in flight.
    pub fn get_or_load(&self, ctx: &egui::Context, code: &str) -> Option<egui::TextureHandle> {
        {
            let textures = self.textures.lock().unwrap();
            if let Some(texture) = textures.get(code) {
                return Some(texture.clone());
            }
        }

        if let Some(bytes) = self.cache.as_ref().and_then(|c| c.cached_bytes(code)) {
            if let Some(texture) = load_texture_from_bytes(ctx, &bytes, code) {
                self.textures
                    .lock()
                    .unwrap()
                    .insert(code.to_string(), texture.clone());
                return Some(texture);
            }
        }

        {
            let loading = self.loading.lock().unwrap();
            if loading.contains(code) {
                return None; // Still loading
            }
        }

        self.loading.lock().unwrap().insert(code.to_string());
        let cache = self.cache.clone();
        let textures = self.textures.clone();
        let loading = self.loading.clone();
        let ctx = ctx.clone();
        let code = code.to_string();

        std::thread::spawn(move || {
            match fetch_icon_bytes(&code) {
                Ok(bytes) => {
                    if let Some(cache) = &cache {
                        if let Err(e) = cache.store(&code, &bytes) {
                            warn!("failed to cache icon {code}: {e}");
                        }
                    }
                    if let Some(texture) = load_texture_from_bytes(&ctx, &bytes, &code) {
                        textures.lock().unwrap().insert(code.clone(), texture);
                        ctx.request_repaint();
                    }
                }
                Err(e) => warn!("failed to download icon {code}: {e}"),
            }
            loading.lock().unwrap().remove(&code);
        });

        None
    }
}

fn fetch_icon_bytes(code: &str) -> Result<Vec<u8>, String> {
    let response =
        reqwest::blocking::get(IconCache::icon_url(code)).map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    response
        .bytes()
        .map(|bytes| bytes.to_vec())
        .map_err(|e| e.to_string())
}

fn load_texture_from_bytes(
    ctx: &egui::Context,
    bytes: &[u8],
    code: &str,
) -> Option<egui::TextureHandle> {
    let image = image::load_from_memory(bytes).ok()?;
    let thumbnail = image.resize(ICON_EDGE, ICON_EDGE, image::imageops::FilterType::Lanczos3);
    let rgba = thumbnail.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];

    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    Some(ctx.load_texture(
        format!("weather_icon_{code}"),
        color_image,
        egui::TextureOptions::LINEAR,
    ))
}
