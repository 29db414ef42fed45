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

//! Glass-effect background rendering.
//!
//! Turns a background asset into the window backdrop: resize to cover the
//! target area (aspect-preserving), center-crop, heavy blur, then darken.
//! Runs on a worker thread since the blur is the most expensive operation in
//! the application.

use std::path::Path;

use egui::ColorImage;
use image::imageops::{self, FilterType};
use thiserror::Error;

/// Gaussian blur sigma for the glass effect.
const GLASS_BLUR_SIGMA: f32 = 25.0;

/// Brightness fraction applied after the blur.
const GLASS_BRIGHTNESS: f32 = 0.4;

/// Failures at the image layer. Swallowed by the caller: a bad asset keeps
/// the previous background on screen.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load image: {0}")]
    Load(#[from] image::ImageError),

    #[error("target area is empty")]
    EmptyTarget,
}

/// Produce the blurred, darkened backdrop for the given window size.
pub fn render_glass(path: &Path, width: u32, height: u32) -> Result<ColorImage, AssetError> {
    if width == 0 || height == 0 {
        return Err(AssetError::EmptyTarget);
    }

    let source = image::open(path)?;
    let (scaled_w, scaled_h) = cover_size((source.width(), source.height()), (width, height));
    let scaled = source.resize_exact(scaled_w, scaled_h, FilterType::Lanczos3);
    let (crop_x, crop_y) = crop_origin((scaled_w, scaled_h), (width, height));
    let cropped = scaled.crop_imm(crop_x, crop_y, width, height).to_rgba8();

    let mut glass = imageops::fast_blur(&cropped, GLASS_BLUR_SIGMA);
    for pixel in glass.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = (f32::from(*channel) * GLASS_BRIGHTNESS) as u8;
        }
    }

    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        glass.as_raw(),
    ))
}

/// Scaled dimensions that cover `target` while preserving aspect ratio.
fn cover_size(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = (f64::from(source.0.max(1)), f64::from(source.1.max(1)));
    let (tw, th) = (f64::from(target.0), f64::from(target.1));
    let scale = (tw / sw).max(th / sh);
    (
        ((sw * scale).round() as u32).max(target.0),
        ((sh * scale).round() as u32).max(target.1),
    )
}

/// Top-left corner of a centered `target` crop out of `scaled`.
fn crop_origin(scaled: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    ((scaled.0 - target.0) / 2, (scaled.1 - target.1) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn cover_scales_wide_source_by_height() {
        // 200x100 source into a 100x100 target: height drives the scale.
        assert_eq!(cover_size((200, 100), (100, 100)), (200, 100));
    }

    #[test]
    fn cover_scales_tall_source_by_width() {
        assert_eq!(cover_size((100, 200), (100, 100)), (100, 200));
    }

    #[test]
    fn cover_upscales_small_source() {
        assert_eq!(cover_size((50, 50), (100, 200)), (200, 200));
    }

    #[test]
    fn cover_never_undershoots_target() {
        let (w, h) = cover_size((1333, 777), (1200, 800));
        assert!(w >= 1200 && h >= 800);
    }

    #[test]
    fn crop_is_centered() {
        assert_eq!(crop_origin((200, 100), (100, 100)), (50, 0));
        assert_eq!(crop_origin((100, 200), (100, 100)), (0, 50));
        assert_eq!(crop_origin((100, 100), (100, 100)), (0, 0));
    }

    #[test]
    fn render_produces_darkened_target_sized_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flat.png");
        RgbImage::from_pixel(16, 8, Rgb([200, 100, 50])).save(&path).unwrap();

        let glass = render_glass(&path, 8, 8).unwrap();

        assert_eq!(glass.size, [8, 8]);
        // Blurring a flat color leaves it flat; only the darkening shows.
        let center = glass.pixels[4 * 8 + 4];
        assert!((i32::from(center.r()) - 80).abs() <= 2);
        assert!((i32::from(center.g()) - 40).abs() <= 2);
        assert!((i32::from(center.b()) - 20).abs() <= 2);
        assert_eq!(center.a(), 255);
    }

    #[test]
    fn missing_file_is_an_asset_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.png");

        assert!(matches!(
            render_glass(&missing, 8, 8),
            Err(AssetError::Load(_))
        ));
    }

    #[test]
    fn zero_sized_target_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flat.png");
        RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])).save(&path).unwrap();

        assert!(matches!(
            render_glass(&path, 0, 8),
            Err(AssetError::EmptyTarget)
        ));
    }
}
