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

//! Glass palette and temperature-based accents.

use egui::{Color32, CornerRadius, Margin, Stroke};

pub const MAIN_BG: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x1a);
pub const GLASS_LIGHT: Color32 = Color32::from_rgba_premultiplied(0x2d, 0x2d, 0x2d, 0xe0);
pub const GLASS_MEDIUM: Color32 = Color32::from_rgba_premultiplied(0x24, 0x24, 0x24, 0xd0);
pub const GLASS_DARK: Color32 = Color32::from_rgba_premultiplied(0x1f, 0x1f, 0x1f, 0xc0);
pub const GLASS_DARKER: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x1a);
pub const ACCENT: Color32 = Color32::from_rgb(0x3d, 0x8b, 0xff);
pub const TEXT_WHITE: Color32 = Color32::from_rgb(0xff, 0xff, 0xff);
pub const TEXT_LIGHT: Color32 = Color32::from_rgb(0xe0, 0xe0, 0xe0);
pub const TEXT_MEDIUM: Color32 = Color32::from_rgb(0xb0, 0xb0, 0xb0);
pub const TEXT_DARK: Color32 = Color32::from_rgb(0x80, 0x80, 0x80);
pub const BORDER_LIGHT: Color32 = Color32::from_rgb(0x40, 0x40, 0x40);
pub const WARNING: Color32 = Color32::from_rgb(0xff, 0xc1, 0x07);
pub const ERROR: Color32 = Color32::from_rgb(0xdc, 0x35, 0x45);

/// Rounded translucent card frame used throughout the window.
pub fn glass_frame(fill: Color32) -> egui::Frame {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(CornerRadius::same(12))
        .inner_margin(Margin::same(16))
        .stroke(Stroke::new(1.0, BORDER_LIGHT))
}

/// Accent color for a temperature given in Celsius.
pub fn temperature_accent(celsius: f64) -> Color32 {
    if celsius < 0.0 {
        Color32::from_rgb(0x4a, 0x90, 0xe2)
    } else if celsius < 15.0 {
        Color32::from_rgb(0x34, 0x98, 0xdb)
    } else if celsius < 25.0 {
        Color32::from_rgb(0x27, 0xae, 0x60)
    } else if celsius < 35.0 {
        Color32::from_rgb(0xf3, 0x9c, 0x12)
    } else if celsius < 40.0 {
        Color32::from_rgb(0xd3, 0x54, 0x00)
    } else {
        Color32::from_rgb(0xc0, 0x39, 0x2b)
    }
}
