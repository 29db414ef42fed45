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

//! Weather display cards.
//!
//! Each card is an independent draw function taking the data it renders,
//! composed by the application shell. Provider icons load asynchronously;
//! an emoji stands in until the texture arrives.

use chrono::{DateTime, Local};
use egui::{RichText, Ui};
use owm_client::{model, DailyForecast, Units, WeatherSnapshot};

use crate::media::IconTextureManager;
use crate::ui::theme;

/// Render a temperature as the label text, e.g. "15°C".
pub fn format_temp(temp: f64, units: Units) -> String {
    format!("{:.0}°{}", temp, units.temp_symbol())
}

/// Emoji stand-in for a condition while its icon texture loads.
pub fn condition_emoji(main: &str, is_day: bool) -> &'static str {
    match main {
        "Clear" => {
            if is_day {
                "☀"
            } else {
                "🌙"
            }
        }
        "Clouds" => "☁",
        "Rain" => "🌧",
        "Drizzle" => "🌦",
        "Thunderstorm" => "⛈",
        "Snow" => "❄",
        "Mist" | "Fog" | "Haze" | "Smoke" | "Dust" | "Sand" | "Ash" => "🌫",
        "Squall" => "💨",
        "Tornado" => "🌪",
        _ => "🌤",
    }
}

fn format_unix_time(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

fn condition_icon(ui: &mut Ui, icons: &IconTextureManager, code: &str, main: &str, is_day: bool, edge: f32) {
    if let Some(texture) = icons.get_or_load(ui.ctx(), code) {
        ui.image((texture.id(), egui::vec2(edge, edge)));
    } else {
        ui.label(RichText::new(condition_emoji(main, is_day)).size(edge * 0.6));
    }
}

/// Large current-conditions card: city, temperature, condition, feels-like.
pub fn current_conditions(
    ui: &mut Ui,
    snapshot: &WeatherSnapshot,
    units: Units,
    icons: &IconTextureManager,
) {
    let accent = theme::temperature_accent(units.to_celsius(snapshot.main.temp));

    theme::glass_frame(theme::GLASS_MEDIUM).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    RichText::new(snapshot.city_label())
                        .size(26.0)
                        .strong()
                        .color(theme::TEXT_WHITE),
                );
                ui.label(
                    RichText::new(format_temp(snapshot.main.temp, units))
                        .size(56.0)
                        .strong()
                        .color(accent),
                );
                if let Some(condition) = snapshot.primary() {
                    let mut description: Vec<char> = condition.description.chars().collect();
                    if let Some(first) = description.first_mut() {
                        *first = first.to_ascii_uppercase();
                    }
                    ui.label(
                        RichText::new(description.into_iter().collect::<String>())
                            .size(17.0)
                            .color(theme::TEXT_LIGHT),
                    );
                }
                ui.label(
                    RichText::new(format!(
                        "Feels like {}",
                        format_temp(snapshot.main.feels_like, units)
                    ))
                    .size(13.0)
                    .color(theme::TEXT_MEDIUM),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(condition) = snapshot.primary() {
                    condition_icon(ui, icons, &condition.icon, &condition.main, condition.is_day(), 96.0);
                }
            });
        });
    });
}

/// 2x3 detail grid: humidity, wind, pressure, visibility, sunrise, sunset.
pub fn detail_grid(ui: &mut Ui, snapshot: &WeatherSnapshot, units: Units) {
    theme::glass_frame(theme::GLASS_DARK).show(ui, |ui| {
        egui::Grid::new("weather_details")
            .num_columns(3)
            .spacing([24.0, 10.0])
            .show(ui, |ui| {
                detail_cell(ui, "💧 Humidity", format!("{}%", snapshot.main.humidity));
                detail_cell(
                    ui,
                    "💨 Wind",
                    format!(
                        "{:.1} {} {}",
                        snapshot.wind.speed,
                        units.wind_unit(),
                        model::wind_direction(snapshot.wind.deg)
                    ),
                );
                detail_cell(ui, "🌡 Pressure", format!("{} hPa", snapshot.main.pressure));
                ui.end_row();

                let visibility = match snapshot.visibility {
                    Some(meters) => format!("{:.1} km", f64::from(meters) / 1000.0),
                    None => "N/A".to_string(),
                };
                detail_cell(ui, "👁 Visibility", visibility);
                detail_cell(ui, "🌅 Sunrise", format_unix_time(snapshot.sys.sunrise));
                detail_cell(ui, "🌇 Sunset", format_unix_time(snapshot.sys.sunset));
                ui.end_row();
            });
    });
}

fn detail_cell(ui: &mut Ui, title: &str, value: String) {
    ui.vertical(|ui| {
        ui.label(RichText::new(title).size(11.0).color(theme::TEXT_MEDIUM));
        ui.label(
            RichText::new(value)
                .size(14.0)
                .strong()
                .color(theme::TEXT_WHITE),
        );
    });
}

/// Horizontal strip of per-day forecast cards.
pub fn forecast_row(ui: &mut Ui, days: &[DailyForecast], units: Units, icons: &IconTextureManager) {
    ui.horizontal(|ui| {
        for day in days {
            forecast_card(ui, day, units, icons);
        }
    });
}

fn forecast_card(ui: &mut Ui, day: &DailyForecast, units: Units, icons: &IconTextureManager) {
    theme::glass_frame(theme::GLASS_DARK).show(ui, |ui| {
        ui.set_width(104.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(&day.label)
                    .size(13.0)
                    .strong()
                    .color(theme::TEXT_WHITE),
            );
            ui.add_space(4.0);
            condition_icon(ui, icons, &day.icon, &day.condition, day.icon.ends_with('d'), 44.0);
            ui.add_space(4.0);
            ui.label(
                RichText::new(format_temp(day.high, units))
                    .size(15.0)
                    .strong()
                    .color(theme::TEXT_WHITE),
            );
            ui.label(
                RichText::new(format_temp(day.low, units))
                    .size(13.0)
                    .color(theme::TEXT_MEDIUM),
            );
            ui.label(
                RichText::new(&day.description)
                    .size(10.0)
                    .color(theme::TEXT_MEDIUM),
            );
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_label_rounds_and_carries_symbol() {
        assert_eq!(format_temp(15.0, Units::Metric), "15°C");
        assert_eq!(format_temp(15.4, Units::Metric), "15°C");
        assert_eq!(format_temp(59.6, Units::Imperial), "60°F");
        assert_eq!(format_temp(288.2, Units::Standard), "288°K");
    }

    #[test]
    fn emoji_tracks_day_and_night_for_clear_skies() {
        assert_eq!(condition_emoji("Clear", true), "☀");
        assert_eq!(condition_emoji("Clear", false), "🌙");
        assert_eq!(condition_emoji("Haze", true), "🌫");
        assert_eq!(condition_emoji("Anything", true), "🌤");
    }
}
