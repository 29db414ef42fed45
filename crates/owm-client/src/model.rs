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

//! Typed views over OpenWeatherMap responses.
//!
//! Only the fields the application consumes are modeled; unknown fields are
//! ignored during deserialization. Derived helpers (day/night flag, daily
//! forecast grouping, wind cardinal direction) live here too, next to the
//! data they are derived from.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Measurement system sent to the provider with every request.
///
/// `Standard` is OpenWeatherMap's absolute scale: temperatures in Kelvin,
/// wind in m/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub const ALL: [Units; 3] = [Units::Metric, Units::Imperial, Units::Standard];

    /// Value of the `units` query parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub fn temp_symbol(self) -> &'static str {
        match self {
            Units::Metric => "C",
            Units::Imperial => "F",
            Units::Standard => "K",
        }
    }

    pub fn wind_unit(self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Standard => "m/s",
        }
    }

    /// Human-readable label for settings menus.
    pub fn label(self) -> &'static str {
        match self {
            Units::Metric => "Metric (°C)",
            Units::Imperial => "Imperial (°F)",
            Units::Standard => "Standard (K)",
        }
    }

    /// Convert a temperature reported in this system to Celsius.
    pub fn to_celsius(self, temp: f64) -> f64 {
        match self {
            Units::Metric => temp,
            Units::Imperial => (temp - 32.0) * 5.0 / 9.0,
            Units::Standard => temp - 273.15,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            // The provider treats "kelvin" as an alias for its default scale.
            "standard" | "kelvin" => Ok(Units::Standard),
            other => Err(format!("unknown units '{other}'")),
        }
    }
}

/// One weather condition as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    /// Condition group, e.g. "Clear", "Clouds", "Rain".
    pub main: String,
    /// Longer description, e.g. "scattered clouds".
    pub description: String,
    /// Icon code, e.g. "04d". The suffix encodes day ('d') or night ('n').
    pub icon: String,
}

impl Condition {
    pub fn is_day(&self) -> bool {
        self.icon.ends_with('d')
    }
}

/// Thermodynamic readings shared by current and forecast responses.
#[derive(Debug, Clone, Deserialize)]
pub struct Readings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: u32,
    #[serde(default)]
    pub pressure: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SysInfo {
    #[serde(default)]
    pub country: Option<String>,
    /// Sunrise as a unix timestamp.
    #[serde(default)]
    pub sunrise: i64,
    /// Sunset as a unix timestamp.
    #[serde(default)]
    pub sunset: i64,
}

/// Deserialized current-weather response. Read-only after fetch; replaced
/// wholesale on each refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSnapshot {
    /// Resolved city name.
    pub name: String,
    #[serde(default)]
    pub sys: SysInfo,
    pub weather: Vec<Condition>,
    pub main: Readings,
    #[serde(default)]
    pub wind: Wind,
    /// Visibility in meters, when reported.
    #[serde(default)]
    pub visibility: Option<u32>,
    /// Observation time as a unix timestamp.
    pub dt: i64,
}

impl WeatherSnapshot {
    /// The leading condition entry, which the provider documents as primary.
    pub fn primary(&self) -> Option<&Condition> {
        self.weather.first()
    }

    pub fn is_day(&self) -> bool {
        self.primary().is_some_and(Condition::is_day)
    }

    /// "City, CC" label for display.
    pub fn city_label(&self) -> String {
        match self.sys.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// One 3-hour slot of the 5-day forecast.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// Slot time as a unix timestamp.
    pub dt: i64,
    pub main: Readings,
    pub weather: Vec<Condition>,
}

/// Deserialized 5-day/3-hour forecast response.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSet {
    pub list: Vec<ForecastEntry>,
}

/// One calendar day distilled from the 3-hour entries.
#[derive(Debug, Clone)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// "Today", "Tomorrow", or a weekday abbreviation.
    pub label: String,
    pub high: f64,
    pub low: f64,
    /// Dominant condition group across the day's slots.
    pub condition: String,
    /// Dominant icon code across the day's slots.
    pub icon: String,
    /// Dominant description across the day's slots.
    pub description: String,
}

impl ForecastSet {
    /// Group entries by UTC calendar day and distill each day into a card.
    ///
    /// `today` anchors the "Today"/"Tomorrow" labels so the derivation stays
    /// deterministic under test.
    pub fn daily(&self, today: NaiveDate, max_days: usize) -> Vec<DailyForecast> {
        let mut by_day: BTreeMap<NaiveDate, Vec<&ForecastEntry>> = BTreeMap::new();
        for entry in &self.list {
            if let Some(ts) = DateTime::from_timestamp(entry.dt, 0) {
                by_day.entry(ts.date_naive()).or_default().push(entry);
            }
        }

        by_day
            .into_iter()
            .take(max_days)
            .map(|(date, entries)| {
                let high = entries
                    .iter()
                    .map(|e| e.main.temp)
                    .fold(f64::NEG_INFINITY, f64::max);
                let low = entries
                    .iter()
                    .map(|e| e.main.temp)
                    .fold(f64::INFINITY, f64::min);

                let condition =
                    most_common(entries.iter().filter_map(|e| e.weather.first()).map(|c| c.main.as_str()))
                        .unwrap_or_default();
                let icon =
                    most_common(entries.iter().filter_map(|e| e.weather.first()).map(|c| c.icon.as_str()))
                        .unwrap_or_default();
                let description = most_common(
                    entries
                        .iter()
                        .filter_map(|e| e.weather.first())
                        .map(|c| c.description.as_str()),
                )
                .unwrap_or_default();

                let label = if date == today {
                    "Today".to_string()
                } else if Some(date) == today.succ_opt() {
                    "Tomorrow".to_string()
                } else {
                    date.format("%a").to_string()
                };

                DailyForecast {
                    date,
                    label,
                    high,
                    low,
                    condition,
                    icon,
                    description,
                }
            })
            .collect()
    }
}

/// One geocoding match for a search query.
#[derive(Debug, Clone, Deserialize)]
pub struct CityMatch {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl CityMatch {
    /// "City, State, CC" label with absent parts elided.
    pub fn label(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if let Some(state) = self.state.as_deref().filter(|s| !s.is_empty()) {
            parts.push(state.to_string());
        }
        if let Some(country) = self.country.as_deref().filter(|c| !c.is_empty()) {
            parts.push(country.to_string());
        }
        parts.join(", ")
    }
}

/// Convert wind degrees to a 16-point cardinal direction.
pub fn wind_direction(degrees: f64) -> &'static str {
    const DIRECTIONS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let index = (degrees.rem_euclid(360.0) / 22.5).round() as usize % 16;
    DIRECTIONS[index]
}

fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(dt: i64, temp: f64, main: &str, icon: &str) -> ForecastEntry {
        serde_json::from_value(json!({
            "dt": dt,
            "main": {"temp": temp},
            "weather": [{"main": main, "description": main.to_lowercase(), "icon": icon}],
        }))
        .unwrap()
    }

    #[test]
    fn units_query_values() {
        assert_eq!(Units::Metric.as_query(), "metric");
        assert_eq!(Units::Imperial.as_query(), "imperial");
        assert_eq!(Units::Standard.as_query(), "standard");
    }

    #[test]
    fn units_parse_accepts_kelvin_alias() {
        assert_eq!("kelvin".parse::<Units>(), Ok(Units::Standard));
        assert_eq!("Imperial".parse::<Units>(), Ok(Units::Imperial));
        assert!("furlongs".parse::<Units>().is_err());
    }

    #[test]
    fn units_to_celsius() {
        assert!((Units::Metric.to_celsius(15.0) - 15.0).abs() < 1e-9);
        assert!((Units::Imperial.to_celsius(59.0) - 15.0).abs() < 1e-9);
        assert!((Units::Standard.to_celsius(288.15) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn day_night_from_icon_suffix() {
        let day = Condition {
            main: "Clear".to_string(),
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
        };
        let night = Condition {
            icon: "01n".to_string(),
            ..day.clone()
        };
        assert!(day.is_day());
        assert!(!night.is_day());
    }

    #[test]
    fn wind_cardinal_points() {
        assert_eq!(wind_direction(0.0), "N");
        assert_eq!(wind_direction(90.0), "E");
        assert_eq!(wind_direction(250.0), "WSW");
        assert_eq!(wind_direction(359.0), "N");
        assert_eq!(wind_direction(-45.0), "NW");
    }

    #[test]
    fn daily_groups_by_calendar_day() {
        // 2023-11-14 and 2023-11-15 UTC.
        let day1 = 1_699_963_200; // 2023-11-14 12:00:00 UTC
        let day2 = day1 + 86_400;
        let set = ForecastSet {
            list: vec![
                entry(day1, 10.0, "Clouds", "04d"),
                entry(day1 + 3 * 3600, 14.0, "Clouds", "04d"),
                entry(day1 + 6 * 3600, 8.0, "Rain", "10n"),
                entry(day2, 4.0, "Snow", "13d"),
            ],
        };

        let today = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        let days = set.daily(today, 5);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].label, "Today");
        assert!((days[0].high - 14.0).abs() < 1e-9);
        assert!((days[0].low - 8.0).abs() < 1e-9);
        assert_eq!(days[0].condition, "Clouds");
        assert_eq!(days[0].icon, "04d");

        assert_eq!(days[1].label, "Tomorrow");
        assert_eq!(days[1].condition, "Snow");
    }

    #[test]
    fn daily_labels_later_days_by_weekday() {
        let base = 1_699_963_200; // Tuesday 2023-11-14
        let set = ForecastSet {
            list: (0..3)
                .map(|i| entry(base + i * 86_400, 10.0, "Clear", "01d"))
                .collect(),
        };

        let today = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        let days = set.daily(today, 5);

        assert_eq!(days[2].label, "Thu");
    }

    #[test]
    fn daily_respects_max_days() {
        let base = 1_699_963_200;
        let set = ForecastSet {
            list: (0..7)
                .map(|i| entry(base + i * 86_400, 10.0, "Clear", "01d"))
                .collect(),
        };

        let today = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        assert_eq!(set.daily(today, 5).len(), 5);
    }

    #[test]
    fn snapshot_city_label_includes_country() {
        let snapshot: WeatherSnapshot = serde_json::from_value(json!({
            "name": "London",
            "sys": {"country": "GB", "sunrise": 0, "sunset": 0},
            "weather": [{"main": "Clouds", "description": "overcast", "icon": "04d"}],
            "main": {"temp": 15.0},
            "dt": 0,
        }))
        .unwrap();

        assert_eq!(snapshot.city_label(), "London, GB");
        assert!(snapshot.is_day());
    }

    #[test]
    fn city_match_label_elides_missing_parts() {
        let full = CityMatch {
            name: "Springfield".to_string(),
            lat: 39.8,
            lon: -89.6,
            country: Some("US".to_string()),
            state: Some("Illinois".to_string()),
        };
        let bare = CityMatch {
            name: "London".to_string(),
            lat: 51.5,
            lon: -0.1,
            country: None,
            state: None,
        };

        assert_eq!(full.label(), "Springfield, Illinois, US");
        assert_eq!(bare.label(), "London");
    }
}
