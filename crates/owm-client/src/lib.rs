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

//! Client library for the OpenWeatherMap REST API.
//!
//! Provides a blocking, cache-augmented client suitable for calling from
//! one-shot worker threads in a GUI application. The layers can be used
//! independently or composed together:
//!
//! - **Transport layer**: blocking HTTP behind a trait seam, stubbable in
//!   tests ([`Transport`])
//! - **Cache layer**: bounded LRU response cache with time-based expiry
//!   ([`cache::ResponseCache`])
//! - **Model layer**: typed snapshot/forecast/geocoding views plus derived
//!   helpers ([`model`])
//! - **Client layer**: the cache-consulting endpoint wrappers
//!   ([`WeatherClient`])
//!
//! # Quick Start
//!
//! ```no_run
//! use owm_client::{ClientConfig, Units, WeatherClient};
//!
//! let client = WeatherClient::new(ClientConfig {
//!     api_key: "your-api-key".to_string(),
//!     ..ClientConfig::default()
//! });
//!
//! match client.current_weather("London", Units::Metric) {
//!     Ok(snapshot) => println!("{}: {:.0}°C", snapshot.city_label(), snapshot.main.temp),
//!     Err(e) => eprintln!("fetch failed: {e}"),
//! }
//! ```

pub mod cache;
pub mod client;
pub mod model;
pub mod transport;

pub use client::{ClientConfig, FetchError, WeatherClient, DEFAULT_BASE_URL, DEFAULT_CACHE_TTL, DEFAULT_GEO_URL};
pub use model::{
    CityMatch, Condition, DailyForecast, ForecastEntry, ForecastSet, Units, WeatherSnapshot,
};
pub use transport::{HttpTransport, Transport, TransportError};
