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

//! Cache-augmented OpenWeatherMap client.
//!
//! Wraps the two read endpoints (current weather, 5-day/3-hour forecast) and
//! the geocoding search. Reads consult the response cache before touching the
//! network and write back on success. Failures cross this boundary as typed
//! [`FetchError`] values; nothing panics past it.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::warn;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::cache::{ResponseCache, DEFAULT_CAPACITY};
use crate::model::{CityMatch, ForecastSet, Units, WeatherSnapshot};
use crate::transport::{HttpTransport, Transport, TransportError, DEFAULT_TIMEOUT};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";

/// How long a fetched response stays fresh.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Failures surfaced to callers.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider could not resolve the requested city (HTTP 404).
    #[error("city not found")]
    NotFound,

    /// Network-level failure or unexpected HTTP status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body arrived but did not parse as the expected shape.
    #[error("malformed response body: {0}")]
    Parse(String),
}

/// Static values supplied before the client is constructed.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub geo_url: String,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_url: DEFAULT_GEO_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CAPACITY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Provider client, shared across worker threads behind an `Arc`. The cache
/// sits behind a mutex so `&self` calls can record results; concurrent
/// fetches for the same key are not deduplicated and the last writer wins.
pub struct WeatherClient {
    config: ClientConfig,
    transport: Box<dyn Transport>,
    cache: Mutex<ResponseCache>,
}

impl WeatherClient {
    pub fn new(config: ClientConfig) -> Self {
        let transport = Box::new(HttpTransport::new(config.timeout));
        Self::with_transport(config, transport)
    }

    /// Construct with a caller-supplied transport (stubbed in tests).
    pub fn with_transport(config: ClientConfig, transport: Box<dyn Transport>) -> Self {
        let cache = Mutex::new(ResponseCache::new(config.cache_ttl, config.cache_capacity));
        Self {
            config,
            transport,
            cache,
        }
    }

    /// Current conditions for a city, served from cache when fresh.
    pub fn current_weather(&self, city: &str, units: Units) -> Result<WeatherSnapshot, FetchError> {
        let url = self.data_url("weather", city, units)?;
        self.fetch_cached(cache_key(city, units), &url)
    }

    /// 5-day/3-hour forecast, cached under its own namespace so it never
    /// collides with current-weather entries.
    pub fn forecast(&self, city: &str, units: Units) -> Result<ForecastSet, FetchError> {
        let url = self.data_url("forecast", city, units)?;
        self.fetch_cached(format!("forecast_{}", cache_key(city, units)), &url)
    }

    /// Geocoding lookup. Uncached: queries are free-form prefixes with
    /// effectively unbounded cardinality.
    pub fn search_cities(&self, query: &str, limit: usize) -> Result<Vec<CityMatch>, FetchError> {
        let url = Url::parse_with_params(
            &self.config.geo_url,
            &[
                ("q", query),
                ("limit", limit.to_string().as_str()),
                ("appid", self.config.api_key.as_str()),
            ],
        )
        .map_err(|e| TransportError::Network(format!("invalid url: {e}")))?;

        let body = self
            .transport
            .get(url.as_str())
            .map_err(|e| map_transport(query, e))?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("malformed geocoding response for '{query}': {e}");
            FetchError::Parse(e.to_string())
        })
    }

    fn data_url(&self, endpoint: &str, city: &str, units: Units) -> Result<Url, FetchError> {
        Url::parse_with_params(
            &format!("{}{}", self.config.base_url, endpoint),
            &[
                ("q", city),
                ("appid", self.config.api_key.as_str()),
                ("units", units.as_query()),
            ],
        )
        .map_err(|e| TransportError::Network(format!("invalid url: {e}")).into())
    }

    fn fetch_cached<T: DeserializeOwned>(&self, key: String, url: &Url) -> Result<T, FetchError> {
        let cached = self.cache.lock().unwrap().get(&key, Instant::now());
        if let Some(payload) = cached {
            return serde_json::from_value(payload).map_err(|e| FetchError::Parse(e.to_string()));
        }

        let body = self
            .transport
            .get(url.as_str())
            .map_err(|e| map_transport(&key, e))?;
        let payload: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            warn!("malformed response for {key}: {e}");
            FetchError::Parse(e.to_string())
        })?;
        let parsed: T = serde_json::from_value(payload.clone()).map_err(|e| {
            warn!("unexpected response shape for {key}: {e}");
            FetchError::Parse(e.to_string())
        })?;

        self.cache
            .lock()
            .unwrap()
            .insert(key, payload, Instant::now());
        Ok(parsed)
    }

    /// Number of live cache entries.
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    /// Shift a cached entry's fetch time into the past (tests only).
    #[cfg(test)]
    fn backdate(&self, key: &str, by: Duration) {
        self.cache.lock().unwrap().backdate(key, by);
    }
}

fn cache_key(city: &str, units: Units) -> String {
    format!("{}_{}", city.to_lowercase(), units.as_query())
}

fn map_transport(key: &str, err: TransportError) -> FetchError {
    match err {
        TransportError::Status(404) => {
            warn!("no result for '{key}': HTTP 404");
            FetchError::NotFound
        }
        other => {
            warn!("request failed for '{key}': {other}");
            FetchError::Transport(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Transport stub that routes on the URL and counts every network call.
    struct StubTransport {
        calls: Arc<AtomicUsize>,
        respond: Box<dyn Fn(&str) -> Result<String, TransportError> + Send + Sync>,
    }

    impl Transport for StubTransport {
        fn get(&self, url: &str) -> Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.respond)(url)
        }
    }

    fn stub_client(
        respond: impl Fn(&str) -> Result<String, TransportError> + Send + Sync + 'static,
    ) -> (WeatherClient, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = StubTransport {
            calls: calls.clone(),
            respond: Box::new(respond),
        };
        let client = WeatherClient::with_transport(
            ClientConfig {
                api_key: "test-key".to_string(),
                ..ClientConfig::default()
            },
            Box::new(transport),
        );
        (client, calls)
    }

    fn weather_body(temp: f64, condition: &str, icon: &str) -> String {
        json!({
            "name": "London",
            "sys": {"country": "GB", "sunrise": 1_700_000_000i64, "sunset": 1_700_040_000i64},
            "weather": [{"main": condition, "description": "scattered clouds", "icon": icon}],
            "main": {"temp": temp, "feels_like": temp - 1.0, "humidity": 71, "pressure": 1012},
            "wind": {"speed": 4.1, "deg": 250.0},
            "visibility": 10_000,
            "dt": 1_700_020_000i64,
        })
        .to_string()
    }

    fn forecast_body() -> String {
        json!({
            "list": [
                {"dt": 1_700_020_800i64, "main": {"temp": 12.0},
                 "weather": [{"main": "Clouds", "description": "overcast", "icon": "04d"}]},
            ],
        })
        .to_string()
    }

    #[test]
    fn second_call_within_ttl_hits_cache() {
        let (client, calls) = stub_client(|_| Ok(weather_body(15.0, "Clouds", "04d")));

        let first = client.current_weather("London", Units::Metric).unwrap();
        let second = client.current_weather("London", Units::Metric).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!((first.main.temp - 15.0).abs() < 1e-9);
        assert!((second.main.temp - 15.0).abs() < 1e-9);
    }

    #[test]
    fn cache_key_is_case_insensitive_on_city() {
        let (client, calls) = stub_client(|_| Ok(weather_body(15.0, "Clouds", "04d")));

        client.current_weather("London", Units::Metric).unwrap();
        client.current_weather("LONDON", Units::Metric).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn different_units_do_not_share_entries() {
        let (client, calls) = stub_client(|_| Ok(weather_body(59.0, "Clouds", "04d")));

        client.current_weather("London", Units::Metric).unwrap();
        client.current_weather("London", Units::Imperial).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.cached_entries(), 2);
    }

    #[test]
    fn expired_entry_triggers_exactly_one_refetch() {
        let (client, calls) = stub_client(|_| Ok(weather_body(15.0, "Clouds", "04d")));

        client.current_weather("London", Units::Metric).unwrap();
        client.backdate("london_metric", DEFAULT_CACHE_TTL + Duration::from_secs(1));
        client.current_weather("London", Units::Metric).unwrap();
        client.current_weather("London", Units::Metric).unwrap();

        // One original call, one refetch after expiry, then cache hits again.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.cached_entries(), 1);
    }

    #[test]
    fn forecast_uses_a_distinct_namespace() {
        let (client, calls) = stub_client(|url| {
            if url.contains("/forecast") {
                Ok(forecast_body())
            } else {
                Ok(weather_body(15.0, "Clouds", "04d"))
            }
        });

        client.current_weather("London", Units::Metric).unwrap();
        let forecast = client.forecast("London", Units::Metric).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.cached_entries(), 2);
        assert_eq!(forecast.list.len(), 1);
    }

    #[test]
    fn http_404_maps_to_not_found() {
        let (client, _) = stub_client(|_| Err(TransportError::Status(404)));

        let err = client
            .current_weather("Nonexistent City", Units::Metric)
            .unwrap_err();

        assert!(matches!(err, FetchError::NotFound));
        assert_eq!(client.cached_entries(), 0);
    }

    #[test]
    fn network_failure_maps_to_transport_error() {
        let (client, _) = stub_client(|_| {
            Err(TransportError::Network("connection refused".to_string()))
        });

        let err = client.current_weather("London", Units::Metric).unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn malformed_body_is_a_parse_error_and_is_not_cached() {
        let (client, calls) = stub_client(|_| Ok("not json".to_string()));

        assert!(matches!(
            client.current_weather("London", Units::Metric),
            Err(FetchError::Parse(_))
        ));
        assert!(matches!(
            client.current_weather("London", Units::Metric),
            Err(FetchError::Parse(_))
        ));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.cached_entries(), 0);
    }

    #[test]
    fn search_cities_parses_matches_and_skips_cache() {
        let (client, calls) = stub_client(|_| {
            Ok(json!([
                {"name": "London", "lat": 51.5074, "lon": -0.1278, "country": "GB"},
                {"name": "London", "lat": 42.9834, "lon": -81.2330, "country": "CA", "state": "Ontario"},
            ])
            .to_string())
        });

        let matches = client.search_cities("Lond", 5).unwrap();
        client.search_cities("Lond", 5).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].label(), "London, GB");
        assert_eq!(matches[1].label(), "London, Ontario, CA");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.cached_entries(), 0);
    }

    #[test]
    fn request_url_carries_query_and_credentials() {
        let (client, _) = stub_client(|url| {
            assert!(url.starts_with(DEFAULT_BASE_URL));
            assert!(url.contains("q=New+York") || url.contains("q=New%20York"));
            assert!(url.contains("appid=test-key"));
            assert!(url.contains("units=imperial"));
            Ok(weather_body(59.0, "Clear", "01d"))
        });

        client.current_weather("New York", Units::Imperial).unwrap();
    }
}
