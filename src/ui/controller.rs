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

//! UI-thread application state and refresh control flow.
//!
//! The [`Controller`] owns every piece of mutable weather state. Worker
//! threads never touch it directly: they post [`AppEvent`] messages through a
//! channel and the UI thread applies them here at the start of each frame.
//! The fetch lifecycle is Idle → Loading → Ready/Error, with a cancellable
//! countdown driving auto-refresh.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use owm_client::{CityMatch, FetchError, ForecastSet, Units, WeatherSnapshot};

const STATUS_IDLE: &str = "Ready";
const STATUS_LOADING: &str = "Loading weather data...";
const STATUS_READY: &str = "Weather data loaded successfully";
const STATUS_NOT_FOUND: &str = "City not found or API error";
const STATUS_UNAVAILABLE: &str = "Weather service unavailable";

/// Deadline with explicit cancel. Always cancelled (or overwritten) before
/// rescheduling so at most one firing is ever pending.
#[derive(Debug, Default)]
pub struct CountdownTimer {
    deadline: Option<Instant>,
}

impl CountdownTimer {
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the deadline has passed; disarms itself.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Fetch lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Payload of a completed weather fetch. The forecast is optional: its
/// failure degrades to a current-conditions-only view.
#[derive(Debug)]
pub struct WeatherBundle {
    pub current: WeatherSnapshot,
    pub forecast: Option<ForecastSet>,
}

/// One-way messages from worker threads to the UI thread.
pub enum AppEvent {
    Weather {
        city: String,
        units: Units,
        outcome: Result<WeatherBundle, FetchError>,
    },
    Suggestions {
        query: String,
        matches: Vec<CityMatch>,
    },
    Glass {
        source: PathBuf,
        size: [u32; 2],
        image: egui::ColorImage,
    },
}

/// UI-thread state object.
pub struct Controller {
    pub city: String,
    pub units: Units,
    pub auto_refresh: bool,
    refresh_interval: Duration,
    phase: Phase,
    status: String,
    snapshot: Option<WeatherSnapshot>,
    forecast: Option<ForecastSet>,
    refresh_timer: CountdownTimer,
    last_updated: Option<DateTime<Local>>,
}

impl Controller {
    pub fn new(city: String, units: Units, auto_refresh: bool, refresh_interval: Duration) -> Self {
        Self {
            city,
            units,
            auto_refresh,
            refresh_interval,
            phase: Phase::Idle,
            status: STATUS_IDLE.to_string(),
            snapshot: None,
            forecast: None,
            refresh_timer: CountdownTimer::default(),
            last_updated: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn forecast(&self) -> Option<&ForecastSet> {
        self.forecast.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh_timer.is_armed()
    }

    /// Transition into Loading for `city`. The caller dispatches the actual
    /// fetch; any pending auto-refresh is cancelled first.
    pub fn begin_fetch(&mut self, city: String) {
        self.city = city;
        self.refresh_timer.cancel();
        self.phase = Phase::Loading;
        self.status = STATUS_LOADING.to_string();
    }

    /// Switch units. Returns true when the caller should re-fetch, which
    /// behaves exactly like a manual refresh under the new units.
    pub fn set_units(&mut self, units: Units) -> bool {
        if self.units == units {
            return false;
        }
        self.units = units;
        true
    }

    /// Toggle auto-refresh. Disabling cancels the pending timer without
    /// changing the current phase.
    pub fn set_auto_refresh(&mut self, enabled: bool, now: Instant) {
        self.auto_refresh = enabled;
        if enabled {
            if self.phase == Phase::Ready {
                self.refresh_timer.arm(now, self.refresh_interval);
            }
        } else {
            self.refresh_timer.cancel();
        }
    }

    /// Apply a completed fetch. Stale responses are applied as-is: both
    /// writers carry equivalent freshness and the last one wins.
    pub fn apply_weather(
        &mut self,
        outcome: Result<WeatherBundle, FetchError>,
        now: Instant,
    ) {
        match outcome {
            Ok(bundle) => {
                self.snapshot = Some(bundle.current);
                self.forecast = bundle.forecast;
                self.phase = Phase::Ready;
                self.status = STATUS_READY.to_string();
                self.last_updated = Some(Local::now());
                if self.auto_refresh {
                    self.refresh_timer.arm(now, self.refresh_interval);
                }
            }
            Err(err) => {
                // Previous snapshot and forecast stay on screen.
                self.phase = Phase::Error;
                self.status = error_status(&err).to_string();
            }
        }
    }

    /// Poll the auto-refresh deadline. True means the caller should re-enter
    /// Loading for the current city.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.refresh_timer.fire(now)
    }
}

fn error_status(err: &FetchError) -> &'static str {
    match err {
        FetchError::NotFound => STATUS_NOT_FOUND,
        FetchError::Transport(_) | FetchError::Parse(_) => STATUS_UNAVAILABLE,
    }
}
