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

//! City search box with debounced geocoding suggestions.
//!
//! Typing arms a debounce; when it fires the shell runs a geocoding lookup
//! on a worker thread and the matches come back as a suggestions popup.
//! Submitting (enter, the search button, or clicking a suggestion) requests
//! a weather fetch.

use std::time::{Duration, Instant};

use egui::{Key, RichText, Ui};
use owm_client::CityMatch;

use crate::ui::controller::CountdownTimer;
use crate::ui::theme;

const SUGGEST_DEBOUNCE: Duration = Duration::from_millis(400);
const MIN_QUERY_LEN: usize = 2;

/// Action requested by the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Fetch weather for this city now.
    Submit(String),
    /// Run a geocoding lookup for suggestions.
    Suggest(String),
}

pub struct SearchBox {
    query: String,
    suggestions: Vec<CityMatch>,
    debounce: CountdownTimer,
}

impl SearchBox {
    pub fn new(initial: &str) -> Self {
        Self {
            query: initial.to_string(),
            suggestions: Vec::new(),
            debounce: CountdownTimer::default(),
        }
    }

    /// Install lookup results, dropping them when the user has already typed
    /// past the query they answer.
    pub fn set_suggestions(&mut self, query: &str, matches: Vec<CityMatch>) {
        if query == self.query.trim() {
            self.suggestions = matches;
        }
    }

    /// Poll the typing debounce; returns a suggestion lookup when it fires.
    pub fn poll(&mut self, now: Instant) -> Option<SearchAction> {
        if self.debounce.fire(now) {
            let query = self.query.trim();
            if query.len() >= MIN_QUERY_LEN {
                return Some(SearchAction::Suggest(query.to_string()));
            }
        }
        None
    }

    pub fn ui(&mut self, ui: &mut Ui, now: Instant) -> Option<SearchAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .hint_text("Enter city name...")
                    .desired_width(280.0),
            );
            if response.changed() {
                self.suggestions.clear();
                self.debounce.arm(now, SUGGEST_DEBOUNCE);
            }

            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            let search_button =
                ui.add(egui::Button::new(RichText::new("🔍").size(16.0)).fill(theme::ACCENT));
            if search_button.clicked() || submitted {
                if let Some(city) = self.take_query() {
                    action = Some(SearchAction::Submit(city));
                }
            }
        });

        if !self.suggestions.is_empty() {
            let mut chosen = None;
            theme::glass_frame(theme::GLASS_LIGHT).show(ui, |ui| {
                for (index, city) in self.suggestions.iter().enumerate() {
                    if ui
                        .selectable_label(false, RichText::new(city.label()).color(theme::TEXT_LIGHT))
                        .clicked()
                    {
                        chosen = Some(index);
                    }
                }
            });
            if let Some(index) = chosen {
                let city = self.suggestions[index].name.clone();
                self.query = city.clone();
                self.suggestions.clear();
                self.debounce.cancel();
                action = Some(SearchAction::Submit(city));
            }
        }

        action
    }

    fn take_query(&mut self) -> Option<String> {
        let city = self.query.trim().to_string();
        if city.is_empty() {
            return None;
        }
        self.debounce.cancel();
        self.suggestions.clear();
        Some(city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str) -> CityMatch {
        CityMatch {
            name: name.to_string(),
            lat: 0.0,
            lon: 0.0,
            country: None,
            state: None,
        }
    }

    #[test]
    fn stale_suggestions_are_dropped() {
        let mut search = SearchBox::new("London");

        search.set_suggestions("Lond", vec![city("London")]);
        assert!(search.suggestions.is_empty());

        search.set_suggestions("London", vec![city("London")]);
        assert_eq!(search.suggestions.len(), 1);
    }

    #[test]
    fn debounce_fires_once_for_long_enough_queries() {
        let mut search = SearchBox::new("Lo");
        let start = Instant::now();

        search.debounce.arm(start, SUGGEST_DEBOUNCE);
        assert_eq!(search.poll(start), None);
        assert_eq!(
            search.poll(start + SUGGEST_DEBOUNCE),
            Some(SearchAction::Suggest("Lo".to_string()))
        );
        assert_eq!(search.poll(start + SUGGEST_DEBOUNCE * 2), None);
    }

    #[test]
    fn debounce_ignores_too_short_queries() {
        let mut search = SearchBox::new("L");
        let start = Instant::now();

        search.debounce.arm(start, SUGGEST_DEBOUNCE);
        assert_eq!(search.poll(start + SUGGEST_DEBOUNCE), None);
    }

    #[test]
    fn blank_query_does_not_submit() {
        let mut search = SearchBox::new("   ");
        assert_eq!(search.take_query(), None);
    }
}
