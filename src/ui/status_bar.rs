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

//! Bottom status bar: fetch status on the left, clocks on the right.

use chrono::Local;
use egui::{RichText, Ui};

use crate::ui::controller::{Controller, Phase};
use crate::ui::theme;

pub fn status_bar(ui: &mut Ui, controller: &Controller) {
    ui.horizontal(|ui| {
        let color = match controller.phase() {
            Phase::Error => theme::ERROR,
            Phase::Loading => theme::WARNING,
            Phase::Idle | Phase::Ready => theme::TEXT_MEDIUM,
        };
        if controller.phase() == Phase::Loading {
            ui.add(egui::Spinner::new().size(12.0));
        }
        ui.label(RichText::new(controller.status()).size(11.0).color(color));
        if controller.refresh_pending() {
            ui.label(RichText::new("⟳ auto").size(10.0).color(theme::TEXT_DARK));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(Local::now().format("%I:%M %p").to_string())
                    .size(11.0)
                    .color(theme::TEXT_MEDIUM),
            );
            if let Some(updated) = controller.last_updated() {
                ui.label(
                    RichText::new(format!("Updated {}", updated.format("%H:%M")))
                        .size(11.0)
                        .color(theme::TEXT_DARK),
                );
            }
        });
    });
}
