use std::time::Instant;

use eframe::egui;

use trip_core::clock::TripPhase;

use crate::app::TripUiApp;
use crate::ui::utils::{format_distance_km, format_hms_from_ms, format_progress_percent};

pub fn render_top_controls(ui: &mut egui::Ui, app: &mut TripUiApp) {
    ui.horizontal(|ui| {
        let phase = app.driver.phase();

        let can_start = phase == TripPhase::Idle && app.driver.map_ready();
        if ui
            .add_enabled(can_start, egui::Button::new("Start"))
            .clicked()
        {
            app.driver.on_start(Instant::now());
        }

        let pause_label = if phase == TripPhase::Paused {
            "Resume"
        } else {
            "Pause"
        };
        let can_pause = matches!(phase, TripPhase::Running | TripPhase::Paused);
        if ui
            .add_enabled(can_pause, egui::Button::new(pause_label))
            .clicked()
        {
            match phase {
                TripPhase::Running => app.driver.on_pause(Instant::now()),
                TripPhase::Paused => app.driver.on_start(Instant::now()),
                TripPhase::Idle | TripPhase::Completed => {}
            }
        }

        if ui.button("Reset").clicked() {
            app.reset();
        }

        let mut follow = app.driver.follow_enabled();
        if ui.checkbox(&mut follow, "Follow rider").changed() {
            app.driver.set_follow_enabled(follow);
        }
        ui.checkbox(&mut app.grid_enabled, "Grid");

        ui.label(format!("Phase: {}", phase_label(phase)));
    });

    ui.horizontal(|ui| {
        let snapshot = app.driver.last_snapshot();
        ui.label(format!(
            "Elapsed: {} / {}",
            format_hms_from_ms(snapshot.elapsed_ms),
            format_hms_from_ms(app.driver.duration_ms())
        ));
        ui.label(format!(
            "Progress: {}",
            format_progress_percent(snapshot.progress)
        ));
        ui.label(format!(
            "Remaining: {}",
            format_distance_km(snapshot.distance_remaining_km)
        ));
        if app.route_fetch.inflight() {
            ui.label("Fetching route…");
        }
    });

    if let Some(advisory) = &app.routing_advisory {
        ui.colored_label(egui::Color32::from_rgb(230, 170, 60), advisory);
    }
}

fn phase_label(phase: TripPhase) -> &'static str {
    match phase {
        TripPhase::Idle => "Idle",
        TripPhase::Running => "Running",
        TripPhase::Paused => "Paused",
        TripPhase::Completed => "Completed",
    }
}
