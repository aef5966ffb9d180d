//! Stats panel: live trip figures and the progress-over-time chart.

use eframe::egui;
use egui_plot::{Line, Plot};

use trip_core::routing::RouteSourceKind;

use crate::app::TripUiApp;
use crate::ui::utils::{format_distance_km, format_hms_from_ms, format_progress_percent};

pub fn render_stats_panel(ui: &mut egui::Ui, app: &TripUiApp) {
    ui.heading("Trip");

    let snapshot = app.driver.last_snapshot();
    let route = app.driver.route();

    egui::Grid::new("trip_stats").striped(true).show(ui, |ui| {
        ui.label("Progress");
        ui.label(format_progress_percent(snapshot.progress));
        ui.end_row();

        ui.label("Elapsed");
        ui.label(format_hms_from_ms(snapshot.elapsed_ms));
        ui.end_row();

        ui.label("Remaining");
        ui.label(format_distance_km(snapshot.distance_remaining_km));
        ui.end_row();

        ui.label("Route length");
        ui.label(format_distance_km(route.total_km()));
        ui.end_row();

        ui.label("Position");
        ui.label(format!(
            "{:.5}, {:.5}",
            snapshot.position.lat, snapshot.position.lng
        ));
        ui.end_row();

        ui.label("Waypoints");
        ui.label(route.points().len().to_string());
        ui.end_row();

        ui.label("Route source");
        ui.label(route_source_label(&app.route_source_kind));
        ui.end_row();
    });

    ui.separator();
    ui.label("Progress over time");

    let series: Vec<[f64; 2]> = app
        .snapshots
        .iter()
        .map(|s| [s.elapsed_ms as f64 / 1000.0, s.progress * 100.0])
        .collect();

    Plot::new("progress_plot")
        .height(180.0)
        .include_y(0.0)
        .include_y(100.0)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new("Progress %", series));
        });
}

fn route_source_label(kind: &RouteSourceKind) -> &'static str {
    match kind {
        RouteSourceKind::StraightLine => "Straight line",
        #[cfg(feature = "osrm")]
        RouteSourceKind::Osrm { .. } => "OSRM",
    }
}
