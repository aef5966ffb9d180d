use std::time::{Duration, Instant};

use eframe::egui;

use trip_core::clock::TripPhase;

use crate::app::TripUiApp;
use crate::ui::{controls, dashboard, map};

pub fn run() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1180.0, 780.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Trip Replay",
        options,
        Box::new(|_cc| Ok(Box::new(TripUiApp::new()))),
    )
}

impl eframe::App for TripUiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_route_results();

        if self.driver.phase() == TripPhase::Running {
            self.driver.tick(Instant::now());
            ctx.request_repaint_after(Duration::from_millis(16));
        } else if self.route_fetch.inflight() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
        self.pump_snapshots();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            controls::render_top_controls(ui, self);
        });
        egui::SidePanel::right("stats")
            .default_width(280.0)
            .show(ctx, |ui| {
                dashboard::render_stats_panel(ui, self);
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            map::render_map(ui, self);
        });
    }
}
