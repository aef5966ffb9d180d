//! Map panel: route polyline, origin/destination markers, the rider, and an
//! optional km grid.

use eframe::egui::{self, Align2, Color32, FontId, Vec2};

use trip_core::geo::GeoPoint;
use trip_core::route::RouteModel;

use crate::app::TripUiApp;

const MIN_SPAN_DEG: f64 = 0.002;
const FOLLOW_ZOOM: f64 = 0.35;
const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Geographic bounds for map projection.
pub struct MapBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl MapBounds {
    /// Bounds enclosing the whole route, padded by `margin` of each span.
    pub fn around_route(route: &RouteModel, margin: f64) -> Self {
        let mut lat_min = f64::INFINITY;
        let mut lat_max = f64::NEG_INFINITY;
        let mut lng_min = f64::INFINITY;
        let mut lng_max = f64::NEG_INFINITY;
        for point in route.points() {
            lat_min = lat_min.min(point.lat);
            lat_max = lat_max.max(point.lat);
            lng_min = lng_min.min(point.lng);
            lng_max = lng_max.max(point.lng);
        }

        let lat_span = (lat_max - lat_min).max(MIN_SPAN_DEG);
        let lng_span = (lng_max - lng_min).max(MIN_SPAN_DEG);
        let lat_mid = (lat_min + lat_max) * 0.5;
        let lng_mid = (lng_min + lng_max) * 0.5;
        let half_lat = lat_span * (0.5 + margin);
        let half_lng = lng_span * (0.5 + margin);
        Self {
            lat_min: lat_mid - half_lat,
            lat_max: lat_mid + half_lat,
            lng_min: lng_mid - half_lng,
            lng_max: lng_mid + half_lng,
        }
    }

    /// Bounds of the given spans centered on one point (follow mode).
    pub fn centered_on(center: GeoPoint, lat_span: f64, lng_span: f64) -> Self {
        let half_lat = lat_span.max(MIN_SPAN_DEG) * 0.5;
        let half_lng = lng_span.max(MIN_SPAN_DEG) * 0.5;
        Self {
            lat_min: center.lat - half_lat,
            lat_max: center.lat + half_lat,
            lng_min: center.lng - half_lng,
            lng_max: center.lng + half_lng,
        }
    }

    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    pub fn lng_span(&self) -> f64 {
        self.lng_max - self.lng_min
    }
}

/// Project a geographic point to screen coordinates.
pub fn project(point: GeoPoint, bounds: &MapBounds, rect: egui::Rect) -> Option<egui::Pos2> {
    if bounds.lat_max <= bounds.lat_min || bounds.lng_max <= bounds.lng_min {
        return None;
    }
    let x = (point.lng - bounds.lng_min) / bounds.lng_span();
    let y = (bounds.lat_max - point.lat) / bounds.lat_span();
    let px = rect.left() + rect.width() * x as f32;
    let py = rect.top() + rect.height() * y as f32;
    Some(egui::pos2(px, py))
}

/// Draw a labelled point marker.
fn draw_marker(painter: &egui::Painter, pos: egui::Pos2, label: &str, color: Color32) {
    painter.circle_filled(pos, 5.0, color);
    painter.text(
        pos + Vec2::new(7.0, -7.0),
        Align2::LEFT_TOP,
        label,
        FontId::monospace(10.0),
        color,
    );
}

fn draw_route(painter: &egui::Painter, route: &RouteModel, bounds: &MapBounds, rect: egui::Rect) {
    let screen_points: Vec<egui::Pos2> = route
        .points()
        .iter()
        .filter_map(|&point| project(point, bounds, rect))
        .collect();
    if screen_points.len() >= 2 {
        painter.add(egui::Shape::line(
            screen_points,
            egui::Stroke::new(2.0, Color32::from_rgb(90, 140, 255)),
        ));
    }
}

/// Draw a km-spaced grid overlay.
fn draw_grid(painter: &egui::Painter, bounds: &MapBounds, rect: egui::Rect, spacing_km: f64) {
    if spacing_km <= 0.0 {
        return;
    }

    let lat_mid = (bounds.lat_min + bounds.lat_max) * 0.5;
    let meters_per_deg_lng = METERS_PER_DEG_LAT * lat_mid.to_radians().cos().max(0.1);
    let spacing_m = spacing_km * 1000.0;
    let lat_step = spacing_m / METERS_PER_DEG_LAT;
    let lng_step = spacing_m / meters_per_deg_lng;

    let stroke = egui::Stroke::new(1.0, Color32::from_gray(40));

    let mut lat = bounds.lat_min;
    while lat <= bounds.lat_max {
        let y = (bounds.lat_max - lat) / bounds.lat_span();
        let py = rect.top() + rect.height() * y as f32;
        painter.line_segment(
            [egui::pos2(rect.left(), py), egui::pos2(rect.right(), py)],
            stroke,
        );
        lat += lat_step;
    }

    let mut lng = bounds.lng_min;
    while lng <= bounds.lng_max {
        let x = (lng - bounds.lng_min) / bounds.lng_span();
        let px = rect.left() + rect.width() * x as f32;
        painter.line_segment(
            [egui::pos2(px, rect.top()), egui::pos2(px, rect.bottom())],
            stroke,
        );
        lng += lng_step;
    }
}

fn legend_item(ui: &mut egui::Ui, color: Color32, label: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::new(12.0, 12.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 2.0, color);
        ui.label(label);
    });
}

fn render_map_legend(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        legend_item(ui, ORIGIN_COLOR, "Origin");
        legend_item(ui, DESTINATION_COLOR, "Destination");
        legend_item(ui, RIDER_COLOR, "Rider");
        legend_item(ui, Color32::from_rgb(90, 140, 255), "Route");
    });
}

const ORIGIN_COLOR: Color32 = Color32::from_rgb(0, 200, 120);
const DESTINATION_COLOR: Color32 = Color32::from_rgb(230, 80, 80);
const RIDER_COLOR: Color32 = Color32::from_rgb(255, 210, 70);

pub fn render_map(ui: &mut egui::Ui, app: &mut TripUiApp) {
    render_map_legend(ui);

    let map_size = egui::Vec2::new(ui.available_width(), ui.available_height());
    let (map_rect, _) = ui.allocate_exact_size(map_size, egui::Sense::hover());
    let painter = ui.painter_at(map_rect);

    painter.rect_filled(map_rect, 0.0, Color32::from_gray(20));
    painter.rect_stroke(
        map_rect,
        0.0,
        egui::Stroke::new(1.0, Color32::from_gray(60)),
        egui::StrokeKind::Middle,
    );

    let snapshot = app.driver.last_snapshot().clone();
    let route = app.driver.route();

    let full = MapBounds::around_route(route, 0.15);
    let bounds = if app.driver.follow_enabled() {
        MapBounds::centered_on(
            snapshot.position,
            full.lat_span() * FOLLOW_ZOOM,
            full.lng_span() * FOLLOW_ZOOM,
        )
    } else {
        full
    };

    if app.grid_enabled {
        draw_grid(&painter, &bounds, map_rect, 1.0);
    }
    draw_route(&painter, route, &bounds, map_rect);

    if let Some(pos) = project(route.origin(), &bounds, map_rect) {
        draw_marker(&painter, pos, "A", ORIGIN_COLOR);
    }
    if let Some(pos) = project(route.destination(), &bounds, map_rect) {
        draw_marker(&painter, pos, "B", DESTINATION_COLOR);
    }
    if let Some(pos) = project(snapshot.position, &bounds, map_rect) {
        painter.circle_filled(pos, 6.0, RIDER_COLOR);
        painter.circle_stroke(pos, 9.0, egui::Stroke::new(1.5, RIDER_COLOR));
    }
}
