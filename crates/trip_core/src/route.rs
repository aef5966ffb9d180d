//! Distance-parameterized route geometry.
//!
//! A raw polyline is folded once into cumulative distances along its
//! segments; afterwards a normalized progress value in [0, 1] maps to a
//! position by binary search plus linear interpolation within the
//! straddling segment. Built once per route, queried every frame.

use crate::geo::{self, GeoPoint};

/// Immutable arc-length parameterization of a polyline.
///
/// Invariants, established by [`RouteModel::build`]:
/// - `points.len() >= 2`
/// - `cumulative_km.len() == points.len()`, `cumulative_km[0] == 0`,
///   non-decreasing
/// - `total_km == *cumulative_km.last()`
#[derive(Debug, Clone, PartialEq)]
pub struct RouteModel {
    points: Vec<GeoPoint>,
    cumulative_km: Vec<f64>,
    total_km: f64,
}

impl RouteModel {
    /// Fold a raw polyline into a route model.
    ///
    /// Total: a polyline with fewer than 2 points is replaced by the
    /// two-point `fallback_origin` → `fallback_destination` line instead of
    /// failing. The builder does not care where the polyline came from.
    pub fn build(raw: Vec<GeoPoint>, fallback_origin: GeoPoint, fallback_destination: GeoPoint) -> Self {
        let points = if raw.len() < 2 {
            vec![fallback_origin, fallback_destination]
        } else {
            raw
        };

        let mut cumulative_km = Vec::with_capacity(points.len());
        cumulative_km.push(0.0);
        let mut total = 0.0;
        for pair in points.windows(2) {
            total += geo::distance_km(pair[0], pair[1]);
            cumulative_km.push(total);
        }

        Self {
            points,
            cumulative_km,
            total_km: total,
        }
    }

    /// The two-point fallback route.
    pub fn straight_line(origin: GeoPoint, destination: GeoPoint) -> Self {
        Self::build(Vec::new(), origin, destination)
    }

    /// Position at normalized progress `t`, behaving as if `t` were clamped
    /// to [0, 1]: `t <= 0` is exactly the first point, `t >= 1` exactly the
    /// last. Zero-length segments yield their start point.
    pub fn position_at_progress(&self, t: f64) -> GeoPoint {
        if t <= 0.0 || t.is_nan() {
            return self.points[0];
        }
        if t >= 1.0 {
            return self.points[self.points.len() - 1];
        }

        let target_km = self.total_km * t;
        // Smallest segment index i with cumulative_km[i + 1] >= target_km;
        // an exact boundary hit resolves to the earlier segment.
        let i = self.cumulative_km[1..].partition_point(|&d| d < target_km);
        let start = self.points[i];
        let end = self.points[i + 1];
        let span_km = self.cumulative_km[i + 1] - self.cumulative_km[i];
        let frac = if span_km > 0.0 {
            (target_km - self.cumulative_km[i]) / span_km
        } else {
            0.0
        };

        GeoPoint::new(
            start.lng + (end.lng - start.lng) * frac,
            start.lat + (end.lat - start.lat) * frac,
        )
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn cumulative_km(&self) -> &[f64] {
        &self.cumulative_km
    }

    pub fn total_km(&self) -> f64 {
        self.total_km
    }

    pub fn origin(&self) -> GeoPoint {
        self.points[0]
    }

    pub fn destination(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: GeoPoint = GeoPoint {
        lng: 91.7889,
        lat: 26.1548,
    };
    const DESTINATION: GeoPoint = GeoPoint {
        lng: 91.7362,
        lat: 26.1445,
    };

    #[test]
    fn cumulative_distances_are_non_decreasing_and_sum_to_total() {
        let model = RouteModel::build(
            vec![
                GeoPoint::new(91.78, 26.15),
                GeoPoint::new(91.77, 26.16),
                GeoPoint::new(91.75, 26.14),
                GeoPoint::new(91.74, 26.14),
            ],
            ORIGIN,
            DESTINATION,
        );

        let cumulative = model.cumulative_km();
        assert_eq!(cumulative.len(), model.points().len());
        assert_eq!(cumulative[0], 0.0);
        for pair in cumulative.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert_eq!(model.total_km(), *cumulative.last().expect("non-empty"));
    }

    #[test]
    fn segment_spans_match_pairwise_distances() {
        let points = vec![
            GeoPoint::new(91.78, 26.15),
            GeoPoint::new(91.77, 26.16),
            GeoPoint::new(91.75, 26.14),
        ];
        let model = RouteModel::build(points.clone(), ORIGIN, DESTINATION);
        let cumulative = model.cumulative_km();
        for (i, pair) in points.windows(2).enumerate() {
            let span = cumulative[i + 1] - cumulative[i];
            assert!((span - geo::distance_km(pair[0], pair[1])).abs() < 1e-12);
        }
    }

    #[test]
    fn endpoints_are_exact() {
        let model = RouteModel::straight_line(ORIGIN, DESTINATION);
        assert_eq!(model.position_at_progress(0.0), ORIGIN);
        assert_eq!(model.position_at_progress(-2.5), ORIGIN);
        assert_eq!(model.position_at_progress(1.0), DESTINATION);
        assert_eq!(model.position_at_progress(7.0), DESTINATION);
    }

    #[test]
    fn two_point_midpoint_is_linear_interpolation() {
        let model = RouteModel::straight_line(ORIGIN, DESTINATION);
        let mid = model.position_at_progress(0.5);
        assert!((mid.lng - (ORIGIN.lng + DESTINATION.lng) * 0.5).abs() < 1e-9);
        assert!((mid.lat - (ORIGIN.lat + DESTINATION.lat) * 0.5).abs() < 1e-9);
        assert!((model.total_km() - 5.3834).abs() < 0.05);
    }

    #[test]
    fn short_polyline_substitutes_fallback() {
        let empty = RouteModel::build(Vec::new(), ORIGIN, DESTINATION);
        assert_eq!(empty.points(), &[ORIGIN, DESTINATION]);

        let singleton = RouteModel::build(vec![GeoPoint::new(0.0, 0.0)], ORIGIN, DESTINATION);
        assert_eq!(singleton.points(), &[ORIGIN, DESTINATION]);
    }

    #[test]
    fn exact_boundary_resolves_to_earlier_segment() {
        // Three equidistant collinear points; t = 0.5 lands exactly on the
        // shared vertex and must come from the first segment's endpoint.
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let c = GeoPoint::new(0.0, 2.0);
        let model = RouteModel::build(vec![a, b, c], ORIGIN, DESTINATION);
        let at_vertex = model.position_at_progress(0.5);
        assert!((at_vertex.lat - b.lat).abs() < 1e-9);
        assert!((at_vertex.lng - b.lng).abs() < 1e-9);
    }

    #[test]
    fn doubled_point_does_not_break_interpolation() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let model = RouteModel::build(vec![a, a, b], ORIGIN, DESTINATION);
        // Interior progress resolves past the empty leading span.
        let quarter = model.position_at_progress(0.25);
        assert!((quarter.lat - 0.25).abs() < 1e-9);
        assert_eq!(quarter.lng, 0.0);
    }

    #[test]
    fn fully_degenerate_route_pins_to_start() {
        let a = GeoPoint::new(3.0, 4.0);
        let model = RouteModel::build(vec![a, a, a], ORIGIN, DESTINATION);
        assert_eq!(model.total_km(), 0.0);
        assert_eq!(model.position_at_progress(0.5), a);
        assert_eq!(model.position_at_progress(1.0), a);
    }

    #[test]
    fn query_is_deterministic() {
        let model = RouteModel::build(
            vec![
                GeoPoint::new(91.78, 26.15),
                GeoPoint::new(91.76, 26.17),
                GeoPoint::new(91.74, 26.14),
            ],
            ORIGIN,
            DESTINATION,
        );
        for t in [0.1, 0.33, 0.5, 0.77, 0.99] {
            assert_eq!(model.position_at_progress(t), model.position_at_progress(t));
        }
    }
}
