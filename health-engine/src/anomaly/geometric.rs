//! Failure risk zone: convex hull of failure points in a 2-D feature space.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{AnomalyKind, AnomalyRecord};
use crate::types::{EngineError, Result, TelemetrySnapshot};

/// A point in feature space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Cross product of `o->a` and `o->b`; positive for a left turn.
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn dist2(a: Point, b: Point) -> f64 {
    (a.x - b.x).powi(2) + (a.y - b.y).powi(2)
}

/// Graham scan. Vertices are returned counter-clockwise from the lowest
/// point (ties broken by lowest x); the polygon closes back to the first.
///
/// Fewer than three distinct points are returned unchanged.
pub fn convex_hull(points: &[Point]) -> Result<Vec<Point>> {
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(EngineError::invalid("hull point is not numeric"));
    }

    let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if !distinct.contains(p) {
            distinct.push(*p);
        }
    }
    if distinct.len() < 3 {
        return Ok(points.to_vec());
    }

    let start_idx = distinct
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let start = distinct.swap_remove(start_idx);

    distinct.sort_by(|a, b| {
        let angle_a = (a.y - start.y).atan2(a.x - start.x);
        let angle_b = (b.y - start.y).atan2(b.x - start.x);
        angle_a
            .partial_cmp(&angle_b)
            .unwrap_or(Ordering::Equal)
            .then_with(|| dist2(start, *a).total_cmp(&dist2(start, *b)))
    });

    let mut stack = vec![start];
    for p in distinct {
        while stack.len() >= 2 && cross(stack[stack.len() - 2], stack[stack.len() - 1], p) <= 0.0 {
            stack.pop();
        }
        stack.push(p);
    }
    Ok(stack)
}

/// Closed polygon bounding the observed failure region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskZone {
    /// Hull vertices, implicitly closed
    pub vertices: Vec<Point>,
}

impl RiskZone {
    /// Build the zone from failure points.
    pub fn from_points(points: &[Point]) -> Result<Self> {
        Ok(Self {
            vertices: convex_hull(points)?,
        })
    }

    /// Build the zone from readings whose `label` field is positive.
    pub fn from_snapshot(
        snapshot: &TelemetrySnapshot,
        x: &str,
        y: &str,
        label: &str,
    ) -> Result<Self> {
        let mut failures = Vec::new();
        for r in &snapshot.readings {
            if r.field(label)? > 0.0 {
                failures.push(Point::new(r.field(x)?, r.field(y)?));
            }
        }
        Self::from_points(&failures)
    }

    /// Whether the zone is a proper polygon.
    pub fn is_polygon(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Whether a point lies inside or on the boundary.
    ///
    /// A degenerate zone contains nothing.
    pub fn contains(&self, p: Point) -> bool {
        if !self.is_polygon() {
            return false;
        }
        let n = self.vertices.len();
        (0..n).all(|i| cross(self.vertices[i], self.vertices[(i + 1) % n], p) >= 0.0)
    }

    /// Non-failure readings falling inside the zone.
    pub fn detect(
        &self,
        snapshot: &TelemetrySnapshot,
        x: &str,
        y: &str,
        label: &str,
    ) -> Result<Vec<AnomalyRecord>> {
        let mut out = Vec::new();
        for r in &snapshot.readings {
            if r.field(label)? > 0.0 {
                continue;
            }
            let p = Point::new(r.field(x)?, r.field(y)?);
            if self.contains(p) {
                out.push(AnomalyRecord {
                    asset_id: r.asset_id.clone(),
                    metric_name: format!("{}/{}", x, y),
                    value: p.x,
                    threshold: p.y,
                    kind: AnomalyKind::Geometric,
                    cycle: r.cycle,
                });
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Reading;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|(x, y)| Point::new(*x, *y)).collect()
    }

    #[test]
    fn test_square_hull() {
        let hull = convex_hull(&pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])).unwrap();
        assert_eq!(hull, pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]));
    }

    #[test]
    fn test_interior_and_collinear_points_dropped() {
        let hull = convex_hull(&pts(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (1.0, 0.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (1.0, 1.0),
            (2.0, 2.0),
        ]))
        .unwrap();
        assert_eq!(hull, pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]));
    }

    #[test]
    fn test_degenerate_returns_input() {
        let two = pts(&[(3.0, 1.0), (0.0, 0.0)]);
        assert_eq!(convex_hull(&two).unwrap(), two);
        assert!(convex_hull(&[]).unwrap().is_empty());
        let dup = pts(&[(1.0, 1.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(convex_hull(&dup).unwrap(), dup);
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert!(convex_hull(&pts(&[(f64::NAN, 0.0)])).is_err());
    }

    #[test]
    fn test_zone_membership() {
        let zone = RiskZone::from_points(&pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])).unwrap();
        assert!(zone.contains(Point::new(2.0, 2.0)));
        assert!(zone.contains(Point::new(4.0, 2.0)));
        assert!(!zone.contains(Point::new(5.0, 2.0)));

        let line = RiskZone::from_points(&pts(&[(0.0, 0.0), (1.0, 1.0)])).unwrap();
        assert!(!line.contains(Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_detect_healthy_readings_in_zone() {
        let reading = |id: &str, x: f64, y: f64, fault: f64| {
            Reading::new(id, 0).with("v", x).with("i", y).with("fault", fault)
        };
        let snapshot = TelemetrySnapshot::new(vec![
            reading("F1", 0.0, 0.0, 1.0),
            reading("F2", 10.0, 0.0, 1.0),
            reading("F3", 5.0, 10.0, 1.0),
            reading("OK1", 5.0, 3.0, 0.0),
            reading("OK2", 50.0, 3.0, 0.0),
        ]);
        let zone = RiskZone::from_snapshot(&snapshot, "v", "i", "fault").unwrap();
        let records = zone.detect(&snapshot, "v", "i", "fault").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].asset_id, "OK1");
        assert_eq!(records[0].kind, AnomalyKind::Geometric);
    }
}
