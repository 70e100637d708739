use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, LinearScale};
use crate::error::ChartResult;

/// Projected line segment in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Returns points inside the inclusive `[start, end]` window plus the nearest
/// neighbour on each side, so a clipped line still reaches the plot edges.
///
/// `points` must be sorted by `x`.
#[must_use]
pub fn points_in_time_window(points: &[DataPoint], start: f64, end: f64) -> Vec<DataPoint> {
    let (min_t, max_t) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };

    let first_inside = points.partition_point(|point| point.x < min_t);
    let past_inside = points.partition_point(|point| point.x <= max_t);
    let from = first_inside.saturating_sub(1);
    let to = (past_inside + 1).min(points.len());
    points[from..to].to_vec()
}

/// Projects points into adjacent line segments.
///
/// With `clip_x` set, segments are cut at the given pixel bounds and
/// segments fully outside are dropped.
pub fn project_line_segments(
    points: &[DataPoint],
    x_scale: LinearScale,
    y_scale: LinearScale,
    clip_x: Option<(f64, f64)>,
) -> ChartResult<Vec<LineSegment>> {
    if points.len() < 2 {
        return Ok(Vec::new());
    }

    let mapped: Vec<(f64, f64)> = points
        .iter()
        .map(|point| (x_scale.apply(point.x), y_scale.apply(point.y)))
        .collect();

    let mut segments = Vec::with_capacity(mapped.len() - 1);
    for pair in mapped.windows(2) {
        let segment = LineSegment {
            x1: pair[0].0,
            y1: pair[0].1,
            x2: pair[1].0,
            y2: pair[1].1,
        };
        match clip_x {
            Some(bounds) => {
                if let Some(clipped) = clip_segment_x(segment, bounds) {
                    segments.push(clipped);
                }
            }
            None => segments.push(segment),
        }
    }

    Ok(segments)
}

fn clip_segment_x(segment: LineSegment, (left, right): (f64, f64)) -> Option<LineSegment> {
    let (mut a, mut b) = ((segment.x1, segment.y1), (segment.x2, segment.y2));
    if a.0 > b.0 {
        std::mem::swap(&mut a, &mut b);
    }
    if b.0 < left || a.0 > right {
        return None;
    }

    let dx = b.0 - a.0;
    let y_at = |x: f64| {
        if dx == 0.0 {
            a.1
        } else {
            a.1 + (b.1 - a.1) * (x - a.0) / dx
        }
    };

    let x1 = a.0.max(left);
    let x2 = b.0.min(right);
    Some(LineSegment {
        x1,
        y1: y_at(x1),
        x2,
        y2: y_at(x2),
    })
}

#[cfg(test)]
mod tests {
    use super::{DataPoint, points_in_time_window};

    #[test]
    fn window_keeps_one_neighbour_on_each_side() {
        let points: Vec<DataPoint> = (0..10_i32).map(|i| DataPoint::new(f64::from(i), 0.0)).collect();
        let visible = points_in_time_window(&points, 3.5, 6.0);
        let xs: Vec<f64> = visible.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![3.0, 4.0, 5.0, 6.0, 7.0]);
    }
}
