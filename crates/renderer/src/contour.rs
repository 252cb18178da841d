//! Contour line (isoline) extraction using the marching squares algorithm.
//!
//! Works directly in mesh coordinates: every crossing is linearly
//! interpolated along the cell edge it lies on, and the per-cell segments
//! are chained into open or closed polylines.

use std::collections::VecDeque;

use iso_common::EvaluationMesh;
use tracing::debug;

use crate::error::{RenderError, Result};

/// Number of intervals the automatic level selection aims for.
pub const DEFAULT_LEVEL_COUNT: usize = 7;

/// Tolerance used when matching segment endpoints, in coordinate units.
const POINT_EPSILON: f64 = 1e-9;

/// Interval multipliers considered "nice", per power of ten.
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// A point in mesh coordinates (longitude, latitude)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn near(&self, other: &Point) -> bool {
        (self.x - other.x).abs() < POINT_EPSILON && (self.y - other.y).abs() < POINT_EPSILON
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    fn is_degenerate(&self) -> bool {
        self.start.near(&self.end)
    }
}

/// A complete contour line (polyline)
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// All polylines of one level.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevel {
    pub value: f64,
    pub polylines: Vec<Contour>,
}

/// Levels in ascending order, each with its polylines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourSet {
    pub levels: Vec<ContourLevel>,
}

impl ContourSet {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Level values in ascending order.
    pub fn values(&self) -> Vec<f64> {
        self.levels.iter().map(|l| l.value).collect()
    }

    pub fn min_level(&self) -> Option<f64> {
        self.levels.first().map(|l| l.value)
    }

    pub fn max_level(&self) -> Option<f64> {
        self.levels.last().map(|l| l.value)
    }

    /// Total number of polylines across all levels.
    pub fn polyline_count(&self) -> usize {
        self.levels.iter().map(|l| l.polylines.len()).sum()
    }
}

/// Generate contour levels at every multiple of `interval` within
/// `[min_value, max_value]`.
pub fn generate_contour_levels(min_value: f64, max_value: f64, interval: f64) -> Vec<f64> {
    if !(interval > 0.0) || !(max_value > min_value) {
        return vec![];
    }

    let first = (min_value / interval).ceil() as i64;
    let last = (max_value / interval).floor() as i64;

    (first..=last).map(|k| k as f64 * interval).collect()
}

/// Smallest interval of the form {1, 2, 2.5, 5} x 10^k that splits `range`
/// into at most `target` pieces.
pub fn nice_interval(range: f64, target: usize) -> Option<f64> {
    if !(range.is_finite() && range > 0.0) || target == 0 {
        return None;
    }

    let raw = range / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());

    NICE_STEPS
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw * (1.0 - 1e-9))
}

/// Pick contour levels for data spanning `[min_value, max_value]`.
///
/// Levels sit on a nice interval (see [`nice_interval`]) aiming for
/// [`DEFAULT_LEVEL_COUNT`] intervals. Levels equal to either extreme are
/// dropped: they only touch the surface at isolated points.
pub fn select_levels(min_value: f64, max_value: f64) -> Vec<f64> {
    let Some(interval) = nice_interval(max_value - min_value, DEFAULT_LEVEL_COUNT) else {
        return vec![];
    };

    generate_contour_levels(min_value, max_value, interval)
        .into_iter()
        .filter(|&level| level > min_value && level < max_value)
        .collect()
}

/// Marching squares over the mesh for one level.
///
/// # Arguments
/// * `mesh` - Coordinates of the grid columns and rows
/// * `data` - Values in row-major order (`mesh.flat_index`)
/// * `level` - Contour level to extract
///
/// # Returns
/// Vector of line segments representing the contour, in mesh coordinates
pub fn march_squares(mesh: &EvaluationMesh, data: &[f64], level: f64) -> Vec<Segment> {
    let (width, height) = (mesh.width(), mesh.height());
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for j in 0..(height - 1) {
        for i in 0..(width - 1) {
            // Corners, counter-clockwise from the lower-left
            let v00 = data[mesh.flat_index(i, j)];
            let v10 = data[mesh.flat_index(i + 1, j)];
            let v11 = data[mesh.flat_index(i + 1, j + 1)];
            let v01 = data[mesh.flat_index(i, j + 1)];

            // Skip cells with NaN values
            if v00.is_nan() || v10.is_nan() || v11.is_nan() || v01.is_nan() {
                continue;
            }

            let mut cell_index = 0u8;
            if v00 >= level {
                cell_index |= 1;
            }
            if v10 >= level {
                cell_index |= 2;
            }
            if v11 >= level {
                cell_index |= 4;
            }
            if v01 >= level {
                cell_index |= 8;
            }

            let cell = Cell {
                x0: mesh.xs[i],
                x1: mesh.xs[i + 1],
                y0: mesh.ys[j],
                y1: mesh.ys[j + 1],
                v00,
                v10,
                v11,
                v01,
            };
            cell.segments(cell_index, level, &mut segments);
        }
    }

    segments
}

/// One mesh cell: its extent and corner values.
struct Cell {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    v00: f64,
    v10: f64,
    v11: f64,
    v01: f64,
}

impl Cell {
    /// Append the segments for a marching squares case.
    fn segments(&self, cell_index: u8, level: f64, out: &mut Vec<Segment>) {
        if cell_index == 0 || cell_index == 15 {
            return;
        }

        let south = interpolate_edge(self.x0, self.y0, self.x1, self.y0, self.v00, self.v10, level);
        let east = interpolate_edge(self.x1, self.y0, self.x1, self.y1, self.v10, self.v11, level);
        let north = interpolate_edge(self.x0, self.y1, self.x1, self.y1, self.v01, self.v11, level);
        let west = interpolate_edge(self.x0, self.y0, self.x0, self.y1, self.v00, self.v01, level);

        let mut push = |a: Point, b: Point| out.push(Segment::new(a, b));

        match cell_index {
            1 | 14 => push(west, south),
            2 | 13 => push(south, east),
            3 | 12 => push(west, east),
            4 | 11 => push(east, north),
            6 | 9 => push(south, north),
            7 | 8 => push(west, north),
            5 | 10 => {
                // Saddle: the cell-center average decides which diagonal
                // pair of corners is connected.
                let center = (self.v00 + self.v10 + self.v11 + self.v01) / 4.0;
                let center_above = center >= level;
                if (cell_index == 5) == center_above {
                    // Cut around the two corners on the other side
                    push(south, east);
                    push(west, north);
                } else {
                    push(west, south);
                    push(east, north);
                }
            }
            _ => {}
        }
    }
}

/// Linearly interpolate between two edge points based on data values
fn interpolate_edge(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    val1: f64,
    val2: f64,
    level: f64,
) -> Point {
    if (val2 - val1).abs() < 1e-12 {
        // Values are essentially equal, use midpoint
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);

    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Index and far endpoint of the first unused segment touching `point`.
fn find_continuation(segments: &[Segment], used: &[bool], point: &Point) -> Option<(usize, Point)> {
    segments
        .iter()
        .enumerate()
        .filter(|(i, _)| !used[*i])
        .find_map(|(i, seg)| {
            if seg.start.near(point) {
                Some((i, seg.end))
            } else if seg.end.near(point) {
                Some((i, seg.start))
            } else {
                None
            }
        })
}

/// Connect line segments into continuous polylines
///
/// Each polyline is grown from an unused segment at both ends until no
/// further segment connects. A polyline whose ends meet is closed.
/// Zero-length segments are discarded first.
pub fn connect_segments(segments: Vec<Segment>, level: f64) -> Vec<Contour> {
    let segments: Vec<Segment> = segments.into_iter().filter(|s| !s.is_degenerate()).collect();
    if segments.is_empty() {
        return vec![];
    }

    let mut contours = Vec::new();
    let mut used = vec![false; segments.len()];

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }
        used[start_idx] = true;

        let mut points = VecDeque::from([segments[start_idx].start, segments[start_idx].end]);
        let is_closed = |points: &VecDeque<Point>| {
            points.len() > 3 && points[0].near(&points[points.len() - 1])
        };

        while !is_closed(&points) {
            let Some(tail) = points.back().copied() else {
                break;
            };
            match find_continuation(&segments, &used, &tail) {
                Some((i, next)) => {
                    used[i] = true;
                    points.push_back(next);
                }
                None => break,
            }
        }

        while !is_closed(&points) {
            let Some(head) = points.front().copied() else {
                break;
            };
            match find_continuation(&segments, &used, &head) {
                Some((i, next)) => {
                    used[i] = true;
                    points.push_front(next);
                }
                None => break,
            }
        }

        let closed = is_closed(&points);
        contours.push(Contour {
            level,
            points: points.into_iter().collect(),
            closed,
        });
    }

    contours
}

/// Extract polylines for explicit levels.
///
/// Levels are sorted ascending; a level without crossings keeps an empty
/// polyline list.
pub fn extract_levels(mesh: &EvaluationMesh, data: &[f64], levels: &[f64]) -> Result<ContourSet> {
    if data.len() != mesh.len() {
        return Err(RenderError::InvalidInput(format!(
            "{} values for a {}x{} mesh",
            data.len(),
            mesh.width(),
            mesh.height()
        )));
    }

    let mut levels: Vec<f64> = levels.iter().copied().filter(|l| l.is_finite()).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();

    let levels = levels
        .into_iter()
        .map(|value| {
            let segments = march_squares(mesh, data, value);
            let polylines = connect_segments(segments, value);
            ContourLevel { value, polylines }
        })
        .collect();

    Ok(ContourSet { levels })
}

/// Extract contours at automatically selected levels.
///
/// Levels come from [`select_levels`] over the finite range of `data`.
pub fn extract(mesh: &EvaluationMesh, data: &[f64]) -> Result<ContourSet> {
    let (data_min, data_max) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let levels = select_levels(data_min, data_max);
    debug!(
        data_len = data.len(),
        data_min,
        data_max,
        num_levels = levels.len(),
        first_level = levels.first().copied().unwrap_or(0.0),
        last_level = levels.last().copied().unwrap_or(0.0),
        "Selected contour levels"
    );

    let set = extract_levels(mesh, data, &levels)?;
    debug!(
        num_contours = set.polyline_count(),
        total_points = set
            .levels
            .iter()
            .flat_map(|l| &l.polylines)
            .map(|c| c.points.len())
            .sum::<usize>(),
        "Generated contours"
    );
    Ok(set)
}
