//! Tests for contour line (isoline) extraction.

use iso_common::{BoundingBox, EvaluationMesh};
use renderer::contour::{
    connect_segments, extract, extract_levels, generate_contour_levels, march_squares,
    nice_interval, select_levels, Point, Segment, DEFAULT_LEVEL_COUNT,
};
use test_utils::{assert_coords_approx_eq, cone_surface, surface_grid};

fn mesh(min: f64, max: f64, n: usize) -> EvaluationMesh {
    EvaluationMesh::with_shape(&BoundingBox::new(min, min, max, max), n, n).unwrap()
}

// ============================================================================
// generate_contour_levels tests
// ============================================================================

#[test]
fn test_generate_contour_levels_basic() {
    let levels = generate_contour_levels(0.0, 100.0, 10.0);
    assert_eq!(
        levels,
        vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]
    );
}

#[test]
fn test_generate_contour_levels_offset_start() {
    let levels = generate_contour_levels(3.0, 27.0, 5.0);
    assert_eq!(levels, vec![5.0, 10.0, 15.0, 20.0, 25.0]);
}

#[test]
fn test_generate_contour_levels_invalid_interval() {
    assert!(generate_contour_levels(0.0, 100.0, 0.0).is_empty());
    assert!(generate_contour_levels(0.0, 100.0, -10.0).is_empty());
}

#[test]
fn test_generate_contour_levels_inverted_range() {
    assert!(generate_contour_levels(100.0, 0.0, 10.0).is_empty());
}

// ============================================================================
// level selection tests
// ============================================================================

#[test]
fn test_nice_interval() {
    assert_eq!(nice_interval(4.0, 7), Some(1.0));
    assert_eq!(nice_interval(70.0, 7), Some(10.0));
    assert_eq!(nice_interval(100.0, 7), Some(20.0));
    assert_eq!(nice_interval(15.0, 7), Some(2.5));
    assert_eq!(nice_interval(0.0, 7), None);
    assert_eq!(nice_interval(f64::NAN, 7), None);
}

#[test]
fn test_select_levels_strictly_inside_range() {
    assert_eq!(select_levels(0.0, 4.0), vec![1.0, 2.0, 3.0]);

    let levels = select_levels(12.3, 87.9);
    assert_eq!(levels, vec![20.0, 40.0, 60.0, 80.0]);
    assert!(levels.len() <= DEFAULT_LEVEL_COUNT + 1);
}

#[test]
fn test_select_levels_flat_field() {
    assert!(select_levels(5.0, 5.0).is_empty());
    assert!(select_levels(f64::INFINITY, f64::NEG_INFINITY).is_empty());
}

#[test]
fn test_select_levels_is_reproducible() {
    let first = select_levels(31.7, 118.2);
    for _ in 0..5 {
        assert_eq!(select_levels(31.7, 118.2), first);
    }
    assert!(first.windows(2).all(|w| w[0] < w[1]));
}

// ============================================================================
// march_squares tests
// ============================================================================

#[test]
fn test_march_squares_empty_cases() {
    let m = mesh(0.0, 1.0, 2);
    assert!(march_squares(&m, &[1.0, 2.0], 0.5).is_empty());
    assert!(march_squares(&m, &[], 0.5).is_empty());
}

#[test]
fn test_march_squares_single_corner_above() {
    // Only the lower-left corner is above the level
    let m = mesh(0.0, 1.0, 2);
    let data = vec![
        10.0, 0.0, // row y=0
        0.0, 0.0, // row y=1
    ];
    let segments = march_squares(&m, &data, 5.0);
    assert_eq!(segments.len(), 1);
    // West edge to south edge, both halfway
    assert_coords_approx_eq!((segments[0].start.x, segments[0].start.y), (0.0, 0.5), 1e-12);
    assert_coords_approx_eq!((segments[0].end.x, segments[0].end.y), (0.5, 0.0), 1e-12);
}

#[test]
fn test_march_squares_interpolates_along_edge() {
    let m = mesh(0.0, 1.0, 2);
    let data = vec![
        0.0, 10.0, // row y=0
        0.0, 10.0, // row y=1
    ];
    let segments = march_squares(&m, &data, 2.5);
    assert_eq!(segments.len(), 1);
    assert!((segments[0].start.x - 0.25).abs() < 1e-12);
    assert!((segments[0].end.x - 0.25).abs() < 1e-12);
}

#[test]
fn test_march_squares_saddle_produces_two_segments() {
    let m = mesh(0.0, 1.0, 2);
    assert_eq!(march_squares(&m, &[10.0, 0.0, 0.0, 10.0], 5.0).len(), 2);
    assert_eq!(march_squares(&m, &[0.0, 10.0, 10.0, 0.0], 5.0).len(), 2);
}

#[test]
fn test_march_squares_nan_cells_skipped() {
    let m = mesh(0.0, 2.0, 3);
    let data = vec![
        f64::NAN, 10.0, 10.0, //
        0.0, 10.0, 10.0, //
        0.0, 0.0, 0.0, //
    ];
    let segments = march_squares(&m, &data, 5.0);
    // The NaN cell is skipped and its neighbour lies fully above
    assert_eq!(segments.len(), 2);
}

// ============================================================================
// connect_segments tests
// ============================================================================

#[test]
fn test_connect_segments_grows_both_ends() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);
    let c = Point::new(2.0, 0.0);
    let d = Point::new(3.0, 0.0);
    // Start from the middle segment, pointing the wrong way
    let segments = vec![Segment::new(c, b), Segment::new(a, b), Segment::new(c, d)];
    let contours = connect_segments(segments, 1.0);
    assert_eq!(contours.len(), 1);
    assert_eq!(contours[0].points.len(), 4);
    assert!(!contours[0].closed);
    let ends = (contours[0].points[0], contours[0].points[3]);
    assert!(ends == (a, d) || ends == (d, a));
}

#[test]
fn test_connect_segments_closed_loop() {
    let p = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ];
    let segments = vec![
        Segment::new(p[0], p[1]),
        Segment::new(p[2], p[3]),
        Segment::new(p[1], p[2]),
        Segment::new(p[0], p[3]),
    ];
    let contours = connect_segments(segments, 3.0);
    assert_eq!(contours.len(), 1);
    assert!(contours[0].closed);
    assert_eq!(contours[0].points.len(), 5);
    assert_eq!(contours[0].level, 3.0);
}

#[test]
fn test_connect_segments_separate_lines() {
    let segments = vec![
        Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
        Segment::new(Point::new(5.0, 5.0), Point::new(6.0, 5.0)),
    ];
    assert_eq!(connect_segments(segments, 1.0).len(), 2);
}

// ============================================================================
// extract tests
// ============================================================================

#[test]
fn test_plane_diagonal_is_single_polyline() {
    // z = x + y over [0,2]x[0,2] sampled 3x3
    let m = mesh(0.0, 2.0, 3);
    let data = surface_grid(&m.xs, &m.ys, |x, y| x + y);

    let set = extract(&m, &data).unwrap();
    let level = set
        .levels
        .iter()
        .find(|l| l.value == 2.0)
        .expect("level 2 selected");
    assert_eq!(level.polylines.len(), 1);

    let points = &level.polylines[0].points;
    assert_eq!(points.len(), 3);
    let mut expected = vec![(2.0, 0.0), (1.0, 1.0), (0.0, 2.0)];
    if (points[0].x - 0.0).abs() < 1e-9 {
        expected.reverse();
    }
    for (p, e) in points.iter().zip(expected) {
        assert_coords_approx_eq!((p.x, p.y), (e.0, e.1), 1e-9);
    }
}

#[test]
fn test_cone_gives_closed_rings() {
    let m = mesh(-1.0, 1.0, 41);
    let data = cone_surface(&m.xs, &m.ys, 0.0, 0.0, 10.0);

    let set = extract_levels(&m, &data, &[9.52]).unwrap();
    assert_eq!(set.len(), 1);
    let ring = &set.levels[0].polylines;
    assert_eq!(ring.len(), 1);
    assert!(ring[0].closed);
    // Every vertex lies close to the circle of radius 0.48
    for p in &ring[0].points {
        let r = (p.x * p.x + p.y * p.y).sqrt();
        assert!((r - 0.48).abs() < 0.01, "vertex at radius {}", r);
    }
}

#[test]
fn test_levels_without_crossings_kept_empty() {
    let m = mesh(0.0, 2.0, 3);
    let data = surface_grid(&m.xs, &m.ys, |x, y| x + y);
    let set = extract_levels(&m, &data, &[50.0, 2.0, -3.0]).unwrap();
    assert_eq!(set.values(), vec![-3.0, 2.0, 50.0]);
    assert!(set.levels[0].polylines.is_empty());
    assert_eq!(set.levels[1].polylines.len(), 1);
    assert!(set.levels[2].polylines.is_empty());
}

#[test]
fn test_extract_rejects_shape_mismatch() {
    let m = mesh(0.0, 1.0, 3);
    assert!(extract(&m, &[1.0, 2.0, 3.0]).is_err());
}
