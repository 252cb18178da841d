//! Benchmarks for contour extraction and KML output.
//!
//! Run with: cargo bench --package renderer --bench contour_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use iso_common::{BoundingBox, EvaluationMesh};
use renderer::contour::{connect_segments, extract, march_squares, select_levels};
use renderer::{KmlWriter, LinearGradient};

/// A travel-time-like field: grows with distance from the center, with
/// ripples standing in for motorways and rivers.
fn generate_travel_field(mesh: &EvaluationMesh) -> Vec<f64> {
    let cx = (mesh.xs[0] + mesh.xs[mesh.width() - 1]) / 2.0;
    let cy = (mesh.ys[0] + mesh.ys[mesh.height() - 1]) / 2.0;
    mesh.points()
        .map(|(x, y)| {
            let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            let ripple = (x * 40.0).sin() * 2.0 + (y * 25.0).cos() * 3.0;
            10.0 + d * 120.0 + ripple
        })
        .collect()
}

fn mesh_with_step(step: f64) -> EvaluationMesh {
    EvaluationMesh::with_step(&BoundingBox::new(2.0, 48.6, 2.7, 49.1), step)
        .expect("valid benchmark mesh")
}

// =============================================================================
// MARCHING SQUARES BENCHMARKS
// =============================================================================

fn bench_march_squares(c: &mut Criterion) {
    let mut group = c.benchmark_group("march_squares");

    for step in [0.02, 0.01, 0.005] {
        let mesh = mesh_with_step(step);
        let data = generate_travel_field(&mesh);
        group.throughput(Throughput::Elements(mesh.len() as u64));
        group.bench_with_input(BenchmarkId::new("step", step), &data, |b, data| {
            b.iter(|| march_squares(black_box(&mesh), black_box(data), 40.0));
        });
    }

    group.finish();
}

// =============================================================================
// SEGMENT CHAINING BENCHMARKS
// =============================================================================

fn bench_connect_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("connect_segments");

    for step in [0.02, 0.01] {
        let mesh = mesh_with_step(step);
        let data = generate_travel_field(&mesh);
        let segments = march_squares(&mesh, &data, 40.0);
        group.throughput(Throughput::Elements(segments.len() as u64));
        group.bench_with_input(BenchmarkId::new("step", step), &segments, |b, segments| {
            b.iter(|| connect_segments(black_box(segments.clone()), 40.0));
        });
    }

    group.finish();
}

// =============================================================================
// FULL PIPELINE BENCHMARKS
// =============================================================================

fn bench_extract_and_write(c: &mut Criterion) {
    let mesh = mesh_with_step(0.01);
    let data = generate_travel_field(&mesh);
    let writer = KmlWriter::new();
    let gradient = LinearGradient::default();

    c.bench_function("select_levels", |b| {
        b.iter(|| select_levels(black_box(10.0), black_box(61.3)))
    });

    c.bench_function("extract_default_mesh", |b| {
        b.iter(|| extract(black_box(&mesh), black_box(&data)))
    });

    let set = extract(&mesh, &data).expect("contours");
    let styles = writer.styles(&set, &gradient);
    c.bench_function("write_kml", |b| {
        b.iter(|| writer.write(black_box(&set), black_box(&styles)))
    });
}

criterion_group!(
    benches,
    bench_march_squares,
    bench_connect_segments,
    bench_extract_and_write
);
criterion_main!(benches);
