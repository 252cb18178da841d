//! Generators for synthetic surfaces and sample layouts.
//!
//! Surfaces are returned row-major over `xs` (columns) and `ys` (rows),
//! matching the layout of an evaluation mesh.

/// `count` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count < 2 {
        return vec![min; count];
    }
    let step = (max - min) / (count - 1) as f64;
    (0..count).map(|i| min + i as f64 * step).collect()
}

/// Evaluate `f` over every (x, y) pair, row-major.
///
/// # Example
///
/// ```
/// use test_utils::{linspace, surface_grid};
///
/// let xs = linspace(0.0, 2.0, 3);
/// let values = surface_grid(&xs, &xs, |x, y| x + y);
/// assert_eq!(values, vec![0.0, 1.0, 2.0, 1.0, 2.0, 3.0, 2.0, 3.0, 4.0]);
/// ```
pub fn surface_grid<F>(xs: &[f64], ys: &[f64], f: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    let mut data = Vec::with_capacity(xs.len() * ys.len());
    for &y in ys {
        for &x in xs {
            data.push(f(x, y));
        }
    }
    data
}

/// A single peak of height `peak` at `(cx, cy)`, falling off linearly
/// with distance.
pub fn cone_surface(xs: &[f64], ys: &[f64], cx: f64, cy: f64, peak: f64) -> Vec<f64> {
    surface_grid(xs, ys, |x, y| {
        peak - ((x - cx).powi(2) + (y - cy).powi(2)).sqrt()
    })
}

/// Travel time in seconds that grows linearly with distance from `origin`.
///
/// Roughly a 60 km/h trip on a flat degree grid; handy for scripted
/// duration sources.
pub fn radial_seconds(origin: (f64, f64), point: (f64, f64)) -> u64 {
    let d = ((point.0 - origin.0).powi(2) + (point.1 - origin.1).powi(2)).sqrt();
    (d * 111.0 * 60.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace(4.0, 9.0, 1), vec![4.0]);
    }

    #[test]
    fn test_cone_peak() {
        let xs = linspace(-1.0, 1.0, 3);
        let values = cone_surface(&xs, &xs, 0.0, 0.0, 5.0);
        assert_eq!(values[4], 5.0);
        assert_eq!(values[1], 4.0);
    }

    #[test]
    fn test_radial_seconds() {
        assert_eq!(radial_seconds((0.0, 0.0), (0.0, 0.0)), 0);
        assert_eq!(radial_seconds((0.0, 0.0), (1.0, 0.0)), 6660);
    }
}
