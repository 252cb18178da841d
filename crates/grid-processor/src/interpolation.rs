//! Distance-weighted k-nearest-neighbor regression.
//!
//! A query point takes the weighted mean of its `k` closest training
//! samples, each weighted by the inverse of its Euclidean distance. When
//! the query coincides with one or more samples, the mean of those samples
//! is returned instead.

use iso_common::{EvaluationMesh, SamplePoint};
use tracing::debug;

use crate::error::{GridProcessorError, Result};

/// Neighbor count used by the contour pipeline.
pub const DEFAULT_NEIGHBORS: usize = 4;

/// A training sample: coordinate and duration in minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingSample {
    pub x: f64,
    pub y: f64,
    pub minutes: f64,
}

/// The successful samples of a run, converted to minutes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    samples: Vec<TrainingSample>,
}

impl TrainingSet {
    /// Keep the samples with a duration, in their original order.
    pub fn from_samples(samples: &[SamplePoint]) -> Self {
        let samples = samples
            .iter()
            .filter_map(|s| {
                s.duration_secs().map(|secs| TrainingSample {
                    x: s.x,
                    y: s.y,
                    minutes: secs as f64 / 60.0,
                })
            })
            .collect();
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[TrainingSample] {
        &self.samples
    }
}

impl FromIterator<TrainingSample> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = TrainingSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// Regressor configuration.
#[derive(Debug, Clone, Copy)]
pub struct KnnRegressor {
    k: usize,
}

impl Default for KnnRegressor {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORS)
    }
}

impl KnnRegressor {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn neighbors(&self) -> usize {
        self.k
    }

    /// Fit a surface to the training set.
    pub fn fit(&self, training: &TrainingSet) -> Result<Surface> {
        if self.k == 0 {
            return Err(GridProcessorError::domain("neighbor count must be at least 1"));
        }
        if training.len() < self.k {
            return Err(GridProcessorError::domain(format!(
                "{} valid samples, at least {} needed for {}-nearest-neighbor regression",
                training.len(),
                self.k,
                self.k
            )));
        }
        debug!(samples = training.len(), k = self.k, "Fitted KNN surface");
        Ok(Surface {
            k: self.k,
            samples: training.samples.clone(),
        })
    }
}

/// A fitted surface. Evaluation never mutates it.
#[derive(Debug, Clone)]
pub struct Surface {
    k: usize,
    samples: Vec<TrainingSample>,
}

impl Surface {
    /// Predicted duration in minutes at `(x, y)`.
    pub fn predict(&self, x: f64, y: f64) -> f64 {
        // (squared distance, sample index), sorted ascending; earlier
        // samples win distance ties.
        let mut nearest: Vec<(f64, usize)> = Vec::with_capacity(self.k + 1);

        for (idx, s) in self.samples.iter().enumerate() {
            let d2 = (s.x - x).powi(2) + (s.y - y).powi(2);
            if nearest.len() == self.k && d2 >= nearest[self.k - 1].0 {
                continue;
            }
            let pos = nearest.partition_point(|&(d, _)| d <= d2);
            nearest.insert(pos, (d2, idx));
            nearest.truncate(self.k);
        }

        let coincident: Vec<f64> = nearest
            .iter()
            .filter(|(d2, _)| *d2 == 0.0)
            .map(|&(_, idx)| self.samples[idx].minutes)
            .collect();
        if !coincident.is_empty() {
            return coincident.iter().sum::<f64>() / coincident.len() as f64;
        }

        let (weighted, total_weight) =
            nearest
                .iter()
                .fold((0.0, 0.0), |(weighted, total), &(d2, idx)| {
                    let w = 1.0 / d2.sqrt();
                    (weighted + w * self.samples[idx].minutes, total + w)
                });
        weighted / total_weight
    }

    /// Predict every point of a batch.
    pub fn evaluate<I>(&self, points: I) -> Vec<f64>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points.into_iter().map(|(x, y)| self.predict(x, y)).collect()
    }

    /// Predict every mesh point, row-major.
    pub fn evaluate_mesh(&self, mesh: &EvaluationMesh) -> Vec<f64> {
        self.evaluate(mesh.points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64, minutes: f64) -> TrainingSample {
        TrainingSample { x, y, minutes }
    }

    #[test]
    fn test_inverse_distance_weights() {
        let training: TrainingSet = vec![
            sample(0.0, 0.0, 1.0),
            sample(3.0, 0.0, 4.0),
            sample(10.0, 10.0, 100.0),
        ]
        .into_iter()
        .collect();
        let surface = KnnRegressor::new(2).fit(&training).unwrap();
        // distances 1 and 2 -> weights 1 and 0.5
        let expected = (1.0 * 1.0 + 0.5 * 4.0) / 1.5;
        assert!((surface.predict(1.0, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kth_tie_keeps_earlier_sample() {
        let training: TrainingSet = vec![
            sample(1.0, 0.0, 10.0),
            sample(-1.0, 0.0, 20.0),
            sample(0.0, 1.0, 30.0),
        ]
        .into_iter()
        .collect();
        let surface = KnnRegressor::new(2).fit(&training).unwrap();
        assert!((surface.predict(0.0, 0.0) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_seconds_converted_to_minutes() {
        use iso_common::SampleOutcome;
        let training = TrainingSet::from_samples(&[
            SamplePoint::new(0.0, 0.0, SampleOutcome::Duration(90)),
            SamplePoint::new(1.0, 0.0, SampleOutcome::Failed("ZERO_RESULTS".into())),
        ]);
        assert_eq!(training.len(), 1);
        assert_eq!(training.samples()[0].minutes, 1.5);
    }
}
