//! Training and prediction flows on top of [`ServingStore`].
//!
//! The statistics are deliberately thin: a population mean and standard
//! deviation, and a `mean + 3*std` threshold test. Both flows count requests
//! and time successful calls in [`ServingMetrics`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::ModelState;
use crate::error::{ServingError, ServingResult};
use crate::kv::KvStore;
use crate::metrics::ServingMetrics;
use crate::serving::ServingStore;
use crate::version::{Version, VersionSelector};

const THRESHOLD_SIGMAS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl DataPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        DataPoint { timestamp, value }
    }
}

/// Fit population mean and standard deviation.
pub fn fit(points: &[DataPoint]) -> ServingResult<ModelState> {
    if points.is_empty() {
        return Err(ServingError::InvalidTrainingData("no data points".into()));
    }
    if let Some(bad) = points.iter().find(|p| !p.value.is_finite()) {
        return Err(ServingError::InvalidTrainingData(format!(
            "non-finite value at timestamp {}",
            bad.timestamp
        )));
    }

    let n = points.len() as f64;
    let mean = points.iter().map(|p| p.value).sum::<f64>() / n;
    let variance = points
        .iter()
        .map(|p| (p.value - mean).powi(2))
        .sum::<f64>()
        / n;
    Ok(ModelState::new(mean, variance.sqrt()))
}

impl ModelState {
    pub fn is_anomaly(&self, value: f64) -> bool {
        value > self.mean + THRESHOLD_SIGMAS * self.std
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainOutcome {
    pub series_id: String,
    pub version: Version,
    pub points_used: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub anomaly: bool,
    pub model_version: Version,
}

#[derive(Clone)]
pub struct Trainer<S> {
    serving: ServingStore<S>,
    metrics: ServingMetrics,
}

impl<S: KvStore> Trainer<S> {
    pub fn new(serving: ServingStore<S>, metrics: ServingMetrics) -> Self {
        Trainer { serving, metrics }
    }

    /// Fit on parallel timestamp/value columns and save a new version.
    pub fn train(
        &self,
        series: &str,
        timestamps: &[i64],
        values: &[f64],
    ) -> ServingResult<TrainOutcome> {
        if timestamps.len() != values.len() {
            return Err(ServingError::InvalidTrainingData(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }
        let points: Vec<DataPoint> = timestamps
            .iter()
            .zip(values)
            .map(|(&timestamp, &value)| DataPoint::new(timestamp, value))
            .collect();
        self.train_points(series, &points)
    }

    pub fn train_points(&self, series: &str, points: &[DataPoint]) -> ServingResult<TrainOutcome> {
        let timer = self.metrics.start_training();
        let saved = fit(points).and_then(|state| {
            self.serving
                .save_trained(series, &state, points.len() as u64)
                .map(|version| (state, version))
        });
        let (state, version) = match saved {
            Ok(saved) => {
                timer.observe_duration();
                saved
            }
            Err(err) => {
                timer.stop_and_discard();
                return Err(err);
            }
        };
        info!(series, %version, points_used = points.len(), mean = state.mean, std = state.std, "trained model");
        Ok(TrainOutcome {
            series_id: series.to_string(),
            version,
            points_used: points.len(),
        })
    }
}

#[derive(Clone)]
pub struct Predictor<S> {
    serving: ServingStore<S>,
    metrics: ServingMetrics,
}

impl<S: KvStore> Predictor<S> {
    pub fn new(serving: ServingStore<S>, metrics: ServingMetrics) -> Self {
        Predictor { serving, metrics }
    }

    pub fn predict(
        &self,
        series: &str,
        selector: VersionSelector,
        value: f64,
    ) -> ServingResult<Prediction> {
        let timer = self.metrics.start_prediction();
        let record = match self.serving.resolve_model(series, selector) {
            Ok(record) => record,
            Err(err) => {
                timer.stop_and_discard();
                return Err(err);
            }
        };
        timer.observe_duration();
        Ok(Prediction {
            anomaly: record.state.is_anomaly(value),
            model_version: record.version,
        })
    }
}
