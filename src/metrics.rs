//! Request counters and latency histograms for the training and prediction
//! flows, plus the health summary built from them.
//!
//! Metrics live in their own [`Registry`] so several stores (and tests) can
//! coexist in one process; [`ServingMetrics::render`] produces the Prometheus
//! text format for a scrape endpoint.

use prometheus::core::Metric;
use prometheus::{Encoder, Histogram, HistogramOpts, HistogramTimer, IntCounter, Registry, TextEncoder};
use serde::Serialize;

use crate::error::ServingResult;
use crate::kv::KvStore;
use crate::serving::ServingStore;

/// Average and 95th percentile latency in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LatencySummary {
    pub avg: f64,
    /// Upper bound of the histogram bucket holding the 95th percentile.
    pub p95: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub series_trained: u64,
    pub inference_latency_ms: LatencySummary,
    pub training_latency_ms: LatencySummary,
}

#[derive(Clone)]
pub struct ServingMetrics {
    registry: Registry,
    train_requests: IntCounter,
    train_duration: Histogram,
    predict_requests: IntCounter,
    predict_duration: Histogram,
}

impl ServingMetrics {
    /// Metrics registered in a fresh private registry.
    pub fn new() -> prometheus::Result<Self> {
        Self::with_registry(Registry::new())
    }

    /// Register the four metrics in `registry`. Fails if they are already there.
    pub fn with_registry(registry: Registry) -> prometheus::Result<Self> {
        let train_requests =
            IntCounter::new("train_requests_total", "Total number of training requests")?;
        let train_duration = Histogram::with_opts(HistogramOpts::new(
            "train_duration_seconds",
            "Time spent training models",
        ))?;
        let predict_requests =
            IntCounter::new("predict_requests_total", "Total number of prediction requests")?;
        let predict_duration = Histogram::with_opts(HistogramOpts::new(
            "predict_duration_seconds",
            "Time spent on prediction",
        ))?;

        registry.register(Box::new(train_requests.clone()))?;
        registry.register(Box::new(train_duration.clone()))?;
        registry.register(Box::new(predict_requests.clone()))?;
        registry.register(Box::new(predict_duration.clone()))?;

        Ok(ServingMetrics {
            registry,
            train_requests,
            train_duration,
            predict_requests,
            predict_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus text exposition of every metric in the registry.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Count a training request and time it. Observe the timer on success,
    /// discard it on failure.
    pub(crate) fn start_training(&self) -> HistogramTimer {
        self.train_requests.inc();
        self.train_duration.start_timer()
    }

    pub(crate) fn start_prediction(&self) -> HistogramTimer {
        self.predict_requests.inc();
        self.predict_duration.start_timer()
    }

    pub fn train_requests(&self) -> u64 {
        self.train_requests.get()
    }

    pub fn predict_requests(&self) -> u64 {
        self.predict_requests.get()
    }

    pub fn train_durations_observed(&self) -> u64 {
        self.train_duration.get_sample_count()
    }

    pub fn predict_durations_observed(&self) -> u64 {
        self.predict_duration.get_sample_count()
    }

    pub fn training_latency(&self) -> LatencySummary {
        latency_ms(&self.train_duration)
    }

    pub fn inference_latency(&self) -> LatencySummary {
        latency_ms(&self.predict_duration)
    }

    pub fn health<S: KvStore>(&self, serving: &ServingStore<S>) -> ServingResult<HealthSummary> {
        Ok(HealthSummary {
            series_trained: serving.series_trained()?,
            inference_latency_ms: self.inference_latency(),
            training_latency_ms: self.training_latency(),
        })
    }
}

fn latency_ms(histogram: &Histogram) -> LatencySummary {
    let count = histogram.get_sample_count();
    if count == 0 {
        return LatencySummary::default();
    }
    let avg = histogram.get_sample_sum() / count as f64 * 1000.0;

    let target = (count as f64 * 0.95).ceil() as u64;
    let proto = histogram.metric();
    let buckets = proto.get_histogram().get_bucket();
    // Past the last finite bucket only the average is known.
    let p95 = buckets
        .iter()
        .find(|bucket| bucket.get_cumulative_count() >= target)
        .map(|bucket| bucket.get_upper_bound() * 1000.0)
        .unwrap_or(avg);

    LatencySummary { avg, p95 }
}
