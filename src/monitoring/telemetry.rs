//! Request counters and Prometheus text export for the search endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Latency histogram buckets (milliseconds).
const LATENCY_BUCKETS_MS: [f64; 10] = [
    1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0,
];

/// Search request telemetry: throughput, failures, empty answers, latency
/// and cache hit rate.
#[derive(Default)]
pub struct Telemetry {
    request_counter: AtomicU64,
    error_counter: AtomicU64,
    empty_counter: AtomicU64,
    suggestion_counter: AtomicU64,
    /// Cumulative latency in microseconds.
    latency_sum_us: AtomicU64,
    /// Index i counts requests with latency <= LATENCY_BUCKETS_MS[i].
    bucket_counts: [AtomicU64; 10],
    /// Cache hit rate 0..1, stored as rate * 1e6.
    cache_hit_rate: AtomicU64,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful request and how many suggestions it returned.
    pub fn record_request(&self, latency: Duration, suggestions: usize) {
        self.request_counter.fetch_add(1, Ordering::Relaxed);
        self.suggestion_counter
            .fetch_add(suggestions as u64, Ordering::Relaxed);
        if suggestions == 0 {
            self.empty_counter.fetch_add(1, Ordering::Relaxed);
        }
        self.observe_latency(latency);
    }

    /// Record a failed request (validation or inference).
    pub fn record_error(&self, latency: Duration) {
        self.request_counter.fetch_add(1, Ordering::Relaxed);
        self.error_counter.fetch_add(1, Ordering::Relaxed);
        self.observe_latency(latency);
    }

    fn observe_latency(&self, latency: Duration) {
        let us = latency.as_micros().min(u64::MAX as u128) as u64;
        self.latency_sum_us.fetch_add(us, Ordering::Relaxed);
        let ms = latency.as_secs_f64() * 1000.0;
        for (bound, count) in LATENCY_BUCKETS_MS.iter().zip(&self.bucket_counts) {
            if ms <= *bound {
                count.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn set_cache_hit_rate(&self, rate: f64) {
        let v = (rate.clamp(0.0, 1.0) * 1_000_000.0) as u64;
        self.cache_hit_rate.store(v, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.request_counter.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.error_counter.load(Ordering::Relaxed)
    }

    pub fn empty_results(&self) -> u64 {
        self.empty_counter.load(Ordering::Relaxed)
    }

    /// Export metrics in Prometheus text exposition format.
    pub fn export_metrics(&self) -> String {
        let requests = self.requests();
        let sum_ms = self.latency_sum_us.load(Ordering::Relaxed) as f64 / 1000.0;
        let cache_rate = self.cache_hit_rate.load(Ordering::Relaxed) as f64 / 1_000_000.0;

        let mut out = String::new();
        let mut metric = |name: &str, kind: &str, help: &str, value: String| {
            out.push_str(&format!("# HELP {} {}\n", name, help));
            out.push_str(&format!("# TYPE {} {}\n", name, kind));
            out.push_str(&format!("{} {}\n", name, value));
        };
        metric(
            "autocomplete_requests_total",
            "counter",
            "Total search requests.",
            requests.to_string(),
        );
        metric(
            "autocomplete_errors_total",
            "counter",
            "Search requests that failed.",
            self.errors().to_string(),
        );
        metric(
            "autocomplete_empty_results_total",
            "counter",
            "Search requests answered with no suggestion.",
            self.empty_results().to_string(),
        );
        metric(
            "autocomplete_suggestions_total",
            "counter",
            "Suggestions returned.",
            self.suggestion_counter.load(Ordering::Relaxed).to_string(),
        );
        metric(
            "autocomplete_cache_hit_rate",
            "gauge",
            "Recommendation cache hit rate 0..1.",
            cache_rate.to_string(),
        );

        out.push_str("# HELP autocomplete_request_latency_ms Search request latency (ms).\n");
        out.push_str("# TYPE autocomplete_request_latency_ms histogram\n");
        for (bound, count) in LATENCY_BUCKETS_MS.iter().zip(&self.bucket_counts) {
            out.push_str(&format!(
                "autocomplete_request_latency_ms_bucket{{le=\"{}\"}} {}\n",
                bound,
                count.load(Ordering::Relaxed)
            ));
        }
        out.push_str(&format!(
            "autocomplete_request_latency_ms_bucket{{le=\"+Inf\"}} {}\n",
            requests
        ));
        out.push_str(&format!("autocomplete_request_latency_ms_sum {}\n", sum_ms));
        out.push_str(&format!("autocomplete_request_latency_ms_count {}\n", requests));

        out
    }
}
