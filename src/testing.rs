//! Testing utilities for HDC invariant checking.
//!
//! Provides lightweight timing metrics and data-integrity validation for the
//! sparsity, determinism, and graded-similarity invariants the encoders and
//! `Esdr` are expected to uphold, mirroring the structure (not the VSA-specific
//! content) of the teacher crate's own testing infrastructure.

use crate::bit_pattern::{BitPattern, Pattern};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Timing samples for a named operation.
#[derive(Clone, Debug)]
pub struct TestMetrics {
    pub name: String,
    pub timings_ns: Vec<u64>,
    start: Option<Instant>,
    pub custom_metrics: HashMap<String, f64>,
}

impl TestMetrics {
    pub fn new(name: &str) -> Self {
        TestMetrics {
            name: name.to_string(),
            timings_ns: Vec::new(),
            start: None,
            custom_metrics: HashMap::new(),
        }
    }

    #[inline]
    pub fn start_timing(&mut self) {
        self.start = Some(Instant::now());
    }

    #[inline]
    pub fn stop_timing(&mut self) {
        if let Some(start) = self.start.take() {
            self.timings_ns.push(start.elapsed().as_nanos() as u64);
        }
    }

    #[inline]
    pub fn time_operation<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.start_timing();
        let result = f();
        self.stop_timing();
        result
    }

    pub fn record_metric(&mut self, name: &str, value: f64) {
        self.custom_metrics.insert(name.to_string(), value);
    }

    pub fn timing_stats(&self) -> TimingStats {
        let total: u64 = self.timings_ns.iter().sum();
        let count = self.timings_ns.len();
        let mean_ns = if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        };
        TimingStats {
            count,
            total: Duration::from_nanos(total),
            mean_ns,
        }
    }
}

/// Aggregate timing statistics.
#[derive(Clone, Debug)]
pub struct TimingStats {
    pub count: usize,
    pub total: Duration,
    pub mean_ns: f64,
}

impl TimingStats {
    pub fn ops_per_sec(&self) -> f64 {
        if self.total.as_secs_f64() > 0.0 {
            self.count as f64 / self.total.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Results from an invariant-validation pass.
#[derive(Clone, Debug, Default)]
pub struct IntegrityReport {
    pub checks: usize,
    pub failures: Vec<String>,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn pass(&mut self) {
        self.checks += 1;
    }

    pub fn fail(&mut self, msg: impl Into<String>) {
        self.checks += 1;
        self.failures.push(msg.into());
    }
}

/// Checks the sparsity and range invariants any encoded `BitPattern` must
/// satisfy (spec.md §4.A, §7): exactly `max_nbits` active bits, each within
/// `[0, dimension)`.
pub fn validate_sparse_pattern(
    pattern: &BitPattern,
    dimension: u32,
    max_nbits: usize,
) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    if pattern.len() == max_nbits {
        report.pass();
    } else {
        report.fail(format!(
            "expected {max_nbits} active bits, found {}",
            pattern.len()
        ));
    }

    if pattern.keys().all(|&b| b < dimension) {
        report.pass();
    } else {
        report.fail("pattern contains a bit outside [0, dimension)");
    }

    report
}

/// Checks that `a` and `b` share exactly `expected` bits, within the given
/// `tolerance` (used for graded-similarity assertions where an index-cycle
/// collision can shift the overlap by a bit or two).
pub fn assert_overlap_within<K: Ord + Clone>(a: &Pattern<K>, b: &Pattern<K>, expected: f64, tolerance: f64) {
    let overlap = a.weighted_intersection(b);
    assert!(
        (overlap - expected).abs() <= tolerance,
        "expected overlap near {expected} (tolerance {tolerance}), got {overlap}"
    );
}
