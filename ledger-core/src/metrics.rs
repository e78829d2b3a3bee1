//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the ledger.
//! Metrics live in a per-ledger [`Registry`] so independent ledgers in one
//! process never collide on registration.
//!
//! # Metrics
//!
//! - `ledger_operations_total{operation,outcome}` - Completed operations by result
//! - `ledger_retries_total` - Retry attempts made by the executor
//! - `ledger_lock_wait_seconds` - Histogram of account lock wait times

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Completed operations, labelled by operation and outcome
    pub operations_total: IntCounterVec,

    /// Retry attempts
    pub retries_total: IntCounter,

    /// Lock wait histogram
    pub lock_wait: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let operations_total = IntCounterVec::new(
            Opts::new("ledger_operations_total", "Completed ledger operations"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(operations_total.clone()))?;

        let retries_total = IntCounter::new("ledger_retries_total", "Retry attempts made")?;
        registry.register(Box::new(retries_total.clone()))?;

        let lock_wait = Histogram::with_opts(
            HistogramOpts::new("ledger_lock_wait_seconds", "Account lock wait time").buckets(
                vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0],
            ),
        )?;
        registry.register(Box::new(lock_wait.clone()))?;

        Ok(Self {
            operations_total,
            retries_total,
            lock_wait,
            registry,
        })
    }

    /// Record a completed operation
    pub fn record(&self, operation: &str, outcome: &str) {
        self.operations_total
            .with_label_values(&[operation, outcome])
            .inc();
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
