//! Observability and Metrics
//!
//! Counters for decode, dispatch and validator outcomes, plus connection churn.
//!
//! Uses atomic counters for thread-safe metrics collection.

use crate::protocol::validator::TerminationReason;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for codec and validator operations
#[derive(Debug)]
pub struct Metrics {
    /// Packets decoded successfully
    pub packets_decoded: AtomicU64,
    /// Packets rejected as malformed
    pub decode_errors: AtomicU64,
    /// Packets encoded for transmission
    pub packets_encoded: AtomicU64,
    /// Payload bytes received
    pub bytes_received: AtomicU64,
    /// Payload bytes encoded
    pub bytes_sent: AtomicU64,
    /// Packets the game logic accepted
    pub handler_accepted: AtomicU64,
    /// Packets the game logic rejected
    pub handler_rejected: AtomicU64,
    /// Terminations for out-of-bounds or non-finite positions
    pub terminations_bounds: AtomicU64,
    /// Terminations for move packet flooding
    pub terminations_flood: AtomicU64,
    /// Terminations for implausible position changes
    pub terminations_plausibility: AtomicU64,
    /// Terminations for jump spam
    pub terminations_jump_spam: AtomicU64,
    /// Connections opened
    pub connections_opened: AtomicU64,
    /// Connections closed
    pub connections_closed: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            packets_decoded: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            packets_encoded: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            handler_accepted: AtomicU64::new(0),
            handler_rejected: AtomicU64::new(0),
            terminations_bounds: AtomicU64::new(0),
            terminations_flood: AtomicU64::new(0),
            terminations_plausibility: AtomicU64::new(0),
            terminations_jump_spam: AtomicU64::new(0),
            connections_opened: AtomicU64::new(0),
            connections_closed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a successfully decoded packet
    pub fn packet_decoded(&self, byte_count: u64) {
        self.packets_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a malformed packet
    pub fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an encoded packet
    pub fn packet_encoded(&self, byte_count: u64) {
        self.packets_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record the handler's verdict
    pub fn handler_result(&self, accepted: bool) {
        if accepted {
            self.handler_accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.handler_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a validator termination
    pub fn termination(&self, reason: TerminationReason) {
        let counter = match reason {
            TerminationReason::InvalidPosition => &self.terminations_bounds,
            TerminationReason::Flooding => &self.terminations_flood,
            TerminationReason::ExcessiveVerticalMovement
            | TerminationReason::ExcessiveHorizontalMovement => &self.terminations_plausibility,
            TerminationReason::JumpSpam => &self.terminations_jump_spam,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a new connection
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection closed
    pub fn connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_decoded: self.packets_decoded.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            packets_encoded: self.packets_encoded.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            handler_accepted: self.handler_accepted.load(Ordering::Relaxed),
            handler_rejected: self.handler_rejected.load(Ordering::Relaxed),
            terminations_bounds: self.terminations_bounds.load(Ordering::Relaxed),
            terminations_flood: self.terminations_flood.load(Ordering::Relaxed),
            terminations_plausibility: self.terminations_plausibility.load(Ordering::Relaxed),
            terminations_jump_spam: self.terminations_jump_spam.load(Ordering::Relaxed),
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            packets_decoded = snapshot.packets_decoded,
            decode_errors = snapshot.decode_errors,
            packets_encoded = snapshot.packets_encoded,
            bytes_received = snapshot.bytes_received,
            bytes_sent = snapshot.bytes_sent,
            handler_accepted = snapshot.handler_accepted,
            handler_rejected = snapshot.handler_rejected,
            terminations_bounds = snapshot.terminations_bounds,
            terminations_flood = snapshot.terminations_flood,
            terminations_plausibility = snapshot.terminations_plausibility,
            terminations_jump_spam = snapshot.terminations_jump_spam,
            connections_opened = snapshot.connections_opened,
            connections_closed = snapshot.connections_closed,
            uptime_seconds = snapshot.uptime_seconds,
            "Protocol metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub packets_decoded: u64,
    pub decode_errors: u64,
    pub packets_encoded: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub handler_accepted: u64,
    pub handler_rejected: u64,
    pub terminations_bounds: u64,
    pub terminations_flood: u64,
    pub terminations_plausibility: u64,
    pub terminations_jump_spam: u64,
    pub connections_opened: u64,
    pub connections_closed: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Total validator terminations across every rule
    pub fn terminations_total(&self) -> u64 {
        self.terminations_bounds
            + self.terminations_flood
            + self.terminations_plausibility
            + self.terminations_jump_spam
    }
}

/// Global metrics instance (lazy static for simplicity)
static METRICS: once_cell::sync::Lazy<std::sync::Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| std::sync::Arc::new(Metrics::new()));

/// Get the global metrics instance
pub fn global_metrics() -> std::sync::Arc<Metrics> {
    METRICS.clone()
}
