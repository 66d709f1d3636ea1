//! Transport counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters kept by a transport
#[derive(Debug, Default)]
pub struct TransportStats {
    rx_segments: AtomicU64,
    rx_bytes: AtomicU64,
    rx_errors: AtomicU64,
    tx_messages: AtomicU64,
    tx_segments: AtomicU64,
    tx_bytes: AtomicU64,
    tx_errors: AtomicU64,
}

/// Point-in-time copy of [`TransportStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Inbound fragments seen
    pub rx_segments: u64,
    /// Inbound fragment bytes
    pub rx_bytes: u64,
    /// Inbound fragments dropped
    pub rx_errors: u64,
    /// Outbound messages accepted
    pub tx_messages: u64,
    /// Outbound fragments handed to the link
    pub tx_segments: u64,
    /// Outbound message bytes
    pub tx_bytes: u64,
    /// Outbound messages that failed
    pub tx_errors: u64,
}

impl TransportStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_rx(&self, bytes: usize) {
        self.rx_segments.fetch_add(1, Ordering::Relaxed);
        self.rx_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_rx_error(&self) {
        self.rx_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_tx(&self, bytes: usize) {
        self.tx_messages.fetch_add(1, Ordering::Relaxed);
        self.tx_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_tx_segment(&self) {
        self.tx_segments.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_tx_error(&self) {
        self.tx_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            rx_segments: self.rx_segments.load(Ordering::Relaxed),
            rx_bytes: self.rx_bytes.load(Ordering::Relaxed),
            rx_errors: self.rx_errors.load(Ordering::Relaxed),
            tx_messages: self.tx_messages.load(Ordering::Relaxed),
            tx_segments: self.tx_segments.load(Ordering::Relaxed),
            tx_bytes: self.tx_bytes.load(Ordering::Relaxed),
            tx_errors: self.tx_errors.load(Ordering::Relaxed),
        }
    }
}
