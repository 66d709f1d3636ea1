//! Per-connection reassembly of inbound messages
//!
//! The queue keeps at most one partially received message per connection.
//! A fragment for a connection that already has a pending entry is appended
//! to it; otherwise the fragment starts a new message. Completion is decided
//! by comparing the accumulated length with the length declared in the
//! message's framing prefix.
//!
//! All state sits behind one mutex covering the whole set.

use super::buffer::{Endpoint, HeaderPool, PacketBuf};
use super::constants::FRAME_HEADER_MAX_LEN;
use super::framing::{CoapTcpFraming, FrameLength};
use super::types::{ConnHandle, Outcome};
use log::{debug, error, trace};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A message still waiting for fragments
#[derive(Debug)]
struct PendingEntry {
    buf: PacketBuf,
    declared_len: Option<usize>,
}

impl PendingEntry {
    fn is_complete(&self) -> bool {
        matches!(self.declared_len, Some(len) if len <= self.buf.len())
    }
}

/// Reassembly context for all connections of one transport
pub struct ReassemblyQueue {
    pending: Mutex<HashMap<ConnHandle, PendingEntry>>,
    framing: Box<dyn FrameLength>,
    pool: HeaderPool,
}

impl ReassemblyQueue {
    /// Create a queue using CoAP-over-TCP length framing
    pub fn new(pool: HeaderPool) -> Self {
        Self::with_framing(pool, Box::new(CoapTcpFraming))
    }

    pub fn with_framing(pool: HeaderPool, framing: Box<dyn FrameLength>) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            framing,
            pool,
        }
    }

    /// Feed one inbound fragment received on `conn_handle`
    pub fn reassemble(&self, conn_handle: ConnHandle, fragment: PacketBuf) -> Outcome {
        let mut pending = self.lock();

        if let Some(entry) = pending.get_mut(&conn_handle) {
            entry.buf.append(fragment);
            entry.declared_len = self.framing.message_len(entry.buf.as_slice());

            if entry.is_complete() {
                if let Some(entry) = pending.remove(&conn_handle) {
                    debug!(
                        "conn {} reassembled {} bytes",
                        conn_handle,
                        entry.buf.len()
                    );
                    return Outcome::Complete(entry.buf);
                }
            } else {
                trace!(
                    "conn {} holding {} of {:?} bytes",
                    conn_handle,
                    entry.buf.len(),
                    entry.declared_len
                );
            }
            return Outcome::Incomplete;
        }

        let mut fragment = fragment;
        if let Err(err) = fragment.attach_endpoint(Endpoint::gatt(conn_handle), &self.pool) {
            error!("conn {} dropping fragment: {}", conn_handle, err);
            return Outcome::Failed(err);
        }

        let entry = PendingEntry {
            declared_len: self.framing.message_len(fragment.as_slice()),
            buf: fragment,
        };
        trace!(
            "conn {} new message, header {}",
            conn_handle,
            hex::encode(&entry.buf.as_slice()[..entry.buf.len().min(FRAME_HEADER_MAX_LEN)])
        );

        if entry.is_complete() {
            return Outcome::Complete(entry.buf);
        }

        pending.insert(conn_handle, entry);
        Outcome::Incomplete
    }

    /// Drop the pending message of a closed connection.
    ///
    /// Returns the number of buffered bytes released.
    pub fn on_connection_closed(&self, conn_handle: ConnHandle) -> Option<usize> {
        self.lock()
            .remove(&conn_handle)
            .map(|entry| entry.buf.len())
    }

    /// Whether `conn_handle` has a message in progress
    pub fn is_pending(&self, conn_handle: ConnHandle) -> bool {
        self.lock().contains_key(&conn_handle)
    }

    /// Bytes buffered so far for `conn_handle`
    pub fn buffered_len(&self, conn_handle: ConnHandle) -> Option<usize> {
        self.lock().get(&conn_handle).map(|entry| entry.buf.len())
    }

    /// Number of connections with a message in progress
    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    /// Release every pending message; returns how many were dropped
    pub fn clear(&self) -> usize {
        let mut pending = self.lock();
        let count = pending.len();
        pending.clear();
        count
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ConnHandle, PendingEntry>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
