//! Packet buffers and the header pool backing them
//!
//! A [`PacketBuf`] owns its bytes in a growable `Vec<u8>` and carries the
//! endpoint metadata as a separate value next to them. Buffers handed over by
//! the link reserve some header room in front of the data; when that room is
//! too small for the endpoint metadata, or when a buffer is split in two, a
//! header is leased from a [`HeaderPool`]. Pools may be bounded, which is how
//! allocation failure surfaces as [`TransportError::ResourceExhausted`].
//! Leases go back to the pool when the buffer holding them is dropped.

use super::constants::ENDPOINT_HEADER_LEN;
use super::types::{ConnHandle, TransportError, TransportResult};
use bitflags::bitflags;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

bitflags! {
    /// Transport flags carried with an endpoint
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EndpointFlags: u8 {
        const GATT = 0x02;
        const SECURED = 0x10;
    }
}

/// Per-connection addressing attached to a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub flags: EndpointFlags,
    pub conn_handle: ConnHandle,
}

impl Endpoint {
    /// Endpoint for a GATT connection
    pub fn gatt(conn_handle: ConnHandle) -> Self {
        Self {
            flags: EndpointFlags::GATT,
            conn_handle,
        }
    }
}

#[derive(Debug)]
struct PoolInner {
    capacity: Option<usize>,
    in_use: AtomicUsize,
}

/// Source of buffer headers
#[derive(Debug, Clone)]
pub struct HeaderPool {
    inner: Arc<PoolInner>,
}

impl HeaderPool {
    /// Create a pool; `None` never runs out
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                capacity,
                in_use: AtomicUsize::new(0),
            }),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn bounded(capacity: usize) -> Self {
        Self::new(Some(capacity))
    }

    /// Lease one header, or `None` when the pool is exhausted
    pub fn try_lease(&self) -> Option<HeaderLease> {
        let mut current = self.inner.in_use.load(Ordering::Acquire);
        loop {
            if let Some(capacity) = self.inner.capacity {
                if current >= capacity {
                    return None;
                }
            }

            match self.inner.in_use.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return Some(HeaderLease {
                        pool: Arc::clone(&self.inner),
                    })
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Number of headers currently leased
    pub fn in_use(&self) -> usize {
        self.inner.in_use.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.inner.capacity
    }
}

impl Default for HeaderPool {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// A header taken from a [`HeaderPool`]; returned on drop
#[derive(Debug)]
pub struct HeaderLease {
    pool: Arc<PoolInner>,
}

impl Drop for HeaderLease {
    fn drop(&mut self) {
        self.pool.in_use.fetch_sub(1, Ordering::AcqRel);
    }
}

/// An owned packet: payload bytes plus endpoint metadata
#[derive(Debug)]
pub struct PacketBuf {
    data: Vec<u8>,
    header_room: usize,
    endpoint: Option<Endpoint>,
    lease: Option<HeaderLease>,
}

impl PacketBuf {
    /// Wrap bytes that come with no reserved header room
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_header_room(data, 0)
    }

    /// Wrap bytes that come with `header_room` bytes reserved for metadata
    pub fn with_header_room(data: Vec<u8>, header_room: usize) -> Self {
        Self {
            data,
            header_room,
            endpoint: None,
            lease: None,
        }
    }

    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Endpoint this buffer is bound to, if any
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.endpoint
    }

    pub fn header_room(&self) -> usize {
        self.header_room
    }

    /// Whether a pool header had to be leased for this buffer
    pub fn has_leased_header(&self) -> bool {
        self.lease.is_some()
    }

    /// Bind the buffer to an endpoint.
    ///
    /// Binding happens once. Re-binding to the same connection is a no-op;
    /// binding to another one fails with [`TransportError::EndpointMismatch`].
    pub fn attach_endpoint(&mut self, endpoint: Endpoint, pool: &HeaderPool) -> TransportResult<()> {
        if let Some(bound) = self.endpoint {
            if bound.conn_handle == endpoint.conn_handle {
                return Ok(());
            }
            return Err(TransportError::EndpointMismatch {
                bound: bound.conn_handle,
                requested: endpoint.conn_handle,
            });
        }

        if self.header_room < ENDPOINT_HEADER_LEN && self.lease.is_none() {
            let lease = pool.try_lease().ok_or(TransportError::ResourceExhausted)?;
            self.lease = Some(lease);
        }

        self.endpoint = Some(endpoint);
        Ok(())
    }

    /// Move the bytes of `other` onto the end of this buffer
    pub(crate) fn append(&mut self, mut other: PacketBuf) {
        if self.data.is_empty() {
            std::mem::swap(&mut self.data, &mut other.data);
        } else {
            self.data.append(&mut other.data);
        }
    }

    /// Split off `[at, len)` into a new buffer headed by `lease`.
    ///
    /// The new buffer inherits the endpoint of this one.
    pub(crate) fn split_off(&mut self, at: usize, lease: HeaderLease) -> PacketBuf {
        PacketBuf {
            data: self.data.split_off(at),
            header_room: 0,
            endpoint: self.endpoint,
            lease: Some(lease),
        }
    }
}

impl AsRef<[u8]> for PacketBuf {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for PacketBuf {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
