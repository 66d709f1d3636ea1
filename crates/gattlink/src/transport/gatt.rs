//! GATT transport for length-framed messages
//!
//! This module provides the transport endpoint that:
//! - Reassembles messages written to the request characteristic
//! - Fragments outbound messages into notifications on the response characteristic
//! - Tracks per-connection state across connection open and close events

use super::buffer::{Endpoint, HeaderPool, PacketBuf};
use super::config::{Role, TransportConfig};
use super::fragment::fragment;
use super::framing::FrameLength;
use super::reassembly::ReassemblyQueue;
use super::service::{ServiceDef, OC_GATT_SERVICE};
use super::stats::{StatsSnapshot, TransportStats};
use super::types::{ConnHandle, Outcome, TransportError, TransportResult};
use crate::att::AttErrorCode;
use log::{debug, error, warn};

/// The link underneath the transport
pub trait GattLink: Send + Sync {
    /// Currently negotiated ATT MTU of the connection
    fn current_mtu(&self, conn_handle: ConnHandle) -> u16;

    /// Send one buffer as a notification of `attr_handle`
    fn notify(&self, conn_handle: ConnHandle, attr_handle: u16, buf: PacketBuf) -> TransportResult<()>;
}

/// GATT transport bound to one link
pub struct GattTransport<L: GattLink> {
    link: L,
    config: TransportConfig,
    pool: HeaderPool,
    reassembly: ReassemblyQueue,
    stats: TransportStats,
}

impl<L: GattLink> GattTransport<L> {
    /// Start a transport with CoAP-over-TCP framing
    pub fn new(link: L, config: TransportConfig) -> Self {
        let pool = HeaderPool::new(config.header_pool_size);
        let reassembly = ReassemblyQueue::new(pool.clone());
        Self::from_parts(link, config, pool, reassembly)
    }

    /// Start a transport with custom message framing
    pub fn with_framing(link: L, config: TransportConfig, framing: Box<dyn FrameLength>) -> Self {
        let pool = HeaderPool::new(config.header_pool_size);
        let reassembly = ReassemblyQueue::with_framing(pool.clone(), framing);
        Self::from_parts(link, config, pool, reassembly)
    }

    fn from_parts(
        link: L,
        config: TransportConfig,
        pool: HeaderPool,
        reassembly: ReassemblyQueue,
    ) -> Self {
        debug!("gatt transport up, role {:?}", config.role);
        Self {
            link,
            config,
            pool,
            reassembly,
            stats: TransportStats::new(),
        }
    }

    /// Get transport configuration
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn pool(&self) -> &HeaderPool {
        &self.pool
    }

    /// The service definition to register with the GATT server
    pub fn service(&self) -> &'static ServiceDef {
        &OC_GATT_SERVICE
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Whether a partial message is buffered for `conn_handle`
    pub fn is_pending(&self, conn_handle: ConnHandle) -> bool {
        self.reassembly.is_pending(conn_handle)
    }

    pub fn buffered_len(&self, conn_handle: ConnHandle) -> Option<usize> {
        self.reassembly.buffered_len(conn_handle)
    }

    pub fn pending_connections(&self) -> usize {
        self.reassembly.pending_count()
    }

    pub fn on_connection_opened(&self, conn_handle: ConnHandle) {
        debug!("gatt newconn {:#x}", conn_handle);
    }

    /// Release any partial message held for a closed connection
    pub fn on_connection_closed(&self, conn_handle: ConnHandle) {
        debug!("gatt endconn {:#x}", conn_handle);
        if let Some(bytes) = self.reassembly.on_connection_closed(conn_handle) {
            debug!("conn {} released {} buffered bytes", conn_handle, bytes);
        }
    }

    /// Feed one inbound fragment
    pub fn on_fragment_received(&self, conn_handle: ConnHandle, buf: PacketBuf) -> Outcome {
        self.stats.record_rx(buf.len());
        debug!("gatt rx seg {} len {}", conn_handle, buf.len());

        let outcome = self.reassembly.reassemble(conn_handle, buf);
        if let Outcome::Failed(err) = &outcome {
            self.stats.record_rx_error();
            error!("gatt rx conn {}: {}", conn_handle, err);
        }
        outcome
    }

    /// Access handler for writes to the service's characteristics.
    ///
    /// Returns the completed message, `None` while more fragments are
    /// expected, or the ATT error code to answer the write with.
    pub fn on_characteristic_write(
        &self,
        conn_handle: ConnHandle,
        attr_handle: u16,
        buf: PacketBuf,
    ) -> Result<Option<PacketBuf>, AttErrorCode> {
        if self.config.role != Role::Server {
            return Err(AttErrorCode::RequestNotSupported);
        }
        if attr_handle != self.config.request_handle {
            warn!("gatt write to unexpected handle {:#x}", attr_handle);
            return Err(AttErrorCode::InvalidHandle);
        }

        match self.on_fragment_received(conn_handle, buf) {
            Outcome::Complete(message) => Ok(Some(message)),
            Outcome::Incomplete => Ok(None),
            Outcome::Failed(_) => Err(AttErrorCode::InsufficientResources),
        }
    }

    /// Send a message to `conn_handle` as a series of notifications
    pub fn send_message(&self, conn_handle: ConnHandle, message: PacketBuf) -> TransportResult<()> {
        if self.config.role != Role::Server {
            error!("gatt send not supported in {:?} role", self.config.role);
            return Err(TransportError::UnsupportedRole(self.config.role));
        }

        self.stats.record_tx(message.len());
        let result = self.transmit(conn_handle, message);
        if let Err(err) = &result {
            self.stats.record_tx_error();
            error!("gatt tx conn {}: {}", conn_handle, err);
        }
        result
    }

    fn transmit(&self, conn_handle: ConnHandle, mut message: PacketBuf) -> TransportResult<()> {
        message.attach_endpoint(Endpoint::gatt(conn_handle), &self.pool)?;

        // The MTU is per connection and may be renegotiated at any time.
        let mtu = self.link.current_mtu(conn_handle);
        let usable = mtu.saturating_sub(self.config.envelope_overhead) as usize;
        if usable < 1 {
            return Err(TransportError::MtuTooSmall(usable));
        }

        let chain = fragment(message, usable, &self.pool)?;
        debug!(
            "gatt tx conn {} in {} segments (mtu {})",
            conn_handle,
            chain.len(),
            mtu
        );

        for segment in chain {
            self.link
                .notify(conn_handle, self.config.response_handle, segment)?;
            self.stats.record_tx_segment();
        }
        Ok(())
    }

    /// Tear down all reassembly state
    pub fn shutdown(&self) {
        let dropped = self.reassembly.clear();
        debug!("gatt transport down, {} partial messages dropped", dropped);
    }
}
