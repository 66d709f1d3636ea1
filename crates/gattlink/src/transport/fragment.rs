//! Outbound fragmentation
//!
//! Splits one message into a chain of buffers no longer than the usable MTU.
//! Splitting works from the tail: every chunk cut off the end is exactly
//! `mtu` bytes, so the chain starts with the short remainder, if any.

use super::buffer::{HeaderPool, PacketBuf};
use super::types::{TransportError, TransportResult};
use log::trace;

/// Message split into link-sized buffers, first chunk first
pub type FragmentChain = Vec<PacketBuf>;

/// Split `message` into chunks of at most `mtu` bytes.
///
/// Each split leases a header from `pool`. If a lease fails, every chunk
/// produced so far and the unsplit remainder are dropped together and
/// [`TransportError::ResourceExhausted`] is returned.
pub fn fragment(mut message: PacketBuf, mtu: usize, pool: &HeaderPool) -> TransportResult<FragmentChain> {
    if mtu == 0 {
        return Err(TransportError::MtuTooSmall(mtu));
    }

    if message.len() <= mtu {
        return Ok(vec![message]);
    }

    let total = message.len();
    let mut tail = Vec::with_capacity(total / mtu);
    while message.len() > mtu {
        let lease = pool.try_lease().ok_or(TransportError::ResourceExhausted)?;
        let at = message.len() - mtu;
        tail.push(message.split_off(at, lease));
    }

    let mut chain = Vec::with_capacity(tail.len() + 1);
    chain.push(message);
    chain.extend(tail.into_iter().rev());

    trace!(
        "split {} bytes into {} chunks (mtu {})",
        total,
        chain.len(),
        mtu
    );
    Ok(chain)
}
