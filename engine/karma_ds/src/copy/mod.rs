//! Descriptor and data copying.
//!
//! Descriptor copies ([`PacketDescriptor::copy_until`],
//! [`ArrayDescriptor::copy_until`](crate::ArrayDescriptor::copy_until))
//! duplicate a tree up to a named truncation point. Data copies
//! ([`copy_data`], [`copy_array`], [`copy_list`]) move instance data
//! between two layouts that may have diverged: matching fields are copied,
//! divergent fields are skipped, and the result says whether everything
//! matched.
//!
//! [`PacketDescriptor::copy_until`]: crate::PacketDescriptor::copy_until

mod data;
mod descriptor;

pub use data::{copy_array, copy_data, copy_list, copy_packet_data};

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
