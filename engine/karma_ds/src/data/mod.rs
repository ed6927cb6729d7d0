//! Instance model: how descriptors map onto storage.
//!
//! - [`Block`]: a run of packets (a top-level packet, a nested array, the
//!   contiguous part of a list)
//! - [`PacketRef`] / [`PacketMut`]: views of one packet
//! - [`ListHeader`]: contiguous block plus fragment chain
//! - [`get_named_value`] / [`put_named_value`]: scalar access by name

mod block;
mod list;
mod values;

pub use block::{Block, FixedString, PacketMut, PacketRef, Slot};
pub use list::{EntryId, FragmentIds, ListHeader, SortOrder};
pub use values::{get_named_value, put_named_value};

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
