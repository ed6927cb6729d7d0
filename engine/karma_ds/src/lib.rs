//! Karma DS - self-describing recursive data structures.
//!
//! A structure is described by a tree of descriptors and stored in blocks
//! laid out by them:
//!
//! - [`PacketDescriptor`]: ordered, typed, named fields
//! - [`ArrayDescriptor`]: fixed-shape N-dimensional grid of packets,
//!   optionally tiled
//! - [`DimensionDescriptor`]: one axis with its coordinate mapping
//! - [`data`]: packet storage, views and linked lists
//! - [`MultiArray`] / [`SharedMultiArray`]: top-level container and its
//!   attachment-counted handle
//!
//! Structural algorithms operate on descriptor/data pairs:
//!
//! - name resolution with ambiguity detection ([`NameLookup`])
//! - descriptor copy-until and data copy across divergent layouts
//!   ([`copy_data`], [`copy_array`], [`copy_list`])
//! - tiled addressing through lazily computed offset tables
//! - occurrence search and divergence traversal ([`traverse`])
//! - dimension reordering ([`reorder_array`])
//!
//! # Tracing
//!
//! Structural decisions are logged with `tracing`. Call [`init_tracing`]
//! to print them when `RUST_LOG` is set.

mod array;
mod compare;
mod coords;
mod copy;
pub mod data;
mod dimension;
mod error;
mod lookup;
mod multi;
mod packet;
mod reorder;
pub mod traverse;

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod fixtures;

pub use array::ArrayDescriptor;
pub use compare::{compare_array_desc, compare_dim_desc, compare_packet_desc};
pub use coords::{for_each_coordinate, Coords, Odometer};
pub use copy::{copy_array, copy_data, copy_list, copy_packet_data};
pub use dimension::{DimensionDescriptor, SearchBias};
pub use error::{DsError, Result};
pub use lookup::NameLookup;
pub use multi::{DestroyHook, MultiArray, SharedMultiArray, Structure};
pub use packet::{Element, FieldLocation, PacketBuilder, PacketDescriptor};
pub use reorder::reorder_array;
pub use traverse::{foreach_occurrence, traverse_and_process, Divergence, Occurrence, Target};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and only the first call in a
/// process has any effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
