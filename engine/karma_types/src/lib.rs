//! Karma Types - the atomic element type registry.
//!
//! This crate is the leaf of the engine: a closed set of element type tags
//! with fixed byte widths, classification flags, and the generic
//! bytes-to-double conversion every numeric consumer relies on.
//!
//! - [`ElementType`]: the tag carried by each packet field
//! - [`TypeFlags`]: constant-time classification of a tag
//! - [`read_value`] / [`write_value`]: native-endian value conversion
//! - [`TOO_BIG`]: the blanking sentinel
//!
//! The size table is a set of `const fn` matches; there is no mutable
//! global state.

mod element_type;
mod flags;
mod value;

pub use element_type::ElementType;
pub use flags::TypeFlags;
pub use value::{read_value, write_value};

/// Sentinel marking "no data" at a position.
///
/// Any value greater than or equal to this is treated as blanked and
/// excluded from aggregate computations.
pub const TOO_BIG: f64 = 1e30;

/// Whether `value` is blanked under `too_big`.
#[inline]
pub fn is_blank(value: f64, too_big: f64) -> bool {
    value >= too_big
}
