//! Structural comparison of descriptors.
//!
//! These are the predicates the copy and traversal algorithms use to
//! decide whether two instances of "the same" format still line up.
//! Tiling is a storage detail and never takes part in a comparison.

use karma_stack::ensure_sufficient_stack;

use crate::{ArrayDescriptor, DimensionDescriptor, Element, PacketDescriptor};

/// Same name, length, coordinate extent and mode; random dimensions must
/// also agree point for point.
pub fn compare_dim_desc(a: &DimensionDescriptor, b: &DimensionDescriptor) -> bool {
    a.name() == b.name()
        && a.length() == b.length()
        && a.minimum() == b.minimum()
        && a.maximum() == b.maximum()
        && a.coordinates() == b.coordinates()
}

/// Same dimensions. With `recursive`, the element packets must match too.
pub fn compare_array_desc(a: &ArrayDescriptor, b: &ArrayDescriptor, recursive: bool) -> bool {
    a.num_dimensions() == b.num_dimensions()
        && a
            .dimensions()
            .iter()
            .zip(b.dimensions())
            .all(|(x, y)| compare_dim_desc(x, y))
        && (!recursive || compare_packet_desc(a.packet(), b.packet(), true))
}

/// Same field count, and field by field the same type and (for atomic
/// fields) the same name. Without `recursive`, nested arrays and lists
/// match on their type tag alone.
pub fn compare_packet_desc(a: &PacketDescriptor, b: &PacketDescriptor, recursive: bool) -> bool {
    if a.len() != b.len() {
        return false;
    }
    ensure_sufficient_stack(|| {
        a.elements()
            .iter()
            .zip(b.elements())
            .all(|pair| match pair {
                (Element::Atomic { ty: ta, name: na }, Element::Atomic { ty: tb, name: nb }) => {
                    ta == tb && na == nb
                }
                (Element::Array(x), Element::Array(y)) => {
                    !recursive || compare_array_desc(x, y, true)
                }
                (Element::List(x), Element::List(y)) => {
                    !recursive || compare_packet_desc(x, y, true)
                }
                (Element::None, Element::None) => true,
                _ => false,
            })
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
