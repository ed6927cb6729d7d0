//! Data copying across divergent-but-compatible layouts.

use karma_stack::ensure_sufficient_stack;

use crate::compare::compare_array_desc;
use crate::coords::for_each_coordinate;
use crate::data::{Block, ListHeader, PacketMut, PacketRef, Slot};
use crate::{ArrayDescriptor, Element, PacketDescriptor};

/// Copy one whole packet of `desc` from `src` to `dst`: the inline image
/// byte for byte, and the slot table by deep clone.
///
/// # Panics
///
/// If either view is not a packet of `desc`.
pub fn copy_packet_data(desc: &PacketDescriptor, mut dst: PacketMut<'_>, src: PacketRef<'_>) {
    let size = desc.packet_size();
    dst.bytes_mut()[..size].copy_from_slice(&src.bytes()[..size]);
    dst.slots_mut()[..desc.slot_count()].clone_from_slice(&src.slots()[..desc.slot_count()]);
}

/// Copy the fields `input` and `output` have in common.
///
/// Descriptors with different field counts copy nothing. Otherwise each
/// field whose type (and, for atomic fields, name) agrees is copied,
/// recursing into nested arrays and lists; divergent fields are skipped and
/// leave the output untouched.
///
/// Returns `true` only if every field matched.
pub fn copy_data(
    in_desc: &PacketDescriptor,
    input: PacketRef<'_>,
    out_desc: &PacketDescriptor,
    mut output: PacketMut<'_>,
) -> bool {
    if in_desc.len() != out_desc.len() {
        tracing::debug!(
            input = in_desc.len(),
            output = out_desc.len(),
            "packet field counts differ, nothing copied"
        );
        return false;
    }
    ensure_sufficient_stack(|| {
        let mut matched = true;
        for (index, pair) in in_desc.elements().iter().zip(out_desc.elements()).enumerate() {
            matched &= match pair {
                (
                    Element::Atomic { ty: in_ty, name: in_name },
                    Element::Atomic { ty: out_ty, name: out_name },
                ) if in_ty == out_ty && in_name == out_name => {
                    copy_atomic(in_desc, input, out_desc, output.reborrow(), index)
                }
                (Element::Array(in_array), Element::Array(out_array)) => {
                    let Some(src) = input.array(in_desc, index) else {
                        continue;
                    };
                    match output.slot_mut(out_desc, index) {
                        Some(Slot::Array(dst)) => {
                            let dst = dst.get_or_insert_with(|| {
                                Box::new(Block::alloc(out_array.packet(), out_array.array_size()))
                            });
                            copy_array(in_array, src, out_array, dst)
                        }
                        _ => false,
                    }
                }
                (Element::List(in_list), Element::List(out_list)) => {
                    let Some(src) = input.list(in_desc, index) else {
                        continue;
                    };
                    match output.slot_mut(out_desc, index) {
                        Some(Slot::List(dst)) => {
                            let dst = dst.get_or_insert_with(Box::default);
                            copy_list(in_list, src, out_list, dst)
                        }
                        _ => false,
                    }
                }
                (Element::None, Element::None) => true,
                _ => {
                    tracing::trace!(index, "field diverges, skipped");
                    false
                }
            };
        }
        matched
    })
}

/// Copy one atomic field whose type and name already agree.
fn copy_atomic(
    in_desc: &PacketDescriptor,
    input: PacketRef<'_>,
    out_desc: &PacketDescriptor,
    mut output: PacketMut<'_>,
    index: usize,
) -> bool {
    if let Some(src) = input.field_bytes(in_desc, index) {
        return match output.field_bytes_mut(out_desc, index) {
            Some(dst) => {
                dst.copy_from_slice(src);
                true
            }
            None => false,
        };
    }
    match (input.slot(in_desc, index), output.slot_mut(out_desc, index)) {
        (Some(src), Some(dst)) => {
            dst.clone_from(src);
            true
        }
        _ => false,
    }
}

/// Copy array data between two arrays of identical shape.
///
/// Dimension mismatch, or element packets with different field counts,
/// copy nothing and return `false`. Tiled arrays are copied cell by cell
/// through their offset tables. Untiled arrays whose element packets match
/// exactly and contain no nested structures are copied in one bulk move;
/// otherwise every cell goes through [`copy_data`].
pub fn copy_array(
    in_desc: &ArrayDescriptor,
    input: &Block,
    out_desc: &ArrayDescriptor,
    output: &mut Block,
) -> bool {
    if !compare_array_desc(in_desc, out_desc, false) {
        tracing::debug!("array dimensions differ, nothing copied");
        return false;
    }
    let (in_packet, out_packet) = (in_desc.packet(), out_desc.packet());
    if in_packet.len() != out_packet.len() {
        tracing::debug!("array element packets differ in length, nothing copied");
        return false;
    }
    let size = in_desc.array_size();
    if size == 0 {
        return true;
    }

    if in_desc.is_tiled() || out_desc.is_tiled() {
        let mut matched = true;
        for_each_coordinate(&in_desc.lengths(), |coords| {
            let src = input.packet(in_desc.packet_offset(coords));
            let dst = output.packet_mut(out_desc.packet_offset(coords));
            matched &= copy_data(in_packet, src, out_packet, dst);
            true
        });
        return matched;
    }

    let first = copy_data(in_packet, input.packet(0), out_packet, output.packet_mut(0));
    if first && in_packet.all_atomic() && input.len() == output.len() {
        tracing::trace!(size, "bulk array copy");
        output.bytes.copy_from_slice(&input.bytes);
        output.slots.clone_from_slice(&input.slots);
        return true;
    }

    tracing::trace!(size, "element-wise array copy");
    let mut matched = first;
    for index in 1..size {
        matched &= copy_data(in_packet, input.packet(index), out_packet, output.packet_mut(index));
    }
    matched
}

/// Replace `output` with a contiguous copy of `input`.
///
/// Element packets with different field counts copy nothing and return
/// `false`. Otherwise the output is reallocated to the input's length,
/// takes over its sort settings, and every entry is copied in logical
/// order with [`copy_data`].
pub fn copy_list(
    in_desc: &PacketDescriptor,
    input: &ListHeader,
    out_desc: &PacketDescriptor,
    output: &mut ListHeader,
) -> bool {
    if in_desc.len() != out_desc.len() {
        tracing::debug!("list element packets differ in length, nothing copied");
        return false;
    }
    output.alloc_contiguous(out_desc, input.len());
    output.set_sort(input.sort_order(), input.sort_element());
    let mut matched = true;
    for (index, packet) in input.iter().enumerate() {
        let dst = output.contiguous_mut().packet_mut(index);
        matched &= copy_data(in_desc, packet, out_desc, dst);
    }
    matched
}
