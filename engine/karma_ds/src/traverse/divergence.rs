//! Pairwise divergence traversal.

use karma_stack::ensure_sufficient_stack;

use crate::compare::{compare_array_desc, compare_packet_desc};
use crate::coords::for_each_coordinate;
use crate::data::{Block, ListHeader, PacketMut, PacketRef};
use crate::{ArrayDescriptor, Element, PacketDescriptor};

/// A point where two structures stop lining up.
#[derive(Debug)]
pub enum Divergence<'a> {
    /// Two packets whose fields differ.
    Packet {
        input_desc: &'a PacketDescriptor,
        input: PacketRef<'a>,
        output_desc: &'a PacketDescriptor,
        output: PacketMut<'a>,
    },
    /// Two arrays whose dimensions differ, or (with `as_whole`) whose
    /// element packets differ.
    Array {
        input_desc: &'a ArrayDescriptor,
        input: &'a Block,
        output_desc: &'a ArrayDescriptor,
        output: &'a mut Block,
    },
    /// Two lists of different lengths. The descriptors are the lists'
    /// element packets.
    List {
        input_desc: &'a PacketDescriptor,
        input: &'a ListHeader,
        output_desc: &'a PacketDescriptor,
        output: &'a mut ListHeader,
    },
}

type Process<'f> = &'f mut dyn for<'x> FnMut(Divergence<'x>) -> bool;

/// Walk `input` and `output` side by side and hand every divergence to
/// `f`.
///
/// Packets are compared field by field, nested arrays and lists by tag
/// only. Where two packets differ, `f` gets the pair and nothing below
/// them is visited. Where they agree, the walk descends into their nested
/// arrays and lists. Arrays with different dimensions, and lists with
/// different lengths, are reported whole. With `as_whole`, arrays whose
/// element packets differ are also reported whole instead of cell by cell.
///
/// Returns `false` as soon as `f` does.
pub fn traverse_and_process(
    in_desc: &PacketDescriptor,
    input: PacketRef<'_>,
    out_desc: &PacketDescriptor,
    output: PacketMut<'_>,
    as_whole: bool,
    mut f: impl FnMut(Divergence<'_>) -> bool,
) -> bool {
    process_packet(in_desc, input, out_desc, output, as_whole, &mut f)
}

fn process_packet(
    in_desc: &PacketDescriptor,
    input: PacketRef<'_>,
    out_desc: &PacketDescriptor,
    mut output: PacketMut<'_>,
    as_whole: bool,
    f: Process<'_>,
) -> bool {
    if !compare_packet_desc(in_desc, out_desc, false) {
        tracing::trace!("packets diverge");
        return f(Divergence::Packet {
            input_desc: in_desc,
            input,
            output_desc: out_desc,
            output,
        });
    }
    ensure_sufficient_stack(|| {
        for (index, pair) in in_desc.elements().iter().zip(out_desc.elements()).enumerate() {
            let keep_going = match pair {
                (Element::Array(in_array), Element::Array(out_array)) => {
                    match (input.array(in_desc, index), output.array_mut(out_desc, index)) {
                        (Some(src), Some(dst)) => {
                            process_array(in_array, src, out_array, dst, as_whole, f)
                        }
                        _ => true,
                    }
                }
                (Element::List(in_entry), Element::List(out_entry)) => {
                    match (input.list(in_desc, index), output.list_mut(out_desc, index)) {
                        (Some(src), Some(dst)) => {
                            process_list(in_entry, src, out_entry, dst, as_whole, f)
                        }
                        _ => true,
                    }
                }
                _ => true,
            };
            if !keep_going {
                return false;
            }
        }
        true
    })
}

fn process_array(
    in_desc: &ArrayDescriptor,
    input: &Block,
    out_desc: &ArrayDescriptor,
    output: &mut Block,
    as_whole: bool,
    f: Process<'_>,
) -> bool {
    let packets_match = compare_packet_desc(in_desc.packet(), out_desc.packet(), false);
    if !compare_array_desc(in_desc, out_desc, false) || (as_whole && !packets_match) {
        tracing::trace!(packets_match, "arrays diverge");
        return f(Divergence::Array {
            input_desc: in_desc,
            input,
            output_desc: out_desc,
            output,
        });
    }
    if packets_match && in_desc.packet().all_atomic() {
        return true;
    }
    for_each_coordinate(&in_desc.lengths(), |coords| {
        process_packet(
            in_desc.packet(),
            input.packet(in_desc.packet_offset(coords)),
            out_desc.packet(),
            output.packet_mut(out_desc.packet_offset(coords)),
            as_whole,
            f,
        )
    })
}

fn process_list(
    in_desc: &PacketDescriptor,
    input: &ListHeader,
    out_desc: &PacketDescriptor,
    output: &mut ListHeader,
    as_whole: bool,
    f: Process<'_>,
) -> bool {
    if input.len() != output.len() {
        tracing::trace!(input = input.len(), output = output.len(), "list lengths diverge");
        return f(Divergence::List {
            input_desc: in_desc,
            input,
            output_desc: out_desc,
            output,
        });
    }
    let mut entries = input.iter();
    output.for_each_mut(|dst| match entries.next() {
        Some(src) => process_packet(in_desc, src, out_desc, dst, as_whole, f),
        None => false,
    })
}
