//! Single-structure search traversal.

use karma_stack::ensure_sufficient_stack;

use crate::coords::for_each_coordinate;
use crate::data::{Block, ListHeader, PacketRef};
use crate::{ArrayDescriptor, DsError, Element, NameLookup, PacketDescriptor, Result};

/// What an [`Occurrence::Array`] stands for.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Target {
    /// Atomic element `index` of the array's element packet.
    Element(usize),
    /// Dimension `index` of the array.
    Dimension(usize),
}

/// One place where a searched name occurs.
#[derive(Copy, Clone, Debug)]
pub enum Occurrence<'a> {
    /// Element `index` of one packet.
    Element {
        packet: &'a PacketDescriptor,
        data: PacketRef<'a>,
        index: usize,
    },
    /// One run along dimension `dim`, every other coordinate held fixed.
    /// The packet at index `i` of the run is at packet offset
    /// `base + array.offsets()[dim][i]` in `data`.
    Dimension {
        array: &'a ArrayDescriptor,
        data: &'a Block,
        dim: usize,
        base: usize,
    },
    /// A whole array, when traversing with `as_whole`.
    Array {
        array: &'a ArrayDescriptor,
        data: &'a Block,
        target: Target,
    },
    /// A whole list whose entries hold element `index`, when traversing
    /// with `as_whole`.
    List {
        packet: &'a PacketDescriptor,
        list: &'a ListHeader,
        index: usize,
    },
}

type Visit<'f, 'a> = &'f mut dyn FnMut(Occurrence<'a>) -> bool;

/// Call `f` for every occurrence of `name` below `data`.
///
/// Without `as_whole`, an element is reported once per packet holding it
/// (every array cell, every list entry) and a dimension once per
/// combination of the array's other coordinates. With `as_whole`, the
/// innermost array or list holding the name is reported once instead.
///
/// Returns `Ok(false)` if `f` stopped the traversal. Fails if `name` does
/// not resolve, or resolves more than once.
pub fn foreach_occurrence<'a>(
    desc: &'a PacketDescriptor,
    data: PacketRef<'a>,
    name: &str,
    as_whole: bool,
    mut f: impl FnMut(Occurrence<'a>) -> bool,
) -> Result<bool> {
    match desc.find_name(name) {
        NameLookup::NotFound => Err(DsError::NameNotFound(name.to_owned())),
        NameLookup::Multiple => {
            tracing::warn!(name, "occurrence search on an ambiguous name");
            Err(DsError::AmbiguousName(name.to_owned()))
        }
        NameLookup::Element { .. } | NameLookup::Dimension { .. } => {
            Ok(walk_packet(desc, data, name, as_whole, &mut f))
        }
    }
}

fn walk_packet<'a>(
    desc: &'a PacketDescriptor,
    data: PacketRef<'a>,
    name: &str,
    as_whole: bool,
    f: Visit<'_, 'a>,
) -> bool {
    if let Some(index) = desc.find_element(name) {
        return f(Occurrence::Element {
            packet: desc,
            data,
            index,
        });
    }
    ensure_sufficient_stack(|| {
        for (index, element) in desc.elements().iter().enumerate() {
            match element {
                Element::Array(array) if array.find_name(name).is_found() => {
                    return match data.array(desc, index) {
                        Some(block) => walk_array(array, block, name, as_whole, f),
                        None => true,
                    };
                }
                Element::List(entry) if entry.find_name(name).is_found() => {
                    return match data.list(desc, index) {
                        Some(list) => walk_list(entry, list, name, as_whole, f),
                        None => true,
                    };
                }
                _ => {}
            }
        }
        true
    })
}

fn walk_array<'a>(
    array: &'a ArrayDescriptor,
    data: &'a Block,
    name: &str,
    as_whole: bool,
    f: Visit<'_, 'a>,
) -> bool {
    if let Some(dim) = array.find_dimension(name) {
        if as_whole {
            return f(Occurrence::Array {
                array,
                data,
                target: Target::Dimension(dim),
            });
        }
        let mut lengths = array.lengths();
        lengths[dim] = 1;
        return for_each_coordinate(&lengths, |coords| {
            f(Occurrence::Dimension {
                array,
                data,
                dim,
                base: array.packet_offset(coords),
            })
        });
    }

    let packet = array.packet();
    if as_whole {
        if let Some(index) = packet.find_element(name) {
            return f(Occurrence::Array {
                array,
                data,
                target: Target::Element(index),
            });
        }
    }
    for_each_coordinate(&array.lengths(), |coords| {
        let cell = data.packet(array.packet_offset(coords));
        walk_packet(packet, cell, name, as_whole, f)
    })
}

fn walk_list<'a>(
    entry: &'a PacketDescriptor,
    list: &'a ListHeader,
    name: &str,
    as_whole: bool,
    f: Visit<'_, 'a>,
) -> bool {
    if as_whole {
        if let Some(index) = entry.find_element(name) {
            return f(Occurrence::List {
                packet: entry,
                list,
                index,
            });
        }
    }
    list.iter()
        .all(|packet| walk_packet(entry, packet, name, as_whole, f))
}
