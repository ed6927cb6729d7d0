//! Name resolution over descriptor trees.
//!
//! A name may refer to an atomic element or to a dimension anywhere below
//! a packet: resolution descends through nested arrays (dimensions, then
//! the element packet) and nested lists. Matches at different depths do
//! not shadow one another; two matches anywhere make the name
//! [`NameLookup::Multiple`].

use karma_stack::ensure_sufficient_stack;

use crate::{ArrayDescriptor, Element, PacketDescriptor};

/// Outcome of resolving a name.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NameLookup<'a> {
    NotFound,
    /// Atomic element `index` of `packet`.
    Element {
        packet: &'a PacketDescriptor,
        index: usize,
    },
    /// Dimension `index` of `array`.
    Dimension {
        array: &'a ArrayDescriptor,
        index: usize,
    },
    /// More than one element or dimension carries the name.
    Multiple,
}

impl NameLookup<'_> {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Element { .. } | Self::Dimension { .. })
    }
}

/// Accumulates matches, stopping once a second one is seen.
struct Search<'a, 'n> {
    name: &'n str,
    found: NameLookup<'a>,
}

impl<'a> Search<'a, '_> {
    fn record(&mut self, hit: NameLookup<'a>) {
        self.found = match self.found {
            NameLookup::NotFound => hit,
            _ => NameLookup::Multiple,
        };
    }

    fn ambiguous(&self) -> bool {
        matches!(self.found, NameLookup::Multiple)
    }

    fn packet(&mut self, packet: &'a PacketDescriptor) {
        ensure_sufficient_stack(|| {
            for (index, element) in packet.elements().iter().enumerate() {
                if self.ambiguous() {
                    return;
                }
                match element {
                    Element::Atomic { name, .. } if name == self.name => {
                        self.record(NameLookup::Element { packet, index });
                    }
                    Element::Array(array) => self.array(array),
                    Element::List(list) => self.packet(list),
                    Element::Atomic { .. } | Element::None => {}
                }
            }
        });
    }

    fn array(&mut self, array: &'a ArrayDescriptor) {
        for (index, dim) in array.dimensions().iter().enumerate() {
            if dim.name() == self.name {
                self.record(NameLookup::Dimension { array, index });
            }
        }
        if !self.ambiguous() {
            self.packet(array.packet());
        }
    }
}

impl PacketDescriptor {
    /// Resolve `name` anywhere in this packet's tree.
    pub fn find_name(&self, name: &str) -> NameLookup<'_> {
        let mut search = Search {
            name,
            found: NameLookup::NotFound,
        };
        search.packet(self);
        search.found
    }
}

impl ArrayDescriptor {
    /// Resolve `name` among this array's dimensions and element packet.
    pub fn find_name(&self, name: &str) -> NameLookup<'_> {
        let mut search = Search {
            name,
            found: NameLookup::NotFound,
        };
        search.array(self);
        search.found
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
