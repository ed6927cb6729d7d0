//! Packet descriptors.
//!
//! A packet descriptor is an ordered list of elements. Field order defines
//! layout order: numeric fields are packed, in order and without padding,
//! into the packet's inline byte image, while strings, nested arrays and
//! nested lists each take one entry of the packet's slot table.
//!
//! The descriptor owns its whole subtree (nested array descriptors and list
//! element packets) exclusively; there is no sharing and no cycle.

use rustc_hash::FxHashMap;

use karma_types::ElementType;

use crate::{ArrayDescriptor, DsError, Result};

/// One field of a packet.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    /// Named numeric or string value.
    Atomic { ty: ElementType, name: String },
    /// Nested fixed-shape array.
    Array(Box<ArrayDescriptor>),
    /// Nested list; the descriptor is the list's element packet.
    List(Box<PacketDescriptor>),
    /// Truncation point of a partial copy. Has no name and no storage.
    None,
}

impl Element {
    /// Named atomic element. Fails for nested tags and [`ElementType::None`].
    pub fn atomic(ty: ElementType, name: impl Into<String>) -> Result<Self> {
        if !ty.is_atomic() {
            return Err(DsError::NotAtomic(ty));
        }
        Ok(Self::Atomic {
            ty,
            name: name.into(),
        })
    }

    /// Type tag of this element.
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Atomic { ty, .. } => *ty,
            Self::Array(_) => ElementType::Array,
            Self::List(_) => ElementType::List,
            Self::None => ElementType::None,
        }
    }

    /// Name of an atomic element.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Atomic { name, .. } => Some(name),
            _ => None,
        }
    }

    #[inline]
    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Array(_) | Self::List(_))
    }
}

/// Where a field's data lives inside one packet.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FieldLocation {
    /// Byte range of the inline image.
    Inline { offset: usize, size: usize },
    /// Index into the packet's slot table.
    Slot(usize),
    /// Truncated field, no storage.
    Absent,
}

/// Ordered, typed, named fields of a packet.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<Element>", into = "Vec<Element>")
)]
pub struct PacketDescriptor {
    elements: Vec<Element>,
    /// Derived from `elements`, one entry per element.
    layout: Vec<FieldLocation>,
    packet_size: usize,
    slot_count: usize,
}

impl PacketDescriptor {
    /// Descriptor with the given fields. An empty field list is rejected;
    /// use [`scratch`](Self::scratch) for a transient empty header.
    pub fn new(elements: Vec<Element>) -> Result<Self> {
        if elements.is_empty() {
            return Err(DsError::EmptyPacket);
        }
        Ok(Self::from_elements(elements))
    }

    /// Empty descriptor to be filled with [`push`](Self::push).
    pub fn scratch() -> Self {
        Self::default()
    }

    pub fn builder() -> PacketBuilder {
        PacketBuilder::default()
    }

    pub(crate) fn from_elements(elements: Vec<Element>) -> Self {
        let mut packet = Self {
            elements,
            layout: Vec::new(),
            packet_size: 0,
            slot_count: 0,
        };
        packet.relayout();
        packet
    }

    fn relayout(&mut self) {
        self.layout.clear();
        self.packet_size = 0;
        self.slot_count = 0;
        for element in &self.elements {
            let location = match element.element_type() {
                ElementType::None => FieldLocation::Absent,
                ty if ty.is_numeric() => {
                    let offset = self.packet_size;
                    self.packet_size += ty.size();
                    FieldLocation::Inline {
                        offset,
                        size: ty.size(),
                    }
                }
                _ => {
                    self.slot_count += 1;
                    FieldLocation::Slot(self.slot_count - 1)
                }
            };
            self.layout.push(location);
        }
    }

    /// Append a field.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
        self.relayout();
    }

    /// Replace field `index`, returning the old one.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn replace(&mut self, index: usize, element: Element) -> Element {
        let old = std::mem::replace(&mut self.elements[index], element);
        self.relayout();
        old
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// # Panics
    ///
    /// If `index` is out of range.
    #[inline]
    pub fn element(&self, index: usize) -> &Element {
        &self.elements[index]
    }

    /// Mutable access to a nested array descriptor, for adjusting
    /// dimensions in place.
    pub fn array_mut(&mut self, index: usize) -> Option<&mut ArrayDescriptor> {
        match &mut self.elements[index] {
            Element::Array(array) => Some(array),
            _ => None,
        }
    }

    #[inline]
    pub fn element_type(&self, index: usize) -> ElementType {
        self.elements[index].element_type()
    }

    /// Index of the atomic field called `name`, in this packet only.
    pub fn find_element(&self, name: &str) -> Option<usize> {
        self.elements
            .iter()
            .position(|element| element.name() == Some(name))
    }

    /// Bytes of inline (numeric) data in one packet.
    #[inline]
    pub fn packet_size(&self) -> usize {
        self.packet_size
    }

    /// Slot-table entries (strings, nested arrays, nested lists) per packet.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Storage location of field `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    #[inline]
    pub fn location(&self, index: usize) -> FieldLocation {
        self.layout[index]
    }

    /// Byte offset of numeric field `index` within the inline image.
    pub fn element_offset(&self, index: usize) -> Option<usize> {
        match self.layout[index] {
            FieldLocation::Inline { offset, .. } => Some(offset),
            _ => None,
        }
    }

    /// No nested arrays or lists anywhere below this packet.
    pub fn all_atomic(&self) -> bool {
        !self.elements.iter().any(Element::is_nested)
    }

    /// Names that occur more than once across the whole tree (atomic
    /// elements and dimensions), in first-seen order. Every name listed here
    /// resolves to [`NameLookup::Multiple`](crate::NameLookup::Multiple).
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        let mut order = Vec::new();
        collect_names(self, &mut |name| {
            let count = counts.entry(name).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(name.to_owned());
            }
        });
        order
    }
}

fn collect_names<'a>(packet: &'a PacketDescriptor, sink: &mut dyn FnMut(&'a str)) {
    karma_stack::ensure_sufficient_stack(|| {
        for element in packet.elements() {
            match element {
                Element::Atomic { name, .. } => sink(name),
                Element::Array(array) => {
                    for dim in array.dimensions() {
                        sink(dim.name());
                    }
                    collect_names(array.packet(), sink);
                }
                Element::List(list) => collect_names(list, sink),
                Element::None => {}
            }
        }
    });
}

impl From<Vec<Element>> for PacketDescriptor {
    fn from(elements: Vec<Element>) -> Self {
        Self::from_elements(elements)
    }
}

impl From<PacketDescriptor> for Vec<Element> {
    fn from(packet: PacketDescriptor) -> Self {
        packet.elements
    }
}

/// Incremental construction of a [`PacketDescriptor`].
///
/// The first invalid field is remembered and reported by
/// [`build`](Self::build).
#[derive(Default)]
pub struct PacketBuilder {
    elements: Vec<Element>,
    error: Option<DsError>,
}

impl PacketBuilder {
    #[must_use]
    pub fn atomic(mut self, ty: ElementType, name: impl Into<String>) -> Self {
        match Element::atomic(ty, name) {
            Ok(element) => self.elements.push(element),
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }

    #[must_use]
    pub fn array(mut self, array: ArrayDescriptor) -> Self {
        self.elements.push(Element::Array(Box::new(array)));
        self
    }

    #[must_use]
    pub fn list(mut self, packet: PacketDescriptor) -> Self {
        self.elements.push(Element::List(Box::new(packet)));
        self
    }

    pub fn build(self) -> Result<PacketDescriptor> {
        match self.error {
            Some(err) => Err(err),
            None => PacketDescriptor::new(self.elements),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
