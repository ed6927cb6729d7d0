//! Packet storage.
//!
//! A [`Block`] holds `count` packets laid out by one packet descriptor:
//! an inline byte image of `count * packet_size` bytes for the numeric
//! fields, plus a parallel slot table of `count * slot_count` entries for
//! strings, nested arrays and nested lists. Packet `i` owns bytes
//! `i * packet_size ..` and slots `i * slot_count ..`.

use karma_stack::ensure_sufficient_stack;
use karma_types::{read_value, write_value, ElementType};

use super::ListHeader;
use crate::{Element, FieldLocation, PacketDescriptor};

/// Fixed-length string: a declared maximum byte length and its contents.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FixedString {
    max_length: usize,
    value: String,
}

impl FixedString {
    /// Contents longer than `max_length` bytes are cut at the last char
    /// boundary that fits.
    pub fn new(max_length: usize, value: &str) -> Self {
        let mut end = value.len().min(max_length);
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        Self {
            max_length,
            value: value[..end].to_owned(),
        }
    }

    #[inline]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Storage for one indirect field of one packet.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Slot {
    /// Placeholder while packets are being moved.
    #[default]
    Empty,
    VString(Option<String>),
    FString(FixedString),
    /// Data of a nested array, `array_size` packets.
    Array(Option<Box<Block>>),
    List(Option<Box<ListHeader>>),
}

impl Slot {
    /// Freshly allocated storage for `element`; `None` when the element
    /// lives inline or has no storage.
    fn for_element(element: &Element) -> Option<Self> {
        match element {
            Element::Atomic { ty, .. } => match ty {
                ElementType::VString => Some(Self::VString(None)),
                ElementType::FString => Some(Self::FString(FixedString::default())),
                _ => None,
            },
            Element::Array(array) => Some(Self::Array(Some(Box::new(Block::alloc(
                array.packet(),
                array.array_size(),
            ))))),
            Element::List(_) => Some(Self::List(Some(Box::default()))),
            Element::None => None,
        }
    }
}

/// A run of packets sharing one layout.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Block {
    count: usize,
    packet_size: usize,
    slot_count: usize,
    pub(crate) bytes: Vec<u8>,
    pub(crate) slots: Vec<Slot>,
}

impl Block {
    /// Zeroed storage for `count` packets of `desc`. Nested arrays are
    /// allocated recursively at their full size; nested lists start empty.
    pub fn alloc(desc: &PacketDescriptor, count: usize) -> Self {
        ensure_sufficient_stack(|| {
            let mut slots = Vec::with_capacity(count * desc.slot_count());
            for _ in 0..count {
                slots.extend(desc.elements().iter().filter_map(Slot::for_element));
            }
            Self {
                count,
                packet_size: desc.packet_size(),
                slot_count: desc.slot_count(),
                bytes: vec![0; count * desc.packet_size()],
                slots,
            }
        })
    }

    /// Number of packets.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn packet_size(&self) -> usize {
        self.packet_size
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Inline image of every packet.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// # Panics
    ///
    /// If `index >= self.len()`.
    pub fn packet(&self, index: usize) -> PacketRef<'_> {
        assert!(index < self.count, "packet {index} out of range");
        PacketRef {
            bytes: &self.bytes[index * self.packet_size..(index + 1) * self.packet_size],
            slots: &self.slots[index * self.slot_count..(index + 1) * self.slot_count],
        }
    }

    /// # Panics
    ///
    /// If `index >= self.len()`.
    pub fn packet_mut(&mut self, index: usize) -> PacketMut<'_> {
        assert!(index < self.count, "packet {index} out of range");
        PacketMut {
            bytes: &mut self.bytes[index * self.packet_size..(index + 1) * self.packet_size],
            slots: &mut self.slots[index * self.slot_count..(index + 1) * self.slot_count],
        }
    }

    /// Packets in storage order.
    pub fn iter(&self) -> impl Iterator<Item = PacketRef<'_>> + '_ {
        (0..self.count).map(|i| self.packet(i))
    }

    /// Move every packet of `other` onto the end of this block.
    ///
    /// # Panics
    ///
    /// If both blocks hold packets of different layouts.
    pub fn append(&mut self, other: Block) {
        if self.count == 0 {
            *self = other;
            return;
        }
        if other.count == 0 {
            return;
        }
        assert!(
            self.packet_size == other.packet_size && self.slot_count == other.slot_count,
            "appending a block of a different layout"
        );
        self.bytes.extend_from_slice(&other.bytes);
        self.slots.extend(other.slots);
        self.count += other.count;
    }
}

/// Read-only view of one packet.
#[derive(Copy, Clone, Debug)]
pub struct PacketRef<'a> {
    bytes: &'a [u8],
    slots: &'a [Slot],
}

impl<'a> PacketRef<'a> {
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub fn slots(&self) -> &'a [Slot] {
        self.slots
    }

    /// Inline bytes of numeric field `index`.
    pub fn field_bytes(&self, desc: &PacketDescriptor, index: usize) -> Option<&'a [u8]> {
        match desc.location(index) {
            FieldLocation::Inline { offset, size } => Some(&self.bytes[offset..offset + size]),
            _ => None,
        }
    }

    /// Slot of indirect field `index`.
    pub fn slot(&self, desc: &PacketDescriptor, index: usize) -> Option<&'a Slot> {
        match desc.location(index) {
            FieldLocation::Slot(slot) => Some(&self.slots[slot]),
            _ => None,
        }
    }

    /// Numeric field `index` as `[real, imaginary]`.
    pub fn value(&self, desc: &PacketDescriptor, index: usize) -> Option<[f64; 2]> {
        read_value(desc.element_type(index), self.field_bytes(desc, index)?)
    }

    /// Contents of string field `index`.
    pub fn string(&self, desc: &PacketDescriptor, index: usize) -> Option<&'a str> {
        match self.slot(desc, index)? {
            Slot::VString(value) => value.as_deref(),
            Slot::FString(fixed) => Some(fixed.as_str()),
            _ => None,
        }
    }

    /// Data of nested array field `index`.
    pub fn array(&self, desc: &PacketDescriptor, index: usize) -> Option<&'a Block> {
        match self.slot(desc, index)? {
            Slot::Array(block) => block.as_deref(),
            _ => None,
        }
    }

    /// Header of nested list field `index`.
    pub fn list(&self, desc: &PacketDescriptor, index: usize) -> Option<&'a ListHeader> {
        match self.slot(desc, index)? {
            Slot::List(list) => list.as_deref(),
            _ => None,
        }
    }
}

/// Mutable view of one packet.
#[derive(Debug)]
pub struct PacketMut<'a> {
    bytes: &'a mut [u8],
    slots: &'a mut [Slot],
}

impl PacketMut<'_> {
    /// Read-only view of the same packet.
    #[inline]
    pub fn view(&self) -> PacketRef<'_> {
        PacketRef {
            bytes: &*self.bytes,
            slots: &*self.slots,
        }
    }

    /// Shorter-lived mutable view, for handing the packet to a callee
    /// while keeping it.
    #[inline]
    pub fn reborrow(&mut self) -> PacketMut<'_> {
        PacketMut {
            bytes: &mut *self.bytes,
            slots: &mut *self.slots,
        }
    }

    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }

    #[inline]
    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut *self.slots
    }

    pub fn field_bytes_mut(&mut self, desc: &PacketDescriptor, index: usize) -> Option<&mut [u8]> {
        match desc.location(index) {
            FieldLocation::Inline { offset, size } => Some(&mut self.bytes[offset..offset + size]),
            _ => None,
        }
    }

    pub fn slot_mut(&mut self, desc: &PacketDescriptor, index: usize) -> Option<&mut Slot> {
        match desc.location(index) {
            FieldLocation::Slot(slot) => Some(&mut self.slots[slot]),
            _ => None,
        }
    }

    /// Store `value` into numeric field `index`. Returns `false` if the
    /// field is not numeric.
    pub fn put_value(&mut self, desc: &PacketDescriptor, index: usize, value: [f64; 2]) -> bool {
        let ty = desc.element_type(index);
        match self.field_bytes_mut(desc, index) {
            Some(bytes) => write_value(ty, bytes, value),
            None => false,
        }
    }

    /// Store `value` into string field `index`. Fixed-length strings keep
    /// their declared maximum and truncate. Returns `false` if the field
    /// is not a string.
    pub fn set_string(&mut self, desc: &PacketDescriptor, index: usize, value: &str) -> bool {
        match self.slot_mut(desc, index) {
            Some(Slot::VString(slot)) => *slot = Some(value.to_owned()),
            Some(Slot::FString(fixed)) => *fixed = FixedString::new(fixed.max_length(), value),
            _ => return false,
        }
        true
    }

    /// Replace fixed-length string field `index` wholesale.
    pub fn set_fixed_string(
        &mut self,
        desc: &PacketDescriptor,
        index: usize,
        value: FixedString,
    ) -> bool {
        match self.slot_mut(desc, index) {
            Some(Slot::FString(fixed)) => *fixed = value,
            _ => return false,
        }
        true
    }

    pub fn array_mut(&mut self, desc: &PacketDescriptor, index: usize) -> Option<&mut Block> {
        match self.slot_mut(desc, index)? {
            Slot::Array(block) => block.as_deref_mut(),
            _ => None,
        }
    }

    pub fn list_mut(&mut self, desc: &PacketDescriptor, index: usize) -> Option<&mut ListHeader> {
        match self.slot_mut(desc, index)? {
            Slot::List(list) => list.as_deref_mut(),
            _ => None,
        }
    }
}
