//! Linked-list storage.
//!
//! A list is a contiguous block of densely packed packets followed by a
//! doubly-linked chain of fragment entries, each owning one packet. The
//! logical order is the contiguous block first, then the chain from its
//! first entry to its last. Fragment entries live in an arena and are
//! addressed by [`EntryId`]. An id carries the generation of the entry it
//! was issued for, so once that entry is deleted or moved into the
//! contiguous block the id resolves to nothing, even after its arena slot
//! is reused.

use std::fmt;

use super::{Block, PacketMut, PacketRef};
use crate::PacketDescriptor;

/// Ordering of list entries by one of their fields.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum SortOrder {
    #[default]
    Unordered,
    Increasing,
    Decreasing,
}

/// Handle of one fragment entry.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct EntryId {
    slot: u32,
    generation: u32,
}

impl EntryId {
    #[inline]
    fn index(self) -> usize {
        self.slot as usize
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({}v{})", self.slot, self.generation)
    }
}

#[derive(Clone, Debug)]
struct ListEntry {
    generation: u32,
    data: Block,
    prev: Option<EntryId>,
    next: Option<EntryId>,
}

/// Header and storage of one list.
#[derive(Clone, Debug, Default)]
pub struct ListHeader {
    length: usize,
    sort_order: SortOrder,
    /// Index of the packet field the list is sorted by.
    sort_element: usize,
    contiguous: Block,
    entries: Vec<Option<ListEntry>>,
    /// Vacant arena slots.
    free: Vec<u32>,
    /// Generation given to the next stored entry. Never reset.
    generation: u32,
    first_frag: Option<EntryId>,
    last_frag: Option<EntryId>,
}

impl ListHeader {
    /// Empty, unordered list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Entries held in the contiguous block.
    #[inline]
    pub fn contiguous_len(&self) -> usize {
        self.contiguous.len()
    }

    /// Entries held in the fragment chain.
    #[inline]
    pub fn fragment_len(&self) -> usize {
        self.length - self.contiguous.len()
    }

    #[inline]
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    #[inline]
    pub fn sort_element(&self) -> usize {
        self.sort_element
    }

    pub fn set_sort(&mut self, order: SortOrder, element: usize) {
        self.sort_order = order;
        self.sort_element = element;
    }

    #[inline]
    pub fn contiguous(&self) -> &Block {
        &self.contiguous
    }

    #[inline]
    pub fn contiguous_mut(&mut self) -> &mut Block {
        &mut self.contiguous
    }

    /// Discard every entry and allocate `length` zeroed packets as one
    /// contiguous block. Sort settings are kept. Every [`EntryId`] issued so
    /// far goes stale.
    pub fn alloc_contiguous(&mut self, desc: &PacketDescriptor, length: usize) {
        self.contiguous = Block::alloc(desc, length);
        self.entries.clear();
        self.free.clear();
        self.first_frag = None;
        self.last_frag = None;
        self.length = length;
    }

    fn store(&mut self, data: Block, prev: Option<EntryId>, next: Option<EntryId>) -> EntryId {
        let generation = self.generation;
        self.generation = self.generation.wrapping_add(1);
        let entry = Some(ListEntry {
            generation,
            data,
            prev,
            next,
        });
        let slot = match self.free.pop() {
            Some(slot) => {
                self.entries[slot as usize] = entry;
                slot
            }
            None => {
                self.entries.push(entry);
                (self.entries.len() - 1) as u32
            }
        };
        EntryId { slot, generation }
    }

    fn live(&self, id: EntryId) -> Option<&ListEntry> {
        self.entries
            .get(id.index())?
            .as_ref()
            .filter(|entry| entry.generation == id.generation)
    }

    fn live_mut(&mut self, id: EntryId) -> Option<&mut ListEntry> {
        self.entries
            .get_mut(id.index())?
            .as_mut()
            .filter(|entry| entry.generation == id.generation)
    }

    fn link(&self, id: EntryId) -> &ListEntry {
        match self.live(id) {
            Some(entry) => entry,
            None => panic!("stale list entry {id:?}"),
        }
    }

    fn link_mut(&mut self, id: EntryId) -> &mut ListEntry {
        match self.live_mut(id) {
            Some(entry) => entry,
            None => panic!("stale list entry {id:?}"),
        }
    }

    /// Allocate a zeroed entry at the end of the fragment chain.
    pub fn append(&mut self, desc: &PacketDescriptor) -> EntryId {
        let after = self.last_frag;
        self.insert_after(desc, after)
    }

    /// Allocate a zeroed entry after `after`, or at the head of the
    /// fragment chain when `after` is `None`.
    ///
    /// # Panics
    ///
    /// If `after` is not a live entry of this list.
    pub fn insert_after(&mut self, desc: &PacketDescriptor, after: Option<EntryId>) -> EntryId {
        let next = match after {
            Some(prev) => self.link(prev).next,
            None => self.first_frag,
        };
        let id = self.store(Block::alloc(desc, 1), after, next);
        match after {
            Some(prev) => self.link_mut(prev).next = Some(id),
            None => self.first_frag = Some(id),
        }
        match next {
            Some(next) => self.link_mut(next).prev = Some(id),
            None => self.last_frag = Some(id),
        }
        self.length += 1;
        id
    }

    /// Unlink and free a fragment entry. Returns `false` if `id` is not
    /// live.
    pub fn delete(&mut self, id: EntryId) -> bool {
        if self.live(id).is_none() {
            return false;
        }
        let Some(entry) = self.entries[id.index()].take() else {
            return false;
        };
        match entry.prev {
            Some(prev) => self.link_mut(prev).next = entry.next,
            None => self.first_frag = entry.next,
        }
        match entry.next {
            Some(next) => self.link_mut(next).prev = entry.prev,
            None => self.last_frag = entry.prev,
        }
        self.free.push(id.slot);
        self.length -= 1;
        true
    }

    /// The packet of a live entry. `None` for stale ids.
    pub fn entry(&self, id: EntryId) -> Option<PacketRef<'_>> {
        self.live(id).map(|entry| entry.data.packet(0))
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<PacketMut<'_>> {
        self.live_mut(id).map(|entry| entry.data.packet_mut(0))
    }

    #[inline]
    pub fn first_fragment(&self) -> Option<EntryId> {
        self.first_frag
    }

    #[inline]
    pub fn last_fragment(&self) -> Option<EntryId> {
        self.last_frag
    }

    /// Fragment entries from first to last.
    pub fn fragment_ids(&self) -> FragmentIds<'_> {
        FragmentIds {
            list: self,
            cursor: self.first_frag,
            forward: true,
        }
    }

    /// Fragment entries from last to first.
    pub fn fragment_ids_rev(&self) -> FragmentIds<'_> {
        FragmentIds {
            list: self,
            cursor: self.last_frag,
            forward: false,
        }
    }

    /// Every packet in logical order.
    pub fn iter(&self) -> impl Iterator<Item = PacketRef<'_>> + '_ {
        self.contiguous
            .iter()
            .chain(self.fragment_ids().map(|id| self.link(id).data.packet(0)))
    }

    /// Visit every packet mutably in logical order, stopping early when
    /// `f` returns `false`.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(PacketMut<'_>) -> bool) -> bool {
        for index in 0..self.contiguous.len() {
            if !f(self.contiguous.packet_mut(index)) {
                return false;
            }
        }
        let mut cursor = self.first_frag;
        while let Some(id) = cursor {
            let entry = self.link_mut(id);
            cursor = entry.next;
            if !f(entry.data.packet_mut(0)) {
                return false;
            }
        }
        true
    }

    /// Move the fragment chain onto the end of the contiguous block,
    /// preserving logical order. Every [`EntryId`] issued so far goes stale.
    pub fn unfragment(&mut self) {
        let mut cursor = self.first_frag.take();
        self.last_frag = None;
        while let Some(id) = cursor {
            let Some(entry) = self.entries[id.index()].take() else {
                break;
            };
            cursor = entry.next;
            self.contiguous.append(entry.data);
        }
        self.entries.clear();
        self.free.clear();
        tracing::trace!(length = self.length, "list unfragmented");
    }
}

/// Lists are equal when they hold equal packets in the same logical order
/// and share sort settings, however their storage is split.
impl PartialEq for ListHeader {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self.sort_order == other.sort_order
            && self.sort_element == other.sort_element
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.bytes() == b.bytes() && a.slots() == b.slots())
    }
}

/// Walks the fragment chain in one direction.
pub struct FragmentIds<'a> {
    list: &'a ListHeader,
    cursor: Option<EntryId>,
    forward: bool,
}

impl Iterator for FragmentIds<'_> {
    type Item = EntryId;

    fn next(&mut self) -> Option<EntryId> {
        let id = self.cursor?;
        let entry = self.list.link(id);
        self.cursor = if self.forward { entry.next } else { entry.prev };
        Some(id)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
