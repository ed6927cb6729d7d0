//! Top-level multi-structure container and its shared handle.
//!
//! A [`MultiArray`] owns one or more top-level structures, each a packet
//! descriptor with one packet of data, plus a history log. It is plain
//! owned data. Sharing goes through [`SharedMultiArray`]: every handle is
//! one attachment, and when the last handle is dropped the container is
//! destroyed, or handed to the destroy hook if one was registered.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxHashSet;

use crate::data::{Block, PacketMut, PacketRef};
use crate::{DsError, PacketDescriptor, Result};

/// One named top-level structure.
#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    name: Option<String>,
    descriptor: PacketDescriptor,
    data: Block,
}

impl Structure {
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn descriptor(&self) -> &PacketDescriptor {
        &self.descriptor
    }

    /// Storage of the structure's single packet.
    #[inline]
    pub fn data(&self) -> &Block {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut Block {
        &mut self.data
    }

    pub fn packet(&self) -> PacketRef<'_> {
        self.data.packet(0)
    }

    /// Descriptor and mutable packet together, as the copy and traversal
    /// routines take them.
    pub fn parts_mut(&mut self) -> (&PacketDescriptor, PacketMut<'_>) {
        (&self.descriptor, self.data.packet_mut(0))
    }
}

/// Named top-level structures plus a history log.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiArray {
    structures: Vec<Structure>,
    history: Vec<String>,
}

impl MultiArray {
    /// Allocate zeroed data for each `(name, descriptor)` pair.
    ///
    /// A lone structure may be unnamed; with several, every one needs a
    /// distinct name.
    pub fn alloc(structures: Vec<(Option<String>, PacketDescriptor)>) -> Result<Self> {
        if structures.is_empty() {
            return Err(DsError::EmptyMultiArray);
        }
        if structures.len() > 1 {
            let mut names = FxHashSet::default();
            for (index, (name, _)) in structures.iter().enumerate() {
                let Some(name) = name else {
                    return Err(DsError::UnnamedStructure(index));
                };
                if !names.insert(name.as_str()) {
                    return Err(DsError::DuplicateStructure(name.clone()));
                }
            }
        }
        let structures = structures
            .into_iter()
            .map(|(name, descriptor)| Structure {
                data: Block::alloc(&descriptor, 1),
                name,
                descriptor,
            })
            .collect();
        Ok(Self {
            structures,
            history: Vec::new(),
        })
    }

    /// One unnamed structure.
    pub fn single(descriptor: PacketDescriptor) -> Self {
        Self {
            structures: vec![Structure {
                data: Block::alloc(&descriptor, 1),
                name: None,
                descriptor,
            }],
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    #[inline]
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn structure(&self, index: usize) -> Option<&Structure> {
        self.structures.get(index)
    }

    pub fn structure_mut(&mut self, index: usize) -> Option<&mut Structure> {
        self.structures.get_mut(index)
    }

    pub fn find_structure(&self, name: &str) -> Option<usize> {
        self.structures
            .iter()
            .position(|s| s.name() == Some(name))
    }

    #[inline]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn append_history(&mut self, line: impl Into<String>) {
        self.history.push(line.into());
    }

    /// Append every history line of `source`, in order.
    pub fn copy_history(&mut self, source: &MultiArray) {
        self.history.extend_from_slice(&source.history);
    }
}

/// Receives the container when its last attachment goes away.
pub type DestroyHook = Box<dyn FnOnce(MultiArray) + Send>;

struct Attached {
    array: Mutex<MultiArray>,
    hook: Mutex<Option<DestroyHook>>,
}

impl Drop for Attached {
    fn drop(&mut self) {
        let array = std::mem::take(self.array.get_mut());
        match self.hook.get_mut().take() {
            Some(hook) => {
                tracing::debug!(structures = array.len(), "last detach, running destroy hook");
                hook(array);
            }
            None => tracing::debug!(structures = array.len(), "last detach, destroying"),
        }
    }
}

/// Counted handle on a [`MultiArray`].
///
/// Cloning attaches, dropping detaches. The container lives until the
/// attachment count returns to zero.
pub struct SharedMultiArray {
    inner: Arc<Attached>,
}

impl SharedMultiArray {
    /// First attachment of `array`.
    pub fn new(array: MultiArray) -> Self {
        Self {
            inner: Arc::new(Attached {
                array: Mutex::new(array),
                hook: Mutex::new(None),
            }),
        }
    }

    /// Number of live handles.
    pub fn attachments(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Install the hook that receives the container instead of it being
    /// dropped.
    ///
    /// # Panics
    ///
    /// If a hook is already registered.
    pub fn register_destroy_hook(&self, hook: impl FnOnce(MultiArray) + Send + 'static) {
        let mut slot = self.inner.hook.lock();
        assert!(slot.is_none(), "destroy hook already registered");
        *slot = Some(Box::new(hook));
    }

    /// Exclusive access to the container.
    pub fn lock(&self) -> MutexGuard<'_, MultiArray> {
        self.inner.array.lock()
    }

    /// Give up this attachment.
    pub fn detach(self) {
        drop(self);
    }
}

impl Clone for SharedMultiArray {
    fn clone(&self) -> Self {
        let inner = Arc::clone(&self.inner);
        tracing::trace!(attachments = Arc::strong_count(&inner), "attached");
        Self { inner }
    }
}

impl fmt::Debug for SharedMultiArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMultiArray")
            .field("attachments", &self.attachments())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
