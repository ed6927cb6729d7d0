//! Copy-until-divergence for descriptors.

use karma_stack::ensure_sufficient_stack;

use crate::{ArrayDescriptor, Element, NameLookup, PacketDescriptor};

impl PacketDescriptor {
    /// Deep copy, truncated at `stop`.
    ///
    /// The atomic element named `stop` is replaced by [`Element::None`];
    /// fields before and after it are copied in full, and nested arrays and
    /// lists are copied with the same truncation applied. `None` copies the
    /// whole tree.
    ///
    /// Returns `None` when `stop` is ambiguous anywhere in the tree, or
    /// names a dimension of a nested array (the array copy fails, and with
    /// it this one).
    pub fn copy_until(&self, stop: Option<&str>) -> Option<PacketDescriptor> {
        if let Some(name) = stop {
            if matches!(self.find_name(name), NameLookup::Multiple) {
                tracing::debug!(name, "descriptor copy stops at an ambiguous name");
                return None;
            }
        }
        self.copy_fields_until(stop)
    }

    fn copy_fields_until(&self, stop: Option<&str>) -> Option<PacketDescriptor> {
        ensure_sufficient_stack(|| {
            let mut elements = Vec::with_capacity(self.len());
            for element in self.elements() {
                elements.push(match element {
                    Element::Atomic { name, .. } if Some(name.as_str()) == stop => Element::None,
                    Element::Atomic { .. } | Element::None => element.clone(),
                    Element::Array(array) => {
                        Element::Array(Box::new(array.copy_array_until(stop)?))
                    }
                    Element::List(list) => Element::List(Box::new(list.copy_fields_until(stop)?)),
                });
            }
            Some(PacketDescriptor::from_elements(elements))
        })
    }
}

impl ArrayDescriptor {
    /// Deep copy, truncated at `stop` inside the element packet.
    ///
    /// Fails (returns `None`) if `stop` names one of this array's
    /// dimensions or is ambiguous. Tile tables and computed offset tables
    /// are carried over verbatim.
    pub fn copy_until(&self, stop: Option<&str>) -> Option<ArrayDescriptor> {
        if let Some(name) = stop {
            if matches!(self.find_name(name), NameLookup::Multiple) {
                tracing::debug!(name, "array copy stops at an ambiguous name");
                return None;
            }
        }
        self.copy_array_until(stop)
    }

    fn copy_array_until(&self, stop: Option<&str>) -> Option<ArrayDescriptor> {
        if let Some(name) = stop {
            if self.find_dimension(name).is_some() {
                tracing::debug!(name, "array copy stops at a dimension");
                return None;
            }
        }
        let packet = self.packet().copy_fields_until(stop)?;
        Some(ArrayDescriptor::from_parts(
            self.dimensions().to_vec(),
            self.tile_table().to_vec(),
            packet,
            self.cached_offsets().clone(),
        ))
    }
}
