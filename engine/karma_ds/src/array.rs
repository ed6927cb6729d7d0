//! Array descriptors and tiled addressing.
//!
//! An array is a fixed-shape N-dimensional grid of packets. Dimension 0 is
//! the outermost (most significant). Untiled arrays are stored row-major.
//!
//! # Tiling
//!
//! With `L > 0` tiling levels every dimension is split into nested tiles:
//! level 0 is the innermost tile, level `L - 1` the outermost, and what is
//! left over after dividing out all tile lengths is the dimension's
//! *untiled length*. Storage is row-major over the expanded
//! `(L + 1) * D` dimension list
//!
//! ```text
//! [untiled_0 .. untiled_{D-1}, level_{L-1}_0 .. level_{L-1}_{D-1}, .., level_0_0 .. level_0_{D-1}]
//! ```
//!
//! Because the expansion is separable per dimension, the packet offset of a
//! logical coordinate vector is a sum of one table lookup per dimension.
//! Those tables are computed on first use and cached on the descriptor.

use std::sync::OnceLock;

use crate::coords::for_each_coordinate;
use crate::{DimensionDescriptor, DsError, PacketDescriptor, Result};

/// Shape, tiling and element packet of an array.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayDescriptor {
    dimensions: Vec<DimensionDescriptor>,
    /// `tile_lengths[dim][level]`; empty when untiled.
    tile_lengths: Vec<Vec<usize>>,
    packet: PacketDescriptor,
    /// Per-dimension packet offset tables, built lazily.
    #[cfg_attr(feature = "serde", serde(skip))]
    offsets: OnceLock<Vec<Vec<usize>>>,
}

impl ArrayDescriptor {
    /// Untiled array.
    pub fn new(dimensions: Vec<DimensionDescriptor>, packet: PacketDescriptor) -> Result<Self> {
        Self::tiled(dimensions, Vec::new(), packet)
    }

    /// Tiled array. `tile_lengths` has one row per dimension, every row
    /// holding the same number of levels (innermost first); an empty table
    /// means no tiling.
    pub fn tiled(
        dimensions: Vec<DimensionDescriptor>,
        tile_lengths: Vec<Vec<usize>>,
        packet: PacketDescriptor,
    ) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(DsError::EmptyArray);
        }
        if !tile_lengths.is_empty() {
            let levels = tile_lengths[0].len();
            if levels == 0
                || tile_lengths.len() != dimensions.len()
                || tile_lengths.iter().any(|row| row.len() != levels)
            {
                return Err(DsError::TilingShape {
                    expected: dimensions.len(),
                    levels,
                });
            }
            for (dim, (row, desc)) in tile_lengths.iter().zip(&dimensions).enumerate() {
                let product: usize = row.iter().product();
                if product == 0 || desc.length() % product != 0 {
                    return Err(DsError::TileDoesNotDivide {
                        dim,
                        length: desc.length(),
                        product,
                    });
                }
            }
        }
        Ok(Self {
            dimensions,
            tile_lengths,
            packet,
            offsets: OnceLock::new(),
        })
    }

    /// Build a descriptor from already-validated parts, carrying over an
    /// offset cache if one was computed.
    pub(crate) fn from_parts(
        dimensions: Vec<DimensionDescriptor>,
        tile_lengths: Vec<Vec<usize>>,
        packet: PacketDescriptor,
        offsets: OnceLock<Vec<Vec<usize>>>,
    ) -> Self {
        Self {
            dimensions,
            tile_lengths,
            packet,
            offsets,
        }
    }

    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.dimensions.len()
    }

    #[inline]
    pub fn dimensions(&self) -> &[DimensionDescriptor] {
        &self.dimensions
    }

    #[inline]
    pub fn dimension(&self, index: usize) -> &DimensionDescriptor {
        &self.dimensions[index]
    }

    /// Number of tiling levels (0 when untiled).
    #[inline]
    pub fn num_levels(&self) -> usize {
        self.tile_lengths.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_tiled(&self) -> bool {
        !self.tile_lengths.is_empty()
    }

    /// Tile lengths of `dim`, innermost level first. Empty when untiled.
    pub fn tile_lengths(&self, dim: usize) -> &[usize] {
        self.tile_lengths.get(dim).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn tile_table(&self) -> &[Vec<usize>] {
        &self.tile_lengths
    }

    /// Length of `dim` once every tile level has been divided out.
    pub fn untiled_length(&self, dim: usize) -> usize {
        let product: usize = self.tile_lengths(dim).iter().product();
        self.dimensions[dim].length() / product
    }

    #[inline]
    pub fn packet(&self) -> &PacketDescriptor {
        &self.packet
    }

    #[inline]
    pub fn packet_mut(&mut self) -> &mut PacketDescriptor {
        &mut self.packet
    }

    pub(crate) fn cached_offsets(&self) -> &OnceLock<Vec<Vec<usize>>> {
        &self.offsets
    }

    /// Number of packets in the array.
    pub fn array_size(&self) -> usize {
        self.dimensions.iter().map(DimensionDescriptor::length).product()
    }

    /// Lengths of every dimension, outermost first.
    pub fn lengths(&self) -> Vec<usize> {
        self.dimensions.iter().map(DimensionDescriptor::length).collect()
    }

    /// Index of the dimension called `name`.
    pub fn find_dimension(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|dim| dim.name() == name)
    }

    /// Whether the offset tables have been computed yet.
    pub fn has_offsets(&self) -> bool {
        self.offsets.get().is_some()
    }

    /// Per-dimension tables mapping a coordinate along that dimension to
    /// its packet offset contribution. Computed on first call.
    pub fn offsets(&self) -> &[Vec<usize>] {
        self.offsets.get_or_init(|| self.compute_offsets())
    }

    fn compute_offsets(&self) -> Vec<Vec<usize>> {
        let num_dims = self.dimensions.len();
        let levels = self.num_levels();
        tracing::trace!(num_dims, levels, "computing array offset tables");

        // Expanded extents, group-major: group 0 holds the untiled lengths,
        // group g >= 1 holds tile level L - g.
        let groups = levels + 1;
        let mut extents = Vec::with_capacity(groups * num_dims);
        for group in 0..groups {
            for dim in 0..num_dims {
                extents.push(if group == 0 {
                    self.untiled_length(dim)
                } else {
                    self.tile_lengths[dim][levels - group]
                });
            }
        }
        let mut strides = vec![1usize; extents.len()];
        for i in (0..extents.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * extents[i + 1];
        }

        (0..num_dims)
            .map(|dim| {
                (0..self.dimensions[dim].length())
                    .map(|coord| {
                        let mut rest = coord;
                        let mut offset = 0;
                        for level in 0..levels {
                            let tile = self.tile_lengths[dim][level];
                            let group = levels - level;
                            offset += (rest % tile) * strides[group * num_dims + dim];
                            rest /= tile;
                        }
                        offset + rest * strides[dim]
                    })
                    .collect()
            })
            .collect()
    }

    /// Packet offset of the cell at `coords`.
    ///
    /// # Panics
    ///
    /// If `coords` does not have one in-range entry per dimension.
    pub fn packet_offset(&self, coords: &[usize]) -> usize {
        assert_eq!(
            coords.len(),
            self.dimensions.len(),
            "coordinate rank does not match array"
        );
        self.offsets()
            .iter()
            .zip(coords)
            .map(|(table, &coord)| table[coord])
            .sum()
    }

    /// Byte offset of the cell at `coords` within the array's inline image.
    pub fn byte_offset(&self, coords: &[usize]) -> usize {
        self.packet_offset(coords) * self.packet.packet_size()
    }

    /// Packet offsets of every cell in logical (row-major coordinate)
    /// order. Identical to `0..array_size()` for untiled arrays.
    pub fn logical_offsets(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.array_size());
        let tables = self.offsets();
        for_each_coordinate(&self.lengths(), |coords| {
            out.push(tables.iter().zip(coords).map(|(t, &c)| t[c]).sum());
            true
        });
        out
    }

    /// Remove dimension `index` from an untiled descriptor. The array's
    /// data is not touched; callers use this after collapsing a
    /// dimension of length one or after extracting a slice.
    pub fn remove_dimension(&mut self, index: usize) -> Result<DimensionDescriptor> {
        if self.is_tiled() {
            return Err(DsError::TiledRemove);
        }
        if self.dimensions.len() == 1 {
            return Err(DsError::LastDimension);
        }
        self.offsets = OnceLock::new();
        Ok(self.dimensions.remove(index))
    }

    /// Reorder dimension descriptors: new dimension `i` is old `order[i]`.
    pub(crate) fn permute_dimensions(&mut self, order: &[usize]) {
        let old = std::mem::take(&mut self.dimensions);
        let mut old: Vec<Option<DimensionDescriptor>> = old.into_iter().map(Some).collect();
        self.dimensions = order.iter().filter_map(|&i| old[i].take()).collect();
        self.offsets = OnceLock::new();
    }
}

/// Equality ignores the offset cache.
impl PartialEq for ArrayDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions
            && self.tile_lengths == other.tile_lengths
            && self.packet == other.packet
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
