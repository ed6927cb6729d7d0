//! In-place transposition of array data and dimensions.

use crate::coords::for_each_coordinate;
use crate::data::{Block, Slot};
use crate::{ArrayDescriptor, DsError, Result};

/// Reorder the dimensions of an array: new dimension `i` is old dimension
/// `order[i]`.
///
/// `data`, if given, is transposed to match. With `modify_descriptor`, the
/// dimension descriptors of `desc` are reordered too; otherwise `desc`
/// keeps describing the old layout. The identity permutation returns
/// immediately.
///
/// Leading dimensions that keep their place split the array into
/// independent chunks, and trailing ones into runs that move as one block.
///
/// # Panics
///
/// If `order` is not a permutation of `0..desc.num_dimensions()`, or if
/// `data` does not hold `desc.array_size()` packets.
pub fn reorder_array(
    desc: &mut ArrayDescriptor,
    order: &[usize],
    data: Option<&mut Block>,
    modify_descriptor: bool,
) -> Result<()> {
    let num_dims = desc.num_dimensions();
    assert_eq!(order.len(), num_dims, "permutation rank does not match array");
    let mut seen = vec![false; num_dims];
    for &dim in order {
        assert!(dim < num_dims && !seen[dim], "{order:?} is not a permutation");
        seen[dim] = true;
    }
    if order.iter().enumerate().all(|(i, &dim)| i == dim) {
        return Ok(());
    }
    if desc.is_tiled() {
        return Err(DsError::TiledReorder);
    }

    if let Some(block) = data {
        assert_eq!(block.len(), desc.array_size(), "array data has the wrong size");
        transpose(&desc.lengths(), order, block);
    }
    if modify_descriptor {
        desc.permute_dimensions(order);
    }
    Ok(())
}

/// Row-major transpose of `block` through a scratch copy.
fn transpose(lengths: &[usize], order: &[usize], block: &mut Block) {
    let num_dims = lengths.len();
    let prefix = order.iter().enumerate().take_while(|&(i, &d)| i == d).count();
    let suffix = order
        .iter()
        .rev()
        .enumerate()
        .take_while(|&(i, &d)| num_dims - 1 - i == d)
        .count();
    let run: usize = lengths[num_dims - suffix..].iter().product();
    let chunk: usize = lengths[prefix..].iter().product();
    let chunks: usize = lengths[..prefix].iter().product();

    let mut strides = vec![1usize; num_dims];
    for dim in (0..num_dims - 1).rev() {
        strides[dim] = strides[dim + 1] * lengths[dim + 1];
    }
    let middle = &order[prefix..num_dims - suffix];
    let middle_lengths: Vec<usize> = middle.iter().map(|&d| lengths[d]).collect();
    let middle_strides: Vec<usize> = middle.iter().map(|&d| strides[d]).collect();
    tracing::debug!(prefix, suffix, run, chunks, "transposing array data");

    let (packet_size, slot_count) = (block.packet_size(), block.slot_count());
    let mut bytes = Vec::with_capacity(block.bytes.len());
    let mut slots: Vec<Slot> = Vec::with_capacity(block.slots.len());
    for base in (0..chunks).map(|c| c * chunk) {
        for_each_coordinate(&middle_lengths, |coords| {
            let start: usize = base
                + coords
                    .iter()
                    .zip(&middle_strides)
                    .map(|(c, s)| c * s)
                    .sum::<usize>();
            bytes.extend_from_slice(&block.bytes[start * packet_size..(start + run) * packet_size]);
            slots.extend(
                block.slots[start * slot_count..(start + run) * slot_count]
                    .iter_mut()
                    .map(std::mem::take),
            );
            true
        });
    }
    block.bytes = bytes;
    block.slots = slots;
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
