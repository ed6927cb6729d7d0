use karma_types::ElementType;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::fixtures::{dim, flat};
use crate::PacketDescriptor;

const NAMES: [&str; 4] = ["a", "b", "c", "d"];

fn cell() -> PacketDescriptor {
    flat(&[(ElementType::I32, "v"), (ElementType::VString, "label")])
}

fn array(lengths: &[usize]) -> ArrayDescriptor {
    let dims = lengths
        .iter()
        .zip(NAMES)
        .map(|(&len, name)| dim(name, len))
        .collect();
    ArrayDescriptor::new(dims, cell()).unwrap()
}

/// Cell `i` holds `i` and the label `"#i"`.
fn numbered(desc: &ArrayDescriptor) -> Block {
    let mut block = Block::alloc(desc.packet(), desc.array_size());
    for i in 0..block.len() {
        let mut packet = block.packet_mut(i);
        assert!(packet.put_value(desc.packet(), 0, [i as f64, 0.0]));
        assert!(packet.set_string(desc.packet(), 1, &format!("#{i}")));
    }
    block
}

fn values(desc: &ArrayDescriptor, block: &Block) -> Vec<usize> {
    block
        .iter()
        .map(|p| p.value(desc.packet(), 0).unwrap()[0] as usize)
        .collect()
}

fn inverse(order: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; order.len()];
    for (i, &d) in order.iter().enumerate() {
        inv[d] = i;
    }
    inv
}

#[test]
fn identity_changes_nothing() {
    let mut desc = array(&[2, 3]);
    let original = desc.clone();
    let mut data = numbered(&desc);
    let before = data.clone();
    reorder_array(&mut desc, &[0, 1], Some(&mut data), true).unwrap();
    assert_eq!(desc, original);
    assert_eq!(data, before);
}

#[test]
fn transposes_matrix() {
    let mut desc = array(&[2, 3]);
    let mut data = numbered(&desc);
    reorder_array(&mut desc, &[1, 0], Some(&mut data), true).unwrap();

    assert_eq!(desc.lengths(), vec![3, 2]);
    assert_eq!(desc.dimension(0).name(), "b");
    assert_eq!(values(&desc, &data), vec![0, 3, 1, 4, 2, 5]);
    // Strings travel with their cells.
    assert_eq!(data.packet(1).string(desc.packet(), 1), Some("#3"));
}

#[test]
fn unchanged_leading_and_trailing_dimensions() {
    // a and d stay put; b and c swap.
    let mut desc = array(&[2, 2, 3, 2]);
    let mut data = numbered(&desc);
    reorder_array(&mut desc, &[0, 2, 1, 3], Some(&mut data), true).unwrap();
    assert_eq!(desc.lengths(), vec![2, 3, 2, 2]);

    let got = values(&desc, &data);
    let mut expected = Vec::new();
    for a in 0..2 {
        for c in 0..3 {
            for b in 0..2 {
                for d in 0..2 {
                    expected.push(((a * 2 + b) * 3 + c) * 2 + d);
                }
            }
        }
    }
    assert_eq!(got, expected);
}

#[test]
fn descriptor_only_or_data_only() {
    let mut desc = array(&[2, 3]);
    reorder_array(&mut desc, &[1, 0], None, true).unwrap();
    assert_eq!(desc.lengths(), vec![3, 2]);

    let mut desc = array(&[2, 3]);
    let mut data = numbered(&desc);
    reorder_array(&mut desc, &[1, 0], Some(&mut data), false).unwrap();
    assert_eq!(desc.lengths(), vec![2, 3]);
    assert_eq!(values(&desc, &data), vec![0, 3, 1, 4, 2, 5]);
}

#[test]
fn tiled_arrays_are_rejected() {
    let mut desc = ArrayDescriptor::tiled(
        vec![dim("y", 4), dim("x", 4)],
        vec![vec![2], vec![2]],
        cell(),
    )
    .unwrap();
    assert_eq!(
        reorder_array(&mut desc, &[1, 0], None, true),
        Err(DsError::TiledReorder)
    );
    // The identity is still a no-op.
    assert_eq!(reorder_array(&mut desc, &[0, 1], None, true), Ok(()));
}

#[test]
#[should_panic(expected = "not a permutation")]
fn rejects_repeated_dimension() {
    let mut desc = array(&[2, 3]);
    let _ = reorder_array(&mut desc, &[1, 1], None, true);
}

fn shape_and_order() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    prop::collection::vec(1usize..4, 1..=4).prop_flat_map(|lengths| {
        let order = Just((0..lengths.len()).collect::<Vec<_>>()).prop_shuffle();
        (Just(lengths), order)
    })
}

proptest! {
    #[test]
    fn inverse_restores_original((lengths, order) in shape_and_order()) {
        let mut desc = array(&lengths);
        let original = desc.clone();
        let mut data = numbered(&desc);
        let before = data.clone();

        reorder_array(&mut desc, &order, Some(&mut data), true).unwrap();
        reorder_array(&mut desc, &inverse(&order), Some(&mut data), true).unwrap();

        prop_assert_eq!(desc, original);
        prop_assert_eq!(data, before);
    }
}
