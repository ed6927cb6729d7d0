use karma_types::ElementType;
use pretty_assertions::assert_eq;

use super::*;
use crate::data::{Block, ListHeader, Slot, SortOrder};
use crate::fixtures::{catalogue_desc, dim, fill, flat, image_desc};
use crate::{ArrayDescriptor, DimensionDescriptor, Element, PacketDescriptor};

// Descriptor copies

#[test]
fn full_copy_is_identical() {
    let desc = image_desc();
    assert_eq!(desc.copy_until(None), Some(desc.clone()));
}

#[test]
fn stop_replaces_only_the_named_field() {
    let desc = flat(&[
        (ElementType::F64, "a"),
        (ElementType::I32, "b"),
        (ElementType::F32, "c"),
    ]);
    let copy = desc.copy_until(Some("b")).unwrap();
    assert_eq!(copy.len(), 3);
    assert_eq!(copy.element(0), desc.element(0));
    assert_eq!(copy.element(1), &Element::None);
    assert_eq!(copy.element(2), desc.element(2));
    // The truncated field takes no storage.
    assert_eq!(copy.packet_size(), 12);
}

#[test]
fn stop_inside_array_packet_keeps_dimensions() {
    let desc = image_desc();
    let copy = desc.copy_until(Some("flag")).unwrap();
    let Element::Array(array) = copy.element(2) else {
        panic!("expected array");
    };
    let Element::Array(original) = desc.element(2) else {
        panic!("expected array");
    };
    assert_eq!(array.dimensions(), original.dimensions());
    assert_eq!(array.packet().element(0), original.packet().element(0));
    assert_eq!(array.packet().element(1), &Element::None);
    // Siblings after the array are untouched.
    assert_eq!(copy.element(3), desc.element(3));
}

#[test]
fn stop_at_dimension_fails_whole_copy() {
    let desc = image_desc();
    assert_eq!(desc.copy_until(Some("x")), None);

    let Element::Array(array) = desc.element(2) else {
        panic!("expected array");
    };
    assert_eq!(array.copy_until(Some("y")), None);
    assert!(array.copy_until(Some("value")).is_some());
}

#[test]
fn ambiguous_stop_fails() {
    let entry = flat(&[(ElementType::F32, "a")]);
    let desc = PacketDescriptor::builder()
        .atomic(ElementType::F64, "a")
        .list(entry)
        .build()
        .unwrap();
    assert_eq!(desc.copy_until(Some("a")), None);
}

#[test]
fn unknown_stop_copies_everything() {
    let desc = image_desc();
    assert_eq!(desc.copy_until(Some("missing")), Some(desc.clone()));
}

#[test]
fn array_copy_carries_tiling_and_offsets() {
    let array = ArrayDescriptor::tiled(
        vec![dim("y", 4), dim("x", 4)],
        vec![vec![2], vec![2]],
        flat(&[(ElementType::F32, "v")]),
    )
    .unwrap();
    array.offsets();
    let copy = array.copy_until(None).unwrap();
    assert!(copy.has_offsets());
    assert_eq!(copy.tile_lengths(1), &[2]);
    assert_eq!(copy, array);
}

// Data copies

#[test]
fn round_trip_copy_is_byte_identical() {
    for desc in [image_desc(), catalogue_desc()] {
        let copy = desc.copy_until(None).unwrap();
        let mut src = Block::alloc(&desc, 1);
        fill(&desc, src.packet_mut(0), 1.0);
        let mut dst = Block::alloc(&copy, 1);

        assert!(copy_data(&desc, src.packet(0), &copy, dst.packet_mut(0)));
        assert_eq!(dst, src);
    }
}

#[test]
fn divergent_field_is_skipped_and_left_alone() {
    let input = flat(&[
        (ElementType::F64, "a"),
        (ElementType::I32, "b"),
        (ElementType::F32, "c"),
    ]);
    let output = flat(&[
        (ElementType::F64, "a"),
        (ElementType::F32, "b"),
        (ElementType::F32, "c"),
    ]);
    let mut src = Block::alloc(&input, 1);
    fill(&input, src.packet_mut(0), 1.0);
    let mut dst = Block::alloc(&output, 1);
    dst.bytes_mut()[8..12].copy_from_slice(&[0xAB; 4]);

    assert!(!copy_data(&input, src.packet(0), &output, dst.packet_mut(0)));
    assert_eq!(dst.packet(0).value(&output, 0), Some([1.0, 0.0]));
    assert_eq!(&dst.bytes()[8..12], &[0xAB; 4]);
    assert_eq!(dst.packet(0).value(&output, 2), Some([3.0, 0.0]));
}

#[test]
fn renamed_field_is_skipped() {
    let input = flat(&[(ElementType::F64, "a"), (ElementType::F64, "b")]);
    let output = flat(&[(ElementType::F64, "a"), (ElementType::F64, "renamed")]);
    let mut src = Block::alloc(&input, 1);
    fill(&input, src.packet_mut(0), 5.0);
    let mut dst = Block::alloc(&output, 1);

    assert!(!copy_data(&input, src.packet(0), &output, dst.packet_mut(0)));
    assert_eq!(dst.packet(0).value(&output, 0), Some([5.0, 0.0]));
    assert_eq!(dst.packet(0).value(&output, 1), Some([0.0, 0.0]));
}

#[test]
fn field_count_mismatch_copies_nothing() {
    let input = flat(&[(ElementType::F64, "a"), (ElementType::F64, "b")]);
    let output = flat(&[(ElementType::F64, "a")]);
    let mut src = Block::alloc(&input, 1);
    fill(&input, src.packet_mut(0), 5.0);
    let mut dst = Block::alloc(&output, 1);

    assert!(!copy_data(&input, src.packet(0), &output, dst.packet_mut(0)));
    assert_eq!(dst.bytes(), &[0u8; 8]);
}

#[test]
fn copy_into_truncated_descriptor_skips_only_the_gap() {
    let desc = image_desc();
    let truncated = desc.copy_until(Some("title")).unwrap();
    let mut src = Block::alloc(&desc, 1);
    fill(&desc, src.packet_mut(0), 1.0);
    let mut dst = Block::alloc(&truncated, 1);

    assert!(!copy_data(&desc, src.packet(0), &truncated, dst.packet_mut(0)));
    let (src, dst) = (src.packet(0), dst.packet(0));
    assert_eq!(dst.value(&truncated, 0), src.value(&desc, 0));
    assert_eq!(dst.array(&truncated, 2), src.array(&desc, 2));
    assert_eq!(dst.list(&truncated, 3), src.list(&desc, 3));
}

#[test]
fn copy_packet_data_clones_slots() {
    let desc = image_desc();
    let mut src = Block::alloc(&desc, 1);
    fill(&desc, src.packet_mut(0), 2.0);
    let mut dst = Block::alloc(&desc, 1);
    copy_packet_data(&desc, dst.packet_mut(0), src.packet(0));
    assert_eq!(dst, src);

    // Deep clone: editing the copy leaves the source alone.
    dst.packet_mut(0).set_string(&desc, 1, "changed");
    assert_eq!(src.packet(0).string(&desc, 1), Some("title-3"));
}

#[test]
fn array_dimension_mismatch_copies_nothing() {
    let cell = flat(&[(ElementType::F32, "v")]);
    let input = ArrayDescriptor::new(vec![dim("x", 4)], cell.clone()).unwrap();
    // Same name and length, different coordinate extent.
    let shifted = DimensionDescriptor::regular("x", 4, 1.0, 4.0).unwrap();
    let output = ArrayDescriptor::new(vec![shifted], cell).unwrap();
    let mut src = Block::alloc(input.packet(), 4);
    for i in 0..4 {
        fill(input.packet(), src.packet_mut(i), i as f64);
    }
    let mut dst = Block::alloc(output.packet(), 4);
    assert!(!copy_array(&input, &src, &output, &mut dst));
    assert_eq!(dst.bytes(), &[0u8; 16]);
}

#[test]
fn array_slow_path_reports_partial_match() {
    let input = ArrayDescriptor::new(
        vec![dim("x", 3)],
        flat(&[(ElementType::F32, "v"), (ElementType::I32, "q")]),
    )
    .unwrap();
    let output = ArrayDescriptor::new(
        vec![dim("x", 3)],
        flat(&[(ElementType::F32, "v"), (ElementType::I64, "q")]),
    )
    .unwrap();
    let mut src = Block::alloc(input.packet(), 3);
    for i in 0..3 {
        fill(input.packet(), src.packet_mut(i), 10.0 * i as f64);
    }
    let mut dst = Block::alloc(output.packet(), 3);

    assert!(!copy_array(&input, &src, &output, &mut dst));
    for i in 0..3 {
        assert_eq!(dst.packet(i).value(output.packet(), 0), Some([10.0 * i as f64, 0.0]));
        assert_eq!(dst.packet(i).value(output.packet(), 1), Some([0.0, 0.0]));
    }
}

#[test]
fn tiled_and_untiled_copies_agree() {
    let cell = flat(&[(ElementType::F32, "v")]);
    let tiled = ArrayDescriptor::tiled(
        vec![dim("y", 4), dim("x", 4)],
        vec![vec![2], vec![2]],
        cell.clone(),
    )
    .unwrap();
    let plain = ArrayDescriptor::new(vec![dim("y", 4), dim("x", 4)], cell).unwrap();

    let mut tiled_data = Block::alloc(tiled.packet(), 16);
    for y in 0..4 {
        for x in 0..4 {
            let value = (y * 4 + x) as f64;
            let offset = tiled.packet_offset(&[y, x]);
            assert!(tiled_data.packet_mut(offset).put_value(tiled.packet(), 0, [value, 0.0]));
        }
    }

    let mut plain_data = Block::alloc(plain.packet(), 16);
    assert!(copy_array(&tiled, &tiled_data, &plain, &mut plain_data));
    for i in 0..16 {
        assert_eq!(plain_data.packet(i).value(plain.packet(), 0), Some([i as f64, 0.0]));
    }

    let mut back = Block::alloc(tiled.packet(), 16);
    assert!(copy_array(&plain, &plain_data, &tiled, &mut back));
    assert_eq!(back, tiled_data);
}

#[test]
fn nested_output_storage_is_allocated_on_demand() {
    let desc = image_desc();
    let mut src = Block::alloc(&desc, 1);
    fill(&desc, src.packet_mut(0), 1.0);
    let mut dst = Block::alloc(&desc, 1);
    *dst.packet_mut(0).slot_mut(&desc, 2).unwrap() = Slot::Array(None);
    *dst.packet_mut(0).slot_mut(&desc, 3).unwrap() = Slot::List(None);

    assert!(copy_data(&desc, src.packet(0), &desc, dst.packet_mut(0)));
    assert_eq!(dst, src);
}

// Lists

fn increasing_list(entry: &PacketDescriptor, contiguous: usize, fragments: usize) -> ListHeader {
    let mut list = ListHeader::new();
    list.alloc_contiguous(entry, contiguous);
    for _ in 0..fragments {
        list.append(entry);
    }
    list.set_sort(SortOrder::Increasing, 0);
    let mut n = 0.0;
    list.for_each_mut(|mut p| {
        assert!(p.put_value(entry, 0, [n, 0.0]));
        n += 1.0;
        true
    });
    list
}

fn ids(entry: &PacketDescriptor, list: &ListHeader) -> Vec<f64> {
    list.iter().map(|p| p.value(entry, 0).unwrap()[0]).collect()
}

#[test]
fn list_copy_preserves_order_and_sort() {
    let entry = flat(&[(ElementType::I32, "id")]);
    for (contiguous, fragments) in [(3, 2), (0, 4), (5, 0)] {
        let input = increasing_list(&entry, contiguous, fragments);
        let mut output = ListHeader::new();
        assert!(copy_list(&entry, &input, &entry, &mut output));
        assert_eq!(output.len(), contiguous + fragments);
        assert_eq!(output.contiguous_len(), output.len());
        assert_eq!(output.sort_order(), SortOrder::Increasing);
        assert_eq!(ids(&entry, &output), ids(&entry, &input));
        assert_eq!(output, input);
    }
}

#[test]
fn empty_list_copies_trivially() {
    let entry = flat(&[(ElementType::I32, "id")]);
    let input = ListHeader::new();
    let mut output = increasing_list(&entry, 2, 1);
    assert!(copy_list(&entry, &input, &entry, &mut output));
    assert!(output.is_empty());
    assert_eq!(output.sort_order(), SortOrder::Unordered);
}

#[test]
fn list_field_count_mismatch_copies_nothing() {
    let entry = flat(&[(ElementType::I32, "id")]);
    let wider = flat(&[(ElementType::I32, "id"), (ElementType::F32, "w")]);
    let input = increasing_list(&entry, 2, 0);
    let mut output = ListHeader::new();
    assert!(!copy_list(&entry, &input, &wider, &mut output));
    assert!(output.is_empty());
}
