use pretty_assertions::assert_eq;

use super::*;
use crate::fixtures::{dim, flat, image_desc};

#[test]
fn numeric_fields_pack_without_padding() {
    let desc = flat(&[
        (ElementType::U8, "a"),
        (ElementType::F64, "b"),
        (ElementType::CI16, "c"),
    ]);
    assert_eq!(desc.packet_size(), 1 + 8 + 4);
    assert_eq!(desc.element_offset(0), Some(0));
    assert_eq!(desc.element_offset(1), Some(1));
    assert_eq!(desc.element_offset(2), Some(9));
    assert_eq!(desc.slot_count(), 0);
}

#[test]
fn indirect_fields_take_slots() {
    let desc = image_desc();
    assert_eq!(desc.packet_size(), 8);
    assert_eq!(desc.slot_count(), 3);
    assert_eq!(desc.location(0), FieldLocation::Inline { offset: 0, size: 8 });
    assert_eq!(desc.location(1), FieldLocation::Slot(0));
    assert_eq!(desc.location(2), FieldLocation::Slot(1));
    assert_eq!(desc.location(3), FieldLocation::Slot(2));
    assert_eq!(desc.element_offset(1), None);
    assert!(!desc.all_atomic());
}

#[test]
fn truncated_fields_take_nothing() {
    let mut desc = flat(&[(ElementType::F32, "a"), (ElementType::F32, "b")]);
    let old = desc.replace(0, Element::None);
    assert_eq!(old.name(), Some("a"));
    assert_eq!(desc.location(0), FieldLocation::Absent);
    assert_eq!(desc.location(1), FieldLocation::Inline { offset: 0, size: 4 });
    assert_eq!(desc.packet_size(), 4);
}

#[test]
fn empty_packets_are_rejected_except_scratch() {
    assert_eq!(PacketDescriptor::new(Vec::new()), Err(DsError::EmptyPacket));
    assert_eq!(PacketDescriptor::builder().build(), Err(DsError::EmptyPacket));

    let mut scratch = PacketDescriptor::scratch();
    assert!(scratch.is_empty());
    scratch.push(Element::atomic(ElementType::I32, "n").unwrap());
    assert_eq!(scratch.len(), 1);
    assert_eq!(scratch.packet_size(), 4);
}

#[test]
fn nested_tags_are_not_atomic() {
    assert_eq!(
        Element::atomic(ElementType::Array, "x"),
        Err(DsError::NotAtomic(ElementType::Array))
    );
    assert_eq!(
        PacketDescriptor::builder()
            .atomic(ElementType::F32, "ok")
            .atomic(ElementType::None, "bad")
            .build(),
        Err(DsError::NotAtomic(ElementType::None))
    );
}

#[test]
fn find_element_is_single_level() {
    let desc = image_desc();
    assert_eq!(desc.find_element("title"), Some(1));
    // Lives inside the nested array.
    assert_eq!(desc.find_element("value"), None);
    assert_eq!(desc.find_element("missing"), None);
}

#[test]
fn element_types_and_names() {
    let desc = image_desc();
    let types: Vec<ElementType> = desc.elements().iter().map(Element::element_type).collect();
    assert_eq!(
        types,
        vec![
            ElementType::F64,
            ElementType::VString,
            ElementType::Array,
            ElementType::List
        ]
    );
    assert_eq!(desc.element(2).name(), None);
    assert!(desc.element(3).is_nested());
}

#[test]
fn duplicate_names_span_the_tree() {
    assert!(image_desc().duplicate_names().is_empty());

    let entry = flat(&[(ElementType::F32, "x"), (ElementType::F32, "id")]);
    let cell = flat(&[(ElementType::F32, "id")]);
    let array = ArrayDescriptor::new(vec![dim("x", 2)], cell).unwrap();
    let desc = PacketDescriptor::builder()
        .atomic(ElementType::I32, "id")
        .array(array)
        .list(entry)
        .build()
        .unwrap();
    assert_eq!(desc.duplicate_names(), vec!["id".to_owned(), "x".to_owned()]);
}

#[test]
fn array_mut_edits_nested_descriptor() {
    let mut desc = image_desc();
    let array = desc.array_mut(2).unwrap();
    array.packet_mut().push(Element::atomic(ElementType::U8, "mask").unwrap());
    let crate::NameLookup::Element { packet, index } = desc.find_name("mask") else {
        panic!("mask should resolve to an element");
    };
    assert_eq!((packet.len(), index), (3, 2));
    assert!(desc.array_mut(0).is_none());
}
