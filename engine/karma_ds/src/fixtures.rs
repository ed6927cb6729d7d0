//! Shared descriptors and data builders for unit tests.

use karma_types::ElementType;

use crate::data::{FixedString, PacketMut};
use crate::{ArrayDescriptor, DimensionDescriptor, Element, PacketDescriptor};

pub(crate) fn dim(name: &str, length: usize) -> DimensionDescriptor {
    DimensionDescriptor::regular(name, length, 0.0, (length - 1) as f64).unwrap()
}

pub(crate) fn flat(fields: &[(ElementType, &str)]) -> PacketDescriptor {
    let elements = fields
        .iter()
        .map(|&(ty, name)| Element::atomic(ty, name).unwrap())
        .collect();
    PacketDescriptor::new(elements).unwrap()
}

/// `scale: f64, title: vstring, [y=3, x=4] of {value: f32, flag: i16},
/// list of {id: i32, label: fstring}`
pub(crate) fn image_desc() -> PacketDescriptor {
    let cell = flat(&[(ElementType::F32, "value"), (ElementType::I16, "flag")]);
    let array = ArrayDescriptor::new(vec![dim("y", 3), dim("x", 4)], cell).unwrap();
    let entry = flat(&[(ElementType::I32, "id"), (ElementType::FString, "label")]);
    PacketDescriptor::builder()
        .atomic(ElementType::F64, "scale")
        .atomic(ElementType::VString, "title")
        .array(array)
        .list(entry)
        .build()
        .unwrap()
}

/// An array whose cells each carry a list, so no bulk path applies.
pub(crate) fn catalogue_desc() -> PacketDescriptor {
    let source = flat(&[(ElementType::F32, "flux"), (ElementType::VString, "tag")]);
    let cell = PacketDescriptor::builder()
        .atomic(ElementType::U8, "count")
        .list(source)
        .build()
        .unwrap();
    let array = ArrayDescriptor::new(vec![dim("field", 2)], cell).unwrap();
    PacketDescriptor::builder().array(array).build().unwrap()
}

/// Fill every field below `packet` with values derived from `seed`. Lists
/// get two contiguous entries and one fragment.
pub(crate) fn fill(desc: &PacketDescriptor, mut packet: PacketMut<'_>, seed: f64) {
    for (index, element) in desc.elements().iter().enumerate() {
        let seed = seed + index as f64;
        match element {
            Element::Atomic {
                ty: ElementType::FString,
                name,
            } => {
                let value = FixedString::new(16, &format!("{name}-{seed}"));
                assert!(packet.set_fixed_string(desc, index, value));
            }
            Element::Atomic { ty, name } if ty.is_string() => {
                assert!(packet.set_string(desc, index, &format!("{name}-{seed}")));
            }
            Element::Atomic { .. } => {
                assert!(packet.put_value(desc, index, [seed, -seed]));
            }
            Element::Array(array) => {
                let block = packet.array_mut(desc, index).unwrap();
                for cell in 0..block.len() {
                    fill(array.packet(), block.packet_mut(cell), seed * 10.0 + cell as f64);
                }
            }
            Element::List(entry) => {
                let header = packet.list_mut(desc, index).unwrap();
                header.alloc_contiguous(entry, 2);
                header.append(entry);
                let mut n = 0.0;
                header.for_each_mut(|p| {
                    fill(entry, p, seed * 100.0 + n);
                    n += 1.0;
                    true
                });
            }
            Element::None => {}
        }
    }
}
