//! Scalar access by element name.

use crate::{DsError, NameLookup, PacketDescriptor, Result};

use super::{PacketMut, PacketRef};

/// Resolve `name` to a numeric element of the top-level packet.
fn resolve(desc: &PacketDescriptor, name: &str) -> Result<usize> {
    match desc.find_name(name) {
        NameLookup::NotFound => Err(DsError::NameNotFound(name.to_owned())),
        NameLookup::Multiple => Err(DsError::AmbiguousName(name.to_owned())),
        NameLookup::Dimension { .. } => Err(DsError::NotAnElement(name.to_owned())),
        NameLookup::Element { packet, index } => {
            if !std::ptr::eq(packet, desc) {
                return Err(DsError::NotAnElement(name.to_owned()));
            }
            if !desc.element_type(index).is_numeric() {
                return Err(DsError::NotNumeric(name.to_owned()));
            }
            Ok(index)
        }
    }
}

/// Read the uniquely named numeric element `name` of `packet` as
/// `[real, imaginary]`.
pub fn get_named_value(
    desc: &PacketDescriptor,
    packet: PacketRef<'_>,
    name: &str,
) -> Result<[f64; 2]> {
    let index = resolve(desc, name)?;
    packet
        .value(desc, index)
        .ok_or_else(|| DsError::NotNumeric(name.to_owned()))
}

/// Write the uniquely named numeric element `name` of `packet`.
pub fn put_named_value(
    desc: &PacketDescriptor,
    mut packet: PacketMut<'_>,
    name: &str,
    value: [f64; 2],
) -> Result<()> {
    let index = resolve(desc, name)?;
    if packet.put_value(desc, index, value) {
        Ok(())
    } else {
        Err(DsError::NotNumeric(name.to_owned()))
    }
}
