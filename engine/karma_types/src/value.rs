//! Generic conversion between inline element bytes and `f64`.
//!
//! Values are held in native byte order, exactly as a packet's byte image
//! stores them. Every numeric tag converts to a `[real, imaginary]` pair;
//! scalar tags always report an imaginary part of zero.

use crate::ElementType;

/// Copy the first `N` bytes out of `bytes`.
#[inline]
fn take<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// Read one scalar of `ty` from the start of `bytes`.
fn read_scalar(ty: ElementType, bytes: &[u8]) -> Option<f64> {
    let value = match ty {
        ElementType::F32 => f64::from(f32::from_ne_bytes(take(bytes))),
        ElementType::F64 => f64::from_ne_bytes(take(bytes)),
        ElementType::I8 => f64::from(i8::from_ne_bytes(take(bytes))),
        ElementType::I16 => f64::from(i16::from_ne_bytes(take(bytes))),
        ElementType::I32 => f64::from(i32::from_ne_bytes(take(bytes))),
        ElementType::I64 => i64::from_ne_bytes(take(bytes)) as f64,
        ElementType::U8 => f64::from(bytes[0]),
        ElementType::U16 => f64::from(u16::from_ne_bytes(take(bytes))),
        ElementType::U32 => f64::from(u32::from_ne_bytes(take(bytes))),
        ElementType::U64 => u64::from_ne_bytes(take(bytes)) as f64,
        _ => return None,
    };
    Some(value)
}

/// Write one scalar of `ty` to the start of `bytes`, saturating on overflow.
fn write_scalar(ty: ElementType, bytes: &mut [u8], value: f64) -> bool {
    match ty {
        ElementType::F32 => bytes[..4].copy_from_slice(&(value as f32).to_ne_bytes()),
        ElementType::F64 => bytes[..8].copy_from_slice(&value.to_ne_bytes()),
        ElementType::I8 => bytes[..1].copy_from_slice(&(value as i8).to_ne_bytes()),
        ElementType::I16 => bytes[..2].copy_from_slice(&(value as i16).to_ne_bytes()),
        ElementType::I32 => bytes[..4].copy_from_slice(&(value as i32).to_ne_bytes()),
        ElementType::I64 => bytes[..8].copy_from_slice(&(value as i64).to_ne_bytes()),
        ElementType::U8 => bytes[0] = value as u8,
        ElementType::U16 => bytes[..2].copy_from_slice(&(value as u16).to_ne_bytes()),
        ElementType::U32 => bytes[..4].copy_from_slice(&(value as u32).to_ne_bytes()),
        ElementType::U64 => bytes[..8].copy_from_slice(&(value as u64).to_ne_bytes()),
        _ => return false,
    }
    true
}

/// Decode one value of `ty` as `[real, imaginary]`.
///
/// Returns `None` for tags that are not stored inline.
///
/// # Panics
///
/// If `bytes` is shorter than `ty.size()`.
pub fn read_value(ty: ElementType, bytes: &[u8]) -> Option<[f64; 2]> {
    let component = ty.component_type()?;
    let real = read_scalar(component, bytes)?;
    if ty.is_complex() {
        let imag = read_scalar(component, &bytes[component.size()..])?;
        Some([real, imag])
    } else {
        Some([real, 0.0])
    }
}

/// Encode `value` as `ty`. The imaginary part is ignored for scalar tags.
///
/// Returns `false` (and writes nothing) for tags not stored inline.
///
/// # Panics
///
/// If `bytes` is shorter than `ty.size()`.
pub fn write_value(ty: ElementType, bytes: &mut [u8], value: [f64; 2]) -> bool {
    let Some(component) = ty.component_type() else {
        return false;
    };
    if !write_scalar(component, bytes, value[0]) {
        return false;
    }
    if ty.is_complex() {
        write_scalar(component, &mut bytes[component.size()..], value[1]);
    }
    true
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
