//! Block-buffered conversion of stored values to `f64`.

use karma_types::{is_blank, read_value, ElementType};

use crate::{Result, ScanError};

/// How a complex value is reduced to one real number. Ignored for real
/// element types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComplexConversion {
    #[default]
    Real,
    Imaginary,
    Magnitude,
    /// Magnitude, mirrored: extremes see both `+|z|` and `-|z|`. Every other
    /// aggregate sees the magnitude.
    Envelope,
    SquaredMagnitude,
    /// Phase angle in degrees.
    Phase,
    /// Unwrapped phase. Not implemented; requesting it fails.
    ContinuousPhase,
}

/// Reduction applied per value, once the request has been validated.
#[derive(Copy, Clone, Debug)]
enum Reduce {
    Real,
    Imaginary,
    Magnitude,
    SquaredMagnitude,
    Phase,
}

impl Reduce {
    #[inline]
    fn apply(self, [re, im]: [f64; 2]) -> f64 {
        match self {
            Self::Real => re,
            Self::Imaginary => im,
            Self::Magnitude => re.hypot(im),
            Self::SquaredMagnitude => re * re + im * im,
            Self::Phase => im.atan2(re).to_degrees(),
        }
    }
}

/// Reads one element type at arbitrary byte offsets through a fixed-size
/// buffer.
pub(crate) struct BlockConverter {
    ty: ElementType,
    reduce: Reduce,
    envelope: bool,
    too_big: f64,
    block_size: usize,
    buffer: Vec<f64>,
}

impl BlockConverter {
    pub(crate) fn new(
        ty: ElementType,
        conversion: ComplexConversion,
        block_size: usize,
        too_big: f64,
    ) -> Result<Self> {
        if conversion == ComplexConversion::ContinuousPhase {
            return Err(ScanError::ContinuousPhaseUnimplemented);
        }
        if !ty.is_numeric() {
            return Err(ScanError::NotNumeric(ty));
        }
        let reduce = if ty.is_complex() {
            match conversion {
                ComplexConversion::Real => Reduce::Real,
                ComplexConversion::Imaginary => Reduce::Imaginary,
                ComplexConversion::Magnitude | ComplexConversion::Envelope => Reduce::Magnitude,
                ComplexConversion::SquaredMagnitude => Reduce::SquaredMagnitude,
                ComplexConversion::Phase | ComplexConversion::ContinuousPhase => Reduce::Phase,
            }
        } else {
            Reduce::Real
        };
        Ok(Self {
            ty,
            reduce,
            envelope: ty.is_complex() && conversion == ComplexConversion::Envelope,
            too_big,
            block_size: block_size.max(1),
            buffer: Vec::with_capacity(block_size.max(1)),
        })
    }

    /// Whether extremes should also see the negated magnitude.
    #[inline]
    pub(crate) fn envelope(&self) -> bool {
        self.envelope
    }

    /// Feed every unblanked value at `offsets` into `sink`, in order.
    ///
    /// # Panics
    ///
    /// If an offset addresses bytes past the end of `data`.
    pub(crate) fn for_each(&mut self, data: &[u8], offsets: &[usize], sink: &mut impl FnMut(f64)) {
        for block in offsets.chunks(self.block_size) {
            self.buffer.clear();
            for &offset in block {
                let value = self.convert(data, offset);
                self.buffer.push(value);
            }
            self.drain(sink);
        }
    }

    /// Like [`for_each`](Self::for_each) over `count` values `stride` bytes
    /// apart from the start of `data`.
    pub(crate) fn for_each_strided(
        &mut self,
        data: &[u8],
        stride: usize,
        count: usize,
        sink: &mut impl FnMut(f64),
    ) {
        let mut offset = 0;
        let mut remaining = count;
        while remaining > 0 {
            let len = remaining.min(self.block_size);
            self.buffer.clear();
            for _ in 0..len {
                let value = self.convert(data, offset);
                self.buffer.push(value);
                offset += stride;
            }
            self.drain(sink);
            remaining -= len;
        }
    }

    /// The reduced value at `offset`, or NaN if the sample is blanked.
    #[inline]
    fn convert(&self, data: &[u8], offset: usize) -> f64 {
        match read_value(self.ty, &data[offset..offset + self.ty.size()]) {
            Some(pair) if !is_blank_pair(pair, self.too_big) => self.reduce.apply(pair),
            _ => f64::NAN,
        }
    }

    fn drain(&self, sink: &mut impl FnMut(f64)) {
        for &value in &self.buffer {
            if !value.is_nan() {
                sink(value);
            }
        }
    }
}

/// A stored sample is blanked when its real part is NaN or at least
/// `too_big`. The imaginary part never blanks.
#[inline]
fn is_blank_pair([re, _]: [f64; 2], too_big: f64) -> bool {
    re.is_nan() || is_blank(re, too_big)
}

/// Raw `[real, imaginary]` pairs, blanked on the real part.
pub(crate) fn for_each_pair(
    ty: ElementType,
    data: &[u8],
    offsets: &[usize],
    too_big: f64,
    sink: &mut impl FnMut([f64; 2]),
) -> Result<()> {
    if !ty.is_numeric() {
        return Err(ScanError::NotNumeric(ty));
    }
    let size = ty.size();
    for &offset in offsets {
        if let Some(pair) = read_value(ty, &data[offset..offset + size]) {
            if !is_blank_pair(pair, too_big) {
                sink(pair);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
