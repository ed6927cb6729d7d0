//! Element type classification flags.
//!
//! Computed by [`ElementType::flags`](crate::ElementType::flags) from a
//! constant match, so queries like "is this stored inline" are a single
//! bit test.

use bitflags::bitflags;

bitflags! {
    /// Properties of an element type tag.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        /// Integer storage (signed or unsigned).
        const INTEGER = 1 << 0;
        /// IEEE floating point storage.
        const FLOAT = 1 << 1;
        /// Can represent negative values.
        const SIGNED = 1 << 2;
        /// Real/imaginary pair.
        const COMPLEX = 1 << 3;
        /// Variable or fixed length string.
        const STRING = 1 << 4;
        /// Nested array or list.
        const NESTED = 1 << 5;
        /// Fixed width, stored in the packet's byte image.
        const INLINE = 1 << 6;
    }
}

impl TypeFlags {
    /// Flags shared by every numeric tag.
    pub const NUMERIC: Self = Self::INTEGER.union(Self::FLOAT);

    /// Whether values of this class go through the generic
    /// to-double conversion.
    #[inline]
    pub const fn is_convertible(self) -> bool {
        self.intersects(Self::NUMERIC) && self.contains(Self::INLINE)
    }
}

#[cfg(test)]
mod tests;
