//! Element type tags.
//!
//! Every field of a packet carries one of these tags. Numeric tags have a
//! fixed byte width and are stored inline in the packet's byte image;
//! complex tags store adjacent real/imaginary values of the component type
//! and so occupy twice the component width. The remaining tags describe
//! indirect fields (strings, nested arrays, nested lists) or the truncation
//! sentinel produced by descriptor copies.

use std::fmt;

use crate::TypeFlags;

/// Tag describing the kind of one packet field.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    /// Truncation point left behind by a partial descriptor copy.
    None,
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    /// Complex pair of `f32`.
    CF32,
    /// Complex pair of `f64`.
    CF64,
    CI8,
    CI16,
    CI32,
    CI64,
    CU8,
    CU16,
    CU32,
    CU64,
    /// Variable-length string, owned.
    VString,
    /// Fixed-length string: a declared maximum length plus owned contents.
    FString,
    /// Nested array; the field descriptor is an array descriptor.
    Array,
    /// Nested list; the field descriptor is the list's element packet.
    List,
}

impl ElementType {
    /// Every tag, in code order.
    pub const ALL: [ElementType; 25] = [
        Self::None,
        Self::F32,
        Self::F64,
        Self::I8,
        Self::I32,
        Self::I16,
        Self::Array,
        Self::I64,
        Self::List,
        Self::CF32,
        Self::CF64,
        Self::CI8,
        Self::CI32,
        Self::CI16,
        Self::CI64,
        Self::U8,
        Self::U32,
        Self::U16,
        Self::U64,
        Self::CU8,
        Self::CU32,
        Self::CU16,
        Self::CU64,
        Self::VString,
        Self::FString,
    ];

    /// Stable numeric code, used by serializers on the wire.
    pub const fn code(self) -> u32 {
        match self {
            Self::None => 0,
            Self::F32 => 1,
            Self::F64 => 2,
            Self::I8 => 3,
            Self::I32 => 4,
            Self::I16 => 5,
            Self::Array => 6,
            Self::I64 => 7,
            Self::List => 8,
            Self::CF32 => 9,
            Self::CF64 => 10,
            Self::CI8 => 11,
            Self::CI32 => 12,
            Self::CI16 => 13,
            Self::CI64 => 14,
            Self::U8 => 15,
            Self::U32 => 16,
            Self::U16 => 17,
            Self::U64 => 18,
            Self::CU8 => 19,
            Self::CU32 => 20,
            Self::CU16 => 21,
            Self::CU64 => 22,
            Self::VString => 23,
            Self::FString => 24,
        }
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::F32 => "float",
            Self::F64 => "double",
            Self::I8 => "byte",
            Self::I16 => "short",
            Self::I32 => "int",
            Self::I64 => "long",
            Self::U8 => "ubyte",
            Self::U16 => "ushort",
            Self::U32 => "uint",
            Self::U64 => "ulong",
            Self::CF32 => "complex",
            Self::CF64 => "dcomplex",
            Self::CI8 => "bcomplex",
            Self::CI16 => "scomplex",
            Self::CI32 => "icomplex",
            Self::CI64 => "lcomplex",
            Self::CU8 => "ubcomplex",
            Self::CU16 => "uscomplex",
            Self::CU32 => "uicomplex",
            Self::CU64 => "ulcomplex",
            Self::VString => "vstring",
            Self::FString => "fstring",
            Self::Array => "array",
            Self::List => "list",
        }
    }

    /// Look a tag up by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Inline byte width of one value.
    ///
    /// Zero for tags that are not stored inline (strings, nested arrays,
    /// nested lists, the truncation sentinel).
    pub const fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 | Self::CI8 | Self::CU8 => 2,
            Self::F32 | Self::I32 | Self::U32 | Self::CI16 | Self::CU16 => 4,
            Self::F64 | Self::I64 | Self::U64 | Self::CF32 | Self::CI32 | Self::CU32 => 8,
            Self::CF64 | Self::CI64 | Self::CU64 => 16,
            Self::None | Self::VString | Self::FString | Self::Array | Self::List => 0,
        }
    }

    /// Scalar type of one half of a complex value; numeric scalars map to
    /// themselves and every other tag to `None`.
    pub const fn component_type(self) -> Option<Self> {
        match self {
            Self::CF32 => Some(Self::F32),
            Self::CF64 => Some(Self::F64),
            Self::CI8 => Some(Self::I8),
            Self::CI16 => Some(Self::I16),
            Self::CI32 => Some(Self::I32),
            Self::CI64 => Some(Self::I64),
            Self::CU8 => Some(Self::U8),
            Self::CU16 => Some(Self::U16),
            Self::CU32 => Some(Self::U32),
            Self::CU64 => Some(Self::U64),
            Self::F32
            | Self::F64
            | Self::I8
            | Self::I16
            | Self::I32
            | Self::I64
            | Self::U8
            | Self::U16
            | Self::U32
            | Self::U64 => Some(self),
            Self::None | Self::VString | Self::FString | Self::Array | Self::List => None,
        }
    }

    /// Pre-computed classification of this tag.
    pub const fn flags(self) -> TypeFlags {
        match self {
            Self::F32 | Self::F64 => TypeFlags::FLOAT
                .union(TypeFlags::SIGNED)
                .union(TypeFlags::INLINE),
            Self::I8 | Self::I16 | Self::I32 | Self::I64 => TypeFlags::INTEGER
                .union(TypeFlags::SIGNED)
                .union(TypeFlags::INLINE),
            Self::U8 | Self::U16 | Self::U32 | Self::U64 => {
                TypeFlags::INTEGER.union(TypeFlags::INLINE)
            }
            Self::CF32 | Self::CF64 => TypeFlags::FLOAT
                .union(TypeFlags::SIGNED)
                .union(TypeFlags::COMPLEX)
                .union(TypeFlags::INLINE),
            Self::CI8 | Self::CI16 | Self::CI32 | Self::CI64 => TypeFlags::INTEGER
                .union(TypeFlags::SIGNED)
                .union(TypeFlags::COMPLEX)
                .union(TypeFlags::INLINE),
            Self::CU8 | Self::CU16 | Self::CU32 | Self::CU64 => TypeFlags::INTEGER
                .union(TypeFlags::COMPLEX)
                .union(TypeFlags::INLINE),
            Self::VString | Self::FString => TypeFlags::STRING,
            Self::Array | Self::List => TypeFlags::NESTED,
            Self::None => TypeFlags::empty(),
        }
    }

    /// Numeric value stored inline (scalar or complex).
    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.flags().contains(TypeFlags::INLINE)
    }

    #[inline]
    pub const fn is_complex(self) -> bool {
        self.flags().contains(TypeFlags::COMPLEX)
    }

    #[inline]
    pub const fn is_string(self) -> bool {
        self.flags().contains(TypeFlags::STRING)
    }

    /// Nested array or nested list.
    #[inline]
    pub const fn is_nested(self) -> bool {
        self.flags().contains(TypeFlags::NESTED)
    }

    /// Atomic in the packet sense: a value with a name, not a nested
    /// structure. Strings count as atomic.
    #[inline]
    pub const fn is_atomic(self) -> bool {
        self.flags().intersects(TypeFlags::INLINE.union(TypeFlags::STRING))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
