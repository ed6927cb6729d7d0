use crate::ElementType;

use super::*;

#[test]
fn flags_size() {
    assert_eq!(std::mem::size_of::<TypeFlags>(), 2);
}

#[test]
fn numeric_tags_are_convertible() {
    for ty in ElementType::ALL {
        assert_eq!(ty.flags().is_convertible(), ty.is_numeric(), "{ty}");
    }
}

#[test]
fn categories_are_disjoint() {
    for ty in ElementType::ALL {
        let flags = ty.flags();
        let categories = [
            flags.contains(TypeFlags::INLINE),
            flags.contains(TypeFlags::STRING),
            flags.contains(TypeFlags::NESTED),
        ];
        assert!(categories.iter().filter(|set| **set).count() <= 1, "{ty}");
    }
}

#[test]
fn unsigned_integers_are_not_signed() {
    assert!(!ElementType::U16.flags().contains(TypeFlags::SIGNED));
    assert!(!ElementType::CU8.flags().contains(TypeFlags::SIGNED));
    assert!(ElementType::CI8.flags().contains(TypeFlags::SIGNED));
    assert!(ElementType::F32.flags().contains(TypeFlags::SIGNED));
}
