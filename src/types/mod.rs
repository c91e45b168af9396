//! Type-bits model
//!
//! A [`CType`] is the union of four independent bitmasks: the base type
//! (`unsigned long`), the storage class and specifiers (`static inline`), the
//! qualifiers (`const volatile`) and the attributes (`[[nodiscard]]`).
//!
//! - [`CType::add`] merges bits while a declaration is parsed and rejects
//!   duplicates and conflicting storage classes up front.
//! - [`CType::check`] reports the set of languages in which an otherwise
//!   well-formed combination is illegal.
//! - [`names`] renders bits in C or pseudo-English.

pub mod bits;
pub mod names;

pub use bits::{Attr, Base, Qual, Storage};

use crate::ast::SourceLocation;
use crate::lang::Lang;
use bits::{ATTR_INFO, BASE_INFO, QUAL_INFO, STORAGE_INFO};
use std::ops::BitOr;
use thiserror::Error;

/// Type-bit conflicts found while merging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("\"{name}\" can not be repeated")]
    Duplicate { name: String, location: SourceLocation },

    #[error("\"{new}\" is incompatible with \"{existing}\"")]
    IncompatibleStorage {
        new: String,
        existing: String,
        location: SourceLocation,
    },
}

impl TypeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            TypeError::Duplicate { location, .. }
            | TypeError::IncompatibleStorage { location, .. } => *location,
        }
    }
}

/// The complete type bits of one AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CType {
    pub base: Base,
    pub storage: Storage,
    pub qual: Qual,
    pub attr: Attr,
}

/// Storage pairs that are illegal together, and where they are legal.
const STORAGE_COMBOS: &[(Storage, Storage, Lang)] = &[
    (Storage::TYPEDEF, Storage::INLINE, Lang::empty()),
    (Storage::VIRTUAL, Storage::STATIC, Lang::empty()),
    (Storage::VIRTUAL, Storage::FRIEND, Lang::empty()),
    (Storage::VIRTUAL, Storage::CONSTEVAL, Lang::empty()),
    (Storage::VIRTUAL, Storage::CONSTEXPR, Lang::cpp_min(Lang::CPP_20)),
    (Storage::EXPLICIT, Storage::FRIEND, Lang::empty()),
    (Storage::CONSTEXPR, Storage::CONSTINIT, Lang::empty()),
    (Storage::CONSTEVAL, Storage::CONSTEXPR, Lang::empty()),
    (Storage::CONSTEVAL, Storage::CONSTINIT, Lang::empty()),
    (Storage::NOEXCEPT, Storage::THROW, Lang::empty()),
    (Storage::DEFAULT, Storage::DELETE, Lang::empty()),
    (Storage::PURE_VIRTUAL, Storage::DEFAULT, Lang::empty()),
    (Storage::PURE_VIRTUAL, Storage::DELETE, Lang::empty()),
    (Storage::OVERRIDE, Storage::STATIC, Lang::empty()),
    (Storage::FINAL, Storage::STATIC, Lang::empty()),
];

impl CType {
    pub const NONE: CType = CType {
        base: Base::empty(),
        storage: Storage::empty(),
        qual: Qual::empty(),
        attr: Attr::empty(),
    };

    pub const fn from_base(base: Base) -> CType {
        CType {
            base,
            ..CType::NONE
        }
    }

    pub const fn from_storage(storage: Storage) -> CType {
        CType {
            storage,
            ..CType::NONE
        }
    }

    pub const fn from_qual(qual: Qual) -> CType {
        CType {
            qual,
            ..CType::NONE
        }
    }

    pub const fn from_attr(attr: Attr) -> CType {
        CType {
            attr,
            ..CType::NONE
        }
    }

    pub fn is_none(&self) -> bool {
        *self == CType::NONE
    }

    /// Merges `new` into `self`.
    ///
    /// A base type that is already present is a duplicate except for the
    /// long chain: `long` + `long` becomes `long long`; a third `long` is a
    /// duplicate. Repeated qualifiers and attributes are harmless. At most one
    /// storage class may be given; `thread_local` only combines with `static`
    /// and `extern`. On error `self` is left unchanged.
    pub fn add(&mut self, new: CType, location: SourceLocation) -> Result<(), TypeError> {
        let mut base = self.base;
        let mut new_base = new.base;

        if new_base.intersects(Base::LONG | Base::LONG_LONG) {
            if base.contains(Base::LONG_LONG)
                || (base.contains(Base::LONG) && new_base.contains(Base::LONG_LONG))
            {
                return Err(TypeError::Duplicate {
                    name: "long".to_string(),
                    location,
                });
            }
            if base.contains(Base::LONG) {
                base.remove(Base::LONG);
                new_base.remove(Base::LONG);
                new_base.insert(Base::LONG_LONG);
            }
        }

        let dup_base = base & new_base;
        if !dup_base.is_empty() {
            return Err(TypeError::Duplicate {
                name: names::base_english(dup_base),
                location,
            });
        }

        let dup_storage = self.storage & new.storage;
        if !dup_storage.is_empty() {
            return Err(TypeError::Duplicate {
                name: names::storage_c(dup_storage, Lang::ANY).join(" "),
                location,
            });
        }

        if let Some((n, e)) = storage_conflict(new.storage, self.storage) {
            return Err(TypeError::IncompatibleStorage {
                new: names::storage_c(n, Lang::ANY).join(" "),
                existing: names::storage_c(e, Lang::ANY).join(" "),
                location,
            });
        }

        self.base = base | new_base;
        self.storage |= new.storage;
        self.qual |= new.qual;
        self.attr |= new.attr;
        Ok(())
    }

    /// Returns the set of languages in which this combination is illegal.
    /// An empty set means it is legal everywhere.
    pub fn check(&self) -> Lang {
        let mut legal = Lang::ANY;
        for info in BASE_INFO.iter().filter(|i| self.base.contains(i.flag)) {
            legal &= info.legal;
        }
        for info in STORAGE_INFO.iter().filter(|i| self.storage.contains(i.flag)) {
            legal &= info.legal;
        }
        for info in QUAL_INFO.iter().filter(|i| self.qual.contains(i.flag)) {
            legal &= info.legal;
        }
        for info in ATTR_INFO.iter().filter(|i| self.attr.contains(i.flag)) {
            legal &= info.legal;
        }
        legal &= check_base_combo(self.base);
        for (a, b, ok) in STORAGE_COMBOS {
            if self.storage.contains(*a | *b) {
                legal &= *ok;
            }
        }
        if self.storage.contains(Storage::MUTABLE) && self.qual.contains(Qual::CONST) {
            legal = Lang::empty();
        }
        Lang::ANY - legal
    }

    /// Base bits with redundant spellings folded: `signed int` is `int`,
    /// `long int` is `long`, `unsigned int` is `unsigned`.
    pub fn normalize_base(base: Base) -> Base {
        let mut b = base;
        if b.contains(Base::SIGNED) && !b.contains(Base::CHAR) {
            b.remove(Base::SIGNED);
            if !b.intersects(Base::SHORT | Base::LONG | Base::LONG_LONG) {
                b.insert(Base::INT);
            }
        }
        if b.contains(Base::INT)
            && b.intersects(Base::SHORT | Base::LONG | Base::LONG_LONG | Base::UNSIGNED)
        {
            b.remove(Base::INT);
        }
        b
    }

    /// Whether two types denote the same type, ignoring redundant spellings.
    pub fn equiv(&self, other: &CType) -> bool {
        CType::normalize_base(self.base) == CType::normalize_base(other.base)
            && self.storage == other.storage
            && self.qual == other.qual
            && self.attr == other.attr
    }

    /// Removes and returns the storage-class bits and attributes, which belong
    /// to the declared entity rather than to a type.
    pub fn take_storage(&mut self) -> CType {
        let taken = CType {
            storage: self.storage,
            attr: self.attr,
            ..CType::NONE
        };
        self.storage = Storage::empty();
        self.attr = Attr::empty();
        taken
    }
}

impl BitOr for CType {
    type Output = CType;

    fn bitor(self, rhs: CType) -> CType {
        CType {
            base: self.base | rhs.base,
            storage: self.storage | rhs.storage,
            qual: self.qual | rhs.qual,
            attr: self.attr | rhs.attr,
        }
    }
}

/// Finds a pair of storage bits (new, existing) that can not coexist.
fn storage_conflict(new: Storage, existing: Storage) -> Option<(Storage, Storage)> {
    let new_class = new & Storage::CLASSES;
    let old_class = existing & Storage::CLASSES;
    if !new_class.is_empty() && !old_class.is_empty() {
        return Some((new_class, old_class));
    }
    let exclusive = Storage::AUTO | Storage::REGISTER | Storage::TYPEDEF | Storage::MUTABLE;
    if new.contains(Storage::THREAD_LOCAL) && existing.intersects(exclusive) {
        return Some((Storage::THREAD_LOCAL, existing & exclusive));
    }
    if existing.contains(Storage::THREAD_LOCAL) && new.intersects(exclusive) {
        return Some((new & exclusive, Storage::THREAD_LOCAL));
    }
    None
}

/// Languages in which a combination of base bits is legal.
fn check_base_combo(base: Base) -> Lang {
    let core = base - Base::MODIFIERS - Base::COMPLEX - Base::IMAGINARY;

    if base.contains(Base::SIGNEDNESS) {
        return Lang::empty();
    }
    if core.bits().count_ones() > 1 {
        let enum_class = core == Base::ENUM | Base::CLASS || core == Base::ENUM | Base::STRUCT;
        return if enum_class {
            Lang::cpp_min(Lang::CPP_11)
        } else {
            Lang::empty()
        };
    }
    if base.contains(Base::TYPEDEF) && base != Base::TYPEDEF {
        return Lang::empty();
    }
    if base.intersects(Base::SIGNEDNESS) && !(core.is_empty() || core == Base::CHAR || core == Base::INT) {
        return Lang::empty();
    }
    if base.contains(Base::SHORT) {
        if base.intersects(Base::LONG | Base::LONG_LONG) {
            return Lang::empty();
        }
        if !(core.is_empty() || core == Base::INT) {
            return Lang::empty();
        }
    }
    if base.contains(Base::LONG) {
        if base.contains(Base::LONG_LONG) {
            return Lang::empty();
        }
        if core == Base::FLOAT {
            return Lang::C_KNR;
        }
        if !(core.is_empty() || core == Base::INT || core == Base::DOUBLE) {
            return Lang::empty();
        }
    }
    if base.contains(Base::LONG_LONG) && !(core.is_empty() || core == Base::INT) {
        return Lang::empty();
    }
    if base.intersects(Base::COMPLEX | Base::IMAGINARY) {
        if base.contains(Base::COMPLEX | Base::IMAGINARY) {
            return Lang::empty();
        }
        if !(core == Base::FLOAT || core == Base::DOUBLE) {
            return Lang::empty();
        }
        if base.intersects(Base::SIGNEDNESS | Base::SHORT | Base::LONG_LONG) {
            return Lang::empty();
        }
    }
    Lang::ANY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    fn base(b: Base) -> CType {
        CType::from_base(b)
    }

    #[test]
    fn test_long_chain() {
        let mut t = base(Base::LONG);
        t.add(base(Base::LONG), loc()).unwrap();
        assert_eq!(t.base, Base::LONG_LONG);
        t.add(base(Base::INT), loc()).unwrap();
        assert_eq!(t.base, Base::LONG_LONG | Base::INT);

        let err = t.add(base(Base::LONG), loc()).unwrap_err();
        assert!(matches!(err, TypeError::Duplicate { .. }));
        assert_eq!(t.base, Base::LONG_LONG | Base::INT);
    }

    #[test]
    fn test_int_then_long() {
        let mut t = base(Base::INT);
        t.add(base(Base::LONG), loc()).unwrap();
        assert_eq!(t.base, Base::INT | Base::LONG);
    }

    #[test]
    fn test_duplicate_base() {
        let mut t = base(Base::INT);
        let err = t.add(base(Base::INT), loc()).unwrap_err();
        assert_eq!(err.to_string(), "\"int\" can not be repeated");
    }

    #[test]
    fn test_repeated_qualifier_is_idempotent() {
        let mut t = CType::from_qual(Qual::CONST);
        t.add(CType::from_qual(Qual::CONST), loc()).unwrap();
        t.add(base(Base::INT), loc()).unwrap();
        assert_eq!(t.qual, Qual::CONST);
        assert_eq!(t.base, Base::INT);
    }

    #[test]
    fn test_incompatible_storage() {
        let mut t = CType::from_storage(Storage::EXTERN);
        let err = t.add(CType::from_storage(Storage::STATIC), loc()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"static\" is incompatible with \"extern\""
        );

        let mut t = CType::from_storage(Storage::STATIC);
        t.add(CType::from_storage(Storage::THREAD_LOCAL), loc()).unwrap();
        let mut t = CType::from_storage(Storage::REGISTER);
        assert!(t.add(CType::from_storage(Storage::THREAD_LOCAL), loc()).is_err());
    }

    #[test]
    fn test_check_languages() {
        let complex = base(Base::COMPLEX | Base::DOUBLE);
        assert_eq!(complex.check(), Lang::ANY - Lang::c_min(Lang::C_99));

        let long_long = base(Base::LONG_LONG);
        assert!(long_long.check().contains(Lang::C_89));
        assert!(!long_long.check().contains(Lang::CPP_11));

        let typedef_inline = CType::from_storage(Storage::TYPEDEF | Storage::INLINE);
        assert_eq!(typedef_inline.check(), Lang::ANY);

        assert!(base(Base::UNSIGNED | Base::CHAR).check().is_empty());
        assert_eq!(base(Base::SIGNED | Base::UNSIGNED).check(), Lang::ANY);
        assert_eq!(base(Base::SHORT | Base::LONG).check(), Lang::ANY);
        assert_eq!(base(Base::LONG | Base::FLOAT).check(), Lang::ANY - Lang::C_KNR);
        assert_eq!(base(Base::INT | Base::CHAR).check(), Lang::ANY);
        assert_eq!(
            base(Base::ENUM | Base::CLASS).check(),
            Lang::ANY - Lang::cpp_min(Lang::CPP_11)
        );
        assert_eq!(base(Base::COMPLEX | Base::INT).check(), Lang::ANY);
    }

    #[test]
    fn test_normalize() {
        assert!(base(Base::SIGNED | Base::INT).equiv(&base(Base::INT)));
        assert!(base(Base::LONG | Base::INT).equiv(&base(Base::LONG)));
        assert!(base(Base::UNSIGNED).equiv(&base(Base::UNSIGNED | Base::INT)));
        assert!(!base(Base::SIGNED | Base::CHAR).equiv(&base(Base::CHAR)));
    }

    #[test]
    fn test_take_storage() {
        let mut t = CType {
            base: Base::INT,
            storage: Storage::STATIC,
            qual: Qual::CONST,
            attr: Attr::NODISCARD,
        };
        let taken = t.take_storage();
        assert_eq!(taken.storage, Storage::STATIC);
        assert_eq!(taken.attr, Attr::NODISCARD);
        assert_eq!(t, CType::from_base(Base::INT) | CType::from_qual(Qual::CONST));
    }
}
