//! The four bitmasks making up a [`CType`](super::CType) and the per-bit
//! tables (spellings, legal languages, print order).

use crate::lang::Lang;
use bitflags::bitflags;

bitflags! {
    /// Base types and type modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Base: u32 {
        const VOID      = 1 << 0;
        const AUTO      = 1 << 1;
        const BOOL      = 1 << 2;
        const CHAR      = 1 << 3;
        const CHAR8_T   = 1 << 4;
        const CHAR16_T  = 1 << 5;
        const CHAR32_T  = 1 << 6;
        const WCHAR_T   = 1 << 7;
        const SHORT     = 1 << 8;
        const INT       = 1 << 9;
        const LONG      = 1 << 10;
        const LONG_LONG = 1 << 11;
        const SIGNED    = 1 << 12;
        const UNSIGNED  = 1 << 13;
        const FLOAT     = 1 << 14;
        const DOUBLE    = 1 << 15;
        const COMPLEX   = 1 << 16;
        const IMAGINARY = 1 << 17;
        const ENUM      = 1 << 18;
        const STRUCT    = 1 << 19;
        const UNION     = 1 << 20;
        const CLASS     = 1 << 21;
        const NAMESPACE = 1 << 22;
        const SCOPE     = 1 << 23;
        const TYPEDEF   = 1 << 24;

        /// Bits that only modify another base type.
        const MODIFIERS = Self::SHORT.bits() | Self::LONG.bits()
            | Self::LONG_LONG.bits() | Self::SIGNED.bits()
            | Self::UNSIGNED.bits();
        const SIGNEDNESS = Self::SIGNED.bits() | Self::UNSIGNED.bits();
        const CLASS_STRUCT_UNION = Self::STRUCT.bits() | Self::UNION.bits()
            | Self::CLASS.bits();
        /// Bits that may name a scope in a scoped name.
        const ANY_SCOPE = Self::CLASS_STRUCT_UNION.bits() | Self::ENUM.bits()
            | Self::NAMESPACE.bits() | Self::SCOPE.bits();
        const INTEGRAL = Self::BOOL.bits() | Self::CHAR.bits()
            | Self::CHAR8_T.bits() | Self::CHAR16_T.bits()
            | Self::CHAR32_T.bits() | Self::WCHAR_T.bits()
            | Self::SHORT.bits() | Self::INT.bits() | Self::LONG.bits()
            | Self::LONG_LONG.bits() | Self::SIGNED.bits()
            | Self::UNSIGNED.bits();
    }
}

bitflags! {
    /// Storage classes and the function/object specifiers that share their
    /// syntactic position.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Storage: u32 {
        const AUTO         = 1 << 0;
        const EXTERN       = 1 << 1;
        const REGISTER     = 1 << 2;
        const STATIC       = 1 << 3;
        const THREAD_LOCAL = 1 << 4;
        const TYPEDEF      = 1 << 5;
        const MUTABLE      = 1 << 6;
        const FRIEND       = 1 << 7;
        const INLINE       = 1 << 8;
        const EXPLICIT     = 1 << 9;
        const VIRTUAL      = 1 << 10;
        const PURE_VIRTUAL = 1 << 11;
        const OVERRIDE     = 1 << 12;
        const FINAL        = 1 << 13;
        const CONSTEXPR    = 1 << 14;
        const CONSTEVAL    = 1 << 15;
        const CONSTINIT    = 1 << 16;
        const NOEXCEPT     = 1 << 17;
        const THROW        = 1 << 18;
        const DEFAULT      = 1 << 19;
        const DELETE       = 1 << 20;

        /// At most one of these may be given.
        const CLASSES = Self::AUTO.bits() | Self::EXTERN.bits()
            | Self::REGISTER.bits() | Self::STATIC.bits()
            | Self::TYPEDEF.bits() | Self::MUTABLE.bits();
        /// Specifiers printed after a function's parameter list.
        const FUNC_TRAILER = Self::PURE_VIRTUAL.bits() | Self::OVERRIDE.bits()
            | Self::FINAL.bits() | Self::NOEXCEPT.bits() | Self::THROW.bits()
            | Self::DEFAULT.bits() | Self::DELETE.bits();
        /// Specifiers that only make sense on functions.
        const FUNC_ONLY = Self::EXPLICIT.bits() | Self::VIRTUAL.bits()
            | Self::CONSTEVAL.bits() | Self::FUNC_TRAILER.bits();
        /// Specifiers that make a function a member function.
        const MEMBER_ONLY = Self::VIRTUAL.bits() | Self::PURE_VIRTUAL.bits()
            | Self::OVERRIDE.bits() | Self::FINAL.bits()
            | Self::EXPLICIT.bits();
    }
}

bitflags! {
    /// Type qualifiers, member-function ref-qualifiers and array `static`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Qual: u32 {
        const CONST            = 1 << 0;
        const VOLATILE         = 1 << 1;
        const RESTRICT         = 1 << 2;
        const ATOMIC           = 1 << 3;
        const REFERENCE        = 1 << 4;
        const RVALUE_REFERENCE = 1 << 5;
        const NON_EMPTY        = 1 << 6;

        const CV = Self::CONST.bits() | Self::VOLATILE.bits();
        const CVR = Self::CV.bits() | Self::RESTRICT.bits();
        const REF_QUALIFIERS = Self::REFERENCE.bits()
            | Self::RVALUE_REFERENCE.bits();
    }
}

bitflags! {
    /// `[[attribute]]`s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u32 {
        const CARRIES_DEPENDENCY = 1 << 0;
        const DEPRECATED         = 1 << 1;
        const MAYBE_UNUSED       = 1 << 2;
        const NODISCARD          = 1 << 3;
        const NORETURN           = 1 << 4;
        const NO_UNIQUE_ADDRESS  = 1 << 5;
    }
}

/// Spelling and legality of one bit.
#[derive(Debug, Clone, Copy)]
pub struct BitInfo<F: 'static> {
    pub flag: F,
    /// C/C++ spelling.
    pub c: &'static str,
    /// Pseudo-English spelling.
    pub english: &'static str,
    /// Languages in which the bit may appear at all.
    pub legal: Lang,
}

const fn info<F>(flag: F, c: &'static str, english: &'static str, legal: Lang) -> BitInfo<F> {
    BitInfo {
        flag,
        c,
        english,
        legal,
    }
}

const C99_OR_CPP: Lang = Lang::c_min(Lang::C_99).union(Lang::CPP_ANY);
const CPP11: Lang = Lang::cpp_min(Lang::CPP_11);

/// Base bits in print order: signedness, then length, then everything else.
pub const BASE_INFO: &[BitInfo<Base>] = &[
    info(Base::SIGNED, "signed", "signed", Lang::min(Lang::C_89)),
    info(Base::UNSIGNED, "unsigned", "unsigned", Lang::ANY),
    info(Base::SHORT, "short", "short", Lang::ANY),
    info(Base::LONG, "long", "long", Lang::ANY),
    info(
        Base::LONG_LONG,
        "long long",
        "long long",
        Lang::c_min(Lang::C_99).union(CPP11),
    ),
    info(Base::VOID, "void", "void", Lang::min(Lang::C_89)),
    info(
        Base::AUTO,
        "auto",
        "auto",
        Lang::C_23.union(CPP11),
    ),
    info(Base::BOOL, "bool", "bool", C99_OR_CPP),
    info(Base::CHAR, "char", "char", Lang::ANY),
    info(
        Base::CHAR8_T,
        "char8_t",
        "char8_t",
        Lang::C_23.union(Lang::cpp_min(Lang::CPP_20)),
    ),
    info(
        Base::CHAR16_T,
        "char16_t",
        "char16_t",
        Lang::c_min(Lang::C_11).union(CPP11),
    ),
    info(
        Base::CHAR32_T,
        "char32_t",
        "char32_t",
        Lang::c_min(Lang::C_11).union(CPP11),
    ),
    info(
        Base::WCHAR_T,
        "wchar_t",
        "wchar_t",
        Lang::c_min(Lang::C_95).union(Lang::CPP_ANY),
    ),
    info(Base::INT, "int", "int", Lang::ANY),
    info(Base::FLOAT, "float", "float", Lang::ANY),
    info(Base::DOUBLE, "double", "double", Lang::ANY),
    info(Base::COMPLEX, "_Complex", "complex", Lang::c_min(Lang::C_99)),
    info(Base::IMAGINARY, "_Imaginary", "imaginary", Lang::c_min(Lang::C_99)),
    info(Base::ENUM, "enum", "enum", Lang::min(Lang::C_89)),
    info(Base::STRUCT, "struct", "struct", Lang::ANY),
    info(Base::UNION, "union", "union", Lang::ANY),
    info(Base::CLASS, "class", "class", Lang::CPP_ANY),
    info(Base::NAMESPACE, "namespace", "namespace", Lang::CPP_ANY),
    info(Base::SCOPE, "scope", "scope", Lang::ANY),
    info(Base::TYPEDEF, "typedef", "type", Lang::ANY),
];

/// Storage bits in print order.
pub const STORAGE_INFO: &[BitInfo<Storage>] = &[
    info(Storage::DEFAULT, "default", "default", CPP11),
    info(Storage::DELETE, "delete", "deleted", CPP11),
    info(Storage::FRIEND, "friend", "friend", Lang::CPP_ANY),
    info(Storage::TYPEDEF, "typedef", "type", Lang::ANY),
    info(
        Storage::AUTO,
        "auto",
        "automatic",
        Lang::c_max(Lang::C_17).union(Lang::cpp_max(Lang::CPP_03)),
    ),
    info(Storage::EXTERN, "extern", "external", Lang::ANY),
    info(
        Storage::REGISTER,
        "register",
        "register",
        Lang::C_ANY.union(Lang::cpp_max(Lang::CPP_14)),
    ),
    info(Storage::MUTABLE, "mutable", "mutable", Lang::CPP_ANY),
    info(Storage::STATIC, "static", "static", Lang::ANY),
    info(
        Storage::THREAD_LOCAL,
        "thread_local",
        "thread local",
        Lang::c_min(Lang::C_11).union(CPP11),
    ),
    info(Storage::EXPLICIT, "explicit", "explicit", Lang::CPP_ANY),
    info(Storage::INLINE, "inline", "inline", C99_OR_CPP),
    info(Storage::CONSTEVAL, "consteval", "consteval", Lang::cpp_min(Lang::CPP_20)),
    info(
        Storage::CONSTEXPR,
        "constexpr",
        "constexpr",
        Lang::C_23.union(CPP11),
    ),
    info(Storage::CONSTINIT, "constinit", "constinit", Lang::cpp_min(Lang::CPP_20)),
    info(Storage::OVERRIDE, "override", "overridden", CPP11),
    info(Storage::FINAL, "final", "final", CPP11),
    info(Storage::PURE_VIRTUAL, "= 0", "pure", Lang::CPP_ANY),
    info(Storage::VIRTUAL, "virtual", "virtual", Lang::CPP_ANY),
    info(Storage::NOEXCEPT, "noexcept", "non-throwing", CPP11),
    info(
        Storage::THROW,
        "throw()",
        "non-throwing",
        Lang::cpp_max(Lang::CPP_17),
    ),
];

/// Qualifier bits in print order.
pub const QUAL_INFO: &[BitInfo<Qual>] = &[
    info(Qual::NON_EMPTY, "static", "non-empty", Lang::c_min(Lang::C_99)),
    info(
        Qual::ATOMIC,
        "_Atomic",
        "atomic",
        Lang::c_min(Lang::C_11).union(Lang::CPP_23),
    ),
    info(Qual::CONST, "const", "const", Lang::min(Lang::C_89)),
    info(Qual::RESTRICT, "restrict", "restricted", Lang::c_min(Lang::C_99)),
    info(Qual::VOLATILE, "volatile", "volatile", Lang::min(Lang::C_89)),
    info(Qual::REFERENCE, "&", "reference", CPP11),
    info(Qual::RVALUE_REFERENCE, "&&", "rvalue reference", CPP11),
];

/// Attribute bits in print order.
pub const ATTR_INFO: &[BitInfo<Attr>] = &[
    info(
        Attr::CARRIES_DEPENDENCY,
        "carries_dependency",
        "carries dependency",
        CPP11,
    ),
    info(
        Attr::DEPRECATED,
        "deprecated",
        "deprecated",
        Lang::C_23.union(Lang::cpp_min(Lang::CPP_14)),
    ),
    info(
        Attr::MAYBE_UNUSED,
        "maybe_unused",
        "maybe unused",
        Lang::C_23.union(Lang::cpp_min(Lang::CPP_17)),
    ),
    info(
        Attr::NODISCARD,
        "nodiscard",
        "non-discardable",
        Lang::C_23.union(Lang::cpp_min(Lang::CPP_17)),
    ),
    info(
        Attr::NORETURN,
        "noreturn",
        "non-returning",
        Lang::c_min(Lang::C_11).union(CPP11),
    ),
    info(
        Attr::NO_UNIQUE_ADDRESS,
        "no_unique_address",
        "no unique address",
        Lang::cpp_min(Lang::CPP_20),
    ),
];

/// Looks up the table entry of a single bit.
pub fn lookup<F>(table: &'static [BitInfo<F>], flag: F) -> Option<&'static BitInfo<F>>
where
    F: PartialEq + Copy + 'static,
{
    table.iter().find(|i| i.flag == flag)
}
