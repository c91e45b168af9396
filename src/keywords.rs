//! C/C++ keywords and pseudo-English synonyms.

use crate::lang::Lang;
use crate::types::{Base, CType, Qual, Storage};

/// A C or C++ keyword and what it contributes to a type, if anything.
#[derive(Debug, Clone, Copy)]
pub struct CKeyword {
    pub literal: &'static str,
    pub ty: CType,
    /// Languages in which this is a keyword.
    pub langs: Lang,
}

const fn base(literal: &'static str, b: Base, langs: Lang) -> CKeyword {
    CKeyword {
        literal,
        ty: CType::from_base(b),
        langs,
    }
}

const fn storage(literal: &'static str, s: Storage, langs: Lang) -> CKeyword {
    CKeyword {
        literal,
        ty: CType::from_storage(s),
        langs,
    }
}

const fn qual(literal: &'static str, q: Qual, langs: Lang) -> CKeyword {
    CKeyword {
        literal,
        ty: CType::from_qual(q),
        langs,
    }
}

const fn other(literal: &'static str, langs: Lang) -> CKeyword {
    CKeyword {
        literal,
        ty: CType::NONE,
        langs,
    }
}

const ANY: Lang = Lang::ANY;
const CPP: Lang = Lang::CPP_ANY;
const C99: Lang = Lang::c_min(Lang::C_99);
const C11: Lang = Lang::c_min(Lang::C_11);
const C23: Lang = Lang::C_23;
const CPP11: Lang = Lang::cpp_min(Lang::CPP_11);
const CPP20: Lang = Lang::cpp_min(Lang::CPP_20);
const C89_UP: Lang = Lang::min(Lang::C_89);

/// Every keyword. `auto` appears twice: it is a storage class before C23 and
/// C++11 and a type afterwards.
pub const C_KEYWORDS: &[CKeyword] = &[
    base("void", Base::VOID, C89_UP),
    base("bool", Base::BOOL, C23.union(CPP)),
    base("_Bool", Base::BOOL, C99),
    base("char", Base::CHAR, ANY),
    base("char8_t", Base::CHAR8_T, C23.union(CPP20)),
    base("char16_t", Base::CHAR16_T, C23.union(CPP11)),
    base("char32_t", Base::CHAR32_T, C23.union(CPP11)),
    base("wchar_t", Base::WCHAR_T, CPP),
    base("short", Base::SHORT, ANY),
    base("int", Base::INT, ANY),
    base("long", Base::LONG, ANY),
    base("signed", Base::SIGNED, C89_UP),
    base("unsigned", Base::UNSIGNED, ANY),
    base("float", Base::FLOAT, ANY),
    base("double", Base::DOUBLE, ANY),
    base("_Complex", Base::COMPLEX, C99),
    base("_Imaginary", Base::IMAGINARY, C99),
    base("auto", Base::AUTO, C23.union(CPP11)),
    base("enum", Base::ENUM, C89_UP),
    base("struct", Base::STRUCT, ANY),
    base("union", Base::UNION, ANY),
    base("class", Base::CLASS, CPP),
    storage(
        "auto",
        Storage::AUTO,
        Lang::c_max(Lang::C_17).union(Lang::cpp_max(Lang::CPP_03)),
    ),
    storage("extern", Storage::EXTERN, ANY),
    storage("register", Storage::REGISTER, ANY),
    storage("static", Storage::STATIC, ANY),
    storage("typedef", Storage::TYPEDEF, ANY),
    storage("thread_local", Storage::THREAD_LOCAL, C23.union(CPP11)),
    storage("_Thread_local", Storage::THREAD_LOCAL, C11),
    storage("mutable", Storage::MUTABLE, CPP),
    storage("friend", Storage::FRIEND, CPP),
    storage("inline", Storage::INLINE, C99.union(CPP)),
    storage("explicit", Storage::EXPLICIT, CPP),
    storage("virtual", Storage::VIRTUAL, CPP),
    storage("constexpr", Storage::CONSTEXPR, C23.union(CPP11)),
    storage("consteval", Storage::CONSTEVAL, CPP20),
    storage("constinit", Storage::CONSTINIT, CPP20),
    storage("noexcept", Storage::NOEXCEPT, CPP11),
    storage("throw", Storage::THROW, CPP),
    qual("const", Qual::CONST, C89_UP),
    qual("volatile", Qual::VOLATILE, C89_UP),
    qual("restrict", Qual::RESTRICT, C99),
    qual("_Atomic", Qual::ATOMIC, C11.union(Lang::CPP_23)),
    other("alignas", C23.union(CPP11)),
    other("break", ANY),
    other("case", ANY),
    other("catch", CPP),
    other("concept", CPP20),
    other("const_cast", CPP),
    other("continue", ANY),
    other("co_await", CPP20),
    other("co_return", CPP20),
    other("co_yield", CPP20),
    other("decltype", CPP11),
    other("default", ANY),
    other("delete", CPP),
    other("do", ANY),
    other("dynamic_cast", CPP),
    other("else", ANY),
    other("export", CPP),
    other("false", C23.union(CPP)),
    other("for", ANY),
    other("goto", ANY),
    other("if", ANY),
    other("namespace", CPP),
    other("new", CPP),
    other("nullptr", C23.union(CPP11)),
    other("operator", CPP),
    other("private", CPP),
    other("protected", CPP),
    other("public", CPP),
    other("reinterpret_cast", CPP),
    other("requires", CPP20),
    other("return", ANY),
    other("sizeof", ANY),
    other("static_assert", C23.union(CPP11)),
    other("static_cast", CPP),
    other("switch", ANY),
    other("template", CPP),
    other("this", CPP),
    other("true", C23.union(CPP)),
    other("try", CPP),
    other("typeid", CPP),
    other("typename", CPP),
    other("using", CPP),
    other("while", ANY),
];

/// Finds `literal` as a keyword of `lang`.
pub fn c_keyword(literal: &str, lang: Lang) -> Option<&'static CKeyword> {
    C_KEYWORDS
        .iter()
        .find(|k| k.literal == literal && k.langs.contains(lang))
}

/// All languages in which `literal` is a keyword.
pub fn keyword_langs(literal: &str) -> Lang {
    C_KEYWORDS
        .iter()
        .filter(|k| k.literal == literal)
        .fold(Lang::empty(), |acc, k| acc | k.langs)
}

/// Pseudo-English words with a canonical spelling.
const SYNONYMS: &[(&str, &str)] = &[
    ("automatic", "auto"),
    ("boolean", "bool"),
    ("character", "char"),
    ("constant", "const"),
    ("defaulted", "default"),
    ("deleted", "delete"),
    ("enumeration", "enum"),
    ("external", "extern"),
    ("func", "function"),
    ("integer", "int"),
    ("overridden", "override"),
    ("non-discardable", "nodiscard"),
    ("non-returning", "noreturn"),
    ("non-throwing", "noexcept"),
    ("ptr", "pointer"),
    ("ref", "reference"),
    ("restricted", "restrict"),
    ("returns", "returning"),
    ("structure", "struct"),
    ("_Atomic", "atomic"),
    ("_Bool", "bool"),
    ("_Complex", "complex"),
    ("_Imaginary", "imaginary"),
    ("_Noreturn", "noreturn"),
    ("_Thread_local", "thread_local"),
    ("vla", "variable"),
];

/// Maps an English word to its canonical spelling (case-insensitively for
/// ordinary words).
pub fn english_canonical(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    SYNONYMS
        .iter()
        .find(|(w, _)| *w == word || *w == lower)
        .map(|(_, c)| c.to_string())
        .unwrap_or(lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_depends_on_language() {
        let k = c_keyword("auto", Lang::C_99).unwrap();
        assert_eq!(k.ty.storage, Storage::AUTO);
        let k = c_keyword("auto", Lang::CPP_11).unwrap();
        assert_eq!(k.ty.base, Base::AUTO);
    }

    #[test]
    fn test_keyword_availability() {
        assert!(c_keyword("class", Lang::C_17).is_none());
        assert!(c_keyword("class", Lang::CPP_98).is_some());
        assert!(c_keyword("bool", Lang::C_99).is_none());
        assert!(c_keyword("_Bool", Lang::C_99).is_some());
        assert_eq!(keyword_langs("class"), Lang::CPP_ANY);
        assert!(keyword_langs("x").is_empty());
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(english_canonical("Character"), "char");
        assert_eq!(english_canonical("ptr"), "pointer");
        assert_eq!(english_canonical("pointer"), "pointer");
        assert_eq!(english_canonical("non-throwing"), "noexcept");
    }
}
