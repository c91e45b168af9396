//! C and pseudo-English spellings of type bits.

use super::bits::{BitInfo, ATTR_INFO, BASE_INFO, QUAL_INFO, STORAGE_INFO};
use super::{Attr, Base, CType, Qual, Storage};
use crate::lang::Lang;

fn c_words<F>(table: &'static [BitInfo<F>], contains: impl Fn(F) -> bool) -> Vec<&'static str>
where
    F: Copy + 'static,
{
    table
        .iter()
        .filter(|i| contains(i.flag))
        .map(|i| i.c)
        .collect()
}

fn english_words<F>(
    table: &'static [BitInfo<F>],
    contains: impl Fn(F) -> bool,
) -> Vec<&'static str>
where
    F: Copy + 'static,
{
    let mut words: Vec<&'static str> = Vec::new();
    for info in table.iter().filter(|i| contains(i.flag)) {
        // noexcept and throw() share a spelling
        if !words.contains(&info.english) {
            words.push(info.english);
        }
    }
    words
}

fn is_c_11_17(lang: Lang) -> bool {
    Lang::range(Lang::C_11, Lang::C_17).contains(lang)
}

/// C spellings of base bits, in canonical order.
pub fn base_c(base: Base, lang: Lang) -> Vec<&'static str> {
    let mut words = c_words(BASE_INFO, |f| base.contains(f));
    let c99_to_c17 = Lang::range(Lang::C_99, Lang::C_17).contains(lang);
    for w in words.iter_mut() {
        if *w == "bool" && c99_to_c17 {
            *w = "_Bool";
        }
    }
    words
}

/// C spellings of storage bits, excluding those printed after a function's
/// parameter list.
pub fn storage_c(storage: Storage, lang: Lang) -> Vec<&'static str> {
    let mut words = c_words(STORAGE_INFO, |f| storage.contains(f));
    if is_c_11_17(lang) {
        for w in words.iter_mut() {
            if *w == "thread_local" {
                *w = "_Thread_local";
            }
        }
    }
    words
}

/// C spellings of the cv-qualifiers and `_Atomic`.
pub fn qual_c(qual: Qual) -> Vec<&'static str> {
    c_words(QUAL_INFO, |f| (qual & (Qual::CVR | Qual::ATOMIC)).contains(f))
}

/// Attributes as a `[[...]]` specifier, or `_Noreturn` in C11 and C17.
pub fn attr_c(attr: Attr, lang: Lang) -> String {
    let mut attr = attr;
    let mut out = String::new();
    if is_c_11_17(lang) && attr.contains(Attr::NORETURN) {
        out.push_str("_Noreturn");
        attr.remove(Attr::NORETURN);
    }
    let names = c_words(ATTR_INFO, |f| attr.contains(f));
    if !names.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("[[{}]]", names.join(", ")));
    }
    out
}

/// What follows a function's parameter list: cv- and ref-qualifiers, then
/// exception specification, then virt-specifiers, then `= 0|default|delete`.
/// Each item carries its own leading space.
pub fn func_trailer_c(ty: &CType) -> String {
    let mut out = String::new();
    for q in qual_c(ty.qual) {
        out.push(' ');
        out.push_str(q);
    }
    if ty.qual.contains(Qual::REFERENCE) {
        out.push_str(" &");
    } else if ty.qual.contains(Qual::RVALUE_REFERENCE) {
        out.push_str(" &&");
    }
    let s = ty.storage;
    if s.contains(Storage::NOEXCEPT) {
        out.push_str(" noexcept");
    } else if s.contains(Storage::THROW) {
        out.push_str(" throw()");
    }
    if s.contains(Storage::OVERRIDE) {
        out.push_str(" override");
    }
    if s.contains(Storage::FINAL) {
        out.push_str(" final");
    }
    if s.contains(Storage::PURE_VIRTUAL) {
        out.push_str(" = 0");
    } else if s.contains(Storage::DEFAULT) {
        out.push_str(" = default");
    } else if s.contains(Storage::DELETE) {
        out.push_str(" = delete");
    }
    out
}

/// English spelling of base bits.
pub fn base_english(base: Base) -> String {
    english_words(BASE_INFO, |f| base.contains(f)).join(" ")
}

impl CType {
    /// C spelling: attributes, storage, qualifiers and base, with the
    /// qualifiers after the base when `east_const` is set. Function trailer
    /// bits and array qualifiers are not included.
    pub fn c_name(&self, lang: Lang, east_const: bool) -> String {
        let mut words: Vec<String> = Vec::new();
        let attrs = attr_c(self.attr, lang);
        if !attrs.is_empty() {
            words.push(attrs);
        }
        let storage = self.storage - Storage::FUNC_TRAILER;
        words.extend(storage_c(storage, lang).into_iter().map(String::from));
        let quals = qual_c(self.qual);
        if !east_const {
            words.extend(quals.iter().map(|q| q.to_string()));
        }
        words.extend(base_c(self.base, lang).into_iter().map(String::from));
        if east_const {
            words.extend(quals.iter().map(|q| q.to_string()));
        }
        words.join(" ")
    }

    /// Pseudo-English spelling of everything but the base type.
    pub fn english_specifiers(&self) -> String {
        let mut words = english_words(ATTR_INFO, |f| self.attr.contains(f));
        words.extend(english_words(STORAGE_INFO, |f| self.storage.contains(f)));
        words.extend(english_words(QUAL_INFO, |f| self.qual.contains(f)));
        words.join(" ")
    }

    /// Full pseudo-English spelling.
    pub fn english_name(&self) -> String {
        let spec = self.english_specifiers();
        let base = base_english(self.base);
        match (spec.is_empty(), base.is_empty()) {
            (true, _) => base,
            (false, true) => spec,
            (false, false) => format!("{spec} {base}"),
        }
    }

    /// Pseudo-English spelling of a built-in type. An implicit `int`, or one
    /// implied by modifiers alone, is spelled out.
    pub fn english_builtin(&self) -> String {
        let mut ty = *self;
        if (ty.base - Base::MODIFIERS).is_empty() {
            ty.base |= Base::INT;
        }
        ty.english_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_names() {
        let t = CType {
            base: Base::UNSIGNED | Base::LONG | Base::INT,
            storage: Storage::STATIC,
            qual: Qual::CONST,
            attr: Attr::empty(),
        };
        assert_eq!(t.c_name(Lang::C_17, false), "static const unsigned long int");
        assert_eq!(t.c_name(Lang::C_17, true), "static unsigned long int const");
    }

    #[test]
    fn test_language_spellings() {
        let b = CType::from_base(Base::BOOL);
        assert_eq!(b.c_name(Lang::C_99, false), "_Bool");
        assert_eq!(b.c_name(Lang::CPP_11, false), "bool");

        let tl = CType::from_storage(Storage::THREAD_LOCAL) | CType::from_base(Base::INT);
        assert_eq!(tl.c_name(Lang::C_11, false), "_Thread_local int");
        assert_eq!(tl.c_name(Lang::CPP_11, false), "thread_local int");

        let nr = CType::from_attr(Attr::NORETURN | Attr::NODISCARD);
        assert_eq!(attr_c(nr.attr, Lang::CPP_17), "[[nodiscard, noreturn]]");
    }

    #[test]
    fn test_english_names() {
        let t = CType {
            base: Base::CHAR,
            storage: Storage::EXTERN,
            qual: Qual::CONST | Qual::VOLATILE,
            attr: Attr::empty(),
        };
        assert_eq!(t.english_name(), "external const volatile char");
        let f = CType::from_storage(Storage::NOEXCEPT | Storage::VIRTUAL);
        assert_eq!(f.english_name(), "virtual non-throwing");
    }

    #[test]
    fn test_english_builtin_spells_out_int() {
        let u = CType::from_base(Base::UNSIGNED | Base::LONG);
        assert_eq!(u.english_builtin(), "unsigned long int");
        let implicit = CType::from_storage(Storage::STATIC);
        assert_eq!(implicit.english_builtin(), "static int");
        assert_eq!(CType::from_base(Base::CHAR).english_builtin(), "char");
    }

    #[test]
    fn test_func_trailer() {
        let t = CType {
            qual: Qual::CONST | Qual::REFERENCE,
            storage: Storage::NOEXCEPT | Storage::OVERRIDE,
            ..CType::NONE
        };
        assert_eq!(func_trailer_c(&t), " const & noexcept override");
    }
}
