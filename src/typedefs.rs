//! Typedef registry.
//!
//! Each entry owns a private [`Ast`] holding the defined type, with the
//! typedef's name on its root. Parsers copy an entry's tree into their own
//! arena when the name is used as a type.

use crate::ast::{Ast, AstId, SGlob, SName};
use crate::lang::Lang;
use crate::parser::{ParseError, Parser};
use crate::types::Storage;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// One named type.
#[derive(Debug, Clone)]
pub struct Typedef {
    pub ast: Ast,
    pub root: AstId,
    /// Languages in which the name is visible.
    pub langs: Lang,
    pub predefined: bool,
}

impl Typedef {
    pub fn name(&self) -> &SName {
        &self.ast[self.root].sname
    }
}

/// Which entries `show` lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypedefFilter {
    #[default]
    All,
    Predefined,
    User,
}

impl TypedefFilter {
    fn accepts(self, typedef: &Typedef) -> bool {
        match self {
            TypedefFilter::All => true,
            TypedefFilter::Predefined => typedef.predefined,
            TypedefFilter::User => !typedef.predefined,
        }
    }
}

const C99_CPP11: Lang = Lang::c_min(Lang::C_99).union(Lang::cpp_min(Lang::CPP_11));

/// Predefined typedefs, in dependency order, with where they are visible.
const PREDEFINED: &[(Lang, &[&str])] = &[
    (
        Lang::ANY,
        &[
            "typedef long ptrdiff_t",
            "typedef long ssize_t",
            "typedef unsigned long size_t",
            "typedef long time_t",
            "typedef long clock_t",
            "typedef long off_t",
            "typedef int pid_t",
            "typedef int sig_atomic_t",
            "typedef struct FILE FILE",
            "typedef long fpos_t",
        ],
    ),
    (Lang::C_ANY, &["typedef int wchar_t"]),
    (
        Lang::range(Lang::C_11, Lang::C_17),
        &[
            "typedef unsigned short char16_t",
            "typedef unsigned int char32_t",
        ],
    ),
    (
        C99_CPP11,
        &[
            "typedef long intmax_t",
            "typedef long intptr_t",
            "typedef unsigned long uintmax_t",
            "typedef unsigned long uintptr_t",
            "typedef signed char int8_t",
            "typedef short int16_t",
            "typedef int int32_t",
            "typedef long int64_t",
            "typedef unsigned char uint8_t",
            "typedef unsigned short uint16_t",
            "typedef unsigned int uint32_t",
            "typedef unsigned long uint64_t",
            "typedef signed char int_fast8_t",
            "typedef short int_fast16_t",
            "typedef int int_fast32_t",
            "typedef long int_fast64_t",
            "typedef unsigned char uint_fast8_t",
            "typedef unsigned short uint_fast16_t",
            "typedef unsigned int uint_fast32_t",
            "typedef unsigned long uint_fast64_t",
            "typedef signed char int_least8_t",
            "typedef short int_least16_t",
            "typedef int int_least32_t",
            "typedef long int_least64_t",
            "typedef unsigned char uint_least8_t",
            "typedef unsigned short uint_least16_t",
            "typedef unsigned int uint_least32_t",
            "typedef unsigned long uint_least64_t",
        ],
    ),
    (
        Lang::c_min(Lang::C_11),
        &[
            "typedef long double max_align_t",
            "typedef _Atomic bool atomic_bool",
            "typedef _Atomic char atomic_char",
            "typedef _Atomic signed char atomic_schar",
            "typedef _Atomic char16_t atomic_char16_t",
            "typedef _Atomic char32_t atomic_char32_t",
            "typedef _Atomic wchar_t atomic_wchar_t",
            "typedef _Atomic short atomic_short",
            "typedef _Atomic int atomic_int",
            "typedef _Atomic long atomic_long",
            "typedef _Atomic long long atomic_llong",
            "typedef _Atomic unsigned char atomic_uchar",
            "typedef _Atomic unsigned short atomic_ushort",
            "typedef _Atomic unsigned int atomic_uint",
            "typedef _Atomic unsigned long atomic_ulong",
            "typedef _Atomic unsigned long long atomic_ullong",
            "typedef _Atomic ptrdiff_t atomic_ptrdiff_t",
            "typedef _Atomic size_t atomic_size_t",
            "typedef _Atomic intmax_t atomic_intmax_t",
            "typedef _Atomic intptr_t atomic_intptr_t",
            "typedef _Atomic uintmax_t atomic_uintmax_t",
            "typedef _Atomic uintptr_t atomic_uintptr_t",
            "typedef _Atomic int_fast8_t atomic_int_fast8_t",
            "typedef _Atomic int_fast16_t atomic_int_fast16_t",
            "typedef _Atomic int_fast32_t atomic_int_fast32_t",
            "typedef _Atomic int_fast64_t atomic_int_fast64_t",
            "typedef _Atomic uint_fast8_t atomic_uint_fast8_t",
            "typedef _Atomic uint_fast16_t atomic_uint_fast16_t",
            "typedef _Atomic uint_fast32_t atomic_uint_fast32_t",
            "typedef _Atomic uint_fast64_t atomic_uint_fast64_t",
            "typedef _Atomic int_least8_t atomic_int_least8_t",
            "typedef _Atomic int_least16_t atomic_int_least16_t",
            "typedef _Atomic int_least32_t atomic_int_least32_t",
            "typedef _Atomic int_least64_t atomic_int_least64_t",
            "typedef _Atomic uint_least8_t atomic_uint_least8_t",
            "typedef _Atomic uint_least16_t atomic_uint_least16_t",
            "typedef _Atomic uint_least32_t atomic_uint_least32_t",
            "typedef _Atomic uint_least64_t atomic_uint_least64_t",
        ],
    ),
    (
        Lang::CPP_ANY,
        &[
            "typedef unsigned long std::size_t",
            "typedef long std::ptrdiff_t",
            "typedef class std::string std::string",
            "typedef class std::wstring std::wstring",
            "typedef class std::istream std::istream",
            "typedef class std::ostream std::ostream",
            "typedef class std::exception std::exception",
            "typedef class std::type_info std::type_info",
        ],
    ),
    (
        Lang::cpp_min(Lang::CPP_11),
        &[
            "typedef long double std::max_align_t",
            "typedef class std::u16string std::u16string",
            "typedef class std::u32string std::u32string",
            "typedef class std::thread std::thread",
            "typedef class std::mutex std::mutex",
        ],
    ),
    (
        Lang::cpp_min(Lang::CPP_17),
        &[
            "typedef enum class std::byte : unsigned char std::byte",
            "typedef class std::string_view std::string_view",
        ],
    ),
];

/// All known typedefs, keyed by full scoped name.
#[derive(Debug, Clone, Default)]
pub struct TypedefTable {
    map: FxHashMap<String, Typedef>,
}

impl TypedefTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding the standard library typedefs.
    pub fn with_predefined() -> Result<Self, ParseError> {
        let mut table = Self::new();
        for (langs, lines) in PREDEFINED {
            // parse in the newest language so every keyword is available
            let lang = langs.newest().unwrap_or(Lang::C_23);
            for line in *lines {
                let (ast, roots) = {
                    let mut parser = Parser::new(line, lang, &table)?;
                    let roots = parser.parse_gibberish_decls()?;
                    parser.expect_end()?;
                    (parser.into_ast(), roots)
                };
                for root in roots {
                    let mut ast = ast.clone();
                    ast[root].ty.storage -= Storage::TYPEDEF;
                    table.insert(&ast, root, *langs, true);
                }
            }
        }
        debug!(count = table.len(), "loaded predefined typedefs");
        Ok(table)
    }

    /// The typedef named `name` if it is visible in `lang`.
    pub fn find(&self, name: &str, lang: Lang) -> Option<&Typedef> {
        self.map
            .get(name.trim_start_matches("::"))
            .filter(|t| t.langs.intersects(lang))
    }

    /// Adds the type rooted at `root` of `ast` under the root's name.
    ///
    /// Redefining a name is allowed only with an equivalent type, in which
    /// case the table is left unchanged. Returns `false` for a conflicting
    /// redefinition.
    pub fn insert(&mut self, ast: &Ast, root: AstId, langs: Lang, predefined: bool) -> bool {
        let name = ast[root].sname.full_name();
        if let Some(old) = self.map.get(&name) {
            let same = Ast::equal(&old.ast, old.root, ast, root);
            trace!(%name, same, "typedef already defined");
            return same;
        }
        let mut own = Ast::new();
        let root = own.copy_from(ast, root);
        debug!(%name, predefined, "define typedef");
        self.map.insert(
            name,
            Typedef {
                ast: own,
                root,
                langs,
                predefined,
            },
        );
        true
    }

    /// Entries visible in `lang` that pass `filter` and match `glob`, sorted
    /// by name.
    pub fn matching(
        &self,
        glob: Option<&SGlob>,
        filter: TypedefFilter,
        lang: Lang,
    ) -> Vec<&Typedef> {
        let mut found: Vec<&Typedef> = self
            .map
            .values()
            .filter(|t| t.langs.intersects(lang) && filter.accepts(t))
            .filter(|t| glob.map_or(true, |g| g.matches(t.name())))
            .collect();
        found.sort_by_key(|t| t.name().full_name());
        found
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Typedef> {
        self.map.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstKind, Kind};
    use crate::types::{Base, CType, Qual};

    fn predefined() -> TypedefTable {
        TypedefTable::with_predefined().unwrap()
    }

    #[test]
    fn test_predefined_loaded() {
        let table = predefined();
        let size_t = table.find("size_t", Lang::C_89).unwrap();
        assert!(size_t.predefined);
        assert_eq!(size_t.name().full_name(), "size_t");
        assert_eq!(
            size_t.ast[size_t.root].ty.base,
            Base::UNSIGNED | Base::LONG
        );
        assert!(!size_t.ast[size_t.root].ty.storage.contains(Storage::TYPEDEF));
    }

    #[test]
    fn test_visibility_by_language() {
        let table = predefined();
        assert!(table.find("int32_t", Lang::C_89).is_none());
        assert!(table.find("int32_t", Lang::C_99).is_some());
        assert!(table.find("wchar_t", Lang::C_11).is_some());
        assert!(table.find("wchar_t", Lang::CPP_17).is_none());
        assert!(table.find("std::string", Lang::CPP_98).is_some());
        assert!(table.find("::std::string", Lang::CPP_98).is_some());
        assert!(table.find("std::string", Lang::C_23).is_none());
    }

    #[test]
    fn test_atomic_typedef_refers_to_typedef() {
        let table = predefined();
        let t = table.find("atomic_size_t", Lang::C_17).unwrap();
        let root = &t.ast[t.root];
        assert_eq!(root.kind.kind(), Kind::Typedef);
        assert!(root.ty.qual.contains(Qual::ATOMIC));
        let AstKind::Typedef { for_ast, .. } = root.kind else {
            unreachable!()
        };
        assert_eq!(t.ast[for_ast].sname.full_name(), "size_t");
    }

    #[test]
    fn test_enum_class_byte() {
        let table = predefined();
        let byte = table.find("std::byte", Lang::CPP_17).unwrap();
        assert_eq!(byte.ast[byte.root].kind.kind(), Kind::Enum);
        assert!(table.find("std::byte", Lang::CPP_14).is_none());
    }

    #[test]
    fn test_insert_redefinition() {
        let mut table = TypedefTable::new();
        let mut ast = Ast::new();
        let int = ast.new_builtin(CType::from_base(Base::INT), Default::default());
        ast[int].sname = SName::local("T");
        assert!(table.insert(&ast, int, Lang::ANY, false));
        assert!(table.insert(&ast, int, Lang::ANY, false));

        let dbl = ast.new_builtin(CType::from_base(Base::DOUBLE), Default::default());
        ast[dbl].sname = SName::local("T");
        assert!(!table.insert(&ast, dbl, Lang::ANY, false));
        let t = table.find("T", Lang::C_23).unwrap();
        assert_eq!(t.ast[t.root].ty.base, Base::INT);
    }

    #[test]
    fn test_matching() {
        let mut table = predefined();
        let mut ast = Ast::new();
        let int = ast.new_builtin(CType::from_base(Base::INT), Default::default());
        ast[int].sname = SName::local("uint_mine_t");
        table.insert(&ast, int, Lang::ANY, false);

        let glob = SGlob::parse("uint*_t");
        let names: Vec<String> = table
            .matching(Some(&glob), TypedefFilter::All, Lang::C_23)
            .iter()
            .map(|t| t.name().full_name())
            .collect();
        assert!(names.contains(&"uint8_t".to_string()));
        assert!(names.contains(&"uint_mine_t".to_string()));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let user = table.matching(None, TypedefFilter::User, Lang::C_23);
        assert_eq!(user.len(), 1);
        assert_eq!(user[0].name().full_name(), "uint_mine_t");

        let std = SGlob::parse("std::*");
        assert!(table
            .matching(Some(&std), TypedefFilter::All, Lang::C_23)
            .is_empty());
        assert!(!table
            .matching(Some(&std), TypedefFilter::Predefined, Lang::CPP_11)
            .is_empty());
    }
}
