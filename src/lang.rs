//! Language-version model
//!
//! Every C and C++ dialect is one bit of [`Lang`]. Sets of dialects express
//! "where is this legal" (or illegal) and are built with the range helpers
//! below, e.g. `Lang::c_min(Lang::C_99) | Lang::CPP_ANY` for `bool`.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// A set of C/C++ language versions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Lang: u32 {
        const C_KNR  = 1 << 0;
        const C_89   = 1 << 1;
        const C_95   = 1 << 2;
        const C_99   = 1 << 3;
        const C_11   = 1 << 4;
        const C_17   = 1 << 5;
        const C_23   = 1 << 6;

        const CPP_98 = 1 << 9;
        const CPP_03 = 1 << 10;
        const CPP_11 = 1 << 11;
        const CPP_14 = 1 << 12;
        const CPP_17 = 1 << 13;
        const CPP_20 = 1 << 14;
        const CPP_23 = 1 << 15;

        const C_ANY = Self::C_KNR.bits() | Self::C_89.bits()
            | Self::C_95.bits() | Self::C_99.bits() | Self::C_11.bits()
            | Self::C_17.bits() | Self::C_23.bits();
        const CPP_ANY = Self::CPP_98.bits() | Self::CPP_03.bits()
            | Self::CPP_11.bits() | Self::CPP_14.bits() | Self::CPP_17.bits()
            | Self::CPP_20.bits() | Self::CPP_23.bits();
        const ANY = Self::C_ANY.bits() | Self::CPP_ANY.bits();
    }
}

/// Every single language in order, oldest first, C before C++.
pub const ALL_LANGS: [Lang; 14] = [
    Lang::C_KNR,
    Lang::C_89,
    Lang::C_95,
    Lang::C_99,
    Lang::C_11,
    Lang::C_17,
    Lang::C_23,
    Lang::CPP_98,
    Lang::CPP_03,
    Lang::CPP_11,
    Lang::CPP_14,
    Lang::CPP_17,
    Lang::CPP_20,
    Lang::CPP_23,
];

/// Accepted spellings for `set` and `--lang`.
const LANG_NAMES: &[(&str, Lang)] = &[
    ("c", Lang::C_23),
    ("k&r", Lang::C_KNR),
    ("k&rc", Lang::C_KNR),
    ("knr", Lang::C_KNR),
    ("knrc", Lang::C_KNR),
    ("c78", Lang::C_KNR),
    ("c89", Lang::C_89),
    ("c90", Lang::C_89),
    ("c95", Lang::C_95),
    ("c99", Lang::C_99),
    ("c11", Lang::C_11),
    ("c17", Lang::C_17),
    ("c18", Lang::C_17),
    ("c23", Lang::C_23),
    ("c2x", Lang::C_23),
    ("c++", Lang::CPP_23),
    ("c++98", Lang::CPP_98),
    ("c++03", Lang::CPP_03),
    ("c++11", Lang::CPP_11),
    ("c++0x", Lang::CPP_11),
    ("c++14", Lang::CPP_14),
    ("c++17", Lang::CPP_17),
    ("c++20", Lang::CPP_20),
    ("c++23", Lang::CPP_23),
];

impl Lang {
    /// All languages (of either family) at or above the single language `l`.
    pub const fn min(l: Lang) -> Lang {
        Lang::from_bits_truncate(!(l.bits().wrapping_sub(1)))
    }

    /// All languages (of either family) at or below the single language `l`.
    pub const fn max(l: Lang) -> Lang {
        Lang::from_bits_truncate((l.bits() << 1).wrapping_sub(1))
    }

    pub const fn c_min(l: Lang) -> Lang {
        Lang::min(l).intersection(Lang::C_ANY)
    }

    pub const fn c_max(l: Lang) -> Lang {
        Lang::max(l).intersection(Lang::C_ANY)
    }

    pub const fn cpp_min(l: Lang) -> Lang {
        Lang::min(l).intersection(Lang::CPP_ANY)
    }

    pub const fn cpp_max(l: Lang) -> Lang {
        Lang::max(l).intersection(Lang::CPP_ANY)
    }

    /// Inclusive range `lo..=hi`.
    pub const fn range(lo: Lang, hi: Lang) -> Lang {
        Lang::min(lo).intersection(Lang::max(hi))
    }

    pub fn is_c(self) -> bool {
        self.intersects(Lang::C_ANY) && !self.intersects(Lang::CPP_ANY)
    }

    pub fn is_cpp(self) -> bool {
        self.intersects(Lang::CPP_ANY) && !self.intersects(Lang::C_ANY)
    }

    /// Oldest language in the set, if any.
    pub fn oldest(self) -> Option<Lang> {
        ALL_LANGS.iter().copied().find(|l| self.contains(*l))
    }

    /// Newest language in the set, if any.
    pub fn newest(self) -> Option<Lang> {
        ALL_LANGS.iter().rev().copied().find(|l| self.contains(*l))
    }

    /// The language family (`C_ANY` or `CPP_ANY`) this single language is in.
    pub fn family(self) -> Lang {
        if self.is_cpp() {
            Lang::CPP_ANY
        } else {
            Lang::C_ANY
        }
    }

    /// Human-readable name of a single language.
    pub fn name(self) -> &'static str {
        match self {
            l if l == Lang::C_KNR => "K&RC",
            l if l == Lang::C_89 => "C89",
            l if l == Lang::C_95 => "C95",
            l if l == Lang::C_99 => "C99",
            l if l == Lang::C_11 => "C11",
            l if l == Lang::C_17 => "C17",
            l if l == Lang::C_23 => "C23",
            l if l == Lang::CPP_98 => "C++98",
            l if l == Lang::CPP_03 => "C++03",
            l if l == Lang::CPP_11 => "C++11",
            l if l == Lang::CPP_14 => "C++14",
            l if l == Lang::CPP_17 => "C++17",
            l if l == Lang::CPP_20 => "C++20",
            l if l == Lang::CPP_23 => "C++23",
            l if l == Lang::C_ANY => "C",
            l if l == Lang::CPP_ANY => "C++",
            _ => "?",
        }
    }

    /// Every accepted language spelling, lowercase.
    pub fn names() -> impl Iterator<Item = &'static str> {
        LANG_NAMES.iter().map(|(n, _)| *n)
    }

    /// Looks up a language by one of its accepted spellings.
    pub fn find_name(name: &str) -> Option<Lang> {
        let lower = name.to_ascii_lowercase();
        LANG_NAMES
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, l)| *l)
    }

    /// Phrases where something legal only in `legal` stops being an error,
    /// relative to `self` (the current language): `" until C99"` when the
    /// current language is too old, `" since C++17"` when it is too new, and
    /// `" in C89"` otherwise.
    pub fn which(self, legal: Lang) -> String {
        let in_family = legal & self.family();
        let (Some(oldest), Some(newest)) = (in_family.oldest(), in_family.newest())
        else {
            let family = if self.is_cpp() { "C++" } else { "C" };
            return format!(" in {family}");
        };
        let contiguous = in_family == Lang::range(oldest, newest) & self.family();
        if contiguous && self < oldest {
            return format!(" until {}", oldest.name());
        }
        if contiguous && self > newest {
            if let Some(next) = ALL_LANGS
                .iter()
                .copied()
                .find(|l| *l > newest && l.family() == newest.family())
            {
                return format!(" since {}", next.name());
            }
        }
        format!(" in {}", self.name())
    }
}

impl Default for Lang {
    fn default() -> Self {
        Lang::C_23
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert_eq!(
            Lang::c_min(Lang::C_99),
            Lang::C_99 | Lang::C_11 | Lang::C_17 | Lang::C_23
        );
        assert_eq!(Lang::cpp_max(Lang::CPP_03), Lang::CPP_98 | Lang::CPP_03);
        assert!(Lang::min(Lang::C_23).contains(Lang::CPP_98));
        assert_eq!(
            Lang::range(Lang::CPP_11, Lang::CPP_14),
            Lang::CPP_11 | Lang::CPP_14
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(Lang::find_name("C++17"), Some(Lang::CPP_17));
        assert_eq!(Lang::find_name("k&r"), Some(Lang::C_KNR));
        assert_eq!(Lang::find_name("cobol"), None);
        assert_eq!(Lang::CPP_20.name(), "C++20");
    }

    #[test]
    fn test_which() {
        let since_c99 = Lang::c_min(Lang::C_99);
        assert_eq!(Lang::C_89.which(since_c99), " until C99");
        assert_eq!(Lang::CPP_17.which(since_c99), " in C++");
        let until_cpp14 = Lang::cpp_max(Lang::CPP_14) | Lang::C_ANY;
        assert_eq!(Lang::CPP_17.which(until_cpp14), " since C++17");
        assert_eq!(Lang::CPP_20.which(until_cpp14), " since C++17");
    }

    #[test]
    fn test_family() {
        assert!(Lang::CPP_11.is_cpp());
        assert!(Lang::C_KNR.is_c());
        assert_eq!(Lang::C_11.family(), Lang::C_ANY);
    }
}
