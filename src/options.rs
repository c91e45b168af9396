//! User-settable options (`set` command and command-line flags).

use crate::errors::CdeclError;
use crate::lang::Lang;
use crate::suggest;

/// Canonical spellings of the boolean options, for suggestions.
const FLAG_WORDS: &[&str] = &[
    "east-const",
    "noeast-const",
    "semicolon",
    "nosemicolon",
    "using",
    "nousing",
    "debug",
    "nodebug",
    "options",
];

/// Options that affect how commands are parsed and printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Language that declarations are parsed and checked in.
    pub lang: Lang,
    /// Print `int const` rather than `const int`.
    pub east_const: bool,
    /// Terminate printed declarations with `;`.
    pub semicolon: bool,
    /// Show typedefs as `using` declarations in C++11 and later.
    pub using: bool,
    /// Append a JSON dump of each parsed tree to the output.
    pub debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            lang: Lang::default(),
            east_const: false,
            semicolon: true,
            using: true,
            debug: false,
        }
    }
}

impl Options {
    /// Applies one `set` word: a language name, `lang=NAME`, or a boolean
    /// option optionally prefixed with `no`.
    pub fn set(&mut self, word: &str) -> Result<(), CdeclError> {
        let word = word.to_ascii_lowercase();
        if let Some(name) = word.strip_prefix("lang=") {
            self.lang = Lang::find_name(name).ok_or_else(|| CdeclError::unknown_lang(name))?;
            return Ok(());
        }
        if let Some(lang) = Lang::find_name(&word) {
            self.lang = lang;
            return Ok(());
        }

        let (value, name) = match word.strip_prefix("no") {
            Some(rest) => (false, rest.strip_prefix('-').unwrap_or(rest)),
            None => (true, word.as_str()),
        };
        match name {
            "east-const" | "eastconst" => self.east_const = value,
            "semicolon" => self.semicolon = value,
            "using" => self.using = value,
            "debug" => self.debug = value,
            _ => {
                let hint = suggest::hint(&word, FLAG_WORDS.iter().copied().chain(Lang::names()));
                return Err(CdeclError::UnknownOption { name: word, hint });
            }
        }
        Ok(())
    }

    /// One line per option, in the form accepted by [`Options::set`].
    pub fn describe(&self) -> String {
        let flag = |on: bool, name: &str| format!("  {}{name}", if on { "  " } else { "no" });
        [
            format!("    lang={}", self.lang),
            flag(self.east_const, "east-const"),
            flag(self.semicolon, "semicolon"),
            flag(self.using, "using"),
            flag(self.debug, "debug"),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.lang, Lang::C_23);
        assert!(options.semicolon);
        assert!(!options.east_const);
    }

    #[test]
    fn test_set_lang() {
        let mut options = Options::default();
        options.set("c++17").unwrap();
        assert_eq!(options.lang, Lang::CPP_17);
        options.set("lang=C99").unwrap();
        assert_eq!(options.lang, Lang::C_99);
        assert!(matches!(
            options.set("lang=cobol"),
            Err(CdeclError::UnknownLang { name, .. }) if name == "cobol"
        ));
    }

    #[test]
    fn test_set_flags() {
        let mut options = Options::default();
        options.set("east-const").unwrap();
        options.set("nosemicolon").unwrap();
        options.set("no-using").unwrap();
        assert!(options.east_const);
        assert!(!options.semicolon);
        assert!(!options.using);
        assert!(matches!(
            options.set("nonsense"),
            Err(CdeclError::UnknownOption { hint: None, .. })
        ));
    }

    #[test]
    fn test_unknown_words_suggest_close_ones() {
        let mut options = Options::default();
        let err = options.set("eastconst2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"eastconst2\": unknown set option; did you mean \"east-const\"?"
        );
        let err = options.set("lang=c++2O").unwrap_err();
        assert!(err.to_string().starts_with("\"c++2o\": unknown language; did you mean"));
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_describe() {
        let mut options = Options::default();
        options.set("c11").unwrap();
        let text = options.describe();
        assert!(text.contains("lang=C11"));
        assert!(text.contains("noeast-const"));
        assert!(text.contains("    semicolon"));
    }
}
