//! Command grammar
//!
//! The first word of a line picks the grammar for the rest of it: `declare`,
//! `define` and `cast` are followed by pseudo-English, `explain`, `typedef`
//! and `using` by C or C++. A line starting with anything else is explained
//! as a C or C++ declaration.

use super::lexer::Token;
use super::parse::{ParseError, Parser};
use crate::ast::{AstId, CastKind, SourceLocation};
use crate::keywords::c_keyword;
use crate::suggest;
use crate::typedefs::TypedefFilter;
use crate::types::{CType, Storage};
use tracing::debug;

/// Command words, for suggestions.
const COMMANDS: &[&str] = &[
    "cast", "declare", "define", "exit", "explain", "help", "quit", "set", "show", "typedef",
    "using",
];

/// How `show` prints each typedef.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowStyle {
    English,
    Typedef,
    Using,
}

/// One parsed command line. Every [`AstId`] refers to the parser's arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// English declarations to print as C or C++.
    Declare(Vec<AstId>),
    /// An English type definition to register.
    Define(AstId),
    /// C or C++ `typedef` or `using` declarations to register.
    Typedef(Vec<AstId>),
    /// C or C++ declarations to print as English.
    Explain(Vec<AstId>),
    /// An English cast to print as C or C++.
    Cast(AstId),
    /// A C or C++ cast to print as English.
    ExplainCast(AstId),
    Show {
        glob: Option<String>,
        filter: TypedefFilter,
        style: Option<ShowStyle>,
    },
    Help,
    Quit,
}

impl<'t> Parser<'t> {
    /// Parses a whole command line.
    pub fn parse_command(&mut self) -> Result<Command, ParseError> {
        let start = self.current_location();
        let word = self.peek().ident().map(str::to_string);
        debug!(command = ?word, "parse command");
        let command = match word.as_deref() {
            Some("declare") => {
                self.advance();
                Command::Declare(self.parse_english_declare()?)
            }
            Some("define") => {
                self.advance();
                Command::Define(self.parse_english_define()?)
            }
            Some("cast") => Command::Cast(self.parse_english_cast()?),
            Some("const" | "dynamic" | "reinterpret" | "static")
                if self.peek_ahead(1).is_some_and(|t| t.is_word("cast")) =>
            {
                Command::Cast(self.parse_english_cast()?)
            }
            Some("explain") => {
                self.advance();
                if self.lang.is_cpp() && self.check_word("using") {
                    self.advance();
                    Command::Explain(vec![self.parse_using()?])
                } else {
                    self.parse_explain()?
                }
            }
            Some("typedef") => Command::Typedef(self.parse_gibberish_decls()?),
            Some("using") if self.lang.is_cpp() => {
                self.advance();
                Command::Typedef(vec![self.parse_using()?])
            }
            Some("show") => {
                self.advance();
                self.parse_show()?
            }
            Some("help") => {
                self.advance();
                Command::Help
            }
            Some("quit" | "exit" | "q") => {
                self.advance();
                Command::Quit
            }
            _ => {
                return self
                    .parse_explain()
                    .and_then(|command| self.expect_end().map(|()| command))
                    .map_err(|err| self.unknown_command(err, word.as_deref(), start));
            }
        };
        self.expect_end()?;
        Ok(command)
    }

    /// Blames a failed implicit `explain` on its first word when that word is
    /// neither a keyword nor a type name but is close to a command.
    fn unknown_command(
        &self,
        err: ParseError,
        word: Option<&str>,
        start: SourceLocation,
    ) -> ParseError {
        let Some(word) = word else {
            return err;
        };
        if c_keyword(word, self.lang).is_some() || self.typedefs.find(word, self.lang).is_some() {
            return err;
        }
        match suggest::hint(word, COMMANDS.iter().copied()) {
            Some(hint) => {
                ParseError::new(format!("\"{word}\": unknown command"), start).with_hint(Some(hint))
            }
            None => err,
        }
    }

    /// A C cast, a C++ named cast or declarations.
    fn parse_explain(&mut self) -> Result<Command, ParseError> {
        let loc = self.current_location();
        if self.check(&Token::LParen(loc)) {
            return Ok(Command::ExplainCast(self.parse_c_cast()?));
        }
        let named = match self.peek().ident() {
            Some("const_cast") => Some(CastKind::Const),
            Some("dynamic_cast") => Some(CastKind::Dynamic),
            Some("reinterpret_cast") => Some(CastKind::Reinterpret),
            Some("static_cast") => Some(CastKind::Static),
            _ => None,
        };
        if let Some(cast) = named {
            return Ok(Command::ExplainCast(self.parse_named_cast(cast)?));
        }
        Ok(Command::Explain(self.parse_gibberish_decls()?))
    }

    /// `NAME = TYPE` of a `using` declaration, returned as a typedef.
    fn parse_using(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let name = self.parse_scoped_name()?;
        self.expect_token(&Token::Eq(loc), "expected '=' after \"using\" name")?;
        let root = self.parse_type_name()?;
        self.ast[root]
            .ty
            .add(CType::from_storage(Storage::TYPEDEF), loc)?;
        self.ast[root].sname = name;
        Ok(root)
    }

    /// `[NAME-GLOB|all|predefined|user] [as english|typedef|using]`
    fn parse_show(&mut self) -> Result<Command, ParseError> {
        let filter = match self.peek().ident() {
            Some("all") => Some(TypedefFilter::All),
            Some("predefined") => Some(TypedefFilter::Predefined),
            Some("user") => Some(TypedefFilter::User),
            _ => None,
        };
        let glob = if filter.is_some() {
            self.advance();
            None
        } else {
            self.parse_show_glob()
        };

        let style = if self.match_word("as") {
            let style = match self.peek().ident() {
                Some("english") => ShowStyle::English,
                Some("typedef") => ShowStyle::Typedef,
                Some("using") => ShowStyle::Using,
                _ => {
                    return Err(self.error(format!(
                        "expected \"english\", \"typedef\" or \"using\", found {}",
                        self.peek()
                    )))
                }
            };
            self.advance();
            Some(style)
        } else {
            None
        };
        // A bare `show` lists only what the user defined.
        let filter = filter.unwrap_or(if glob.is_some() {
            TypedefFilter::All
        } else {
            TypedefFilter::User
        });
        Ok(Command::Show {
            glob,
            filter,
            style,
        })
    }

    /// A glob such as `std::*` or `**::size_t`, which the lexer splits into
    /// names, `*` and `::`.
    fn parse_show_glob(&mut self) -> Option<String> {
        let mut text = String::new();
        loop {
            match self.peek_token() {
                Token::Ident(word, _) if word != "as" => text.push_str(&word),
                Token::Star(_) => text.push('*'),
                Token::ColonColon(_) => text.push_str("::"),
                _ => break,
            }
            self.advance();
        }
        (!text.is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Kind;
    use crate::lang::Lang;
    use crate::typedefs::TypedefTable;

    fn command(source: &str, lang: Lang) -> (Command, crate::ast::Ast) {
        let table = TypedefTable::with_predefined().unwrap();
        let mut parser = Parser::new(source, lang, &table).unwrap();
        let command = parser.parse_command().unwrap();
        (command, parser.into_ast())
    }

    #[test]
    fn test_command_words() {
        let (cmd, _) = command("declare p as pointer to int", Lang::C_23);
        assert!(matches!(cmd, Command::Declare(ref roots) if roots.len() == 1));
        let (cmd, _) = command("explain int *p;", Lang::C_23);
        assert!(matches!(cmd, Command::Explain(_)));
        let (cmd, _) = command("char *const q", Lang::C_23);
        assert!(matches!(cmd, Command::Explain(_)));
        let (cmd, _) = command("quit", Lang::C_23);
        assert_eq!(cmd, Command::Quit);
        let (cmd, _) = command("help", Lang::C_23);
        assert_eq!(cmd, Command::Help);
    }

    #[test]
    fn test_casts() {
        let (cmd, ast) = command("explain (int*)x", Lang::C_23);
        let Command::ExplainCast(root) = cmd else {
            panic!("expected a cast, got {cmd:?}");
        };
        assert_eq!(ast.kind(root), Kind::Cast);

        let (cmd, _) = command("explain static_cast<int*>(x)", Lang::CPP_17);
        assert!(matches!(cmd, Command::ExplainCast(_)));
        let (cmd, _) = command("reinterpret cast p into pointer to char", Lang::CPP_17);
        assert!(matches!(cmd, Command::Cast(_)));
    }

    #[test]
    fn test_typedef_and_using() {
        let (cmd, ast) = command("typedef int *P", Lang::C_23);
        let Command::Typedef(roots) = cmd else {
            panic!("expected a typedef, got {cmd:?}");
        };
        assert!(ast[roots[0]].ty.storage.contains(Storage::TYPEDEF));
        assert_eq!(ast[roots[0]].sname.full_name(), "P");

        let (cmd, ast) = command("using F = int (*)(char)", Lang::CPP_17);
        let Command::Typedef(roots) = cmd else {
            panic!("expected a typedef, got {cmd:?}");
        };
        assert_eq!(ast.kind(roots[0]), Kind::Pointer);
        assert_eq!(ast[roots[0]].sname.full_name(), "F");
        assert!(ast[roots[0]].ty.storage.contains(Storage::TYPEDEF));
    }

    #[test]
    fn test_show() {
        let (cmd, _) = command("show std::* as using", Lang::CPP_17);
        assert_eq!(
            cmd,
            Command::Show {
                glob: Some("std::*".to_string()),
                filter: TypedefFilter::All,
                style: Some(ShowStyle::Using),
            }
        );
        let (cmd, _) = command("show user", Lang::C_23);
        assert_eq!(
            cmd,
            Command::Show {
                glob: None,
                filter: TypedefFilter::User,
                style: None,
            }
        );
    }

    #[test]
    fn test_trailing_garbage() {
        let table = TypedefTable::new();
        let mut parser = Parser::new("declare x as int ]", Lang::C_23, &table).unwrap();
        let err = parser.parse_command().unwrap_err();
        assert_eq!(err.message, "unexpected ']'");
    }
}
