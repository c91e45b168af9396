//! One interactive session: options, the typedef registry, and execution of
//! command lines against them.

use crate::ast::{Ast, AstId, SGlob};
use crate::check::{Checker, Diagnostic};
use crate::dump;
use crate::errors::CdeclError;
use crate::lang::Lang;
use crate::options::Options;
use crate::parser::{Command, Parser, ShowStyle};
use crate::print::{EnglishPrinter, GibberishPrinter};
use crate::typedefs::{TypedefFilter, TypedefTable};
use crate::types::Storage;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const HELP: &str = "\
commands:
  declare NAME[, NAME]* as ENGLISH
  define NAME as ENGLISH
  [const|dynamic|reinterpret|static] cast [NAME] into ENGLISH
  explain GIBBERISH
  typedef GIBBERISH
  using NAME = GIBBERISH
  show [NAME-GLOB|all|predefined|user] [as english|typedef|using]
  set [OPTION]*
  help | ?
  quit | exit | q
options:
  LANG | lang=LANG      c89 c99 c11 c17 c23 c++98 c++03 c++11 c++14 c++17 c++20 c++23
  [no]east-const        print qualifiers after the type
  [no]semicolon         end printed declarations with ';'
  [no]using             show typedefs as 'using' in C++11 and later
  [no]debug             dump each parsed tree as JSON";

/// The result of one command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    pub text: String,
    pub warnings: Vec<Diagnostic>,
    pub quit: bool,
}

impl Output {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub options: Options,
    typedefs: TypedefTable,
}

impl Session {
    /// A session with default options and the predefined typedefs loaded.
    pub fn new() -> Result<Self, CdeclError> {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Result<Self, CdeclError> {
        let typedefs = TypedefTable::with_predefined()?;
        info!(count = typedefs.len(), "loaded predefined typedefs");
        Ok(Self { options, typedefs })
    }

    pub fn typedefs(&self) -> &TypedefTable {
        &self.typedefs
    }

    /// Parses, checks and runs one command line.
    pub fn execute(&mut self, line: &str) -> Result<Output, CdeclError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Output::default());
        }
        if line == "?" {
            return Ok(Output::text(HELP));
        }
        let mut words = line.split_whitespace();
        if words.next() == Some("set") {
            return self.set(words);
        }

        let lang = self.options.lang;
        let (command, ast) = {
            let mut parser = Parser::new(line, lang, &self.typedefs)?;
            let command = parser.parse_command()?;
            (command, parser.into_ast())
        };
        debug!(?command, %lang, "execute");

        let mut output = match command {
            Command::Declare(roots) => {
                let warnings = self.check(&ast, &roots)?;
                let printer = self.gibberish(&ast);
                let lines: Vec<String> = roots
                    .iter()
                    .map(|&r| self.terminate(printer.declaration(r)))
                    .collect();
                self.printed(&ast, &roots, lines, warnings)?
            }
            Command::Explain(roots) => {
                let warnings = self.check(&ast, &roots)?;
                let printer = EnglishPrinter::new(&ast);
                let lines: Vec<String> = roots
                    .iter()
                    .map(|&r| {
                        if ast[r].ty.storage.contains(Storage::TYPEDEF) {
                            printer.definition(r)
                        } else {
                            printer.declaration(r)
                        }
                    })
                    .collect();
                self.printed(&ast, &roots, lines, warnings)?
            }
            Command::Cast(root) => {
                let warnings = self.check(&ast, &[root])?;
                let line = self.gibberish(&ast).cast(root);
                self.printed(&ast, &[root], vec![line], warnings)?
            }
            Command::ExplainCast(root) => {
                let warnings = self.check(&ast, &[root])?;
                let line = EnglishPrinter::new(&ast).cast(root);
                self.printed(&ast, &[root], vec![line], warnings)?
            }
            Command::Define(root) => self.define(ast, &[root])?,
            Command::Typedef(roots) => self.define(ast, &roots)?,
            Command::Show {
                glob,
                filter,
                style,
            } => self.show(glob.as_deref(), filter, style),
            Command::Help => Output::text(HELP),
            Command::Quit => Output {
                quit: true,
                ..Output::default()
            },
        };
        output.text = output.text.trim_end().to_string();
        Ok(output)
    }

    /// Runs each line of a configuration file, stopping at the first error.
    /// Blank lines and lines starting with `#` or `//` are skipped. Returns
    /// the warnings of all lines.
    pub fn read_config(&mut self, path: &Path) -> Result<Vec<Diagnostic>, CdeclError> {
        let text = fs::read_to_string(path)?;
        info!(path = %path.display(), "reading configuration");
        let mut warnings = Vec::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            let output = self.execute(line).map_err(|e| CdeclError::Config {
                path: path.display().to_string(),
                line: n + 1,
                source: Box::new(e),
            })?;
            warnings.extend(output.warnings);
        }
        Ok(warnings)
    }

    /// Applies every word or none of them. A bare `set` or `set options`
    /// lists the current options.
    fn set<'l>(&mut self, words: impl Iterator<Item = &'l str>) -> Result<Output, CdeclError> {
        let mut options = self.options.clone();
        let mut changed = false;
        for word in words.filter(|w| *w != "options") {
            options.set(word)?;
            changed = true;
        }
        if !changed {
            return Ok(Output::text(self.options.describe()));
        }
        debug!(?options, "options changed");
        self.options = options;
        Ok(Output::default())
    }

    fn check(&self, ast: &Ast, roots: &[AstId]) -> Result<Vec<Diagnostic>, CdeclError> {
        let mut checker = Checker::new(ast, self.options.lang);
        checker.check_list(roots);
        checker.into_result().map_err(CdeclError::Semantic)
    }

    fn gibberish<'a>(&self, ast: &'a Ast) -> GibberishPrinter<'a> {
        GibberishPrinter::new(ast, self.options.lang).east_const(self.options.east_const)
    }

    fn terminate(&self, mut line: String) -> String {
        if self.options.semicolon {
            line.push(';');
        }
        line
    }

    /// Joins printed lines, followed by the tree dump when debugging.
    fn printed(
        &self,
        ast: &Ast,
        roots: &[AstId],
        mut lines: Vec<String>,
        warnings: Vec<Diagnostic>,
    ) -> Result<Output, CdeclError> {
        if self.options.debug {
            lines.push(dump::to_json(ast, roots)?);
        }
        Ok(Output {
            text: lines.join("\n"),
            warnings,
            quit: false,
        })
    }

    /// Checks and registers typedefs. Nothing is registered unless every
    /// root passes.
    fn define(&mut self, mut ast: Ast, roots: &[AstId]) -> Result<Output, CdeclError> {
        let warnings = self.check(&ast, roots)?;
        for &root in roots {
            ast[root].ty.storage.remove(Storage::TYPEDEF);
            if !self.typedefs.insert(&ast, root, Lang::ANY, false) {
                return Err(CdeclError::TypedefRedefinition {
                    name: ast[root].sname.full_name(),
                    location: ast[root].loc,
                });
            }
            info!(name = %ast[root].sname.full_name(), "defined type");
        }
        self.printed(&ast, roots, Vec::new(), warnings)
    }

    fn show(&self, glob: Option<&str>, filter: TypedefFilter, style: Option<ShowStyle>) -> Output {
        let lang = self.options.lang;
        let using = self.options.using && lang.is_cpp() && lang >= Lang::CPP_11;
        let style = style.unwrap_or(if using {
            ShowStyle::Using
        } else {
            ShowStyle::Typedef
        });
        let glob = glob.map(SGlob::parse);
        let lines: Vec<String> = self
            .typedefs
            .matching(glob.as_ref(), filter, lang)
            .into_iter()
            .map(|t| match style {
                ShowStyle::English => EnglishPrinter::new(&t.ast).definition(t.root),
                ShowStyle::Typedef => self.terminate(self.gibberish(&t.ast).typedef(t.root)),
                ShowStyle::Using => self.terminate(self.gibberish(&t.ast).using(t.root)),
            })
            .collect();
        Output::text(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session: &mut Session, line: &str) -> String {
        session.execute(line).unwrap().text
    }

    #[test]
    fn test_declare_and_explain() {
        let mut session = Session::new().unwrap();
        assert_eq!(
            run(&mut session, "declare p as pointer to array 3 of int"),
            "int (*p)[3];"
        );
        assert_eq!(
            run(&mut session, "explain int (*p)[3]"),
            "declare p as pointer to array 3 of int"
        );
    }

    #[test]
    fn test_semantic_error() {
        let mut session = Session::new().unwrap();
        let err = session
            .execute("declare f as function returning array 3 of int")
            .unwrap_err();
        assert!(matches!(err, CdeclError::Semantic(_)));
    }

    #[test]
    fn test_define_then_use() {
        let mut session = Session::new().unwrap();
        assert_eq!(run(&mut session, "typedef int *IP"), "");
        assert_eq!(run(&mut session, "explain IP x"), "declare x as IP");
        assert_eq!(run(&mut session, "show IP"), "typedef int *IP;");
        let err = session.execute("typedef char *IP").unwrap_err();
        assert_eq!(err.to_string(), "\"IP\": type redefinition");
        // An identical redefinition is accepted.
        assert!(session.execute("typedef int *IP").is_ok());
    }

    #[test]
    fn test_set() {
        let mut session = Session::new().unwrap();
        assert_eq!(run(&mut session, "set c++17 nosemicolon east-const"), "");
        assert_eq!(session.options.lang, Lang::CPP_17);
        assert_eq!(
            run(&mut session, "declare p as pointer to const char"),
            "char const *p"
        );
        assert!(session.execute("set frobnicate").is_err());
        assert!(run(&mut session, "set").contains("lang=C++17"));
        assert!(!run(&mut session, "set options").contains("noeast-const"));
    }

    #[test]
    fn test_set_is_all_or_nothing() {
        let mut session = Session::new().unwrap();
        let err = session.execute("set c99 bogus").unwrap_err();
        assert_eq!(err.to_string(), "\"bogus\": unknown set option");
        assert_eq!(session.options, Options::default());
    }

    #[test]
    fn test_read_config() {
        let path = std::env::temp_dir().join(format!("cdeclrc-{}", std::process::id()));
        fs::write(&path, "# types\nset c++17\n\ntypedef int Index\n").unwrap();
        let mut session = Session::new().unwrap();
        session.read_config(&path).unwrap();
        assert_eq!(session.options.lang, Lang::CPP_17);
        assert!(session.typedefs().find("Index", Lang::CPP_17).is_some());

        fs::write(&path, "typedef int Index\ndeclare x as foo\n").unwrap();
        let err = Session::new().unwrap().read_config(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, CdeclError::Config { line: 2, .. }));
        assert!(err.to_string().ends_with("line 2: column 14: \"foo\": unknown type"));
    }

    #[test]
    fn test_quit_and_blank() {
        let mut session = Session::new().unwrap();
        assert!(session.execute("quit").unwrap().quit);
        assert_eq!(session.execute("   ").unwrap(), Output::default());
        assert!(run(&mut session, "?").starts_with("commands:"));
    }
}
