//! # Introduction
//!
//! cdecl translates C and C++ declarations ("gibberish") into pseudo-English
//! and back:
//!
//! ```text
//! cdecl> explain int (*p)[3]
//! declare p as pointer to array 3 of int
//! cdecl> declare f as function (char) returning pointer to const int
//! const int *f(char);
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Line → Lexer → Parser (English or gibberish) → AST → Checker → Printer
//! ```
//!
//! 1. [`parser`]: tokenises a command line and builds declaration trees in
//!    an [`ast::Ast`] arena, whichever grammar the command uses.
//! 2. [`check`]: rejects declarations that are not legal in the current
//!    [`lang::Lang`] and collects warnings.
//! 3. [`print`]: renders a checked tree as C/C++ or as English.
//! 4. [`session`]: runs commands against the [`options::Options`] and the
//!    [`typedefs::TypedefTable`].
//!
//! Type specifiers are bit sets (see [`types`]); every keyword's spelling
//! and the languages it is legal in come from one table per bit.

pub mod ast;
pub mod check;
pub mod dump;
pub mod errors;
pub mod keywords;
pub mod lang;
pub mod options;
pub mod parser;
pub mod print;
pub mod session;
pub mod suggest;
pub mod typedefs;
pub mod types;
