//! Declaration parsers
//!
//! This module turns a command line into declaration ASTs:
//! - [`lexer`]: Tokenization (source text → tokens), shared by both grammars
//! - [`parse`]: The [`Parser`] state and helpers, and [`ParseError`]
//! - [`gibberish`]: C and C++ declarations and casts
//! - [`english`]: Pseudo-English declarations and casts
//! - [`command`]: Command words that choose between the two
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent over a token vector. Neither grammar
//! links nodes by itself: both go through the splicing operations of
//! [`crate::ast::build`], so a declaration has the same tree whichever way
//! it was written.

pub mod command;
pub mod english;
pub mod gibberish;
pub mod lexer;
pub mod parse;

pub use command::{Command, ShowStyle};
pub use lexer::{LexError, Lexer, Token};
pub use parse::{ParseError, Parser};
