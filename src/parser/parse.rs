//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, the token helpers shared by both grammars, and
//! the declarator state that nested parameter lists save and restore.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `gibberish`: C and C++ declarations, casts and lambdas
//! - `english`: pseudo-English declarations and casts
//! - `command`: the command words that select a grammar
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state. Every node is allocated in
//! the parser's own [`Ast`], which the caller takes back with
//! [`Parser::into_ast`] once a command has been parsed.

use crate::ast::{Ast, AstId, SName, SourceLocation};
use crate::lang::Lang;
use crate::parser::lexer::{LexError, Lexer, Token};
use crate::suggest::did_you_mean;
use crate::typedefs::TypedefTable;
use crate::types::TypeError;
use std::fmt;

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
    /// Quoted words the user may have meant.
    pub hint: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column {}: {}{}",
            self.location.column,
            self.message,
            did_you_mean(self.hint.as_deref())
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
            hint: None,
        }
    }
}

impl From<TypeError> for ParseError {
    fn from(err: TypeError) -> Self {
        ParseError {
            message: err.to_string(),
            location: err.location(),
            hint: None,
        }
    }
}

/// Declarator state that belongs to one declaration. A parameter list or a
/// trailing return type starts a fresh one.
#[derive(Debug, Default)]
pub(crate) struct DeclState {
    pub depth: u32,
    pub implicit_type: bool,
    pub pending: Option<AstId>,
    pub blocks: Vec<AstId>,
    pub binding: Option<Vec<SName>>,
    pub top_level: bool,
}

/// Recursive descent parser for both declaration grammars
pub struct Parser<'t> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) ast: Ast,
    pub(crate) lang: Lang,
    pub(crate) typedefs: &'t TypedefTable,
    /// Parenthesis nesting of the declarator being parsed.
    pub(crate) depth: u32,
    /// Whether the current declaration has no type specifier at all.
    pub(crate) implicit_type: bool,
    /// A constructor, destructor or operator whose parameter list is next.
    pub(crate) pending: Option<AstId>,
    /// Apple blocks whose parameter list has not been seen yet.
    pub(crate) blocks: Vec<AstId>,
    /// Names of a structured binding seen in the current declarator.
    pub(crate) binding: Option<Vec<SName>>,
    /// Whether the declarator is that of a whole declaration rather than of
    /// a parameter or type name.
    pub(crate) top_level: bool,
}

impl<'t> Parser<'t> {
    pub fn new(source: &str, lang: Lang, typedefs: &'t TypedefTable) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            ast: Ast::new(),
            lang,
            typedefs,
            depth: 0,
            implicit_type: false,
            pending: None,
            blocks: Vec::new(),
            binding: None,
            top_level: false,
        })
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Gives up the parser and returns the arena holding everything parsed.
    pub fn into_ast(self) -> Ast {
        self.ast
    }

    pub(crate) fn save_state(&mut self) -> DeclState {
        DeclState {
            depth: std::mem::take(&mut self.depth),
            implicit_type: std::mem::take(&mut self.implicit_type),
            pending: self.pending.take(),
            blocks: std::mem::take(&mut self.blocks),
            binding: self.binding.take(),
            top_level: std::mem::take(&mut self.top_level),
        }
    }

    pub(crate) fn restore_state(&mut self, state: DeclState) {
        self.depth = state.depth;
        self.implicit_type = state.implicit_type;
        self.pending = state.pending;
        self.blocks = state.blocks;
        self.binding = state.binding;
        self.top_level = state.top_level;
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    /// Whether the current token is the identifier `word`.
    pub(crate) fn check_word(&self, word: &str) -> bool {
        self.peek().is_word(word)
    }

    pub(crate) fn match_word(&mut self, word: &str) -> bool {
        if self.check_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.current_location())
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("{}, found {}", message, self.peek())))
        }
    }

    pub(crate) fn expect_word(&mut self, word: &str) -> Result<(), ParseError> {
        if self.match_word(word) {
            Ok(())
        } else {
            Err(self.error(format!("expected \"{}\", found {}", word, self.peek())))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_rbracket(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBracket(self.current_location()),
            &format!("expected ']' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(self.error(format!("expected name, found {}", self.peek())))
        }
    }

    /// Succeeds if nothing but an optional `;` is left.
    pub(crate) fn expect_end(&mut self) -> Result<(), ParseError> {
        let loc = self.current_location();
        self.match_token(&Token::Semicolon(loc));
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.error(format!("unexpected {}", self.peek())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers() {
        let table = TypedefTable::new();
        let mut parser = Parser::new("declare x;", Lang::C_23, &table).unwrap();
        assert!(parser.check_word("declare"));
        assert!(parser.match_word("declare"));
        assert_eq!(parser.expect_identifier().unwrap(), "x");
        assert!(parser.expect_end().is_ok());
        assert!(parser.is_at_end());
    }

    #[test]
    fn test_expect_reports_found_token() {
        let table = TypedefTable::new();
        let mut parser = Parser::new("as ]", Lang::C_23, &table).unwrap();
        let err = parser.expect_word("declare").unwrap_err();
        assert_eq!(err.message, "expected \"declare\", found \"as\"");
        assert_eq!(err.location.column, 1);
        parser.advance();
        let err = parser.expect_end().unwrap_err();
        assert_eq!(err.to_string(), "column 4: unexpected ']'");
    }

    #[test]
    fn test_type_error_conversion() {
        let err: ParseError = TypeError::Duplicate {
            name: "long".to_string(),
            location: SourceLocation::new(1, 6),
        }
        .into();
        assert_eq!(err.message, "\"long\" can not be repeated");
        assert_eq!(err.location.column, 6);
    }
}
