//! Lexer for declarations and pseudo-English
//!
//! Both grammars share one token stream. Keywords are not distinguished here:
//! whether `const` or `pointer` is special depends on the grammar and the
//! current language, so every word is an [`Token::Ident`] and the parser
//! decides. Hyphenated English words (`non-member`, `user-defined`) are kept
//! together as one identifier.

use crate::ast::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Number(u64, SourceLocation),
    StringLiteral(String, SourceLocation),

    // Identifiers, keywords and English words
    Ident(String, SourceLocation),

    // Declarator punctuation
    Star(SourceLocation),       // *
    Amp(SourceLocation),        // &
    AndAnd(SourceLocation),     // &&
    Caret(SourceLocation),      // ^
    Tilde(SourceLocation),      // ~
    LParen(SourceLocation),     // (
    RParen(SourceLocation),     // )
    LBracket(SourceLocation),   // [
    RBracket(SourceLocation),   // ]
    LBrace(SourceLocation),     // {
    RBrace(SourceLocation),     // }
    Comma(SourceLocation),      // ,
    Semicolon(SourceLocation),  // ;
    Colon(SourceLocation),      // :
    ColonColon(SourceLocation), // ::
    Eq(SourceLocation),         // =
    Lt(SourceLocation),         // <
    Gt(SourceLocation),         // >
    Arrow(SourceLocation),      // ->
    Ellipsis(SourceLocation),   // ...

    /// Any other operator; these only matter after `operator`.
    Op(&'static str, SourceLocation),

    // End of input
    Eof(SourceLocation),
}

/// Operators that are lexed as [`Token::Op`], longest first.
const OPS: &[&str] = &[
    "<<=", ">>=", "<=>", "->*", "<<", ">>", "<=", ">=", "==", "!=", "||", "++", "--", "+=",
    "-=", "*=", "/=", "%=", "^=", "&=", "|=", "+", "-", "/", "%", "|", "!", ".",
];

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Number(_, loc)
            | Token::StringLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Op(_, loc)
            | Token::Star(loc)
            | Token::Amp(loc)
            | Token::AndAnd(loc)
            | Token::Caret(loc)
            | Token::Tilde(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::Comma(loc)
            | Token::Semicolon(loc)
            | Token::Colon(loc)
            | Token::ColonColon(loc)
            | Token::Eq(loc)
            | Token::Lt(loc)
            | Token::Gt(loc)
            | Token::Arrow(loc)
            | Token::Ellipsis(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    /// The text of a punctuation token, as used to name an overloaded
    /// operator.
    pub fn punct(&self) -> Option<&'static str> {
        Some(match self {
            Token::Op(op, _) => *op,
            Token::Star(_) => "*",
            Token::Amp(_) => "&",
            Token::AndAnd(_) => "&&",
            Token::Caret(_) => "^",
            Token::Tilde(_) => "~",
            Token::Comma(_) => ",",
            Token::Eq(_) => "=",
            Token::Lt(_) => "<",
            Token::Gt(_) => ">",
            Token::Arrow(_) => "->",
            _ => return None,
        })
    }

    /// The identifier's text, if this is one.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Ident(s, _) => Some(s),
            _ => None,
        }
    }

    /// Whether this is the identifier `word`.
    pub fn is_word(&self, word: &str) -> bool {
        self.ident() == Some(word)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n, _) => write!(f, "number {}", n),
            Token::StringLiteral(s, _) => write!(f, "string literal \"{}\"", s),
            Token::Ident(s, _) => write!(f, "\"{}\"", s),
            Token::Op(op, _) => write!(f, "'{}'", op),
            Token::Star(_) => write!(f, "'*'"),
            Token::Amp(_) => write!(f, "'&'"),
            Token::AndAnd(_) => write!(f, "'&&'"),
            Token::Caret(_) => write!(f, "'^'"),
            Token::Tilde(_) => write!(f, "'~'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Colon(_) => write!(f, "':'"),
            Token::ColonColon(_) => write!(f, "'::'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Arrow(_) => write!(f, "'->'"),
            Token::Ellipsis(_) => write!(f, "'...'"),
            Token::Eof(_) => write!(f, "end of input"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location.column, self.message)
    }
}

impl std::error::Error for LexError {}

/// Lexer for one command line
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given input.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.peek().ok_or_else(|| LexError {
            message: "unexpected end of input".to_string(),
            location: loc,
        })?;

        if ch.is_ascii_digit() {
            return self.number_literal();
        }
        if ch.is_alphabetic() || ch == '_' {
            return Ok(self.identifier());
        }

        let two = (ch, self.peek_ahead(1));
        let token = match two {
            ('"', _) => return self.string_literal(),
            ('.', Some('.')) if self.peek_ahead(2) == Some('.') => {
                self.advance_n(3);
                Token::Ellipsis(loc)
            }
            (':', Some(':')) => {
                self.advance_n(2);
                Token::ColonColon(loc)
            }
            ('&', Some('&')) => {
                self.advance_n(2);
                Token::AndAnd(loc)
            }
            ('-', Some('>')) if self.peek_ahead(2) != Some('*') => {
                self.advance_n(2);
                Token::Arrow(loc)
            }
            _ => {
                if let Some(op) = self.multi_char_op() {
                    self.advance_n(op.chars().count());
                    return Ok(Token::Op(op, loc));
                }
                self.advance();
                match ch {
                    '*' => Token::Star(loc),
                    '&' => Token::Amp(loc),
                    '^' => Token::Caret(loc),
                    '~' => Token::Tilde(loc),
                    '(' => Token::LParen(loc),
                    ')' => Token::RParen(loc),
                    '[' => Token::LBracket(loc),
                    ']' => Token::RBracket(loc),
                    '{' => Token::LBrace(loc),
                    '}' => Token::RBrace(loc),
                    ',' => Token::Comma(loc),
                    ';' => Token::Semicolon(loc),
                    ':' => Token::Colon(loc),
                    '=' => Token::Eq(loc),
                    '<' => Token::Lt(loc),
                    '>' => Token::Gt(loc),
                    _ => match OPS.iter().copied().find(|op| op.len() == 1 && op.starts_with(ch)) {
                        Some(op) => Token::Op(op, loc),
                        None => {
                            return Err(LexError {
                                message: format!("unexpected character '{}'", ch),
                                location: loc,
                            })
                        }
                    },
                }
            }
        };
        Ok(token)
    }

    /// The longest multi-character operator at the current position.
    fn multi_char_op(&self) -> Option<&'static str> {
        OPS.iter().copied().filter(|op| op.len() > 1).find(|op| {
            op.chars()
                .enumerate()
                .all(|(i, c)| self.peek_ahead(i) == Some(c))
        })
    }

    /// Parse a string literal; only `""` is meaningful (`operator""`).
    fn string_literal(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        self.advance(); // skip opening '"'
        let mut s = String::new();
        while let Some(ch) = self.advance() {
            if ch == '"' {
                return Ok(Token::StringLiteral(s, loc));
            }
            s.push(ch);
        }
        Err(LexError {
            message: "unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse an integer literal: decimal, octal or hex, ignoring `u`/`l`
    /// suffixes.
    fn number_literal(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let mut digits = String::new();
        let radix = if self.peek() == Some('0')
            && matches!(self.peek_ahead(1), Some('x') | Some('X'))
        {
            self.advance_n(2);
            16
        } else if self.peek() == Some('0') && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            8
        } else {
            10
        };

        while let Some(ch) = self.peek() {
            if ch.is_digit(radix) || ch == '\'' {
                if ch != '\'' {
                    digits.push(ch);
                }
                self.advance();
            } else {
                break;
            }
        }
        while matches!(self.peek(), Some('u' | 'U' | 'l' | 'L')) {
            self.advance();
        }

        let value = u64::from_str_radix(&digits, radix).map_err(|_| LexError {
            message: format!("invalid integer literal \"{}\"", digits),
            location: loc,
        })?;

        Ok(Token::Number(value, loc))
    }

    /// Parse an identifier, joining hyphenated words.
    fn identifier(&mut self) -> Token {
        let loc = self.current_location();
        let mut ident = String::new();

        loop {
            while let Some(ch) = self.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    ident.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            let hyphenated = self.peek() == Some('-')
                && self.peek_ahead(1).is_some_and(|c| c.is_ascii_alphabetic())
                && ident.chars().all(|c| c.is_ascii_alphabetic());
            if !hyphenated {
                break;
            }
            ident.push('-');
            self.advance();
        }

        let mut loc = loc;
        loc.end_column = self.column.saturating_sub(1);
        Token::Ident(ident, loc)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance_n(2);

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance_n(2);
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "unterminated comment".to_string(),
            location: start_loc,
        })
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_tokens() {
        let mut lexer = Lexer::new("int (*p)[3];");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "int"));
        assert!(matches!(tokens[1], Token::LParen(_)));
        assert!(matches!(tokens[2], Token::Star(_)));
        assert!(matches!(tokens[3], Token::Ident(ref s, _) if s == "p"));
        assert!(matches!(tokens[4], Token::RParen(_)));
        assert!(matches!(tokens[5], Token::LBracket(_)));
        assert!(matches!(tokens[6], Token::Number(3, _)));
        assert!(matches!(tokens[7], Token::RBracket(_)));
        assert!(matches!(tokens[8], Token::Semicolon(_)));
        assert!(matches!(tokens[9], Token::Eof(_)));
    }

    #[test]
    fn test_cpp_punctuation() {
        let mut lexer = Lexer::new("S::* && ... -> ->* <=> <<= [[");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[1], Token::ColonColon(_)));
        assert!(matches!(tokens[2], Token::Star(_)));
        assert!(matches!(tokens[3], Token::AndAnd(_)));
        assert!(matches!(tokens[4], Token::Ellipsis(_)));
        assert!(matches!(tokens[5], Token::Arrow(_)));
        assert!(matches!(tokens[6], Token::Op("->*", _)));
        assert!(matches!(tokens[7], Token::Op("<=>", _)));
        assert!(matches!(tokens[8], Token::Op("<<=", _)));
        assert!(matches!(tokens[9], Token::LBracket(_)));
        assert!(matches!(tokens[10], Token::LBracket(_)));
    }

    #[test]
    fn test_hyphenated_words() {
        let mut lexer = Lexer::new("non-member user-defined x-1");
        let tokens = lexer.tokenize().unwrap();

        assert!(tokens[0].is_word("non-member"));
        assert!(tokens[1].is_word("user-defined"));
        assert!(tokens[2].is_word("x"));
        assert!(matches!(tokens[3], Token::Op("-", _)));
        assert!(matches!(tokens[4], Token::Number(1, _)));
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("0x10 010 42UL");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Number(16, _)));
        assert!(matches!(tokens[1], Token::Number(8, _)));
        assert!(matches!(tokens[2], Token::Number(42, _)));
    }

    #[test]
    fn test_comments_and_errors() {
        let mut lexer = Lexer::new("int /* c */ x // trailing");
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens.len(), 3);

        let mut lexer = Lexer::new("int $x");
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.location.column, 5);
    }
}
