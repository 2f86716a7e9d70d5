//! SQL Tokenizer
//!
//! Breaks SQL strings into individual tokens for parsing.

use crate::common::error::{Position, SyntaxError};
use crate::parser::keywords::Keyword;
use std::collections::HashMap;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// SQL token types
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Literals
    Identifier(String),
    StringLiteral(String),
    NumericLiteral(String),

    // Keywords
    Keyword(Keyword),

    // Operators
    Plus,               // +
    Minus,              // -
    Divide,             // /
    Equals,             // =
    NotEquals,          // != or <>
    LessThan,           // <
    GreaterThan,        // >
    LessThanOrEqual,    // <=
    GreaterThanOrEqual, // >=

    // Punctuation
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,
    Dot,        // .
    Semicolon,  // ;

    // Special
    Star, // *
    EOF,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Identifier(name) => write!(f, "identifier {}", name),
            TokenType::StringLiteral(value) => write!(f, "'{}'", value),
            TokenType::NumericLiteral(value) => f.write_str(value),
            TokenType::Keyword(keyword) => write!(f, "keyword {}", keyword),
            TokenType::Plus => f.write_str("'+'"),
            TokenType::Minus => f.write_str("'-'"),
            TokenType::Divide => f.write_str("'/'"),
            TokenType::Equals => f.write_str("'='"),
            TokenType::NotEquals => f.write_str("'<>'"),
            TokenType::LessThan => f.write_str("'<'"),
            TokenType::GreaterThan => f.write_str("'>'"),
            TokenType::LessThanOrEqual => f.write_str("'<='"),
            TokenType::GreaterThanOrEqual => f.write_str("'>='"),
            TokenType::LeftParen => f.write_str("'('"),
            TokenType::RightParen => f.write_str("')'"),
            TokenType::Comma => f.write_str("','"),
            TokenType::Dot => f.write_str("'.'"),
            TokenType::Semicolon => f.write_str("';'"),
            TokenType::Star => f.write_str("'*'"),
            TokenType::EOF => f.write_str("end of input"),
        }
    }
}

/// SQL token with position information
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, text: String, line: usize, column: usize) -> Self {
        Self {
            token_type,
            text,
            line,
            column,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.token_type, TokenType::EOF)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.token_type, TokenType::Keyword(k) if k == keyword)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// How the token reads in a diagnostic: `'AS'`, `')'`, `end of input`.
    /// String literals keep their own quotes.
    pub fn describe(&self) -> String {
        match self.token_type {
            TokenType::EOF => "end of input".to_string(),
            TokenType::StringLiteral(_) => self.text.clone(),
            _ => format!("'{}'", self.text),
        }
    }
}

/// SQL tokenizer
pub struct Tokenizer {
    keywords: HashMap<String, Keyword>,
}

impl Tokenizer {
    pub fn new() -> Self {
        let mut keywords = HashMap::new();

        for keyword in Keyword::all() {
            keywords.insert(keyword.to_string(), *keyword);
        }

        Self { keywords }
    }

    /// Tokenize a SQL string into tokens, terminated by an EOF token
    pub fn tokenize(&self, sql: &str) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        let mut chars = sql.chars().peekable();
        let mut line = 1;
        let mut column = 1;

        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                self.consume_whitespace(&mut chars, &mut line, &mut column);
                continue;
            }

            let start_line = line;
            let start_column = column;

            let single = match ch {
                '(' => Some(TokenType::LeftParen),
                ')' => Some(TokenType::RightParen),
                ',' => Some(TokenType::Comma),
                '.' => Some(TokenType::Dot),
                ';' => Some(TokenType::Semicolon),
                '*' => Some(TokenType::Star),
                '+' => Some(TokenType::Plus),
                '/' => Some(TokenType::Divide),
                '=' => Some(TokenType::Equals),
                _ => None,
            };

            if let Some(token_type) = single {
                chars.next();
                column += 1;
                tokens.push(Token::new(token_type, ch.to_string(), start_line, start_column));
                continue;
            }

            match ch {
                '\'' => {
                    let (text, new_line, new_column) =
                        self.consume_quoted(&mut chars, '\'', line, column)?;
                    line = new_line;
                    column = new_column;
                    tokens.push(Token::new(
                        TokenType::StringLiteral(text.clone()),
                        format!("'{}'", text),
                        start_line,
                        start_column,
                    ));
                }
                '"' => {
                    // Double quotes for quoted identifiers (e.g., "column name", "FOR")
                    let (text, new_line, new_column) =
                        self.consume_quoted(&mut chars, '"', line, column)?;
                    line = new_line;
                    column = new_column;
                    tokens.push(Token::new(
                        TokenType::Identifier(text.clone()),
                        format!("\"{}\"", text),
                        start_line,
                        start_column,
                    ));
                }
                '0'..='9' => {
                    let (text, new_column) = self.consume_number(&mut chars, column);
                    column = new_column;
                    tokens.push(Token::new(
                        TokenType::NumericLiteral(text.clone()),
                        text,
                        start_line,
                        start_column,
                    ));
                }
                '-' => {
                    chars.next();
                    column += 1;
                    if let Some(&'-') = chars.peek() {
                        // Line comment
                        while let Some(&c) = chars.peek() {
                            if c == '\n' {
                                break;
                            }
                            chars.next();
                            column += 1;
                        }
                    } else {
                        tokens.push(Token::new(
                            TokenType::Minus,
                            "-".to_string(),
                            start_line,
                            start_column,
                        ));
                    }
                }
                '!' => {
                    chars.next();
                    column += 1;
                    if let Some(&'=') = chars.peek() {
                        chars.next();
                        column += 1;
                        tokens.push(Token::new(
                            TokenType::NotEquals,
                            "!=".to_string(),
                            start_line,
                            start_column,
                        ));
                    } else {
                        return Err(SyntaxError::new(
                            Position::new(start_line, start_column),
                            "unexpected character '!'",
                        ));
                    }
                }
                '<' => {
                    chars.next();
                    column += 1;
                    let (token_type, text) = match chars.peek() {
                        Some(&'=') => (TokenType::LessThanOrEqual, "<="),
                        Some(&'>') => (TokenType::NotEquals, "<>"),
                        _ => (TokenType::LessThan, "<"),
                    };
                    if text.len() == 2 {
                        chars.next();
                        column += 1;
                    }
                    tokens.push(Token::new(
                        token_type,
                        text.to_string(),
                        start_line,
                        start_column,
                    ));
                }
                '>' => {
                    chars.next();
                    column += 1;
                    if let Some(&'=') = chars.peek() {
                        chars.next();
                        column += 1;
                        tokens.push(Token::new(
                            TokenType::GreaterThanOrEqual,
                            ">=".to_string(),
                            start_line,
                            start_column,
                        ));
                    } else {
                        tokens.push(Token::new(
                            TokenType::GreaterThan,
                            ">".to_string(),
                            start_line,
                            start_column,
                        ));
                    }
                }
                _ if self.is_identifier_start(ch) => {
                    let (text, new_column) = self.consume_identifier(&mut chars, column);
                    column = new_column;

                    let token_type = match self.keywords.get(&text.to_uppercase()) {
                        Some(&keyword) => TokenType::Keyword(keyword),
                        None => TokenType::Identifier(text.clone()),
                    };
                    tokens.push(Token::new(token_type, text, start_line, start_column));
                }
                _ => {
                    return Err(SyntaxError::new(
                        Position::new(start_line, start_column),
                        format!("unexpected character '{}'", ch),
                    ));
                }
            }
        }

        tokens.push(Token::new(TokenType::EOF, String::new(), line, column));

        Ok(tokens)
    }

    fn consume_whitespace(
        &self,
        chars: &mut Peekable<Chars>,
        line: &mut usize,
        column: &mut usize,
    ) {
        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                chars.next();
                if ch == '\n' {
                    *line += 1;
                    *column = 1;
                } else {
                    *column += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Consume a quoted run; a doubled quote character stands for itself
    fn consume_quoted(
        &self,
        chars: &mut Peekable<Chars>,
        quote: char,
        mut line: usize,
        mut column: usize,
    ) -> Result<(String, usize, usize), SyntaxError> {
        let start = Position::new(line, column);
        chars.next(); // Consume opening quote
        column += 1;

        let mut result = String::new();

        while let Some(ch) = chars.next() {
            column += 1;

            if ch == quote {
                if chars.peek() == Some(&quote) {
                    chars.next();
                    column += 1;
                    result.push(quote);
                } else {
                    return Ok((result, line, column));
                }
            } else if ch == '\n' {
                line += 1;
                column = 1;
                result.push(ch);
            } else {
                result.push(ch);
            }
        }

        let what = if quote == '"' {
            "quoted identifier"
        } else {
            "string literal"
        };
        Err(SyntaxError::new(start, format!("unterminated {}", what)))
    }

    fn consume_number(&self, chars: &mut Peekable<Chars>, mut column: usize) -> (String, usize) {
        let mut result = String::new();
        let mut seen_dot = false;

        while let Some(&ch) = chars.peek() {
            if ch.is_ascii_digit() || (ch == '.' && !seen_dot) {
                seen_dot |= ch == '.';
                result.push(ch);
                chars.next();
                column += 1;
            } else {
                break;
            }
        }

        (result, column)
    }

    fn consume_identifier(&self, chars: &mut Peekable<Chars>, mut column: usize) -> (String, usize) {
        let mut result = String::new();

        while let Some(&ch) = chars.peek() {
            if self.is_identifier_char(ch) {
                result.push(ch);
                chars.next();
                column += 1;
            } else {
                break;
            }
        }

        (result, column)
    }

    fn is_identifier_start(&self, ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_identifier_char(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
