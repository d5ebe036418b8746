//! Streaming lexer for Lox source text.
//!
//! [`Scanner`] is a [`FusedIterator`] over `Result<Token, LoxError>`: a bad
//! character or an unterminated string yields one `Err` and scanning resumes
//! right after it, so a single pass reports every lexical error.  The stream
//! always finishes with exactly one `EOF` token.
//!
//! Numbers carry no sign and need digits on both sides of a `.`; strings may
//! span lines and have no escapes.  Keywords are looked up in a perfect‑hash
//! map, and `//` comments are skipped with `memchr`.

use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"class"  => TokenType::CLASS,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"fun"    => TokenType::FUN,
    b"for"    => TokenType::FOR,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super"  => TokenType::SUPER,
    b"this"   => TokenType::THIS,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

/// A single pass **scanner / lexer** that converts UTF‑8 source text into a
/// sequence of [`Token`]s.
pub struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    /// First byte of the lexeme being scanned.
    start: usize,
    /// Next byte to examine.
    current: usize,
    line: usize,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            bytes: src.as_bytes(),
            start: 0,
            current: 0,
            line: 1,
            done: false,
        }
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.current >= self.bytes.len()
    }

    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.bytes[self.current];
        self.current += 1;
        b
    }

    /// Byte `offset` positions ahead of the cursor, or `0` past the end.
    #[inline(always)]
    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.current + offset).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    /// `long` if the next byte is `=` (consuming it), otherwise `short`.
    fn with_equals(&mut self, long: TokenType, short: TokenType) -> TokenType {
        if self.peek() == b'=' {
            self.current += 1;
            long
        } else {
            short
        }
    }

    /// Scans one lexeme starting at `self.start`.  `Ok(None)` means the bytes
    /// were insignificant (whitespace or a comment).
    fn scan_token(&mut self) -> Result<Option<TokenType>> {
        let kind = match self.advance() {
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b'-' => TokenType::MINUS,
            b'+' => TokenType::PLUS,
            b';' => TokenType::SEMICOLON,
            b'*' => TokenType::STAR,

            b'!' => self.with_equals(TokenType::BANG_EQUAL, TokenType::BANG),
            b'=' => self.with_equals(TokenType::EQUAL_EQUAL, TokenType::EQUAL),
            b'<' => self.with_equals(TokenType::LESS_EQUAL, TokenType::LESS),
            b'>' => self.with_equals(TokenType::GREATER_EQUAL, TokenType::GREATER),

            b'/' if self.peek() == b'/' => {
                // Stop on the newline so it is counted below.
                self.current = match memchr(b'\n', &self.bytes[self.current..]) {
                    Some(pos) => self.current + pos,
                    None => self.bytes.len(),
                };
                return Ok(None);
            }
            b'/' => TokenType::SLASH,

            b' ' | b'\r' | b'\t' => return Ok(None),
            b'\n' => {
                self.line += 1;
                return Ok(None);
            }

            b'"' => self.string()?,
            b'0'..=b'9' => self.number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),

            other => return Err(self.unexpected(other)),
        };

        Ok(Some(kind))
    }

    /// Reports the whole character at `self.start`, even when it spans
    /// several UTF‑8 bytes, and skips past it.
    fn unexpected(&mut self, byte: u8) -> LoxError {
        let shown = match self.src.get(self.start..).and_then(|rest| rest.chars().next()) {
            Some(ch) => {
                self.current = self.start + ch.len_utf8();
                ch
            }
            None => byte as char,
        };

        LoxError::lex(self.line, format!("Unexpected character: {}", shown))
    }

    /// Body of a `"…"` literal; may span lines, no escapes.
    fn string(&mut self) -> Result<TokenType> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            return Err(LoxError::lex(self.line, "Unterminated string."));
        }

        self.current += 1;

        let body = &self.src[self.start + 1..self.current - 1];
        Ok(TokenType::STRING(body.to_owned()))
    }

    /// Digits with an optional fraction.  A trailing `.` is not consumed.
    fn number(&mut self) -> TokenType {
        self.skip_digits();

        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.current += 1;
            self.skip_digits();
        }

        let text = &self.src[self.start..self.current];
        TokenType::NUMBER(text.parse().unwrap_or_default())
    }

    fn skip_digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.current += 1;
        }
    }

    fn identifier(&mut self) -> TokenType {
        while matches!(self.peek(), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_') {
            self.current += 1;
        }

        KEYWORDS
            .get(&self.bytes[self.start..self.current])
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while !self.is_at_end() {
            self.start = self.current;

            match self.scan_token() {
                Ok(Some(kind)) => {
                    debug!("Scanned token ({:?}) on line {}", kind, self.line);
                    let lexeme = &self.src[self.start..self.current];
                    return Some(Ok(Token::new(kind, lexeme, self.line)));
                }
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }

        self.done = true;
        Some(Ok(Token::new(TokenType::EOF, "", self.line)))
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

/// Scan `source` to completion, returning every token (always ending in `EOF`)
/// together with every lexical error encountered along the way.
pub fn scan(source: &str) -> (Vec<Token>, Vec<LoxError>) {
    let (tokens, errors): (Vec<_>, Vec<_>) = Scanner::new(source).partition(Result::is_ok);

    let tokens: Vec<Token> = tokens.into_iter().filter_map(Result::ok).collect();
    let errors: Vec<LoxError> = errors.into_iter().filter_map(Result::err).collect();

    info!(
        "Scan finished: {} token(s), {} error(s)",
        tokens.len(),
        errors.len()
    );

    (tokens, errors)
}
