// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Merl source code.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written: Merl's lexical grammar has too many overlapping
//! prefixes for a generated scanner to stay readable — `0` starts an
//! integer, a word (`0w`, `0wx`), a hex integer (`0x`) or a real; `~`
//! starts a negative constant or a symbolic identifier; `(` opens a
//! parenthesis or a nested comment.
//!
//! # Design
//!
//! - **Single pass, zero copy**: every token borrows its text from the
//!   input; nothing is allocated per token.
//! - **Fatal errors with partial results**: the first lexical error stops
//!   the run, but every token emitted before it is returned in the
//!   [`LexFailure`] envelope so tools can render a cursor at the bad byte.
//! - **One method per state**: each lexical context (inside a decimal
//!   constant, inside a string escape, inside a comment at depth n, …) is
//!   a method on [`Lexer`]; the byte cursor and the token accumulator are
//!   the only state shared between them.

use super::error::{LexError, LexErrorKind, LexFailure};
use super::{chars, Reserved, Span, Token, TokenKind};

/// Lexes a complete source text.
///
/// Returns the full token sequence, or a [`LexFailure`] carrying the
/// partial prefix of tokens produced before the error.
///
/// # Examples
///
/// ```
/// use merl_core::source_analysis::lex;
///
/// let tokens = lex("val x = 0").unwrap();
/// let texts: Vec<_> = tokens.iter().map(|t| t.text()).collect();
/// assert_eq!(texts, ["val", "x", "=", "0"]);
/// ```
///
/// # Errors
///
/// Returns a [`LexFailure`] if the input contains a lexical error; see
/// [`super::LexErrorKind`] for the conditions.
pub fn lex(source: &str) -> Result<Vec<Token<'_>>, LexFailure<'_>> {
    Lexer::new(source).run()
}

/// The lexer state: a byte cursor over the source plus the accumulator of
/// tokens emitted so far.
struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    tokens: Vec<Token<'src>>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    /// Drives the dispatch loop to completion or first error.
    fn run(mut self) -> Result<Vec<Token<'src>>, LexFailure<'src>> {
        while self.pos < self.source.len() {
            if let Err(error) = self.dispatch() {
                return Err(LexFailure {
                    partial: self.tokens,
                    error,
                });
            }
        }
        Ok(self.tokens)
    }

    // ========================================================================
    // Cursor primitives
    // ========================================================================

    /// Returns the byte at the cursor without consuming it.
    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    /// Returns the byte `n` positions past the cursor.
    fn peek_at(&self, n: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + n).copied()
    }

    /// Consumes bytes while the predicate holds.
    fn advance_while(&mut self, predicate: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
    }

    /// Emits a token spanning from `start` to the cursor.
    fn push(&mut self, kind: TokenKind, start: usize) {
        let span = Span::from(start..self.pos);
        self.tokens
            .push(Token::new(&self.source[start..self.pos], kind, span));
    }

    /// Slices `[start, end)` clamped to input length and floored to a char
    /// boundary. Used for error payloads, where `end` may land inside a
    /// multi-byte character.
    fn error_slice(&self, start: usize, end: usize) -> &'src str {
        let mut end = end.min(self.source.len());
        while !self.source.is_char_boundary(end) {
            end -= 1;
        }
        &self.source[start..end]
    }

    // ========================================================================
    // Top-level dispatch
    // ========================================================================

    /// Consumes one top-level construct: a token, a skipped whitespace
    /// byte, or a failure.
    fn dispatch(&mut self) -> Result<(), LexError> {
        let s = self.pos;
        let Some(b) = self.peek() else {
            return Ok(());
        };
        self.pos += 1;
        match b {
            b'(' => self.lex_open_paren(s),
            b')' => Ok(self.push(TokenKind::Reserved(Reserved::CloseParen), s)),
            b'[' => Ok(self.push(TokenKind::Reserved(Reserved::OpenBracket), s)),
            b']' => Ok(self.push(TokenKind::Reserved(Reserved::CloseBracket), s)),
            b'{' => Ok(self.push(TokenKind::Reserved(Reserved::OpenBrace), s)),
            b'}' => Ok(self.push(TokenKind::Reserved(Reserved::CloseBrace), s)),
            b',' => Ok(self.push(TokenKind::Reserved(Reserved::Comma), s)),
            b';' => Ok(self.push(TokenKind::Reserved(Reserved::Semicolon), s)),
            b'_' => Ok(self.push(TokenKind::Reserved(Reserved::Underscore), s)),
            b'"' => self.lex_string(s),
            b'~' => self.lex_after_tilde(s),
            b'\'' => self.lex_alphanum_id(s, true, false),
            b'0' => self.lex_after_zero(s),
            b'.' => self.lex_after_dot(s),
            _ if chars::is_dec_digit(b) => self.lex_dec_int(s),
            _ if chars::is_symbolic(b) => self.lex_symbolic_id(s, false),
            _ if chars::is_letter(b) => self.lex_alphanum_id(s, false, false),
            // Anything else is treated as whitespace and skipped.
            _ => Ok(()),
        }
    }

    // ========================================================================
    // Punctuation oddballs
    // ========================================================================

    /// After `.`: only `...` is lexable.
    #[allow(clippy::cast_possible_truncation)]
    fn lex_after_dot(&mut self, dot: usize) -> Result<(), LexError> {
        if self.peek() == Some(b'.') && self.peek_at(1) == Some(b'.') {
            self.pos += 2;
            self.push(TokenKind::Reserved(Reserved::DotDotDot), dot);
            Ok(())
        } else {
            Err(LexError::at(LexErrorKind::UnexpectedDot, dot as u32))
        }
    }

    /// After `(`: a parenthesis, unless `*` follows and opens a comment.
    fn lex_open_paren(&mut self, paren: usize) -> Result<(), LexError> {
        if self.peek() == Some(b'*') {
            self.pos += 1;
            self.lex_comment(paren)
        } else {
            self.push(TokenKind::Reserved(Reserved::OpenParen), paren);
            Ok(())
        }
    }

    // ========================================================================
    // Identifiers and qualifiers
    // ========================================================================

    /// Terminates an identifier-shaped lexeme: reserved words become
    /// reserved tokens unless a qualifier preceded them, in which case the
    /// whole long identifier is malformed.
    fn finish_identifier(&mut self, id_start: usize, qualified: bool) -> Result<(), LexError> {
        let text = &self.source[id_start..self.pos];
        match Reserved::from_text(text) {
            None => {
                self.push(TokenKind::Identifier, id_start);
                Ok(())
            }
            Some(_) if qualified => Err(LexError::new(
                LexErrorKind::ReservedAfterQualifiers(text.into()),
                Span::from(id_start..self.pos),
            )),
            Some(tag) => {
                self.push(TokenKind::Reserved(tag), id_start);
                Ok(())
            }
        }
    }

    /// Inside a symbolic identifier; the first character is consumed.
    fn lex_symbolic_id(&mut self, id_start: usize, qualified: bool) -> Result<(), LexError> {
        self.advance_while(chars::is_symbolic);
        self.finish_identifier(id_start, qualified)
    }

    /// Inside an alphanumeric identifier; the first character is consumed.
    ///
    /// A following `.` turns the lexeme into a qualifier and continues the
    /// long identifier, unless the lexeme started with a prime or is
    /// reserved.
    fn lex_alphanum_id(
        &mut self,
        id_start: usize,
        starts_prime: bool,
        qualified: bool,
    ) -> Result<(), LexError> {
        self.advance_while(chars::is_alphanum);
        if self.peek() != Some(b'.') {
            return self.finish_identifier(id_start, qualified);
        }

        let text = &self.source[id_start..self.pos];
        if starts_prime {
            return Err(LexError::new(
                LexErrorKind::PrimeQualifier,
                Span::from(id_start..self.pos),
            ));
        }
        if Reserved::from_text(text).is_some() {
            return Err(LexError::new(
                LexErrorKind::ReservedQualifier(text.into()),
                Span::from(id_start..self.pos),
            ));
        }
        self.push(TokenKind::Qualifier, id_start);
        self.pos += 1; // the structure-access dot
        self.lex_continue_long_id()
    }

    /// After a qualifier's dot: an identifier must complete the long name.
    #[allow(clippy::cast_possible_truncation)]
    fn lex_continue_long_id(&mut self) -> Result<(), LexError> {
        let s = self.pos;
        match self.peek() {
            Some(b) if chars::is_symbolic(b) => {
                self.pos += 1;
                self.lex_symbolic_id(s, true)
            }
            Some(b) if chars::is_letter(b) => {
                self.pos += 1;
                self.lex_alphanum_id(s, false, true)
            }
            _ => Err(LexError::at(
                LexErrorKind::UnexpectedEndOfLongIdentifier,
                s as u32,
            )),
        }
    }

    // ========================================================================
    // Numeric constants
    // ========================================================================

    /// After `~`: a negative constant or a symbolic identifier.
    fn lex_after_tilde(&mut self, tilde: usize) -> Result<(), LexError> {
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                self.lex_after_tilde_zero(tilde)
            }
            Some(b) if chars::is_dec_digit(b) => {
                self.pos += 1;
                self.lex_dec_int(tilde)
            }
            Some(b) if chars::is_symbolic(b) => {
                self.pos += 1;
                self.lex_symbolic_id(tilde, false)
            }
            // A lone tilde is an ordinary symbolic identifier.
            _ => {
                self.push(TokenKind::Identifier, tilde);
                Ok(())
            }
        }
    }

    /// After `~0`: hex integer, real, more decimal digits, or just `~0`.
    fn lex_after_tilde_zero(&mut self, const_start: usize) -> Result<(), LexError> {
        match self.peek() {
            Some(b'x') if self.peek_at(1).is_some_and(chars::is_hex_digit) => {
                self.pos += 2;
                self.lex_hex_int(const_start)
            }
            Some(b'.') => {
                self.pos += 1;
                self.lex_real_after_dot(const_start)
            }
            Some(b) if chars::is_dec_digit(b) => {
                self.pos += 1;
                self.lex_dec_int(const_start)
            }
            _ => {
                self.push(TokenKind::Integer, const_start);
                Ok(())
            }
        }
    }

    /// After `0`: hex integer, word, real, more decimal digits, or just `0`.
    fn lex_after_zero(&mut self, const_start: usize) -> Result<(), LexError> {
        match self.peek() {
            Some(b'x') if self.peek_at(1).is_some_and(chars::is_hex_digit) => {
                self.pos += 2;
                self.lex_hex_int(const_start)
            }
            Some(b'w') => {
                self.pos += 1;
                self.lex_after_zero_w(const_start)
            }
            Some(b'.') => {
                self.pos += 1;
                self.lex_real_after_dot(const_start)
            }
            Some(b) if chars::is_dec_digit(b) => {
                self.pos += 1;
                self.lex_dec_int(const_start)
            }
            _ => {
                self.push(TokenKind::Integer, const_start);
                Ok(())
            }
        }
    }

    /// After `0w`: a word constant, or the `0` was a complete integer and
    /// the `w` starts an ordinary identifier.
    fn lex_after_zero_w(&mut self, const_start: usize) -> Result<(), LexError> {
        match self.peek() {
            Some(b'x') if self.peek_at(1).is_some_and(chars::is_hex_digit) => {
                self.pos += 2;
                self.lex_hex_word(const_start)
            }
            Some(b) if chars::is_dec_digit(b) => {
                self.pos += 1;
                self.lex_dec_word(const_start)
            }
            _ => {
                // Roll back to just past the `0`; the `w` (and a trailing
                // `x` without hex digits) reprocess as an identifier.
                self.pos = const_start + 1;
                self.push(TokenKind::Integer, const_start);
                Ok(())
            }
        }
    }

    /// Inside the digits of a decimal integer (possibly signed).
    fn lex_dec_int(&mut self, const_start: usize) -> Result<(), LexError> {
        self.advance_while(chars::is_dec_digit);
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.lex_real_after_dot(const_start)
        } else {
            self.push(TokenKind::Integer, const_start);
            Ok(())
        }
    }

    /// Inside the digits of a hex integer; the prefix is consumed.
    fn lex_hex_int(&mut self, const_start: usize) -> Result<(), LexError> {
        self.advance_while(chars::is_hex_digit);
        self.push(TokenKind::Integer, const_start);
        Ok(())
    }

    /// Inside the digits of a decimal word; the `0w` prefix is consumed.
    fn lex_dec_word(&mut self, const_start: usize) -> Result<(), LexError> {
        self.advance_while(chars::is_dec_digit);
        self.push(TokenKind::Word, const_start);
        Ok(())
    }

    /// Inside the digits of a hex word; the `0wx` prefix is consumed.
    fn lex_hex_word(&mut self, const_start: usize) -> Result<(), LexError> {
        self.advance_while(chars::is_hex_digit);
        self.push(TokenKind::Word, const_start);
        Ok(())
    }

    /// Just past the decimal point: at least one digit is mandatory.
    #[allow(clippy::cast_possible_truncation)]
    fn lex_real_after_dot(&mut self, const_start: usize) -> Result<(), LexError> {
        match self.peek() {
            Some(b) if chars::is_dec_digit(b) => {
                self.pos += 1;
                self.lex_real(const_start)
            }
            _ => Err(LexError::at(
                LexErrorKind::UnexpectedEndOfReal,
                self.pos as u32,
            )),
        }
    }

    /// Inside the fractional digits of a real constant.
    #[allow(clippy::cast_possible_truncation)]
    fn lex_real(&mut self, const_start: usize) -> Result<(), LexError> {
        self.advance_while(chars::is_dec_digit);
        if matches!(self.peek(), Some(b'E' | b'e')) {
            return Err(LexError::at(LexErrorKind::RealExponent, self.pos as u32));
        }
        self.push(TokenKind::Real, const_start);
        Ok(())
    }

    // ========================================================================
    // String constants
    // ========================================================================

    /// Inside a string literal; the opening quote is consumed.
    #[allow(clippy::cast_possible_truncation)]
    fn lex_string(&mut self, string_start: usize) -> Result<(), LexError> {
        loop {
            match self.peek() {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnclosedString(string_start as u32),
                        Span::from(string_start..string_start + 1),
                    ));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.lex_string_escape(string_start)?;
                }
                Some(b'"') => {
                    self.pos += 1;
                    self.push(TokenKind::String, string_start);
                    return Ok(());
                }
                Some(b) if chars::is_print(b) => self.pos += 1,
                Some(_) => {
                    return Err(LexError::at(
                        LexErrorKind::NonPrintable(self.pos as u32),
                        self.pos as u32,
                    ));
                }
            }
        }
    }

    /// Just past a backslash inside a string.
    ///
    /// A character that introduces no escape is left unconsumed; the
    /// string body re-examines it (and rejects it there if non-printable).
    #[allow(clippy::cast_possible_truncation)]
    fn lex_string_escape(&mut self, string_start: usize) -> Result<(), LexError> {
        let esc_start = self.pos - 1;
        match self.peek() {
            None => Err(LexError::new(
                LexErrorKind::UnclosedString(string_start as u32),
                Span::from(string_start..string_start + 1),
            )),
            Some(b) if chars::is_single_escape(b) => {
                self.pos += 1;
                Ok(())
            }
            Some(b) if chars::is_format_escape(b) => {
                self.pos += 1;
                self.lex_format_escape(esc_start)
            }
            Some(b'^') => {
                self.pos += 1;
                self.lex_control_escape(string_start)
            }
            Some(b'u') => {
                for i in 1..=4 {
                    if !self.peek_at(i).is_some_and(chars::is_hex_digit) {
                        let found = self.error_slice(esc_start, self.pos + 5);
                        return Err(LexError::new(
                            LexErrorKind::BadUnicodeEscape(found.into()),
                            Span::from(esc_start..esc_start + found.len()),
                        ));
                    }
                }
                self.pos += 5;
                Ok(())
            }
            Some(b) if chars::is_dec_digit(b) => {
                for i in 0..3 {
                    if !self.peek_at(i).is_some_and(chars::is_dec_digit) {
                        let found = self.error_slice(esc_start, self.pos + 3);
                        return Err(LexError::new(
                            LexErrorKind::BadDigitEscape(found.into()),
                            Span::from(esc_start..esc_start + found.len()),
                        ));
                    }
                }
                self.pos += 3;
                Ok(())
            }
            Some(_) => Ok(()),
        }
    }

    /// Just past `\^`: the next character must name a control character,
    /// after which the escape state resumes.
    #[allow(clippy::cast_possible_truncation)]
    fn lex_control_escape(&mut self, string_start: usize) -> Result<(), LexError> {
        match self.peek() {
            None => Err(LexError::at(
                LexErrorKind::IncompleteControlEscape(self.pos as u32),
                self.pos as u32,
            )),
            Some(b) if chars::is_control_escape(b) => {
                self.pos += 1;
                self.lex_string_escape(string_start)
            }
            Some(_) => Err(LexError::at(
                LexErrorKind::InvalidControlEscape(self.pos as u32),
                self.pos as u32,
            )),
        }
    }

    /// Inside a `\f...f\` format escape; `esc_start` is the opening
    /// backslash.
    #[allow(clippy::cast_possible_truncation)]
    fn lex_format_escape(&mut self, esc_start: usize) -> Result<(), LexError> {
        loop {
            match self.peek() {
                None => {
                    return Err(LexError::at(
                        LexErrorKind::IncompleteFormatEscape(esc_start as u32),
                        esc_start as u32,
                    ));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(b) if chars::is_format_escape(b) => self.pos += 1,
                Some(_) => {
                    return Err(LexError::at(
                        LexErrorKind::InvalidFormatEscape(self.pos as u32),
                        self.pos as u32,
                    ));
                }
            }
        }
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Inside a comment; the opening `(*` is consumed and counts as depth 1.
    #[allow(clippy::cast_possible_truncation)]
    fn lex_comment(&mut self, comment_start: usize) -> Result<(), LexError> {
        let mut nesting = 1u32;
        while nesting > 0 {
            match (self.peek(), self.peek_at(1)) {
                (Some(b'('), Some(b'*')) => {
                    self.pos += 2;
                    nesting += 1;
                }
                (Some(b'*'), Some(b')')) => {
                    self.pos += 2;
                    nesting -= 1;
                }
                (Some(_), _) => self.pos += 1,
                (None, _) => {
                    return Err(LexError::new(
                        LexErrorKind::UnclosedComment(comment_start as u32),
                        Span::from(comment_start..comment_start + 2),
                    ));
                }
            }
        }
        self.push(TokenKind::Comment, comment_start);
        Ok(())
    }
}
