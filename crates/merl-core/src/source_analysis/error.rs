// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for the Merl front-end.
//!
//! Lexical errors are fatal for the invocation that raised them, but the
//! tokens emitted before the failure are a first-class output: editors
//! render the partial stream with a cursor at the first bad byte. That is
//! why the lexer returns [`LexFailure`] (partial tokens + error) rather
//! than a bare error.
//!
//! All errors integrate with [`miette`] for diagnostic rendering. The
//! message texts of [`LexErrorKind`] are part of the crate's contract and
//! are pinned by tests.

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use super::{Span, Token};

/// A lexical error with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct LexError {
    /// The kind of lexical error.
    #[source]
    pub kind: LexErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub const fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates an error pointing at a single byte offset.
    #[must_use]
    pub const fn at(kind: LexErrorKind, offset: u32) -> Self {
        Self::new(kind, Span::point(offset))
    }
}

/// The kind of lexical error.
///
/// Display strings are contractual; diagnostic tests match them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A lone dot where only `...` is lexable.
    #[error("unexpected '.'")]
    UnexpectedDot,

    /// A type variable appeared in qualifier position, e.g. `'a.x`.
    #[error("structure identifiers cannot start with prime")]
    PrimeQualifier,

    /// A reserved word appeared before a structure-access dot.
    #[error("reserved word '{0}' cannot be used as qualifier")]
    ReservedQualifier(EcoString),

    /// A reserved word terminated a qualified name, e.g. `Foo.val`.
    #[error("reserved word '{0}' prefaced by qualifiers")]
    ReservedAfterQualifiers(EcoString),

    /// A qualifier's dot was not followed by an identifier.
    #[error("unexpected end of qualified identifier")]
    UnexpectedEndOfLongIdentifier,

    /// A real constant's decimal point was not followed by a digit.
    #[error("unexpected end of real constant")]
    UnexpectedEndOfReal,

    /// `E`/`e` after the fractional digits of a real constant.
    #[error("real constants with exponents not supported yet")]
    RealExponent,

    /// A non-printable character appeared verbatim in a string body.
    #[error("non-printable character at {0}")]
    NonPrintable(u32),

    /// End of input inside a string literal.
    #[error("unclosed string starting at {0}")]
    UnclosedString(u32),

    /// A `\ddd` escape with fewer than three decimal digits.
    #[error("in string, expected escape sequence \\ddd but found {0}")]
    BadDigitEscape(EcoString),

    /// A `\uxxxx` escape with fewer than four hex digits.
    #[error("in string, expected escape sequence \\uxxxx but found {0}")]
    BadUnicodeEscape(EcoString),

    /// `\^` followed by a character outside `@`..`_`.
    #[error("invalid control escape sequence at {0}")]
    InvalidControlEscape(u32),

    /// End of input immediately after `\^`.
    #[error("incomplete control escape sequence at {0}")]
    IncompleteControlEscape(u32),

    /// A non-format character between the backslashes of a format escape.
    #[error("invalid format escape sequence at {0}")]
    InvalidFormatEscape(u32),

    /// End of input inside a format escape.
    #[error("incomplete format escape sequence at {0}")]
    IncompleteFormatEscape(u32),

    /// End of input inside a (possibly nested) comment.
    #[error("unclosed comment starting at {0}")]
    UnclosedComment(u32),
}

/// The failure envelope of a lex invocation.
///
/// Carries every token successfully emitted before the failure, in input
/// order, alongside the error itself. The partial stream is a proper
/// prefix of what a successful run over the same input would produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct LexFailure<'src> {
    /// Tokens emitted before the failure, in input order.
    pub partial: Vec<Token<'src>>,
    /// The error that ended lexing.
    pub error: LexError,
}

/// A structured parse error: `{header, position, what, explain?}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{header}: {what}")]
#[diagnostic()]
pub struct ParseError {
    /// Short category header, e.g. `"syntax error"`.
    pub header: EcoString,
    /// Where the error was detected.
    #[label("here")]
    pub position: Span,
    /// What went wrong.
    pub what: EcoString,
    /// Optional longer explanation.
    #[help]
    pub explain: Option<EcoString>,
}

impl ParseError {
    /// Creates a parse error with no explanation.
    #[must_use]
    pub fn new(header: impl Into<EcoString>, position: Span, what: impl Into<EcoString>) -> Self {
        Self {
            header: header.into(),
            position,
            what: what.into(),
            explain: None,
        }
    }

    /// Attaches an explanation to this error.
    #[must_use]
    pub fn with_explain(mut self, explain: impl Into<EcoString>) -> Self {
        self.explain = Some(explain.into());
        self
    }

    /// Wraps a lexical error; the partial token stream is dropped here
    /// because the parser has nothing to consume.
    #[must_use]
    pub fn lexical(error: &LexError) -> Self {
        Self::new("lexical error", error.span, error.kind.to_string())
    }
}
