// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Merl compiler front-end core.
//!
//! This crate contains the front half of the Merl compiler:
//! - Lexical analysis (tokenization)
//! - Parsing (AST construction, early development)
//!
//! The lexer is the mature part: a single-pass, zero-copy state machine
//! covering Merl's full lexical grammar — four numeric constant formats,
//! string literals with five classes of escape sequences, nested block
//! comments, and qualified long identifiers. The parser currently covers
//! `val` bindings and a small expression language.
//!
//! The crate is library-shaped: no file IO, no CLI, no persisted state.
//! Callers hand in a source string and get back tokens or an AST.

pub mod ast;
pub mod source_analysis;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Ast, Dec, Exp, LongIdent, Pat, ValBind};
    pub use crate::source_analysis::{
        lex, parse, LexError, LexErrorKind, LexFailure, ParseError, Span, Token, TokenKind,
    };
}
