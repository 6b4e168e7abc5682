// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for Merl source code.
//!
//! This module contains the lexer, the token model, and the parser.
//!
//! # Lexical Analysis
//!
//! [`lex`] converts source text into a stream of [`Token`]s, each a
//! zero-copy slice of the input paired with a [`TokenKind`] and a
//! [`Span`]. Comments are first-class tokens (the parser filters them),
//! and whitespace is skipped.
//!
//! ```
//! use merl_core::source_analysis::{lex, TokenKind};
//!
//! let tokens = lex("val x = 0").unwrap();
//! assert_eq!(tokens.len(), 4);
//! assert_eq!(tokens[0].kind(), TokenKind::Reserved(merl_core::source_analysis::Reserved::Val));
//! ```
//!
//! # Error Handling
//!
//! Lexical errors are fatal for the invocation but never discard work
//! already done: [`lex`] returns a [`LexFailure`] carrying the partial
//! token prefix alongside the [`LexError`]. The parser surfaces its own
//! errors as structured [`ParseError`] records. Both integrate with
//! `miette` for rendering.
//!
//! # Parsing
//!
//! [`parse`] builds an [`Ast`](crate::ast::Ast) from the comment-filtered
//! token stream. Every AST node keeps the delimiter tokens it was built
//! from, so exact lexemes and positions are preserved.

pub mod chars;
mod error;
mod lexer;
mod parser;
mod span;
mod token;

// Property-based tests for the lexer invariants
#[cfg(test)]
mod lexer_property_tests;

pub use error::{LexError, LexErrorKind, LexFailure, ParseError};
pub use lexer::lex;
pub use parser::parse;
pub use span::Span;
pub use token::{Reserved, Token, TokenKind};
