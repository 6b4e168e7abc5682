// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Merl.
//!
//! The parser is early in its development and covers a small slice of the
//! language, but the AST already follows the convention the rest of the
//! front-end is built around: **every node keeps the concrete tokens it
//! was built from**, delimiters included. A tuple stores its parentheses
//! and commas, a binding stores its `val` and `=`. Because tokens borrow
//! their text from the source buffer, the tree preserves exact lexemes and
//! byte positions without copying anything.

use crate::source_analysis::{Span, Token};

/// A parsed program: a sequence of declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast<'src> {
    /// Top-level declarations in source order.
    pub decs: Vec<Dec<'src>>,
    /// Source location spanning all declarations.
    pub span: Span,
}

/// A declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dec<'src> {
    /// A value binding: `val rec? pat = exp`.
    Val(ValBind<'src>),
}

impl Dec<'_> {
    /// Returns the source span of this declaration.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Val(bind) => bind.span,
        }
    }
}

/// A value binding: `val x = 0`, `val rec loop = ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValBind<'src> {
    /// The `val` keyword token.
    pub val_tok: Token<'src>,
    /// The `rec` keyword token, if present.
    pub rec_tok: Option<Token<'src>>,
    /// The bound pattern.
    pub pat: Pat<'src>,
    /// The `=` token between pattern and expression.
    pub eq_tok: Token<'src>,
    /// The bound expression.
    pub exp: Exp<'src>,
    /// Source location of the whole binding.
    pub span: Span,
}

/// A pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pat<'src> {
    /// The wildcard pattern `_`.
    Wildcard(Token<'src>),
    /// A constant pattern (integer, word or string).
    Constant(Token<'src>),
    /// A variable pattern.
    Var(Token<'src>),
    /// A tuple pattern `(p1, ..., pn)`; `()` is the unit pattern.
    Tuple(Delimited<'src, Pat<'src>>),
}

impl Pat<'_> {
    /// Returns the source span of this pattern.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Wildcard(tok) | Self::Constant(tok) | Self::Var(tok) => tok.span(),
            Self::Tuple(tuple) => tuple.span(),
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exp<'src> {
    /// A constant (integer, word, real or string).
    Constant(Token<'src>),
    /// A possibly qualified variable reference.
    Var(LongIdent<'src>),
    /// A tuple expression `(e1, ..., en)`; `()` is the unit value.
    Tuple(Delimited<'src, Exp<'src>>),
    /// A list expression `[e1, ..., en]`.
    List(Delimited<'src, Exp<'src>>),
}

impl Exp<'_> {
    /// Returns the source span of this expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Constant(tok) => tok.span(),
            Self::Var(longid) => longid.span(),
            Self::Tuple(group) | Self::List(group) => group.span(),
        }
    }
}

/// A long identifier: zero or more qualifier tokens followed by the name,
/// e.g. `Foo.Bar.baz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongIdent<'src> {
    /// Qualifier tokens, outermost first. Dots are not stored: a
    /// qualifier's slice ends where its dot begins.
    pub qualifiers: Vec<Token<'src>>,
    /// The identifier naming the value.
    pub name: Token<'src>,
}

impl LongIdent<'_> {
    /// Returns the span from the first qualifier to the name.
    #[must_use]
    pub fn span(&self) -> Span {
        match self.qualifiers.first() {
            Some(first) => first.span().merge(self.name.span()),
            None => self.name.span(),
        }
    }
}

/// A delimited, comma-separated sequence with its delimiter tokens kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimited<'src, T> {
    /// The opening delimiter token.
    pub open: Token<'src>,
    /// The items between the delimiters.
    pub items: Vec<T>,
    /// The comma tokens separating the items (`items.len() - 1` of them,
    /// or empty when there are no items).
    pub commas: Vec<Token<'src>>,
    /// The closing delimiter token.
    pub close: Token<'src>,
}

impl<T> Delimited<'_, T> {
    /// Returns the span from the opening to the closing delimiter.
    #[must_use]
    pub fn span(&self) -> Span {
        self.open.span().merge(self.close.span())
    }
}
