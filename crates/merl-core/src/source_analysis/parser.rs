// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Merl source code.
//!
//! The parser is an early-development skeleton: it currently covers `val`
//! bindings over a small expression language (constants, long
//! identifiers, tuples and lists). Its load-bearing contracts are already
//! final, though:
//!
//! - it consumes the lexer's token stream with `Comment` tokens filtered
//!   out, random-access by index, and never rewinds across the lexer
//!   boundary;
//! - every AST node it builds retains the concrete delimiter tokens it
//!   observed, so lexemes and source positions survive into the tree;
//! - errors are structured [`ParseError`] records
//!   (`{header, position, what, explain?}`), never panics.
//!
//! On success the parser reports how much of the stream it consumed
//! through a `tracing` debug event rather than printing to stdout.

use ecow::eco_format;

use crate::ast::{Ast, Dec, Delimited, Exp, LongIdent, Pat, ValBind};

use super::error::ParseError;
use super::lexer::lex;
use super::{Reserved, Span, Token, TokenKind};

/// Maximum nesting depth for patterns and expressions.
///
/// Deeply nested input (`((((...))))`) would otherwise overflow the stack
/// through the recursive descent.
const MAX_NESTING_DEPTH: usize = 64;

/// Parses a complete source text into an [`Ast`].
///
/// Comments are filtered from the token stream before parsing; all other
/// tokens must form a sequence of declarations.
///
/// # Examples
///
/// ```
/// use merl_core::source_analysis::parse;
///
/// let ast = parse("val x = 0").unwrap();
/// assert_eq!(ast.decs.len(), 1);
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] on the first syntax error, or a `ParseError`
/// wrapping the lexer's message if lexing fails.
pub fn parse(source: &str) -> Result<Ast<'_>, ParseError> {
    let tokens = lex(source).map_err(|failure| ParseError::lexical(&failure.error))?;
    let tokens: Vec<Token<'_>> = tokens.into_iter().filter(|t| !t.is_comment()).collect();
    let total = tokens.len();

    let mut parser = Parser::new(tokens);
    let ast = parser.parse_program()?;
    tracing::debug!("Successfully parsed {} out of {} tokens", parser.current, total);
    Ok(ast)
}

/// The parser state.
struct Parser<'src> {
    /// The comment-free token stream.
    tokens: Vec<Token<'src>>,
    /// Current token index.
    current: usize,
    /// Current pattern/expression nesting depth.
    depth: usize,
}

impl<'src> Parser<'src> {
    fn new(tokens: Vec<Token<'src>>) -> Self {
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    // ========================================================================
    // Token management
    // ========================================================================

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.current).copied()
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.peek()?;
        self.current += 1;
        Some(token)
    }

    /// Consumes the current token if it is the given reserved word.
    fn eat_reserved(&mut self, tag: Reserved) -> Option<Token<'src>> {
        match self.peek() {
            Some(token) if token.reserved() == Some(tag) => self.advance(),
            _ => None,
        }
    }

    /// Consumes the given reserved word or reports a syntax error.
    fn expect_reserved(&mut self, tag: Reserved, explain: &str) -> Result<Token<'src>, ParseError> {
        self.eat_reserved(tag).ok_or_else(|| {
            self.error_here(eco_format!("expected '{}'", tag.as_str()))
                .with_explain(explain)
        })
    }

    /// Builds a syntax error at the current token (or end of input).
    fn error_here(&self, what: impl Into<ecow::EcoString>) -> ParseError {
        let position = self
            .peek()
            .map_or_else(|| self.eof_span(), |token| token.span());
        ParseError::new("syntax error", position, what)
    }

    /// An empty span just past the last token.
    fn eof_span(&self) -> Span {
        self.tokens
            .last()
            .map_or_else(|| Span::point(0), |token| Span::point(token.span().end()))
    }

    /// Guards recursive descent against deeply nested input.
    fn enter_nesting(&mut self, span: Span) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::new(
                "syntax error",
                span,
                "pattern or expression nesting too deep",
            ));
        }
        Ok(())
    }

    fn leave_nesting(&mut self) {
        self.depth -= 1;
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_program(&mut self) -> Result<Ast<'src>, ParseError> {
        let mut decs = Vec::new();
        while let Some(token) = self.peek() {
            if !token.is_dec_start() {
                return Err(ParseError::new(
                    "syntax error",
                    token.span(),
                    eco_format!("expected a declaration, found '{}'", token.text()),
                ));
            }
            decs.push(self.parse_dec()?);
        }

        let span = match (decs.first(), decs.last()) {
            (Some(first), Some(last)) => first.span().merge(last.span()),
            _ => Span::point(0),
        };
        Ok(Ast { decs, span })
    }

    fn parse_dec(&mut self) -> Result<Dec<'src>, ParseError> {
        // Callers guarantee the current token starts a declaration.
        if let Some(val_tok) = self.eat_reserved(Reserved::Val) {
            return self.parse_val_bind(val_tok).map(Dec::Val);
        }
        Err(self
            .error_here("only 'val' declarations are implemented")
            .with_explain("other declaration forms are not supported yet"))
    }

    fn parse_val_bind(&mut self, val_tok: Token<'src>) -> Result<ValBind<'src>, ParseError> {
        let rec_tok = self.eat_reserved(Reserved::Rec);
        let pat = self.parse_pat()?;
        let eq_tok =
            self.expect_reserved(Reserved::Equal, "a value binding has the form 'val pat = exp'")?;
        let exp = self.parse_exp()?;
        let span = val_tok.span().merge(exp.span());
        Ok(ValBind {
            val_tok,
            rec_tok,
            pat,
            eq_tok,
            exp,
            span,
        })
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    fn parse_pat(&mut self) -> Result<Pat<'src>, ParseError> {
        let span = self.peek().map_or_else(|| self.eof_span(), Token::span);
        self.enter_nesting(span)?;
        let result = self.parse_pat_inner();
        self.leave_nesting();
        result
    }

    fn parse_pat_inner(&mut self) -> Result<Pat<'src>, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.error_here("expected a pattern"));
        };

        match token.kind() {
            TokenKind::Reserved(Reserved::Underscore) => {
                self.current += 1;
                Ok(Pat::Wildcard(token))
            }
            TokenKind::Reserved(Reserved::OpenParen) => {
                self.current += 1;
                self.parse_delimited(token, Reserved::CloseParen, Self::parse_pat)
                    .map(Pat::Tuple)
            }
            TokenKind::Identifier => {
                self.current += 1;
                Ok(Pat::Var(token))
            }
            TokenKind::Real => Err(ParseError::new(
                "syntax error",
                token.span(),
                "real constants cannot appear in patterns",
            )),
            _ if token.is_pattern_constant() => {
                self.current += 1;
                Ok(Pat::Constant(token))
            }
            _ => Err(self.error_here(eco_format!(
                "expected a pattern, found '{}'",
                token.text()
            ))),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_exp(&mut self) -> Result<Exp<'src>, ParseError> {
        let span = self.peek().map_or_else(|| self.eof_span(), Token::span);
        self.enter_nesting(span)?;
        let result = self.parse_exp_inner();
        self.leave_nesting();
        result
    }

    fn parse_exp_inner(&mut self) -> Result<Exp<'src>, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.error_here("expected an expression"));
        };

        match token.kind() {
            TokenKind::Reserved(Reserved::OpenParen) => {
                self.current += 1;
                self.parse_delimited(token, Reserved::CloseParen, Self::parse_exp)
                    .map(Exp::Tuple)
            }
            TokenKind::Reserved(Reserved::OpenBracket) => {
                self.current += 1;
                self.parse_delimited(token, Reserved::CloseBracket, Self::parse_exp)
                    .map(Exp::List)
            }
            TokenKind::Identifier | TokenKind::Qualifier => self.parse_long_ident().map(Exp::Var),
            _ if token.is_constant() => {
                self.current += 1;
                Ok(Exp::Constant(token))
            }
            _ => Err(self.error_here(eco_format!(
                "expected an expression, found '{}'",
                token.text()
            ))),
        }
    }

    /// Parses a possibly qualified identifier.
    ///
    /// The lexer guarantees that qualifier tokens are immediately followed
    /// by another qualifier or the final identifier, but the parser checks
    /// anyway rather than trusting the stream shape.
    fn parse_long_ident(&mut self) -> Result<LongIdent<'src>, ParseError> {
        let mut qualifiers = Vec::new();
        while let Some(token) = self.peek() {
            if token.kind() == TokenKind::Qualifier {
                self.current += 1;
                qualifiers.push(token);
            } else {
                break;
            }
        }
        match self.peek() {
            Some(token) if token.kind() == TokenKind::Identifier => {
                self.current += 1;
                Ok(LongIdent {
                    qualifiers,
                    name: token,
                })
            }
            _ => Err(self.error_here("expected an identifier to complete the qualified name")),
        }
    }

    // ========================================================================
    // Delimited sequences
    // ========================================================================

    /// Parses `item (',' item)* close` after `open` has been consumed,
    /// keeping every delimiter token.
    fn parse_delimited<T>(
        &mut self,
        open: Token<'src>,
        close: Reserved,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Delimited<'src, T>, ParseError> {
        let mut items = Vec::new();
        let mut commas = Vec::new();

        if let Some(close_tok) = self.eat_reserved(close) {
            return Ok(Delimited {
                open,
                items,
                commas,
                close: close_tok,
            });
        }

        loop {
            items.push(item(self)?);
            if let Some(comma) = self.eat_reserved(Reserved::Comma) {
                commas.push(comma);
                continue;
            }
            let close_tok = self.expect_reserved(close, "elements are separated by ','")?;
            return Ok(Delimited {
                open,
                items,
                commas,
                close: close_tok,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Ast<'_> {
        parse(source).unwrap_or_else(|e| panic!("parse({source:?}) failed: {e}"))
    }

    fn parse_err(source: &str) -> ParseError {
        match parse(source) {
            Ok(ast) => panic!("parse({source:?}) unexpectedly succeeded: {ast:?}"),
            Err(error) => error,
        }
    }

    fn only_val<'a>(ast: &'a Ast<'_>) -> &'a ValBind<'a> {
        assert_eq!(ast.decs.len(), 1);
        let Dec::Val(bind) = &ast.decs[0];
        bind
    }

    #[test]
    fn empty_program() {
        let ast = parse_ok("");
        assert!(ast.decs.is_empty());
    }

    #[test]
    fn simple_val_binding() {
        let ast = parse_ok("val x = 0");
        let bind = only_val(&ast);

        assert_eq!(bind.val_tok.text(), "val");
        assert!(bind.rec_tok.is_none());
        assert!(matches!(&bind.pat, Pat::Var(tok) if tok.text() == "x"));
        assert_eq!(bind.eq_tok.text(), "=");
        assert!(matches!(&bind.exp, Exp::Constant(tok) if tok.text() == "0"));
        assert_eq!(bind.span, Span::new(0, 9));
    }

    #[test]
    fn rec_binding() {
        let ast = parse_ok("val rec loop = f");
        let bind = only_val(&ast);
        assert_eq!(bind.rec_tok.map(|t| t.text()), Some("rec"));
    }

    #[test]
    fn tuple_retains_delimiter_tokens() {
        let ast = parse_ok("val (a, b) = (1, 2)");
        let bind = only_val(&ast);

        let Pat::Tuple(pat) = &bind.pat else {
            panic!("expected tuple pattern, got {:?}", bind.pat);
        };
        assert_eq!(pat.open.text(), "(");
        assert_eq!(pat.open.span(), Span::new(4, 5));
        assert_eq!(pat.items.len(), 2);
        assert_eq!(pat.commas.len(), 1);
        assert_eq!(pat.commas[0].text(), ",");
        assert_eq!(pat.close.text(), ")");
        assert_eq!(pat.close.span(), Span::new(9, 10));

        let Exp::Tuple(exp) = &bind.exp else {
            panic!("expected tuple expression, got {:?}", bind.exp);
        };
        assert_eq!(exp.items.len(), 2);
        assert_eq!(exp.commas.len(), 1);
        assert_eq!(exp.span(), Span::new(13, 19));
    }

    #[test]
    fn unit_and_wildcard() {
        let ast = parse_ok("val _ = ()");
        let bind = only_val(&ast);
        assert!(matches!(&bind.pat, Pat::Wildcard(tok) if tok.text() == "_"));

        let Exp::Tuple(unit) = &bind.exp else {
            panic!("expected unit, got {:?}", bind.exp);
        };
        assert!(unit.items.is_empty());
        assert!(unit.commas.is_empty());
    }

    #[test]
    fn list_expression() {
        let ast = parse_ok("val l = [1, 0wx1A, \"s\"]");
        let bind = only_val(&ast);
        let Exp::List(list) = &bind.exp else {
            panic!("expected list, got {:?}", bind.exp);
        };
        assert_eq!(list.items.len(), 3);
        assert_eq!(list.commas.len(), 2);
        assert_eq!(list.open.text(), "[");
        assert_eq!(list.close.text(), "]");
    }

    #[test]
    fn qualified_variable() {
        let ast = parse_ok("val y = Foo.Bar.baz");
        let bind = only_val(&ast);
        let Exp::Var(longid) = &bind.exp else {
            panic!("expected variable, got {:?}", bind.exp);
        };
        let quals: Vec<_> = longid.qualifiers.iter().map(|t| t.text()).collect();
        assert_eq!(quals, ["Foo", "Bar"]);
        assert_eq!(longid.name.text(), "baz");
    }

    #[test]
    fn multiple_declarations() {
        let ast = parse_ok("val a = 1 val b = (a, a)");
        assert_eq!(ast.decs.len(), 2);
        assert_eq!(ast.span, Span::new(0, 24));
    }

    #[test]
    fn comments_are_filtered() {
        let ast = parse_ok("(* leading *) val (* mid *) x = (* rhs *) 1 (* trailing *)");
        let bind = only_val(&ast);
        assert!(matches!(&bind.pat, Pat::Var(tok) if tok.text() == "x"));
    }

    #[test]
    fn missing_equals() {
        let error = parse_err("val x 0");
        assert_eq!(error.header, "syntax error");
        assert_eq!(error.what, "expected '='");
        assert_eq!(error.position, Span::new(6, 7));
        assert!(error.explain.is_some());
    }

    #[test]
    fn missing_expression_at_eof() {
        let error = parse_err("val x =");
        assert_eq!(error.what, "expected an expression");
        assert_eq!(error.position, Span::point(7));
    }

    #[test]
    fn unsupported_declaration_form() {
        let error = parse_err("fun f = 1");
        assert_eq!(error.what, "only 'val' declarations are implemented");
    }

    #[test]
    fn non_declaration_start() {
        let error = parse_err("1 + 2");
        assert_eq!(error.what, "expected a declaration, found '1'");
        assert_eq!(error.position, Span::new(0, 1));
    }

    #[test]
    fn real_pattern_rejected() {
        let error = parse_err("val 1.5 = x");
        assert_eq!(error.what, "real constants cannot appear in patterns");
    }

    #[test]
    fn lexical_error_is_wrapped() {
        let error = parse_err("val s = \"abc");
        assert_eq!(error.header, "lexical error");
        assert_eq!(error.what, "unclosed string starting at 8");
        assert_eq!(error.position, Span::new(8, 9));
    }

    #[test]
    fn unterminated_tuple() {
        let error = parse_err("val t = (1, 2");
        assert_eq!(error.what, "expected ')'");
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let mut source = String::from("val x = ");
        for _ in 0..100 {
            source.push('(');
        }
        source.push('1');
        for _ in 0..100 {
            source.push(')');
        }
        let error = parse_err(&source);
        assert_eq!(error.what, "pattern or expression nesting too deep");
    }
}
