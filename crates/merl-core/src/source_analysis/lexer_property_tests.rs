// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Merl lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated
//! inputs:
//!
//! 1. **Lexer never panics** — arbitrary string input always produces a
//!    result
//! 2. **Token spans are in bounds, ordered and non-empty**
//! 3. **Idempotent slicing** — `source[token.span]` equals `token.text()`
//! 4. **Reserved disambiguation** — identifier-classed tokens are never
//!    reserved words, reserved tokens carry their own table tag
//! 5. **Comment preservation** — comment slices are `(*`-delimited
//! 6. **Lexer is deterministic** — same input, same result
//! 7. **Valid fragments lex cleanly** — known-good inputs never fail
//! 8. **Failure implies prefix** — a failing tail does not disturb the
//!    tokens emitted before it
//! 9. **Prefix stability** — truncating at any token end re-lexes to the
//!    corresponding token prefix

use proptest::prelude::*;

use super::lexer::lex;
use super::token::{Reserved, TokenKind};

// ============================================================================
// Generators
// ============================================================================

/// Known-valid fragments that lex without errors, qualifier-free so that
/// every token boundary is also a safe truncation point.
const VALID_FRAGMENTS: &[&str] = &[
    "val", "rec", "fn", "andalso", "x", "x'", "foo_bar", "'a", "''eq", "~", "+", "::", ":=",
    "<=", "=", "=>", "->", "|", ":", ":>", "#", "0", "42", "~7", "007", "0x1F", "~0x10", "~0",
    "0w0", "0w42", "0wx1A", "1.5", "~0.25", "3.14159", "(", ")", "[", "]", "{", "}", ",", ";",
    "_", "...", "\"\"", "\"hello\"", "\"a\\t\\065\\u00FFz\"", "\"br\\  \\eak\"", "(*c*)",
    "(* nested (* comment *) here *)",
];

/// Fragments that produce qualified-identifier tokens; valid, but their
/// internal token boundaries are not truncation-stable (truncating
/// `Foo.bar` after `Foo` yields an identifier, not a qualifier).
const QUALIFIED_FRAGMENTS: &[&str] = &["Foo.bar", "Foo.Bar.baz", "Int.+", "List.map"];

/// Failing tails that emit no tokens of their own before the error.
const FAILING_TAILS: &[&str] = &["\"abc", "(* never closed", "1.0E2", "1.", ".", "'a.b", "val.x"];

fn fragment_sequence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VALID_FRAGMENTS), 0..12)
        .prop_map(|parts| parts.join(" "))
}

fn fragment_sequence_with_qualifiers() -> impl Strategy<Value = String> {
    let any_fragment = prop_oneof![
        prop::sample::select(VALID_FRAGMENTS),
        prop::sample::select(QUALIFIED_FRAGMENTS),
    ];
    prop::collection::vec(any_fragment, 0..12).prop_map(|parts| parts.join(" "))
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Property 1: lexing arbitrary input never panics.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,500}") {
        let _result = lex(&input);
    }

    /// Property 2+3: spans are in bounds, ordered, non-empty and
    /// idempotent under re-slicing — on success and on the partial tokens
    /// of a failure alike.
    #[test]
    fn token_spans_well_formed(input in "\\PC{0,500}") {
        let tokens = match lex(&input) {
            Ok(tokens) => tokens,
            Err(failure) => failure.partial,
        };
        let mut prev_end = 0u32;
        for token in &tokens {
            let span = token.span();
            prop_assert!(!span.is_empty(), "empty span {span:?} in {input:?}");
            prop_assert!(span.start() >= prev_end, "overlap at {span:?} in {input:?}");
            prop_assert!(span.end() as usize <= input.len());
            prop_assert_eq!(&input[span.as_range()], token.text());
            prev_end = span.end();
        }
    }

    /// Property 4: a token lexes as an identifier iff its text is not in
    /// the reserved-word table, and reserved tokens carry their own tag.
    /// Qualifier slices are never reserved words.
    #[test]
    fn reserved_disambiguation(input in "\\PC{0,300}") {
        if let Ok(tokens) = lex(&input) {
            for token in &tokens {
                match token.kind() {
                    TokenKind::Identifier | TokenKind::Qualifier => {
                        prop_assert_eq!(
                            Reserved::from_text(token.text()),
                            None,
                            "reserved word {:?} classed as {:?}",
                            token.text(),
                            token.kind(),
                        );
                    }
                    TokenKind::Reserved(tag) => {
                        prop_assert_eq!(Reserved::from_text(token.text()), Some(tag));
                    }
                    _ => {}
                }
            }
        }
    }

    /// Property 5: comment slices start with `(*`, end with `*)`, and
    /// their nesting is balanced.
    #[test]
    fn comment_preservation(input in "\\PC{0,300}") {
        if let Ok(tokens) = lex(&input) {
            for token in tokens.iter().filter(|t| t.is_comment()) {
                let text = token.text();
                prop_assert!(text.starts_with("(*"), "{text:?}");
                prop_assert!(text.ends_with("*)"), "{text:?}");

                let bytes = text.as_bytes();
                let mut depth = 0i32;
                let mut i = 0;
                while i < bytes.len() {
                    if bytes[i..].starts_with(b"(*") {
                        depth += 1;
                        i += 2;
                    } else if bytes[i..].starts_with(b"*)") {
                        depth -= 1;
                        prop_assert!(depth >= 0, "negative nesting in {text:?}");
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                prop_assert_eq!(depth, 0, "unbalanced nesting in {:?}", text);
            }
        }
    }

    /// Property 6: lexing is deterministic.
    #[test]
    fn lexer_deterministic(input in "\\PC{0,200}") {
        prop_assert_eq!(lex(&input), lex(&input));
    }

    /// Property 7: sequences of known-valid fragments lex without errors.
    #[test]
    fn valid_fragments_lex_cleanly(input in fragment_sequence_with_qualifiers()) {
        let result = lex(&input);
        prop_assert!(result.is_ok(), "lex({input:?}) failed: {:?}", result.err());
    }

    /// Property 8: appending a failing tail reports exactly the tokens of
    /// the valid prefix as the partial result.
    #[test]
    fn failure_preserves_prefix_tokens(
        prefix in fragment_sequence_with_qualifiers(),
        tail in prop::sample::select(FAILING_TAILS),
    ) {
        let input = format!("{prefix} {tail}");
        let failure = lex(&input).expect_err("tail must fail");
        let prefix_tokens = lex(&prefix).expect("prefix must lex");
        prop_assert_eq!(failure.partial, prefix_tokens);
    }

    /// Property 9: truncating a successful input at any token end
    /// re-lexes to exactly the tokens before the cut.
    #[test]
    fn truncation_at_token_ends_is_stable(input in fragment_sequence()) {
        let tokens = lex(&input).expect("fragments must lex");
        for (i, token) in tokens.iter().enumerate() {
            let truncated = &input[..token.span().end() as usize];
            let relexed = lex(truncated).expect("truncated input must lex");
            prop_assert_eq!(&relexed, &tokens[..=i], "truncated at {}", token.span().end());
        }
    }
}
