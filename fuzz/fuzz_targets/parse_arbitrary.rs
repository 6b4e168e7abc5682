// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for lexer and parser crash safety testing.
//!
//! This target feeds arbitrary byte sequences through the lexer and the
//! parser and asserts that neither panics. Both must handle all input
//! gracefully: the lexer returns either tokens or a failure envelope with
//! partial tokens, the parser returns an AST or a structured error.
//!
//! Invalid UTF-8 bytes are converted via lossy conversion (U+FFFD
//! replacement) so unusual byte sequences still exercise the state
//! machine.

#![no_main]

use libfuzzer_sys::fuzz_target;
use merl_core::source_analysis::{lex, parse};

fuzz_target!(|data: &[u8]| {
    // Convert to UTF-8 using lossy conversion so invalid bytes become
    // U+FFFD replacement characters rather than being dropped.
    let source = String::from_utf8_lossy(data);

    // Success = no panic. Results are otherwise ignored.
    let _tokens = lex(&source);
    let _ast = parse(&source);
});
