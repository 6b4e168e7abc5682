// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Character classification for the lexer.
//!
//! All predicates operate on raw bytes: Merl's lexical grammar is ASCII,
//! and anything outside these classes is either skipped as whitespace at
//! top level or rejected inside string literals.

/// `0-9`.
#[must_use]
pub const fn is_dec_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// `0-9 A-F a-f`.
#[must_use]
pub const fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// ASCII letter.
#[must_use]
pub const fn is_letter(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

/// The symbolic-identifier alphabet.
///
/// Reserved symbolic words (`=`, `=>`, `->`, …) are carved out of this set
/// by the reserved-word table after a maximal munch, not here.
#[must_use]
pub const fn is_symbolic(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'%'
            | b'&'
            | b'$'
            | b'#'
            | b'+'
            | b'-'
            | b'/'
            | b':'
            | b'<'
            | b'='
            | b'>'
            | b'?'
            | b'@'
            | b'\\'
            | b'~'
            | b'`'
            | b'^'
            | b'|'
            | b'*'
    )
}

/// Letter, digit, prime or underscore: the identifier continuation set.
#[must_use]
pub const fn is_alphanum(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'\'' || b == b'_'
}

/// Characters that form a one-character escape: `\a \b \f \n \r \t \v \\ \"`.
#[must_use]
pub const fn is_single_escape(b: u8) -> bool {
    matches!(
        b,
        b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' | b'"'
    )
}

/// Characters naming a control character in a `\^c` escape: `@` through `_`.
#[must_use]
pub const fn is_control_escape(b: u8) -> bool {
    matches!(b, b'@'..=b'_')
}

/// Characters permitted between the backslashes of a `\f...f\` format
/// escape: space, tab, newline, carriage return, form feed.
#[must_use]
pub const fn is_format_escape(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}

/// Printable ASCII; the only characters allowed verbatim in string bodies.
#[must_use]
pub const fn is_print(b: u8) -> bool {
    matches!(b, 0x20..=0x7E)
}
