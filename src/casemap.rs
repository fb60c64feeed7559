//! IRC case folding.
//!
//! Nickname comparison on IRC is case-insensitive under the `rfc1459`
//! mapping, where `[]\~` fold to `{}|^` in addition to ASCII case.
//! Rosters key participants by the folded nickname so that `Nick[1]`
//! and `nick{1}` resolve to the same entry.

/// Fold a single character using the RFC 1459 case mapping.
#[inline]
pub const fn fold_char(c: char) -> char {
    match c {
        'A'..='Z' => c.to_ascii_lowercase(),
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c,
    }
}

/// Fold an entire string, producing the canonical lookup key.
pub fn fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Ordering under the RFC 1459 mapping, without allocating folded
/// copies.
pub fn cmp_fold(a: &str, b: &str) -> std::cmp::Ordering {
    a.chars().map(fold_char).cmp(b.chars().map(fold_char))
}
