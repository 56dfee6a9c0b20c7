//! Display ordering of module keys.
//!
//! Keys compare the way a UI collator orders them: letters ignore case,
//! punctuation sorts before symbols, both sort before digits and digits
//! before letters. So `X-` precedes `X+` and `alpha` precedes `Input`.

use std::cmp::Ordering;

/// Punctuation in collation order.
const PUNCTUATION: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^";

/// Symbols in collation order.
const SYMBOLS: &str = "+<=>|~$";

/// Primary weight of one character: (class, rank within class).
fn weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        return (0, c as u32);
    }
    if let Some(pos) = PUNCTUATION.find(c) {
        return (1, pos as u32);
    }
    if let Some(pos) = SYMBOLS.find(c) {
        return (2, pos as u32);
    }
    if c.is_numeric() {
        return (4, c.to_digit(10).unwrap_or(c as u32));
    }
    if c.is_alphabetic() {
        let folded = c.to_lowercase().next().unwrap_or(c);
        return (5, folded as u32);
    }
    (3, c as u32)
}

/// Compare two module keys for display.
///
/// Case only breaks ties, lowercase first. Remaining ties fall back to
/// byte order so the ordering is total.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(weight)
        .cmp(b.chars().map(weight))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Sort keys for display and drop duplicates.
pub(crate) fn sort_keys(keys: &mut Vec<String>) {
    keys.sort_by(|a, b| compare_keys(a, b));
    keys.dedup();
}
