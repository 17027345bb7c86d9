//! Display ordering for tree codes.
//!
//! Approximates a locale collation: letters compare case-insensitively first,
//! then lowercase sorts before uppercase, then the raw strings. Callers use a
//! stable sort so equal codes keep their arrival order.

use std::cmp::Ordering;

pub fn compare_codes(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if primary != Ordering::Equal {
        return primary;
    }

    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            // Lowercase first, as the default tertiary strength does.
            match (ca.is_lowercase(), cb.is_lowercase()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }
    }
    a.cmp(b)
}
