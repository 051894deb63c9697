//! Single-string encoding for lists stored as one settings value.
//!
//! Elements are joined with `,`. Decoding splits on `,` and parses every element
//! on its own, silently dropping the ones that fail to parse.

use std::fmt::Display;
use std::str::FromStr;

pub const SEPARATOR: char = ',';

#[must_use]
pub fn encode_list<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[must_use]
pub fn decode_list<T: FromStr>(stored: &str) -> Vec<T> {
    stored
        .split(SEPARATOR)
        .filter_map(|element| element.parse().ok())
        .collect()
}
