// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Conversion between the camelCase flag names used in a schema and the
//! hyphen-separated names typed on the command line.

/// Separator used by the wire (command line) form of a flag name.
pub const WIRE_SEPARATOR: char = '-';

/// Convert a hyphen (or underscore) separated name into camelCase.
///
/// Names that are already camelCase are returned unchanged.
pub fn camel_case(name: &str) -> String {
    let segments: Vec<&str> = name
        .split(|c: char| c == WIRE_SEPARATOR || c == '_' || c == ' ')
        .filter(|s| !s.is_empty())
        .collect();

    let mut result = String::with_capacity(name.len());

    for (i, segment) in segments.into_iter().enumerate() {
        // "FOO" is a shouted word, not an abbreviation inside a camel name.
        let owned;
        let segment = if segment.chars().count() > 1
            && segment.chars().all(|c| !c.is_lowercase())
        {
            owned = segment.to_lowercase();
            owned.as_str()
        } else {
            segment
        };

        let mut chars = segment.chars();

        if let Some(first) = chars.next() {
            if i == 0 {
                result.extend(first.to_lowercase());
            } else {
                result.extend(first.to_uppercase());
            }

            result.push_str(chars.as_str());
        }
    }

    result
}

/// Convert a camelCase name into its lower-case, `separator` delimited form.
pub fn decamelize(name: &str, separator: char) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());

            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);

            if boundary && prev != separator {
                result.push(separator);
            }
        }

        result.extend(c.to_lowercase());
    }

    result
}

/// Wire form of a canonical flag key.
pub fn wire_key(key: &str) -> String {
    decamelize(key, WIRE_SEPARATOR)
}

/// Format a canonical key the way a user would type it: `fooBar` -> `--foo-bar`.
pub fn decamelize_flag_key(key: &str) -> String {
    format!("--{}", wire_key(key))
}

/// Quote and join flag keys for error messages, each with `prefix`.
pub fn join_flag_keys(keys: &[&str], prefix: &str) -> String {
    let quoted: Vec<String> = keys
        .iter()
        .map(|key| format!("`{}{}`", prefix, key))
        .collect();

    quoted.join(", ")
}
