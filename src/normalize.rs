// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Converts raw tokenizer output into the final flags map.

use tracing::trace;

use crate::case::camel_case;
use crate::error::{Error, Result};
use crate::flag::{FlagMap, Flags, Value, END_OF_OPTIONS};
use crate::tokenizer::parse_number;

/// Flags after case conversion, before and after alias removal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Normalized {
    /// Canonical keys only.
    pub flags: FlagMap,
    /// Canonical keys plus every alias and short flag key.
    pub unnormalized_flags: FlagMap,
}

/// Single word characters name short flags and keep their case.
fn is_short_key(key: &str) -> bool {
    let mut chars = key.chars();

    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if c.is_alphanumeric() || c == '_'
    )
}

/// camelCase every key except `--` and short flags.
pub fn camel_case_keys(raw: FlagMap) -> FlagMap {
    raw.into_iter()
        .map(|(key, value)| {
            if key == END_OF_OPTIONS || is_short_key(&key) {
                (key, value)
            } else {
                (camel_case(&key), value)
            }
        })
        .collect()
}

/// Fail if a flag that does not accept multiple values was given more than
/// once.
pub fn check_occurrences(flags: &Flags, received: &FlagMap) -> Result<()> {
    for (key, flag) in flags.iter() {
        if key == END_OF_OPTIONS || flag.is_multiple {
            continue;
        }

        if let Some(Value::List(_)) = received.get(key) {
            return Err(Error::RepeatedFlag(key.into()));
        }
    }

    Ok(())
}

/// Remove every alias and short flag key, leaving canonical keys only.
pub fn strip_aliases(flags: &Flags, received: &mut FlagMap) {
    for (_, flag) in flags.iter() {
        for alias in flag.all_aliases() {
            received.shift_remove(&alias);
        }
    }
}

/// Build the `flags` and `unnormalized_flags` maps from the tokenizer's
/// key/value map.
pub fn normalize_flags(flags: &Flags, raw: FlagMap) -> Result<Normalized> {
    let camel = camel_case_keys(raw);

    check_occurrences(flags, &camel)?;

    let unnormalized_flags = camel.clone();
    let mut normalized = camel;

    strip_aliases(flags, &mut normalized);

    trace!(flags = normalized.len(), "normalized flags");

    Ok(Normalized {
        flags: normalized,
        unnormalized_flags,
    })
}

/// Convert positional arguments into values, optionally turning numeric
/// arguments into numbers.
pub fn normalize_input(positional: Vec<String>, infer_type: bool) -> Vec<Value> {
    positional
        .into_iter()
        .map(|arg| match parse_number(&arg) {
            Some(n) if infer_type => Value::Number(n),
            _ => Value::String(arg),
        })
        .collect()
}
