// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Checks a flag schema for internal contradictions before any argument
//! is parsed.

use tracing::debug;

use crate::case::{decamelize_flag_key, join_flag_keys, WIRE_SEPARATOR};
use crate::error::{Error, Result};
use crate::flag::{FlagSpec, Flags, Value, END_OF_OPTIONS};

/// A single schema rule: which flags break it and how to report them.
struct Rule {
    filter: fn(&str, &FlagSpec) -> bool,
    message: fn(&Flags, &[&str]) -> String,
}

fn key_contains_separator(key: &str, _: &FlagSpec) -> bool {
    key.contains(WIRE_SEPARATOR) && key != END_OF_OPTIONS
}

fn alias_is_set(_: &str, flag: &FlagSpec) -> bool {
    flag.alias.is_some()
}

fn choices_not_a_list(_: &str, flag: &FlagSpec) -> bool {
    matches!(&flag.choices, Some(choices) if choices.as_list().is_none())
}

fn choices_not_matching_type(_: &str, flag: &FlagSpec) -> bool {
    match (flag.flag_type, &flag.choices) {
        (Some(flag_type), Some(Value::List(choices))) => {
            choices.iter().any(|choice| !choice.is_type(flag_type))
        }
        _ => false,
    }
}

fn default_not_in_choices(_: &str, flag: &FlagSpec) -> bool {
    match (&flag.default, &flag.choices) {
        (Some(default), Some(Value::List(choices))) => !default
            .flatten()
            .iter()
            .all(|value| choices.contains(value)),
        _ => false,
    }
}

fn separator_message(_: &Flags, keys: &[&str]) -> String {
    format!(
        "Flag keys may not contain '{}'. Invalid flags: {}",
        WIRE_SEPARATOR,
        join_flag_keys(keys, "")
    )
}

fn alias_message(_: &Flags, keys: &[&str]) -> String {
    format!(
        "The option `alias` has been renamed to `shortFlag`. The following flags need to be updated: {}",
        join_flag_keys(keys, "--")
    )
}

fn choices_list_message(_: &Flags, keys: &[&str]) -> String {
    format!(
        "The option `choices` must be an array. Invalid flags: {}",
        join_flag_keys(keys, "--")
    )
}

fn choices_type_message(flags: &Flags, keys: &[&str]) -> String {
    let keys_and_types: Vec<String> = keys
        .iter()
        .map(|key| {
            let type_name = flags
                .get(key)
                .map(|flag| flag.kind().name())
                .unwrap_or_default();

            format!("(`{}`, type: '{}')", decamelize_flag_key(key), type_name)
        })
        .collect();

    format!(
        "Each value of the option `choices` must be of the same type as its flag. Invalid flags: {}",
        keys_and_types.join(", ")
    )
}

fn default_message(_: &Flags, keys: &[&str]) -> String {
    format!(
        "Each value of the option `default` must exist within the option `choices`. Invalid flags: {}",
        join_flag_keys(keys, "--")
    )
}

// Order matters: messages are reported in this order.
const RULES: &[Rule] = &[
    Rule {
        filter: key_contains_separator,
        message: separator_message,
    },
    Rule {
        filter: alias_is_set,
        message: alias_message,
    },
    Rule {
        filter: choices_not_a_list,
        message: choices_list_message,
    },
    Rule {
        filter: choices_not_matching_type,
        message: choices_type_message,
    },
    Rule {
        filter: default_not_in_choices,
        message: default_message,
    },
];

/// Validate the schema, reporting every broken rule at once.
///
/// # Return value
///
/// - `Ok(())` if the schema is consistent.
/// - [Error::InvalidSchema] with one message per broken rule, in rule
///   order, listing offending flags in declaration order.
pub fn validate_schema(flags: &Flags) -> Result<()> {
    let mut messages = Vec::<String>::new();

    for rule in RULES {
        let invalid: Vec<&str> = flags
            .iter()
            .filter(|(key, flag)| (rule.filter)(key, flag))
            .map(|(key, _)| key)
            .collect();

        if !invalid.is_empty() {
            messages.push((rule.message)(flags, &invalid));
        }
    }

    if messages.is_empty() {
        return Ok(());
    }

    debug!(violations = messages.len(), "invalid flag schema");

    Err(Error::InvalidSchema(messages))
}
