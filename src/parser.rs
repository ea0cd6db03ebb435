// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Translates a flag schema into a tokenizer configuration and runs the
//! tokenizer.

use tracing::debug;

use crate::app::Settings;
use crate::case::wire_key;
use crate::error::{Error, Result};
use crate::flag::{FlagSpec, FlagType, Flags, Value, END_OF_OPTIONS};
use crate::tokenizer::{tokenize, KeyConfig, RawArgs, TokenizerConfig};

const HELP_FLAG: &str = "help";
const VERSION_FLAG: &str = "version";

/// Ensure a declared default has the declared type.
fn check_default_type(key: &str, flag: &FlagSpec) -> Result<()> {
    let (flag_type, default) = match (flag.flag_type, &flag.default) {
        (Some(flag_type), Some(default)) => (flag_type, default),
        _ => return Ok(()),
    };

    let values = if flag.is_multiple {
        default.flatten()
    } else {
        vec![default]
    };

    match values.into_iter().find(|v| !v.is_type(flag_type)) {
        Some(bad) => Err(Error::DefaultType {
            flag: key.into(),
            expected: flag_type.name(),
            found: bad.type_name(),
        }),
        None => Ok(()),
    }
}

/// Work out the value the tokenizer should use when the flag is absent.
fn resolve_default(flag: &FlagSpec, boolean_default: Option<bool>) -> Option<Value> {
    let mut default = flag.default.clone();

    if default.is_none() && flag.kind() == FlagType::Boolean {
        default = boolean_default.map(Value::Boolean);
    }

    if !flag.is_multiple {
        return default;
    }

    match default {
        Some(Value::List(values)) => Some(Value::List(values)),
        Some(scalar) => Some(Value::List(vec![scalar])),
        None => Some(Value::List(Vec::new())),
    }
}

/// Build the tokenizer configuration for the schema.
pub fn build_config(flags: &Flags, settings: &Settings) -> Result<TokenizerConfig> {
    let mut config = TokenizerConfig {
        populate_double_dash: flags.exists(END_OF_OPTIONS),
        unknown_options_as_args: !settings.allow_unknown_flags,
        ..Default::default()
    };

    for (key, flag) in flags.iter() {
        if key == END_OF_OPTIONS {
            continue;
        }

        check_default_type(key, flag)?;

        let key_config = KeyConfig {
            kind: flag.kind(),
            array: flag.is_multiple,
            aliases: flag.all_aliases(),
            default: resolve_default(flag, settings.boolean_default),
        };

        config.keys.insert(wire_key(key), key_config);
    }

    // Stop "--help" and "--version" being rejected as unknown.
    if !settings.allow_unknown_flags {
        let implicit = [
            (HELP_FLAG, settings.auto_help),
            (VERSION_FLAG, settings.auto_version),
        ];

        for (name, enabled) in implicit.iter() {
            if *enabled && !config.keys.contains_key(*name) {
                config.keys.insert(
                    name.to_string(),
                    KeyConfig {
                        kind: FlagType::Boolean,
                        ..Default::default()
                    },
                );
            }
        }
    }

    debug!(keys = config.keys.len(), "built tokenizer config");

    Ok(config)
}

/// Tokenize `argv` according to the schema.
pub fn parse_raw(argv: &[String], flags: &Flags, settings: &Settings) -> Result<RawArgs> {
    let config = build_config(flags, settings)?;

    tokenize(argv, &config)
}
