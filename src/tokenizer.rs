// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Token level parser: turns a list of command-line arguments into raw
//! key/value pairs using a per-key type declaration.
//!
//! Keys here are in wire form (`foo-bar`). Nothing in this module knows
//! about schemas, camelCase names or validation.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::trace;

use crate::case::camel_case;
use crate::error::{Error, Result};
use crate::flag::{FlagMap, FlagType, Value, END_OF_OPTIONS};

const OPT_PREFIX: char = '-';
const LONG_OPT_PREFIX: &str = END_OF_OPTIONS;
const NEGATION_PREFIX: &str = "no-";
const VALUE_SEPARATOR: char = '=';

/// How the tokenizer should treat a single key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyConfig {
    /// Value type.
    pub kind: FlagType,
    /// Every occurrence appends one value to a list.
    pub array: bool,
    /// Other names that refer to this key.
    pub aliases: Vec<String>,
    /// Value used if the key does not appear.
    pub default: Option<Value>,
}

/// Tokenizer configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenizerConfig {
    /// Declared keys, in wire form.
    pub keys: IndexMap<String, KeyConfig>,
    /// Store the arguments after `--` under the `--` key instead of
    /// appending them to the positional arguments.
    pub populate_double_dash: bool,
    /// Treat undeclared options as positional arguments.
    pub unknown_options_as_args: bool,
}

/// Tokenizer output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawArgs {
    /// Positional (non-option) arguments, in command-line order.
    pub positional: Vec<String>,
    /// Every declared key and each of its aliases, mapped to its value.
    pub flags: FlagMap,
}

/// Parse a number the way a user would expect: the whole (trimmed) string
/// must be a finite number.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();

    if s.is_empty() {
        return None;
    }

    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_negative_number(arg: &str) -> bool {
    arg.starts_with(OPT_PREFIX) && parse_number(arg).is_some()
}

/// Returns true if `arg` would be interpreted as an option
/// (or the end of options marker) rather than as a value.
fn looks_like_option(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with(OPT_PREFIX) && !is_negative_number(arg)
}

struct Tokenizer<'a> {
    config: &'a TokenizerConfig,
    /// Every accepted spelling of a declared key, mapped to the key.
    names: HashMap<String, String>,
    /// Keys given a value on the command line.
    seen: HashSet<String>,
    values: FlagMap,
    positional: Vec<String>,
}

impl<'a> Tokenizer<'a> {
    fn new(config: &'a TokenizerConfig) -> Self {
        let mut names = HashMap::new();

        for (key, key_config) in config.keys.iter() {
            names.insert(key.clone(), key.clone());
            names.insert(camel_case(key), key.clone());

            for alias in key_config.aliases.iter() {
                names.insert(alias.clone(), key.clone());
            }
        }

        Tokenizer {
            config,
            names,
            seen: HashSet::new(),
            values: FlagMap::new(),
            positional: Vec::new(),
        }
    }

    fn resolve(&self, name: &str) -> Option<&'a KeyConfig> {
        let config = self.config;

        self.names
            .get(name)
            .and_then(|key| config.keys.get(key.as_str()))
    }

    fn key_for(&self, name: &str) -> Option<String> {
        self.names.get(name).cloned()
    }

    /// Record a value. Repeating a non-array key turns it into a list.
    fn store(&mut self, key: &str, value: Value, array: bool) {
        trace!(key, %value, "flag value");

        let first = self.seen.insert(key.to_string());

        if array {
            let entry = self
                .values
                .entry(key.to_string())
                .or_insert_with(|| Value::List(Vec::new()));

            if let Value::List(values) = entry {
                values.push(value);
            }

            return;
        }

        if first {
            self.values.insert(key.to_string(), value);
            return;
        }

        match self.values.get_mut(key) {
            Some(Value::List(values)) => values.push(value),
            Some(existing) => {
                let old = existing.clone();
                *existing = Value::List(vec![old, value]);
            }
            None => {
                self.values.insert(key.to_string(), value);
            }
        }
    }

    /// Mark an array key as specified even though no value was pushed.
    fn touch(&mut self, key: &str) {
        self.seen.insert(key.to_string());
        self.values
            .entry(key.to_string())
            .or_insert_with(|| Value::List(Vec::new()));
    }

    /// Handle a declared key, consuming the next argument as its value
    /// when appropriate.
    fn handle_key(
        &mut self,
        name: &str,
        inline: Option<&str>,
        argv: &[String],
        index: &mut usize,
    ) -> Result<()> {
        let key = match self.key_for(name) {
            Some(key) => key,
            None => return Ok(()),
        };

        let key_config = match self.resolve(name) {
            Some(c) => c,
            None => return Ok(()),
        };

        let next = argv.get(*index + 1).map(|s| s.as_str());

        match key_config.kind {
            FlagType::Boolean => {
                let value = match inline {
                    Some(v) => v != "false",
                    None => match next {
                        Some(v) if v == "true" || v == "false" => {
                            *index += 1;
                            v == "true"
                        }
                        _ => true,
                    },
                };

                self.store(&key, Value::Boolean(value), key_config.array);
            }
            FlagType::String | FlagType::Number => {
                let raw = match inline {
                    Some(v) => Some(v.to_string()),
                    None => match next {
                        Some(v) if !looks_like_option(v) => {
                            *index += 1;
                            Some(v.to_string())
                        }
                        _ => None,
                    },
                };

                match (raw, key_config.kind) {
                    (Some(v), FlagType::Number) => {
                        let n = parse_number(&v).ok_or_else(|| Error::InvalidNumber {
                            flag: key.clone(),
                            value: v.clone(),
                        })?;

                        self.store(&key, Value::Number(n), key_config.array);
                    }
                    (Some(v), _) => self.store(&key, Value::String(v), key_config.array),
                    // A value-less string is the empty string, a value-less
                    // number is left unset.
                    (None, FlagType::String) if !key_config.array => {
                        self.store(&key, Value::String(String::new()), false)
                    }
                    (None, _) if key_config.array => self.touch(&key),
                    (None, _) => (),
                }
            }
        }

        Ok(())
    }

    /// Handle an undeclared key.
    fn handle_unknown(&mut self, name: &str, inline: Option<&str>, argv: &[String], index: &mut usize) {
        let value = match inline {
            Some(v) => Value::String(v.to_string()),
            None => match argv.get(*index + 1) {
                Some(v) if !looks_like_option(v) && name.len() > 1 => {
                    *index += 1;
                    Value::String(v.to_string())
                }
                _ => Value::Boolean(true),
            },
        };

        self.store(name, value, false);
    }

    fn long_option(&mut self, arg: &str, argv: &[String], index: &mut usize) -> Result<()> {
        let body = &arg[LONG_OPT_PREFIX.len()..];

        let (name, inline) = match body.find(VALUE_SEPARATOR) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };

        if self.names.contains_key(name) {
            return self.handle_key(name, inline, argv, index);
        }

        if inline.is_none() && name.starts_with(NEGATION_PREFIX) {
            let negated = &name[NEGATION_PREFIX.len()..];

            if let Some(key_config) = self.resolve(negated) {
                if key_config.kind == FlagType::Boolean {
                    if let Some(key) = self.key_for(negated) {
                        self.store(&key, Value::Boolean(false), key_config.array);
                    }

                    return Ok(());
                }
            } else if !self.config.unknown_options_as_args {
                self.store(negated, Value::Boolean(false), false);
                return Ok(());
            }
        }

        if self.config.unknown_options_as_args {
            self.positional.push(arg.to_string());
        } else {
            self.handle_unknown(name, inline, argv, index);
        }

        Ok(())
    }

    fn short_options(&mut self, arg: &str, argv: &[String], index: &mut usize) -> Result<()> {
        let body = &arg[OPT_PREFIX.len_utf8()..];

        let (names, inline) = match body.find(VALUE_SEPARATOR) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };

        let chars: Vec<char> = names.chars().collect();

        if self.config.unknown_options_as_args
            && chars.iter().any(|c| !self.names.contains_key(&c.to_string()))
        {
            self.positional.push(arg.to_string());
            return Ok(());
        }

        for (i, c) in chars.iter().enumerate() {
            let name = c.to_string();
            let last = i + 1 == chars.len();
            let known = self.resolve(&name);

            if last {
                match known {
                    Some(_) => self.handle_key(&name, inline, argv, index)?,
                    None => self.handle_unknown(&name, inline, argv, index),
                }

                break;
            }

            match known {
                // "-fbar" gives "f" the value "bar".
                Some(key_config) if key_config.kind != FlagType::Boolean => {
                    let rest: String = chars[i + 1..].iter().collect();
                    let value = match inline {
                        Some(v) => format!("{}{}{}", rest, VALUE_SEPARATOR, v),
                        None => rest,
                    };

                    self.handle_key(&name, Some(value.as_str()), argv, index)?;
                    break;
                }
                Some(key_config) => {
                    if let Some(key) = self.key_for(&name) {
                        self.store(&key, Value::Boolean(true), key_config.array);
                    }
                }
                None => self.store(&name, Value::Boolean(true), false),
            }
        }

        Ok(())
    }

    fn run(mut self, argv: &[String]) -> Result<RawArgs> {
        let mut rest: Vec<String> = Vec::new();
        let mut end_of_options = false;
        let mut index = 0;

        while index < argv.len() {
            let arg = argv[index].as_str();

            if end_of_options {
                rest.push(arg.to_string());
            } else if arg == END_OF_OPTIONS {
                end_of_options = true;
            } else if arg.starts_with(LONG_OPT_PREFIX) {
                self.long_option(arg, argv, &mut index)?;
            } else if looks_like_option(arg) {
                self.short_options(arg, argv, &mut index)?;
            } else {
                self.positional.push(arg.to_string());
            }

            index += 1;
        }

        let mut flags = FlagMap::new();

        for (key, key_config) in self.config.keys.iter() {
            let value = match self.values.shift_remove(key) {
                Some(value) => Some(value),
                None if !self.seen.contains(key) => key_config.default.clone(),
                None => None,
            };

            if let Some(value) = value {
                flags.insert(key.clone(), value.clone());

                for alias in key_config.aliases.iter() {
                    flags.insert(alias.clone(), value.clone());
                }
            }
        }

        // Undeclared keys.
        flags.extend(self.values);

        if self.config.populate_double_dash {
            flags.insert(
                END_OF_OPTIONS.to_string(),
                Value::List(rest.into_iter().map(Value::String).collect()),
            );
        } else {
            self.positional.extend(rest);
        }

        Ok(RawArgs {
            positional: self.positional,
            flags,
        })
    }
}

/// Split the arguments into positional arguments and key values.
pub fn tokenize(argv: &[String], config: &TokenizerConfig) -> Result<RawArgs> {
    Tokenizer::new(config).run(argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(kind: FlagType) -> KeyConfig {
        KeyConfig {
            kind,
            ..Default::default()
        }
    }

    fn config(keys: Vec<(&str, KeyConfig)>) -> TokenizerConfig {
        TokenizerConfig {
            keys: keys.into_iter().map(|(k, c)| (k.to_string(), c)).collect(),
            ..Default::default()
        }
    }

    fn args(cli_args: &[&str]) -> Vec<String> {
        cli_args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_looks_like_option() {
        assert!(looks_like_option("-a"));
        assert!(looks_like_option("--foo"));
        assert!(looks_like_option("--"));
        assert!(!looks_like_option("-"));
        assert!(!looks_like_option("-1"));
        assert!(!looks_like_option("-1.5"));
        assert!(!looks_like_option("foo"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1"), Some(1.0));
        assert_eq!(parse_number("-1.3"), Some(-1.3));
        assert_eq!(parse_number(" 2 "), Some(2.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("1a"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_tokenize() {
        #[derive(Debug)]
        struct TestData<'a> {
            cli_args: Vec<&'a str>,
            keys: Vec<(&'a str, KeyConfig)>,
            positional: Vec<&'a str>,
            flags: Vec<(&'a str, Value)>,
        }

        let tests = &[
            TestData {
                cli_args: vec![],
                keys: vec![],
                positional: vec![],
                flags: vec![],
            },
            TestData {
                cli_args: vec!["one", "two"],
                keys: vec![],
                positional: vec!["one", "two"],
                flags: vec![],
            },
            TestData {
                cli_args: vec!["--foo=bar"],
                keys: vec![("foo", key(FlagType::String))],
                positional: vec![],
                flags: vec![("foo", "bar".into())],
            },
            TestData {
                cli_args: vec!["--foo", "bar", "baz"],
                keys: vec![("foo", key(FlagType::String))],
                positional: vec!["baz"],
                flags: vec![("foo", "bar".into())],
            },
            TestData {
                // Value-less string.
                cli_args: vec!["--foo"],
                keys: vec![("foo", key(FlagType::String))],
                positional: vec![],
                flags: vec![("foo", "".into())],
            },
            TestData {
                // Value-less number falls back to the default.
                cli_args: vec!["--foo"],
                keys: vec![(
                    "foo",
                    KeyConfig {
                        kind: FlagType::Number,
                        default: Some(2.into()),
                        ..Default::default()
                    },
                )],
                positional: vec![],
                flags: vec![("foo", 2.into())],
            },
            TestData {
                cli_args: vec!["--foo", "-1"],
                keys: vec![("foo", key(FlagType::Number))],
                positional: vec![],
                flags: vec![("foo", (-1).into())],
            },
            TestData {
                cli_args: vec!["--foo", "bar"],
                keys: vec![("foo", key(FlagType::Boolean))],
                positional: vec!["bar"],
                flags: vec![("foo", true.into())],
            },
            TestData {
                cli_args: vec!["--foo", "false"],
                keys: vec![("foo", key(FlagType::Boolean))],
                positional: vec![],
                flags: vec![("foo", false.into())],
            },
            TestData {
                cli_args: vec!["--no-foo"],
                keys: vec![("foo", key(FlagType::Boolean))],
                positional: vec![],
                flags: vec![("foo", false.into())],
            },
            TestData {
                // Repeating a single value key.
                cli_args: vec!["--foo=bar", "--foo=baz"],
                keys: vec![("foo", key(FlagType::String))],
                positional: vec![],
                flags: vec![("foo", vec!["bar", "baz"].into())],
            },
            TestData {
                cli_args: vec!["--foo", "bar,baz"],
                keys: vec![(
                    "foo",
                    KeyConfig {
                        array: true,
                        ..Default::default()
                    },
                )],
                positional: vec![],
                flags: vec![("foo", vec!["bar,baz"].into())],
            },
            TestData {
                cli_args: vec!["-f", "bar", "-f", "baz"],
                keys: vec![(
                    "foo",
                    KeyConfig {
                        array: true,
                        aliases: vec!["f".into()],
                        ..Default::default()
                    },
                )],
                positional: vec![],
                flags: vec![
                    ("foo", vec!["bar", "baz"].into()),
                    ("f", vec!["bar", "baz"].into()),
                ],
            },
            TestData {
                // Value-less array.
                cli_args: vec!["--test"],
                keys: vec![(
                    "test",
                    KeyConfig {
                        kind: FlagType::Number,
                        array: true,
                        default: Some(Value::List(vec![7.into()])),
                        ..Default::default()
                    },
                )],
                positional: vec![],
                flags: vec![("test", Value::List(vec![]))],
            },
            TestData {
                // Bundled short flags.
                cli_args: vec!["-ab", "x"],
                keys: vec![
                    (
                        "alpha",
                        KeyConfig {
                            kind: FlagType::Boolean,
                            aliases: vec!["a".into()],
                            ..Default::default()
                        },
                    ),
                    (
                        "bravo",
                        KeyConfig {
                            aliases: vec!["b".into()],
                            ..Default::default()
                        },
                    ),
                ],
                positional: vec![],
                flags: vec![
                    ("alpha", true.into()),
                    ("a", true.into()),
                    ("bravo", "x".into()),
                    ("b", "x".into()),
                ],
            },
            TestData {
                cli_args: vec!["-bvalue"],
                keys: vec![(
                    "bravo",
                    KeyConfig {
                        aliases: vec!["b".into()],
                        ..Default::default()
                    },
                )],
                positional: vec![],
                flags: vec![("bravo", "value".into()), ("b", "value".into())],
            },
            TestData {
                // camelCase spelling of a hyphenated key.
                cli_args: vec!["--withTrigger", "specified"],
                keys: vec![("with-trigger", key(FlagType::String))],
                positional: vec![],
                flags: vec![("with-trigger", "specified".into())],
            },
            TestData {
                cli_args: vec!["--", "--foo", "-b"],
                keys: vec![("foo", key(FlagType::Boolean))],
                positional: vec!["--foo", "-b"],
                flags: vec![],
            },
            TestData {
                cli_args: vec!["--unknown", "value", "--other"],
                keys: vec![],
                positional: vec![],
                flags: vec![("unknown", "value".into()), ("other", true.into())],
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let result = tokenize(&args(&d.cli_args), &config(d.keys.clone()));
            let raw = result.unwrap();

            let expected_flags: FlagMap = d
                .flags
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();

            assert_eq!(raw.positional, d.positional, "{}", msg);
            assert_eq!(raw.flags, expected_flags, "{}", msg);
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = config(vec![
            (
                "foo",
                KeyConfig {
                    kind: FlagType::Boolean,
                    default: Some(false.into()),
                    aliases: vec!["f".into()],
                    ..Default::default()
                },
            ),
            ("bar", key(FlagType::Boolean)),
        ]);

        let raw = tokenize(&[], &cfg).unwrap();

        assert_eq!(raw.flags.get("foo"), Some(&Value::Boolean(false)));
        assert_eq!(raw.flags.get("f"), Some(&Value::Boolean(false)));
        assert_eq!(raw.flags.get("bar"), None);
    }

    #[test]
    fn test_populate_double_dash() {
        let cfg = TokenizerConfig {
            populate_double_dash: true,
            ..Default::default()
        };

        let raw = tokenize(&args(&["a", "--", "b", "--c"]), &cfg).unwrap();

        assert_eq!(raw.positional, vec!["a"]);
        assert_eq!(
            raw.flags.get(END_OF_OPTIONS),
            Some(&Value::from(vec!["b", "--c"]))
        );
    }

    #[test]
    fn test_unknown_options_as_args() {
        let mut cfg = config(vec![("foo", key(FlagType::Boolean))]);
        cfg.unknown_options_as_args = true;

        let raw = tokenize(&args(&["--foo", "--bar=1", "-x", "pos"]), &cfg).unwrap();

        assert_eq!(raw.positional, vec!["--bar=1", "-x", "pos"]);
        assert_eq!(raw.flags.get("foo"), Some(&Value::Boolean(true)));
        assert_eq!(raw.flags.get("bar"), None);
    }

    #[test]
    fn test_invalid_number() {
        let cfg = config(vec![("count", key(FlagType::Number))]);

        let result = tokenize(&args(&["--count=many"]), &cfg);

        assert!(matches!(
            result,
            Err(Error::InvalidNumber { ref flag, ref value }) if flag == "count" && value == "many"
        ));
    }
}
