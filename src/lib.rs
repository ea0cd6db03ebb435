// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! Schema-driven command-line flag parsing.
//!
//! Describe your flags once, as a [Flags] schema, and this crate turns
//! the command line into a map of typed, validated values.
//!
//! ---
//!
//! Table of contents:
//!
//! * [Overview](#overview)
//! * [Quickstart](#quickstart)
//! * [Details](#details)
//! * [Summary of features and behaviour](#summary-of-features-and-behaviour)
//! * [Limitations](#limitations)
//!
//! ---
//!
//! # Overview
//!
//! Parsing happens in stages:
//!
//! 1. The schema itself is checked for contradictions (for example a
//!    default value that is not one of the flag's choices).
//! 1. The arguments are split into positional arguments and flag values.
//! 1. Flag names are converted to camelCase and each flag is checked for
//!    repeats.
//! 1. Flags with declared choices are checked.
//! 1. Required flags are checked.
//!
//! Every stage reports _all_ the problems it finds at once, and the first
//! failing stage stops the parse.
//!
//! # Quickstart
//!
//! 1. Declare the flags.
//!
//!    Flag keys are camelCase; on the command line they are written in
//!    kebab-case (`unicornCount` is `--unicorn-count`).
//!
//!    ```rust
//!    use flagspec::{FlagSpec, FlagType, Flags};
//!
//!    let flags = Flags::new()
//!        .flag("unicorn", FlagSpec::string().short_flag('u'))
//!        .flag("rainbow", FlagSpec::boolean().short_flag('r'))
//!        .flag("unicornCount", FlagSpec::number().default_value(1))
//!        .flag("quiet", FlagType::Boolean);
//!    ```
//!
//! 1. Create an [App] and parse.
//!
//!    ```rust
//!    use flagspec::{App, FlagSpec, Flags, Value};
//!
//!    let flags = Flags::new()
//!        .flag("unicorn", FlagSpec::string().short_flag('u'))
//!        .flag("rainbow", FlagSpec::boolean().short_flag('r'));
//!
//!    let app = App::new("foo")
//!        .version("1.0.0")
//!        .help("Usage\n  $ foo <input>")
//!        .flags(flags);
//!
//!    let args = vec!["-u", "sparkles", "--rainbow", "input"]
//!        .into_iter()
//!        .map(String::from)
//!        .collect();
//!
//!    let parsed = app.parse_with_args(args)?;
//!
//!    assert_eq!(parsed.input, vec![Value::from("input")]);
//!    assert_eq!(parsed.flags.get("unicorn"), Some(&Value::from("sparkles")));
//!    assert_eq!(parsed.flags.get("rainbow"), Some(&Value::Boolean(true)));
//!    # Ok::<(), flagspec::Error>(())
//!    ```
//!
//!    > **Note:** A real program would call [App::run()] which parses the
//!    > program's own arguments, deals with `--help` and `--version`, and
//!    > exits with a message on error.
//!
//! # Details
//!
//! ## Flag types
//!
//! | Type | Command-line form | Value |
//! |-|-|-|
//! | [FlagType::String] | `--name value`, `--name=value` | [Value::String] |
//! | [FlagType::Boolean] | `--name`, `--no-name`, `--name false` | [Value::Boolean] |
//! | [FlagType::Number] | `--name 3`, `--name=-1.5` | [Value::Number] |
//!
//! A flag declared [FlagSpec::multiple()] may be given more than once and
//! its value is always a [Value::List], even when it is not specified.
//! Any other flag given more than once is an error.
//!
//! ## Aliases
//!
//! A flag can have a single character [FlagSpec::short_flag()] and any
//! number of [FlagSpec::aliases()]. The parsed flags only contain the
//! canonical key; [Parsed::unnormalized_flags] also contains each alias.
//!
//! ## Required flags
//!
//! A flag is either always required ([FlagSpec::required()]) or required
//! depending on the other flags and the positional arguments
//! ([FlagSpec::required_if()]).
//!
//! ## The end of options
//!
//! All arguments after `--` are positional. If the schema declares a flag
//! named [END_OF_OPTIONS], they are collected under that key instead.
//!
//! # Summary of features and behaviour
//!
//! - Typed flag values with defaults.
//! - Short flags, bundled short flags (`-abc`) and aliases.
//! - Choices for flag values.
//! - Always and conditionally required flags.
//! - Automatic `--help` and `--version` handling.
//! - Help text indentation clean-up and aligned flag listings
//!   ([Flags::help_lines()]).
//! - Unknown flags are either kept or rejected ([Settings::reject_unknown_flags()]).
//! - No global state: an [App] can be used to parse any number of times,
//!   from any thread.
//!
//! # Limitations
//!
//! - No sub-commands.
//! - No interactive prompting for missing flags.
//! - Flag values are strings, booleans or numbers only.

mod app;
mod case;
mod error;
mod flag;
mod help;
mod normalize;
mod parser;
mod schema;
mod tokenizer;
mod validate;

pub use error::{Error, MissingFlag, Result};

pub use app::{
    get_args, App, Package, Parsed, Request, Settings, DEFAULT_HELP_EXIT_CODE, NO_VERSION,
};

pub use flag::{
    FlagMap, FlagSpec, FlagType, Flags, Predicate, Required, Value, END_OF_OPTIONS,
};

pub use schema::validate_schema;

pub use tokenizer::{tokenize, KeyConfig, RawArgs, TokenizerConfig};
