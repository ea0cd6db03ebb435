// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;

use thiserror::Error;

use crate::case::decamelize_flag_key;

/// A required flag that was not given a value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MissingFlag {
    /// Canonical (camelCase) flag name.
    pub key: String,
    /// Short flag alias, if one was declared.
    pub short_flag: Option<char>,
}

impl fmt::Display for MissingFlag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", decamelize_flag_key(&self.key))?;

        if let Some(short) = self.short_flag {
            write!(f, ", -{}", short)?;
        }

        Ok(())
    }
}

/// The error type.
#[derive(Error, Debug)]
pub enum Error {
    //------------------------------
    // Incorrect API usage errors (programmer error)
    //------------------------------
    /// The flag schema contradicts itself. One message per broken rule.
    #[error("{}", .0.join("\n"))]
    InvalidSchema(Vec<String>),

    /// A declared default does not have the declared flag type.
    #[error("Expected {flag:?} default value to be of type {expected:?}, got {found:?}")]
    DefaultType {
        /// Canonical flag name.
        flag: String,
        /// Declared flag type.
        expected: &'static str,
        /// Type of the declared default.
        found: &'static str,
    },

    /// A requiredness predicate returned something other than a boolean.
    #[error("Return value for isRequired callback should be of type boolean, but {0} was returned.")]
    PredicateType(&'static str),

    //------------------------------
    // Runtime errors (user error)
    //------------------------------
    /// A number flag was given a value that is not a number.
    #[error("Invalid number for flag `--{flag}`: `{value}`")]
    InvalidNumber {
        /// Wire form of the flag.
        flag: String,
        /// The value supplied by the user.
        value: String,
    },

    /// Unknown flags were specified and unknown flags are not allowed.
    #[error("Unknown flag{}\n{}", plural(.0.len()), .0.join("\n"))]
    UnknownFlags(Vec<String>),

    /// A flag that does not accept multiple values was specified more
    /// than once.
    #[error("The flag --{0} can only be set once.")]
    RepeatedFlag(String),

    /// One or more flags have values outside their declared choices.
    #[error("{}", .0.join("\n"))]
    InvalidChoices(Vec<String>),

    /// One or more required flags were not specified.
    #[error("Missing required flag{}\n{}", plural(.0.len()), missing_lines(.0))]
    MissingRequired(Vec<MissingFlag>),

    //------------------------------
    // Output errors
    //------------------------------
    /// Failed to write help or version text.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

fn plural(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

fn missing_lines(flags: &[MissingFlag]) -> String {
    flags
        .iter()
        .map(|flag| format!("\t{}", flag))
        .collect::<Vec<String>>()
        .join("\n")
}

impl Error {
    /// Process exit code a command-line shell should use for this error.
    ///
    /// Mistakes made by the user on the command line give `2` ("incorrect
    /// usage"), mistakes in the program's own flag schema give `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidSchema(_)
            | Error::DefaultType { .. }
            | Error::PredicateType(_)
            | Error::Io(_) => 1,
            _ => 2,
        }
    }
}

/// Convenience type that allows a function to be defined as returning a
/// [Result], but which only requires the success type to be specified,
/// defaulting the error type to this crates `Error` type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
