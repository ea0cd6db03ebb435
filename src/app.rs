// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::env;
use std::io::{self, Write};
use std::process::exit;

use tracing::debug;

use crate::error::{Error, Result};
use crate::flag::{FlagMap, Flags, Value};
use crate::help::build_help;
use crate::normalize::{camel_case_keys, normalize_flags, normalize_input, strip_aliases};
use crate::parser::parse_raw;
use crate::schema::validate_schema;
use crate::validate::{check_missing_required_flags, check_unknown_flags, validate_choices};

/// Shown when neither the app nor its package declares a version.
pub const NO_VERSION: &str = "No version found";

const DEFAULT_HELP_INDENT: usize = 2;

/// Exit code used by [Parsed::exit_with_help] unless told otherwise.
pub const DEFAULT_HELP_EXIT_CODE: i32 = 2;

/// Settings used to control the parsers behaviour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Convert numeric positional arguments into numbers.
    pub(crate) infer_type: bool,

    /// Request help when `--help` is the only argument.
    pub(crate) auto_help: bool,

    /// Request the version when `--version` is the only argument.
    pub(crate) auto_version: bool,

    /// Value given to boolean flags that have no default and were not
    /// specified. `None` leaves them unset.
    pub(crate) boolean_default: Option<bool>,

    /// If not set, options not declared in the schema are an error.
    pub(crate) allow_unknown_flags: bool,

    /// Indentation of multi-line help text.
    pub(crate) help_indent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            infer_type: false,
            auto_help: true,
            auto_version: true,
            boolean_default: Some(false),
            allow_unknown_flags: true,
            help_indent: DEFAULT_HELP_INDENT,
        }
    }
}

impl Settings {
    /// Create a new settings object.
    pub fn new() -> Self {
        Settings::default()
    }

    /// Convert positional arguments that look like numbers into
    /// [Value::Number]. By default all positional arguments are strings.
    pub fn infer_type(self) -> Self {
        Settings {
            infer_type: true,
            ..self
        }
    }

    /// Enable or disable the automatic `--help` request.
    pub fn auto_help(self, auto_help: bool) -> Self {
        Settings { auto_help, ..self }
    }

    /// Enable or disable the automatic `--version` request.
    pub fn auto_version(self, auto_version: bool) -> Self {
        Settings {
            auto_version,
            ..self
        }
    }

    /// Specify the value of boolean flags that were neither specified nor
    /// given a default.
    ///
    /// # Note
    ///
    /// Pass `None` to leave such flags out of the result, which allows
    /// "not specified" to be told apart from "explicitly false".
    pub fn boolean_default(self, boolean_default: Option<bool>) -> Self {
        Settings {
            boolean_default,
            ..self
        }
    }

    /// Treat any option not declared in the schema as an error.
    pub fn reject_unknown_flags(self) -> Self {
        Settings {
            allow_unknown_flags: false,
            ..self
        }
    }

    /// Indentation applied to multi-line help text.
    pub fn help_indent(self, help_indent: usize) -> Self {
        Settings {
            help_indent,
            ..self
        }
    }
}

/// Metadata about the program, normally taken from its package manifest.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Package {
    /// Package name.
    pub name: Option<String>,
    /// Package version.
    pub version: Option<String>,
    /// One line summary.
    pub description: Option<String>,
    /// Names of the binaries the package installs.
    pub bin: Vec<String>,
}

impl Package {
    /// Create a package description with the specified name.
    pub fn new(name: &str) -> Self {
        Package {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Specify the package version.
    pub fn version(self, version: &str) -> Self {
        Package {
            version: Some(version.into()),
            ..self
        }
    }

    /// Specify the package description.
    pub fn description(self, description: &str) -> Self {
        Package {
            description: Some(description.into()),
            ..self
        }
    }

    /// Add a binary name.
    pub fn bin(mut self, name: &str) -> Self {
        self.bin.push(name.into());
        self
    }

    /// Name to show for the running program: the first binary, else the
    /// package name.
    pub fn title(&self) -> Option<&str> {
        self.bin
            .first()
            .map(|s| s.as_str())
            .or_else(|| self.name.as_deref())
    }
}

/// Something the user asked for instead of normal processing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Request {
    /// `--help` was the only argument.
    Help,
    /// `--version` was the only argument.
    Version,
}

/// The result of a successful parse.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed {
    /// Positional arguments.
    pub input: Vec<Value>,

    /// Flags, keyed by canonical (camelCase) name.
    pub flags: FlagMap,

    /// Flags, plus a copy of each value under every alias and short flag.
    pub unnormalized_flags: FlagMap,

    /// Program metadata.
    pub package: Package,

    /// Full help text.
    pub help: String,

    /// Version string.
    pub version: String,

    /// Set if help or the version was requested. When set, `flags` and
    /// `input` have not been validated.
    pub request: Option<Request>,
}

impl Parsed {
    /// Write the help text.
    pub fn show_help<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.help)?;

        Ok(())
    }

    /// Write the version string.
    pub fn show_version<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.version)?;

        Ok(())
    }

    /// Display the help text on stdout and exit the process.
    ///
    /// If the help cannot be written, the error is shown on stderr and
    /// the process exits with [Error::exit_code].
    pub fn exit_with_help(&self, exit_code: Option<i32>) -> ! {
        if let Err(e) = self.show_help(&mut io::stdout()) {
            exit_with_error(e);
        }

        exit(exit_code.unwrap_or(DEFAULT_HELP_EXIT_CODE));
    }

    /// Display the version on stdout and exit the process successfully.
    pub fn exit_with_version(&self) -> ! {
        if let Err(e) = self.show_version(&mut io::stdout()) {
            exit_with_error(e);
        }

        exit(0);
    }
}

fn exit_with_error(e: Error) -> ! {
    eprintln!("{}", e);
    exit(e.exit_code());
}

/// Returns the command-line arguments, minus the program name.
pub fn get_args() -> Vec<String> {
    env::args().skip(1).collect()
}

/// The main object used to represent the program.
#[derive(Clone, Debug, Default)]
pub struct App {
    flags: Flags,
    settings: Settings,
    package: Package,
    help: Option<String>,
    description: Option<String>,
    no_description: bool,
    version: Option<String>,
}

impl App {
    /// Create a new application object.
    pub fn new(name: &str) -> Self {
        App {
            package: Package::new(name),
            ..Default::default()
        }
    }

    /// Specify the flag schema.
    pub fn flags(self, flags: Flags) -> Self {
        App { flags, ..self }
    }

    /// Specify any settings for the program.
    pub fn settings(self, settings: Settings) -> Self {
        App { settings, ..self }
    }

    /// Specify the program metadata.
    pub fn package(self, package: Package) -> Self {
        App { package, ..self }
    }

    /// Specify the help text (usage, examples and so on).
    pub fn help(self, help: &str) -> Self {
        App {
            help: Some(help.into()),
            ..self
        }
    }

    /// Specify the description shown above the help text. By default the
    /// package description is used.
    pub fn description(self, description: &str) -> Self {
        App {
            description: Some(description.into()),
            no_description: false,
            ..self
        }
    }

    /// Don't show any description in the help text.
    pub fn no_description(self) -> Self {
        App {
            description: None,
            no_description: true,
            ..self
        }
    }

    /// Specify the version. By default the package version is used.
    pub fn version(self, version: &str) -> Self {
        App {
            version: Some(version.into()),
            ..self
        }
    }

    /// The complete help text.
    pub fn help_text(&self) -> String {
        let description = if self.no_description {
            None
        } else {
            self.description
                .as_deref()
                .or_else(|| self.package.description.as_deref())
        };

        build_help(
            self.help.as_deref(),
            description,
            self.settings.help_indent,
        )
    }

    /// The version string.
    pub fn version_text(&self) -> String {
        self.version
            .as_deref()
            .or_else(|| self.package.version.as_deref())
            .unwrap_or(NO_VERSION)
            .to_string()
    }

    fn parsed(&self, input: Vec<Value>, flags: FlagMap, unnormalized_flags: FlagMap) -> Parsed {
        Parsed {
            input,
            flags,
            unnormalized_flags,
            package: self.package.clone(),
            help: self.help_text(),
            version: self.version_text(),
            request: None,
        }
    }

    /// Determine if help or the version was requested: only possible when
    /// the flag is the sole argument.
    fn request(&self, argv: &[String], input: &[Value], raw: &FlagMap) -> Option<Request> {
        if argv.len() != 1 || !input.is_empty() {
            return None;
        }

        let is_set = |key: &str| raw.get(key) == Some(&Value::Boolean(true));

        if self.settings.auto_version && is_set("version") {
            Some(Request::Version)
        } else if self.settings.auto_help && is_set("help") {
            Some(Request::Help)
        } else {
            None
        }
    }

    /// Parse a set of command line arguments (without the program name).
    ///
    /// # Arguments
    ///
    /// - `argv`: Vector of string arguments. Specify your own,
    ///    or call [get_args()].
    ///
    /// # Return value
    ///
    /// - The [Parsed] flags and positional arguments. If
    ///   [Parsed::request] is set, the caller should show the help or
    ///   version rather than act on the flags.
    /// - An [Error] if the schema is invalid or the arguments do not
    ///   satisfy it.
    pub fn parse_with_args(&self, argv: Vec<String>) -> Result<Parsed> {
        validate_schema(&self.flags)?;

        let raw = parse_raw(&argv, &self.flags, &self.settings)?;

        let input = normalize_input(raw.positional, self.settings.infer_type);

        if let Some(request) = self.request(&argv, &input, &raw.flags) {
            debug!(?request, "auto request");

            let unnormalized_flags = camel_case_keys(raw.flags);
            let mut flags = unnormalized_flags.clone();
            strip_aliases(&self.flags, &mut flags);

            return Ok(Parsed {
                request: Some(request),
                ..self.parsed(input, flags, unnormalized_flags)
            });
        }

        if !self.settings.allow_unknown_flags {
            check_unknown_flags(&input)?;
        }

        let normalized = normalize_flags(&self.flags, raw.flags)?;

        validate_choices(&self.flags, &normalized.flags)?;

        check_missing_required_flags(&self.flags, &normalized.flags, &input)?;

        debug!(
            input = input.len(),
            flags = normalized.flags.len(),
            "parsed arguments"
        );

        Ok(self.parsed(input, normalized.flags, normalized.unnormalized_flags))
    }

    /// Parse the command-line arguments of the running program.
    ///
    /// # Note
    ///
    /// This is a simple wrapper around `parse_with_args()`.
    pub fn parse(&self) -> Result<Parsed> {
        self.parse_with_args(get_args())
    }

    /// Parse the command-line arguments of the running program, dealing
    /// with help and version requests and errors by exiting.
    ///
    /// Errors are written to stderr and the process exits with
    /// [Error::exit_code].
    pub fn run(&self) -> Parsed {
        let parsed = match self.parse() {
            Ok(parsed) => parsed,
            Err(e) => exit_with_error(e),
        };

        match parsed.request {
            Some(Request::Help) => parsed.exit_with_help(Some(0)),
            Some(Request::Version) => parsed.exit_with_version(),
            None => parsed,
        }
    }
}
