// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

/// Key used to collect every argument following the end of options marker.
///
/// Declare a flag with this name to receive the arguments after `--` in
/// [crate::Parsed::flags] rather than in [crate::Parsed::input].
pub const END_OF_OPTIONS: &str = "--";

/// Map of flag names to their resolved values, in insertion order.
///
/// A flag without a value is absent from the map.
pub type FlagMap = IndexMap<String, Value>;

/// The type of value a flag accepts.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FlagType {
    /// Any string.
    String,
    /// `true` or `false`.
    Boolean,
    /// A (floating point) number.
    Number,
}

impl Default for FlagType {
    fn default() -> Self {
        FlagType::String
    }
}

impl FlagType {
    /// Name of the type as used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            FlagType::String => "string",
            FlagType::Boolean => "boolean",
            FlagType::Number => "number",
        }
    }
}

impl fmt::Display for FlagType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FlagType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "string" => Ok(FlagType::String),
            "boolean" => Ok(FlagType::Boolean),
            "number" => Ok(FlagType::Number),
            _ => Err(format!("unknown flag type: {:?}", s)),
        }
    }
}

/// A parsed value: a flag value, a default, a choice or a positional
/// argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string value.
    String(String),
    /// A boolean value.
    Boolean(bool),
    /// A numeric value.
    Number(f64),
    /// All the values of a flag that accepts multiple values.
    List(Vec<Value>),
}

impl Value {
    /// Name of the primitive type of the value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::List(_) => "object",
        }
    }

    /// Returns true if the value is a scalar of the given type.
    pub fn is_type(&self, flag_type: FlagType) -> bool {
        matches!(
            (self, flag_type),
            (Value::String(_), FlagType::String)
                | (Value::Boolean(_), FlagType::Boolean)
                | (Value::Number(_), FlagType::Number)
        )
    }

    /// Returns the string, if the value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean, if the value is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number, if the value is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the values, if the value is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    /// A scalar is treated as a one element list.
    pub fn flatten(&self) -> Vec<&Value> {
        match self {
            Value::List(values) => values.iter().collect(),
            scalar => vec![scalar],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::List(values) => {
                let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", joined.join(","))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// Signature of a function that decides whether a flag is required, given
/// the resolved flags and the positional arguments.
///
/// It must return a [Value::Boolean]; any other value is reported as
/// [crate::Error::PredicateType].
pub type Predicate = dyn Fn(&FlagMap, &[Value]) -> Value + Send + Sync;

/// Whether a flag must be specified.
#[derive(Clone)]
pub enum Required {
    /// Fixed requirement.
    Always(bool),
    /// Requirement computed once all flags have been resolved.
    Computed(Arc<Predicate>),
}

impl Default for Required {
    fn default() -> Self {
        Required::Always(false)
    }
}

impl Required {
    /// Make the flag required when `predicate` returns true.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&FlagMap, &[Value]) -> bool + Send + Sync + 'static,
    {
        Required::Computed(Arc::new(move |flags: &FlagMap, input: &[Value]| {
            Value::Boolean(predicate(flags, input))
        }))
    }

    /// Use a predicate that returns an arbitrary value.
    pub fn computed<F>(predicate: F) -> Self
    where
        F: Fn(&FlagMap, &[Value]) -> Value + Send + Sync + 'static,
    {
        Required::Computed(Arc::new(predicate))
    }

    /// Returns true unless the flag is unconditionally optional.
    pub fn is_set(&self) -> bool {
        !matches!(self, Required::Always(false))
    }
}

impl fmt::Debug for Required {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Required::Always(b) => write!(f, "Always({})", b),
            Required::Computed(p) => write!(f, "Computed({:p})", Arc::as_ptr(p)),
        }
    }
}

impl From<bool> for Required {
    fn from(b: bool) -> Self {
        Required::Always(b)
    }
}

/// Declaration of a single flag.
///
/// # Note
///
/// - All members are public so a schema can be written as a struct literal.
#[derive(Clone, Debug, Default)]
pub struct FlagSpec {
    /// Value type. Treated as [FlagType::String] when unset.
    pub flag_type: Option<FlagType>,
    /// Value used when the flag is not specified.
    pub default: Option<Value>,
    /// Single character alias (`-f`).
    pub short_flag: Option<char>,
    /// Additional names for the flag.
    pub aliases: Vec<String>,
    /// Accept the flag more than once, collecting every value.
    pub is_multiple: bool,
    /// The only values the flag may take. Must be a [Value::List].
    pub choices: Option<Value>,
    /// Whether the flag must be specified.
    pub is_required: Required,
    /// Description shown in the flag listing.
    pub description: Option<String>,
    /// Replaced by `short_flag`; a schema that sets it is rejected.
    pub alias: Option<String>,
}

impl FlagSpec {
    /// Create a new flag declaration of the specified type.
    pub fn new(flag_type: FlagType) -> Self {
        FlagSpec {
            flag_type: Some(flag_type),
            ..Default::default()
        }
    }

    /// Create a new string flag.
    pub fn string() -> Self {
        FlagSpec::new(FlagType::String)
    }

    /// Create a new boolean flag.
    pub fn boolean() -> Self {
        FlagSpec::new(FlagType::Boolean)
    }

    /// Create a new number flag.
    pub fn number() -> Self {
        FlagSpec::new(FlagType::Number)
    }

    /// Effective type of the flag.
    pub fn kind(&self) -> FlagType {
        self.flag_type.unwrap_or_default()
    }

    /// Specify the default value.
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        FlagSpec {
            default: Some(value.into()),
            ..self
        }
    }

    /// Specify a single character alias.
    pub fn short_flag(self, short_flag: char) -> Self {
        FlagSpec {
            short_flag: Some(short_flag),
            ..self
        }
    }

    /// Specify additional names for the flag.
    pub fn aliases(self, aliases: &[&str]) -> Self {
        FlagSpec {
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            ..self
        }
    }

    /// Allow the flag to be specified more than once.
    pub fn multiple(self) -> Self {
        FlagSpec {
            is_multiple: true,
            ..self
        }
    }

    /// Restrict the values the flag may take.
    pub fn choices(self, choices: impl Into<Value>) -> Self {
        FlagSpec {
            choices: Some(choices.into()),
            ..self
        }
    }

    /// Specify that the flag must be provided on the command-line.
    pub fn required(self) -> Self {
        FlagSpec {
            is_required: Required::Always(true),
            ..self
        }
    }

    /// Specify that the flag must be provided when `predicate` returns true.
    pub fn required_if<F>(self, predicate: F) -> Self
    where
        F: Fn(&FlagMap, &[Value]) -> bool + Send + Sync + 'static,
    {
        FlagSpec {
            is_required: Required::when(predicate),
            ..self
        }
    }

    /// Specify the requirement explicitly.
    pub fn is_required(self, is_required: Required) -> Self {
        FlagSpec {
            is_required,
            ..self
        }
    }

    /// Specify the help text for the flag.
    pub fn description(self, description: &str) -> Self {
        FlagSpec {
            description: Some(description.into()),
            ..self
        }
    }

    /// Set the retired single alias field.
    pub fn legacy_alias(self, alias: &str) -> Self {
        FlagSpec {
            alias: Some(alias.into()),
            ..self
        }
    }

    /// Every alternative name for the flag, short flag last.
    pub fn all_aliases(&self) -> Vec<String> {
        let mut names = self.aliases.clone();

        if let Some(short) = self.short_flag {
            names.push(short.to_string());
        }

        names
    }
}

/// A flag declared by type alone.
impl From<FlagType> for FlagSpec {
    fn from(flag_type: FlagType) -> Self {
        FlagSpec::new(flag_type)
    }
}

/// The flag schema: every flag a program accepts, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Flags {
    entries: IndexMap<String, FlagSpec>,
}

impl Flags {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Flags::default()
    }

    /// Register a flag under its canonical (camelCase) name.
    pub fn add(&mut self, key: &str, spec: impl Into<FlagSpec>) {
        self.entries.insert(key.into(), spec.into());
    }

    /// Builder form of [Flags::add].
    pub fn flag(mut self, key: &str, spec: impl Into<FlagSpec>) -> Self {
        self.add(key, spec);
        self
    }

    /// Returns the number of declared flags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no flags are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Determine if a flag with the specified name has been declared.
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the declaration of the specified flag.
    pub fn get(&self, key: &str) -> Option<&FlagSpec> {
        self.entries.get(key)
    }

    /// Iterate over the declarations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagSpec)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
