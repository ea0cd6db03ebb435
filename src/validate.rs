// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Post-parse checks: unknown flags, choices and required flags.

use tracing::debug;

use crate::case::decamelize_flag_key;
use crate::error::{Error, MissingFlag, Result};
use crate::flag::{FlagMap, FlagSpec, Flags, Required, Value};

/// Reject positional arguments that look like options.
///
/// Only meaningful when the tokenizer was told to treat unknown options as
/// positional arguments.
pub fn check_unknown_flags(input: &[Value]) -> Result<()> {
    let unknown: Vec<String> = input
        .iter()
        .filter_map(|item| item.as_str())
        .filter(|item| item.starts_with('-'))
        .map(|item| item.to_string())
        .collect();

    if unknown.is_empty() {
        return Ok(());
    }

    debug!(?unknown, "unknown flags");

    Err(Error::UnknownFlags(unknown))
}

fn quote_values<'a>(values: impl Iterator<Item = &'a Value>) -> String {
    values
        .map(|v| format!("`{}`", v))
        .collect::<Vec<String>>()
        .join(", ")
}

/// Check a single flag's value against its choices, returning the
/// problem, if any.
fn validate_choices_by_flag(key: &str, flag: &FlagSpec, received: Option<&Value>) -> Option<String> {
    let choices = flag.choices.as_ref()?.as_list()?;

    if choices.is_empty() {
        return None;
    }

    let must_be_one_of = format!("Value must be one of: [{}]", quote_values(choices.iter()));
    let name = decamelize_flag_key(key);

    // A value-less string flag is the empty string.
    let received = match received {
        Some(Value::String(s)) if s.is_empty() => None,
        other => other,
    };

    let received = match received {
        Some(value) => value,
        None if matches!(flag.is_required, Required::Always(true)) => {
            return Some(format!("Flag `{}` has no value. {}", name, must_be_one_of));
        }
        None => return None,
    };

    match received {
        Value::List(values) => {
            let unknown: Vec<&Value> = values.iter().filter(|v| !choices.contains(v)).collect();

            if unknown.is_empty() {
                return None;
            }

            let values_text = if unknown.len() > 1 { "values" } else { "value" };

            Some(format!(
                "Unknown {} for flag `{}`: {}. {}",
                values_text,
                name,
                quote_values(unknown.into_iter()),
                must_be_one_of
            ))
        }
        scalar if !choices.contains(scalar) => Some(format!(
            "Unknown value for flag `{}`: `{}`. {}",
            name, scalar, must_be_one_of
        )),
        _ => None,
    }
}

/// Check every flag with declared choices, reporting all problems at once.
///
/// A flag with no value is only reported if it is [Required::Always]
/// required; computed requirements are left to
/// [check_missing_required_flags].
pub fn validate_choices(flags: &Flags, received: &FlagMap) -> Result<()> {
    let errors: Vec<String> = flags
        .iter()
        .filter_map(|(key, flag)| validate_choices_by_flag(key, flag, received.get(key)))
        .collect();

    if errors.is_empty() {
        return Ok(());
    }

    debug!(errors = errors.len(), "invalid choices");

    Err(Error::InvalidChoices(errors))
}

/// Determine whether a flag is required and missing.
///
/// # Return value
///
/// - [Error::PredicateType] if a requiredness predicate returns a
///   non-boolean value.
fn is_flag_missing(
    key: &str,
    flag: &FlagSpec,
    received: &FlagMap,
    input: &[Value],
) -> Result<bool> {
    let required = match &flag.is_required {
        Required::Always(required) => *required,
        Required::Computed(predicate) => match predicate(received, input) {
            Value::Boolean(required) => required,
            other => return Err(Error::PredicateType(other.type_name())),
        },
    };

    if !required {
        return Ok(false);
    }

    let missing = match received.get(key) {
        None => true,
        // Present but empty counts as missing for multiple flags.
        Some(Value::List(values)) => flag.is_multiple && values.is_empty(),
        Some(_) => false,
    };

    Ok(missing)
}

/// Check every required flag has a value, reporting all missing flags at
/// once.
pub fn check_missing_required_flags(flags: &Flags, received: &FlagMap, input: &[Value]) -> Result<()> {
    let mut missing = Vec::<MissingFlag>::new();

    for (key, flag) in flags.iter() {
        if !flag.is_required.is_set() {
            continue;
        }

        if is_flag_missing(key, flag, received, input)? {
            missing.push(MissingFlag {
                key: key.into(),
                short_flag: flag.short_flag,
            });
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    debug!(missing = missing.len(), "missing required flags");

    Err(Error::MissingRequired(missing))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::flag::{FlagType, Required};

    fn map(entries: Vec<(&str, Value)>) -> FlagMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_check_unknown_flags() {
        assert!(check_unknown_flags(&[]).is_ok());
        assert!(check_unknown_flags(&["foo".into(), 5.into()]).is_ok());

        let err = check_unknown_flags(&["foo".into(), "--bar".into(), "-x".into()]).unwrap_err();

        assert!(matches!(err, Error::UnknownFlags(ref v) if v == &["--bar", "-x"]));
    }

    #[test]
    fn test_validate_choices() {
        #[derive(Debug)]
        struct TestData<'a> {
            flags: Flags,
            received: Vec<(&'a str, Value)>,
            error: Option<&'a str>,
        }

        let animal = FlagSpec::default().choices(vec!["dog", "cat", "unicorn"]);

        let tests = &[
            TestData {
                flags: Flags::new()
                    .flag("animal", animal.clone())
                    .flag("number", FlagSpec::number().choices(vec![1.1, 2.2, 3.3])),
                received: vec![("animal", "cat".into()), ("number", 2.2.into())],
                error: None,
            },
            TestData {
                flags: Flags::new()
                    .flag("animal", animal.clone())
                    .flag("number", FlagSpec::default().choices(vec![1, 2, 3])),
                received: vec![("animal", "rainbow".into()), ("number", "5".into())],
                error: Some(
                    "Unknown value for flag `--animal`: `rainbow`. Value must be one of: [`dog`, `cat`, `unicorn`]\n\
                     Unknown value for flag `--number`: `5`. Value must be one of: [`1`, `2`, `3`]",
                ),
            },
            TestData {
                // Absent and optional.
                flags: Flags::new().flag("animal", animal.clone()),
                received: vec![],
                error: None,
            },
            TestData {
                flags: Flags::new().flag("animal", animal.clone().required()),
                received: vec![],
                error: Some(
                    "Flag `--animal` has no value. Value must be one of: [`dog`, `cat`, `unicorn`]",
                ),
            },
            TestData {
                // Given without a value and optional.
                flags: Flags::new().flag("animal", animal.clone()),
                received: vec![("animal", "".into())],
                error: None,
            },
            TestData {
                flags: Flags::new().flag("animal", animal.clone().required()),
                received: vec![("animal", "".into())],
                error: Some(
                    "Flag `--animal` has no value. Value must be one of: [`dog`, `cat`, `unicorn`]",
                ),
            },
            TestData {
                // Absent with a computed requirement.
                flags: Flags::new().flag("animal", animal.clone().required_if(|_, _| true)),
                received: vec![],
                error: None,
            },
            TestData {
                flags: Flags::new().flag("animal", animal.clone().multiple()),
                received: vec![("animal", vec!["dog", "unicorn"].into())],
                error: None,
            },
            TestData {
                flags: Flags::new().flag("animal", animal.clone().multiple()),
                received: vec![("animal", vec!["dog", "rabbit"].into())],
                error: Some(
                    "Unknown value for flag `--animal`: `rabbit`. Value must be one of: [`dog`, `cat`, `unicorn`]",
                ),
            },
            TestData {
                flags: Flags::new().flag(
                    "animal",
                    FlagSpec::string().multiple().choices(vec!["cat", "unicorn"]),
                ),
                received: vec![("animal", vec!["dog", "rabbit", "dog"].into())],
                error: Some(
                    "Unknown values for flag `--animal`: `dog`, `rabbit`, `dog`. Value must be one of: [`cat`, `unicorn`]",
                ),
            },
            TestData {
                flags: Flags::new()
                    .flag("animal", FlagSpec::string().choices(vec!["cat", "unicorn"]))
                    .flag("plant", FlagSpec::string().choices(vec!["tree", "flower"])),
                received: vec![("animal", "dog".into()), ("plant", "succulent".into())],
                error: Some(
                    "Unknown value for flag `--animal`: `dog`. Value must be one of: [`cat`, `unicorn`]\n\
                     Unknown value for flag `--plant`: `succulent`. Value must be one of: [`tree`, `flower`]",
                ),
            },
            TestData {
                // Empty choices are not checked.
                flags: Flags::new().flag("animal", FlagSpec::string().choices(Vec::<Value>::new())),
                received: vec![("animal", "dog".into())],
                error: None,
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let result = validate_choices(&d.flags, &map(d.received.clone()));

            match d.error {
                None => assert!(result.is_ok(), "{}: {:?}", msg, result),
                Some(expected) => {
                    let err = result.unwrap_err();
                    assert!(matches!(err, Error::InvalidChoices(_)), "{}", msg);
                    assert_eq!(err.to_string(), expected, "{}", msg);
                }
            }
        }
    }

    #[test]
    fn test_missing_required() {
        let flags = Flags::new()
            .flag("test", FlagSpec::string().short_flag('t').required())
            .flag("number", FlagSpec::number().required())
            .flag("kebabCase", FlagSpec::string().required())
            .flag("notNeeded", FlagType::String);

        let err = check_missing_required_flags(&flags, &FlagMap::new(), &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required flags\n\t--test, -t\n\t--number\n\t--kebab-case"
        );

        // The empty string is a value.
        let received = map(vec![("test", "".into())]);
        let err = check_missing_required_flags(&flags, &received, &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required flags\n\t--number\n\t--kebab-case"
        );

        let received = map(vec![
            ("test", "test".into()),
            ("number", 6.into()),
            ("kebabCase", "test".into()),
        ]);
        assert!(check_missing_required_flags(&flags, &received, &[]).is_ok());
    }

    #[test]
    fn test_missing_required_multiple() {
        let flags = Flags::new().flag(
            "test",
            FlagSpec::number().short_flag('t').multiple().required(),
        );

        let received = map(vec![("test", Value::List(vec![]))]);
        let err = check_missing_required_flags(&flags, &received, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Missing required flag\n\t--test, -t");

        let received = map(vec![("test", vec![1].into())]);
        assert!(check_missing_required_flags(&flags, &received, &[]).is_ok());

        // Not required at all: empty is fine.
        let flags = Flags::new().flag(
            "test",
            FlagSpec::number()
                .multiple()
                .required_if(|flags, _| flags.get("other").is_some()),
        );

        let received = map(vec![("test", Value::List(vec![]))]);
        assert!(check_missing_required_flags(&flags, &received, &[]).is_ok());
    }

    #[test]
    fn test_required_predicate() {
        let flags = Flags::new()
            .flag("trigger", FlagSpec::boolean().short_flag('t'))
            .flag(
                "withTrigger",
                FlagSpec::string().required_if(|flags, _| {
                    flags.get("trigger").and_then(Value::as_bool).unwrap_or(false)
                }),
            )
            .flag(
                "fromInput",
                FlagSpec::string().required_if(|_, input| input.len() > 1),
            );

        let received = map(vec![("trigger", false.into())]);
        assert!(check_missing_required_flags(&flags, &received, &[]).is_ok());

        let received = map(vec![("trigger", true.into())]);
        let err = check_missing_required_flags(&flags, &received, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Missing required flag\n\t--with-trigger");

        let received = map(vec![("trigger", true.into()), ("withTrigger", "x".into())]);
        assert!(check_missing_required_flags(&flags, &received, &[]).is_ok());

        let input: Vec<Value> = vec!["a".into(), "b".into()];
        let err = check_missing_required_flags(&flags, &received, &input).unwrap_err();
        assert_eq!(err.to_string(), "Missing required flag\n\t--from-input");
    }

    #[test]
    fn test_required_predicate_type() {
        let flags = Flags::new()
            .flag("allowError", FlagSpec::boolean().short_flag('a'))
            .flag("missing", FlagSpec::string().required())
            .flag(
                "shouldError",
                FlagSpec::boolean().is_required(Required::computed(|flags, _| {
                    if flags.get("allowError") == Some(&Value::Boolean(true)) {
                        "should error".into()
                    } else {
                        false.into()
                    }
                })),
            );

        let received = map(vec![("allowError", true.into())]);
        let err = check_missing_required_flags(&flags, &received, &[]).unwrap_err();

        assert!(matches!(err, Error::PredicateType("string")));
        assert_eq!(
            err.to_string(),
            "Return value for isRequired callback should be of type boolean, but string was returned."
        );

        let received = map(vec![("allowError", false.into())]);
        let err = check_missing_required_flags(&flags, &received, &[]).unwrap_err();

        assert!(matches!(err, Error::MissingRequired(_)));
    }
}
