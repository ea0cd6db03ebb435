// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

//! Help text assembly.

use crate::case::wire_key;
use crate::flag::{FlagType, Flags};

/// Spaces between the longest flag name and its description.
const FLAG_DESCRIPTION_GAP: usize = 4;

/// Remove leading and trailing newlines (but not other whitespace).
pub fn trim_newlines(text: &str) -> &str {
    text.trim_matches(|c| c == '\n' || c == '\r')
}

/// Remove a run of tabs (and any newlines after it) from the end of the
/// text. These are left behind by indented multi-line string literals.
fn trim_trailing_tabs(text: &str) -> &str {
    let without_newlines = text.trim_end_matches(|c| c == '\n' || c == '\r');

    if without_newlines.ends_with('\t') {
        without_newlines.trim_end_matches('\t')
    } else {
        text
    }
}

fn leading_indent(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Smallest indentation of any line that contains more than whitespace.
pub fn min_indent(text: &str) -> usize {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(leading_indent)
        .min()
        .unwrap_or(0)
}

/// Remove the common indentation from every line.
pub fn strip_indent(text: &str) -> String {
    let indent = min_indent(text);

    if indent == 0 {
        return text.to_string();
    }

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| {
            let strip = leading_indent(line).min(indent);
            &line[strip..]
        })
        .collect();

    lines.join("\n")
}

/// Indent every line that contains more than whitespace.
pub fn indent(text: &str, count: usize) -> String {
    let prefix = " ".repeat(count);

    let lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect();

    lines.join("\n")
}

/// Strip the common indentation, then indent by `count` spaces.
pub fn redent(text: &str, count: usize) -> String {
    indent(&strip_indent(text), count)
}

/// Build the help text shown for `--help`.
///
/// # Parameters
///
/// - `help`: Free-form help (usually usage and examples).
/// - `description`: Short summary, shown above `help`.
/// - `help_indent`: Indentation applied to multi-line text.
pub fn build_help(help: Option<&str>, description: Option<&str>, help_indent: usize) -> String {
    let mut text = String::new();

    if let Some(help) = help.filter(|h| !h.is_empty()) {
        let help = trim_newlines(trim_trailing_tabs(help));

        let help = if help.contains('\n') {
            redent(help, help_indent)
        } else {
            help.to_string()
        };

        text = format!("\n{}", help);
    }

    if let Some(description) = description.filter(|d| !d.is_empty()) {
        let description = if text.is_empty() {
            format!("\n{}", description)
        } else {
            redent(&format!("\n{}\n", description), help_indent)
        };

        text = format!("{}{}", description, text);
    }

    text.push('\n');

    text
}

fn flag_name(name: &str, short_flag: Option<char>, flag_type: FlagType) -> String {
    let mut result = format!("--{}", name);

    if let Some(short) = short_flag {
        result.push_str(&format!(", -{}", short));
    }

    if flag_type != FlagType::Boolean {
        result.push_str(&format!(" <{}>", flag_type));
    }

    result
}

impl Flags {
    /// List every flag with its description, aligned in two columns.
    ///
    /// An entry for `--help` is always included.
    pub fn help_lines(&self) -> Vec<String> {
        let mut entries: Vec<(String, String)> = self
            .iter()
            .map(|(key, flag)| {
                let mut description = flag.description.clone().unwrap_or_default();

                if let Some(default) = &flag.default {
                    description.push_str(&format!("  [default: {}]", default));
                }

                (
                    flag_name(&wire_key(key), flag.short_flag, flag.kind()),
                    description.trim().to_string(),
                )
            })
            .collect();

        if !self.exists("help") {
            entries.push((
                flag_name("help", None, FlagType::Boolean),
                "Show help".to_string(),
            ));
        }

        let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

        entries
            .into_iter()
            .map(|(name, description)| {
                if description.is_empty() {
                    return name;
                }

                let padding = " ".repeat(width - name.len() + FLAG_DESCRIPTION_GAP);
                let mut lines = description.lines();
                let first = lines.next().unwrap_or_default();

                let mut result = format!("{}{}{}", name, padding, first);

                let full_padding = " ".repeat(width + FLAG_DESCRIPTION_GAP);
                for line in lines {
                    result.push('\n');
                    result.push_str(&full_padding);
                    result.push_str(line);
                }

                result
            })
            .collect()
    }
}
