// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing how values can be restricted to a set of choices.
use flagspec::{App, FlagSpec, Flags, Result};

fn main() -> Result<()> {
    let flags = Flags::new()
        .flag(
            "animal",
            FlagSpec::string()
                .choices(vec!["dog", "cat", "unicorn"])
                .default_value("cat"),
        )
        .flag(
            "number",
            FlagSpec::number().multiple().choices(vec![1, 2, 3]),
        );

    let app = App::new("choices").flags(flags);

    // Try "--animal rainbow" or "--number 1 --number 5".
    let parsed = app.parse()?;

    println!("INFO: animal: {}", parsed.flags["animal"]);
    println!("INFO: numbers: {}", parsed.flags["number"]);

    Ok(())
}
