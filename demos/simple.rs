// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// A simple example showing typed flags, short flags and defaults.
use flagspec::{App, FlagSpec, Flags, Package};

fn main() {
    let flags = Flags::new()
        // Support "--unicorn <value>" and "-u <value>".
        .flag(
            "unicorn",
            FlagSpec::string()
                .short_flag('u')
                .description("Name of the unicorn"),
        )
        // Support "--rainbow", "-r" and "--no-rainbow".
        .flag(
            "rainbow",
            FlagSpec::boolean()
                .short_flag('r')
                .description("Include a rainbow"),
        )
        // Support "--unicorn-count <number>".
        .flag(
            "unicornCount",
            FlagSpec::number()
                .default_value(1)
                .description("How many unicorns to show"),
        );

    let options: Vec<String> = flags
        .help_lines()
        .iter()
        .map(|line| format!("  {}", line))
        .collect();

    let help = format!(
        "Usage\n  $ simple <input>\n\nOptions\n{}\n\nExamples\n  $ simple --rainbow -u sparkles",
        options.join("\n")
    );

    let package = Package::new("simple")
        .version(env!("CARGO_PKG_VERSION"))
        .description("Shows off some unicorns");

    let app = App::new("simple").package(package).help(&help).flags(flags);

    // Exits for "--help", "--version" and invalid arguments.
    let parsed = app.run();

    println!("INFO: input: {:?}", parsed.input);

    for (key, value) in parsed.flags.iter() {
        println!("INFO: flag {:?}: {}", key, value);
    }
}
