// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

/// An example showing always and conditionally required flags.
use flagspec::{App, FlagSpec, Flags, Result, Settings, Value};

fn main() -> Result<()> {
    let flags = Flags::new()
        .flag("output", FlagSpec::string().short_flag('o').required())
        .flag("compress", FlagSpec::boolean().short_flag('c'))
        // Only required when compressing.
        .flag(
            "level",
            FlagSpec::number().required_if(|flags, _| {
                flags.get("compress").and_then(Value::as_bool).unwrap_or(false)
            }),
        )
        // At least one "--input" is needed.
        .flag(
            "input",
            FlagSpec::string().short_flag('i').multiple().required(),
        );

    let app = App::new("required-flags")
        .help("Usage\n  $ required-flags -o <file> -i <file> [-i <file>...] [-c --level <n>]")
        .settings(Settings::new().reject_unknown_flags())
        .flags(flags);

    let parsed = match app.parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    if parsed.request.is_some() {
        parsed.exit_with_help(Some(0));
    }

    println!("INFO: flags: {:?}", parsed.flags);

    Ok(())
}
