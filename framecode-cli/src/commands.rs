//! CLI command implementations.

use std::fs;

/// Load and execute a .fc program against the process streams.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: framecode run <input.fc>");
        return Err(10);
    }

    let input = &args[0];
    let text = read_source(input)?;

    let (program, labels) = framecode_loader::load(&text).map_err(|e| {
        eprintln!("error: {e}");
        e.exit_code()
    })?;

    framecode_interp::run(&program, &labels).map_err(|e| {
        eprintln!("runtime error: {e}");
        e.exit_code()
    })
}

/// Load and validate a .fc program without executing it.
pub fn check(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: check requires an input file");
        eprintln!("Usage: framecode check <input.fc>");
        return Err(10);
    }

    let input = &args[0];
    let text = read_source(input)?;

    match framecode_loader::load(&text) {
        Ok((program, _)) => {
            println!("OK: {input} ({} instructions)", program.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e}");
            Err(e.exit_code())
        }
    }
}

fn read_source(input: &str) -> Result<String, i32> {
    fs::read_to_string(input).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        11
    })
}
