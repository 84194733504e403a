//! FrameCode CLI — load, check, and execute FrameCode programs.
//!
//! Exit codes:
//! - 0: success
//! - 10: bad command-line arguments
//! - 11: input file cannot be read
//! - 31, 32, 52, 60: load-time errors
//! - 53-59, 99: runtime errors

mod commands;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(10);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "check" => commands::check(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(10);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: framecode <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <input.fc>     Load and execute a program");
    eprintln!("  check <input.fc>   Load and validate a program without executing it");
}
