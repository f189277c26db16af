//! Entitree CLI Binary
//!
//! Command-line entry point for the entity tree browser.

use clap::Parser;
use entitree::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing: {}", e);
            process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            process::exit(1);
        }
    };

    match runtime.block_on(context.execute(&cli.resolved_command())) {
        Ok(output) => {
            if !output.is_empty() {
                print!("{}", output);
                if !output.ends_with('\n') {
                    println!();
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
