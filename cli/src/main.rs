mod driver;

use std::process::exit;

use clap::Parser;

use crate::driver::{Driver, Options, PrintStyle};

/// Scans and parses expressions, printing the resulting syntax tree.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to parse as a single expression. Starts a prompt when omitted.
    script: Option<String>,

    /// How the syntax tree is printed.
    #[arg(short, long, value_enum, default_value_t = PrintStyle::Ast)]
    style: PrintStyle,

    /// Print the scanned tokens before the tree.
    #[arg(short, long)]
    tokens: bool,

    /// Report how long scanning and parsing took.
    #[arg(long)]
    timings: bool,
}

fn main() {
    let args = Args::parse();
    let driver = Driver::new(Options {
        style: args.style,
        dump_tokens: args.tokens,
        timings: args.timings,
    });

    match args.script {
        Some(path) => {
            if let Err(err) = driver.run_file(&path) {
                eprintln!("{}", err);
                if err.is::<std::io::Error>() {
                    exit(74);
                } else {
                    exit(65);
                }
            }
        }
        None => {
            if let Err(err) = driver.run_prompt() {
                eprintln!("{}", err);
                exit(74);
            }
        }
    }
}
