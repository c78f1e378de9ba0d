//! atlasd entry point.
//!
//! Argument parsing and command dispatch live in the CLI module; nothing is
//! loaded, opened, or spawned here. Errors print to stderr and exit
//! non-zero.

use atlasd::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
