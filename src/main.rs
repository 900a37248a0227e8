mod choice;
mod cli;
mod dispatch;
mod fallback;
mod file_scanner;
mod filetypes;
mod mpris;
mod output;
mod selection;
mod tui;
mod workflow;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let argv: Vec<String> = std::env::args().collect();
    let program_name = argv.first().map(String::as_str).unwrap_or("lap");

    // The name we were invoked as (ap, laq, raq, ...) seeds the defaults.
    let cli_args = cli::Cli::parse().with_personality(cli::Personality::from_program_name(program_name));

    let mut clog = colog::default_builder();
    clog.filter(None, cli_args.log_level());
    clog.init();

    // Delegate the main application logic to the workflow module
    workflow::run_lap(cli_args, &workflow::session_title(&argv))
}
