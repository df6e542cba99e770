use std::process::ExitCode;

use anstream::eprintln;
use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;

use minversions_cli::{Cli, Commands};

use crate::commands::ExitStatus;
use crate::printer::Printer;

mod commands;
mod logging;
mod printer;
mod reporter;

fn run() -> Result<ExitStatus> {
    let cli = Cli::parse();
    let globals = cli.global_args;

    anstream::ColorChoice::write_global(globals.color.into());

    // Configure the `tracing` crate, which controls internal logging.
    logging::setup_logging(logging::Level::from(globals.verbose))?;

    // Configure the `Printer`, which controls user-facing output in the CLI.
    let printer = if globals.quiet {
        Printer::Quiet
    } else if globals.verbose > 0 {
        Printer::Verbose
    } else {
        Printer::Default
    };

    match cli.command {
        Commands::Requirements(args) => commands::requirements(args, printer),
        Commands::Run(args) => commands::run(
            args,
            globals.config_file.as_deref(),
            globals.verbose,
            printer,
        ),
    }
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    match run() {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{}: {}", "error".red().bold(), err);
            for cause in err.chain().skip(1) {
                eprintln!("  {}: {}", "Caused by".red().bold(), cause);
            }
            ExitStatus::Error.into()
        }
    }
}
