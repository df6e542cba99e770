use std::fmt::Write;

use anyhow::{Context, Result};

use minversions_cli::RequirementsArgs;
use minversions_interpreter::{find_python, query_markers, read_markers};
use minversions_metadata::Headers;
use minversions_resolver::compute_install_set;

use crate::commands::ExitStatus;
use crate::printer::Printer;
use crate::reporter::TerminalReporter;

/// Print the install set of a source distribution, with each requirement pinned to its minimum
/// version.
pub(crate) fn requirements(args: RequirementsArgs, printer: Printer) -> Result<ExitStatus> {
    let content = minversions_extract::read_pkg_info(&args.package).with_context(|| {
        format!(
            "Failed to read the metadata of `{}`",
            args.package.display()
        )
    })?;
    let (metadata, _description) = Headers::parse(&content)?;

    let markers = if let Some(markers) = &args.markers {
        read_markers(markers)?
    } else {
        let python = match args.python {
            Some(python) => python,
            None => find_python()?,
        };
        query_markers(&python)?
    };

    let reporter = TerminalReporter::new(printer);
    let requirements = compute_install_set(&metadata, &args.extra, &markers, &reporter)?;
    for requirement in requirements {
        writeln!(printer.stdout(), "{requirement}")?;
    }

    Ok(ExitStatus::Success)
}
