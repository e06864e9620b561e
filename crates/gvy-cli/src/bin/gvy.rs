#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use gvy_cli::args::{CliArgs, OutputFormat};
use gvy_cli::driver;
use gvy_cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTICS_PRESENT: i32 = 1;

fn main() -> Result<()> {
    // GVY_LOG / GVY_LOG_FORMAT, see tracing_config.rs.
    gvy_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let result = driver::compile(&args)?;
    tracing::debug!(
        files = result.files_read.len(),
        verified = result.verified_classes,
        failed = result.failed_classes,
        "compilation finished"
    );

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result.diagnostics)
                .context("failed to serialize diagnostics")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            if !result.diagnostics.is_empty() {
                let pretty = args.pretty.unwrap_or_else(|| std::io::stderr().is_terminal());
                let mut reporter = Reporter::new(pretty);
                eprint!("{}", reporter.render(&result.diagnostics));
            }
            for file in &result.emitted_files {
                println!("{}", file.display());
            }
        }
    }

    if result.has_errors() {
        std::process::exit(EXIT_DIAGNOSTICS_PRESENT);
    }
    std::process::exit(EXIT_SUCCESS);
}
