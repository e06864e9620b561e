use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use gvy_verifier::VerifierOptions;

/// CLI arguments for the gvy binary.
#[derive(Parser, Debug)]
#[command(
    name = "gvy",
    version,
    about = "Prepare resolved Groovy class nodes for bytecode generation"
)]
pub struct CliArgs {
    /// Serialized compilation units (JSON) to verify.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    // ==================== Output ====================
    /// Write each verified unit as `<name>.verified.json` into this directory.
    #[arg(long = "emit-ast", value_name = "DIR")]
    pub emit_ast: Option<PathBuf>,

    /// Enable color in diagnostic output. Defaults to whether stderr is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,

    /// Diagnostic output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    // ==================== Verifier ====================
    /// Keep static field initializers on the fields instead of moving them into `<clinit>`.
    #[arg(long = "no-inline-static-init")]
    pub no_inline_static_init: bool,

    /// Mark generated members synthetic instead of annotating them as generated.
    #[arg(long = "no-annotate")]
    pub no_annotate: bool,

    /// Keep verifying the remaining classes of a module after one fails.
    #[arg(long = "continue-on-error")]
    pub continue_on_error: bool,
}

impl CliArgs {
    #[must_use]
    pub fn verifier_options(&self) -> VerifierOptions {
        VerifierOptions {
            inline_static_field_initializers_into_clinit: !self.no_inline_static_init,
            annotate_generated: !self.no_annotate,
            continue_after_error: self.continue_on_error,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// `file:line:column - error GVY1001: message`
    #[default]
    Text,
    /// One JSON array of diagnostics on stdout.
    Json,
}
