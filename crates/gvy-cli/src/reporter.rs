use colored::Colorize;
use rustc_hash::FxHashMap;
use std::path::Path;

use gvy_common::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

pub struct Reporter {
    color: bool,
    /// Source text by file name; `None` once a read has failed.
    sources: FxHashMap<String, Option<String>>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
        }
    }

    /// Use `text` for snippets of `file` instead of reading it from disk.
    pub fn add_source(&mut self, file: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(file.into(), Some(text.into()));
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        out
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut output = format_location(&diagnostic.file, diagnostic.line, diagnostic.column);
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) = self.format_snippet(&diagnostic.file, diagnostic.line, diagnostic.column) {
            output.push_str(&snippet);
        }

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    /// The offending source line with a caret under the column:
    ///   4   def $ = 1
    ///           ^
    fn format_snippet(&mut self, file: &str, line: u32, column: u32) -> Option<String> {
        if line == 0 {
            return None;
        }
        let color = self.color;
        let source = self.source(file)?;
        let line_text = source.lines().nth((line - 1) as usize)?;

        let mut marker = String::new();
        for ch in line_text.chars().take(column.saturating_sub(1) as usize) {
            marker.push(if ch == '\t' { '\t' } else { ' ' });
        }
        let caret = if color {
            "^".red().bold().to_string()
        } else {
            "^".to_string()
        };
        marker.push_str(&caret);

        Some(format!("\n  {line:>3}   {line_text}\n        {marker}"))
    }

    fn format_related(&self, related: &DiagnosticRelatedInformation) -> String {
        let location = format_location(&related.file, related.line, related.column);
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };
        format!("{prefix}: {location} - {}", related.message_text)
    }

    fn source(&mut self, file: &str) -> Option<&str> {
        if file.is_empty() {
            return None;
        }
        if !self.sources.contains_key(file) {
            let contents = std::fs::read_to_string(Path::new(file)).ok();
            self.sources.insert(file.to_string(), contents);
        }
        self.sources.get(file)?.as_deref()
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("GVY{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

fn format_location(file: &str, line: u32, column: u32) -> String {
    let file = if file.is_empty() { "<unknown>" } else { file };
    if line == 0 {
        file.to_string()
    } else {
        format!("{file}:{line}:{column}")
    }
}
