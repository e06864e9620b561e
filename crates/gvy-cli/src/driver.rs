use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use gvy_ast::{AstArena, ModuleId};
use gvy_common::Diagnostic;
use gvy_verifier::{Verifier, VerifierOptions};

use crate::args::CliArgs;

/// A serialized compilation unit: resolved nodes plus the modules to verify.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub arena: AstArena,
    /// Modules to verify; every module of the arena when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<ModuleId>,
}

#[derive(Debug, Default)]
pub struct CompilationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub files_read: Vec<PathBuf>,
    pub emitted_files: Vec<PathBuf>,
    /// Classes verified across all units.
    pub verified_classes: usize,
    pub failed_classes: usize,
}

impl CompilationResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

pub fn compile(args: &CliArgs) -> Result<CompilationResult> {
    let options = args.verifier_options();
    if let Some(dir) = &args.emit_ast {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    let mut result = CompilationResult::default();
    for path in &args.files {
        let mut unit = read_unit(path)?;
        result.files_read.push(path.clone());

        verify_unit(&mut unit, options, &mut result)?;

        if let Some(dir) = &args.emit_ast {
            let out = emit_unit(&unit, path, dir)?;
            result.emitted_files.push(out);
        }
    }
    Ok(result)
}

pub fn read_unit(path: &Path) -> Result<CompilationUnit> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse compilation unit {}", path.display()))
}

/// Run the verifier over the unit's modules, collecting diagnostics into `result`.
pub fn verify_unit(unit: &mut CompilationUnit, options: VerifierOptions, result: &mut CompilationResult) -> Result<()> {
    let modules = modules_to_verify(unit)?;
    let mut verifier = Verifier::new(&mut unit.arena, options);
    for module in modules {
        let outcome = verifier.verify_module(module);
        tracing::debug!(
            module = module.0,
            verified = outcome.verified.len(),
            failed = outcome.failed.len(),
            "module verified"
        );
        result.verified_classes += outcome.verified.len();
        result.failed_classes += outcome.failed.len();
    }
    result.diagnostics.extend(verifier.into_diagnostics());
    Ok(())
}

fn modules_to_verify(unit: &CompilationUnit) -> Result<Vec<ModuleId>> {
    let arena = &unit.arena;
    let modules: Vec<ModuleId> = if unit.modules.is_empty() {
        (0..arena.modules.len() as u32).map(ModuleId).collect()
    } else {
        unit.modules.clone()
    };

    for &module in &modules {
        let Some(node) = arena.modules.get(module.index()) else {
            bail!("module id {} is out of range ({} modules)", module.0, arena.modules.len());
        };
        if let Some(class) = node.classes.iter().find(|c| c.index() >= arena.classes.len()) {
            bail!("module '{}' references unknown class id {}", node.name, class.0);
        }
    }
    Ok(modules)
}

fn emit_unit(unit: &CompilationUnit, input: &Path, dir: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .map_or_else(|| "unit".into(), |s| s.to_string_lossy());
    let out = dir.join(format!("{stem}.verified.json"));
    let json = serde_json::to_string_pretty(unit).context("failed to serialize verified unit")?;
    std::fs::write(&out, json).with_context(|| format!("failed to write {}", out.display()))?;
    tracing::debug!(path = %out.display(), "emitted verified unit");
    Ok(out)
}
