//! The compilation unit.

use crate::error::CompileError;
use crate::session::{CodegenSession, CompiledImage};
use alder_binder::{AnalyzerOptions, ScopeAnalyzer, ScopeTree};
use alder_codegen::CodegenError;
use alder_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use alder_options::{parse_options_file, CompilerOptions};
use std::path::Path;

/// One program being compiled.
///
/// The front end drives the analyzer and the session it hands out; the
/// program then gathers their results into a [`CompilationResult`].
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub options: CompilerOptions,
}

/// Everything a compilation produced.
#[derive(Debug)]
pub struct CompilationResult {
    pub scopes: ScopeTree,
    pub diagnostics: DiagnosticCollection,
    /// `None` when analysis or code generation reported errors.
    pub image: Option<CompiledImage>,
}

impl CompilationResult {
    pub fn succeeded(&self) -> bool {
        self.image.is_some() && !self.diagnostics.has_errors()
    }
}

impl Program {
    pub fn new(options: CompilerOptions) -> Result<Self, CompileError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Load options from a JSON file.
    pub fn from_options_file(path: impl AsRef<Path>) -> Result<Self, CompileError> {
        Ok(Self {
            options: parse_options_file(path)?,
        })
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            warn_unused: self.options.warn_unused(),
            warn_uninitialized: self.options.warn_uninitialized(),
            warn_shadowing: self.options.warn_shadowing(),
        }
    }

    /// A fresh scope analyzer for this program.
    pub fn scope_analyzer(&self) -> ScopeAnalyzer {
        ScopeAnalyzer::new(self.analyzer_options())
    }

    /// A fresh code generation session sized from the options.
    pub fn codegen_session(&self) -> Result<CodegenSession, CompileError> {
        Ok(CodegenSession::new(self.options.memory_capacity())?)
    }

    /// Finish analysis and, when it reported no errors, code generation.
    ///
    /// Code generation failures become diagnostics rather than errors; only
    /// a malformed scope tree is returned as `Err`.
    pub fn complete(&self, analyzer: ScopeAnalyzer, session: CodegenSession) -> Result<CompilationResult, CompileError> {
        let (scopes, mut diagnostics) = analyzer.finish()?;

        if diagnostics.has_errors() {
            tracing::debug!(
                errors = diagnostics.error_count(),
                "skipping code generation after analysis errors"
            );
            return Ok(CompilationResult {
                scopes,
                diagnostics,
                image: None,
            });
        }

        let image = match session.finish() {
            Ok(image) => {
                let used = image.memory.used_cells().to_string();
                let capacity = image.memory.capacity().to_string();
                diagnostics.add(Diagnostic::new(
                    &messages::PROGRAM_IMAGE_USES_0_OF_1_BYTES,
                    &[&used, &capacity],
                ));
                Some(image)
            }
            Err(err) => {
                diagnostics.add(codegen_diagnostic(&err));
                None
            }
        };

        Ok(CompilationResult {
            scopes,
            diagnostics,
            image,
        })
    }
}

/// The diagnostic reported for a code generation failure.
pub fn codegen_diagnostic(err: &CodegenError) -> Diagnostic {
    let text = err.to_string();
    match err {
        CodegenError::OutOfMemory { .. } => Diagnostic::new(&messages::OUT_OF_MEMORY_0, &[&text]),
        _ => Diagnostic::new(&messages::CODE_GENERATION_FAILED_0, &[&text]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alder_options::parse_options;

    #[test]
    fn test_analyzer_options_follow_compiler_options() {
        let options = parse_options(r#"{ "warnUnused": false, "warnShadowing": true }"#).unwrap();
        let program = Program::new(options).unwrap();
        let analyzer = program.analyzer_options();
        assert!(!analyzer.warn_unused);
        assert!(analyzer.warn_uninitialized);
        assert!(analyzer.warn_shadowing);
    }

    #[test]
    fn test_options_file_accepts_paths() {
        let path = std::env::temp_dir().join(format!("alder-options-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "memoryCapacity": 64 }"#).unwrap();
        let program = Program::from_options_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(program.options.memory_capacity(), 64);

        let missing = Program::from_options_file(Path::new("/nonexistent/alder.json"));
        assert!(matches!(missing, Err(CompileError::Options(_))));
    }

    #[test]
    fn test_invalid_capacity_rejected() {
        let options = CompilerOptions {
            memory_capacity: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Program::new(options),
            Err(CompileError::Options(_))
        ));
    }

    #[test]
    fn test_out_of_memory_maps_to_501() {
        let err = CodegenError::OutOfMemory {
            region: alder_codegen::Region::Code,
            requested: 1,
            code_pointer: 4,
            static_size: 0,
            heap_pointer: 4,
        };
        assert_eq!(codegen_diagnostic(&err).code, 501);
        assert_eq!(codegen_diagnostic(&CodegenError::StaticRegionNotPlaced).code, 502);
    }
}
