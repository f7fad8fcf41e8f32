//! End-to-end tests: scope analysis and code generation driven the way a
//! front end drives them.

use alder_binder::{DataType, ScopeResolver};
use alder_codegen::Cell;
use alder_compiler::{codegen_diagnostic, CompileError, Program};
use alder_diagnostics::DiagnosticCategory;
use alder_options::{parse_options, CompilerOptions};
use alder_tree::{NodeId, TreeError};

fn program(json: &str) -> Program {
    Program::new(parse_options(json).unwrap()).unwrap()
}

// ============================================================================
// Successful compilation
// ============================================================================

/// {
///   int a
///   a = 7
///   {
///     string s
///     s = "hi"
///     print(s)
///     print(a)
///   }
/// }
#[test]
fn test_nested_program_compiles() {
    let program = Program::default();
    let mut analyzer = program.scope_analyzer();
    let mut session = program.codegen_session().unwrap();

    let outer = analyzer.open_scope().unwrap();
    assert!(analyzer.declare("a", DataType::Int, None).unwrap());
    let a = session.reserve("a", outer).unwrap();
    assert_eq!(analyzer.assign("a", None).unwrap(), Some(DataType::Int));
    session.emit(&[0xA9, 0x07, 0x8D]).unwrap();
    session.emit_slot(a).unwrap();

    let inner = analyzer.open_scope().unwrap();
    assert!(analyzer.declare("s", DataType::String, None).unwrap());
    let s = session.reserve("s", inner).unwrap();
    analyzer.assign("s", None).unwrap();
    let hi = session.intern_string("hi").unwrap();
    assert_eq!(hi, 253);
    session.emit(&[0xA9, hi as u8, 0x8D]).unwrap();
    session.emit_slot(s).unwrap();

    analyzer.use_name("s", None).unwrap();
    session.emit(&[0xAC]).unwrap();
    session.emit_slot(s).unwrap();
    session.emit(&[0xA2, 0x02, 0xFF]).unwrap();

    assert_eq!(analyzer.use_name("a", None).unwrap(), Some(DataType::Int));
    session.emit(&[0x00]).unwrap();
    analyzer.close_scope().unwrap();
    analyzer.close_scope().unwrap();

    let result = program.complete(analyzer, session).unwrap();
    assert!(result.succeeded());
    assert_eq!(result.diagnostics.len(), 1);
    let summary = &result.diagnostics.diagnostics()[0];
    assert_eq!(summary.code, 503);
    assert_eq!(summary.category, DiagnosticCategory::Message);
    assert_eq!(summary.message_text, "Program image uses 22 of 256 bytes.");

    let image = result.image.unwrap();
    assert_eq!(image.patched_cells, 6);
    assert_eq!(image.statics.base(), 17);
    assert_eq!(image.statics.get("a", outer).unwrap().address(), 17);
    assert_eq!(image.statics.get("s", inner).unwrap().address(), 18);

    let memory = &image.memory;
    assert_eq!(memory.cell(3), Some(Cell::Byte(0x11)));
    assert_eq!(memory.cell(4), Some(Cell::Byte(0x00)));
    assert_eq!(memory.cell(8), Some(Cell::Byte(0x12)));
    assert_eq!(memory.cell(11), Some(Cell::Byte(0x12)));
    assert_eq!(memory.cell(253), Some(Cell::Byte(b'h')));
    assert_eq!(memory.cell(254), Some(Cell::Byte(b'i')));
    assert_eq!(memory.cell(255), Some(Cell::Byte(0x00)));
    assert_eq!(memory.placeholders().count(), 0);
}

#[test]
fn test_scope_tree_is_returned_with_the_image() {
    let program = Program::default();
    let mut analyzer = program.scope_analyzer();
    let session = program.codegen_session().unwrap();

    analyzer.open_scope().unwrap();
    analyzer.declare("x", DataType::Boolean, None).unwrap();
    let inner = analyzer.open_scope().unwrap();
    analyzer.close_scope().unwrap();
    analyzer.close_scope().unwrap();

    let result = program.complete(analyzer, session).unwrap();
    let resolver = ScopeResolver::new(&result.scopes);
    let found = resolver.resolve(inner, "x").unwrap();
    assert_eq!(found.scope, NodeId(0));
    // Declared but never assigned or read.
    let codes: Vec<u32> = result.diagnostics.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![302, 301, 503]);
}

// ============================================================================
// Failures become diagnostics
// ============================================================================

#[test]
fn test_analysis_errors_skip_code_generation() {
    let program = Program::default();
    let mut analyzer = program.scope_analyzer();
    let session = program.codegen_session().unwrap();

    analyzer.open_scope().unwrap();
    assert_eq!(analyzer.use_name("missing", None).unwrap(), None);
    analyzer.close_scope().unwrap();

    let result = program.complete(analyzer, session).unwrap();
    assert!(!result.succeeded());
    assert!(result.image.is_none());
    assert_eq!(result.diagnostics.error_count(), 1);
    assert_eq!(result.diagnostics.with_code(202).count(), 1);
    assert_eq!(result.diagnostics.with_code(503).count(), 0);
}

#[test]
fn test_unclosed_scope_is_a_compile_error() {
    let program = Program::default();
    let mut analyzer = program.scope_analyzer();
    let session = program.codegen_session().unwrap();

    analyzer.open_scope().unwrap();
    analyzer.open_scope().unwrap();
    analyzer.close_scope().unwrap();

    let err = program.complete(analyzer, session).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Tree(TreeError::Unbalanced { cursor: NodeId(0), root: NodeId(0) })
    ));
}

#[test]
fn test_out_of_memory_during_emission() {
    let program = program(r#"{ "memoryCapacity": 8 }"#);
    let mut session = program.codegen_session().unwrap();
    session.emit(&[0xEA; 7]).unwrap();

    let err = session.emit(&[0xEA]).unwrap_err();
    let diagnostic = codegen_diagnostic(&err);
    assert_eq!(diagnostic.code, 501);
    assert!(diagnostic.is_error());
    assert!(diagnostic.message_text.contains("code region"));
    assert_eq!(session.memory().code_pointer(), 7);
}

#[test]
fn test_shadowing_warning_from_options() {
    let program = program(r#"{ "warnShadowing": true, "warnUnused": false, "warnUninitialized": false }"#);
    let mut analyzer = program.scope_analyzer();
    let session = program.codegen_session().unwrap();

    analyzer.open_scope().unwrap();
    analyzer.declare("x", DataType::Int, None).unwrap();
    analyzer.open_scope().unwrap();
    analyzer.declare("x", DataType::String, None).unwrap();
    analyzer.close_scope().unwrap();
    analyzer.close_scope().unwrap();

    let result = program.complete(analyzer, session).unwrap();
    assert!(result.succeeded());
    assert_eq!(result.diagnostics.with_code(204).count(), 1);
    assert_eq!(result.diagnostics.warning_count(), 1);
}

#[test]
fn test_invalid_options_rejected() {
    let options = CompilerOptions {
        memory_capacity: Some(70_000),
        ..Default::default()
    };
    let err = Program::new(options).unwrap_err();
    assert!(matches!(err, CompileError::Options(_)));
    assert_eq!(err.to_string(), "memoryCapacity must be between 1 and 65536, got 70000");
}
