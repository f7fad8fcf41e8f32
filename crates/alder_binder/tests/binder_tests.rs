//! Scope analysis integration tests.
//!
//! Drives the analyzer the way a semantic pass would and checks the
//! resulting scope tree and diagnostics.

use alder_binder::{AnalyzerOptions, DataType, ScopeAnalyzer, ScopeResolver};
use alder_core::text::TextSpan;
use alder_diagnostics::DiagnosticCollection;
use alder_tree::{NodeId, TreeError};

fn span(start: u32) -> Option<TextSpan> {
    Some(TextSpan::new(start, 1))
}

fn codes(diagnostics: &DiagnosticCollection) -> Vec<u32> {
    diagnostics.diagnostics().iter().map(|d| d.code).collect()
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_clean_program_has_no_diagnostics() {
    // { int a  a = 1  print(a) }
    let mut analyzer = ScopeAnalyzer::default();
    analyzer.open_scope().unwrap();
    assert!(analyzer.declare("a", DataType::Int, span(2)).unwrap());
    assert_eq!(analyzer.assign("a", span(8)).unwrap(), Some(DataType::Int));
    assert_eq!(analyzer.use_name("a", span(20)).unwrap(), Some(DataType::Int));
    analyzer.close_scope().unwrap();

    let (tree, diagnostics) = analyzer.finish().unwrap();
    assert!(diagnostics.is_empty(), "unexpected: {:?}", codes(&diagnostics));
    let entry = tree.payload(NodeId(0)).unwrap().get("a").unwrap();
    assert!(entry.used && entry.initialized);
}

#[test]
fn test_redeclaration_in_same_scope() {
    let mut analyzer = ScopeAnalyzer::default();
    analyzer.open_scope().unwrap();
    assert!(analyzer.declare("a", DataType::Int, span(2)).unwrap());
    assert!(!analyzer.declare("a", DataType::String, span(10)).unwrap());
    analyzer.close_scope().unwrap();

    let (tree, diagnostics) = analyzer.finish().unwrap();
    assert_eq!(diagnostics.error_count(), 1);
    let redeclared = diagnostics.with_code(201).next().unwrap();
    assert_eq!(redeclared.span, span(10));
    assert_eq!(redeclared.related_information[0].span, span(2));
    // First declaration wins.
    let entry = tree.payload(NodeId(0)).unwrap().get("a").unwrap();
    assert_eq!(entry.declared_type, DataType::Int);
}

#[test]
fn test_redeclaration_in_nested_scope_is_shadowing() {
    let mut analyzer = ScopeAnalyzer::new(AnalyzerOptions {
        warn_shadowing: true,
        ..AnalyzerOptions::default()
    });
    analyzer.open_scope().unwrap();
    analyzer.declare("a", DataType::Int, span(2)).unwrap();
    analyzer.open_scope().unwrap();
    assert!(analyzer.declare("a", DataType::Boolean, span(12)).unwrap());
    assert_eq!(analyzer.assign("a", None).unwrap(), Some(DataType::Boolean));
    analyzer.close_scope().unwrap();
    analyzer.close_scope().unwrap();

    let (_, diagnostics) = analyzer.finish().unwrap();
    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.with_code(204).count(), 1);
}

#[test]
fn test_shadowing_silent_by_default() {
    let mut analyzer = ScopeAnalyzer::default();
    analyzer.open_scope().unwrap();
    analyzer.declare("a", DataType::Int, None).unwrap();
    analyzer.open_scope().unwrap();
    analyzer.declare("a", DataType::Int, None).unwrap();
    assert_eq!(analyzer.diagnostics().with_code(204).count(), 0);
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_use_of_undeclared_name() {
    let mut analyzer = ScopeAnalyzer::default();
    analyzer.open_scope().unwrap();
    assert_eq!(analyzer.use_name("ghost", span(4)).unwrap(), None);
    assert_eq!(analyzer.assign("ghost", span(9)).unwrap(), None);
    analyzer.close_scope().unwrap();
    let (_, diagnostics) = analyzer.finish().unwrap();
    assert_eq!(codes(&diagnostics), vec![202, 202]);
}

#[test]
fn test_use_marks_outer_declaration() {
    let mut analyzer = ScopeAnalyzer::default();
    analyzer.open_scope().unwrap();
    analyzer.declare("s", DataType::String, span(2)).unwrap();
    analyzer.assign("s", span(11)).unwrap();
    let inner = analyzer.open_scope().unwrap();
    assert_eq!(analyzer.use_name("s", span(30)).unwrap(), Some(DataType::String));
    analyzer.close_scope().unwrap();
    analyzer.close_scope().unwrap();

    let (tree, diagnostics) = analyzer.finish().unwrap();
    assert!(diagnostics.is_empty());
    assert!(tree.payload(NodeId(0)).unwrap().get("s").unwrap().used);
    assert!(tree.payload(inner).unwrap().is_empty());
}

#[test]
fn test_three_level_shadowing_and_fallthrough() {
    let mut analyzer = ScopeAnalyzer::default();
    analyzer.open_scope().unwrap();
    analyzer.declare("x", DataType::Int, None).unwrap();
    analyzer.open_scope().unwrap();
    analyzer.declare("y", DataType::Int, None).unwrap();
    let innermost = analyzer.open_scope().unwrap();
    analyzer.declare("x", DataType::String, None).unwrap();
    let sibling = {
        analyzer.close_scope().unwrap();
        analyzer.open_scope().unwrap()
    };

    let tree = analyzer.tree();
    let resolver = ScopeResolver::new(tree);
    assert_eq!(resolver.resolve(innermost, "x").unwrap().entry.declared_type, DataType::String);
    // A sibling scope without the inner declaration falls through to the root.
    let outer = resolver.resolve(sibling, "x").unwrap();
    assert_eq!(outer.scope, NodeId(0));
    assert_eq!(outer.entry.declared_type, DataType::Int);
}

// ============================================================================
// Usage pass
// ============================================================================

#[test]
fn test_unused_and_uninitialized_warnings() {
    let mut analyzer = ScopeAnalyzer::default();
    analyzer.open_scope().unwrap();
    analyzer.declare("a", DataType::Int, span(2)).unwrap();
    analyzer.declare("b", DataType::Int, span(8)).unwrap();
    analyzer.assign("b", span(14)).unwrap();
    analyzer.declare("c", DataType::Int, span(20)).unwrap();
    analyzer.use_name("c", span(26)).unwrap();
    analyzer.close_scope().unwrap();

    let (_, diagnostics) = analyzer.finish().unwrap();
    assert!(!diagnostics.has_errors());
    // a: never initialized + never used; b: never used;
    // c: used before assigned + never initialized.
    assert_eq!(codes(&diagnostics), vec![302, 301, 301, 302, 303]);
}

#[test]
fn test_usage_warnings_can_be_disabled() {
    let mut analyzer = ScopeAnalyzer::new(AnalyzerOptions {
        warn_unused: false,
        warn_uninitialized: false,
        warn_shadowing: false,
    });
    analyzer.open_scope().unwrap();
    analyzer.declare("a", DataType::Int, None).unwrap();
    analyzer.use_name("a", None).unwrap();
    analyzer.close_scope().unwrap();
    let (_, diagnostics) = analyzer.finish().unwrap();
    assert!(diagnostics.is_empty());
}

#[test]
fn test_unclosed_block_fails_analysis() {
    // { int a { a = 1   (both blocks left open)
    let mut analyzer = ScopeAnalyzer::default();
    analyzer.open_scope().unwrap();
    analyzer.declare("a", DataType::Int, span(2)).unwrap();
    analyzer.open_scope().unwrap();
    analyzer.assign("a", span(12)).unwrap();

    let err = analyzer.finish().unwrap_err();
    assert_eq!(
        err,
        TreeError::Unbalanced {
            cursor: NodeId(1),
            root: NodeId(0)
        }
    );
    assert_eq!(
        err.to_string(),
        "tree finished with #1 still open under root #0: more descents than ascents"
    );
}
