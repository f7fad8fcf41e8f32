//! alder_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Declaration/use outcomes from the binder and terminal failures from code
//! generation are reported as diagnostics carrying a code, a category, and
//! the formatted message text. Rendering them for a user is left to the
//! caller; `Display` gives the plain one-line form.

use alder_core::text::{LineMap, TextSpan};
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 201, 501).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The source text span where this diagnostic occurred, if any.
    pub span: Option<TextSpan>,
    /// The formatted message.
    pub message_text: String,
    /// The diagnostic code.
    pub code: u32,
    /// The category.
    pub category: DiagnosticCategory,
    /// Related diagnostics (e.g. the first declaration of a redeclared name).
    pub related_information: Vec<Diagnostic>,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
            related_information: Vec::new(),
        }
    }

    /// Create a new diagnostic pointing at a span.
    pub fn with_span(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: Some(span),
            ..Self::new(message, args)
        }
    }

    /// Create a diagnostic at an optional location.
    pub fn at(span: Option<TextSpan>, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span,
            ..Self::new(message, args)
        }
    }

    /// Add related diagnostic information.
    pub fn with_related(mut self, related: Diagnostic) -> Self {
        self.related_information.push(related);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    pub fn is_warning(&self) -> bool {
        self.category == DiagnosticCategory::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = self.span {
            write!(f, "({}): ", span.start)?;
        }
        write!(f, "{} A{:04}: {}", self.category, self.code, self.message_text)
    }
}

impl Diagnostic {
    /// Render with a line and column instead of a byte offset.
    pub fn render(&self, lines: &LineMap) -> String {
        let head = format!("{} A{:04}: {}", self.category, self.code, self.message_text);
        match self.span {
            Some(span) => format!("({}): {}", lines.line_and_column_of(span.start), head),
            None => head,
        }
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated during one compilation.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Diagnostics carrying the given code, in report order.
    pub fn with_code(&self, code: u32) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort diagnostics by position; unlocated diagnostics sort first.
    /// The sort is stable, so same-position diagnostics keep report order.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by_key(|d| d.span.map(|s| s.start).unwrap_or(0));
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
        ($code:expr, Message, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Message, message: $msg }
        };
    }

    // ========================================================================
    // Scope and name resolution (200-299)
    // ========================================================================
    pub const IDENTIFIER_0_IS_ALREADY_DECLARED_IN_THIS_SCOPE: DiagnosticMessage = diag!(201, Error, "Identifier '{0}' is already declared in this scope.");
    pub const CANNOT_FIND_NAME_0: DiagnosticMessage = diag!(202, Error, "Cannot find name '{0}'.");
    pub const _0_WAS_FIRST_DECLARED_HERE: DiagnosticMessage = diag!(203, Message, "'{0}' was first declared here.");
    pub const DECLARATION_OF_0_SHADOWS_AN_OUTER_DECLARATION: DiagnosticMessage = diag!(204, Warning, "Declaration of '{0}' shadows a declaration in an enclosing scope.");

    // ========================================================================
    // Usage analysis (300-399)
    // ========================================================================
    pub const _0_IS_DECLARED_BUT_NEVER_USED: DiagnosticMessage = diag!(301, Warning, "'{0}' is declared but its value is never read.");
    pub const _0_IS_DECLARED_BUT_NEVER_INITIALIZED: DiagnosticMessage = diag!(302, Warning, "'{0}' is declared but never assigned a value.");
    pub const _0_IS_USED_BEFORE_BEING_ASSIGNED: DiagnosticMessage = diag!(303, Warning, "'{0}' is used before being assigned.");

    // ========================================================================
    // Code generation (500-599)
    // ========================================================================
    pub const OUT_OF_MEMORY_0: DiagnosticMessage = diag!(501, Error, "Program does not fit in the target memory image: {0}");
    pub const CODE_GENERATION_FAILED_0: DiagnosticMessage = diag!(502, Error, "Code generation failed: {0}");
    pub const PROGRAM_IMAGE_USES_0_OF_1_BYTES: DiagnosticMessage = diag!(503, Message, "Program image uses {0} of {1} bytes.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(format_message("'{0}' vs '{1}'", &["a", "b"]), "'a' vs 'b'");
        assert_eq!(format_message("no args", &[]), "no args");
    }

    #[test]
    fn test_display_with_span() {
        let diag = Diagnostic::with_span(
            TextSpan::new(12, 1),
            &messages::CANNOT_FIND_NAME_0,
            &["b"],
        );
        assert_eq!(diag.to_string(), "(12): error A0202: Cannot find name 'b'.");
    }

    #[test]
    fn test_render_with_line_map() {
        let lines = LineMap::new("{\n  int a\n  b = 1\n}$");
        let diag = Diagnostic::with_span(
            TextSpan::new(12, 1),
            &messages::CANNOT_FIND_NAME_0,
            &["b"],
        );
        assert_eq!(diag.render(&lines), "(3:3): error A0202: Cannot find name 'b'.");
        let summary = Diagnostic::new(&messages::PROGRAM_IMAGE_USES_0_OF_1_BYTES, &["9", "256"]);
        assert_eq!(summary.render(&lines), "message A0503: Program image uses 9 of 256 bytes.");
    }

    #[test]
    fn test_collection_counts_and_sort() {
        let mut diags = DiagnosticCollection::new();
        diags.add(Diagnostic::with_span(
            TextSpan::new(30, 1),
            &messages::_0_IS_DECLARED_BUT_NEVER_USED,
            &["x"],
        ));
        diags.add(Diagnostic::with_span(
            TextSpan::new(4, 1),
            &messages::IDENTIFIER_0_IS_ALREADY_DECLARED_IN_THIS_SCOPE,
            &["x"],
        ));
        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.warning_count(), 1);

        diags.sort();
        assert_eq!(diags.diagnostics()[0].code, 201);
        assert_eq!(diags.with_code(301).count(), 1);
    }
}
