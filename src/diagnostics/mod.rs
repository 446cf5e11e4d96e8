//! Diagnostic Reporter: categorized, positioned, deduplicated diagnostics.
//!
//! Duplicate suppression matters because panic-mode recovery and redundant
//! structural/grammatical/semantic passes would otherwise report the same
//! problem more than once for a single mistake.

use indexmap::IndexMap;

/// The exhaustive diagnostic category taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Program boundaries: missing `start`/`end`, stray tokens after `end`,
    /// unclosed blocks reaching EOF.
    Structural,
    /// A production expected a token that was not present, or a block
    /// terminator named the wrong kind.
    Grammar,
    /// Malformed tokens or operator misuse.
    Syntax,
    /// `return` outside function, `break`/`continue` outside loop, missing
    /// return value, identifier too long.
    Semantic,
    /// Use of an undeclared or uninitialized variable.
    Reference,
    /// Declared type vs. inferred type disagreement.
    Type,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Structural => "STRUCTURAL",
            Category::Grammar => "GRAMMAR",
            Category::Syntax => "SYNTAX",
            Category::Semantic => "SEMANTIC",
            Category::Reference => "REFERENCE",
            Category::Type => "TYPE",
        };
        f.write_str(s)
    }
}

/// Diagnostic severity. Errors fail the analysis (`ast = null`); warnings
/// never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Ordered before `Warning` so that sorting by `(line, column,
    /// severity)` naturally places errors first on a tie, per §4.2.
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// A single reported problem, anchored to a 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub category: Category,
    pub severity: Severity,
    /// Free-form extra detail (`expected`, `found`, `grammar`,
    /// `suggestion`, ...). Insertion-ordered so display is stable.
    pub context: IndexMap<String, String>,
}

impl Diagnostic {
    fn key(&self) -> (usize, usize, &str) {
        (self.line, self.column, self.message.as_str())
    }
}

/// Accumulates diagnostics for one `analyze` call, deduplicating and
/// sorting them on demand. Constructed fresh per call; holds no
/// process-wide state.
#[derive(Debug, Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        let is_duplicate = self
            .diagnostics
            .iter()
            .any(|existing| existing.key() == diagnostic.key());
        if is_duplicate {
            tracing::trace!(
                line = diagnostic.line,
                column = diagnostic.column,
                "dropped duplicate diagnostic"
            );
            return;
        }
        tracing::debug!(
            line = diagnostic.line,
            column = diagnostic.column,
            category = %diagnostic.category,
            severity = %diagnostic.severity,
            message = %diagnostic.message,
            "diagnostic recorded"
        );
        self.diagnostics.push(diagnostic);
    }

    /// Records an error-severity diagnostic. A duplicate `(line, column,
    /// message)` triple is silently dropped.
    pub fn push_error(
        &mut self,
        category: Category,
        message: impl Into<String>,
        line: usize,
        column: usize,
        context: IndexMap<String, String>,
    ) {
        self.push(Diagnostic {
            line,
            column,
            message: message.into(),
            category,
            severity: Severity::Error,
            context,
        });
    }

    /// Records a warning-severity diagnostic. Same dedup rule as
    /// `push_error`.
    pub fn push_warning(
        &mut self,
        category: Category,
        message: impl Into<String>,
        line: usize,
        column: usize,
        context: IndexMap<String, String>,
    ) {
        self.push(Diagnostic {
            line,
            column,
            message: message.into(),
            category,
            severity: Severity::Warning,
            context,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Orders diagnostics by `(line, column)` ascending, errors before
    /// warnings on a tie. Stable so ties beyond that key keep detection
    /// order.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| (a.line, a.column, a.severity).cmp(&(b.line, b.column, b.severity)));
    }

    /// Splits the accumulated diagnostics into (errors, warnings), sorted.
    pub fn into_errors_and_warnings(mut self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        self.sort();
        self.diagnostics
            .into_iter()
            .partition(|d| d.severity == Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> IndexMap<String, String> {
        IndexMap::new()
    }

    #[test]
    fn duplicate_line_column_message_is_dropped() {
        let mut reporter = DiagnosticReporter::new();
        reporter.push_error(Category::Reference, "dup", 3, 4, ctx());
        reporter.push_error(Category::Reference, "dup", 3, 4, ctx());
        let (errors, _) = reporter.into_errors_and_warnings();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn different_message_same_position_is_kept() {
        let mut reporter = DiagnosticReporter::new();
        reporter.push_error(Category::Reference, "a", 3, 4, ctx());
        reporter.push_error(Category::Reference, "b", 3, 4, ctx());
        let (errors, _) = reporter.into_errors_and_warnings();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn sort_orders_by_line_then_column_then_errors_before_warnings() {
        let mut reporter = DiagnosticReporter::new();
        reporter.push_warning(Category::Syntax, "w1", 2, 1, ctx());
        reporter.push_error(Category::Syntax, "e1", 2, 1, ctx());
        reporter.push_error(Category::Syntax, "e0", 1, 5, ctx());
        let (errors, warnings) = reporter.into_errors_and_warnings();
        assert_eq!(errors[0].message, "e0");
        assert_eq!(errors[1].message, "e1");
        assert_eq!(warnings[0].message, "w1");
    }

    #[test]
    fn has_errors_is_false_for_warnings_only() {
        let mut reporter = DiagnosticReporter::new();
        reporter.push_warning(Category::Semantic, "w", 1, 1, ctx());
        assert!(!reporter.has_errors());
    }
}
