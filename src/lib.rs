//! ECHO front-end core: lexical scanner and recursive-descent parser with
//! light semantic checks, producing a typed AST and categorized
//! diagnostics for an imperative teaching language.
//!
//! The crate exposes two pure entry points, `tokenize` and `analyze`
//! (`analyze_with_config` for callers that want non-default tunables).
//! Neither holds process-wide state; both are safe to call concurrently
//! from separate tasks with no coordination.

pub mod ast;
pub mod base;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lexer;
mod parser;
pub mod semantic;
pub mod token;

pub use ast::Program;
pub use config::{ParserConfig, ScannerConfig};
pub use diagnostics::{Category, Diagnostic, Severity};
pub use lexer::{tokenize, tokenize_with_config};
pub use token::{Token, TokenKind};

/// The result of one `analyze` call: either a well-formed AST with no
/// errors, or `ast = None` alongside at least one error. `success` always
/// agrees with whether `errors` is empty and `ast` is `Some`.
#[derive(Debug)]
pub struct AnalysisResult {
    pub ast: Option<Program>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub success: bool,
    /// Whether the root is a well-formed `Program` node; always equal to
    /// `ast.is_some()` but kept as its own field to match the public
    /// contract's explicit `astValid` member.
    pub ast_valid: bool,
}

/// Parses a filtered token stream into an AST plus diagnostics, using
/// default tunables (`ParserConfig::default()`).
pub fn analyze(tokens: &[Token]) -> AnalysisResult {
    analyze_with_config(tokens, ParserConfig::default())
}

/// Same as [`analyze`] but with caller-supplied parser tunables (maximum
/// identifier length, recursion depth guard).
pub fn analyze_with_config(tokens: &[Token], config: ParserConfig) -> AnalysisResult {
    tracing::debug!(token_count = tokens.len(), "analyze: starting");
    let (ast, reporter) = parser::parse(tokens, config);
    let (errors, warnings) = reporter.into_errors_and_warnings();
    let success = errors.is_empty();
    // parser::parse already returns `None` whenever diagnostics recorded
    // any error, so this is never true in practice; kept as a defensive
    // re-assertion of the public contract rather than trusted blindly.
    let ast = if success { ast } else { None };
    let ast_valid = ast.is_some();
    tracing::debug!(success, error_count = errors.len(), "analyze: finished");
    AnalysisResult {
        ast,
        errors,
        warnings,
        success,
        ast_valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_program_succeeds() {
        let tokens = tokenize("start\necho \"Hello\"\nend\n");
        let result = analyze(&tokens);
        assert!(result.success);
        assert!(result.ast.is_some());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn missing_end_fails_with_structural_error() {
        let tokens = tokenize("start\nif 1 > 0\necho \"a\"\nend\n");
        let result = analyze(&tokens);
        assert!(!result.success);
        assert!(result.ast.is_none());
        assert!(result.errors.iter().any(|e| e.category == Category::Structural));
    }

    #[test]
    fn success_errors_ast_are_mutually_consistent() {
        let tokens = tokenize("start\nnumber x = 1;\nend\n");
        let result = analyze(&tokens);
        assert_eq!(result.success, result.errors.is_empty());
        assert_eq!(result.success, result.ast.is_some());
        assert_eq!(result.ast_valid, result.ast.is_some());
    }
}
