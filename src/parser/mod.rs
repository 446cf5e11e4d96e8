//! Parser + Semantic Checks: recursive-descent parser over a filtered
//! token stream (comments dropped), producing an AST alongside
//! diagnostics. Owns panic-mode recovery, the block-frame stack used to
//! match compound terminators (`end if` / `end for` / ...), the flat
//! symbol table, and the light type lattice.
//!
//! All mutable state (`pos`, `panic`, `loop_depth`, `function_depth`, the
//! block stack, the symbol table) lives on one `Parser` constructed fresh
//! per call to [`parse`] — no statics, no interior mutability.

mod expr;
mod stmt;

use indexmap::IndexMap;

use crate::ast::Program;
use crate::base::Position;
use crate::config::ParserConfig;
use crate::diagnostics::{Category, DiagnosticReporter};
use crate::error::InternalError;
use crate::semantic::SymbolTable;
use crate::token::{Token, TokenKind};

/// The kind of compound block a `BlockFrame` was opened for, used to
/// validate `end <kind>` terminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    If,
    For,
    While,
    Do,
    Switch,
    Function,
}

impl BlockKind {
    fn keyword(self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::For => "for",
            BlockKind::While => "while",
            BlockKind::Do => "do",
            BlockKind::Switch => "switch",
            BlockKind::Function => "function",
        }
    }
}

fn block_kind_from_keyword(kind: TokenKind) -> Option<BlockKind> {
    Some(match kind {
        TokenKind::KwIf => BlockKind::If,
        TokenKind::KwFor => BlockKind::For,
        TokenKind::KwWhile => BlockKind::While,
        TokenKind::KwDo => BlockKind::Do,
        TokenKind::KwSwitch => BlockKind::Switch,
        TokenKind::KwFunction => BlockKind::Function,
        _ => return None,
    })
}

/// A record on the parser's block stack: an open block's kind and the
/// position of its opener keyword, so its `end <kind>` can be matched and
/// "not closed" diagnostics can point back at the opener.
#[derive(Debug, Clone, Copy)]
struct BlockFrame {
    kind: BlockKind,
    open_line: usize,
    open_column: usize,
}

/// Parser state for one `analyze` call. Holds no references to anything
/// outside the token slice it was built from.
pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    eof_token: Token,
    /// Set on a syntax/grammar/structural error; suppresses non-structural
    /// (reference/type/semantic) diagnostics until `synchronize` clears it.
    panic: bool,
    /// Set once, on the first internal-invariant violation; guards against
    /// emitting the fixed internal-error diagnostic more than once.
    fatal: bool,
    loop_depth: usize,
    function_depth: usize,
    /// Recursion-depth guard (expression and statement descent), see
    /// `config::ParserConfig::max_depth`.
    depth: usize,
    block_stack: Vec<BlockFrame>,
    symbols: SymbolTable,
    diagnostics: DiagnosticReporter,
    config: ParserConfig,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token], config: ParserConfig) -> Self {
        let eof_pos = tokens
            .last()
            .map(|t| Position::new(t.line, t.column + t.lexeme.chars().count().max(1)))
            .unwrap_or_else(Position::start);
        Self {
            tokens,
            pos: 0,
            eof_token: Token::new(TokenKind::Eof, "", eof_pos.line, eof_pos.column),
            panic: false,
            fatal: false,
            loop_depth: 0,
            function_depth: 0,
            depth: 0,
            block_stack: Vec::new(),
            symbols: SymbolTable::new(),
            diagnostics: DiagnosticReporter::new(),
            config,
        }
    }

    // -- token navigation -----------------------------------------------

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    fn peek_at(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof_token)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the current token if it matches `kind`; otherwise records a
    /// `GRAMMAR` error naming what was expected and what was found, enters
    /// panic mode, and returns a synthetic placeholder of `kind` so callers
    /// never have to branch on failure to keep building a partial node.
    fn expect(&mut self, kind: TokenKind, label: &str) -> Token {
        if self.check(kind) {
            self.advance()
        } else {
            let tok = self.peek().clone();
            self.panic_error(
                Category::Grammar,
                format!("expected '{label}', found '{}'", tok.lexeme),
                tok.position(),
                IndexMap::new(),
            );
            Token::new(kind, "", tok.line, tok.column)
        }
    }

    /// Consumes and returns an identifier token. If the current token is a
    /// reserved word instead, names it explicitly in the diagnostic rather
    /// than reporting a generic "expected identifier". Also enforces the
    /// configured identifier length bound. On failure, returns a
    /// synthetic `Id` placeholder so callers can keep building a node.
    fn expect_identifier(&mut self, context_label: &str) -> Token {
        if self.check(TokenKind::Id) {
            let tok = self.advance();
            if tok.lexeme.chars().count() > self.config.max_identifier_len {
                self.soft_error(
                    Category::Semantic,
                    format!(
                        "identifier '{}' exceeds the maximum length of {} characters",
                        tok.lexeme, self.config.max_identifier_len
                    ),
                    tok.position(),
                    IndexMap::new(),
                );
            }
            tok
        } else {
            let tok = self.peek().clone();
            if let Some(word) = crate::token::keyword_text(tok.kind) {
                self.panic_error(
                    Category::Grammar,
                    format!("'{word}' is a reserved word and cannot be used as {context_label}"),
                    tok.position(),
                    IndexMap::new(),
                );
            } else {
                self.panic_error(
                    Category::Grammar,
                    format!("expected {context_label}, found '{}'", tok.lexeme),
                    tok.position(),
                    IndexMap::new(),
                );
            }
            Token::new(TokenKind::Id, "<error>", tok.line, tok.column)
        }
    }

    fn expect_assignment_op(&mut self) -> Token {
        if crate::token::is_assignment_op(self.peek().kind) {
            self.advance()
        } else {
            let tok = self.peek().clone();
            self.panic_error(
                Category::Grammar,
                format!("expected an assignment operator, found '{}'", tok.lexeme),
                tok.position(),
                IndexMap::new(),
            );
            tok
        }
    }

    // -- diagnostics -------------------------------------------------

    /// Records a "hard" parse error (the grammar could not continue as
    /// written) and enters panic mode: the first such error at this
    /// position is recorded, subsequent ones while still panicked are
    /// suppressed, and the parser immediately synchronizes to the next
    /// recovery anchor.
    fn panic_error(
        &mut self,
        category: Category,
        message: impl Into<String>,
        pos: Position,
        context: IndexMap<String, String>,
    ) {
        if !self.panic {
            self.diagnostics.push_error(category, message, pos.line, pos.column, context);
        }
        self.panic = true;
        self.synchronize();
    }

    /// Records an informational ("soft") error — a reference or type
    /// mismatch that doesn't represent broken grammar — suppressed while
    /// panicked, same as a hard parse error.
    fn soft_error(
        &mut self,
        category: Category,
        message: impl Into<String>,
        pos: Position,
        context: IndexMap<String, String>,
    ) {
        if self.panic {
            return;
        }
        self.diagnostics.push_error(category, message, pos.line, pos.column, context);
    }

    fn soft_warning(
        &mut self,
        category: Category,
        message: impl Into<String>,
        pos: Position,
        context: IndexMap<String, String>,
    ) {
        if self.panic {
            return;
        }
        self.diagnostics.push_warning(category, message, pos.line, pos.column, context);
    }

    fn record_depth_exceeded(&mut self) {
        let limit = self.config.max_depth;
        self.record_internal_error(InternalError::DepthExceeded { limit });
    }

    fn record_internal_error(&mut self, err: InternalError) {
        tracing::trace!(error = %err, "internal invariant violated");
        if self.fatal {
            return;
        }
        self.fatal = true;
        let pos = self.peek().position();
        self.diagnostics.push_error(
            Category::Grammar,
            InternalError::FIXED_MESSAGE,
            pos.line,
            pos.column,
            IndexMap::new(),
        );
    }

    /// Discards tokens until the current one is a synchronization anchor:
    /// `end`, a statement-starter keyword, or a data-type keyword. Always
    /// clears `panic` on return.
    fn synchronize(&mut self) {
        tracing::trace!(pos = self.pos, "entering panic-mode synchronization");
        while !self.at_eof() {
            let k = self.peek().kind;
            if k == TokenKind::KwEnd
                || crate::token::is_data_type(k)
                || matches!(
                    k,
                    TokenKind::KwIf
                        | TokenKind::KwFor
                        | TokenKind::KwWhile
                        | TokenKind::KwDo
                        | TokenKind::KwEcho
                        | TokenKind::KwSwitch
                        | TokenKind::KwFunction
                        | TokenKind::RwReturn
                )
            {
                break;
            }
            self.advance();
        }
        self.panic = false;
        tracing::trace!(pos = self.pos, "synchronization complete");
    }

    // -- block frames -----------------------------------------------

    fn push_block_frame(&mut self, kind: BlockKind, open: Position) {
        self.block_stack.push(BlockFrame {
            kind,
            open_line: open.line,
            open_column: open.column,
        });
    }

    fn pop_block_frame(&mut self) {
        if self.block_stack.pop().is_none() {
            self.record_internal_error(InternalError::BlockStackUnderflow);
        }
    }

    /// Matches a compound terminator `end <kind>` against the block opened
    /// at `open`. Three outcomes:
    /// - `end <kind>` found: consumed, block frame popped, success.
    /// - `end <other-kind>` found: both tokens consumed, a `GRAMMAR`
    ///   mismatch diagnostic is recorded naming both kinds.
    /// - anything else (including EOF): nothing is consumed, a
    ///   `STRUCTURAL` "not closed" diagnostic is recorded anchored at the
    ///   opener, and the leftover `end` is left for whichever enclosing
    ///   production actually owns it.
    fn expect_block_close(&mut self, expected: BlockKind, open: Position) {
        if self.check(TokenKind::KwEnd) {
            if let Some(found) = block_kind_from_keyword(self.peek_at(1).kind) {
                if found == expected {
                    self.advance();
                    self.advance();
                    self.pop_block_frame();
                    return;
                }
                let end_tok = self.peek().clone();
                self.advance();
                self.advance();
                self.panic_error(
                    Category::Grammar,
                    format!(
                        "block closed with 'end {}' but the enclosing '{}' block opened at line {} expects 'end {}'",
                        found.keyword(),
                        expected.keyword(),
                        open.line,
                        expected.keyword()
                    ),
                    end_tok.position(),
                    IndexMap::new(),
                );
                self.pop_block_frame();
                return;
            }
        }
        self.panic_error(
            Category::Structural,
            format!(
                "'{}' block opened at line {} was not closed with 'end {}'",
                expected.keyword(),
                open.line,
                expected.keyword()
            ),
            open,
            IndexMap::new(),
        );
        self.pop_block_frame();
    }

    // -- program entry ------------------------------------------------

    fn parse_program(&mut self) -> Option<Program> {
        let start_pos = self.peek().position();
        if self.check(TokenKind::KwStart) {
            self.advance();
        } else {
            self.panic_error(
                Category::Structural,
                "a program must begin with 'start'",
                start_pos,
                IndexMap::new(),
            );
        }
        let statements = self.parse_stmt_list(&[]);
        if self.check(TokenKind::KwEnd) {
            self.advance();
        } else {
            self.panic_error(
                Category::Structural,
                format!("program starting at line {} was not closed with 'end'", start_pos.line),
                start_pos,
                IndexMap::new(),
            );
        }
        if !self.at_eof() {
            let tok = self.peek().clone();
            self.panic_error(
                Category::Structural,
                format!("unexpected '{}' after the program's closing 'end'", tok.lexeme),
                tok.position(),
                IndexMap::new(),
            );
        }
        if self.diagnostics.has_errors() {
            None
        } else {
            Some(Program { statements })
        }
    }
}

/// Parses a full token stream (comments filtered out first) into an AST
/// plus accumulated diagnostics. The `DiagnosticReporter` returned has not
/// been sorted/partitioned yet; callers do that at the public API
/// boundary.
pub(crate) fn parse(tokens: &[Token], config: ParserConfig) -> (Option<Program>, DiagnosticReporter) {
    tracing::debug!(token_count = tokens.len(), "parse: starting");
    let filtered: Vec<Token> = tokens
        .iter()
        .filter(|t| !matches!(t.kind, TokenKind::CommentSingle | TokenKind::CommentMulti))
        .cloned()
        .collect();
    let mut parser = Parser::new(&filtered, config);
    let program = parser.parse_program();
    tracing::debug!(success = program.is_some(), "parse: finished");
    (program, parser.diagnostics)
}
