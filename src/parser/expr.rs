//! Expression grammar: precedence-climbing binary levels, right-associative
//! unary prefix and exponentiation, a left-associative postfix chain, and
//! primaries. Also the light on-demand type lattice and the
//! identifier-use checks expressions need.

use indexmap::IndexMap;

use crate::ast::{
    BinaryExpr, BinaryOp, CallExpr, Expr, FieldExpr, IdentifierExpr, IndexExpr, LiteralExpr,
    ListLitExpr, StringLitExpr, StringPart, UnaryExpr,
};
use crate::base::Position;
use crate::diagnostics::Category;
use crate::semantic::TypeTag;
use crate::token::{Token, TokenKind};

use super::Parser;

impl<'t> Parser<'t> {
    pub(super) fn parse_expr(&mut self) -> Expr {
        self.parse_logic_or()
    }

    fn parse_logic_or(&mut self) -> Expr {
        let mut left = self.parse_logic_and();
        while self.check(TokenKind::OpOr) {
            let operator = self.advance();
            let right = self.parse_logic_and();
            left = Expr::Binary(BinaryExpr {
                op: BinaryOp::LogicOr,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }
        left
    }

    fn parse_logic_and(&mut self) -> Expr {
        let mut left = self.parse_equality();
        while self.check(TokenKind::OpAnd) {
            let operator = self.advance();
            let right = self.parse_equality();
            left = Expr::Binary(BinaryExpr {
                op: BinaryOp::LogicAnd,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }
        left
    }

    fn parse_equality(&mut self) -> Expr {
        let mut left = self.parse_relational();
        while matches!(self.peek().kind, TokenKind::OpEq | TokenKind::OpNeq) {
            let operator = self.advance();
            let right = self.parse_relational();
            left = Expr::Binary(BinaryExpr {
                op: BinaryOp::Equality,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }
        left
    }

    fn parse_relational(&mut self) -> Expr {
        let mut left = self.parse_additive();
        while matches!(
            self.peek().kind,
            TokenKind::OpLt | TokenKind::OpGt | TokenKind::OpLte | TokenKind::OpGte
        ) {
            let operator = self.advance();
            let right = self.parse_additive();
            left = Expr::Binary(BinaryExpr {
                op: BinaryOp::Relational,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }
        left
    }

    fn parse_additive(&mut self) -> Expr {
        let mut left = self.parse_multiplicative();
        while matches!(self.peek().kind, TokenKind::OpAdd | TokenKind::OpSub) {
            let operator = self.advance();
            let right = self.parse_multiplicative();
            left = Expr::Binary(BinaryExpr {
                op: BinaryOp::Additive,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut left = self.parse_exponential();
        while matches!(
            self.peek().kind,
            TokenKind::OpMul | TokenKind::OpDiv | TokenKind::OpIntDiv | TokenKind::OpMod
        ) {
            let operator = self.advance();
            let right = self.parse_exponential();
            left = Expr::Binary(BinaryExpr {
                op: BinaryOp::Multiplicative,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }
        left
    }

    /// Right-associative: `2 ^ 3 ^ 2` parses as `2 ^ (3 ^ 2)`.
    fn parse_exponential(&mut self) -> Expr {
        let left = self.parse_unary();
        if self.check(TokenKind::OpExp) {
            let operator = self.advance();
            let right = self.parse_exponential();
            return Expr::Binary(BinaryExpr {
                op: BinaryOp::Exponential,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }
        left
    }

    /// Right-associative prefix chain (`!`, `+`, `-`, `++`, `--`). The
    /// recursion choke point for the depth guard on the expression side:
    /// every nested-paren level routes back through here exactly once via
    /// the full precedence chain, as does every additional prefix operator
    /// in a chain like `--!x`. (`parse_stmt_list` in `stmt.rs` is the
    /// matching choke point for statement nesting — both share the same
    /// `self.depth` counter and `max_depth` limit.)
    fn parse_unary(&mut self) -> Expr {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            self.record_depth_exceeded();
            self.depth -= 1;
            return Expr::NullLit { token: None };
        }
        let result = if matches!(
            self.peek().kind,
            TokenKind::OpNot | TokenKind::OpAdd | TokenKind::OpSub | TokenKind::OpInc | TokenKind::OpDec
        ) {
            let operator = self.advance();
            let operand = self.parse_unary();
            Expr::Unary(UnaryExpr {
                operator,
                operand: Box::new(operand),
            })
        } else {
            self.parse_postfix()
        };
        self.depth -= 1;
        result
    }

    /// Left-associative chain of indexing, field access, and calls.
    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            match self.peek().kind {
                TokenKind::DelLbrack => {
                    let tok = self.advance();
                    let index = self.parse_expr();
                    self.expect(TokenKind::DelRbrack, "]");
                    expr = Expr::Index(IndexExpr {
                        object: Box::new(expr),
                        index: Box::new(index),
                        token: Some(tok),
                    });
                }
                TokenKind::DelPeriod => {
                    let tok = self.advance();
                    let field_tok = self.expect_identifier("a field name");
                    expr = Expr::Field(FieldExpr {
                        object: Box::new(expr),
                        field: field_tok.lexeme,
                        token: Some(tok),
                    });
                }
                TokenKind::DelLparen => {
                    let tok = self.peek().clone();
                    expr = Expr::Call(self.parse_call_tail(expr, tok));
                }
                _ => break,
            }
        }
        expr
    }

    /// Parses a call's `(arg, arg, ...)` tail; assumes the current token is
    /// the opening `(`. Shared by postfix calls and statement-position
    /// calls, which collapse to the same shape (see `DESIGN.md`).
    pub(super) fn parse_call_tail(&mut self, callee: Expr, token: Token) -> CallExpr {
        self.expect(TokenKind::DelLparen, "(");
        let mut arguments = Vec::new();
        if !self.check(TokenKind::DelRparen) {
            arguments.push(self.parse_expr());
            while self.check(TokenKind::DelComma) {
                self.advance();
                arguments.push(self.parse_expr());
            }
        }
        self.expect(TokenKind::DelRparen, ")");
        CallExpr {
            callee: Box::new(callee),
            arguments,
            token: Some(token),
        }
    }

    fn parse_list_literal(&mut self) -> Expr {
        let tok = self.advance();
        let mut elements = Vec::new();
        if !self.check(TokenKind::DelRbrack) {
            elements.push(self.parse_expr());
            while self.check(TokenKind::DelComma) {
                self.advance();
                elements.push(self.parse_expr());
            }
        }
        self.expect(TokenKind::DelRbrack, "]");
        Expr::ListLit(ListLitExpr {
            elements,
            token: Some(tok),
        })
    }

    pub(super) fn parse_primary(&mut self) -> Expr {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::NumLiteral => {
                self.advance();
                Expr::NumberLit(LiteralExpr {
                    value: tok.lexeme,
                    token: Some(tok.clone()),
                })
            }
            TokenKind::DecLiteral => {
                self.advance();
                Expr::DecimalLit(LiteralExpr {
                    value: tok.lexeme,
                    token: Some(tok.clone()),
                })
            }
            TokenKind::RwTrue => {
                self.advance();
                Expr::BoolLit {
                    value: true,
                    token: Some(tok),
                }
            }
            TokenKind::RwFalse => {
                self.advance();
                Expr::BoolLit {
                    value: false,
                    token: Some(tok),
                }
            }
            TokenKind::RwNull => {
                self.advance();
                Expr::NullLit { token: Some(tok) }
            }
            TokenKind::StrLiteral | TokenKind::SisMarker => self.parse_composite_string(),
            TokenKind::Id => {
                self.advance();
                // Call position gets a limited forward-reference allowance:
                // skip the declared/initialized check when this identifier
                // is immediately applied as a call.
                if !self.check(TokenKind::DelLparen) {
                    self.check_identifier_use(&tok.lexeme, tok.position());
                }
                Expr::Identifier(IdentifierExpr {
                    name: tok.lexeme,
                    token: Some(tok.clone()),
                })
            }
            TokenKind::DelLparen => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(TokenKind::DelRparen, ")");
                inner
            }
            TokenKind::DelLbrack => self.parse_list_literal(),
            TokenKind::Unknown => {
                self.panic_error(
                    Category::Syntax,
                    format!("unrecognized token '{}' where an expression was expected", tok.lexeme),
                    tok.position(),
                    IndexMap::new(),
                );
                Expr::NullLit { token: None }
            }
            _ => {
                self.panic_error(
                    Category::Grammar,
                    format!("expected an expression, found '{}'", tok.lexeme),
                    tok.position(),
                    IndexMap::new(),
                );
                Expr::NullLit { token: None }
            }
        }
    }

    /// Greedily absorbs contiguous `StrLiteral`/`SisMarker` tokens into one
    /// `STRING_LIT` node. Every marker participates in the ordinary
    /// identifier-use check.
    fn parse_composite_string(&mut self) -> Expr {
        let anchor = self.peek().clone();
        let mut content = Vec::new();
        while matches!(self.peek().kind, TokenKind::StrLiteral | TokenKind::SisMarker) {
            let tok = self.advance();
            match tok.kind {
                TokenKind::StrLiteral => {
                    content.push(StringPart::Content(strip_quotes(&tok.lexeme)));
                }
                TokenKind::SisMarker => {
                    let name = tok.lexeme.trim_start_matches('@').to_string();
                    self.check_identifier_use(&name, tok.position());
                    content.push(StringPart::Insertion(IdentifierExpr {
                        name,
                        token: Some(tok),
                    }));
                }
                _ => unreachable!("loop condition restricts tok.kind"),
            }
        }
        Expr::StringLit(StringLitExpr {
            content,
            token: Some(anchor),
        })
    }

    /// Whether the current token can legally begin an expression; used to
    /// decide whether a bare `return` carries a value.
    pub(super) fn starts_expr(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::NumLiteral
                | TokenKind::DecLiteral
                | TokenKind::StrLiteral
                | TokenKind::SisMarker
                | TokenKind::Id
                | TokenKind::RwTrue
                | TokenKind::RwFalse
                | TokenKind::RwNull
                | TokenKind::DelLparen
                | TokenKind::DelLbrack
                | TokenKind::OpNot
                | TokenKind::OpAdd
                | TokenKind::OpSub
                | TokenKind::OpInc
                | TokenKind::OpDec
        )
    }

    /// Records a `REFERENCE` diagnostic if `name` is undeclared or declared
    /// but not yet initialized; a no-op otherwise. Suppressed while
    /// panicking, like every soft diagnostic.
    pub(super) fn check_identifier_use(&mut self, name: &str, pos: Position) {
        if !self.symbols.is_declared(name) {
            self.soft_error(
                Category::Reference,
                format!("variable '{name}' is used but not declared"),
                pos,
                IndexMap::new(),
            );
        } else if !self.symbols.is_initialized(name) {
            self.soft_error(
                Category::Reference,
                format!("variable '{name}' is used but has not been initialized"),
                pos,
                IndexMap::new(),
            );
        }
    }

    /// Coarse, on-demand inferred type of `expr`. Not stored on the node;
    /// computed only at the two sites that need it (declaration-initializer
    /// and function-return type checks).
    pub(super) fn infer_expr_type(&self, expr: &Expr) -> TypeTag {
        match expr {
            Expr::Binary(b) => match b.op {
                BinaryOp::LogicOr | BinaryOp::LogicAnd | BinaryOp::Equality | BinaryOp::Relational => {
                    TypeTag::Boolean
                }
                BinaryOp::Additive => {
                    TypeTag::additive_result(self.infer_expr_type(&b.left), self.infer_expr_type(&b.right))
                }
                BinaryOp::Multiplicative => {
                    if b.operator.kind == TokenKind::OpDiv {
                        TypeTag::Decimal
                    } else {
                        TypeTag::arithmetic_result(
                            self.infer_expr_type(&b.left),
                            self.infer_expr_type(&b.right),
                        )
                    }
                }
                BinaryOp::Exponential => {
                    TypeTag::arithmetic_result(self.infer_expr_type(&b.left), self.infer_expr_type(&b.right))
                }
            },
            Expr::Unary(u) => {
                if u.operator.kind == TokenKind::OpNot {
                    TypeTag::Boolean
                } else {
                    self.infer_expr_type(&u.operand)
                }
            }
            Expr::Index(_) | Expr::Field(_) | Expr::Call(_) => TypeTag::Unknown,
            Expr::NumberLit(_) => TypeTag::Number,
            Expr::DecimalLit(_) => TypeTag::Decimal,
            Expr::BoolLit { .. } => TypeTag::Boolean,
            Expr::NullLit { .. } => TypeTag::Null,
            Expr::StringLit(_) => TypeTag::String,
            Expr::ListLit(_) => TypeTag::List,
            Expr::Identifier(id) => self
                .symbols
                .get(&id.name)
                .map(|entry| entry.declared_type)
                .unwrap_or(TypeTag::Unknown),
        }
    }
}

/// Strips one leading and one trailing `"` from a scanner `STR_LITERAL`
/// lexeme; the scanner always wraps literal runs in quotes, even empty
/// ones.
fn strip_quotes(lexeme: &str) -> String {
    lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme)
        .to_string()
}
