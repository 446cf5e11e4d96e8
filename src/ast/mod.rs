//! AST Model: one tagged-variant node per grammar non-terminal, each with
//! exactly the fields its production needs (no generic `children` array).
//! Every node carries an optional `token` anchor used for diagnostics and
//! position display by collaborators.
//!
//! This departs deliberately from a lossless-CST/children-array shape:
//! traversal is driven by pattern matching on the tag, and there is no
//! incremental-editing or LSP-range requirement here that would justify
//! keeping a generic tree.

use crate::semantic::TypeTag;
use crate::token::Token;

/// The root of every successfully parsed program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Decl(DeclStmt),
    Assign(AssignStmt),
    Input(InputStmt),
    Output(OutputStmt),
    If(IfStmt),
    Switch(SwitchStmt),
    For(ForStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    FunctionDef(FunctionDefStmt),
    DataStruct(DataStructStmt),
    Jump(JumpStmt),
    Call(CallStmt),
    /// Synthetic recovery node for a statement position where parsing
    /// failed; never produced except during panic-mode recovery, and
    /// always paired with a diagnostic recorded at the same position.
    Error { token: Option<Token> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclStmt {
    pub data_type: TypeTag,
    pub decl_list: Vec<DeclItem>,
    pub token: Option<Token>,
}

/// One `ident [ "=" expr | "[" NUM "]" ]` entry in a declaration list.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclItem {
    pub identifier: String,
    pub init: Option<DeclInit>,
    /// Informational inferred type of `init`, when present.
    pub type_tag: Option<TypeTag>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclInit {
    /// `= expr` (a list literal is itself an `Expr::ListLit`, so it uses
    /// this same variant).
    Expr(Expr),
    /// `[ NUM ]` — the AST invariant requires the array-size clause to
    /// hold a numeric literal; the token is retained for diagnostics if a
    /// caller later finds that invariant violated.
    ArraySize(Token),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: AssignTarget,
    pub assignment_op: Token,
    pub value: Expr,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Identifier(String),
    Indexed { identifier: String, index: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputStmt {
    pub identifier: String,
    pub data_type: TypeTag,
    pub prompt: Option<Expr>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputStmt {
    pub value: Expr,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Vec<Stmt>,
    pub else_ifs: Vec<ElseIfClause>,
    pub else_body: Option<Vec<Stmt>>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIfClause {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub value: Expr,
    pub cases: Vec<CaseClause>,
    pub default_block: Option<Vec<Stmt>>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    /// Case literals are primary-level only, never a full expression.
    pub literal: Expr,
    pub body: Vec<Stmt>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub iterator: String,
    pub start: Expr,
    pub end: Expr,
    pub step: Option<Expr>,
    pub body: Vec<Stmt>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub body: Vec<Stmt>,
    pub condition: Expr,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefStmt {
    pub return_type: Option<TypeTag>,
    pub identifier: String,
    pub parameters: Vec<Param>,
    pub body: Vec<Stmt>,
    pub return_statement: Option<Expr>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// `None` when the user wrote a bare identifier with no type; the
    /// parser emits one per-function diagnostic listing those names (see
    /// §4.5.5) rather than one diagnostic per bare parameter.
    pub declared_type: Option<TypeTag>,
    pub identifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataStructStmt {
    pub identifier: String,
    pub fields: Vec<Field>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub identifier: String,
    pub kind: FieldKind,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// `type ident [ "=" expr ]`
    Typed {
        data_type: TypeTag,
        default: Option<Expr>,
    },
    /// `ident ":" type [ "(" bound_ident ")" ]`
    SchemaBinding {
        data_type: TypeTag,
        bound_ident: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum JumpStmt {
    Break { token: Option<Token> },
    Continue { token: Option<Token> },
    Return { value: Option<Expr>, token: Option<Token> },
}

/// A call used in statement position (covers both ordinary user-function
/// calls and built-in-name calls — the grammar's `builtin_call` and
/// `call_stmt` productions collapse to the same shape, since the token
/// catalog carries no separate "built-in name" kind; see `DESIGN.md`).
#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub call: CallExpr,
    pub token: Option<Token>,
}

/// The tag distinguishing otherwise-identical `{left, operator, right}`
/// binary expression nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    LogicOr,
    LogicAnd,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Exponential,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Index(IndexExpr),
    Field(FieldExpr),
    Call(CallExpr),
    NumberLit(LiteralExpr),
    DecimalLit(LiteralExpr),
    BoolLit { value: bool, token: Option<Token> },
    NullLit { token: Option<Token> },
    StringLit(StringLitExpr),
    ListLit(ListLitExpr),
    Identifier(IdentifierExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

/// Unary prefix expression (`!`, `+`, `-`, `++`, `--`), right-associative.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: Token,
    pub operand: Box<Expr>,
}

/// Postfix indexing `object[index]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub object: Box<Expr>,
    pub index: Box<Expr>,
    pub token: Option<Token>,
}

/// Postfix field access `object.field`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldExpr {
    pub object: Box<Expr>,
    pub field: String,
    pub token: Option<Token>,
}

/// Postfix call `callee(arguments...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub token: Option<Token>,
}

/// A number or decimal literal; `value` keeps the verbatim lexeme rather
/// than a parsed numeric type, since the core never evaluates it.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub name: String,
    pub token: Option<Token>,
}

/// One part of a composite string's reconstructed content sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Content(String),
    Insertion(IdentifierExpr),
}

/// A composite string literal assembled from one or more scanner tokens.
/// `content` is always non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLitExpr {
    pub content: Vec<StringPart>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListLitExpr {
    pub elements: Vec<Expr>,
    pub token: Option<Token>,
}

impl Expr {
    /// The token anchoring this expression, when one is available (every
    /// variant carries one except where noted).
    pub fn token(&self) -> Option<&Token> {
        match self {
            Expr::Binary(e) => Some(&e.operator),
            Expr::Unary(e) => Some(&e.operator),
            Expr::Index(e) => e.token.as_ref(),
            Expr::Field(e) => e.token.as_ref(),
            Expr::Call(e) => e.token.as_ref(),
            Expr::NumberLit(e) | Expr::DecimalLit(e) => e.token.as_ref(),
            Expr::BoolLit { token, .. } | Expr::NullLit { token } => token.as_ref(),
            Expr::StringLit(e) => e.token.as_ref(),
            Expr::ListLit(e) => e.token.as_ref(),
            Expr::Identifier(e) => e.token.as_ref(),
        }
    }
}
