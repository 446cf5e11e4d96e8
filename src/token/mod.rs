//! Token Catalog: the closed set of token kinds and the pure lookup tables
//! the scanner relies on. Nothing in this module holds state; every
//! function here is a total, deterministic mapping.

use crate::base::Position;

/// The closed enumeration of lexical atom kinds, bit-exact with the
/// boundary contract: every variant here is reachable from source text and
/// every token the scanner emits carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    KwStart,
    KwEnd,
    KwEcho,
    KwInput,
    KwFunction,
    KwNumber,
    KwDecimal,
    KwString,
    KwBoolean,
    KwList,
    KwFor,
    KwWhile,
    KwDo,
    KwIf,
    KwElse,
    KwSwitch,
    KwCase,
    KwDefault,

    // Reserved
    RwNull,
    RwTrue,
    RwFalse,
    RwContinue,
    RwBreak,
    RwReturn,
    RwNew,
    RwThis,
    RwAt,
    RwData,
    RwStruct,

    // Noise words
    NwWith,
    NwTo,
    NwBy,

    // Lexical
    Id,
    NumLiteral,
    DecLiteral,
    StrLiteral,
    SisMarker,

    // Operators
    OpAssign,
    OpAddAssign,
    OpSubAssign,
    OpMulAssign,
    OpDivAssign,
    OpModAssign,
    OpAdd,
    OpSub,
    OpMul,
    OpDiv,
    OpIntDiv,
    OpMod,
    OpExp,
    OpInc,
    OpDec,
    OpEq,
    OpNeq,
    OpLt,
    OpGt,
    OpLte,
    OpGte,
    OpNot,
    OpAnd,
    OpOr,

    // Delimiters
    DelLparen,
    DelRparen,
    DelLbrack,
    DelRbrack,
    DelLbrace,
    DelRbrace,
    DelComma,
    DelPeriod,
    DelColon,
    DelSemicolon,

    // Comments
    CommentSingle,
    CommentMulti,

    // Catch-all
    Unknown,

    /// Synthetic end-of-stream marker; never appears in `tokenize`'s
    /// output, used only internally by the parser's lookahead.
    Eof,
}

/// A lexical atom: kind, verbatim matched text, and 1-based position of its
/// first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        debug_assert!(line >= 1 && column >= 1);
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Maps a lowercased word to its reserved-word kind, or `None` if it is an
/// ordinary identifier. Keywords, data types, reserved literals/jump words,
/// noise words, and block-delimiter words (`data`, `struct`) all live in
/// this one table, matching the grammar's flat keyword space.
pub fn keyword_kind(lowercased_word: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match lowercased_word {
        "start" => KwStart,
        "end" => KwEnd,
        "echo" => KwEcho,
        "input" => KwInput,
        "function" => KwFunction,
        "number" => KwNumber,
        "decimal" => KwDecimal,
        "string" => KwString,
        "boolean" => KwBoolean,
        "list" => KwList,
        "for" => KwFor,
        "while" => KwWhile,
        "do" => KwDo,
        "if" => KwIf,
        "else" => KwElse,
        "switch" => KwSwitch,
        "case" => KwCase,
        "default" => KwDefault,

        "null" => RwNull,
        "true" => RwTrue,
        "false" => RwFalse,
        "continue" => RwContinue,
        "break" => RwBreak,
        "return" => RwReturn,
        "new" => RwNew,
        "this" => RwThis,
        "data" => RwData,
        "struct" => RwStruct,

        "with" => NwWith,
        "to" => NwTo,
        "by" => NwBy,

        _ => return None,
    })
}

/// Whether `kind` names one of the declarable data types
/// (`number|decimal|string|boolean|list`).
pub fn is_data_type(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(kind, KwNumber | KwDecimal | KwString | KwBoolean | KwList)
}

/// Whether `kind` is one of the operator kinds (assignment-compound,
/// arithmetic, relational, logical, increment/decrement).
pub fn is_operator(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        OpAssign
            | OpAddAssign
            | OpSubAssign
            | OpMulAssign
            | OpDivAssign
            | OpModAssign
            | OpAdd
            | OpSub
            | OpMul
            | OpDiv
            | OpIntDiv
            | OpMod
            | OpExp
            | OpInc
            | OpDec
            | OpEq
            | OpNeq
            | OpLt
            | OpGt
            | OpLte
            | OpGte
            | OpNot
            | OpAnd
            | OpOr
    )
}

/// Whether `kind` is one of the delimiters that legally open an expression
/// or terminate one (openers include `(`, `[`, `{`; this is used by the
/// scanner's leading-sign heuristic, see §9 of the expanded spec).
pub fn is_opener(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(kind, DelLparen | DelLbrack | DelLbrace | DelComma)
}

/// Single-character delimiter lookup for `( ) [ ] { } , . :`. The
/// semicolon is deliberately absent: ECHO does not use semicolons as
/// statement separators, so a literal `;` in source is `UNKNOWN`/reported
/// as an illegal character rather than a delimiter (see E5 in the testable
/// scenarios).
pub fn single_char_delimiter(c: char) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match c {
        '(' => DelLparen,
        ')' => DelRparen,
        '[' => DelLbrack,
        ']' => DelRbrack,
        '{' => DelLbrace,
        '}' => DelRbrace,
        ',' => DelComma,
        '.' => DelPeriod,
        ':' => DelColon,
        _ => return None,
    })
}

/// Classifies a maximal operator-character run. Per §4.3.2: length-2 runs
/// in the compound set map to the compound kind; length-1 runs in the
/// single set map to the single kind; anything else is `None` (caller
/// emits `Unknown` with the whole run as lexeme).
pub fn classify_operator_run(run: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match run {
        "=" => OpAssign,
        "+=" => OpAddAssign,
        "-=" => OpSubAssign,
        "*=" => OpMulAssign,
        "/=" => OpDivAssign,
        "%=" => OpModAssign,
        "+" => OpAdd,
        "-" => OpSub,
        "*" => OpMul,
        "/" => OpDiv,
        "//" => OpIntDiv,
        "%" => OpMod,
        "^" => OpExp,
        "++" => OpInc,
        "--" => OpDec,
        "==" => OpEq,
        "!=" => OpNeq,
        "<" => OpLt,
        ">" => OpGt,
        "<=" => OpLte,
        ">=" => OpGte,
        "!" => OpNot,
        "&&" => OpAnd,
        "||" => OpOr,
        _ => return None,
    })
}

/// Whether `kind` is one of the compound assignment operators or the
/// plain `=`, i.e. anything that can appear as an `assign_op` in the
/// grammar's `assign` production.
pub fn is_assignment_op(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        OpAssign | OpAddAssign | OpSubAssign | OpMulAssign | OpDivAssign | OpModAssign
    )
}

/// The reverse of [`keyword_kind`]: the source word a reserved/keyword/
/// noise-word kind was parsed from, used so the parser can name the
/// offending reserved word in a diagnostic instead of a generic "expected
/// identifier".
pub fn keyword_text(kind: TokenKind) -> Option<&'static str> {
    use TokenKind::*;
    Some(match kind {
        KwStart => "start",
        KwEnd => "end",
        KwEcho => "echo",
        KwInput => "input",
        KwFunction => "function",
        KwNumber => "number",
        KwDecimal => "decimal",
        KwString => "string",
        KwBoolean => "boolean",
        KwList => "list",
        KwFor => "for",
        KwWhile => "while",
        KwDo => "do",
        KwIf => "if",
        KwElse => "else",
        KwSwitch => "switch",
        KwCase => "case",
        KwDefault => "default",
        RwNull => "null",
        RwTrue => "true",
        RwFalse => "false",
        RwContinue => "continue",
        RwBreak => "break",
        RwReturn => "return",
        RwNew => "new",
        RwThis => "this",
        RwData => "data",
        RwStruct => "struct",
        NwWith => "with",
        NwTo => "to",
        NwBy => "by",
        _ => return None,
    })
}

/// The character set from which operator runs are greedily built.
pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '<' | '>' | '!' | '=' | '&' | '|' | '+' | '-' | '*' | '/' | '%' | '^'
    )
}

/// ASCII-only identifier start character (letter or underscore); Unicode
/// identifiers are explicitly out of scope.
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// ASCII-only identifier continuation character.
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_kind_covers_control_flow() {
        assert_eq!(keyword_kind("if"), Some(TokenKind::KwIf));
        assert_eq!(keyword_kind("end"), Some(TokenKind::KwEnd));
        assert_eq!(keyword_kind("notakeyword"), None);
    }

    #[test]
    fn keyword_kind_covers_noise_words() {
        assert_eq!(keyword_kind("with"), Some(TokenKind::NwWith));
        assert_eq!(keyword_kind("to"), Some(TokenKind::NwTo));
        assert_eq!(keyword_kind("by"), Some(TokenKind::NwBy));
    }

    #[test]
    fn is_data_type_matches_exactly_five_kinds() {
        assert!(is_data_type(TokenKind::KwNumber));
        assert!(is_data_type(TokenKind::KwList));
        assert!(!is_data_type(TokenKind::KwIf));
    }

    #[test]
    fn classify_operator_run_handles_compound_and_single() {
        assert_eq!(classify_operator_run("//"), Some(TokenKind::OpIntDiv));
        assert_eq!(classify_operator_run("<="), Some(TokenKind::OpLte));
        assert_eq!(classify_operator_run("<"), Some(TokenKind::OpLt));
        assert_eq!(classify_operator_run("<=>"), None);
    }

    #[test]
    fn single_char_delimiter_excludes_semicolon() {
        assert_eq!(single_char_delimiter('('), Some(TokenKind::DelLparen));
        assert_eq!(single_char_delimiter(';'), None);
    }

    #[test]
    fn is_assignment_op_matches_plain_and_compound() {
        assert!(is_assignment_op(TokenKind::OpAssign));
        assert!(is_assignment_op(TokenKind::OpAddAssign));
        assert!(!is_assignment_op(TokenKind::OpEq));
    }

    #[test]
    fn keyword_text_round_trips_through_keyword_kind() {
        assert_eq!(keyword_text(TokenKind::RwReturn), Some("return"));
        assert_eq!(keyword_text(TokenKind::NwTo), Some("to"));
        assert_eq!(keyword_text(TokenKind::Id), None);
    }
}
