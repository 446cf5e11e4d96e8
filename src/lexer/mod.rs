//! Lexical Scanner: single left-to-right pass over source text producing a
//! positioned token stream. Never looks further than O(1) characters ahead
//! except inside strings, comments, and identifier/number runs, which are
//! themselves bounded by their own content.
//!
//! The scanner never parses and never consults the symbol table or
//! diagnostic reporter — malformed input always yields an `Unknown` token,
//! never an error or exception.

mod cursor;

use cursor::Cursor;

use crate::base::Position;
use crate::config::ScannerConfig;
use crate::token::{
    Token, TokenKind, classify_operator_run, is_ident_continue, is_ident_start, is_operator,
    is_operator_char, is_opener, keyword_kind, single_char_delimiter,
};

/// Replaces NO-BREAK SPACE with an ordinary space and strips zero-width
/// marks (U+200B-U+200D, U+FEFF) before scanning begins.
fn preprocess(source: &str) -> String {
    source
        .chars()
        .filter_map(|c| match c {
            '\u{00A0}' => Some(' '),
            '\u{200B}'..='\u{200D}' | '\u{FEFF}' => None,
            other => Some(other),
        })
        .collect()
}

struct Scanner<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, config: ScannerConfig) -> Self {
        Self {
            cursor: Cursor::new(source, config.tab_width),
            tokens: Vec::new(),
        }
    }

    fn run(&mut self) {
        while !self.cursor.is_eof() {
            self.scan_one();
        }
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>, pos: Position) {
        self.tokens.push(Token::new(kind, lexeme, pos.line, pos.column));
    }

    /// Per the resolved open question in the expanded design: a leading
    /// sign is consumed as part of a number literal only when the previous
    /// emitted token is absent or is an operator/opener. Otherwise the
    /// sign is left for the parser's unary-minus handling, so `a-1`
    /// tokenizes as `a`, `-`, `1` rather than `a`, `-1`.
    fn leading_sign_allowed(&self) -> bool {
        match self.tokens.last().map(|t| t.kind) {
            None => true,
            Some(kind) => is_operator(kind) || is_opener(kind),
        }
    }

    fn scan_one(&mut self) {
        let c = match self.cursor.peek() {
            Some(c) => c,
            None => return,
        };

        // 1. CR: advance position only.
        if c == '\r' {
            self.cursor.advance();
            return;
        }
        // 2. Space / Tab / Newline: update counters, advance.
        if c == ' ' || c == '\t' || c == '\n' {
            self.cursor.advance();
            return;
        }
        // 3. `//` ambiguity.
        if c == '/' && self.cursor.peek_at(1) == Some('/') {
            return self.scan_slash_slash();
        }
        // 4. `/*` block comment.
        if c == '/' && self.cursor.peek_at(1) == Some('*') {
            return self.scan_block_comment();
        }
        // 5. Composite string literal.
        if c == '"' {
            return self.scan_string();
        }
        // 6. Numeric literal: digit, sign+digit, or `.`+digit.
        if c.is_ascii_digit() {
            return self.scan_number(false);
        }
        if c == '.' && self.cursor.peek_at(1).is_some_and(|n| n.is_ascii_digit()) {
            return self.scan_number(false);
        }
        if (c == '+' || c == '-')
            && self.cursor.peek_at(1).is_some_and(|n| n.is_ascii_digit())
            && self.leading_sign_allowed()
        {
            return self.scan_number(true);
        }
        // 8. `@` outside a string.
        if c == '@' {
            return self.scan_sis_marker_outside_string();
        }
        // 7. Letter or `_`: identifier/keyword.
        if is_ident_start(c) {
            return self.scan_ident_or_keyword();
        }
        // 9. Operator run.
        if is_operator_char(c) {
            return self.scan_operator_run();
        }
        // 10. Delimiter.
        if single_char_delimiter(c).is_some() {
            return self.scan_delimiter();
        }
        // 11. Anything else, including `;` and `\`.
        self.scan_unknown_char();
    }

    fn scan_slash_slash(&mut self) {
        let start = self.cursor.position();
        if self
            .cursor
            .text_since_line_start()
            .trim_matches(|c: char| c == ' ' || c == '\t')
            .is_empty()
        {
            let mut lexeme = String::new();
            while let Some(c) = self.cursor.peek() {
                if c == '\n' {
                    break;
                }
                lexeme.push(c);
                self.cursor.advance();
            }
            self.push(TokenKind::CommentSingle, lexeme, start);
        } else {
            self.scan_operator_run();
        }
    }

    fn scan_block_comment(&mut self) {
        let start = self.cursor.position();
        let mut lexeme = String::new();
        lexeme.push(self.cursor.advance().unwrap());
        lexeme.push(self.cursor.advance().unwrap());
        loop {
            match self.cursor.peek() {
                None => break,
                Some('*') if self.cursor.peek_at(1) == Some('/') => {
                    lexeme.push(self.cursor.advance().unwrap());
                    lexeme.push(self.cursor.advance().unwrap());
                    break;
                }
                Some(c) => {
                    lexeme.push(c);
                    self.cursor.advance();
                }
            }
        }
        self.push(TokenKind::CommentMulti, lexeme, start);
    }

    /// Composite string literal with `@`-interpolation (§4.3.1). Produces a
    /// sequence of `StrLiteral`/`SisMarker`/`Unknown` tokens rather than
    /// one token per `"..."` span.
    fn scan_string(&mut self) {
        self.cursor.advance(); // opening quote, silent
        let mut buffer = String::new();
        let mut seg_start = self.cursor.position();
        let mut any_emitted = false;

        loop {
            match self.cursor.peek() {
                None => {
                    if !buffer.is_empty() || !any_emitted {
                        self.emit_string_segment(&buffer, seg_start);
                    }
                    break;
                }
                Some('"') => {
                    self.cursor.advance();
                    if !buffer.is_empty() || !any_emitted {
                        self.emit_string_segment(&buffer, seg_start);
                    }
                    break;
                }
                Some('@') if self.cursor.peek_at(1) == Some(' ') => {
                    if !buffer.is_empty() {
                        self.emit_string_segment(&buffer, seg_start);
                        buffer.clear();
                    }
                    any_emitted = true;
                    let at_pos = self.cursor.position();
                    self.cursor.advance(); // '@'
                    self.cursor.advance(); // ' '
                    self.push(TokenKind::Unknown, "@ ", at_pos);
                    seg_start = self.cursor.position();
                }
                Some('@') => {
                    if !buffer.is_empty() {
                        self.emit_string_segment(&buffer, seg_start);
                        buffer.clear();
                    }
                    any_emitted = true;
                    let marker_pos = self.cursor.position();
                    let mut marker = String::new();
                    marker.push(self.cursor.advance().unwrap());
                    while let Some(c) = self.cursor.peek() {
                        if is_ident_continue(c) {
                            marker.push(c);
                            self.cursor.advance();
                        } else {
                            break;
                        }
                    }
                    self.push(TokenKind::SisMarker, marker, marker_pos);
                    seg_start = self.cursor.position();
                }
                Some('\\') => {
                    buffer.push(self.cursor.advance().unwrap());
                    if let Some(c) = self.cursor.peek() {
                        buffer.push(c);
                        self.cursor.advance();
                    }
                }
                Some(c) => {
                    buffer.push(c);
                    self.cursor.advance();
                }
            }
        }
    }

    fn emit_string_segment(&mut self, buffer: &str, pos: Position) {
        self.push(TokenKind::StrLiteral, format!("\"{buffer}\""), pos);
    }

    fn scan_sis_marker_outside_string(&mut self) {
        let start = self.cursor.position();
        let mut lexeme = String::new();
        lexeme.push(self.cursor.advance().unwrap());
        while let Some(c) = self.cursor.peek() {
            if is_ident_continue(c) {
                lexeme.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }
        self.push(TokenKind::SisMarker, lexeme, start);
    }

    fn scan_number(&mut self, consume_sign: bool) {
        let start = self.cursor.position();
        let mut lexeme = String::new();
        let mut is_decimal = false;

        if consume_sign {
            if let Some(c) = self.cursor.peek() {
                if c == '+' || c == '-' {
                    lexeme.push(c);
                    self.cursor.advance();
                }
            }
        }

        while let Some(c) = self.cursor.peek() {
            if c.is_ascii_digit() {
                lexeme.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }

        if self.cursor.peek() == Some('.') && self.cursor.peek_at(1).is_some_and(|n| n.is_ascii_digit()) {
            is_decimal = true;
            lexeme.push(self.cursor.advance().unwrap());
            while let Some(c) = self.cursor.peek() {
                if c.is_ascii_digit() {
                    lexeme.push(c);
                    self.cursor.advance();
                } else {
                    break;
                }
            }
        }

        if matches!(self.cursor.peek(), Some('e') | Some('E')) {
            let mut lookahead = 1usize;
            let mut next = self.cursor.peek_at(lookahead);
            if matches!(next, Some('+') | Some('-')) {
                lookahead += 1;
                next = self.cursor.peek_at(lookahead);
            }
            if next.is_some_and(|c| c.is_ascii_digit()) {
                is_decimal = true;
                lexeme.push(self.cursor.advance().unwrap()); // e/E
                if let Some(s) = self.cursor.peek() {
                    if s == '+' || s == '-' {
                        lexeme.push(s);
                        self.cursor.advance();
                    }
                }
                while let Some(c) = self.cursor.peek() {
                    if c.is_ascii_digit() {
                        lexeme.push(c);
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        if let Some(c) = self.cursor.peek() {
            if is_ident_start(c) {
                while let Some(c2) = self.cursor.peek() {
                    if is_ident_continue(c2) {
                        lexeme.push(c2);
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
                self.push(TokenKind::Unknown, lexeme, start);
                return;
            }
        }

        let kind = if is_decimal {
            TokenKind::DecLiteral
        } else {
            TokenKind::NumLiteral
        };
        self.push(kind, lexeme, start);
    }

    fn scan_ident_or_keyword(&mut self) {
        let start = self.cursor.position();
        let mut lexeme = String::new();
        while let Some(c) = self.cursor.peek() {
            if is_ident_continue(c) {
                lexeme.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }
        let kind = keyword_kind(&lexeme.to_lowercase()).unwrap_or(TokenKind::Id);
        self.push(kind, lexeme, start);
    }

    fn scan_operator_run(&mut self) {
        let start = self.cursor.position();
        let mut lexeme = String::new();
        while let Some(c) = self.cursor.peek() {
            if is_operator_char(c) {
                lexeme.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }
        match classify_operator_run(&lexeme) {
            Some(kind) => self.push(kind, lexeme, start),
            None => self.push(TokenKind::Unknown, lexeme, start),
        }
    }

    fn scan_delimiter(&mut self) {
        let start = self.cursor.position();
        let c = self.cursor.advance().unwrap();
        let kind = single_char_delimiter(c).unwrap();
        self.push(kind, c.to_string(), start);
    }

    fn scan_unknown_char(&mut self) {
        let start = self.cursor.position();
        let c = self.cursor.advance().unwrap();
        self.push(TokenKind::Unknown, c.to_string(), start);
    }
}

/// Tokenizes `source` with the default scanner configuration. Always
/// returns a list; malformed input yields `Unknown` tokens, never a panic
/// or error.
pub fn tokenize(source: &str) -> Vec<Token> {
    tokenize_with_config(source, ScannerConfig::default())
}

/// Tokenizes `source` with an explicit configuration (tab width, ...).
pub fn tokenize_with_config(source: &str, config: ScannerConfig) -> Vec<Token> {
    let cleaned = preprocess(source);
    let mut scanner = Scanner::new(&cleaned, config);
    scanner.run();
    scanner.tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_yields_no_tokens() {
        assert_eq!(kinds(""), vec![]);
    }

    #[test]
    fn whitespace_and_comments_only_yield_comment_tokens() {
        let toks = tokenize("  // a line comment\n/* block */  ");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].kind, CommentSingle);
        assert_eq!(toks[1].kind, CommentMulti);
    }

    #[test]
    fn double_slash_at_line_start_is_comment() {
        let toks = tokenize("// comment");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, CommentSingle);
    }

    #[test]
    fn double_slash_after_expression_is_int_div() {
        let toks = tokenize("n = 10 // 3");
        assert_eq!(
            toks.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![Id, OpAssign, NumLiteral, OpIntDiv, NumLiteral]
        );
    }

    #[test]
    fn empty_string_literal_emits_one_token() {
        let toks = tokenize("\"\"");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, StrLiteral);
        assert_eq!(toks[0].lexeme, "\"\"");
    }

    #[test]
    fn interpolation_splits_into_alternating_tokens() {
        let toks = tokenize("\"x=@x y=@y\"");
        let got: Vec<(TokenKind, &str)> = toks.iter().map(|t| (t.kind, t.lexeme.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (StrLiteral, "\"x=\""),
                (SisMarker, "@x"),
                (StrLiteral, "\" y=\""),
                (SisMarker, "@y"),
            ]
        );
    }

    #[test]
    fn string_with_only_interpolation_has_no_literal_segments() {
        let toks = tokenize("\"@x\"");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, SisMarker);
        assert_eq!(toks[0].lexeme, "@x");
    }

    #[test]
    fn at_space_inside_string_is_unknown() {
        let toks = tokenize("\"@ bad\"");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].kind, Unknown);
        assert_eq!(toks[0].lexeme, "@ ");
        assert_eq!(toks[1].kind, StrLiteral);
        assert_eq!(toks[1].lexeme, "\"bad\"");
    }

    #[test]
    fn leading_sign_consumed_at_expression_start() {
        let toks = tokenize("x = -5");
        assert_eq!(
            toks.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![Id, OpAssign, NumLiteral]
        );
        assert_eq!(toks.last().unwrap().lexeme, "-5");
    }

    #[test]
    fn sign_after_identifier_is_a_separate_operator() {
        let toks = tokenize("a-1");
        assert_eq!(
            toks.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![Id, OpSub, NumLiteral]
        );
    }

    #[test]
    fn malformed_number_with_identifier_tail_is_unknown() {
        let toks = tokenize("123abc");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, Unknown);
        assert_eq!(toks[0].lexeme, "123abc");
    }

    #[test]
    fn decimal_and_exponent_literals_classify_as_decimal() {
        let toks = tokenize("3.14 2e10 5E-3");
        assert_eq!(
            toks.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![DecLiteral, DecLiteral, DecLiteral]
        );
    }

    #[test]
    fn operator_run_overreach_is_unknown() {
        let toks = tokenize("<=>");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, Unknown);
        assert_eq!(toks[0].lexeme, "<=>");
    }

    #[test]
    fn positions_are_one_based_and_monotonic() {
        let toks = tokenize("start\necho 1\nend");
        assert_eq!(toks[0].line, 1);
        assert_eq!(toks[0].column, 1);
        let mut last = (0, 0);
        for t in &toks {
            assert!((t.line, t.column) >= last);
            last = (t.line, t.column);
        }
    }

    #[test]
    fn unterminated_block_comment_consumes_to_eof() {
        let toks = tokenize("/* never closes");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, CommentMulti);
    }

    #[test]
    fn identifier_keyword_lookup_is_case_insensitive_on_the_word() {
        let toks = tokenize("IF");
        assert_eq!(toks[0].kind, KwIf);
        assert_eq!(toks[0].lexeme, "IF");
    }
}
