//! Byte-level source iterator with line/column tracking, in the style of a
//! hand-rolled lexer cursor rather than a regex-table-driven one (ECHO's
//! stateful composite-string interpolation can't be expressed as a flat
//! token-regex table).

use crate::base::Position;

pub(super) struct Cursor<'a> {
    source: &'a str,
    byte_pos: usize,
    chars: std::str::Chars<'a>,
    line: usize,
    column: usize,
    line_start: usize,
    tab_width: usize,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(source: &'a str, tab_width: usize) -> Self {
        Self {
            source,
            byte_pos: 0,
            chars: source.chars(),
            line: 1,
            column: 1,
            line_start: 0,
            tab_width,
        }
    }

    pub(super) fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Look `n` characters ahead of the current one without consuming
    /// anything. `peek_at(1)` is the character immediately after the one
    /// `peek()` returns, `peek_at(2)` the one after that, and so on.
    pub(super) fn peek_at(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next()?;
        }
        iter.next()
    }

    pub(super) fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    pub(super) fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// The raw text from the start of the current physical line up to (not
    /// including) the character about to be consumed. Used by the `//`
    /// disambiguation rule, which looks back at prior non-blank characters
    /// on the same line.
    pub(super) fn text_since_line_start(&self) -> &'a str {
        &self.source[self.line_start..self.byte_pos]
    }

    pub(super) fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.byte_pos += c.len_utf8();
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
                self.line_start = self.byte_pos;
            }
            '\r' => {}
            '\t' => self.column += self.tab_width,
            _ => self.column += 1,
        }
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_line_and_column() {
        let mut cursor = Cursor::new("ab\ncd", 4);
        assert_eq!(cursor.position(), Position::new(1, 1));
        cursor.advance();
        assert_eq!(cursor.position(), Position::new(1, 2));
        cursor.advance(); // 'b'
        cursor.advance(); // '\n'
        assert_eq!(cursor.position(), Position::new(2, 1));
    }

    #[test]
    fn tab_advances_column_by_tab_width() {
        let mut cursor = Cursor::new("\ta", 4);
        cursor.advance();
        assert_eq!(cursor.position(), Position::new(1, 5));
    }

    #[test]
    fn text_since_line_start_resets_on_newline() {
        let mut cursor = Cursor::new("ab\ncd", 4);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.text_since_line_start(), "ab");
        cursor.advance(); // newline
        assert_eq!(cursor.text_since_line_start(), "");
    }

    #[test]
    fn peek_at_looks_multiple_chars_ahead() {
        let cursor = Cursor::new("abc", 4);
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_at(1), Some('b'));
        assert_eq!(cursor.peek_at(2), Some('c'));
        assert_eq!(cursor.peek_at(5), None);
    }
}
