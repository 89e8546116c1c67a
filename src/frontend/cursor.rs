use super::span::CodePosition;
use std::iter::Peekable;
use std::str::CharIndices;

/// Forward-only character stream over the source with a single character of
/// lookahead.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    position: CodePosition,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Cursor {
            source,
            chars: source.char_indices().peekable(),
            position: CodePosition::new(0, 1, 1),
        }
    }

    /// Position of the next unconsumed character.
    pub fn position(&self) -> CodePosition {
        self.position
    }

    /// Byte offset of the next unconsumed character, or the source length at
    /// the end of input.
    pub fn offset(&mut self) -> usize {
        self.peek().map_or(self.source.len(), |(idx, _)| idx)
    }

    pub fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    pub fn take(&mut self) -> Option<(usize, char)> {
        let (byte_idx, ch) = self.chars.next()?;

        self.position.byte_pos = self.offset();
        if ch == '\n' {
            self.position.line_no += 1;
            self.position.column_no = 1;
        } else {
            self.position.column_no += 1;
        }

        Some((byte_idx, ch))
    }

    /// Consumes the next character if it equals `target`.
    pub fn take_if(&mut self, target: char) -> bool {
        match self.peek() {
            Some((_, ch)) if ch == target => {
                self.take();
                true
            }
            _ => false,
        }
    }

    /// Consumes characters while they meet `condition`. Afterwards the next
    /// character, if any, fails it.
    pub fn take_while<F>(&mut self, condition: F)
    where
        F: Fn(char) -> bool,
    {
        while let Some((_, ch)) = self.peek() {
            if !condition(ch) {
                break;
            }
            self.take();
        }
    }

    pub fn slice_from(&mut self, start_idx: usize) -> &'src str {
        let end_idx = self.offset();
        &self.source[start_idx..end_idx]
    }
}
