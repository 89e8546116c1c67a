use super::cursor::Cursor;
use super::span::Span;
use super::token::{lookup_keyword, SpannedToken, Token};

pub struct Lexer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer from source.
    pub fn new(source: &'src str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
        }
    }

    /// Returns the next token. Once the input is exhausted every call returns
    /// `Token::EndOfFile`.
    pub fn next_token(&mut self) -> SpannedToken {
        self.cursor.take_while(is_whitespace_char);

        let start_pos = self.cursor.position();
        let token = self.lex_token();
        let end_pos = self.cursor.position();

        SpannedToken {
            token,
            span: Span::new(start_pos, end_pos),
        }
    }

    fn lex_token(&mut self) -> Token {
        let (byte_idx, ch) = match self.cursor.take() {
            Some(t) => t,
            None => return Token::EndOfFile,
        };

        match ch {
            // Single-character tokens.
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Asterisk,
            '/' => Token::Slash,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '<' => Token::LeftAngle,
            '>' => Token::RightAngle,

            // Potentially two character tokens.
            '=' => self.look_for_eq_sign(Token::Equals, Token::DoubleEq),
            '!' => self.look_for_eq_sign(Token::Bang, Token::BangEq),

            '"' => self.lex_string(byte_idx),

            _ if is_digit_char(ch) => self.lex_number(byte_idx),

            _ if is_identifier_char(ch) => self.lex_identifier_or_kw(byte_idx),

            _ => Token::Illegal(ch.to_string()),
        }
    }

    /// Checks if next char is '='. If so, consume it and return `t2`.
    /// Otherwise, return `t1`.
    fn look_for_eq_sign(&mut self, t1: Token, t2: Token) -> Token {
        if self.cursor.take_if('=') {
            t2
        } else {
            t1
        }
    }

    /// Scans up to the closing '"'. Backslashes have no special meaning.
    fn lex_string(&mut self, quote_idx: usize) -> Token {
        let start_idx = quote_idx + 1;

        self.cursor.take_while(|ch| ch != '"');
        let contents = self.cursor.slice_from(start_idx).to_owned();

        if self.cursor.take_if('"') {
            Token::String(contents)
        } else {
            Token::Illegal(format!("\"{}", contents))
        }
    }

    fn lex_number(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(is_digit_char);

        let scanned_number = self.cursor.slice_from(start_idx);
        match scanned_number.parse() {
            Ok(value) => Token::Int(value),
            Err(_) => Token::Illegal(scanned_number.to_owned()),
        }
    }

    fn lex_identifier_or_kw(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(is_identifier_char);

        let word = self.cursor.slice_from(start_idx);
        lookup_keyword(word).unwrap_or_else(|| Token::Identifier(word.to_owned()))
    }

    /// Returns an iterator version of lexer.
    pub fn iter(self) -> LexerIterator<'src> {
        LexerIterator { lexer: self }
    }
}

pub struct LexerIterator<'src> {
    lexer: Lexer<'src>,
}

impl<'src> Iterator for LexerIterator<'src> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lexer.next_token();

        if token.token == Token::EndOfFile {
            return None;
        }

        Some(token)
    }
}

fn is_whitespace_char(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_digit_char(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}
