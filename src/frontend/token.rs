use super::span::Span;

use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Comma,
    Semicolon,
    LeftAngle,
    RightAngle,

    // One or two character tokens.
    Bang,
    BangEq,
    Equals,
    DoubleEq,

    // Literals.
    Identifier(String),
    String(String),
    Int(i64),

    // Keywords.
    Let,
    Fn,
    If,
    Else,
    Return,
    True,
    False,

    Illegal(String),
    EndOfFile,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Maps a scanned word to its keyword token, if it is one.
pub fn lookup_keyword(word: &str) -> Option<Token> {
    let keyword = match word {
        "let" => Token::Let,
        "fn" => Token::Fn,
        "if" => Token::If,
        "else" => Token::Else,
        "return" => Token::Return,
        "true" => Token::True,
        "false" => Token::False,
        _ => return None,
    };
    Some(keyword)
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::LeftBrace => f.write_str("{"),
            Token::RightBrace => f.write_str("}"),
            Token::LeftBracket => f.write_str("["),
            Token::RightBracket => f.write_str("]"),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Asterisk => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::Comma => f.write_str(","),
            Token::Semicolon => f.write_str(";"),
            Token::LeftAngle => f.write_str("<"),
            Token::RightAngle => f.write_str(">"),
            Token::Bang => f.write_str("!"),
            Token::BangEq => f.write_str("!="),
            Token::Equals => f.write_str("="),
            Token::DoubleEq => f.write_str("=="),
            Token::Identifier(name) => f.write_str(name),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Int(i) => write!(f, "{}", i),
            Token::Let => f.write_str("let"),
            Token::Fn => f.write_str("fn"),
            Token::If => f.write_str("if"),
            Token::Else => f.write_str("else"),
            Token::Return => f.write_str("return"),
            Token::True => f.write_str("true"),
            Token::False => f.write_str("false"),
            Token::Illegal(s) => f.write_str(s),
            Token::EndOfFile => f.write_str("end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(lookup_keyword("fn"), Some(Token::Fn));
        assert_eq!(lookup_keyword("return"), Some(Token::Return));
        assert_eq!(lookup_keyword("fun"), None);
        assert_eq!(lookup_keyword("Let"), None);
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(Token::BangEq.to_string(), "!=");
        assert_eq!(Token::Identifier("foo".to_owned()).to_string(), "foo");
        assert_eq!(Token::String("a b".to_owned()).to_string(), "\"a b\"");
        assert_eq!(Token::Int(42).to_string(), "42");
    }
}
