use super::span::Span;
use super::token::Token;

use thiserror::Error;

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParserErrorType {
    #[error("expected next token to be `{expected}`, got `{got}` instead")]
    ExpectedToken { expected: Token, got: Token },
    #[error("expected identifier, got `{0}` instead")]
    ExpectedIdentifier(Token),
    #[error("no prefix parse rule for `{0}`")]
    NoPrefixRule(Token),
    #[error("illegal token `{0}`")]
    IllegalToken(String),
    #[error("only identifiers can be called, got `{0}`")]
    CallOnNonIdentifier(String),
    #[error("expected `}}` before end of input")]
    UnclosedBlock,
}

#[derive(Debug, PartialEq, Clone, Error)]
#[error("[line {}] {}", .span.start_pos.line_no, .error)]
pub struct ParserError {
    pub span: Span,
    pub error: ParserErrorType,
}

pub type ParserResult<T> = Result<T, ParserError>;
