use crate::token::{Kind, Token};
use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CompilerError {
    FileNotFound(String),
    IO(io::Error),
    LexingError(LexingError),
    TokenKindMismatch(TokenKindMismatch),
    Syntax(SyntaxError),
    Config(String),
}

impl Error for CompilerError {}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompilerError::IO(err) => write!(f, "IOError: {}", err),
            CompilerError::FileNotFound(err) => write!(f, "FileNotFoundError: {}", err),
            CompilerError::LexingError(err) => write!(f, "{}", err),
            CompilerError::TokenKindMismatch(err) => write!(f, "{}", err),
            CompilerError::Syntax(err) => write!(f, "{}", err),
            CompilerError::Config(err) => write!(f, "ConfigError: {}", err),
        }
    }
}

impl From<io::Error> for CompilerError {
    fn from(err: io::Error) -> Self {
        CompilerError::IO(err)
    }
}

impl From<LexingError> for CompilerError {
    fn from(err: LexingError) -> Self {
        CompilerError::LexingError(err)
    }
}

impl From<TokenKindMismatch> for CompilerError {
    fn from(err: TokenKindMismatch) -> Self {
        CompilerError::TokenKindMismatch(err)
    }
}

impl From<SyntaxError> for CompilerError {
    fn from(err: SyntaxError) -> Self {
        CompilerError::Syntax(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexingErrorKind {
    UnterminatedComment,
    UnterminatedString,
    IntegerOutOfRange(String),
    MalformedInteger(String),
    UnrecognizedCharacter(char),
}

impl fmt::Display for LexingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LexingErrorKind::UnterminatedComment => write!(f, "Unterminated block comment"),
            LexingErrorKind::UnterminatedString => write!(f, "Unterminated string constant"),
            LexingErrorKind::IntegerOutOfRange(digits) => {
                write!(f, "Integer constant {} exceeds 32767", digits)
            }
            LexingErrorKind::MalformedInteger(text) => {
                write!(f, "Malformed integer constant {}", text)
            }
            LexingErrorKind::UnrecognizedCharacter(ch) => {
                write!(f, "Unrecognized character {:?}", ch)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LexingError {
    pub(crate) path: PathBuf,
    pub(crate) kind: LexingErrorKind,
    pub(crate) line: usize,
    pub(crate) position: usize,
}

impl Error for LexingError {}

impl LexingError {
    pub fn new(path: PathBuf, kind: LexingErrorKind, line: usize, position: usize) -> Self {
        Self {
            path,
            kind,
            line,
            position,
        }
    }

    pub fn kind(&self) -> &LexingErrorKind {
        &self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for LexingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LexingError: {}\n  --> {}:{}:{}",
            self.kind,
            self.path.display(),
            self.line,
            self.position,
        )
    }
}

/// An accessor was called on a token of another kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenKindMismatch {
    pub(crate) expected: Kind,
    pub(crate) found: Option<Kind>,
    pub(crate) line: usize,
    pub(crate) position: usize,
}

impl Error for TokenKindMismatch {}

impl TokenKindMismatch {
    pub fn new(expected: Kind, found: Option<&Token>) -> Self {
        Self {
            expected,
            found: found.map(Token::kind),
            line: found.map_or(0, |token| token.line),
            position: found.map_or(0, |token| token.position),
        }
    }

    pub fn expected(&self) -> Kind {
        self.expected
    }

    pub fn found(&self) -> Option<Kind> {
        self.found
    }
}

impl fmt::Display for TokenKindMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.found {
            Some(found) => write!(
                f,
                "TokenKindMismatch: expected a {} token but the current token is a {} ({}:{})",
                self.expected, found, self.line, self.position
            ),
            None => write!(
                f,
                "TokenKindMismatch: expected a {} token but there is no current token",
                self.expected
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxError {
    pub(crate) path: PathBuf,
    pub(crate) rule: &'static str,
    pub(crate) message: String,
    pub(crate) line: usize,
    pub(crate) position: usize,
    pub(crate) found: String,
}

impl Error for SyntaxError {}

impl SyntaxError {
    pub fn from_token(path: PathBuf, rule: &'static str, token: &Token, message: String) -> Self {
        Self {
            path,
            rule,
            message,
            line: token.line,
            position: token.position,
            found: token.to_string(),
        }
    }

    pub fn at_end(path: PathBuf, rule: &'static str, line: usize, message: String) -> Self {
        Self {
            path,
            rule,
            message,
            line,
            position: 0,
            found: "end of input".to_string(),
        }
    }

    pub fn rule(&self) -> &'static str {
        self.rule
    }

    pub fn found(&self) -> &str {
        &self.found
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SyntaxError in {}: {}, found {}\n  --> {}:{}:{}",
            self.rule,
            self.message,
            self.found,
            self.path.display(),
            self.line,
            self.position,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Lexeme;

    #[test]
    fn syntax_error_names_rule_and_token() {
        let token = Token::new(Lexeme::Symbol(';'), 3, 9);
        let err = SyntaxError::from_token(
            PathBuf::from("Main.jack"),
            "term",
            &token,
            "expected a term".to_string(),
        );
        let text = err.to_string();
        assert!(text.contains("term"));
        assert!(text.contains("found ;"));
        assert!(text.contains("Main.jack:3:9"));
    }

    #[test]
    fn mismatch_without_current_token() {
        let err = TokenKindMismatch::new(Kind::Symbol, None);
        assert_eq!(err.found(), None);
        assert!(err.to_string().contains("no current token"));
    }
}
