use crate::error::{LexingError, LexingErrorKind, TokenKindMismatch};
use crate::token::{Keyword, Kind, Lexeme, Token, MAX_INTEGER, SYMBOLS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+").expect("word pattern is valid"));

/// A position in the source. `offset` is in bytes, `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn step_over(self, text: &str) -> Self {
        let mut next = self;
        for ch in text.chars() {
            next.offset += ch.len_utf8();
            if ch == '\n' {
                next.line += 1;
                next.column = 1;
            } else {
                next.column += 1;
            }
        }
        next
    }
}

/// Pull-based tokenizer over an immutable source buffer.
///
/// Nothing is scanned until the first `advance`. After that the current token
/// is available through the typed accessors, and `peek` exposes exactly one
/// token of lookahead without moving the cursor.
pub struct Tokenizer<'a> {
    source: &'a str,
    path: PathBuf,
    cursor: Cursor,
    current: Option<Token>,
    lookahead: Option<(Token, Cursor)>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_path(source, Path::new("<source>"))
    }

    pub fn with_path(source: &'a str, path: &Path) -> Self {
        Self {
            source,
            path: path.to_path_buf(),
            cursor: Cursor::start(),
            current: None,
            lookahead: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn has_more_tokens(&self) -> bool {
        if self.lookahead.is_some() {
            return true;
        }
        match self.skip_trivia(self.cursor) {
            Ok(start) => start.offset < self.source.len(),
            // Let `advance` surface the error.
            Err(_) => true,
        }
    }

    /// Makes the next token current. Once the input is exhausted the current
    /// token becomes `None`.
    pub fn advance(&mut self) -> Result<(), LexingError> {
        let scanned = match self.lookahead.take() {
            Some(next) => Some(next),
            None => self.scan(self.cursor)?,
        };

        match scanned {
            Some((token, end)) => {
                self.current = Some(token);
                self.cursor = end;
            }
            None => {
                self.current = None;
                self.cursor = self.skip_trivia(self.cursor)?;
            }
        }
        Ok(())
    }

    pub fn peek(&mut self) -> Result<Option<&Token>, LexingError> {
        if self.lookahead.is_none() {
            self.lookahead = self.scan(self.cursor)?;
        }
        Ok(self.lookahead.as_ref().map(|(token, _)| token))
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn token_type(&self) -> Option<Kind> {
        self.current.as_ref().map(Token::kind)
    }

    pub fn keyword(&self) -> Result<Keyword, TokenKindMismatch> {
        match self.current.as_ref().map(Token::lexeme) {
            Some(Lexeme::Keyword(keyword)) => Ok(*keyword),
            _ => Err(self.mismatch(Kind::Keyword)),
        }
    }

    pub fn symbol(&self) -> Result<char, TokenKindMismatch> {
        match self.current.as_ref().map(Token::lexeme) {
            Some(Lexeme::Symbol(symbol)) => Ok(*symbol),
            _ => Err(self.mismatch(Kind::Symbol)),
        }
    }

    pub fn identifier(&self) -> Result<&str, TokenKindMismatch> {
        match self.current.as_ref().map(Token::lexeme) {
            Some(Lexeme::Identifier(name)) => Ok(name),
            _ => Err(self.mismatch(Kind::Identifier)),
        }
    }

    pub fn int_val(&self) -> Result<u16, TokenKindMismatch> {
        match self.current.as_ref().map(Token::lexeme) {
            Some(Lexeme::IntegerConstant(value)) => Ok(*value),
            _ => Err(self.mismatch(Kind::IntegerConstant)),
        }
    }

    pub fn string_val(&self) -> Result<&str, TokenKindMismatch> {
        match self.current.as_ref().map(Token::lexeme) {
            Some(Lexeme::StringConstant(value)) => Ok(value),
            _ => Err(self.mismatch(Kind::StringConstant)),
        }
    }

    fn mismatch(&self, expected: Kind) -> TokenKindMismatch {
        TokenKindMismatch::new(expected, self.current.as_ref())
    }

    fn error(&self, kind: LexingErrorKind, at: Cursor) -> LexingError {
        LexingError::new(self.path.clone(), kind, at.line, at.column)
    }

    fn skip_trivia(&self, from: Cursor) -> Result<Cursor, LexingError> {
        let mut cursor = from;
        loop {
            let rest = &self.source[cursor.offset..];
            if let Some(ch) = rest.chars().next().filter(|c| c.is_whitespace()) {
                cursor = cursor.step_over(ch.encode_utf8(&mut [0; 4]));
            } else if rest.starts_with("//") {
                let len = rest.find('\n').map_or(rest.len(), |i| i + 1);
                cursor = cursor.step_over(&rest[..len]);
            } else if rest.starts_with("/*") {
                // `/**` doc comments close the same way; `/*/` does not close.
                match rest[2..].find("*/") {
                    Some(i) => cursor = cursor.step_over(&rest[..i + 4]),
                    None => return Err(self.error(LexingErrorKind::UnterminatedComment, cursor)),
                }
            } else {
                return Ok(cursor);
            }
        }
    }

    fn scan(&self, from: Cursor) -> Result<Option<(Token, Cursor)>, LexingError> {
        let start = self.skip_trivia(from)?;
        let rest = &self.source[start.offset..];
        let ch = match rest.chars().next() {
            Some(ch) => ch,
            None => return Ok(None),
        };

        let (lexeme, len) = if SYMBOLS.contains(&ch) {
            (Lexeme::Symbol(ch), 1)
        } else if ch == '"' {
            let body = &rest[1..];
            match body.find(|c: char| c == '"' || c == '\n') {
                Some(i) if body[i..].starts_with('"') => {
                    (Lexeme::StringConstant(body[..i].to_string()), i + 2)
                }
                _ => return Err(self.error(LexingErrorKind::UnterminatedString, start)),
            }
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            let word = WORD.find(rest).map_or("", |m| m.as_str());
            (self.classify_word(word, start)?, word.len())
        } else {
            return Err(self.error(LexingErrorKind::UnrecognizedCharacter(ch), start));
        };

        let token = Token::new(lexeme, start.line, start.column);
        Ok(Some((token, start.step_over(&rest[..len]))))
    }

    fn classify_word(&self, word: &str, start: Cursor) -> Result<Lexeme, LexingError> {
        if word.starts_with(|c: char| c.is_ascii_digit()) {
            if !word.bytes().all(|b| b.is_ascii_digit()) {
                return Err(self.error(LexingErrorKind::MalformedInteger(word.to_string()), start));
            }
            return match word.parse::<u16>() {
                Ok(value) if value <= MAX_INTEGER => Ok(Lexeme::IntegerConstant(value)),
                _ => Err(self.error(LexingErrorKind::IntegerOutOfRange(word.to_string()), start)),
            };
        }

        Ok(match Keyword::lookup(word) {
            Some(keyword) => Lexeme::Keyword(keyword),
            None => Lexeme::Identifier(word.to_string()),
        })
    }
}

/// Tokenizes a whole compilation unit up front.
pub fn tokenize_all(source: &str) -> Result<Vec<Token>, LexingError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    while tokenizer.has_more_tokens() {
        tokenizer.advance()?;
        match tokenizer.current.take() {
            Some(token) => tokens.push(token),
            None => break,
        }
    }
    Ok(tokens)
}

/// Replaces every comment with a single space, leaving string constants intact.
pub fn strip_comments(source: &str) -> Result<String, LexingError> {
    let mut stripped = String::with_capacity(source.len());
    let mut cursor = Cursor::start();
    let tokenizer = Tokenizer::new(source);

    while cursor.offset < source.len() {
        let rest = &source[cursor.offset..];
        let len = if rest.starts_with("//") {
            stripped.push(' ');
            // The newline itself is kept.
            rest.find('\n').unwrap_or(rest.len())
        } else if rest.starts_with("/*") {
            let comment_len = match rest[2..].find("*/") {
                Some(i) => i + 4,
                None => return Err(tokenizer.error(LexingErrorKind::UnterminatedComment, cursor)),
            };
            stripped.push(' ');
            comment_len
        } else if rest.starts_with('"') {
            let len = rest[1..]
                .find(|c: char| c == '"' || c == '\n')
                .map_or(rest.len(), |i| i + 1 + usize::from(rest[1 + i..].starts_with('"')));
            stripped.push_str(&rest[..len]);
            len
        } else {
            let ch_len = rest.chars().next().map_or(1, char::len_utf8);
            stripped.push_str(&rest[..ch_len]);
            ch_len
        };
        cursor = cursor.step_over(&rest[..len]);
    }

    Ok(stripped)
}
