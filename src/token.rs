use serde::Serialize;
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub(crate) line: usize,
    pub(crate) position: usize,
    pub(crate) lexeme: Lexeme,
}

/// The five token classes of the language. Also the tag name of a terminal.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    Keyword,
    Symbol,
    Identifier,
    IntegerConstant,
    StringConstant,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Lexeme {
    Keyword(Keyword),
    Symbol(char),
    Identifier(String),
    IntegerConstant(u16),
    StringConstant(String),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

pub const SYMBOLS: &[char] = &[
    '{', '}', '(', ')', '[', ']', '.', ',', ';', '+', '-', '*', '/', '&', '|', '<', '>', '=', '~',
    '^', '#',
];

/// Binary operators accepted between terms of an expression.
pub const BINARY_OPERATORS: &[char] = &['+', '-', '*', '/', '&', '|', '<', '>', '='];

/// `^` and `#` are shift-left and shift-right.
pub const UNARY_OPERATORS: &[char] = &['-', '~', '^', '#'];

pub const MAX_INTEGER: u16 = 32767;

impl Keyword {
    pub const ALL: [Keyword; 21] = [
        Keyword::Class,
        Keyword::Constructor,
        Keyword::Function,
        Keyword::Method,
        Keyword::Field,
        Keyword::Static,
        Keyword::Var,
        Keyword::Int,
        Keyword::Char,
        Keyword::Boolean,
        Keyword::Void,
        Keyword::True,
        Keyword::False,
        Keyword::Null,
        Keyword::This,
        Keyword::Let,
        Keyword::Do,
        Keyword::If,
        Keyword::Else,
        Keyword::While,
        Keyword::Return,
    ];

    pub fn lookup(word: &str) -> Option<Keyword> {
        match word {
            "class" => Some(Keyword::Class),
            "constructor" => Some(Keyword::Constructor),
            "function" => Some(Keyword::Function),
            "method" => Some(Keyword::Method),
            "field" => Some(Keyword::Field),
            "static" => Some(Keyword::Static),
            "var" => Some(Keyword::Var),
            "int" => Some(Keyword::Int),
            "char" => Some(Keyword::Char),
            "boolean" => Some(Keyword::Boolean),
            "void" => Some(Keyword::Void),
            "true" => Some(Keyword::True),
            "false" => Some(Keyword::False),
            "null" => Some(Keyword::Null),
            "this" => Some(Keyword::This),
            "let" => Some(Keyword::Let),
            "do" => Some(Keyword::Do),
            "if" => Some(Keyword::If),
            "else" => Some(Keyword::Else),
            "while" => Some(Keyword::While),
            "return" => Some(Keyword::Return),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Constructor => "constructor",
            Keyword::Function => "function",
            Keyword::Method => "method",
            Keyword::Field => "field",
            Keyword::Static => "static",
            Keyword::Var => "var",
            Keyword::Int => "int",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::Void => "void",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
            Keyword::Let => "let",
            Keyword::Do => "do",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Kind {
    pub fn tag_name(&self) -> &'static str {
        match self {
            Kind::Keyword => "keyword",
            Kind::Symbol => "symbol",
            Kind::Identifier => "identifier",
            Kind::IntegerConstant => "integerConstant",
            Kind::StringConstant => "stringConstant",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

impl Lexeme {
    pub fn kind(&self) -> Kind {
        match self {
            Lexeme::Keyword(_) => Kind::Keyword,
            Lexeme::Symbol(_) => Kind::Symbol,
            Lexeme::Identifier(_) => Kind::Identifier,
            Lexeme::IntegerConstant(_) => Kind::IntegerConstant,
            Lexeme::StringConstant(_) => Kind::StringConstant,
        }
    }
}

impl Token {
    pub fn new(lexeme: Lexeme, line: usize, position: usize) -> Self {
        Self {
            line,
            position,
            lexeme,
        }
    }

    pub fn kind(&self) -> Kind {
        self.lexeme.kind()
    }

    pub fn lexeme(&self) -> &Lexeme {
        &self.lexeme
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The literal lexeme, or the decoded value for constants.
    pub fn text(&self) -> String {
        match &self.lexeme {
            Lexeme::Keyword(keyword) => keyword.as_str().to_string(),
            Lexeme::Symbol(symbol) => symbol.to_string(),
            Lexeme::Identifier(name) => name.clone(),
            Lexeme::IntegerConstant(value) => value.to_string(),
            Lexeme::StringConstant(value) => value.clone(),
        }
    }

    pub fn is_symbol(&self, symbol: char) -> bool {
        self.lexeme == Lexeme::Symbol(symbol)
    }

    pub fn is_keyword_in(&self, keywords: &[Keyword]) -> bool {
        matches!(self.lexeme, Lexeme::Keyword(keyword) if keywords.contains(&keyword))
    }

    pub fn is_symbol_in(&self, symbols: &[char]) -> bool {
        matches!(self.lexeme, Lexeme::Symbol(symbol) if symbols.contains(&symbol))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.lexeme {
            Lexeme::StringConstant(value) => write!(f, "\"{}\"", value),
            _ => f.write_str(&self.text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_round_trips() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::lookup(keyword.as_str()), Some(keyword));
        }
        assert_eq!(Keyword::lookup("Class"), None);
        assert_eq!(Keyword::lookup("classy"), None);
    }

    #[test]
    fn operator_sets_are_symbols() {
        for op in BINARY_OPERATORS.iter().chain(UNARY_OPERATORS) {
            assert!(SYMBOLS.contains(op), "{} is not a symbol", op);
        }
    }

    #[test]
    fn string_constants_display_quoted() {
        let token = Token::new(Lexeme::StringConstant("hi there".to_string()), 1, 1);
        assert_eq!(token.to_string(), "\"hi there\"");
        assert_eq!(token.text(), "hi there");
        assert_eq!(token.kind().tag_name(), "stringConstant");
    }
}
