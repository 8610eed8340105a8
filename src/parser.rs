use crate::emitter::ElementSink;
use crate::error::{CompilerError, LexingError, SyntaxError};
use crate::lexer::Tokenizer;
use crate::token::{Keyword, Lexeme, BINARY_OPERATORS, UNARY_OPERATORS};

const CLASS_VAR_KEYWORDS: &[Keyword] = &[Keyword::Static, Keyword::Field];
const SUBROUTINE_KEYWORDS: &[Keyword] = &[Keyword::Constructor, Keyword::Function, Keyword::Method];
const PRIMITIVE_TYPES: &[Keyword] = &[Keyword::Int, Keyword::Char, Keyword::Boolean];
const STATEMENT_KEYWORDS: &[Keyword] = &[
    Keyword::Let,
    Keyword::If,
    Keyword::While,
    Keyword::Do,
    Keyword::Return,
];
const KEYWORD_CONSTANTS: &[Keyword] = &[Keyword::True, Keyword::False, Keyword::Null, Keyword::This];

type ParseResult = Result<(), CompilerError>;

/// Recursive-descent parser for one class. Every grammar rule is a method;
/// rules that own a tag open it on entry and close it on exit, and every
/// consumed token is forwarded to the sink before the tokenizer advances.
pub struct Parser<'a, S: ElementSink> {
    tokenizer: Tokenizer<'a>,
    sink: S,
}

impl<'a, S: ElementSink> Parser<'a, S> {
    pub fn new(tokenizer: Tokenizer<'a>, sink: S) -> Self {
        Self { tokenizer, sink }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Parses the whole compilation unit. Fails if the input is empty or if
    /// anything follows the closing brace of the class.
    pub fn compile_class(&mut self) -> ParseResult {
        if self.tokenizer.current().is_none() {
            if !self.tokenizer.has_more_tokens() {
                return Err(self.unexpected("class", "expected a class declaration"));
            }
            self.tokenizer.advance()?;
        }

        self.parse_class()?;

        if self.tokenizer.current().is_some() {
            return Err(self.unexpected("class", "expected end of input after the class"));
        }
        Ok(())
    }

    fn parse_class(&mut self) -> ParseResult {
        const RULE: &str = "class";
        self.sink.open(RULE)?;
        self.expect_keyword(RULE, &[Keyword::Class])?;
        self.expect_identifier(RULE)?;
        self.expect_symbol(RULE, '{')?;

        while self.at_keyword(CLASS_VAR_KEYWORDS) {
            self.parse_class_var_dec()?;
        }
        while self.at_keyword(SUBROUTINE_KEYWORDS) {
            self.parse_subroutine_dec()?;
        }

        self.expect_symbol(RULE, '}')?;
        self.sink.close(RULE)?;
        Ok(())
    }

    fn parse_class_var_dec(&mut self) -> ParseResult {
        const RULE: &str = "classVarDec";
        self.sink.open(RULE)?;
        self.expect_keyword(RULE, CLASS_VAR_KEYWORDS)?;
        self.parse_type()?;
        self.expect_identifier(RULE)?;
        while self.at_symbol(',') {
            self.emit(RULE)?;
            self.expect_identifier(RULE)?;
        }
        self.expect_symbol(RULE, ';')?;
        self.sink.close(RULE)?;
        Ok(())
    }

    // `type` has no tag of its own.
    fn parse_type(&mut self) -> ParseResult {
        let is_type = self.tokenizer.current().map_or(false, |token| {
            token.is_keyword_in(PRIMITIVE_TYPES) || matches!(token.lexeme(), Lexeme::Identifier(_))
        });
        if !is_type {
            return Err(self.unexpected("type", "expected int, char, boolean or a class name"));
        }
        self.emit("type")
    }

    fn parse_subroutine_dec(&mut self) -> ParseResult {
        const RULE: &str = "subroutineDec";
        self.sink.open(RULE)?;
        self.expect_keyword(RULE, SUBROUTINE_KEYWORDS)?;
        if self.at_keyword(&[Keyword::Void]) {
            self.emit(RULE)?;
        } else {
            self.parse_type()?;
        }
        self.expect_identifier(RULE)?;
        self.expect_symbol(RULE, '(')?;
        self.parse_parameter_list()?;
        self.expect_symbol(RULE, ')')?;
        self.parse_subroutine_body()?;
        self.sink.close(RULE)?;
        Ok(())
    }

    fn parse_parameter_list(&mut self) -> ParseResult {
        const RULE: &str = "parameterList";
        self.sink.open(RULE)?;
        if !self.at_symbol(')') {
            self.parse_type()?;
            self.expect_identifier(RULE)?;
            while self.at_symbol(',') {
                self.emit(RULE)?;
                self.parse_type()?;
                self.expect_identifier(RULE)?;
            }
        }
        self.sink.close(RULE)?;
        Ok(())
    }

    fn parse_subroutine_body(&mut self) -> ParseResult {
        const RULE: &str = "subroutineBody";
        self.sink.open(RULE)?;
        self.expect_symbol(RULE, '{')?;
        while self.at_keyword(&[Keyword::Var]) {
            self.parse_var_dec()?;
        }
        self.parse_statements()?;
        self.expect_symbol(RULE, '}')?;
        self.sink.close(RULE)?;
        Ok(())
    }

    fn parse_var_dec(&mut self) -> ParseResult {
        const RULE: &str = "varDec";
        self.sink.open(RULE)?;
        self.expect_keyword(RULE, &[Keyword::Var])?;
        self.parse_type()?;
        self.expect_identifier(RULE)?;
        while self.at_symbol(',') {
            self.emit(RULE)?;
            self.expect_identifier(RULE)?;
        }
        self.expect_symbol(RULE, ';')?;
        self.sink.close(RULE)?;
        Ok(())
    }

    fn parse_statements(&mut self) -> ParseResult {
        const RULE: &str = "statements";
        self.sink.open(RULE)?;
        while self.at_keyword(STATEMENT_KEYWORDS) {
            self.parse_statement()?;
        }
        self.sink.close(RULE)?;
        Ok(())
    }

    fn parse_statement(&mut self) -> ParseResult {
        match self.tokenizer.keyword()? {
            Keyword::Let => self.parse_let(),
            Keyword::If => self.parse_if(),
            Keyword::While => self.parse_while(),
            Keyword::Do => self.parse_do(),
            Keyword::Return => self.parse_return(),
            _ => Err(self.unexpected("statement", "expected let, if, while, do or return")),
        }
    }

    fn parse_let(&mut self) -> ParseResult {
        const RULE: &str = "letStatement";
        self.sink.open(RULE)?;
        self.expect_keyword(RULE, &[Keyword::Let])?;
        self.expect_identifier(RULE)?;
        if self.at_symbol('[') {
            self.emit(RULE)?;
            self.parse_expression()?;
            self.expect_symbol(RULE, ']')?;
        }
        self.expect_symbol(RULE, '=')?;
        self.parse_expression()?;
        self.expect_symbol(RULE, ';')?;
        self.sink.close(RULE)?;
        Ok(())
    }

    fn parse_if(&mut self) -> ParseResult {
        const RULE: &str = "ifStatement";
        self.sink.open(RULE)?;
        self.expect_keyword(RULE, &[Keyword::If])?;
        self.parse_condition(RULE)?;
        self.parse_block(RULE)?;
        if self.at_keyword(&[Keyword::Else]) {
            self.emit(RULE)?;
            self.parse_block(RULE)?;
        }
        self.sink.close(RULE)?;
        Ok(())
    }

    fn parse_while(&mut self) -> ParseResult {
        const RULE: &str = "whileStatement";
        self.sink.open(RULE)?;
        self.expect_keyword(RULE, &[Keyword::While])?;
        self.parse_condition(RULE)?;
        self.parse_block(RULE)?;
        self.sink.close(RULE)?;
        Ok(())
    }

    /// `'(' expression ')'`
    fn parse_condition(&mut self, rule: &'static str) -> ParseResult {
        self.expect_symbol(rule, '(')?;
        self.parse_expression()?;
        self.expect_symbol(rule, ')')
    }

    /// `'{' statements '}'`
    fn parse_block(&mut self, rule: &'static str) -> ParseResult {
        self.expect_symbol(rule, '{')?;
        self.parse_statements()?;
        self.expect_symbol(rule, '}')
    }

    fn parse_do(&mut self) -> ParseResult {
        const RULE: &str = "doStatement";
        self.sink.open(RULE)?;
        self.expect_keyword(RULE, &[Keyword::Do])?;
        self.parse_subroutine_call()?;
        self.expect_symbol(RULE, ';')?;
        self.sink.close(RULE)?;
        Ok(())
    }

    fn parse_return(&mut self) -> ParseResult {
        const RULE: &str = "returnStatement";
        self.sink.open(RULE)?;
        self.expect_keyword(RULE, &[Keyword::Return])?;
        if !self.at_symbol(';') {
            self.parse_expression()?;
        }
        self.expect_symbol(RULE, ';')?;
        self.sink.close(RULE)?;
        Ok(())
    }

    fn parse_expression(&mut self) -> ParseResult {
        const RULE: &str = "expression";
        self.sink.open(RULE)?;
        self.parse_term()?;
        while self.at_symbol_in(BINARY_OPERATORS) {
            self.emit(RULE)?;
            self.parse_term()?;
        }
        self.sink.close(RULE)?;
        Ok(())
    }

    /// An identifier needs one token of lookahead: `[` is an array access,
    /// `(` or `.` a subroutine call, anything else a plain variable. In the
    /// last case the lookahead token belongs to the enclosing rule.
    fn parse_term(&mut self) -> ParseResult {
        const RULE: &str = "term";
        let lexeme = match self.tokenizer.current() {
            Some(token) => token.lexeme().clone(),
            None => return Err(self.unexpected(RULE, "expected a term")),
        };

        self.sink.open(RULE)?;
        match lexeme {
            Lexeme::IntegerConstant(_) | Lexeme::StringConstant(_) => self.emit(RULE)?,
            Lexeme::Keyword(keyword) if KEYWORD_CONSTANTS.contains(&keyword) => self.emit(RULE)?,
            Lexeme::Identifier(_) => match self.peek_symbol()? {
                Some('[') => {
                    self.emit(RULE)?;
                    self.expect_symbol(RULE, '[')?;
                    self.parse_expression()?;
                    self.expect_symbol(RULE, ']')?;
                }
                Some('(') | Some('.') => self.parse_subroutine_call()?,
                _ => self.emit(RULE)?,
            },
            Lexeme::Symbol('(') => {
                self.emit(RULE)?;
                self.parse_expression()?;
                self.expect_symbol(RULE, ')')?;
            }
            Lexeme::Symbol(op) if UNARY_OPERATORS.contains(&op) => {
                self.emit(RULE)?;
                self.parse_term()?;
            }
            _ => return Err(self.unexpected(RULE, "expected a term")),
        }
        self.sink.close(RULE)?;
        Ok(())
    }

    // Inlined into the enclosing element; there is no `subroutineCall` tag.
    fn parse_subroutine_call(&mut self) -> ParseResult {
        const RULE: &str = "subroutineCall";
        self.expect_identifier(RULE)?;
        if self.at_symbol('.') {
            self.emit(RULE)?;
            self.expect_identifier(RULE)?;
        } else if !self.at_symbol('(') {
            return Err(self.unexpected(RULE, "expected ( or ."));
        }
        self.expect_symbol(RULE, '(')?;
        self.parse_expression_list()?;
        self.expect_symbol(RULE, ')')
    }

    fn parse_expression_list(&mut self) -> ParseResult {
        const RULE: &str = "expressionList";
        self.sink.open(RULE)?;
        if !self.at_symbol(')') {
            self.parse_expression()?;
            while self.at_symbol(',') {
                self.emit(RULE)?;
                self.parse_expression()?;
            }
        }
        self.sink.close(RULE)?;
        Ok(())
    }

    /// Writes the current token and advances.
    fn emit(&mut self, rule: &'static str) -> ParseResult {
        match self.tokenizer.current() {
            Some(token) => self.sink.terminal(token)?,
            None => return Err(self.unexpected(rule, "unexpected end of input")),
        }
        self.tokenizer.advance()?;
        Ok(())
    }

    fn expect_keyword(&mut self, rule: &'static str, keywords: &[Keyword]) -> ParseResult {
        if !self.at_keyword(keywords) {
            let names: Vec<&str> = keywords.iter().map(Keyword::as_str).collect();
            return Err(self.unexpected(rule, &format!("expected {}", names.join(" or "))));
        }
        self.emit(rule)
    }

    fn expect_symbol(&mut self, rule: &'static str, symbol: char) -> ParseResult {
        if !self.at_symbol(symbol) {
            return Err(self.unexpected(rule, &format!("expected {}", symbol)));
        }
        self.emit(rule)
    }

    fn expect_identifier(&mut self, rule: &'static str) -> ParseResult {
        if self.tokenizer.identifier().is_err() {
            return Err(self.unexpected(rule, "expected an identifier"));
        }
        self.emit(rule)
    }

    fn at_keyword(&self, keywords: &[Keyword]) -> bool {
        self.tokenizer
            .current()
            .map_or(false, |token| token.is_keyword_in(keywords))
    }

    fn at_symbol(&self, symbol: char) -> bool {
        self.tokenizer
            .current()
            .map_or(false, |token| token.is_symbol(symbol))
    }

    fn at_symbol_in(&self, symbols: &[char]) -> bool {
        self.tokenizer
            .current()
            .map_or(false, |token| token.is_symbol_in(symbols))
    }

    fn peek_symbol(&mut self) -> Result<Option<char>, LexingError> {
        Ok(self.tokenizer.peek()?.and_then(|token| match token.lexeme() {
            Lexeme::Symbol(symbol) => Some(*symbol),
            _ => None,
        }))
    }

    fn unexpected(&self, rule: &'static str, message: &str) -> CompilerError {
        let path = self.tokenizer.path().to_path_buf();
        let error = match self.tokenizer.current() {
            Some(token) => SyntaxError::from_token(path, rule, token, message.to_string()),
            None => SyntaxError::at_end(
                path,
                rule,
                self.tokenizer.cursor().line,
                message.to_string(),
            ),
        };
        CompilerError::Syntax(error)
    }
}
