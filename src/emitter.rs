use crate::error::CompilerError;
use crate::lexer::Tokenizer;
use crate::token::Token;
use std::io::{self, Write};

/// Receives the parse as a flat stream of open, close and terminal events.
pub trait ElementSink {
    fn open(&mut self, rule: &'static str) -> io::Result<()>;
    fn close(&mut self, rule: &'static str) -> io::Result<()>;
    fn terminal(&mut self, token: &Token) -> io::Result<()>;
}

impl<S: ElementSink + ?Sized> ElementSink for &mut S {
    fn open(&mut self, rule: &'static str) -> io::Result<()> {
        (**self).open(rule)
    }

    fn close(&mut self, rule: &'static str) -> io::Result<()> {
        (**self).close(rule)
    }

    fn terminal(&mut self, token: &Token) -> io::Result<()> {
        (**self).terminal(token)
    }
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Writes one line per event, indenting each nesting level by `indent` spaces.
pub struct XmlWriter<W: Write> {
    out: W,
    indent: usize,
    depth: usize,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(out: W, indent: usize) -> Self {
        Self {
            out,
            indent,
            depth: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn pad(&mut self) -> io::Result<()> {
        write!(self.out, "{:width$}", "", width = self.depth * self.indent)
    }
}

impl<W: Write> ElementSink for XmlWriter<W> {
    fn open(&mut self, rule: &'static str) -> io::Result<()> {
        self.pad()?;
        writeln!(self.out, "<{}>", rule)?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, rule: &'static str) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.pad()?;
        writeln!(self.out, "</{}>", rule)
    }

    fn terminal(&mut self, token: &Token) -> io::Result<()> {
        self.pad()?;
        let tag = token.kind().tag_name();
        writeln!(self.out, "<{}> {} </{}>", tag, escape(&token.text()), tag)
    }
}

/// Writes the flat token listing, wrapped in a single `tokens` element.
pub fn write_token_stream<W: Write>(
    tokenizer: &mut Tokenizer,
    out: W,
    indent: usize,
) -> Result<W, CompilerError> {
    let mut writer = XmlWriter::new(out, indent);
    writer.open("tokens")?;
    while tokenizer.has_more_tokens() {
        tokenizer.advance()?;
        if let Some(token) = tokenizer.current() {
            writer.terminal(token)?;
        }
    }
    writer.close("tokens")?;
    Ok(writer.into_inner())
}
