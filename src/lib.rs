//! Syntax analyzer for the Jack teaching language.
//!
//! Source text is split into tokens by [`lexer::Tokenizer`] and parsed by
//! [`parser::Parser`], which streams one element per grammar rule and per
//! token into an [`emitter::ElementSink`].

pub mod config;
pub mod driver;
pub mod emitter;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod syntax;
pub mod token;

use crate::emitter::XmlWriter;
use crate::error::CompilerError;
use crate::lexer::Tokenizer;
use crate::parser::Parser;
use crate::syntax::{SyntaxElement, TreeBuilder};

/// Parses a class and renders it as the tagged XML stream.
pub fn parse_to_xml(source: &str, indent: usize) -> Result<String, CompilerError> {
    let mut parser = Parser::new(Tokenizer::new(source), XmlWriter::new(Vec::new(), indent));
    parser.compile_class()?;
    let bytes = parser.into_sink().into_inner();
    // The writer only ever receives UTF-8 text.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parses a class into a materialized syntax tree.
pub fn parse_tree(source: &str) -> Result<SyntaxElement, CompilerError> {
    let mut parser = Parser::new(Tokenizer::new(source), TreeBuilder::new());
    parser.compile_class()?;
    parser
        .into_sink()
        .finish()
        .ok_or_else(|| CompilerError::Config("incomplete syntax tree".to_string()))
}
