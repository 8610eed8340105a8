use crate::emitter::ElementSink;
use crate::token::{Kind, Token};
use serde::Serialize;
use std::io;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SyntaxElement {
    NonTerminal {
        name: &'static str,
        children: Vec<SyntaxElement>,
    },
    Terminal {
        kind: Kind,
        text: String,
    },
}

impl SyntaxElement {
    /// The terminal leaves, in document order.
    pub fn terminals(&self) -> Vec<(Kind, &str)> {
        let mut leaves = Vec::new();
        self.collect_terminals(&mut leaves);
        leaves
    }

    fn collect_terminals<'a>(&'a self, leaves: &mut Vec<(Kind, &'a str)>) {
        match self {
            SyntaxElement::Terminal { kind, text } => leaves.push((*kind, text.as_str())),
            SyntaxElement::NonTerminal { children, .. } => {
                for child in children {
                    child.collect_terminals(leaves);
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SyntaxElement::NonTerminal { name, .. } => *name,
            SyntaxElement::Terminal { kind, .. } => kind.tag_name(),
        }
    }

    pub fn children(&self) -> &[SyntaxElement] {
        match self {
            SyntaxElement::NonTerminal { children, .. } => children.as_slice(),
            SyntaxElement::Terminal { .. } => &[],
        }
    }

    /// Depth-first search for the first non-terminal with the given name.
    pub fn find(&self, rule: &str) -> Option<&SyntaxElement> {
        if matches!(self, SyntaxElement::NonTerminal { name, .. } if *name == rule) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(rule))
    }
}

/// Sink that materializes the stream as a tree.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<(&'static str, Vec<SyntaxElement>)>,
    roots: Vec<SyntaxElement>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the single completed root, or `None` while elements are still open.
    pub fn finish(mut self) -> Option<SyntaxElement> {
        if !self.stack.is_empty() || self.roots.len() != 1 {
            return None;
        }
        self.roots.pop()
    }

    fn push(&mut self, element: SyntaxElement) {
        match self.stack.last_mut() {
            Some((_, children)) => children.push(element),
            None => self.roots.push(element),
        }
    }
}

impl ElementSink for TreeBuilder {
    fn open(&mut self, rule: &'static str) -> io::Result<()> {
        self.stack.push((rule, Vec::new()));
        Ok(())
    }

    fn close(&mut self, rule: &'static str) -> io::Result<()> {
        match self.stack.pop() {
            Some((name, children)) if name == rule => {
                self.push(SyntaxElement::NonTerminal { name, children });
                Ok(())
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("close of {} does not match the open element", rule),
            )),
        }
    }

    fn terminal(&mut self, token: &Token) -> io::Result<()> {
        self.push(SyntaxElement::Terminal {
            kind: token.kind(),
            text: token.text(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Keyword, Lexeme};

    #[test]
    fn builds_nested_tree() {
        let mut builder = TreeBuilder::new();
        builder.open("class").unwrap();
        builder
            .terminal(&Token::new(Lexeme::Keyword(Keyword::Class), 1, 1))
            .unwrap();
        builder.open("classVarDec").unwrap();
        builder.close("classVarDec").unwrap();
        builder.close("class").unwrap();

        let tree = builder.finish().unwrap();
        assert_eq!(tree.name(), "class");
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.terminals(), vec![(Kind::Keyword, "class")]);
        assert!(tree.find("classVarDec").is_some());
    }

    #[test]
    fn mismatched_close_is_rejected() {
        let mut builder = TreeBuilder::new();
        builder.open("term").unwrap();
        assert!(builder.close("expression").is_err());
    }

    #[test]
    fn unfinished_tree_has_no_root() {
        let mut builder = TreeBuilder::new();
        builder.open("class").unwrap();
        assert!(builder.finish().is_none());
    }

    #[test]
    fn serializes_as_json() {
        let tree = SyntaxElement::NonTerminal {
            name: "term",
            children: vec![SyntaxElement::Terminal {
                kind: Kind::IntegerConstant,
                text: "5".to_string(),
            }],
        };
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(
            json,
            r#"{"name":"term","children":[{"kind":"integerConstant","text":"5"}]}"#
        );
    }
}
