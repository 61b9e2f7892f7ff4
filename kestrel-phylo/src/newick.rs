//! Newick format parser and writer.
//!
//! Supports the standard Newick grammar:
//! ```text
//! tree     = subtree ';'
//! subtree  = '(' children ')' label | label
//! children = subtree (',' subtree)*
//! label    = name? (':' length)?
//! ```
//! Only whitespace may follow the `;`.

use std::fmt::Write;

use kestrel_core::{KestrelError, Result};

use crate::tree::{Node, NodeId, PhyloTree};

/// Parse a Newick format string into a `PhyloTree`.
///
/// # Errors
///
/// Returns [`KestrelError::Parse`] for a missing `;`, unbalanced
/// parentheses, a bad branch length or text after the `;`.
pub fn parse(input: &str) -> Result<PhyloTree> {
    let mut parser = Parser::new(input.as_bytes());
    let (nodes, root) = parser.parse_tree()?;
    PhyloTree::from_nodes(nodes, root)
}

/// Serialize a `PhyloTree` to a Newick format string.
pub fn write(tree: &PhyloTree) -> String {
    let mut buf = String::new();
    write_subtree(tree.nodes(), tree.root(), &mut buf);
    buf.push(';');
    buf
}

fn write_subtree(nodes: &[Node], id: NodeId, buf: &mut String) {
    let node = &nodes[id];
    if !node.children.is_empty() {
        buf.push('(');
        for (i, &child) in node.children.iter().enumerate() {
            if i > 0 {
                buf.push(',');
            }
            write_subtree(nodes, child, buf);
        }
        buf.push(')');
    }
    write_label(node, buf);
}

/// Append `name:length` for one node. Lengths use the shortest text that
/// parses back to the same value.
pub(crate) fn write_label(node: &Node, buf: &mut String) {
    if let Some(ref name) = node.name {
        buf.push_str(name);
    }
    if let Some(len) = node.branch_length {
        let _ = write!(buf, ":{}", len);
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    nodes: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            nodes: Vec::new(),
        }
    }

    fn parse_tree(&mut self) -> Result<(Vec<Node>, NodeId)> {
        let root = self.parse_subtree(None)?;
        self.skip_whitespace();
        match self.peek() {
            Some(b';') => self.pos += 1,
            Some(c) => {
                return Err(KestrelError::Parse(format!(
                    "unexpected '{}' at byte {}",
                    c.escape_ascii(),
                    self.pos
                )))
            }
            None => return Err(KestrelError::Parse("expected ';' at end of Newick string".into())),
        }
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(KestrelError::Parse(format!(
                "trailing text after ';' at byte {}",
                self.pos
            )));
        }
        Ok((std::mem::take(&mut self.nodes), root))
    }

    fn parse_subtree(&mut self, parent: Option<NodeId>) -> Result<NodeId> {
        self.skip_whitespace();
        let id = self.nodes.len();
        self.nodes.push(Node::new(id, parent));

        if self.peek() == Some(b'(') {
            self.pos += 1;
            loop {
                let child = self.parse_subtree(Some(id))?;
                self.nodes[id].children.push(child);
                self.skip_whitespace();
                match self.peek() {
                    Some(b',') => self.pos += 1,
                    Some(b')') => {
                        self.pos += 1;
                        break;
                    }
                    Some(c) => {
                        return Err(KestrelError::Parse(format!(
                            "unexpected '{}' at byte {}",
                            c.escape_ascii(),
                            self.pos
                        )))
                    }
                    None => return Err(KestrelError::Parse("unclosed '(' in Newick string".into())),
                }
            }
        }

        self.parse_label(id)?;
        Ok(id)
    }

    fn parse_label(&mut self, id: NodeId) -> Result<()> {
        self.skip_whitespace();
        let name = self.take_while(|b| !matches!(b, b':' | b',' | b')' | b'(' | b';') && !b.is_ascii_whitespace());
        if !name.is_empty() {
            self.nodes[id].name = Some(name);
        }
        self.skip_whitespace();
        if self.peek() == Some(b':') {
            self.pos += 1;
            self.skip_whitespace();
            let len_str = self.take_while(|b| matches!(b, b'0'..=b'9' | b'.' | b'-' | b'+' | b'e' | b'E'));
            if len_str.is_empty() {
                return Err(KestrelError::Parse("expected number after ':'".into()));
            }
            let len: f64 = len_str
                .parse()
                .map_err(|_| KestrelError::Parse(format!("invalid branch length: '{}'", len_str)))?;
            self.nodes[id].branch_length = Some(len);
        }
        Ok(())
    }

    fn take_while(&mut self, keep: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        while self.pos < self.input.len() && keep(self.input[self.pos]) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cherry() {
        let t = parse("(mouse,rat);").unwrap();
        assert_eq!((t.node_count(), t.leaf_count()), (3, 2));
        assert_eq!(t.leaf_names(), vec!["mouse", "rat"]);
    }

    #[test]
    fn parse_with_branch_lengths() {
        let t = parse("(mouse:7.25,rat:3):0;").unwrap();
        assert_eq!(t.get_node(t.root()).unwrap().branch_length, Some(0.0));
        let lengths: Vec<Option<f64>> = t.nodes().iter().map(|n| n.branch_length).collect();
        assert_eq!(lengths, vec![Some(0.0), Some(7.25), Some(3.0)]);
    }

    #[test]
    fn parse_internal_names_and_fan_out() {
        let tree = parse("((A,B,C)ABC,(D,E)DE,F)root;").unwrap();
        let root = tree.get_node(tree.root()).unwrap();
        assert_eq!(root.name.as_deref(), Some("root"));
        assert_eq!(root.children.len(), 3);
        assert_eq!(tree.leaf_count(), 6);
    }

    #[test]
    fn parse_unnamed_nodes() {
        let tree = parse("(,(,));").unwrap();
        assert_eq!(tree.node_count(), 5);
        assert!(tree.leaf_names().is_empty());
    }

    #[test]
    fn parse_single_leaf() {
        let t = parse("orphan:2.5;").unwrap();
        assert_eq!(t.node_count(), 1);
        let only = t.get_node(0).unwrap();
        assert_eq!((only.name.as_deref(), only.branch_length), (Some("orphan"), Some(2.5)));
    }

    #[test]
    fn parse_whitespace() {
        let tree = parse("  ( A : 0.1 , B : 0.2 ) ; \n").unwrap();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn parse_errors() {
        for bad in ["((A,B);", "(A,B)", "(A:abc,B);", "(A,B);C", "(A,B));", "(A B);", ""] {
            assert!(
                matches!(parse(bad), Err(KestrelError::Parse(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn write_canonical_form() {
        let input = "((A,B),(C,D));";
        assert_eq!(write(&parse(input).unwrap()), input);
        let input = "((A:0.1,B:2)AB:0.3,C:4e-7)r;";
        assert_eq!(write(&parse(input).unwrap()), "((A:0.1,B:2)AB:0.3,C:0.0000004)r;");
    }

    #[test]
    fn lengths_survive_rewrite() {
        let t = parse("(b:6.166666666666667,(a:7,(c:5,d:5):2):1.1666666666666667);").unwrap();
        assert_eq!(parse(&write(&t)).unwrap(), t);
    }
}
