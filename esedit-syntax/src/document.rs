//! The editable document: an arena of nodes plus the verbatim text around them.

use std::fmt;

use crate::import::ImportDecl;
use crate::node::{Node, NodeId, Property, SeqItem, Spread};
use crate::parser::{self, Region};
use crate::trivia;

/// State of the module's `export default` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultExport {
    Missing,
    Array(NodeId),
    /// A default export exists but its value is not a bare array literal.
    Other,
}

/// Handle to an import declaration. Invalidated by inserting or removing imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportId(usize);

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Import(ImportDecl),
    Expr(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
    segments: Vec<Segment>,
    default_export: DefaultExport,
    syntax_error: Option<String>,
}

impl Document {
    /// Parses `src`. Parsing never fails: anything outside the recognized
    /// subset is kept as text, so printing an untouched document yields `src`.
    /// A module with syntax errors is kept whole as text and reports
    /// [`syntax_error`](Self::syntax_error).
    pub fn parse(src: &str) -> Self {
        let mut nodes = Vec::new();
        let top = parser::parse_module(src, &mut nodes);

        let mut segments = Vec::new();
        let mut default_export = if top.other_default_export {
            DefaultExport::Other
        } else {
            DefaultExport::Missing
        };
        let mut cursor = 0;
        for (start, end, region) in top.regions {
            if start > cursor {
                segments.push(Segment::Text(src[cursor..start].to_string()));
            }
            segments.push(match region {
                Region::Import(decl) => Segment::Import(decl),
                Region::DefaultExportArray(node) => {
                    default_export = DefaultExport::Array(node);
                    Segment::Expr(node)
                }
            });
            cursor = end;
        }
        if cursor < src.len() {
            segments.push(Segment::Text(src[cursor..].to_string()));
        }

        Self {
            nodes,
            segments,
            default_export,
            syntax_error: top.error,
        }
    }

    /// The parser's first diagnostic when the source is not a valid module.
    pub fn syntax_error(&self) -> Option<&str> {
        self.syntax_error.as_deref()
    }

    pub fn default_export(&self) -> DefaultExport {
        self.default_export
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Parses `text` as one expression into this document's arena.
    ///
    /// The node is detached until it is placed with [`push_item`](Self::push_item)
    /// or [`set_property_value`](Self::set_property_value).
    pub fn parse_expression(&mut self, text: &str) -> NodeId {
        parser::parse_expression(text, &mut self.nodes)
    }

    /// Allocates a detached `key: value` property.
    pub fn new_property(&mut self, key: impl Into<String>, value: NodeId) -> NodeId {
        self.alloc(Node::Property(Property {
            key: key.into(),
            sep: ": ".to_string(),
            value,
        }))
    }

    /// Allocates a detached `...expr` spread.
    pub fn new_spread(&mut self, expr: &str) -> NodeId {
        let argument = self.parse_expression(expr);
        self.alloc(Node::Spread(Spread {
            gap: String::new(),
            argument,
        }))
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Items of an array or object literal. Empty for any other node.
    pub fn items(&self, seq: NodeId) -> &[SeqItem] {
        self.node(seq).as_seq().map_or(&[], |s| s.items.as_slice())
    }

    /// Index and id of the property of `object` named `name`.
    ///
    /// The key is looked up as written bare, then single-quoted, then
    /// double-quoted; the first spelling with a match wins.
    pub fn find_property(&self, object: NodeId, name: &str) -> Option<(usize, NodeId)> {
        let spellings = [name.to_string(), format!("'{name}'"), format!("\"{name}\"")];
        spellings.iter().find_map(|key| {
            self.items(object).iter().enumerate().find_map(|(i, item)| {
                self.node(item.node)
                    .as_property()
                    .filter(|p| p.key == *key)
                    .map(|_| (i, item.node))
            })
        })
    }

    /// Index of the first spread in `seq` whose argument text equals `expr`.
    pub fn find_spread(&self, seq: NodeId, expr: &str) -> Option<usize> {
        self.items(seq).iter().position(|item| {
            self.node(item.node)
                .as_spread()
                .is_some_and(|s| self.render(s.argument).trim() == expr.trim())
        })
    }

    /// Appends `node` to an array or object literal, copying the layout of its neighbours.
    pub fn push_item(&mut self, seq: NodeId, node: NodeId) {
        if let Some(seq) = self.nodes[seq.0].as_seq_mut() {
            seq.push(node);
        }
    }

    /// Appends `node` to an object literal. Empty single-line objects become `{ node }`.
    pub fn push_member(&mut self, object: NodeId, node: NodeId) {
        if let Some(seq) = self.nodes[object.0].as_seq_mut() {
            seq.push_spaced(node);
        }
    }

    /// Removes the item at `index` from an array or object literal, along
    /// with its own comments.
    pub fn remove_item(&mut self, seq: NodeId, index: usize) {
        if let Some(seq) = self.nodes[seq.0].as_seq_mut() {
            seq.remove(index);
        }
    }

    /// Replaces the value of a property node.
    pub fn set_property_value(&mut self, property: NodeId, value: NodeId) {
        if let Node::Property(prop) = &mut self.nodes[property.0] {
            prop.value = value;
        }
    }

    /// Source text of a node as it currently prints.
    pub fn render(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Node::Array(seq) | Node::Object(seq) => {
                let (open, close) = if matches!(self.node(id), Node::Array(_)) {
                    ('[', ']')
                } else {
                    ('{', '}')
                };
                out.push(open);
                seq.write(out, |item, out| self.write_node(*item, out));
                out.push(close);
            }
            Node::Property(prop) => {
                out.push_str(&prop.key);
                out.push_str(&prop.sep);
                self.write_node(prop.value, out);
            }
            Node::Spread(spread) => {
                out.push_str("...");
                out.push_str(&spread.gap);
                self.write_node(spread.argument, out);
            }
            Node::Str(lit) => out.push_str(&lit.raw),
            Node::Num(raw) => out.push_str(raw),
            Node::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Node::Null => out.push_str("null"),
            Node::Undefined => out.push_str("undefined"),
            Node::DynamicImport(d) => out.push_str(&d.raw),
            Node::Opaque(text) => out.push_str(text),
        }
    }

    /// Import declarations in file order.
    pub fn imports(&self) -> impl Iterator<Item = (ImportId, &ImportDecl)> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, seg)| match seg {
                Segment::Import(decl) => Some((ImportId(i), decl)),
                _ => None,
            })
    }

    pub fn import(&self, id: ImportId) -> Option<&ImportDecl> {
        match self.segments.get(id.0) {
            Some(Segment::Import(decl)) => Some(decl),
            _ => None,
        }
    }

    pub fn import_mut(&mut self, id: ImportId) -> Option<&mut ImportDecl> {
        match self.segments.get_mut(id.0) {
            Some(Segment::Import(decl)) => Some(decl),
            _ => None,
        }
    }

    /// Inserts `decl` after the last import, or at the top of the file.
    pub fn insert_import(&mut self, decl: ImportDecl) -> ImportId {
        let last_import = self
            .segments
            .iter()
            .rposition(|s| matches!(s, Segment::Import(_)));

        match last_import {
            Some(pos) => {
                self.segments.insert(pos + 1, Segment::Text("\n".to_string()));
                self.segments.insert(pos + 2, Segment::Import(decl));
                ImportId(pos + 2)
            }
            None => {
                let at = self.split_shebang();
                self.segments.insert(at, Segment::Import(decl));
                self.segments.insert(at + 1, Segment::Text("\n".to_string()));
                ImportId(at)
            }
        }
    }

    /// Moves a leading `#!` line into its own segment, returning the index after it.
    fn split_shebang(&mut self) -> usize {
        let Some(Segment::Text(text)) = self.segments.first() else {
            return 0;
        };
        if !text.starts_with("#!") {
            return 0;
        }
        let line_end = text.find('\n').map_or(text.len(), |n| n + 1);
        let mut shebang = text[..line_end].to_string();
        let rest = text[line_end..].to_string();
        if !shebang.ends_with('\n') {
            shebang.push('\n');
        }
        let mut replacement = vec![Segment::Text(shebang)];
        if !rest.is_empty() {
            replacement.push(Segment::Text(rest));
        }
        self.segments.splice(0..1, replacement);
        1
    }

    /// Removes an import declaration together with the rest of its line
    /// when that holds nothing but a comment.
    pub fn remove_import(&mut self, id: ImportId) {
        if !matches!(self.segments.get(id.0), Some(Segment::Import(_))) {
            return;
        }
        self.segments.remove(id.0);
        if let Some(Segment::Text(next)) = self.segments.get_mut(id.0) {
            let line_end = trivia::line_break(next, 0, next.len());
            let head = &next[..line_end.unwrap_or(next.len())];
            if trivia::is_comment_only(head) {
                let cut = line_end.map_or(next.len(), |nl| nl + 1);
                next.drain(..cut);
            }
            if next.is_empty() {
                self.segments.remove(id.0);
            }
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => f.write_str(text)?,
                Segment::Import(decl) => f.write_str(&decl.render())?,
                Segment::Expr(node) => f.write_str(&self.render(*node))?,
            }
        }
        Ok(())
    }
}
