//! Arena node types for expressions inside an editable region.

use crate::escape;
use crate::trivia;

/// Index of a node inside a [`Document`](crate::Document) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Array(Seq),
    Object(Seq),
    Property(Property),
    Spread(Spread),
    Str(StrLit),
    /// Raw numeric literal text, optionally with a leading `-`.
    Num(String),
    Bool(bool),
    Null,
    Undefined,
    DynamicImport(DynamicImport),
    /// Source text esedit does not interpret. Printed verbatim.
    Opaque(String),
}

impl Node {
    pub fn as_seq(&self) -> Option<&Seq> {
        match self {
            Node::Array(seq) | Node::Object(seq) => Some(seq),
            _ => None,
        }
    }

    pub(crate) fn as_seq_mut(&mut self) -> Option<&mut Seq> {
        match self {
            Node::Array(seq) | Node::Object(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    pub fn as_property(&self) -> Option<&Property> {
        match self {
            Node::Property(prop) => Some(prop),
            _ => None,
        }
    }

    pub fn as_spread(&self) -> Option<&Spread> {
        match self {
            Node::Spread(spread) => Some(spread),
            _ => None,
        }
    }
}

/// The comma separated body of a bracketed list: array elements, object
/// members or the names inside an import's braces.
#[derive(Debug, Clone, PartialEq)]
pub struct Seq<T = NodeId> {
    pub items: Vec<SeqItem<T>>,
    pub trailing_comma: bool,
    /// Trivia between the last item (or its trailing comma) and the closing bracket.
    pub tail: String,
}

/// One list item with the trivia it owns.
///
/// A comment on the same line after an item's comma belongs to that item:
/// it is `trailing`, not part of the next item's `prefix`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeqItem<T = NodeId> {
    /// Trivia before the item.
    pub prefix: String,
    pub node: T,
    /// Trivia between the item and its comma.
    pub suffix: String,
    /// Trivia after the comma up to the end of the line.
    pub trailing: String,
}

impl<T> Default for Seq<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            trailing_comma: false,
            tail: String::new(),
        }
    }
}

impl<T> Seq<T> {
    /// Appends `node`, copying the layout of the items already there.
    pub fn push(&mut self, node: T) {
        let prefix = match self.items.last() {
            Some(last) if last.prefix.contains('\n') => {
                let indent = last.prefix.rsplit('\n').next().unwrap_or("");
                format!("\n{}", leading_whitespace(indent))
            }
            Some(last) if !last.prefix.is_empty() => last.prefix.clone(),
            Some(_) => " ".to_string(),
            None if self.tail.contains('\n') => {
                let indent = self.tail.rsplit('\n').next().unwrap_or("");
                format!("\n{}  ", leading_whitespace(indent))
            }
            None => String::new(),
        };
        self.items.push(SeqItem {
            prefix,
            node,
            suffix: String::new(),
            trailing: String::new(),
        });
    }

    /// Like [`push`](Self::push), but an empty single-line list becomes `{ node }`.
    pub fn push_spaced(&mut self, node: T) {
        let spaced = self.items.is_empty() && !self.tail.contains('\n');
        self.push(node);
        if spaced {
            if let Some(first) = self.items.first_mut() {
                first.prefix = " ".to_string();
            }
            if self.tail.trim().is_empty() {
                self.tail = " ".to_string();
            }
        }
    }

    /// Removes the item at `index` together with the trivia it owns.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        if index == 0 {
            // A comment on the opening bracket's line belongs to the list.
            let head_end = trivia::line_break(&removed.prefix, 0, removed.prefix.len());
            let head = head_end.map(|end| &removed.prefix[..end]).unwrap_or("");
            match self.items.first_mut() {
                Some(next) if !next.prefix.contains('\n') => next.prefix = removed.prefix.clone(),
                Some(next) if !head.trim().is_empty() => next.prefix.insert_str(0, head),
                None if !head.trim().is_empty() => self.tail.insert_str(0, head),
                _ => {}
            }
        }
        if self.items.is_empty() {
            self.trailing_comma = false;
        }
        Some(removed.node)
    }

    /// Writes the list body; `item` prints one node.
    pub(crate) fn write(&self, out: &mut String, mut item: impl FnMut(&T, &mut String)) {
        let len = self.items.len();
        for (i, slot) in self.items.iter().enumerate() {
            out.push_str(&slot.prefix);
            item(&slot.node, out);
            out.push_str(&slot.suffix);
            if i + 1 < len || self.trailing_comma {
                out.push(',');
            }
            out.push_str(&slot.trailing);
        }
        out.push_str(&self.tail);
    }
}

fn leading_whitespace(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}

/// A `key: value` object member.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Key as written: an identifier, a quoted string or a number.
    pub key: String,
    /// Everything between the key and the value, colon included.
    pub sep: String,
    pub value: NodeId,
}

impl Property {
    /// The key with quotes removed and escapes decoded.
    pub fn key_name(&self) -> String {
        escape::unquote(&self.key).unwrap_or_else(|| self.key.clone())
    }
}

/// A `...expr` element or member.
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    /// Trivia between `...` and the argument.
    pub gap: String,
    pub argument: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub raw: String,
    pub value: String,
}

/// The `await import('module')` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicImport {
    pub raw: String,
    pub module: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(prefix: &str, node: &'static str, trailing: &str) -> SeqItem<&'static str> {
        SeqItem {
            prefix: prefix.to_string(),
            node,
            suffix: String::new(),
            trailing: trailing.to_string(),
        }
    }

    fn print(seq: &Seq<&'static str>) -> String {
        let mut out = String::new();
        seq.write(&mut out, |node, out| out.push_str(node));
        out
    }

    fn commented() -> Seq<&'static str> {
        Seq {
            items: vec![
                item(" // list\n  ", "a", " // A"),
                item("\n  ", "b", " // B"),
                item("\n  ", "c", " // C"),
            ],
            trailing_comma: true,
            tail: "\n".to_string(),
        }
    }

    #[test]
    fn removing_an_item_takes_only_its_own_comments() {
        let mut seq = commented();
        assert_eq!(seq.remove(1), Some("b"));
        assert_eq!(print(&seq), " // list\n  a, // A\n  c, // C\n");
    }

    #[test]
    fn removing_the_first_item_keeps_the_bracket_line_comment() {
        let mut seq = commented();
        seq.remove(0);
        assert_eq!(print(&seq), " // list\n  b, // B\n  c, // C\n");
    }

    #[test]
    fn removing_the_last_item_without_trailing_comma() {
        let mut seq = commented();
        seq.trailing_comma = false;
        seq.remove(2);
        assert_eq!(print(&seq), " // list\n  a, // A\n  b // B\n");
    }

    #[test]
    fn push_after_a_commented_last_item() {
        let mut seq = commented();
        seq.trailing_comma = false;
        seq.push("d");
        assert_eq!(print(&seq), " // list\n  a, // A\n  b, // B\n  c, // C\n  d\n");
    }

    #[test]
    fn push_spaced_into_empty_list() {
        let mut seq = Seq::default();
        seq.push_spaced("a");
        seq.push_spaced("b");
        assert_eq!(print(&seq), " a, b ");
    }
}
