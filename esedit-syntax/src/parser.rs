//! Maps an oxc syntax tree onto the editable arena.
//!
//! oxc parses the module; this module walks the import declarations and the
//! `export default [...]` array and copies them into owned [`Node`]s. Spans
//! give each node's text. The trivia and commas between nodes come from the
//! source gaps between those spans.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrayExpression, ArrayExpressionElement, ExportDefaultDeclarationKind, Expression,
    ImportDeclaration, ImportDeclarationSpecifier, ModuleExportName, ObjectExpression,
    ObjectProperty, ObjectPropertyKind, PropertyKey, PropertyKind, SpreadElement, Statement,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};

use crate::import::{ImportDecl, NamedImport};
use crate::node::{DynamicImport, Node, NodeId, Property, Seq, SeqItem, Spread, StrLit};
use crate::trivia;

/// A recognized top-level region of the source.
pub(crate) enum Region {
    Import(ImportDecl),
    DefaultExportArray(NodeId),
}

pub(crate) struct TopLevel {
    /// Byte ranges of recognized regions, in source order.
    pub regions: Vec<(usize, usize, Region)>,
    /// Set when an `export default` exists whose value is not a bare array literal.
    pub other_default_export: bool,
    /// First diagnostic when the module does not parse.
    pub error: Option<String>,
}

/// Wrapper used to parse a lone expression as the only element of an array.
const EXPRESSION_HEAD: &str = "export default [\n";
const EXPRESSION_TAIL: &str = "\n];\n";

fn source_type() -> SourceType {
    SourceType::ts()
}

/// Parses a whole module. A module with syntax errors yields no regions.
pub(crate) fn parse_module(src: &str, nodes: &mut Vec<Node>) -> TopLevel {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, src, source_type()).parse();
    if ret.panicked || !ret.errors.is_empty() {
        return TopLevel {
            regions: Vec::new(),
            other_default_export: false,
            error: Some(
                ret.errors
                    .first()
                    .map_or_else(|| "unparsable module".to_string(), ToString::to_string),
            ),
        };
    }

    let mut builder = Builder { src, nodes };
    let mut regions = Vec::new();
    let mut other_default_export = false;
    let mut seen_default_export = false;

    for statement in &ret.program.body {
        match statement {
            Statement::ImportDeclaration(decl) => {
                if let Some(parsed) = builder.import(decl) {
                    let (start, end) = range(decl.span);
                    regions.push((start, end, Region::Import(parsed)));
                }
            }
            Statement::ExportDefaultDeclaration(export) if !seen_default_export => {
                seen_default_export = true;
                match &export.declaration {
                    ExportDefaultDeclarationKind::ArrayExpression(array) => {
                        let node = builder.array(array);
                        let (start, end) = range(array.span);
                        regions.push((start, end, Region::DefaultExportArray(node)));
                    }
                    _ => other_default_export = true,
                }
            }
            _ => {}
        }
    }

    TopLevel {
        regions,
        other_default_export,
        error: None,
    }
}

/// Parses `text` as one expression. Anything that is not exactly one
/// expression becomes an opaque node holding the trimmed text.
pub(crate) fn parse_expression(text: &str, nodes: &mut Vec<Node>) -> NodeId {
    let src = format!("{EXPRESSION_HEAD}{text}{EXPRESSION_TAIL}");
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &src, source_type()).parse();

    let element = match ret.program.body.first() {
        Some(Statement::ExportDefaultDeclaration(export))
            if !ret.panicked && ret.errors.is_empty() && ret.program.body.len() == 1 =>
        {
            match &export.declaration {
                ExportDefaultDeclarationKind::ArrayExpression(array)
                    if array.elements.len() == 1 =>
                {
                    array.elements.first().and_then(|e| e.as_expression())
                }
                _ => None,
            }
        }
        _ => None,
    };

    let mut builder = Builder {
        src: &src,
        nodes,
    };
    match element {
        Some(expr) => builder.expr(expr),
        None => builder.alloc(Node::Opaque(text.trim().to_string())),
    }
}

fn range(span: Span) -> (usize, usize) {
    (span.start as usize, span.end as usize)
}

struct Builder<'s, 'n> {
    src: &'s str,
    nodes: &'n mut Vec<Node>,
}

impl Builder<'_, '_> {
    fn text(&self, span: Span) -> &str {
        let (start, end) = range(span);
        &self.src[start..end]
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn opaque(&mut self, span: Span) -> NodeId {
        let text = self.text(span).to_string();
        self.alloc(Node::Opaque(text))
    }

    fn expr(&mut self, expr: &Expression<'_>) -> NodeId {
        let span = expr.span();
        let text = self.text(span).to_string();
        let node = match expr {
            Expression::StringLiteral(lit) => Node::Str(StrLit {
                raw: text,
                value: lit.value.as_str().to_string(),
            }),
            Expression::NumericLiteral(_) => Node::Num(text),
            Expression::BooleanLiteral(lit) => Node::Bool(lit.value),
            Expression::NullLiteral(_) => Node::Null,
            Expression::Identifier(ident) if ident.name.as_str() == "undefined" => Node::Undefined,
            Expression::UnaryExpression(unary)
                if text.starts_with('-')
                    && matches!(unary.argument, Expression::NumericLiteral(_))
                    && unary.argument.span().start == span.start + 1 =>
            {
                Node::Num(text)
            }
            Expression::ArrayExpression(array) => return self.array(array),
            Expression::ObjectExpression(object) => return self.object(object),
            Expression::AwaitExpression(await_expr) => match self.dynamic_import(&await_expr.argument) {
                Some(module) => Node::DynamicImport(DynamicImport { raw: text, module }),
                None => Node::Opaque(text),
            },
            _ => Node::Opaque(text),
        };
        self.alloc(node)
    }

    /// The module of `import('x')` with a single string literal argument.
    fn dynamic_import(&self, expr: &Expression<'_>) -> Option<String> {
        let Expression::ImportExpression(import) = expr else {
            return None;
        };
        let Expression::StringLiteral(module) = &import.source else {
            return None;
        };
        let after = self.text(Span::new(module.span.end, import.span.end));
        (after.trim() == ")").then(|| module.value.as_str().to_string())
    }

    fn array(&mut self, array: &ArrayExpression<'_>) -> NodeId {
        let mut members = Vec::with_capacity(array.elements.len());
        for element in &array.elements {
            let node = match element {
                ArrayExpressionElement::SpreadElement(spread) => self.spread(spread),
                ArrayExpressionElement::Elision(_) => return self.opaque(array.span),
                other => match other.as_expression() {
                    Some(expr) => self.expr(expr),
                    None => return self.opaque(array.span),
                },
            };
            members.push((element.span(), node));
        }
        let seq = self.layout(array.span, members);
        self.alloc(Node::Array(seq))
    }

    fn object(&mut self, object: &ObjectExpression<'_>) -> NodeId {
        let mut members = Vec::with_capacity(object.properties.len());
        for property in &object.properties {
            let node = match property {
                ObjectPropertyKind::ObjectProperty(prop) => self.property(prop),
                ObjectPropertyKind::SpreadProperty(spread) => self.spread(spread),
            };
            members.push((property.span(), node));
        }
        let seq = self.layout(object.span, members);
        self.alloc(Node::Object(seq))
    }

    /// A plain `key: value` member. Methods, accessors, shorthand and
    /// computed keys stay opaque.
    fn property(&mut self, prop: &ObjectProperty<'_>) -> NodeId {
        let plain_key = matches!(
            prop.key,
            PropertyKey::StaticIdentifier(_)
                | PropertyKey::StringLiteral(_)
                | PropertyKey::NumericLiteral(_)
        );
        if prop.kind != PropertyKind::Init
            || prop.method
            || prop.shorthand
            || prop.computed
            || !plain_key
        {
            return self.opaque(prop.span);
        }

        let key_span = prop.key.span();
        let value_span = prop.value.span();
        let key = self.text(key_span).to_string();
        let sep = self.text(Span::new(key_span.end, value_span.start)).to_string();
        let value = self.expr(&prop.value);
        self.alloc(Node::Property(Property { key, sep, value }))
    }

    fn spread(&mut self, spread: &SpreadElement<'_>) -> NodeId {
        let argument_span = spread.argument.span();
        let gap = self
            .text(Span::new(spread.span.start + 3, argument_span.start))
            .to_string();
        let argument = self.expr(&spread.argument);
        self.alloc(Node::Spread(Spread { gap, argument }))
    }

    /// Splits the text inside `brackets` into per-item trivia around `members`.
    fn layout<T>(&self, brackets: Span, members: Vec<(Span, T)>) -> Seq<T> {
        let (open, close) = range(brackets);
        self.layout_between(open + 1, close - 1, members)
    }

    /// Like [`layout`](Self::layout) for the body `src[start..end]`.
    fn layout_between<T>(&self, start: usize, end: usize, members: Vec<(Span, T)>) -> Seq<T> {
        let starts: Vec<usize> = members.iter().map(|(span, _)| span.start as usize).collect();
        let count = members.len();
        let mut seq = Seq::default();
        let mut cursor = start;

        for (i, (span, node)) in members.into_iter().enumerate() {
            let (item_start, item_end) = range(span);
            let next = starts.get(i + 1).copied().unwrap_or(end);
            let prefix = self.src[cursor..item_start].to_string();

            let (suffix, after_comma) =
                match trivia::find_outside_comments(self.src, item_end, next, b',') {
                    Some(comma) => {
                        if i + 1 == count {
                            seq.trailing_comma = true;
                        }
                        (self.src[item_end..comma].to_string(), comma + 1)
                    }
                    None => (String::new(), item_end),
                };
            let line_end = trivia::same_line_end(self.src, after_comma, next);
            let trailing = self.src[after_comma..line_end].to_string();
            cursor = line_end;

            seq.items.push(SeqItem {
                prefix,
                node,
                suffix,
                trailing,
            });
        }

        seq.tail = self.src[cursor..end].to_string();
        seq
    }

    fn import(&self, decl: &ImportDeclaration<'_>) -> Option<ImportDecl> {
        if decl.import_kind.is_type() || decl.phase.is_some() {
            return None;
        }

        let mut default = None;
        let mut namespace = None;
        let mut named = Vec::new();
        for specifier in decl.specifiers.iter().flatten() {
            match specifier {
                ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
                    default = Some(spec.local.name.as_str().to_string());
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
                    namespace = Some(spec.local.name.as_str().to_string());
                }
                ImportDeclarationSpecifier::ImportSpecifier(spec) => {
                    if spec.import_kind.is_type() {
                        return None;
                    }
                    let ModuleExportName::IdentifierName(imported) = &spec.imported else {
                        return None;
                    };
                    let name = imported.name.as_str();
                    let specifier = if spec.span == imported.span {
                        NamedImport::new(name)
                    } else {
                        NamedImport::aliased(name, spec.local.name.as_str())
                    };
                    named.push((spec.span, specifier));
                }
            }
        }

        let (start, end) = range(decl.span);
        let source_start = decl.source.span.start as usize;
        let module_raw = self.text(decl.source.span);
        let quote = module_raw.chars().next().unwrap_or('\'');
        let attributes = decl
            .with_clause
            .as_ref()
            .map(|with| self.text(Span::new(decl.source.span.end, with.span.end)).to_string());
        let semicolon = self.src[start..end].ends_with(';');

        // `import` is six bytes; the brace search starts after it.
        let search_to = named.first().map_or(source_start, |(span, _)| span.start as usize);
        let open = trivia::find_outside_comments(self.src, start + 6, search_to, b'{');
        let (lead, rest, named) = match open {
            Some(open) => {
                let after_last = named.last().map_or(open + 1, |(span, _)| span.end as usize);
                let close = trivia::find_outside_comments(self.src, after_last, source_start, b'}')?;
                let seq = self.layout_between(open + 1, close, named);
                (
                    self.src[start..open].to_string(),
                    self.src[close + 1..end].to_string(),
                    Some(seq),
                )
            }
            None => (self.src[start..end].to_string(), String::new(), None),
        };

        Some(ImportDecl::parsed(
            decl.source.value.as_str().to_string(),
            default,
            namespace,
            named,
            quote,
            attributes,
            semicolon,
            lead,
            rest,
        ))
    }
}
