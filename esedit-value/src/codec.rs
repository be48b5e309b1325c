//! Conversion between arena nodes and [`PropertyValue`].

use esedit_syntax::escape::single_quote;
use esedit_syntax::{Document, Node, NodeId};

use crate::value::{is_spread_key, spread_key, Mapping, PropertyValue};

/// Decodes the node `id`. Never fails: unrecognized shapes become
/// [`PropertyValue::Opaque`] holding their source text.
pub fn decode(doc: &Document, id: NodeId) -> PropertyValue {
    match doc.node(id) {
        Node::Str(lit) => PropertyValue::Str(lit.value.clone()),
        Node::Num(raw) => match parse_number(raw) {
            Some(n) => PropertyValue::Number(n),
            None => PropertyValue::Opaque(raw.clone()),
        },
        Node::Bool(b) => PropertyValue::Bool(*b),
        Node::Null => PropertyValue::Null,
        Node::Undefined => PropertyValue::Undefined,
        Node::Array(seq) => {
            PropertyValue::Sequence(seq.items.iter().map(|i| decode(doc, i.node)).collect())
        }
        Node::Object(_) => PropertyValue::Mapping(decode_object(doc, id)),
        Node::DynamicImport(d) => PropertyValue::DynamicImport {
            module_path: d.module.clone(),
        },
        Node::Opaque(text) => PropertyValue::Opaque(text.clone()),
        Node::Property(_) | Node::Spread(_) => PropertyValue::Opaque(doc.render(id)),
    }
}

/// Decodes the members of an object literal in authored order.
///
/// Spread members become placeholder keys. Shorthand members (`{ globals }`)
/// decode to an opaque reference to the same name. Methods and computed keys
/// are kept whole: their source text is both the key and the opaque value,
/// and [`encode`] prints them back verbatim.
pub fn decode_object(doc: &Document, object: NodeId) -> Mapping {
    let mut mapping = Mapping::new();
    for item in doc.items(object) {
        match doc.node(item.node) {
            Node::Property(prop) => mapping.push(prop.key_name(), decode(doc, prop.value)),
            Node::Spread(spread) => {
                mapping.push(spread_key(&doc.render(spread.argument)), PropertyValue::Null)
            }
            Node::Opaque(text) => mapping.push(text.clone(), PropertyValue::Opaque(text.clone())),
            _ => {}
        }
    }
    mapping
}

/// Renders `value` as source text.
pub fn encode(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Str(s) => single_quote(s),
        PropertyValue::Number(n) => format_number(*n),
        PropertyValue::Bool(b) => b.to_string(),
        PropertyValue::Null => "null".to_string(),
        PropertyValue::Undefined => "undefined".to_string(),
        PropertyValue::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(encode).collect();
            format!("[{}]", parts.join(", "))
        }
        PropertyValue::Mapping(m) => encode_mapping(m),
        PropertyValue::DynamicImport { module_path } => {
            format!("await import({})", single_quote(module_path))
        }
        PropertyValue::Opaque(text) => text.clone(),
    }
}

fn encode_mapping(m: &Mapping) -> String {
    if m.is_empty() {
        return "{}".to_string();
    }
    let parts: Vec<String> = m
        .iter()
        .map(|(k, v)| {
            if is_spread_key(k) || is_verbatim_member(k, v) {
                k.to_string()
            } else {
                format!("{}: {}", single_quote(k), encode(v))
            }
        })
        .collect();
    format!("{{ {} }}", parts.join(", "))
}

/// A method or computed member carried through decode as its own text.
fn is_verbatim_member(key: &str, value: &PropertyValue) -> bool {
    matches!(value, PropertyValue::Opaque(text) if text == key) && !is_identifier(key)
}

/// Parses a numeric literal, including a leading `-`, separators and radix prefixes.
fn parse_number(raw: &str) -> Option<f64> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let digits = digits.replace('_', "");
    if digits.ends_with('n') {
        return None;
    }
    let radix = match digits.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    let value = match radix {
        Some(radix) => u64::from_str_radix(&digits[2..], radix).ok()? as f64,
        None => digits.parse::<f64>().ok()?,
    };
    Some(if negative { -value } else { value })
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode_text(text: &str) -> PropertyValue {
        let mut doc = Document::parse("");
        let id = doc.parse_expression(text);
        decode(&doc, id)
    }

    #[test]
    fn decodes_scalars() {
        assert_eq!(decode_text("'error'"), PropertyValue::Str("error".into()));
        assert_eq!(decode_text("\"warn\""), PropertyValue::Str("warn".into()));
        assert_eq!(decode_text("2"), PropertyValue::Number(2.0));
        assert_eq!(decode_text("-1.5"), PropertyValue::Number(-1.5));
        assert_eq!(decode_text("0x10"), PropertyValue::Number(16.0));
        assert_eq!(decode_text("1_000"), PropertyValue::Number(1000.0));
        assert_eq!(decode_text("true"), PropertyValue::Bool(true));
        assert_eq!(decode_text("null"), PropertyValue::Null);
        assert_eq!(decode_text("undefined"), PropertyValue::Undefined);
    }

    #[test]
    fn decodes_tuple_like_rule_values() {
        assert_eq!(
            decode_text("['error', { max: 3, 'ignore-comments': true }]"),
            PropertyValue::Sequence(vec![
                "error".into(),
                PropertyValue::Mapping(
                    [
                        ("max", PropertyValue::Number(3.0)),
                        ("ignore-comments", PropertyValue::Bool(true)),
                    ]
                    .into_iter()
                    .collect()
                ),
            ])
        );
    }

    #[test]
    fn spread_members_decode_to_placeholders_in_order() {
        let value = decode_text("{ ...base, 'x': 'error' }");
        let m = value.as_mapping().unwrap();
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["...base", "x"]);
        assert_eq!(m.get("...base"), Some(&PropertyValue::Null));
        assert_eq!(m.get("x"), Some(&PropertyValue::Str("error".into())));
    }

    #[test]
    fn dynamic_import_is_tagged() {
        assert_eq!(
            decode_text("await import('@typescript-eslint/parser')"),
            PropertyValue::DynamicImport {
                module_path: "@typescript-eslint/parser".into()
            }
        );
        assert_eq!(
            decode_text("await import(name)"),
            PropertyValue::Opaque("await import(name)".into())
        );
    }

    #[test]
    fn unrecognized_shapes_keep_their_text() {
        for text in [
            "globals.browser",
            "tseslint.configs.recommended",
            "`tpl`",
            "a[0]",
            "fn(1, { a: 2 })",
            "10n",
            "'a' + b",
        ] {
            assert_eq!(decode_text(text), PropertyValue::Opaque(text.into()), "{text}");
        }
    }

    #[test]
    fn shorthand_members_decode_as_references() {
        let value = decode_text("{ globals, parser: p }");
        let m = value.as_mapping().unwrap();
        assert_eq!(m.get("globals"), Some(&PropertyValue::Opaque("globals".into())));
        assert_eq!(m.get("parser"), Some(&PropertyValue::Opaque("p".into())));
    }

    #[test]
    fn methods_and_computed_keys_survive_decode_and_encode() {
        let value = decode_text("{ [key]: 1, load() { return 2; }, plain: 3 }");
        let m = value.as_mapping().unwrap();
        assert_eq!(
            m.keys().collect::<Vec<_>>(),
            vec!["[key]: 1", "load() { return 2; }", "plain"]
        );
        assert_eq!(
            encode(&value),
            "{ [key]: 1, load() { return 2; }, 'plain': 3 }"
        );
    }

    #[test]
    fn encodes_mappings_with_quoted_keys_and_bare_spreads() {
        let mut m = Mapping::new();
        m.push_spread("base.rules");
        m.insert("it's", "error");
        m.insert("max", PropertyValue::Sequence(vec!["warn".into(), 2.into()]));
        assert_eq!(
            encode(&PropertyValue::Mapping(m)),
            r"{ ...base.rules, 'it\'s': 'error', 'max': ['warn', 2] }"
        );
    }

    #[test]
    fn encodes_scalars() {
        assert_eq!(encode(&PropertyValue::Number(2022.0)), "2022");
        assert_eq!(encode(&PropertyValue::Number(0.5)), "0.5");
        assert_eq!(encode(&PropertyValue::Null), "null");
        assert_eq!(encode(&PropertyValue::Undefined), "undefined");
        assert_eq!(encode(&PropertyValue::Mapping(Mapping::new())), "{}");
        assert_eq!(
            encode(&PropertyValue::DynamicImport {
                module_path: "p".into()
            }),
            "await import('p')"
        );
        assert_eq!(encode(&PropertyValue::Opaque("x.y()".into())), "x.y()");
    }

    #[test]
    fn encoded_values_decode_back() {
        let value =
            decode_text("{ files: ['**/*.ts'], rules: { ...base, eqeqeq: ['error', 'always'] } }");
        let mut doc = Document::parse("");
        let id = doc.parse_expression(&encode(&value));
        assert_eq!(decode(&doc, id), value);
    }
}
