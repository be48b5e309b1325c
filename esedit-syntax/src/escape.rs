//! String literal escaping helpers shared by the printer and the value codec.

/// Decodes the body of a quoted string literal (`raw` includes the quotes).
///
/// Returns `None` when `raw` is not a terminated single- or double-quoted literal.
pub fn unquote(raw: &str) -> Option<String> {
    let quote = raw.chars().next()?;
    if !matches!(quote, '\'' | '"') || raw.len() < 2 || !raw.ends_with(quote) {
        return None;
    }
    let body = &raw[1..raw.len() - 1];
    // A trailing backslash escapes the closing quote, so the literal is not terminated.
    let trailing_backslashes = body.chars().rev().take_while(|c| *c == '\\').count();
    if trailing_backslashes % 2 == 1 {
        return None;
    }
    Some(unescape(body))
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            break;
        };
        match esc {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // Line continuation.
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, "\\x");
            }
            'u' => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                push_code_point(&mut out, &hex, "\\u");
            }
            other => out.push(other),
        }
    }
    out
}

fn push_code_point(out: &mut String, hex: &str, prefix: &str) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push_str(prefix);
            out.push_str(hex);
        }
    }
}

/// Renders `value` as a string literal using `quote` (`'` or `"`).
pub fn quote(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Renders `value` as a single-quoted string literal.
pub fn single_quote(value: &str) -> String {
    quote(value, '\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_handles_common_escapes() {
        assert_eq!(unquote(r"'it\'s'").as_deref(), Some("it's"));
        assert_eq!(unquote(r#""a\nb""#).as_deref(), Some("a\nb"));
        assert_eq!(unquote(r"'A\u{1F600}'").as_deref(), Some("A\u{1F600}"));
        assert_eq!(unquote(r"'\x41'").as_deref(), Some("A"));
    }

    #[test]
    fn unquote_rejects_unterminated_literals() {
        assert_eq!(unquote("'abc"), None);
        assert_eq!(unquote(r"'abc\'"), None);
        assert_eq!(unquote("abc"), None);
        assert_eq!(unquote("'"), None);
    }

    #[test]
    fn quote_escapes_the_chosen_quote_only() {
        assert_eq!(single_quote("it's"), r"'it\'s'");
        assert_eq!(quote("it's", '"'), r#""it's""#);
        assert_eq!(single_quote("a\\b"), r"'a\\b'");
    }
}
