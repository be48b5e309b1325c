//! Scanning inside the gaps between parsed nodes.
//!
//! The parser reports node spans only, so separators and comments between
//! two spans are recovered from the source text. A gap holds nothing but
//! whitespace, comments and punctuation.

/// Offset of the first `needle` in `src[from..to]` outside comments.
pub(crate) fn find_outside_comments(src: &str, from: usize, to: usize, needle: u8) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut i = from;
    while i < to {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = line_comment_end(bytes, i, to),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = block_comment_end(bytes, i, to),
            b if b == needle => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Offset of the first line break in `src[from..to]` that is not inside a
/// block comment, or `from` when the gap stays on one line.
pub(crate) fn same_line_end(src: &str, from: usize, to: usize) -> usize {
    line_break(src, from, to).unwrap_or(from)
}

/// Offset of the first line break in `src[from..to]` outside block comments.
pub(crate) fn line_break(src: &str, from: usize, to: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut i = from;
    while i < to {
        match bytes[i] {
            b'\n' => return Some(i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = line_comment_end(bytes, i, to),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = block_comment_end(bytes, i, to),
            _ => i += 1,
        }
    }
    None
}

/// True when `text` is whitespace plus at most one comment.
pub(crate) fn is_comment_only(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || text.starts_with("//") {
        return true;
    }
    text.strip_prefix("/*")
        .and_then(|body| body.strip_suffix("*/"))
        .is_some_and(|body| !body.contains("*/"))
}

fn line_comment_end(bytes: &[u8], start: usize, to: usize) -> usize {
    let mut j = start + 2;
    while j < to && bytes[j] != b'\n' {
        j += 1;
    }
    j
}

fn block_comment_end(bytes: &[u8], start: usize, to: usize) -> usize {
    let mut j = start + 2;
    while j + 1 < to {
        if bytes[j] == b'*' && bytes[j + 1] == b'/' {
            return j + 2;
        }
        j += 1;
    }
    to
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_inside_comments_are_skipped() {
        let gap = " /* a, b */ // c,\n , ";
        assert_eq!(find_outside_comments(gap, 0, gap.len(), b','), Some(19));
    }

    #[test]
    fn line_end_ignores_breaks_inside_block_comments() {
        let gap = " /* x\n y */ // z\n  ";
        assert_eq!(same_line_end(gap, 0, gap.len()), 16);
        assert_eq!(same_line_end(" ", 0, 1), 0);
    }

    #[test]
    fn comment_only_lines() {
        assert!(is_comment_only("  // note"));
        assert!(is_comment_only(" /* note */ "));
        assert!(is_comment_only("   "));
        assert!(!is_comment_only(" /* a */ run();"));
        assert!(!is_comment_only("run(); // a"));
    }
}
