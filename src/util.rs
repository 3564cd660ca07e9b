//! Small string helpers shared by the renderer and logging

use unicode_width::UnicodeWidthStr;

/// Truncate a string at a valid UTF-8 character boundary.
///
/// Returns a slice of at most `max_bytes` bytes, ending at a valid char
/// boundary, so multi-byte characters never cause a panic.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Fit a string into a display-width column: pad with spaces or cut with an
/// ellipsis. Width is terminal display width, not byte or char count.
pub fn fit_cell(s: &str, width: usize) -> String {
    let w = s.width();
    if w <= width {
        let mut out = String::with_capacity(s.len() + (width - w));
        out.push_str(s);
        out.extend(std::iter::repeat_n(' ', width - w));
        return out;
    }

    // Cut down to width-1 display columns and append the ellipsis
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + cw > width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += cw;
    }
    out.push('…');
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used + 1)));
    out
}
