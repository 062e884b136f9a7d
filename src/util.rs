use unicode_width::UnicodeWidthChar;

pub fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }

    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }

    if max <= 3 {
        return s.chars().take(max).collect();
    }

    let truncated: String = s.chars().take(max - 3).collect();
    format!("{}...", truncated)
}

/// Truncate to a terminal column width, appending `…` when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            // Make room for the ellipsis.
            while width + 1 > max_width {
                match out.pop() {
                    Some(last) => width -= last.width().unwrap_or(0),
                    None => return out,
                }
            }
            out.push('…');
            return out;
        }
        width += w;
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 0), "");
        assert_eq!(truncate("héllo wörld", 5), "hé...");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("photo.jpg", 20), "photo.jpg");
        assert_eq!(truncate_to_width("data:image/png;base64,AAAA", 10), "data:imag…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
