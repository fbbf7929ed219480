//! Text helpers for embedding record fields in SVG markup.

/// Escape the five XML special characters.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether every char is allowed in an XML 1.0 document.
///
/// Escaping cannot help here: control chars other than tab/newline/CR are
/// invalid even as character references.
pub fn is_xml_char_safe(s: &str) -> bool {
    s.chars().all(|c| {
        matches!(c, '\t' | '\n' | '\r')
            || ('\u{20}'..='\u{D7FF}').contains(&c)
            || ('\u{E000}'..='\u{FFFD}').contains(&c)
            || c >= '\u{10000}'
    })
}

/// Keep at most `max` chars, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Replace chars that XML cannot carry with U+FFFD.
pub fn sanitize_xml_chars(s: &str) -> String {
    s.chars()
        .map(|c| if is_xml_char_safe(c.encode_utf8(&mut [0; 4])) { c } else { '\u{FFFD}' })
        .collect()
}
