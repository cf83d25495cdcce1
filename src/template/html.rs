use regex::Regex;
use std::sync::OnceLock;

fn block_break_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6])>").expect("block break regex must compile")
    })
}

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex must compile"))
}

/// Converts rich-text HTML to plain text: block ends become line breaks, tags are dropped,
/// entities are decoded, and blank lines are removed.
pub fn html_to_text(html: &str) -> String {
    let with_breaks = block_break_pattern().replace_all(html, "\n");
    let stripped = tag_pattern().replace_all(&with_breaks, "");
    let decoded = htmlize::unescape(stripped.as_ref());
    decoded
        .lines()
        .map(|line| line.replace('\u{a0}', " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
