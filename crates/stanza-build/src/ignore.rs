use std::collections::HashSet;

/// Renders `.dockerignore` content: one pattern per line, trailing newline.
///
/// Blank patterns are dropped and duplicates keep their first position.
pub fn render_dockerignore(patterns: &[String]) -> String {
    let mut seen = HashSet::new();
    let mut out = String::new();
    for pattern in patterns.iter().map(|p| p.trim()) {
        if pattern.is_empty() || !seen.insert(pattern) {
            continue;
        }
        out.push_str(pattern);
        out.push('\n');
    }
    out
}
