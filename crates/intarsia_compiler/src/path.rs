//! Dotted-path resolution into property-access expressions.

/// Trim a tag name and strip the same-scope dot shortcut (`.name` reads
/// `name` on the current binding; `.` alone stays the identity reference).
pub fn normalize(name: &str) -> &str {
    let name = name.trim();
    match name.strip_prefix('.') {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    }
}

/// Resolve a dotted path against a base identifier.
///
/// Segments become `.name` for identifiers, `[N]` for numeric array
/// indexes, and `["…"]` (with `"` and `\` backslash-escaped) for anything
/// else. Every segment after the first short-circuits with `?.` unless
/// `forced` asks for the safe variant — used where the same path was just
/// truthiness- or array-tested and must not short-circuit on its own.
pub fn resolve(base: &str, name: &str, forced: bool) -> String {
    let name = normalize(name);
    if name == "." {
        return base.to_string();
    }
    let mut out = String::from(base);
    for (idx, seg) in name.split('.').enumerate() {
        let opt = idx > 0 && !forced;
        if is_identifier(seg) {
            out.push_str(if opt { "?." } else { "." });
            out.push_str(seg);
        } else if is_index(seg) {
            if opt {
                out.push_str("?.");
            }
            out.push('[');
            out.push_str(seg);
            out.push(']');
        } else {
            if opt {
                out.push_str("?.");
            }
            out.push_str("[\"");
            for c in seg.chars() {
                if c == '"' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push_str("\"]");
        }
    }
    out
}

/// `[_a-zA-Z$][a-zA-Z0-9_$]*`
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Purely numeric segment — an array index.
pub(crate) fn is_index(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
