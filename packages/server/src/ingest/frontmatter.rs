use std::collections::HashMap;

/// Split a leading `---` frontmatter block from a markdown document.
///
/// The block is parsed as flat `key: value` lines with surrounding
/// quotes stripped. Deliberately not YAML (no nesting, no lists, no
/// multi-line values); the merge logic downstream assumes flat strings.
/// Returns the parsed keys and the body with surrounding whitespace
/// trimmed; a document without frontmatter comes back unparsed.
pub fn split_frontmatter(doc: &str) -> (HashMap<String, String>, &str) {
    let Some(rest) = doc.strip_prefix("---\n").or_else(|| doc.strip_prefix("---\r\n")) else {
        return (HashMap::new(), doc.trim());
    };

    let Some(end) = rest.find("\n---\n").or_else(|| rest.find("\n---\r\n")) else {
        return (HashMap::new(), doc.trim());
    };

    let block = &rest[..end];
    let body = rest[end..]
        .trim_start_matches('\n')
        .trim_start_matches("---")
        .trim();

    let mut meta = HashMap::new();
    for line in block.lines() {
        let line = line.trim_end_matches('\r');
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        meta.insert(key.to_string(), strip_quotes(value.trim()).to_string());
    }

    (meta, body)
}

fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    let value = value.strip_prefix('\'').unwrap_or(value);
    value.strip_suffix('\'').unwrap_or(value)
}
