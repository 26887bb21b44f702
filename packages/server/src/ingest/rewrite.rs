use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// `![alt](path)` with an optional trailing `"title"`.
static IMAGE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)"#).unwrap()
});

/// Collect every image reference path that is not already remote.
pub fn local_image_refs(body: &str) -> Vec<String> {
    IMAGE_REF
        .captures_iter(body)
        .map(|caps| caps[2].trim().to_string())
        .filter(|path| !path.starts_with("http://") && !path.starts_with("https://"))
        .collect()
}

/// Every textual form under which a markdown document plausibly refers
/// to an uploaded file: bare name, `./name`, `./images/name`,
/// `images/name`, and each of those with spaces percent-encoded.
pub fn reference_keys(filename: &str) -> Vec<String> {
    let mut keys = vec![
        filename.to_string(),
        format!("./{filename}"),
        format!("./images/{filename}"),
        format!("images/{filename}"),
    ];
    if filename.contains(' ') {
        let encoded = filename.replace(' ', "%20");
        keys.push(encoded.clone());
        keys.push(format!("./{encoded}"));
        keys.push(format!("./images/{encoded}"));
        keys.push(format!("images/{encoded}"));
    }
    keys
}

/// Replace each image reference whose path matches a lookup key with
/// its hosted URL, keeping the alt text. References without a match
/// are left exactly as written.
pub fn rewrite_image_refs(body: &str, lookup: &HashMap<String, String>) -> String {
    let mut rewritten = body.to_string();

    let mut seen = std::collections::HashSet::new();
    let refs: Vec<String> = local_image_refs(body)
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect();

    for path in refs {
        let Some(url) = lookup.get(&path) else {
            continue;
        };
        // The path goes back into a pattern, so regex metacharacters in
        // filenames (dots at minimum) must be escaped.
        let pattern = format!(
            r#"!\[([^\]]*)\]\({}(?:\s+"[^"]*")?\)"#,
            regex::escape(&path)
        );
        let re = Regex::new(&pattern).expect("escaped reference pattern");
        rewritten = re
            .replace_all(&rewritten, |caps: &regex::Captures<'_>| {
                format!("![{}]({})", &caps[1], url)
            })
            .into_owned();
    }

    rewritten
}
