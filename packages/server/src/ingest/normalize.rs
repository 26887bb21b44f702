use std::borrow::Cow;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

/// Fenced code block aliases canonicalized during ingest.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("jsx", "javascript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("sh", "bash"),
    ("yml", "yaml"),
];

static HIGHLIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"==(.+?)==").unwrap());

static IMAGE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Clean up markdown as exported by note-taking tools: tag bare code
/// fences, canonicalize language aliases, downgrade `==highlight==` to
/// bold, percent-decode image paths, and pad dividers with blank
/// lines. Runs after the image rewrite pass, so decoding only touches
/// references the rewrite left in place.
pub fn normalize_markdown(body: &str) -> String {
    let body = fix_code_blocks(body);
    let body = convert_highlights(&body);
    let body = decode_image_paths(&body);
    pad_dividers(&body)
}

/// Untagged fences render without highlighting downstream; give them a
/// `text` tag and rewrite common aliases to canonical language names.
fn fix_code_blocks(body: &str) -> String {
    let mut out = body.replace("```\n", "```text\n");
    for (alias, canonical) in LANGUAGE_ALIASES {
        out = out.replace(
            &format!("```{alias}\n"),
            &format!("```{canonical}\n"),
        );
    }
    out
}

fn convert_highlights(body: &str) -> String {
    HIGHLIGHT.replace_all(body, "**$1**").into_owned()
}

/// Notion exports reference images with percent-encoded paths
/// (`Export%20abc/image.png`); decode them so filename lookups match.
fn decode_image_paths(body: &str) -> String {
    IMAGE_PATH
        .replace_all(body, |caps: &regex::Captures<'_>| {
            let alt = &caps[1];
            let path = &caps[2];
            let decoded = percent_decode_str(path)
                .decode_utf8()
                .unwrap_or(Cow::Borrowed(path));
            format!("![{alt}]({decoded})")
        })
        .into_owned()
}

fn pad_dividers(body: &str) -> String {
    body.replace("\n---\n", "\n\n---\n\n")
}
