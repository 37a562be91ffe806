//! Article content extraction
//!
//! Pulls two things out of an included markdown article:
//!
//! - **Estimate-link candidates**: every pricing-experience or calculator
//!   URL in the raw text, in discovery order. Candidates are raw strings;
//!   classification happens in the core.
//! - **Image references**: markdown images (inline and reference style),
//!   docs `:::image` blocks, HTML `<img>`/`<source srcset>` forms, with
//!   thumbnails and icons filtered out.
//!
//! Link candidates are matched over raw text rather than parsed markdown
//! because calculator URLs also appear inside YAML content strings and
//! HTML fragments the markdown parser would not surface as links.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;

/// Pricing-experience or calculator URL, locale tolerant
static ESTIMATE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?i)https?://(?:"#,
        r#"azure\.com/e/[^\s)\]\\"'<>]+"#,
        r#"|azure\.microsoft\.com/(?:[a-z]{2}-[a-z]{2}/)?pricing/calculator[^\s)\]\\"'<>]*"#,
        r#")"#,
    ))
    .unwrap()
});

/// Docs `:::image ... :::` block opener
static DOCS_IMAGE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*:::image\b[^\n]*").unwrap());

/// `source="..."` attribute inside a docs image block
static DOCS_IMAGE_SOURCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bsource\s*=\s*(?:"([^"]+)"|'([^']+)'|([^\s>:]+))"#).unwrap());

/// HTML `<img src=...>`
static HTML_IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+\bsrc\s*=\s*(?:"([^"]+)"|'([^']+)'|([^\s>]+))"#).unwrap());

/// HTML `<source srcset=...>`
static HTML_SOURCE_SRCSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<source[^>]+\bsrcset\s*=\s*(?:"([^"]+)"|'([^']+)'|([^\s>]+))"#).unwrap()
});

/// Thumbnails, social cards, and icons are not architecture diagrams
static THUMB_EXCLUDE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(/browse/thumbs/|\bthumbs/|thumbnail|social_image|/icons/)").unwrap());

/// Extract estimate-link candidates from article text
///
/// Returns raw URL strings in discovery order with duplicates removed.
#[must_use]
pub fn extract_estimate_link_candidates(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for m in ESTIMATE_URL_RE.find_iter(text) {
        let url = m.as_str().trim_end_matches(['.', ',', ';']).to_string();
        if !seen.contains(&url) {
            seen.push(url);
        }
    }
    seen
}

/// Extract image references from article text
///
/// Extension-agnostic and reference-style aware; thumbnails and icons are
/// excluded. Returns repo-relative or absolute references in discovery
/// order with duplicates removed.
#[must_use]
pub fn extract_image_refs(text: &str) -> Vec<String> {
    let mut refs = Vec::new();

    // Markdown images; pulldown resolves reference-style definitions itself
    for event in Parser::new(text) {
        if let Event::Start(Tag::Image { dest_url, .. }) = event {
            push_candidate(&mut refs, dest_url.as_ref());
        }
    }

    // Docs :::image blocks
    for block in DOCS_IMAGE_BLOCK_RE.find_iter(text) {
        if let Some(caps) = DOCS_IMAGE_SOURCE_RE.captures(block.as_str()) {
            push_candidate(&mut refs, first_group(&caps));
        }
    }

    // Raw HTML forms
    for caps in HTML_IMG_SRC_RE.captures_iter(text) {
        push_candidate(&mut refs, first_group(&caps));
    }
    for caps in HTML_SOURCE_SRCSET_RE.captures_iter(text) {
        // srcset lists candidates; the first entry names the image
        let raw = first_group(&caps);
        let first = raw
            .split(',')
            .next()
            .and_then(|c| c.split_whitespace().next())
            .unwrap_or_default();
        push_candidate(&mut refs, first);
    }

    refs
}

/// Split YAML frontmatter from markdown body
///
/// Returns the parsed frontmatter (if present and valid) and the body.
#[must_use]
pub fn split_frontmatter(text: &str) -> (Option<serde_yaml::Value>, &str) {
    let Some(rest) = text.strip_prefix("---") else {
        return (None, text);
    };
    let Some(end) = rest.find("\n---") else {
        return (None, text);
    };
    let frontmatter = &rest[..end];
    let body = &rest[end + 4..];
    match serde_yaml::from_str(frontmatter) {
        Ok(value) => (Some(value), body),
        Err(_) => (None, text),
    }
}

fn first_group<'a>(caps: &'a regex::Captures<'_>) -> &'a str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map_or("", |m| m.as_str())
}

fn push_candidate(out: &mut Vec<String>, raw: &str) {
    let cleaned = clean_ref(raw);
    if cleaned.is_empty() || THUMB_EXCLUDE_RE.is_match(&cleaned) {
        return;
    }
    if !out.contains(&cleaned) {
        out.push(cleaned);
    }
}

/// Strip wrapping angle brackets, quotes, and trailing title text
fn clean_ref(raw: &str) -> String {
    let mut s = raw.trim();
    if s.starts_with('<') && s.ends_with('>') {
        s = s[1..s.len() - 1].trim();
    }
    s = s.split_whitespace().next().unwrap_or("");
    s.trim_matches(|c| matches!(c, '"' | '\'' | '(' | ')' | '<' | '>' | '[' | ']'))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_calculator_and_experience_links() {
        let text = r"
See the [estimate](https://azure.com/e/abc123) for costs, or open the
[calculator](https://azure.microsoft.com/en-us/pricing/calculator/?service=storage).
";
        let links = extract_estimate_link_candidates(text);
        assert_eq!(
            links,
            vec![
                "https://azure.com/e/abc123".to_string(),
                "https://azure.microsoft.com/en-us/pricing/calculator/?service=storage".to_string(),
            ]
        );
    }

    #[test]
    fn dedupes_links_preserving_order() {
        let text = "https://azure.com/e/x then https://azure.com/e/y then https://azure.com/e/x";
        let links = extract_estimate_link_candidates(text);
        assert_eq!(links, vec!["https://azure.com/e/x", "https://azure.com/e/y"]);
    }

    #[test]
    fn trims_trailing_sentence_punctuation() {
        let links = extract_estimate_link_candidates("Costs: https://azure.com/e/abc123.");
        assert_eq!(links, vec!["https://azure.com/e/abc123"]);
    }

    #[test]
    fn no_links_in_plain_prose() {
        assert!(extract_estimate_link_candidates("nothing to see here").is_empty());
    }

    #[test]
    fn extracts_inline_markdown_images() {
        let refs = extract_image_refs("![Diagram](./media/architecture.png)");
        assert_eq!(refs, vec!["./media/architecture.png"]);
    }

    #[test]
    fn extracts_reference_style_images() {
        let text = "![Diagram][arch]\n\n[arch]: media/arch-diagram.svg\n";
        let refs = extract_image_refs(text);
        assert_eq!(refs, vec!["media/arch-diagram.svg"]);
    }

    #[test]
    fn extracts_docs_image_blocks() {
        let text = r#":::image type="content" source="media/flow.png" alt-text="Flow":::"#;
        let refs = extract_image_refs(text);
        assert_eq!(refs, vec!["media/flow.png"]);
    }

    #[test]
    fn extracts_html_img_and_srcset() {
        let text = r#"
<img src="media/one.png" alt="one">
<picture><source srcset="media/two.webp 1x, media/two@2x.webp 2x"></picture>
"#;
        let refs = extract_image_refs(text);
        assert_eq!(refs, vec!["media/one.png", "media/two.webp"]);
    }

    #[test]
    fn excludes_thumbnails_and_icons() {
        let text = r"
![thumb](browse/thumbs/card.png)
![icon](/icons/azure.svg)
![real](media/architecture.png)
";
        let refs = extract_image_refs(text);
        assert_eq!(refs, vec!["media/architecture.png"]);
    }

    #[test]
    fn frontmatter_splits_cleanly() {
        let text = "---\nauthor: someone\nms.author: sa\n---\n# Body\n";
        let (fm, body) = split_frontmatter(text);
        let fm = fm.unwrap();
        assert_eq!(fm.get("author").and_then(|v| v.as_str()), Some("someone"));
        assert!(body.contains("# Body"));
    }

    #[test]
    fn missing_frontmatter_returns_whole_text() {
        let (fm, body) = split_frontmatter("# Just a body\n");
        assert!(fm.is_none());
        assert_eq!(body, "# Just a body\n");
    }
}
