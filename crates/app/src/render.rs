use std::collections::HashSet;

use pulldown_cmark::{Options, Parser, html};

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "pre", "blockquote", "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6",
    "tr", "table",
];

/// Turn lecture content (Markdown or HTML) into sanitized plain text.
#[must_use]
pub fn lecture_to_text(content: &str) -> String {
    let html = if looks_like_html(content) {
        content.to_owned()
    } else {
        markdown_to_html(content)
    };
    html_to_text(&sanitize_html(&html))
}

#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(input, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Keep structural tags only; scripts, styles and attributes are dropped.
#[must_use]
pub fn sanitize_html(input: &str) -> String {
    let mut tags: HashSet<&str> = BLOCK_TAGS.iter().copied().collect();
    tags.extend(["span", "em", "strong", "b", "i", "code", "a", "td", "th"]);

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(Default::default())
        .generic_attributes(HashSet::new())
        .link_rel(None)
        .clean(input)
        .to_string()
}

#[must_use]
pub fn looks_like_html(input: &str) -> bool {
    let trimmed = input.trim_start();
    trimmed.starts_with('<')
        && ["<p", "<div", "<h", "<ul", "<ol", "<pre", "<br", "<span", "<code"]
            .iter()
            .any(|tag| trimmed.to_ascii_lowercase().contains(tag))
}

fn html_to_text(sanitized: &str) -> String {
    let mut marked = sanitized.replace("<li>", "<li>• ");
    for tag in BLOCK_TAGS {
        marked = marked.replace(&format!("</{tag}>"), &format!("</{tag}>\n"));
    }
    marked = marked.replace("<br>", "\n");

    let stripped = ammonia::Builder::empty().clean(&marked).to_string();
    let decoded = decode_entities(&stripped);

    decoded
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_headings_and_lists_become_lines() {
        let text = lecture_to_text("# Loops\n\nUse **for**:\n\n- one\n- two\n");
        assert_eq!(text, "Loops\nUse for:\n• one\n• two");
    }

    #[test]
    fn html_scripts_are_removed() {
        let text = lecture_to_text("<p>Hello <b>world</b></p><script>alert(1)</script>");
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn code_keeps_comparison_operators() {
        let text = lecture_to_text("```\nif a < b && c > d {}\n```");
        assert_eq!(text, "if a < b && c > d {}");
    }

    #[test]
    fn detects_html() {
        assert!(looks_like_html("<div>x</div>"));
        assert!(!looks_like_html("# title"));
        assert!(!looks_like_html("a < b"));
    }
}
