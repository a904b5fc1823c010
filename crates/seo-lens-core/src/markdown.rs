//! Markdown to plain text.
//!
//! Page copy is often drafted in markdown. For SEO purposes headings, link
//! text, list items and image alt text are all visible content, so they are
//! kept; code and front matter are not.
//!
//! Uses pulldown-cmark for proper CommonMark parsing.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Reduce markdown to the text a visitor (or crawler) would read.
///
/// Each block (paragraph, heading, list item, table cell row, blockquote)
/// ends with a blank line so paragraph counts survive.
///
/// Removes:
/// - YAML front matter
/// - Fenced and indented code blocks, inline code
/// - Raw HTML
/// - Link and image URLs (link text and alt text stay)
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn to_plain_text(text: &str) -> String {
    let body = strip_front_matter(text);

    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(body, options);

    let mut out = String::with_capacity(body.len());
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,

            Event::Text(t) if !in_code_block => out.push_str(&t),
            Event::SoftBreak | Event::HardBreak => out.push(' '),

            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::TableRow
                | TagEnd::TableHead,
            ) => end_block(&mut out),
            Event::End(TagEnd::TableCell) => out.push(' '),

            _ => {}
        }
    }

    out.trim_end().to_string()
}

fn end_block(out: &mut String) {
    let trimmed = out.trim_end_matches([' ', '\n']).len();
    out.truncate(trimmed);
    if !out.is_empty() {
        out.push_str("\n\n");
    }
}

/// Drop a leading `---` delimited YAML block.
fn strip_front_matter(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(rest) = trimmed.strip_prefix("---") else {
        return text;
    };
    let Some(close) = rest.find("\n---") else {
        return text;
    };
    let after = &rest[close + 4..];
    after.strip_prefix('\n').unwrap_or(after)
}
