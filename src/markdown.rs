//! Line-oriented Markdown styling for the answer panel.
//!
//! Covers the subset the model is told it may use: code fences, lists,
//! headings, blockquotes, horizontal rules, and inline bold/italic/code.
//! Anything unrecognized passes through with plain styling.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Render accumulated (possibly incomplete) Markdown into styled lines.
pub fn render(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code_block = false;
    for raw in text.lines() {
        if raw.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            lines.push(Line::from(Span::styled(
                raw.to_string(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            )));
            continue;
        }
        if in_code_block {
            lines.push(Line::from(Span::styled(
                raw.to_string(),
                Style::default().fg(Color::Yellow),
            )));
            continue;
        }
        lines.push(render_line(raw));
    }
    lines
}

fn render_line(text: &str) -> Line<'static> {
    let body = Style::default().fg(Color::White);

    // Horizontal rule
    if text == "---" || text == "***" || text == "___" {
        return Line::from(Span::styled(
            "──────────────────────────────".to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    // Headings: strip the marker, style by level.
    if text.starts_with('#') {
        let stripped = text.trim_start_matches('#');
        let level = text.len() - stripped.len();
        let heading = stripped.strip_prefix(' ').unwrap_or(stripped);
        if level <= 6 && !heading.is_empty() {
            let style = match level {
                1 => Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                2 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                _ => Style::default().fg(Color::Cyan),
            };
            return Line::from(inline_spans(heading, style));
        }
    }

    // Blockquote
    if let Some(quote) = text.strip_prefix("> ") {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = vec![Span::styled("│ ".to_string(), dim)];
        spans.extend(inline_spans(quote, dim));
        return Line::from(spans);
    }

    // Bullet list
    let trimmed = text.trim_start();
    if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        let indent = " ".repeat(text.len() - trimmed.len());
        let mut spans = vec![Span::styled(
            format!("{indent}• "),
            Style::default().fg(Color::Cyan),
        )];
        spans.extend(inline_spans(item, body));
        return Line::from(spans);
    }

    // Numbered list
    if let Some((marker, item)) = split_numbered_item(trimmed) {
        let indent = " ".repeat(text.len() - trimmed.len());
        let mut spans = vec![Span::styled(
            format!("{indent}{marker} "),
            Style::default().fg(Color::Cyan),
        )];
        spans.extend(inline_spans(item, body));
        return Line::from(spans);
    }

    Line::from(inline_spans(text, body))
}

/// Split `12. item` into the `12.` marker and the item text. Requires the
/// space, so decimals like `3.14` stay plain.
fn split_numbered_item(text: &str) -> Option<(&str, &str)> {
    let digits_end = text.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let item = text[digits_end..].strip_prefix('.')?.strip_prefix(' ')?;
    Some((&text[..digits_end + 1], item))
}

/// Split one line into spans for inline `code`, **bold**, and *italic*.
fn inline_spans(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut i = 0usize;
    let mut seg_start = 0usize;

    while i < len {
        // Marker bytes are ASCII, so indexing is char-boundary safe here.
        if bytes[i] == b'`' {
            if let Some(end) = text[i + 1..].find('`') {
                if i > seg_start {
                    spans.push(Span::styled(text[seg_start..i].to_string(), base));
                }
                spans.push(Span::styled(
                    text[i + 1..i + 1 + end].to_string(),
                    Style::default().fg(Color::Yellow),
                ));
                i = i + 1 + end + 1;
                seg_start = i;
                continue;
            }
        } else if bytes[i] == b'*' && i + 1 < len && bytes[i + 1] == b'*' {
            if let Some(end) = text[i + 2..].find("**") {
                if i > seg_start {
                    spans.push(Span::styled(text[seg_start..i].to_string(), base));
                }
                spans.extend(inline_spans(
                    &text[i + 2..i + 2 + end],
                    base.add_modifier(Modifier::BOLD),
                ));
                i = i + 2 + end + 2;
                seg_start = i;
                continue;
            }
        } else if bytes[i] == b'*' {
            if let Some(end) = text[i + 1..].find('*') {
                if end > 0 {
                    if i > seg_start {
                        spans.push(Span::styled(text[seg_start..i].to_string(), base));
                    }
                    spans.extend(inline_spans(
                        &text[i + 1..i + 1 + end],
                        base.add_modifier(Modifier::ITALIC),
                    ));
                    i = i + 1 + end + 1;
                    seg_start = i;
                    continue;
                }
            }
        }
        i += text[i..].chars().next().map_or(1, |c| c.len_utf8());
    }

    if seg_start < len {
        spans.push(Span::styled(text[seg_start..].to_string(), base));
    }
    if spans.is_empty() {
        spans.push(Span::styled(text.to_string(), base));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn plain_text_passes_through() {
        let lines = render("just a sentence");
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "just a sentence");
    }

    #[test]
    fn bullets_are_replaced() {
        let lines = render("- first\n* second");
        assert_eq!(line_text(&lines[0]), "• first");
        assert_eq!(line_text(&lines[1]), "• second");
    }

    #[test]
    fn numbered_list_markers_are_styled() {
        let lines = render("1. first\n12. twelfth");
        assert_eq!(line_text(&lines[0]), "1. first");
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Cyan));
        assert_eq!(line_text(&lines[1]), "12. twelfth");
        assert_eq!(lines[1].spans[0].content, "12. ");
    }

    #[test]
    fn decimals_are_not_mistaken_for_list_markers() {
        let lines = render("3.14 is pi");
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(line_text(&lines[0]), "3.14 is pi");
    }

    #[test]
    fn heading_marker_is_stripped() {
        let lines = render("## Overview");
        assert_eq!(line_text(&lines[0]), "Overview");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn code_fence_suspends_inline_styling() {
        let lines = render("```\nlet x = **not bold**;\n```");
        assert_eq!(lines.len(), 3);
        assert_eq!(line_text(&lines[1]), "let x = **not bold**;");
        assert_eq!(lines[1].spans.len(), 1);
    }

    #[test]
    fn bold_and_code_spans_are_split_out() {
        let lines = render("use **cargo** and `rustc` here");
        let spans = &lines[0].spans;
        assert!(spans.iter().any(|s| {
            s.content == "cargo" && s.style.add_modifier.contains(Modifier::BOLD)
        }));
        assert!(spans.iter().any(|s| s.content == "rustc"));
        assert_eq!(line_text(&lines[0]), "use cargo and rustc here");
    }

    #[test]
    fn blockquote_gets_a_gutter() {
        let lines = render("> wise words");
        assert_eq!(line_text(&lines[0]), "│ wise words");
    }

    #[test]
    fn unterminated_markers_render_verbatim() {
        let lines = render("a lone ** marker");
        assert_eq!(line_text(&lines[0]), "a lone ** marker");
    }
}
