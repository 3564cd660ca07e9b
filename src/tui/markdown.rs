//! Markdown rendering for `markdown` blocks

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use ratatui::prelude::*;

// Colors matching render.rs palette
const CODE_BG: Color = Color::Rgb(45, 45, 45);
const CODE_FG: Color = Color::Rgb(180, 180, 180);
const BOLD_COLOR: Color = Color::Rgb(255, 255, 255);
const HEADING_COLOR: Color = Color::Rgb(138, 180, 248);
const DIM_COLOR: Color = Color::Rgb(100, 100, 100);

/// Render markdown text to styled ratatui Lines
pub fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current_spans: Vec<Span<'static>> = Vec::new();

    let mut bold = false;
    let mut italic = false;
    let mut in_code_block = false;
    let mut in_heading = false;
    let mut list_ordinal: Option<u64> = None;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                flush(&mut lines, &mut current_spans);
                in_heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut lines, &mut current_spans);
                in_heading = false;
            }

            Event::Start(Tag::Strong) => bold = true,
            Event::End(TagEnd::Strong) => bold = false,
            Event::Start(Tag::Emphasis) => italic = true,
            Event::End(TagEnd::Emphasis) => italic = false,

            Event::Start(Tag::CodeBlock(kind)) => {
                flush(&mut lines, &mut current_spans);
                in_code_block = true;
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => lang.to_string(),
                    _ => String::new(),
                };
                lines.push(Line::from(Span::styled(
                    format!("┌─ {} ", lang),
                    Style::default().fg(DIM_COLOR),
                )));
            }
            Event::End(TagEnd::CodeBlock) => {
                lines.push(Line::from(Span::styled(
                    "└─",
                    Style::default().fg(DIM_COLOR),
                )));
                in_code_block = false;
            }

            Event::Code(code) => {
                current_spans.push(Span::styled(
                    format!("`{}`", code),
                    Style::default().fg(CODE_FG).bg(CODE_BG),
                ));
            }

            Event::Text(text) => {
                if in_code_block {
                    // Verbatim lines with a left border, no highlighting
                    for code_line in text.lines() {
                        lines.push(Line::from(vec![
                            Span::styled("│ ", Style::default().fg(DIM_COLOR)),
                            Span::styled(code_line.to_string(), Style::default().fg(CODE_FG)),
                        ]));
                    }
                } else if in_heading {
                    current_spans.push(Span::styled(
                        text.to_string(),
                        Style::default().fg(HEADING_COLOR).bold(),
                    ));
                } else {
                    let style = match (bold, italic) {
                        (true, true) => Style::default().fg(BOLD_COLOR).bold().italic(),
                        (true, false) => Style::default().fg(BOLD_COLOR).bold(),
                        (false, true) => Style::default().italic(),
                        (false, false) => Style::default(),
                    };
                    current_spans.push(Span::styled(text.to_string(), style));
                }
            }

            Event::SoftBreak => {
                if !in_code_block {
                    current_spans.push(Span::raw(" "));
                }
            }
            Event::HardBreak => {
                flush(&mut lines, &mut current_spans);
            }

            Event::Start(Tag::List(start)) => {
                flush(&mut lines, &mut current_spans);
                list_ordinal = start;
            }
            Event::End(TagEnd::List(_)) => {
                list_ordinal = None;
            }
            Event::Start(Tag::Item) => {
                let marker = match list_ordinal.as_mut() {
                    Some(n) => {
                        let m = format!("{}. ", n);
                        *n += 1;
                        m
                    }
                    None => "• ".to_string(),
                };
                current_spans.push(Span::styled(marker, Style::default().fg(DIM_COLOR)));
            }
            Event::End(TagEnd::Item) => {
                flush(&mut lines, &mut current_spans);
            }

            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                flush(&mut lines, &mut current_spans);
            }

            _ => {}
        }
    }

    if !current_spans.is_empty() {
        lines.push(Line::from(current_spans));
    }

    lines
}

fn flush(lines: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>) {
    if !spans.is_empty() {
        lines.push(Line::from(std::mem::take(spans)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_simple_markdown() {
        let lines = render_markdown("Hello **world**");
        assert_eq!(lines.len(), 1);
        assert_eq!(text_of(&lines[0]), "Hello world");
    }

    #[test]
    fn test_heading_then_paragraph() {
        let lines = render_markdown("# Summary\n\nAll good.");
        assert_eq!(text_of(&lines[0]), "Summary");
        assert_eq!(text_of(&lines[1]), "All good.");
    }

    #[test]
    fn test_unordered_and_ordered_lists() {
        let lines = render_markdown("- a\n- b");
        assert_eq!(text_of(&lines[0]), "• a");
        assert_eq!(text_of(&lines[1]), "• b");

        let lines = render_markdown("1. first\n2. second");
        assert_eq!(text_of(&lines[0]), "1. first");
        assert_eq!(text_of(&lines[1]), "2. second");
    }

    #[test]
    fn test_code_block_verbatim() {
        let lines = render_markdown("```\nlet x = 1;\n```");
        assert_eq!(lines.len(), 3);
        assert!(text_of(&lines[1]).contains("let x = 1;"));
    }
}
