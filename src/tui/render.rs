//! Progressive block renderer
//!
//! Turns a `ParseResult` into styled lines, one pass, in block order. Blocks
//! already shown in a previous pass render identically in the next one (the
//! parser guarantees a longer buffer only appends blocks), so the transcript
//! grows monotonically while streaming and never flickers.

use crate::block::{Block, ChartData, KpiData, KpiGroupData, ListData, PieData, TableData};
use crate::config::config;
use crate::parser::ParseResult;
use crate::registry;
use crate::util::{fit_cell, truncate_str};
use ratatui::prelude::*;
use unicode_width::UnicodeWidthStr;

// Palette shared with ui.rs
const ACCENT_COLOR: Color = Color::Rgb(186, 139, 255);
const DIM_COLOR: Color = Color::Rgb(100, 100, 100);
const VALUE_COLOR: Color = Color::Rgb(255, 255, 255);
const BAR_COLOR: Color = Color::Rgb(129, 199, 132);
const UP_COLOR: Color = Color::Rgb(129, 199, 132);
const DOWN_COLOR: Color = Color::Rgb(239, 83, 80);
const WARN_COLOR: Color = Color::Rgb(255, 193, 7);
const ERROR_COLOR: Color = Color::Rgb(239, 83, 80);

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPARK_LEVELS: &[char] = &['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render one parse snapshot of a streamed response.
///
/// `buffer_empty` distinguishes "nothing received yet" (neutral loading
/// placeholder) from "received text with no complete blocks yet" (spinner
/// only). `tick` animates the spinner.
pub fn render_response(result: &ParseResult, buffer_empty: bool, tick: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    if let Some(error) = &result.error {
        lines.push(Line::from(vec![
            Span::styled("✗ ", Style::default().fg(ERROR_COLOR)),
            Span::styled(error.to_string(), Style::default().fg(ERROR_COLOR)),
        ]));
        return lines;
    }

    for (i, block) in result.blocks.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.extend(render_block(block));
    }

    if !result.is_complete {
        if buffer_empty && result.blocks.is_empty() {
            lines.push(Line::from(Span::styled(
                "waiting for response…",
                Style::default().fg(DIM_COLOR),
            )));
        } else {
            if !result.blocks.is_empty() {
                lines.push(Line::from(""));
            }
            let frame = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
            lines.push(Line::from(Span::styled(
                format!("{} streaming…", frame),
                Style::default().fg(DIM_COLOR),
            )));
        }
    } else if result.blocks.is_empty() {
        lines.push(Line::from(Span::styled(
            "no content",
            Style::default().fg(DIM_COLOR),
        )));
    }

    lines
}

/// Render a single block to styled lines
pub fn render_block(block: &Block) -> Vec<Line<'static>> {
    match block {
        Block::Markdown { content } => super::markdown::render_markdown(content),
        Block::Kpi { data } => vec![kpi_line(data)],
        Block::KpiGroup { data } => render_kpi_group(data),
        Block::BarChart { data } => render_bar_chart(data),
        Block::LineChart { data } => render_line_chart(data),
        Block::PieChart { data } => render_pie_chart(data),
        Block::Table { data } => render_table(data),
        Block::List { data } => render_list(data),
        Block::Unknown { tag, raw } => render_unknown(tag, raw),
    }
}

fn title_line(glyph: &str, title: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{} ", glyph), Style::default().fg(ACCENT_COLOR)),
        Span::styled(title.to_string(), Style::default().fg(ACCENT_COLOR).bold()),
    ])
}

fn kpi_line(data: &KpiData) -> Line<'static> {
    let mut spans = vec![
        Span::styled("◆ ", Style::default().fg(ACCENT_COLOR)),
        Span::styled(format!("{}: ", data.title), Style::default().fg(DIM_COLOR)),
        Span::styled(
            data.value.display(),
            Style::default().fg(VALUE_COLOR).bold(),
        ),
    ];
    if let Some(subtitle) = &data.subtitle {
        spans.push(Span::styled(
            format!(" ({})", subtitle),
            Style::default().fg(DIM_COLOR),
        ));
    }
    if let Some(trend) = &data.trend {
        use crate::block::TrendDirection::*;
        let (arrow, color) = match data.trend_direction {
            Some(Up) => ("↑", UP_COLOR),
            Some(Down) => ("↓", DOWN_COLOR),
            Some(Neutral) | None => ("→", DIM_COLOR),
        };
        spans.push(Span::styled(
            format!(" {} {}", arrow, trend),
            Style::default().fg(color),
        ));
    }
    Line::from(spans)
}

fn render_kpi_group(data: &KpiGroupData) -> Vec<Line<'static>> {
    data.items.iter().map(kpi_line).collect()
}

/// Label column width for chart rows, bounded so long labels can't push the
/// bars off screen
fn label_width(labels: &[String]) -> usize {
    labels.iter().map(|l| l.width()).max().unwrap_or(0).min(20)
}

fn render_bar_chart(data: &ChartData) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(title) = &data.title {
        lines.push(title_line("▮", title));
    }

    let max = data
        .datasets
        .iter()
        .flat_map(|d| d.values.iter().copied())
        .fold(0.0_f64, f64::max);
    let width = config().display.chart_width;
    let labels_w = label_width(&data.labels);
    let multi = data.datasets.len() > 1;

    for (i, label) in data.labels.iter().enumerate() {
        for dataset in &data.datasets {
            let Some(&value) = dataset.values.get(i) else {
                // Dataset shorter than labels: nothing to draw for this row
                continue;
            };
            // Zero stays empty; any nonzero value gets at least one cell
            let filled = if max > 0.0 && value > 0.0 {
                (((value / max) * width as f64).round() as usize).max(1)
            } else {
                0
            };
            let color = dataset
                .color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(BAR_COLOR);
            let mut spans = vec![
                Span::styled(
                    format!("{} ", fit_cell(label, labels_w)),
                    Style::default().fg(DIM_COLOR),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::styled(
                    format!(" {}", trim_float(value)),
                    Style::default().fg(VALUE_COLOR),
                ),
            ];
            if multi {
                if let Some(name) = &dataset.name {
                    spans.push(Span::styled(
                        format!("  {}", name),
                        Style::default().fg(DIM_COLOR),
                    ));
                }
            }
            lines.push(Line::from(spans));
        }
    }

    lines
}

fn render_line_chart(data: &ChartData) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(title) = &data.title {
        lines.push(title_line("╱", title));
    }

    for dataset in &data.datasets {
        if dataset.values.is_empty() {
            continue;
        }
        let min = dataset.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = dataset
            .values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let span = (max - min).max(f64::EPSILON);
        let spark: String = dataset
            .values
            .iter()
            .map(|v| {
                let level = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            })
            .collect();
        let color = dataset
            .color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(BAR_COLOR);

        let name = dataset.name.clone().unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12} ", name), Style::default().fg(DIM_COLOR)),
            Span::styled(spark, Style::default().fg(color)),
            Span::styled(
                format!(" {} – {}", trim_float(min), trim_float(max)),
                Style::default().fg(DIM_COLOR),
            ),
        ]));
    }

    // Axis hint: first and last category
    if data.labels.len() >= 2 {
        lines.push(Line::from(Span::styled(
            format!(
                "{:<12} {} → {}",
                "",
                data.labels[0],
                data.labels[data.labels.len() - 1]
            ),
            Style::default().fg(DIM_COLOR),
        )));
    }

    lines
}

fn render_pie_chart(data: &PieData) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(title) = &data.title {
        lines.push(title_line("◔", title));
    }

    let total: f64 = data.segments.iter().map(|s| s.value).sum();
    let width = config().display.chart_width;
    let labels: Vec<String> = data.segments.iter().map(|s| s.label.clone()).collect();
    let labels_w = label_width(&labels);

    for segment in &data.segments {
        let share = if total > 0.0 {
            segment.value / total
        } else {
            0.0
        };
        let filled = if share > 0.0 {
            ((share * width as f64).round() as usize).max(1)
        } else {
            0
        };
        let color = segment
            .color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(BAR_COLOR);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", fit_cell(&segment.label, labels_w)),
                Style::default().fg(DIM_COLOR),
            ),
            Span::styled("■".repeat(filled), Style::default().fg(color)),
            Span::styled(
                format!(" {} ({:.0}%)", trim_float(segment.value), share * 100.0),
                Style::default().fg(VALUE_COLOR),
            ),
        ]));
    }

    lines
}

fn render_table(data: &TableData) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(title) = &data.title {
        lines.push(title_line("▦", title));
    }

    // Column width: widest of header and cells, capped
    let widths: Vec<usize> = data
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let cells = data
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.display().width())
                .max()
                .unwrap_or(0);
            col.width().max(cells).min(24)
        })
        .collect();

    let header: Vec<Span<'static>> = data
        .columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| {
            Span::styled(
                format!("{}  ", fit_cell(col, *w)),
                Style::default().fg(VALUE_COLOR).bold(),
            )
        })
        .collect();
    lines.push(Line::from(header));

    let rule_width = widths.iter().map(|w| w + 2).sum::<usize>().saturating_sub(2);
    lines.push(Line::from(Span::styled(
        "─".repeat(rule_width),
        Style::default().fg(DIM_COLOR),
    )));

    let max_rows = config().display.max_table_rows;
    for row in data.rows.iter().take(max_rows) {
        let spans: Vec<Span<'static>> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = row.get(i).map(|c| c.display()).unwrap_or_default();
                Span::raw(format!("{}  ", fit_cell(&cell, *w)))
            })
            .collect();
        lines.push(Line::from(spans));
    }

    if data.rows.len() > max_rows {
        lines.push(Line::from(Span::styled(
            format!("… {} more rows", data.rows.len() - max_rows),
            Style::default().fg(DIM_COLOR),
        )));
    }

    lines
}

fn render_list(data: &ListData) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(title) = &data.title {
        lines.push(title_line("•", title));
    }

    let ordered = data.ordered.unwrap_or(false);
    for (i, item) in data.items.iter().enumerate() {
        let marker = if ordered {
            format!("{}. ", i + 1)
        } else {
            "• ".to_string()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(DIM_COLOR)),
            Span::raw(item.clone()),
        ]));
    }

    lines
}

/// Diagnostic placeholder for tags outside the registry.
///
/// Shows the tag and a truncated raw payload so the unexpected block can be
/// diagnosed without aborting the rest of the render.
fn render_unknown(tag: &str, raw: &serde_json::Value) -> Vec<Line<'static>> {
    debug_assert!(registry::lookup(tag).is_none());

    let preview_bytes = config().display.unknown_preview_bytes;
    let raw_text = raw.to_string();
    let preview = truncate_str(&raw_text, preview_bytes);
    let suffix = if preview.len() < raw_text.len() { "…" } else { "" };

    vec![
        Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(WARN_COLOR)),
            Span::styled(
                format!("unknown block type \"{}\"", tag),
                Style::default().fg(WARN_COLOR),
            ),
        ]),
        Line::from(Span::styled(
            format!("  {}{}", preview, suffix),
            Style::default().fg(DIM_COLOR),
        )),
    ]
}

/// Parse "#RRGGBB" into a terminal color
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    // Length is in bytes; a multibyte char would make the slices panic
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}
