//! Plain-text report rendering for a completed response
//!
//! Produces the markdown-ish text handed to downstream exporters (PDF/Word
//! generation itself lives elsewhere). Only a final, complete parse result is
//! meaningful here; the CLI enforces that before calling in.

use crate::block::Block;

/// Render blocks to a markdown-flavored report
pub fn render_report(blocks: &[Block]) -> String {
    let mut out = String::new();

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_block(&mut out, block);
    }

    out
}

fn render_block(out: &mut String, block: &Block) {
    match block {
        Block::Markdown { content } => {
            out.push_str(content);
            out.push('\n');
        }
        Block::Kpi { data } => kpi_line(out, data),
        Block::KpiGroup { data } => {
            for item in &data.items {
                kpi_line(out, item);
            }
        }
        Block::BarChart { data } | Block::LineChart { data } => {
            if let Some(title) = &data.title {
                out.push_str(&format!("## {}\n", title));
            }
            for dataset in &data.datasets {
                if let Some(name) = &dataset.name {
                    out.push_str(&format!("{}:\n", name));
                }
                for (label, value) in data.labels.iter().zip(&dataset.values) {
                    out.push_str(&format!("- {}: {}\n", label, value));
                }
            }
        }
        Block::PieChart { data } => {
            if let Some(title) = &data.title {
                out.push_str(&format!("## {}\n", title));
            }
            let total: f64 = data.segments.iter().map(|s| s.value).sum();
            for segment in &data.segments {
                let pct = if total > 0.0 {
                    segment.value / total * 100.0
                } else {
                    0.0
                };
                out.push_str(&format!(
                    "- {}: {} ({:.0}%)\n",
                    segment.label, segment.value, pct
                ));
            }
        }
        Block::Table { data } => {
            if let Some(title) = &data.title {
                out.push_str(&format!("## {}\n", title));
            }
            out.push_str(&format!("| {} |\n", data.columns.join(" | ")));
            out.push_str(&format!(
                "|{}|\n",
                data.columns.iter().map(|_| " --- ").collect::<Vec<_>>().join("|")
            ));
            for row in &data.rows {
                let cells: Vec<String> = row.iter().map(|c| c.display()).collect();
                out.push_str(&format!("| {} |\n", cells.join(" | ")));
            }
        }
        Block::List { data } => {
            if let Some(title) = &data.title {
                out.push_str(&format!("## {}\n", title));
            }
            let ordered = data.ordered.unwrap_or(false);
            for (i, item) in data.items.iter().enumerate() {
                if ordered {
                    out.push_str(&format!("{}. {}\n", i + 1, item));
                } else {
                    out.push_str(&format!("- {}\n", item));
                }
            }
        }
        Block::Unknown { tag, .. } => {
            out.push_str(&format!("> unrenderable block type `{}` omitted\n", tag));
        }
    }
}

fn kpi_line(out: &mut String, data: &crate::block::KpiData) {
    out.push_str(&format!("**{}:** {}", data.title, data.value.display()));
    if let Some(subtitle) = &data.subtitle {
        out.push_str(&format!(" ({})", subtitle));
    }
    if let Some(trend) = &data.trend {
        out.push_str(&format!(" {}", trend));
    }
    out.push('\n');
}
