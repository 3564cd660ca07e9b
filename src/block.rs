//! Block data model for AI-generated UI responses
//!
//! The model answers with one JSON document: `{"blocks": [...]}`, where each
//! block is an object tagged with `type` and a type-specific payload. This
//! module defines the closed set of block variants plus an explicit `Unknown`
//! variant for structurally valid blocks with a tag we don't recognize.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key that introduces the block array in the response document
pub const BLOCKS_KEY: &str = "blocks";

/// A single string-or-number value (table cells, KPI values)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Display form, trimming the ".0" serde_json would keep on whole floats
    pub fn display(&self) -> String {
        match self {
            Scalar::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Scalar::Text(s) => s.clone(),
        }
    }
}

/// Trend direction for a KPI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

/// Payload of a `kpi` block (also the element type of `kpiGroup`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiData {
    pub title: String,
    pub value: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_direction: Option<TrendDirection>,
}

/// Payload of a `kpiGroup` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiGroupData {
    pub items: Vec<KpiData>,
}

/// One series in a bar or line chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Values aligned by index to the chart's labels
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload of `barChart` and `lineChart` blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Ordered category names
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One slice of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload of a `pieChart` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub segments: Vec<Segment>,
}

/// Payload of a `table` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub columns: Vec<String>,
    /// Each row is aligned by index to `columns`
    pub rows: Vec<Vec<Scalar>>,
}

/// Payload of a `list` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,
}

/// One renderable unit of an AI response
///
/// The tagged variants are the closed set the producer is contracted to emit.
/// `Unknown` carries anything with a valid non-empty tag outside that set, so
/// the renderer can show a diagnostic placeholder instead of dropping it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Markdown { content: String },
    Kpi { data: KpiData },
    KpiGroup { data: KpiGroupData },
    BarChart { data: ChartData },
    LineChart { data: ChartData },
    PieChart { data: PieData },
    Table { data: TableData },
    List { data: ListData },
    #[serde(skip)]
    Unknown { tag: String, raw: Value },
}

impl Block {
    /// Convert one parsed JSON object into a block.
    ///
    /// Returns `None` when the object has no usable `type` tag or when a
    /// known tag's payload doesn't match its expected shape (such blocks are
    /// dropped by the caller). A non-empty tag outside the known set yields
    /// `Unknown` with the raw payload preserved.
    pub fn from_value(value: Value) -> Option<Block> {
        let tag = value.get("type")?.as_str()?;
        if tag.is_empty() {
            return None;
        }

        if !crate::registry::is_supported(tag) {
            return Some(Block::Unknown {
                tag: tag.to_string(),
                raw: value,
            });
        }

        // Known tag: the payload must match its declared shape
        serde_json::from_value(value).ok()
    }

    /// The wire tag for this block
    pub fn tag(&self) -> &str {
        match self {
            Block::Markdown { .. } => "markdown",
            Block::Kpi { .. } => "kpi",
            Block::KpiGroup { .. } => "kpiGroup",
            Block::BarChart { .. } => "barChart",
            Block::LineChart { .. } => "lineChart",
            Block::PieChart { .. } => "pieChart",
            Block::Table { .. } => "table",
            Block::List { .. } => "list",
            Block::Unknown { tag, .. } => tag,
        }
    }

    pub fn markdown(content: &str) -> Self {
        Block::Markdown {
            content: content.to_string(),
        }
    }
}
