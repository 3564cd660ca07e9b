//! Block type registry
//!
//! Fixed mapping from a block's wire tag to its display descriptor. The set is
//! closed: anything not listed here is rendered through the unknown-type
//! placeholder. The table is a read-only static, safe for concurrent lookup.

/// Display descriptor for a registered block type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockType {
    /// Wire tag (e.g. "barChart")
    pub tag: &'static str,
    /// Human-readable label for headers and logs
    pub label: &'static str,
    /// Glyph shown next to the block header
    pub glyph: &'static str,
}

/// All block types the renderer knows how to draw
pub const BLOCK_TYPES: &[BlockType] = &[
    BlockType { tag: "markdown", label: "Markdown", glyph: "¶" },
    BlockType { tag: "kpi", label: "KPI", glyph: "◆" },
    BlockType { tag: "kpiGroup", label: "KPI Group", glyph: "◆" },
    BlockType { tag: "barChart", label: "Bar Chart", glyph: "▮" },
    BlockType { tag: "lineChart", label: "Line Chart", glyph: "╱" },
    BlockType { tag: "pieChart", label: "Pie Chart", glyph: "◔" },
    BlockType { tag: "table", label: "Table", glyph: "▦" },
    BlockType { tag: "list", label: "List", glyph: "•" },
];

/// Find the descriptor for a wire tag
pub fn lookup(tag: &str) -> Option<&'static BlockType> {
    BLOCK_TYPES.iter().find(|t| t.tag == tag)
}

/// Whether the tag belongs to the closed supported set
pub fn is_supported(tag: &str) -> bool {
    lookup(tag).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_tags() {
        for tag in [
            "markdown",
            "kpi",
            "kpiGroup",
            "barChart",
            "lineChart",
            "pieChart",
            "table",
            "list",
        ] {
            assert!(is_supported(tag), "{} should be registered", tag);
        }
        assert_eq!(lookup("table").unwrap().label, "Table");
    }

    #[test]
    fn test_lookup_is_exact_and_case_sensitive() {
        assert!(!is_supported("kpigroup"));
        assert!(!is_supported("gauge"));
        assert!(!is_supported(""));
    }
}
