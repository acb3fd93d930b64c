#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Code extraction from Jupyter notebooks.

use serde::Deserialize;

/// Text placed between consecutive code cells in the extracted source.
pub const CELL_SEPARATOR: &str = "\n\n# --- Next Cell ---\n\n";

/// The only part of the nbformat document we care about.
#[derive(Debug, Deserialize)]
struct Notebook {
    /// Ordered cells of the document.
    cells: Vec<Cell>,
}

/// A single notebook cell.
#[derive(Debug, Deserialize)]
struct Cell {
    /// `code`, `markdown` or `raw`.
    cell_type: String,
    /// Cell source.
    #[serde(default)]
    source:    CellSource,
}

/// nbformat allows the source as a list of lines or as one string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    /// Lines that already carry their own newlines.
    Lines(Vec<String>),
    /// The whole source as one string.
    Text(String),
}

impl Default for CellSource {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl CellSource {
    /// Joins the source into a single string.
    fn into_text(self) -> String {
        match self {
            Self::Lines(lines) => lines.concat(),
            Self::Text(text) => text,
        }
    }
}

/// Extracts the source of every non-blank code cell, in document order,
/// joined with [`CELL_SEPARATOR`]. Markdown and raw cells, and all outputs,
/// are ignored.
pub fn extract_code(raw: &str) -> serde_json::Result<String> {
    let notebook: Notebook = serde_json::from_str(raw)?;

    let cells: Vec<String> = notebook
        .cells
        .into_iter()
        .filter(|cell| cell.cell_type == "code")
        .map(|cell| cell.source.into_text())
        .filter(|code| !code.trim().is_empty())
        .collect();

    Ok(cells.join(CELL_SEPARATOR))
}
