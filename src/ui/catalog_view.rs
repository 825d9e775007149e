//! Tabular rendering of a catalog listing

use std::io::{self, Write};
use std::path::Path;

use crate::core::document::DocumentRecord;

const NAME_WIDTH: usize = 40;

/// Catalog table printer
pub struct CatalogView;

impl CatalogView {
    /// Print `records` as a numbered table, grouped by category.
    ///
    /// Numbers are 1-based positions in `records`, which is what the shell
    /// uses for selection.
    pub fn show(out: &mut impl Write, root: &Path, records: &[DocumentRecord]) -> io::Result<()> {
        if records.is_empty() {
            writeln!(out, "No documents found in {}", root.display())?;
            return Ok(());
        }

        let mut current_category: Option<&str> = None;
        for (index, record) in records.iter().enumerate() {
            if current_category != Some(record.category.as_str()) {
                writeln!(out)?;
                writeln!(out, "[{}]", record.category)?;
                current_category = Some(record.category.as_str());
            }
            writeln!(out, "{}", Self::row(index + 1, record))?;
        }

        writeln!(out)?;
        writeln!(out, "{} document(s) in {}", records.len(), root.display())?;
        Ok(())
    }

    /// Format a single table row
    fn row(number: usize, record: &DocumentRecord) -> String {
        let modified = record
            .modified_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = if record.accessible { "" } else { "  (missing)" };

        format!(
            "{:>3}. {:<width$} {:<5} {:>10}  {}{}",
            number,
            truncate(&record.name, NAME_WIDTH),
            record.extension,
            record.size_display,
            modified,
            status,
            width = NAME_WIDTH
        )
    }
}

/// Shorten `s` to at most `max` characters, marking the cut with `...`
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
