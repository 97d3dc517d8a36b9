use comfy_table::{presets::UTF8_FULL, Table};
use placemap_core::import::ImportSummary;

/// Renders the counters of an import run for the terminal.
pub fn summary_table(summary: &ImportSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Count"]);
    for (label, count) in [
        ("Total rows", summary.total),
        ("Imported", summary.success),
        ("Failed", summary.failed),
        ("Skipped", summary.skipped),
    ] {
        table.add_row(vec![label.to_string(), count.to_string()]);
    }
    table
}
