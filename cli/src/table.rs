//! Plain-text table for `list` output.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use std::fmt::Write;

use export_manager::format::{format_created, format_export_date, format_record_count, subtype_label};
use export_manager::{ExportRecord, Module};

/// Render `records` in backend order. MNRL tables gain a data type column.
pub fn render(module: Module, records: &[ExportRecord]) -> String {
    let with_type = module == Module::Mnrl;
    let mut rows = Vec::with_capacity(records.len() + 1);

    let mut header = vec!["NAME"];
    if with_type {
        header.push("DATA TYPE");
    }
    header.extend(["RECORDS", "EXPORT DATE", "CREATED", "ID"]);
    rows.push(header.into_iter().map(str::to_owned).collect::<Vec<_>>());

    for record in records {
        let mut row = vec![record.name.clone()];
        if with_type {
            row.push(subtype_label(record.data_type).to_owned());
        }
        row.extend([
            format_record_count(record.record_count),
            format_export_date(&record.export_date),
            format_created(&record.created_date),
            record.id.clone(),
        ]);
        rows.push(row);
    }

    let columns = rows[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|i| rows.iter().map(|row| row[i].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i + 1 == columns {
                line.push_str(cell);
            } else {
                let _ = write!(line, "{cell:<width$}  ", width = widths[i]);
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
