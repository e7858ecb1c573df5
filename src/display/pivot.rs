//! Terminal rendering of the budget pivot

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use crate::models::format_amount;
use crate::reports::{CategoryColumn, CellTone, PivotCell, PivotReport, PivotRow, RowKind, YearSelection};

use super::labels::Labels;

/// Color a formatted amount by how it compares to its budget
///
/// Under budget is green, over budget is red; anything else is left plain.
pub fn paint(text: String, tone: CellTone, color: bool) -> String {
    if !color {
        return text;
    }
    match tone {
        CellTone::UnderBudget => format!("\x1b[32m{}\x1b[0m", text),
        CellTone::OverBudget => format!("\x1b[31m{}\x1b[0m", text),
        CellTone::OnBudget | CellTone::Unbudgeted => text,
    }
}

/// Two-decimal value of a cell, colored when asked
pub fn format_cell(cell: &PivotCell, color: bool) -> String {
    paint(format_amount(cell.value()), cell.tone(), color)
}

/// Localized label of a row
pub fn row_label(row: &PivotRow, labels: &Labels) -> String {
    match row.kind {
        RowKind::Month(month) => labels.month_name(month),
        RowKind::YearToDate { through } => labels.to_date_through(through),
        RowKind::FullYear => labels.full_year(),
        RowKind::YearEnd => labels.year_end.to_string(),
    }
}

/// Localized header of a column
pub fn column_label(column: &CategoryColumn, labels: &Labels) -> String {
    match column {
        CategoryColumn::Named(name) => name.clone(),
        CategoryColumn::Uncategorized => labels.uncategorized.to_string(),
    }
}

/// Render the pivot as a titled table
pub fn format_pivot(report: &PivotReport, labels: &Labels, color: bool) -> String {
    let year = match report.selection {
        YearSelection::Year(year) => year.to_string(),
        YearSelection::All => labels.all_years.to_string(),
    };

    let mut builder = Builder::default();

    let mut header = vec![labels.month.to_string()];
    header.extend(report.columns.iter().map(|c| column_label(c, labels)));
    header.push(labels.total.to_string());
    builder.push_record(header);

    for row in report.rows() {
        let mut record = vec![row_label(row, labels)];
        record.extend(row.cells.iter().map(|cell| format_cell(cell, color)));
        record.push(format_cell(&row.total, color));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

    format!("{}\n\n{}\n", labels.pivot_title(&year), table)
}
