use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use tus_cli::pipeline::RunResult;
use tus_model::{Diagnostic, Severity};
use tus_transform::ModuleSummary;

/// Longest message shown in the diagnostics table before truncation.
const MAX_MESSAGE_CHARS: usize = 160;

pub fn print_summary(result: &RunResult) {
    println!();
    println!("Layout: {}", result.layout_name);
    println!("Output: {}", result.written.table.display());
    println!(
        "Logs: {}",
        result
            .written
            .diagnostics
            .parent()
            .map_or_else(|| "-".to_string(), |dir| dir.display().to_string())
    );

    print_module_table(&result.output.modules, result.output.table.height());

    let summary = result.diagnostics().summary();
    println!();
    println!(
        "Linked table: {} rows x {} columns",
        result.output.table.height(),
        result.output.table.width()
    );
    let mut counts = Table::new();
    counts.set_header(vec![
        header_cell("Info"),
        header_cell("Warnings"),
        header_cell("Errors"),
        header_cell("Total"),
    ]);
    apply_table_style(&mut counts);
    counts.add_row(vec![
        count_cell(summary.info, Color::Cyan),
        count_cell(summary.warnings, Color::Yellow),
        count_cell(summary.errors, Color::Red),
        Cell::new(summary.total()).add_attribute(Attribute::Bold),
    ]);
    println!("{counts}");

    let notable: Vec<&Diagnostic> = result
        .diagnostics()
        .iter()
        .filter(|diagnostic| diagnostic.severity != Severity::Info)
        .collect();
    if !notable.is_empty() {
        print_diagnostics(&notable);
    }

    if !result.read_failures.is_empty() {
        println!();
        println!("Unreadable files:");
        for failure in &result.read_failures {
            println!("  - {}: {}", failure.path.display(), failure.message);
        }
    }
    if !result.unassigned.is_empty() {
        println!();
        println!("Ignored files (no matching module):");
        for path in &result.unassigned {
            println!("  - {}", path.display());
        }
    }
}

fn print_module_table(modules: &[ModuleSummary], output_rows: usize) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Module"),
        header_cell("Parts"),
        header_cell("Rows"),
        header_cell("Dropped"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);

    for module in modules {
        let dropped = if module.dropped.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(module.dropped.join(", ")).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(module.kind.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(module.parts),
            Cell::new(module.rows),
            dropped,
            status_cell(module),
        ]);
    }
    table.add_row(vec![
        Cell::new("output").add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(output_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn print_diagnostics(diagnostics: &[&Diagnostic]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Stage"),
        header_cell("Module"),
        header_cell("Kind"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for diagnostic in diagnostics {
        table.add_row(vec![
            severity_cell(diagnostic.severity),
            Cell::new(diagnostic.stage.as_str()),
            diagnostic
                .module
                .map_or_else(|| dim_cell("-"), |module| Cell::new(module.as_str())),
            Cell::new(diagnostic.kind.as_str()),
            Cell::new(truncate(&diagnostic.message, MAX_MESSAGE_CHARS)),
        ]);
    }
    println!();
    println!("Diagnostics:");
    println!("{table}");
}

fn status_cell(module: &ModuleSummary) -> Cell {
    if module.is_excluded() {
        Cell::new("excluded").fg(Color::Yellow)
    } else if module.dropped.is_empty() {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("partial").fg(Color::Yellow)
    }
}

fn truncate(message: &str, limit: usize) -> String {
    if message.chars().count() <= limit {
        return message.to_string();
    }
    let mut cut: String = message.chars().take(limit).collect();
    cut.push('…');
    cut
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::UpperBoundary(Width::Percentage(60)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => Cell::new("INFO").fg(Color::Cyan),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_messages() {
        assert_eq!(truncate("district 7 unresolved", 40), "district 7 unresolved");
    }

    #[test]
    fn truncate_marks_cut_messages() {
        let cut = truncate("abcdefghij", 4);
        assert_eq!(cut, "abcd…");
    }
}
