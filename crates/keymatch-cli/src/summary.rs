use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use keymatch_cli::pipeline::MatchOutcome;
use keymatch_core::Tier;

pub fn print_summary(outcome: &MatchOutcome) {
    println!("Reference: {} ({} rows)", outcome.reference.display(), outcome.reference_rows);
    println!("Offer: {}", outcome.offer.display());
    println!("Output: {}", outcome.output.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tier"),
        header_cell("Strategy"),
        header_cell("Rows"),
        header_cell("Share"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    for tier in Tier::ALL {
        let count = outcome.tier_counts.get(&tier).copied().unwrap_or(0);
        table.add_row(vec![
            Cell::new(tier.number()),
            Cell::new(tier.label()),
            count_cell(count, Color::Green),
            dim_cell(share(count, outcome.rows)),
        ]);
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("unmatched"),
        count_cell(outcome.unmatched, Color::Red),
        dim_cell(share(outcome.unmatched, outcome.rows)),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} matched", outcome.matched()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(outcome.rows).add_attribute(Attribute::Bold),
        dim_cell(format!("{:.2}s", outcome.elapsed.as_secs_f64())),
    ]);
    println!("{table}");
}

/// Style for plain listings such as `keymatch columns`.
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
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn share(count: usize, total: usize) -> String {
    if total == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", count as f64 * 100.0 / total as f64)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).add_attribute(Attribute::Dim)
}
