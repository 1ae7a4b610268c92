use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::decision::Decision;

#[must_use]
pub fn build_totals_table(decision: &Decision) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Tariff", "Today", "Difference"]);
    for (tariff, total) in &decision.totals {
        let difference = *total - decision.current_total;
        let tariff_cell = if *tariff == decision.current_tariff {
            Cell::new(format!("{tariff} (current)")).add_attribute(Attribute::Bold)
        } else {
            Cell::new(tariff)
        };
        table.add_row(vec![
            tariff_cell,
            Cell::new(total)
                .set_alignment(CellAlignment::Right)
                .fg(if *tariff == decision.best_tariff { Color::Green } else { Color::Reset }),
            Cell::new(format!("{:+.2}p", difference.0)).set_alignment(CellAlignment::Right).fg(
                if difference.0 < 0.0 {
                    Color::Green
                } else if difference.0 > 0.0 {
                    Color::Red
                } else {
                    Color::Reset
                },
            ),
        ]);
    }
    table
}
