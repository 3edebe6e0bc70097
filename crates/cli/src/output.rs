//! Output formatting for harness results.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use sett_harness::{Change, MetricValue, OpReport};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Entry")]
    name: String,
    #[tabled(rename = "Before")]
    before: String,
    #[tabled(rename = "After")]
    after: String,
}

/// Largest value a Decimal mantissa can hold (96 bits)
const MAX_MANTISSA: u128 = 79_228_162_514_264_337_593_543_950_335;

/// Render a WAD-scaled amount as a decimal string. Values too large for a
/// Decimal fall back to the raw integer.
pub fn format_wad(value: U256) -> String {
    match u128::try_from(value) {
        Ok(v) if v <= MAX_MANTISSA => Decimal::from_i128_with_scale(v as i128, 18)
            .normalize()
            .to_string(),
        _ => value.to_string(),
    }
}

fn format_metric(value: MetricValue) -> String {
    match value {
        MetricValue::Amount(amount) => format_wad(amount),
        MetricValue::Flag(flag) => flag.to_string(),
    }
}

/// Render the changed entries between the snapshots of an operation.
pub fn format_compare_table(changes: &[Change]) -> String {
    if changes.is_empty() {
        return "No tracked entries changed.".to_string();
    }

    let rows: Vec<ChangeRow> = changes
        .iter()
        .map(|c| ChangeRow {
            name: c.name.clone(),
            before: format_metric(c.before),
            after: format_metric(c.after),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Render one operation report with its compare table.
pub fn format_report(report: &OpReport) -> String {
    let changes = report.before.changes(&report.after);
    format!(
        "=== Compare {} ===\n{}",
        report.tx.operation,
        format_compare_table(&changes)
    )
}
