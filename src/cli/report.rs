//! Renders a computed output snapshot for the terminal or as JSON.

use super::ui;
use crate::core::money::{format_days, format_money, format_percent, format_years};
use crate::core::{CalculatorOutput, Signal};
use anyhow::{Context, Result};
use comfy_table::Cell;
use serde::Serialize;

/// Builds the results table. The annualized row is left out entirely when
/// annualization was not requested.
pub fn render_table(output: &CalculatorOutput, annualize: bool) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Measure"), ui::header_cell("Value")]);

    table.add_row(vec![
        Cell::new("Days"),
        ui::value_cell(format_days(output.days)),
    ]);
    table.add_row(vec![
        Cell::new("Years"),
        ui::value_cell(format_years(output.years)),
    ]);
    table.add_row(vec![
        Cell::new("Simple gain"),
        ui::value_cell(format_money(output.simple_gain.amount)),
    ]);
    table.add_row(vec![
        Cell::new("Simple gain (%)"),
        ui::signal_cell(
            format_percent(output.simple_gain.rate),
            Signal::of(output.simple_gain.rate),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Flow-adjusted gain"),
        ui::value_cell(format_money(output.adjusted_gain.amount)),
    ]);
    table.add_row(vec![
        Cell::new("Flow-adjusted gain (%)"),
        ui::signal_cell(
            format_percent(output.adjusted_gain.rate),
            Signal::of(output.adjusted_gain.rate),
        ),
    ]);
    if annualize {
        table.add_row(vec![
            Cell::new("Annualized (CAGR)"),
            ui::signal_cell(
                format_percent(output.annualized_rate),
                Signal::of(output.annualized_rate),
            ),
        ]);
    }

    table.to_string()
}

#[derive(Serialize)]
struct Signals {
    simple_gain: Signal,
    adjusted_gain: Signal,
    annualized_rate: Signal,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    output: &'a CalculatorOutput,
    signals: Signals,
}

/// Serializes the output with the sign classification of each rate.
/// Figures that could not be computed are `null`.
pub fn render_json(output: &CalculatorOutput) -> Result<String> {
    let report = JsonReport {
        output,
        signals: Signals {
            simple_gain: Signal::of(output.simple_gain.rate),
            adjusted_gain: Signal::of(output.adjusted_gain.rate),
            annualized_rate: Signal::of(output.annualized_rate),
        },
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize report")
}
