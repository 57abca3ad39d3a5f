//! The calculator form: the current field values, the last status message and
//! the actions that act on them. This is the only mutable state in the app;
//! every action ends with a full recomputation from the current fields.

use super::{report, ui};
use crate::core::input::{FlowTiming, FormFields, parse_yes_no, yes_no};
use crate::core::{CalculatorOutput, LoadOutcome, PersistenceAdapter, compute};
use anyhow::{Result, anyhow};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

pub const SAVED_MESSAGE: &str = "Saved to this device.";

/// An editable field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StartDate,
    EndDate,
    BeginBalance,
    EndBalance,
    NetFlow,
    FlowTiming,
    Annualize,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::StartDate,
        Field::EndDate,
        Field::BeginBalance,
        Field::EndBalance,
        Field::NetFlow,
        Field::FlowTiming,
        Field::Annualize,
    ];
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Field::StartDate => "start-date",
                Field::EndDate => "end-date",
                Field::BeginBalance => "begin-balance",
                Field::EndBalance => "end-balance",
                Field::NetFlow => "net-flow",
                Field::FlowTiming => "timing",
                Field::Annualize => "annualize",
            }
        )
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "start-date" | "start" => Ok(Field::StartDate),
            "end-date" | "end" => Ok(Field::EndDate),
            "begin-balance" | "begin" => Ok(Field::BeginBalance),
            "end-balance" | "ending" => Ok(Field::EndBalance),
            "net-flow" | "flow" => Ok(Field::NetFlow),
            "timing" | "flow-timing" => Ok(Field::FlowTiming),
            "annualize" | "cagr" => Ok(Field::Annualize),
            _ => Err(anyhow!("Unknown field: {s}")),
        }
    }
}

pub struct Form {
    fields: FormFields,
    status: String,
    adapter: PersistenceAdapter,
}

impl Form {
    pub fn new(adapter: PersistenceAdapter) -> Self {
        Self::with_fields(adapter, FormFields::default())
    }

    pub fn with_fields(adapter: PersistenceAdapter, fields: FormFields) -> Self {
        Self {
            fields,
            status: String::new(),
            adapter,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Text currently shown in `field`.
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::StartDate => self.fields.start_date.clone(),
            Field::EndDate => self.fields.end_date.clone(),
            Field::BeginBalance => self.fields.begin_balance.clone(),
            Field::EndBalance => self.fields.end_balance.clone(),
            Field::NetFlow => self.fields.net_flow.clone(),
            Field::FlowTiming => self.fields.flow_timing.to_string(),
            Field::Annualize => yes_no(self.fields.annualize).to_string(),
        }
    }

    /// Edits one field and recomputes. Free-text fields take any text; the
    /// two selectors only accept their tokens and stay unchanged otherwise.
    pub fn set(&mut self, field: Field, value: &str) -> Result<CalculatorOutput> {
        match field {
            Field::StartDate => self.fields.start_date = value.to_string(),
            Field::EndDate => self.fields.end_date = value.to_string(),
            Field::BeginBalance => self.fields.begin_balance = value.to_string(),
            Field::EndBalance => self.fields.end_balance = value.to_string(),
            Field::NetFlow => self.fields.net_flow = value.to_string(),
            Field::FlowTiming => self.fields.flow_timing = value.parse::<FlowTiming>()?,
            Field::Annualize => self.fields.annualize = parse_yes_no(value)?,
        }
        debug!(%field, value, "Field changed");
        Ok(self.calculate())
    }

    pub fn calculate(&self) -> CalculatorOutput {
        compute(&self.fields.to_input())
    }

    pub fn save(&mut self) -> Result<CalculatorOutput> {
        self.adapter.save(&self.fields)?;
        self.status = SAVED_MESSAGE.to_string();
        Ok(self.calculate())
    }

    /// Replaces the fields with the saved snapshot, if there is a readable one.
    /// Otherwise the fields are left as they are.
    pub fn load(&mut self) -> CalculatorOutput {
        let outcome = self.adapter.load();
        self.status = outcome.status_message().to_string();
        if let LoadOutcome::Loaded(record) = outcome {
            self.fields = record.fields;
        }
        self.calculate()
    }

    /// Resets every field to its startup value and clears the status.
    pub fn clear(&mut self) -> CalculatorOutput {
        self.fields = FormFields::default();
        self.status.clear();
        self.calculate()
    }

    /// Deletes the saved snapshot. Returns whether one existed.
    pub fn forget(&mut self) -> Result<bool> {
        self.adapter.clear()
    }

    /// Status line (when set) followed by the results table.
    pub fn render(&self) -> String {
        let output = self.calculate();
        let table = report::render_table(&output, self.fields.annualize);
        if self.status.is_empty() {
            table
        } else {
            format!(
                "{}\n\n{table}",
                ui::style_text(&self.status, ui::StyleType::Status)
            )
        }
    }

    /// One line per field with its current text.
    pub fn describe_fields(&self) -> String {
        Field::ALL
            .iter()
            .map(|field| {
                let value = self.value(*field);
                let shown = if value.is_empty() {
                    ui::style_text("(blank)", ui::StyleType::Subtle)
                } else {
                    value
                };
                format!("{:>14}: {shown}", field.to_string())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
