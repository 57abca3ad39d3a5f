//! Calculator inputs, both as typed by the user and as parsed for computation.

use crate::core::{dates, money};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// When during the period the net flow is assumed to have happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowTiming {
    Start,
    #[default]
    Mid,
    End,
    None,
}

impl FlowTiming {
    pub const ALL: [FlowTiming; 4] = [
        FlowTiming::Start,
        FlowTiming::Mid,
        FlowTiming::End,
        FlowTiming::None,
    ];

    /// Share of the flow counted as exposed to the period's gains.
    ///
    /// These weights are a linear heuristic, not a time-weighted return.
    /// `None` ignores a non-zero flow for the base entirely.
    pub fn exposure(&self) -> f64 {
        match self {
            FlowTiming::Start => 1.0,
            FlowTiming::Mid => 0.5,
            FlowTiming::End => 0.1,
            FlowTiming::None => 0.0,
        }
    }
}

impl Display for FlowTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FlowTiming::Start => "start",
                FlowTiming::Mid => "mid",
                FlowTiming::End => "end",
                FlowTiming::None => "none",
            }
        )
    }
}

impl FromStr for FlowTiming {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" => Ok(FlowTiming::Start),
            "mid" => Ok(FlowTiming::Mid),
            "end" => Ok(FlowTiming::End),
            "none" => Ok(FlowTiming::None),
            _ => Err(anyhow!(
                "Invalid flow timing: {s} (expected start, mid, end or none)"
            )),
        }
    }
}

/// Parses the annualize selector token.
pub fn parse_yes_no(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "y" => Ok(true),
        "no" | "n" => Ok(false),
        _ => Err(anyhow!("Invalid choice: {s} (expected yes or no)")),
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// The form exactly as entered. Free-text fields are kept verbatim so that a
/// saved snapshot restores text-for-text.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFields {
    pub start_date: String,
    pub end_date: String,
    pub begin_balance: String,
    pub end_balance: String,
    pub net_flow: String,
    pub flow_timing: FlowTiming,
    pub annualize: bool,
}

impl Default for FormFields {
    fn default() -> Self {
        FormFields {
            start_date: String::new(),
            end_date: String::new(),
            begin_balance: String::new(),
            end_balance: String::new(),
            net_flow: "0".to_string(),
            flow_timing: FlowTiming::Mid,
            annualize: true,
        }
    }
}

impl FormFields {
    pub fn to_input(&self) -> CalculatorInput {
        CalculatorInput {
            start_date: dates::parse_date(&self.start_date),
            end_date: dates::parse_date(&self.end_date),
            begin_balance: money::parse_money(&self.begin_balance),
            end_balance: money::parse_money(&self.end_balance),
            net_flow: money::parse_money(&self.net_flow),
            flow_timing: self.flow_timing,
            annualize: self.annualize,
        }
    }
}

/// A parsed input snapshot. Absent values are ones that were blank or could
/// not be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalculatorInput {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub begin_balance: Option<f64>,
    pub end_balance: Option<f64>,
    pub net_flow: Option<f64>,
    pub flow_timing: FlowTiming,
    pub annualize: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flow_timing_tokens() {
        assert_eq!("start".parse::<FlowTiming>().unwrap(), FlowTiming::Start);
        assert_eq!(" MID ".parse::<FlowTiming>().unwrap(), FlowTiming::Mid);
        assert_eq!("end".parse::<FlowTiming>().unwrap(), FlowTiming::End);
        assert_eq!("none".parse::<FlowTiming>().unwrap(), FlowTiming::None);
        assert!("later".parse::<FlowTiming>().is_err());

        for timing in FlowTiming::ALL {
            assert_eq!(timing.to_string().parse::<FlowTiming>().unwrap(), timing);
        }
    }

    #[test]
    fn serializes_flow_timing_as_lowercase_token() {
        assert_eq!(serde_json::to_string(&FlowTiming::End).unwrap(), "\"end\"");
        let timing: FlowTiming = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(timing, FlowTiming::None);
    }

    #[test]
    fn parses_yes_no_tokens() {
        assert!(parse_yes_no("yes").unwrap());
        assert!(parse_yes_no("Y").unwrap());
        assert!(!parse_yes_no("no").unwrap());
        assert!(parse_yes_no("maybe").is_err());
        assert_eq!(yes_no(true), "yes");
        assert_eq!(yes_no(false), "no");
    }

    #[test]
    fn default_form_matches_startup_state() {
        let fields = FormFields::default();
        assert_eq!(fields.net_flow, "0");
        assert_eq!(fields.flow_timing, FlowTiming::Mid);
        assert!(fields.annualize);
        assert!(fields.start_date.is_empty());
        assert!(fields.begin_balance.is_empty());
    }

    #[test]
    fn converts_form_text_to_input() {
        let fields = FormFields {
            start_date: "2024-01-01".to_string(),
            end_date: "not a date".to_string(),
            begin_balance: "$10,000".to_string(),
            end_balance: "11000abc".to_string(),
            net_flow: "-500".to_string(),
            flow_timing: FlowTiming::End,
            annualize: false,
        };
        let input = fields.to_input();

        assert_eq!(input.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(input.end_date, None);
        assert_eq!(input.begin_balance, Some(10000.0));
        assert_eq!(input.end_balance, None);
        assert_eq!(input.net_flow, Some(-500.0));
        assert_eq!(input.flow_timing, FlowTiming::End);
        assert!(!input.annualize);
    }
}
