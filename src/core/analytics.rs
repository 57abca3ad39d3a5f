//! Gain calculations over a single measured period.
//!
//! `compute` is a pure function of one input snapshot. Any figure that cannot
//! be computed (missing input, zero denominator, overflow) comes back as
//! `None` rather than as a NaN or infinite value.
use crate::core::dates;
use crate::core::input::CalculatorInput;
use serde::Serialize;
use tracing::debug;

/// A gain expressed in dollars and as a ratio of the capital it was earned on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GainFigures {
    pub amount: Option<f64>,
    pub rate: Option<f64>,
}

/// Every figure derived from one input snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CalculatorOutput {
    pub days: Option<i64>,
    pub years: Option<f64>,
    pub simple_gain: GainFigures,
    pub adjusted_gain: GainFigures,
    /// Whether a non-zero net flow was entered.
    pub flows_present: bool,
    /// Denominator of the adjusted rate, only set when flows are present.
    pub effective_base: Option<f64>,
    /// Only set when annualization was requested.
    pub annualized_rate: Option<f64>,
}

impl CalculatorOutput {
    /// The rate annualization is based on.
    pub fn selected_rate(&self) -> Option<f64> {
        if self.flows_present {
            self.adjusted_gain.rate
        } else {
            self.simple_gain.rate
        }
    }
}

/// Sign of a displayed figure, used only for emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Positive,
    Negative,
    Neutral,
}

impl Signal {
    pub fn of(value: Option<f64>) -> Signal {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => Signal::Positive,
            Some(v) if v.is_finite() && v < 0.0 => Signal::Negative,
            _ => Signal::Neutral,
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    // A zero gain over a negative base is a plain zero, not -0.
    finite(numerator / denominator).map(|r| r + 0.0)
}

/// Computes the full output snapshot for `input`.
pub fn compute(input: &CalculatorInput) -> CalculatorOutput {
    let days = match (input.start_date, input.end_date) {
        (Some(start), Some(end)) => Some(dates::days_between(start, end)),
        _ => None,
    };
    let years = days.map(dates::years_from_days).and_then(finite);

    let begin = input.begin_balance.and_then(finite);
    let end = input.end_balance.and_then(finite);
    let flow = input.net_flow.and_then(finite);
    let flows_present = flow.is_some_and(|f| f != 0.0);

    let simple_gain = simple_gain(begin, end);

    let mut effective_base = None;
    let adjusted_gain = match (begin, end, flow) {
        (Some(begin), Some(end), Some(flow)) if flows_present => {
            let base = begin + input.flow_timing.exposure() * flow;
            effective_base = finite(base);
            let amount = finite(end - begin - flow);
            GainFigures {
                amount,
                rate: amount.zip(effective_base).and_then(|(a, b)| ratio(a, b)),
            }
        }
        (Some(_), Some(_), _) => simple_gain,
        _ => GainFigures::default(),
    };

    let mut output = CalculatorOutput {
        days,
        years,
        simple_gain,
        adjusted_gain,
        flows_present,
        effective_base,
        annualized_rate: None,
    };
    if input.annualize {
        output.annualized_rate = years.and_then(|y| annualize(output.selected_rate(), y));
    }

    debug!(?input, ?output, "Computed gain figures");
    output
}

fn simple_gain(begin: Option<f64>, end: Option<f64>) -> GainFigures {
    match (begin, end) {
        (Some(begin), Some(end)) if begin != 0.0 => {
            let amount = finite(end - begin);
            GainFigures {
                amount,
                rate: amount.and_then(|a| ratio(a, begin)),
            }
        }
        _ => GainFigures::default(),
    }
}

/// Compounds `rate`, observed over `years`, into a per-year rate.
///
/// A loss of 100% or more has no real annual root and yields `None`, as does
/// a period that is not strictly positive.
pub fn annualize(rate: Option<f64>, years: f64) -> Option<f64> {
    if !years.is_finite() || years <= 0.0 {
        return None;
    }
    let growth = 1.0 + rate?;
    if growth <= 0.0 {
        return None;
    }
    finite(growth.powf(1.0 / years) - 1.0)
}
