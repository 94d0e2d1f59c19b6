//! Rendering of projection responses for the terminal

use std::fmt::Write;

use clap::ValueEnum;
use goalcast_core::{Assumptions, SimulationResponse};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Aligned text tables
    #[default]
    Table,
}

/// Format an amount with thousands separators (e.g. 1,234,567)
pub fn format_amount(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a probability in [0, 1] as a percentage
pub fn format_probability(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

pub fn render_response(
    response: &SimulationResponse,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => to_json(response),
        OutputFormat::Table => Ok(response_table(response)),
    }
}

pub fn render_assumptions(
    assumptions: &Assumptions,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => to_json(assumptions),
        OutputFormat::Table => Ok(assumptions_table(assumptions)),
    }
}

/// Yearly percentile bands followed by one row per goal
pub fn response_table(response: &SimulationResponse) -> String {
    let mut out = String::new();
    let s = &response.assumptions_snapshot;

    let _ = writeln!(out, "Calculated at {}", response.calculated_at);
    let _ = writeln!(
        out,
        "{} trials, {} monthly, return {}%, growth {}%, inflation {}%",
        s.simulation_trials,
        format_amount(s.monthly_investment),
        s.investment_return,
        s.annual_income_growth,
        s.inflation_rate
    );
    out.push('\n');

    let _ = writeln!(
        out,
        "{:>6} {:>4} {:>15} {:>15} {:>15} {:>15} {:>15}",
        "Year", "Age", "P5", "P25", "P50", "P75", "P95"
    );
    for p in &response.yearly_projections {
        let _ = writeln!(
            out,
            "{:>6} {:>4} {:>15} {:>15} {:>15} {:>15} {:>15}",
            p.year,
            p.age,
            format_amount(p.p5),
            format_amount(p.p25),
            format_amount(p.p50),
            format_amount(p.p75),
            format_amount(p.p95)
        );
    }

    if response.goal_probabilities.is_empty() {
        return out;
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "{:<24} {:>15} {:>6} {:>11} {:>8}",
        "Goal", "Target", "Year", "Probability", "Expected"
    );
    for g in &response.goal_probabilities {
        let expected = g
            .expected_achievement_year
            .map_or_else(|| "-".to_string(), |y| y.to_string());
        let _ = writeln!(
            out,
            "{:<24} {:>15} {:>6} {:>11} {:>8}",
            truncate(&g.title, 24),
            format_amount(g.target_amount),
            g.target_year,
            format_probability(g.probability),
            expected
        );
    }
    out
}

pub fn assumptions_table(assumptions: &Assumptions) -> String {
    let s = &assumptions.snapshot;
    let rows = [
        ("User", assumptions.user_id.to_string()),
        ("Age", s.age.to_string()),
        ("Income growth", format!("{}%", s.annual_income_growth)),
        ("Investment return", format!("{}%", s.investment_return)),
        ("Inflation", format!("{}%", s.inflation_rate)),
        ("Monthly investment", format_amount(s.monthly_investment)),
        ("Trials", s.simulation_trials.to_string()),
        ("Updated at", assumptions.updated_at.to_string()),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<20} {value}");
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars - 1).collect();
    short.push('…');
    short
}
