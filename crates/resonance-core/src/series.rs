//! Parsers for the solver's text output.
//!
//! Two formats are read:
//! - IOASCII 1D output: many whitespace-separated columns per line, the field
//!   value in the last column. Lines with 11 or fewer columns are layout
//!   headers or blank and carry no sample.
//! - xgraph (`.xg`): `x value` pairs, with `#` comments and `"`-quoted
//!   series labels between blocks.
//!
//! Both parsers are lenient: lines that do not parse are dropped.

use serde::Serialize;

/// IOASCII rows need more than this many columns to carry a sample.
const ASCII_MIN_COLUMNS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub x: f64,
    pub value: f64,
}

/// Last-column values of every IOASCII data row.
pub fn parse_ioascii(text: &str) -> Vec<f64> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() <= ASCII_MIN_COLUMNS {
                return None;
            }
            parts.last()?.parse::<f64>().ok()
        })
        .collect()
}

pub fn parse_xgraph(text: &str) -> Vec<Sample> {
    let mut samples = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(x), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        if let (Ok(x), Ok(value)) = (x.parse::<f64>(), value.parse::<f64>()) {
            samples.push(Sample { x, value });
        }
    }
    samples
}
