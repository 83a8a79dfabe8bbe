// QueryBench - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// =============================================================================
// Aggregate tree (output of a measurement monitor)
// =============================================================================

/// A named timing record folded from one or more collected measurement
/// points, with nested records for points opened inside it.
///
/// Children are keyed by name in a `BTreeMap`, so iteration order is the
/// lexicographic order of names regardless of the order in which the
/// monitor first saw them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateNode {
    /// Measurement point name (for replayed statements: the statement text).
    pub name: String,

    /// Number of collected measurements.
    pub count: u64,

    /// Mean duration over all measurements.
    pub average: Duration,

    /// Shortest measurement.
    pub min: Duration,

    /// Longest measurement.
    pub max: Duration,

    /// Sum of all measurements.
    pub total: Duration,

    /// Nested aggregates, keyed by name.
    pub children: BTreeMap<String, AggregateNode>,
}

impl AggregateNode {
    /// Create an empty aggregate with no measurements.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fold one measured duration into this aggregate.
    pub fn record(&mut self, elapsed: Duration) {
        if self.count == 0 {
            self.min = elapsed;
            self.max = elapsed;
        } else {
            self.min = self.min.min(elapsed);
            self.max = self.max.max(elapsed);
        }
        self.count += 1;
        self.total += elapsed;
        self.average = Duration::from_nanos((self.total.as_nanos() / self.count as u128) as u64);
    }

    /// Get or create the child aggregate with the given name.
    pub fn child_mut(&mut self, name: &str) -> &mut AggregateNode {
        self.children
            .entry(name.to_string())
            .or_insert_with(|| AggregateNode::new(name))
    }

    /// Insert a fully built child, replacing any child of the same name.
    /// Returns `self` to allow building trees in one expression.
    pub fn with_child(mut self, child: AggregateNode) -> Self {
        self.children.insert(child.name.clone(), child);
        self
    }

    /// Returns true if this aggregate has nested aggregates.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes below this one (the node itself excluded).
    pub fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

// =============================================================================
// Report format
// =============================================================================

/// Output format of the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `|`-bordered, space-padded table for terminals. Selected by `jetm`
    /// or any unrecognised selector.
    #[default]
    Plain,

    /// Aligned `;`-delimited table. Selected by `csv` (any case).
    Csv,
}

impl ReportFormat {
    /// Resolve a format selector string. Only `csv` (case-insensitive)
    /// selects CSV; everything else, including an empty selector, is plain.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some(s) if s.trim().eq_ignore_ascii_case("csv") => ReportFormat::Csv,
            _ => ReportFormat::Plain,
        }
    }

    /// Cell separator used between (and for plain, around) cells.
    pub fn separator(&self) -> char {
        match self {
            ReportFormat::Plain => constants::PLAIN_SEPARATOR,
            ReportFormat::Csv => constants::CSV_SEPARATOR,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ReportFormat::Plain => "jetm",
            ReportFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Number style
// =============================================================================

/// Locale conventions for numeric report cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    /// Separator between integer and fraction digits.
    pub decimal_separator: char,

    /// Separator inserted between groups of three integer digits.
    /// `None` disables grouping.
    pub grouping_separator: Option<char>,
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self {
            decimal_separator: constants::DEFAULT_DECIMAL_SEPARATOR,
            grouping_separator: Some(constants::DEFAULT_GROUPING_SEPARATOR),
        }
    }
}

impl NumberStyle {
    /// Format a duration as milliseconds with a fixed number of fraction
    /// digits, grouping the integer part.
    pub fn format_millis(&self, value: Duration) -> String {
        let scale = 10u128.pow(constants::REPORT_FRACTION_DIGITS as u32);
        // Round half to even at the last printed digit.
        let nanos_per_unit = 1_000_000u128 / scale;
        let nanos = value.as_nanos();
        let mut units = nanos / nanos_per_unit;
        let remainder = (nanos % nanos_per_unit) * 2;
        if remainder > nanos_per_unit || (remainder == nanos_per_unit && units % 2 == 1) {
            units += 1;
        }

        let integer = (units / scale).to_string();
        let fraction = units % scale;

        let mut out = self.group_digits(&integer);
        out.push(self.decimal_separator);
        out.push_str(&format!(
            "{:0width$}",
            fraction,
            width = constants::REPORT_FRACTION_DIGITS
        ));
        out
    }

    /// Insert the grouping separator every three digits from the right.
    fn group_digits(&self, digits: &str) -> String {
        let Some(sep) = self.grouping_separator else {
            return digits.to_string();
        };
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(sep);
            }
            out.push(ch);
        }
        out
    }
}
