//! Predicate engine: pure filters over reference collections.
//!
//! Predicates combine as a logical AND in the order given and never reorder
//! the input.

use crate::domain::{
    entities::ReferenceRecord,
    types::{FlagAttribute, SetAttribute},
};

/// An identifier as it arrived in the query string.
///
/// Matching is by numeric value rather than by text, so `7`, ` 7 `, `07` and
/// `7.0` all select the record whose identifier is 7. Tokens that are not a
/// non-negative whole number match nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    raw: String,
    value: Option<u64>,
}

impl Identifier {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = numeric_value(raw.trim());
        Self { raw, value }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, identifier: u32) -> bool {
        self.value == Some(u64::from(identifier))
    }
}

fn numeric_value(token: &str) -> Option<u64> {
    if let Ok(value) = token.parse::<u64>() {
        return Some(value);
    }

    let value = token.parse::<f64>().ok()?;
    let whole = value.is_finite() && value >= 0.0 && value.fract() == 0.0;
    (whole && value <= u64::MAX as f64).then_some(value as u64)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Record identifier equals the requested value.
    Identity(Identifier),
    /// Record attribute set contains every requested value.
    ContainsAll {
        attribute: SetAttribute,
        values: Vec<u32>,
    },
    /// Record flag equals the requested boolean.
    Equals {
        attribute: FlagAttribute,
        value: bool,
    },
}

impl Predicate {
    pub fn matches<T: ReferenceRecord>(&self, record: &T) -> bool {
        match self {
            Predicate::Identity(identifier) => identifier.matches(record.identifier()),
            Predicate::ContainsAll { attribute, values } => record
                .set_attribute(*attribute)
                .is_some_and(|present| values.iter().all(|value| present.contains(value))),
            Predicate::Equals { attribute, value } => {
                record.flag_attribute(*attribute) == Some(*value)
            }
        }
    }
}

/// Keep the records that satisfy every predicate, preserving input order.
pub fn filter<'a, T: ReferenceRecord>(records: &'a [T], predicates: &[Predicate]) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| predicates.iter().all(|predicate| predicate.matches(*record)))
        .collect()
}
