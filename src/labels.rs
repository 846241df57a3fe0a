//! Target label mapping
//!
//! The domain labels its two classes `neg` (healthy) and `pos` (faulty).
//! Metrics and classifiers work on the numeric encoding; human-facing output
//! uses the string form. The mapping is fixed and bidirectional.

use crate::error::{Error, Result};

pub const NEGATIVE_LABEL: &str = "neg";
pub const POSITIVE_LABEL: &str = "pos";

/// The two fault classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLabel {
    Negative,
    Positive,
}

impl TargetLabel {
    /// Parse a domain label string
    pub fn parse(label: &str) -> Result<Self> {
        match label {
            NEGATIVE_LABEL => Ok(TargetLabel::Negative),
            POSITIVE_LABEL => Ok(TargetLabel::Positive),
            other => Err(Error::BadInput(format!(
                "unknown target label `{other}`, expected `{NEGATIVE_LABEL}` or `{POSITIVE_LABEL}`"
            ))),
        }
    }

    /// Reverse of the numeric encoding
    pub fn from_class(class: usize) -> Result<Self> {
        match class {
            0 => Ok(TargetLabel::Negative),
            1 => Ok(TargetLabel::Positive),
            other => Err(Error::BadInput(format!("unknown class index {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLabel::Negative => NEGATIVE_LABEL,
            TargetLabel::Positive => POSITIVE_LABEL,
        }
    }

    /// Numeric encoding used by metrics and classifiers
    pub fn class(&self) -> usize {
        match self {
            TargetLabel::Negative => 0,
            TargetLabel::Positive => 1,
        }
    }
}

/// Encode a column of domain labels to class indices
pub fn encode_labels(labels: &[String]) -> Result<Vec<usize>> {
    labels
        .iter()
        .map(|l| TargetLabel::parse(l).map(|t| t.class()))
        .collect()
}

/// Decode class indices back to domain labels
pub fn decode_labels(classes: &[usize]) -> Result<Vec<String>> {
    classes
        .iter()
        .map(|&c| TargetLabel::from_class(c).map(|t| t.as_str().to_string()))
        .collect()
}
