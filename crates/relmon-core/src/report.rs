//! Report rendering.
//!
//! A report lists, per relation in name order, the destinations with the
//! most distinct origins and that count. The text form is the wire format of
//! the `report` command:
//!
//! ```text
//! follows alice bob 3; likes carol 1; 
//! ```
//!
//! or `none` when no relation has an edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top destinations of one relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub relation: String,
    /// Destinations at the maximum, ascending.
    pub holders: Vec<String>,
    pub count: usize,
}

/// A snapshot of every relation's top destinations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "relations")]
    pub lines: Vec<ReportLine>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One-line JSON form, e.g. `{"relations":[{"relation":"r","holders":["b"],"count":2}]}`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.relation)?;
        for holder in &self.holders {
            write!(f, "{} ", holder)?;
        }
        write!(f, "{}; ", self.count)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lines.is_empty() {
            return f.write_str("none");
        }
        for line in &self.lines {
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(relation: &str, holders: &[&str], count: usize) -> ReportLine {
        ReportLine {
            relation: relation.to_string(),
            holders: holders.iter().map(|h| h.to_string()).collect(),
            count,
        }
    }

    #[test]
    fn test_none() {
        assert_eq!(Report::default().to_string(), "none");
    }

    #[test]
    fn test_text_format() {
        let report = Report {
            lines: vec![line("follows", &["alice", "bob"], 3), line("likes", &["carol"], 1)],
        };
        assert_eq!(report.to_string(), "follows alice bob 3; likes carol 1; ");
    }

    #[test]
    fn test_json_format() {
        let report = Report {
            lines: vec![line("r", &["b"], 2)],
        };
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"relations":[{"relation":"r","holders":["b"],"count":2}]}"#
        );
        assert_eq!(Report::default().to_json().unwrap(), r#"{"relations":[]}"#);
    }
}
