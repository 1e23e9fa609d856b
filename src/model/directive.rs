//! Directive: the `irr` line a comment author writes.

use serde::Serialize;

/// A single cost/benefit cashflow pair parsed from a comment.
///
/// Terms are in days. Amounts are in whatever currency the author uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    pub cost: f64,
    pub cost_term: f64,
    pub benefit: f64,
    pub benefit_term: f64,

    /// Free text preceding the `irr` line, kept verbatim.
    ///
    /// Either empty or ending in a newline.
    pub notes: String,
}

impl Directive {
    /// The directive line itself, without notes.
    ///
    /// Numbers use the shortest representation that parses back to the
    /// same value, so the line survives a rewrite unchanged.
    pub fn line(&self) -> String {
        format!(
            "irr {} {} {} {}",
            self.cost, self.cost_term, self.benefit, self.benefit_term
        )
    }
}
