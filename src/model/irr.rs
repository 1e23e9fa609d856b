//! Computed result: what a directive is worth at a given discount rate.

use serde::Serialize;

use super::Directive;

/// Present values and internal rate of return for one directive.
///
/// Built once per comment per run by [`crate::irr::compute`] and never
/// mutated afterwards. A later run produces a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedResult {
    /// Discount rate the present values were computed at.
    pub rate: f64,

    /// The directive this result was computed from.
    pub directive: Directive,

    pub cost_pv: f64,
    pub benefit_pv: f64,

    /// `benefit_pv - cost_pv`.
    pub npv: f64,

    /// Internal rate of return, as a fraction (0.5 is 50%).
    pub value: f64,

    /// Short tag such as `irr49`.
    pub label: String,

    /// Number of the aggregate report issue, for the back-link.
    pub report: u64,
}
