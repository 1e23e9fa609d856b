//! Tracker issues, their comments, and the per-issue report record.

use super::ComputedResult;

/// An open issue as listed by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub number: u64,
    pub title: String,

    /// Some trackers list pull requests alongside issues.
    pub pull_request: bool,
}

/// A comment on an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub body: String,
}

/// Whether an issue has a computed return.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Outcome {
    /// No comment carried usable IRR inputs.
    #[default]
    Missing,

    /// A directive was found and computed.
    Computed(ComputedResult),
}

impl Outcome {
    /// The computed return, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Missing => None,
            Self::Computed(result) => Some(result.value),
        }
    }
}

/// One subject issue in the report, with at most one result.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueRecord {
    pub issue: Issue,
    pub outcome: Outcome,
}

impl IssueRecord {
    /// A record with no result yet.
    pub fn new(issue: Issue) -> Self {
        Self {
            issue,
            outcome: Outcome::Missing,
        }
    }
}
