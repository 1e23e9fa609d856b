//! Core data model for issuebot.
//!
//! These types carry a run from end to end: tracker issues and comments
//! in, directives parsed out of comments, computed returns, and the
//! per-issue records the report is rendered from.

mod directive;
mod irr;
mod issue;

pub use directive::Directive;
pub use irr::ComputedResult;
pub use issue::{Comment, Issue, IssueRecord, Outcome};

/// Title of the singleton issue whose body holds the aggregate report.
pub const REPORT_TITLE: &str = "issuebot report";
