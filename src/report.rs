//! Report registry: subject issues, their results, and the ranked report.
//!
//! The registry is rebuilt from the tracker on every run. It holds each
//! subject issue once, in the order it was added, plus a separate
//! reference to the aggregate report issue, which is never a subject.

mod format;

use std::{cmp::Ordering, collections::HashMap};

pub use format::{Markdown, ReportFormat};

use crate::model::{ComputedResult, Issue, IssueRecord, Outcome};

/// Misuse of the registry. These indicate an orchestration bug.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("issue #{0} is already registered")]
    DuplicateIssue(u64),

    #[error("issue #{0} is not registered")]
    UnknownIssue(u64),

    #[error("issue #{0} is the report issue and cannot be a subject")]
    ReportIssue(u64),
}

pub type Result<T> = core::result::Result<T, RegistryError>;

/// Subject issues keyed by number, each with at most one result.
#[derive(Debug, Default)]
pub struct ReportRegistry {
    records: Vec<IssueRecord>,
    index: HashMap<u64, usize>,
    report: Option<Issue>,
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subject issue with no result.
    pub fn add_issue(&mut self, issue: Issue) -> Result<()> {
        if self.report.as_ref().is_some_and(|r| r.number == issue.number) {
            return Err(RegistryError::ReportIssue(issue.number));
        }
        if self.index.contains_key(&issue.number) {
            return Err(RegistryError::DuplicateIssue(issue.number));
        }
        self.index.insert(issue.number, self.records.len());
        self.records.push(IssueRecord::new(issue));
        Ok(())
    }

    /// Replaces the result for a registered issue.
    pub fn set_result(&mut self, number: u64, result: ComputedResult) -> Result<()> {
        let &i = self
            .index
            .get(&number)
            .ok_or(RegistryError::UnknownIssue(number))?;
        self.records[i].outcome = Outcome::Computed(result);
        Ok(())
    }

    /// Records which issue holds the aggregate report.
    pub fn set_report(&mut self, issue: Issue) -> Result<()> {
        if self.index.contains_key(&issue.number) {
            return Err(RegistryError::ReportIssue(issue.number));
        }
        self.report = Some(issue);
        Ok(())
    }

    /// The aggregate report issue, once discovered or created.
    pub fn report(&self) -> Option<&Issue> {
        self.report.as_ref()
    }

    /// Subject issues in the order they were added.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.records.iter().map(|r| &r.issue)
    }

    /// Whether `number` is already registered as a subject.
    pub fn contains(&self, number: u64) -> bool {
        self.index.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by return, highest first.
    ///
    /// Computed results come before NaN results, which come before issues
    /// with no result. Ties keep insertion order.
    pub fn ranked(&self) -> Vec<&IssueRecord> {
        let mut ranked: Vec<&IssueRecord> = self.records.iter().collect();
        ranked.sort_by(|a, b| rank(&b.outcome).cmp(&rank(&a.outcome)));
        ranked
    }

    /// The aggregate report in the given format.
    pub fn render(&self, format: &impl ReportFormat) -> String {
        format.report(&self.ranked())
    }
}

/// Sort key for an outcome; greater ranks first.
#[derive(Debug)]
enum Rank {
    Missing,
    NaN,
    Value(f64),
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a.total_cmp(b),
            (Self::Value(_), _) | (Self::NaN, Self::Missing) => Ordering::Greater,
            (_, Self::Value(_)) | (Self::Missing, Self::NaN) => Ordering::Less,
            (Self::NaN, Self::NaN) | (Self::Missing, Self::Missing) => Ordering::Equal,
        }
    }
}

fn rank(outcome: &Outcome) -> Rank {
    match outcome.value() {
        None => Rank::Missing,
        Some(v) if v.is_nan() => Rank::NaN,
        // -0.0 and 0.0 tie.
        Some(v) if v == 0.0 => Rank::Value(0.0),
        Some(v) => Rank::Value(v),
    }
}
