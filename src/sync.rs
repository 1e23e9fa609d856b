//! Sync: one full reconciliation pass between the tracker and the report.
//!
//! A pass runs strictly in order:
//!
//! 1. List every open issue, page by page. The issue titled
//!    [`REPORT_TITLE`] is the report issue; the rest are subjects.
//! 2. Create the report issue if none exists.
//! 3. For each subject, fetch all comments. Every comment carrying a
//!    directive is computed, recorded, and rewritten in place.
//! 4. Render the ranked report and overwrite the report issue's body.
//!
//! Nothing is diffed: matched comments and the report are rewritten on every
//! pass. Rendering is deterministic, so a second pass with no new comments
//! writes byte-identical bodies. A tracker failure aborts the pass and may
//! leave earlier writes in place.

use tracing::{debug, info, warn};

use crate::{
    evaluate::evaluate,
    model::{Issue, REPORT_TITLE},
    report::{Markdown, RegistryError, ReportFormat, ReportRegistry},
    tracker::{Tracker, TrackerError},
};

/// Errors that abort a sync pass.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}

pub type Result<T> = core::result::Result<T, SyncError>;

/// What a pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Subject issues scanned.
    pub issues: usize,

    /// Directive comments computed and rewritten.
    pub computed: usize,

    /// Directive comments skipped because they could not be computed.
    pub skipped: usize,

    /// Number of the report issue.
    pub report: u64,

    /// Whether the report issue was created by this pass.
    pub created_report: bool,
}

/// Run one pass with the markdown format.
pub fn run(tracker: &mut impl Tracker, rate: f64) -> Result<SyncSummary> {
    Reconciler::new(tracker, rate, Markdown).run()
}

/// Owns the registry for the duration of one pass.
pub struct Reconciler<'a, T, F> {
    tracker: &'a mut T,
    rate: f64,
    format: F,
    registry: ReportRegistry,
}

impl<'a, T: Tracker, F: ReportFormat> Reconciler<'a, T, F> {
    pub fn new(tracker: &'a mut T, rate: f64, format: F) -> Self {
        Self {
            tracker,
            rate,
            format,
            registry: ReportRegistry::new(),
        }
    }

    pub fn run(mut self) -> Result<SyncSummary> {
        self.discover()?;
        let (report, created_report) = self.ensure_report()?;
        let (computed, skipped) = self.scan(report)?;
        self.publish(report)?;

        Ok(SyncSummary {
            issues: self.registry.len(),
            computed,
            skipped,
            report,
            created_report,
        })
    }

    /// Page through open issues until an empty page.
    fn discover(&mut self) -> Result<()> {
        let mut page = 1;
        loop {
            let issues = self.tracker.list_open_issues(page)?;
            if issues.is_empty() {
                break;
            }
            debug!(page, count = issues.len(), "listed open issues");
            for issue in issues {
                self.classify(issue)?;
            }
            page += 1;
        }
        Ok(())
    }

    fn classify(&mut self, issue: Issue) -> Result<()> {
        if issue.pull_request {
            debug!(number = issue.number, "skipping pull request");
            return Ok(());
        }
        // Pages can overlap when issues are opened or closed mid-listing.
        let seen = self.registry.contains(issue.number)
            || self.registry.report().is_some_and(|r| r.number == issue.number);
        if seen {
            debug!(number = issue.number, "issue listed twice; keeping first");
            return Ok(());
        }
        if issue.title != REPORT_TITLE {
            self.registry.add_issue(issue)?;
            return Ok(());
        }
        match self.registry.report() {
            None => self.registry.set_report(issue)?,
            Some(report) => warn!(
                number = issue.number,
                report = report.number,
                "ignoring extra report issue"
            ),
        }
        Ok(())
    }

    /// The report issue's number, creating the issue if needed.
    fn ensure_report(&mut self) -> Result<(u64, bool)> {
        if let Some(report) = self.registry.report() {
            return Ok((report.number, false));
        }
        info!("creating empty issue titled '{REPORT_TITLE}'");
        let issue = self.tracker.create_issue(REPORT_TITLE)?;
        let number = issue.number;
        self.registry.set_report(issue)?;
        Ok((number, true))
    }

    /// Compute and rewrite every directive comment.
    ///
    /// Returns the counts of computed and skipped comments. When an issue
    /// has several directive comments, the last one wins.
    fn scan(&mut self, report: u64) -> Result<(usize, usize)> {
        let numbers: Vec<u64> = self.registry.issues().map(|i| i.number).collect();
        let mut computed = 0;
        let mut skipped = 0;

        for number in numbers {
            let comments = self.tracker.list_comments(number)?;
            debug!(number, count = comments.len(), "scanning comments");

            for comment in comments {
                match evaluate(self.rate, &comment.body, report, &self.format) {
                    Ok(None) => {}
                    Ok(Some(evaluation)) => {
                        debug!(
                            number,
                            comment = comment.id,
                            label = %evaluation.result.label,
                            "computed directive"
                        );
                        self.registry.set_result(number, evaluation.result)?;
                        self.tracker.edit_comment(comment.id, &evaluation.body)?;
                        computed += 1;
                    }
                    Err(e) => {
                        warn!(number, comment = comment.id, "skipping directive: {e}");
                        skipped += 1;
                    }
                }
            }
        }

        Ok((computed, skipped))
    }

    fn publish(&mut self, report: u64) -> Result<()> {
        if self.registry.is_empty() {
            debug!("no subject issues; publishing empty report");
        }
        let body = self.registry.render(&self.format);
        self.tracker.edit_issue(report, &body)?;
        info!(report, issues = self.registry.len(), "published report");
        Ok(())
    }
}
