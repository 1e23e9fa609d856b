//! Issue tracker access.
//!
//! The tracker is the system of record: everything a run knows comes from
//! here and everything it produces goes back here. Calls are blocking and
//! made one at a time. A failed call is fatal to the run; rerunning is safe
//! because every write is a full overwrite.

mod gh;

use std::io;

pub use gh::{GhTracker, host_from_url};

use crate::model::{Comment, Issue};

/// Errors from talking to the tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("failed to run gh: {0}")]
    Spawn(#[from] io::Error),

    #[error("gh {args} failed: {stderr}")]
    Command { args: String, stderr: String },

    #[error("unexpected response from tracker: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, TrackerError>;

/// The operations a sync run needs from a tracker, scoped to one repository.
pub trait Tracker {
    /// One page of open issues, starting at page 1.
    ///
    /// An empty page means there are no more.
    fn list_open_issues(&mut self, page: u32) -> Result<Vec<Issue>>;

    /// Creates an issue with an empty body.
    fn create_issue(&mut self, title: &str) -> Result<Issue>;

    /// Replaces an issue's body.
    fn edit_issue(&mut self, number: u64, body: &str) -> Result<()>;

    /// Every comment on an issue, oldest first.
    fn list_comments(&mut self, number: u64) -> Result<Vec<Comment>>;

    /// Replaces a comment's body.
    fn edit_comment(&mut self, id: u64, body: &str) -> Result<()>;
}
