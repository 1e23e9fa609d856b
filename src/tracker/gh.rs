//! Tracker backed by the `gh` CLI.
//!
//! Every call is a `gh api` request against the REST issues endpoints of
//! one repository. Authentication is left to `gh`: an explicit token goes
//! through `GH_TOKEN`, otherwise the credentials in the configured
//! `GH_CONFIG_DIR` (or gh's default) are used.
//!
//! Request bodies are sent as JSON on stdin (`--input -`), never as
//! arguments, so comment and report size is bounded by the API rather
//! than by the OS argument limit.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::json;
use tracing::debug;

use super::{Result, Tracker, TrackerError};
use crate::model::{Comment, Issue};

/// Open issues requested per page.
const PAGE_SIZE: u32 = 50;

/// A repository on a GitHub-compatible host, reached through `gh api`.
#[derive(Debug, Clone)]
pub struct GhTracker {
    owner: String,
    repo: String,
    host: Option<String>,
    token: Option<String>,
    config_dir: Option<PathBuf>,
}

impl GhTracker {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            host: None,
            token: None,
            config_dir: None,
        }
    }

    /// Talk to this host instead of gh's default.
    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    /// Authenticate with this token instead of stored credentials.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Read stored credentials from this `GH_CONFIG_DIR`.
    pub fn with_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config_dir = dir;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("repos/{}/{}/{path}", self.owner, self.repo)
    }

    /// The `gh api` invocation for the given args, without running it.
    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new("gh");
        command.arg("api");
        if let Some(host) = &self.host {
            command.args(["--hostname", host]);
        }
        command.args(args);
        if let Some(token) = &self.token {
            command.env("GH_TOKEN", token).env("GH_ENTERPRISE_TOKEN", token);
        }
        if let Some(dir) = &self.config_dir {
            command.env("GH_CONFIG_DIR", dir);
        }
        command
    }

    /// Run `gh api` with the given args and return stdout.
    ///
    /// `input` is written to gh's stdin; pair it with `--input -`.
    fn api(&self, args: &[&str], input: Option<&[u8]>) -> Result<String> {
        let mut command = self.command(args);
        command
            .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(args = %args.join(" "), input = input.map_or(0, <[u8]>::len), "gh api");
        let mut child = command.spawn()?;
        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin.write_all(input)?;
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(TrackerError::Command {
                args: format!("api {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Send `payload` as the JSON request body.
    fn send(&self, method: &str, path: &str, payload: &serde_json::Value) -> Result<String> {
        let endpoint = self.endpoint(path);
        let input = serde_json::to_vec(payload)?;
        self.api(&input_args(method, &endpoint), Some(input.as_slice()))
    }
}

/// Args for a request whose JSON body arrives on stdin.
fn input_args<'a>(method: &'a str, endpoint: &'a str) -> [&'a str; 5] {
    ["--method", method, endpoint, "--input", "-"]
}

/// JSON shape of an issue from the REST API.
///
/// The issues endpoint also lists pull requests; those carry a
/// `pull_request` object.
#[derive(Deserialize)]
struct GhIssue {
    number: u64,
    title: String,
    pull_request: Option<IgnoredAny>,
}

impl From<GhIssue> for Issue {
    fn from(issue: GhIssue) -> Self {
        Self {
            number: issue.number,
            title: issue.title,
            pull_request: issue.pull_request.is_some(),
        }
    }
}

/// JSON shape of an issue comment from the REST API.
#[derive(Deserialize)]
struct GhComment {
    id: u64,
    body: Option<String>,
}

impl From<GhComment> for Comment {
    fn from(comment: GhComment) -> Self {
        Self {
            id: comment.id,
            body: comment.body.unwrap_or_default(),
        }
    }
}

/// Parse `gh api --paginate` output: one JSON array per page, back to back.
fn parse_pages<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for page in serde_json::Deserializer::from_str(json).into_iter::<Vec<T>>() {
        items.extend(page?);
    }
    Ok(items)
}

impl Tracker for GhTracker {
    fn list_open_issues(&mut self, page: u32) -> Result<Vec<Issue>> {
        let endpoint = self.endpoint(&format!(
            "issues?state=open&per_page={PAGE_SIZE}&page={page}"
        ));
        let json = self.api(&["--method", "GET", &endpoint], None)?;
        let issues: Vec<GhIssue> = serde_json::from_str(&json)?;
        Ok(issues.into_iter().map(Issue::from).collect())
    }

    fn create_issue(&mut self, title: &str) -> Result<Issue> {
        let json = self.send("POST", "issues", &json!({ "title": title }))?;
        let issue: GhIssue = serde_json::from_str(&json)?;
        Ok(issue.into())
    }

    fn edit_issue(&mut self, number: u64, body: &str) -> Result<()> {
        self.send("PATCH", &format!("issues/{number}"), &json!({ "body": body }))?;
        Ok(())
    }

    fn list_comments(&mut self, number: u64) -> Result<Vec<Comment>> {
        let endpoint = self.endpoint(&format!("issues/{number}/comments?per_page=100"));
        let json = self.api(&["--method", "GET", "--paginate", &endpoint], None)?;
        let comments: Vec<GhComment> = parse_pages(&json)?;
        Ok(comments.into_iter().map(Comment::from).collect())
    }

    fn edit_comment(&mut self, id: u64, body: &str) -> Result<()> {
        self.send("PATCH", &format!("issues/comments/{id}"), &json!({ "body": body }))?;
        Ok(())
    }
}

/// Extract the host from a tracker base URL.
///
/// `gh api` speaks the GitHub REST API only, so the URL must point at
/// github.com or a GitHub Enterprise server: a bare host, or a host with
/// the `/api/v3` prefix. Anything else (a Gitea `/api/v1`, say) is
/// rejected rather than silently sent to the wrong API.
///
/// Example: `https://ghe.example.com/api/v3` → `ghe.example.com`.
pub fn host_from_url(url: &str) -> core::result::Result<String, String> {
    let trimmed = url.trim();
    let rest = trimmed.split_once("://").map_or(trimmed, |(_, r)| r);
    let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    if host.is_empty() {
        return Err(format!("tracker url {url:?} has no host"));
    }
    match path.trim_end_matches('/') {
        "" | "api/v3" => Ok(host.to_string()),
        other => Err(format!(
            "tracker url {url:?} has unsupported API path /{other}: \
             issuebot talks to GitHub and GitHub Enterprise only \
             (use https://{host} or https://{host}/api/v3)"
        )),
    }
}
