//! Directive parsing: find an `irr` line in a comment body.
//!
//! The grammar, matched against the whole body:
//!
//! ```text
//! <notes>
//! irr <cost> <cost_term> <benefit> <benefit_term>
//! [<anything>
//! irrend]
//! ```
//!
//! Notes are optional free text. The `irr` keyword is case-sensitive and
//! must start its own line. Anything after the directive line must be
//! closed by an `irrend` line, which is how a rewritten comment stays
//! parseable on the next run.
//!
//! Only the first line opening with the `irr` keyword is considered. If
//! that line and its tail do not fit the grammar, the comment has no
//! directive; later `irr` lines are never tried. Notes therefore never
//! hold an `irr` line, so a rewrite cannot bring a different directive
//! into play on the next run.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Directive;

/// Errors for a comment that has a directive line with unusable numbers.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    #[error("malformed directive: {field} is not a decimal number: {value:?}")]
    Malformed { field: &'static str, value: String },
}

pub type Result<T> = core::result::Result<T, DirectiveError>;

/// Start of the first line opening with the `irr` keyword.
static KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^irr[ \t]").expect("keyword pattern is valid"));

/// The directive line and its tail, anchored at the keyword.
static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\Airr[ \t]+(?P<cost>[0-9.]+)[ \t]+(?P<cost_term>[0-9.]+)[ \t]+(?P<benefit>[0-9.]+)[ \t]+(?P<benefit_term>[0-9.]+)[ \t]*(?:\r?\n(?:.*?\n)?irrend[ \t]*)?\s*\z",
    )
    .expect("directive pattern is valid")
});

/// Parse a comment body.
///
/// Returns `Ok(None)` when the body holds no directive, which is the
/// normal case for ordinary discussion.
pub fn parse(text: &str) -> Result<Option<Directive>> {
    let Some(keyword) = KEYWORD.find(text) else {
        return Ok(None);
    };
    let (notes, rest) = text.split_at(keyword.start());
    let Some(caps) = DIRECTIVE.captures(rest) else {
        return Ok(None);
    };

    let number = |field: &'static str| -> Result<f64> {
        let value = &caps[field];
        value.parse().map_err(|_| DirectiveError::Malformed {
            field,
            value: value.to_string(),
        })
    };

    Ok(Some(Directive {
        cost: number("cost")?,
        cost_term: number("cost_term")?,
        benefit: number("benefit")?,
        benefit_term: number("benefit_term")?,
        notes: notes.to_string(),
    }))
}
