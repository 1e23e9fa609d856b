//! Comment evaluation: parse a body, compute its return, render the rewrite.

use crate::{
    directive::{self, DirectiveError},
    irr::{self, IrrError},
    model::ComputedResult,
    report::ReportFormat,
};

/// Why a comment with a directive line could not be evaluated.
///
/// Local to one comment; a sync run skips the comment and carries on.
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error(transparent)]
    Irr(#[from] IrrError),
}

/// A computed comment and its rewritten body.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub result: ComputedResult,
    pub body: String,
}

/// Evaluate one comment body.
///
/// Returns `Ok(None)` when the body holds no directive.
pub fn evaluate(
    rate: f64,
    text: &str,
    report: u64,
    format: &impl ReportFormat,
) -> Result<Option<Evaluation>, EvaluateError> {
    let Some(directive) = directive::parse(text)? else {
        return Ok(None);
    };
    let result = irr::compute(rate, &directive, report)?;
    let body = format.comment(&result);
    Ok(Some(Evaluation { result, body }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::report::Markdown;

    #[test]
    fn plain_comment_is_none() {
        let evaluation = evaluate(0.08, "Nice idea.", 1, &Markdown).unwrap();
        assert!(evaluation.is_none());
    }

    #[test]
    fn directive_is_computed_and_rendered() {
        let evaluation = evaluate(0.08, "irr 100 0 150 365\nirrend", 4, &Markdown)
            .unwrap()
            .unwrap();
        assert_eq!(evaluation.result.label, "irr50");
        assert!(evaluation.body.contains("Report: #4"));
    }

    #[test]
    fn equal_terms_fail() {
        let err = evaluate(0.08, "irr 100 30 150 30", 1, &Markdown).unwrap_err();
        assert!(matches!(err, EvaluateError::Irr(IrrError::DivisionByZero { .. })));
    }

    #[test]
    fn malformed_numbers_fail() {
        let err = evaluate(0.08, "irr 1..0 0 150 365", 1, &Markdown).unwrap_err();
        assert!(matches!(err, EvaluateError::Directive(_)));
    }
}
