//! Output formats for rewritten comments and the aggregate report.
//!
//! Formats only lay out values that were already computed; nothing here
//! derives numbers. Rendering must be deterministic, since comments and the
//! report are rewritten on every run.

use std::fmt::Write;

use crate::model::{ComputedResult, IssueRecord, Outcome};

/// How comments and the aggregate report are laid out.
pub trait ReportFormat {
    /// Body for a comment whose directive was computed.
    ///
    /// Must keep the directive parseable, so the next run finds the same
    /// inputs.
    fn comment(&self, result: &ComputedResult) -> String;

    /// Body for the aggregate report issue, given records in rank order.
    fn report(&self, ranked: &[&IssueRecord]) -> String;
}

/// GitHub-flavored markdown tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Markdown;

impl ReportFormat for Markdown {
    fn comment(&self, result: &ComputedResult) -> String {
        let d = &result.directive;
        let rows = [
            ("rate", result.rate.to_string()),
            ("cost", d.cost.to_string()),
            ("cost_term", d.cost_term.to_string()),
            ("benefit", d.benefit.to_string()),
            ("benefit_term", d.benefit_term.to_string()),
            ("cost_pv", result.cost_pv.to_string()),
            ("benefit_pv", result.benefit_pv.to_string()),
            ("npv", result.npv.to_string()),
            ("irr", result.value.to_string()),
            ("label", result.label.clone()),
        ];

        let mut out = format!("{}{}\n\n", d.notes, d.line());
        out.push_str("| field | value |\n| --- | --- |\n");
        for (field, value) in rows {
            let _ = writeln!(out, "| {field} | {value} |");
        }
        let _ = write!(out, "\nReport: #{}\n\nirrend\n", result.report);
        out
    }

    fn report(&self, ranked: &[&IssueRecord]) -> String {
        let mut computed = String::from(
            "### Issues sorted by IRR\n\n| IRR | Issue | Title |\n| ---: | --- | --- |\n",
        );
        let mut missing =
            String::from("### Issues missing IRR inputs\n\n| Issue | Title |\n| --- | --- |\n");

        for record in ranked {
            let number = record.issue.number;
            let title = escape_cell(&record.issue.title);
            match &record.outcome {
                Outcome::Computed(result) => {
                    let percent = result.value * 100.0;
                    let _ = writeln!(computed, "| {percent:.2}% | #{number} | {title} |");
                }
                Outcome::Missing => {
                    let _ = writeln!(missing, "| #{number} | {title} |");
                }
            }
        }

        format!("{computed}\n{missing}")
    }
}

/// Keep a value from breaking out of its table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{directive, irr, model::Directive, model::Issue};

    fn result(notes: &str) -> ComputedResult {
        let d = Directive {
            cost: 100.0,
            cost_term: 0.0,
            benefit: 150.0,
            benefit_term: 365.0,
            notes: notes.to_string(),
        };
        irr::compute(0.08, &d, 12).unwrap()
    }

    fn record(number: u64, title: &str, outcome: Outcome) -> IssueRecord {
        IssueRecord {
            issue: Issue {
                number,
                title: title.to_string(),
                pull_request: false,
            },
            outcome,
        }
    }

    #[test]
    fn comment_layout() {
        let body = Markdown.comment(&result("Cuts CI time.\n"));
        assert!(body.starts_with("Cuts CI time.\nirr 100 0 150 365\n\n| field | value |\n"));
        assert!(body.contains("| rate | 0.08 |\n"));
        assert!(body.contains("| label | irr50 |\n"));
        assert!(body.ends_with("\nReport: #12\n\nirrend\n"));
    }

    #[test]
    fn comment_reparses_to_same_inputs() {
        let original = result("Some notes.\n\n");
        let body = Markdown.comment(&original);
        let reparsed = directive::parse(&body).unwrap().expect("directive present");
        assert_eq!(reparsed, original.directive);
    }

    #[test]
    fn comment_rewrite_is_stable() {
        let first = Markdown.comment(&result("n\n"));
        let reparsed = directive::parse(&first).unwrap().unwrap();
        let second = Markdown.comment(&irr::compute(0.08, &reparsed, 12).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn notes_with_irr_words_rewrite_stably() {
        let body = "irrigation budget\nirr: rough guess\nirr 100 0 150 365\n";
        let parsed = directive::parse(body).unwrap().unwrap();
        let first = Markdown.comment(&irr::compute(0.08, &parsed, 12).unwrap());
        let reparsed = directive::parse(&first).unwrap().unwrap();
        assert_eq!(reparsed.notes, "irrigation budget\nirr: rough guess\n");
        let second = Markdown.comment(&irr::compute(0.08, &reparsed, 12).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_report_has_both_headers() {
        let body = Markdown.report(&[]);
        assert_eq!(
            body,
            "### Issues sorted by IRR\n\n| IRR | Issue | Title |\n| ---: | --- | --- |\n\n\
             ### Issues missing IRR inputs\n\n| Issue | Title |\n| --- | --- |\n"
        );
    }

    #[test]
    fn report_splits_computed_and_missing() {
        let a = record(2, "Cache deps", Outcome::Computed(result("")));
        let b = record(3, "Rewrite a | b", Outcome::Missing);
        let body = Markdown.report(&[&a, &b]);
        assert!(body.contains("| 50.00% | #2 | Cache deps |\n"));
        assert!(body.contains("| #3 | Rewrite a \\| b |\n"));
        let missing_at = body.find("### Issues missing").unwrap();
        assert!(body.find("#2").unwrap() < missing_at);
        assert!(body.find("#3").unwrap() > missing_at);
    }
}
