//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter, MarkdownReporterTrait
//! @ai:module:stateless true

use crate::evaluator::PairOutcome;
use crate::metrics::EvaluationResults;
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from results
    fn generate(&self, results: &EvaluationResults, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from evaluation results
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// Table cells cannot contain pipes or newlines.
    fn cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn generate_summary(results: &EvaluationResults) -> String {
        let mut output = String::new();
        let overall = &results.overall;

        writeln!(output, "# Answer Equivalence Results").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Date:** {}", results.timestamp).unwrap();
        writeln!(output, "**Judge model:** {}", results.judge_model).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Pairs | {} |", overall.total).unwrap();
        writeln!(output, "| Equal | {} |", overall.equal).unwrap();
        writeln!(output, "| Not equal | {} |", overall.not_equal).unwrap();
        writeln!(output, "| Failed | {} |", overall.failed).unwrap();
        writeln!(output, "| Compared | {} |", overall.compared()).unwrap();
        writeln!(output, "| Accuracy | {:.1}% |", overall.accuracy).unwrap();
        writeln!(output, "| Avg time | {:.0} ms |", overall.avg_elapsed_ms).unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Per reference category breakdown
    /// @ai:effects pure
    fn generate_category_section(results: &EvaluationResults) -> String {
        let mut output = String::new();

        if results.by_category.is_empty() {
            return output;
        }

        writeln!(output, "## Results by Category").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Category | Pairs | Equal | Failed | Accuracy |").unwrap();
        writeln!(output, "|----------|-------|-------|--------|----------|").unwrap();

        for entry in &results.by_category {
            writeln!(
                output,
                "| {} | {} | {} | {} | {:.1}% |",
                entry.category,
                entry.stats.total,
                entry.stats.equal,
                entry.stats.failed,
                entry.stats.accuracy
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    fn generate_method_section(results: &EvaluationResults) -> String {
        let mut output = String::new();

        if results.by_method.is_empty() {
            return output;
        }

        writeln!(output, "## Comparison Methods").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Method | Pairs |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();

        for (method, count) in &results.by_method {
            writeln!(output, "| {} | {} |", method, count).unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent List pairs by id with the explanation or error behind them
    /// @ai:effects pure
    fn generate_pair_list<'a>(
        title: &str,
        outcomes: impl Iterator<Item = &'a PairOutcome>,
    ) -> String {
        let mut output = String::new();
        let outcomes: Vec<_> = outcomes.collect();

        if outcomes.is_empty() {
            return output;
        }

        writeln!(output, "## {}", title).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Pair | Candidate | Reference | Detail |").unwrap();
        writeln!(output, "|------|-----------|-----------|--------|").unwrap();

        for outcome in outcomes {
            let detail = match (&outcome.error, &outcome.result) {
                (Some(error), _) => error.clone(),
                (None, Some(result)) => result.explain(),
                (None, None) => String::new(),
            };

            writeln!(
                output,
                "| {} | `{}` | `{}` | {} |",
                outcome.pair_id,
                Self::cell(&outcome.candidate),
                Self::cell(&outcome.reference),
                Self::cell(&detail)
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, results: &EvaluationResults, output_path: &Path) -> Result<()> {
        let mut content = String::new();

        content.push_str(&Self::generate_summary(results));
        content.push_str(&Self::generate_category_section(results));
        content.push_str(&Self::generate_method_section(results));
        content.push_str(&Self::generate_pair_list("Mismatches", results.mismatches()));
        content.push_str(&Self::generate_pair_list("Failures", results.failures()));

        std::fs::write(output_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerCategory;
    use crate::metrics::{MetricsAggregator, MetricsAggregatorTrait};
    use tempfile::TempDir;

    fn failed_outcome() -> PairOutcome {
        PairOutcome {
            pair_id: "p-1".to_string(),
            source: None,
            candidate: "a | b".to_string(),
            reference: "c".to_string(),
            candidate_category: AnswerCategory::Text,
            reference_category: AnswerCategory::Text,
            is_equal: false,
            result: None,
            error: Some("Semantic judge failed: timeout".to_string()),
            elapsed_ms: 5,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let reporter = MarkdownReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results.md");

        let results = MetricsAggregator::new().aggregate(vec![failed_outcome()], "mock");
        reporter.generate(&results, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("# Answer Equivalence Results"));
        assert!(content.contains("**Judge model:** mock"));
        assert!(content.contains("| text | 1 | 0 | 1 | 0.0% |"));
        assert!(content.contains("| Compared | 0 |"));
        assert!(content.contains("## Failures"));
        assert!(content.contains("`a \\| b`"));
        assert!(!content.contains("## Mismatches"));
    }

    #[test]
    fn test_empty_results_have_only_summary() {
        let results = MetricsAggregator::new().aggregate(vec![], "mock");

        assert!(MarkdownReporter::generate_category_section(&results).is_empty());
        assert!(MarkdownReporter::generate_method_section(&results).is_empty());
        assert!(MarkdownReporter::generate_summary(&results).contains("| Pairs | 0 |"));
    }
}
