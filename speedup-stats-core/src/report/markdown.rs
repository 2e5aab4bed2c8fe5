use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::{title_case, Analysis, ReportError, Reporter};
use crate::hypothesis::{HypothesisOutcome, NullDecision};
use crate::stats::{
    CONFIDENCE_LEVEL, LARGE_EFFECT_SIZE, MIN_SIGNIFICANT_CATEGORIES, SIGNIFICANCE_ALPHA,
};
use crate::summary::{ClaimVerdict, RatioSummary};

/// Writes the analysis as a markdown document.
#[derive(Debug, Clone)]
pub struct MarkdownReporter {
    path: PathBuf,
}

impl MarkdownReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the full document.
    pub fn render(
        &self,
        analysis: &Analysis,
        generated_at: DateTime<Local>,
    ) -> Result<String, ReportError> {
        let mut doc = String::new();
        writeln!(doc, "# Statistical Analysis Report\n")?;
        writeln!(
            doc,
            "**Generated:** {}\n",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;

        if let Some(outcome) = &analysis.hypothesis {
            Self::render_methodology(&mut doc, outcome)?;
            Self::render_details(&mut doc, outcome)?;
            Self::render_decision(&mut doc, outcome)?;
        }
        if let Some(summary) = &analysis.ratios {
            Self::render_ratios(&mut doc, summary)?;
        }
        Ok(doc)
    }

    fn render_methodology(doc: &mut String, outcome: &HypothesisOutcome) -> fmt::Result {
        let sizes = outcome
            .results
            .iter()
            .flat_map(|r| [r.baseline_samples, r.optimized_samples]);
        let min_n = sizes.clone().min().unwrap_or(0);
        let max_n = sizes.max().unwrap_or(0);

        writeln!(doc, "## Methodology\n")?;
        writeln!(doc, "- **Test**: {}", outcome.test)?;
        writeln!(doc, "- **Effect size**: Cohen's d with pooled standard deviation")?;
        if min_n == max_n {
            writeln!(doc, "- **Sample size**: {min_n} iterations per group")?;
        } else {
            writeln!(doc, "- **Sample size**: {min_n} to {max_n} iterations per group")?;
        }
        writeln!(
            doc,
            "- **Confidence level**: {:.0}% (alpha = {})",
            CONFIDENCE_LEVEL * 100.0,
            SIGNIFICANCE_ALPHA
        )?;
        writeln!(
            doc,
            "- **Significance rule**: p < {} and d > {}, both required",
            SIGNIFICANCE_ALPHA, LARGE_EFFECT_SIZE
        )?;
        writeln!(
            doc,
            "- **Multiple comparisons**: no correction applied; decisions use uncorrected p-values\n"
        )?;
        writeln!(doc, "## Detailed Results")
    }

    fn render_details(doc: &mut String, outcome: &HypothesisOutcome) -> fmt::Result {
        for r in &outcome.results {
            writeln!(doc, "\n### {}\n", title_case(&r.category))?;
            writeln!(
                doc,
                "- **Performance improvement**: {:.2}x faster",
                r.improvement_ratio
            )?;
            writeln!(doc, "- **Statistical significance**: p = {:.2e}", r.p_value)?;
            writeln!(doc, "- **Effect size**: Cohen's d = {:.3}", r.cohens_d)?;
            writeln!(
                doc,
                "- **T-statistic**: {:.3} (df = {:.1})",
                r.t_statistic, r.degrees_of_freedom
            )?;
            writeln!(
                doc,
                "- **{:.0}% confidence intervals**:",
                CONFIDENCE_LEVEL * 100.0
            )?;
            writeln!(
                doc,
                "  - Baseline: [{:.2}, {:.2}] ms",
                r.baseline_ci.low, r.baseline_ci.high
            )?;
            writeln!(
                doc,
                "  - Optimized: [{:.2}, {:.2}] ms\n",
                r.optimized_ci.low, r.optimized_ci.high
            )?;
            let interpretation = if r.is_significant {
                "Statistically significant with large effect size"
            } else {
                "Not statistically significant"
            };
            writeln!(doc, "**Interpretation**: {interpretation}")?;
        }
        Ok(())
    }

    fn render_decision(doc: &mut String, outcome: &HypothesisOutcome) -> fmt::Result {
        writeln!(doc, "\n## Hypothesis Test Results\n")?;
        writeln!(doc, "| Metric | Value |")?;
        writeln!(doc, "|--------|-------|")?;
        writeln!(doc, "| Total benchmarks | {} |", outcome.total())?;
        writeln!(
            doc,
            "| Statistically significant | {} |",
            outcome.significant_count
        )?;
        writeln!(doc, "| Success rate | {:.1}% |", outcome.success_rate())?;
        writeln!(
            doc,
            "| Average improvement | {:.2}x |",
            outcome.average_improvement()
        )?;
        writeln!(
            doc,
            "| Average effect size | {:.3} |",
            outcome.average_effect_size()
        )?;

        writeln!(doc, "\n### Decision\n")?;
        writeln!(
            doc,
            "**Null hypothesis (H0)**: the optimized implementations are not meaningfully faster than the baseline.\n"
        )?;
        match outcome.decision {
            NullDecision::Reject => {
                writeln!(doc, "**DECISION: REJECT NULL HYPOTHESIS**\n")?;
                writeln!(doc, "**Evidence:**")?;
                writeln!(
                    doc,
                    "- {}/{} benchmarks show statistically significant improvements",
                    outcome.significant_count,
                    outcome.total()
                )?;
                writeln!(
                    doc,
                    "- Every counted benchmark has a large effect size (d > {})",
                    LARGE_EFFECT_SIZE
                )?;
            }
            NullDecision::FailToReject => {
                writeln!(
                    doc,
                    "**DECISION: FAIL TO REJECT NULL HYPOTHESIS** (insufficient evidence)\n"
                )?;
                writeln!(doc, "**Evidence:**")?;
                writeln!(
                    doc,
                    "- Only {}/{} benchmarks show statistically significant improvements",
                    outcome.significant_count,
                    outcome.total()
                )?;
                writeln!(
                    doc,
                    "- At least {} are required to reject",
                    MIN_SIGNIFICANT_CATEGORIES
                )?;
            }
        }

        writeln!(doc, "\n### Multiple Comparisons\n")?;
        writeln!(
            doc,
            "The decision counts categories at an uncorrected alpha of {}. With {} comparisons a \
             Bonferroni-adjusted alpha would be {:.4}; {} of the {} significant categories also \
             clear that threshold. This figure is informational and does not change the decision.",
            SIGNIFICANCE_ALPHA,
            outcome.total(),
            outcome.bonferroni_alpha(),
            outcome.bonferroni_survivors(),
            outcome.significant_count
        )
    }

    fn render_ratios(doc: &mut String, summary: &RatioSummary) -> fmt::Result {
        writeln!(doc, "\n## Speed-up Ratios\n")?;
        writeln!(doc, "| Benchmark | Baseline (ms) | Optimized (ms) | Ratio | Band |")?;
        writeln!(doc, "|-----------|---------------|----------------|-------|------|")?;
        for e in &summary.entries {
            writeln!(
                doc,
                "| {} | {} | {} | {:.2}x | {} |",
                title_case(&e.category),
                e.baseline_value,
                e.optimized_value,
                e.ratio,
                e.band.label()
            )?;
        }
        writeln!(
            doc,
            "\n{} of {} benchmarks at or above 2x ({:.1}%). Mean {:.2}x, min {:.2}x, max {:.2}x.",
            summary.significant_count,
            summary.total(),
            summary.success_rate(),
            summary.mean_ratio,
            summary.min_ratio,
            summary.max_ratio
        )?;
        let verdict = match summary.verdict {
            ClaimVerdict::Supported => "supported",
            ClaimVerdict::Unsupported => "unsupported",
        };
        writeln!(doc, "\n**Claim**: {verdict}")
    }
}

impl Reporter for MarkdownReporter {
    fn report(&self, analysis: &Analysis) -> Result<(), ReportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, self.render(analysis, Local::now())?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{BenchmarkSample, BenchmarkSeries};
    use crate::hypothesis::HypothesisTester;
    use crate::summary::summarize;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    fn analysis() -> Analysis {
        let series = vec![
            BenchmarkSeries::new(
                "string_building",
                vec![7.25, 7.20, 7.30, 7.22, 7.28, 7.24, 7.26, 7.21, 7.29, 7.27],
                vec![3.25, 3.22, 3.28, 3.24, 3.26, 3.23, 3.27, 3.21, 3.29, 3.20],
            ),
            BenchmarkSeries::new("noise", vec![5.0, 6.0, 7.0], vec![6.0, 5.0, 7.0]),
        ];
        Analysis {
            ratios: Some(summarize(&[BenchmarkSample::new("string_building", 7.2465, 3.2477)]).unwrap()),
            hypothesis: Some(HypothesisTester::default().evaluate(&series).unwrap()),
        }
    }

    #[test]
    fn test_render_sections() {
        let doc = MarkdownReporter::new("unused.md")
            .render(&analysis(), fixed_time())
            .unwrap();

        assert!(doc.starts_with("# Statistical Analysis Report"));
        assert!(doc.contains("**Generated:** 2024-03-01 12:30:00"));
        assert!(doc.contains("### String Building"));
        assert!(doc.contains("### Noise"));
        assert!(doc.contains("- **Sample size**: 3 to 10 iterations per group"));
        assert!(doc.contains("Baseline: ["));
        assert!(doc.contains("**Interpretation**: Statistically significant with large effect size"));
        assert!(doc.contains("**Interpretation**: Not statistically significant"));
        assert!(doc.contains("| Total benchmarks | 2 |"));
        assert!(doc.contains("FAIL TO REJECT NULL HYPOTHESIS"));
        assert!(doc.contains("no correction applied"));
        assert!(doc.contains("Bonferroni-adjusted alpha would be 0.0250"));
        assert!(doc.contains("## Speed-up Ratios"));
        assert!(doc.contains("**Claim**: unsupported"));
    }

    #[test]
    fn test_report_writes_file_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("statistical_analysis.md");
        let reporter = MarkdownReporter::new(&path);

        reporter.report(&analysis()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("## Hypothesis Test Results"));
        assert_eq!(reporter.path(), path.as_path());
    }

    #[test]
    fn test_ratio_only_report() {
        let analysis = Analysis {
            ratios: analysis().ratios,
            hypothesis: None,
        };
        let doc = MarkdownReporter::new("unused.md")
            .render(&analysis, fixed_time())
            .unwrap();
        assert!(!doc.contains("## Methodology"));
        assert!(doc.contains("| String Building | 7.2465 | 3.2477 | 2.23x | SIGNIFICANT |"));
    }
}
