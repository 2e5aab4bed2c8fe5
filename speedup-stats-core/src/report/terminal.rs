use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use super::{title_case, Analysis, ReportError, Reporter};
use crate::hypothesis::{HypothesisOutcome, NullDecision};
use crate::stats::{
    StatResult, LARGE_EFFECT_SIZE, MIN_SIGNIFICANT_CATEGORIES, SIGNIFICANCE_ALPHA,
};
use crate::summary::{ClaimVerdict, RatioBand, RatioEntry, RatioSummary, SIGNIFICANT_RATIO};

const RULE_WIDTH: usize = 100;
const BAR_WIDTH: usize = 40;

/// A reporter that prints ratio and hypothesis results to the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn paint(&self, text: String, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(&text).to_string()
        } else {
            text
        }
    }

    /// Format a duration given in milliseconds to a human-readable string.
    fn format_ms(ms: f64) -> String {
        if ms >= 1_000.0 {
            format!("{:.3} s", ms / 1_000.0)
        } else if ms >= 1.0 {
            format!("{:.3} ms", ms)
        } else {
            format!("{:.3} us", ms * 1_000.0)
        }
    }

    fn format_ratio(ratio: f64) -> String {
        format!("{:.2}x", ratio)
    }

    fn truncate(name: &str, width: usize) -> String {
        if name.chars().count() > width {
            let kept: String = name.chars().take(width.saturating_sub(3)).collect();
            format!("{kept}...")
        } else {
            name.to_string()
        }
    }

    fn paint_band(&self, band: RatioBand, text: String) -> String {
        match band {
            RatioBand::Significant => self.paint(text, |s| s.green().bold()),
            RatioBand::Good => self.paint(text, |s| s.cyan()),
            RatioBand::Modest => self.paint(text, |s| s.yellow()),
            RatioBand::Regression => self.paint(text, |s| s.red()),
        }
    }

    fn print_heading(&self, writer: &mut impl Write, title: &str) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", self.paint(title.to_string(), |s| s.bold()))?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))
    }

    fn print_ratio_row(&self, writer: &mut impl Write, entry: &RatioEntry) -> io::Result<()> {
        let name = Self::truncate(&title_case(&entry.category), 28);
        // Pad before painting so escape codes do not break alignment
        let ratio = format!("{:>8} faster", Self::format_ratio(entry.ratio));
        let band = self.paint_band(entry.band, format!("{:<12}", entry.band.label()));
        writeln!(
            writer,
            "{:<28} {:>12} {:>12} {} | {}",
            name,
            Self::format_ms(entry.baseline_value),
            Self::format_ms(entry.optimized_value),
            ratio,
            band
        )
    }

    fn print_ratio_stats(&self, writer: &mut impl Write, summary: &RatioSummary) -> io::Result<()> {
        self.print_heading(writer, "Summary statistics")?;
        writeln!(writer, "Total benchmarks: {}", summary.total())?;
        writeln!(
            writer,
            "Significant improvements (>={}x): {}",
            SIGNIFICANT_RATIO, summary.significant_count
        )?;
        writeln!(writer, "Success rate: {:.1}%", summary.success_rate())?;
        writeln!(writer, "Average improvement: {:.2}x", summary.mean_ratio)?;
        if let Some(best) = summary.best() {
            writeln!(
                writer,
                "Best improvement: {:.2}x ({})",
                best.ratio,
                title_case(&best.category)
            )?;
        }
        if let Some(worst) = summary.worst() {
            writeln!(
                writer,
                "Worst improvement: {:.2}x ({})",
                worst.ratio,
                title_case(&worst.category)
            )?;
        }
        Ok(())
    }

    /// Horizontal bars scaled to the largest value, with `|` marking `threshold`.
    ///
    /// `rows` holds a label and value per bar; `paint` colours bar `i`.
    fn print_bars(
        &self,
        writer: &mut impl Write,
        rows: &[(String, f64)],
        unit: &str,
        threshold: f64,
        legend: &str,
        paint: impl Fn(usize, String) -> String,
    ) -> io::Result<()> {
        let scale = rows
            .iter()
            .map(|(_, value)| *value)
            .fold(threshold, f64::max);
        let target = ((threshold / scale) * BAR_WIDTH as f64).round() as usize;

        for (i, (label, value)) in rows.iter().enumerate() {
            let filled = ((value.max(0.0) / scale) * BAR_WIDTH as f64).round() as usize;
            let mut bar: String = (0..BAR_WIDTH)
                .map(|cell| if cell < filled { '#' } else { ' ' })
                .collect();
            if target < BAR_WIDTH {
                bar.replace_range(target..target + 1, "|");
            }
            writeln!(
                writer,
                "{:<28} {} {:.2}{}",
                Self::truncate(&title_case(label), 28),
                paint(i, bar),
                value,
                unit
            )?;
        }
        writeln!(
            writer,
            "{:<28} {:>width$} = {}",
            "",
            "|",
            legend,
            width = target + 1
        )
    }

    fn print_ratio_chart(&self, writer: &mut impl Write, summary: &RatioSummary) -> io::Result<()> {
        self.print_heading(writer, "Improvement by benchmark")?;
        let rows: Vec<_> = summary
            .entries
            .iter()
            .map(|e| (e.category.clone(), e.ratio))
            .collect();
        self.print_bars(
            writer,
            &rows,
            "x",
            SIGNIFICANT_RATIO,
            &format!("{}x target", SIGNIFICANT_RATIO),
            |i, bar| self.paint_band(summary.entries[i].band, bar),
        )
    }

    fn print_effect_chart(
        &self,
        writer: &mut impl Write,
        outcome: &HypothesisOutcome,
    ) -> io::Result<()> {
        self.print_heading(writer, "Effect size by benchmark (Cohen's d)")?;
        let rows: Vec<_> = outcome
            .results
            .iter()
            .map(|r| (r.category.clone(), r.cohens_d))
            .collect();
        self.print_bars(
            writer,
            &rows,
            "",
            LARGE_EFFECT_SIZE,
            &format!("large effect (d = {})", LARGE_EFFECT_SIZE),
            |i, bar| {
                if outcome.results[i].cohens_d > LARGE_EFFECT_SIZE {
                    self.paint(bar, |s| s.green())
                } else {
                    self.paint(bar, |s| s.yellow())
                }
            },
        )
    }

    fn print_claim(&self, writer: &mut impl Write, summary: &RatioSummary) -> io::Result<()> {
        self.print_heading(writer, "Hypothesis test preview")?;
        match summary.verdict {
            ClaimVerdict::Supported => {
                let line = "NULL HYPOTHESIS LIKELY TO BE REJECTED".to_string();
                writeln!(writer, "{}", self.paint(line, |s| s.green().bold()))?;
                writeln!(
                    writer,
                    "   {}/{} benchmarks show >={}x improvement",
                    summary.significant_count,
                    summary.total(),
                    SIGNIFICANT_RATIO
                )?;
            }
            ClaimVerdict::Unsupported => {
                let line = "INSUFFICIENT EVIDENCE TO REJECT NULL HYPOTHESIS".to_string();
                writeln!(writer, "{}", self.paint(line, |s| s.yellow().bold()))?;
                writeln!(
                    writer,
                    "   Only {}/{} benchmarks show >={}x improvement",
                    summary.significant_count,
                    summary.total(),
                    SIGNIFICANT_RATIO
                )?;
                writeln!(
                    writer,
                    "   Need >={} categories for the claim to hold",
                    MIN_SIGNIFICANT_CATEGORIES
                )?;
            }
        }
        Ok(())
    }

    fn print_ratios(&self, writer: &mut impl Write, summary: &RatioSummary) -> io::Result<()> {
        self.print_heading(writer, "Speed-up ratios")?;
        for entry in &summary.entries {
            self.print_ratio_row(writer, entry)?;
        }
        self.print_ratio_stats(writer, summary)?;
        self.print_ratio_chart(writer, summary)?;
        self.print_claim(writer, summary)
    }

    fn print_hypothesis_header(&self, writer: &mut impl Write, test: &str) -> io::Result<()> {
        self.print_heading(writer, &format!("Hypothesis tests ({test})"))?;
        let header = format!(
            "{:<28} {:>12} {:>12} {:>8} {:>10} {:>10} {:>15}",
            "Benchmark", "Baseline", "Optimized", "Ratio", "p-value", "Cohen's d", "Result"
        );
        writeln!(writer, "{}", self.paint(header, |s| s.bold()))
    }

    fn print_hypothesis_row(&self, writer: &mut impl Write, result: &StatResult) -> io::Result<()> {
        let verdict = if result.is_significant {
            self.paint(format!("{:>15}", "significant"), |s| s.green().bold())
        } else {
            self.paint(format!("{:>15}", "not significant"), |s| s.yellow())
        };
        writeln!(
            writer,
            "{:<28} {:>12} {:>12} {:>8} {:>10} {:>10.3} {}",
            Self::truncate(&title_case(&result.category), 28),
            Self::format_ms(result.baseline_mean),
            Self::format_ms(result.optimized_mean),
            Self::format_ratio(result.improvement_ratio),
            format!("{:.2e}", result.p_value),
            result.cohens_d,
            verdict
        )
    }

    fn print_decision(&self, writer: &mut impl Write, outcome: &HypothesisOutcome) -> io::Result<()> {
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(
            writer,
            "{}/{} benchmarks statistically significant (p < {} and d > {})",
            outcome.significant_count,
            outcome.total(),
            SIGNIFICANCE_ALPHA,
            LARGE_EFFECT_SIZE
        )?;
        writeln!(
            writer,
            "Average improvement: {:.2}x, average effect size: {:.3}",
            outcome.average_improvement(),
            outcome.average_effect_size()
        )?;

        let label = self.paint("Decision:".to_string(), |s| s.bold());
        let decision = outcome.decision.describe().to_uppercase();
        let decision = match outcome.decision {
            NullDecision::Reject => self.paint(decision, |s| s.green().bold()),
            NullDecision::FailToReject => self.paint(decision, |s| s.yellow().bold()),
        };
        writeln!(writer, "{} {}", label, decision)?;
        writeln!(
            writer,
            "Note: p-values are uncorrected; {}/{} significant results also clear a Bonferroni alpha of {:.4}",
            outcome.bonferroni_survivors(),
            outcome.significant_count,
            outcome.bonferroni_alpha()
        )?;
        writeln!(writer)
    }

    fn print_hypothesis(&self, writer: &mut impl Write, outcome: &HypothesisOutcome) -> io::Result<()> {
        self.print_hypothesis_header(writer, &outcome.test)?;
        for result in &outcome.results {
            self.print_hypothesis_row(writer, result)?;
        }
        self.print_effect_chart(writer, outcome)?;
        self.print_decision(writer, outcome)
    }

    /// Render the whole analysis into any writer.
    pub fn write_to(&self, writer: &mut impl Write, analysis: &Analysis) -> io::Result<()> {
        if let Some(summary) = &analysis.ratios {
            self.print_ratios(writer, summary)?;
        }
        if let Some(outcome) = &analysis.hypothesis {
            self.print_hypothesis(writer, outcome)?;
        }
        Ok(())
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, analysis: &Analysis) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.write_to(&mut writer, analysis)?;
        Ok(())
    }
}
