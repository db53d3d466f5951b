//! Running the reference coreference scorer and reading its report.

use std::collections::BTreeMap;
use std::process::Command;

use layered_anaphora::Tagset;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config::ScorerConfig;
use crate::conll::ExportGroup;
use crate::corpus::Corpus;
use crate::errors::{EvalError, EvalResult};

static METRIC_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^METRIC ([a-z]+):").expect("Invalid metric regex"));

static SCORE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z\- ]+): Recall:.* ([0-9\.]+)%\tPrecision:.* ([0-9\.]+)%\tF1:.* ([0-9\.]+)%")
        .expect("Invalid score regex")
});

/// Percentages exactly as the scorer printed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTriple {
    pub recall: String,
    pub precision: String,
    pub f1: String,
}

impl ScoreTriple {
    pub fn new(recall: impl Into<String>, precision: impl Into<String>, f1: impl Into<String>) -> Self {
        Self {
            recall: recall.into(),
            precision: precision.into(),
            f1: f1.into(),
        }
    }

    /// Recall, precision and F1 as numbers.
    pub fn values(&self) -> Option<(f64, f64, f64)> {
        Some((
            self.recall.parse().ok()?,
            self.precision.parse().ok()?,
            self.f1.parse().ok()?,
        ))
    }
}

/// Metric name, then sub-metric name (`Coreference`,
/// `Identification of Mentions`).
pub type Scores = BTreeMap<String, BTreeMap<String, ScoreTriple>>;

/// Parse a scorer report.
///
/// Scores are filed under `metric` until a `METRIC <name>:` line names
/// another one. A line mentioning `Recall:` that is not a score line, or
/// a report without any score, is an error.
pub fn parse_report(text: &str, metric: &str) -> EvalResult<Scores> {
    let mut scores = Scores::new();
    let mut metric = metric.to_string();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(captures) = METRIC_LINE.captures(line) {
            metric = captures[1].to_string();
        }

        if let Some(captures) = SCORE_LINE.captures(line) {
            scores
                .entry(metric.clone())
                .or_default()
                .insert(captures[1].to_string(), ScoreTriple::new(&captures[2], &captures[3], &captures[4]));
        } else if line.contains("Recall:") {
            return Err(EvalError::report(format!("unexpected score line: {:?}", line)));
        }
    }

    if scores.is_empty() {
        return Err(EvalError::report(format!("no scores for metric {}", metric)));
    }
    Ok(scores)
}

pub struct Scorer {
    config: ScorerConfig,
}

impl Scorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score `system` groups against the gold standard of `corpus`, running
    /// the scorer once per metric.
    ///
    /// Both CoNLL files live in temporary files that are removed however
    /// this returns.
    pub fn score<T: Tagset>(
        &self,
        corpus: &mut Corpus<T>,
        system: &[Vec<ExportGroup>],
        metrics: &[String],
    ) -> EvalResult<Scores> {
        let gold = NamedTempFile::new().map_err(|e| EvalError::io(std::env::temp_dir(), e))?;
        let sys = NamedTempFile::new().map_err(|e| EvalError::io(std::env::temp_dir(), e))?;
        corpus.export_conll(gold.path(), None)?;
        corpus.export_conll(sys.path(), Some(system))?;

        let mut scores = Scores::new();
        for metric in metrics {
            log::debug!("running {} {} for {}", self.config.perl.display(), self.config.script.display(), metric);
            let output = Command::new(&self.config.perl)
                .arg(&self.config.script)
                .arg(metric)
                .arg(gold.path())
                .arg(sys.path())
                .arg("none")
                .output()
                .map_err(|e| EvalError::Scorer {
                    metric: metric.clone(),
                    message: e.to_string(),
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(EvalError::Scorer {
                    metric: metric.clone(),
                    message: format!("{}: {}", output.status, stderr.trim()),
                });
            }

            let report = String::from_utf8_lossy(&output.stdout);
            for (name, subs) in parse_report(&report, metric)? {
                scores.entry(name).or_default().extend(subs);
            }
        }

        log::info!("scored {} metrics", scores.len());
        Ok(scores)
    }

    /// Score with the metrics from the configuration.
    pub fn score_configured<T: Tagset>(
        &self,
        corpus: &mut Corpus<T>,
        system: &[Vec<ExportGroup>],
    ) -> EvalResult<Scores> {
        self.score(corpus, system, &self.config.metrics)
    }
}

fn triple<'a>(scores: &'a Scores, metric: &str, name: &str) -> Option<&'a ScoreTriple> {
    scores.get(metric)?.get(name)
}

/// One LaTeX table row: mention F1 (MUC), MUC and B-cubed recall, precision
/// and F1, then CEAF-m F1.
///
/// `None` when one of those scores is missing or not a number.
pub fn format_score_row(name: &str, scores: &Scores) -> Option<String> {
    let (_, _, mentions_f1) = triple(scores, "muc", "Identification of Mentions")?.values()?;
    let mut row = format!("\\textsc{{{}}} & ${:.2}$", name, mentions_f1);

    for metric in ["muc", "bcub"] {
        let (recall, precision, f1) = triple(scores, metric, "Coreference")?.values()?;
        row.push_str(&format!(" & ${:.2}$ & ${:.2}$ & ${:.2}$", recall, precision, f1));
    }

    let (_, _, ceaf_f1) = triple(scores, "ceafm", "Coreference")?.values()?;
    row.push_str(&format!(" & ${:.2}$ \\\\", ceaf_f1));
    Some(row)
}
