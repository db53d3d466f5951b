//! Evaluation settings.

use std::path::{Path, PathBuf};

use layered_anaphora::{load_toml, CandidateWindow, GroupingConfig};
use serde::{Deserialize, Serialize};

use crate::errors::EvalResult;

/// How to run the external coreference scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Perl interpreter
    pub perl: PathBuf,
    /// Path to the reference `scorer.pl`
    pub script: PathBuf,
    /// Metrics to run, one scorer invocation each
    pub metrics: Vec<String>,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            perl: PathBuf::from("perl"),
            script: PathBuf::from("scorer.pl"),
            metrics: vec!["muc".into(), "bcub".into(), "ceafm".into()],
        }
    }
}

/// Everything an evaluation run needs besides the corpus itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub grouping: GroupingConfig,
    pub window: CandidateWindow,
    pub scorer: ScorerConfig,
    /// Restrict exported system mentions to their head tokens
    pub heads_only: bool,
}

impl EvalConfig {
    /// Load from a TOML file; a missing file gives the defaults.
    pub fn load(path: &Path) -> EvalResult<Self> {
        Ok(load_toml(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
heads_only = true

[grouping]
conjunctions = true

[scorer]
script = "/opt/reference-coreference-scorers/scorer.pl"
metrics = ["muc"]
"#
        )
        .unwrap();

        let config = EvalConfig::load(file.path()).unwrap();
        assert!(config.heads_only);
        assert!(config.grouping.conjunctions);
        assert_eq!(config.scorer.metrics, vec!["muc".to_string()]);
        assert_eq!(config.scorer.perl, PathBuf::from("perl"));
        assert_eq!(config.window, CandidateWindow::default());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config = EvalConfig::load(Path::new("/nonexistent/eval.toml")).unwrap();
        assert_eq!(config, EvalConfig::default());
        assert_eq!(config.scorer.metrics.len(), 3);
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "heads_only = \"yes\"").unwrap();
        assert!(EvalConfig::load(file.path()).is_err());
    }
}
