//! TOML-backed settings.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::errors::{AnaphoraError, AnaphoraResult};

/// Load settings from a TOML file, falling back to defaults when the file
/// does not exist.
pub fn load_toml<C>(path: &Path) -> AnaphoraResult<C>
where
    C: DeserializeOwned + Default,
{
    if !path.exists() {
        log::debug!("{} not found, using defaults", path.display());
        return Ok(C::default());
    }

    let content = fs::read_to_string(path).map_err(|source| AnaphoraError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_toml(path, &content)
}

/// Parse settings from TOML text; `origin` is only used in error messages.
pub fn parse_toml<C: DeserializeOwned>(origin: &Path, content: &str) -> AnaphoraResult<C> {
    toml::from_str(content).map_err(|e| AnaphoraError::Config {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antecedent::CandidateWindow;
    use crate::grouping::GroupingConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_grouping_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "conjunctions = true").unwrap();

        let config: GroupingConfig = load_toml(file.path()).unwrap();
        assert!(config.conjunctions);
    }

    #[test]
    fn test_partial_window_keeps_defaults() {
        let window: CandidateWindow = parse_toml(Path::new("inline"), "upper = 5").unwrap();
        assert_eq!(window, CandidateWindow { lower: -10, upper: 5 });
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config: GroupingConfig = load_toml(Path::new("/nonexistent/grouping.toml")).unwrap();
        assert_eq!(config, GroupingConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = parse_toml::<GroupingConfig>(Path::new("bad.toml"), "conjunctions = \"maybe\"")
            .unwrap_err();
        assert!(matches!(err, AnaphoraError::Config { .. }));
        assert!(err.to_string().starts_with("failed to parse bad.toml"));
    }
}
