//! Competitor lookup used for one-level competitor expansion.
//!
//! The built-in table covers the stores we track by hand. Deployments can
//! replace it with a YAML file:
//!
//! ```yaml
//! competitors:
//!   - match: memy.co.in
//!     urls:
//!       - https://www.nykaafashion.com/
//!       - https://www.ajio.com/
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Source of competitor storefront URLs for a brand.
///
/// Implementations must be cheap to call and must return an empty list for
/// unknown brands rather than failing.
pub trait CompetitorSource: Send + Sync {
    fn competitors_for(&self, brand_url: &str) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    /// Matched against the brand URL: equal, or contained as a substring.
    #[serde(rename = "match")]
    pub pattern: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompetitorsFile {
    pub competitors: Vec<CompetitorEntry>,
}

/// Fixed in-process competitor table. First matching entry wins.
#[derive(Debug, Clone)]
pub struct StaticCompetitors {
    entries: Vec<CompetitorEntry>,
}

impl StaticCompetitors {
    #[must_use]
    pub fn new(entries: Vec<CompetitorEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![CompetitorEntry {
            pattern: "memy.co.in".to_string(),
            urls: vec![
                "https://www.nykaafashion.com/".to_string(),
                "https://www.ajio.com/".to_string(),
                "https://www.biba.in/".to_string(),
                "https://www.andindia.com/".to_string(),
            ],
        }])
    }

    #[must_use]
    pub fn entries(&self) -> &[CompetitorEntry] {
        &self.entries
    }
}

impl Default for StaticCompetitors {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CompetitorSource for StaticCompetitors {
    fn competitors_for(&self, brand_url: &str) -> Vec<String> {
        let brand = brand_url.trim().to_lowercase();
        self.entries
            .iter()
            .find(|entry| {
                let pattern = entry.pattern.trim().to_lowercase();
                brand == pattern || brand.contains(&pattern)
            })
            .map(|entry| entry.urls.clone())
            .unwrap_or_default()
    }
}

/// Load and validate a competitor table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_competitors(path: &Path) -> Result<StaticCompetitors, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CompetitorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_competitors(&content)
}

fn parse_competitors(content: &str) -> Result<StaticCompetitors, ConfigError> {
    let file: CompetitorsFile =
        serde_yaml::from_str(content).map_err(ConfigError::CompetitorsFileParse)?;

    validate_competitors(&file)?;

    let entries = file
        .competitors
        .into_iter()
        .map(|entry| CompetitorEntry {
            pattern: entry.pattern.trim().to_string(),
            urls: entry.urls,
        })
        .collect();
    Ok(StaticCompetitors::new(entries))
}

fn validate_competitors(file: &CompetitorsFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in &file.competitors {
        let pattern = entry.pattern.trim();
        if pattern.is_empty() {
            return Err(ConfigError::Validation(
                "competitor match pattern must be non-empty".to_string(),
            ));
        }

        if !seen.insert(pattern.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate competitor match pattern: '{pattern}'"
            )));
        }

        if entry.urls.iter().any(|u| u.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "competitor entry '{pattern}' contains an empty URL"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_by_substring() {
        let source = StaticCompetitors::builtin();
        let urls = source.competitors_for("https://memy.co.in");
        assert_eq!(urls.len(), 4);
        assert_eq!(urls[0], "https://www.nykaafashion.com/");
    }

    #[test]
    fn unknown_brand_has_no_competitors() {
        let source = StaticCompetitors::builtin();
        assert!(source
            .competitors_for("https://unknown-store.example")
            .is_empty());
    }

    #[test]
    fn exact_match_is_accepted() {
        let source = StaticCompetitors::new(vec![CompetitorEntry {
            pattern: "https://shop.example".to_string(),
            urls: vec!["https://rival.example".to_string()],
        }]);
        assert_eq!(
            source.competitors_for("https://shop.example"),
            vec!["https://rival.example".to_string()]
        );
    }

    #[test]
    fn matching_ignores_case() {
        let source = StaticCompetitors::builtin();
        assert_eq!(source.competitors_for("https://MEMY.co.in/").len(), 4);
    }

    #[test]
    fn first_matching_entry_wins() {
        let source = StaticCompetitors::new(vec![
            CompetitorEntry {
                pattern: "shop".to_string(),
                urls: vec!["https://first.example".to_string()],
            },
            CompetitorEntry {
                pattern: "shop.example".to_string(),
                urls: vec!["https://second.example".to_string()],
            },
        ]);
        assert_eq!(
            source.competitors_for("https://shop.example"),
            vec!["https://first.example".to_string()]
        );
    }

    #[test]
    fn parse_competitors_reads_yaml() {
        let yaml = "competitors:\n  - match: brand.example\n    urls:\n      - https://a.example\n      - https://b.example\n";
        let source = parse_competitors(yaml).expect("valid yaml");
        assert_eq!(source.entries().len(), 1);
        assert_eq!(source.competitors_for("https://brand.example").len(), 2);
    }

    #[test]
    fn padded_pattern_still_matches() {
        let yaml = "competitors:\n  - match: ' memy.co.in '\n    urls:\n      - https://rival.example\n";
        let source = parse_competitors(yaml).expect("valid yaml");
        assert_eq!(source.entries()[0].pattern, "memy.co.in");
        assert_eq!(
            source.competitors_for("https://memy.co.in"),
            vec!["https://rival.example".to_string()]
        );

        let unparsed = StaticCompetitors::new(vec![CompetitorEntry {
            pattern: "  shop.example\t".to_string(),
            urls: vec!["https://rival.example".to_string()],
        }]);
        assert_eq!(unparsed.competitors_for("https://shop.example").len(), 1);
    }

    #[test]
    fn parse_competitors_rejects_duplicate_patterns() {
        let yaml = "competitors:\n  - match: a.example\n    urls: []\n  - match: A.example\n    urls: []\n";
        let err = parse_competitors(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
    }

    #[test]
    fn parse_competitors_rejects_blank_pattern() {
        let yaml = "competitors:\n  - match: '  '\n    urls: []\n";
        let err = parse_competitors(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
    }

    #[test]
    fn parse_competitors_rejects_malformed_yaml() {
        let err = parse_competitors("competitors: [").unwrap_err();
        assert!(matches!(err, ConfigError::CompetitorsFileParse(_)), "got: {err:?}");
    }

    #[test]
    fn load_competitors_reports_missing_file() {
        let err = load_competitors(Path::new("/nonexistent/competitors.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::CompetitorsFileIo { .. }), "got: {err:?}");
    }
}
