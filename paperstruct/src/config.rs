use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use strum::{Display, EnumString};

/// Default patterns that disqualify a first-page line from being the title.
pub const DEFAULT_TITLE_BOILERPLATE: &[&str] = &[r"(?i)journal of", r"(?i)^(?:vol|volume|issue)\b"];

/// Default case-insensitive substrings that mark an affiliation line.
pub const DEFAULT_AFFILIATION_KEYWORDS: &[&str] = &["university", "institute", "department", "school"];

/// How the Title-Case "isolated header" rule decides that a line stands alone.
///
/// # Variants
///
/// * `RawAdjacency` - The raw lines immediately before and after must exist and be blank.
/// * `Disabled` - The rule never fires; only numbered, roman and uppercase headers count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IsolatedHeaderPolicy {
    #[default]
    RawAdjacency,
    Disabled,
}

/// `ExtractorConfig` holds the tunable thresholds of the structure extractor.
///
/// # Fields
///
/// * `title_search_fraction` - Fraction of the document's characters treated as the first page.
/// * `min_title_chars` - A title candidate must be strictly longer than this many characters.
/// * `author_lookahead_lines` - Number of lines after the title scanned for author lines.
/// * `affiliation_lookahead_lines` - Number of lines after the first author line scanned for affiliations.
/// * `title_boilerplate` - Regex patterns excluding a line from being the title.
/// * `affiliation_keywords` - Case-insensitive substrings that mark an affiliation line.
/// * `isolated_headers` - Policy for the Title-Case isolated header rule.
///
/// # Methods
///
/// * `new` - Creates a new instance of `ExtractorConfig` with default values.
/// * `from_json_file` - Loads a configuration from a JSON file; missing keys keep their defaults.
/// * `with_env_overrides` - Applies `PAPERSTRUCT_*` environment overrides.
/// * `validate` - Checks ranges and compiles the boilerplate patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub title_search_fraction: f64,
    pub min_title_chars: usize,
    pub author_lookahead_lines: usize,
    pub affiliation_lookahead_lines: usize,
    pub title_boilerplate: Vec<String>,
    pub affiliation_keywords: Vec<String>,
    pub isolated_headers: IsolatedHeaderPolicy,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig::new()
    }
}

impl ExtractorConfig {
    /// Creates a new `ExtractorConfig` instance with default values.
    ///
    /// The defaults are the thresholds the heuristics were tuned with:
    /// a 15% first-page window, titles longer than 10 characters,
    /// 5 lines of author lookahead and 4 lines of affiliation lookahead.
    pub fn new() -> ExtractorConfig {
        ExtractorConfig {
            title_search_fraction: 0.15,
            min_title_chars: 10,
            author_lookahead_lines: 5,
            affiliation_lookahead_lines: 4,
            title_boilerplate: DEFAULT_TITLE_BOILERPLATE.iter().map(|s| s.to_string()).collect(),
            affiliation_keywords: DEFAULT_AFFILIATION_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            isolated_headers: IsolatedHeaderPolicy::default(),
        }
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Keys missing from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or fails [`ExtractorConfig::validate`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<ExtractorConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ExtractorConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config JSON in {}", path.display()))?;
        config.validate()?;
        return Ok(config);
    }

    /// Applies overrides from `PAPERSTRUCT_*` environment variables.
    ///
    /// Recognised variables:
    /// - `PAPERSTRUCT_TITLE_SEARCH_FRACTION`
    /// - `PAPERSTRUCT_MIN_TITLE_CHARS`
    /// - `PAPERSTRUCT_AUTHOR_LOOKAHEAD`
    /// - `PAPERSTRUCT_AFFILIATION_LOOKAHEAD`
    /// - `PAPERSTRUCT_ISOLATED_HEADERS` (`raw_adjacency` or `disabled`)
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn with_env_overrides(mut self) -> ExtractorConfig {
        env_parse("PAPERSTRUCT_TITLE_SEARCH_FRACTION", &mut self.title_search_fraction);
        env_parse("PAPERSTRUCT_MIN_TITLE_CHARS", &mut self.min_title_chars);
        env_parse("PAPERSTRUCT_AUTHOR_LOOKAHEAD", &mut self.author_lookahead_lines);
        env_parse("PAPERSTRUCT_AFFILIATION_LOOKAHEAD", &mut self.affiliation_lookahead_lines);
        env_parse("PAPERSTRUCT_ISOLATED_HEADERS", &mut self.isolated_headers);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `title_search_fraction` is outside `(0, 1]`
    /// or any boilerplate pattern fails to compile.
    pub fn validate(&self) -> Result<()> {
        if !(self.title_search_fraction > 0.0 && self.title_search_fraction <= 1.0) {
            anyhow::bail!(
                "title_search_fraction must be in (0, 1], got {}",
                self.title_search_fraction
            );
        }
        self.compile_boilerplate()?;
        return Ok(());
    }

    /// Compiles `title_boilerplate` into regexes.
    pub(crate) fn compile_boilerplate(&self) -> Result<Vec<Regex>> {
        self.title_boilerplate
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("Invalid title boilerplate pattern: {}", pattern))
            })
            .collect()
    }
}

fn env_parse<T: FromStr>(key: &str, target: &mut T) {
    let Ok(value) = std::env::var(key) else {
        return;
    };
    match value.trim().parse::<T>() {
        Ok(parsed) => *target = parsed,
        Err(_) => tracing::warn!("Ignoring unparseable value for {}: {:?}", key, value),
    }
}
