//! Pipeline parameters, defaults, and validation.
//!
//! Every knob the pipeline reads lives here as plain data: numeric limits,
//! the denylist, the mandatory tokens, the lemmatization exception set, and
//! the shape of the delimited input. [`Settings`] groups them so a whole run
//! can be described by one JSON document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Terms dropped from every vocabulary regardless of frequency.
pub const DEFAULT_DENYLIST: [&str; 4] = ["crude", "rude", "offensive", "etc"];
/// Tokens appended to every vocabulary when frequency selection missed them.
pub const DEFAULT_MANDATORY_TOKENS: [&str; 3] = ["critical", "important", "necessary"];
/// Short forms the lemmatizer would mangle (`us` -> `u`, `as` -> `a`).
pub const DEFAULT_EXCEPTIONS: [&str; 5] = ["us", "ps", "bs", "as", "es"];

/// Shape of a delimited text input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorpusFormat {
    /// Field delimiter, converted to whitespace before tokenization.
    pub delimiter: char,
    /// Whether the first line is a header to exclude.
    pub has_header: bool,
}

impl Default for CorpusFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: false,
        }
    }
}

impl CorpusFormat {
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_whitespace() {
            return Err(PrepError::Config(
                "delimiter must not be a whitespace character".into(),
            ));
        }
        if self.delimiter == '"' {
            return Err(PrepError::Config(
                "delimiter must not be the quote character".into(),
            ));
        }
        Ok(())
    }
}

/// Parameters for vocabulary curation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VocabConfig {
    /// Tokens seen fewer times than this are pruned.
    pub min_occurrence: usize,
    /// Cap on frequency-selected tokens; mandatory tokens may exceed it.
    pub max_tokens: usize,
    pub denylist: Vec<String>,
    pub mandatory_tokens: Vec<String>,
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            min_occurrence: 1,
            max_tokens: 5_000,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            mandatory_tokens: DEFAULT_MANDATORY_TOKENS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl VocabConfig {
    /// Returns a builder initialised with [`VocabConfig::default`].
    #[must_use]
    pub fn builder() -> VocabConfigBuilder {
        VocabConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(PrepError::Config(
                "max_tokens must be greater than zero".into(),
            ));
        }
        if self.mandatory_tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(PrepError::Config(
                "mandatory tokens must not be blank".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`VocabConfig`].
#[derive(Debug, Default, Clone)]
pub struct VocabConfigBuilder {
    cfg: VocabConfig,
}

impl VocabConfigBuilder {
    #[must_use]
    pub fn min_occurrence(mut self, value: usize) -> Self {
        self.cfg.min_occurrence = value;
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, value: usize) -> Self {
        self.cfg.max_tokens = value;
        self
    }

    /// Replaces the denylist.
    #[must_use]
    pub fn denylist<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.denylist = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the mandatory tokens. Duplicates keep their first position.
    #[must_use]
    pub fn mandatory_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.mandatory_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Finalises the builder, returning a validated [`VocabConfig`].
    pub fn build(mut self) -> Result<VocabConfig> {
        let mut seen = std::collections::HashSet::new();
        self.cfg.mandatory_tokens.retain(|t| seen.insert(t.clone()));
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Parameters for corpus filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Maximum number of tokens kept per output line.
    pub max_tokens_per_line: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_line: 20,
        }
    }
}

impl FilterConfig {
    pub fn new(max_tokens_per_line: usize) -> Result<Self> {
        let cfg = Self {
            max_tokens_per_line,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tokens_per_line == 0 {
            return Err(PrepError::Config(
                "max_tokens_per_line must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Parameters for token normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Lowercased tokens that bypass lemmatization.
    pub exceptions: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            exceptions: DEFAULT_EXCEPTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Everything a run needs besides file paths, loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub format: CorpusFormat,
    pub vocab: VocabConfig,
    pub filter: FilterConfig,
    pub normalize: NormalizeConfig,
}

impl Settings {
    /// Read settings from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw =
            std::fs::read_to_string(path).map_err(|err| PrepError::io(err, path.to_path_buf()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.format.validate()?;
        self.vocab.validate()?;
        self.filter.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_zero_cap() {
        let err = VocabConfig::builder()
            .max_tokens(0)
            .build()
            .expect_err("zero cap should fail");
        assert!(matches!(
            err,
            PrepError::Config(message) if message.contains("max_tokens")
        ));
    }

    #[test]
    fn builder_deduplicates_mandatory_tokens() {
        let cfg = VocabConfig::builder()
            .mandatory_tokens(["urgent", "critical", "urgent"])
            .build()
            .expect("config should be valid");
        assert_eq!(cfg.mandatory_tokens, vec!["urgent", "critical"]);
    }

    #[test]
    fn filter_config_rejects_zero_cap() {
        assert!(FilterConfig::new(0).is_err());
        assert_eq!(FilterConfig::new(3).unwrap().max_tokens_per_line, 3);
    }

    #[test]
    fn format_rejects_whitespace_and_quote_delimiters() {
        for delimiter in [' ', '\t', '"'] {
            let format = CorpusFormat {
                delimiter,
                has_header: false,
            };
            assert!(format.validate().is_err(), "{delimiter:?} accepted");
        }
        assert!(CorpusFormat::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"vocab": {"max_tokens": 12}, "format": {"delimiter": ";"}}"#)
                .unwrap();
        assert_eq!(settings.vocab.max_tokens, 12);
        assert_eq!(settings.vocab.denylist.len(), DEFAULT_DENYLIST.len());
        assert_eq!(settings.format.delimiter, ';');
        assert_eq!(settings.filter.max_tokens_per_line, 20);
        assert!(settings.validate().is_ok());
    }
}
