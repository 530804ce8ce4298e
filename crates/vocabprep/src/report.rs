//! JSON summaries of a run, written with `--report`.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{FilterConfig, VocabConfig};
use crate::error::MalformedLine;
use crate::filter::{FilterOutcome, FilterStats};
use crate::vocab::{BuildStats, VocabularyBuild, VocabularyEntry};

#[derive(Debug, Serialize)]
pub struct VocabReport<'a> {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: &'a VocabConfig,
    pub final_count: usize,
    pub stats: &'a BuildStats,
    pub selected: &'a [VocabularyEntry],
    pub warnings: &'a [MalformedLine],
}

impl<'a> VocabReport<'a> {
    pub fn new(
        input: PathBuf,
        output: PathBuf,
        config: &'a VocabConfig,
        build: &'a VocabularyBuild,
    ) -> Self {
        Self {
            input,
            output,
            config,
            final_count: build.len(),
            stats: &build.stats,
            selected: &build.entries,
            warnings: &build.warnings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilterReport<'a> {
    pub dataset: PathBuf,
    pub vocabulary: PathBuf,
    pub output: PathBuf,
    pub config: &'a FilterConfig,
    pub vocabulary_size: usize,
    pub stats: &'a FilterStats,
    pub warnings: &'a [MalformedLine],
}

impl<'a> FilterReport<'a> {
    pub fn new(
        dataset: PathBuf,
        vocabulary: PathBuf,
        output: PathBuf,
        config: &'a FilterConfig,
        vocabulary_size: usize,
        outcome: &'a FilterOutcome,
    ) -> Self {
        Self {
            dataset,
            vocabulary,
            output,
            config,
            vocabulary_size,
            stats: &outcome.stats,
            warnings: &outcome.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Vocabulary;

    #[test]
    fn vocab_report_serializes_counts_and_entries() {
        let build = VocabularyBuild {
            vocabulary: Vocabulary::from_tokens(["cat", "critical"]),
            entries: vec![VocabularyEntry {
                token: "cat".into(),
                count: 3,
            }],
            max_tokens: 1,
            stats: BuildStats {
                forced: vec!["critical".into()],
                ..BuildStats::default()
            },
            warnings: vec![MalformedLine {
                line: 4,
                reason: "invalid utf-8".into(),
            }],
        };
        let config = VocabConfig::default();
        let report = VocabReport::new("in.csv".into(), "out.txt".into(), &config, &build);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["final_count"], 2);
        assert_eq!(value["selected"][0]["token"], "cat");
        assert_eq!(value["stats"]["forced"][0], "critical");
        assert_eq!(value["warnings"][0]["line"], 4);
        assert_eq!(value["config"]["max_tokens"], 5_000);
    }
}
