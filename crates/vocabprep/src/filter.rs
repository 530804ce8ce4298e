//! Rewrite dataset lines so they only contain vocabulary tokens.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{CorpusFormat, FilterConfig};
use crate::corpus::{Corpus, split_tokens};
use crate::error::{MalformedLine, PrepError, Result};
use crate::lemmatizer::Lemmatize;
use crate::normalize::Normalizer;
use crate::vocab::Vocabulary;

/// Number of lines echoed at debug level before and after filtering.
const PREVIEW_LINES: usize = 5;

/// Result of filtering a whole corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOutcome {
    pub lines: Vec<String>,
    pub warnings: Vec<MalformedLine>,
    pub stats: FilterStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub input_lines: usize,
    pub output_lines: usize,
    pub empty_lines: usize,
    pub skipped_lines: usize,
    pub kept_tokens: usize,
    pub trailing_blank_removed: bool,
}

/// Keeps the first `max_tokens_per_line` distinct in-vocabulary tokens of
/// each line.
///
/// The filter only reads its vocabulary and normalizer, so lines are
/// processed in parallel; output order always matches input order.
pub struct CorpusFilter<'a, L> {
    vocabulary: &'a Vocabulary,
    normalizer: &'a Normalizer<L>,
    max_tokens_per_line: usize,
}

impl<'a, L: Lemmatize> CorpusFilter<'a, L> {
    pub fn new(
        vocabulary: &'a Vocabulary,
        normalizer: &'a Normalizer<L>,
        config: &FilterConfig,
    ) -> Result<Self> {
        config.validate()?;
        if vocabulary.is_empty() {
            return Err(PrepError::EmptyInput("vocabulary"));
        }
        Ok(Self {
            vocabulary,
            normalizer,
            max_tokens_per_line: config.max_tokens_per_line,
        })
    }

    /// Filter one already-sanitized line.
    ///
    /// Tokens are normalized and scanned left to right. A token is kept if it
    /// is in the vocabulary and not already kept; the scan stops once the
    /// line holds `max_tokens_per_line` tokens.
    pub fn filter_line(&self, line: &str) -> String {
        let mut kept: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for raw in split_tokens(line) {
            if kept.len() >= self.max_tokens_per_line {
                break;
            }
            let token = self.normalizer.normalize(raw);
            if self.vocabulary.contains(&token) && seen.insert(token.clone()) {
                kept.push(token);
            }
        }
        kept.join(" ")
    }

    /// Filter a sequence of already-sanitized lines.
    ///
    /// Empty results are kept in place. When the last input line is itself
    /// empty it is taken to be the segment after a final newline and dropped.
    pub fn filter_lines<S>(&self, lines: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        let mut out: Vec<String> = lines
            .par_iter()
            .map(|line| self.filter_line(line.as_ref()))
            .collect();
        let ends_blank = lines.last().is_some_and(|line| line.as_ref().is_empty());
        remove_trailing_blank(&mut out, ends_blank);
        out
    }

    /// Filter a decoded corpus, recovering from undecodable lines.
    pub fn filter_corpus(&self, corpus: &Corpus<'_>) -> Result<FilterOutcome> {
        self.filter_corpus_with(corpus, || {})
    }

    /// Like [`filter_corpus`](Self::filter_corpus), calling `tick` once per
    /// processed line, from worker threads.
    pub fn filter_corpus_with<F>(&self, corpus: &Corpus<'_>, tick: F) -> Result<FilterOutcome>
    where
        F: Fn() + Sync,
    {
        if corpus.is_empty() {
            return Err(PrepError::EmptyInput("dataset"));
        }

        let results: Vec<Result<String, MalformedLine>> = (0..corpus.len())
            .into_par_iter()
            .filter_map(|idx| corpus.line(idx))
            .map(|line| {
                let filtered = line.map(|l| self.filter_line(&l.text));
                tick();
                filtered
            })
            .collect();

        let mut outcome = FilterOutcome {
            stats: FilterStats {
                input_lines: corpus.len(),
                ..FilterStats::default()
            },
            ..FilterOutcome::default()
        };
        for result in results {
            match result {
                Ok(line) => outcome.lines.push(line),
                Err(malformed) => {
                    warn!("skipping {malformed}");
                    outcome.warnings.push(malformed);
                }
            }
        }

        outcome.stats.trailing_blank_removed =
            remove_trailing_blank(&mut outcome.lines, corpus.ends_with_empty_segment());
        outcome.stats.skipped_lines = outcome.warnings.len();
        outcome.stats.output_lines = outcome.lines.len();
        outcome.stats.empty_lines = outcome.lines.iter().filter(|l| l.is_empty()).count();
        outcome.stats.kept_tokens = outcome
            .lines
            .iter()
            .map(|l| split_tokens(l).count())
            .sum();

        for (idx, line) in outcome.lines.iter().take(PREVIEW_LINES).enumerate() {
            debug!("filtered line #{}: {}", idx + 1, line);
        }
        info!(
            "filtered {} lines: {} kept, {} empty, {} skipped",
            outcome.stats.input_lines,
            outcome.stats.output_lines,
            outcome.stats.empty_lines,
            outcome.stats.skipped_lines
        );

        Ok(outcome)
    }

    /// Decode raw file bytes with `format` and filter them.
    pub fn filter_bytes(&self, bytes: &[u8], format: &CorpusFormat) -> Result<FilterOutcome> {
        format.validate()?;
        self.filter_corpus(&Corpus::from_bytes(bytes, format))
    }
}

/// Drop the last output when the source ended with an empty segment.
///
/// An empty source line always filters to an empty output, so the check on
/// `lines` only guards against a malformed final segment that was skipped.
fn remove_trailing_blank(lines: &mut Vec<String>, source_ends_blank: bool) -> bool {
    if source_ends_blank && lines.last().is_some_and(String::is_empty) {
        lines.pop();
        true
    } else {
        false
    }
}
