//! Vocabulary curation from a reference corpus.
//!
//! Counting, pruning, capping and augmenting happen in a fixed order:
//!
//! 1. normalize every token of every line and count occurrences;
//! 2. drop denylisted terms;
//! 3. drop single-character tokens;
//! 4. drop tokens seen fewer than `min_occurrence` times;
//! 5. keep the `max_tokens` most frequent, ordered by count descending then
//!    token ascending;
//! 6. append missing mandatory tokens in declaration order.
//!
//! Step 6 can push the vocabulary past `max_tokens`.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{CorpusFormat, VocabConfig};
use crate::corpus::{Corpus, split_tokens};
use crate::error::{MalformedLine, PrepError, Result};
use crate::lemmatizer::Lemmatize;
use crate::normalize::Normalizer;

/// A token and the number of times it occurred in the reference corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyEntry {
    pub token: String,
    pub count: usize,
}

/// Ordered token list plus a membership set.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    tokens: Vec<String>,
    members: HashSet<String>,
}

impl Vocabulary {
    /// Build from tokens in order; repeated tokens keep their first position.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self::default();
        for token in tokens {
            vocab.push(token.into());
        }
        vocab
    }

    /// Parse whitespace-separated vocabulary text, as written by [`Vocabulary::to_text`].
    pub fn from_text(text: &str) -> Result<Self> {
        let vocab = Self::from_tokens(text.split_whitespace());
        if vocab.is_empty() {
            return Err(PrepError::EmptyInput("vocabulary"));
        }
        Ok(vocab)
    }

    fn push(&mut self, token: String) -> bool {
        if self.members.contains(&token) {
            return false;
        }
        self.members.insert(token.clone());
        self.tokens.push(token);
        true
    }

    pub fn contains(&self, token: &str) -> bool {
        self.members.contains(token)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Newline-separated tokens, no trailing newline.
    pub fn to_text(&self) -> String {
        self.tokens.join("\n")
    }
}

/// Counters describing one vocabulary build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub lines: usize,
    pub total_tokens: usize,
    pub distinct_tokens: usize,
    pub denylisted: usize,
    pub single_character: usize,
    pub below_threshold: usize,
    pub over_cap: usize,
    pub selected: usize,
    pub forced: Vec<String>,
}

/// A finished vocabulary with the evidence that produced it.
#[derive(Debug, Clone)]
pub struct VocabularyBuild {
    pub vocabulary: Vocabulary,
    /// Frequency-selected entries in selection order.
    pub entries: Vec<VocabularyEntry>,
    /// Cap on frequency-selected tokens the build ran with.
    pub max_tokens: usize,
    pub stats: BuildStats,
    pub warnings: Vec<MalformedLine>,
}

impl VocabularyBuild {
    pub fn tokens(&self) -> &[String] {
        self.vocabulary.tokens()
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }
}

/// Counts normalized tokens and turns the counts into a [`Vocabulary`].
pub struct VocabularyBuilder<'n, L> {
    config: VocabConfig,
    format: CorpusFormat,
    normalizer: &'n Normalizer<L>,
}

impl<'n, L: Lemmatize> VocabularyBuilder<'n, L> {
    pub fn new(config: VocabConfig, normalizer: &'n Normalizer<L>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            format: CorpusFormat::default(),
            normalizer,
        })
    }

    /// Use a non-default delimiter or header setting.
    pub fn with_format(mut self, format: CorpusFormat) -> Result<Self> {
        format.validate()?;
        self.format = format;
        Ok(self)
    }

    /// Build from corpus text held in memory.
    pub fn build(&self, corpus_text: &str) -> Result<VocabularyBuild> {
        self.build_from_corpus(&Corpus::from_text(corpus_text, &self.format))
    }

    /// Build from raw file bytes; undecodable lines are skipped with a warning.
    pub fn build_from_bytes(&self, bytes: &[u8]) -> Result<VocabularyBuild> {
        self.build_from_corpus(&Corpus::from_bytes(bytes, &self.format))
    }

    pub fn build_from_corpus(&self, corpus: &Corpus<'_>) -> Result<VocabularyBuild> {
        let mut stats = BuildStats::default();
        let mut warnings = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for line in corpus.lines() {
            let line = match line {
                Ok(line) => line,
                Err(malformed) => {
                    warn!("skipping {malformed}");
                    warnings.push(malformed);
                    continue;
                }
            };
            stats.lines += 1;
            for raw in split_tokens(&line.text) {
                let token = self.normalizer.normalize(raw);
                if token.is_empty() {
                    continue;
                }
                stats.total_tokens += 1;
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        if counts.is_empty() {
            return Err(PrepError::EmptyInput("corpus"));
        }
        stats.distinct_tokens = counts.len();
        info!(
            "identified {} distinct tokens ({} total) in {} lines",
            stats.distinct_tokens, stats.total_tokens, stats.lines
        );

        for term in &self.config.denylist {
            if counts.remove(term.as_str()).is_some() {
                stats.denylisted += 1;
            }
        }

        let before = counts.len();
        counts.retain(|token, _| token.chars().count() > 1);
        stats.single_character = before - counts.len();

        let before = counts.len();
        let threshold = self.config.min_occurrence;
        counts.retain(|_, count| *count >= threshold);
        stats.below_threshold = before - counts.len();
        info!(
            "removed {} denylisted, {} single-character and {} tokens seen fewer than {} times",
            stats.denylisted, stats.single_character, stats.below_threshold, threshold
        );

        let entries = select_most_common(counts, self.config.max_tokens, &mut stats);
        debug!("selected entries: {:?}", entries);

        let mut vocabulary = Vocabulary::from_tokens(entries.iter().map(|e| e.token.clone()));
        for token in &self.config.mandatory_tokens {
            if vocabulary.push(token.clone()) {
                info!("added mandatory token `{token}`");
                stats.forced.push(token.clone());
            }
        }

        info!("final number of tokens: {}", vocabulary.len());
        Ok(VocabularyBuild {
            vocabulary,
            entries,
            max_tokens: self.config.max_tokens,
            stats,
            warnings,
        })
    }
}

/// Keep the `limit` most frequent entries: count descending, token ascending.
fn select_most_common(
    counts: HashMap<String, usize>,
    limit: usize,
    stats: &mut BuildStats,
) -> Vec<VocabularyEntry> {
    let mut entries: Vec<VocabularyEntry> = counts
        .into_iter()
        .map(|(token, count)| VocabularyEntry { token, count })
        .collect();
    entries.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.token.cmp(&b.token)));
    stats.over_cap = entries.len().saturating_sub(limit);
    entries.truncate(limit);
    stats.selected = entries.len();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizeConfig;

    struct Identity;

    impl Lemmatize for Identity {
        fn lemmatize(&self, word: &str) -> String {
            word.to_string()
        }
    }

    fn normalizer() -> Normalizer<Identity> {
        Normalizer::new(Identity, &NormalizeConfig::default())
    }

    fn config(min_occurrence: usize, max_tokens: usize) -> VocabConfig {
        VocabConfig::builder()
            .min_occurrence(min_occurrence)
            .max_tokens(max_tokens)
            .build()
            .unwrap()
    }

    #[test]
    fn ties_break_lexically() {
        let n = normalizer();
        let builder = VocabularyBuilder::new(config(1, 2), &n).unwrap();
        let build = builder.build("pear apple fig pear apple fig kiwi").unwrap();
        assert_eq!(&build.tokens()[..2], &["apple", "fig"]);
        assert_eq!(build.stats.over_cap, 2);
    }

    #[test]
    fn prunes_denylist_single_characters_and_rare_tokens() {
        let n = normalizer();
        let builder = VocabularyBuilder::new(config(2, 10), &n).unwrap();
        let build = builder
            .build("etc etc x x x rude rude rude dog dog cat")
            .unwrap();
        assert_eq!(
            build.entries,
            vec![VocabularyEntry {
                token: "dog".into(),
                count: 2
            }]
        );
        assert_eq!(build.stats.denylisted, 2);
        assert_eq!(build.stats.single_character, 1);
        assert_eq!(build.stats.below_threshold, 1);
    }

    #[test]
    fn mandatory_tokens_follow_selection_and_may_exceed_cap() {
        let n = normalizer();
        let builder = VocabularyBuilder::new(config(1, 1), &n).unwrap();
        let build = builder.build("important important alpha").unwrap();
        assert_eq!(
            build.tokens(),
            &["important", "critical", "necessary"]
        );
        assert_eq!(build.stats.forced, vec!["critical", "necessary"]);
    }

    #[test]
    fn empty_corpus_is_an_error() {
        let n = normalizer();
        let builder = VocabularyBuilder::new(config(1, 5), &n).unwrap();
        assert!(matches!(
            builder.build(" \n ,,, \n"),
            Err(PrepError::EmptyInput("corpus"))
        ));
    }

    #[test]
    fn zero_cap_is_rejected_before_processing() {
        let n = normalizer();
        let cfg = VocabConfig {
            max_tokens: 0,
            ..VocabConfig::default()
        };
        assert!(matches!(
            VocabularyBuilder::new(cfg, &n),
            Err(PrepError::Config(_))
        ));
    }

    #[test]
    fn vocabulary_text_round_trip_keeps_order() {
        let vocab = Vocabulary::from_text("b a\nc  a\n").unwrap();
        assert_eq!(vocab.tokens(), &["b", "a", "c"]);
        assert_eq!(vocab.to_text(), "b\na\nc");
        assert!(vocab.contains("c"));
        assert!(matches!(
            Vocabulary::from_text(" \n"),
            Err(PrepError::EmptyInput("vocabulary"))
        ));
    }
}
