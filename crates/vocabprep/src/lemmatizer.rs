//! WordNet-backed lemmatization engine.

use std::path::Path;

use tracing::info;
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;
use wordnet_types::Pos;

use crate::error::{PrepError, Result};

/// Reduces one word to a base form.
///
/// Implementations must be deterministic and hold no per-call state so a
/// single engine can be shared across worker threads.
pub trait Lemmatize: Send + Sync {
    fn lemmatize(&self, word: &str) -> String;
}

impl<L: Lemmatize + ?Sized> Lemmatize for &L {
    fn lemmatize(&self, word: &str) -> String {
        (**self).lemmatize(word)
    }
}

/// Morphy over a WordNet lemma inventory.
///
/// Candidates are gathered for every part of speech in `pos_order`. A word
/// that is itself a known lemma starts as the pick; otherwise, and thereafter,
/// a strictly shorter candidate replaces the pick. Ties keep the earlier
/// candidate. Unknown words come back unchanged.
pub struct WordNetLemmatizer {
    wordnet: WordNet,
    morphy: Morphy,
    pos_order: Vec<Pos>,
}

impl WordNetLemmatizer {
    /// Load the index files and exception lists from a WordNet dict directory.
    pub fn load(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let wordnet = WordNet::load_with_mode(dir, mode).map_err(PrepError::Lexicon)?;
        let morphy = Morphy::load(dir).map_err(PrepError::Lexicon)?;
        info!(
            "loaded {} lemmas and {} verb exceptions from {}",
            wordnet.lemma_count(),
            morphy.exception_count(Pos::Verb),
            dir.display()
        );
        Ok(Self::from_parts(wordnet, morphy))
    }

    pub fn from_parts(wordnet: WordNet, morphy: Morphy) -> Self {
        Self {
            wordnet,
            morphy,
            pos_order: Pos::ALL.to_vec(),
        }
    }

    /// Override the part-of-speech lookup order. Duplicates are dropped; an
    /// empty list is rejected.
    pub fn with_pos_order(mut self, order: impl IntoIterator<Item = Pos>) -> Result<Self> {
        let mut deduped: Vec<Pos> = Vec::new();
        for pos in order {
            if !deduped.contains(&pos) {
                deduped.push(pos);
            }
        }
        if deduped.is_empty() {
            return Err(PrepError::Config(
                "part-of-speech order must name at least one part of speech".into(),
            ));
        }
        self.pos_order = deduped;
        Ok(self)
    }

    pub fn pos_order(&self) -> &[Pos] {
        &self.pos_order
    }
}

impl Lemmatize for WordNetLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        let exists = |pos: Pos, lemma: &str| self.wordnet.lemma_exists(pos, lemma);
        let known = self.pos_order.iter().any(|pos| exists(*pos, word));
        let mut best: Option<String> = known.then(|| word.to_string());

        for pos in &self.pos_order {
            for candidate in self.morphy.lemmas_for(*pos, word, exists) {
                let shorter = best
                    .as_ref()
                    .is_none_or(|current| candidate.lemma.len() < current.len());
                if shorter {
                    best = Some(candidate.lemma.into_owned());
                }
            }
        }

        best.unwrap_or_else(|| word.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn engine() -> WordNetLemmatizer {
        let wordnet = WordNet::from_lemmas([
            (Pos::Noun, "cat"),
            (Pos::Noun, "running"),
            (Pos::Noun, "sat"),
            (Pos::Noun, "ga"),
            (Pos::Noun, "gas"),
            (Pos::Verb, "run"),
            (Pos::Verb, "sit"),
            (Pos::Noun, "child"),
        ]);
        let morphy = Morphy::from_exceptions(HashMap::from([
            (
                Pos::Verb,
                HashMap::from([("sat".to_string(), vec!["sit".to_string()])]),
            ),
            (
                Pos::Noun,
                HashMap::from([("children".to_string(), vec!["child".to_string()])]),
            ),
        ]));
        WordNetLemmatizer::from_parts(wordnet, morphy)
    }

    #[test]
    fn prefers_shortest_candidate_across_parts_of_speech() {
        let lemmatizer = engine();
        assert_eq!(lemmatizer.lemmatize("cats"), "cat");
        assert_eq!(lemmatizer.lemmatize("running"), "run");
        assert_eq!(lemmatizer.lemmatize("children"), "child");
    }

    #[test]
    fn known_surface_form_wins_ties() {
        assert_eq!(engine().lemmatize("sat"), "sat");
    }

    #[test]
    fn shorter_rule_hit_beats_known_surface_form() {
        // The reason `us`, `as` and friends need an exception list.
        assert_eq!(engine().lemmatize("gas"), "ga");
    }

    #[test]
    fn unknown_words_pass_through() {
        assert_eq!(engine().lemmatize("tortilla"), "tortilla");
        assert_eq!(engine().lemmatize("6\""), "6\"");
    }

    #[test]
    fn pos_order_restricts_lookup() {
        let nouns_only = engine().with_pos_order([Pos::Noun]).unwrap();
        assert_eq!(nouns_only.lemmatize("running"), "running");
        assert!(engine().with_pos_order([]).is_err());
        let deduped = engine().with_pos_order([Pos::Verb, Pos::Verb]).unwrap();
        assert_eq!(deduped.pos_order(), &[Pos::Verb]);
    }
}
