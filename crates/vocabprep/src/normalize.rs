//! Token normalization: lowercase, then lemmatize.

use std::collections::HashSet;

use tracing::debug;

use crate::config::NormalizeConfig;
use crate::lemmatizer::Lemmatize;

/// Upper bound on lemmatize passes per token; real chains settle in one or two.
const MAX_ROUNDS: usize = 8;

/// Lowercases and lemmatizes single tokens.
///
/// Lemmatization is repeated until the token stops changing, so the output is
/// always a fixed point and `normalize(normalize(t)) == normalize(t)`. Tokens
/// in the exception set are never lemmatized, whether they come from the input
/// or appear partway through the chain.
pub struct Normalizer<L> {
    lemmatizer: L,
    exceptions: HashSet<String>,
}

impl<L: Lemmatize> Normalizer<L> {
    pub fn new(lemmatizer: L, config: &NormalizeConfig) -> Self {
        let exceptions = config
            .exceptions
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            lemmatizer,
            exceptions,
        }
    }

    pub fn normalize(&self, token: &str) -> String {
        let mut current = token.to_lowercase();
        for _ in 0..MAX_ROUNDS {
            if self.is_exception(&current) {
                return current;
            }
            let next = self.lemmatizer.lemmatize(&current).to_lowercase();
            if next.is_empty() || next == current {
                return current;
            }
            current = next;
        }
        debug!("lemma chain for `{token}` did not settle in {MAX_ROUNDS} rounds, stopping at `{current}`");
        current
    }

    pub fn is_exception(&self, token: &str) -> bool {
        self.exceptions.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Table-driven stand-in for a dictionary-backed engine.
    struct TableLemmatizer(HashMap<&'static str, &'static str>);

    impl Lemmatize for TableLemmatizer {
        fn lemmatize(&self, word: &str) -> String {
            self.0.get(word).copied().unwrap_or(word).to_string()
        }
    }

    fn normalizer() -> Normalizer<TableLemmatizer> {
        let table = HashMap::from([
            ("cats", "cat"),
            ("us", "u"),
            ("as", "a"),
            ("geese", "goose"),
            ("goose", "goos"),
            ("fuses", "fus"),
            ("fus", "us"),
        ]);
        Normalizer::new(TableLemmatizer(table), &NormalizeConfig::default())
    }

    #[test]
    fn lowercases_before_lemmatizing() {
        let n = normalizer();
        assert_eq!(n.normalize("CATS"), "cat");
        assert_eq!(n.normalize("Tortilla"), "tortilla");
    }

    #[test]
    fn exception_set_blocks_lemmatization() {
        let n = normalizer();
        assert_eq!(n.normalize("US"), "us");
        assert_eq!(n.normalize("as"), "as");
    }

    #[test]
    fn chains_settle_on_a_fixed_point() {
        let n = normalizer();
        assert_eq!(n.normalize("geese"), "goos");
        // The chain stops when it reaches an exempt form.
        assert_eq!(n.normalize("fuses"), "us");
    }

    #[test]
    fn cyclic_chains_stop_after_the_round_cap() {
        let n = Normalizer::new(
            TableLemmatizer(HashMap::from([("ping", "pong"), ("pong", "ping")])),
            &NormalizeConfig::default(),
        );
        assert_eq!(n.normalize("ping"), "ping");
        assert_eq!(n.normalize("Pong"), "pong");
    }

    #[test]
    fn normalization_is_idempotent() {
        let n = normalizer();
        for token in ["cats", "US", "geese", "fuses", "6\"", "Running", ""] {
            let once = n.normalize(token);
            assert_eq!(n.normalize(&once), once, "not idempotent for {token:?}");
        }
    }
}
