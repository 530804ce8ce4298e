//! WordNet-style morphological processing (morphy).
//!
//! Follows the classic morphy algorithm: check exceptions, apply suffix
//! substitution rules, and keep only candidates accepted by a caller-provided
//! lemma existence predicate. The crate does not depend on any loader; it only
//! needs `Pos` and the callback you supply.
//!
//! # How it works
//! 1. Emit the surface form if it exists.
//! 2. Check exceptions (`*.exc` files).
//! 3. Apply POS-specific suffix rules. A rule that strips a suffix without a
//!    replacement also tries the stem with a doubled final letter collapsed
//!    (`running` -> `runn` -> `run`).
//! 4. Deduplicate while preserving provenance (`Surface`, `Exception`, `Rule`).
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_morphy::Morphy;
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = "/path/to/wordnet";
//! let wn = WordNet::load_with_mode(dict, LoadMode::Mmap)?;
//! let morph = Morphy::load(dict)?;
//! let exists = |pos, lemma: &str| wn.lemma_exists(pos, lemma);
//!
//! let cands = morph.lemmas_for(Pos::Verb, "running", exists);
//! for cand in cands {
//!     println!("{:?}: {}", cand.source, cand.lemma);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p wordnet-morphy --example lookup -- <dict> [--demo|<word>]`.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use wordnet_types::Pos;

/// Surface form to lemma list, as read from one `*.exc` file.
pub type ExceptionMap = HashMap<String, Vec<String>>;

/// Where a candidate lemma originated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CandidateSource {
    Surface,
    Exception,
    Rule {
        suffix: &'static str,
        replacement: &'static str,
    },
}

/// A lemma candidate paired with its POS and provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LemmaCandidate<'a> {
    pub pos: Pos,
    pub lemma: Cow<'a, str>,
    pub source: CandidateSource,
}

/// Morphy engine holding the per-POS exception lists.
///
/// Rules are static; only the exceptions are data. The engine is immutable
/// after construction and can be shared across threads.
#[derive(Debug, Default, Clone)]
pub struct Morphy {
    exceptions: HashMap<Pos, ExceptionMap>,
}

impl Morphy {
    /// Load morphy exception lists (`*.exc`) from a WordNet dict directory.
    ///
    /// Files are optional; missing ones are treated as empty.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let mut exceptions = HashMap::new();
        for pos in Pos::ALL {
            exceptions.insert(pos, load_exc(&dir.join(pos.exception_file()))?);
        }
        Ok(Self { exceptions })
    }

    /// Rules-only engine with no exception lists.
    pub fn without_exceptions() -> Self {
        Self::default()
    }

    /// Build an engine from in-memory exception lists.
    pub fn from_exceptions(exceptions: HashMap<Pos, ExceptionMap>) -> Self {
        let exceptions = exceptions
            .into_iter()
            .map(|(pos, map)| {
                let map: ExceptionMap = map
                    .into_iter()
                    .map(|(surface, lemmas)| {
                        let lemmas = lemmas.iter().map(|l| normalize(l)).collect::<Vec<_>>();
                        (normalize(&surface), lemmas)
                    })
                    .collect();
                (pos, map)
            })
            .collect();
        Self { exceptions }
    }

    /// Number of exception entries recorded for a part of speech.
    pub fn exception_count(&self, pos: Pos) -> usize {
        self.exceptions.get(&pos).map_or(0, HashMap::len)
    }

    /// Generate lemmas for a surface form, returning enriched provenance.
    ///
    /// The callback `lemma_exists` typically delegates to `WordNet::lemma_exists`
    /// so this crate stays ignorant of any concrete database layout.
    pub fn lemmas_for<'a, F>(
        &'a self,
        pos: Pos,
        surface: &str,
        lemma_exists: F,
    ) -> Vec<LemmaCandidate<'a>>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let mut seen: HashSet<Cow<'a, str>> = HashSet::new();
        let mut out: Vec<LemmaCandidate<'a>> = Vec::new();
        let norm_surface = normalize(surface);
        if norm_surface.is_empty() {
            return out;
        }

        if lemma_exists(pos, &norm_surface) {
            push_unique(
                &mut out,
                &mut seen,
                LemmaCandidate {
                    pos,
                    lemma: Cow::Owned(norm_surface.clone()),
                    source: CandidateSource::Surface,
                },
            );
        }

        // Exceptions may list several lemmas for one surface form.
        if let Some(exc_map) = self.exceptions.get(&pos)
            && let Some(entries) = exc_map.get(&norm_surface)
        {
            for lemma in entries {
                if lemma_exists(pos, lemma) {
                    push_unique(
                        &mut out,
                        &mut seen,
                        LemmaCandidate {
                            pos,
                            lemma: Cow::Borrowed(lemma.as_str()),
                            source: CandidateSource::Exception,
                        },
                    );
                }
            }
        }

        for &(suffix, replacement) in rules_for(pos) {
            for candidate in apply_rule(&norm_surface, suffix, replacement) {
                if lemma_exists(pos, &candidate) {
                    push_unique(
                        &mut out,
                        &mut seen,
                        LemmaCandidate {
                            pos,
                            lemma: Cow::Owned(candidate),
                            source: CandidateSource::Rule {
                                suffix,
                                replacement,
                            },
                        },
                    );
                }
            }
        }

        out
    }
}

fn load_exc(path: &Path) -> Result<ExceptionMap> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file =
        File::open(path).with_context(|| format!("open exception file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut map = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let mut parts = line.split_whitespace();
        let surface = match parts.next() {
            Some(s) => normalize(s),
            None => continue,
        };
        let lemmas: Vec<String> = parts.map(normalize).collect();
        if !lemmas.is_empty() {
            map.insert(surface, lemmas);
        }
    }
    Ok(map)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

fn push_unique<'a>(
    out: &mut Vec<LemmaCandidate<'a>>,
    seen: &mut HashSet<Cow<'a, str>>,
    candidate: LemmaCandidate<'a>,
) {
    if seen.insert(candidate.lemma.clone()) {
        out.push(candidate);
    }
}

/// Candidate stems for one suffix rule, plain stem first.
fn apply_rule(surface: &str, suffix: &str, replacement: &str) -> Vec<String> {
    let Some(stem) = surface.strip_suffix(suffix) else {
        return Vec::new();
    };
    if stem.is_empty() {
        return Vec::new();
    }
    let mut out = vec![format!("{stem}{replacement}")];

    if replacement.is_empty() {
        let mut chars = stem.chars();
        let last = chars.next_back();
        let prev = chars.next_back();
        if let (Some(a), Some(b)) = (last, prev)
            && a == b
        {
            let mut undoubled = stem.to_string();
            undoubled.pop();
            out.push(undoubled);
        }
    }

    out
}

fn rules_for(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("ves", "f"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        Pos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        Pos::Adj => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        Pos::Adv => &[],
    }
}
