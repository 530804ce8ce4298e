//! Lemma inventory loaded from WordNet `index.*` files.
//!
//! Lemmatization only needs to know whether a candidate form is a real
//! dictionary entry for a given part of speech. This crate reads the four
//! canonical index files (`index.noun`, `index.verb`, `index.adj`,
//! `index.adv`), validates each entry line, and keeps the lemma keys in a hash
//! set. The files themselves can be memory-mapped or read into owned buffers,
//! chosen at runtime via [`LoadMode`]; the buffers are dropped once parsing is
//! done.
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load_with_mode("/path/to/wordnet", LoadMode::Mmap)?;
//! assert!(wn.lemma_exists(Pos::Noun, "dog"));
//! println!("{} lemmas", wn.lemma_count());
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p wordnet-db --example stats -- <dict>`.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use memmap2::Mmap;
use wordnet_types::Pos;

/// Strategy for loading dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each WordNet file (fast, zero-copy).
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

impl FromStr for LoadMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mmap" => Ok(LoadMode::Mmap),
            "owned" => Ok(LoadMode::Owned),
            other => anyhow::bail!("unknown load mode `{other}` (expected mmap or owned)"),
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Set of known `(pos, lemma)` pairs.
///
/// Lemma keys are stored lowercased with spaces folded to underscores, the
/// same shape WordNet uses for collocations (`ice_cream`).
#[derive(Debug, Default, Clone)]
pub struct WordNet {
    lemmas: HashSet<(Pos, String)>,
}

impl WordNet {
    /// Load the lemma inventory from a directory containing `index.*` files.
    ///
    /// Defaults to memory-mapping the source files. Use [`load_with_mode`] to
    /// force owned buffers instead.
    ///
    /// [`load_with_mode`]: WordNet::load_with_mode
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    /// Load the lemma inventory choosing between mmap and owned buffers.
    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        for pos in Pos::ALL {
            let path = dir.join(pos.index_file());
            if !path.exists() {
                anyhow::bail!("missing required WordNet file: {}", path.display());
            }
        }

        let mut lemmas = HashSet::new();
        for pos in Pos::ALL {
            let path = dir.join(pos.index_file());
            let buffer = load_file(&path, mode)?;
            parse_index(buffer.as_slice(), &path, pos, &mut lemmas)?;
        }

        Ok(Self { lemmas })
    }

    /// Build an inventory directly from `(pos, lemma)` pairs.
    pub fn from_lemmas<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Pos, S)>,
        S: AsRef<str>,
    {
        let lemmas = entries
            .into_iter()
            .map(|(pos, lemma)| (pos, normalize_lemma(lemma.as_ref())))
            .collect();
        Self { lemmas }
    }

    /// Check whether a lemma exists for the given POS according to index files.
    pub fn lemma_exists(&self, pos: Pos, lemma: &str) -> bool {
        let key = (pos, normalize_lemma(lemma));
        self.lemmas.contains(&key)
    }

    /// Whether the lemma is known under any part of speech.
    pub fn lemma_exists_any(&self, lemma: &str) -> bool {
        let key = normalize_lemma(lemma);
        Pos::ALL
            .iter()
            .any(|pos| self.lemmas.contains(&(*pos, key.clone())))
    }

    /// Number of `(pos, lemma)` pairs across all parts of speech.
    pub fn lemma_count(&self) -> usize {
        self.lemmas.len()
    }

    /// Number of lemmas recorded for one part of speech.
    pub fn lemma_count_for(&self, pos: Pos) -> usize {
        self.lemmas.iter().filter(|(p, _)| *p == pos).count()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            // Empty files cannot be mapped on every platform.
            if file.metadata().map(|m| m.len() == 0).unwrap_or(false) {
                return Ok(Buffer::Owned(Vec::new()));
            }
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

/// Parse one `index.*` file.
///
/// Entry lines look like `lemma pos synset_cnt p_cnt [ptr_symbol...]
/// sense_cnt tagsense_cnt synset_offset...`. Lines starting with whitespace
/// are the license preamble and are skipped.
fn parse_index(
    bytes: &[u8],
    path: &Path,
    pos: Pos,
    lemmas: &mut HashSet<(Pos, String)>,
) -> Result<()> {
    let file = display_name(path);
    for (lineno, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = strip_cr(raw_line);
        if line.is_empty() || matches!(line.first(), Some(b' ' | b'\t')) {
            continue;
        }
        let line_str = std::str::from_utf8(line)
            .with_context(|| format!("{}:{} is not valid utf8", file, lineno + 1))?;
        let tokens: Vec<&str> = line_str.split_ascii_whitespace().collect();
        if tokens.len() < 6 {
            anyhow::bail!("{}:{} malformed index line (too few tokens)", file, lineno + 1);
        }

        let line_pos = tokens[1].chars().next().and_then(Pos::from_char);
        if line_pos != Some(pos) {
            anyhow::bail!(
                "{}:{} part of speech `{}` does not match file",
                file,
                lineno + 1,
                tokens[1]
            );
        }

        let synset_cnt: usize = tokens[2]
            .parse()
            .with_context(|| format!("{}:{} synset_cnt", file, lineno + 1))?;
        let p_cnt: usize = tokens[3]
            .parse()
            .with_context(|| format!("{}:{} p_cnt", file, lineno + 1))?;
        let expected = 4 + p_cnt + 2 + synset_cnt;
        if tokens.len() != expected {
            anyhow::bail!(
                "{}:{} expected {} fields, got {}",
                file,
                lineno + 1,
                expected,
                tokens.len()
            );
        }

        lemmas.insert((pos, normalize_lemma(tokens[0])));
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn normalize_lemma(text: &str) -> String {
    let mut s = text.trim().to_string();
    s.make_ascii_lowercase();
    s.replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_and_skips_preamble() {
        let bytes = b"  1 This software and database is being provided\n\
dog n 1 1 @ 1 1 01740\r\n\
ice_cream n 1 0 1 0 07611358\n";
        let mut lemmas = HashSet::new();
        parse_index(bytes, Path::new("index.noun"), Pos::Noun, &mut lemmas).unwrap();
        assert_eq!(lemmas.len(), 2);
        assert!(lemmas.contains(&(Pos::Noun, "dog".to_string())));
        assert!(lemmas.contains(&(Pos::Noun, "ice_cream".to_string())));
    }

    #[test]
    fn rejects_mismatched_counts() {
        let mut lemmas = HashSet::new();
        let err = parse_index(
            b"dog n 2 0 1 1 01740\n",
            Path::new("index.noun"),
            Pos::Noun,
            &mut lemmas,
        )
        .unwrap_err();
        assert!(err.to_string().contains("index.noun:1"));
    }

    #[test]
    fn rejects_wrong_part_of_speech() {
        let mut lemmas = HashSet::new();
        assert!(
            parse_index(
                b"run v 1 0 1 1 01926311\n",
                Path::new("index.noun"),
                Pos::Noun,
                &mut lemmas
            )
            .is_err()
        );
    }

    #[test]
    fn lookups_fold_case_and_spaces() {
        let wn = WordNet::from_lemmas([(Pos::Noun, "Ice Cream"), (Pos::Verb, "run")]);
        assert!(wn.lemma_exists(Pos::Noun, "ice cream"));
        assert!(wn.lemma_exists(Pos::Noun, "ICE_CREAM"));
        assert!(!wn.lemma_exists(Pos::Noun, "run"));
        assert!(wn.lemma_exists_any("run"));
        assert_eq!(wn.lemma_count_for(Pos::Verb), 1);
    }

    #[test]
    fn parses_load_modes() {
        assert_eq!("MMAP".parse::<LoadMode>().unwrap(), LoadMode::Mmap);
        assert_eq!("owned".parse::<LoadMode>().unwrap(), LoadMode::Owned);
        assert!("disk".parse::<LoadMode>().is_err());
    }
}
