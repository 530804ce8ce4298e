//! Part-of-speech vocabulary shared by the WordNet lexicon and morphology crates.
//!
//! WordNet splits its dictionary by part of speech: `index.noun`,
//! `verb.exc`, and so on. [`Pos`] names those four partitions, converts to and
//! from the single-character markers used inside the files, and knows the file
//! names each partition lives in.
//!
//! ```rust
//! use wordnet_types::Pos;
//!
//! let pos: Pos = "verb".parse().unwrap();
//! assert_eq!(pos, Pos::Verb);
//! assert_eq!(pos.index_file(), "index.verb");
//! assert_eq!(Pos::from_char('s'), Some(Pos::Adj));
//! ```

use std::fmt;
use std::str::FromStr;

/// Part-of-speech marker as used by WordNet files (`n`, `v`, `a`/`s`, `r`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    /// Every part of speech in WordNet's conventional lookup order.
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a WordNet POS character into an enum.
    ///
    /// Adjective satellites (`s`) fold into [`Pos::Adj`].
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Emit the POS character used in `index.*` lines.
    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Suffix WordNet uses for this partition's files.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }

    /// Name of the lemma index file, e.g. `index.noun`.
    pub fn index_file(self) -> String {
        format!("index.{}", self.file_suffix())
    }

    /// Name of the morphy exception list, e.g. `noun.exc`.
    pub fn exception_file(self) -> String {
        format!("{}.exc", self.file_suffix())
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// Error returned when a string does not name a part of speech.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsePosError(String);

impl fmt::Display for ParsePosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown part of speech `{}` (expected noun, verb, adj, adv or n, v, a, r)",
            self.0
        )
    }
}

impl std::error::Error for ParsePosError {}

impl FromStr for Pos {
    type Err = ParsePosError;

    /// Accepts long names (`noun`) and file markers (`n`), case-insensitively.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "noun" => Ok(Pos::Noun),
            "verb" => Ok(Pos::Verb),
            "adj" | "adjective" => Ok(Pos::Adj),
            "adv" | "adverb" => Ok(Pos::Adv),
            _ => {
                let mut chars = lowered.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Pos::from_char(c).ok_or_else(|| ParsePosError(raw.into())),
                    _ => Err(ParsePosError(raw.into())),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_file_markers() {
        for pos in Pos::ALL {
            assert_eq!(Pos::from_char(pos.to_char()), Some(pos));
        }
        assert_eq!(Pos::from_char('s'), Some(Pos::Adj));
        assert_eq!(Pos::from_char('x'), None);
    }

    #[test]
    fn names_partition_files() {
        assert_eq!(Pos::Noun.index_file(), "index.noun");
        assert_eq!(Pos::Adv.exception_file(), "adv.exc");
        assert_eq!(Pos::Adj.to_string(), "adj");
    }

    #[test]
    fn parses_names_and_markers() {
        assert_eq!("Noun".parse::<Pos>(), Ok(Pos::Noun));
        assert_eq!("v".parse::<Pos>(), Ok(Pos::Verb));
        assert_eq!(" adverb ".parse::<Pos>(), Ok(Pos::Adv));
        assert!("nv".parse::<Pos>().is_err());
        assert!("".parse::<Pos>().is_err());
    }
}
