//! Curate a bounded tokenizer vocabulary from a reference corpus and rewrite
//! datasets so every line only holds vocabulary tokens.
//!
//! ```no_run
//! use vocabprep::{
//!     CorpusFilter, FilterConfig, NormalizeConfig, Normalizer, VocabConfig,
//!     VocabularyBuilder, WordNetLemmatizer,
//! };
//! use wordnet_db::LoadMode;
//!
//! # fn main() -> vocabprep::Result<()> {
//! let lemmatizer = WordNetLemmatizer::load("/path/to/wordnet", LoadMode::Mmap)?;
//! let normalizer = Normalizer::new(&lemmatizer, &NormalizeConfig::default());
//!
//! let config = VocabConfig::builder().min_occurrence(2).max_tokens(500).build()?;
//! let build = VocabularyBuilder::new(config, &normalizer)?.build("cats sat\ncat sat\n")?;
//!
//! let filter = CorpusFilter::new(&build.vocabulary, &normalizer, &FilterConfig::new(20)?)?;
//! assert_eq!(filter.filter_line("the cats sat"), "cat sat");
//! # Ok(()) }
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod lemmatizer;
pub mod normalize;
pub mod persist;
pub mod report;
pub mod vocab;

pub use config::{CorpusFormat, FilterConfig, NormalizeConfig, Settings, VocabConfig};
pub use corpus::{Corpus, sanitize_line, split_tokens};
pub use error::{MalformedLine, PrepError, Result};
pub use filter::{CorpusFilter, FilterOutcome, FilterStats};
pub use lemmatizer::{Lemmatize, WordNetLemmatizer};
pub use normalize::Normalizer;
pub use vocab::{BuildStats, Vocabulary, VocabularyBuild, VocabularyBuilder, VocabularyEntry};
