//! Reading inputs and writing vocabulary and filtered corpus files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PrepError, Result};
use crate::vocab::Vocabulary;

/// Column name written above the filtered corpus.
pub const DEFAULT_COLUMN: &str = "text";

/// Read a whole input file.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|err| PrepError::io(err, path.to_path_buf()))
}

/// Append `extension` when the path has none, e.g. `data` -> `data.csv`.
pub fn with_default_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(extension)
    }
}

/// `<dir>/<stem>_vocab_<count>_tokens.txt` next to the corpus.
pub fn vocabulary_path(corpus: &Path, count: usize) -> PathBuf {
    sibling_with_suffix(corpus, &format!("_vocab_{count}_tokens.txt"))
}

/// `<dir>/<stem>_prepped_for_tokenizer.csv` next to the dataset.
pub fn prepped_path(dataset: &Path) -> PathBuf {
    sibling_with_suffix(dataset, "_prepped_for_tokenizer.csv")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}"))
}

/// Write newline-separated vocabulary tokens.
pub fn write_vocabulary(path: &Path, vocabulary: &Vocabulary) -> Result<()> {
    info!("saving vocabulary as {}", path.display());
    fs::write(path, vocabulary.to_text()).map_err(|err| PrepError::io(err, path.to_path_buf()))
}

/// Write filtered lines as a single-column CSV with a header row.
pub fn write_filtered(path: &Path, column: &str, lines: &[String]) -> Result<()> {
    info!("saving prepped data as {}", path.display());
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;
    writer.write_record([column])?;
    for line in lines {
        writer.write_record([line])?;
    }
    writer
        .flush()
        .map_err(|err| PrepError::io(err, path.to_path_buf()))
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|err| PrepError::io(err, path.to_path_buf()))
}
