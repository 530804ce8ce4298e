use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use wordnet_db::{LoadMode, WordNet};
use wordnet_types::Pos;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dict_dir = args
        .next()
        .map(PathBuf::from)
        .context("usage: cargo run -p wordnet-db --example stats -- <path-to-wordnet-dir> [mmap|owned]")?;
    let mode = match args.next() {
        Some(raw) => raw.parse()?,
        None => LoadMode::Mmap,
    };

    let wn = WordNet::load_with_mode(&dict_dir, mode)
        .with_context(|| format!("loading WordNet from {}", dict_dir.display()))?;

    println!("Dictionary: {} ({:?})", dict_dir.display(), mode);
    println!("Lemma keys: {}", wn.lemma_count());
    for pos in Pos::ALL {
        println!("  {:<5}: {}", pos.file_suffix(), wn.lemma_count_for(pos));
    }

    for (pos, lemma) in [(Pos::Noun, "dog"), (Pos::Verb, "run"), (Pos::Noun, "running")] {
        println!(
            "Lemma '{}' ({}) exists? {}",
            lemma,
            pos,
            wn.lemma_exists(pos, lemma)
        );
    }

    Ok(())
}
