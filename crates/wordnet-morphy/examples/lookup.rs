use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;
use wordnet_types::Pos;

const USAGE: &str =
    "usage: cargo run -p wordnet-morphy --example lookup -- <dict-dir> [--demo | <word>...]";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dict_dir = args.next().map(PathBuf::from).context(USAGE)?;
    let rest: Vec<String> = args.collect();

    let words: Vec<String> = match rest.as_slice() {
        [] => bail!(USAGE),
        [flag] if flag == "--demo" => ["running", "cats", "children", "leaves", "happiest"]
            .into_iter()
            .map(String::from)
            .collect(),
        words => words.to_vec(),
    };

    let wn = WordNet::load_with_mode(&dict_dir, LoadMode::Mmap)
        .with_context(|| format!("loading WordNet from {}", dict_dir.display()))?;
    let morph = Morphy::load(&dict_dir)
        .with_context(|| format!("loading exceptions from {}", dict_dir.display()))?;

    println!("Dictionary: {}", dict_dir.display());

    for word in words {
        println!("\nSurface: {}", word);
        for pos in Pos::ALL {
            let candidates = morph.lemmas_for(pos, &word, |p, lemma| wn.lemma_exists(p, lemma));
            if candidates.is_empty() {
                continue;
            }
            println!("  {}:", pos);
            for cand in candidates {
                println!("    {:<12} [{:?}]", cand.lemma, cand.source);
            }
        }
    }

    Ok(())
}
