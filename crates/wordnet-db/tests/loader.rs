use std::path::PathBuf;

use wordnet_db::{LoadMode, WordNet};
use wordnet_types::Pos;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("wn")
}

#[test]
fn loads_every_partition() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    assert_eq!(wn.lemma_count_for(Pos::Noun), 3);
    assert_eq!(wn.lemma_count_for(Pos::Verb), 2);
    assert_eq!(wn.lemma_count_for(Pos::Adj), 2);
    assert_eq!(wn.lemma_count_for(Pos::Adv), 1);
    assert_eq!(wn.lemma_count(), 8);
}

#[test]
fn mmap_and_owned_agree() {
    let mapped = WordNet::load_with_mode(fixture_dir(), LoadMode::Mmap).expect("mmap load");
    let owned = WordNet::load_with_mode(fixture_dir(), LoadMode::Owned).expect("owned load");
    assert_eq!(mapped.lemma_count(), owned.lemma_count());
    for (pos, lemma) in [(Pos::Noun, "dog"), (Pos::Verb, "sit"), (Pos::Adj, "good")] {
        assert!(mapped.lemma_exists(pos, lemma));
        assert!(owned.lemma_exists(pos, lemma));
    }
}

#[test]
fn answers_lookups_per_part_of_speech() {
    let wn = WordNet::load(fixture_dir()).expect("load fixtures");
    assert!(wn.lemma_exists(Pos::Noun, "cat"));
    assert!(!wn.lemma_exists(Pos::Verb, "cat"));
    assert!(wn.lemma_exists(Pos::Noun, "ice cream"));
    assert!(wn.lemma_exists(Pos::Adv, "fast"));
    assert!(!wn.lemma_exists_any("cats"));
}

#[test]
fn missing_index_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("index.noun"), "dog n 1 0 1 0 02084071\n").unwrap();
    let err = WordNet::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("missing required WordNet file"));
}
