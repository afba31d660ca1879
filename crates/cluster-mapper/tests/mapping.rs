use std::io::Write;
use std::path::PathBuf;

use cluster_mapper::{
    CachedLexicon, Cluster, ClusterMapper, Lexicon, ReadOptions, Sense, WordNetLexicon,
    WordNetMapper, read_cluster_file,
};
use wordnet_db::LoadMode;
use wordnet_types::Pos;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("wordnet-db")
        .join("tests")
        .join("fixtures")
        .join("wn")
}

fn mapper() -> WordNetMapper {
    let lexicon = WordNetLexicon::load(fixture_dir(), LoadMode::Owned).expect("load fixtures");
    ClusterMapper::new(CachedLexicon::new(lexicon))
}

fn best_synset(mapper: &WordNetMapper, line: &str) -> Option<String> {
    let cluster = Cluster::parse(line).expect("valid cluster");
    mapper
        .map_single(&cluster)
        .map(|found| found.sense.id().to_string())
}

#[test]
fn lookup_applies_morphology() {
    let lexicon = WordNetLexicon::load(fixture_dir(), LoadMode::Mmap).expect("load fixtures");
    let ids = |word: &str, pos: Option<Pos>| -> Vec<String> {
        lexicon
            .lookup(word, pos, true)
            .unwrap()
            .iter()
            .map(|sense| sense.id().to_string())
            .collect()
    };
    assert_eq!(ids("player", Some(Pos::Noun)), vec!["n00000100", "n00000200", "n00000300"]);
    assert_eq!(ids("children", Some(Pos::Noun)), vec!["n00001200"]);
    assert_eq!(ids("balls", Some(Pos::Noun)), vec!["n00001100"]);
    assert_eq!(ids("ran", Some(Pos::Verb)), vec!["v00002100"]);
    assert_eq!(ids("air base", Some(Pos::Noun)), vec!["n00000400"]);
    assert_eq!(ids("play", None), vec!["v00002000"]);
    assert!(ids("children", None).contains(&"n00001200".to_string()));

    let raw: Vec<_> = lexicon.lookup("children", Some(Pos::Noun), false).unwrap();
    assert!(raw.is_empty());
}

#[test]
fn senses_expose_readable_word_forms() {
    let lexicon = WordNetLexicon::load(fixture_dir(), LoadMode::Owned).expect("load fixtures");
    let paris = lexicon.lookup("Paris", Some(Pos::Noun), true).unwrap();
    assert_eq!(paris[0].word_forms(), ["Paris", "City of Light"]);
    assert_eq!(paris[0].definition(), "the capital and largest city of France");
    assert_eq!(paris[0].usage_examples(), ["Paris is the capital of France"]);

    let galore = lexicon.lookup("galore", Some(Pos::Adj), true).unwrap();
    assert_eq!(galore[0].word_forms(), ["galore"]);
}

#[test]
fn compound_index_is_the_pos_index_file() {
    let lexicon = WordNetLexicon::load(fixture_dir(), LoadMode::Owned).expect("load fixtures");
    let path = lexicon.compound_index_path(Pos::Noun).unwrap();
    assert!(path.ends_with("index.noun"));

    let compounds = cluster_mapper::candidates::compounds_ending_with("base", &path).unwrap();
    assert_eq!(compounds, vec!["air_base", "home_base"]);
}

#[test]
fn maps_player_cluster_to_theatrical_sense() {
    let mapper = mapper();
    assert_eq!(
        best_synset(&mapper, "player#NN\t0\tactor#NN, thespian#NN, performer#NN").as_deref(),
        Some("n00000300")
    );
    assert_eq!(
        best_synset(&mapper, "player#NN\t1\tmusician#NN, instrument#NN, profession#NN").as_deref(),
        Some("n00000200")
    );
}

#[test]
fn compounds_of_the_head_compete() {
    let mapper = mapper();
    let cluster = Cluster::parse("base#NN\t0\tairfield#NN, aircraft#NN, military#JJ").unwrap();

    let candidates: Vec<String> = mapper
        .candidates(&cluster)
        .iter()
        .map(|sense| sense.id().to_string())
        .collect();
    assert_eq!(candidates, vec!["n00000500", "n00000400", "n00000600"]);

    let best = mapper.map_single(&cluster).unwrap();
    assert_eq!(best.sense.id().to_string(), "n00000400");
    assert!((best.score - 0.12).abs() < 1e-9);

    let top: Vec<String> = mapper
        .map_multiple(&cluster, 2)
        .iter()
        .map(|found| found.sense.id().to_string())
        .collect();
    assert_eq!(top, vec!["n00000500", "n00000400"]);
}

#[test]
fn numbers_and_proper_nouns_map_by_head() {
    let mapper = mapper();
    assert_eq!(
        best_synset(&mapper, "70#CD\t0\t80#CD, 60#CD, percent#NN").as_deref(),
        Some("n00000700")
    );
    assert_eq!(
        best_synset(&mapper, "Paris#NP\t0\tLondon#NP, Rome#NP").as_deref(),
        Some("n00001000")
    );
}

#[test]
fn falls_back_through_candidate_tiers() {
    let mapper = mapper();
    // No noun "play": any category.
    assert_eq!(
        best_synset(&mapper, "play#NN\t0\tgame#NN, hockey#NN").as_deref(),
        Some("v00002000")
    );
    // Unknown head: the specific words' own senses.
    assert_eq!(
        best_synset(&mapper, "gizmotron#NN\t0\tdevice#NN, gadget#NN").as_deref(),
        Some("n00000800")
    );
    assert_eq!(best_synset(&mapper, "zyzzyva#NN\t0\tqwxz#NN"), None);
}

#[test]
fn inflected_heads_reach_their_base_form() {
    let mapper = mapper();
    assert_eq!(
        best_synset(&mapper, "children#NNS\t0\tkid#NN, adult#NN").as_deref(),
        Some("n00001200")
    );
    assert_eq!(
        best_synset(&mapper, "balls#NNS\t0\tbat#NN").as_deref(),
        Some("n00001100")
    );
}

#[test]
fn maps_a_cluster_file_window() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "70#CD\t0\t80#CD").unwrap();
    writeln!(file, "player#NN\t1\tactor#NN, thespian#NN").unwrap();
    writeln!(file, "not a cluster").unwrap();
    writeln!(file, "children#NNS\t2\tkid#NN").unwrap();
    writeln!(file, "base#NN\t3\taircraft#NN").unwrap();

    let clusters = read_cluster_file(
        file.path(),
        ReadOptions {
            start_line: 1,
            end_line: Some(3),
            max_clusters: None,
        },
    )
    .unwrap();
    let mapper = mapper();
    let mapped: Vec<(u32, String)> = clusters
        .iter()
        .filter_map(|cluster| {
            mapper
                .map_single(cluster)
                .map(|found| (cluster.id(), found.sense.id().to_string()))
        })
        .collect();
    assert_eq!(
        mapped,
        vec![(1, "n00000300".to_string()), (2, "n00001200".to_string())]
    );
    assert!(mapper.lexicon().cached_entries() > 0);
}
