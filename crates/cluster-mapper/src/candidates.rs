//! Candidate sense retrieval for a cluster.
//!
//! Tiers, in order:
//! 1. senses of the head word in its own category;
//! 2. senses of compounds ending in `_<head>` from the category's index
//!    (skipped for proper nouns, which only ever get tier 1);
//! 3. senses of the head word in any category, if 1 and 2 found nothing;
//! 4. senses of every specific word in its own category, if still nothing.
//!
//! A failed lookup counts as an empty result, so later tiers still run.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};
use wordnet_types::Pos;

use crate::cluster::Cluster;
use crate::lexicon::{Lexicon, LookupError};
use crate::token::TagTable;

const USE_MORPHOLOGY: bool = true;

/// Collect the senses worth scoring for `cluster`. Duplicates are kept.
pub fn candidate_senses<L: Lexicon>(
    cluster: &Cluster,
    lexicon: &L,
    tags: &TagTable,
) -> Vec<L::Sense> {
    let head = cluster.head();
    let category = head.category(tags);

    let mut candidates = lookup_or_empty(lexicon, head.word(), category);
    if cluster.is_proper_noun() {
        return candidates;
    }
    match category {
        Some(pos) => candidates.extend(compound_senses(lexicon, head.word(), pos)),
        None => debug!(cluster = %cluster, "no category for head tag, skipping compounds"),
    }

    if candidates.is_empty() {
        candidates = lookup_or_empty(lexicon, head.word(), None);
    }
    if candidates.is_empty() {
        debug!(cluster = %cluster, "head word unknown, falling back to specific words");
        for token in cluster.specific() {
            candidates.extend(lookup_or_empty(lexicon, token.word(), token.category(tags)));
        }
    }
    candidates
}

/// Senses of every compound in `pos`'s index that ends with `_<word>`.
pub fn compound_senses<L: Lexicon>(lexicon: &L, word: &str, pos: Pos) -> Vec<L::Sense> {
    let compounds = match lexicon
        .compound_index_path(pos)
        .and_then(|path| compounds_ending_with(word, &path))
    {
        Ok(compounds) => compounds,
        Err(err) => {
            warn!("compound search for {word:?} failed: {err}");
            return Vec::new();
        }
    };

    compounds
        .iter()
        .flat_map(|compound| lookup_or_empty(lexicon, &compound.replace('_', " "), Some(pos)))
        .collect()
}

/// Headwords in the index at `index_path` ending with `_<word>`, in file order.
///
/// The headword is the first whitespace-delimited field of a line; lines
/// starting with whitespace are header lines.
pub fn compounds_ending_with(word: &str, index_path: &Path) -> Result<Vec<String>, LookupError> {
    let io_err = |source| LookupError::Io {
        path: index_path.to_path_buf(),
        source,
    };
    let file = File::open(index_path).map_err(io_err)?;
    let suffix = format!("_{word}");

    let mut compounds = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(io_err)?;
        if line.starts_with([' ', '\t']) {
            continue;
        }
        if let Some(headword) = line.split_ascii_whitespace().next()
            && headword.ends_with(&suffix)
        {
            compounds.push(headword.to_string());
        }
    }
    Ok(compounds)
}

fn lookup_or_empty<L: Lexicon>(lexicon: &L, word: &str, category: Option<Pos>) -> Vec<L::Sense> {
    match lexicon.lookup(word, category, USE_MORPHOLOGY) {
        Ok(senses) => senses,
        Err(err) => {
            warn!("lookup of {word:?} ({category:?}) failed: {err}");
            Vec::new()
        }
    }
}
