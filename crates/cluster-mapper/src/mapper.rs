use serde::Serialize;
use tracing::debug;

use crate::candidates::candidate_senses;
use crate::cluster::Cluster;
use crate::lexicon::Lexicon;
use crate::rank::{ScoreMap, best, top_n};
use crate::score::score;
use crate::token::TagTable;
use crate::tokenize::{SimpleTokenizer, Tokenizer};

/// A selected sense and its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match<S> {
    pub sense: S,
    pub score: f64,
}

/// Maps clusters onto senses of one lexicon.
pub struct ClusterMapper<L, T = SimpleTokenizer> {
    lexicon: L,
    tokenizer: T,
    tags: TagTable,
}

impl<L: Lexicon> ClusterMapper<L> {
    /// Mapper with the default tokenizer and tag table.
    pub fn new(lexicon: L) -> Self {
        Self::with_parts(lexicon, SimpleTokenizer, TagTable::default())
    }
}

impl<L: Lexicon, T: Tokenizer> ClusterMapper<L, T> {
    pub fn with_parts(lexicon: L, tokenizer: T, tags: TagTable) -> Self {
        Self {
            lexicon,
            tokenizer,
            tags,
        }
    }

    pub fn lexicon(&self) -> &L {
        &self.lexicon
    }

    pub fn candidates(&self, cluster: &Cluster) -> Vec<L::Sense> {
        candidate_senses(cluster, &self.lexicon, &self.tags)
    }

    /// Score every distinct candidate once, keeping candidate order.
    pub fn scores(&self, cluster: &Cluster, candidates: &[L::Sense]) -> ScoreMap<L::Sense> {
        let mut scores = ScoreMap::new();
        if candidates.is_empty() {
            debug!(cluster = %cluster, "no candidate senses");
            return scores;
        }
        for sense in candidates {
            if scores.get(sense).is_none() {
                let value = score(cluster, sense, &self.tokenizer);
                scores.insert(sense.clone(), value);
            }
        }
        scores
    }

    /// Best-scoring candidate, or `None` when the lexicon offers nothing.
    pub fn map_single(&self, cluster: &Cluster) -> Option<Match<L::Sense>> {
        let scores = self.scores(cluster, &self.candidates(cluster));
        best(&scores).map(|(sense, score)| Match {
            sense: sense.clone(),
            score,
        })
    }

    /// Candidates scoring within the top `top` scores, ties included.
    pub fn map_multiple(&self, cluster: &Cluster, top: usize) -> Vec<Match<L::Sense>> {
        let scores = self.scores(cluster, &self.candidates(cluster));
        top_n(&scores, top)
            .into_iter()
            .map(|(sense, score)| Match {
                sense: sense.clone(),
                score,
            })
            .collect()
    }
}
