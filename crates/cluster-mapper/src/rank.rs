//! Score mappings and selection of the best-scoring senses.

use std::collections::HashMap;
use std::hash::Hash;

/// Sense → score, iterated in first-insertion order.
#[derive(Debug, Clone)]
pub struct ScoreMap<S> {
    entries: Vec<(S, f64)>,
    positions: HashMap<S, usize>,
}

impl<S> Default for ScoreMap<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<S: Eq + Hash + Clone> ScoreMap<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `score` for `sense`. A sense already present keeps its first
    /// position and score, and `false` is returned.
    pub fn insert(&mut self, sense: S, score: f64) -> bool {
        if self.positions.contains_key(&sense) {
            return false;
        }
        self.positions.insert(sense.clone(), self.entries.len());
        self.entries.push((sense, score));
        true
    }

    pub fn get(&self, sense: &S) -> Option<f64> {
        self.positions.get(sense).map(|&idx| self.entries[idx].1)
    }
}

impl<S> ScoreMap<S> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, f64)> + '_ {
        self.entries.iter().map(|(sense, score)| (sense, *score))
    }
}

/// Highest-scoring entry; ties keep the earliest one.
pub fn best<S>(scores: &ScoreMap<S>) -> Option<(&S, f64)> {
    let mut best: Option<(&S, f64)> = None;
    for (sense, score) in scores.iter() {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((sense, score));
        }
    }
    best
}

/// Entries scoring at least the `n`-th largest score, in insertion order.
///
/// Ties at the threshold are all kept, so more than `n` entries may come back.
pub fn top_n<S>(scores: &ScoreMap<S>, n: usize) -> Vec<(&S, f64)> {
    if n == 0 {
        return Vec::new();
    }
    if scores.len() <= n {
        return scores.iter().collect();
    }
    let mut values: Vec<f64> = scores.iter().map(|(_, score)| score).collect();
    values.sort_by(|a, b| b.total_cmp(a));
    let threshold = values[n - 1];
    scores.iter().filter(|(_, score)| *score >= threshold).collect()
}
