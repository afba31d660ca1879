//! Lexical-overlap scoring between a cluster and one candidate sense.

use std::collections::HashSet;

use serde::Serialize;
use tracing::trace;

use crate::cluster::Cluster;
use crate::lexicon::Sense;
use crate::token::Token;
use crate::tokenize::Tokenizer;

/// The four overlap signals and the weighted score built from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub head_in_sense: f64,
    pub specifics_in_sense: f64,
    pub specifics_in_definition: f64,
    pub specifics_in_examples: f64,
    pub score: f64,
}

/// Jaccard coefficient of two token collections, compared as sets.
///
/// Two empty inputs score `0.0`.
pub fn jaccard<'a>(
    a: impl IntoIterator<Item = &'a str>,
    b: impl IntoIterator<Item = &'a str>,
) -> f64 {
    let a: HashSet<&str> = a.into_iter().collect();
    let b: HashSet<&str> = b.into_iter().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Tokens of every word form, followed by each word form with its spaces removed.
///
/// `air base` contributes `air`, `base` and `airbase`.
pub fn sense_vocabulary<S: Sense, T: Tokenizer + ?Sized>(sense: &S, tokenizer: &T) -> Vec<String> {
    let forms = sense.word_forms();
    let mut vocabulary: Vec<String> = forms
        .iter()
        .flat_map(|form| tokenizer.tokenize(form))
        .map(str::to_string)
        .collect();
    vocabulary.extend(forms.iter().map(|form| form.replace(' ', "")));
    vocabulary
}

/// Score `sense` for `cluster`.
///
/// With `k` specific words, the head signal has weight 1 and each specific
/// signal weight `k`, normalized by `1 + 3k`; `k = 0` leaves the head signal.
pub fn score_breakdown<S: Sense, T: Tokenizer + ?Sized>(
    cluster: &Cluster,
    sense: &S,
    tokenizer: &T,
) -> ScoreBreakdown {
    let vocabulary = sense_vocabulary(sense, tokenizer);
    let vocabulary = || vocabulary.iter().map(String::as_str);
    let specifics: Vec<&str> = cluster.specific().iter().map(Token::word).collect();
    let definition = tokenizer.tokenize(sense.definition());
    let examples: Vec<&str> = sense
        .usage_examples()
        .iter()
        .flat_map(|example| tokenizer.tokenize(example))
        .collect();

    let head_in_sense = jaccard([cluster.head().word()], vocabulary());
    let specifics_in_sense = jaccard(specifics.iter().copied(), vocabulary());
    let specifics_in_definition = jaccard(specifics.iter().copied(), definition);
    let specifics_in_examples = jaccard(specifics.iter().copied(), examples);

    let k = specifics.len() as f64;
    let score = (head_in_sense
        + (specifics_in_sense + specifics_in_definition + specifics_in_examples) * k)
        / (1.0 + 3.0 * k);

    ScoreBreakdown {
        head_in_sense,
        specifics_in_sense,
        specifics_in_definition,
        specifics_in_examples,
        score,
    }
}

/// Combined overlap score of `sense` for `cluster`, in `[0, 1]`.
pub fn score<S: Sense, T: Tokenizer + ?Sized>(cluster: &Cluster, sense: &S, tokenizer: &T) -> f64 {
    let breakdown = score_breakdown(cluster, sense, tokenizer);
    trace!(
        cluster = %cluster,
        word_forms = ?sense.word_forms(),
        "scores {:.4}, {:.4}, {:.4}, {:.4} (acc: {:.4})",
        breakdown.head_in_sense,
        breakdown.specifics_in_sense,
        breakdown.specifics_in_definition,
        breakdown.specifics_in_examples,
        breakdown.score
    );
    breakdown.score
}

/// Share of the head word and specific words that are literally word forms of `sense`.
///
/// No tokenization; each occurrence of a repeated specific word counts.
pub fn literal_overlap<S: Sense>(cluster: &Cluster, sense: &S) -> f64 {
    let forms = sense.word_forms();
    let is_form = |word: &str| forms.iter().any(|form| form == word);
    let hits = usize::from(is_form(cluster.head().word()))
        + cluster
            .specific()
            .iter()
            .filter(|token| is_form(token.word()))
            .count();
    hits as f64 / (cluster.specific().len() + 1) as f64
}
