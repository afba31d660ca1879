//! WordNet-style morphological processing (morphy).
//!
//! Reduces inflected surface forms to base forms that exist in the
//! dictionary: check the surface form, then the exception lists, then the
//! POS suffix rules, and finally collocations part by part. Candidates are
//! verified through a caller-provided lemma existence predicate, so the crate
//! stays decoupled from any particular loader.
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_morphy::Morphy;
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = "/usr/share/wordnet";
//! let wn = WordNet::load_with_mode(dict, LoadMode::Mmap)?;
//! let morph = Morphy::load(dict)?;
//! let exists = |pos, lemma: &str| wn.lemma_exists(pos, lemma);
//!
//! for cand in morph.lemmas_for(Pos::Noun, "air bases", exists) {
//!     println!("{:?}: {}", cand.source, cand.lemma);
//! }
//! # Ok(()) }
//! ```

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wordnet_types::Pos;

/// Where a candidate lemma originated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CandidateSource {
    Surface,
    Exception,
    Rule {
        suffix: &'static str,
        replacement: &'static str,
    },
    /// Each part of a multiword expression was reduced on its own.
    Collocation,
}

/// A lemma candidate paired with its POS and provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LemmaCandidate<'a> {
    pub pos: Pos,
    pub lemma: Cow<'a, str>,
    pub source: CandidateSource,
}

/// Morphy implementation parameterised by caller-provided existence checks.
#[derive(Debug, Default)]
pub struct Morphy {
    exceptions: HashMap<Pos, HashMap<String, Vec<String>>>,
}

impl Morphy {
    /// Load morphy exception lists (`*.exc`) from a WordNet dict directory.
    ///
    /// Files are optional; missing ones are treated as empty.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let mut exceptions = HashMap::new();
        for pos in Pos::ALL {
            let path = dir.join(format!("{}.exc", pos.file_suffix()));
            exceptions.insert(pos, load_exc(path)?);
        }
        Ok(Self { exceptions })
    }

    /// Build from in-memory exception pairs (`surface`, `lemma`).
    pub fn with_exceptions<'e>(pairs: impl IntoIterator<Item = (Pos, &'e str, &'e str)>) -> Self {
        let mut exceptions: HashMap<Pos, HashMap<String, Vec<String>>> = HashMap::new();
        for (pos, surface, lemma) in pairs {
            exceptions
                .entry(pos)
                .or_default()
                .entry(normalize(surface))
                .or_default()
                .push(normalize(lemma));
        }
        Self { exceptions }
    }

    /// Generate lemmas for a surface form, returning enriched provenance.
    ///
    /// The callback `lemma_exists` typically delegates to `WordNet::lemma_exists`
    /// so this crate stays ignorant of any concrete database layout. Lemmas are
    /// returned in `_`-joined form.
    pub fn lemmas_for<'a, F>(
        &'a self,
        pos: Pos,
        surface: &str,
        lemma_exists: F,
    ) -> Vec<LemmaCandidate<'a>>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let mut seen: HashSet<Cow<'a, str>> = HashSet::new();
        let mut out: Vec<LemmaCandidate<'a>> = Vec::new();
        let norm_surface = normalize(surface);

        if lemma_exists(pos, &norm_surface) {
            push_unique(
                &mut out,
                &mut seen,
                LemmaCandidate {
                    pos,
                    lemma: Cow::Owned(norm_surface.clone()),
                    source: CandidateSource::Surface,
                },
            );
        }

        for lemma in self.exceptions_for(pos, &norm_surface) {
            if lemma_exists(pos, lemma) {
                push_unique(
                    &mut out,
                    &mut seen,
                    LemmaCandidate {
                        pos,
                        lemma: Cow::Borrowed(lemma.as_str()),
                        source: CandidateSource::Exception,
                    },
                );
            }
        }

        for &(suffix, replacement) in rules_for(pos) {
            for candidate in apply_rule(&norm_surface, suffix, replacement) {
                if lemma_exists(pos, &candidate) {
                    push_unique(
                        &mut out,
                        &mut seen,
                        LemmaCandidate {
                            pos,
                            lemma: Cow::Owned(candidate),
                            source: CandidateSource::Rule {
                                suffix,
                                replacement,
                            },
                        },
                    );
                }
            }
        }

        if norm_surface.contains('_') {
            let joined = norm_surface
                .split('_')
                .map(|part| self.first_base(pos, part, &lemma_exists))
                .collect::<Vec<_>>()
                .join("_");
            if joined != norm_surface && lemma_exists(pos, &joined) {
                push_unique(
                    &mut out,
                    &mut seen,
                    LemmaCandidate {
                        pos,
                        lemma: Cow::Owned(joined),
                        source: CandidateSource::Collocation,
                    },
                );
            }
        }

        out
    }

    fn exceptions_for(&self, pos: Pos, surface: &str) -> &[String] {
        self.exceptions
            .get(&pos)
            .and_then(|map| map.get(surface))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First existing base form of a single word, or the word itself.
    fn first_base<'w, F>(&'w self, pos: Pos, word: &'w str, lemma_exists: &F) -> Cow<'w, str>
    where
        F: Fn(Pos, &str) -> bool,
    {
        if let Some(lemma) = self
            .exceptions_for(pos, word)
            .iter()
            .find(|lemma| lemma_exists(pos, lemma))
        {
            return Cow::Borrowed(lemma.as_str());
        }
        rules_for(pos)
            .iter()
            .flat_map(|&(suffix, replacement)| apply_rule(word, suffix, replacement))
            .find(|candidate| lemma_exists(pos, candidate))
            .map(Cow::Owned)
            .unwrap_or(Cow::Borrowed(word))
    }
}

fn load_exc(path: PathBuf) -> Result<HashMap<String, Vec<String>>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file =
        File::open(&path).with_context(|| format!("open exception file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut map = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let mut parts = line.split_whitespace();
        let surface = match parts.next() {
            Some(s) => normalize(s),
            None => continue,
        };
        let lemmas: Vec<String> = parts.map(normalize).collect();
        if !lemmas.is_empty() {
            map.insert(surface, lemmas);
        }
    }
    Ok(map)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

fn push_unique<'a>(
    out: &mut Vec<LemmaCandidate<'a>>,
    seen: &mut HashSet<Cow<'a, str>>,
    candidate: LemmaCandidate<'a>,
) {
    if seen.insert(candidate.lemma.clone()) {
        out.push(candidate);
    }
}

/// Strip `suffix` and append `replacement`.
///
/// When the suffix is simply deleted and the stem ends in a doubled letter,
/// both the stem and the stem with the double collapsed are offered
/// (`running` -> `runn`, `run`; `balls` -> `ball`, `bal`).
fn apply_rule(surface: &str, suffix: &str, replacement: &str) -> Vec<String> {
    let Some(stem) = surface.strip_suffix(suffix) else {
        return Vec::new();
    };
    if stem.is_empty() {
        return Vec::new();
    }
    if !replacement.is_empty() {
        return vec![format!("{stem}{replacement}")];
    }

    let mut out = vec![stem.to_string()];
    let mut chars = stem.chars();
    if let (Some(last), Some(prev)) = (chars.next_back(), chars.next_back())
        && last == prev
    {
        let mut collapsed = stem.to_string();
        collapsed.pop();
        out.push(collapsed);
    }
    out
}

fn rules_for(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        Pos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        Pos::Adj | Pos::Adv => &[("er", ""), ("er", "e"), ("est", ""), ("est", "e")],
    }
}
