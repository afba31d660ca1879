//! Lexicon capabilities consumed by candidate selection and scoring, plus the
//! WordNet-backed implementation and a read-through cache.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use thiserror::Error;
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;
use wordnet_types::{Pos, Synset, SynsetId, display_lemma};

/// Read-only view of one sense in a lexical database.
pub trait Sense {
    fn word_forms(&self) -> &[String];
    fn definition(&self) -> &str;
    fn usage_examples(&self) -> &[String];
}

/// Sense lookup by word and (optional) category.
pub trait Lexicon {
    type Sense: Sense + Clone + Eq + Hash;

    /// Senses for `word`; `None` searches every category.
    fn lookup(
        &self,
        word: &str,
        category: Option<Pos>,
        use_morphology: bool,
    ) -> Result<Vec<Self::Sense>, LookupError>;

    /// Line-oriented index whose first field on each line is an
    /// underscore-joined headword of `category`.
    fn compound_index_path(&self, category: Pos) -> Result<PathBuf, LookupError>;
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("compound index for {pos} not found at {}", path.display())]
    MissingIndex { pos: Pos, path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lexicon lookup failed: {0}")]
    Backend(String),
}

/// Owned copy of a WordNet synset. Equality and hashing use the synset id.
#[derive(Debug, Clone)]
pub struct WordNetSense {
    id: SynsetId,
    word_forms: Vec<String>,
    definition: String,
    examples: Vec<String>,
}

impl WordNetSense {
    pub fn id(&self) -> SynsetId {
        self.id
    }
}

impl From<Synset<'_>> for WordNetSense {
    fn from(synset: Synset<'_>) -> Self {
        Self {
            id: synset.id,
            word_forms: synset.words.iter().map(|w| display_lemma(w)).collect(),
            definition: synset.gloss.definition.to_string(),
            examples: synset.gloss.examples.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl PartialEq for WordNetSense {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WordNetSense {}

impl Hash for WordNetSense {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Sense for WordNetSense {
    fn word_forms(&self) -> &[String] {
        &self.word_forms
    }

    fn definition(&self) -> &str {
        &self.definition
    }

    fn usage_examples(&self) -> &[String] {
        &self.examples
    }
}

impl fmt::Display for WordNetSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {}",
            self.id,
            self.word_forms.join(", "),
            self.definition
        )
    }
}

/// WordNet dictionary plus morphy base-form reduction.
pub struct WordNetLexicon {
    wordnet: WordNet,
    morphy: Morphy,
}

impl WordNetLexicon {
    pub fn new(wordnet: WordNet, morphy: Morphy) -> Self {
        Self { wordnet, morphy }
    }

    /// Load the dictionary and its exception lists from `dict_dir`.
    pub fn load(dict_dir: impl AsRef<Path>, mode: LoadMode) -> anyhow::Result<Self> {
        let dir = dict_dir.as_ref();
        Ok(Self::new(
            WordNet::load_with_mode(dir, mode)?,
            Morphy::load(dir)?,
        ))
    }

    pub fn wordnet(&self) -> &WordNet {
        &self.wordnet
    }

    fn lemmas(&self, pos: Pos, word: &str, use_morphology: bool) -> Vec<String> {
        if !use_morphology {
            return vec![word.to_string()];
        }
        self.morphy
            .lemmas_for(pos, word, |p, lemma| self.wordnet.lemma_exists(p, lemma))
            .into_iter()
            .map(|candidate| candidate.lemma.into_owned())
            .collect()
    }
}

impl Lexicon for WordNetLexicon {
    type Sense = WordNetSense;

    fn lookup(
        &self,
        word: &str,
        category: Option<Pos>,
        use_morphology: bool,
    ) -> Result<Vec<WordNetSense>, LookupError> {
        let single;
        let categories: &[Pos] = match category {
            Some(pos) => {
                single = [pos];
                &single
            }
            None => &Pos::ALL,
        };

        let mut seen = HashSet::new();
        let mut senses = Vec::new();
        for &pos in categories {
            for lemma in self.lemmas(pos, word, use_morphology) {
                for id in self.wordnet.synsets_for_lemma(pos, &lemma) {
                    if !seen.insert(*id) {
                        continue;
                    }
                    let synset = self.wordnet.get_synset(*id).ok_or_else(|| {
                        LookupError::Backend(format!("index points at unknown synset {id}"))
                    })?;
                    senses.push(WordNetSense::from(synset));
                }
            }
        }
        Ok(senses)
    }

    fn compound_index_path(&self, category: Pos) -> Result<PathBuf, LookupError> {
        let path = self.wordnet.index_path(category);
        if !path.exists() {
            return Err(LookupError::MissingIndex {
                pos: category,
                path,
            });
        }
        Ok(path)
    }
}

/// Entries kept by [`CachedLexicon::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 50_000;

type CacheKey = (String, Option<Pos>, bool);

/// Memoizes `lookup` results per `(word, category, morphology)`.
///
/// Holds at most `capacity` entries; a full cache evicts an arbitrary entry
/// before inserting. Failed lookups are not cached.
pub struct CachedLexicon<L: Lexicon> {
    inner: L,
    cache: DashMap<CacheKey, Vec<L::Sense>>,
    capacity: usize,
}

impl<L: Lexicon> CachedLexicon<L> {
    pub fn new(inner: L) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    /// `capacity == 0` disables caching.
    pub fn with_capacity(inner: L, capacity: usize) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    fn make_room(&self) {
        while self.cache.len() >= self.capacity {
            // The shard guard must be released before `remove`.
            let victim = self.cache.iter().next().map(|entry| entry.key().clone());
            match victim {
                Some(key) => {
                    self.cache.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl<L: Lexicon> Lexicon for CachedLexicon<L> {
    type Sense = L::Sense;

    fn lookup(
        &self,
        word: &str,
        category: Option<Pos>,
        use_morphology: bool,
    ) -> Result<Vec<L::Sense>, LookupError> {
        let key = (word.to_string(), category, use_morphology);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.value().clone());
        }
        let senses = self.inner.lookup(word, category, use_morphology)?;
        if self.capacity > 0 {
            self.make_room();
            self.cache.insert(key, senses.clone());
        }
        Ok(senses)
    }

    fn compound_index_path(&self, category: Pos) -> Result<PathBuf, LookupError> {
        self.inner.compound_index_path(category)
    }
}
