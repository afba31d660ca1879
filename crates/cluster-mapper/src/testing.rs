//! In-memory lexicon for unit tests.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use wordnet_types::Pos;

use crate::lexicon::{Lexicon, LookupError, Sense};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FakeSense {
    id: String,
    word_forms: Vec<String>,
    definition: String,
    examples: Vec<String>,
}

impl FakeSense {
    pub fn new(id: &str, word_forms: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            word_forms: word_forms.iter().map(|w| w.to_string()).collect(),
            definition: String::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_definition(mut self, text: &str) -> Self {
        self.definition = text.to_string();
        self
    }

    pub fn with_examples(mut self, texts: &[&str]) -> Self {
        self.examples = texts.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Sense for FakeSense {
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

/// Answers lookups whose `(word, category)` pair was registered verbatim.
#[derive(Default)]
pub struct FakeLexicon {
    senses: Vec<(String, Option<Pos>, FakeSense)>,
    failing: HashSet<String>,
    indexes: HashMap<Pos, PathBuf>,
    index_requests: Cell<usize>,
}

impl FakeLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sense(mut self, word: &str, category: Option<Pos>, sense: FakeSense) -> Self {
        self.senses.push((word.to_string(), category, sense));
        self
    }

    pub fn failing(mut self, word: &str) -> Self {
        self.failing.insert(word.to_string());
        self
    }

    pub fn with_index(mut self, pos: Pos, path: &Path) -> Self {
        self.indexes.insert(pos, path.to_path_buf());
        self
    }

    pub fn index_requests(&self) -> usize {
        self.index_requests.get()
    }
}

impl Lexicon for FakeLexicon {
    type Sense = FakeSense;

    fn lookup(
        &self,
        word: &str,
        category: Option<Pos>,
        _use_morphology: bool,
    ) -> Result<Vec<FakeSense>, LookupError> {
        if self.failing.contains(word) {
            return Err(LookupError::Backend(format!("{word} unavailable")));
        }
        Ok(self
            .senses
            .iter()
            .filter(|(w, c, _)| w == word && *c == category)
            .map(|(_, _, sense)| sense.clone())
            .collect())
    }

    fn compound_index_path(&self, category: Pos) -> Result<PathBuf, LookupError> {
        self.index_requests.set(self.index_requests.get() + 1);
        self.indexes
            .get(&category)
            .cloned()
            .ok_or_else(|| LookupError::MissingIndex {
                pos: category,
                path: PathBuf::from(category.index_file()),
            })
    }
}
