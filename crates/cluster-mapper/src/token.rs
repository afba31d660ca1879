use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use wordnet_types::Pos;

/// Tag carried by proper nouns.
pub const PROPER_NOUN_TAG: &str = "NP";
/// Tag carried by cardinal numbers.
pub const NUMERAL_TAG: &str = "CD";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid token string: {0}")]
    InvalidToken(String),
    #[error("invalid line (expected at least 3 tab-separated fields): {0}")]
    TooFewFields(String),
    #[error("invalid cluster id {id:?} in line: {line}")]
    InvalidId { id: String, line: String },
}

/// A `word#TAG` pair. The word keeps its case; the tag is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    word: String,
    tag: String,
}

impl Token {
    /// Parse `<word>#<TAG>` where TAG is one or more of `A-Z`, `$`, `,`.
    ///
    /// The split happens at the last `#`, so words may contain `#` themselves.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidToken(raw.to_string());
        let (word, tag) = raw.rsplit_once('#').ok_or_else(invalid)?;
        if word.is_empty() || word.contains('\n') || !is_tag(tag) {
            return Err(invalid());
        }
        Ok(Self {
            word: word.to_string(),
            tag: tag.to_string(),
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Semantic category of this token's tag, `None` when the table has no match.
    pub fn category(&self, table: &TagTable) -> Option<Pos> {
        table.category(&self.tag)
    }
}

impl FromStr for Token {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.word, self.tag)
    }
}

fn is_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b == b'$' || b == b',')
}

/// Ordered `(tag prefix, category)` table; the first prefix a tag starts with wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTable {
    entries: Vec<(String, Pos)>,
}

impl TagTable {
    pub fn new<S: Into<String>>(entries: impl IntoIterator<Item = (S, Pos)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(prefix, pos)| (prefix.into(), pos))
                .collect(),
        }
    }

    pub fn category(&self, tag: &str) -> Option<Pos> {
        self.entries
            .iter()
            .find(|(prefix, _)| tag.starts_with(prefix.as_str()))
            .map(|(_, pos)| *pos)
    }
}

impl Default for TagTable {
    /// `N`, `CD`, `JJ`, `RB`, `V`, checked in that order.
    fn default() -> Self {
        Self::new([
            ("N", Pos::Noun),
            ("CD", Pos::Noun),
            ("JJ", Pos::Adj),
            ("RB", Pos::Adv),
            ("V", Pos::Verb),
        ])
    }
}
