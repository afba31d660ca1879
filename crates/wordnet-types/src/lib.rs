//! Shared, zero-copy types for the parts of WordNet's dictionary format that
//! sense mapping needs: parts of speech, synset ids, lemma lists and glosses.
//!
//! Text fields borrow from a backing buffer (`&str`) owned by the loader, so
//! views are cheap to build and drop.
//!
//! ```rust
//! use wordnet_types::{Pos, SynsetId};
//!
//! let pos = Pos::from_char('s').unwrap();
//! assert_eq!(pos, Pos::Adj);
//! assert_eq!(pos.index_file(), "index.adj");
//! let id = SynsetId { pos, offset: 1740 };
//! assert_eq!(id.to_string(), "a00001740");
//! ```

use std::fmt;

/// Part-of-speech marker as used by WordNet files (`n`, `v`, `a`/`s`, `r`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    /// Every part of speech, in the order lookups without a category walk them.
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a WordNet POS character into an enum. Satellites (`s`) fold into `Adj`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Emit the POS character used in `index.*`/`data.*`.
    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Suffix shared by the `index.*`, `data.*` and `*.exc` file names.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }

    /// Name of the lemma index file for this POS (`index.noun`, ...).
    pub fn index_file(self) -> &'static str {
        match self {
            Pos::Noun => "index.noun",
            Pos::Verb => "index.verb",
            Pos::Adj => "index.adj",
            Pos::Adv => "index.adv",
        }
    }

    /// Name of the synset data file for this POS (`data.noun`, ...).
    pub fn data_file(self) -> &'static str {
        match self {
            Pos::Noun => "data.noun",
            Pos::Verb => "data.verb",
            Pos::Adj => "data.adj",
            Pos::Adv => "data.adv",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        })
    }
}

/// `(offset, pos)` pair uniquely identifying a synset within the WordNet files.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SynsetId {
    pub pos: Pos,
    pub offset: u32,
}

impl fmt::Display for SynsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:08}", self.pos.to_char(), self.offset)
    }
}

/// Parsed gloss with convenience helpers while keeping the raw text intact.
#[derive(Clone, Debug)]
pub struct Gloss<'a> {
    pub raw: &'a str,
    pub definition: &'a str,
    pub examples: Vec<&'a str>,
}

/// Synset record restricted to what overlap scoring reads.
///
/// `words` holds the raw lemma tokens from the data line (underscore-joined,
/// adjective markers such as `(p)` still attached).
#[derive(Clone, Debug)]
pub struct Synset<'a> {
    pub id: SynsetId,
    pub words: Vec<&'a str>,
    pub gloss: Gloss<'a>,
}

/// Turn a raw lemma token into the word form shown to callers.
///
/// `air_base` becomes `air base`; adjective position markers (`(a)`, `(p)`,
/// `(ip)`) are dropped.
pub fn display_lemma(raw: &str) -> String {
    let trimmed = ["(ip)", "(a)", "(p)"]
        .iter()
        .find_map(|marker| raw.strip_suffix(marker))
        .unwrap_or(raw);
    trimmed.replace('_', " ")
}
