//! Load the WordNet lemma indices and synset data with zero-copy text.
//!
//! This crate ingests the canonical `data.*`/`index.*` files and keeps exactly
//! what lexical-overlap sense mapping reads: lemma → synset offsets (in index
//! order), the lemma list of every synset, and its gloss split into definition
//! and usage examples. Callers choose between memory-mapped files or owned
//! buffers at runtime via [`LoadMode`].
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load_with_mode("/usr/share/wordnet", LoadMode::Mmap)?;
//! for sid in wn.synsets_for_lemma(Pos::Noun, "player") {
//!     let syn = wn.get_synset(*sid).unwrap();
//!     println!("{}: {:?} {}", syn.id, syn.words, syn.gloss.definition);
//! }
//! println!("noun index lives at {}", wn.index_path(Pos::Noun).display());
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use memmap2::Mmap;
use wordnet_types::{Gloss, Pos, Synset, SynsetId};

/// Strategy for loading dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each WordNet file (fast, zero-copy).
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Data files only; index files are fully parsed into owned keys at load time.
#[derive(Clone, Copy)]
struct TextRef {
    pos: Pos,
    start: usize,
    len: usize,
}

struct DataFiles {
    noun: Buffer,
    verb: Buffer,
    adj: Buffer,
    adv: Buffer,
}

impl DataFiles {
    fn bytes(&self, pos: Pos) -> &[u8] {
        match pos {
            Pos::Noun => self.noun.as_slice(),
            Pos::Verb => self.verb.as_slice(),
            Pos::Adj => self.adj.as_slice(),
            Pos::Adv => self.adv.as_slice(),
        }
    }

    fn text(&self, r: TextRef) -> &str {
        let bytes = self.bytes(r.pos);
        let slice = &bytes[r.start..r.start + r.len];
        // Ranges are cut from `&str` tokens during parsing, so they stay on char boundaries.
        std::str::from_utf8(slice).unwrap_or_default()
    }
}

struct GlossData {
    raw: TextRef,
    definition: TextRef,
    examples: Vec<TextRef>,
}

struct SynsetData {
    id: SynsetId,
    words: Vec<TextRef>,
    gloss: GlossData,
}

/// In-memory view of a WordNet dictionary backed by mmap or owned buffers.
pub struct WordNet {
    dict_dir: PathBuf,
    data: DataFiles,
    synsets: HashMap<SynsetId, SynsetData>,
    lemma_to_synsets: HashMap<(Pos, String), Vec<SynsetId>>,
}

impl WordNet {
    /// Load WordNet from a directory containing `data.*` and `index.*` files.
    ///
    /// Defaults to memory-mapping the source files. Use [`load_with_mode`] to
    /// force owned buffers instead.
    ///
    /// [`load_with_mode`]: WordNet::load_with_mode
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    /// Load WordNet choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        for pos in Pos::ALL {
            for name in [pos.data_file(), pos.index_file()] {
                let path = dir.join(name);
                if !path.exists() {
                    anyhow::bail!("missing required WordNet file: {}", path.display());
                }
            }
        }

        let data = DataFiles {
            noun: load_file(dir.join(Pos::Noun.data_file()), mode)?,
            verb: load_file(dir.join(Pos::Verb.data_file()), mode)?,
            adj: load_file(dir.join(Pos::Adj.data_file()), mode)?,
            adv: load_file(dir.join(Pos::Adv.data_file()), mode)?,
        };

        let mut lemma_to_synsets = HashMap::new();
        for pos in Pos::ALL {
            // Index files are read once and only their keys survive, so an owned read is enough.
            let index = load_file(dir.join(pos.index_file()), LoadMode::Owned)?;
            parse_index(index.as_slice(), pos, &mut lemma_to_synsets)?;
        }

        let mut synsets = HashMap::new();
        for pos in Pos::ALL {
            parse_data(data.bytes(pos), pos, &mut synsets)?;
        }

        Ok(Self {
            dict_dir: dir.to_path_buf(),
            data,
            synsets,
            lemma_to_synsets,
        })
    }

    /// Directory the dictionary was loaded from.
    pub fn dict_dir(&self) -> &Path {
        &self.dict_dir
    }

    /// Path of the `index.*` file for a POS.
    pub fn index_path(&self, pos: Pos) -> PathBuf {
        self.dict_dir.join(pos.index_file())
    }

    /// Check whether a lemma exists for the given POS according to index files.
    pub fn lemma_exists(&self, pos: Pos, lemma: &str) -> bool {
        let key = (pos, normalize_lemma(lemma));
        self.lemma_to_synsets.contains_key(&key)
    }

    /// Return the synsets associated with a lemma in index order, or an empty slice.
    pub fn synsets_for_lemma(&self, pos: Pos, lemma: &str) -> &[SynsetId] {
        let key = (pos, normalize_lemma(lemma));
        self.lemma_to_synsets
            .get(&key)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Fetch a `Synset` by id if loaded.
    pub fn get_synset(&self, id: SynsetId) -> Option<Synset<'_>> {
        self.synsets.get(&id).map(|syn| self.make_synset_view(syn))
    }

    /// Iterate over all synsets as borrowed views.
    pub fn iter_synsets(&self) -> impl Iterator<Item = Synset<'_>> + '_ {
        self.synsets.values().map(|s| self.make_synset_view(s))
    }

    /// Number of lemmas tracked across all parts of speech.
    pub fn lemma_count(&self) -> usize {
        self.lemma_to_synsets.len()
    }

    /// Number of synsets.
    pub fn synset_count(&self) -> usize {
        self.synsets.len()
    }

    fn make_synset_view<'a>(&'a self, data: &'a SynsetData) -> Synset<'a> {
        let gloss = Gloss {
            raw: self.data.text(data.gloss.raw),
            definition: self.data.text(data.gloss.definition),
            examples: data
                .gloss
                .examples
                .iter()
                .map(|r| self.data.text(*r))
                .collect(),
        };

        Synset {
            id: data.id,
            words: data.words.iter().map(|w| self.data.text(*w)).collect(),
            gloss,
        }
    }
}

fn load_file(path: PathBuf, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            // SAFETY: dictionary files are treated as read-only for the lifetime of `WordNet`.
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

/// Header lines of the Princeton files start with whitespace.
fn is_header(line: &[u8]) -> bool {
    line.is_empty() || matches!(line.first(), Some(b' ' | b'\t'))
}

fn parse_index(
    bytes: &[u8],
    pos: Pos,
    lemma_to_synsets: &mut HashMap<(Pos, String), Vec<SynsetId>>,
) -> Result<()> {
    for (lineno, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = strip_cr(raw_line);
        if is_header(line) {
            continue;
        }
        let line_str = std::str::from_utf8(line)
            .with_context(|| format!("{}:{} not utf-8", pos.index_file(), lineno + 1))?;
        let tokens: Vec<&str> = line_str.split_ascii_whitespace().collect();
        if tokens.len() < 6 {
            anyhow::bail!(
                "{}:{} malformed index line (too few tokens)",
                pos.index_file(),
                lineno + 1
            );
        }

        let synset_cnt: usize = tokens[2]
            .parse()
            .with_context(|| format!("{}:{} synset_cnt", pos.index_file(), lineno + 1))?;
        let p_cnt: usize = tokens[3]
            .parse()
            .with_context(|| format!("{}:{} p_cnt", pos.index_file(), lineno + 1))?;

        // lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt [offset...]
        let offsets_at = 4 + p_cnt + 2;
        if tokens.len() != offsets_at + synset_cnt {
            anyhow::bail!(
                "{}:{} synset_cnt mismatch (expected {}, got {})",
                pos.index_file(),
                lineno + 1,
                synset_cnt,
                tokens.len().saturating_sub(offsets_at)
            );
        }
        let ids = tokens[offsets_at..]
            .iter()
            .map(|t| {
                t.parse::<u32>()
                    .map(|offset| SynsetId { pos, offset })
                    .with_context(|| format!("{}:{} synset offset", pos.index_file(), lineno + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        lemma_to_synsets.insert((pos, normalize_lemma(tokens[0])), ids);
    }

    Ok(())
}

fn parse_data(bytes: &[u8], pos: Pos, synsets: &mut HashMap<SynsetId, SynsetData>) -> Result<()> {
    let file = pos.data_file();
    for (lineno, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = strip_cr(raw_line);
        if is_header(line) {
            continue;
        }
        let line_str = std::str::from_utf8(line)
            .with_context(|| format!("{}:{} not utf-8", file, lineno + 1))?;
        let (left, gloss_part) = match line_str.split_once('|') {
            Some((l, r)) => (l, r),
            None => (line_str, ""),
        };

        let tokens: Vec<&str> = left.split_ascii_whitespace().collect();
        if tokens.len() < 4 {
            anyhow::bail!("{}:{} malformed data line", file, lineno + 1);
        }

        let offset: u32 = tokens[0]
            .parse()
            .with_context(|| format!("{}:{} offset", file, lineno + 1))?;
        let w_cnt = usize::from_str_radix(tokens[3], 16)
            .with_context(|| format!("{}:{} w_cnt", file, lineno + 1))?;

        // Pointers and verb frames follow the word list; overlap scoring never reads them.
        if tokens.len() < 4 + w_cnt * 2 {
            anyhow::bail!("{}:{} not enough word/lex_id pairs", file, lineno + 1);
        }
        let words = tokens[4..4 + w_cnt * 2]
            .iter()
            .step_by(2)
            .map(|word| text_ref_str(pos, bytes, word))
            .collect();

        let id = SynsetId { pos, offset };
        synsets.insert(
            id,
            SynsetData {
                id,
                words,
                gloss: parse_gloss(pos, bytes, gloss_part),
            },
        );
    }

    Ok(())
}

/// Definition is everything before the first quoted example, minus the
/// trailing `;` separators; it may span several `;`-separated clauses.
fn parse_gloss(pos: Pos, root: &[u8], gloss: &str) -> GlossData {
    let trimmed = gloss.trim();
    let def_end = trimmed.find('"').unwrap_or(trimmed.len());
    let definition =
        trimmed[..def_end].trim_end_matches(|c: char| c == ';' || c.is_whitespace());

    let mut examples = Vec::new();
    let mut quote_start: Option<usize> = None;
    for (idx, _) in trimmed.match_indices('"') {
        match quote_start.take() {
            Some(start) => {
                let example = &trimmed[start + 1..idx];
                if !example.is_empty() {
                    examples.push(text_ref_str(pos, root, example));
                }
            }
            None => quote_start = Some(idx),
        }
    }

    GlossData {
        raw: text_ref_str(pos, root, trimmed),
        definition: text_ref_str(pos, root, definition),
        examples,
    }
}

fn text_ref_str(pos: Pos, root: &[u8], token: &str) -> TextRef {
    let start = token.as_ptr() as usize - root.as_ptr() as usize;
    TextRef {
        pos,
        start,
        len: token.len(),
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn normalize_lemma(text: &str) -> String {
    let mut s = text.trim().to_string();
    s.make_ascii_lowercase();
    s.replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gloss_of(text: &str) -> (String, Vec<String>) {
        let bytes = text.as_bytes();
        let root = std::str::from_utf8(bytes).unwrap();
        let data = parse_gloss(Pos::Noun, bytes, root);
        let slice = |r: TextRef| root[r.start..r.start + r.len].to_string();
        (
            slice(data.definition),
            data.examples.into_iter().map(slice).collect(),
        )
    }

    #[test]
    fn splits_definition_from_examples() {
        let (definition, examples) =
            gloss_of(" a person who participates; \"he was a major player\"; \"a key player\"  ");
        assert_eq!(definition, "a person who participates");
        assert_eq!(examples, vec!["he was a major player", "a key player"]);
    }

    #[test]
    fn definition_keeps_every_clause_before_the_first_example() {
        let (definition, examples) = gloss_of(
            "a member of the genus Canis that has been domesticated by man since prehistoric \
             times; occurs in many breeds; \"the dog barked all night\"",
        );
        assert_eq!(
            definition,
            "a member of the genus Canis that has been domesticated by man since prehistoric \
             times; occurs in many breeds"
        );
        assert_eq!(examples, vec!["the dog barked all night"]);

        let (definition, _) = gloss_of("move fast; run; (of horses) gallop");
        assert_eq!(definition, "move fast; run; (of horses) gallop");
    }

    #[test]
    fn semicolon_inside_quotes_stays_in_the_example() {
        let (definition, examples) = gloss_of("\"one; two\"");
        assert_eq!(definition, "");
        assert_eq!(examples, vec!["one; two"]);
    }

    #[test]
    fn normalizes_lemma_keys() {
        assert_eq!(normalize_lemma(" Air Base "), "air_base");
        assert_eq!(strip_cr(b"abc\r"), b"abc");
    }
}
