use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::token::{NUMERAL_TAG, PROPER_NOUN_TAG, ParseError, Token};

const FIELD_SEPARATOR: char = '\t';
const WORD_SEPARATOR: &str = ", ";

/// A headword, a numeric id and the specific words clustered around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    head: Token,
    id: u32,
    specific: Vec<Token>,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read clusters: {0}")]
    Io(#[from] std::io::Error),
}

/// Which lines of a cluster source are kept.
///
/// With `n` the 1-based number of a raw line, the line is parsed only when
/// `n > start_line`, and reading stops once line `end_line + 1` has been
/// consumed. `max_clusters` stops reading after that many clusters parsed
/// successfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub start_line: usize,
    pub end_line: Option<usize>,
    pub max_clusters: Option<usize>,
}

impl Cluster {
    /// Parse `<head>#<TAG>\t<id>\t<word>#<TAG>, <word>#<TAG>, ...`.
    ///
    /// Fields past the third are ignored. Specific words that fail to parse
    /// are dropped.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).collect();
        if fields.len() < 3 {
            return Err(ParseError::TooFewFields(line.to_string()));
        }
        let head = Token::parse(fields[0])?;
        let id = fields[1].parse::<u32>().map_err(|_| ParseError::InvalidId {
            id: fields[1].to_string(),
            line: line.to_string(),
        })?;

        let specific = fields[2]
            .split(WORD_SEPARATOR)
            .filter_map(|raw| match Token::parse(raw) {
                Ok(token) => Some(token),
                Err(err) => {
                    debug!(cluster = %head, "dropping specific word: {err}");
                    None
                }
            })
            .collect();

        Ok(Self { head, id, specific })
    }

    pub fn head(&self) -> &Token {
        &self.head
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn specific(&self) -> &[Token] {
        &self.specific
    }

    /// Cardinal-number head whose word is made of digits, `.`, `,` and `:` only.
    pub fn is_numeric(&self) -> bool {
        let word = self.head.word();
        self.head.tag() == NUMERAL_TAG
            && !word.is_empty()
            && word
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | ':'))
    }

    pub fn is_proper_noun(&self) -> bool {
        self.head.tag() == PROPER_NOUN_TAG
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.head, self.id)
    }
}

/// Read one cluster per line. Unparseable lines are logged and skipped.
///
/// Input is decoded as UTF-8. Sources in another encoding must be transcoded
/// into the `BufRead` handed in; stray invalid bytes are replaced with U+FFFD
/// rather than failing the batch.
pub fn read_clusters<R: BufRead>(
    mut reader: R,
    options: ReadOptions,
) -> Result<Vec<Cluster>, ReadError> {
    let mut clusters = Vec::new();
    let mut line_count = 0usize;
    let mut buf = Vec::new();

    loop {
        if options.end_line.is_some_and(|end| line_count > end) {
            break;
        }
        if options.max_clusters.is_some_and(|max| clusters.len() >= max) {
            break;
        }
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_count += 1;
        if line_count <= options.start_line {
            continue;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        match Cluster::parse(line) {
            Ok(cluster) => clusters.push(cluster),
            Err(err) => warn!(line = line_count, "skipping line: {err}"),
        }
    }

    info!("{} lines read, {} clusters parsed", line_count, clusters.len());
    Ok(clusters)
}

/// Open `path` and pass it to [`read_clusters`].
pub fn read_cluster_file(
    path: impl AsRef<Path>,
    options: ReadOptions,
) -> Result<Vec<Cluster>, ReadError> {
    let path = path.as_ref();
    info!(
        "reading cluster file {} from line {} to line {:?}",
        path.display(),
        options.start_line,
        options.end_line
    );
    let file = File::open(path)?;
    read_clusters(BufReader::new(file), options)
}
