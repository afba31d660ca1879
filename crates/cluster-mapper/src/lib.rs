pub mod candidates;
pub mod cluster;
pub mod handlers;
pub mod lexicon;
pub mod mapper;
pub mod rank;
pub mod score;
pub mod token;
pub mod tokenize;

#[cfg(test)]
mod testing;

pub use cluster::{Cluster, ReadError, ReadOptions, read_cluster_file, read_clusters};
pub use handlers::{AppState, MapResponse, WordNetMapper, router};
pub use lexicon::{
    CachedLexicon, DEFAULT_CACHE_CAPACITY, Lexicon, LookupError, Sense, WordNetLexicon,
    WordNetSense,
};
pub use mapper::{ClusterMapper, Match};
pub use score::literal_overlap;
pub use token::{ParseError, TagTable, Token};
pub use tokenize::{SimpleTokenizer, Tokenizer};
