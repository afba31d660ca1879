use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::cluster::Cluster;
use crate::lexicon::{CachedLexicon, Sense, WordNetLexicon, WordNetSense};
use crate::mapper::{ClusterMapper, Match};
use crate::score::literal_overlap;
use crate::token::Token;

pub type WordNetMapper = ClusterMapper<CachedLexicon<WordNetLexicon>>;

#[derive(Clone)]
pub struct AppState {
    pub mapper: Arc<WordNetMapper>,
}

#[derive(Deserialize)]
pub struct MapQuery {
    pub cluster: String,
    /// Kept as text so a malformed value gets the JSON error body.
    pub top: Option<String>,
}

/// JSON view of one cluster and the senses it was mapped to.
#[derive(Debug, Serialize)]
pub struct MapResponse {
    cluster: ClusterBody,
    matches: Vec<SenseMatch>,
}

#[derive(Debug, Serialize)]
struct ClusterBody {
    word: String,
    tag: String,
    id: u32,
    specific: Vec<Token>,
}

#[derive(Debug, Serialize)]
struct SenseMatch {
    synset: String,
    word_forms: Vec<String>,
    definition: String,
    score: f64,
    literal_overlap: f64,
}

impl MapResponse {
    pub fn new(cluster: &Cluster, matches: &[Match<WordNetSense>]) -> Self {
        Self {
            cluster: ClusterBody {
                word: cluster.head().word().to_string(),
                tag: cluster.head().tag().to_string(),
                id: cluster.id(),
                specific: cluster.specific().to_vec(),
            },
            matches: matches
                .iter()
                .map(|m| SenseMatch {
                    synset: m.sense.id().to_string(),
                    word_forms: m.sense.word_forms().to_vec(),
                    definition: m.sense.definition().to_string(),
                    score: m.score,
                    literal_overlap: literal_overlap(cluster, &m.sense),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/map", get(map_cluster))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn map_cluster(
    State(state): State<AppState>,
    Query(params): Query<MapQuery>,
) -> Result<Json<MapResponse>, ApiError> {
    let cluster =
        Cluster::parse(&params.cluster).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let top = params.top.as_deref().map(parse_top).transpose()?;

    // Lookups may scan index files; keep them off the async workers.
    let mapper = Arc::clone(&state.mapper);
    let response = tokio::task::spawn_blocking(move || {
        let matches = match top {
            Some(top) => mapper.map_multiple(&cluster, top),
            None => mapper.map_single(&cluster).into_iter().collect(),
        };
        MapResponse::new(&cluster, &matches)
    })
    .await
    .map_err(|err| {
        error!("mapping task failed: {err}");
        ApiError::Internal
    })?;

    Ok(Json(response))
}

fn parse_top(raw: &str) -> Result<usize, ApiError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(ApiError::bad_request("top must be >= 1")),
        Ok(top) => Ok(top),
        Err(_) => Err(ApiError::bad_request(format!(
            "top must be a positive integer, got {raw:?}"
        ))),
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
