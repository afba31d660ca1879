use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use cluster_mapper::handlers::{AppState, router};
use cluster_mapper::{CachedLexicon, ClusterMapper, WordNetLexicon};
use wordnet_db::LoadMode;

fn make_state() -> AppState {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../wordnet-db/tests/fixtures/wn");
    let lexicon = WordNetLexicon::load(&dir, LoadMode::Owned).unwrap();
    AppState {
        mapper: Arc::new(ClusterMapper::new(CachedLexicon::new(lexicon))),
    }
}

fn map_uri(line: &str, top: Option<&str>) -> String {
    let encoded = line
        .replace('#', "%23")
        .replace('\t', "%09")
        .replace(',', "%2C")
        .replace(' ', "%20");
    match top {
        Some(top) => format!("/v1/map?cluster={encoded}&top={top}"),
        None => format!("/v1/map?cluster={encoded}"),
    }
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router(make_state())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

#[tokio::test]
async fn healthz_ok() {
    let app = router(make_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body_bytes[..], b"ok");
}

#[tokio::test]
async fn map_endpoint_returns_best_sense() {
    let (status, body) = get(&map_uri("player#NN\t7\tactor#NN, thespian#NN", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cluster"]["word"], "player");
    assert_eq!(body["cluster"]["tag"], "NN");
    assert_eq!(body["cluster"]["id"], 7);
    assert_eq!(body["cluster"]["specific"][1]["word"], "thespian");

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["synset"], "n00000300");
    assert_eq!(matches[0]["definition"], "a theatrical performer");
    assert_eq!(matches[0]["word_forms"][2], "thespian");
    assert!(matches[0]["score"].as_f64().unwrap() > 0.0);
    assert_eq!(matches[0]["literal_overlap"], 1.0);
}

#[tokio::test]
async fn map_endpoint_returns_top_senses() {
    let uri = map_uri("base#NN\t0\tairfield#NN, aircraft#NN, military#JJ", Some("2"));
    let (status, body) = get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    let synsets: Vec<&str> = body["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["synset"].as_str().unwrap())
        .collect();
    assert_eq!(synsets, vec!["n00000500", "n00000400"]);
}

#[tokio::test]
async fn unknown_words_yield_no_matches() {
    let (status, body) = get(&map_uri("zyzzyva#NN\t0\tqwxz#NN", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["matches"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn map_endpoint_rejects_invalid_params() {
    let (status, body) = get(&map_uri("player#NN\t0", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("at least 3")
    );

    let (status, body) = get(&map_uri("player#NN\t0\tactor#NN", Some("0"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "top must be >= 1");

    let (status, body) = get(&map_uri("player#NN\t0\tactor#NN", Some("abc"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "top must be a positive integer, got \"abc\"");

    let (status, body) = get(&map_uri("player#NN\t0\tactor#NN", Some("-2"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("positive integer"));
}
