//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_catalog;

use cinefeed::config::CatalogConfig;
use serde_json::{json, Value};

/// Config pointing at a mock server.
pub fn config_for(base_url: &str) -> CatalogConfig {
    CatalogConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        request_timeout_ms: 2_000,
        ..Default::default()
    }
}

pub fn tv_record(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "overview": format!("about {}", name),
        "poster_path": format!("/{}.jpg", id),
        "vote_average": 8.0,
        "vote_count": 120,
        "first_air_date": "2019-05-01"
    })
}

pub fn movie_record(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": null,
        "poster_path": null,
        "vote_average": 7.3,
        "vote_count": 4,
        "release_date": "2024-10-01"
    })
}

pub fn page_of(page: u32, results: Vec<Value>) -> String {
    json!({ "page": page, "results": results, "total_pages": 3, "total_results": 60 }).to_string()
}
