use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::store;

/// Hard cap on catalog pages requested per run.
pub const PAGE_LIMIT: u32 = 3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport failures, classified for logging. Pagination recovers from all
/// of them by stopping early with the records gathered so far.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("http status: {0}")]
    Status(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl FetchError {
    fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::Connect(_) => "connect",
            FetchError::Status(_) => "status",
            FetchError::Request(_) => "request",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let msg = err.to_string();
        if err.is_timeout() {
            FetchError::Timeout(msg)
        } else if err.is_connect() {
            FetchError::Connect(msg)
        } else if err.is_status() {
            FetchError::Status(msg)
        } else {
            FetchError::Request(msg)
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    results: Vec<Value>,
}

pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Request one catalog page. A missing `results` key decodes as an empty
/// page, which ends pagination.
pub fn fetch_page(client: &Client, endpoint: &str, page: u32) -> Result<Vec<Value>, FetchError> {
    let url = format!("{}&page={}", endpoint, page);
    let body: CatalogPage = client.get(&url).send()?.error_for_status()?.json()?;
    Ok(body.results)
}

/// Walk pages 1..=limit, aggregating results until an empty page or a
/// transport error ends the loop. The aggregate survives an aborted walk.
fn paginate<F>(limit: u32, mut fetch: F) -> Vec<Value>
where
    F: FnMut(u32) -> Result<Vec<Value>, FetchError>,
{
    let mut all_records = Vec::new();
    for page in 1..=limit {
        info!(page, "Fetching page");
        let started = Instant::now();
        match fetch(page) {
            Ok(results) if results.is_empty() => {
                info!(page, "Empty page, pagination complete");
                break;
            }
            Ok(results) => {
                info!(
                    page,
                    records = results.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Page fetched"
                );
                all_records.extend(results);
            }
            Err(err) => {
                error!(page, kind = err.kind(), %err, "Fetch aborted");
                break;
            }
        }
    }
    all_records
}

/// Fetch the catalog and persist whatever was aggregated, returning it.
/// Transport failures only shorten the walk; a write failure is fatal.
pub fn get_catalog_data<F>(raw_path: &Path, limit: u32, fetch: F) -> Result<Vec<Value>>
where
    F: FnMut(u32) -> Result<Vec<Value>, FetchError>,
{
    let records = paginate(limit, fetch);
    store::save_raw(&records, raw_path)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_of(n: u64) -> Vec<Value> {
        vec![json!({"page": n})]
    }

    #[test]
    fn stops_on_empty_page() {
        let mut calls = 0;
        let records = paginate(PAGE_LIMIT, |page| {
            calls += 1;
            if page < 2 {
                Ok(page_of(page as u64))
            } else {
                Ok(Vec::new())
            }
        });
        assert_eq!(calls, 2);
        assert_eq!(records, page_of(1));
    }

    #[test]
    fn aggregates_pages_in_order() {
        let records = paginate(PAGE_LIMIT, |page| {
            if page <= 2 {
                Ok(page_of(page as u64))
            } else {
                Ok(Vec::new())
            }
        });
        assert_eq!(records, vec![json!({"page": 1}), json!({"page": 2})]);
    }

    #[test]
    fn honors_hard_page_cap() {
        let mut calls = 0;
        let records = paginate(PAGE_LIMIT, |page| {
            calls += 1;
            Ok(page_of(page as u64))
        });
        assert_eq!(calls, PAGE_LIMIT);
        assert_eq!(records.len(), PAGE_LIMIT as usize);
    }

    #[test]
    fn keeps_partial_aggregate_on_transport_error() {
        let records = paginate(PAGE_LIMIT, |page| {
            if page == 1 {
                Ok(page_of(1))
            } else {
                Err(FetchError::Timeout("deadline elapsed".to_string()))
            }
        });
        assert_eq!(records, page_of(1));
    }

    #[test]
    fn persists_aggregate_even_after_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        let records = get_catalog_data(&path, PAGE_LIMIT, |page| {
            if page == 1 {
                Ok(page_of(1))
            } else {
                Err(FetchError::Connect("refused".to_string()))
            }
        })
        .unwrap();
        assert_eq!(records, page_of(1));

        let written: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, records);
    }

    #[test]
    fn empty_aggregate_still_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        let records = get_catalog_data(&path, PAGE_LIMIT, |_| {
            Err(FetchError::Status("503 Service Unavailable".to_string()))
        })
        .unwrap();
        assert!(records.is_empty());
        assert!(path.exists());
    }
}
