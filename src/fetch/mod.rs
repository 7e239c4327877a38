//! Input acquisition: local files or HTTP downloads.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::{HttpClient, table_request};

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Downloads `url` through `client`, failing on non-success status codes.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = table_request(url)?;

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("GET {url} returned {status}");
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Reads a table from a local path, or fetches it when `source` is an http(s) URL.
#[tracing::instrument(skip(client, source), fields(source = %source))]
pub async fn read_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(client, source).await?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("reading {source}"))?
    };
    debug!(bytes = bytes.len(), "Source read");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::env;
    use std::fs;

    /// Client that must never be reached.
    struct OfflineClient;

    #[async_trait]
    impl HttpClient for OfflineClient {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            panic!("local sources must not hit the network");
        }
    }

    #[tokio::test]
    async fn test_read_source_local_file() {
        let path = format!("{}/transit_friction_test_source.csv", env::temp_dir().display());
        fs::write(&path, "STOP_ID,ROUTE_NUM\n1,8\n").unwrap();

        let bytes = read_source(&OfflineClient, &path).await.unwrap();
        assert_eq!(bytes, b"STOP_ID,ROUTE_NUM\n1,8\n");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_table_request_is_csv_get() {
        let req = table_request("https://data.example.org/stops.csv").unwrap();

        assert_eq!(req.method(), reqwest::Method::GET);
        assert_eq!(req.url().path(), "/stops.csv");
        let accept = req.headers()[reqwest::header::ACCEPT].to_str().unwrap();
        assert!(accept.starts_with("text/csv"));
    }

    #[test]
    fn test_basic_client_builds() {
        assert!(BasicClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_bad_url_fails_before_request() {
        let result = fetch_bytes(&OfflineClient, "http://[::1").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_source_missing_file() {
        let result = read_source(&OfflineClient, "/nonexistent/transit_friction/stops.csv").await;
        assert!(result.is_err());
    }
}
