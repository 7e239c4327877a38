use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Method, Request, Response};

/// Transport used for remote tables; tests substitute clients that never
/// reach the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Builds the GET for a published CSV table.
pub fn table_request(url: &str) -> anyhow::Result<Request> {
    let mut req = Request::new(Method::GET, url.parse()?);
    req.headers_mut().insert(
        ACCEPT,
        HeaderValue::from_static("text/csv, text/plain;q=0.9, */*;q=0.1"),
    );
    Ok(req)
}
