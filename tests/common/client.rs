//! Test HTTP client.

use reqwest::{Method, Response, StatusCode};
use serde_json::Value;

/// A thin `reqwest` wrapper that returns status and decoded JSON.
pub struct TestClient {
    base: String,
    http: reqwest::Client,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base: String) -> Self {
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http.request(method, format!("{}{}", self.base, path))
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<(StatusCode, Value)> {
        decode(self.request(Method::GET, path).send().await?).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> anyhow::Result<(StatusCode, Value)> {
        decode(self.request(Method::POST, path).json(body).send().await?).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<(StatusCode, Value)> {
        decode(self.request(Method::DELETE, path).send().await?).await
    }

    /// Fetch the contact list, asserting a 200 array.
    pub async fn list(&self) -> anyhow::Result<Vec<Value>> {
        let (status, body) = self.get("/api/contacts").await?;
        anyhow::ensure!(status == StatusCode::OK, "list returned {}", status);
        match body {
            Value::Array(items) => Ok(items),
            other => anyhow::bail!("expected array, got {}", other),
        }
    }
}

async fn decode(resp: Response) -> anyhow::Result<(StatusCode, Value)> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}
