//! CORS, routing fallback and request metrics.

mod common;

use common::TestServer;
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn test_cors_header_on_every_response() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let client = server.client();

    for path in ["/", "/api/health", "/api/contacts", "/missing"] {
        let resp = client
            .request(Method::GET, path)
            .header("origin", "https://frontend.example")
            .send()
            .await?;
        assert_eq!(
            resp.headers().get("access-control-allow-origin").map(|v| v.as_bytes()),
            Some(&b"*"[..]),
            "{path}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_cors_preflight() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let resp = server
        .client()
        .request(Method::OPTIONS, "/api/contacts/6f1c1b2a-3d4e-4f50-8a9b-0c1d2e3f4a5b")
        .header("origin", "https://frontend.example")
        .header("access-control-request-method", "DELETE")
        .header("access-control-request-headers", "content-type")
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let headers = resp.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(
        headers["access-control-allow-methods"]
            .to_str()?
            .contains("DELETE")
    );
    assert_eq!(headers["access-control-allow-headers"], "content-type");
    Ok(())
}

#[tokio::test]
async fn test_unknown_route() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let (status, body) = server.client().get("/api/contact").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
    assert_eq!(body["message"], "Cannot GET /api/contact");
    Ok(())
}

#[tokio::test]
async fn test_unsupported_method_on_known_route() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let resp = server
        .client()
        .request(Method::PUT, "/api/contacts")
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["message"], "Cannot PUT /api/contacts");
    Ok(())
}

#[tokio::test]
async fn test_requests_are_counted_by_route_template() -> anyhow::Result<()> {
    contact_api::metrics::init();
    let server = TestServer::spawn().await?;
    let client = server.client();

    client
        .delete("/api/contacts/6f1c1b2a-3d4e-4f50-8a9b-0c1d2e3f4a5b")
        .await?;

    let output = contact_api::metrics::gather_metrics();
    assert!(output.contains("route=\"/api/contacts/:id\""));
    assert!(!output.contains("6f1c1b2a-3d4e-4f50-8a9b-0c1d2e3f4a5b"));
    assert!(output.contains("error=\"contact_not_found\""));
    Ok(())
}

#[tokio::test]
async fn test_metrics_listener_serves_text() -> anyhow::Result<()> {
    contact_api::metrics::init();
    let port = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
    let handle = tokio::spawn(contact_api::http::run_metrics_server(port));

    let url = format!("http://127.0.0.1:{port}/metrics");
    let mut body = None;
    for _ in 0..50 {
        if let Ok(resp) = reqwest::get(&url).await {
            assert_eq!(resp.status(), StatusCode::OK);
            body = Some(resp.text().await?);
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    handle.abort();

    let body = body.ok_or_else(|| anyhow::anyhow!("metrics listener never answered"))?;
    assert!(body.contains("contacts_created_total"), "{body}");
    Ok(())
}
