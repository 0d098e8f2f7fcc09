//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tfe_client::{ClientConfig, RetryPolicy, TfeClient, Transport};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN: &str = "integration-token";

/// Mock server plus a client pointed at it with no API prefix
pub struct Fixture {
    pub server: MockServer,
    pub client: TfeClient,
}

impl Fixture {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let client = TfeClient::new(config_for(&server)).unwrap();
        Self { server, client }
    }

    pub async fn with_retry(policy: RetryPolicy) -> Self {
        let server = MockServer::start().await;
        let client = TfeClient::new(config_for(&server).retry(policy)).unwrap();
        Self { server, client }
    }

    /// Client whose transport counts every request it sends
    pub async fn with_spy() -> (Self, Arc<SpyTransport>) {
        let server = MockServer::start().await;
        let spy = Arc::new(SpyTransport::default());
        let client = TfeClient::new(config_for(&server).transport(spy.clone())).unwrap();
        (Self { server, client }, spy)
    }
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .address(server.uri())
        .base_path("")
        .token(TOKEN)
}

/// Transport that records how many requests reached it
#[derive(Default)]
pub struct SpyTransport {
    inner: reqwest::Client,
    calls: AtomicUsize,
}

impl SpyTransport {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for SpyTransport {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, reqwest::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(request).await
    }
}

/// Responds with the posted JSON:API document, assigning the resource an id
pub struct EchoResponder {
    pub id: &'static str,
}

impl Respond for EchoResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match serde_json::from_slice::<serde_json::Value>(&request.body) {
            Ok(mut document) => {
                document["data"]["id"] = serde_json::Value::from(self.id);
                ResponseTemplate::new(201).set_body_json(document)
            }
            Err(_) => ResponseTemplate::new(400),
        }
    }
}

pub fn page_meta(current: u32, total_pages: u32, total_count: u32) -> serde_json::Value {
    serde_json::json!({
        "pagination": {
            "current-page": current,
            "prev-page": if current > 1 { Some(current - 1) } else { None },
            "next-page": if current < total_pages { Some(current + 1) } else { None },
            "total-pages": total_pages,
            "total-count": total_count
        }
    })
}
