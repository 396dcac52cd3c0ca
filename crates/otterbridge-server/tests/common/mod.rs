//! Common test utilities for integration tests.
//!
//! Boots the real server on an ephemeral port, logging in against a
//! wiremock stand-in for Otter.ai.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use otterbridge_client::{OtterAuthenticator, OtterClient};
use otterbridge_server::{AppState, DynAuthenticator, Server, ServerConfig, TranscriptCache};
use otterbridge_session::{CacheConfig, SessionCache};

pub const EMAIL: &str = "user@example.com";
pub const PASSWORD: &str = "hunter2";

/// A test server that runs in the background.
pub struct TestServer {
    /// The server's address.
    pub addr: SocketAddr,
    /// HTTP client configured for this server.
    pub client: Client,
    /// Fake upstream.
    pub upstream: MockServer,
    /// Session cache shared with the server.
    pub cache: TranscriptCache,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server whose upstream accepts [`EMAIL`]/[`PASSWORD`].
    pub async fn start() -> Result<Self> {
        Self::start_with(ServerConfig::new()).await
    }

    /// Start with a custom config. The bind address is replaced.
    pub async fn start_with(config: ServerConfig) -> Result<Self> {
        let upstream = MockServer::start().await;
        mount_upstream(&upstream).await;

        let client = OtterClient::builder()
            .base_url(upstream.uri())
            .timeout(Duration::from_secs(5))
            .build()?;
        let authenticator: Arc<DynAuthenticator> = Arc::new(OtterAuthenticator::new(client));
        let cache = SessionCache::new(CacheConfig::new(), authenticator);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let config = config.with_bind_address(addr).with_request_logging(false);
        let server = Server::from_state(AppState::new(cache.clone(), config));

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _ = server
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await;
        });

        let client = Client::new();
        wait_for_server(&client, addr).await?;

        Ok(Self {
            addr,
            client,
            upstream,
            cache,
            shutdown: Some(tx),
            handle,
        })
    }

    /// Get the base URL for the server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// POST with credentials in the JSON body.
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url(), path))
            .json(&json!({"email": EMAIL, "password": PASSWORD}))
    }

    /// Number of login calls the fake upstream has received.
    pub async fn upstream_logins(&self) -> usize {
        self.upstream
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/login")
            .count()
    }

    /// Trigger graceful shutdown and wait for the server task.
    pub async fn stop(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        timeout(Duration::from_secs(5), &mut self.handle).await??;
        Ok(())
    }
}

async fn mount_upstream(upstream: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login"))
        .and(query_param("username", EMAIL))
        .and(basic_auth(EMAIL, PASSWORD))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"userid": 77, "email": EMAIL}))
                .set_delay(Duration::from_millis(50)),
        )
        .with_priority(1)
        .mount(upstream)
        .await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(2)
        .mount(upstream)
        .await;

    Mock::given(method("GET"))
        .and(path("/speeches"))
        .and(query_param("userid", "77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "speeches": [
                {"speech_id": "abc", "title": "Kickoff", "duration": 61.5, "process_finished": true}
            ]
        })))
        .mount(upstream)
        .await;

    Mock::given(method("GET"))
        .and(path("/speech"))
        .and(query_param("otid", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "speech": {
                "speech_id": "abc",
                "title": "Kickoff",
                "transcripts": [
                    {"transcript": "Hello", "start_offset": 0, "end_offset": 500, "speaker_id": 1},
                    {"transcript": "world", "start_offset": 500, "end_offset": 900, "speaker_id": 2}
                ]
            }
        })))
        .mount(upstream)
        .await;

    Mock::given(method("GET"))
        .and(path("/speech"))
        .and(query_param("otid", "gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(upstream)
        .await;
}

/// Wait for the server to become ready.
async fn wait_for_server(client: &Client, addr: SocketAddr) -> Result<()> {
    let url = format!("http://{}/health", addr);

    let result = timeout(Duration::from_secs(5), async {
        loop {
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => return,
                _ => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
    })
    .await;

    match result {
        Ok(()) => Ok(()),
        Err(_) => anyhow::bail!("Timeout waiting for server to start"),
    }
}
