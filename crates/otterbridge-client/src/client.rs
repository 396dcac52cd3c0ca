//! Unauthenticated entry point: configuration and login.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::error::{Error, Result};
use crate::session::OtterSession;
use crate::types::LoginResponse;

/// Default Otter.ai API root.
pub const DEFAULT_BASE_URL: &str = "https://otter.ai/forward/api/v1/";

/// Default timeout for requests, logins included.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of speeches requested per listing.
const DEFAULT_PAGE_SIZE: u32 = 45;

/// Otter.ai API client.
///
/// Holds configuration only. Each [`login`](OtterClient::login) builds its
/// own cookie-carrying HTTP client, so sessions for different accounts never
/// share cookies.
///
/// # Example
///
/// ```no_run
/// use otterbridge_client::OtterClient;
///
/// # async fn example() -> otterbridge_client::Result<()> {
/// let client = OtterClient::builder()
///     .base_url("https://otter.ai/forward/api/v1/")
///     .build()?;
///
/// let session = client.login("me@example.com", "hunter2").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OtterClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// API root, always ending in `/`.
    pub(crate) base_url: Url,
    /// Per-request timeout.
    pub(crate) timeout: Duration,
    /// Page size for speech listings.
    pub(crate) page_size: u32,
    /// User agent sent upstream.
    pub(crate) user_agent: String,
}

impl OtterClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    pub(crate) fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Log in and return a session bound to the account.
    ///
    /// Fails with [`Error::Auth`] when upstream rejects the credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<OtterSession> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(&self.inner.user_agent)
            .timeout(self.inner.timeout)
            .build()?;

        let url = self.url("login")?;
        tracing::debug!(user = %email, url = %url, "Logging in upstream");

        let response = http
            .get(url)
            .query(&[("username", email)])
            .basic_auth(email, Some(password))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Auth(
                "Email and/or password are incorrect".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(extract_error(response).await);
        }

        let login: LoginResponse = response.json().await?;
        let user_id = login
            .user_id()
            .ok_or_else(|| Error::Auth("Login response did not include a user id".to_string()))?;

        Ok(OtterSession::new(self.clone(), http, user_id, email.to_string()))
    }
}

/// Turn a failed response into an error.
pub(crate) async fn extract_error(response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        body
    };

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(message),
        _ => Error::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Builder for creating an OtterClient.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    page_size: u32,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: None,
        }
    }

    /// Set the API root. Defaults to [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the page size used when listing speeches.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<OtterClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        if self.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("otterbridge/{}", env!("CARGO_PKG_VERSION")));

        Ok(OtterClient {
            inner: Arc::new(ClientInner {
                base_url,
                timeout: self.timeout,
                page_size: self.page_size,
                user_agent,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_builder_defaults_to_otter() {
        let client = ClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8080/api")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:8080/api/");
        let url = client.url("/speeches").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/speeches");
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        assert!(ClientBuilder::new().base_url("not a url").build().is_err());
        assert!(ClientBuilder::new().page_size(0).build().is_err());
    }

    #[tokio::test]
    async fn test_login_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .and(query_param("username", "a@x.com"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "userid": 1234,
                "email": "a@x.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OtterClient::builder().base_url(server.uri()).build().unwrap();
        let session = client.login("a@x.com", "p").await.unwrap();

        assert_eq!(session.user_id(), "1234");
        assert_eq!(session.email(), "a@x.com");
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = OtterClient::builder().base_url(server.uri()).build().unwrap();
        let err = client.login("a@x.com", "wrong").await.unwrap_err();

        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_login_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = OtterClient::builder().base_url(server.uri()).build().unwrap();
        let err = client.login("a@x.com", "p").await.unwrap_err();

        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"userid": 1}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = OtterClient::builder()
            .base_url(server.uri())
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = client.login("a@x.com", "p").await.unwrap_err();

        assert!(err.is_timeout());
    }
}
