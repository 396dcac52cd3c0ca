//! HTTP client for the Otter.ai transcription API.
//!
//! Logging in produces an [`OtterSession`]: a cookie-carrying client bound to
//! one account, exposed to the rest of the system as a read-only
//! [`TranscriptApi`]. [`OtterAuthenticator`] plugs the login into the
//! session cache so sessions are shared between requests.
//!
//! # Example
//!
//! ```no_run
//! use otterbridge_client::{OtterClient, Result, TranscriptApi};
//!
//! # async fn example() -> Result<()> {
//! let client = OtterClient::builder()
//!     .base_url("https://otter.ai/forward/api/v1/")
//!     .build()?;
//!
//! let session = client.login("me@example.com", "hunter2").await?;
//! for speech in session.speeches().await? {
//!     println!("{}: {:?}", speech.speech_id, speech.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use api::{SharedTranscriptApi, TranscriptApi};
pub use auth::OtterAuthenticator;
pub use client::{ClientBuilder, DEFAULT_BASE_URL, OtterClient};
pub use error::{Error, Result};
pub use session::OtterSession;
pub use types::*;
