//! Gameforge launcher authentication for third-party launchers
//!
//! This crate reproduces the identity handshake the official Gameforge client
//! performs before starting a game, ending with the one-time code the game
//! executable accepts.
//!
//! # Authentication Flow
//!
//! 1. Installation id: supplied by the caller or derived from the credentials
//! 2. Start-time event sent to the events host over a certificate-pinned channel
//! 3. Session login, yielding a bearer token
//! 4. Game account listing
//! 5. Thin code exchange, signed with the account-level User-Agent magic
//!
//! Every step needs the output of the previous one and the remote side
//! silently rejects requests whose headers or payloads differ from what the
//! official client sends.
//!
//! # Example
//!
//! ```no_run
//! use gf_auth::{FileCertificateProvider, LauncherConfig, SessionClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = LauncherConfig::new("en_US", "en");
//!     let provider = FileCertificateProvider::new("all_certs.pem");
//!     let mut client = SessionClient::with_certificate_provider(config, &provider).await?;
//!
//!     client.authenticate("user@example.com", "secret").await?;
//!
//!     for account in client.list_accounts().await? {
//!         println!("{} ({})", account.display_name, account.id);
//!     }
//!
//!     let code = client.fetch_code("1001", false).await?;
//!     println!("Pass this to the game: {}", code);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Important Notes
//!
//! - The installation id for a credential pair never changes; reuse it across runs
//! - Bearer tokens are not refreshed, an expired one shows up as a rejection
//! - Nothing is retried internally, see [`GfAuthError::is_retryable`]

pub mod certificate;
pub mod client;
pub mod codec;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod identity;
pub mod models;
pub mod session;
pub mod telemetry;

// Re-export main types
pub use certificate::{
    CertificateBundle, CertificateProvider, FileCertificateProvider, StaticCertificateProvider,
};
pub use client::SessionClient;
pub use config::{Endpoints, HttpTimeouts, LauncherConfig};
pub use errors::{GfAuthError, Result};
pub use fingerprint::{Branch, FingerprintInput};
pub use identity::derive_installation_id;
pub use models::GameAccount;
pub use session::{Credentials, Session};
pub use telemetry::TelemetryBeacon;
