use std::collections::BTreeMap;

use rand::Rng;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::certificate::{CertificateBundle, CertificateProvider};
use crate::codec;
use crate::config::{official, LauncherConfig};
use crate::errors::{GfAuthError, Result};
use crate::fingerprint::{self, Branch, FingerprintInput};
use crate::identity::derive_installation_id;
use crate::models::*;
use crate::session::{Credentials, Session};
use crate::telemetry::TelemetryBeacon;

/// Turn an unexpected response into a `RemoteRejection`
pub(crate) async fn reject(
    response: Response,
    endpoint: &'static str,
    expected: StatusCode,
) -> GfAuthError {
    let actual = response.status();
    let body = response.text().await.unwrap_or_default();

    GfAuthError::RemoteRejection {
        endpoint,
        expected,
        actual,
        body_snippet: body.chars().take(200).collect(),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, endpoint: &'static str) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| GfAuthError::MalformedResponse(format!("{}: {}", endpoint, e)))
}

/// Game-session identifier sent with a thin code request: `<uuid>-<4 digits>`
fn generate_gsid() -> String {
    format!("{}-{}", Uuid::new_v4(), rand::rng().random_range(1000..=9999))
}

/// Main client for the Gameforge launcher handshake
#[derive(Debug)]
pub struct SessionClient {
    config: LauncherConfig,
    certificate: CertificateBundle,
    session: Session,
    http: Client,
    telemetry: TelemetryBeacon,
}

impl SessionClient {
    /// Create a new client around an already loaded certificate bundle
    pub fn new(config: LauncherConfig, certificate: CertificateBundle) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.http_timeouts.connect)
            .timeout(config.http_timeouts.request)
            .build()?;
        let telemetry = TelemetryBeacon::new(&config, &certificate)?;
        let session = Session::new(config.installation_id.clone());

        Ok(Self {
            config,
            certificate,
            session,
            http,
            telemetry,
        })
    }

    /// Create a new client, pulling the certificate bundle from `provider`
    pub async fn with_certificate_provider(
        config: LauncherConfig,
        provider: &dyn CertificateProvider,
    ) -> Result<Self> {
        let certificate = CertificateBundle::load(provider).await?;
        Self::new(config, certificate)
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn installation_id(&self) -> Option<&str> {
        self.session.installation_id()
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.session.bearer_token()
    }

    /// Log in with platform credentials.
    ///
    /// Sends the start-time event first; the login request is never issued if
    /// that fails. Session state is only updated once the whole call succeeded.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let credentials = Credentials::new(username, password);
        let installation_id = match self.session.installation_id() {
            Some(id) => id.to_string(),
            None => derive_installation_id(username, password),
        };
        debug!(%installation_id, "Starting authentication");

        // Step 1: Start-time ping
        self.telemetry.send_start_time(&installation_id).await?;

        // Step 2: Session login
        let token = self.login(&credentials, &installation_id).await?;

        self.session.commit_login(installation_id, credentials, token);
        info!("Authenticated {}", username);
        Ok(())
    }

    #[instrument(skip(self, credentials))]
    async fn login(&self, credentials: &Credentials, installation_id: &str) -> Result<String> {
        let request = SessionLoginRequest {
            email: &credentials.username,
            locale: &self.config.locale,
            password: &credentials.password,
        };

        debug!("Creating platform session");
        let response = self
            .http
            .post(self.config.endpoints.auth_sessions()?)
            .header("User-Agent", official::BROWSER_USER_AGENT)
            .header(official::INSTALLATION_ID_HEADER, installation_id)
            .header("Origin", official::ORIGIN)
            .json(&request)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            warn!("Session login rejected: {}", response.status());
            return Err(reject(response, "auth/sessions", StatusCode::CREATED).await);
        }

        let login: SessionLoginResponse = read_json(response, "auth/sessions").await?;
        Ok(login.token)
    }

    /// List the game accounts bound to the logged-in user.
    ///
    /// Ordering is not meaningful.
    #[instrument(skip(self))]
    pub async fn list_accounts(&self) -> Result<Vec<GameAccount>> {
        let token = self.session.require_bearer_token()?;
        let installation_id = self.session.require_installation_id()?;

        debug!("Fetching game accounts");
        let response = self
            .http
            .get(self.config.endpoints.user_accounts()?)
            .header("User-Agent", official::BROWSER_USER_AGENT)
            .header(official::INSTALLATION_ID_HEADER, installation_id)
            .header("Origin", official::ORIGIN)
            .header("Authorization", format!("Bearer {}", token))
            .header("Connection", "Keep-Alive")
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            warn!("Account listing rejected: {}", response.status());
            return Err(reject(response, "user/accounts", StatusCode::OK).await);
        }

        let entries: BTreeMap<String, AccountEntry> = read_json(response, "user/accounts").await?;
        let accounts: Vec<GameAccount> = entries
            .into_iter()
            .map(|(id, entry)| GameAccount {
                id,
                display_name: entry.display_name,
            })
            .collect();

        debug!("Found {} game accounts", accounts.len());
        Ok(accounts)
    }

    /// Exchange the bearer token for a one-time game code.
    ///
    /// With `raw` the code is returned as issued, otherwise hex-encoded.
    #[instrument(skip(self))]
    pub async fn fetch_code(&self, account_id: &str, raw: bool) -> Result<String> {
        let token = self.session.require_bearer_token()?;
        let installation_id = self.session.require_installation_id()?;

        let user_agent = self.account_user_agent(account_id)?;
        let request = ThinCodeRequest {
            platform_game_account_id: account_id,
            gsid: generate_gsid(),
        };

        debug!("Requesting thin code");
        let response = self
            .http
            .post(self.config.endpoints.thin_codes()?)
            .header("User-Agent", user_agent)
            .header(official::INSTALLATION_ID_HEADER, installation_id)
            .header("Origin", official::ORIGIN)
            .header("Authorization", format!("Bearer {}", token))
            .header("Connection", "Keep-Alive")
            .json(&request)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            warn!("Thin code request rejected: {}", response.status());
            return Err(reject(response, "auth/thin/codes", StatusCode::CREATED).await);
        }

        let thin: ThinCodeResponse = read_json(response, "auth/thin/codes").await?;
        if raw {
            Ok(thin.code)
        } else {
            Ok(codec::encode(&thin.code))
        }
    }

    fn fingerprint_input(&self) -> Result<FingerprintInput<'_>> {
        Ok(FingerprintInput {
            certificate: self.certificate.certificate(),
            chrome_version: &self.config.chrome_version,
            installation_id: self.session.require_installation_id()?,
        })
    }

    /// Branch of the magic formula this installation uses
    pub fn branch(&self) -> Result<Branch> {
        Ok(self.fingerprint_input()?.branch())
    }

    /// Session-level User-Agent magic
    pub fn session_magic(&self) -> Result<String> {
        let input = self.fingerprint_input()?;
        Ok(fingerprint::session_magic(&input, input.branch()))
    }

    /// Account-level User-Agent magic
    pub fn account_magic(&self, account_id: &str) -> Result<String> {
        let input = self.fingerprint_input()?;
        Ok(fingerprint::account_magic(&input, input.branch(), account_id))
    }

    pub fn session_user_agent(&self) -> Result<String> {
        Ok(fingerprint::fingerprinted_user_agent(
            &self.config.chrome_version,
            &self.session_magic()?,
            &self.config.gf_version,
        ))
    }

    pub fn account_user_agent(&self, account_id: &str) -> Result<String> {
        Ok(fingerprint::fingerprinted_user_agent(
            &self.config.chrome_version,
            &self.account_magic(account_id)?,
            &self.config.gf_version,
        ))
    }
}
