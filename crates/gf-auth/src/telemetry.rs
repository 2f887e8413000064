use chrono::{DateTime, FixedOffset, Utc};
use rand::Rng;
use reqwest::{Certificate, Client, Identity, StatusCode};
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::certificate::CertificateBundle;
use crate::client::reject;
use crate::config::{official, HttpTimeouts, LauncherConfig};
use crate::errors::{GfAuthError, Result};
use crate::models::{ClientVersionInfo, StartTimeEvent};

/// The events host expects a Central European wall clock
const LOCAL_TIME_OFFSET_SECS: i32 = 3600;

/// `2024-01-02T03:04:05+0100`
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Plausible launcher start-up duration in milliseconds
const START_TIME_RANGE: std::ops::Range<u32> = 1500..10000;

/// Build an HTTP client that only trusts the launcher certificate.
///
/// System roots are disabled, so nothing but the bundled certificate can
/// validate the server. When the bundle carries a private key it is also
/// presented as the client identity.
pub fn pinned_client(bundle: &CertificateBundle, timeouts: &HttpTimeouts) -> Result<Client> {
    let root = Certificate::from_pem(bundle.certificate()).map_err(|e| {
        GfAuthError::Configuration(format!("Invalid launcher certificate: {}", e))
    })?;

    let mut builder = Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.request)
        .tls_built_in_root_certs(false)
        .add_root_certificate(root);

    if bundle.has_private_key() {
        let identity = Identity::from_pem(bundle.pem()).map_err(|e| {
            GfAuthError::Configuration(format!("Invalid launcher client identity: {}", e))
        })?;
        builder = builder.identity(identity);
    }

    builder
        .build()
        .map_err(|e| GfAuthError::Configuration(format!("Failed to build pinned client: {}", e)))
}

/// Render a timestamp the way the launcher reports `localtime`
pub fn format_local_time(now: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(LOCAL_TIME_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).format(LOCAL_TIME_FORMAT).to_string(),
        None => now.format(LOCAL_TIME_FORMAT).to_string(),
    }
}

impl StartTimeEvent {
    /// Fresh event with a one-shot session id and a random start time
    pub fn new(installation_id: &str, chrome_version: &str) -> Self {
        // Chrome version carries a channel letter the events host doesn't want
        let version = chrome_version.chars().skip(1).collect();

        Self {
            client_installation_id: installation_id.to_string(),
            client_locale: official::TELEMETRY_LOCALE,
            client_session_id: Uuid::new_v4().to_string(),
            client_version_info: ClientVersionInfo {
                branch: official::TELEMETRY_BRANCH,
                commit_id: official::TELEMETRY_COMMIT_ID,
                version,
            },
            id: 0,
            localtime: format_local_time(Utc::now()),
            start_count: 1,
            start_time: rand::rng().random_range(START_TIME_RANGE),
            kind: "start_time",
        }
    }
}

/// Sends the start-time ping the backend requires before a login
#[derive(Debug, Clone)]
pub struct TelemetryBeacon {
    http: Client,
    endpoint: Url,
    chrome_version: String,
    gf_version: String,
}

impl TelemetryBeacon {
    pub fn new(config: &LauncherConfig, bundle: &CertificateBundle) -> Result<Self> {
        Ok(Self {
            http: pinned_client(bundle, &config.http_timeouts)?,
            endpoint: config.endpoints.events.clone(),
            chrome_version: config.chrome_version.clone(),
            gf_version: config.gf_version.clone(),
        })
    }

    #[instrument(skip(self))]
    pub async fn send_start_time(&self, installation_id: &str) -> Result<()> {
        let event = StartTimeEvent::new(installation_id, &self.chrome_version);

        debug!("Sending start-time event");
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("User-Agent", format!("GameforgeClient/{}", self.gf_version))
            .header("Content-Type", "application/json")
            .header("Connection", "Keep-Alive")
            .body(serde_json::to_vec(&event)?)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            warn!("Events host rejected start-time event: {}", response.status());
            return Err(reject(response, "events", StatusCode::OK).await);
        }

        Ok(())
    }
}
