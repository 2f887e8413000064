use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::errors::{GfAuthError, Result};

/// Gameforge service endpoints
pub mod endpoints {
    pub const SPARK_BASE: &str = "https://spark.gameforge.com";
    pub const EVENTS_BASE: &str = "https://events.gameforge.com";
    pub const AUTH_SESSIONS: &str = "/api/v1/auth/sessions";
    pub const USER_ACCOUNTS: &str = "/api/v1/user/accounts";
    pub const THIN_CODES: &str = "/api/v1/auth/thin/codes";
}

/// Values the official launcher sends verbatim
pub mod official {
    pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
                                          (KHTML, like Gecko) Chrome/72.0.3626.121 Safari/537.36";
    pub const ORIGIN: &str = "spark://www.gameforge.com";
    pub const INSTALLATION_ID_HEADER: &str = "TNT-Installation-Id";

    /// Start-time event constants
    pub const TELEMETRY_LOCALE: &str = "pol_pol";
    pub const TELEMETRY_BRANCH: &str = "master";
    pub const TELEMETRY_COMMIT_ID: &str = "27942713";
}

pub const DEFAULT_CHROME_VERSION: &str = "C2.2.19.1700";
pub const DEFAULT_GF_VERSION: &str = "2.2.19";
pub const DEFAULT_LOCALE: &str = "en_US";
pub const DEFAULT_LANGUAGE: &str = "en";

/// File name looked up inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "launcher.toml";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            request: Duration::from_secs(30),
        }
    }
}

/// Base URLs of the two Gameforge hosts the handshake talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub spark: Url,
    pub events: Url,
}

impl Endpoints {
    pub fn new(spark: &str, events: &str) -> Result<Self> {
        Ok(Self {
            spark: Url::parse(spark)?,
            events: Url::parse(events)?,
        })
    }

    pub fn auth_sessions(&self) -> Result<Url> {
        Ok(self.spark.join(endpoints::AUTH_SESSIONS)?)
    }

    pub fn user_accounts(&self) -> Result<Url> {
        Ok(self.spark.join(endpoints::USER_ACCOUNTS)?)
    }

    pub fn thin_codes(&self) -> Result<Url> {
        Ok(self.spark.join(endpoints::THIN_CODES)?)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            spark: Url::parse(endpoints::SPARK_BASE).expect("valid spark URL"),
            events: Url::parse(endpoints::EVENTS_BASE).expect("valid events URL"),
        }
    }
}

/// Configuration for SessionClient
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Locale sent with the login request (e.g. `en_US`)
    pub locale: String,

    /// Game language tag
    pub language: String,

    /// Launcher chrome version, first character is a channel marker (`C2.2.19.1700`)
    pub chrome_version: String,

    /// Gameforge client version
    pub gf_version: String,

    /// Caller-supplied installation id; derived from credentials when absent
    pub installation_id: Option<String>,

    /// PEM bundle with the launcher certificate
    pub certificate_path: Option<PathBuf>,

    pub endpoints: Endpoints,

    pub http_timeouts: HttpTimeouts,
}

impl LauncherConfig {
    pub fn new(locale: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            language: language.into(),
            chrome_version: DEFAULT_CHROME_VERSION.to_string(),
            gf_version: DEFAULT_GF_VERSION.to_string(),
            installation_id: None,
            certificate_path: None,
            endpoints: Endpoints::default(),
            http_timeouts: HttpTimeouts::default(),
        }
    }

    pub fn with_installation_id(mut self, installation_id: impl Into<String>) -> Self {
        self.installation_id = Some(installation_id.into());
        self
    }

    pub fn with_versions(
        mut self,
        chrome_version: impl Into<String>,
        gf_version: impl Into<String>,
    ) -> Self {
        self.chrome_version = chrome_version.into();
        self.gf_version = gf_version.into();
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Parse a `launcher.toml` document, filling unset fields with defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: LauncherConfigFile = toml::from_str(content)
            .map_err(|e| GfAuthError::Configuration(format!("Invalid launcher config: {}", e)))?;
        file.into_config()
    }

    /// Load configuration from a TOML file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading launcher config from {}", path.display());

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            GfAuthError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Get default config file location for the current platform
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("com", "gflauncher", "gflauncher")
            .ok_or_else(|| {
                GfAuthError::Configuration("Could not determine config directory".to_string())
            })?;

        Ok(project_dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE, DEFAULT_LANGUAGE)
    }
}

/// On-disk shape of `launcher.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LauncherConfigFile {
    locale: Option<String>,
    language: Option<String>,
    chrome_version: Option<String>,
    gf_version: Option<String>,
    installation_id: Option<String>,
    certificate_path: Option<PathBuf>,
    endpoints: EndpointsFile,
    timeouts: TimeoutsFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EndpointsFile {
    spark: Option<String>,
    events: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TimeoutsFile {
    connect_secs: Option<u64>,
    request_secs: Option<u64>,
}

impl LauncherConfigFile {
    fn into_config(self) -> Result<LauncherConfig> {
        let mut config = LauncherConfig::new(
            self.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            self.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        );

        if let Some(chrome_version) = self.chrome_version {
            config.chrome_version = chrome_version;
        }
        if let Some(gf_version) = self.gf_version {
            config.gf_version = gf_version;
        }
        config.installation_id = self.installation_id;
        config.certificate_path = self.certificate_path;

        config.endpoints = Endpoints::new(
            self.endpoints.spark.as_deref().unwrap_or(endpoints::SPARK_BASE),
            self.endpoints.events.as_deref().unwrap_or(endpoints::EVENTS_BASE),
        )?;

        if let Some(secs) = self.timeouts.connect_secs {
            config.http_timeouts.connect = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeouts.request_secs {
            config.http_timeouts.request = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
