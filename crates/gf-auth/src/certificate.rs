use std::path::{Path, PathBuf};

use crate::errors::{GfAuthError, Result};

const BEGIN_CERTIFICATE: &[u8] = b"-----BEGIN CERTIFICATE-----";
const END_CERTIFICATE: &[u8] = b"-----END CERTIFICATE-----";
const PRIVATE_KEY_MARKER: &[u8] = b"PRIVATE KEY-----";

/// Trait for providing the launcher's PEM certificate bundle
///
/// The bundle is shipped with the official client; how it gets to us
/// (file on disk, embedded asset, keychain...) is up to the caller.
#[async_trait::async_trait]
pub trait CertificateProvider: Send + Sync {
    /// Load the raw PEM bundle
    async fn load_pem(&self) -> Result<Vec<u8>>;
}

/// Provider for bytes already held in memory
#[derive(Debug, Clone)]
pub struct StaticCertificateProvider {
    pem: Vec<u8>,
}

impl StaticCertificateProvider {
    pub fn new(pem: impl Into<Vec<u8>>) -> Self {
        Self { pem: pem.into() }
    }
}

#[async_trait::async_trait]
impl CertificateProvider for StaticCertificateProvider {
    async fn load_pem(&self) -> Result<Vec<u8>> {
        Ok(self.pem.clone())
    }
}

/// Provider reading the bundle from a file
#[derive(Debug, Clone)]
pub struct FileCertificateProvider {
    path: PathBuf,
}

impl FileCertificateProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl CertificateProvider for FileCertificateProvider {
    async fn load_pem(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            GfAuthError::Configuration(format!(
                "Failed to read certificate bundle {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Launcher certificate bundle
///
/// `certificate` is the first certificate block of the bundle, including the
/// single byte that follows its END marker (the line break in practice). That
/// exact slice is what gets hashed into the User-Agent magic and what the
/// telemetry channel trusts.
#[derive(Clone, PartialEq, Eq)]
pub struct CertificateBundle {
    pem: Vec<u8>,
    certificate: Vec<u8>,
}

impl CertificateBundle {
    pub fn from_pem(pem: impl Into<Vec<u8>>) -> Result<Self> {
        let pem = pem.into();

        let start = find(&pem, BEGIN_CERTIFICATE, 0).ok_or_else(|| {
            GfAuthError::Configuration("No certificate found in PEM bundle".to_string())
        })?;
        let end = find(&pem, END_CERTIFICATE, start).ok_or_else(|| {
            GfAuthError::Configuration("Unterminated certificate in PEM bundle".to_string())
        })?;
        let stop = (end + END_CERTIFICATE.len() + 1).min(pem.len());

        let certificate = pem[start..stop].to_vec();
        Ok(Self { pem, certificate })
    }

    pub async fn load(provider: &dyn CertificateProvider) -> Result<Self> {
        Self::from_pem(provider.load_pem().await?)
    }

    /// The complete bundle as supplied
    pub fn pem(&self) -> &[u8] {
        &self.pem
    }

    /// First certificate block
    pub fn certificate(&self) -> &[u8] {
        &self.certificate
    }

    /// Whether the bundle also carries a client key for mutual TLS
    pub fn has_private_key(&self) -> bool {
        find(&self.pem, PRIVATE_KEY_MARKER, 0).is_some()
    }
}

impl std::fmt::Debug for CertificateBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateBundle")
            .field("pem_len", &self.pem.len())
            .field("certificate_len", &self.certificate.len())
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|position| position + from)
}
