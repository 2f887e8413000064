use md5::{Digest, Md5};
use uuid::Uuid;

/// Derive the installation id the launcher reports for a credential pair.
///
/// The MD5 digest of `username + password` is read as a little-endian UUID
/// (first three fields byte-swapped) with no version/variant bits applied.
/// Identical credentials always map to the same id, which the remote side uses
/// to attribute repeated logins to one device.
pub fn derive_installation_id(username: &str, password: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(username.as_bytes());
    hasher.update(password.as_bytes());
    let digest: [u8; 16] = hasher.finalize().into();

    Uuid::from_bytes_le(digest).hyphenated().to_string()
}
