//! User-Agent "magic" used by the Gameforge client.
//!
//! The launcher hides a short digest of its certificate, version and
//! installation id inside the `User-Agent` header. Which hashes are combined,
//! and whether the head or the tail of the final digest is kept, depends on the
//! parity of the first digit in the installation id. Both branches are spelled
//! out separately since their differences are what the server checks.

use sha1::Sha1;
use sha2::{Digest, Sha256};

const MAGIC_LEN: usize = 8;

/// Hash recipe selected by the installation id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// No digit in the id, or the first digit is even
    Even,
    /// First digit is odd
    Odd,
}

impl Branch {
    pub fn for_installation_id(installation_id: &str) -> Self {
        match installation_id
            .chars()
            .find(char::is_ascii_digit)
            .and_then(|c| c.to_digit(10))
        {
            Some(digit) if digit % 2 == 1 => Self::Odd,
            _ => Self::Even,
        }
    }
}

/// Everything the magic is computed from
#[derive(Debug, Clone, Copy)]
pub struct FingerprintInput<'a> {
    /// First certificate block of the launcher bundle, PEM text as-is
    pub certificate: &'a [u8],
    pub chrome_version: &'a str,
    pub installation_id: &'a str,
}

impl FingerprintInput<'_> {
    pub fn branch(&self) -> Branch {
        Branch::for_installation_id(self.installation_id)
    }
}

fn sha1_hex(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn head(digest: &str) -> &str {
    &digest[..MAGIC_LEN]
}

fn tail(digest: &str) -> &str {
    &digest[digest.len() - MAGIC_LEN..]
}

/// Session-level magic: 8 lowercase hex characters
pub fn session_magic(input: &FingerprintInput<'_>, branch: Branch) -> String {
    match branch {
        Branch::Even => {
            let joined = [
                sha256_hex(input.certificate),
                sha1_hex(input.chrome_version.as_bytes()),
                sha256_hex(input.installation_id.as_bytes()),
            ]
            .concat();
            head(&sha256_hex(joined.as_bytes())).to_string()
        }
        Branch::Odd => {
            let joined = [
                sha1_hex(input.certificate),
                sha256_hex(input.chrome_version.as_bytes()),
                sha1_hex(input.installation_id.as_bytes()),
            ]
            .concat();
            tail(&sha256_hex(joined.as_bytes())).to_string()
        }
    }
}

/// Account-level magic: first two characters of the account id followed by
/// 8 lowercase hex characters
pub fn account_magic(input: &FingerprintInput<'_>, branch: Branch, account_id: &str) -> String {
    let prefix: String = account_id.chars().take(2).collect();

    match branch {
        Branch::Even => {
            let joined = [
                sha256_hex(input.certificate),
                sha1_hex(input.chrome_version.as_bytes()),
                sha256_hex(input.installation_id.as_bytes()),
                sha1_hex(account_id.as_bytes()),
            ]
            .concat();
            prefix + head(&sha256_hex(joined.as_bytes()))
        }
        Branch::Odd => {
            let joined = [
                sha1_hex(input.certificate),
                sha256_hex(input.chrome_version.as_bytes()),
                sha1_hex(input.installation_id.as_bytes()),
                sha256_hex(account_id.as_bytes()),
            ]
            .concat();
            prefix + tail(&sha256_hex(joined.as_bytes()))
        }
    }
}

/// `User-Agent` the launcher sends alongside a magic value
pub fn fingerprinted_user_agent(chrome_version: &str, magic: &str, gf_version: &str) -> String {
    format!("Chrome/{} ({}) GameforgeClient/{}", chrome_version, magic, gf_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CERT: &[u8] = b"-----BEGIN CERTIFICATE-----\nMIIBfixture\n-----END CERTIFICATE-----\n";
    const EVEN_ID: &str = "a2bcdef0-1111-2222-3333-444455556666";
    const ODD_ID: &str = "f3bcdef0-1111-2222-3333-444455556666";
    const NO_DIGIT_ID: &str = "abcdef-abcdef-abcdef";

    fn input(installation_id: &str) -> FingerprintInput<'_> {
        FingerprintInput {
            certificate: CERT,
            chrome_version: "C2.2.19.1700",
            installation_id,
        }
    }

    #[test]
    fn test_branch_selection() {
        assert_eq!(Branch::for_installation_id(EVEN_ID), Branch::Even);
        assert_eq!(Branch::for_installation_id(ODD_ID), Branch::Odd);
        assert_eq!(Branch::for_installation_id(NO_DIGIT_ID), Branch::Even);
        assert_eq!(Branch::for_installation_id("a0"), Branch::Even);
        assert_eq!(Branch::for_installation_id("zz9-2"), Branch::Odd);
        assert_eq!(Branch::for_installation_id(""), Branch::Even);
    }

    #[test]
    fn test_session_magic_known_vectors() {
        let even = input(EVEN_ID);
        let odd = input(ODD_ID);
        let none = input(NO_DIGIT_ID);

        assert_eq!(session_magic(&even, even.branch()), "4e065aa3");
        assert_eq!(session_magic(&odd, odd.branch()), "a7100c26");
        assert_eq!(session_magic(&none, none.branch()), "6cbc2a04");
    }

    #[test]
    fn test_session_magic_is_stable() {
        let input = input(EVEN_ID);
        let first = session_magic(&input, input.branch());
        for _ in 0..5 {
            assert_eq!(session_magic(&input, input.branch()), first);
        }
        assert_eq!(first.len(), MAGIC_LEN);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_branches_differ_for_same_input() {
        let input = input(EVEN_ID);
        assert_ne!(
            session_magic(&input, Branch::Even),
            session_magic(&input, Branch::Odd)
        );
    }

    #[test]
    fn test_account_magic_known_vectors() {
        let even = input(EVEN_ID);
        let odd = input(ODD_ID);
        let none = input(NO_DIGIT_ID);

        assert_eq!(account_magic(&even, even.branch(), "AB1234"), "AB7b3c4a50");
        assert_eq!(account_magic(&odd, odd.branch(), "AB1234"), "ABb55979de");
        assert_eq!(account_magic(&none, none.branch(), "AB1234"), "AB87ef01ee");
    }

    #[test]
    fn test_account_magic_prefix() {
        for id in [EVEN_ID, ODD_ID, NO_DIGIT_ID] {
            let input = input(id);
            let magic = account_magic(&input, input.branch(), "AB1234");
            assert!(magic.starts_with("AB"));
            assert_eq!(magic.len(), 2 + MAGIC_LEN);
        }
    }

    #[test]
    fn test_account_magic_short_account_id() {
        let input = input(EVEN_ID);
        let magic = account_magic(&input, input.branch(), "7");
        assert!(magic.starts_with('7'));
        assert_eq!(magic.len(), 1 + MAGIC_LEN);
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            fingerprinted_user_agent("C2.2.19.1700", "AB7b3c4a50", "2.2.19"),
            "Chrome/C2.2.19.1700 (AB7b3c4a50) GameforgeClient/2.2.19"
        );
    }
}
