//! Password hashing with PBKDF2-HMAC-SHA256 and per-credential random salts.
//!
//! ## Usage
//!
//! ```rust
//! let hasher = PasswordHasher::new(1000);
//! let hashed = hasher.hash_password("password123");
//! let credential = Credential::new("alice", hashed);
//! assert!(hasher.verify(&credential, "password123"));
//! ```
//!
//! The salt is 32 random bytes stored as standard base64 text, and the KDF is
//! fed the *text* of the salt. Stored hashes carry no version tag, so changing
//! the iteration count invalidates every existing credential.

use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;

/// Number of random bytes in a freshly generated salt.
pub const SALT_BYTES: usize = 32;

/// Length in bytes of the derived key before hex encoding.
const DERIVED_KEY_BYTES: usize = 32;

/// Salt fed to the KDF when there is no stored credential to check against,
/// so an unknown username costs the same as a wrong password.
const DUMMY_SALT: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

/// Stored credential for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
    pub salt: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, hashed: HashedPassword) -> Self {
        Self {
            username: username.into(),
            password_hash: hashed.hash,
            salt: hashed.salt,
        }
    }
}

/// Output of `PasswordHasher::hash_password`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword {
    /// Hex-encoded derived key.
    pub hash: String,
    /// Base64-encoded random salt.
    pub salt: String,
}

/// Salted, iterated password hashing policy.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Hashes `plaintext` under a newly generated salt.
    pub fn hash_password(&self, plaintext: &str) -> HashedPassword {
        let salt = generate_salt();
        let hash = self.derive(plaintext, &salt);
        HashedPassword { hash, salt }
    }

    /// Checks `attempt` against a stored credential.
    ///
    /// The derived digests are compared in constant time.
    pub fn verify(&self, stored: &Credential, attempt: &str) -> bool {
        let computed = self.derive(attempt, &stored.salt);
        constant_time_eq(computed.as_bytes(), stored.password_hash.as_bytes())
    }

    /// Runs the KDF once against a fixed salt and discards the result.
    ///
    /// Called when no credential exists for a username so the failure path
    /// costs the same as a password mismatch.
    pub fn burn(&self, attempt: &str) {
        let _ = self.derive(attempt, DUMMY_SALT);
    }

    fn derive(&self, plaintext: &str, salt: &str) -> String {
        let mut key = [0u8; DERIVED_KEY_BYTES];
        pbkdf2::pbkdf2_hmac::<Sha256>(
            plaintext.as_bytes(),
            salt.as_bytes(),
            self.iterations,
            &mut key,
        );
        hex::encode(key)
    }
}

/// Generate a random salt (base64-encoded).
fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    general_purpose::STANDARD.encode(bytes)
}

/// Constant-time byte comparison to prevent timing attacks.
///
/// Only the length is allowed to leak, and both sides here are fixed-length
/// hex digests.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
