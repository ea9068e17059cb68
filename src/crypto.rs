//! At-rest obfuscation of the settings API key.
//!
//! Derives a fixed AES-256 key via PBKDF2-HMAC-SHA256 from a passphrase and
//! salt embedded in the binary, then seals values with AES-GCM. Because the
//! passphrase ships with the application, this protects the stored key from
//! casual inspection of the persisted file only — anyone with the source can
//! derive the same key. Callers rely on exactly that threat model; do not
//! swap this for per-user key material without changing the store contract.
//!
//! The public [`encrypt`]/[`decrypt`] functions never fail: encryption
//! errors degrade to storing the plaintext (logged), and decryption errors
//! return the input unchanged because a stored value may be legacy
//! plaintext from a pre-encryption version. Both wrap `Result`-returning
//! internals so the fallback branches stay testable.

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, KeyInit, Nonce};
use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use std::sync::OnceLock;
use tracing::warn;

const PASSPHRASE: &[u8] = b"super-secret-key-for-raginfo-app";
const SALT: &[u8] = b"some-random-salt";
const PBKDF2_ITERATIONS: u32 = 100_000;

/// AES-GCM nonce length. A fresh random nonce prefixes every ciphertext.
const NONCE_LEN: usize = 12;

/// Derive the fixed 256-bit key. Deterministic, so it is computed once and
/// cached for the process lifetime.
pub fn derive_key() -> &'static [u8; 32] {
    static KEY: OnceLock<[u8; 32]> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut key = [0u8; 32];
        pbkdf2_hmac::<Sha256>(PASSPHRASE, SALT, PBKDF2_ITERATIONS, &mut key);
        key
    })
}

fn cipher() -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(derive_key()).map_err(|e| anyhow!("AES key init failed: {e}"))
}

/// Encrypt `plaintext` to `base64(nonce || ciphertext || tag)`.
pub(crate) fn try_encrypt(plaintext: &str) -> Result<String> {
    let cipher = cipher()?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| anyhow!("AES-GCM encrypt failed: {e}"))?;

    let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(&nonce);
    combined.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(combined))
}

/// Decrypt a blob produced by [`try_encrypt`].
pub(crate) fn try_decrypt(blob: &str) -> Result<String> {
    let combined = BASE64.decode(blob).context("not valid base64")?;
    if combined.len() < NONCE_LEN {
        bail!("blob shorter than the {NONCE_LEN}-byte nonce");
    }
    let (nonce, ciphertext) = combined.split_at(NONCE_LEN);
    let plaintext = cipher()?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|e| anyhow!("AES-GCM decrypt failed: {e}"))?;
    String::from_utf8(plaintext).context("decrypted bytes are not UTF-8")
}

/// Encrypt a value for persistence. On internal failure the plaintext is
/// returned unchanged so a save never loses data.
pub fn encrypt(plaintext: &str) -> String {
    match try_encrypt(plaintext) {
        Ok(blob) => blob,
        Err(e) => {
            warn!("encryption failed, storing value in cleartext: {e:#}");
            plaintext.to_string()
        }
    }
}

/// Decrypt a persisted value. Empty input yields an empty string. Any
/// failure (malformed base64, truncated blob, tag mismatch) returns the
/// input unchanged — expected whenever the stored value is legacy
/// plaintext rather than a blob produced by [`encrypt`].
pub fn decrypt(blob: &str) -> String {
    if blob.is_empty() {
        return String::new();
    }
    match try_decrypt(blob) {
        Ok(plaintext) => plaintext,
        Err(_) => blob.to_string(),
    }
}
