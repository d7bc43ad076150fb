//! Passphrase encryption using AES-256-GCM.
//!
//! The AES key is derived from the caller's passphrase with
//! PBKDF2-HMAC-SHA256 and a fresh random salt per call.
//!
//! ## Sealed Layout
//! ```text
//! ┌───────────┬────────────┬──────────────────────┬──────────┐
//! │ Salt (16) │ Nonce (12) │ Ciphertext (n)       │ Tag (16) │
//! └───────────┴────────────┴──────────────────────┴──────────┘
//! ```
//!
//! A wrong passphrase fails tag verification and is reported as
//! [`DepotError::AuthenticationFailed`], never as a decode error further down.

use std::num::NonZeroU32;

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{DepotError, Result};

/// Salt length for key derivation
pub const SALT_LEN: usize = 16;

/// AES-256 key length
pub const KEY_LEN: usize = 32;

/// GCM authentication tag length
pub const TAG_LEN: usize = 16;

/// Bytes preceding the ciphertext: salt + nonce
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// Encrypt `plaintext` under a key derived from `passphrase`
pub fn encrypt(plaintext: &[u8], passphrase: &str, iterations: NonZeroU32) -> Result<Vec<u8>> {
    check_passphrase(passphrase)?;

    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill(&mut salt)
        .and_then(|_| rng.fill(&mut nonce))
        .map_err(|_| DepotError::Encryption("random number generation failed".to_string()))?;

    let key = derive_key(passphrase, &salt, iterations)?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce),
        Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| DepotError::Encryption("AES-GCM seal failed".to_string()))?;

    let mut sealed = Vec::with_capacity(HEADER_LEN + in_out.len());
    sealed.extend_from_slice(&salt);
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&in_out);
    Ok(sealed)
}

/// Decrypt a buffer produced by [`encrypt`]
pub fn decrypt(sealed: &[u8], passphrase: &str, iterations: NonZeroU32) -> Result<Vec<u8>> {
    check_passphrase(passphrase)?;

    if sealed.len() < HEADER_LEN + TAG_LEN {
        return Err(DepotError::Decryption(format!(
            "sealed payload too short: {} bytes, need at least {}",
            sealed.len(),
            HEADER_LEN + TAG_LEN
        )));
    }

    let (salt, rest) = sealed.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce)
        .map_err(|_| DepotError::Decryption("invalid nonce".to_string()))?;

    let key = derive_key(passphrase, salt, iterations)?;

    let mut in_out = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| DepotError::AuthenticationFailed)?;
    Ok(plaintext.to_vec())
}

fn derive_key(passphrase: &str, salt: &[u8], iterations: NonZeroU32) -> Result<LessSafeKey> {
    let mut key_bytes = [0u8; KEY_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        passphrase.as_bytes(),
        &mut key_bytes,
    );

    let unbound = UnboundKey::new(&AES_256_GCM, &key_bytes)
        .map_err(|_| DepotError::Encryption("invalid AES key length".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

fn check_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.is_empty() {
        return Err(DepotError::IllegalParameter(
            "Encryption key must not be empty".to_string(),
        ));
    }
    Ok(())
}
