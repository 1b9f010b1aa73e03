//! Deterministic, reversible secret codec
//!
//! Stored emails must be searchable, so equal plaintexts have to produce
//! equal ciphertexts. The codec uses AES-256-GCM with a synthetic nonce
//! taken from an HMAC of the plaintext: encryption is deterministic, and
//! any tampering with the output is rejected by the GCM tag.
//!
//! Output layout: `base64url(nonce[12] || ciphertext || tag[16])`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::DomainError;

type HmacSha256 = Hmac<Sha256>;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Reversible encoding of short secrets (emails, reset payloads)
pub trait SecretCodec: Send + Sync {
    /// Encrypt a plaintext; equal inputs yield equal outputs
    fn encrypt(&self, plaintext: &str) -> Result<String, DomainError>;

    /// Decrypt a value produced by [`SecretCodec::encrypt`]
    fn decrypt(&self, ciphertext: &str) -> Result<String, DomainError>;
}

/// AES-256-GCM codec with HMAC-derived synthetic nonces
#[derive(Clone)]
pub struct AesSivCodec {
    cipher: Aes256Gcm,
    nonce_key: [u8; 32],
}

impl std::fmt::Debug for AesSivCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesSivCodec").finish_non_exhaustive()
    }
}

impl AesSivCodec {
    /// Derive the encryption and nonce keys from the application secret and salt
    pub fn new(secret: &str, salt: &str) -> Result<Self, DomainError> {
        if secret.is_empty() {
            return Err(DomainError::configuration("Codec secret cannot be empty"));
        }

        let encryption_key = derive_key(secret, salt, b"pmp-accounts/encryption")?;
        let nonce_key = derive_key(secret, salt, b"pmp-accounts/nonce")?;

        let cipher = Aes256Gcm::new_from_slice(&encryption_key)
            .map_err(|e| DomainError::crypto(format!("Invalid encryption key: {}", e)))?;

        Ok(Self { cipher, nonce_key })
    }

    fn synthetic_nonce(&self, plaintext: &[u8]) -> Result<[u8; NONCE_LEN], DomainError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.nonce_key)
            .map_err(|e| DomainError::crypto(format!("Invalid nonce key: {}", e)))?;
        mac.update(plaintext);
        let digest = mac.finalize().into_bytes();

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
        Ok(nonce)
    }
}

impl SecretCodec for AesSivCodec {
    fn encrypt(&self, plaintext: &str) -> Result<String, DomainError> {
        let nonce_bytes = self.synthetic_nonce(plaintext.as_bytes())?;

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| DomainError::crypto(format!("Encryption failed: {}", e)))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(combined))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, DomainError> {
        let combined = URL_SAFE_NO_PAD
            .decode(ciphertext.trim())
            .map_err(|e| DomainError::crypto(format!("Ciphertext is not valid base64: {}", e)))?;

        if combined.len() < NONCE_LEN + TAG_LEN {
            return Err(DomainError::crypto("Ciphertext too short"));
        }

        let (nonce_bytes, sealed) = combined.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|_| DomainError::crypto("Ciphertext failed authentication"))?;

        if self.synthetic_nonce(&plaintext)?.as_slice() != nonce_bytes {
            return Err(DomainError::crypto("Ciphertext nonce does not match its content"));
        }

        String::from_utf8(plaintext)
            .map_err(|e| DomainError::crypto(format!("Decrypted value is not valid UTF-8: {}", e)))
    }
}

fn derive_key(secret: &str, salt: &str, purpose: &[u8]) -> Result<[u8; 32], DomainError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|e| DomainError::crypto(format!("Invalid secret: {}", e)))?;
    mac.update(purpose);
    mac.update(b":");
    mac.update(salt.as_bytes());

    let mut key = [0u8; 32];
    key.copy_from_slice(&mac.finalize().into_bytes());
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> AesSivCodec {
        AesSivCodec::new("a]vt!MFX8H-e!4igKa5)Tu.{ec:2$z%n", "10").unwrap()
    }

    #[test]
    fn test_encrypt_decrypt() {
        let codec = codec();

        let encrypted = codec.encrypt("ada@example.com").unwrap();
        assert_ne!(encrypted, "ada@example.com");
        assert_eq!(codec.decrypt(&encrypted).unwrap(), "ada@example.com");
    }

    #[test]
    fn test_encryption_is_deterministic() {
        let codec = codec();

        assert_eq!(
            codec.encrypt("ada@example.com").unwrap(),
            codec.encrypt("ada@example.com").unwrap()
        );
        assert_ne!(
            codec.encrypt("ada@example.com").unwrap(),
            codec.encrypt("grace@example.com").unwrap()
        );
    }

    #[test]
    fn test_output_is_url_safe() {
        let encrypted = codec().encrypt(r#"{"id":"x","email":"a+b@example.com"}"#).unwrap();
        assert!(
            encrypted
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let codec = codec();
        let encrypted = codec.encrypt("ada@example.com").unwrap();

        let mut bytes = URL_SAFE_NO_PAD.decode(&encrypted).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(bytes);

        assert!(codec.decrypt(&tampered).is_err());
    }

    #[test]
    fn test_malformed_input_rejected() {
        let codec = codec();

        assert!(codec.decrypt("").is_err());
        assert!(codec.decrypt("%%% not base64 %%%").is_err());
        assert!(codec.decrypt("c2hvcnQ").is_err());
    }

    #[test]
    fn test_other_secret_cannot_decrypt() {
        let encrypted = codec().encrypt("ada@example.com").unwrap();
        let other = AesSivCodec::new("another-secret-value", "10").unwrap();

        assert!(other.decrypt(&encrypted).is_err());
    }

    #[test]
    fn test_salt_changes_output() {
        let salted = AesSivCodec::new("a]vt!MFX8H-e!4igKa5)Tu.{ec:2$z%n", "11").unwrap();

        assert_ne!(
            codec().encrypt("ada@example.com").unwrap(),
            salted.encrypt("ada@example.com").unwrap()
        );
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(AesSivCodec::new("", "10").is_err());
    }
}
