//! Sensitive-field encryption for relational columns.
//!
//! Columns such as pet and owner names are stored as XChaCha20-Poly1305
//! ciphertext, base64-encoded, with the random nonce prefixed. The key is
//! derived from a configured secret via SHA-256. Reads go through
//! [`FieldCipher::decrypt_lossy`]: a field that fails to decrypt renders as
//! an empty string instead of failing the request.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Key, XChaCha20Poly1305, XNonce,
};
use sha2::{Digest, Sha256};
use thiserror::Error;

const NONCE_LEN: usize = 24;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("ciphertext is not valid base64")]
    Encoding,
    #[error("ciphertext too short")]
    Truncated,
    #[error("decryption failed")]
    Decrypt,
    #[error("decrypted bytes are not valid UTF-8")]
    Utf8,
}

/// Outcome of a lossy decryption: the value, or a marker that the default
/// was substituted. Callers that only need the display string use
/// [`Decrypted::into_string`]; the marker keeps the failure observable.
#[derive(Debug, PartialEq, Eq)]
pub enum Decrypted {
    Value(String),
    Fallback,
}

impl Decrypted {
    pub fn into_string(self) -> String {
        match self {
            Decrypted::Value(s) => s,
            Decrypted::Fallback => String::new(),
        }
    }
}

#[derive(Clone)]
pub struct FieldCipher {
    key: Key,
}

impl FieldCipher {
    /// Derive the cipher key from an arbitrary secret string.
    pub fn from_secret(secret: &str) -> Self {
        let digest: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        FieldCipher { key: Key::from(digest) }
    }

    /// Encrypt one field value. Output is `base64(nonce || ciphertext)`.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let cipher = XChaCha20Poly1305::new(&self.key);
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        // Aead encrypt only fails on absurd plaintext lengths.
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .unwrap_or_default();
        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);
        BASE64.encode(combined)
    }

    /// Strict decryption, for callers that need to distinguish failures.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        let combined = BASE64.decode(encoded).map_err(|_| CryptoError::Encoding)?;
        if combined.len() < NONCE_LEN {
            return Err(CryptoError::Truncated);
        }
        let (nonce, ciphertext) = combined.split_at(NONCE_LEN);
        let cipher = XChaCha20Poly1305::new(&self.key);
        let plaintext = cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::Utf8)
    }

    /// Decrypt-or-default: a display failure must never turn into a request
    /// failure. Empty input is an empty value, not a fallback.
    pub fn decrypt_lossy(&self, encoded: &str) -> Decrypted {
        if encoded.is_empty() {
            return Decrypted::Value(String::new());
        }
        match self.decrypt(encoded) {
            Ok(value) => Decrypted::Value(value),
            Err(err) => {
                tracing::warn!(error = %err, "field decryption failed, substituting default");
                Decrypted::Fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> FieldCipher {
        FieldCipher::from_secret("clave-de-prueba")
    }

    #[test]
    fn round_trip_preserves_plaintext() {
        let c = cipher();
        for value in ["Rex", "Perro", "", "Pastor Alemán", "firulais@example.com"] {
            let encrypted = c.encrypt(value);
            assert_eq!(c.decrypt(&encrypted).unwrap(), value);
        }
    }

    #[test]
    fn ciphertexts_differ_per_call() {
        let c = cipher();
        assert_ne!(c.encrypt("Rex"), c.encrypt("Rex"));
    }

    #[test]
    fn malformed_ciphertext_falls_back_to_empty() {
        let c = cipher();
        assert_eq!(c.decrypt_lossy("not-base64!!").into_string(), "");
        assert_eq!(c.decrypt_lossy("YWJj").into_string(), "");
        assert_eq!(c.decrypt_lossy("not-base64!!"), Decrypted::Fallback);
    }

    #[test]
    fn empty_input_is_a_value_not_a_fallback() {
        assert_eq!(cipher().decrypt_lossy(""), Decrypted::Value(String::new()));
    }

    #[test]
    fn wrong_key_is_a_fallback() {
        let encrypted = cipher().encrypt("Rex");
        let other = FieldCipher::from_secret("otra-clave");
        assert_eq!(other.decrypt_lossy(&encrypted), Decrypted::Fallback);
    }
}
