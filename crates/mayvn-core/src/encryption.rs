//! Encryption service for provider access tokens stored at rest

use crate::AppError;
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose, Engine as _};

const NONCE_LEN: usize = 12;

/// Encryption service for sensitive data (Instagram access tokens)
/// Uses AES-256-GCM for authenticated encryption
#[derive(Clone)]
pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService").finish_non_exhaustive()
    }
}

impl EncryptionService {
    /// Create a new encryption service from raw 32-byte key (e.g. for tests; avoids env mutation).
    pub fn from_key_bytes(key_bytes: &[u8]) -> Result<Self, AppError> {
        if key_bytes.len() != 32 {
            return Err(AppError::Internal(
                "Encryption key must be 32 bytes (256 bits)".to_string(),
            ));
        }
        let key = Key::<Aes256Gcm>::from_slice(key_bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Create a new encryption service from a base64-encoded 32-byte key
    pub fn from_base64_key(key_str: &str) -> Result<Self, AppError> {
        let key_bytes = general_purpose::STANDARD
            .decode(key_str.trim())
            .map_err(|e| AppError::Internal(format!("Failed to decode encryption key: {}", e)))?;

        Self::from_key_bytes(&key_bytes)
    }

    /// Encrypt a plaintext string
    pub fn encrypt(&self, plaintext: &str) -> Result<String, AppError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| AppError::Internal(format!("Encryption failed: {}", e)))?;

        // nonce || ciphertext, base64
        let mut combined = nonce.to_vec();
        combined.extend_from_slice(&ciphertext);
        Ok(general_purpose::STANDARD.encode(&combined))
    }

    /// Decrypt an encrypted string
    pub fn decrypt(&self, encrypted: &str) -> Result<String, AppError> {
        let combined = general_purpose::STANDARD
            .decode(encrypted)
            .map_err(|e| AppError::Internal(format!("Failed to decode encrypted data: {}", e)))?;

        if combined.len() < NONCE_LEN {
            return Err(AppError::Internal("Encrypted data too short".to_string()));
        }

        let nonce = Nonce::from_slice(&combined[..NONCE_LEN]);
        let ciphertext = &combined[NONCE_LEN..];

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| AppError::Internal(format!("Decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| AppError::Internal(format!("Invalid UTF-8 in decrypted data: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> EncryptionService {
        let test_key = b"01234567890123456789012345678901";
        EncryptionService::from_key_bytes(test_key).unwrap()
    }

    #[test]
    fn test_encryption_decryption() {
        let service = test_service();
        let plaintext = "EAAGm0PX4ZCpsBAKZC7test_token";

        let encrypted = service.encrypt(plaintext).unwrap();
        assert_ne!(encrypted, plaintext);

        let decrypted = service.decrypt(&encrypted).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_nonce_makes_ciphertexts_differ() {
        let service = test_service();
        let a = service.encrypt("same").unwrap();
        let b = service.encrypt("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let service = test_service();
        let other = EncryptionService::from_key_bytes(b"abcdefghijabcdefghijabcdefghijab").unwrap();
        let encrypted = service.encrypt("token").unwrap();
        assert!(other.decrypt(&encrypted).is_err());
    }

    #[test]
    fn test_key_length_is_checked() {
        assert!(EncryptionService::from_key_bytes(b"short").is_err());
        assert!(EncryptionService::from_base64_key("AAAA").is_err());
        assert!(
            EncryptionService::from_base64_key("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=").is_ok()
        );
    }

    #[test]
    fn test_truncated_payload_is_rejected() {
        let service = test_service();
        assert!(service.decrypt("AAAA").is_err());
    }
}
