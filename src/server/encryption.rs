//! Optional end-to-end encryption envelope for `/api/v1/*`.
//!
//! Hybrid RSA + AES-GCM scheme: the client generates a random AES-256 key,
//! encrypts the JSON payload with AES-256-GCM, then encrypts the AES key
//! itself with the server's RSA public key (OAEP/SHA-256 padding). The
//! server reverses this with its RSA private key. Only present when the
//! `encryption` feature is enabled and configured.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;
use rsa::{
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey},
    Oaep, RsaPrivateKey, RsaPublicKey,
};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::EncryptionConfig;

const AES_KEY_LEN: usize = 32;
const GCM_NONCE_LEN: usize = 12;
const ENVELOPE_VERSION: &str = "1.0";

/// The wire shape of an encrypted request or response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// Base64-encoded RSA-OAEP-encrypted AES key.
    pub encrypted_key: String,
    /// Base64-encoded AES-GCM ciphertext, with the 16-byte tag appended.
    pub encrypted_data: String,
    /// Base64-encoded 96-bit GCM nonce.
    pub iv: String,
    /// Envelope format version, for forward compatibility.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    ENVELOPE_VERSION.to_string()
}

/// Errors specific to the encryption envelope.
#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("no private key loaded")]
    NoPrivateKey,
    #[error("no public key loaded")]
    NoPublicKey,
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("RSA operation failed: {0}")]
    Rsa(String),
    #[error("AES-GCM operation failed")]
    Aead,
    #[error("payload was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads or generates an RSA key pair and performs the hybrid
/// encrypt/decrypt operations used by the `/api/v1/*` envelope.
pub struct EncryptionService {
    private_key: Option<RsaPrivateKey>,
    public_key: Option<RsaPublicKey>,
}

impl EncryptionService {
    /// Build a service from configuration, loading PEM-encoded keys from
    /// disk when the configured paths exist. If only a private key is
    /// found, the public key is derived from it.
    #[must_use]
    pub fn from_config(config: &EncryptionConfig) -> Self {
        let mut private_key = config
            .private_key_path
            .as_deref()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|pem| RsaPrivateKey::from_pkcs8_pem(&pem).ok());

        let mut public_key = config
            .public_key_path
            .as_deref()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|pem| RsaPublicKey::from_public_key_pem(&pem).ok())
            .or_else(|| private_key.as_ref().map(RsaPrivateKey::to_public_key));

        // No key on disk but encryption is wanted: fall back to an
        // ephemeral key pair generated for this process's lifetime.
        if private_key.is_none() && config.enabled {
            if let Ok(key) = RsaPrivateKey::new(&mut rand::thread_rng(), 2048) {
                public_key = Some(key.to_public_key());
                private_key = Some(key);
            }
        }

        Self {
            private_key,
            public_key,
        }
    }

    /// Whether this service has a usable key pair.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.private_key.is_some() && self.public_key.is_some()
    }

    /// The public key, PEM-encoded, for clients to encrypt against.
    pub fn public_key_pem(&self) -> Result<String, EncryptionError> {
        let key = self.public_key.as_ref().ok_or(EncryptionError::NoPublicKey)?;
        key.to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .map_err(|e| EncryptionError::Rsa(e.to_string()))
    }

    /// Decrypt an envelope received from a client into the plaintext JSON
    /// bytes it carried.
    pub fn decrypt_payload(&self, envelope: &EncryptedPayload) -> Result<Vec<u8>, EncryptionError> {
        let private_key = self
            .private_key
            .as_ref()
            .ok_or(EncryptionError::NoPrivateKey)?;

        let encrypted_key = STANDARD.decode(&envelope.encrypted_key)?;
        let encrypted_data = STANDARD.decode(&envelope.encrypted_data)?;
        let iv = STANDARD.decode(&envelope.iv)?;

        let aes_key_bytes = private_key
            .decrypt(Oaep::new::<Sha256>(), &encrypted_key)
            .map_err(|e| EncryptionError::Rsa(e.to_string()))?;

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&aes_key_bytes));
        let nonce = Nonce::from_slice(&iv);
        let plaintext = cipher
            .decrypt(nonce, encrypted_data.as_ref())
            .map_err(|_| EncryptionError::Aead)?;

        Ok(plaintext)
    }

    /// Encrypt plaintext JSON bytes into an envelope for the client.
    pub fn encrypt_payload(&self, plaintext: &[u8]) -> Result<EncryptedPayload, EncryptionError> {
        let public_key = self
            .public_key
            .as_ref()
            .ok_or(EncryptionError::NoPublicKey)?;

        let mut aes_key_bytes = [0u8; AES_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut aes_key_bytes);
        let mut iv_bytes = [0u8; GCM_NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut iv_bytes);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&aes_key_bytes));
        let nonce = Nonce::from_slice(&iv_bytes);
        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| EncryptionError::Aead)?;

        let encrypted_key = public_key
            .encrypt(&mut rand::thread_rng(), Oaep::new::<Sha256>(), &aes_key_bytes)
            .map_err(|e| EncryptionError::Rsa(e.to_string()))?;

        Ok(EncryptedPayload {
            encrypted_key: STANDARD.encode(encrypted_key),
            encrypted_data: STANDARD.encode(ciphertext),
            iv: STANDARD.encode(iv_bytes),
            version: ENVELOPE_VERSION.to_string(),
        })
    }

    /// Generate a fresh RSA key pair, PEM-encoded, for operators bootstrapping
    /// a new deployment.
    pub fn generate_key_pair(bits: usize) -> Result<(String, String), EncryptionError> {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), bits)
            .map_err(|e| EncryptionError::Rsa(e.to_string()))?;
        let public_key = private_key.to_public_key();

        let private_pem = private_key
            .to_pkcs8_pem(rsa::pkcs8::LineEnding::LF)
            .map_err(|e| EncryptionError::Rsa(e.to_string()))?
            .to_string();
        let public_pem = public_key
            .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .map_err(|e| EncryptionError::Rsa(e.to_string()))?;

        Ok((private_pem, public_pem))
    }
}
