//! Keypair issuance for the voting ledger.
//!
//! The voting core never inspects key material: the public key doubles as
//! the primary storage key of a user record and is otherwise an opaque
//! unique string. Both halves of the pair are rendered as base32 text so
//! they can travel through key segments and payloads unescaped.

use data_encoding::BASE32_NOPAD;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use thiserror::Error;

/// Errors raised while issuing a keypair.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key generation failed: {0}")]
    Generation(String),
}

/// A freshly issued keypair, both halves in textual form.
///
/// The private key is handed to the caller exactly once; nothing in this
/// workspace ever stores it.
#[derive(Debug, Clone)]
pub struct IssuedKeypair {
    pub public_key: String,
    pub private_key: String,
}

/// Issue a new ed25519 keypair.
pub fn generate() -> Result<IssuedKeypair, KeyError> {
    let signing_key = SigningKey::generate(&mut OsRng);
    let public_key = BASE32_NOPAD.encode(signing_key.verifying_key().as_bytes());
    let private_key = BASE32_NOPAD.encode(&signing_key.to_bytes());
    Ok(IssuedKeypair {
        public_key,
        private_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_keys_are_distinct_and_nonempty() {
        let first = generate().unwrap();
        let second = generate().unwrap();

        assert!(!first.public_key.is_empty());
        assert!(!first.private_key.is_empty());
        assert_ne!(first.public_key, second.public_key);
        assert_ne!(first.public_key, first.private_key);
    }

    #[test]
    fn public_keys_stay_plain_text() {
        let keypair = generate().unwrap();
        assert!(keypair
            .public_key
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }
}
