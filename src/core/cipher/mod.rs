//! Asymmetric encryption layer.
//!
//! Encrypts a plaintext for a set of public keys (recipients) and decrypts
//! ASCII-armored ciphertext with a set of private keys (identities). The
//! layer knows nothing about entries, versions or files.
//!
//! The envelope is the standard armored age format, so anything written
//! here can be opened by other age tooling holding a matching key. The
//! envelope does not reveal which recipients it was encrypted to.

use ::age::x25519;
use zeroize::Zeroizing;

use crate::error::{CipherError, Result};

mod age;
mod keys;

pub use self::age::{parse_identity, parse_recipient, Age};
pub use self::keys::{load_identities, load_recipients, KeyPair};

/// Cryptographic backend trait.
///
/// Recipients and identities are backend-specific; for age they are
/// x25519 public and private keys.
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity/key.
    type Identity;

    /// Encrypt plaintext for every recipient in `recipients`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::NoRecipients` if `recipients` is empty.
    fn encrypt(&self, plaintext: &str, recipients: &[Self::Recipient]) -> Result<String>;

    /// Decrypt with whichever of `identities` opens the envelope.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::NoIdentities` if `identities` is empty and
    /// `CipherError::DecryptionFailed` if none of them can open it. A wrong
    /// key, a foreign store and corrupted ciphertext all look the same.
    fn decrypt(&self, encrypted: &str, identities: &[Self::Identity])
        -> Result<Zeroizing<String>>;
}

/// Encrypt plaintext for recipients given as public key strings.
///
/// # Errors
///
/// Returns `CipherError::NoRecipients` for an empty set and
/// `CipherError::InvalidRecipient` if any string is not a valid public key.
pub fn encrypt<S: AsRef<str>>(plaintext: &str, recipients: &[S]) -> Result<String> {
    if recipients.is_empty() {
        return Err(CipherError::NoRecipients.into());
    }

    let parsed = recipients
        .iter()
        .map(|r| parse_recipient(r.as_ref()))
        .collect::<Result<Vec<x25519::Recipient>>>()?;

    Age.encrypt(plaintext, &parsed)
}

/// Decrypt an armored age envelope with any of `identities`.
///
/// # Errors
///
/// See [`Cipher::decrypt`].
pub fn decrypt(encrypted: &str, identities: &[x25519::Identity]) -> Result<Zeroizing<String>> {
    Age.decrypt(encrypted, identities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_encrypt_with_string_recipients() {
        let pair = KeyPair::generate();
        let encrypted = encrypt("hunter2", &[pair.recipient.as_str()]).unwrap();

        let identity = parse_identity(&pair.identity).unwrap();
        let decrypted = decrypt(&encrypted, &[identity]).unwrap();
        assert_eq!(decrypted.as_str(), "hunter2");
    }

    #[test]
    fn test_encrypt_rejects_empty_recipient_set() {
        let none: [&str; 0] = [];
        let err = encrypt("secret", &none).unwrap_err();
        assert!(matches!(err, Error::Cipher(CipherError::NoRecipients)));
    }

    #[test]
    fn test_encrypt_rejects_one_bad_recipient() {
        let pair = KeyPair::generate();
        let err = encrypt("secret", &[pair.recipient.as_str(), "age1notakey"]).unwrap_err();
        match err {
            Error::Cipher(CipherError::InvalidRecipient(r)) => assert_eq!(r, "age1notakey"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decrypt_rejects_empty_identity_set() {
        let pair = KeyPair::generate();
        let encrypted = encrypt("secret", &[pair.recipient]).unwrap();
        let err = decrypt(&encrypted, &[]).unwrap_err();
        assert!(matches!(err, Error::Cipher(CipherError::NoIdentities)));
    }
}
