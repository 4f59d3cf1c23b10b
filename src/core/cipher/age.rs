//! Age encryption backend implementation.
//!
//! Provides encryption/decryption using the age format with x25519 keys
//! and ASCII armor encoding.

use std::io::{Read, Write};

use ::age::x25519;
use tracing::trace;
use zeroize::{Zeroize, Zeroizing};

use super::Cipher;
use crate::error::{CipherError, Result};

/// Age-based cryptographic backend using x25519 keys
pub struct Age;

impl Cipher for Age {
    type Recipient = x25519::Recipient;
    type Identity = x25519::Identity;

    fn encrypt(&self, plaintext: &str, recipients: &[x25519::Recipient]) -> Result<String> {
        if recipients.is_empty() {
            return Err(CipherError::NoRecipients.into());
        }

        trace!(
            recipients = recipients.len(),
            plaintext_len = plaintext.len(),
            "encrypting"
        );

        let encryptor =
            age::Encryptor::with_recipients(recipients.iter().map(|r| r as &dyn age::Recipient))
                .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let mut encrypted = Vec::new();
        let armor = age::armor::ArmoredWriter::wrap_output(
            &mut encrypted,
            age::armor::Format::AsciiArmor,
        )
        .map_err(|e| CipherError::ArmorFailed(format!("{}", e)))?;
        let mut writer = encryptor
            .wrap_output(armor)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        writer
            .write_all(plaintext.as_bytes())
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        let armored = writer
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        armored
            .finish()
            .map_err(|e| CipherError::ArmorFailed(format!("{}", e)))?;

        trace!(ciphertext_len = encrypted.len(), "encrypted");

        String::from_utf8(encrypted)
            .map_err(|e| CipherError::ArmorFailed(format!("UTF-8 error: {}", e)).into())
    }

    fn decrypt(
        &self,
        encrypted: &str,
        identities: &[x25519::Identity],
    ) -> Result<Zeroizing<String>> {
        if identities.is_empty() {
            return Err(CipherError::NoIdentities.into());
        }

        trace!(
            ciphertext_len = encrypted.len(),
            identities = identities.len(),
            "decrypting"
        );

        let reader = age::armor::ArmoredReader::new(encrypted.as_bytes());
        let decryptor = age::Decryptor::new(reader)
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        let mut reader = decryptor
            .decrypt(identities.iter().map(|i| i as &dyn age::Identity))
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        // Truncated or tampered payloads surface here, not in the header.
        let mut decrypted = Zeroizing::new(Vec::new());
        reader
            .read_to_end(&mut decrypted)
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        trace!(plaintext_len = decrypted.len(), "decrypted");

        match String::from_utf8(std::mem::take(&mut *decrypted)) {
            Ok(plaintext) => Ok(Zeroizing::new(plaintext)),
            Err(e) => {
                let utf8_error = e.utf8_error();
                e.into_bytes().zeroize();
                Err(CipherError::DecryptionFailed(format!("UTF-8 error: {}", utf8_error)).into())
            }
        }
    }
}

/// Parse a public key string into an age recipient
///
/// # Errors
///
/// Returns `CipherError::InvalidRecipient` if the key format is invalid.
pub fn parse_recipient(key: &str) -> Result<x25519::Recipient> {
    key.trim()
        .parse::<x25519::Recipient>()
        .map_err(|_| CipherError::InvalidRecipient(key.to_string()).into())
}

/// Parse an `AGE-SECRET-KEY-...` string into an identity.
///
/// The error never echoes the input.
pub fn parse_identity(secret: &str) -> Result<x25519::Identity> {
    secret
        .trim()
        .parse::<x25519::Identity>()
        .map_err(|e: &'static str| CipherError::InvalidIdentity(e).into())
}
