//! Payment signature verification.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// Server-held HMAC key. Redacted in debug output and wiped on drop.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: secret.into(),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(**redacted**)")?;
        Ok(())
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signing key is invalid")]
    InvalidKey,

    #[error("signature is not valid hex")]
    Malformed,

    #[error("signature mismatch")]
    Mismatch,
}

/// Lowercase hex HMAC-SHA256 of `message`.
///
/// # Errors
///
/// Returns an error when the key cannot be used for HMAC.
pub fn sign(secret: &SigningSecret, message: &[u8]) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;

    mac.update(message);

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Signature the provider attaches to a checkout callback.
///
/// # Errors
///
/// Returns an error when the key cannot be used for HMAC.
pub fn payment_signature(
    secret: &SigningSecret,
    provider_order_id: &str,
    provider_payment_id: &str,
) -> Result<String, SignatureError> {
    sign(
        secret,
        format!("{provider_order_id}|{provider_payment_id}").as_bytes(),
    )
}

/// Verify a checkout callback signature in constant time.
///
/// # Errors
///
/// Returns [`SignatureError::Mismatch`] when the signature does not match.
pub fn verify_payment_signature(
    secret: &SigningSecret,
    provider_order_id: &str,
    provider_payment_id: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    verify(
        secret,
        format!("{provider_order_id}|{provider_payment_id}").as_bytes(),
        signature,
    )
}

/// Verify a webhook signature over the raw request body in constant time.
///
/// # Errors
///
/// Returns [`SignatureError::Mismatch`] when the signature does not match.
pub fn verify_webhook_signature(
    secret: &SigningSecret,
    body: &[u8],
    signature: &str,
) -> Result<(), SignatureError> {
    verify(secret, body, signature)
}

fn verify(secret: &SigningSecret, message: &[u8], signature: &str) -> Result<(), SignatureError> {
    let expected = hex::decode(signature.trim()).map_err(|_| SignatureError::Malformed)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;

    mac.update(message);

    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}
