//! Callback signature checkers.
//!
//! Two interchangeable strategies implement [`SignChecker`]:
//!
//! - [`Ss1SignChecker`]: shared secret, `ss1 == md5(data + password)`
//! - [`Ss2SignChecker`]: public key, `ss2` is an RSA signature over `data`
//!   (feature `ss2`)
//!
//! Both sign the exact base64 `data` string, never the decoded payload.
//! Which one is used is decided once when the callback validator is built.

use crate::error::{CallbackErrorKind, Result, WebToPayError};
use crate::security::{constant_time_eq, md5_hex};
use std::collections::HashMap;

/// Field carrying the shared-secret MAC.
pub const SS1_FIELD: &str = "ss1";
/// Field carrying the public-key signature.
pub const SS2_FIELD: &str = "ss2";
/// Field carrying the signed payload.
pub const DATA_FIELD: &str = "data";

/// Checks whether a callback request is signed properly.
pub trait SignChecker: Send + Sync {
    /// Returns `Ok(false)` for a well-formed request with a bad signature and
    /// an error when the signature fields are missing.
    fn check_sign(&self, request: &HashMap<String, String>) -> Result<bool>;
}

fn required_fields<'a>(
    request: &'a HashMap<String, String>,
    sign_field: &str,
) -> Result<(&'a str, &'a str)> {
    match (request.get(DATA_FIELD), request.get(sign_field)) {
        (Some(data), Some(sign)) => Ok((data.as_str(), sign.as_str())),
        _ => Err(WebToPayError::callback(
            CallbackErrorKind::MissingData,
            "not enough parameters in callback, possible version mismatch",
        )),
    }
}

/// Shared-secret checker. Needs no asymmetric crypto.
pub struct Ss1SignChecker {
    password: String,
}

impl Ss1SignChecker {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Ss1SignChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ss1SignChecker")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl SignChecker for Ss1SignChecker {
    fn check_sign(&self, request: &HashMap<String, String>) -> Result<bool> {
        let (data, ss1) = required_fields(request, SS1_FIELD)?;
        let expected = md5_hex(&[data.as_bytes(), self.password.as_bytes()]);
        Ok(constant_time_eq(expected.as_bytes(), ss1.as_bytes()))
    }
}

#[cfg(feature = "ss2")]
pub use self::ss2::Ss2SignChecker;

#[cfg(feature = "ss2")]
mod ss2 {
    use super::{required_fields, SignChecker, SS2_FIELD};
    use crate::codec;
    use crate::error::{Result, WebToPayError};
    use openssl::error::ErrorStack;
    use openssl::hash::MessageDigest;
    use openssl::pkey::{PKey, Public};
    use openssl::sign::Verifier;
    use std::collections::HashMap;

    /// Public-key checker. The gateway signs with RSA over SHA-1.
    pub struct Ss2SignChecker {
        public_key: PKey<Public>,
    }

    impl Ss2SignChecker {
        /// Build a checker from the PEM public key distributed by the gateway.
        ///
        /// An unusable key is a setup problem, so it fails here rather than on
        /// every verification.
        pub fn from_pem(pem: &[u8]) -> Result<Self> {
            let public_key = PKey::public_key_from_pem(pem).map_err(|e| {
                WebToPayError::Configuration(format!("invalid gateway public key: {e}"))
            })?;
            Ok(Self { public_key })
        }

        fn verify(
            &self,
            data: &str,
            signature: &[u8],
        ) -> std::result::Result<bool, ErrorStack> {
            let mut verifier = Verifier::new(MessageDigest::sha1(), &self.public_key)?;
            verifier.update(data.as_bytes())?;
            verifier.verify(signature)
        }
    }

    impl std::fmt::Debug for Ss2SignChecker {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Ss2SignChecker")
                .field("key_bits", &self.public_key.bits())
                .finish()
        }
    }

    impl SignChecker for Ss2SignChecker {
        fn check_sign(&self, request: &HashMap<String, String>) -> Result<bool> {
            let (data, ss2) = required_fields(request, SS2_FIELD)?;

            // Undecodable or unverifiable signatures fail closed.
            let signature = match codec::decode(ss2) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "ss2 signature is not valid base64");
                    return Ok(false);
                }
            };
            match self.verify(data, &signature) {
                Ok(valid) => Ok(valid),
                Err(e) => {
                    tracing::warn!(error = %e, "ss2 verification failed");
                    Ok(false)
                }
            }
        }
    }
}
