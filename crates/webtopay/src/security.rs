//! Digest and comparison helpers for the gateway's signing scheme.
//!
//! The shared-secret scheme is an MD5 digest over `data + password`, as fixed
//! by the gateway's wire protocol.

use md5::{Digest, Md5};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Lowercase hex MD5 of the concatenation of `parts`.
pub fn md5_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// Compare a received `ss1` MAC with the locally computed one.
///
/// Inputs are reduced to SHA-256 digests first, so a forged MAC of any length
/// takes the same time to reject.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}
