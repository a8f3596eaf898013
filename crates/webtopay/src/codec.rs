//! Wire encodings shared by requests and callbacks.
//!
//! - URL-safe base64: standard base64 with `+` -> `-` and `/` -> `_`, padding kept
//! - Query strings: `key=value` pairs joined by `&`, encoded the way the
//!   gateway's reference client does (`urlencode` rules)

use crate::error::{CallbackErrorKind, Result, WebToPayError};
use base64::alphabet;
use base64::engine::{general_purpose, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use indexmap::IndexMap;

/// Decoder that accepts input with or without padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as URL-safe base64 (padding retained).
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    general_purpose::URL_SAFE.encode(bytes)
}

/// Decode URL-safe base64. Standard-alphabet input is accepted too.
///
/// Malformed input is reported as an invalid callback, since the only
/// untrusted base64 this crate decodes comes from callbacks.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let standard: String = encoded
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    LENIENT.decode(standard.as_bytes()).map_err(|e| {
        WebToPayError::callback(CallbackErrorKind::Invalid, format!("malformed base64: {e}"))
    })
}

/// Parse an `&`-joined query string into a flat mapping.
///
/// `+` decodes to a space and `%XX` sequences are decoded. When a key repeats,
/// the last value wins but the key keeps its first position.
pub fn parse_query(query: impl AsRef<[u8]>) -> IndexMap<String, String> {
    let mut params = IndexMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_ref()) {
        params.insert(key.into_owned(), value.into_owned());
    }
    params
}

/// Encode a single key or value for a query string.
///
/// ASCII alphanumerics and `-`, `_`, `.` pass through, space becomes `+`,
/// everything else becomes `%XX`.
pub fn encode_component(value: &str) -> String {
    // form_urlencoded leaves `*` as is; the gateway's encoder escapes it.
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
}

/// Build a canonical query string, preserving the order of `pairs`.
pub fn build_query<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                encode_component(k.as_ref()),
                encode_component(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
