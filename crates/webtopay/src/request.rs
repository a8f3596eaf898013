//! Outbound payment requests: validation, canonical encoding and signing.
//!
//! Fields are validated against [`REQUEST_SPEC`] in table order, then the
//! protocol fields are injected, the mapping is query-encoded in insertion
//! order, base64-encoded, and signed with `md5(data + password)`.

use crate::codec;
use crate::constants::PROTOCOL_VERSION;
use crate::error::{Result, ValidationErrorKind, WebToPayError};
use crate::security::md5_hex;
use crate::url_builder::UrlBuilder;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered payment request fields, as supplied by the caller.
pub type PaymentFields = IndexMap<String, String>;

/// Marker dropped from normal requests; only repeat requests carry it.
const REPEAT_REQUEST_FIELD: &str = "repeat_request";

/// Declarative constraint on one outbound field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Maximum length in bytes; 0 means unbounded.
    pub max_length: usize,
    pub required: bool,
    pub pattern: Option<Regex>,
}

impl FieldSpec {
    fn new(name: &'static str, max_length: usize, required: bool, pattern: Option<&str>) -> Self {
        Self {
            name,
            max_length,
            required,
            pattern: pattern.map(|p| Regex::new(p).expect("field patterns are valid regexes")),
        }
    }
}

/// Constraints for payment request fields, in protocol order.
pub static REQUEST_SPEC: Lazy<Vec<FieldSpec>> = Lazy::new(|| {
    vec![
        FieldSpec::new("orderid", 40, true, None),
        FieldSpec::new("accepturl", 255, true, None),
        FieldSpec::new("cancelurl", 255, true, None),
        FieldSpec::new("callbackurl", 255, true, None),
        FieldSpec::new("lang", 3, false, Some(r"(?i)^[a-z]{3}$")),
        FieldSpec::new("amount", 11, false, Some(r"^\d+$")),
        FieldSpec::new("currency", 3, false, Some(r"(?i)^[a-z]{3}$")),
        FieldSpec::new("payment", 20, false, None),
        FieldSpec::new("country", 2, false, Some(r"(?i)^[a-z_]{2}$")),
        FieldSpec::new("paytext", 255, false, None),
        FieldSpec::new("p_firstname", 255, false, None),
        FieldSpec::new("p_lastname", 255, false, None),
        FieldSpec::new("p_email", 255, false, None),
        FieldSpec::new("p_street", 255, false, None),
        FieldSpec::new("p_city", 255, false, None),
        FieldSpec::new("p_state", 20, false, None),
        FieldSpec::new("p_zip", 20, false, None),
        FieldSpec::new("p_countrycode", 2, false, Some(r"(?i)^[a-z]{2}$")),
        FieldSpec::new("test", 1, false, Some(r"^[01]$")),
        FieldSpec::new(
            "time_limit",
            19,
            false,
            Some(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$"),
        ),
    ]
});

/// Check `fields` against `specs`, failing on the first violated entry.
pub fn validate_fields(fields: &PaymentFields, specs: &[FieldSpec]) -> Result<()> {
    for spec in specs {
        let value = match fields.get(spec.name) {
            Some(value) => value,
            None if spec.required => {
                return Err(WebToPayError::validation(
                    ValidationErrorKind::Missing,
                    spec.name,
                    format!("'{}' is required but missing", spec.name),
                ));
            }
            None => continue,
        };
        if value.is_empty() {
            continue;
        }

        if spec.max_length > 0 && value.len() > spec.max_length {
            return Err(WebToPayError::validation(
                ValidationErrorKind::MaxLength,
                spec.name,
                format!(
                    "'{}' value is too long ({}), {} characters allowed",
                    spec.name,
                    value.len(),
                    spec.max_length
                ),
            ));
        }

        if let Some(pattern) = &spec.pattern {
            if !pattern.is_match(value) {
                return Err(WebToPayError::validation(
                    ValidationErrorKind::Pattern,
                    spec.name,
                    format!("'{}' value '{}' is invalid", spec.name, value),
                ));
            }
        }
    }
    Ok(())
}

/// A signed outbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// URL-safe base64 of the canonical query string.
    pub data: String,
    /// Lowercase hex `md5(data + password)`.
    pub sign: String,
}

impl SignedRequest {
    pub fn query_pairs(&self) -> [(&str, &str); 2] {
        [("data", self.data.as_str()), ("sign", self.sign.as_str())]
    }
}

/// Builds and signs payment requests for one project.
pub struct RequestBuilder {
    project_id: String,
    password: String,
    url_builder: UrlBuilder,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("project_id", &self.project_id)
            .field("password", &"[REDACTED]")
            .field("url_builder", &self.url_builder)
            .finish()
    }
}

impl RequestBuilder {
    pub fn new(
        project_id: impl Into<String>,
        password: impl Into<String>,
        url_builder: UrlBuilder,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            password: password.into(),
            url_builder,
        }
    }

    /// Validate, encode and sign a payment request.
    pub fn build_request(&self, fields: &PaymentFields) -> Result<SignedRequest> {
        validate_fields(fields, &REQUEST_SPEC)?;

        let mut request = fields.clone();
        request.insert("version".to_string(), PROTOCOL_VERSION.to_string());
        request.insert("projectid".to_string(), self.project_id.clone());
        request.shift_remove(REPEAT_REQUEST_FIELD);
        Ok(self.sign(&request))
    }

    /// Full redirect URL for a payment request. The `lang` field, if any, is
    /// passed on as the language hint.
    pub fn build_request_url(&self, fields: &PaymentFields) -> Result<String> {
        let request = self.build_request(fields)?;
        let language = fields.get("lang").map(String::as_str);
        Ok(self.url_builder.build_for_request(&request, language))
    }

    /// Signed request asking the gateway to repeat an earlier order.
    ///
    /// Skips field validation; only the order id is carried.
    pub fn build_repeat_request(&self, order_id: &str) -> SignedRequest {
        let mut request = PaymentFields::new();
        request.insert("orderid".to_string(), order_id.to_string());
        request.insert("version".to_string(), PROTOCOL_VERSION.to_string());
        request.insert("projectid".to_string(), self.project_id.clone());
        request.insert(REPEAT_REQUEST_FIELD.to_string(), "1".to_string());
        self.sign(&request)
    }

    pub fn build_repeat_request_url(&self, order_id: &str) -> String {
        let request = self.build_repeat_request(order_id);
        self.url_builder.build_for_request(&request, None)
    }

    fn sign(&self, request: &PaymentFields) -> SignedRequest {
        let query = codec::build_query(request);
        let data = codec::encode(query);
        let sign = md5_hex(&[data.as_bytes(), self.password.as_bytes()]);
        SignedRequest { data, sign }
    }
}
