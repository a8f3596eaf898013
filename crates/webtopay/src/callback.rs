//! Validation and parsing of signed gateway callbacks.
//!
//! A callback carries a base64 `data` field holding a query-encoded payload,
//! plus `ss1`/`ss2` signature fields. [`CallbackValidator`] runs, in order:
//! signature check, `data` extraction, decode, parse, project check and
//! payment type inference. Each call is independent.

use crate::codec;
use crate::error::{CallbackErrorKind, Result, WebToPayError};
use crate::sign::{SignChecker, DATA_FIELD};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Kind of payment a callback reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    /// SMS based micropayment.
    Micro,
    /// Standard payment.
    Macro,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Micro => "micro",
            PaymentType::Macro => "macro",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "micro" => Some(PaymentType::Micro),
            "macro" => Some(PaymentType::Macro),
            _ => None,
        }
    }
}

/// A validated callback payload.
///
/// Always contains `projectid` (equal to the configured project) and `type`
/// (`micro` or `macro`). All other fields are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    fields: IndexMap<String, String>,
    payment_type: PaymentType,
}

impl CallbackEvent {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn project_id(&self) -> &str {
        self.get("projectid").unwrap_or_default()
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }

    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> IndexMap<String, String> {
        self.fields
    }
}

/// Parses callbacks and checks that they are authentic.
pub struct CallbackValidator {
    project_id: String,
    signer: Box<dyn SignChecker>,
}

impl std::fmt::Debug for CallbackValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackValidator")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl CallbackValidator {
    pub fn new(project_id: impl Into<String>, signer: Box<dyn SignChecker>) -> Self {
        Self {
            project_id: project_id.into(),
            signer,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Validate a callback given as a decoded request mapping.
    pub fn validate_and_parse_data(
        &self,
        request: &HashMap<String, String>,
    ) -> Result<CallbackEvent> {
        if !self.signer.check_sign(request)? {
            tracing::warn!(project_id = %self.project_id, "callback rejected: invalid sign");
            return Err(WebToPayError::callback(
                CallbackErrorKind::InvalidSign,
                "invalid sign parameters, check request length limit",
            ));
        }

        let data = request.get(DATA_FIELD).ok_or_else(|| {
            WebToPayError::callback(
                CallbackErrorKind::MissingData,
                "\"data\" parameter not found",
            )
        })?;

        let decoded = codec::decode(data)?;
        let mut fields = codec::parse_query(&decoded);

        let project_id = fields.get("projectid").ok_or_else(|| {
            WebToPayError::callback(
                CallbackErrorKind::Invalid,
                "project ID not provided in callback",
            )
        })?;
        // String comparison tolerates numeric/string skew on the wire.
        if *project_id != self.project_id {
            tracing::warn!(
                received = %project_id,
                expected = %self.project_id,
                "callback rejected: bad projectid"
            );
            return Err(WebToPayError::callback(
                CallbackErrorKind::Invalid,
                format!(
                    "bad projectid: {project_id}, should be: {}",
                    self.project_id
                ),
            ));
        }

        let payment_type = match fields.get("type").and_then(|t| PaymentType::parse(t)) {
            Some(declared) => declared,
            None => {
                let micro = ["to", "from", "sms"]
                    .iter()
                    .all(|key| fields.contains_key(*key));
                let inferred = if micro {
                    PaymentType::Micro
                } else {
                    PaymentType::Macro
                };
                fields.insert("type".to_string(), inferred.as_str().to_string());
                inferred
            }
        };

        tracing::debug!(
            project_id = %self.project_id,
            payment_type = payment_type.as_str(),
            "callback validated"
        );
        Ok(CallbackEvent {
            fields,
            payment_type,
        })
    }

    /// Validate a callback given as its raw query string (e.g. the URL query
    /// of a GET callback).
    pub fn validate_and_parse_query(&self, query: &str) -> Result<CallbackEvent> {
        let request: HashMap<String, String> = codec::parse_query(query).into_iter().collect();
        self.validate_and_parse_data(&request)
    }

    /// Check that `actual` carries every `expected` field with an equal value.
    ///
    /// Comparison is loose: numeric strings compare by value, and an absent
    /// field equals only the empty string. Fails on the first mismatch.
    pub fn check_expected_fields<'a, I>(
        &self,
        actual: &IndexMap<String, String>,
        expected: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        check_expected_fields(actual, expected)
    }
}

/// Free-standing form of [`CallbackValidator::check_expected_fields`].
pub fn check_expected_fields<'a, I>(actual: &IndexMap<String, String>, expected: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (key, value) in expected {
        let passed = actual.get(key).map(String::as_str);
        if !loose_eq(passed, value) {
            return Err(WebToPayError::UnexpectedField {
                field: key.to_string(),
                expected: value.to_string(),
                actual: passed.map(str::to_string),
            });
        }
    }
    Ok(())
}

fn loose_eq(actual: Option<&str>, expected: &str) -> bool {
    let Some(actual) = actual else {
        return expected.is_empty();
    };
    if actual == expected {
        return true;
    }
    match (parse_number(actual), parse_number(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::md5_hex;
    use crate::sign::Ss1SignChecker;

    struct FixedSigner(bool);

    impl SignChecker for FixedSigner {
        fn check_sign(&self, _request: &HashMap<String, String>) -> Result<bool> {
            Ok(self.0)
        }
    }

    fn request(data: &str) -> HashMap<String, String> {
        HashMap::from([
            ("data".to_string(), data.to_string()),
            ("sign".to_string(), "qwerty".to_string()),
        ])
    }

    fn validator(signs: bool) -> CallbackValidator {
        CallbackValidator::new("123", Box::new(FixedSigner(signs)))
    }

    #[test]
    fn test_invalid_sign_short_circuits() {
        // Not base64, so reaching the decode step would give a different error.
        let err = validator(false)
            .validate_and_parse_data(&request("%%%"))
            .unwrap_err();
        assert_eq!(err.callback_kind(), Some(CallbackErrorKind::InvalidSign));
    }

    #[test]
    fn test_missing_data_after_sign() {
        let req = HashMap::from([("sign".to_string(), "qwerty".to_string())]);
        let err = validator(true).validate_and_parse_data(&req).unwrap_err();
        assert_eq!(err.callback_kind(), Some(CallbackErrorKind::MissingData));
    }

    #[test]
    fn test_malformed_data_is_invalid() {
        let err = validator(true)
            .validate_and_parse_data(&request("%%%"))
            .unwrap_err();
        assert_eq!(err.callback_kind(), Some(CallbackErrorKind::Invalid));
    }

    #[test]
    fn test_bad_project_id() {
        let data = codec::encode("projectid=456");
        let err = validator(true)
            .validate_and_parse_data(&request(&data))
            .unwrap_err();
        assert_eq!(err.callback_kind(), Some(CallbackErrorKind::Invalid));
        assert!(err.to_string().contains("bad projectid: 456"));
    }

    #[test]
    fn test_missing_project_id() {
        let data = codec::encode("orderid=1");
        let err = validator(true)
            .validate_and_parse_data(&request(&data))
            .unwrap_err();
        assert_eq!(err.callback_kind(), Some(CallbackErrorKind::Invalid));
    }

    #[test]
    fn test_declared_type_is_kept() {
        let data = codec::encode("projectid=123&someparam=qwerty123&type=micro");
        let event = validator(true)
            .validate_and_parse_data(&request(&data))
            .unwrap();
        assert_eq!(event.project_id(), "123");
        assert_eq!(event.get("someparam"), Some("qwerty123"));
        assert_eq!(event.payment_type(), PaymentType::Micro);
        assert_eq!(event.fields().len(), 3);
    }

    #[test]
    fn test_type_inferred_micro() {
        let data = codec::encode("projectid=123&to=1398&from=37060000000&sms=TEST+hi");
        let event = validator(true)
            .validate_and_parse_data(&request(&data))
            .unwrap();
        assert_eq!(event.payment_type(), PaymentType::Micro);
        assert_eq!(event.get("type"), Some("micro"));
        assert_eq!(event.get("sms"), Some("TEST hi"));
    }

    #[test]
    fn test_type_inferred_macro() {
        let data = codec::encode("projectid=123&orderid=5&amount=100");
        let event = validator(true)
            .validate_and_parse_data(&request(&data))
            .unwrap();
        assert_eq!(event.payment_type(), PaymentType::Macro);
        assert_eq!(event.get("type"), Some("macro"));
    }

    #[test]
    fn test_unknown_type_is_replaced() {
        let data = codec::encode("projectid=123&type=mega&to=1&from=2");
        let event = validator(true)
            .validate_and_parse_data(&request(&data))
            .unwrap();
        assert_eq!(event.get("type"), Some("macro"));
    }

    #[test]
    fn test_validate_query_with_ss1() {
        let data = codec::encode("projectid=123&orderid=77&status=1");
        let ss1 = md5_hex(&[data.as_bytes(), b"secret"]);
        let query = codec::build_query([("data", data.as_str()), ("ss1", ss1.as_str())]);

        let validator = CallbackValidator::new("123", Box::new(Ss1SignChecker::new("secret")));
        let event = validator.validate_and_parse_query(&query).unwrap();
        assert_eq!(event.get("orderid"), Some("77"));
    }

    #[test]
    fn test_check_expected_fields() {
        let actual: IndexMap<String, String> = [("abc", "123"), ("def", "456")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        assert!(check_expected_fields(&actual, [("def", "456.0")]).is_ok());

        let err = check_expected_fields(&actual, [("abc", "123"), ("non-existing", "789")])
            .unwrap_err();
        match err {
            WebToPayError::UnexpectedField { field, actual, .. } => {
                assert_eq!(field, "non-existing");
                assert_eq!(actual, None);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(check_expected_fields(&actual, [("abc", "1234")]).is_err());
    }

    #[test]
    fn test_loose_eq() {
        assert!(loose_eq(Some("100"), "100"));
        assert!(loose_eq(Some("1e2"), "100"));
        assert!(loose_eq(None, ""));
        assert!(!loose_eq(None, "0"));
        assert!(!loose_eq(Some("abc"), "ABC"));
        assert!(!loose_eq(Some(""), "0"));
    }

    #[test]
    fn test_loose_eq_ignores_surrounding_whitespace_in_numbers() {
        assert!(loose_eq(Some("123 "), "123"));
        assert!(loose_eq(Some(" 123"), "123.0"));
        assert!(loose_eq(Some("123"), "\t123\n"));
        assert!(!loose_eq(Some("abc "), "abc"));
    }

    #[test]
    fn test_debug_shows_project_only() {
        let debug = format!("{:?}", validator(true));
        assert!(debug.contains("CallbackValidator"));
        assert!(debug.contains("123"));
    }
}
