//! One-call helpers for scripts that do not keep a [`Factory`] around.
//!
//! Each call builds a fresh factory from its arguments, so nothing is cached
//! between calls. The callback helper downloads the gateway public key every
//! time when the `ss2` feature is on.

use crate::callback::CallbackEvent;
use crate::config::WebToPayConfig;
use crate::error::{Result, ValidationErrorKind, WebToPayError};
use crate::factory::Factory;
use crate::request::{PaymentFields, SignedRequest};
use crate::url_builder::{Environment, UrlBuilder};
use std::collections::HashMap;

/// Field carrying the project id in one-call request data.
pub const PROJECT_ID_FIELD: &str = "projectid";
/// Field carrying the project password in one-call request data.
pub const PASSWORD_FIELD: &str = "sign_password";

/// Take project id and password out of `data`; both must be non-empty.
fn split_credentials(data: &PaymentFields) -> Result<(WebToPayConfig, PaymentFields)> {
    let credential = |name: &str| data.get(name).filter(|v| !v.is_empty()).cloned();
    let (Some(project_id), Some(password)) =
        (credential(PROJECT_ID_FIELD), credential(PASSWORD_FIELD))
    else {
        return Err(WebToPayError::Configuration(format!(
            "{PROJECT_ID_FIELD} or {PASSWORD_FIELD} is not provided"
        )));
    };

    let mut fields = data.clone();
    fields.shift_remove(PROJECT_ID_FIELD);
    fields.shift_remove(PASSWORD_FIELD);

    let config = WebToPayConfig::new()
        .with_project_id(project_id)
        .with_password(password);
    Ok((config, fields))
}

/// Validate and sign a payment request whose `data` also carries `projectid`
/// and `sign_password`.
pub fn build_request(data: &PaymentFields) -> Result<SignedRequest> {
    let (config, fields) = split_credentials(data)?;
    Factory::new(config)?.request_builder()?.build_request(&fields)
}

/// Sign a repeat request. `data` needs `projectid`, `sign_password` and
/// `orderid`.
pub fn build_repeat_request(data: &PaymentFields) -> Result<SignedRequest> {
    let (config, fields) = split_credentials(data)?;
    let order_id = fields
        .get("orderid")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            WebToPayError::validation(
                ValidationErrorKind::Missing,
                "orderid",
                "'orderid' is required but missing",
            )
        })?;
    Ok(Factory::new(config)?
        .request_builder()?
        .build_repeat_request(order_id))
}

/// Validate a callback for `project_id`, signed with `password` or the
/// gateway public key.
pub async fn validate_and_parse_data(
    request: &HashMap<String, String>,
    project_id: &str,
    password: &str,
) -> Result<CallbackEvent> {
    let mut config = WebToPayConfig::new();
    if !project_id.is_empty() {
        config = config.with_project_id(project_id);
    }
    if !password.is_empty() {
        config = config.with_password(password);
    }
    let factory = Factory::new(config)?;
    factory
        .callback_validator()
        .await?
        .validate_and_parse_data(request)
}

/// Production payment page. The page language is taken from the signed
/// `lang` field, so `language` does not change the address.
pub fn payment_url(language: &str) -> String {
    tracing::debug!(language, "payment URL requested");
    UrlBuilder::new(Environment::Production)
        .routes()
        .payment
        .clone()
}
