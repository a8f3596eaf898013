use crate::error::{Result, WebToPayError};
use crate::http_client::Transport;
use crate::security::md5_hex;
use crate::url_builder::UrlBuilder;
use std::sync::Arc;

/// Sends replies to paid SMS messages.
pub struct SmsAnswerSender<T: Transport> {
    password: String,
    transport: Arc<T>,
    url_builder: UrlBuilder,
}

impl<T: Transport> std::fmt::Debug for SmsAnswerSender<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsAnswerSender")
            .field("password", &"[REDACTED]")
            .field("url_builder", &self.url_builder)
            .finish()
    }
}

impl<T: Transport> SmsAnswerSender<T> {
    pub fn new(password: impl Into<String>, transport: Arc<T>, url_builder: UrlBuilder) -> Self {
        Self {
            password: password.into(),
            transport,
            url_builder,
        }
    }

    /// Reply `text` to the SMS identified by `sms_id`.
    ///
    /// The gateway acknowledges with a body starting with `OK`; anything else
    /// is returned as [`WebToPayError::SmsAnswer`].
    pub async fn send_answer(&self, sms_id: &str, text: &str) -> Result<()> {
        let transaction = md5_hex(&[self.password.as_bytes(), b"|", sms_id.as_bytes()]);
        let query = [("id", sms_id), ("msg", text), ("transaction", transaction.as_str())];

        let body = self
            .transport
            .get(self.url_builder.build_for_sms_answer(), &query)
            .await?;

        if !body.starts_with("OK") {
            tracing::warn!(sms_id, response = %body, "SMS answer rejected");
            return Err(WebToPayError::SmsAnswer(body));
        }
        tracing::debug!(sms_id, "SMS answer accepted");
        Ok(())
    }
}
