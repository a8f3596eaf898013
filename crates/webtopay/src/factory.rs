use crate::callback::CallbackValidator;
use crate::config::WebToPayConfig;
use crate::error::{Result, WebToPayError};
use crate::http_client::{Transport, WebClient};
use crate::provider::PaymentMethodListProvider;
use crate::request::RequestBuilder;
use crate::sign::SignChecker;
use crate::sms::SmsAnswerSender;
use crate::url_builder::UrlBuilder;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Wires the SDK components together from one [`WebToPayConfig`].
///
/// Components are created on first request and cached, so repeated calls
/// return the same instance. A component whose configuration is incomplete
/// fails with [`WebToPayError::Configuration`] each time it is requested;
/// the others stay usable.
pub struct Factory<T: Transport = WebClient> {
    config: WebToPayConfig,
    transport: Arc<T>,
    url_builder: OnceCell<UrlBuilder>,
    request_builder: OnceCell<RequestBuilder>,
    sms_answer_sender: OnceCell<SmsAnswerSender<T>>,
    payment_method_list_provider: OnceCell<PaymentMethodListProvider<T>>,
    callback_validator: tokio::sync::OnceCell<CallbackValidator>,
}

impl<T: Transport> std::fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Factory<WebClient> {
    /// Factory using the default `reqwest` transport.
    pub fn new(config: WebToPayConfig) -> Result<Self> {
        Ok(Self::with_transport(config, WebClient::new()?))
    }
}

impl<T: Transport> Factory<T> {
    pub fn with_transport(config: WebToPayConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            url_builder: OnceCell::new(),
            request_builder: OnceCell::new(),
            sms_answer_sender: OnceCell::new(),
            payment_method_list_provider: OnceCell::new(),
            callback_validator: tokio::sync::OnceCell::new(),
        }
    }

    pub fn config(&self) -> &WebToPayConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url_builder(&self) -> &UrlBuilder {
        self.url_builder.get_or_init(|| {
            UrlBuilder::with_routes(self.config.environment, self.config.routes())
        })
    }

    /// Needs project id and password.
    pub fn request_builder(&self) -> Result<&RequestBuilder> {
        self.request_builder.get_or_try_init(|| {
            Ok(RequestBuilder::new(
                self.require_project_id()?,
                self.require_password()?,
                self.url_builder().clone(),
            ))
        })
    }

    /// Needs password.
    pub fn sms_answer_sender(&self) -> Result<&SmsAnswerSender<T>> {
        self.sms_answer_sender.get_or_try_init(|| {
            Ok(SmsAnswerSender::new(
                self.require_password()?,
                Arc::clone(&self.transport),
                self.url_builder().clone(),
            ))
        })
    }

    /// Needs project id.
    pub fn payment_method_list_provider(&self) -> Result<&PaymentMethodListProvider<T>> {
        self.payment_method_list_provider.get_or_try_init(|| {
            Ok(PaymentMethodListProvider::new(
                self.require_project_id()?,
                Arc::clone(&self.transport),
                self.url_builder().clone(),
            ))
        })
    }

    /// Needs project id. With the `ss2` feature the gateway public key is
    /// downloaded on the first call; otherwise the password is needed.
    pub async fn callback_validator(&self) -> Result<&CallbackValidator> {
        self.callback_validator
            .get_or_try_init(|| async {
                let project_id = self.require_project_id()?;
                let signer = self.sign_checker().await?;
                Ok(CallbackValidator::new(project_id, signer))
            })
            .await
    }

    #[cfg(feature = "ss2")]
    async fn sign_checker(&self) -> Result<Box<dyn SignChecker>> {
        use crate::sign::Ss2SignChecker;

        let url = self.url_builder().build_for_public_key();
        tracing::info!(url, "Downloading gateway public key");
        let pem = self.transport.get(url, &[]).await?;
        if pem.is_empty() {
            return Err(WebToPayError::Transport(format!(
                "cannot download public key from {url}"
            )));
        }
        Ok(Box::new(Ss2SignChecker::from_pem(pem.as_bytes())?))
    }

    #[cfg(not(feature = "ss2"))]
    async fn sign_checker(&self) -> Result<Box<dyn SignChecker>> {
        use crate::sign::Ss1SignChecker;

        Ok(Box::new(Ss1SignChecker::new(self.require_password()?)))
    }

    fn require_project_id(&self) -> Result<&str> {
        self.config.project_id.as_deref().ok_or_else(|| {
            WebToPayError::Configuration("project id is not configured".to_string())
        })
    }

    fn require_password(&self) -> Result<&str> {
        self.config.password.as_deref().ok_or_else(|| {
            WebToPayError::Configuration("project password is not configured".to_string())
        })
    }
}
