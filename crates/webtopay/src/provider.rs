use crate::catalog::{parse_payment_method_list, PaymentMethodList};
use crate::error::{Result, WebToPayError};
use crate::http_client::Transport;
use crate::url_builder::UrlBuilder;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Downloads and caches payment-method catalogs of one project.
///
/// Each currency is fetched at most once per provider. Concurrent callers
/// asking for the same currency wait on a single in-flight fetch. A failed
/// fetch is not cached; the next call tries again.
pub struct PaymentMethodListProvider<T: Transport> {
    project_id: String,
    transport: Arc<T>,
    url_builder: UrlBuilder,
    cache: DashMap<String, Arc<OnceCell<Arc<PaymentMethodList>>>>,
}

impl<T: Transport> std::fmt::Debug for PaymentMethodListProvider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentMethodListProvider")
            .field("project_id", &self.project_id)
            .field("url_builder", &self.url_builder)
            .field("cached_currencies", &self.cache.len())
            .finish()
    }
}

impl<T: Transport> PaymentMethodListProvider<T> {
    pub fn new(project_id: impl Into<String>, transport: Arc<T>, url_builder: UrlBuilder) -> Self {
        Self {
            project_id: project_id.into(),
            transport,
            url_builder,
            cache: DashMap::new(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Catalog for `currency`, fetched on first use.
    pub async fn payment_method_list(&self, currency: &str) -> Result<Arc<PaymentMethodList>> {
        // Clone the cell out so no map guard is held across the await.
        let cell = self.cache.entry(currency.to_string()).or_default().clone();
        if let Some(list) = cell.get() {
            tracing::debug!(currency, "Payment method list cache hit");
            return Ok(Arc::clone(list));
        }
        cell.get_or_try_init(|| self.fetch(currency)).await.cloned()
    }

    async fn fetch(&self, currency: &str) -> Result<Arc<PaymentMethodList>> {
        let url = self
            .url_builder
            .build_for_payment_method_list(&self.project_id, currency);
        tracing::info!(project_id = %self.project_id, currency, "Fetching payment method list");

        let body = self.transport.get(&url, &[]).await?;
        if body.is_empty() {
            return Err(WebToPayError::Catalog(format!(
                "empty payment method list response from {url}"
            )));
        }
        let list = parse_payment_method_list(&self.project_id, currency, body.as_bytes())?;
        Ok(Arc::new(list))
    }
}
